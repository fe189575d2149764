//! # flanvest-token
//!
//! **Token Service boundary**: the fungible-ledger interface the vesting
//! core consumes, plus an in-memory ledger that implements it.
//!
//! - **TokenService**: `balance_of`, `transfer`, owner-gated `mint`/`burn`,
//!   metadata and total supply
//! - **InMemoryToken**: hash-map ledger; the deployer holds the initial
//!   supply and owns mint/burn
//! - **SupplyTally**: `Σ balances == initial + minted − burned`

pub mod ledger;
pub mod service;
pub mod supply;

pub use ledger::InMemoryToken;
pub use service::TokenService;
pub use supply::SupplyTally;
