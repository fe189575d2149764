//! # flanvest-core
//!
//! **Vesting ledger**: admin gate, membership registry, schedule-driven
//! unlocks, member withdrawals, and on-demand invariant audits.
//!
//! ## Architecture
//!
//! A [`VestingLedger`] owns its state and borrows nothing. It talks to the
//! outside world through two seams:
//! - a [`flanvest_token::TokenService`] holding the pool balance
//! - a [`Clock`] supplying Unix seconds
//!
//! ```text
//!   owner ──add_admin──▶ AdminGate
//!   admin ──add_*_member──▶ MembershipRegistry  (pool = balanceOf(ledger))
//!   admin ──unlock_token──▶ UnlockEngine ──raise unlocked──▶ records
//!  member ──withdraw_by_member──▶ WithdrawalProcessor ──transfer──▶ token
//! ```
//!
//! ## Guarantees
//!
//! - `0 ≤ withdrawn ≤ unlocked ≤ total` for every record
//! - `Σ total_allocation ≤ pool` at every registration
//! - an unlock pass is idempotent at a fixed time and monotone over time
//! - a failed call leaves every counter and balance unchanged

pub mod access;
pub mod audit;
pub mod clock;
pub mod ledger;
pub mod registry;
pub mod unlock;
pub mod withdrawal;

pub use access::AdminGate;
pub use audit::LedgerTotals;
pub use clock::{Clock, ManualClock, SystemClock};
pub use ledger::VestingLedger;
pub use registry::MembershipRegistry;
pub use unlock::UnlockEngine;
pub use withdrawal::WithdrawalProcessor;
