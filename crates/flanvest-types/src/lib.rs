//! # flanvest-types
//!
//! Shared types, errors, and configuration for the **FlanVest** vesting
//! ledger.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`Address`], [`ReceiptId`]
//! - **Member model**: [`MemberRecord`], [`MemberData`], [`Category`],
//!   [`VestingPhase`], [`SettlementState`]
//! - **Schedules**: [`Tranche`], [`ScheduleDefinition`], [`Schedules`]
//! - **Receipts**: [`WithdrawalReceipt`], [`UnlockReport`]
//! - **Configuration**: [`VestingConfig`], [`TokenMetadata`]
//! - **Errors**: [`VestingError`] with `VS_ERR_` prefix codes
//! - **Constants**: reference timestamps and limits

pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod member;
pub mod receipt;
pub mod schedule;

pub use config::*;
pub use error::*;
pub use ids::*;
pub use member::*;
pub use receipt::*;
pub use schedule::*;

// Constants are accessed via `flanvest_types::constants::FOO`
// (not re-exported to avoid name collisions).
