//! Receipt types for the FlanVest audit trail.
//!
//! Every successful withdrawal produces a [`WithdrawalReceipt`]. Receipts
//! form an append-only log that, summed, must equal the tokens that left
//! the ledger's pool.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Address, Category, ReceiptId};

/// Proof that a payout transfer was executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalReceipt {
    pub id: ReceiptId,
    /// The member who received the tokens.
    pub member: Address,
    pub category: Category,
    /// Tokens transferred by this withdrawal.
    pub amount: u128,
    /// The member's cumulative withdrawn total after this withdrawal.
    pub withdrawn_total: u128,
    /// Ledger clock reading (Unix seconds) when the withdrawal executed.
    pub ledger_time: u64,
    pub executed_at: DateTime<Utc>,
}

/// Outcome of one unlock pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockReport {
    /// Clock snapshot the pass evaluated schedules at.
    pub at: u64,
    /// Members whose unlocked amount increased.
    pub members_advanced: usize,
    /// Sum of all increases.
    pub newly_unlocked: u128,
}

impl UnlockReport {
    /// True when the pass changed no record.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.members_advanced == 0
    }
}
