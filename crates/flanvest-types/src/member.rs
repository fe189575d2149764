//! Member records for the vesting registry.
//!
//! ## State Machine
//!
//! Each record moves through two orthogonal axes:
//!
//! ```text
//!   Registered ──unlock──▶ PartiallyUnlocked ──unlock──▶ FullyUnlocked
//!
//!   Owed ──withdraw──▶ Settled ──unlock──▶ Owed ...
//! ```
//!
//! `FullyUnlocked ∧ Settled` is terminal. Counters only ever grow:
//! `0 ≤ withdrawn_amount ≤ unlocked_amount ≤ total_allocation`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Address, Result, VestingError};

/// The member category. Selects which unlock schedule applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Category {
    Treasury,
    Team,
    PreSale,
}

impl Category {
    /// All categories, in registry display order.
    pub const ALL: [Self; 3] = [Self::Treasury, Self::Team, Self::PreSale];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Treasury => write!(f, "TREASURY"),
            Self::Team => write!(f, "TEAM"),
            Self::PreSale => write!(f, "PRESALE"),
        }
    }
}

/// Unlock progress of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VestingPhase {
    /// Nothing unlocked yet.
    Registered,
    /// Some, but not all, of the allocation is unlocked.
    PartiallyUnlocked,
    /// The whole allocation is unlocked.
    FullyUnlocked,
}

/// Payout progress of a member relative to what is unlocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettlementState {
    /// Unlocked tokens are waiting to be withdrawn.
    Owed,
    /// Everything unlocked so far has been withdrawn.
    Settled,
}

/// A registered vesting member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub address: Address,
    pub category: Category,
    /// Tokens pledged over the vesting lifetime. Fixed at registration.
    pub total_allocation: u128,
    /// Cumulative tokens eligible for withdrawal.
    pub unlocked_amount: u128,
    /// Cumulative tokens transferred to the member.
    pub withdrawn_amount: u128,
    /// Unix seconds at registration.
    pub added_at: u64,
}

impl MemberRecord {
    /// A fresh record with nothing unlocked or withdrawn.
    #[must_use]
    pub fn new(
        address: Address,
        category: Category,
        total_allocation: u128,
        added_at: u64,
    ) -> Self {
        Self {
            address,
            category,
            total_allocation,
            unlocked_amount: 0,
            withdrawn_amount: 0,
            added_at,
        }
    }

    /// Unlocked tokens not yet withdrawn.
    #[must_use]
    pub fn releasable(&self) -> u128 {
        self.unlocked_amount.saturating_sub(self.withdrawn_amount)
    }

    /// Tokens still owed over the remaining lifetime (`total - withdrawn`).
    #[must_use]
    pub fn outstanding(&self) -> u128 {
        self.total_allocation.saturating_sub(self.withdrawn_amount)
    }

    #[must_use]
    pub fn phase(&self) -> VestingPhase {
        if self.unlocked_amount == 0 {
            VestingPhase::Registered
        } else if self.unlocked_amount < self.total_allocation {
            VestingPhase::PartiallyUnlocked
        } else {
            VestingPhase::FullyUnlocked
        }
    }

    #[must_use]
    pub fn settlement(&self) -> SettlementState {
        if self.withdrawn_amount < self.unlocked_amount {
            SettlementState::Owed
        } else {
            SettlementState::Settled
        }
    }

    /// Fully unlocked and fully withdrawn.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.phase() == VestingPhase::FullyUnlocked
            && self.settlement() == SettlementState::Settled
    }

    /// Raise `unlocked_amount` to `target`, never lowering it and never
    /// exceeding the allocation. Returns the increase.
    pub fn raise_unlocked(&mut self, target: u128) -> u128 {
        let capped = target.min(self.total_allocation);
        if capped <= self.unlocked_amount {
            return 0;
        }
        let delta = capped - self.unlocked_amount;
        self.unlocked_amount = capped;
        delta
    }

    /// Record a completed payout.
    ///
    /// # Errors
    /// Returns [`VestingError::InvariantViolation`] if `amount` exceeds
    /// what is releasable.
    pub fn record_withdrawal(&mut self, amount: u128) -> Result<()> {
        if amount > self.releasable() {
            return Err(VestingError::InvariantViolation {
                member: self.address,
                reason: format!(
                    "withdrawal of {amount} exceeds releasable {}",
                    self.releasable()
                ),
            });
        }
        self.withdrawn_amount += amount;
        Ok(())
    }

    /// Check `withdrawn <= unlocked <= total` and `total > 0`.
    ///
    /// # Errors
    /// Returns [`VestingError::InvariantViolation`] describing the broken bound.
    pub fn check_invariants(&self) -> Result<()> {
        let violation = |reason: String| VestingError::InvariantViolation {
            member: self.address,
            reason,
        };
        if self.total_allocation == 0 {
            return Err(violation("total allocation is zero".into()));
        }
        if self.unlocked_amount > self.total_allocation {
            return Err(violation(format!(
                "unlocked {} > total {}",
                self.unlocked_amount, self.total_allocation
            )));
        }
        if self.withdrawn_amount > self.unlocked_amount {
            return Err(violation(format!(
                "withdrawn {} > unlocked {}",
                self.withdrawn_amount, self.unlocked_amount
            )));
        }
        Ok(())
    }

    /// The public view returned by `get_member_data`.
    #[must_use]
    pub fn data(&self) -> MemberData {
        MemberData {
            category: self.category,
            total_allocation: self.total_allocation,
            unlocked_amount: self.unlocked_amount,
            withdrawn_amount: self.withdrawn_amount,
        }
    }
}

/// `(category, totalAllocation, unlockedAmount, withdrawnAmount)` for a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberData {
    pub category: Category,
    pub total_allocation: u128,
    pub unlocked_amount: u128,
    pub withdrawn_amount: u128,
}
