//! Ledger-wide invariant checks.
//!
//! Invariants verified on demand:
//! ```text
//! ∀ member: 0 ≤ withdrawn ≤ unlocked ≤ total, total > 0
//! Σ (total − withdrawn) ≤ balanceOf(pool)
//! Σ receipts.amount == Σ withdrawn
//! ```
//!
//! The solvency bound can only break if tokens leave the pool through a
//! path other than member withdrawals (e.g. an owner burn on the pool).

use flanvest_types::{Result, VestingError, WithdrawalReceipt};
use serde::Serialize;

use crate::registry::MembershipRegistry;

/// Aggregate counters over the registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LedgerTotals {
    /// Σ `total_allocation`
    pub allocated: u128,
    /// Σ `unlocked_amount`
    pub unlocked: u128,
    /// Σ `withdrawn_amount`
    pub withdrawn: u128,
}

impl LedgerTotals {
    /// Tokens still owed to members over the remaining lifetime.
    #[must_use]
    pub fn outstanding(&self) -> u128 {
        self.allocated.saturating_sub(self.withdrawn)
    }

    /// Unlocked tokens waiting to be withdrawn.
    #[must_use]
    pub fn releasable(&self) -> u128 {
        self.unlocked.saturating_sub(self.withdrawn)
    }
}

/// Sum the registry's counters.
pub fn totals(registry: &MembershipRegistry) -> Result<LedgerTotals> {
    registry.iter().try_fold(LedgerTotals::default(), |acc, m| -> Result<LedgerTotals> {
        Ok(LedgerTotals {
            allocated: acc
                .allocated
                .checked_add(m.total_allocation)
                .ok_or(VestingError::ArithmeticOverflow("allocated total"))?,
            unlocked: acc
                .unlocked
                .checked_add(m.unlocked_amount)
                .ok_or(VestingError::ArithmeticOverflow("unlocked total"))?,
            withdrawn: acc
                .withdrawn
                .checked_add(m.withdrawn_amount)
                .ok_or(VestingError::ArithmeticOverflow("withdrawn total"))?,
        })
    })
}

/// Verify that the pool still covers every outstanding obligation.
///
/// # Errors
/// Returns [`VestingError::SolvencyViolation`] if `outstanding > pool_balance`.
pub fn verify_solvency(registry: &MembershipRegistry, pool_balance: u128) -> Result<()> {
    let outstanding = totals(registry)?.outstanding();
    if outstanding > pool_balance {
        tracing::error!(outstanding, pool = pool_balance, "Solvency violation");
        return Err(VestingError::SolvencyViolation {
            outstanding,
            pool: pool_balance,
        });
    }
    Ok(())
}

/// Verify every record's bounds and that the receipt log accounts for
/// every withdrawn token.
///
/// # Errors
/// Returns [`VestingError::InvariantViolation`] for the first broken record.
pub fn verify_members(
    registry: &MembershipRegistry,
    receipts: &[WithdrawalReceipt],
) -> Result<()> {
    for member in registry.iter() {
        member.check_invariants()?;
        let receipted: u128 = receipts
            .iter()
            .filter(|r| r.member == member.address)
            .map(|r| r.amount)
            .sum();
        if receipted != member.withdrawn_amount {
            return Err(VestingError::InvariantViolation {
                member: member.address,
                reason: format!(
                    "receipts total {receipted} != withdrawn {}",
                    member.withdrawn_amount
                ),
            });
        }
    }
    Ok(())
}
