//! Supply conservation invariant checker.
//!
//! Mathematical invariant enforced by the in-memory ledger:
//! ```text
//! Σ balances == initial supply + Σ mints − Σ burns
//! ```
//!
//! Transfers only move tokens between accounts, so they never change
//! either side of the equation.

use flanvest_types::{Result, VestingError};

/// Tracks issuance since genesis and validates conservation against the
/// sum of all balances.
#[derive(Debug, Clone, Default)]
pub struct SupplyTally {
    initial: u128,
    minted: u128,
    burned: u128,
}

impl SupplyTally {
    /// Create a tally for a ledger deployed with `initial` tokens.
    #[must_use]
    pub fn new(initial: u128) -> Self {
        Self {
            initial,
            minted: 0,
            burned: 0,
        }
    }

    /// Record a mint.
    pub fn record_mint(&mut self, amount: u128) -> Result<()> {
        self.minted = self
            .minted
            .checked_add(amount)
            .ok_or(VestingError::ArithmeticOverflow("minted total"))?;
        Ok(())
    }

    /// Record a burn.
    pub fn record_burn(&mut self, amount: u128) -> Result<()> {
        self.burned = self
            .burned
            .checked_add(amount)
            .ok_or(VestingError::ArithmeticOverflow("burned total"))?;
        Ok(())
    }

    /// Expected total supply: initial + minted − burned.
    #[must_use]
    pub fn expected_supply(&self) -> u128 {
        self.initial.saturating_add(self.minted).saturating_sub(self.burned)
    }

    /// Verify that `actual_supply` (sum of all balances) matches.
    ///
    /// # Errors
    /// Returns [`VestingError::InvariantViolation`] if actual ≠ expected.
    pub fn verify(&self, actual_supply: u128) -> Result<()> {
        let expected = self.expected_supply();
        if actual_supply != expected {
            return Err(VestingError::InvariantViolation {
                member: flanvest_types::Address::ZERO,
                reason: format!(
                    "token supply {actual_supply} != expected {expected} \
                     (initial={}, minted={}, burned={})",
                    self.initial, self.minted, self.burned
                ),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn total_minted(&self) -> u128 {
        self.minted
    }

    #[must_use]
    pub fn total_burned(&self) -> u128 {
        self.burned
    }
}
