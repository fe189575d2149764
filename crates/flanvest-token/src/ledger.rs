//! In-memory fungible-token ledger.
//!
//! Tracks per-account balances and the total supply. All mutations are
//! atomic: either the full operation succeeds or every balance is
//! unchanged. The deployer receives the initial supply and owns the
//! mint/burn privilege.

use std::collections::HashMap;

use flanvest_types::{Address, Result, TokenMetadata, VestingError};

use crate::service::TokenService;
use crate::supply::SupplyTally;

/// Hash-map backed implementation of [`TokenService`].
#[derive(Debug, Clone)]
pub struct InMemoryToken {
    metadata: TokenMetadata,
    owner: Address,
    /// Per-account balances. Accounts with zero balance may be absent.
    balances: HashMap<Address, u128>,
    total_supply: u128,
    supply: SupplyTally,
}

impl InMemoryToken {
    /// Deploy a token, crediting `initial_supply` to `owner`.
    #[must_use]
    pub fn deploy(owner: Address, metadata: TokenMetadata, initial_supply: u128) -> Self {
        let mut balances = HashMap::new();
        if initial_supply > 0 {
            balances.insert(owner, initial_supply);
        }
        tracing::info!(
            name = %metadata.name,
            symbol = %metadata.symbol,
            decimals = metadata.decimals,
            owner = %owner,
            initial_supply,
            "Token deployed"
        );
        Self {
            metadata,
            owner,
            balances,
            total_supply: initial_supply,
            supply: SupplyTally::new(initial_supply),
        }
    }

    /// Verify that the balances sum to the issued supply.
    pub fn verify_supply(&self) -> Result<()> {
        let actual = self
            .balances
            .values()
            .try_fold(0u128, |acc, b| acc.checked_add(*b))
            .ok_or(VestingError::ArithmeticOverflow("balance sum"))?;
        self.supply.verify(actual)?;
        if actual != self.total_supply {
            return Err(VestingError::InvariantViolation {
                member: Address::ZERO,
                reason: format!("balances {actual} != total supply {}", self.total_supply),
            });
        }
        Ok(())
    }

    /// Issuance tally since deployment.
    #[must_use]
    pub fn supply(&self) -> &SupplyTally {
        &self.supply
    }

    /// Number of accounts holding a non-zero balance.
    #[must_use]
    pub fn holder_count(&self) -> usize {
        self.balances.values().filter(|b| **b > 0).count()
    }

    fn ensure_owner(&self, caller: Address) -> Result<()> {
        if caller != self.owner {
            tracing::warn!(caller = %caller, owner = %self.owner, "Token owner check failed");
            return Err(VestingError::NotTokenOwner(caller));
        }
        Ok(())
    }

    fn ensure_funds(&self, account: Address, amount: u128) -> Result<()> {
        let available = self.balance_of(account);
        if available < amount {
            return Err(VestingError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        Ok(())
    }
}

impl TokenService for InMemoryToken {
    fn metadata(&self) -> &TokenMetadata {
        &self.metadata
    }

    fn owner(&self) -> Address {
        self.owner
    }

    fn total_supply(&self) -> u128 {
        self.total_supply
    }

    fn balance_of(&self, account: Address) -> u128 {
        self.balances.get(&account).copied().unwrap_or(0)
    }

    fn transfer(&mut self, from: Address, to: Address, amount: u128) -> Result<()> {
        self.ensure_funds(from, amount)?;
        if from != to {
            // Cannot overflow: the recipient's balance plus `amount` is
            // bounded by the total supply.
            *self.balances.entry(from).or_default() -= amount;
            *self.balances.entry(to).or_default() += amount;
        }
        tracing::debug!(from = %from, to = %to, amount, "Token transfer");
        Ok(())
    }

    fn mint(&mut self, caller: Address, to: Address, amount: u128) -> Result<()> {
        self.ensure_owner(caller)?;
        let new_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(VestingError::ArithmeticOverflow("total supply"))?;
        self.supply.record_mint(amount)?;
        self.total_supply = new_supply;
        *self.balances.entry(to).or_default() += amount;
        tracing::info!(to = %to, amount, total_supply = new_supply, "Tokens minted");
        Ok(())
    }

    fn burn(&mut self, caller: Address, from: Address, amount: u128) -> Result<()> {
        self.ensure_owner(caller)?;
        self.ensure_funds(from, amount)?;
        self.supply.record_burn(amount)?;
        *self.balances.entry(from).or_default() -= amount;
        self.total_supply -= amount;
        tracing::info!(
            from = %from,
            amount,
            total_supply = self.total_supply,
            "Tokens burned"
        );
        Ok(())
    }
}
