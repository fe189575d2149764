//! Membership registry.
//!
//! Maps each member address to exactly one [`MemberRecord`]. Records are
//! created once and never deleted. The registry also keeps the running
//! `Σ total_allocation` so the pool check on insert is O(1).

use std::collections::HashMap;

use flanvest_types::{Address, Category, MemberRecord, Result, VestingError};

/// Address → record map plus the allocated total.
#[derive(Debug, Clone, Default)]
pub struct MembershipRegistry {
    members: HashMap<Address, MemberRecord>,
    /// Σ `total_allocation` over all records.
    total_allocated: u128,
}

impl MembershipRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new member against a pool currently holding `pool` tokens.
    ///
    /// Nothing is inserted unless every check passes.
    ///
    /// # Errors
    /// - `InvalidAmount` if `amount == 0`
    /// - `DuplicateMember` if `address` is already registered (any category)
    /// - `AllocationExceedsPool` if `Σ total_allocation + amount > pool`
    pub fn register(
        &mut self,
        address: Address,
        category: Category,
        amount: u128,
        pool: u128,
        added_at: u64,
    ) -> Result<&MemberRecord> {
        if amount == 0 {
            return Err(VestingError::InvalidAmount { amount });
        }
        if self.members.contains_key(&address) {
            return Err(VestingError::DuplicateMember(address));
        }
        let new_total = self
            .total_allocated
            .checked_add(amount)
            .filter(|total| *total <= pool)
            .ok_or(VestingError::AllocationExceedsPool {
                requested: amount,
                allocated: self.total_allocated,
                pool,
            })?;

        self.total_allocated = new_total;
        let record = self
            .members
            .entry(address)
            .or_insert_with(|| MemberRecord::new(address, category, amount, added_at));
        tracing::info!(
            member = %address,
            category = %category,
            amount,
            total_allocated = new_total,
            pool,
            "Member registered"
        );
        Ok(&*record)
    }

    /// Look up a member.
    ///
    /// # Errors
    /// Returns `MemberNotFound` if `address` is not registered.
    pub fn get(&self, address: &Address) -> Result<&MemberRecord> {
        self.members
            .get(address)
            .ok_or(VestingError::MemberNotFound(*address))
    }

    pub(crate) fn get_mut(&mut self, address: &Address) -> Result<&mut MemberRecord> {
        self.members
            .get_mut(address)
            .ok_or(VestingError::MemberNotFound(*address))
    }

    #[must_use]
    pub fn contains(&self, address: &Address) -> bool {
        self.members.contains_key(address)
    }

    /// All records, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &MemberRecord> {
        self.members.values()
    }

    /// Records of one category.
    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &MemberRecord> {
        self.members.values().filter(move |m| m.category == category)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Σ `total_allocation` over all records.
    #[must_use]
    pub fn total_allocated(&self) -> u128 {
        self.total_allocated
    }
}
