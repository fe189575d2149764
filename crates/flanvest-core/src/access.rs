//! Admin gate: owner plus an explicit admin set.
//!
//! The owner is fixed at deployment and is the only identity that can
//! change the admin set. Registry writes and unlock passes require the
//! caller to be in the admin set. The owner is not implicitly an admin.

use std::collections::HashSet;

use flanvest_types::{Address, Result, Role, VestingError};

/// Role-based permission checks consulted at the top of every mutating
/// ledger operation.
#[derive(Debug, Clone)]
pub struct AdminGate {
    owner: Address,
    admins: HashSet<Address>,
}

impl AdminGate {
    /// Create a gate owned by `owner` with an empty admin set.
    #[must_use]
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            admins: HashSet::new(),
        }
    }

    #[must_use]
    pub fn owner(&self) -> Address {
        self.owner
    }

    #[must_use]
    pub fn is_admin(&self, identity: &Address) -> bool {
        self.admins.contains(identity)
    }

    /// Current admins, sorted for stable output.
    #[must_use]
    pub fn admins(&self) -> Vec<Address> {
        let mut admins: Vec<Address> = self.admins.iter().copied().collect();
        admins.sort_unstable();
        admins
    }

    /// Guard an owner-only operation.
    pub fn ensure_owner(&self, caller: Address) -> Result<()> {
        if caller == self.owner {
            Ok(())
        } else {
            tracing::warn!(caller = %caller, required = %Role::Owner, "Permission denied");
            Err(VestingError::Unauthorized {
                caller,
                required: Role::Owner,
            })
        }
    }

    /// Guard an admin-only operation.
    pub fn ensure_admin(&self, caller: Address) -> Result<()> {
        if self.admins.contains(&caller) {
            Ok(())
        } else {
            tracing::warn!(caller = %caller, required = %Role::Admin, "Permission denied");
            Err(VestingError::Unauthorized {
                caller,
                required: Role::Admin,
            })
        }
    }

    /// Add `identity` to the admin set. Owner-only.
    ///
    /// # Errors
    /// - `Unauthorized` if `caller` is not the owner
    /// - `AlreadyAdmin` if `identity` is already an admin
    pub fn add_admin(&mut self, caller: Address, identity: Address) -> Result<()> {
        self.ensure_owner(caller)?;
        if !self.admins.insert(identity) {
            return Err(VestingError::AlreadyAdmin(identity));
        }
        tracing::info!(admin = %identity, "Admin added");
        Ok(())
    }

    /// Remove `identity` from the admin set. Owner-only.
    ///
    /// # Errors
    /// - `Unauthorized` if `caller` is not the owner
    /// - `NotAdmin` if `identity` is not an admin
    pub fn remove_admin(&mut self, caller: Address, identity: Address) -> Result<()> {
        self.ensure_owner(caller)?;
        if !self.admins.remove(&identity) {
            return Err(VestingError::NotAdmin(identity));
        }
        tracing::info!(admin = %identity, "Admin removed");
        Ok(())
    }
}
