//! The vesting ledger: one owned value holding the admin set, registry,
//! schedules and receipt log, wired to a token service and a clock.
//!
//! Every mutating call names its `caller` explicitly and starts with a
//! permission check. Calls take `&mut self`, so they execute one at a
//! time, and each either commits fully or leaves all state unchanged.

use flanvest_token::TokenService;
use flanvest_types::{
    Address, Category, MemberData, MemberRecord, Result, Schedules, Tranche, UnlockReport,
    VestingConfig, VestingError, WithdrawalReceipt,
};
use rust_decimal::Decimal;

use crate::access::AdminGate;
use crate::audit::{self, LedgerTotals};
use crate::clock::Clock;
use crate::registry::MembershipRegistry;
use crate::unlock::UnlockEngine;
use crate::withdrawal::WithdrawalProcessor;

/// A deployed vesting ledger.
///
/// `address` is the ledger's own account on the token service; the pool
/// is whatever that account holds.
pub struct VestingLedger<T: TokenService, C: Clock> {
    address: Address,
    gate: AdminGate,
    registry: MembershipRegistry,
    engine: UnlockEngine,
    withdrawals: WithdrawalProcessor,
    token: T,
    clock: C,
}

impl<T: TokenService, C: Clock> VestingLedger<T, C> {
    /// Deploy a ledger at `address`, owned by `owner`.
    ///
    /// # Errors
    /// - config validation errors (`InvalidSchedule`, `Configuration`)
    /// - `Configuration` if `config.token` does not describe `token`
    pub fn deploy(
        owner: Address,
        address: Address,
        config: VestingConfig,
        token: T,
        clock: C,
    ) -> Result<Self> {
        config.validate()?;
        if token.metadata() != &config.token {
            return Err(VestingError::Configuration(format!(
                "config is for token {} but ledger was given {}",
                config.token.symbol,
                token.metadata().symbol
            )));
        }
        let engine = UnlockEngine::new(config.schedules)?;
        tracing::info!(
            owner = %owner,
            ledger = %address,
            token = %config.token.symbol,
            now = clock.now(),
            "Vesting ledger deployed"
        );
        Ok(Self {
            address,
            gate: AdminGate::new(owner),
            registry: MembershipRegistry::new(),
            engine,
            withdrawals: WithdrawalProcessor::new(),
            token,
            clock,
        })
    }

    // -----------------------------------------------------------------
    // Admin gate
    // -----------------------------------------------------------------

    /// Grant admin rights. Owner-only; re-adding fails with `AlreadyAdmin`.
    pub fn add_admin(&mut self, caller: Address, identity: Address) -> Result<()> {
        self.gate.add_admin(caller, identity)
    }

    /// Revoke admin rights. Owner-only.
    pub fn remove_admin(&mut self, caller: Address, identity: Address) -> Result<()> {
        self.gate.remove_admin(caller, identity)
    }

    #[must_use]
    pub fn is_admin(&self, identity: &Address) -> bool {
        self.gate.is_admin(identity)
    }

    #[must_use]
    pub fn owner(&self) -> Address {
        self.gate.owner()
    }

    #[must_use]
    pub fn admins(&self) -> Vec<Address> {
        self.gate.admins()
    }

    // -----------------------------------------------------------------
    // Membership registry
    // -----------------------------------------------------------------

    pub fn add_treasury_member(
        &mut self,
        caller: Address,
        member: Address,
        amount: u128,
    ) -> Result<()> {
        self.add_member(caller, member, Category::Treasury, amount)
    }

    pub fn add_team_member(
        &mut self,
        caller: Address,
        member: Address,
        amount: u128,
    ) -> Result<()> {
        self.add_member(caller, member, Category::Team, amount)
    }

    pub fn add_pre_sale_member(
        &mut self,
        caller: Address,
        member: Address,
        amount: u128,
    ) -> Result<()> {
        self.add_member(caller, member, Category::PreSale, amount)
    }

    /// Register `member` under `category` with a fixed allocation. Admin-only.
    ///
    /// The ledger's own account cannot be a member.
    ///
    /// # Errors
    /// `Unauthorized`, `InvalidMember`, `InvalidAmount`, `DuplicateMember`,
    /// or `AllocationExceedsPool`, checked in that order.
    pub fn add_member(
        &mut self,
        caller: Address,
        member: Address,
        category: Category,
        amount: u128,
    ) -> Result<()> {
        self.gate.ensure_admin(caller)?;
        let result = if member == self.address {
            Err(VestingError::InvalidMember(member))
        } else {
            let pool = self.token.balance_of(self.address);
            let now = self.clock.now();
            self.registry
                .register(member, category, amount, pool, now)
                .map(|_| ())
        };
        result.inspect_err(|err| {
            tracing::warn!(
                member = %member,
                category = %category,
                amount,
                error = %err,
                "Member rejected"
            );
        })
    }

    /// `(category, total_allocation, unlocked_amount, withdrawn_amount)`.
    pub fn get_member_data(&self, member: &Address) -> Result<MemberData> {
        self.registry.get(member).map(MemberRecord::data)
    }

    /// Full record, including registration time.
    pub fn member(&self, member: &Address) -> Result<&MemberRecord> {
        self.registry.get(member)
    }

    /// All records, in no particular order.
    pub fn members(&self) -> impl Iterator<Item = &MemberRecord> {
        self.registry.iter()
    }

    #[must_use]
    pub fn member_count(&self) -> usize {
        self.registry.len()
    }

    /// Σ `total_allocation` over all members.
    #[must_use]
    pub fn total_allocated(&self) -> u128 {
        self.registry.total_allocated()
    }

    // -----------------------------------------------------------------
    // Unlock engine
    // -----------------------------------------------------------------

    /// Advance every member to its schedule target at the current time.
    /// Admin-only.
    ///
    /// # Errors
    /// `Unauthorized`, or `NoMembers` on an empty registry.
    pub fn unlock_token(&mut self, caller: Address) -> Result<UnlockReport> {
        self.gate.ensure_admin(caller)?;
        let now = self.clock.now();
        self.engine.run(&mut self.registry, now)
    }

    /// Schedule target for `member` at `at`. Read-only; does not unlock.
    pub fn vested_amount(&self, member: &Address, at: u64) -> Result<u128> {
        let record = self.registry.get(member)?;
        self.engine.target_for(record, at)
    }

    /// Cumulative fraction unlocked for `category` at the current time.
    #[must_use]
    pub fn current_fraction(&self, category: Category) -> Decimal {
        self.engine.fraction(category, self.clock.now())
    }

    /// The next tranche of `category` after the current time.
    #[must_use]
    pub fn next_unlock(&self, category: Category) -> Option<Tranche> {
        self.engine
            .schedule(category)
            .next_unlock(self.clock.now())
            .copied()
    }

    #[must_use]
    pub fn schedules(&self) -> &Schedules {
        self.engine.schedules()
    }

    // -----------------------------------------------------------------
    // Withdrawal processor
    // -----------------------------------------------------------------

    /// Transfer the caller's unlocked-but-not-withdrawn balance to them.
    ///
    /// # Errors
    /// `MemberNotFound`, `NothingToWithdraw`, or `TransferFailed`.
    pub fn withdraw_by_member(&mut self, caller: Address) -> Result<WithdrawalReceipt> {
        let now = self.clock.now();
        self.withdrawals.withdraw(
            &mut self.registry,
            &mut self.token,
            self.address,
            caller,
            now,
        )
    }

    /// Unlocked tokens `member` could withdraw right now.
    pub fn releasable(&self, member: &Address) -> Result<u128> {
        self.registry.get(member).map(MemberRecord::releasable)
    }

    /// Tokens held by the ledger on the token service.
    #[must_use]
    pub fn get_contract_balance(&self) -> u128 {
        self.token.balance_of(self.address)
    }

    /// Successful withdrawals, oldest first.
    #[must_use]
    pub fn receipts(&self) -> &[WithdrawalReceipt] {
        self.withdrawals.receipts()
    }

    /// Σ tokens paid out since deployment.
    #[must_use]
    pub fn total_withdrawn(&self) -> u128 {
        self.withdrawals.total_withdrawn()
    }

    // -----------------------------------------------------------------
    // Audit
    // -----------------------------------------------------------------

    pub fn totals(&self) -> Result<LedgerTotals> {
        audit::totals(&self.registry)
    }

    /// Outstanding obligations must be covered by the pool.
    pub fn verify_solvency(&self) -> Result<()> {
        audit::verify_solvency(&self.registry, self.get_contract_balance())
    }

    /// Every record within bounds and matched by its receipts.
    pub fn verify_member_invariants(&self) -> Result<()> {
        audit::verify_members(&self.registry, self.withdrawals.receipts())
    }

    // -----------------------------------------------------------------
    // Collaborators
    // -----------------------------------------------------------------

    /// The ledger's own account on the token service.
    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    #[must_use]
    pub fn token(&self) -> &T {
        &self.token
    }

    /// Direct access to the token service, bypassing the ledger.
    #[cfg(any(test, feature = "test-helpers"))]
    pub fn token_mut(&mut self) -> &mut T {
        &mut self.token
    }

    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }
}
