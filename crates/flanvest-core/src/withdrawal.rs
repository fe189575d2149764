//! Withdrawal processor.
//!
//! Converts a member's unlocked-but-not-withdrawn balance into a token
//! transfer out of the ledger's pool:
//! 1. Look up the caller's record
//! 2. Compute `deliverable = unlocked − withdrawn`
//! 3. Stage the updated record and running totals
//! 4. Ask the token service to transfer `deliverable`
//! 5. Commit the staged record and append a receipt
//!
//! Nothing is committed unless the transfer succeeds.

use chrono::Utc;
use flanvest_token::TokenService;
use flanvest_types::{Address, ReceiptId, Result, VestingError, WithdrawalReceipt};

use crate::registry::MembershipRegistry;

/// Executes member withdrawals and keeps the receipt log.
#[derive(Debug, Clone, Default)]
pub struct WithdrawalProcessor {
    /// Append-only log of successful withdrawals.
    receipts: Vec<WithdrawalReceipt>,
    /// Σ tokens transferred out since deployment.
    total_withdrawn: u128,
}

impl WithdrawalProcessor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pay `caller` everything they have unlocked but not yet withdrawn.
    ///
    /// `pool` is the address holding the vested tokens; `now` is the
    /// ledger clock reading recorded on the receipt.
    ///
    /// # Errors
    /// - `MemberNotFound` if `caller` is not registered
    /// - `NothingToWithdraw` if nothing is releasable
    /// - `TransferFailed` if the token service refuses (no state change)
    pub fn withdraw<T: TokenService>(
        &mut self,
        registry: &mut MembershipRegistry,
        token: &mut T,
        pool: Address,
        caller: Address,
        now: u64,
    ) -> Result<WithdrawalReceipt> {
        let record = registry.get_mut(&caller)?;
        let deliverable = record.releasable();
        if deliverable == 0 {
            return Err(VestingError::NothingToWithdraw(caller));
        }

        let mut staged = record.clone();
        staged.record_withdrawal(deliverable)?;
        let new_total = self
            .total_withdrawn
            .checked_add(deliverable)
            .ok_or(VestingError::ArithmeticOverflow("total withdrawn"))?;

        token
            .transfer(pool, caller, deliverable)
            .map_err(|err| {
                tracing::warn!(
                    member = %caller,
                    amount = deliverable,
                    error = %err,
                    "Withdrawal transfer refused"
                );
                VestingError::TransferFailed {
                    to: caller,
                    amount: deliverable,
                    reason: err.to_string(),
                }
            })?;

        *record = staged;
        self.total_withdrawn = new_total;

        let receipt = WithdrawalReceipt {
            id: ReceiptId::new(),
            member: caller,
            category: record.category,
            amount: deliverable,
            withdrawn_total: record.withdrawn_amount,
            ledger_time: now,
            executed_at: Utc::now(),
        };
        tracing::info!(
            receipt = %receipt.id,
            member = %caller,
            category = %record.category,
            amount = deliverable,
            withdrawn_total = record.withdrawn_amount,
            total_allocation = record.total_allocation,
            "Withdrawal executed"
        );
        self.receipts.push(receipt.clone());
        Ok(receipt)
    }

    /// All receipts, oldest first.
    #[must_use]
    pub fn receipts(&self) -> &[WithdrawalReceipt] {
        &self.receipts
    }

    /// Receipts for one member, oldest first.
    pub fn receipts_for(&self, member: Address) -> impl Iterator<Item = &WithdrawalReceipt> {
        self.receipts.iter().filter(move |r| r.member == member)
    }

    /// Σ tokens transferred out since deployment.
    #[must_use]
    pub fn total_withdrawn(&self) -> u128 {
        self.total_withdrawn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flanvest_token::InMemoryToken;
    use flanvest_types::{Category, TokenMetadata};

    struct Fixture {
        registry: MembershipRegistry,
        token: InMemoryToken,
        processor: WithdrawalProcessor,
        owner: Address,
        pool: Address,
        alice: Address,
    }

    fn setup() -> Fixture {
        let owner = Address::derive("owner");
        let pool = Address::derive("pool");
        let alice = Address::derive("alice");
        let metadata = TokenMetadata::new("Test Token", "TEST", 18);
        let mut token = InMemoryToken::deploy(owner, metadata, 10_000);
        token.transfer(owner, pool, 1_000).unwrap();
        let mut registry = MembershipRegistry::new();
        registry
            .register(alice, Category::PreSale, 800, token.balance_of(pool), 0)
            .unwrap();
        Fixture {
            registry,
            token,
            processor: WithdrawalProcessor::new(),
            owner,
            pool,
            alice,
        }
    }

    fn unlock(fx: &mut Fixture, amount: u128) {
        fx.registry
            .get_mut(&fx.alice)
            .unwrap()
            .raise_unlocked(amount);
    }

    #[test]
    fn withdraw_transfers_releasable() {
        let mut fx = setup();
        unlock(&mut fx, 300);

        let receipt = fx
            .processor
            .withdraw(&mut fx.registry, &mut fx.token, fx.pool, fx.alice, 42)
            .unwrap();

        assert_eq!(receipt.amount, 300);
        assert_eq!(receipt.withdrawn_total, 300);
        assert_eq!(receipt.ledger_time, 42);
        assert_eq!(receipt.category, Category::PreSale);
        assert_eq!(fx.token.balance_of(fx.alice), 300);
        assert_eq!(fx.token.balance_of(fx.pool), 700);
        assert_eq!(fx.registry.get(&fx.alice).unwrap().withdrawn_amount, 300);
        assert_eq!(fx.processor.total_withdrawn(), 300);
        assert_eq!(fx.processor.receipts().len(), 1);
    }

    #[test]
    fn nothing_to_withdraw_before_unlock() {
        let mut fx = setup();
        let err = fx
            .processor
            .withdraw(&mut fx.registry, &mut fx.token, fx.pool, fx.alice, 0)
            .unwrap_err();
        assert_eq!(err, VestingError::NothingToWithdraw(fx.alice));
        assert!(fx.processor.receipts().is_empty());
    }

    #[test]
    fn second_withdraw_without_unlock_fails() {
        let mut fx = setup();
        unlock(&mut fx, 300);
        fx.processor
            .withdraw(&mut fx.registry, &mut fx.token, fx.pool, fx.alice, 0)
            .unwrap();
        let err = fx
            .processor
            .withdraw(&mut fx.registry, &mut fx.token, fx.pool, fx.alice, 0)
            .unwrap_err();
        assert!(matches!(err, VestingError::NothingToWithdraw(_)));
        assert_eq!(fx.token.balance_of(fx.alice), 300);
    }

    #[test]
    fn delta_only_after_further_unlock() {
        let mut fx = setup();
        unlock(&mut fx, 300);
        fx.processor
            .withdraw(&mut fx.registry, &mut fx.token, fx.pool, fx.alice, 0)
            .unwrap();
        unlock(&mut fx, 800);
        let receipt = fx
            .processor
            .withdraw(&mut fx.registry, &mut fx.token, fx.pool, fx.alice, 0)
            .unwrap();
        assert_eq!(receipt.amount, 500);
        assert_eq!(receipt.withdrawn_total, 800);
        assert!(fx.registry.get(&fx.alice).unwrap().is_terminal());
        assert_eq!(fx.processor.receipts_for(fx.alice).count(), 2);
    }

    #[test]
    fn unknown_caller_not_found() {
        let mut fx = setup();
        let ghost = Address::derive("ghost");
        let err = fx
            .processor
            .withdraw(&mut fx.registry, &mut fx.token, fx.pool, ghost, 0)
            .unwrap_err();
        assert_eq!(err, VestingError::MemberNotFound(ghost));
    }

    #[test]
    fn refused_transfer_leaves_state_unchanged() {
        let mut fx = setup();
        unlock(&mut fx, 600);
        // Drain the pool below what is owed.
        fx.token.burn(fx.owner, fx.pool, 900).unwrap();

        let err = fx
            .processor
            .withdraw(&mut fx.registry, &mut fx.token, fx.pool, fx.alice, 0)
            .unwrap_err();
        match err {
            VestingError::TransferFailed { to, amount, reason } => {
                assert_eq!(to, fx.alice);
                assert_eq!(amount, 600);
                assert!(reason.contains("VS_ERR_500"), "Got: {reason}");
            }
            other => panic!("expected TransferFailed, got {other:?}"),
        }
        let rec = fx.registry.get(&fx.alice).unwrap();
        assert_eq!(rec.withdrawn_amount, 0);
        assert_eq!(rec.unlocked_amount, 600);
        assert_eq!(fx.token.balance_of(fx.pool), 100);
        assert_eq!(fx.processor.total_withdrawn(), 0);
        assert!(fx.processor.receipts().is_empty());
    }
}
