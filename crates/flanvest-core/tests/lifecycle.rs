//! End-to-end lifecycle tests for the vesting ledger.
//!
//! These tests drive a ledger through the reference schedule:
//! deploy token -> fund pool -> appoint admin -> register members ->
//! advance time -> unlock -> withdraw
//!
//! They check per-category unlock amounts at each tranche boundary, the
//! pool balance after withdrawals, and the ledger invariants throughout.

use flanvest_core::{Clock, ManualClock, VestingLedger};
use flanvest_token::{InMemoryToken, TokenService};
use flanvest_types::constants::{TS_2022_06_30, TS_2022_12_31, TS_2023_06_30, TS_2023_12_31};
use flanvest_types::{Address, Category, MemberData, VestingConfig, VestingError, constants};

const ONE: u128 = constants::one_token(18);
const LOCKED_SUPPLY: u128 = 50_000_000 * ONE;
const TOKEN_SUPPLY: u128 = 100_000_000 * ONE;

/// Helper: a funded ledger with the owner appointed as admin.
struct Deployment {
    ledger: VestingLedger<InMemoryToken, ManualClock>,
    clock: ManualClock,
    owner: Address,
}

impl Deployment {
    fn new() -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let owner = Address::derive("owner");
        let config = VestingConfig::flan_reference();
        let mut token = InMemoryToken::deploy(owner, config.token.clone(), TOKEN_SUPPLY);
        let ledger_addr = Address::derive("flan-vesting");
        token
            .transfer(owner, ledger_addr, LOCKED_SUPPLY)
            .expect("Funding the pool should succeed");

        let clock = ManualClock::new(TS_2022_06_30 - 30 * 86_400);
        let mut ledger = VestingLedger::deploy(owner, ledger_addr, config, token, clock.clone())
            .expect("Reference deployment should succeed");
        ledger
            .add_admin(owner, owner)
            .expect("Owner can appoint itself admin");

        Self {
            ledger,
            clock,
            owner,
        }
    }

    fn data(&self, member: Address) -> MemberData {
        self.ledger
            .get_member_data(&member)
            .expect("Member should be registered")
    }

    fn unlocked(&self, member: Address) -> u128 {
        self.data(member).unlocked_amount
    }

    fn unlock_at(&mut self, ts: u64) {
        self.clock.increase_to(ts);
        self.ledger
            .unlock_token(self.owner)
            .expect("Unlock should succeed");
        self.assert_invariants();
    }

    fn assert_invariants(&self) {
        self.ledger
            .verify_member_invariants()
            .expect("Member invariants must hold");
        self.ledger.verify_solvency().expect("Pool must stay solvent");
        self.ledger
            .token()
            .verify_supply()
            .expect("Token supply must be conserved");
    }
}

// =============================================================================
// Test: reference scenario across all three categories
// =============================================================================
#[test]
fn lifecycle_reference_scenario() {
    let mut d = Deployment::new();
    let owner = d.owner;
    let member1 = Address::derive("member1");
    let member2 = Address::derive("member2");

    assert_eq!(d.ledger.get_contract_balance(), LOCKED_SUPPLY);

    let amount0 = 10_000_000 * ONE;
    let amount1 = 500_000 * ONE;
    let amount2 = 250_000 * ONE;
    d.ledger.add_treasury_member(owner, owner, amount0).unwrap();
    d.ledger.add_team_member(owner, member1, amount1).unwrap();
    d.ledger.add_pre_sale_member(owner, member2, amount2).unwrap();

    assert_eq!(
        d.data(owner),
        MemberData {
            category: Category::Treasury,
            total_allocation: amount0,
            unlocked_amount: 0,
            withdrawn_amount: 0,
        }
    );
    assert_eq!(d.ledger.total_allocated(), amount0 + amount1 + amount2);

    // First tranche: treasury 25%, presale 50%, team still locked.
    d.unlock_at(TS_2022_06_30 + 1);
    assert_eq!(d.unlocked(owner), 2_500_000 * ONE);
    assert_eq!(d.unlocked(member1), 0);
    assert_eq!(d.unlocked(member2), 125_000 * ONE);

    // Second tranche: treasury 50%, team cliff at 20%, presale fully vested.
    d.unlock_at(TS_2022_12_31 + 1);
    assert_eq!(d.unlocked(owner), 5_000_000 * ONE);
    assert_eq!(d.unlocked(member1), 100_000 * ONE);
    assert_eq!(d.unlocked(member2), amount2);

    // Time passes without another unlock; withdrawal pays the recorded amount.
    d.clock.increase_to(TS_2023_12_31 + 1);
    let receipt = d.ledger.withdraw_by_member(owner).unwrap();
    assert_eq!(receipt.amount, 5_000_000 * ONE);
    assert_eq!(receipt.ledger_time, TS_2023_12_31 + 1);

    let owner_data = d.data(owner);
    assert_eq!(owner_data.unlocked_amount, 5_000_000 * ONE);
    assert_eq!(owner_data.withdrawn_amount, 5_000_000 * ONE);
    assert_eq!(d.data(member1).withdrawn_amount, 0);
    assert_eq!(d.data(member2).withdrawn_amount, 0);

    assert_eq!(d.ledger.get_contract_balance(), 45_000_000 * ONE);
    d.assert_invariants();
}

// =============================================================================
// Test: everyone drains their allocation after the final tranche
// =============================================================================
#[test]
fn lifecycle_full_drain() {
    let mut d = Deployment::new();
    let owner = d.owner;
    let members = [
        (Address::derive("treasury"), Category::Treasury, 7_000_000 * ONE),
        (Address::derive("team"), Category::Team, 3_333_333 * ONE + 7),
        (Address::derive("presale"), Category::PreSale, 1_000_001),
    ];
    for (addr, category, amount) in members {
        d.ledger.add_member(owner, addr, category, amount).unwrap();
    }

    let mut paid = 0;
    for ts in [TS_2022_06_30, TS_2022_12_31, TS_2023_06_30, TS_2023_12_31] {
        d.unlock_at(ts);
        for (addr, _, _) in members {
            match d.ledger.withdraw_by_member(addr) {
                Ok(receipt) => paid += receipt.amount,
                Err(VestingError::NothingToWithdraw(_)) => {}
                Err(other) => panic!("unexpected withdrawal error: {other}"),
            }
        }
        d.assert_invariants();
    }

    for (addr, _, amount) in members {
        let data = d.data(addr);
        assert_eq!(data.unlocked_amount, amount);
        assert_eq!(data.withdrawn_amount, amount);
        assert_eq!(d.ledger.token().balance_of(addr), amount);
    }
    let allocated: u128 = members.iter().map(|(_, _, amount)| amount).sum();
    assert_eq!(paid, allocated);
    assert_eq!(d.ledger.total_withdrawn(), allocated);
    assert_eq!(d.ledger.get_contract_balance(), LOCKED_SUPPLY - allocated);

    let totals = d.ledger.totals().unwrap();
    assert_eq!(totals.outstanding(), 0);
    assert_eq!(totals.releasable(), 0);
}

// =============================================================================
// Test: withdrawals pay only the delta between unlocks
// =============================================================================
#[test]
fn lifecycle_incremental_withdrawals() {
    let mut d = Deployment::new();
    let owner = d.owner;
    let alice = Address::derive("alice");
    d.ledger.add_team_member(owner, alice, 1_000 * ONE).unwrap();

    d.unlock_at(TS_2022_12_31);
    assert_eq!(d.ledger.withdraw_by_member(alice).unwrap().amount, 200 * ONE);
    assert!(matches!(
        d.ledger.withdraw_by_member(alice),
        Err(VestingError::NothingToWithdraw(_))
    ));

    d.unlock_at(TS_2023_06_30);
    assert_eq!(d.ledger.releasable(&alice).unwrap(), 300 * ONE);
    assert_eq!(d.ledger.withdraw_by_member(alice).unwrap().amount, 300 * ONE);

    d.unlock_at(TS_2023_12_31);
    let last = d.ledger.withdraw_by_member(alice).unwrap();
    assert_eq!(last.amount, 500 * ONE);
    assert_eq!(last.withdrawn_total, 1_000 * ONE);

    let amounts: Vec<u128> = d.ledger.receipts().iter().map(|r| r.amount).collect();
    assert_eq!(amounts, vec![200 * ONE, 300 * ONE, 500 * ONE]);
    assert!(d.ledger.member(&alice).unwrap().is_terminal());
}

// =============================================================================
// Test: clock snapshot is read at call time
// =============================================================================
#[test]
fn lifecycle_unlock_uses_current_clock() {
    let mut d = Deployment::new();
    let owner = d.owner;
    let bob = Address::derive("bob");
    d.ledger.add_pre_sale_member(owner, bob, 1_000).unwrap();

    let report = d.ledger.unlock_token(owner).unwrap();
    assert!(report.is_noop());
    assert_eq!(report.at, d.clock.now());

    d.clock.advance(31 * 86_400);
    let report = d.ledger.unlock_token(owner).unwrap();
    assert_eq!(report.members_advanced, 1);
    assert_eq!(report.newly_unlocked, 500);
    assert_eq!(d.unlocked(bob), 500);
}

// =============================================================================
// Test: ledger totals serialize for reporting
// =============================================================================
#[test]
fn lifecycle_totals_serialize() {
    let mut d = Deployment::new();
    let owner = d.owner;
    d.ledger
        .add_pre_sale_member(owner, Address::derive("carol"), 10)
        .unwrap();
    d.unlock_at(TS_2022_06_30);

    let json = serde_json::to_value(d.ledger.totals().unwrap()).unwrap();
    assert_eq!(json["allocated"], 10);
    assert_eq!(json["unlocked"], 5);
    assert_eq!(json["withdrawn"], 0);
}
