//! Unlock engine: the schedule state machine.
//!
//! An unlock pass evaluates every member's category schedule at one clock
//! snapshot and raises `unlocked_amount` to
//! `floor(total_allocation × cumulative_fraction(now))`. It never lowers a
//! counter, so repeated passes at the same time are no-ops and passes at
//! later times are monotone.
//!
//! A pass is all-or-nothing: every target is computed before any record
//! is touched.

use flanvest_types::{
    Category, MemberRecord, Result, ScheduleDefinition, Schedules, UnlockReport, VestingError,
};
use rust_decimal::Decimal;

use crate::clock;
use crate::registry::MembershipRegistry;

/// Applies per-category schedules to the registry.
#[derive(Debug, Clone)]
pub struct UnlockEngine {
    schedules: Schedules,
}

impl UnlockEngine {
    /// Create an engine over validated schedules.
    ///
    /// # Errors
    /// Returns `InvalidSchedule` if any category schedule is malformed.
    pub fn new(schedules: Schedules) -> Result<Self> {
        schedules.validate()?;
        Ok(Self { schedules })
    }

    #[must_use]
    pub fn schedules(&self) -> &Schedules {
        &self.schedules
    }

    #[must_use]
    pub fn schedule(&self, category: Category) -> &ScheduleDefinition {
        self.schedules.for_category(category)
    }

    /// Cumulative fraction unlocked for `category` at `at`.
    #[must_use]
    pub fn fraction(&self, category: Category, at: u64) -> Decimal {
        self.schedule(category).cumulative_fraction(at)
    }

    /// Schedule target for one record at `at`, ignoring what is already unlocked.
    pub fn target_for(&self, record: &MemberRecord, at: u64) -> Result<u128> {
        self.schedule(record.category)
            .vested_amount(record.total_allocation, at)
    }

    /// Run one unlock pass at clock snapshot `now`.
    ///
    /// # Errors
    /// - `NoMembers` if the registry is empty
    /// - `ArithmeticOverflow` if a target cannot be computed (no record changes)
    pub fn run(&self, registry: &mut MembershipRegistry, now: u64) -> Result<UnlockReport> {
        if registry.is_empty() {
            tracing::warn!(at = now, "Unlock requested with no members");
            return Err(VestingError::NoMembers);
        }

        let targets = registry
            .iter()
            .map(|record| -> Result<_> { Ok((record.address, self.target_for(record, now)?)) })
            .collect::<Result<Vec<_>>>()?;

        let mut report = UnlockReport {
            at: now,
            members_advanced: 0,
            newly_unlocked: 0,
        };
        for (address, target) in targets {
            let record = registry.get_mut(&address)?;
            let delta = record.raise_unlocked(target);
            if delta > 0 {
                report.members_advanced += 1;
                report.newly_unlocked = report.newly_unlocked.saturating_add(delta);
                tracing::debug!(
                    member = %address,
                    category = %record.category,
                    delta,
                    unlocked = record.unlocked_amount,
                    total = record.total_allocation,
                    "Member unlocked"
                );
            }
        }

        tracing::info!(
            at = now,
            at_utc = ?clock::to_datetime(now),
            treasury_fraction = %self.fraction(Category::Treasury, now),
            team_fraction = %self.fraction(Category::Team, now),
            pre_sale_fraction = %self.fraction(Category::PreSale, now),
            members = registry.len(),
            advanced = report.members_advanced,
            newly_unlocked = report.newly_unlocked,
            "Unlock pass complete"
        );
        Ok(report)
    }
}
