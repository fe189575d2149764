//! Per-category unlock schedules.
//!
//! A schedule is an ordered list of [`Tranche`]s. Each tranche says "from
//! this Unix timestamp on, this cumulative fraction of the allocation is
//! unlocked". Before the first tranche (the cliff) nothing is unlocked;
//! after the last tranche everything is.
//!
//! Fractions are exact decimals, never floats. The unlocked amount is
//! `floor(total × fraction)` computed in `u128`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Category, Result, VestingError, constants};

/// One step of a vesting schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tranche {
    /// Unix seconds at which this tranche becomes effective (inclusive).
    pub unlock_timestamp: u64,
    /// Fraction of the allocation unlocked once this tranche has elapsed.
    pub cumulative_fraction: Decimal,
}

impl Tranche {
    #[must_use]
    pub fn new(unlock_timestamp: u64, cumulative_fraction: Decimal) -> Self {
        Self {
            unlock_timestamp,
            cumulative_fraction,
        }
    }
}

/// Ordered tranches for one category.
///
/// Invariants (checked by [`ScheduleDefinition::validate`]):
/// - at least one and at most [`constants::MAX_TRANCHES`] tranches
/// - timestamps strictly increasing
/// - fractions strictly increasing, each in `(0, 1]`
/// - final fraction exactly `1`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDefinition {
    pub tranches: Vec<Tranche>,
}

impl ScheduleDefinition {
    /// Build and validate a schedule.
    ///
    /// # Errors
    /// Returns [`VestingError::InvalidSchedule`] if any invariant fails.
    pub fn new(category: Category, tranches: Vec<Tranche>) -> Result<Self> {
        let schedule = Self { tranches };
        schedule.validate(category)?;
        Ok(schedule)
    }

    /// Check the schedule invariants.
    ///
    /// # Errors
    /// Returns [`VestingError::InvalidSchedule`] naming the first failure.
    pub fn validate(&self, category: Category) -> Result<()> {
        let invalid = |reason: String| VestingError::InvalidSchedule { category, reason };

        if self.tranches.is_empty() {
            return Err(invalid("no tranches".into()));
        }
        if self.tranches.len() > constants::MAX_TRANCHES {
            return Err(invalid(format!(
                "{} tranches exceeds maximum {}",
                self.tranches.len(),
                constants::MAX_TRANCHES
            )));
        }

        let mut prev: Option<&Tranche> = None;
        for (i, tranche) in self.tranches.iter().enumerate() {
            let fraction = tranche.cumulative_fraction;
            if fraction <= Decimal::ZERO || fraction > Decimal::ONE {
                return Err(invalid(format!(
                    "tranche {i}: fraction {fraction} outside (0, 1]"
                )));
            }
            if fraction.normalize().scale() > constants::MAX_FRACTION_SCALE {
                return Err(invalid(format!(
                    "tranche {i}: fraction {fraction} has more than {} decimal places",
                    constants::MAX_FRACTION_SCALE
                )));
            }
            if let Some(p) = prev {
                if tranche.unlock_timestamp <= p.unlock_timestamp {
                    return Err(invalid(format!(
                        "tranche {i}: timestamp {} not after {}",
                        tranche.unlock_timestamp, p.unlock_timestamp
                    )));
                }
                if fraction <= p.cumulative_fraction {
                    return Err(invalid(format!(
                        "tranche {i}: fraction {fraction} not above {}",
                        p.cumulative_fraction
                    )));
                }
            }
            prev = Some(tranche);
        }

        if let Some(last) = self.tranches.last() {
            if last.cumulative_fraction != Decimal::ONE {
                return Err(invalid(format!(
                    "final fraction is {}, expected 1",
                    last.cumulative_fraction
                )));
            }
        }
        Ok(())
    }

    /// Cumulative fraction unlocked at `at`: the fraction of the greatest
    /// tranche whose timestamp is `<= at`, or zero before the cliff.
    #[must_use]
    pub fn cumulative_fraction(&self, at: u64) -> Decimal {
        self.tranches
            .iter()
            .take_while(|t| t.unlock_timestamp <= at)
            .last()
            .map_or(Decimal::ZERO, |t| t.cumulative_fraction)
    }

    /// Amount of `total_allocation` unlocked at `at` (rounded down).
    pub fn vested_amount(&self, total_allocation: u128, at: u64) -> Result<u128> {
        mul_floor(total_allocation, self.cumulative_fraction(at))
    }

    /// The first tranche strictly after `at`, if any remain.
    #[must_use]
    pub fn next_unlock(&self, at: u64) -> Option<&Tranche> {
        self.tranches.iter().find(|t| t.unlock_timestamp > at)
    }

    /// Timestamp of the first tranche.
    #[must_use]
    pub fn cliff(&self) -> Option<u64> {
        self.tranches.first().map(|t| t.unlock_timestamp)
    }

    /// Timestamp from which the whole allocation is unlocked.
    #[must_use]
    pub fn fully_vested_at(&self) -> Option<u64> {
        self.tranches.last().map(|t| t.unlock_timestamp)
    }
}

/// `floor(amount × fraction)` without leaving integer arithmetic.
///
/// Splits `amount = whole × 10^scale + rem` so that neither partial
/// product can overflow for fractions in `[0, 1]`.
///
/// # Errors
/// Returns [`VestingError::ArithmeticOverflow`] for negative fractions,
/// scales above [`constants::MAX_FRACTION_SCALE`], or overflowing products.
pub fn mul_floor(amount: u128, fraction: Decimal) -> Result<u128> {
    if fraction.is_sign_negative() && !fraction.is_zero() {
        return Err(VestingError::ArithmeticOverflow("negative fraction"));
    }
    let fraction = fraction.normalize();
    let scale = fraction.scale();
    if scale > constants::MAX_FRACTION_SCALE {
        return Err(VestingError::ArithmeticOverflow("fraction scale"));
    }
    let mantissa = u128::try_from(fraction.mantissa())
        .map_err(|_| VestingError::ArithmeticOverflow("fraction mantissa"))?;
    let denom = 10u128.pow(scale);

    let whole = amount / denom;
    let rem = amount % denom;
    let high = whole
        .checked_mul(mantissa)
        .ok_or(VestingError::ArithmeticOverflow("vested amount"))?;
    let low = rem
        .checked_mul(mantissa)
        .ok_or(VestingError::ArithmeticOverflow("vested amount"))?
        / denom;
    high.checked_add(low)
        .ok_or(VestingError::ArithmeticOverflow("vested amount"))
}

/// One schedule per category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedules {
    pub treasury: ScheduleDefinition,
    pub team: ScheduleDefinition,
    pub pre_sale: ScheduleDefinition,
}

impl Schedules {
    /// The schedule governing `category`.
    #[must_use]
    pub fn for_category(&self, category: Category) -> &ScheduleDefinition {
        match category {
            Category::Treasury => &self.treasury,
            Category::Team => &self.team,
            Category::PreSale => &self.pre_sale,
        }
    }

    /// Validate all three schedules.
    pub fn validate(&self) -> Result<()> {
        for category in Category::ALL {
            self.for_category(category).validate(category)?;
        }
        Ok(())
    }

    /// Schedules of the reference deployment.
    ///
    /// - Treasury: 25% per half-year from 2022-06-30 to 2023-12-31.
    /// - Team: nothing until 2022-12-31 (20%), 50% at 2023-06-30, rest at 2023-12-31.
    /// - PreSale: half at 2022-06-30, rest at 2022-12-31.
    #[must_use]
    pub fn flan_reference() -> Self {
        use constants::{TS_2022_06_30, TS_2022_12_31, TS_2023_06_30, TS_2023_12_31};
        Self {
            treasury: ScheduleDefinition {
                tranches: vec![
                    Tranche::new(TS_2022_06_30, Decimal::new(25, 2)),
                    Tranche::new(TS_2022_12_31, Decimal::new(50, 2)),
                    Tranche::new(TS_2023_06_30, Decimal::new(75, 2)),
                    Tranche::new(TS_2023_12_31, Decimal::ONE),
                ],
            },
            team: ScheduleDefinition {
                tranches: vec![
                    Tranche::new(TS_2022_12_31, Decimal::new(20, 2)),
                    Tranche::new(TS_2023_06_30, Decimal::new(50, 2)),
                    Tranche::new(TS_2023_12_31, Decimal::ONE),
                ],
            },
            pre_sale: ScheduleDefinition {
                tranches: vec![
                    Tranche::new(TS_2022_06_30, Decimal::new(50, 2)),
                    Tranche::new(TS_2022_12_31, Decimal::ONE),
                ],
            },
        }
    }
}
