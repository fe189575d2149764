//! System-wide constants for the FlanVest vesting ledger.

/// Default token decimals (base units per whole token = 10^18).
pub const DEFAULT_DECIMALS: u8 = 18;

/// Maximum fractional digits allowed in a tranche's cumulative fraction.
///
/// Keeps `floor(total × fraction)` exact in `u128`: the remainder term is
/// bounded by `10^18 × 10^18 < u128::MAX`.
pub const MAX_FRACTION_SCALE: u32 = 18;

/// Maximum number of tranches in one category schedule.
pub const MAX_TRANCHES: usize = 64;

/// Name of the reference vesting token.
pub const REFERENCE_TOKEN_NAME: &str = "Flan Token";

/// Symbol of the reference vesting token.
pub const REFERENCE_TOKEN_SYMBOL: &str = "FLAN";

/// 2022-06-30T00:00:00Z
pub const TS_2022_06_30: u64 = 1_656_547_200;

/// 2022-12-31T00:00:00Z
pub const TS_2022_12_31: u64 = 1_672_444_800;

/// 2023-06-30T00:00:00Z
pub const TS_2023_06_30: u64 = 1_688_083_200;

/// 2023-12-31T00:00:00Z
pub const TS_2023_12_31: u64 = 1_703_980_800;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "FlanVest";

/// One whole token in base units for a token with `decimals` decimals.
#[must_use]
pub const fn one_token(decimals: u8) -> u128 {
    10u128.pow(decimals as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_timestamps_are_ordered() {
        assert!(TS_2022_06_30 < TS_2022_12_31);
        assert!(TS_2022_12_31 < TS_2023_06_30);
        assert!(TS_2023_06_30 < TS_2023_12_31);
    }

    #[test]
    fn one_token_scales_with_decimals() {
        assert_eq!(one_token(0), 1);
        assert_eq!(one_token(6), 1_000_000);
        assert_eq!(one_token(DEFAULT_DECIMALS), 1_000_000_000_000_000_000);
    }
}
