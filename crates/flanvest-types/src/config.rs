//! Configuration types for a FlanVest deployment.

use serde::{Deserialize, Serialize};

use crate::{Result, Schedules, VestingError, constants};

/// Fixed-at-deployment token metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl TokenMetadata {
    #[must_use]
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals,
        }
    }

    /// Metadata of the reference vesting token.
    #[must_use]
    pub fn flan() -> Self {
        Self::new(
            constants::REFERENCE_TOKEN_NAME,
            constants::REFERENCE_TOKEN_SYMBOL,
            constants::DEFAULT_DECIMALS,
        )
    }

    /// One whole token in base units.
    #[must_use]
    pub fn one_token(&self) -> u128 {
        constants::one_token(self.decimals)
    }
}

/// Configuration for a vesting ledger deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingConfig {
    /// Metadata of the token being vested.
    pub token: TokenMetadata,
    /// Unlock schedules, one per member category.
    pub schedules: Schedules,
}

impl VestingConfig {
    /// The reference deployment: FLAN token, half-yearly tranches through 2023.
    #[must_use]
    pub fn flan_reference() -> Self {
        Self {
            token: TokenMetadata::flan(),
            schedules: Schedules::flan_reference(),
        }
    }

    /// Parse and validate a JSON configuration.
    ///
    /// # Errors
    /// Returns [`VestingError::Serialization`] for malformed JSON, or the
    /// validation error for a well-formed but invalid config.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check token metadata and every schedule.
    pub fn validate(&self) -> Result<()> {
        if self.token.name.trim().is_empty() || self.token.symbol.trim().is_empty() {
            return Err(VestingError::Configuration(
                "token name and symbol must be non-empty".into(),
            ));
        }
        // 10^38 is the largest power of ten below u128::MAX.
        if self.token.decimals > 38 {
            return Err(VestingError::Configuration(format!(
                "token decimals {} exceeds 38",
                self.token.decimals
            )));
        }
        self.schedules.validate()
    }
}
