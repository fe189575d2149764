//! The Token Service boundary.
//!
//! The vesting core never stores token balances itself. It asks a
//! [`TokenService`] for its own balance and instructs it to move tokens.
//! Every method is atomic: it either applies fully or returns an error
//! with no balance changed.

use flanvest_types::{Address, Result, TokenMetadata};

/// An opaque fungible-token ledger.
pub trait TokenService {
    /// Name, symbol and decimals, fixed at deployment.
    fn metadata(&self) -> &TokenMetadata;

    /// The identity allowed to mint and burn.
    fn owner(&self) -> Address;

    /// Tokens in existence.
    fn total_supply(&self) -> u128;

    /// Tokens held by `account` (zero for unknown accounts).
    fn balance_of(&self, account: Address) -> u128;

    /// Move `amount` from `from` to `to`.
    ///
    /// # Errors
    /// Returns `InsufficientBalance` if `from` holds less than `amount`.
    fn transfer(&mut self, from: Address, to: Address, amount: u128) -> Result<()>;

    /// Create `amount` new tokens for `to`. Owner-only.
    ///
    /// # Errors
    /// Returns `NotTokenOwner` if `caller` is not the owner.
    fn mint(&mut self, caller: Address, to: Address, amount: u128) -> Result<()>;

    /// Destroy `amount` tokens held by `from`. Owner-only.
    ///
    /// # Errors
    /// Returns `NotTokenOwner` if `caller` is not the owner, or
    /// `InsufficientBalance` if `from` holds less than `amount`.
    fn burn(&mut self, caller: Address, from: Address, amount: u128) -> Result<()>;
}
