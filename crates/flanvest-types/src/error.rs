//! Error types for the FlanVest vesting ledger.
//!
//! All errors use the `VS_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Access control errors
//! - 2xx: Membership registry errors
//! - 3xx: Unlock / schedule errors
//! - 4xx: Withdrawal errors
//! - 5xx: Token service errors
//! - 8xx: Invariant violations
//! - 9xx: General / internal errors

use thiserror::Error;

use crate::{Address, Category};

/// Central error enum for all FlanVest operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VestingError {
    // =================================================================
    // Access Control Errors (1xx)
    // =================================================================
    /// The caller lacks the role the operation requires.
    #[error("VS_ERR_100: Unauthorized: {caller} is not {required}")]
    Unauthorized { caller: Address, required: Role },

    /// The identity is already in the admin set.
    #[error("VS_ERR_101: Already an admin: {0}")]
    AlreadyAdmin(Address),

    /// The identity is not in the admin set.
    #[error("VS_ERR_102: Not an admin: {0}")]
    NotAdmin(Address),

    // =================================================================
    // Membership Registry Errors (2xx)
    // =================================================================
    /// Allocations must be strictly positive.
    #[error("VS_ERR_200: Invalid amount: {amount} (must be > 0)")]
    InvalidAmount { amount: u128 },

    /// A record for this address already exists.
    #[error("VS_ERR_201: Member already registered: {0}")]
    DuplicateMember(Address),

    /// No record exists for this address.
    #[error("VS_ERR_202: Member not found: {0}")]
    MemberNotFound(Address),

    /// Adding the allocation would push the allocated total above the pool.
    #[error(
        "VS_ERR_203: Allocation exceeds pool: requested {requested}, \
         already allocated {allocated}, pool holds {pool}"
    )]
    AllocationExceedsPool {
        requested: u128,
        allocated: u128,
        pool: u128,
    },

    /// The address cannot hold an allocation (the ledger's own account).
    #[error("VS_ERR_204: Address cannot be a member: {0}")]
    InvalidMember(Address),

    // =================================================================
    // Unlock / Schedule Errors (3xx)
    // =================================================================
    /// An unlock pass was requested against an empty registry.
    #[error("VS_ERR_300: No members registered")]
    NoMembers,

    /// A schedule definition failed validation.
    #[error("VS_ERR_301: Invalid {category} schedule: {reason}")]
    InvalidSchedule { category: Category, reason: String },

    // =================================================================
    // Withdrawal Errors (4xx)
    // =================================================================
    /// The member has no unlocked balance left to withdraw.
    #[error("VS_ERR_400: Nothing to withdraw for {0}")]
    NothingToWithdraw(Address),

    /// The token service refused the payout transfer.
    #[error("VS_ERR_401: Transfer of {amount} to {to} failed: {reason}")]
    TransferFailed {
        to: Address,
        amount: u128,
        reason: String,
    },

    // =================================================================
    // Token Service Errors (5xx)
    // =================================================================
    /// Not enough tokens held by the source account.
    #[error("VS_ERR_500: Insufficient token balance: need {needed}, have {available}")]
    InsufficientBalance { needed: u128, available: u128 },

    /// Mint and burn are restricted to the token owner.
    #[error("VS_ERR_501: Caller {0} is not the token owner")]
    NotTokenOwner(Address),

    // =================================================================
    // Invariant Violations (8xx)
    // =================================================================
    /// Outstanding obligations are no longer covered by the pool.
    #[error("VS_ERR_800: Solvency violation: outstanding {outstanding} > pool {pool}")]
    SolvencyViolation { outstanding: u128, pool: u128 },

    /// A member record broke `withdrawn <= unlocked <= total`.
    #[error("VS_ERR_801: Invariant violation for {member}: {reason}")]
    InvariantViolation { member: Address, reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Checked arithmetic overflowed.
    #[error("VS_ERR_900: Arithmetic overflow in {0}")]
    ArithmeticOverflow(&'static str),

    /// Configuration error (invalid config file, bad schedule, etc.).
    #[error("VS_ERR_901: Configuration error: {0}")]
    Configuration(String),

    /// Serialization / deserialization error.
    #[error("VS_ERR_902: Serialization error: {0}")]
    Serialization(String),

    /// A textual address could not be parsed.
    #[error("VS_ERR_903: Invalid address: {0}")]
    InvalidAddress(String),
}

/// The role an operation requires of its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// The deployment owner.
    Owner,
    /// A member of the admin set.
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Owner => write!(f, "OWNER"),
            Self::Admin => write!(f, "ADMIN"),
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, VestingError>;

impl From<serde_json::Error> for VestingError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
