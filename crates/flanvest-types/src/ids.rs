//! Identifiers used throughout FlanVest.
//!
//! Participants (owner, admins, members, the ledger itself) are identified
//! by a 20-byte [`Address`]. Withdrawal receipts use UUIDv7 so the audit
//! trail sorts by issue time.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::VestingError;

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// Opaque 160-bit account identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The all-zero address.
    pub const ZERO: Self = Self([0u8; 20]);

    #[must_use]
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Deterministic address derived from a label.
    ///
    /// The same label always yields the same address, which keeps fixtures
    /// and logs stable across runs.
    #[must_use]
    pub fn derive(label: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"flanvest:address:v1:");
        hasher.update(label.as_bytes());
        let hash = hasher.finalize();
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&hash[..20]);
        Self(bytes)
    }

    /// First four bytes in hex, for compact log fields.
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl Address {
    /// A fresh random address.
    pub fn random() -> Self {
        use rand::RngCore;
        let mut bytes = [0u8; 20];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = VestingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let raw = hex::decode(digits).map_err(|_| VestingError::InvalidAddress(s.to_string()))?;
        let bytes: [u8; 20] = raw
            .try_into()
            .map_err(|_| VestingError::InvalidAddress(s.to_string()))?;
        Ok(Self(bytes))
    }
}

// ---------------------------------------------------------------------------
// ReceiptId
// ---------------------------------------------------------------------------

/// Unique identifier for a withdrawal receipt. Uses UUIDv7 for time-ordered sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ReceiptId(pub Uuid);

impl ReceiptId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for ReceiptId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReceiptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rcpt:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_is_deterministic() {
        let a = Address::derive("treasury");
        let b = Address::derive("treasury");
        assert_eq!(a, b);
        assert_ne!(a, Address::derive("team"));
    }

    #[test]
    fn display_is_prefixed_hex() {
        let addr = Address::from_bytes([0xab; 20]);
        let text = addr.to_string();
        assert_eq!(text.len(), 42);
        assert!(text.starts_with("0xabab"));
        assert_eq!(addr.short(), "abababab");
    }

    #[test]
    fn parse_accepts_display_output() {
        let addr = Address::derive("alice");
        let parsed: Address = addr.to_string().parse().unwrap();
        assert_eq!(parsed, addr);
        let bare: Address = hex::encode(addr.as_bytes()).parse().unwrap();
        assert_eq!(bare, addr);
    }

    #[test]
    fn parse_rejects_wrong_length_and_garbage() {
        assert!(matches!(
            "0x1234".parse::<Address>(),
            Err(VestingError::InvalidAddress(_))
        ));
        assert!(matches!(
            "0xzz".parse::<Address>(),
            Err(VestingError::InvalidAddress(_))
        ));
    }

    #[test]
    fn random_addresses_differ() {
        assert_ne!(Address::random(), Address::random());
    }

    #[test]
    fn receipt_id_ordering() {
        let a = ReceiptId::new();
        let b = ReceiptId::new();
        assert!(a < b);
        assert!(a.to_string().starts_with("rcpt:"));
    }

    #[test]
    fn serde_roundtrips() {
        let addr = Address::derive("bob");
        let json = serde_json::to_string(&addr).unwrap();
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(addr, back);

        let rid = ReceiptId::new();
        let json = serde_json::to_string(&rid).unwrap();
        let back: ReceiptId = serde_json::from_str(&json).unwrap();
        assert_eq!(rid, back);
    }
}
