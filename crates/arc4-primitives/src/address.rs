//! Account address type (32-byte public key)

use crate::hash::{sha512_256, H256};
use base32::Alphabet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Base32 alphabet used for the textual address form
const ALPHABET: Alphabet = Alphabet::Rfc4648 { padding: false };

/// Address parsing error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// Invalid length
    #[error("invalid address length: expected 32 bytes, got {0}")]
    InvalidLength(usize),
    /// Textual form has the wrong number of characters
    #[error("invalid address string length: expected 58 characters, got {0}")]
    InvalidStringLength(usize),
    /// Not a base32 string
    #[error("invalid base32 encoding: {0}")]
    InvalidEncoding(String),
    /// Checksum does not match the public key
    #[error("invalid address checksum: {0}")]
    InvalidChecksum(String),
}

/// 32-byte account address
///
/// The canonical text form is the 58-character base32 string of the
/// public key followed by the last 4 bytes of its SHA-512/256 digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Address([u8; 32]);

impl Address {
    /// Size of address in bytes
    pub const LEN: usize = 32;

    /// Size of the checksum appended to the textual form
    pub const CHECKSUM_LEN: usize = 4;

    /// Number of characters in the textual form
    pub const STRING_LEN: usize = 58;

    /// Zero address
    pub const ZERO: Address = Address([0u8; 32]);

    /// Create address from bytes
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Address(bytes)
    }

    /// Create address from slice
    pub fn from_slice(slice: &[u8]) -> Result<Self, AddressError> {
        if slice.len() != Self::LEN {
            return Err(AddressError::InvalidLength(slice.len()));
        }
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(slice);
        Ok(Address(bytes))
    }

    /// Parse the 58-character checksummed form
    pub fn from_str_checked(s: &str) -> Result<Self, AddressError> {
        if s.len() != Self::STRING_LEN {
            return Err(AddressError::InvalidStringLength(s.len()));
        }
        let decoded = base32::decode(ALPHABET, s)
            .ok_or_else(|| AddressError::InvalidEncoding(s.to_string()))?;
        if decoded.len() != Self::LEN + Self::CHECKSUM_LEN {
            return Err(AddressError::InvalidEncoding(s.to_string()));
        }
        let (key, checksum) = decoded.split_at(Self::LEN);
        let address = Self::from_slice(key)?;
        if checksum != address.checksum() {
            return Err(AddressError::InvalidChecksum(s.to_string()));
        }
        Ok(address)
    }

    /// Get as byte slice
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Check if this is the zero address
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Last 4 bytes of the SHA-512/256 digest of the public key
    pub fn checksum(&self) -> [u8; 4] {
        let digest = sha512_256(&self.0);
        let mut checksum = [0u8; 4];
        checksum.copy_from_slice(&digest.as_bytes()[H256::LEN - Self::CHECKSUM_LEN..]);
        checksum
    }

    /// Convert to the 58-character checksummed string
    pub fn to_checksummed(&self) -> String {
        let mut data = Vec::with_capacity(Self::LEN + Self::CHECKSUM_LEN);
        data.extend_from_slice(&self.0);
        data.extend_from_slice(&self.checksum());
        base32::encode(ALPHABET, &data)
    }

    /// Convert to hex string with 0x prefix
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_checksummed())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_checksummed())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_checked(s)
    }
}

impl From<[u8; 32]> for Address {
    fn from(bytes: [u8; 32]) -> Self {
        Address(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// Serde implementation (behind feature flag)
#[cfg(feature = "serde")]
mod serde_impl {
    use super::*;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for Address {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(&self.to_checksummed())
        }
    }

    impl<'de> Deserialize<'de> for Address {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let s = String::deserialize(deserializer)?;
            Address::from_str_checked(&s).map_err(de::Error::custom)
        }
    }
}
