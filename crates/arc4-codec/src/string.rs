//! Length-prefixed UTF-8 text

use std::fmt;

use tracing::debug;

use crate::error::{Arc4Error, Arc4Result};
use crate::types::TypeDescriptor;
use crate::value::{decode_string, encode_string, impl_arc4_type, Arc4Type, Arc4Value};

/// An ARC4 `string`: 2-byte byte count followed by the UTF-8 bytes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Arc4String {
    value: Arc4Value,
}

impl Arc4String {
    /// Encode `text`
    pub fn new(text: &str) -> Arc4Result<Self> {
        let bytes = encode_string(text)?;
        Ok(Self {
            value: Arc4Value::encoded(TypeDescriptor::String, bytes)?,
        })
    }

    /// Wrap pre-encoded bytes without validating them
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            value: Arc4Value::from_bytes(TypeDescriptor::String, bytes),
        }
    }

    /// Decoded text
    pub fn native(&self) -> Arc4Result<String> {
        decode_string(self.value.bytes())
    }

    /// Encoded length of the text in bytes (not characters)
    pub fn byte_len(&self) -> Arc4Result<usize> {
        Ok(self.native()?.len())
    }

    /// New string holding `self` followed by `other`
    pub fn concat(&self, other: &Arc4String) -> Arc4Result<Self> {
        let mut text = self.native()?;
        text.push_str(&other.native()?);
        debug!(len = text.len(), "concat string");
        Self::new(&text)
    }
}

impl_arc4_type!(Arc4String);

impl TryFrom<Arc4Value> for Arc4String {
    type Error = Arc4Error;

    fn try_from(value: Arc4Value) -> Result<Self, Self::Error> {
        value.expect_type(&TypeDescriptor::String)?;
        Ok(Self { value })
    }
}

impl PartialEq<str> for Arc4String {
    fn eq(&self, other: &str) -> bool {
        self.native().map(|s| s == other).unwrap_or(false)
    }
}

impl PartialEq<&str> for Arc4String {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl fmt::Display for Arc4String {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.native() {
            Ok(s) => f.write_str(&s),
            Err(_) => write!(f, "0x{}", hex::encode(self.bytes())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MAX_BYTES_SIZE;

    #[test]
    fn test_string_encoding() {
        let s = Arc4String::new("hello").unwrap();
        assert_eq!(s.bytes(), &[0x00, 0x05, b'h', b'e', b'l', b'l', b'o']);
        assert_eq!(s, "hello");
        assert_eq!(Arc4String::new("").unwrap().bytes(), &[0x00, 0x00]);
    }

    #[test]
    fn test_length_counts_bytes() {
        let s = Arc4String::new("é").unwrap();
        assert_eq!(s.bytes()[..2], [0x00, 0x02]);
        assert_eq!(s.byte_len().unwrap(), 2);
        assert_eq!(s.native().unwrap().chars().count(), 1);
    }

    #[test]
    fn test_concat() {
        let a = Arc4String::new("foo").unwrap();
        let b = Arc4String::new("bar").unwrap();
        assert_eq!(a.concat(&b).unwrap(), "foobar");
    }

    #[test]
    fn test_size_limit() {
        let text = "x".repeat(MAX_BYTES_SIZE - 2);
        assert!(Arc4String::new(&text).is_ok());
        let text = "x".repeat(MAX_BYTES_SIZE - 1);
        assert!(matches!(Arc4String::new(&text), Err(Arc4Error::SizeLimit(_))));
    }

    #[test]
    fn test_malformed_from_bytes() {
        let s = Arc4String::from_bytes(vec![0x00, 0x03, b'a']);
        assert!(matches!(s.native(), Err(Arc4Error::MalformedEncoding(_))));
        assert_eq!(s.to_string(), "0x000361");
        assert_ne!(s, "a");
    }
}
