//! Codec error types

use arc4_primitives::AddressError;
use thiserror::Error;

/// ARC4 codec errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Arc4Error {
    /// Numeric value does not fit the declared type
    #[error("{value} is out of range for {type_name}")]
    Range {
        /// ARC4 name of the target type
        type_name: String,
        /// Offending value
        value: String,
    },

    /// Value type does not match the expected type
    #[error("type mismatch: expected {expected}, got {got}")]
    TypeMismatch {
        /// Expected ARC4 type name
        expected: String,
        /// Actual ARC4 type name
        got: String,
    },

    /// Bytes do not decode cleanly for the declared type
    #[error("malformed encoding: {0}")]
    MalformedEncoding(String),

    /// Encoded size or an offset exceeds what the format allows
    #[error("size limit exceeded: {0}")]
    SizeLimit(String),

    /// Invalid native value (bad decimal literal, conflicting arguments)
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// Invalid ARC4 type string or type parameters
    #[error("invalid type: {0}")]
    InvalidType(String),

    /// Index outside the container
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds {
        /// Requested index (may be negative)
        index: isize,
        /// Container length
        len: usize,
    },

    /// Pop from an empty dynamic array
    #[error("pop from empty array")]
    EmptyArray,

    /// Mutation of a frozen struct
    #[error("{0} is immutable")]
    Immutable(String),

    /// Struct has no such field
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// Invalid address
    #[error("address error: {0}")]
    Address(#[from] AddressError),
}

/// Codec result type
pub type Arc4Result<T> = Result<T, Arc4Error>;

impl Arc4Error {
    pub(crate) fn range(type_name: impl Into<String>, value: impl ToString) -> Self {
        Arc4Error::Range {
            type_name: type_name.into(),
            value: value.to_string(),
        }
    }

    pub(crate) fn mismatch(expected: impl Into<String>, got: impl Into<String>) -> Self {
        Arc4Error::TypeMismatch {
            expected: expected.into(),
            got: got.into(),
        }
    }

    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Arc4Error::MalformedEncoding(msg.into())
    }
}
