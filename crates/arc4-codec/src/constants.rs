//! Wire-format constants

/// Maximum encoded size of any single value
pub const MAX_BYTES_SIZE: usize = 4096;

/// Largest element count of any array, bounded by the 2-byte length prefix
pub const MAX_ARRAY_LENGTH: usize = u16::MAX as usize;

/// Size of a length prefix or a head offset
pub const LENGTH_PREFIX_SIZE: usize = 2;

/// Encoded `true`
pub const BOOL_TRUE_BYTE: u8 = 0x80;

/// Encoded `false`
pub const BOOL_FALSE_BYTE: u8 = 0x00;

/// Number of booleans packed into one byte
pub const BOOLS_PER_BYTE: usize = 8;

/// Largest integer width in bits
pub const MAX_BIT_SIZE: u16 = 512;

/// Largest fixed-point precision
pub const MAX_PRECISION: u8 = 160;

/// Size of an address in bytes
pub const ADDRESS_LENGTH: usize = 32;

/// Size of a method selector in bytes
pub const SELECTOR_LENGTH: usize = 4;
