//! # arc4-primitives
//!
//! Primitive types used by the ARC4 codec.
//!
//! This crate provides the account address type, the 32-byte digest type
//! and the wide unsigned integer that every ARC4 integer collapses to.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod address;
mod hash;

pub use address::{Address, AddressError};
pub use hash::{sha512_256, H256};

// Re-export primitive-types for U512
pub use primitive_types::U512;
