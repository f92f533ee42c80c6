//! # arc4-codec
//!
//! ARC4 ABI encoding and decoding for the Algorand VM ecosystem.
//!
//! ## Features
//!
//! - **TypeDescriptor**: ARC4 type model and type-string parser
//! - **encode / decode**: native values to canonical bytes and back
//! - **Typed values**: `UInt`, `Bool`, `UFixed`, `Arc4String`, `Arc4Address`,
//!   `StaticArray`, `DynamicArray`, `DynamicBytes`, `Tuple`, `Struct`
//! - **Handles**: write-back access to elements of nested containers
//! - **Selectors**: method signatures and 4-byte selectors
//!
//! ## Example
//!
//! ```rust
//! use arc4_codec::{decode, encode, Arc4Type, DynamicArray, Native, TypeDescriptor, UInt};
//!
//! let mut arr = DynamicArray::empty(TypeDescriptor::uint64());
//! arr.append(UInt::uint64(42).into())?;
//! assert_eq!(arr.bytes(), &[0, 1, 0, 0, 0, 0, 0, 0, 0, 42]);
//!
//! let ty: TypeDescriptor = "(uint64,string)".parse()?;
//! let value = Native::Tuple(vec![1u64.into(), "ab".into()]);
//! let bytes = encode(&ty, &value)?;
//! assert_eq!(decode(&ty, &bytes)?, value);
//! # Ok::<(), arc4_codec::Arc4Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod constants;
mod error;
pub mod layout;
mod scalar;
mod types;
mod value;

mod array;
mod handle;
mod selector;
mod string;
mod tuple;
mod uint;

pub use array::{Arc4Address, DynamicArray, DynamicBytes, StaticArray};
pub use error::{Arc4Error, Arc4Result};
pub use handle::{ElementHandle, FieldHandle, Handle, WriteBack};
pub use layout::static_size;
pub use selector::{method_selector, method_signature};
pub use string::Arc4String;
pub use tuple::{Struct, Tuple};
pub use types::{StructType, TypeDescriptor};
pub use uint::{Bool, UFixed, UInt};
pub use value::{decode, encode, Arc4Type, Arc4Value, Native};

// Re-export the primitives that appear in the public API
pub use arc4_primitives::{Address, U512};
