//! Scalar value wrappers: `uint<N>`, `byte`, `bool` and `ufixed<N>x<M>`

use std::cmp::Ordering;
use std::fmt;

use arc4_primitives::U512;

use crate::error::{Arc4Error, Arc4Result};
use crate::scalar::{decode_bool, decode_uint, encode_bool, encode_uint, format_ufixed, parse_ufixed};
use crate::types::TypeDescriptor;
use crate::value::{impl_arc4_type, Arc4Type, Arc4Value};

/// An unsigned integer of `bit_size` bits, or a `byte`
///
/// `==` compares type and encoding, so `uint64(5) != uint8(5)`.
/// There is no `PartialOrd` between two `UInt`s: an ordering that calls
/// `uint64(5)` and `uint8(5)` equal would disagree with `==`. Compare
/// values of different widths with [`numeric_cmp`](Self::numeric_cmp) and
/// [`numeric_eq`](Self::numeric_eq), or compare against a host integer
/// (`u64` or `U512`) directly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UInt {
    bit_size: u16,
    value: Arc4Value,
}

impl UInt {
    /// `uint<bit_size>` holding `value`
    pub fn new(bit_size: u16, value: impl Into<U512>) -> Arc4Result<Self> {
        let ty = TypeDescriptor::uint(bit_size)?;
        let bytes = encode_uint(&value.into(), bit_size, &ty.arc4_name())?;
        Ok(Self {
            bit_size,
            value: Arc4Value::from_bytes(ty, bytes),
        })
    }

    fn from_be(ty: TypeDescriptor, bit_size: u16, bytes: &[u8]) -> Self {
        Self {
            bit_size,
            value: Arc4Value::from_bytes(ty, bytes),
        }
    }

    /// `uint8`
    pub fn uint8(value: u8) -> Self {
        Self::from_be(TypeDescriptor::uint8(), 8, &[value])
    }

    /// `uint16`
    pub fn uint16(value: u16) -> Self {
        Self::from_be(TypeDescriptor::uint16(), 16, &value.to_be_bytes())
    }

    /// `uint32`
    pub fn uint32(value: u32) -> Self {
        Self::from_be(TypeDescriptor::uint32(), 32, &value.to_be_bytes())
    }

    /// `uint64`
    pub fn uint64(value: u64) -> Self {
        Self::from_be(TypeDescriptor::uint64(), 64, &value.to_be_bytes())
    }

    /// `byte`
    pub fn byte(value: u8) -> Self {
        Self::from_be(TypeDescriptor::Byte, 8, &[value])
    }

    /// Wrap pre-encoded bytes without validating them
    pub fn from_bytes(bit_size: u16, bytes: impl Into<Vec<u8>>) -> Arc4Result<Self> {
        let ty = TypeDescriptor::uint(bit_size)?;
        Ok(Self {
            bit_size,
            value: Arc4Value::from_bytes(ty, bytes),
        })
    }

    /// Width in bits
    pub fn bit_size(&self) -> u16 {
        self.bit_size
    }

    /// Decoded integer
    pub fn native(&self) -> Arc4Result<U512> {
        decode_uint(self.value.bytes(), self.bit_size)
    }

    /// Decoded integer as `u64`; fails with a range error when it does not fit
    pub fn as_u64(&self) -> Arc4Result<u64> {
        let value = self.native()?;
        if value > U512::from(u64::MAX) {
            return Err(Arc4Error::range("u64", value));
        }
        Ok(value.low_u64())
    }

    /// Compare numeric values regardless of width
    pub fn numeric_cmp(&self, other: &UInt) -> Arc4Result<Ordering> {
        Ok(self.native()?.cmp(&other.native()?))
    }

    /// Whether both hold the same number regardless of width
    pub fn numeric_eq(&self, other: &UInt) -> Arc4Result<bool> {
        Ok(self.numeric_cmp(other)? == Ordering::Equal)
    }
}

impl_arc4_type!(UInt);

impl TryFrom<Arc4Value> for UInt {
    type Error = Arc4Error;

    fn try_from(value: Arc4Value) -> Result<Self, Self::Error> {
        let bit_size = match value.type_descriptor() {
            TypeDescriptor::UInt { bit_size } => *bit_size,
            TypeDescriptor::Byte => 8,
            other => return Err(Arc4Error::mismatch("uint", other.arc4_name())),
        };
        Ok(Self { bit_size, value })
    }
}

impl PartialEq<u64> for UInt {
    fn eq(&self, other: &u64) -> bool {
        self.native()
            .map(|v| v == U512::from(*other))
            .unwrap_or(false)
    }
}

impl PartialOrd<u64> for UInt {
    fn partial_cmp(&self, other: &u64) -> Option<Ordering> {
        self.native().ok().map(|v| v.cmp(&U512::from(*other)))
    }
}

impl PartialEq<U512> for UInt {
    fn eq(&self, other: &U512) -> bool {
        self.native().map(|v| v == *other).unwrap_or(false)
    }
}

impl PartialOrd<U512> for UInt {
    fn partial_cmp(&self, other: &U512) -> Option<Ordering> {
        self.native().ok().map(|v| v.cmp(other))
    }
}

impl fmt::Display for UInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.native() {
            Ok(v) => write!(f, "{}", v),
            Err(_) => write!(f, "0x{}", hex::encode(self.bytes())),
        }
    }
}

/// A boolean
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bool {
    value: Arc4Value,
}

impl Bool {
    /// Encode `value`
    pub fn new(value: bool) -> Self {
        Self {
            value: Arc4Value::from_bytes(TypeDescriptor::Bool, vec![encode_bool(value)]),
        }
    }

    /// Decoded boolean
    pub fn native(&self) -> Arc4Result<bool> {
        decode_bool(self.value.bytes())
    }
}

impl_arc4_type!(Bool);

impl From<bool> for Bool {
    fn from(value: bool) -> Self {
        Self::new(value)
    }
}

impl TryFrom<Arc4Value> for Bool {
    type Error = Arc4Error;

    fn try_from(value: Arc4Value) -> Result<Self, Self::Error> {
        value.expect_type(&TypeDescriptor::Bool)?;
        Ok(Self { value })
    }
}

impl PartialEq<bool> for Bool {
    fn eq(&self, other: &bool) -> bool {
        self.native().map(|v| v == *other).unwrap_or(false)
    }
}

/// An unsigned fixed-point decimal
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UFixed {
    bit_size: u16,
    precision: u8,
    value: Arc4Value,
}

impl UFixed {
    /// `ufixed<bit_size>x<precision>` from a decimal literal such as `"1.23"`
    pub fn new(bit_size: u16, precision: u8, literal: &str) -> Arc4Result<Self> {
        let ty = TypeDescriptor::ufixed(bit_size, precision)?;
        let raw = parse_ufixed(literal, precision)?;
        let bytes = encode_uint(&raw, bit_size, &ty.arc4_name())?;
        Ok(Self {
            bit_size,
            precision,
            value: Arc4Value::from_bytes(ty, bytes),
        })
    }

    /// Width in bits
    pub fn bit_size(&self) -> u16 {
        self.bit_size
    }

    /// Number of decimal places
    pub fn precision(&self) -> u8 {
        self.precision
    }

    /// The scaled integer as stored
    pub fn raw(&self) -> Arc4Result<U512> {
        decode_uint(self.value.bytes(), self.bit_size)
    }

    /// Decimal string with exactly `precision` fractional digits
    pub fn native(&self) -> Arc4Result<String> {
        Ok(format_ufixed(&self.raw()?, self.precision))
    }
}

impl_arc4_type!(UFixed);

impl TryFrom<Arc4Value> for UFixed {
    type Error = Arc4Error;

    fn try_from(value: Arc4Value) -> Result<Self, Self::Error> {
        let (bit_size, precision) = match value.type_descriptor() {
            TypeDescriptor::UFixed {
                bit_size,
                precision,
            } => (*bit_size, *precision),
            other => return Err(Arc4Error::mismatch("ufixed", other.arc4_name())),
        };
        Ok(Self {
            bit_size,
            precision,
            value,
        })
    }
}

impl fmt::Display for UFixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.native() {
            Ok(s) => f.write_str(&s),
            Err(_) => write!(f, "0x{}", hex::encode(self.bytes())),
        }
    }
}
