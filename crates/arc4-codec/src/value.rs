//! Encoded values and their native counterparts

use std::fmt;

use arc4_primitives::{Address, U512};

use crate::constants::{ADDRESS_LENGTH, MAX_BYTES_SIZE};
use crate::error::{Arc4Error, Arc4Result};
use crate::layout::{
    as_u16, decode_sequence, encode_length_prefixed, encode_sequence, repeat_type,
    split_length_prefix,
};
use crate::scalar::{decode_bool, decode_uint, encode_bool, encode_uint, format_ufixed, parse_ufixed};
use crate::types::TypeDescriptor;

/// An ARC4 type together with the canonical encoding of a value of it
///
/// Equality requires both the same type (by ARC4 name) and the same bytes.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Arc4Value {
    ty: TypeDescriptor,
    bytes: Vec<u8>,
}

impl Arc4Value {
    /// Wrap pre-encoded bytes without validating them
    ///
    /// Malformed bytes are reported when the value is read.
    pub fn from_bytes(ty: TypeDescriptor, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            ty,
            bytes: bytes.into(),
        }
    }

    /// Wrap freshly encoded bytes, enforcing the size limit
    pub(crate) fn encoded(ty: TypeDescriptor, bytes: Vec<u8>) -> Arc4Result<Self> {
        if bytes.len() > MAX_BYTES_SIZE {
            return Err(Arc4Error::SizeLimit(format!(
                "{} value encodes to {} bytes, maximum is {}",
                ty,
                bytes.len(),
                MAX_BYTES_SIZE
            )));
        }
        Ok(Self { ty, bytes })
    }

    /// Encode a native value as `ty`
    pub fn from_native(ty: &TypeDescriptor, native: &Native) -> Arc4Result<Self> {
        let bytes = encode_native(ty, native)?;
        Self::encoded(ty.clone(), bytes)
    }

    /// The value's type
    pub fn type_descriptor(&self) -> &TypeDescriptor {
        &self.ty
    }

    /// Canonical encoding
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Take the encoding
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Fully decode into a native value
    pub fn to_native(&self) -> Arc4Result<Native> {
        decode(&self.ty, &self.bytes)
    }

    /// Fail with a type mismatch unless the value has type `expected`
    pub fn expect_type(&self, expected: &TypeDescriptor) -> Arc4Result<()> {
        if &self.ty != expected {
            return Err(Arc4Error::mismatch(expected.arc4_name(), self.ty.arc4_name()));
        }
        Ok(())
    }
}

impl fmt::Debug for Arc4Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Arc4Value({}, 0x{})", self.ty, hex::encode(&self.bytes))
    }
}

/// Common surface of the typed value wrappers
pub trait Arc4Type {
    /// The underlying encoded value
    fn as_value(&self) -> &Arc4Value;

    /// Unwrap into the underlying encoded value
    fn into_value(self) -> Arc4Value;

    /// The value's type
    fn type_descriptor(&self) -> &TypeDescriptor {
        self.as_value().type_descriptor()
    }

    /// Canonical encoding
    fn bytes(&self) -> &[u8] {
        self.as_value().bytes()
    }
}

impl Arc4Type for Arc4Value {
    fn as_value(&self) -> &Arc4Value {
        self
    }

    fn into_value(self) -> Arc4Value {
        self
    }
}

/// Implements [`Arc4Type`] and the conversion into [`Arc4Value`] for a
/// wrapper holding its encoding in a `value` field
macro_rules! impl_arc4_type {
    ($wrapper:ty) => {
        impl $crate::value::Arc4Type for $wrapper {
            fn as_value(&self) -> &$crate::value::Arc4Value {
                &self.value
            }

            fn into_value(self) -> $crate::value::Arc4Value {
                self.value
            }
        }

        impl From<$wrapper> for $crate::value::Arc4Value {
            fn from(wrapper: $wrapper) -> Self {
                wrapper.value
            }
        }
    };
}

pub(crate) use impl_arc4_type;

/// Host-side representation of a value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Native {
    /// Any unsigned integer or byte
    Int(U512),
    /// Boolean
    Bool(bool),
    /// Fixed-point decimal as a base-10 literal
    Decimal(String),
    /// Account address
    Address(Address),
    /// Raw bytes (`byte[]`)
    Bytes(Vec<u8>),
    /// Text
    Str(String),
    /// Array elements
    List(Vec<Native>),
    /// Tuple elements
    Tuple(Vec<Native>),
    /// Struct fields in declaration order
    Struct(Vec<(String, Native)>),
}

impl Native {
    /// Short description of the variant, used in type mismatch errors
    pub fn kind(&self) -> &'static str {
        match self {
            Native::Int(_) => "int",
            Native::Bool(_) => "bool",
            Native::Decimal(_) => "decimal",
            Native::Address(_) => "address",
            Native::Bytes(_) => "bytes",
            Native::Str(_) => "str",
            Native::List(_) => "list",
            Native::Tuple(_) => "tuple",
            Native::Struct(_) => "struct",
        }
    }
}

impl From<u64> for Native {
    fn from(value: u64) -> Self {
        Native::Int(U512::from(value))
    }
}

impl From<U512> for Native {
    fn from(value: U512) -> Self {
        Native::Int(value)
    }
}

impl From<bool> for Native {
    fn from(value: bool) -> Self {
        Native::Bool(value)
    }
}

impl From<&str> for Native {
    fn from(value: &str) -> Self {
        Native::Str(value.to_string())
    }
}

impl From<String> for Native {
    fn from(value: String) -> Self {
        Native::Str(value)
    }
}

impl From<Address> for Native {
    fn from(value: Address) -> Self {
        Native::Address(value)
    }
}

/// Encode a native value as `ty`
pub fn encode(ty: &TypeDescriptor, native: &Native) -> Arc4Result<Vec<u8>> {
    Arc4Value::from_native(ty, native).map(Arc4Value::into_bytes)
}

fn encode_native(ty: &TypeDescriptor, native: &Native) -> Arc4Result<Vec<u8>> {
    match (ty, native) {
        (TypeDescriptor::UInt { bit_size }, Native::Int(v)) => {
            encode_uint(v, *bit_size, &ty.arc4_name())
        }
        (TypeDescriptor::Byte, Native::Int(v)) => encode_uint(v, 8, "byte"),
        (TypeDescriptor::Bool, Native::Bool(b)) => Ok(vec![encode_bool(*b)]),
        (
            TypeDescriptor::UFixed {
                bit_size,
                precision,
            },
            Native::Decimal(literal),
        ) => {
            let raw = parse_ufixed(literal, *precision)?;
            encode_uint(&raw, *bit_size, &ty.arc4_name())
        }
        (TypeDescriptor::Address, Native::Address(address)) => Ok(address.as_bytes().to_vec()),
        (TypeDescriptor::Address, Native::Str(s)) => {
            Ok(Address::from_str_checked(s)?.as_bytes().to_vec())
        }
        (TypeDescriptor::Address, Native::Bytes(bytes)) => {
            Ok(Address::from_slice(bytes)?.as_bytes().to_vec())
        }
        (TypeDescriptor::String, Native::Str(s)) => encode_string(s),
        (TypeDescriptor::DynamicArray { item }, Native::Bytes(bytes))
            if **item == TypeDescriptor::Byte =>
        {
            encode_length_prefixed(bytes.len(), bytes)
        }
        (TypeDescriptor::DynamicArray { item }, Native::List(items)) => {
            let children = items
                .iter()
                .map(|n| Arc4Value::from_native(item, n))
                .collect::<Arc4Result<Vec<_>>>()?;
            encode_length_prefixed(children.len(), &encode_sequence(&children)?)
        }
        (TypeDescriptor::StaticArray { item, size }, Native::List(items)) => {
            if items.len() != *size {
                return Err(Arc4Error::mismatch(
                    ty.arc4_name(),
                    format!("{} elements", items.len()),
                ));
            }
            let children = items
                .iter()
                .map(|n| Arc4Value::from_native(item, n))
                .collect::<Arc4Result<Vec<_>>>()?;
            encode_sequence(&children)
        }
        (TypeDescriptor::Tuple(types), Native::Tuple(items) | Native::List(items)) => {
            encode_children(ty, types, items)
        }
        (TypeDescriptor::Struct(s), Native::Tuple(items)) => {
            encode_children(ty, &s.field_types(), items)
        }
        (TypeDescriptor::Struct(s), Native::Struct(fields)) => {
            let names_match = fields.len() == s.fields().len()
                && fields
                    .iter()
                    .zip(s.field_names())
                    .all(|((given, _), declared)| given == declared);
            if !names_match {
                return Err(Arc4Error::mismatch(
                    format!("{} fields of {}", ty, s.name()),
                    fields
                        .iter()
                        .map(|(name, _)| name.as_str())
                        .collect::<Vec<_>>()
                        .join(","),
                ));
            }
            let values: Vec<Native> = fields.iter().map(|(_, v)| v.clone()).collect();
            encode_children(ty, &s.field_types(), &values)
        }
        _ => Err(Arc4Error::mismatch(ty.arc4_name(), native.kind())),
    }
}

fn encode_children(
    ty: &TypeDescriptor,
    types: &[TypeDescriptor],
    items: &[Native],
) -> Arc4Result<Vec<u8>> {
    if items.len() != types.len() {
        return Err(Arc4Error::mismatch(
            ty.arc4_name(),
            format!("{} elements", items.len()),
        ));
    }
    let children = types
        .iter()
        .zip(items)
        .map(|(t, n)| Arc4Value::from_native(t, n))
        .collect::<Arc4Result<Vec<_>>>()?;
    encode_sequence(&children)
}

/// Encode text as a 2-byte byte count followed by its UTF-8 bytes
pub(crate) fn encode_string(s: &str) -> Arc4Result<Vec<u8>> {
    encode_length_prefixed(as_u16(s.len())? as usize, s.as_bytes())
}

pub(crate) fn decode_string(bytes: &[u8]) -> Arc4Result<String> {
    let (len, body) = split_length_prefix(bytes)?;
    if body.len() != len {
        return Err(Arc4Error::malformed(format!(
            "string length prefix {} does not match {} bytes of content",
            len,
            body.len()
        )));
    }
    String::from_utf8(body.to_vec())
        .map_err(|e| Arc4Error::malformed(format!("invalid UTF-8: {}", e)))
}

/// Decode `bytes` as a value of type `ty`
///
/// Structure is validated all the way down: lengths, offsets and
/// leftover bytes are all checked.
pub fn decode(ty: &TypeDescriptor, bytes: &[u8]) -> Arc4Result<Native> {
    match ty {
        TypeDescriptor::UInt { bit_size } => decode_uint(bytes, *bit_size).map(Native::Int),
        TypeDescriptor::Byte => decode_uint(bytes, 8).map(Native::Int),
        TypeDescriptor::Bool => decode_bool(bytes).map(Native::Bool),
        TypeDescriptor::UFixed {
            bit_size,
            precision,
        } => {
            let raw = decode_uint(bytes, *bit_size)?;
            Ok(Native::Decimal(format_ufixed(&raw, *precision)))
        }
        TypeDescriptor::Address => {
            if bytes.len() != ADDRESS_LENGTH {
                return Err(Arc4Error::malformed(format!(
                    "expected {} bytes for address, got {}",
                    ADDRESS_LENGTH,
                    bytes.len()
                )));
            }
            Ok(Native::Address(Address::from_slice(bytes)?))
        }
        TypeDescriptor::String => decode_string(bytes).map(Native::Str),
        TypeDescriptor::DynamicArray { item } => {
            let (count, body) = split_length_prefix(bytes)?;
            if **item == TypeDescriptor::Byte {
                if body.len() != count {
                    return Err(Arc4Error::malformed(format!(
                        "byte[] length prefix {} does not match {} bytes of content",
                        count,
                        body.len()
                    )));
                }
                return Ok(Native::Bytes(body.to_vec()));
            }
            let types = vec![(**item).clone(); count];
            decode_children(&types, body).map(Native::List)
        }
        TypeDescriptor::StaticArray { item, size } => {
            let types = repeat_type(item, *size)?;
            decode_children(&types, bytes).map(Native::List)
        }
        TypeDescriptor::Tuple(types) => decode_children(types, bytes).map(Native::Tuple),
        TypeDescriptor::Struct(s) => {
            let values = decode_children(&s.field_types(), bytes)?;
            Ok(Native::Struct(
                s.field_names().map(str::to_string).zip(values).collect(),
            ))
        }
    }
}

fn decode_children(types: &[TypeDescriptor], bytes: &[u8]) -> Arc4Result<Vec<Native>> {
    decode_sequence(types, bytes)?
        .iter()
        .map(Arc4Value::to_native)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StructType;

    fn hex_of(ty: &str, native: Native) -> String {
        let ty = TypeDescriptor::parse(ty).unwrap();
        hex::encode(encode(&ty, &native).unwrap())
    }

    // ==================== Encode ====================

    #[test]
    fn test_encode_scalars() {
        assert_eq!(hex_of("uint64", 42u64.into()), "000000000000002a");
        assert_eq!(hex_of("uint8", 255u64.into()), "ff");
        assert_eq!(hex_of("byte", 7u64.into()), "07");
        assert_eq!(hex_of("bool", true.into()), "80");
        assert_eq!(hex_of("bool", false.into()), "00");
        assert_eq!(hex_of("ufixed16x2", Native::Decimal("1.23".into())), "007b");
        assert_eq!(hex_of("string", "hi".into()), "00026869");
    }

    #[test]
    fn test_encode_arrays() {
        let list = Native::List(vec![1u64.into(), 2u64.into()]);
        assert_eq!(hex_of("uint16[]", list.clone()), "000200010002");
        assert_eq!(hex_of("uint16[2]", list), "00010002");
        assert_eq!(hex_of("byte[]", Native::Bytes(vec![0xde, 0xad])), "0002dead");
        assert_eq!(hex_of("bool[]", Native::List(vec![true.into(); 3])), "0003e0");
        assert_eq!(hex_of("uint64[]", Native::List(vec![])), "0000");
    }

    #[test]
    fn test_encode_array_of_strings() {
        let list = Native::List(vec!["a".into(), "bc".into()]);
        // count, two offsets (4, 7), then the strings
        assert_eq!(hex_of("string[]", list), "00020004000700016100026263");
    }

    #[test]
    fn test_encode_type_mismatch() {
        let ty = TypeDescriptor::uint64();
        match encode(&ty, &Native::Bool(true)) {
            Err(Arc4Error::TypeMismatch { expected, got }) => {
                assert_eq!(expected, "uint64");
                assert_eq!(got, "bool");
            }
            other => panic!("Expected TypeMismatch, got {:?}", other),
        }
        let ty = TypeDescriptor::static_array(TypeDescriptor::uint8(), 3);
        assert!(matches!(
            encode(&ty, &Native::List(vec![1u64.into()])),
            Err(Arc4Error::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_encode_size_limit() {
        let ty = TypeDescriptor::dynamic_bytes();
        assert!(encode(&ty, &Native::Bytes(vec![0; MAX_BYTES_SIZE - 2])).is_ok());
        assert!(matches!(
            encode(&ty, &Native::Bytes(vec![0; MAX_BYTES_SIZE - 1])),
            Err(Arc4Error::SizeLimit(_))
        ));
    }

    #[test]
    fn test_encode_struct_by_name() {
        let s = StructType::new(
            "Pair",
            vec![
                ("a".to_string(), TypeDescriptor::uint8()),
                ("b".to_string(), TypeDescriptor::Bool),
            ],
        )
        .unwrap();
        let ty = TypeDescriptor::Struct(s);
        let native = Native::Struct(vec![
            ("a".to_string(), 1u64.into()),
            ("b".to_string(), true.into()),
        ]);
        assert_eq!(encode(&ty, &native).unwrap(), vec![0x01, 0x80]);

        let swapped = Native::Struct(vec![
            ("b".to_string(), true.into()),
            ("a".to_string(), 1u64.into()),
        ]);
        assert!(matches!(encode(&ty, &swapped), Err(Arc4Error::TypeMismatch { .. })));
    }

    // ==================== Decode ====================

    #[test]
    fn test_decode_roundtrip_nested() {
        let ty = TypeDescriptor::parse("(uint64,(bool,string),bool[],address)").unwrap();
        let native = Native::Tuple(vec![
            7u64.into(),
            Native::Tuple(vec![true.into(), "nested".into()]),
            Native::List(vec![false.into(), true.into()]),
            Native::Address(Address::from_bytes([9; 32])),
        ]);
        let bytes = encode(&ty, &native).unwrap();
        assert_eq!(decode(&ty, &bytes).unwrap(), native);
    }

    #[test]
    fn test_decode_ufixed_canonical_string() {
        let ty = TypeDescriptor::ufixed(64, 3).unwrap();
        let bytes = encode(&ty, &Native::Decimal("2.5".into())).unwrap();
        assert_eq!(decode(&ty, &bytes).unwrap(), Native::Decimal("2.500".into()));
    }

    #[test]
    fn test_decode_malformed() {
        let cases = [
            ("uint64", vec![0u8; 7]),
            ("bool", vec![]),
            ("string", vec![0, 5, b'a']),
            ("string", vec![0, 1, 0xff]),
            ("byte[]", vec![0, 3, 1]),
            ("uint8[]", vec![0, 2, 1, 2, 3]),
            ("address", vec![0; 31]),
            ("(uint8,uint8)", vec![1]),
        ];
        for (ty, bytes) in cases {
            let ty = TypeDescriptor::parse(ty).unwrap();
            assert!(
                matches!(decode(&ty, &bytes), Err(Arc4Error::MalformedEncoding(_))),
                "{} should reject {:?}",
                ty,
                bytes
            );
        }
    }

    #[test]
    fn test_decode_oversized_static_array() {
        for ty in ["uint64[3000000000000000000]", "uint8[100000000]", "string[100000000]"] {
            let ty = TypeDescriptor::parse(ty).unwrap();
            assert!(
                matches!(decode(&ty, &[]), Err(Arc4Error::SizeLimit(_))),
                "{} should be rejected",
                ty
            );
        }
        // Nested inside a composite the head simply runs past the buffer
        let ty = TypeDescriptor::parse("(uint64[3000000000000000000],string)").unwrap();
        assert!(matches!(decode(&ty, &[0; 4]), Err(Arc4Error::MalformedEncoding(_))));
        let ty = TypeDescriptor::parse("uint8[100000000][]").unwrap();
        assert!(matches!(decode(&ty, &[0, 1]), Err(Arc4Error::MalformedEncoding(_))));
    }

    #[test]
    fn test_from_bytes_is_lazy() {
        let value = Arc4Value::from_bytes(TypeDescriptor::uint64(), vec![1, 2, 3]);
        assert_eq!(value.bytes(), &[1, 2, 3]);
        assert!(value.to_native().is_err());
    }

    #[test]
    fn test_value_equality_requires_same_type() {
        let a = Arc4Value::from_bytes(TypeDescriptor::uint8(), vec![5]);
        let b = Arc4Value::from_bytes(TypeDescriptor::Byte, vec![5]);
        assert_ne!(a, b);
        assert_eq!(a, Arc4Value::from_bytes(TypeDescriptor::uint8(), vec![5]));
    }

    #[test]
    fn test_debug_format() {
        let value = Arc4Value::from_bytes(TypeDescriptor::uint16(), vec![0x01, 0x02]);
        assert_eq!(format!("{:?}", value), "Arc4Value(uint16, 0x0102)");
    }
}
