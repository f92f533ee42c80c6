//! ARC4 type descriptors

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::constants::{ADDRESS_LENGTH, MAX_BIT_SIZE, MAX_PRECISION};
use crate::error::{Arc4Error, Arc4Result};
use crate::layout::repeat_type;

/// Describes an ARC4 type
///
/// Two descriptors are equal iff their [`arc4_name`](Self::arc4_name)s are
/// equal, so a struct descriptor equals the tuple of its field types and
/// `byte[]` equals the dynamic-bytes descriptor.
#[derive(Debug, Clone)]
pub enum TypeDescriptor {
    /// Unsigned integer of `bit_size` bits (multiple of 8, at most 512)
    UInt {
        /// Width in bits
        bit_size: u16,
    },
    /// Single byte, encoded like `uint8` but named `byte`
    Byte,
    /// Boolean, one bit when packed
    Bool,
    /// Unsigned fixed-point decimal scaled by `10^precision`
    UFixed {
        /// Width in bits
        bit_size: u16,
        /// Number of decimal places
        precision: u8,
    },
    /// Fixed-length homogeneous array
    StaticArray {
        /// Element type
        item: Box<TypeDescriptor>,
        /// Number of elements
        size: usize,
    },
    /// 32-byte account address, laid out as `byte[32]`
    Address,
    /// Length-prefixed homogeneous array
    DynamicArray {
        /// Element type
        item: Box<TypeDescriptor>,
    },
    /// Heterogeneous fixed-arity tuple
    Tuple(Vec<TypeDescriptor>),
    /// Named tuple
    Struct(StructType),
    /// Length-prefixed UTF-8 text
    String,
}

/// Declaration of a struct: ordered named fields
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructType {
    name: String,
    fields: Vec<(String, TypeDescriptor)>,
    frozen: bool,
}

impl StructType {
    /// Declare a struct. Field order is the encoding order.
    pub fn new(
        name: impl Into<String>,
        fields: Vec<(String, TypeDescriptor)>,
    ) -> Arc4Result<Self> {
        let name = name.into();
        for (i, (field, _)) in fields.iter().enumerate() {
            if fields[..i].iter().any(|(prev, _)| prev == field) {
                return Err(Arc4Error::InvalidType(format!(
                    "duplicate field {} in struct {}",
                    field, name
                )));
            }
        }
        Ok(Self {
            name,
            fields,
            frozen: false,
        })
    }

    /// Mark the struct as frozen: fields cannot be assigned after construction
    pub fn frozen(mut self) -> Self {
        self.frozen = true;
        self
    }

    /// Struct name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether field assignment is rejected
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[(String, TypeDescriptor)] {
        &self.fields
    }

    /// Field names in declaration order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Field types in declaration order
    pub fn field_types(&self) -> Vec<TypeDescriptor> {
        self.fields.iter().map(|(_, ty)| ty.clone()).collect()
    }

    /// Position of a field
    pub fn field_index(&self, field: &str) -> Arc4Result<usize> {
        self.fields
            .iter()
            .position(|(name, _)| name == field)
            .ok_or_else(|| Arc4Error::UnknownField(format!("{}.{}", self.name, field)))
    }

    /// The tuple this struct is laid out as
    pub fn as_tuple(&self) -> TypeDescriptor {
        TypeDescriptor::Tuple(self.field_types())
    }
}

impl TypeDescriptor {
    /// `uint<bit_size>`; the width must be a multiple of 8 between 8 and 512
    pub fn uint(bit_size: u16) -> Arc4Result<Self> {
        check_bit_size(bit_size)?;
        Ok(TypeDescriptor::UInt { bit_size })
    }

    /// `uint8`
    pub const fn uint8() -> Self {
        TypeDescriptor::UInt { bit_size: 8 }
    }

    /// `uint16`
    pub const fn uint16() -> Self {
        TypeDescriptor::UInt { bit_size: 16 }
    }

    /// `uint32`
    pub const fn uint32() -> Self {
        TypeDescriptor::UInt { bit_size: 32 }
    }

    /// `uint64`
    pub const fn uint64() -> Self {
        TypeDescriptor::UInt { bit_size: 64 }
    }

    /// `uint128`
    pub const fn uint128() -> Self {
        TypeDescriptor::UInt { bit_size: 128 }
    }

    /// `uint256`
    pub const fn uint256() -> Self {
        TypeDescriptor::UInt { bit_size: 256 }
    }

    /// `uint512`
    pub const fn uint512() -> Self {
        TypeDescriptor::UInt { bit_size: 512 }
    }

    /// `ufixed<bit_size>x<precision>`
    pub fn ufixed(bit_size: u16, precision: u8) -> Arc4Result<Self> {
        check_bit_size(bit_size)?;
        if precision == 0 || precision > MAX_PRECISION {
            return Err(Arc4Error::InvalidType(format!(
                "ufixed precision must be between 1 and {}, got {}",
                MAX_PRECISION, precision
            )));
        }
        Ok(TypeDescriptor::UFixed {
            bit_size,
            precision,
        })
    }

    /// `<item>[<size>]`
    pub fn static_array(item: TypeDescriptor, size: usize) -> Self {
        TypeDescriptor::StaticArray {
            item: Box::new(item),
            size,
        }
    }

    /// `<item>[]`
    pub fn dynamic_array(item: TypeDescriptor) -> Self {
        TypeDescriptor::DynamicArray {
            item: Box::new(item),
        }
    }

    /// `byte[]`
    pub fn dynamic_bytes() -> Self {
        Self::dynamic_array(TypeDescriptor::Byte)
    }

    /// `(T1,...,Tn)`
    pub fn tuple(children: Vec<TypeDescriptor>) -> Self {
        TypeDescriptor::Tuple(children)
    }

    /// Canonical ARC4 type name
    pub fn arc4_name(&self) -> String {
        match self {
            TypeDescriptor::UInt { bit_size } => format!("uint{}", bit_size),
            TypeDescriptor::Byte => "byte".to_string(),
            TypeDescriptor::Bool => "bool".to_string(),
            TypeDescriptor::UFixed {
                bit_size,
                precision,
            } => format!("ufixed{}x{}", bit_size, precision),
            TypeDescriptor::StaticArray { item, size } => {
                format!("{}[{}]", item.arc4_name(), size)
            }
            TypeDescriptor::Address => "address".to_string(),
            TypeDescriptor::DynamicArray { item } => format!("{}[]", item.arc4_name()),
            TypeDescriptor::Tuple(children) => tuple_name(children.iter()),
            TypeDescriptor::Struct(s) => tuple_name(s.fields.iter().map(|(_, ty)| ty)),
            TypeDescriptor::String => "string".to_string(),
        }
    }

    /// Whether the encoded length depends on the value
    pub fn is_dynamic(&self) -> bool {
        match self {
            TypeDescriptor::String | TypeDescriptor::DynamicArray { .. } => true,
            TypeDescriptor::StaticArray { item, .. } => item.is_dynamic(),
            TypeDescriptor::Tuple(children) => children.iter().any(|t| t.is_dynamic()),
            TypeDescriptor::Struct(s) => s.fields.iter().any(|(_, t)| t.is_dynamic()),
            _ => false,
        }
    }

    /// Whether this is `bool`
    pub fn is_bool(&self) -> bool {
        matches!(self, TypeDescriptor::Bool)
    }

    /// Element types of a fixed-arity composite, in layout order
    ///
    /// Returns `None` for scalars, strings and dynamic arrays, and
    /// `SizeLimit` for a static array too large to ever be encoded.
    pub fn child_types(&self) -> Arc4Result<Option<Vec<TypeDescriptor>>> {
        Ok(match self {
            TypeDescriptor::StaticArray { item, size } => Some(repeat_type(item, *size)?),
            TypeDescriptor::Address => Some(vec![TypeDescriptor::Byte; ADDRESS_LENGTH]),
            TypeDescriptor::Tuple(children) => Some(children.clone()),
            TypeDescriptor::Struct(s) => Some(s.field_types()),
            _ => None,
        })
    }

    /// Parse an ARC4 type string such as `(uint64,bool[],string)`
    pub fn parse(s: &str) -> Arc4Result<Self> {
        if let Some(inner) = s.strip_suffix("[]") {
            return Ok(Self::dynamic_array(Self::parse(inner)?));
        }

        if let Some(body) = s.strip_suffix(']') {
            let open = body
                .rfind('[')
                .ok_or_else(|| Arc4Error::InvalidType(s.to_string()))?;
            let size = parse_decimal(&body[open + 1..])
                .ok_or_else(|| Arc4Error::InvalidType(format!("invalid array size in {}", s)))?;
            return Ok(Self::static_array(Self::parse(&body[..open])?, size));
        }

        if let Some(inner) = s.strip_prefix('(').and_then(|r| r.strip_suffix(')')) {
            let children = split_tuple(inner)?
                .into_iter()
                .map(Self::parse)
                .collect::<Arc4Result<Vec<_>>>()?;
            return Ok(Self::tuple(children));
        }

        match s {
            "bool" => return Ok(TypeDescriptor::Bool),
            "byte" => return Ok(TypeDescriptor::Byte),
            "address" => return Ok(TypeDescriptor::Address),
            "string" => return Ok(TypeDescriptor::String),
            _ => {}
        }

        // ufixed<N>x<M>
        if let Some(rest) = s.strip_prefix("ufixed") {
            let (bits, precision) = rest
                .split_once('x')
                .ok_or_else(|| Arc4Error::InvalidType(s.to_string()))?;
            let bits = parse_decimal(bits)
                .and_then(|b| u16::try_from(b).ok())
                .ok_or_else(|| Arc4Error::InvalidType(format!("invalid ufixed size: {}", s)))?;
            let precision = parse_decimal(precision)
                .and_then(|p| u8::try_from(p).ok())
                .ok_or_else(|| Arc4Error::InvalidType(format!("invalid ufixed precision: {}", s)))?;
            return Self::ufixed(bits, precision);
        }

        // uint<N>
        if let Some(rest) = s.strip_prefix("uint") {
            let bits = parse_decimal(rest)
                .and_then(|b| u16::try_from(b).ok())
                .ok_or_else(|| Arc4Error::InvalidType(format!("invalid uint size: {}", s)))?;
            return Self::uint(bits);
        }

        Err(Arc4Error::InvalidType(format!("unknown type: {}", s)))
    }
}

fn check_bit_size(bit_size: u16) -> Arc4Result<()> {
    if bit_size == 0 || bit_size % 8 != 0 || bit_size > MAX_BIT_SIZE {
        return Err(Arc4Error::InvalidType(format!(
            "bit size must be a multiple of 8 between 8 and {}, got {}",
            MAX_BIT_SIZE, bit_size
        )));
    }
    Ok(())
}

fn tuple_name<'a>(children: impl Iterator<Item = &'a TypeDescriptor>) -> String {
    let names: Vec<String> = children.map(|t| t.arc4_name()).collect();
    format!("({})", names.join(","))
}

/// Decimal without sign or leading zeros
fn parse_decimal(s: &str) -> Option<usize> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) || (s.len() > 1 && s.starts_with('0'))
    {
        return None;
    }
    s.parse().ok()
}

/// Split a tuple body on its top-level commas
fn split_tuple(inner: &str) -> Arc4Result<Vec<&str>> {
    if inner.is_empty() {
        return Ok(Vec::new());
    }
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in inner.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| Arc4Error::InvalidType(format!("unbalanced parentheses: ({})", inner)))?;
            }
            ',' if depth == 0 => {
                parts.push(&inner[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(Arc4Error::InvalidType(format!("unbalanced parentheses: ({})", inner)));
    }
    parts.push(&inner[start..]);
    Ok(parts)
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.arc4_name() == other.arc4_name()
    }
}

impl Eq for TypeDescriptor {}

impl Hash for TypeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.arc4_name().hash(state);
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.arc4_name())
    }
}

impl FromStr for TypeDescriptor {
    type Err = Arc4Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// Serde implementation (behind feature flag)
#[cfg(feature = "serde")]
mod serde_impl {
    use super::*;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for TypeDescriptor {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(&self.arc4_name())
        }
    }

    impl<'de> Deserialize<'de> for TypeDescriptor {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let s = String::deserialize(deserializer)?;
            TypeDescriptor::parse(&s).map_err(de::Error::custom)
        }
    }
}
