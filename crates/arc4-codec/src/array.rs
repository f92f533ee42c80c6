//! Array containers: static arrays, dynamic arrays, `byte[]` and `address`

use std::fmt;
use std::ops::{Bound, Range, RangeBounds};
use std::str::FromStr;

use arc4_primitives::Address;
use tracing::debug;

use crate::constants::ADDRESS_LENGTH;
use crate::error::{Arc4Error, Arc4Result};
use crate::handle::{ElementHandle, Handle, WriteBack};
use crate::layout::{
    decode_sequence, encode_length_prefixed, encode_sequence, repeat_type, split_length_prefix,
};
use crate::types::TypeDescriptor;
use crate::uint::UInt;
use crate::value::{decode, impl_arc4_type, Arc4Type, Arc4Value, Native};

/// Resolve a possibly negative index against `len`
pub(crate) fn resolve_index(index: isize, len: usize) -> Arc4Result<usize> {
    let resolved = if index < 0 {
        index + len as isize
    } else {
        index
    };
    if resolved < 0 || resolved as usize >= len {
        return Err(Arc4Error::IndexOutOfBounds { index, len });
    }
    Ok(resolved as usize)
}

/// Resolve slice bounds the way host sequences do: negative bounds count
/// from the end and out-of-range bounds are clamped
pub(crate) fn resolve_range(range: impl RangeBounds<isize>, len: usize) -> Range<usize> {
    let normalize = |i: isize| if i < 0 { i + len as isize } else { i };
    let clamp = |i: isize| i.clamp(0, len as isize) as usize;
    let start = match range.start_bound() {
        Bound::Included(&s) => clamp(normalize(s)),
        Bound::Excluded(&s) => clamp(normalize(s) + 1),
        Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        Bound::Included(&e) => clamp(normalize(e) + 1),
        Bound::Excluded(&e) => clamp(normalize(e)),
        Bound::Unbounded => len,
    };
    start..end.max(start)
}

fn check_items(item: &TypeDescriptor, items: &[Arc4Value]) -> Arc4Result<()> {
    items.iter().try_for_each(|v| v.expect_type(item))
}

/// Fixed-length homogeneous array, encoded as a bare head/tail body
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StaticArray {
    item: TypeDescriptor,
    size: usize,
    value: Arc4Value,
}

impl StaticArray {
    /// Array of exactly `size` items of type `item`
    pub fn new(item: TypeDescriptor, size: usize, items: Vec<Arc4Value>) -> Arc4Result<Self> {
        let ty = TypeDescriptor::static_array(item.clone(), size);
        if items.len() != size {
            return Err(Arc4Error::mismatch(
                ty.arc4_name(),
                format!("{} elements", items.len()),
            ));
        }
        check_items(&item, &items)?;
        let value = Arc4Value::encoded(ty, encode_sequence(&items)?)?;
        Ok(Self { item, size, value })
    }

    /// Wrap pre-encoded bytes without validating them
    pub fn from_bytes(item: TypeDescriptor, size: usize, bytes: impl Into<Vec<u8>>) -> Self {
        let ty = TypeDescriptor::static_array(item.clone(), size);
        Self {
            item,
            size,
            value: Arc4Value::from_bytes(ty, bytes),
        }
    }

    /// Element type
    pub fn item_type(&self) -> &TypeDescriptor {
        &self.item
    }

    /// Number of elements, fixed by the type
    pub fn len(&self) -> usize {
        self.size
    }

    /// Whether the type has zero elements
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Decode all elements
    pub fn items(&self) -> Arc4Result<Vec<Arc4Value>> {
        decode_sequence(&repeat_type(&self.item, self.size)?, self.value.bytes())
    }

    /// Element at `index`; negative indices count from the end
    pub fn get(&self, index: isize) -> Arc4Result<Arc4Value> {
        let i = resolve_index(index, self.size)?;
        let mut items = self.items()?;
        Ok(items.swap_remove(i))
    }

    /// Elements within `range`
    pub fn slice(&self, range: impl RangeBounds<isize>) -> Arc4Result<Vec<Arc4Value>> {
        let range = resolve_range(range, self.size);
        let mut items = self.items()?;
        Ok(items.drain(range).collect())
    }

    /// Replace the element at `index` and re-encode
    pub fn set(&mut self, index: isize, item: Arc4Value) -> Arc4Result<()> {
        let i = resolve_index(index, self.size)?;
        self.write(&i, item)
    }

    /// Write-back handle to the element at `index`
    pub fn element(&mut self, index: isize) -> Arc4Result<ElementHandle<'_, Self>> {
        let i = resolve_index(index, self.size)?;
        Handle::open(self, i)
    }

    /// Decoded elements
    pub fn native(&self) -> Arc4Result<Native> {
        self.value.to_native()
    }
}

impl_arc4_type!(StaticArray);

impl WriteBack for StaticArray {
    type Key = usize;

    fn read(&self, key: &usize) -> Arc4Result<Arc4Value> {
        self.get(*key as isize)
    }

    fn write(&mut self, key: &usize, item: Arc4Value) -> Arc4Result<()> {
        item.expect_type(&self.item)?;
        let mut items = self.items()?;
        let slot = items
            .get_mut(*key)
            .ok_or(Arc4Error::IndexOutOfBounds {
                index: *key as isize,
                len: self.size,
            })?;
        *slot = item;
        debug!(ty = %self.value.type_descriptor(), index = *key, "set static array element");
        self.value = Arc4Value::encoded(self.value.type_descriptor().clone(), encode_sequence(&items)?)?;
        Ok(())
    }
}

impl TryFrom<Arc4Value> for StaticArray {
    type Error = Arc4Error;

    fn try_from(value: Arc4Value) -> Result<Self, Self::Error> {
        let (item, size) = match value.type_descriptor() {
            TypeDescriptor::StaticArray { item, size } => ((**item).clone(), *size),
            other => return Err(Arc4Error::mismatch("static array", other.arc4_name())),
        };
        Ok(Self { item, size, value })
    }
}

/// Length-prefixed homogeneous array
///
/// Every mutation decodes the elements, edits the list and re-encodes the
/// whole array. A failed mutation leaves the array unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DynamicArray {
    item: TypeDescriptor,
    value: Arc4Value,
}

impl DynamicArray {
    /// Array of `items`, all of type `item`
    pub fn new(item: TypeDescriptor, items: Vec<Arc4Value>) -> Arc4Result<Self> {
        check_items(&item, &items)?;
        let value = Self::encode_items(&item, &items)?;
        Ok(Self { item, value })
    }

    /// Array with no elements
    pub fn empty(item: TypeDescriptor) -> Self {
        let ty = TypeDescriptor::dynamic_array(item.clone());
        Self {
            item,
            value: Arc4Value::from_bytes(ty, vec![0, 0]),
        }
    }

    /// Wrap pre-encoded bytes without validating them
    pub fn from_bytes(item: TypeDescriptor, bytes: impl Into<Vec<u8>>) -> Self {
        let ty = TypeDescriptor::dynamic_array(item.clone());
        Self {
            item,
            value: Arc4Value::from_bytes(ty, bytes),
        }
    }

    fn encode_items(item: &TypeDescriptor, items: &[Arc4Value]) -> Arc4Result<Arc4Value> {
        let body = encode_sequence(items)?;
        Arc4Value::encoded(
            TypeDescriptor::dynamic_array(item.clone()),
            encode_length_prefixed(items.len(), &body)?,
        )
    }

    fn replace(&mut self, items: &[Arc4Value]) -> Arc4Result<()> {
        self.value = Self::encode_items(&self.item, items)?;
        Ok(())
    }

    /// Element type
    pub fn item_type(&self) -> &TypeDescriptor {
        &self.item
    }

    /// Number of elements, read from the length prefix
    pub fn len(&self) -> Arc4Result<usize> {
        split_length_prefix(self.value.bytes()).map(|(count, _)| count)
    }

    /// Whether the array has no elements
    pub fn is_empty(&self) -> Arc4Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Decode all elements
    pub fn items(&self) -> Arc4Result<Vec<Arc4Value>> {
        let (count, body) = split_length_prefix(self.value.bytes())?;
        decode_sequence(&vec![self.item.clone(); count], body)
    }

    /// Element at `index`; negative indices count from the end
    pub fn get(&self, index: isize) -> Arc4Result<Arc4Value> {
        let mut items = self.items()?;
        let i = resolve_index(index, items.len())?;
        Ok(items.swap_remove(i))
    }

    /// Elements within `range`
    pub fn slice(&self, range: impl RangeBounds<isize>) -> Arc4Result<Vec<Arc4Value>> {
        let mut items = self.items()?;
        let range = resolve_range(range, items.len());
        Ok(items.drain(range).collect())
    }

    /// Replace the element at `index`
    pub fn set(&mut self, index: isize, item: Arc4Value) -> Arc4Result<()> {
        let i = resolve_index(index, self.len()?)?;
        self.write(&i, item)
    }

    /// Add an element at the end
    pub fn append(&mut self, item: Arc4Value) -> Arc4Result<()> {
        item.expect_type(&self.item)?;
        let mut items = self.items()?;
        items.push(item);
        debug!(ty = %self.value.type_descriptor(), len = items.len(), "append");
        self.replace(&items)
    }

    /// Add several elements at the end
    pub fn extend(&mut self, new_items: impl IntoIterator<Item = Arc4Value>) -> Arc4Result<()> {
        let new_items: Vec<Arc4Value> = new_items.into_iter().collect();
        check_items(&self.item, &new_items)?;
        let mut items = self.items()?;
        items.extend(new_items);
        debug!(ty = %self.value.type_descriptor(), len = items.len(), "extend");
        self.replace(&items)
    }

    /// Remove and return the last element
    pub fn pop(&mut self) -> Arc4Result<Arc4Value> {
        let mut items = self.items()?;
        let last = items.pop().ok_or(Arc4Error::EmptyArray)?;
        debug!(ty = %self.value.type_descriptor(), len = items.len(), "pop");
        self.replace(&items)?;
        Ok(last)
    }

    /// New array holding the elements of `self` followed by those of `other`
    pub fn concat(&self, other: &DynamicArray) -> Arc4Result<Self> {
        other.value.expect_type(self.value.type_descriptor())?;
        let mut items = self.items()?;
        items.extend(other.items()?);
        Self::new(self.item.clone(), items)
    }

    /// Write-back handle to the element at `index`
    pub fn element(&mut self, index: isize) -> Arc4Result<ElementHandle<'_, Self>> {
        let i = resolve_index(index, self.len()?)?;
        Handle::open(self, i)
    }

    /// Decoded elements
    pub fn native(&self) -> Arc4Result<Native> {
        self.value.to_native()
    }
}

impl_arc4_type!(DynamicArray);

impl WriteBack for DynamicArray {
    type Key = usize;

    fn read(&self, key: &usize) -> Arc4Result<Arc4Value> {
        self.get(*key as isize)
    }

    fn write(&mut self, key: &usize, item: Arc4Value) -> Arc4Result<()> {
        item.expect_type(&self.item)?;
        let mut items = self.items()?;
        let len = items.len();
        let slot = items.get_mut(*key).ok_or(Arc4Error::IndexOutOfBounds {
            index: *key as isize,
            len,
        })?;
        *slot = item;
        debug!(ty = %self.value.type_descriptor(), index = *key, "set dynamic array element");
        self.replace(&items)
    }
}

impl TryFrom<Arc4Value> for DynamicArray {
    type Error = Arc4Error;

    fn try_from(value: Arc4Value) -> Result<Self, Self::Error> {
        let item = match value.type_descriptor() {
            TypeDescriptor::DynamicArray { item } => (**item).clone(),
            other => return Err(Arc4Error::mismatch("dynamic array", other.arc4_name())),
        };
        Ok(Self { item, value })
    }
}

/// `byte[]` with raw-buffer conveniences
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DynamicBytes {
    value: Arc4Value,
}

impl DynamicBytes {
    /// Encode a raw buffer
    pub fn new(bytes: &[u8]) -> Arc4Result<Self> {
        let encoded = encode_length_prefixed(bytes.len(), bytes)?;
        Ok(Self {
            value: Arc4Value::encoded(TypeDescriptor::dynamic_bytes(), encoded)?,
        })
    }

    /// Build from either a raw buffer or individual `byte` / `uint8` values
    ///
    /// Supplying both is rejected.
    pub fn from_parts(raw: Option<&[u8]>, values: Vec<Arc4Value>) -> Arc4Result<Self> {
        match raw {
            Some(_) if !values.is_empty() => Err(Arc4Error::InvalidValue(
                "cannot combine a raw buffer with individual byte values".to_string(),
            )),
            Some(raw) => Self::new(raw),
            None => {
                let bytes = values
                    .into_iter()
                    .map(|v| -> Arc4Result<u8> {
                        let byte = UInt::try_from(v)?;
                        if byte.bit_size() != 8 {
                            return Err(Arc4Error::mismatch("byte", byte.type_descriptor().arc4_name()));
                        }
                        Ok(byte.as_u64()? as u8)
                    })
                    .collect::<Arc4Result<Vec<u8>>>()?;
                Self::new(&bytes)
            }
        }
    }

    /// Wrap pre-encoded bytes without validating them
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            value: Arc4Value::from_bytes(TypeDescriptor::dynamic_bytes(), bytes),
        }
    }

    /// The raw buffer
    pub fn native(&self) -> Arc4Result<Vec<u8>> {
        match decode(self.value.type_descriptor(), self.value.bytes())? {
            Native::Bytes(bytes) => Ok(bytes),
            other => Err(Arc4Error::mismatch("bytes", other.kind())),
        }
    }

    /// Number of bytes
    pub fn len(&self) -> Arc4Result<usize> {
        split_length_prefix(self.value.bytes()).map(|(count, _)| count)
    }

    /// Whether the buffer is empty
    pub fn is_empty(&self) -> Arc4Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Add a byte at the end
    pub fn append(&mut self, byte: u8) -> Arc4Result<()> {
        self.extend(&[byte])
    }

    /// Add bytes at the end
    pub fn extend(&mut self, more: &[u8]) -> Arc4Result<()> {
        let mut bytes = self.native()?;
        bytes.extend_from_slice(more);
        debug!(len = bytes.len(), "extend bytes");
        *self = Self::new(&bytes)?;
        Ok(())
    }

    /// Remove and return the last byte
    pub fn pop(&mut self) -> Arc4Result<u8> {
        let mut bytes = self.native()?;
        let last = bytes.pop().ok_or(Arc4Error::EmptyArray)?;
        *self = Self::new(&bytes)?;
        Ok(last)
    }

    /// View as a generic dynamic array of `byte`
    pub fn to_array(&self) -> DynamicArray {
        DynamicArray {
            item: TypeDescriptor::Byte,
            value: self.value.clone(),
        }
    }
}

impl_arc4_type!(DynamicBytes);

impl TryFrom<Arc4Value> for DynamicBytes {
    type Error = Arc4Error;

    fn try_from(value: Arc4Value) -> Result<Self, Self::Error> {
        value.expect_type(&TypeDescriptor::dynamic_bytes())?;
        Ok(Self { value })
    }
}

/// 32-byte account address, laid out as `byte[32]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Arc4Address {
    value: Arc4Value,
}

impl Arc4Address {
    /// Encode an address
    pub fn new(address: Address) -> Self {
        Self {
            value: Arc4Value::from_bytes(TypeDescriptor::Address, address.as_bytes().to_vec()),
        }
    }

    /// Wrap pre-encoded bytes without validating them
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            value: Arc4Value::from_bytes(TypeDescriptor::Address, bytes),
        }
    }

    /// The decoded address
    pub fn native(&self) -> Arc4Result<Address> {
        let bytes = self.value.bytes();
        if bytes.len() != ADDRESS_LENGTH {
            return Err(Arc4Error::malformed(format!(
                "expected {} bytes for address, got {}",
                ADDRESS_LENGTH,
                bytes.len()
            )));
        }
        Ok(Address::from_slice(bytes)?)
    }

    /// Always 32
    pub fn len(&self) -> usize {
        ADDRESS_LENGTH
    }

    /// Always false
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Byte at `index`; negative indices count from the end
    pub fn get(&self, index: isize) -> Arc4Result<UInt> {
        let i = resolve_index(index, ADDRESS_LENGTH)?;
        let bytes = self.native()?;
        Ok(UInt::byte(bytes.as_bytes()[i]))
    }
}

impl_arc4_type!(Arc4Address);

impl From<Address> for Arc4Address {
    fn from(address: Address) -> Self {
        Self::new(address)
    }
}

impl FromStr for Arc4Address {
    type Err = Arc4Error;

    /// Parse the 58-character checksummed form
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(Address::from_str_checked(s)?))
    }
}

impl TryFrom<Arc4Value> for Arc4Address {
    type Error = Arc4Error;

    fn try_from(value: Arc4Value) -> Result<Self, Self::Error> {
        value.expect_type(&TypeDescriptor::Address)?;
        Ok(Self { value })
    }
}

impl fmt::Display for Arc4Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.native() {
            Ok(address) => write!(f, "{}", address),
            Err(_) => write!(f, "0x{}", hex::encode(self.bytes())),
        }
    }
}
