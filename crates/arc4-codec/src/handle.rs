//! Write-back handles into containers
//!
//! Reading an element or field always yields an independent copy. A
//! [`Handle`] pairs that copy with a mutable borrow of the owning container
//! and the element's key, so a modified copy can be written back through
//! the owner's setter. The borrow ends when the handle is consumed, so a
//! handle can never observe a stale container.

use crate::error::{Arc4Error, Arc4Result};
use crate::tuple::Struct;
use crate::value::{Arc4Type, Arc4Value};

/// A container whose children can be read and replaced by key
pub trait WriteBack {
    /// Index or field name
    type Key;

    /// Decode a fresh copy of the child at `key`
    fn read(&self, key: &Self::Key) -> Arc4Result<Arc4Value>;

    /// Replace the child at `key` and re-encode the container
    fn write(&mut self, key: &Self::Key, value: Arc4Value) -> Arc4Result<()>;
}

/// Copy of one child plus a back-reference to its owner
pub struct Handle<'a, C: WriteBack> {
    owner: &'a mut C,
    key: C::Key,
    value: Arc4Value,
}

/// Handle to an array element
pub type ElementHandle<'a, C> = Handle<'a, C>;

/// Handle to a struct field
pub type FieldHandle<'a> = Handle<'a, Struct>;

impl<'a, C: WriteBack> Handle<'a, C> {
    pub(crate) fn open(owner: &'a mut C, key: C::Key) -> Arc4Result<Self> {
        let value = owner.read(&key)?;
        Ok(Self { owner, key, value })
    }

    /// The child as read when the handle was opened
    pub fn get(&self) -> &Arc4Value {
        &self.value
    }

    /// The child's key in its owner
    pub fn key(&self) -> &C::Key {
        &self.key
    }

    /// Replace the child with `value`
    pub fn set(self, value: Arc4Value) -> Arc4Result<()> {
        self.owner.write(&self.key, value)
    }

    /// Transform the child and write the result back
    pub fn update<F>(self, f: F) -> Arc4Result<()>
    where
        F: FnOnce(Arc4Value) -> Arc4Result<Arc4Value>,
    {
        let updated = f(self.value)?;
        self.owner.write(&self.key, updated)
    }

    /// Mutate the child through its typed wrapper and write it back
    ///
    /// Used for nested containers, e.g. appending to an inner array of a
    /// `uint64[][]`.
    pub fn modify<T, F>(self, f: F) -> Arc4Result<()>
    where
        T: Arc4Type + TryFrom<Arc4Value, Error = Arc4Error>,
        F: FnOnce(&mut T) -> Arc4Result<()>,
    {
        let mut typed = T::try_from(self.value)?;
        f(&mut typed)?;
        self.owner.write(&self.key, typed.into_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::{DynamicArray, StaticArray};
    use crate::types::{StructType, TypeDescriptor};
    use crate::uint::{Bool, UInt};

    fn nested() -> DynamicArray {
        let inner = |xs: &[u64]| {
            DynamicArray::new(
                TypeDescriptor::uint64(),
                xs.iter().map(|&x| UInt::uint64(x).into()).collect(),
            )
            .unwrap()
        };
        DynamicArray::new(
            TypeDescriptor::dynamic_array(TypeDescriptor::uint64()),
            vec![inner(&[1]).into(), inner(&[2, 3]).into()],
        )
        .unwrap()
    }

    #[test]
    fn test_element_handle_set() {
        let mut arr = StaticArray::new(
            TypeDescriptor::uint8(),
            3,
            vec![UInt::uint8(1).into(), UInt::uint8(2).into(), UInt::uint8(3).into()],
        )
        .unwrap();
        let handle = arr.element(-1).unwrap();
        assert_eq!(*handle.key(), 2);
        assert_eq!(handle.get(), &Arc4Value::from(UInt::uint8(3)));
        handle.set(UInt::uint8(9).into()).unwrap();
        assert_eq!(arr.bytes(), &[1, 2, 9]);
    }

    #[test]
    fn test_nested_modify_writes_back() {
        let mut outer = nested();
        outer
            .element(0)
            .unwrap()
            .modify(|inner: &mut DynamicArray| inner.append(UInt::uint64(7).into()))
            .unwrap();

        let first = DynamicArray::try_from(outer.get(0).unwrap()).unwrap();
        assert_eq!(first.len().unwrap(), 2);
        assert_eq!(first.get(1).unwrap(), Arc4Value::from(UInt::uint64(7)));
        // second element shifted but unchanged
        let second = DynamicArray::try_from(outer.get(1).unwrap()).unwrap();
        assert_eq!(second.len().unwrap(), 2);
    }

    #[test]
    fn test_plain_read_does_not_alias() {
        let outer = nested();
        let before = outer.bytes().to_vec();
        let mut copy = DynamicArray::try_from(outer.get(0).unwrap()).unwrap();
        copy.append(UInt::uint64(5).into()).unwrap();
        assert_eq!(outer.bytes(), &before[..]);
    }

    #[test]
    fn test_field_handle_update() {
        let def = StructType::new(
            "Flags",
            vec![
                ("count".to_string(), TypeDescriptor::uint8()),
                ("on".to_string(), TypeDescriptor::Bool),
            ],
        )
        .unwrap();
        let mut s = Struct::new(def, vec![UInt::uint8(1).into(), Bool::new(false).into()]).unwrap();
        s.field_handle("on")
            .unwrap()
            .update(|_| Ok(Bool::new(true).into()))
            .unwrap();
        assert_eq!(s.bytes(), &[0x01, 0x80]);
    }

    #[test]
    fn test_handle_rejects_wrong_type() {
        let mut arr = nested();
        let err = arr.element(0).unwrap().set(UInt::uint64(1).into()).unwrap_err();
        assert!(matches!(err, Arc4Error::TypeMismatch { .. }));
    }
}
