//! Tuples and structs

use tracing::debug;

use crate::error::{Arc4Error, Arc4Result};
use crate::handle::{FieldHandle, Handle, WriteBack};
use crate::layout::{decode_sequence, encode_sequence};
use crate::types::{StructType, TypeDescriptor};
use crate::value::{impl_arc4_type, Arc4Type, Arc4Value, Native};

/// Heterogeneous fixed-arity tuple, encoded as a bare head/tail body
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tuple {
    children: Vec<TypeDescriptor>,
    value: Arc4Value,
}

impl Tuple {
    /// Tuple of `items`; the tuple type is taken from the items
    pub fn new(items: Vec<Arc4Value>) -> Arc4Result<Self> {
        let children: Vec<TypeDescriptor> = items
            .iter()
            .map(|v| v.type_descriptor().clone())
            .collect();
        let ty = TypeDescriptor::tuple(children.clone());
        let value = Arc4Value::encoded(ty, encode_sequence(&items)?)?;
        Ok(Self { children, value })
    }

    /// Wrap pre-encoded bytes without validating them
    pub fn from_bytes(children: Vec<TypeDescriptor>, bytes: impl Into<Vec<u8>>) -> Self {
        let ty = TypeDescriptor::tuple(children.clone());
        Self {
            children,
            value: Arc4Value::from_bytes(ty, bytes),
        }
    }

    /// Element types
    pub fn child_types(&self) -> &[TypeDescriptor] {
        &self.children
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Whether this is the empty tuple
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Decode all elements
    pub fn items(&self) -> Arc4Result<Vec<Arc4Value>> {
        decode_sequence(&self.children, self.value.bytes())
    }

    /// Element at `index`
    pub fn get(&self, index: usize) -> Arc4Result<Arc4Value> {
        let len = self.len();
        self.items()?
            .into_iter()
            .nth(index)
            .ok_or(Arc4Error::IndexOutOfBounds {
                index: index as isize,
                len,
            })
    }

    /// Decoded elements
    pub fn native(&self) -> Arc4Result<Native> {
        self.value.to_native()
    }
}

impl_arc4_type!(Tuple);

impl TryFrom<Arc4Value> for Tuple {
    type Error = Arc4Error;

    fn try_from(value: Arc4Value) -> Result<Self, Self::Error> {
        let children = match value.type_descriptor() {
            TypeDescriptor::Tuple(children) => children.clone(),
            TypeDescriptor::Struct(s) => s.field_types(),
            other => return Err(Arc4Error::mismatch("tuple", other.arc4_name())),
        };
        let value = Arc4Value::from_bytes(TypeDescriptor::tuple(children.clone()), value.into_bytes());
        Ok(Self { children, value })
    }
}

/// Named tuple; fields are encoded in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Struct {
    def: StructType,
    value: Arc4Value,
}

impl Struct {
    /// Struct of type `def` with field values in declaration order
    pub fn new(def: StructType, values: Vec<Arc4Value>) -> Arc4Result<Self> {
        let ty = TypeDescriptor::Struct(def.clone());
        if values.len() != def.fields().len() {
            return Err(Arc4Error::mismatch(
                format!("{} {}", def.name(), ty),
                format!("{} values", values.len()),
            ));
        }
        for ((_, field_ty), v) in def.fields().iter().zip(&values) {
            v.expect_type(field_ty)?;
        }
        let value = Arc4Value::encoded(ty, encode_sequence(&values)?)?;
        Ok(Self { def, value })
    }

    /// Wrap pre-encoded bytes without validating them
    pub fn from_bytes(def: StructType, bytes: impl Into<Vec<u8>>) -> Self {
        let ty = TypeDescriptor::Struct(def.clone());
        Self {
            def,
            value: Arc4Value::from_bytes(ty, bytes),
        }
    }

    /// The struct declaration
    pub fn definition(&self) -> &StructType {
        &self.def
    }

    /// Decode all field values in declaration order
    pub fn values(&self) -> Arc4Result<Vec<Arc4Value>> {
        decode_sequence(&self.def.field_types(), self.value.bytes())
    }

    /// Decode all fields as `(name, value)` pairs
    pub fn fields(&self) -> Arc4Result<Vec<(String, Arc4Value)>> {
        Ok(self
            .def
            .field_names()
            .map(str::to_string)
            .zip(self.values()?)
            .collect())
    }

    /// Value of `name`
    pub fn field(&self, name: &str) -> Arc4Result<Arc4Value> {
        let index = self.def.field_index(name)?;
        let mut values = self.values()?;
        Ok(values.swap_remove(index))
    }

    /// Assign `name` and re-encode; fails on frozen structs
    pub fn set_field(&mut self, name: &str, value: Arc4Value) -> Arc4Result<()> {
        self.write(&name.to_string(), value)
    }

    /// Write-back handle to the field `name`
    pub fn field_handle(&mut self, name: &str) -> Arc4Result<FieldHandle<'_>> {
        self.def.field_index(name)?;
        Handle::open(self, name.to_string())
    }

    /// The tuple with the same fields; its bytes equal this struct's bytes
    pub fn to_tuple(&self) -> Tuple {
        Tuple::from_bytes(self.def.field_types(), self.value.bytes().to_vec())
    }

    /// Reinterpret a tuple as a struct of type `def`
    pub fn from_tuple(def: StructType, tuple: &Tuple) -> Arc4Result<Self> {
        let expected = def.as_tuple();
        tuple.as_value().expect_type(&expected)?;
        Ok(Self::from_bytes(def, tuple.bytes().to_vec()))
    }

    /// Decoded fields
    pub fn native(&self) -> Arc4Result<Native> {
        self.value.to_native()
    }
}

impl_arc4_type!(Struct);

impl WriteBack for Struct {
    type Key = String;

    fn read(&self, key: &String) -> Arc4Result<Arc4Value> {
        self.field(key)
    }

    fn write(&mut self, key: &String, value: Arc4Value) -> Arc4Result<()> {
        if self.def.is_frozen() {
            return Err(Arc4Error::Immutable(format!("{}.{}", self.def.name(), key)));
        }
        let index = self.def.field_index(key)?;
        value.expect_type(&self.def.fields()[index].1)?;
        let mut values = self.values()?;
        values[index] = value;
        debug!(name = self.def.name(), field = %key, "set struct field");
        self.value = Arc4Value::encoded(
            TypeDescriptor::Struct(self.def.clone()),
            encode_sequence(&values)?,
        )?;
        Ok(())
    }
}

impl TryFrom<Arc4Value> for Struct {
    type Error = Arc4Error;

    fn try_from(value: Arc4Value) -> Result<Self, Self::Error> {
        let def = match value.type_descriptor() {
            TypeDescriptor::Struct(def) => def.clone(),
            other => return Err(Arc4Error::mismatch("struct", other.arc4_name())),
        };
        Ok(Self { def, value })
    }
}
