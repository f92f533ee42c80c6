//! Head/tail layout of composite values
//!
//! A sequence body (tuple, struct, static array, or the part of a dynamic
//! array after its length prefix) is laid out as a head region followed by
//! a tail region:
//!
//! - static elements are written into the head as-is;
//! - runs of up to 8 consecutive booleans share one head byte, first
//!   boolean in the most significant bit;
//! - dynamic elements get a 2-byte big-endian offset in the head, pointing
//!   at their encoding in the tail. Offsets are relative to the first head
//!   byte.

use bytes::{BufMut, BytesMut};
use tracing::trace;

use crate::constants::{
    BOOLS_PER_BYTE, BOOL_FALSE_BYTE, BOOL_TRUE_BYTE, LENGTH_PREFIX_SIZE, MAX_ARRAY_LENGTH,
    MAX_BYTES_SIZE,
};
use crate::error::{Arc4Error, Arc4Result};
use crate::scalar::decode_bool;
use crate::types::TypeDescriptor;
use crate::value::Arc4Value;

const NOT_LONG_ENOUGH: &str = "input string is not long enough to be decoded";
const NOT_FULLY_CONSUMED: &str = "input string was not fully consumed";

/// One head entry of a sequence being encoded
enum HeadSlot {
    Static(Vec<u8>),
    Offset,
}

impl HeadSlot {
    fn len(&self) -> usize {
        match self {
            HeadSlot::Static(bytes) => bytes.len(),
            HeadSlot::Offset => LENGTH_PREFIX_SIZE,
        }
    }
}

/// Where a decoded child's bytes come from
enum ChildSlot {
    Static(Vec<u8>),
    Dynamic(usize),
}

/// Number of consecutive booleans starting at `start`, capped at 8
fn bool_run_length(len: usize, start: usize, is_bool: impl Fn(usize) -> bool) -> usize {
    (start..len.min(start + BOOLS_PER_BYTE))
        .take_while(|&i| is_bool(i))
        .count()
}

/// Convert a length or offset to its 2-byte wire form
pub fn as_u16(value: usize) -> Arc4Result<u16> {
    u16::try_from(value)
        .map_err(|_| Arc4Error::SizeLimit(format!("{} does not fit in 16 bits", value)))
}

/// Encode the body of a fixed-arity sequence from already-encoded children
pub fn encode_sequence(values: &[Arc4Value]) -> Arc4Result<Vec<u8>> {
    let mut heads = Vec::with_capacity(values.len());
    let mut tails: Vec<&[u8]> = Vec::new();

    let mut i = 0;
    while i < values.len() {
        let value = &values[i];
        let ty = value.type_descriptor();
        if ty.is_bool() {
            let run = bool_run_length(values.len(), i, |j| values[j].type_descriptor().is_bool());
            let mut packed = 0u8;
            for (offset, item) in values[i..i + run].iter().enumerate() {
                if decode_bool(item.bytes())? {
                    packed |= 1 << (7 - offset);
                }
            }
            heads.push(HeadSlot::Static(vec![packed]));
            i += run;
        } else if ty.is_dynamic() {
            heads.push(HeadSlot::Offset);
            tails.push(value.bytes());
            i += 1;
        } else {
            let expected = static_size(ty);
            if value.bytes().len() != expected {
                return Err(Arc4Error::malformed(format!(
                    "{} element has {} bytes, expected {}",
                    ty,
                    value.bytes().len(),
                    expected
                )));
            }
            heads.push(HeadSlot::Static(value.bytes().to_vec()));
            i += 1;
        }
    }

    let head_length: usize = heads.iter().map(HeadSlot::len).sum();
    let tail_length: usize = tails.iter().map(|t| t.len()).sum();
    trace!(
        elements = values.len(),
        head_length,
        tail_length,
        dynamic = tails.len(),
        "encode sequence"
    );

    let mut out = BytesMut::with_capacity(head_length + tail_length);
    let mut tail_offset = head_length;
    let mut next_tail = 0;
    for head in heads {
        match head {
            HeadSlot::Static(bytes) => out.put_slice(&bytes),
            HeadSlot::Offset => {
                out.put_u16(as_u16(tail_offset)?);
                tail_offset += tails[next_tail].len();
                next_tail += 1;
            }
        }
    }
    for tail in tails {
        out.put_slice(tail);
    }
    Ok(out.to_vec())
}

/// Split a sequence body into its children, one per entry of `types`
///
/// Children are returned undecoded; their own structure is checked when
/// they are read.
pub fn decode_sequence(types: &[TypeDescriptor], buffer: &[u8]) -> Arc4Result<Vec<Arc4Value>> {
    let mut children = Vec::with_capacity(types.len());
    let mut segment_starts: Vec<usize> = Vec::new();
    let mut cursor = 0;

    let mut i = 0;
    while i < types.len() {
        let ty = &types[i];
        if ty.is_bool() {
            let run = bool_run_length(types.len(), i, |j| types[j].is_bool());
            let packed = *buffer
                .get(cursor)
                .ok_or_else(|| Arc4Error::malformed(NOT_LONG_ENOUGH))?;
            for offset in 0..run {
                let bit = if packed & (0x80 >> offset) != 0 {
                    BOOL_TRUE_BYTE
                } else {
                    BOOL_FALSE_BYTE
                };
                children.push(ChildSlot::Static(vec![bit]));
            }
            cursor += 1;
            i += run;
        } else if ty.is_dynamic() {
            let offset = read_u16(buffer, cursor)?;
            segment_starts.push(offset as usize);
            children.push(ChildSlot::Dynamic(segment_starts.len() - 1));
            cursor += LENGTH_PREFIX_SIZE;
            i += 1;
        } else {
            let end = cursor.saturating_add(static_size(ty));
            let bytes = buffer
                .get(cursor..end)
                .ok_or_else(|| Arc4Error::malformed(NOT_LONG_ENOUGH))?;
            children.push(ChildSlot::Static(bytes.to_vec()));
            cursor = end;
            i += 1;
        }
    }

    if segment_starts.is_empty() {
        if cursor < buffer.len() {
            return Err(Arc4Error::malformed(NOT_FULLY_CONSUMED));
        }
    } else {
        // Segment i ends where segment i + 1 starts; the last one ends the buffer
        let mut previous = cursor;
        for &start in &segment_starts {
            if start < previous || start > buffer.len() {
                return Err(Arc4Error::malformed(format!(
                    "dynamic offset {} outside tail region {}..{}",
                    start,
                    previous,
                    buffer.len()
                )));
            }
            previous = start;
        }
    }
    trace!(
        elements = types.len(),
        head_length = cursor,
        dynamic = segment_starts.len(),
        "decode sequence"
    );

    let segment = |index: usize| {
        let start = segment_starts[index];
        let end = segment_starts
            .get(index + 1)
            .copied()
            .unwrap_or(buffer.len());
        buffer[start..end].to_vec()
    };
    Ok(types
        .iter()
        .zip(children)
        .map(|(ty, child)| {
            let bytes = match child {
                ChildSlot::Static(bytes) => bytes,
                ChildSlot::Dynamic(index) => segment(index),
            };
            Arc4Value::from_bytes(ty.clone(), bytes)
        })
        .collect())
}

/// Prefix an encoded body with a 2-byte element count
pub fn encode_length_prefixed(count: usize, body: &[u8]) -> Arc4Result<Vec<u8>> {
    let mut out = BytesMut::with_capacity(LENGTH_PREFIX_SIZE + body.len());
    out.put_u16(as_u16(count)?);
    out.put_slice(body);
    Ok(out.to_vec())
}

/// Split a length-prefixed encoding into its count and body
pub fn split_length_prefix(bytes: &[u8]) -> Arc4Result<(usize, &[u8])> {
    let count = read_u16(bytes, 0)?;
    Ok((count as usize, &bytes[LENGTH_PREFIX_SIZE..]))
}

fn read_u16(buffer: &[u8], at: usize) -> Arc4Result<u16> {
    match buffer.get(at..at + LENGTH_PREFIX_SIZE) {
        Some(&[hi, lo]) => Ok(u16::from_be_bytes([hi, lo])),
        _ => Err(Arc4Error::malformed(NOT_LONG_ENOUGH)),
    }
}

/// Child types of a static array with `size` elements
///
/// Fails with `SizeLimit` when the array could never fit in one value, so
/// oversized declarations are rejected before anything is allocated.
pub fn repeat_type(item: &TypeDescriptor, size: usize) -> Arc4Result<Vec<TypeDescriptor>> {
    let head = if item.is_bool() {
        size.div_ceil(BOOLS_PER_BYTE)
    } else {
        static_size(item).saturating_mul(size)
    };
    if size > MAX_ARRAY_LENGTH || head > MAX_BYTES_SIZE {
        return Err(Arc4Error::SizeLimit(format!(
            "{}[{}] cannot fit in {} bytes",
            item, size, MAX_BYTES_SIZE
        )));
    }
    Ok(vec![item.clone(); size])
}

/// Byte length a type occupies in its parent's head
///
/// Dynamic arrays and strings count only their 2-byte offset; static
/// composites are summed with booleans packed 8 to a byte. Sizes too large
/// for `usize` saturate at `usize::MAX`.
pub fn static_size(ty: &TypeDescriptor) -> usize {
    match ty {
        TypeDescriptor::UInt { bit_size } | TypeDescriptor::UFixed { bit_size, .. } => {
            *bit_size as usize / 8
        }
        TypeDescriptor::Byte | TypeDescriptor::Bool => 1,
        TypeDescriptor::String | TypeDescriptor::DynamicArray { .. } => LENGTH_PREFIX_SIZE,
        TypeDescriptor::StaticArray { item, size } => {
            if item.is_bool() {
                size.div_ceil(BOOLS_PER_BYTE)
            } else {
                static_size(item).saturating_mul(*size)
            }
        }
        TypeDescriptor::Address => crate::constants::ADDRESS_LENGTH,
        TypeDescriptor::Tuple(children) => sequence_size(children),
        TypeDescriptor::Struct(s) => sequence_size(&s.field_types()),
    }
}

fn sequence_size(types: &[TypeDescriptor]) -> usize {
    let mut size: usize = 0;
    let mut i = 0;
    while i < types.len() {
        if types[i].is_bool() {
            i += bool_run_length(types.len(), i, |j| types[j].is_bool());
            size = size.saturating_add(1);
        } else {
            size = size.saturating_add(static_size(&types[i]));
            i += 1;
        }
    }
    size
}
