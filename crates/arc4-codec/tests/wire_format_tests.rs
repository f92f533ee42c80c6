//! Wire format tests for arc4-codec
//!
//! Checks byte-exact encodings, bool packing, head/tail offsets, mutation
//! behaviour and the size limit through the public API.

use arc4_codec::{
    decode, encode, static_size, Address, Arc4Address, Arc4Error, Arc4String, Arc4Type,
    Arc4Value, Bool, DynamicArray, DynamicBytes, Native, StaticArray, Struct, StructType, Tuple,
    TypeDescriptor, UFixed, UInt, U512,
};

fn ty(s: &str) -> TypeDescriptor {
    TypeDescriptor::parse(s).unwrap()
}

fn encode_hex(type_str: &str, native: Native) -> String {
    hex::encode(encode(&ty(type_str), &native).unwrap())
}

// ==================== Known Vectors ====================

/// Scalar encodings are byte-exact
#[test]
fn test_scalar_vectors() {
    assert_eq!(encode_hex("uint64", 42u64.into()), "000000000000002a");
    assert_eq!(encode_hex("uint8", 0u64.into()), "00");
    assert_eq!(encode_hex("uint16", 0x1234u64.into()), "1234");
    assert_eq!(encode_hex("uint32", 0xffff_ffffu64.into()), "ffffffff");
    assert_eq!(
        encode_hex("uint128", 1u64.into()),
        "00000000000000000000000000000001"
    );
    assert_eq!(encode_hex("byte", 0xabu64.into()), "ab");
    assert_eq!(encode_hex("bool", true.into()), "80");
    assert_eq!(encode_hex("ufixed64x2", Native::Decimal("12.34".into())), "00000000000004d2");
    assert_eq!(encode_hex("string", "".into()), "0000");
}

/// Composite encodings are byte-exact
#[test]
fn test_composite_vectors() {
    assert_eq!(
        encode_hex("uint8[3]", Native::List(vec![1u64.into(), 2u64.into(), 3u64.into()])),
        "010203"
    );
    assert_eq!(
        encode_hex("uint8[]", Native::List(vec![1u64.into(), 2u64.into(), 3u64.into()])),
        "0003010203"
    );
    assert_eq!(
        encode_hex("(bool,uint8,bool)", Native::Tuple(vec![true.into(), 7u64.into(), true.into()])),
        "800780"
    );
    assert_eq!(
        encode_hex(
            "(string,bool,bool)",
            Native::Tuple(vec!["hi".into(), false.into(), true.into()])
        ),
        "00034000026869"
    );
}

/// Address encodes as 32 raw bytes with no prefix
#[test]
fn test_address_is_raw_bytes() {
    let addr = Address::from_bytes([0x11; 32]);
    let bytes = encode(&TypeDescriptor::Address, &Native::Address(addr)).unwrap();
    assert_eq!(bytes, vec![0x11; 32]);

    let text = addr.to_string();
    let from_text = encode(&TypeDescriptor::Address, &Native::Str(text)).unwrap();
    assert_eq!(from_text, bytes);
}

// ==================== Bool Packing ====================

/// Nine bools use two head bytes; the ninth starts a new byte
#[test]
fn test_nine_bools_in_tuple() {
    let values = [true, false, true, false, true, false, true, false, true];
    let native = Native::Tuple(values.iter().map(|&b| b.into()).collect());
    let type_str = format!("({})", vec!["bool"; 9].join(","));
    assert_eq!(encode_hex(&type_str, native.clone()), "aa80");
    assert_eq!(decode(&ty(&type_str), &[0xaa, 0x80]).unwrap(), native);
}

/// Exactly eight bools fill one byte
#[test]
fn test_eight_bools_one_byte() {
    let native = Native::List(vec![true.into(); 8]);
    assert_eq!(encode_hex("bool[8]", native), "ff");
}

/// A bool at the end of a nested tuple does not share a byte with the parent
#[test]
fn test_bool_run_stops_at_nested_boundary() {
    let native = Native::Tuple(vec![
        Native::Tuple(vec![7u64.into(), true.into()]),
        true.into(),
    ]);
    assert_eq!(encode_hex("((uint8,bool),bool)", native.clone()), "078080");
    assert_eq!(decode(&ty("((uint8,bool),bool)"), &[0x07, 0x80, 0x80]).unwrap(), native);
}

// ==================== Dynamic Offsets ====================

/// (uint64, string, uint64) puts the string at offset 18
#[test]
fn test_offset_after_static_head() {
    let bytes = encode(
        &ty("(uint64,string,uint64)"),
        &Native::Tuple(vec![1u64.into(), "ab".into(), 2u64.into()]),
    )
    .unwrap();
    assert_eq!(&bytes[8..10], &[0x00, 0x12]);
    assert_eq!(&bytes[18..], &[0x00, 0x02, b'a', b'b']);
    assert_eq!(bytes.len(), 22);
}

/// Offsets are relative to the start of each nested body
#[test]
fn test_nested_dynamic_offsets() {
    let native = Native::Tuple(vec![
        Native::List(vec!["a".into(), "b".into()]),
        "c".into(),
    ]);
    let bytes = encode(&ty("(string[],string)"), &native).unwrap();
    // outer head: 2 offsets = 4 bytes; array at 4 (2 + 4 + 3 + 3 = 12 bytes), string at 16
    assert_eq!(&bytes[..4], &[0x00, 0x04, 0x00, 0x10]);
    // inner array: count 2, inner offsets 4 and 7 relative to the inner body
    assert_eq!(&bytes[4..10], &[0x00, 0x02, 0x00, 0x04, 0x00, 0x07]);
    assert_eq!(decode(&ty("(string[],string)"), &bytes).unwrap(), native);
}

/// An empty dynamic array is just its zero length prefix
#[test]
fn test_empty_dynamic_array() {
    assert_eq!(encode_hex("(uint64,bool)[]", Native::List(vec![])), "0000");
    assert_eq!(decode(&ty("string[]"), &[0, 0]).unwrap(), Native::List(vec![]));
}

// ==================== Malformed Input ====================

/// Truncated and over-long buffers are rejected
#[test]
fn test_malformed_messages() {
    match decode(&ty("(uint64,uint64)"), &[0; 15]) {
        Err(Arc4Error::MalformedEncoding(msg)) => {
            assert_eq!(msg, "input string is not long enough to be decoded")
        }
        other => panic!("Expected MalformedEncoding, got {:?}", other),
    }
    match decode(&ty("(uint64,uint64)"), &[0; 17]) {
        Err(Arc4Error::MalformedEncoding(msg)) => {
            assert_eq!(msg, "input string was not fully consumed")
        }
        other => panic!("Expected MalformedEncoding, got {:?}", other),
    }
}

/// from_bytes accepts anything; errors surface on access
#[test]
fn test_lazy_validation() {
    let arr = DynamicArray::from_bytes(TypeDescriptor::uint64(), vec![0, 5, 1]);
    assert_eq!(arr.bytes(), &[0, 5, 1]);
    assert_eq!(arr.len().unwrap(), 5);
    assert!(arr.items().is_err());
    assert!(arr.get(0).is_err());
}

// ==================== Mutation ====================

/// append followed by pop leaves the bytes unchanged
#[test]
fn test_append_pop_idempotent() {
    let mut arr = DynamicArray::new(
        TypeDescriptor::String,
        vec![Arc4String::new("x").unwrap().into()],
    )
    .unwrap();
    let before = arr.bytes().to_vec();
    arr.append(Arc4String::new("yz").unwrap().into()).unwrap();
    assert_ne!(arr.bytes(), &before[..]);
    arr.pop().unwrap();
    assert_eq!(arr.bytes(), &before[..]);
}

/// Assigning an address into a uint64 array is a type mismatch
#[test]
fn test_set_wrong_type() {
    let mut arr = DynamicArray::new(TypeDescriptor::uint64(), vec![UInt::uint64(1).into()]).unwrap();
    let addr = Arc4Address::new(Address::ZERO);
    assert!(matches!(arr.set(0, addr.into()), Err(Arc4Error::TypeMismatch { .. })));
}

/// Nested arrays are re-encoded through element handles
#[test]
fn test_nested_write_back() {
    let inner = StaticArray::new(TypeDescriptor::Bool, 2, vec![Bool::new(false).into(); 2]).unwrap();
    let mut outer = DynamicArray::new(inner.type_descriptor().clone(), vec![inner.into()]).unwrap();
    outer
        .element(0)
        .unwrap()
        .modify(|a: &mut StaticArray| a.set(1, Bool::new(true).into()))
        .unwrap();
    assert_eq!(outer.bytes(), &[0x00, 0x01, 0x40]);
}

// ==================== Size Limit ====================

/// 2^512 does not fit uint512
#[test]
fn test_uint512_overflow() {
    assert!(UInt::new(512, U512::MAX).is_ok());
    assert!(matches!(UInt::new(256, U512::MAX), Err(Arc4Error::Range { .. })));
    let too_big = Native::Decimal("1".repeat(200));
    assert!(matches!(
        encode(&TypeDescriptor::ufixed(512, 1).unwrap(), &too_big),
        Err(Arc4Error::Range { .. })
    ));
}

/// A static array too large for any value is rejected, not allocated
#[test]
fn test_oversized_static_array_type() {
    let huge = ty("uint64[3000000000000000000]");
    assert_eq!(static_size(&huge), usize::MAX);
    assert!(matches!(decode(&huge, &[]), Err(Arc4Error::SizeLimit(_))));
    assert!(matches!(
        decode(&ty("uint8[100000000]"), &[]),
        Err(Arc4Error::SizeLimit(_))
    ));
    assert!(decode(&ty("uint64[512]"), &[0; 4096]).is_ok());
}

/// Growing a byte array past 4096 bytes fails and keeps the old value
#[test]
fn test_dynamic_bytes_size_limit() {
    let mut bytes = DynamicBytes::new(&[0u8; 4094]).unwrap();
    assert_eq!(bytes.bytes().len(), 4096);
    assert!(matches!(bytes.append(1), Err(Arc4Error::SizeLimit(_))));
    assert_eq!(bytes.len().unwrap(), 4094);
}

// ==================== Type Identity ====================

/// Values of different types never compare equal, even with equal bytes
#[test]
fn test_type_identity_equality() {
    assert_ne!(UInt::uint64(5), UInt::uint8(5));
    assert_eq!(UInt::uint64(5), 5u64);
    assert_eq!(UInt::uint8(5), 5u64);

    let as_uint8 = Arc4Value::from_bytes(TypeDescriptor::uint8(), vec![1]);
    let as_byte = Arc4Value::from_bytes(TypeDescriptor::Byte, vec![1]);
    assert_ne!(as_uint8, as_byte);
}

/// A struct encodes exactly like the tuple of its fields
#[test]
fn test_struct_tuple_equivalence() {
    let def = StructType::new(
        "S",
        vec![
            ("a".to_string(), TypeDescriptor::uint64()),
            ("b".to_string(), TypeDescriptor::Bool),
        ],
    )
    .unwrap();
    let s = Struct::new(def, vec![UInt::uint64(1).into(), Bool::new(true).into()]).unwrap();
    let t = Tuple::new(vec![UInt::uint64(1).into(), Bool::new(true).into()]).unwrap();
    assert_eq!(s.bytes(), t.bytes());
    assert_eq!(hex::encode(s.bytes()), "000000000000000180");
}

// ==================== Static Size ====================

/// Bool runs compact and dynamic children count two bytes
#[test]
fn test_static_size_vectors() {
    assert_eq!(static_size(&ty("bool[10]")), 2);
    assert_eq!(static_size(&ty("(uint64,byte[])")), 10);
    assert_eq!(static_size(&ty("(bool,bool,uint16,bool)")), 4);
    assert_eq!(static_size(&ty("(address,ufixed128x4)")), 48);
    assert_eq!(static_size(&ty("uint32[4][2]")), 32);
}

// ==================== UFixed ====================

/// Fixed-point values print with exactly `precision` fractional digits
#[test]
fn test_ufixed_display() {
    let v = UFixed::new(64, 4, "3.5").unwrap();
    assert_eq!(v.to_string(), "3.5000");
    assert_eq!(v.raw().unwrap(), U512::from(35000u64));
}
