//! Scalar codecs: unsigned integers, booleans and fixed-point decimals

use arc4_primitives::U512;

use crate::constants::{BOOL_FALSE_BYTE, BOOL_TRUE_BYTE};
use crate::error::{Arc4Error, Arc4Result};

/// Number of bytes in a `U512`
const U512_BYTES: usize = 64;

/// Encode an unsigned integer as `bit_size / 8` big-endian bytes
pub fn encode_uint(value: &U512, bit_size: u16, type_name: &str) -> Arc4Result<Vec<u8>> {
    if value.bits() > bit_size as usize {
        return Err(Arc4Error::range(type_name, value));
    }
    let mut buf = [0u8; U512_BYTES];
    value.to_big_endian(&mut buf);
    Ok(buf[U512_BYTES - bit_size as usize / 8..].to_vec())
}

/// Decode a big-endian unsigned integer of exactly `bit_size / 8` bytes
pub fn decode_uint(bytes: &[u8], bit_size: u16) -> Arc4Result<U512> {
    let expected = bit_size as usize / 8;
    if bytes.len() != expected || expected > U512_BYTES {
        return Err(Arc4Error::malformed(format!(
            "expected {} bytes for uint{}, got {}",
            expected,
            bit_size,
            bytes.len()
        )));
    }
    Ok(U512::from_big_endian(bytes))
}

/// Encode a boolean as a single byte with the value in the high bit
pub fn encode_bool(value: bool) -> u8 {
    if value {
        BOOL_TRUE_BYTE
    } else {
        BOOL_FALSE_BYTE
    }
}

/// Decode a single-byte boolean
pub fn decode_bool(bytes: &[u8]) -> Arc4Result<bool> {
    match bytes {
        [byte] => Ok(*byte == BOOL_TRUE_BYTE),
        _ => Err(Arc4Error::malformed(format!(
            "expected 1 byte for bool, got {}",
            bytes.len()
        ))),
    }
}

/// Parse a decimal literal into its integer representation scaled by `10^precision`
///
/// At most `precision` fractional digits are accepted.
pub fn parse_ufixed(literal: &str, precision: u8) -> Arc4Result<U512> {
    if literal.starts_with('-') {
        return Err(Arc4Error::InvalidValue(format!(
            "negative value not allowed for unsigned fixed-point: {}",
            literal
        )));
    }
    let (whole, fraction) = literal.split_once('.').unwrap_or((literal, ""));
    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction) {
        return Err(Arc4Error::InvalidValue(format!(
            "invalid decimal literal: {:?}",
            literal
        )));
    }
    let precision = precision as usize;
    if fraction.len() > precision {
        return Err(Arc4Error::InvalidValue(format!(
            "{} has more than {} fractional digits",
            literal, precision
        )));
    }

    let mut digits = String::with_capacity(whole.len() + precision);
    digits.push_str(whole);
    digits.push_str(fraction);
    digits.extend(std::iter::repeat('0').take(precision - fraction.len()));
    U512::from_dec_str(&digits)
        .map_err(|_| Arc4Error::range("ufixed", literal))
}

/// Format a scaled integer as `whole.fraction` with exactly `precision` fractional digits
pub fn format_ufixed(value: &U512, precision: u8) -> String {
    let precision = precision as usize;
    let mut digits = value.to_string();
    if digits.len() <= precision {
        let padding = "0".repeat(precision + 1 - digits.len());
        digits.insert_str(0, &padding);
    }
    if precision == 0 {
        return digits;
    }
    let split = digits.len() - precision;
    format!("{}.{}", &digits[..split], &digits[split..])
}
