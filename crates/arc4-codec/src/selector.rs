//! Method signatures and selectors

use arc4_primitives::sha512_256;

use crate::constants::SELECTOR_LENGTH;
use crate::types::TypeDescriptor;

/// Build `name(arg1,arg2,...)ret` from ARC4 type names
///
/// A method without a return value uses `void`.
pub fn method_signature(
    name: &str,
    args: &[TypeDescriptor],
    returns: Option<&TypeDescriptor>,
) -> String {
    let args: Vec<String> = args.iter().map(TypeDescriptor::arc4_name).collect();
    let returns = returns
        .map(TypeDescriptor::arc4_name)
        .unwrap_or_else(|| "void".to_string());
    format!("{}({}){}", name, args.join(","), returns)
}

/// First 4 bytes of the SHA-512/256 digest of a method signature
pub fn method_selector(signature: &str) -> [u8; SELECTOR_LENGTH] {
    let hash = sha512_256(signature.as_bytes());
    let mut selector = [0u8; SELECTOR_LENGTH];
    selector.copy_from_slice(&hash.as_bytes()[..SELECTOR_LENGTH]);
    selector
}
