//! Size parameter parsing and validation.
//!
//! Sizes arrive as JSON numbers or digit strings. Only prefix lengths from
//! /16 to /28 are accepted by the handler; the allocator itself takes any
//! prefix length.

use serde_json::Value;

/// Largest block the handler will request
pub const MIN_SUBNET_SIZE: u8 = 16;

/// Smallest block the handler will request
pub const MAX_SUBNET_SIZE: u8 = 28;

/// Parse one size parameter, either an integer or a string of digits
pub fn parse_size(size: &Value) -> Option<u8> {
    match size {
        Value::Number(number) => number.as_u64().and_then(|n| u8::try_from(n).ok()),
        Value::String(text) if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) => {
            text.parse().ok()
        }
        _ => None,
    }
}

/// True when every size parsed and lies within the accepted range
pub fn sizes_valid(sizes: &[Option<u8>]) -> bool {
    sizes
        .iter()
        .all(|size| matches!(size, Some(n) if (MIN_SUBNET_SIZE..=MAX_SUBNET_SIZE).contains(n)))
}

/// The size as the caller wrote it, for error messages
pub fn raw_size(size: &Value) -> String {
    match size {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
