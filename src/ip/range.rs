//! IPv4 address ranges.
//!
//! This file contains the `AddressRange` value type: a contiguous block of
//! IPv4 addresses `[base, top)` written in CIDR notation, plus the parsing,
//! formatting and overlap checks the allocator is built on.

use std::fmt;
use std::str::FromStr;

/// Number of bits in an IPv4 address
pub const ADDRESS_BITS: u8 = 32;

/// Errors raised while building an address range
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CidrError {
    #[error("Invalid CIDR '{cidr}': {reason}")]
    InvalidCidr { cidr: String, reason: String },

    #[error("Invalid prefix length /{0} (must be 0-32)")]
    InvalidPrefixLength(u8),

    #[error("Range {base}-{top} is not a power-of-two sized block")]
    InvalidRange { base: u32, top: u64 },
}

/// A contiguous IPv4 interval `[base, top)`.
///
/// `top` is kept as a `u64` so a block ending at 255.255.255.255 is exact.
/// The base address is taken as given; a misaligned CIDR such as
/// `10.0.0.1/24` is not corrected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AddressRange {
    base: u32,
    top: u64,
    prefix_length: u8,
}

impl AddressRange {
    /// Parse an `a.b.c.d/n` string
    pub fn parse_cidr(cidr: &str) -> Result<Self, CidrError> {
        let invalid = |reason: &str| CidrError::InvalidCidr {
            cidr: cidr.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = cidr.split('/').collect();
        if parts.len() != 2 {
            return Err(invalid("expected exactly one '/'"));
        }

        let base = ip_to_num(parts[0])
            .ok_or_else(|| invalid("address must be four dot-separated integers in 0-255"))?;

        let prefix_length = parse_decimal::<u8>(parts[1])
            .filter(|prefix| *prefix <= ADDRESS_BITS)
            .ok_or_else(|| invalid("prefix length must be an integer in 0-32"))?;

        Self::from_base_and_size(base, prefix_length)
    }

    /// Build a block of `2^(32 - prefix_length)` addresses starting at `base`.
    ///
    /// No alignment check is made.
    pub fn from_base_and_size(base: u32, prefix_length: u8) -> Result<Self, CidrError> {
        if prefix_length > ADDRESS_BITS {
            return Err(CidrError::InvalidPrefixLength(prefix_length));
        }

        Ok(AddressRange {
            base,
            top: u64::from(base) + block_size(prefix_length),
            prefix_length,
        })
    }

    /// Build a block from explicit bounds, deriving the prefix length.
    ///
    /// The size `top - base` must be a power of two no larger than 2^32.
    pub fn from_base_and_top(base: u32, top: u64) -> Result<Self, CidrError> {
        let invalid = CidrError::InvalidRange { base, top };

        let size = top.checked_sub(u64::from(base)).filter(|size| *size > 0).ok_or(invalid.clone())?;
        if !size.is_power_of_two() || size > block_size(0) {
            return Err(invalid);
        }

        // trailing_zeros of 2^k is k, and k <= 32 here
        let host_bits = size.trailing_zeros() as u8;

        Ok(AddressRange {
            base,
            top,
            prefix_length: ADDRESS_BITS - host_bits,
        })
    }

    /// Inclusive lower bound
    pub fn base(&self) -> u32 {
        self.base
    }

    /// Exclusive upper bound
    pub fn top(&self) -> u64 {
        self.top
    }

    pub fn prefix_length(&self) -> u8 {
        self.prefix_length
    }

    /// Number of addresses in the block
    pub fn size(&self) -> u64 {
        self.top - u64::from(self.base)
    }

    /// Format back to `a.b.c.d/n`
    pub fn to_cidr(&self) -> String {
        format!("{}/{}", num_to_ip(self.base), self.prefix_length)
    }

    /// True when the two half-open intervals share at least one address.
    ///
    /// Adjacent blocks (`self.top == other.base`) do not overlap.
    pub fn overlaps(&self, other: &AddressRange) -> bool {
        u64::from(self.base) < other.top && u64::from(other.base) < self.top
    }
}

impl fmt::Display for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_cidr())
    }
}

impl FromStr for AddressRange {
    type Err = CidrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_cidr(s)
    }
}

/// Number of addresses in a block with the given prefix length
pub fn block_size(prefix_length: u8) -> u64 {
    1u64 << (ADDRESS_BITS - prefix_length)
}

/// Convert a dotted quad to its big-endian integer value
pub fn ip_to_num(ip: &str) -> Option<u32> {
    let octets: Vec<&str> = ip.split('.').collect();
    if octets.len() != 4 {
        return None;
    }

    octets.iter().try_fold(0u32, |num, octet| {
        parse_decimal::<u8>(octet).map(|value| (num << 8) | u32::from(value))
    })
}

/// Convert an integer back to a dotted quad
pub fn num_to_ip(num: u32) -> String {
    let [a, b, c, d] = num.to_be_bytes();
    format!("{}.{}.{}.{}", a, b, c, d)
}

/// Parse a plain run of ASCII digits (no sign, no whitespace)
fn parse_decimal<T: FromStr>(text: &str) -> Option<T> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
