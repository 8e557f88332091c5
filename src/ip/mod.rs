//! IPv4 range and subnet allocation module.
//!
//! This module holds the address range value type and the first-fit
//! allocator that places requested blocks inside parent networks.

pub mod range;
pub mod allocator;

// Re-export commonly used types
pub use range::{AddressRange, CidrError};
pub use allocator::{find_subnets, AllocationError, CidrFindr, Network};
