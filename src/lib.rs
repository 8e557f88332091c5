//! # cidr-findr - find free IPv4 subnets inside a network
//!
//! This library allocates non-overlapping IPv4 CIDR blocks of requested
//! sizes from one or more parent networks, avoiding the subnets that already
//! exist there.
//!
//! ## Overview
//!
//! Allocation is a pure function of its inputs: the parent network CIDRs,
//! the existing subnet CIDRs, and an ordered list of requested prefix
//! lengths. Each request gets the lowest-addressed free block of exactly the
//! requested size, and every block handed out blocks later requests in the
//! same call. Either every request is satisfied or the call fails with a
//! single error.
//!
//! ## Architecture
//!
//! - `ip::range`: `AddressRange`, CIDR parsing/formatting and overlap tests
//! - `ip::allocator`: the first-fit search across parent networks
//! - `config` / `config_loader`: YAML allocation configs and VPC inventories
//! - `handler`: adapter for custom-resource lifecycle events
//!
//! ## Example Usage
//!
//! ```rust
//! use cidr_findr::ip::find_subnets;
//!
//! let allocated = find_subnets(
//!     &["10.0.0.0/16"],
//!     &["10.0.0.0/24", "10.0.1.0/24"],
//!     &[24, 24],
//! )?;
//!
//! assert_eq!(allocated, vec!["10.0.2.0/24", "10.0.3.0/24"]);
//! # Ok::<(), cidr_findr::ip::AllocationError>(())
//! ```
//!
//! ## Multiple Networks
//!
//! When several networks are given they are tried in the order of their
//! CIDR text, not their numeric address: `10.0.0.0/16` comes before
//! `9.0.0.0/16`. A request that does not fit in one network falls through to
//! the next.
//!
//! ## Error Handling
//!
//! The allocator returns `AllocationError` (built with `thiserror`):
//! malformed CIDRs, requests as large as the network, or no free space.
//! Application-level code (config loading, the CLI, the handler's
//! collaborators) uses `color_eyre::Result`.

pub mod config;
pub mod config_loader;
pub mod handler;
pub mod ip;
