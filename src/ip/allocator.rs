//! Subnet allocation logic.
//!
//! This file contains the first-fit search that places requested blocks
//! inside one or more parent networks, avoiding the subnets that already
//! exist there and every block handed out earlier in the same call.

use super::range::{block_size, AddressRange, CidrError, ADDRESS_BITS};

/// Errors raised while allocating subnets
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AllocationError {
    #[error(transparent)]
    Cidr(#[from] CidrError),

    #[error("Can't fit a /{requested} subnet in a /{network} network")]
    SizeTooLarge { requested: u8, network: u8 },

    #[error("Not enough space for the requested CIDR blocks")]
    InsufficientSpace { requested: u8 },

    #[error("No network CIDR blocks were supplied")]
    NoNetworks,
}

/// One parent network and the blocks already taken inside it
#[derive(Debug, Clone)]
pub struct Network {
    range: AddressRange,
    subnets: Vec<AddressRange>,
}

impl Network {
    pub fn new(range: AddressRange, subnets: Vec<AddressRange>) -> Self {
        Network { range, subnets }
    }

    pub fn range(&self) -> &AddressRange {
        &self.range
    }

    /// Existing subnets plus everything allocated so far, in insertion order
    pub fn subnets(&self) -> &[AddressRange] {
        &self.subnets
    }

    /// Find the lowest free block of the requested prefix length without
    /// reserving it.
    ///
    /// Candidates start at the network base and advance by the block size.
    pub fn find_slot(&self, requested: u8) -> Result<AddressRange, AllocationError> {
        if requested > ADDRESS_BITS {
            return Err(CidrError::InvalidPrefixLength(requested).into());
        }

        if requested <= self.range.prefix_length() {
            return Err(AllocationError::SizeTooLarge {
                requested,
                network: self.range.prefix_length(),
            });
        }

        let step = block_size(requested);
        let mut candidate_base = u64::from(self.range.base());

        while candidate_base < self.range.top() {
            let Ok(base) = u32::try_from(candidate_base) else {
                break;
            };

            let candidate = AddressRange::from_base_and_size(base, requested)?;
            if candidate.top() > self.range.top() {
                break;
            }

            if !self.subnets.iter().any(|subnet| candidate.overlaps(subnet)) {
                return Ok(candidate);
            }

            candidate_base += step;
        }

        Err(AllocationError::InsufficientSpace { requested })
    }

    /// Find the lowest free block and reserve it
    pub fn next_subnet(&mut self, requested: u8) -> Result<AddressRange, AllocationError> {
        let slot = self.find_slot(requested)?;
        self.subnets.push(slot);
        Ok(slot)
    }
}

/// Allocation context for a single call: the candidate parents, tried in
/// order, each with its own obstacle list.
#[derive(Debug, Clone)]
pub struct CidrFindr {
    networks: Vec<Network>,
}

impl CidrFindr {
    /// Build the context from CIDR strings.
    ///
    /// Both lists are sorted as text before parsing, so `10.0.0.0/16` is
    /// tried before `9.0.0.0/16`. A subnet joins the obstacle list of every
    /// network it overlaps; overlapping networks are not rejected.
    pub fn new<N, S>(networks: &[N], subnets: &[S]) -> Result<Self, AllocationError>
    where
        N: AsRef<str>,
        S: AsRef<str>,
    {
        let networks = sorted_ranges(networks)?;
        if networks.is_empty() {
            return Err(AllocationError::NoNetworks);
        }

        let subnets = sorted_ranges(subnets)?;

        let networks = networks
            .into_iter()
            .map(|network| {
                let inside = subnets
                    .iter()
                    .filter(|subnet| subnet.overlaps(&network))
                    .copied()
                    .collect();
                Network::new(network, inside)
            })
            .collect();

        Ok(CidrFindr { networks })
    }

    pub fn networks(&self) -> &[Network] {
        &self.networks
    }

    /// Place one block in the first network that has room for it.
    ///
    /// Fails with `SizeTooLarge` only when every network is too small for
    /// the request, otherwise with `InsufficientSpace`.
    pub fn next_subnet(&mut self, requested: u8) -> Result<AddressRange, AllocationError> {
        let mut too_large = None;
        let mut exhausted = false;
        let mut found = None;

        for network in &self.networks {
            match network.find_slot(requested) {
                Ok(slot) => {
                    found = Some(slot);
                    break;
                }
                Err(err @ AllocationError::SizeTooLarge { .. }) => {
                    log::debug!("{} is too small for a /{}", network.range, requested);
                    too_large.get_or_insert(err);
                }
                Err(AllocationError::InsufficientSpace { .. }) => {
                    log::debug!("No free /{} left in {}", requested, network.range);
                    exhausted = true;
                }
                Err(err) => return Err(err),
            }
        }

        match (found, too_large) {
            (Some(slot), _) => {
                self.reserve(slot);
                Ok(slot)
            }
            (None, Some(err)) if !exhausted => Err(err),
            (None, _) => Err(AllocationError::InsufficientSpace { requested }),
        }
    }

    /// Allocate one block per requested prefix length, in order.
    ///
    /// Either every request is satisfied and the context keeps the new
    /// blocks, or the first failure is returned and the context is left
    /// untouched.
    pub fn allocate(&mut self, sizes: &[u8]) -> Result<Vec<String>, AllocationError> {
        let mut scratch = self.clone();

        let allocated = sizes
            .iter()
            .map(|&requested| scratch.next_subnet(requested).map(|slot| slot.to_cidr()))
            .collect::<Result<Vec<_>, _>>()?;

        *self = scratch;
        Ok(allocated)
    }

    /// Record a new block as an obstacle in every network it falls inside
    fn reserve(&mut self, slot: AddressRange) {
        for network in self.networks.iter_mut().filter(|network| network.range.overlaps(&slot)) {
            network.subnets.push(slot);
        }
        log::debug!("Reserved {}", slot);
    }
}

/// Find free blocks for `sizes` inside `networks`, avoiding `subnets`.
///
/// Returns the allocated CIDRs in request order.
pub fn find_subnets<N, S>(networks: &[N], subnets: &[S], sizes: &[u8]) -> Result<Vec<String>, AllocationError>
where
    N: AsRef<str>,
    S: AsRef<str>,
{
    CidrFindr::new(networks, subnets)?.allocate(sizes)
}

fn sorted_ranges<T: AsRef<str>>(cidrs: &[T]) -> Result<Vec<AddressRange>, CidrError> {
    let mut sorted: Vec<&str> = cidrs.iter().map(AsRef::as_ref).collect();
    sorted.sort_unstable();
    sorted.into_iter().map(AddressRange::parse_cidr).collect()
}
