//! IPv4 prefix arithmetic
//!
//! Addresses are handled as big-endian `u32`s; block sizes and offsets are
//! widened to `u64` so a `/0` block (2^32 addresses) is representable and
//! additions past `255.255.255.255` are detected instead of wrapping.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use crate::domain::error::DomainError;

/// Number of bits in an IPv4 address.
pub const ADDRESS_BITS: u8 = 32;

// ============================================================================
// Masks and prefixes
// ============================================================================

/// Netmask for a prefix length: `/24` → `255.255.255.0`.
pub fn mask_for_prefix(prefix: u8) -> Ipv4Addr {
    Ipv4Addr::from(mask_bits(prefix))
}

/// Wildcard (inverse) mask for a prefix length: `/24` → `0.0.0.255`.
pub fn wildcard_for_prefix(prefix: u8) -> Ipv4Addr {
    Ipv4Addr::from(!mask_bits(prefix))
}

fn mask_bits(prefix: u8) -> u32 {
    u32::MAX
        .checked_shl(u32::from(ADDRESS_BITS.saturating_sub(prefix)))
        .unwrap_or(0)
}

/// Prefix length of a netmask, by population count.
///
/// Fails for masks whose one-bits are not a contiguous run from the top.
pub fn prefix_from_mask(mask: Ipv4Addr) -> Result<u8, DomainError> {
    let bits = u32::from(mask);
    let prefix = bits.count_ones() as u8;
    if mask_bits(prefix) == bits {
        Ok(prefix)
    } else {
        Err(DomainError::NonContiguousMask(mask))
    }
}

/// Usable hosts in a block: `2^(32-n) - 2`, except `/31` (2) and `/32` (1).
pub fn host_count(prefix: u8) -> u64 {
    match prefix {
        32 => 1,
        31 => 2,
        n => block_size(n) - 2,
    }
}

/// Addresses in a block of the given prefix length.
pub fn block_size(prefix: u8) -> u64 {
    1u64 << (ADDRESS_BITS - prefix.min(ADDRESS_BITS))
}

/// Smallest `b` with `2^b >= n` (`n >= 1`).
fn ceil_log2(n: u64) -> u32 {
    n.checked_next_power_of_two()
        .map_or(u64::BITS, |power| power.trailing_zeros())
}

// ============================================================================
// Parsing
// ============================================================================

/// Parse a dotted-quad address.
pub fn parse_address(text: &str) -> Result<Ipv4Addr, DomainError> {
    Ipv4Addr::from_str(text.trim()).map_err(|_| DomainError::invalid_address(text.trim()))
}

/// Parse a prefix length, with or without its leading `/`.
pub fn parse_prefix(text: &str) -> Result<u8, DomainError> {
    let digits = text.trim().trim_start_matches('/');
    match digits.parse::<u8>() {
        Ok(prefix) if prefix <= ADDRESS_BITS => Ok(prefix),
        _ => Err(DomainError::invalid_prefix(text.trim())),
    }
}

// ============================================================================
// Ipv4Net
// ============================================================================

/// An address with a prefix length, as written (`192.168.1.77/24`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv4Net {
    address: Ipv4Addr,
    prefix: u8,
}

impl Ipv4Net {
    pub fn new(address: Ipv4Addr, prefix: u8) -> Result<Self, DomainError> {
        if prefix > ADDRESS_BITS {
            return Err(DomainError::invalid_prefix(prefix.to_string()));
        }
        Ok(Self { address, prefix })
    }

    /// Parse `a.b.c.d/n`.
    pub fn parse(text: &str) -> Result<Self, DomainError> {
        let text = text.trim();
        let (address, prefix) = text
            .split_once('/')
            .ok_or_else(|| DomainError::malformed("network", format!("`{text}` has no prefix")))?;
        Self::new(parse_address(address)?, parse_prefix(prefix)?)
    }

    pub fn address(&self) -> Ipv4Addr {
        self.address
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    pub fn mask(&self) -> Ipv4Addr {
        mask_for_prefix(self.prefix)
    }

    pub fn wildcard(&self) -> Ipv4Addr {
        wildcard_for_prefix(self.prefix)
    }

    /// First address of the block.
    pub fn network(&self) -> Ipv4Addr {
        Ipv4Addr::from(u32::from(self.address) & mask_bits(self.prefix))
    }

    /// Last address of the block.
    pub fn broadcast(&self) -> Ipv4Addr {
        Ipv4Addr::from(u32::from(self.address) | !mask_bits(self.prefix))
    }

    /// The same block, anchored at its network address.
    pub fn trunc(&self) -> Self {
        Self {
            address: self.network(),
            prefix: self.prefix,
        }
    }

    pub fn size(&self) -> u64 {
        block_size(self.prefix)
    }

    pub fn host_count(&self) -> u64 {
        host_count(self.prefix)
    }

    /// First and last usable host addresses.
    pub fn host_range(&self) -> (Ipv4Addr, Ipv4Addr) {
        let network = u32::from(self.network());
        let broadcast = u32::from(self.broadcast());
        if self.prefix >= 31 {
            (Ipv4Addr::from(network), Ipv4Addr::from(broadcast))
        } else {
            (Ipv4Addr::from(network + 1), Ipv4Addr::from(broadcast - 1))
        }
    }

    pub fn contains(&self, address: Ipv4Addr) -> bool {
        u32::from(address) & mask_bits(self.prefix) == u32::from(self.network())
    }

    /// The adjacent block of the same size after this one.
    pub fn next(&self) -> Result<Self, DomainError> {
        let next = u64::from(u32::from(self.network())) + self.size();
        let address = u32::try_from(next).map_err(|_| {
            DomainError::overflow(format!("no /{} block after {}", self.prefix, self.trunc()))
        })?;
        Self::new(Ipv4Addr::from(address), self.prefix)
    }

    /// Split into at least `count` equal, aligned subnets.
    pub fn split_into(&self, count: u64) -> Result<Split, DomainError> {
        if count == 0 {
            return Err(DomainError::malformed("network", "cannot split into 0 subnets"));
        }
        let wanted = u32::from(self.prefix) + ceil_log2(count);
        self.split_at(wanted)
    }

    /// Split into the smallest subnets that each hold `hosts` usable hosts.
    pub fn split_for_hosts(&self, hosts: u64) -> Result<Split, DomainError> {
        let host_bits = ceil_log2(hosts.saturating_add(2)).max(2);
        let wanted = u32::from(ADDRESS_BITS).checked_sub(host_bits).ok_or(
            DomainError::InfeasibleSplit {
                prefix: self.prefix,
                wanted: 0,
            },
        )?;
        if wanted < u32::from(self.prefix) {
            return Err(DomainError::InfeasibleSplit {
                prefix: self.prefix,
                wanted,
            });
        }
        self.split_at(wanted)
    }

    fn split_at(&self, wanted: u32) -> Result<Split, DomainError> {
        if wanted > u32::from(ADDRESS_BITS) {
            return Err(DomainError::InfeasibleSplit {
                prefix: self.prefix,
                wanted,
            });
        }
        Ok(Split {
            parent: self.trunc(),
            prefix: wanted as u8,
        })
    }
}

impl fmt::Display for Ipv4Net {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.prefix)
    }
}

impl FromStr for Ipv4Net {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A block divided into equal subnets of a longer prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split {
    parent: Ipv4Net,
    prefix: u8,
}

impl Split {
    /// Prefix length of every subnet.
    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    /// Number of subnets: `2^(new - old)`.
    pub fn count(&self) -> u64 {
        1u64 << (self.prefix - self.parent.prefix)
    }

    /// Addresses per subnet.
    pub fn subnet_size(&self) -> u64 {
        block_size(self.prefix)
    }

    /// The subnets in address order.
    pub fn subnets(&self) -> impl Iterator<Item = Ipv4Net> + '_ {
        let base = u64::from(u32::from(self.parent.network()));
        let size = self.subnet_size();
        (0..self.count()).map(move |i| Ipv4Net {
            // base + i * size stays within the parent block
            address: Ipv4Addr::from((base + i * size) as u32),
            prefix: self.prefix,
        })
    }
}
