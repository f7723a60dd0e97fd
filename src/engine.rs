//! The dual-stack lookup table.

use std::net::IpAddr;

use crate::prefix::{AddressFamily, Cidr};
use crate::trie::PrefixTrie;
use crate::{Error, Result};

/// Longest-prefix-match table for both IPv4 and IPv6.
///
/// Every operation takes the raw address in network byte order and is routed to the IPv4 table
/// for 4-byte addresses and to the IPv6 table for 16-byte addresses. Any other length is
/// rejected with [`Error::InvalidAddressLength`], and a prefix length beyond the address width
/// with [`Error::InvalidPrefixLength`]. All inputs are validated before the tables are modified.
///
/// ```
/// # use lpm_trie::Lpm;
/// # fn main() -> Result<(), lpm_trie::Error> {
/// let mut lpm = Lpm::new();
/// lpm.insert(&[10, 0, 0, 0], 8, "foo")?;
/// lpm.insert(&[10, 10, 0, 0], 16, "bar")?;
/// assert_eq!(lpm.lookup(&[10, 0, 1, 2])?, Some(&"foo"));
/// assert_eq!(lpm.lookup(&[10, 10, 3, 4])?, Some(&"bar"));
/// assert_eq!(lpm.lookup(&[11, 10, 3, 4])?, None);
/// assert!(lpm.remove(&[10, 10, 0, 0], 16)?);
/// assert_eq!(lpm.lookup(&[10, 10, 3, 4])?, Some(&"foo"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Lpm<V> {
    v4: PrefixTrie<u32, V>,
    v6: PrefixTrie<u128, V>,
}

impl<V> Default for Lpm<V> {
    fn default() -> Self {
        Self {
            v4: PrefixTrie::new(),
            v6: PrefixTrie::new(),
        }
    }
}

impl<V> Lpm<V> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value` for the prefix `addr/len`. Bits of `addr` beyond `len` are ignored. Returns
    /// the value previously stored for the same prefix.
    pub fn insert(&mut self, addr: &[u8], len: u8, value: V) -> Result<Option<V>> {
        self.insert_cidr(Cidr::from_bytes(addr, len)?, value)
    }

    /// Insert `value` for an already validated prefix.
    pub fn insert_cidr(&mut self, cidr: Cidr, value: V) -> Result<Option<V>> {
        match cidr {
            Cidr::V4(p) => self.v4.insert(p, value),
            Cidr::V6(p) => self.v6.insert(p, value),
        }
    }

    /// Get the value of the longest stored prefix that contains `addr`.
    pub fn lookup(&self, addr: &[u8]) -> Result<Option<&V>> {
        Ok(match AddressFamily::from_byte_len(addr.len())? {
            AddressFamily::Ipv4 => self.v4.lookup(host_bits(addr)?),
            AddressFamily::Ipv6 => self.v6.lookup(host_bits(addr)?),
        })
    }

    /// Get the value of the longest stored prefix that contains `addr`.
    pub fn lookup_addr(&self, addr: IpAddr) -> Option<&V> {
        match addr {
            IpAddr::V4(a) => self.v4.lookup(a.into()),
            IpAddr::V6(a) => self.v6.lookup(a.into()),
        }
    }

    /// Get the value stored for exactly the prefix `addr/len`.
    pub fn lookup_prefix(&self, addr: &[u8], len: u8) -> Result<Option<&V>> {
        Ok(self.lookup_cidr(&Cidr::from_bytes(addr, len)?))
    }

    /// Get the value stored for exactly `cidr`.
    pub fn lookup_cidr(&self, cidr: &Cidr) -> Option<&V> {
        match cidr {
            Cidr::V4(p) => self.v4.lookup_prefix(p),
            Cidr::V6(p) => self.v6.lookup_prefix(p),
        }
    }

    /// Remove the value stored for exactly the prefix `addr/len`. Returns `true` if there was
    /// one; covered or covering prefixes are left untouched.
    pub fn remove(&mut self, addr: &[u8], len: u8) -> Result<bool> {
        Ok(self.take(addr, len)?.is_some())
    }

    /// Remove the value stored for exactly the prefix `addr/len` and return it.
    pub fn take(&mut self, addr: &[u8], len: u8) -> Result<Option<V>> {
        Ok(self.remove_cidr(&Cidr::from_bytes(addr, len)?))
    }

    /// Remove the value stored for exactly `cidr` and return it.
    pub fn remove_cidr(&mut self, cidr: &Cidr) -> Option<V> {
        match cidr {
            Cidr::V4(p) => self.v4.take(p),
            Cidr::V6(p) => self.v6.take(p),
        }
    }

    /// Remove all prefixes of both families.
    pub fn clear(&mut self) {
        self.v4.clear();
        self.v6.clear();
    }

    /// Remove all prefixes of one family.
    pub fn clear_family(&mut self, family: AddressFamily) {
        match family {
            AddressFamily::Ipv4 => self.v4.clear(),
            AddressFamily::Ipv6 => self.v6.clear(),
        }
    }

    /// Remove all prefixes of both families, passing each one with its value to `f` first. IPv4
    /// prefixes are visited before IPv6 prefixes.
    pub fn clear_with<F>(&mut self, mut f: F)
    where
        F: FnMut(Cidr, V),
    {
        self.v4.clear_with(|p, v| f(Cidr::V4(p), v));
        self.v6.clear_with(|p, v| f(Cidr::V6(p), v));
    }

    /// Number of stored prefixes of both families.
    pub fn len(&self) -> usize {
        self.v4.len() + self.v6.len()
    }

    /// Check whether no prefix is stored.
    pub fn is_empty(&self) -> bool {
        self.v4.is_empty() && self.v6.is_empty()
    }

    /// Iterate over all entries, IPv4 first, each family in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = (Cidr, &V)> {
        self.v4
            .iter()
            .map(|(p, v)| (Cidr::V4(*p), v))
            .chain(self.v6.iter().map(|(p, v)| (Cidr::V6(*p), v)))
    }

    /// The IPv4 table.
    pub fn ipv4(&self) -> &PrefixTrie<u32, V> {
        &self.v4
    }

    /// The IPv6 table.
    pub fn ipv6(&self) -> &PrefixTrie<u128, V> {
        &self.v6
    }
}

fn host_bits<A: crate::Address>(addr: &[u8]) -> Result<A> {
    A::from_bytes(addr).ok_or(Error::InvalidAddressLength { len: addr.len() })
}

impl<V: PartialEq> PartialEq for Lpm<V> {
    fn eq(&self, other: &Self) -> bool {
        self.v4 == other.v4 && self.v6 == other.v6
    }
}

impl<V: Eq> Eq for Lpm<V> {}

impl<V> FromIterator<(Cidr, V)> for Lpm<V> {
    /// Build a table from an iterator. Panics if the node storage cannot grow.
    fn from_iter<I: IntoIterator<Item = (Cidr, V)>>(iter: I) -> Self {
        let mut lpm = Self::new();
        for (cidr, v) in iter {
            if let Err(e) = lpm.insert_cidr(cidr, v) {
                panic!("{e}");
            }
        }
        lpm
    }
}
