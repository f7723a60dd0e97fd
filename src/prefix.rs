//! Bit-level model of addresses and prefixes.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use num_traits::{CheckedShr, PrimInt, Unsigned, Zero};

use crate::{Error, Result};

/// The two supported address families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AddressFamily {
    /// 32-bit addresses.
    Ipv4,
    /// 128-bit addresses.
    Ipv6,
}

impl AddressFamily {
    /// Width of an address in bits.
    pub const fn width(self) -> u8 {
        match self {
            AddressFamily::Ipv4 => 32,
            AddressFamily::Ipv6 => 128,
        }
    }

    /// Width of an address in bytes.
    pub const fn byte_len(self) -> usize {
        self.width() as usize / 8
    }

    /// Select the family from the length of a raw address in bytes (4 or 16).
    pub fn from_byte_len(len: usize) -> Result<Self> {
        match len {
            4 => Ok(AddressFamily::Ipv4),
            16 => Ok(AddressFamily::Ipv6),
            len => Err(Error::InvalidAddressLength { len }),
        }
    }
}

/// Select the family by its IP version number (4 or 6).
impl TryFrom<u8> for AddressFamily {
    type Error = Error;

    fn try_from(version: u8) -> Result<Self> {
        match version {
            4 => Ok(AddressFamily::Ipv4),
            6 => Ok(AddressFamily::Ipv6),
            version => Err(Error::UnsupportedAddressFamily { version }),
        }
    }
}

/// Integer representation of an address of one family: `u32` for IPv4 and `u128` for IPv6. Bit 0
/// is the most significant bit, i.e., the first bit of the address in network byte order.
pub trait Address:
    Unsigned + PrimInt + Zero + CheckedShr + std::hash::Hash + std::fmt::Debug + 'static
{
    /// The family this representation belongs to.
    const FAMILY: AddressFamily;

    /// The standard library address type of the family, used for formatting.
    type Ip: From<Self> + std::fmt::Display;

    /// Read an address in network byte order. Returns `None` if `bytes` has the wrong length.
    fn from_bytes(bytes: &[u8]) -> Option<Self>;

    /// Write the address in network byte order.
    fn to_bytes(self) -> Vec<u8>;
}

impl Address for u32 {
    const FAMILY: AddressFamily = AddressFamily::Ipv4;
    type Ip = Ipv4Addr;

    fn from_bytes(bytes: &[u8]) -> Option<Self> {
        <[u8; 4]>::try_from(bytes).ok().map(u32::from_be_bytes)
    }

    fn to_bytes(self) -> Vec<u8> {
        self.to_be_bytes().to_vec()
    }
}

impl Address for u128 {
    const FAMILY: AddressFamily = AddressFamily::Ipv6;
    type Ip = Ipv6Addr;

    fn from_bytes(bytes: &[u8]) -> Option<Self> {
        <[u8; 16]>::try_from(bytes).ok().map(u128::from_be_bytes)
    }

    fn to_bytes(self) -> Vec<u8> {
        self.to_be_bytes().to_vec()
    }
}

/// Width of `A` in bits.
#[inline(always)]
pub(crate) fn width<A: Address>() -> u8 {
    A::FAMILY.width()
}

pub(crate) fn mask_from_prefix_len<R>(len: u8) -> R
where
    R: PrimInt + Zero,
{
    if len as u32 == R::zero().count_zeros() {
        !R::zero()
    } else if len == 0 {
        R::zero()
    } else {
        !((!R::zero()) >> len as usize)
    }
}

/// A prefix of one address family in canonical form: all bits beyond the prefix length are zero.
///
/// Two prefixes constructed from addresses that only differ in their masked-off bits are equal.
/// The derived ordering sorts by address first and by length second, which is the order in which
/// a trie traversal visits its nodes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Prefix<A> {
    bits: A,
    len: u8,
}

impl<A: Address> Prefix<A> {
    /// Create a prefix, zeroing all bits beyond `len`. Fails if `len` exceeds the width of `A`.
    pub fn new(bits: A, len: u8) -> Result<Self> {
        if len > width::<A>() {
            return Err(Error::InvalidPrefixLength {
                len: len as u32,
                width: width::<A>(),
            });
        }
        Ok(Self::new_unchecked(bits, len))
    }

    /// Create a prefix from an address in network byte order.
    ///
    /// ```
    /// # use lpm_trie::Prefix;
    /// let p = Prefix::<u32>::from_bytes(&[10, 1, 2, 3], 8).unwrap();
    /// assert_eq!(p.addr(), 10 << 24);
    /// assert!(Prefix::<u32>::from_bytes(&[10, 1, 2], 8).is_err());
    /// assert!(Prefix::<u32>::from_bytes(&[10, 1, 2, 3], 33).is_err());
    /// ```
    pub fn from_bytes(bytes: &[u8], len: u8) -> Result<Self> {
        let bits = A::from_bytes(bytes).ok_or(Error::InvalidAddressLength { len: bytes.len() })?;
        Self::new(bits, len)
    }

    /// The prefix that matches exactly one address.
    pub fn host(addr: A) -> Self {
        Self {
            bits: addr,
            len: width::<A>(),
        }
    }

    /// The prefix of length zero that matches every address.
    pub fn zero() -> Self {
        Self {
            bits: A::zero(),
            len: 0,
        }
    }

    #[inline(always)]
    pub(crate) fn new_unchecked(bits: A, len: u8) -> Self {
        Self {
            bits: bits & mask_from_prefix_len(len),
            len,
        }
    }

    /// The masked address bits.
    pub fn addr(&self) -> A {
        self.bits
    }

    /// The prefix length.
    pub fn prefix_len(&self) -> u8 {
        self.len
    }

    /// The family of the prefix.
    pub fn family(&self) -> AddressFamily {
        A::FAMILY
    }

    /// The masked address in network byte order.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bits.to_bytes()
    }

    /// Bit `i` of the prefix, counted from the most significant bit. Bits at or beyond the prefix
    /// length are always unset.
    #[inline(always)]
    pub fn bit(&self, i: u8) -> bool {
        i < self.len && (self.bits >> (width::<A>() - 1 - i) as usize) & A::one() != A::zero()
    }

    /// Check if `self` covers `other`. This is also true if both are equal.
    pub fn contains(&self, other: &Self) -> bool {
        self.len <= other.len && other.bits & mask_from_prefix_len(self.len) == self.bits
    }

    /// The longest prefix that covers both `self` and `other`.
    pub fn longest_common_prefix(&self, other: &Self) -> Self {
        let len = ((self.bits ^ other.bits).leading_zeros() as u8)
            .min(self.len)
            .min(other.len);
        Self::new_unchecked(self.bits, len)
    }
}

impl<A: Address> Default for Prefix<A> {
    fn default() -> Self {
        Self::zero()
    }
}

/// A family-tagged prefix, as accepted by [`crate::Lpm`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Cidr {
    /// An IPv4 prefix.
    V4(Prefix<u32>),
    /// An IPv6 prefix.
    V6(Prefix<u128>),
}

impl Cidr {
    /// Validate a raw address with prefix length. The family is selected by the length of
    /// `bytes`.
    ///
    /// ```
    /// # use lpm_trie::{Cidr, Error, AddressFamily};
    /// let c = Cidr::from_bytes(&[10, 10, 3, 4], 16).unwrap();
    /// assert_eq!(c.family(), AddressFamily::Ipv4);
    /// assert_eq!(c.to_bytes(), vec![10, 10, 0, 0]);
    /// assert_eq!(Cidr::from_bytes(&[127, 0, 1], 8), Err(Error::InvalidAddressLength { len: 3 }));
    /// ```
    pub fn from_bytes(bytes: &[u8], len: u8) -> Result<Self> {
        match AddressFamily::from_byte_len(bytes.len())? {
            AddressFamily::Ipv4 => Prefix::from_bytes(bytes, len).map(Cidr::V4),
            AddressFamily::Ipv6 => Prefix::from_bytes(bytes, len).map(Cidr::V6),
        }
    }

    /// Create a prefix from an address and prefix length.
    pub fn new(addr: IpAddr, len: u8) -> Result<Self> {
        match addr {
            IpAddr::V4(a) => Prefix::new(u32::from(a), len).map(Cidr::V4),
            IpAddr::V6(a) => Prefix::new(u128::from(a), len).map(Cidr::V6),
        }
    }

    /// The host prefix of a single address.
    pub fn host(addr: IpAddr) -> Self {
        match addr {
            IpAddr::V4(a) => Cidr::V4(Prefix::host(a.into())),
            IpAddr::V6(a) => Cidr::V6(Prefix::host(a.into())),
        }
    }

    /// The address family.
    pub fn family(&self) -> AddressFamily {
        match self {
            Cidr::V4(_) => AddressFamily::Ipv4,
            Cidr::V6(_) => AddressFamily::Ipv6,
        }
    }

    /// The prefix length.
    pub fn prefix_len(&self) -> u8 {
        match self {
            Cidr::V4(p) => p.prefix_len(),
            Cidr::V6(p) => p.prefix_len(),
        }
    }

    /// The masked network address.
    pub fn addr(&self) -> IpAddr {
        match self {
            Cidr::V4(p) => IpAddr::V4(Ipv4Addr::from(p.addr())),
            Cidr::V6(p) => IpAddr::V6(Ipv6Addr::from(p.addr())),
        }
    }

    /// The masked network address in network byte order.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Cidr::V4(p) => p.to_bytes(),
            Cidr::V6(p) => p.to_bytes(),
        }
    }
}

impl From<Prefix<u32>> for Cidr {
    fn from(p: Prefix<u32>) -> Self {
        Cidr::V4(p)
    }
}

impl From<Prefix<u128>> for Cidr {
    fn from(p: Prefix<u128>) -> Self {
        Cidr::V6(p)
    }
}

impl From<IpAddr> for Cidr {
    fn from(addr: IpAddr) -> Self {
        Cidr::host(addr)
    }
}

impl From<Ipv4Addr> for Prefix<u32> {
    fn from(addr: Ipv4Addr) -> Self {
        Prefix::host(addr.into())
    }
}

impl From<Ipv6Addr> for Prefix<u128> {
    fn from(addr: Ipv6Addr) -> Self {
        Prefix::host(addr.into())
    }
}

#[cfg(feature = "ipnet")]
mod ipnet_impl {
    use super::*;
    use ipnet::{IpNet, Ipv4Net, Ipv6Net};

    impl From<Ipv4Net> for Prefix<u32> {
        fn from(net: Ipv4Net) -> Self {
            Prefix::new_unchecked(net.addr().into(), net.prefix_len())
        }
    }

    impl From<Ipv6Net> for Prefix<u128> {
        fn from(net: Ipv6Net) -> Self {
            Prefix::new_unchecked(net.addr().into(), net.prefix_len())
        }
    }

    impl From<IpNet> for Cidr {
        fn from(net: IpNet) -> Self {
            match net {
                IpNet::V4(n) => Cidr::V4(n.into()),
                IpNet::V6(n) => Cidr::V6(n.into()),
            }
        }
    }
}

#[cfg(feature = "ipnetwork")]
mod ipnetwork_impl {
    use super::*;
    use ipnetwork::{IpNetwork, Ipv4Network, Ipv6Network};

    impl From<Ipv4Network> for Prefix<u32> {
        fn from(net: Ipv4Network) -> Self {
            Prefix::new_unchecked(net.ip().into(), net.prefix())
        }
    }

    impl From<Ipv6Network> for Prefix<u128> {
        fn from(net: Ipv6Network) -> Self {
            Prefix::new_unchecked(net.ip().into(), net.prefix())
        }
    }

    impl From<IpNetwork> for Cidr {
        fn from(net: IpNetwork) -> Self {
            match net {
                IpNetwork::V4(n) => Cidr::V4(n.into()),
                IpNetwork::V6(n) => Cidr::V6(n.into()),
            }
        }
    }
}

#[cfg(feature = "cidr")]
mod cidr_impl {
    use super::*;
    use cidr::{IpCidr, Ipv4Cidr, Ipv6Cidr};

    impl From<Ipv4Cidr> for Prefix<u32> {
        fn from(net: Ipv4Cidr) -> Self {
            Prefix::new_unchecked(net.first_address().into(), net.network_length())
        }
    }

    impl From<Ipv6Cidr> for Prefix<u128> {
        fn from(net: Ipv6Cidr) -> Self {
            Prefix::new_unchecked(net.first_address().into(), net.network_length())
        }
    }

    impl From<IpCidr> for Cidr {
        fn from(net: IpCidr) -> Self {
            match net {
                IpCidr::V4(n) => Cidr::V4(n.into()),
                IpCidr::V6(n) => Cidr::V6(n.into()),
            }
        }
    }
}
