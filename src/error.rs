//! Errors reported by the lookup table.

use thiserror::Error;

/// Result type of all fallible operations of this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Validation and resource errors.
///
/// All validation happens before the trie is touched, so an operation that returns an error has
/// not modified the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum Error {
    /// The address is neither 4 (IPv4) nor 16 (IPv6) bytes long, or does not match the width of
    /// the family it is used with.
    #[error("invalid address length: {len} bytes (expected 4 or 16)")]
    InvalidAddressLength {
        /// Length of the rejected address in bytes.
        len: usize,
    },

    /// The prefix length exceeds the width of the address family.
    #[error("invalid prefix length /{len} for a {width}-bit address")]
    InvalidPrefixLength {
        /// The rejected prefix length.
        len: u32,
        /// Width of the address family in bits.
        width: u8,
    },

    /// The IP version number is neither 4 nor 6.
    #[error("unsupported address family: IPv{version}")]
    UnsupportedAddressFamily {
        /// The rejected IP version number.
        version: u8,
    },

    /// The node arena could not grow.
    #[error("out of memory while allocating a trie node")]
    OutOfMemory,
}
