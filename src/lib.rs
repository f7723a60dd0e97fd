//! This crate provides a longest-prefix-match (LPM) table for IPv4 and IPv6 prefixes, as used by
//! routing tables and access control lists. Every prefix is bound to a value, and a lookup of an
//! address returns the value of the most specific prefix that contains it.
//!
//! ```
//! # use lpm_trie::Lpm;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut lpm = Lpm::new();
//! lpm.insert_cidr("10.0.0.0/8".parse()?, "foo")?;
//! lpm.insert_cidr("10.10.0.0/16".parse()?, "bar")?;
//! lpm.insert_cidr("2001:db8::1/64".parse()?, "baz")?;
//! assert_eq!(lpm.lookup_addr("10.0.1.2".parse()?), Some(&"foo"));
//! assert_eq!(lpm.lookup_addr("10.10.3.4".parse()?), Some(&"bar"));
//! assert_eq!(lpm.lookup_addr("11.10.3.4".parse()?), None);
//! assert_eq!(lpm.lookup_addr("2001:db8::abcd".parse()?), Some(&"baz"));
//! # Ok(())
//! # }
//! ```
//!
//! # Description of the Tree
//!
//! [`Lpm`] holds one [`PrefixTrie`] per address family and picks the table by the length of the
//! address (4 or 16 bytes). Each trie is a binary tree whose nodes consist of a prefix, a
//! container for a potential value (`Option`), and two optional children. To go down the tree,
//! we look at the most significant bit that is **not** part of the prefix of the current node.
//! If it is not set, we take the left branch, and otherwise the right one.
//!
//! The tree is path-compressed: apart from the root (the prefix of length zero), every node
//! either holds a value or has two children. Inserting a prefix creates at most two nodes (the
//! prefix itself and a branching node at the first bit where it diverges from its neighbor), and
//! removing a prefix deletes at most two nodes, so that the tree always looks as if the removed
//! prefix was never inserted. Hence, every operation visits at most one node per address bit.
//!
//! All nodes of a trie live in a single arena and refer to their children by index. Clearing a
//! table releases the arena at once, and dropping the table frees all memory.
//!
//! | Operation                                | Complexity           |
//! |------------------------------------------|----------------------|
//! | `insert`, `remove`, `take`               | `O(w)`               |
//! | `lookup`, `lookup_prefix`                | `O(w)`               |
//! | `clear` (calling `drop` on `V`)          | `O(n)`               |
//! | `len` and `is_empty`                     | `O(1)`               |
//!
//! where `w` is the address width (32 or 128) and `n` the number of stored prefixes.
//!
//! # Concurrency
//!
//! The table has no interior mutability. Lookups only need `&self` and can run concurrently from
//! multiple threads; modifications need `&mut self`, so callers that share a table between
//! threads wrap it in a lock.

#![allow(clippy::collapsible_else_if)]
#![deny(missing_docs)]

mod arena;
mod engine;
mod error;
mod fmt;
#[cfg(feature = "ipnet")]
mod parse;
mod prefix;
#[cfg(feature = "serde")]
mod serde;

pub mod trie;

pub use engine::Lpm;
pub use error::{Error, Result};
#[cfg(feature = "ipnet")]
pub use parse::{parse_cidr, ParseError};
pub use prefix::{Address, AddressFamily, Cidr, Prefix};
pub use trie::PrefixTrie;
