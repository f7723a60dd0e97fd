//! Formatting implementation for prefixes and tries

use std::fmt::{Debug, Display, Formatter, Result};

use crate::arena::Handle;
use crate::prefix::{Address, Cidr, Prefix};
use crate::trie::PrefixTrie;
use crate::Lpm;

impl<A: Address> Display for Prefix<A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}/{}", A::Ip::from(self.addr()), self.prefix_len())
    }
}

impl<A: Address> Debug for Prefix<A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        Display::fmt(self, f)
    }
}

impl Display for Cidr {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Cidr::V4(p) => Display::fmt(p, f),
            Cidr::V6(p) => Display::fmt(p, f),
        }
    }
}

impl Debug for Cidr {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        Display::fmt(self, f)
    }
}

/// Prints the tree structure, starting at the root.
impl<A: Address, V: Debug> Debug for PrefixTrie<A, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        DebugTrie(self, Handle::ROOT).fmt(f)
    }
}

struct DebugTrie<'a, A, V>(&'a PrefixTrie<A, V>, Handle);

impl<A: Address, V: Debug> Debug for DebugTrie<'_, A, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let trie = self.0;
        let node = &trie.arena[self.1];
        match (node.value.as_ref(), node.left, node.right) {
            (None, None, None) => Debug::fmt(&node.prefix, f),
            (None, None, Some(child)) | (None, Some(child), None) => f
                .debug_map()
                .entry(&node.prefix, &Self(trie, child))
                .finish(),
            (None, Some(left), Some(right)) => f
                .debug_map()
                .entry(&node.prefix, &(Self(trie, left), Self(trie, right)))
                .finish(),
            (Some(v), None, None) => f.debug_map().entry(&node.prefix, v).finish(),
            (Some(v), None, Some(child)) | (Some(v), Some(child), None) => f
                .debug_map()
                .entry(&node.prefix, &(v, Self(trie, child)))
                .finish(),
            (Some(v), Some(left), Some(right)) => f
                .debug_map()
                .entry(&node.prefix, &(v, Self(trie, left), Self(trie, right)))
                .finish(),
        }
    }
}

impl<V: Debug> Debug for Lpm<V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
