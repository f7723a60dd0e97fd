//! Iterators over the entries of a [`PrefixTrie`].

use super::*;

/// An iterator over all entries of a [`PrefixTrie`] in lexicographic order.
#[derive(Clone)]
pub struct Iter<'a, A, V> {
    trie: &'a PrefixTrie<A, V>,
    nodes: Vec<Handle>,
}

impl<'a, A: Address, V> Iterator for Iter<'a, A, V> {
    type Item = (&'a Prefix<A>, &'a V);

    fn next(&mut self) -> Option<(&'a Prefix<A>, &'a V)> {
        while let Some(cur) = self.nodes.pop() {
            let node = &self.trie.arena[cur];
            if let Some(right) = node.right {
                self.nodes.push(right);
            }
            if let Some(left) = node.left {
                self.nodes.push(left);
            }
            if let Some(v) = &node.value {
                return Some((&node.prefix, v));
            }
        }
        None
    }
}

/// An iterator over all owned entries of a [`PrefixTrie`] in lexicographic order.
pub struct IntoIter<A, V> {
    trie: PrefixTrie<A, V>,
    nodes: Vec<Handle>,
}

impl<A: Address, V> Iterator for IntoIter<A, V> {
    type Item = (Prefix<A>, V);

    fn next(&mut self) -> Option<(Prefix<A>, V)> {
        while let Some(cur) = self.nodes.pop() {
            let node = &mut self.trie.arena[cur];
            if let Some(right) = node.right {
                self.nodes.push(right);
            }
            if let Some(left) = node.left {
                self.nodes.push(left);
            }
            if let Some(v) = node.value.take() {
                return Some((node.prefix, v));
            }
        }
        None
    }
}

impl<A: Address, V> IntoIterator for PrefixTrie<A, V> {
    type Item = (Prefix<A>, V);

    type IntoIter = IntoIter<A, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            trie: self,
            nodes: vec![Handle::ROOT],
        }
    }
}

impl<'a, A: Address, V> IntoIterator for &'a PrefixTrie<A, V> {
    type Item = (&'a Prefix<A>, &'a V);

    type IntoIter = Iter<'a, A, V>;

    fn into_iter(self) -> Self::IntoIter {
        Iter {
            trie: self,
            nodes: vec![Handle::ROOT],
        }
    }
}
