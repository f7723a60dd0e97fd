//! Compressed binary trie over the prefixes of one address family.

use crate::arena::{Arena, Handle};
use crate::prefix::{width, Address, Prefix};
use crate::Result;

mod iter;

pub use iter::*;

/// A longest-prefix-match table for a single address family, implemented as a path-compressed
/// binary trie.
///
/// `A` is the address representation (`u32` for IPv4, `u128` for IPv6) and `V` is the value
/// stored with every prefix. Values need not be comparable; they are dropped when removed or
/// when the trie is cleared.
///
/// ```
/// # use lpm_trie::{PrefixTrie, Prefix};
/// # fn main() -> Result<(), lpm_trie::Error> {
/// let mut trie: PrefixTrie<u32, &str> = PrefixTrie::new();
/// trie.insert(Prefix::from_bytes(&[10, 0, 0, 0], 8)?, "foo")?;
/// trie.insert(Prefix::from_bytes(&[10, 10, 0, 0], 16)?, "bar")?;
/// assert_eq!(trie.lookup(u32::from_be_bytes([10, 0, 1, 2])), Some(&"foo"));
/// assert_eq!(trie.lookup(u32::from_be_bytes([10, 10, 3, 4])), Some(&"bar"));
/// assert_eq!(trie.lookup(u32::from_be_bytes([11, 10, 3, 4])), None);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct PrefixTrie<A, V> {
    pub(crate) arena: Arena<Node<A, V>>,
    count: usize,
}

/// A position in the trie. Apart from the root, a node either holds a value or branches into two
/// children; nodes that do neither are removed.
#[derive(Clone)]
pub(crate) struct Node<A, V> {
    pub(crate) prefix: Prefix<A>,
    pub(crate) value: Option<V>,
    pub(crate) left: Option<Handle>,
    pub(crate) right: Option<Handle>,
}

impl<A: Address, V> Node<A, V> {
    fn new(prefix: Prefix<A>, value: Option<V>) -> Self {
        Self {
            prefix,
            value,
            left: None,
            right: None,
        }
    }

    fn root() -> Self {
        Self::new(Prefix::zero(), None)
    }

    pub(crate) fn prefix_value(&self) -> Option<(&Prefix<A>, &V)> {
        self.value.as_ref().map(|v| (&self.prefix, v))
    }
}

/// The side of `branch` below which `child` is stored: the first bit of `child` after the prefix
/// of `branch`.
#[inline(always)]
fn to_right<A: Address>(branch: &Prefix<A>, child: &Prefix<A>) -> bool {
    child.bit(branch.prefix_len())
}

enum Direction {
    /// The prefix is already reached.
    Reached,
    /// Enter the next node and search again.
    Enter { next: Handle, right: bool },
    /// The prefix is not in the trie.
    Missing,
}

enum DirectionForInsert<A> {
    /// The prefix is already reached.
    Reached,
    /// Enter the next node and search again.
    Enter { next: Handle },
    /// Insert a new leaf at the given side.
    NewLeaf { right: bool },
    /// Insert a new node at the given side, and move the old child below it at `child_right`.
    NewChild { right: bool, child_right: bool },
    /// Insert a branching node with `branch_prefix` at the given side. The new prefix goes to
    /// `prefix_right` of the branch, and the old child to the other side.
    NewBranch {
        branch_prefix: Prefix<A>,
        right: bool,
        prefix_right: bool,
    },
}

impl<A: Address, V> Default for PrefixTrie<A, V> {
    fn default() -> Self {
        Self {
            arena: Arena::with_root(Node::root()),
            count: 0,
        }
    }
}

impl<A: Address, V> PrefixTrie<A, V> {
    /// Create an empty trie.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored prefixes.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Check whether no prefix is stored.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of nodes in the trie, including the root and branching nodes without a value.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Insert `value` for `prefix`. If the exact prefix was already present, its value is
    /// replaced and the old one returned.
    ///
    /// The only possible error is [`crate::Error::OutOfMemory`], in which case the trie is left
    /// unchanged.
    pub fn insert(&mut self, prefix: Prefix<A>, value: V) -> Result<Option<V>> {
        let mut idx = Handle::ROOT;
        loop {
            match self.get_direction_for_insert(idx, &prefix) {
                DirectionForInsert::Enter { next } => idx = next,
                DirectionForInsert::Reached => {
                    let old = self.arena[idx].value.replace(value);
                    if old.is_none() {
                        self.count += 1;
                    }
                    return Ok(old);
                }
                DirectionForInsert::NewLeaf { right } => {
                    let new = self.arena.allocate(Node::new(prefix, Some(value)))?;
                    self.set_child(idx, new, right);
                    break;
                }
                DirectionForInsert::NewChild { right, child_right } => {
                    let new = self.arena.allocate(Node::new(prefix, Some(value)))?;
                    if let Some(child) = self.set_child(idx, new, right) {
                        self.set_child(new, child, child_right);
                    }
                    break;
                }
                DirectionForInsert::NewBranch {
                    branch_prefix,
                    right,
                    prefix_right,
                } => {
                    let branch = self.arena.allocate(Node::new(branch_prefix, None))?;
                    let new = match self.arena.allocate(Node::new(prefix, Some(value))) {
                        Ok(new) => new,
                        Err(e) => {
                            self.arena.free(branch);
                            return Err(e);
                        }
                    };
                    if let Some(child) = self.set_child(idx, branch, right) {
                        self.set_child(branch, child, !prefix_right);
                    }
                    self.set_child(branch, new, prefix_right);
                    break;
                }
            }
        }
        self.count += 1;
        Ok(None)
    }

    /// Longest-prefix match of a single address: the value of the longest stored prefix that
    /// contains `addr`. Runs in at most one step per address bit.
    pub fn lookup(&self, addr: A) -> Option<&V> {
        self.longest_match(&Prefix::host(addr)).map(|(_, v)| v)
    }

    /// Longest-prefix match of a prefix: the longest stored prefix (and its value) that contains
    /// `prefix`, including `prefix` itself.
    pub fn longest_match(&self, prefix: &Prefix<A>) -> Option<(&Prefix<A>, &V)> {
        let mut idx = Handle::ROOT;
        let mut best_match = None;
        loop {
            best_match = self.arena[idx].prefix_value().or(best_match);
            match self.get_direction(idx, prefix) {
                Direction::Enter { next, .. } => idx = next,
                _ => return best_match,
            }
        }
    }

    /// Get the value stored for exactly `prefix`.
    pub fn lookup_prefix(&self, prefix: &Prefix<A>) -> Option<&V> {
        self.find(prefix).and_then(|idx| self.arena[idx].value.as_ref())
    }

    /// Get a mutable reference to the value stored for exactly `prefix`.
    pub fn lookup_prefix_mut(&mut self, prefix: &Prefix<A>) -> Option<&mut V> {
        let idx = self.find(prefix)?;
        self.arena[idx].value.as_mut()
    }

    /// Check whether a value is stored for exactly `prefix`.
    pub fn contains_prefix(&self, prefix: &Prefix<A>) -> bool {
        self.lookup_prefix(prefix).is_some()
    }

    /// Remove the value stored for exactly `prefix`. Returns `true` if there was one. Prefixes
    /// covered by `prefix` are not affected.
    pub fn remove(&mut self, prefix: &Prefix<A>) -> bool {
        self.take(prefix).is_some()
    }

    /// Remove the value stored for exactly `prefix` and return it.
    ///
    /// Afterwards, the trie has the same shape as if `prefix` had never been inserted.
    pub fn take(&mut self, prefix: &Prefix<A>) -> Option<V> {
        let mut idx = Handle::ROOT;
        let mut grandparent = None;
        let mut parent = None;
        loop {
            match self.get_direction(idx, prefix) {
                Direction::Reached => break,
                Direction::Enter { next, right } => {
                    grandparent = parent;
                    parent = Some((idx, right));
                    idx = next;
                }
                Direction::Missing => return None,
            }
        }
        self.remove_node(idx, parent, grandparent)
    }

    /// Remove all prefixes. The node storage is released at once.
    pub fn clear(&mut self) {
        self.arena.reset(Node::root());
        self.count = 0;
    }

    /// Remove all prefixes, passing each one with its value to `f` (in lexicographic order)
    /// before the storage is released.
    pub fn clear_with<F>(&mut self, mut f: F)
    where
        F: FnMut(Prefix<A>, V),
    {
        let mut nodes = vec![Handle::ROOT];
        while let Some(cur) = nodes.pop() {
            let node = &mut self.arena[cur];
            nodes.extend(node.right);
            nodes.extend(node.left);
            if let Some(v) = node.value.take() {
                f(node.prefix, v);
            }
        }
        self.clear();
    }

    /// Iterate over all stored prefixes and values in lexicographic order.
    pub fn iter(&self) -> Iter<'_, A, V> {
        self.into_iter()
    }
}

/// Private function implementations
impl<A: Address, V> PrefixTrie<A, V> {
    fn find(&self, prefix: &Prefix<A>) -> Option<Handle> {
        let mut idx = Handle::ROOT;
        loop {
            match self.get_direction(idx, prefix) {
                Direction::Reached => return Some(idx),
                Direction::Enter { next, .. } => idx = next,
                Direction::Missing => return None,
            }
        }
    }

    /// Take the value out of `idx` and restore the shape of the trie. `par` and `grp` are the
    /// parent and grandparent of `idx`, each with the side on which the next node hangs.
    fn remove_node(
        &mut self,
        idx: Handle,
        par: Option<(Handle, bool)>,
        grp: Option<(Handle, bool)>,
    ) -> Option<V> {
        let node = &mut self.arena[idx];
        let value = node.value.take()?;
        let (left, right) = (node.left, node.right);
        self.count -= 1;

        // the root stays in place.
        let Some((par, par_right)) = par else {
            return Some(value);
        };

        match (left, right) {
            // a branching node must remain in the tree.
            (Some(_), Some(_)) => {}
            // a leaf is removed. If that leaves the parent without value and with a single
            // child, the parent is replaced by that child.
            (None, None) => {
                self.clear_child(par, par_right);
                self.arena.free(idx);
                if let Some((grp, grp_right)) = grp {
                    if self.arena[par].value.is_none() {
                        match self.clear_child(par, !par_right) {
                            Some(sibling) => self.set_child(grp, sibling, grp_right),
                            None => self.clear_child(grp, grp_right),
                        };
                        self.arena.free(par);
                    }
                }
            }
            // connect the only child directly to the parent.
            (Some(child), None) | (None, Some(child)) => {
                self.set_child(par, child, par_right);
                self.arena.free(idx);
            }
        }
        Some(value)
    }

    #[inline(always)]
    fn get_child(&self, idx: Handle, right: bool) -> Option<Handle> {
        if right {
            self.arena[idx].right
        } else {
            self.arena[idx].left
        }
    }

    /// Set the child of a node, and return the old child.
    #[inline(always)]
    fn set_child(&mut self, idx: Handle, child: Handle, right: bool) -> Option<Handle> {
        if right {
            self.arena[idx].right.replace(child)
        } else {
            self.arena[idx].left.replace(child)
        }
    }

    #[inline(always)]
    fn clear_child(&mut self, idx: Handle, right: bool) -> Option<Handle> {
        if right {
            self.arena[idx].right.take()
        } else {
            self.arena[idx].left.take()
        }
    }

    #[inline(always)]
    fn get_direction(&self, cur: Handle, prefix: &Prefix<A>) -> Direction {
        let cur_p = &self.arena[cur].prefix;
        if cur_p == prefix {
            Direction::Reached
        } else if cur_p.prefix_len() >= width::<A>() {
            Direction::Missing
        } else {
            let right = to_right(cur_p, prefix);
            match self.get_child(cur, right) {
                Some(child) if self.arena[child].prefix.contains(prefix) => {
                    Direction::Enter { next: child, right }
                }
                _ => Direction::Missing,
            }
        }
    }

    #[inline(always)]
    fn get_direction_for_insert(&self, cur: Handle, prefix: &Prefix<A>) -> DirectionForInsert<A> {
        let cur_p = &self.arena[cur].prefix;
        if cur_p == prefix {
            return DirectionForInsert::Reached;
        }
        let right = to_right(cur_p, prefix);
        match self.get_child(cur, right) {
            None => DirectionForInsert::NewLeaf { right },
            Some(child) => {
                let child_p = &self.arena[child].prefix;
                if child_p.contains(prefix) {
                    DirectionForInsert::Enter { next: child }
                } else if prefix.contains(child_p) {
                    DirectionForInsert::NewChild {
                        right,
                        child_right: to_right(prefix, child_p),
                    }
                } else {
                    let branch_prefix = prefix.longest_common_prefix(child_p);
                    let prefix_right = to_right(&branch_prefix, prefix);
                    DirectionForInsert::NewBranch {
                        branch_prefix,
                        right,
                        prefix_right,
                    }
                }
            }
        }
    }
}

impl<A: Address, V> FromIterator<(Prefix<A>, V)> for PrefixTrie<A, V> {
    /// Build a trie from an iterator. Panics if the node storage cannot grow.
    fn from_iter<I: IntoIterator<Item = (Prefix<A>, V)>>(iter: I) -> Self {
        let mut trie = Self::new();
        for (p, v) in iter {
            if let Err(e) = trie.insert(p, v) {
                panic!("{e}");
            }
        }
        trie
    }
}

impl<A: Address, V> Extend<(Prefix<A>, V)> for PrefixTrie<A, V> {
    /// Insert all elements of an iterator. Panics if the node storage cannot grow.
    fn extend<I: IntoIterator<Item = (Prefix<A>, V)>>(&mut self, iter: I) {
        for (p, v) in iter {
            if let Err(e) = self.insert(p, v) {
                panic!("{e}");
            }
        }
    }
}

impl<A: Address, V: PartialEq> PartialEq for PrefixTrie<A, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<A: Address, V: Eq> Eq for PrefixTrie<A, V> {}
