//! Storage for trie nodes, addressed by stable handles.

use std::ops::{Index, IndexMut};

use crate::{Error, Result};

/// Stable reference to a node stored in an [`Arena`]. A handle stays valid until it is freed or
/// the arena is cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct Handle(usize);

impl Handle {
    /// The slot of the first node, which is never freed.
    pub(crate) const ROOT: Handle = Handle(0);

    #[inline(always)]
    fn idx(self) -> usize {
        self.0
    }
}

#[derive(Clone)]
enum Slot<N> {
    Occupied(N),
    Vacant,
}

/// A growable table of nodes with a free list. Freed slots are reused by later allocations, and
/// the whole table can be released at once.
#[derive(Clone)]
pub(crate) struct Arena<N> {
    slots: Vec<Slot<N>>,
    free: Vec<Handle>,
}

impl<N> Arena<N> {
    /// Create an arena holding a single node at [`Handle::ROOT`].
    pub(crate) fn with_root(root: N) -> Self {
        Self {
            slots: vec![Slot::Occupied(root)],
            free: Vec::new(),
        }
    }

    /// Store `node` and return its handle. Only fails if the table cannot grow.
    pub(crate) fn allocate(&mut self, node: N) -> Result<Handle> {
        if let Some(handle) = self.free.pop() {
            debug_assert!(matches!(self.slots[handle.idx()], Slot::Vacant));
            self.slots[handle.idx()] = Slot::Occupied(node);
            return Ok(handle);
        }
        self.slots
            .try_reserve(1)
            .map_err(|_| Error::OutOfMemory)?;
        self.slots.push(Slot::Occupied(node));
        Ok(Handle(self.slots.len() - 1))
    }

    /// Release a node and return it. Freeing a handle twice is a bug in the caller.
    pub(crate) fn free(&mut self, handle: Handle) -> N {
        match std::mem::replace(&mut self.slots[handle.idx()], Slot::Vacant) {
            Slot::Occupied(node) => {
                self.free.push(handle);
                node
            }
            Slot::Vacant => panic!("double free of arena slot {}", handle.0),
        }
    }

    /// Release all nodes. All handles become invalid; the capacity is kept for reuse.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }

    /// Release all nodes and store `root` at [`Handle::ROOT`]. Never allocates, as the capacity
    /// of the cleared table is kept.
    pub(crate) fn reset(&mut self, root: N) {
        self.clear();
        self.slots.push(Slot::Occupied(root));
    }

    /// Number of live nodes.
    pub(crate) fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }
}

impl<N> Index<Handle> for Arena<N> {
    type Output = N;

    #[inline(always)]
    fn index(&self, handle: Handle) -> &N {
        match &self.slots[handle.idx()] {
            Slot::Occupied(node) => node,
            Slot::Vacant => panic!("use of freed arena slot {}", handle.0),
        }
    }
}

impl<N> IndexMut<Handle> for Arena<N> {
    #[inline(always)]
    fn index_mut(&mut self, handle: Handle) -> &mut N {
        match &mut self.slots[handle.idx()] {
            Slot::Occupied(node) => node,
            Slot::Vacant => panic!("use of freed arena slot {}", handle.0),
        }
    }
}
