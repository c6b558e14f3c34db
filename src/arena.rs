//! The side table from stable node identities to host handles.
//!
//! The engine never stores a host handle inside a vnode. Instead every mounted
//! node is assigned a [`NodeId`] and the handle itself lives in a slab here.
//! A vnode carries only the id, and patching transfers that id from the old
//! vnode to the new one, so exactly one live vnode owns a given slot at any
//! time.

use std::ops::Index;

use slab::Slab;

/// The stable identity of one mounted host node.
///
/// Ids are slab keys: cheap to copy, reused after [`HostArena::reclaim`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct NodeId(pub usize);

/// Slab-backed storage for the host handles of all currently mounted nodes.
pub struct HostArena<N> {
    slots: Slab<N>,
}

impl<N> HostArena<N> {
    pub fn new() -> Self {
        Self { slots: Slab::new() }
    }

    /// Store a freshly created host handle and return its id.
    pub fn allocate(&mut self, host: N) -> NodeId {
        NodeId(self.slots.insert(host))
    }

    /// Look up the handle for a mounted node.
    pub fn get(&self, id: NodeId) -> Option<&N> {
        self.slots.get(id.0)
    }

    /// Free the slot for a node that is leaving the host tree, returning the
    /// handle so the caller can detach it. Reclaiming an already-freed id is
    /// not an error; it returns `None`.
    pub fn reclaim(&mut self, id: NodeId) -> Option<N> {
        self.slots.try_remove(id.0)
    }

    /// Number of currently mounted nodes.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<N> Default for HostArena<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> Index<NodeId> for HostArena<N> {
    type Output = N;

    fn index(&self, id: NodeId) -> &N {
        &self.slots[id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_and_reclaim() {
        let mut arena = HostArena::new();
        let a = arena.allocate("a");
        let b = arena.allocate("b");
        assert_ne!(a, b);
        assert_eq!(arena.len(), 2);
        assert_eq!(arena[a], "a");

        assert_eq!(arena.reclaim(a), Some("a"));
        assert_eq!(arena.reclaim(a), None);
        assert_eq!(arena.get(a), None);
        assert_eq!(arena.get(b), Some(&"b"));
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn slots_are_reused() {
        let mut arena = HostArena::new();
        let a = arena.allocate(1);
        arena.reclaim(a);
        let b = arena.allocate(2);
        assert_eq!(a, b);
        assert_eq!(arena[b], 2);
    }
}
