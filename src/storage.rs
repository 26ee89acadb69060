//! Arena storage for heap nodes
//!
//! Heap nodes form cycles (sibling rings, parent back-references), so they are
//! not owned by each other. Instead every node lives in a generational
//! [`SlotMap`] arena and links are plain [`NodeRef`] values.
//!
//! # Design
//!
//! Each arena carries a process-unique [`ArenaId`], and a [`NodeRef`] is the
//! pair of that id and the slot key. A [`NodeStore`] owns one *home* arena,
//! where new nodes are allocated, plus any arenas it absorbed from other
//! stores. Absorbing moves whole arenas, never individual nodes, so merging two
//! heaps costs O(number of arenas) and every outstanding reference into either
//! store stays valid.
//!
//! Generational keys make stale references detectable: once a node has been
//! removed, [`NodeStore::get`] returns `None` for it, and so does a reference
//! into an arena owned by a different store.

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use std::ops::{Index, IndexMut};
use std::sync::atomic::{AtomicU64, Ordering};

new_key_type! {
    /// Slot key within a single arena
    pub struct NodeKey;
}

/// Process-unique identifier of one arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArenaId(u64);

impl ArenaId {
    fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        ArenaId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Reference to a node: the arena it lives in and its slot there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef {
    arena: ArenaId,
    key: NodeKey,
}

impl NodeRef {
    /// The arena this node was allocated in
    #[cfg(test)]
    #[inline]
    pub fn arena(&self) -> ArenaId {
        self.arena
    }
}

/// Owner of every node of one heap.
#[derive(Debug)]
pub struct NodeStore<N> {
    home_id: ArenaId,
    home: SlotMap<NodeKey, N>,
    absorbed: FxHashMap<ArenaId, SlotMap<NodeKey, N>>,
}

impl<N> Default for NodeStore<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> NodeStore<N> {
    /// Creates an empty store with a fresh home arena.
    pub fn new() -> Self {
        Self {
            home_id: ArenaId::fresh(),
            home: SlotMap::with_key(),
            absorbed: FxHashMap::default(),
        }
    }

    /// Creates an empty store whose home arena can hold `capacity` nodes
    /// without reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            home_id: ArenaId::fresh(),
            home: SlotMap::with_capacity_and_key(capacity),
            absorbed: FxHashMap::default(),
        }
    }

    /// Identifier of the arena new nodes are allocated in
    #[cfg(test)]
    #[inline]
    pub fn home_id(&self) -> ArenaId {
        self.home_id
    }

    /// Number of live nodes across all arenas
    pub fn len(&self) -> usize {
        self.home.len() + self.absorbed.values().map(SlotMap::len).sum::<usize>()
    }

    /// Returns true if no arena holds a node
    pub fn is_empty(&self) -> bool {
        self.home.is_empty() && self.absorbed.values().all(SlotMap::is_empty)
    }

    /// Number of arenas owned, the home arena included
    #[cfg(test)]
    pub fn arena_count(&self) -> usize {
        1 + self.absorbed.len()
    }

    /// Allocates a node in the home arena.
    ///
    /// The closure receives the reference the node will live at, so a node
    /// can be built pointing at itself.
    pub fn insert_with<F>(&mut self, f: F) -> NodeRef
    where
        F: FnOnce(NodeRef) -> N,
    {
        let arena = self.home_id;
        let key = self.home.insert_with_key(|key| f(NodeRef { arena, key }));
        NodeRef { arena, key }
    }

    /// Removes a node, returning it if the reference was live.
    ///
    /// An absorbed arena is released as soon as its last node is removed.
    pub fn remove(&mut self, node: NodeRef) -> Option<N> {
        if node.arena == self.home_id {
            return self.home.remove(node.key);
        }
        let arena = self.absorbed.get_mut(&node.arena)?;
        let removed = arena.remove(node.key);
        if arena.is_empty() {
            self.absorbed.remove(&node.arena);
        }
        removed
    }

    /// Removes a node that is known to be live.
    ///
    /// # Panics
    /// Panics if `node` is stale or belongs to another store, like indexing.
    pub fn take(&mut self, node: NodeRef) -> N {
        match self.remove(node) {
            Some(n) => n,
            None => panic!("dangling node reference {node:?}"),
        }
    }

    /// Returns true if `node` refers to a live node of this store
    pub fn contains(&self, node: NodeRef) -> bool {
        self.get(node).is_some()
    }

    pub fn get(&self, node: NodeRef) -> Option<&N> {
        if node.arena == self.home_id {
            self.home.get(node.key)
        } else {
            self.absorbed.get(&node.arena)?.get(node.key)
        }
    }

    pub fn get_mut(&mut self, node: NodeRef) -> Option<&mut N> {
        if node.arena == self.home_id {
            self.home.get_mut(node.key)
        } else {
            self.absorbed.get_mut(&node.arena)?.get_mut(node.key)
        }
    }

    /// Takes ownership of every arena of `other`.
    ///
    /// References into `other` resolve in `self` afterwards. If `self` holds
    /// nothing, `other` simply replaces it so that its home arena keeps the
    /// fast lookup path.
    pub fn absorb(&mut self, other: NodeStore<N>) {
        if self.is_empty() {
            *self = other;
            return;
        }
        let NodeStore {
            home_id,
            home,
            absorbed,
        } = other;
        if !home.is_empty() {
            self.absorbed.insert(home_id, home);
        }
        self.absorbed
            .extend(absorbed.into_iter().filter(|(_, arena)| !arena.is_empty()));
    }

    /// Drops every node and starts over with a fresh home arena.
    ///
    /// References handed out before the call never resolve again.
    pub fn clear(&mut self) {
        *self = Self::with_capacity(self.home.capacity());
    }
}

impl<N> Index<NodeRef> for NodeStore<N> {
    type Output = N;

    fn index(&self, node: NodeRef) -> &N {
        match self.get(node) {
            Some(n) => n,
            None => panic!("dangling node reference {node:?}"),
        }
    }
}

impl<N> IndexMut<NodeRef> for NodeStore<N> {
    fn index_mut(&mut self, node: NodeRef) -> &mut N {
        match self.get_mut(node) {
            Some(n) => n,
            None => panic!("dangling node reference {node:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_live_node() {
        let mut store: NodeStore<u8> = NodeStore::new();
        let node = store.insert_with(|_| 7);
        assert_eq!(store.take(node), 7);
        assert!(store.is_empty());
    }

    #[test]
    #[should_panic(expected = "dangling node reference")]
    fn test_take_removed_node_panics() {
        let mut store: NodeStore<u8> = NodeStore::new();
        let node = store.insert_with(|_| 7);
        store.remove(node);
        store.take(node);
    }

    #[test]
    fn test_insert_get_remove() {
        let mut store: NodeStore<i32> = NodeStore::new();

        let node = store.insert_with(|_| 42);
        assert_eq!(store.get(node), Some(&42));
        assert_eq!(store.len(), 1);

        store[node] = 100;
        assert_eq!(store[node], 100);

        assert_eq!(store.remove(node), Some(100));
        assert!(store.get(node).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_insert_with_sees_own_reference() {
        let mut store: NodeStore<Option<NodeRef>> = NodeStore::new();
        let node = store.insert_with(Some);
        assert_eq!(store[node], Some(node));
        assert_eq!(node.arena(), store.home_id());
    }

    #[test]
    fn test_stale_reference_after_slot_reuse() {
        let mut store: NodeStore<&str> = NodeStore::new();
        let old = store.insert_with(|_| "old");
        store.remove(old);
        let new = store.insert_with(|_| "new");

        assert!(!store.contains(old));
        assert_eq!(store.get(new), Some(&"new"));
    }

    #[test]
    fn test_foreign_reference_is_rejected() {
        let mut a: NodeStore<u8> = NodeStore::new();
        let mut b: NodeStore<u8> = NodeStore::new();
        let in_a = a.insert_with(|_| 1);
        b.insert_with(|_| 2);

        assert!(b.get(in_a).is_none());
        assert!(b.remove(in_a).is_none());
    }

    #[test]
    fn test_absorb_keeps_references_valid() {
        let mut a: NodeStore<u8> = NodeStore::new();
        let mut b: NodeStore<u8> = NodeStore::new();
        let in_a = a.insert_with(|_| 1);
        let in_b = b.insert_with(|_| 2);

        a.absorb(b);
        assert_eq!(a.arena_count(), 2);
        assert_eq!(a.len(), 2);
        assert_eq!(a[in_a], 1);
        assert_eq!(a[in_b], 2);

        // Emptying the absorbed arena releases it
        assert_eq!(a.remove(in_b), Some(2));
        assert_eq!(a.arena_count(), 1);
    }

    #[test]
    fn test_absorb_into_empty_adopts_home() {
        let mut a: NodeStore<u8> = NodeStore::new();
        let mut b: NodeStore<u8> = NodeStore::new();
        let in_b = b.insert_with(|_| 7);
        let b_home = b.home_id();

        a.absorb(b);
        assert_eq!(a.home_id(), b_home);
        assert_eq!(a.arena_count(), 1);
        assert_eq!(a[in_b], 7);
    }

    #[test]
    fn test_clear_invalidates_everything() {
        let mut store: NodeStore<u8> = NodeStore::new();
        let node = store.insert_with(|_| 1);
        let before = store.home_id();
        store.clear();

        assert!(store.is_empty());
        assert!(!store.contains(node));
        assert_ne!(store.home_id(), before);
    }
}
