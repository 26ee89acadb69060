//! Fibonacci Heap implementation
//!
//! A Fibonacci heap is a data structure for priority queue operations with:
//! - O(1) amortized enqueue, peek, decrease_key, and union
//! - O(log n) amortized dequeue_min and delete
//!
//! The structure consists of a collection of heap-ordered trees. Roots are linked
//! in a circular doubly linked ring, and so are the children of every node. The
//! heap keeps a reference to the minimum root.
//!
//! `dequeue_min` promotes the children of the removed root to roots and then
//! consolidates: roots of equal degree are linked pairwise until every degree
//! occurs at most once. `decrease_key` cuts a node that now beats its parent
//! and moves it to the root ring; a parent that loses a second child is cut as
//! well (cascading cut). The marks that drive this bound the degree of every
//! node by O(log n).
//!
//! Nodes live in generational arenas and handles are references into them,
//! so a stale handle is reported as [`HeapError::InvalidHandle`] instead of
//! touching freed memory.

use crate::priority::Priority;
use crate::ring::{Linked, RingLink};
use crate::storage::{NodeRef, NodeStore};
use crate::traits::{DecreaseKeyHeap, Handle, Heap, HeapError};
use smallvec::SmallVec;
use std::fmt;

/// Handle to an element in a Fibonacci heap
///
/// A handle stays valid until its element is removed, including across
/// [`FibHeap::append`] and [`FibHeap::union`]. After removal every operation
/// taking the handle fails with [`HeapError::InvalidHandle`], as does using a
/// handle with a heap that never owned its element.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct FibHandle {
    node: NodeRef,
}

impl Handle for FibHandle {}

struct Node<T, P> {
    item: T,
    priority: P,
    link: RingLink,
    parent: Option<NodeRef>,
    child: Option<NodeRef>,
    degree: usize,
    marked: bool,
}

impl<T, P> Linked for Node<T, P> {
    #[inline]
    fn link(&self) -> &RingLink {
        &self.link
    }

    #[inline]
    fn link_mut(&mut self) -> &mut RingLink {
        &mut self.link
    }
}

/// A structural invariant found broken by [`FibHeap::verify_internal_structure`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A link points at a node that is not in the heap's storage
    DanglingLink,
    /// Some `next.prev` or `prev.next` does not lead back to the node
    BrokenRing,
    /// A node's `parent` does not match the node whose child ring holds it
    ParentMismatch,
    /// A child has a smaller priority than its parent
    HeapOrder,
    /// A node's degree differs from the size of its child ring
    DegreeMismatch { degree: usize, children: usize },
    /// A root carries a mark
    MarkedRoot,
    /// The min reference is not a root
    MinNotRoot,
    /// Some root has a smaller priority than the min reference
    MinNotMinimal,
    /// The cached length differs from the number of reachable nodes
    LenMismatch { cached: usize, reachable: usize },
    /// Storage holds nodes that are not reachable from the root ring
    LeakedNodes { stored: usize, reachable: usize },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvariantViolation::DanglingLink => write!(f, "link to a node outside the heap"),
            InvariantViolation::BrokenRing => write!(f, "sibling ring is inconsistent"),
            InvariantViolation::ParentMismatch => {
                write!(f, "parent link disagrees with child ring")
            }
            InvariantViolation::HeapOrder => write!(f, "child priority is below its parent's"),
            InvariantViolation::DegreeMismatch { degree, children } => {
                write!(f, "degree {degree} but {children} children")
            }
            InvariantViolation::MarkedRoot => write!(f, "root is marked"),
            InvariantViolation::MinNotRoot => write!(f, "min reference is not a root"),
            InvariantViolation::MinNotMinimal => write!(f, "a root is smaller than the min"),
            InvariantViolation::LenMismatch { cached, reachable } => {
                write!(f, "cached length {cached} but {reachable} reachable entries")
            }
            InvariantViolation::LeakedNodes { stored, reachable } => {
                write!(f, "{stored} stored nodes but {reachable} reachable")
            }
        }
    }
}

impl std::error::Error for InvariantViolation {}

/// Fibonacci Heap
///
/// # Example
///
/// ```rust
/// use fheap::FibHeap;
///
/// let mut heap = FibHeap::new();
/// let handle = heap.enqueue(5, "item").unwrap();
/// heap.enqueue(3, "other").unwrap();
/// heap.decrease_key(&handle, 1).unwrap();
/// assert_eq!(heap.peek(), Some((&1, &"item")));
/// assert_eq!(heap.dequeue_min(), Some((1, "item")));
/// ```
pub struct FibHeap<T, P> {
    store: NodeStore<Node<T, P>>,
    min: Option<NodeRef>,
    len: usize,
}

impl<T, P> Default for FibHeap<T, P> {
    fn default() -> Self {
        Self {
            store: NodeStore::new(),
            min: None,
            len: 0,
        }
    }
}

impl<T, P: fmt::Debug> fmt::Debug for FibHeap<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let min_priority = self
            .min
            .and_then(|min| self.store.get(min))
            .map(|node| &node.priority);
        f.debug_struct("FibHeap")
            .field("len", &self.len)
            .field("min_priority", &min_priority)
            .finish()
    }
}

impl<T, P: Priority> FibHeap<T, P> {
    /// Creates an empty heap
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty heap that can hold `capacity` entries before its
    /// storage reallocates
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            store: NodeStore::with_capacity(capacity),
            min: None,
            len: 0,
        }
    }

    /// Number of entries in the heap. O(1).
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Adds `item` with the given priority and returns a handle to it.
    ///
    /// The entry becomes a singleton tree in the root ring. O(1).
    ///
    /// # Errors
    /// Returns `HeapError::InvalidPriority` for a NaN or infinite priority.
    pub fn enqueue(&mut self, priority: P, item: T) -> Result<FibHandle, HeapError> {
        if !priority.is_valid() {
            return Err(HeapError::InvalidPriority);
        }
        let node = self.store.insert_with(|at| Node {
            item,
            priority,
            link: RingLink::singleton(at),
            parent: None,
            child: None,
            degree: 0,
            marked: false,
        });
        self.min = self.merge_lists(self.min, Some(node));
        self.len += 1;
        self.debug_validate();
        Ok(FibHandle { node })
    }

    /// Returns the minimum priority and its item without removing them. O(1).
    pub fn peek(&self) -> Option<(&P, &T)> {
        self.min.map(|min| {
            let node = &self.store[min];
            (&node.priority, &node.item)
        })
    }

    /// Returns a handle to the current minimum entry. O(1).
    pub fn min_handle(&self) -> Option<FibHandle> {
        self.min.map(|node| FibHandle { node })
    }

    /// Returns the priority and item of a live entry
    pub fn get(&self, handle: &FibHandle) -> Option<(&P, &T)> {
        self.store
            .get(handle.node)
            .map(|node| (&node.priority, &node.item))
    }

    /// Returns the current priority of a live entry
    pub fn priority(&self, handle: &FibHandle) -> Option<&P> {
        self.store.get(handle.node).map(|node| &node.priority)
    }

    /// Returns true if `handle` refers to an entry of this heap
    pub fn contains(&self, handle: &FibHandle) -> bool {
        self.store.contains(handle.node)
    }

    /// Removes and returns the entry with the smallest priority.
    ///
    /// Returns `None` on an empty heap. Amortized O(log n).
    pub fn dequeue_min(&mut self) -> Option<(P, T)> {
        let min = self.min?;
        self.min = self.store.unlink(min);

        // The children become roots
        if let Some(child) = self.store[min].child.take() {
            for sibling in self.store.ring_members(child) {
                let node = &mut self.store[sibling];
                node.parent = None;
                node.marked = false;
            }
            self.min = self.merge_lists(self.min, Some(child));
        }

        let removed = self.store.take(min);
        self.len -= 1;
        if self.min.is_some() {
            self.consolidate();
        }
        self.debug_validate();
        Some((removed.priority, removed.item))
    }

    /// Lowers the priority of the entry behind `handle` to `new_priority`.
    ///
    /// If the entry now has a priority no greater than its parent's, it is cut
    /// into the root ring, cascading up through marked ancestors. Amortized
    /// O(1).
    ///
    /// # Errors
    /// - `HeapError::InvalidHandle` if the entry is not in this heap
    /// - `HeapError::InvalidPriority` for a NaN or infinite priority
    /// - `HeapError::ExceedsPriority` if `new_priority` is greater than the
    ///   current priority
    ///
    /// Nothing is modified on error.
    pub fn decrease_key(&mut self, handle: &FibHandle, new_priority: P) -> Result<(), HeapError> {
        let node = handle.node;
        let current = self.store.get(node).ok_or(HeapError::InvalidHandle)?;
        if !new_priority.is_valid() {
            return Err(HeapError::InvalidPriority);
        }
        if new_priority > current.priority {
            return Err(HeapError::ExceedsPriority);
        }

        self.store[node].priority = new_priority;

        if let Some(parent) = self.store[node].parent {
            // Equal priorities are cut too, keeping the min update below uniform
            if self.store[node].priority <= self.store[parent].priority {
                self.cut(node);
            }
        }
        if let Some(min) = self.min {
            if self.store[node].priority <= self.store[min].priority {
                self.min = Some(node);
            }
        }
        self.debug_validate();
        Ok(())
    }

    /// Removes the entry behind `handle` and returns it.
    ///
    /// Behaves as a decrease to negative infinity followed by `dequeue_min`,
    /// without overwriting the stored priority. Amortized O(log n).
    ///
    /// # Errors
    /// Returns `HeapError::InvalidHandle` if the entry is not in this heap.
    pub fn delete(&mut self, handle: &FibHandle) -> Result<(P, T), HeapError> {
        let node = handle.node;
        if !self.store.contains(node) {
            return Err(HeapError::InvalidHandle);
        }
        self.cut(node);
        self.min = Some(node);
        self.dequeue_min().ok_or(HeapError::InvalidHandle)
    }

    /// Moves every entry of `other` into `self`, leaving `other` empty.
    ///
    /// Handles issued by either heap remain valid for `self`. O(1) in the
    /// number of entries.
    pub fn append(&mut self, other: &mut Self) {
        let FibHeap { store, min, len } = std::mem::take(other);
        if len == 0 {
            return;
        }
        log::debug!("appending {} entries to a heap of {}", len, self.len);
        self.store.absorb(store);
        self.min = self.merge_lists(self.min, min);
        self.len += len;
        self.debug_validate();
    }

    /// Builds a new heap holding the entries of both `a` and `b`.
    ///
    /// Both inputs are left empty. Handles from either input are valid for the
    /// returned heap.
    ///
    /// ```rust
    /// use fheap::FibHeap;
    ///
    /// let mut a = FibHeap::new();
    /// a.enqueue(4, 'a').unwrap();
    /// let mut b = FibHeap::new();
    /// b.enqueue(1, 'b').unwrap();
    ///
    /// let merged = FibHeap::union(&mut a, &mut b);
    /// assert_eq!(merged.len(), 2);
    /// assert!(a.is_empty() && b.is_empty());
    /// ```
    pub fn union(a: &mut Self, b: &mut Self) -> Self {
        let mut merged = std::mem::take(a);
        merged.append(b);
        merged
    }

    /// Removes every entry. Outstanding handles become invalid.
    pub fn clear(&mut self) {
        self.store.clear();
        self.min = None;
        self.len = 0;
    }

    /// Drains the heap into a vector ordered by non-decreasing priority
    pub fn into_sorted_vec(mut self) -> Vec<(P, T)> {
        let mut sorted = Vec::with_capacity(self.len);
        while let Some(entry) = self.dequeue_min() {
            sorted.push(entry);
        }
        sorted
    }

    /// Splices two root rings and returns whichever entry point has the
    /// smaller priority.
    ///
    /// Both arguments must be the minimum of their own ring for the result to
    /// be the minimum of the merged ring.
    fn merge_lists(&mut self, one: Option<NodeRef>, two: Option<NodeRef>) -> Option<NodeRef> {
        match (one, two) {
            (Some(a), Some(b)) => {
                self.store.splice(Some(a), Some(b));
                if self.store[a].priority < self.store[b].priority {
                    Some(a)
                } else {
                    Some(b)
                }
            }
            (one, two) => one.or(two),
        }
    }

    /// Links roots of equal degree until every degree occurs at most once,
    /// then points `min` at the smallest surviving root.
    fn consolidate(&mut self) {
        let Some(start) = self.min else {
            return;
        };
        // Linking rewires the root ring, so walk a snapshot of it
        let roots = self.store.ring_members(start);
        let mut by_degree: SmallVec<[Option<NodeRef>; 64]> = SmallVec::new();
        let mut links = 0usize;

        for &root in &roots {
            let mut tree = root;
            loop {
                let degree = self.store[tree].degree;
                if degree >= by_degree.len() {
                    by_degree.resize(degree + 1, None);
                }
                let Some(other) = by_degree[degree].take() else {
                    by_degree[degree] = Some(tree);
                    break;
                };
                let (winner, loser) = if self.store[other].priority < self.store[tree].priority {
                    (other, tree)
                } else {
                    (tree, other)
                };
                self.link(loser, winner);
                links += 1;
                tree = winner;
            }
        }

        // `<=` so that ties resolve to the root that survived the last link
        let mut min: Option<NodeRef> = None;
        for root in by_degree.into_iter().flatten() {
            min = match min {
                Some(current) if self.store[current].priority < self.store[root].priority => {
                    Some(current)
                }
                _ => Some(root),
            };
        }
        log::trace!(
            "consolidated {} roots into {} trees ({} links)",
            roots.len(),
            roots.len() - links,
            links
        );
        self.min = min;
    }

    /// Makes root `child` a child of root `parent`.
    fn link(&mut self, child: NodeRef, parent: NodeRef) {
        self.store.unlink(child);
        let siblings = self.store[parent].child;
        self.store[parent].child = self.store.splice(siblings, Some(child));
        self.store[parent].degree += 1;

        let node = &mut self.store[child];
        node.parent = Some(parent);
        node.marked = false;
    }

    /// Moves `node` to the root ring, then keeps cutting ancestors for as long
    /// as they were already marked. The first unmarked non-root ancestor gets
    /// marked.
    fn cut(&mut self, node: NodeRef) {
        let mut current = node;
        let mut cascaded = 0usize;
        loop {
            self.store[current].marked = false;
            let Some(parent) = self.store[current].parent else {
                break;
            };

            let sibling = self.store.unlink(current);
            let parent_node = &mut self.store[parent];
            if parent_node.child == Some(current) {
                parent_node.child = sibling;
            }
            parent_node.degree -= 1;
            let parent_marked = parent_node.marked;
            let parent_is_root = parent_node.parent.is_none();

            self.store[current].parent = None;
            self.min = self.merge_lists(self.min, Some(current));

            if parent_marked {
                current = parent;
                cascaded += 1;
            } else {
                if !parent_is_root {
                    self.store[parent].marked = true;
                }
                break;
            }
        }
        if cascaded > 0 {
            log::trace!("cascading cut moved {} marked ancestors to the root ring", cascaded);
        }
    }

    #[inline]
    fn debug_validate(&self) {
        #[cfg(feature = "validate")]
        debug_assert_eq!(self.verify_internal_structure(), Ok(()));
    }

    /// Walks the whole heap and checks every structural invariant.
    ///
    /// Checked: ring consistency, parent links, heap order, degrees, unmarked
    /// roots, the min reference, and that the cached length matches both the
    /// reachable entries and the storage. O(n).
    pub fn verify_internal_structure(&self) -> Result<(), InvariantViolation> {
        let Some(min) = self.min else {
            return match (self.len, self.store.len()) {
                (0, 0) => Ok(()),
                (0, stored) => Err(InvariantViolation::LeakedNodes {
                    stored,
                    reachable: 0,
                }),
                (cached, _) => Err(InvariantViolation::LenMismatch {
                    cached,
                    reachable: 0,
                }),
            };
        };
        let min_node = self.store.get(min).ok_or(InvariantViolation::DanglingLink)?;
        if min_node.parent.is_some() {
            return Err(InvariantViolation::MinNotRoot);
        }

        let stored = self.store.len();
        let mut reachable = 0usize;
        // (ring entry point, expected parent, expected ring size)
        let mut pending: Vec<(NodeRef, Option<NodeRef>, Option<usize>)> = vec![(min, None, None)];

        while let Some((start, parent, expected)) = pending.pop() {
            let mut current = start;
            let mut members = 0usize;
            loop {
                let node = self.store.get(current).ok_or(InvariantViolation::DanglingLink)?;
                let next = self
                    .store
                    .get(node.link.next)
                    .ok_or(InvariantViolation::DanglingLink)?;
                let prev = self
                    .store
                    .get(node.link.prev)
                    .ok_or(InvariantViolation::DanglingLink)?;
                if next.link.prev != current || prev.link.next != current {
                    return Err(InvariantViolation::BrokenRing);
                }
                if node.parent != parent {
                    return Err(InvariantViolation::ParentMismatch);
                }
                match parent {
                    None => {
                        if node.marked {
                            return Err(InvariantViolation::MarkedRoot);
                        }
                        if node.priority < min_node.priority {
                            return Err(InvariantViolation::MinNotMinimal);
                        }
                    }
                    Some(parent) => {
                        if node.priority < self.store[parent].priority {
                            return Err(InvariantViolation::HeapOrder);
                        }
                    }
                }
                match node.child {
                    Some(child) => pending.push((child, Some(current), Some(node.degree))),
                    None if node.degree != 0 => {
                        return Err(InvariantViolation::DegreeMismatch {
                            degree: node.degree,
                            children: 0,
                        })
                    }
                    None => {}
                }

                members += 1;
                reachable += 1;
                if reachable > stored {
                    // A ring that never returns to its entry point
                    return Err(InvariantViolation::BrokenRing);
                }
                current = node.link.next;
                if current == start {
                    break;
                }
            }
            if let Some(degree) = expected {
                if degree != members {
                    return Err(InvariantViolation::DegreeMismatch {
                        degree,
                        children: members,
                    });
                }
            }
        }

        if reachable != self.len {
            return Err(InvariantViolation::LenMismatch {
                cached: self.len,
                reachable,
            });
        }
        if stored != reachable {
            return Err(InvariantViolation::LeakedNodes { stored, reachable });
        }
        Ok(())
    }
}

impl<T, P: Priority> Heap<T, P> for FibHeap<T, P> {
    fn new() -> Self {
        Self::default()
    }

    fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn len(&self) -> usize {
        self.len
    }

    fn push(&mut self, priority: P, item: T) -> Result<(), HeapError> {
        self.enqueue(priority, item).map(|_| ())
    }

    fn peek(&self) -> Option<(&P, &T)> {
        FibHeap::peek(self)
    }

    fn pop(&mut self) -> Option<(P, T)> {
        self.dequeue_min()
    }

    fn merge(&mut self, mut other: Self) {
        self.append(&mut other);
    }
}

impl<T, P: Priority> DecreaseKeyHeap<T, P> for FibHeap<T, P> {
    type Handle = FibHandle;

    fn push_with_handle(&mut self, priority: P, item: T) -> Result<FibHandle, HeapError> {
        self.enqueue(priority, item)
    }

    fn decrease_key(&mut self, handle: &FibHandle, new_priority: P) -> Result<(), HeapError> {
        FibHeap::decrease_key(self, handle, new_priority)
    }

    fn delete(&mut self, handle: &FibHandle) -> Result<(P, T), HeapError> {
        FibHeap::delete(self, handle)
    }
}
