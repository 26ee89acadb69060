//! Circular doubly-linked rings over arena nodes
//!
//! In a ring:
//! - A single node points to itself (both `next` and `prev`)
//! - There is no head or tail; any member can be the entry point
//! - Splicing two rings together is O(1)
//! - Iteration wraps around, so callers must track the starting point
//!
//! Fibonacci heap roots form one ring, and the children of every node form
//! another. A node is always a member of exactly one ring; a node that is "not
//! in a list" is a singleton ring of its own.

use crate::storage::{NodeRef, NodeStore};
use smallvec::SmallVec;

/// Ring position of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingLink {
    pub(crate) next: NodeRef,
    pub(crate) prev: NodeRef,
}

impl RingLink {
    /// Link of a node that is the only member of its ring
    #[inline]
    pub fn singleton(at: NodeRef) -> Self {
        RingLink { next: at, prev: at }
    }
}

/// Nodes that embed a [`RingLink`]
pub trait Linked {
    fn link(&self) -> &RingLink;
    fn link_mut(&mut self) -> &mut RingLink;
}

/// Ring members captured in ring order. Most rings (child lists, root lists
/// after consolidation) are short.
pub type Members = SmallVec<[NodeRef; 16]>;

impl<N: Linked> NodeStore<N> {
    #[inline]
    pub fn next(&self, node: NodeRef) -> NodeRef {
        self[node].link().next
    }

    #[cfg(test)]
    #[inline]
    pub fn prev(&self, node: NodeRef) -> NodeRef {
        self[node].link().prev
    }

    /// Returns true if `node` is the only member of its ring
    #[cfg(test)]
    #[inline]
    pub fn is_singleton(&self, node: NodeRef) -> bool {
        self.next(node) == node
    }

    /// Turns `node` into a ring of one, discarding its old link.
    ///
    /// Only call this on a node whose neighbours no longer point at it.
    #[inline]
    pub fn make_circular(&mut self, node: NodeRef) {
        *self[node].link_mut() = RingLink::singleton(node);
    }

    /// Splices two disjoint rings into one in O(1).
    ///
    /// If either side is `None`, the other is returned unchanged. Otherwise
    /// `a` and `b` exchange their `next` pointers:
    ///
    /// ```text
    /// before:  a -> a_next -> ... -> a        b -> b_next -> ... -> b
    /// after:   a -> b_next -> ... -> b -> a_next -> ... -> a
    /// ```
    ///
    /// and `a` is returned as the entry point of the merged ring.
    pub fn splice(&mut self, a: Option<NodeRef>, b: Option<NodeRef>) -> Option<NodeRef> {
        match (a, b) {
            (None, None) => None,
            (Some(a), None) => Some(a),
            (None, Some(b)) => Some(b),
            (Some(a), Some(b)) => {
                let a_next = self.next(a);
                let b_next = self.next(b);

                self[a].link_mut().next = b_next;
                self[b_next].link_mut().prev = a;

                self[b].link_mut().next = a_next;
                self[a_next].link_mut().prev = b;

                Some(a)
            }
        }
    }

    /// Removes `node` from its ring and leaves it a singleton.
    ///
    /// Returns some remaining member of the old ring, or `None` if `node` was
    /// alone.
    pub fn unlink(&mut self, node: NodeRef) -> Option<NodeRef> {
        let RingLink { next, prev } = *self[node].link();
        if next == node {
            return None;
        }
        self[prev].link_mut().next = next;
        self[next].link_mut().prev = prev;
        self.make_circular(node);
        Some(next)
    }

    /// Captures every member of the ring containing `start`, beginning with
    /// `start` and following `next`.
    ///
    /// The snapshot stays meaningful while the ring is being rewired.
    pub fn ring_members(&self, start: NodeRef) -> Members {
        let mut members = Members::new();
        let mut current = start;
        loop {
            members.push(current);
            current = self.next(current);
            if current == start {
                break;
            }
        }
        members
    }

    /// Counts the members of the ring containing `start`. O(ring length).
    #[cfg(test)]
    pub fn ring_len(&self, start: NodeRef) -> usize {
        let mut count = 1;
        let mut current = self.next(start);
        while current != start {
            count += 1;
            current = self.next(current);
        }
        count
    }
}
