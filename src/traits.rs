//! Common traits for heap data structures
//!
//! This module provides a two-tier trait hierarchy for priority queues:
//!
//! - [`Heap`]: Base trait for push/peek/pop/merge
//! - [`DecreaseKeyHeap`]: Extended trait adding handle-based `decrease_key` and `delete`
//!
//! Graph algorithms in [`crate::graph`] are written against [`DecreaseKeyHeap`]
//! rather than a concrete heap type.

use crate::priority::Priority;
use std::fmt;
use std::hash::Hash;

/// Error type for heap operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
    /// The requested priority is greater than the entry's current priority
    ExceedsPriority,
    /// The priority is not a finite number
    InvalidPriority,
    /// The handle does not refer to a live entry of this heap
    InvalidHandle,
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeapError::ExceedsPriority => {
                write!(f, "new priority exceeds the current priority")
            }
            HeapError::InvalidPriority => {
                write!(f, "priority is not a finite number")
            }
            HeapError::InvalidHandle => {
                write!(f, "handle does not refer to a live entry of this heap")
            }
        }
    }
}

impl std::error::Error for HeapError {}

/// A handle to an element in the heap, used for decrease_key and delete
///
/// This is an opaque type that identifies a specific element in the heap.
pub trait Handle: Copy + Eq + Hash + fmt::Debug {}

/// Base trait for heap/priority queue data structures
///
/// This trait provides a simple API similar to Rust's `BinaryHeap`:
/// - `push` inserts an element
/// - `pop` removes and returns the minimum
/// - `peek` returns the minimum without removing it
///
/// Unlike `BinaryHeap` which stores values directly (using `Ord`), these heaps
/// store (priority, item) pairs to separate the ordering key from the data.
pub trait Heap<T, P: Priority> {
    /// Creates a new empty heap
    fn new() -> Self;

    /// Returns true if the heap is empty
    fn is_empty(&self) -> bool;

    /// Returns the number of elements in the heap
    fn len(&self) -> usize;

    /// Inserts an element with the given priority
    ///
    /// # Errors
    /// Returns `HeapError::InvalidPriority` if the priority is not finite.
    fn push(&mut self, priority: P, item: T) -> Result<(), HeapError>;

    /// Returns the minimum priority and associated item without removing it
    ///
    /// Note that `BinaryHeap` is a max-heap, while these heaps are min-heaps.
    fn peek(&self) -> Option<(&P, &T)>;

    /// Removes and returns the minimum priority and associated item
    fn pop(&mut self) -> Option<(P, T)>;

    /// Merges another heap into this one, consuming the other heap
    fn merge(&mut self, other: Self);
}

/// Extended heap trait with `decrease_key` support
///
/// These operations are essential for algorithms like Dijkstra's shortest path
/// and Prim's minimum spanning tree, which update the priorities of elements
/// already in the heap.
///
/// # Example
///
/// ```rust
/// use fheap::{DecreaseKeyHeap, FibHeap, Heap};
///
/// let mut heap = FibHeap::new();
/// let handle = heap.push_with_handle(10, "item").unwrap();
/// heap.decrease_key(&handle, 5).unwrap();
/// assert_eq!(heap.peek(), Some((&5, &"item")));
/// ```
pub trait DecreaseKeyHeap<T, P: Priority>: Heap<T, P> {
    /// The handle type for this heap, used to reference elements for decrease_key
    type Handle: Handle;

    /// Inserts an element with the given priority, returning a handle
    ///
    /// # Errors
    /// Returns `HeapError::InvalidPriority` if the priority is not finite.
    fn push_with_handle(&mut self, priority: P, item: T) -> Result<Self::Handle, HeapError>;

    /// Lowers the priority of the element identified by `handle`
    ///
    /// A new priority equal to the current one is accepted.
    ///
    /// # Errors
    /// - `HeapError::ExceedsPriority` if `new_priority` is greater than the current priority
    /// - `HeapError::InvalidPriority` if `new_priority` is not finite
    /// - `HeapError::InvalidHandle` if the element is no longer in this heap
    ///
    /// The heap is left untouched on error.
    fn decrease_key(&mut self, handle: &Self::Handle, new_priority: P) -> Result<(), HeapError>;

    /// Removes the element identified by `handle`, returning it
    ///
    /// # Errors
    /// Returns `HeapError::InvalidHandle` if the element is no longer in this heap.
    fn delete(&mut self, handle: &Self::Handle) -> Result<(P, T), HeapError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            HeapError::ExceedsPriority.to_string(),
            "new priority exceeds the current priority"
        );
        assert_eq!(
            HeapError::InvalidPriority.to_string(),
            "priority is not a finite number"
        );
        let boxed: Box<dyn std::error::Error> = Box::new(HeapError::InvalidHandle);
        assert!(boxed.to_string().contains("handle"));
    }
}
