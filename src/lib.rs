//! Fibonacci heap priority queue
//!
//! This crate provides a mergeable min-priority queue backed by a Fibonacci
//! heap, as described by Fredman and Tarjan:
//!
//! - O(1) amortized enqueue, peek, decrease_key, and union
//! - O(log n) amortized dequeue_min and delete
//!
//! It pays off in algorithms that lower priorities far more often than they
//! extract minima, such as Dijkstra's shortest paths and Prim's minimum
//! spanning tree (see [`graph`]).
//!
//! # Features
//!
//! - Nodes live in generational arenas, so the heap is free of `unsafe` and
//!   stale handles are reported as errors instead of corrupting memory
//! - Union keeps every outstanding handle valid
//! - NaN and infinite priorities are rejected up front
//! - With the `validate` feature, debug builds re-check every structural
//!   invariant after each mutation
//!
//! # Example
//!
//! ```rust
//! use fheap::FibHeap;
//!
//! let mut heap = FibHeap::new();
//! let handle1 = heap.enqueue(5, "item1").unwrap();
//! heap.enqueue(3, "item2").unwrap();
//! heap.decrease_key(&handle1, 1).unwrap();
//! assert_eq!(heap.peek(), Some((&1, &"item1")));
//! assert_eq!(heap.dequeue_min(), Some((1, "item1")));
//! assert_eq!(heap.len(), 1);
//! ```
//!
//! Handles are opaque. The arena storage behind them is private to the crate:
//!
//! ```compile_fail
//! use fheap::storage::NodeStore;
//! ```
//!
//! Heaps are single-threaded: every mutation takes `&mut self`, so sharing one
//! across threads needs an external lock.

pub mod fibonacci;
pub mod graph;
pub mod priority;
pub(crate) mod ring;
pub(crate) mod storage;
pub mod traits;

// Re-export the main types for convenience
pub use fibonacci::{FibHandle, FibHeap, InvariantViolation};
pub use priority::Priority;
pub use traits::{DecreaseKeyHeap, Heap, HeapError};
