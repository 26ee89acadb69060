//! Shortest paths and minimum spanning trees over decrease-key heaps
//!
//! Both algorithms keep at most one heap entry per vertex and lower its
//! priority in place whenever a better candidate shows up, which is the access
//! pattern a Fibonacci heap is built for: O(E) `decrease_key` calls at O(1)
//! amortized each, against O(V) `pop` calls at O(log V).
//!
//! # Example
//!
//! ```rust
//! use fheap::graph::{dijkstra, Graph};
//! use fheap::FibHeap;
//!
//! let mut graph = Graph::new(4);
//! graph.add_edge(0, 1, 4u32).unwrap();
//! graph.add_edge(0, 2, 1).unwrap();
//! graph.add_edge(2, 1, 2).unwrap();
//! graph.add_edge(1, 3, 5).unwrap();
//!
//! let paths = dijkstra::<_, FibHeap<_, _>>(&graph, 0).unwrap();
//! assert_eq!(paths.distance(3), Some(8));
//! assert_eq!(paths.path_to(3), Some(vec![0, 2, 1, 3]));
//! ```

use crate::priority::Priority;
use crate::traits::{DecreaseKeyHeap, HeapError};
use std::fmt;

/// Edge weight usable by the algorithms in this module.
///
/// `Default` must be the additive zero.
pub trait Weight: Priority + Copy + Default {
    /// Sum of two weights, or `None` if it does not fit the type.
    ///
    /// Float sums that reach infinity count as overflow.
    fn checked_add(self, rhs: Self) -> Option<Self>;
}

macro_rules! impl_weight_integer {
    ($($t:ty),* $(,)?) => {
        $(
            impl Weight for $t {
                #[inline]
                fn checked_add(self, rhs: Self) -> Option<Self> {
                    <$t>::checked_add(self, rhs)
                }
            }
        )*
    };
}

macro_rules! impl_weight_float {
    ($($t:ty),* $(,)?) => {
        $(
            impl Weight for $t {
                #[inline]
                fn checked_add(self, rhs: Self) -> Option<Self> {
                    let sum = self + rhs;
                    sum.is_finite().then_some(sum)
                }
            }
        )*
    };
}

impl_weight_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
impl_weight_float!(f32, f64);

/// Error type for graph construction and traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphError {
    /// A vertex index is not below the vertex count
    NodeOutOfRange(usize),
    /// An edge weight is negative or not finite
    InvalidWeight,
    /// A path length or tree total does not fit the weight type
    PathOverflow,
    /// The underlying heap rejected an operation
    Heap(HeapError),
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::NodeOutOfRange(node) => write!(f, "vertex {node} is out of range"),
            GraphError::InvalidWeight => write!(f, "edge weight is negative or not finite"),
            GraphError::PathOverflow => write!(f, "path length overflows the weight type"),
            GraphError::Heap(err) => write!(f, "heap operation failed: {err}"),
        }
    }
}

impl std::error::Error for GraphError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GraphError::Heap(err) => Some(err),
            _ => None,
        }
    }
}

impl From<HeapError> for GraphError {
    fn from(err: HeapError) -> Self {
        GraphError::Heap(err)
    }
}

/// Weighted directed graph stored as adjacency lists.
///
/// Vertices are `0..node_count()`.
#[derive(Debug, Clone, Default)]
pub struct Graph<C> {
    adjacency: Vec<Vec<(usize, C)>>,
}

impl<C: Weight> Graph<C> {
    /// Creates a graph with `nodes` vertices and no edges
    pub fn new(nodes: usize) -> Self {
        Graph {
            adjacency: (0..nodes).map(|_| Vec::new()).collect(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    /// Adds a vertex and returns its index
    pub fn add_node(&mut self) -> usize {
        self.adjacency.push(Vec::new());
        self.adjacency.len() - 1
    }

    /// Adds a directed edge.
    ///
    /// # Errors
    /// - `GraphError::NodeOutOfRange` if either endpoint does not exist
    /// - `GraphError::InvalidWeight` if the weight is negative or not finite
    pub fn add_edge(&mut self, from: usize, to: usize, weight: C) -> Result<(), GraphError> {
        self.check_node(to)?;
        self.check_node(from)?;
        if !weight.is_valid() || weight < C::default() {
            return Err(GraphError::InvalidWeight);
        }
        self.adjacency[from].push((to, weight));
        Ok(())
    }

    /// Adds an edge in both directions
    pub fn add_undirected_edge(&mut self, a: usize, b: usize, weight: C) -> Result<(), GraphError> {
        self.add_edge(a, b, weight)?;
        self.add_edge(b, a, weight)
    }

    /// Outgoing edges of `node` as `(target, weight)` pairs
    pub fn neighbors(&self, node: usize) -> &[(usize, C)] {
        self.adjacency.get(node).map_or(&[], Vec::as_slice)
    }

    fn check_node(&self, node: usize) -> Result<(), GraphError> {
        if node < self.adjacency.len() {
            Ok(())
        } else {
            Err(GraphError::NodeOutOfRange(node))
        }
    }
}

/// Result of [`dijkstra`]: distances and a shortest-path tree from one source
#[derive(Debug, Clone)]
pub struct ShortestPaths<C> {
    source: usize,
    distance: Vec<Option<C>>,
    predecessor: Vec<Option<usize>>,
}

impl<C: Copy> ShortestPaths<C> {
    pub fn source(&self) -> usize {
        self.source
    }

    /// Length of the shortest path to `node`, or `None` if unreachable
    pub fn distance(&self, node: usize) -> Option<C> {
        self.distance.get(node).copied().flatten()
    }

    /// Vertices of a shortest path from the source to `target`, both included
    pub fn path_to(&self, target: usize) -> Option<Vec<usize>> {
        self.distance(target)?;
        let mut path = vec![target];
        let mut current = target;
        while let Some(prev) = self.predecessor[current] {
            path.push(prev);
            current = prev;
        }
        path.reverse();
        Some(path)
    }
}

/// Single-source shortest paths with Dijkstra's algorithm.
///
/// # Type Parameters
/// - `C`: The edge weight type
/// - `H`: The heap used as the frontier
///
/// # Errors
/// - `GraphError::NodeOutOfRange` if `source` does not exist
/// - `GraphError::PathOverflow` if a path length does not fit `C`
pub fn dijkstra<C, H>(graph: &Graph<C>, source: usize) -> Result<ShortestPaths<C>, GraphError>
where
    C: Weight,
    H: DecreaseKeyHeap<usize, C>,
{
    graph.check_node(source)?;
    let n = graph.node_count();
    let mut distance: Vec<Option<C>> = vec![None; n];
    let mut predecessor: Vec<Option<usize>> = vec![None; n];
    let mut handles: Vec<Option<H::Handle>> = vec![None; n];
    let mut settled = vec![false; n];
    let mut frontier = H::new();

    distance[source] = Some(C::default());
    handles[source] = Some(frontier.push_with_handle(C::default(), source)?);

    while let Some((dist, node)) = frontier.pop() {
        settled[node] = true;
        handles[node] = None;

        for &(next, weight) in graph.neighbors(node) {
            if settled[next] {
                continue;
            }
            let candidate = dist.checked_add(weight).ok_or(GraphError::PathOverflow)?;
            match (handles[next], distance[next]) {
                (Some(handle), Some(current)) => {
                    if candidate < current {
                        frontier.decrease_key(&handle, candidate)?;
                        distance[next] = Some(candidate);
                        predecessor[next] = Some(node);
                    }
                }
                _ => {
                    handles[next] = Some(frontier.push_with_handle(candidate, next)?);
                    distance[next] = Some(candidate);
                    predecessor[next] = Some(node);
                }
            }
        }
    }

    Ok(ShortestPaths {
        source,
        distance,
        predecessor,
    })
}

/// Result of [`prim`]
#[derive(Debug, Clone)]
pub struct SpanningTree<C> {
    /// Tree edges as `(parent, child, weight)`, in the order they were added
    pub edges: Vec<(usize, usize, C)>,
    /// Sum of all edge weights
    pub total: C,
}

impl<C> SpanningTree<C> {
    /// Number of vertices spanned, the root included
    pub fn node_count(&self) -> usize {
        self.edges.len() + 1
    }
}

/// Minimum spanning tree of the component containing `root`, using Prim's
/// algorithm.
///
/// The graph is read as undirected; build it with
/// [`Graph::add_undirected_edge`].
pub fn prim<C, H>(graph: &Graph<C>, root: usize) -> Result<SpanningTree<C>, GraphError>
where
    C: Weight,
    H: DecreaseKeyHeap<usize, C>,
{
    graph.check_node(root)?;
    let n = graph.node_count();
    let mut key: Vec<Option<C>> = vec![None; n];
    let mut parent: Vec<Option<usize>> = vec![None; n];
    let mut handles: Vec<Option<H::Handle>> = vec![None; n];
    let mut in_tree = vec![false; n];
    let mut frontier = H::new();
    let mut tree = SpanningTree {
        edges: Vec::new(),
        total: C::default(),
    };

    key[root] = Some(C::default());
    handles[root] = Some(frontier.push_with_handle(C::default(), root)?);

    while let Some((weight, node)) = frontier.pop() {
        in_tree[node] = true;
        handles[node] = None;
        if let Some(p) = parent[node] {
            tree.edges.push((p, node, weight));
            tree.total = tree.total.checked_add(weight).ok_or(GraphError::PathOverflow)?;
        }

        for &(next, edge) in graph.neighbors(node) {
            if in_tree[next] {
                continue;
            }
            match (handles[next], key[next]) {
                (Some(handle), Some(current)) => {
                    if edge < current {
                        frontier.decrease_key(&handle, edge)?;
                        key[next] = Some(edge);
                        parent[next] = Some(node);
                    }
                }
                _ => {
                    handles[next] = Some(frontier.push_with_handle(edge, next)?);
                    key[next] = Some(edge);
                    parent[next] = Some(node);
                }
            }
        }
    }

    Ok(tree)
}
