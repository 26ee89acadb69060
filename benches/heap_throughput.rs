//! Heap throughput benchmarks
//!
//! Compares `FibHeap` against `std::collections::BinaryHeap` on the two
//! workloads that matter for a Fibonacci heap:
//!
//! - **push/pop**: n random pushes followed by draining the heap
//! - **Dijkstra**: shortest paths on a seeded random graph, where `FibHeap`
//!   lowers priorities in place and the binary heap pushes duplicates and
//!   skips stale entries on pop
//!
//! ## Running
//!
//! ```sh
//! cargo bench --bench heap_throughput
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fheap::graph::{dijkstra, Graph};
use fheap::FibHeap;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

const SEED: u64 = 0xF1B0;

fn random_priorities(n: usize) -> Vec<u64> {
    let mut rng = SmallRng::seed_from_u64(SEED);
    (0..n).map(|_| rng.gen_range(0..1_000_000)).collect()
}

/// Random sparse digraph with a Hamiltonian chain so every vertex is reachable
fn random_graph(nodes: usize, extra_edges: usize) -> Graph<u64> {
    let mut rng = SmallRng::seed_from_u64(SEED);
    let mut graph = Graph::new(nodes);
    for v in 1..nodes {
        // Endpoints exist and weights are positive, so these cannot fail
        graph.add_edge(v - 1, v, rng.gen_range(1..1000)).unwrap();
    }
    for _ in 0..extra_edges {
        let from = rng.gen_range(0..nodes);
        let to = rng.gen_range(0..nodes);
        graph.add_edge(from, to, rng.gen_range(1..1000)).unwrap();
    }
    graph
}

/// Lazy-deletion Dijkstra on the standard library heap, for reference
fn binary_heap_dijkstra(graph: &Graph<u64>, source: usize) -> Vec<Option<u64>> {
    let mut distance = vec![None; graph.node_count()];
    let mut frontier = BinaryHeap::new();
    distance[source] = Some(0);
    frontier.push(Reverse((0u64, source)));

    while let Some(Reverse((dist, node))) = frontier.pop() {
        if distance[node].map_or(false, |best| dist > best) {
            continue;
        }
        for &(next, weight) in graph.neighbors(node) {
            let candidate = dist + weight;
            if distance[next].map_or(true, |best| candidate < best) {
                distance[next] = Some(candidate);
                frontier.push(Reverse((candidate, next)));
            }
        }
    }
    distance
}

fn benchmark_push_pop(c: &mut Criterion) {
    let mut group = c.benchmark_group("push_pop");

    for &n in &[1_000usize, 10_000, 100_000] {
        let priorities = random_priorities(n);

        group.bench_with_input(BenchmarkId::new("fibonacci", n), &priorities, |b, ps| {
            b.iter(|| {
                let mut heap = FibHeap::with_capacity(ps.len());
                for (i, &p) in ps.iter().enumerate() {
                    heap.enqueue(p, i).unwrap();
                }
                while let Some(entry) = heap.dequeue_min() {
                    black_box(entry);
                }
            })
        });

        group.bench_with_input(BenchmarkId::new("std_binary", n), &priorities, |b, ps| {
            b.iter(|| {
                let mut heap = BinaryHeap::with_capacity(ps.len());
                for (i, &p) in ps.iter().enumerate() {
                    heap.push(Reverse((p, i)));
                }
                while let Some(entry) = heap.pop() {
                    black_box(entry);
                }
            })
        });
    }

    group.finish();
}

fn benchmark_decrease_key(c: &mut Criterion) {
    let mut group = c.benchmark_group("decrease_key");

    for &n in &[1_000usize, 10_000, 100_000] {
        let priorities = random_priorities(n);

        group.bench_with_input(BenchmarkId::new("fibonacci", n), &priorities, |b, ps| {
            b.iter(|| {
                let mut heap = FibHeap::with_capacity(ps.len());
                let handles: Vec<_> = ps
                    .iter()
                    .enumerate()
                    .map(|(i, &p)| heap.enqueue(p + 1_000_000, i).unwrap())
                    .collect();
                // One extraction builds the trees that decreases then cut
                black_box(heap.dequeue_min());
                for (handle, &p) in handles.iter().zip(ps) {
                    // Skip the entry the extraction removed
                    if heap.contains(handle) {
                        heap.decrease_key(handle, p).unwrap();
                    }
                }
                black_box(heap.len())
            })
        });
    }

    group.finish();
}

fn benchmark_dijkstra(c: &mut Criterion) {
    let mut group = c.benchmark_group("dijkstra");
    group.sample_size(20);

    for &nodes in &[1_000usize, 10_000] {
        let graph = random_graph(nodes, nodes * 8);

        group.bench_with_input(BenchmarkId::new("fibonacci", nodes), &graph, |b, g| {
            b.iter(|| {
                let paths = dijkstra::<_, FibHeap<_, _>>(g, 0);
                black_box(paths.map(|paths| paths.distance(nodes - 1)))
            })
        });

        group.bench_with_input(BenchmarkId::new("std_binary_lazy", nodes), &graph, |b, g| {
            b.iter(|| black_box(binary_heap_dijkstra(g, 0)[nodes - 1]))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_push_pop, benchmark_decrease_key, benchmark_dijkstra);

criterion_main!(benches);
