//! Enqueues twenty entries with random priorities and prints them in
//! extraction order.
//!
//! ```sh
//! cargo run --example simple
//! ```

use fheap::FibHeap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn main() -> Result<(), fheap::HeapError> {
    let mut rng = StdRng::seed_from_u64(22);
    let mut heap = FibHeap::new();

    for i in 0..20 {
        heap.enqueue(rng.gen::<f64>(), i)?;
    }

    while let Some((priority, item)) = heap.dequeue_min() {
        println!("Min {item} ({priority:.4})");
    }
    Ok(())
}
