//! Predecessor scan: each unvisited vertex checks its own neighbor slice
//! against the previous frontier's bitmap, claiming the first (lowest-ID)
//! neighbor found awake as its parent.

use rayon::ThreadPool;
use rayon::prelude::*;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::bitmap::Bitmap;
use crate::csr::Csr;

/// Swaps `past`/`next`, resets the new `next`, then scans every unvisited
/// vertex against `past`. Returns the count of vertices claimed this step
/// (the new frontier's size).
pub(crate) fn bottom_up_step(
    csr: &Csr,
    parent: &[AtomicI64],
    past: &mut Bitmap,
    next: &mut Bitmap,
    pool: &ThreadPool,
) -> i64 {
    past.swap(next);
    next.reset(pool);

    let nv = csr.num_vertices();
    pool.install(|| {
        (0..nv)
            .into_par_iter()
            .map(|i| {
                if parent[i].load(Ordering::Relaxed) != -1 {
                    return 0i64;
                }
                for &j in csr.neighbors_unchecked(i) {
                    if past.get(j as usize) {
                        parent[i].store(j, Ordering::Relaxed);
                        next.set(i);
                        return 1i64;
                    }
                }
                0i64
            })
            .sum()
    })
}
