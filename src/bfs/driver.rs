//! Direction-optimizing BFS driver: chooses top-down or bottom-up per
//! level from the frontier's expected edge volume, and owns the
//! frontier/bitmap/parent allocations for one traversal.

use rayon::ThreadPool;
use rayon::prelude::*;
use std::sync::atomic::{AtomicI64, Ordering};

use super::bottom_up::bottom_up_step;
use super::frontier::{fill_bitmap_from_queue, fill_queue_from_bitmap};
use super::top_down::top_down_step;
use super::{ALPHA, BETA};
use crate::bitmap::Bitmap;
use crate::csr::Csr;
use crate::error::GraphError;

enum Direction {
    TopDown,
    BottomUp,
}

/// Runs a single BFS from `source` over `csr`, returning a parent array of
/// length `csr.num_vertices()` with `-1` marking unreached vertices.
pub fn bfs_tree(csr: &Csr, source: usize, pool: &ThreadPool) -> Result<Vec<i64>, GraphError> {
    let nv = csr.num_vertices();
    if source >= nv {
        return Err(GraphError::VertexOutOfRange {
            vertex: source,
            num_vertices: nv,
        });
    }

    let parent: Vec<AtomicI64> = pool.install(|| {
        (0..nv)
            .into_par_iter()
            .map(|v| AtomicI64::new(if v == source { source as i64 } else { -1 }))
            .collect()
    });

    let mut frontier = vec![-1i64; nv];
    frontier[0] = source as i64;
    let (mut k1, mut k2) = (0usize, 1usize);

    let mut past = Bitmap::new(nv);
    let mut next = Bitmap::new(nv);

    let down_cutoff = (nv as i64) / BETA;
    let mut edges_to_check = csr.total_capacity() as i64;
    let mut scout_count = csr.degree_unchecked(source) as i64;
    let mut awake_count = 1i64;

    while awake_count != 0 {
        let direction = if scout_count < (edges_to_check - scout_count) / ALPHA {
            Direction::TopDown
        } else {
            Direction::BottomUp
        };

        match direction {
            Direction::TopDown => {
                log::debug!(
                    "bfs: top-down, frontier={}, scout_count={scout_count}, edges_to_check={edges_to_check}",
                    k2 - k1
                );
                let shared_k2 = AtomicI64::new(k2 as i64);
                let new_k2 = top_down_step(csr, &parent, &mut frontier, k1, k2, &shared_k2, pool);
                edges_to_check -= scout_count;
                k1 = k2;
                k2 = new_k2;
                awake_count = (k2 - k1) as i64;
            }
            Direction::BottomUp => {
                log::debug!(
                    "bfs: bottom-up, frontier={}, scout_count={scout_count}, edges_to_check={edges_to_check}",
                    k2 - k1
                );
                fill_bitmap_from_queue(&next, &frontier, k1, k2, pool);
                loop {
                    awake_count = bottom_up_step(csr, &parent, &mut past, &mut next, pool);
                    if awake_count <= down_cutoff {
                        break;
                    }
                }
                let (new_k1, new_k2) = fill_queue_from_bitmap(&next, &mut frontier, pool);
                k1 = new_k1;
                k2 = new_k2;
            }
        }

        scout_count = pool.install(|| {
            frontier[k1..k2]
                .par_iter()
                .map(|&v| csr.degree_unchecked(v as usize) as i64)
                .sum()
        });
    }

    Ok(parent
        .into_iter()
        .map(|cell| cell.into_inner())
        .collect())
}
