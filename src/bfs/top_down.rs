//! Frontier expansion: each worker claims unvisited neighbors of its slice
//! of the current frontier via CAS on the parent array, buffering newly
//! claimed vertices into the next frontier through a thread-local scratch
//! buffer.

use rayon::ThreadPool;
use rayon::prelude::*;
use std::sync::atomic::{AtomicI64, Ordering};
use sync_cell_slice::{SyncCell, SyncSlice};

use super::THREAD_BUF_LEN;
use crate::atomics;
use crate::csr::Csr;

/// Expands `frontier[k1..k2)`, claiming unvisited neighbors into `parent`
/// and appending them to `frontier` past the shared cursor `k2`. Returns
/// the new `k2` (the driver advances `k1` to the old `k2` afterward).
pub(crate) fn top_down_step(
    csr: &Csr,
    parent: &[AtomicI64],
    frontier: &mut [i64],
    k1: usize,
    k2: usize,
    shared_k2: &AtomicI64,
    pool: &ThreadPool,
) -> usize {
    let sync = frontier.as_sync_slice();
    let nv = csr.num_vertices();

    pool.install(|| {
        frontier[k1..k2].par_iter().for_each(|&v| {
            let mut scratch: Vec<i64> = Vec::with_capacity(THREAD_BUF_LEN);
            for &j in csr.neighbors_unchecked(v as usize) {
                let jv = j as usize;
                if parent[jv].load(Ordering::Relaxed) == -1
                    && atomics::cas_bool(&parent[jv], -1, v)
                {
                    scratch.push(j);
                    if scratch.len() == THREAD_BUF_LEN {
                        flush(&scratch, shared_k2, sync, nv);
                        scratch.clear();
                    }
                }
            }
            if !scratch.is_empty() {
                flush(&scratch, shared_k2, sync, nv);
            }
        });
    });

    shared_k2.load(Ordering::Relaxed) as usize
}

fn flush(scratch: &[i64], shared_k2: &AtomicI64, sync: &[SyncCell<i64>], nv: usize) {
    let reserved = atomics::fetch_add(shared_k2, scratch.len() as i64) as usize;
    debug_assert!(
        reserved + scratch.len() <= nv,
        "top-down frontier write exceeds vertex count"
    );
    for (offset, &v) in scratch.iter().enumerate() {
        unsafe { sync[reserved + offset].set(v) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::EdgeRecord;

    fn pool() -> ThreadPool {
        rayon::ThreadPoolBuilder::new().num_threads(4).build().unwrap()
    }

    #[test]
    fn single_step_claims_direct_neighbors_exactly_once() {
        let edges: Vec<EdgeRecord> = [(0i64, 1i64), (0, 2), (1, 3), (2, 3)]
            .iter()
            .map(|&(a, b)| EdgeRecord::new(a, b, 1.0))
            .collect();
        let csr = Csr::from_edges(&edges, &pool()).unwrap();

        let nv = csr.num_vertices();
        let parent: Vec<AtomicI64> = (0..nv).map(|_| AtomicI64::new(-1)).collect();
        parent[0].store(0, Ordering::Relaxed);

        let mut frontier = vec![-1i64; nv];
        frontier[0] = 0;
        let shared_k2 = AtomicI64::new(1);

        let new_k2 = top_down_step(&csr, &parent, &mut frontier, 0, 1, &shared_k2, &pool());
        assert_eq!(new_k2, 3);

        let mut discovered: Vec<i64> = frontier[1..new_k2].to_vec();
        discovered.sort_unstable();
        assert_eq!(discovered, vec![1, 2]);
        assert_eq!(parent[1].load(Ordering::Relaxed), 0);
        assert_eq!(parent[2].load(Ordering::Relaxed), 0);
        assert_eq!(parent[3].load(Ordering::Relaxed), -1);
    }
}
