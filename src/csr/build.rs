//! The CSR construction pipeline: vertex-count discovery, degree counting,
//! offset assignment (parallel prefix-sum), edge scatter, and per-vertex
//! sort-and-dedup. Each phase is internally parallel; phases run in the
//! sequence below because each consumes the previous phase's output.

use rayon::ThreadPool;
use rayon::prelude::*;
use std::sync::atomic::{AtomicI64, Ordering};
use sync_cell_slice::{SyncCell, SyncSlice};

use super::{Csr, MINVECT_SIZE};
use crate::atomics;
use crate::edge::EdgeRecord;
use crate::error::GraphError;
use crate::prefix_sum::{parallel_prefix_sum, worker_slice};

impl Csr {
    /// Builds a CSR graph from an unordered edge list. Self-loops and
    /// negative endpoints are silently dropped; duplicate edges collapse
    /// into a single neighbor entry.
    pub fn from_edges(edges: &[EdgeRecord], pool: &ThreadPool) -> Result<Csr, GraphError> {
        if edges.is_empty() {
            return Err(GraphError::EmptyEdgeList);
        }

        // `maxvtx` is `-1` when every record was self-loop/negative-endpoint
        // garbage (no valid edge ever updates it past its seed). `nv` then
        // comes out to 0 and the rest of the pipeline runs to a degenerate,
        // zero-vertex `Csr` rather than an error — matching the reference
        // builder, which has no such check and treats an all-garbage input
        // the same as the `nv = 0` case (see DESIGN.md).
        let maxvtx = find_max_vertex(edges, pool);
        let nv = usize::try_from(maxvtx.checked_add(1).ok_or(GraphError::Allocation {
            context: "csr vertex count",
        })?)
        .map_err(|_| GraphError::Allocation {
            context: "csr vertex count",
        })?;
        log::debug!("csr build: nv={nv} discovered from {} edge records", edges.len());

        let degree_cells = count_degrees(edges, nv, pool);
        apply_degree_floor(&degree_cells, pool);

        let total_capacity = parallel_prefix_sum(&degree_cells, pool);
        let total_capacity = usize::try_from(total_capacity).map_err(|_| GraphError::Allocation {
            context: "csr neighbor storage",
        })?;

        // `degree_cells` now holds start offsets (the prefix sum ran in
        // place). Materialize the stable `offsets` array, with the total
        // capacity as its trailing sentinel.
        let mut offsets = Vec::with_capacity(nv + 1);
        offsets.extend(degree_cells.iter().map(|c| c.load(Ordering::Relaxed) as usize));
        offsets.push(total_capacity);

        let end_cursors: Vec<AtomicI64> = offsets[..nv]
            .iter()
            .map(|&start| AtomicI64::new(start as i64))
            .collect();

        let mut neighbors = vec![-1i64; total_capacity];
        scatter_edges(edges, &end_cursors, &mut neighbors, pool);

        let end_offsets = pack_and_dedup(&mut neighbors, &offsets, &end_cursors, pool);
        let num_edges = end_offsets
            .iter()
            .zip(offsets.iter())
            .map(|(&end, &start)| end - start)
            .sum();

        log::debug!(
            "csr build: {num_edges} packed directed half-edges, {total_capacity} slots allocated"
        );

        Ok(Csr {
            offsets,
            end_offsets,
            neighbors,
            num_vertices: nv,
            num_edges,
        })
    }
}

/// Per-worker local maxima combined into one shared maximum via CAS retry,
/// mirroring the reference design's `find_nv` phase.
fn find_max_vertex(edges: &[EdgeRecord], pool: &ThreadPool) -> i64 {
    let shared_max = AtomicI64::new(-1);
    let n = edges.len();
    let num_threads = pool.current_num_threads().min(n).max(1);

    pool.broadcast(|ctx| {
        let tid = ctx.index();
        if tid >= num_threads {
            return;
        }
        let (start, end) = worker_slice(n, num_threads, tid);

        let mut local_max = -1i64;
        for e in &edges[start..end] {
            local_max = local_max.max(e.v0()).max(e.v1());
        }

        let mut observed = shared_max.load(Ordering::Relaxed);
        while local_max > observed {
            let witnessed = atomics::cas_val(&shared_max, observed, local_max);
            if witnessed == observed {
                break;
            }
            observed = witnessed;
        }
    });

    shared_max.load(Ordering::Relaxed)
}

fn count_degrees(edges: &[EdgeRecord], nv: usize, pool: &ThreadPool) -> Vec<AtomicI64> {
    let degrees: Vec<AtomicI64> = (0..nv).map(|_| AtomicI64::new(0)).collect();
    pool.install(|| {
        edges.par_iter().for_each(|e| {
            if e.is_valid() {
                atomics::fetch_add(&degrees[e.v0() as usize], 1);
                atomics::fetch_add(&degrees[e.v1() as usize], 1);
            }
        });
    });
    degrees
}

fn apply_degree_floor(degrees: &[AtomicI64], pool: &ThreadPool) {
    pool.install(|| {
        degrees.par_iter().for_each(|d| {
            if d.load(Ordering::Relaxed) < MINVECT_SIZE {
                d.store(MINVECT_SIZE, Ordering::Relaxed);
            }
        });
    });
}

fn scatter_edges(
    edges: &[EdgeRecord],
    end_cursors: &[AtomicI64],
    neighbors: &mut [i64],
    pool: &ThreadPool,
) {
    let capacity = neighbors.len();
    let sync = neighbors.as_sync_slice();
    pool.install(|| {
        edges.par_iter().for_each(|e| {
            if e.is_valid() {
                let i = e.v0() as usize;
                let j = e.v1() as usize;
                scatter_half_edge(i, j, end_cursors, sync, capacity);
                scatter_half_edge(j, i, end_cursors, sync, capacity);
            }
        });
    });
}

#[inline]
fn scatter_half_edge(
    from: usize,
    to: usize,
    end_cursors: &[AtomicI64],
    sync: &[SyncCell<i64>],
    capacity: usize,
) {
    let reserved = atomics::fetch_add(&end_cursors[from], 1) as usize;
    debug_assert!(reserved < capacity, "scatter reservation exceeds neighbor capacity");
    unsafe { sync[reserved].set(to as i64) };
}

/// Sorts and deduplicates every vertex's live neighbor range in parallel,
/// over disjoint `&mut [i64]` sub-slices carved out by a single sequential
/// `split_at_mut` walk. Returns the packed `end_offsets` array.
fn pack_and_dedup(
    neighbors: &mut [i64],
    offsets: &[usize],
    end_cursors: &[AtomicI64],
    pool: &ThreadPool,
) -> Vec<usize> {
    let nv = offsets.len() - 1;
    let local_counts: Vec<usize> = (0..nv)
        .map(|k| (end_cursors[k].load(Ordering::Relaxed) as usize) - offsets[k])
        .collect();

    let slices = split_by_offsets(neighbors, offsets);
    let packed_counts: Vec<usize> = pool.install(|| {
        slices
            .into_par_iter()
            .zip(local_counts.par_iter())
            .map(|(slice, &count)| pack_vertex_slice(slice, count))
            .collect()
    });

    offsets[..nv]
        .iter()
        .zip(packed_counts.iter())
        .map(|(&start, &count)| start + count)
        .collect()
}

/// Sorts `slice[..count]`, removes consecutive duplicates and self-loops in
/// place, fills the vacated tail (up to `slice.len()`) with `-1`, and
/// returns the new live count.
fn pack_vertex_slice(slice: &mut [i64], count: usize) -> usize {
    if count <= 1 {
        return count;
    }

    let live = &mut slice[..count];
    live.sort_unstable();

    let mut kept = 1usize;
    for i in 1..count {
        if live[i] != live[kept - 1] {
            live[kept] = live[i];
            kept += 1;
        }
    }

    for v in &mut slice[kept..count] {
        *v = -1;
    }
    kept
}

/// Splits `data` into `offsets.len() - 1` disjoint mutable sub-slices, the
/// `k`-th spanning `offsets[k]..offsets[k + 1]`, via one sequential
/// `split_at_mut` walk.
fn split_by_offsets<'a>(data: &'a mut [i64], offsets: &[usize]) -> Vec<&'a mut [i64]> {
    let mut slices = Vec::with_capacity(offsets.len() - 1);
    let mut rest = data;
    let mut consumed = 0usize;
    for &end in &offsets[1..] {
        let len = end - consumed;
        let (head, tail) = rest.split_at_mut(len);
        slices.push(head);
        rest = tail;
        consumed = end;
    }
    slices
}
