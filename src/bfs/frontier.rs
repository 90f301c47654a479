//! Reversible projection between a dense queue of vertex IDs and a bit set
//! indexed by vertex, used when the driver switches direction.

use rayon::ThreadPool;
use rayon::prelude::*;
use std::sync::atomic::{AtomicI64, Ordering};
use sync_cell_slice::{SyncCell, SyncSlice};

use super::THREAD_BUF_LEN;
use crate::atomics;
use crate::bitmap::Bitmap;
use crate::prefix_sum::worker_slice;

/// Atomic-sets `bm[frontier[q]]` for every `q` in `[out, in_)`. `bm` must be
/// zero on entry; indices may collide across workers (multiple vertices
/// sharing a bitmap word), hence the atomic set.
pub(crate) fn fill_bitmap_from_queue(
    bm: &Bitmap,
    frontier: &[i64],
    out: usize,
    in_: usize,
    pool: &ThreadPool,
) {
    pool.install(|| {
        frontier[out..in_].par_iter().for_each(|&v| {
            bm.set_atomic(v as usize);
        });
    });
}

/// Drains every set bit of `bm` into `frontier[0..)`, in no specified
/// order, and returns the new `(k1, k2)` cursor pair `(0, count)`.
pub(crate) fn fill_queue_from_bitmap(
    bm: &Bitmap,
    frontier: &mut [i64],
    pool: &ThreadPool,
) -> (usize, usize) {
    let nv = bm.len();
    let in_ = AtomicI64::new(0);
    let num_threads = pool.current_num_threads().min(nv.max(1)).max(1);
    let sync = frontier.as_sync_slice();

    pool.broadcast(|ctx| {
        let tid = ctx.index();
        if tid >= num_threads || nv == 0 {
            return;
        }
        let (start, end) = worker_slice(nv, num_threads, tid);
        if start >= end {
            return;
        }

        let mut buf: Vec<i64> = Vec::with_capacity(THREAD_BUF_LEN);
        let mut pos = start;
        // `next_set_bit` returns the first bit strictly after `pos`, so
        // check the window's first bit directly before scanning onward.
        let mut cursor = if bm.get(start) {
            Some(start)
        } else {
            bm.next_set_bit(start)
        };

        while let Some(bit) = cursor {
            if bit >= end {
                break;
            }
            buf.push(bit as i64);
            if buf.len() == THREAD_BUF_LEN {
                flush(&buf, &in_, sync);
                buf.clear();
            }
            pos = bit;
            cursor = bm.next_set_bit(pos);
        }

        if !buf.is_empty() {
            flush(&buf, &in_, sync);
        }
    });

    (0, in_.load(Ordering::Relaxed) as usize)
}

fn flush(buf: &[i64], in_: &AtomicI64, sync: &[SyncCell<i64>]) {
    let reserved = atomics::fetch_add(in_, buf.len() as i64) as usize;
    for (offset, &v) in buf.iter().enumerate() {
        unsafe { sync[reserved + offset].set(v) };
    }
}
