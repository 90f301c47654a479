//! In-place parallel exclusive prefix sum over a shared `AtomicI64` array,
//! following the "each worker owns a contiguous slice, reduce locally, scan
//! the per-worker totals once, rewrite" protocol of the reference design.

use rayon::ThreadPool;
use std::sync::Barrier;
use std::sync::atomic::{AtomicI64, Ordering};

/// Computes the exclusive prefix sum of `data` in place and returns the
/// total. `rayon::ThreadPool::broadcast` is used as the fork-join region so
/// every worker gets its own index and the pool's thread count, mirroring a
/// single `omp parallel` region in the design this is grounded on.
pub(crate) fn parallel_prefix_sum(data: &[AtomicI64], pool: &ThreadPool) -> i64 {
    let n = data.len();
    if n == 0 {
        return 0;
    }

    let num_threads = pool.current_num_threads().min(n).max(1);
    let buf: Vec<AtomicI64> = (0..num_threads).map(|_| AtomicI64::new(0)).collect();
    let barrier = Barrier::new(num_threads);

    pool.broadcast(|ctx| {
        let tid = ctx.index();
        if tid >= num_threads {
            return;
        }
        let (start, end) = worker_slice(n, num_threads, tid);

        let mut local_sum = 0i64;
        for k in start..end {
            local_sum += data[k].load(Ordering::Relaxed);
        }
        buf[tid].store(local_sum, Ordering::Relaxed);

        barrier.wait();

        // A single worker turns the per-worker totals into an inclusive scan.
        if tid == 0 {
            for k in 1..num_threads {
                let prev = buf[k - 1].load(Ordering::Relaxed);
                buf[k].fetch_add(prev, Ordering::Relaxed);
            }
        }

        barrier.wait();

        let seed = if tid == 0 {
            0
        } else {
            buf[tid - 1].load(Ordering::Relaxed)
        };
        let mut running = seed;
        for k in start..end {
            let count = data[k].load(Ordering::Relaxed);
            data[k].store(running, Ordering::Relaxed);
            running += count;
        }
    });

    buf[num_threads - 1].load(Ordering::Relaxed)
}

/// The `[start, end)` range owned by worker `tid` out of `num_threads`,
/// with the first `n % num_threads` workers taking one extra element.
pub(crate) fn worker_slice(n: usize, num_threads: usize, tid: usize) -> (usize, usize) {
    let base = n / num_threads;
    let rem = n % num_threads;
    let start = base * tid + tid.min(rem);
    let end = base * (tid + 1) + (tid + 1).min(rem);
    (start, end)
}
