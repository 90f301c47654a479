//! Thread-pool construction. Every entry point takes a `&rayon::ThreadPool`
//! explicitly rather than relying on rayon's implicit global pool, so a
//! caller can size or pin worker counts per invocation.

use rayon::ThreadPoolBuildError;

/// Builds a `rayon::ThreadPool` with rayon's default worker-count heuristic
/// (one worker per logical CPU). A convenience for callers with no sizing
/// preference of their own; the integration tests build explicitly-sized
/// pools instead, to keep CSR/BFS results reproducible across machines.
pub fn default_pool() -> Result<rayon::ThreadPool, ThreadPoolBuildError> {
    rayon::ThreadPoolBuilder::new().build()
}
