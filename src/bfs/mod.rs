//! Direction-optimizing BFS: a level-synchronous traversal that alternates
//! between frontier expansion (top-down) and predecessor scanning
//! (bottom-up) based on the volume of edges the current frontier would
//! examine.

mod bottom_up;
mod driver;
mod frontier;
mod top_down;

pub use driver::bfs_tree;

/// Threshold on `scout_count` vs remaining unexplored edges below which
/// top-down is cheaper than bottom-up.
pub(crate) const ALPHA: i64 = 14;
/// Divides `nv` to get the frontier-size cutoff for switching back to
/// top-down after a run of bottom-up levels.
pub(crate) const BETA: i64 = 24;
/// Per-worker scratch buffer capacity for queue writes (top-down append,
/// bitmap-to-queue flush).
pub(crate) const THREAD_BUF_LEN: usize = 16384;
