//! Thin wrappers over `AtomicI64` matching the three primitives the rest of
//! this crate is built from. `AtomicI64` is always available on supported
//! targets, so unlike the reference implementation this is grounded on,
//! there is no non-atomic critical-section fallback to provide.

use std::sync::atomic::{AtomicI64, Ordering};

/// Atomically adds `incr` to `*cell` and returns the previous value.
#[inline(always)]
pub(crate) fn fetch_add(cell: &AtomicI64, incr: i64) -> i64 {
    cell.fetch_add(incr, Ordering::Relaxed)
}

/// Atomically sets `*cell` to `new` if it currently equals `old`, returning
/// whichever value was actually observed (the "witnessed" value).
#[inline(always)]
pub(crate) fn cas_val(cell: &AtomicI64, old: i64, new: i64) -> i64 {
    match cell.compare_exchange(old, new, Ordering::Relaxed, Ordering::Relaxed) {
        Ok(v) | Err(v) => v,
    }
}

/// Atomically sets `*cell` to `new` if it currently equals `old`, returning
/// whether the swap succeeded.
#[inline(always)]
pub(crate) fn cas_bool(cell: &AtomicI64, old: i64, new: i64) -> bool {
    cell.compare_exchange(old, new, Ordering::Relaxed, Ordering::Relaxed)
        .is_ok()
}
