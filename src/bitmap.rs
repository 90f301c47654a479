//! A fixed-size, packed bit set indexed by vertex, shared across worker
//! threads via interior-mutable atomic words.

use rayon::ThreadPool;
use rayon::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};

const BITS_PER_WORD: usize = 64;

/// A bit set over `[0, len)`, backed by `⌈len/64⌉` atomic 64-bit words.
///
/// Every bit starts clear. `set` is a plain (non-atomic) OR intended for
/// callers that already own the bit's word exclusively for the duration of
/// the call (the bottom-up step's static per-vertex parallel-for);
/// `set_atomic` is a CAS loop for callers racing with other writers (the
/// frontier→bitmap projection).
pub struct Bitmap {
    words: Vec<AtomicU64>,
    len: usize,
}

impl Bitmap {
    /// Allocates a zeroed bitmap covering `len` bits.
    pub fn new(len: usize) -> Self {
        let num_words = len.div_ceil(BITS_PER_WORD);
        let mut words = Vec::with_capacity(num_words);
        words.resize_with(num_words, || AtomicU64::new(0));
        Self { words, len }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Zeroes every word in parallel.
    pub fn reset(&self, pool: &ThreadPool) {
        pool.install(|| {
            self.words.par_iter().for_each(|w| w.store(0, Ordering::Relaxed));
        });
    }

    #[inline]
    pub fn get(&self, pos: usize) -> bool {
        debug_assert!(pos < self.len);
        let word = self.words[pos / BITS_PER_WORD].load(Ordering::Relaxed);
        word & (1u64 << (pos % BITS_PER_WORD)) != 0
    }

    /// Non-atomic OR. Callers must guarantee no concurrent writer touches
    /// the same 64-bit word.
    #[inline]
    pub fn set(&self, pos: usize) {
        debug_assert!(pos < self.len);
        let word = &self.words[pos / BITS_PER_WORD];
        let bit = 1u64 << (pos % BITS_PER_WORD);
        let prev = word.load(Ordering::Relaxed);
        word.store(prev | bit, Ordering::Relaxed);
    }

    /// CAS loop: safe when other threads may set bits in the same word
    /// concurrently.
    #[inline]
    pub fn set_atomic(&self, pos: usize) {
        debug_assert!(pos < self.len);
        let word = &self.words[pos / BITS_PER_WORD];
        let bit = 1u64 << (pos % BITS_PER_WORD);
        let mut old = word.load(Ordering::Relaxed);
        loop {
            if old & bit != 0 {
                return;
            }
            match word.compare_exchange_weak(
                old,
                old | bit,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return,
                Err(witnessed) => old = witnessed,
            }
        }
    }

    /// Smallest `q > pos` with `get(q)`, or `None` if there is none.
    pub fn next_set_bit(&self, pos: usize) -> Option<usize> {
        let bit_offset = pos % BITS_PER_WORD;
        let mut word_idx = pos / BITS_PER_WORD;
        if word_idx >= self.words.len() {
            return None;
        }

        let mut temp = if bit_offset == BITS_PER_WORD - 1 {
            0
        } else {
            self.words[word_idx].load(Ordering::Relaxed) >> (bit_offset + 1)
        };

        let mut next = pos;
        if temp == 0 {
            next = (next / BITS_PER_WORD) * BITS_PER_WORD;
            loop {
                word_idx += 1;
                if word_idx >= self.words.len() {
                    return None;
                }
                temp = self.words[word_idx].load(Ordering::Relaxed);
                next += BITS_PER_WORD;
                if temp != 0 {
                    break;
                }
            }
        } else {
            next += 1;
        }

        while temp & 1 == 0 {
            temp >>= 1;
            next += 1;
        }

        if next < self.len { Some(next) } else { None }
    }

    /// Exchanges the underlying word storage of two bitmaps in O(1).
    pub fn swap(&mut self, other: &mut Bitmap) {
        std::mem::swap(&mut self.words, &mut other.words);
        std::mem::swap(&mut self.len, &mut other.len);
    }
}
