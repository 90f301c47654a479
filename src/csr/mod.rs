mod build;

use crate::error::GraphError;

/// The minimum neighbor-slice capacity reserved per vertex, even at degree 0
/// or 1. Gives very small vertices usable space and lets a caller read one
/// slot past a zero-degree vertex's range without going out of bounds.
pub(crate) const MINVECT_SIZE: i64 = 2;

/// A compressed sparse row graph: an owned, immutable value built once by
/// [`Csr::from_edges`] and shared by reference with every BFS invocation.
///
/// There is no companion `destroy`/`free` operation — dropping a `Csr`
/// releases its storage the way any other owned Rust value does.
pub struct Csr {
    /// Length `num_vertices + 1`. `offsets[k]` is the fixed start of vertex
    /// `k`'s neighbor slice; `offsets[num_vertices]` is the total allocated
    /// neighbor capacity.
    offsets: Vec<usize>,
    /// Length `num_vertices`. The exclusive end of vertex `k`'s packed
    /// (sorted, deduplicated) neighbor slice.
    end_offsets: Vec<usize>,
    /// Flat neighbor storage. Unused slots (beyond `end_offsets[k]` but
    /// before `offsets[k + 1]`) carry `-1`.
    neighbors: Vec<i64>,
    num_vertices: usize,
    num_edges: usize,
}

impl Csr {
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    /// Total directed half-edges after symmetrization and deduplication.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    /// Total allocated neighbor-storage capacity (`offsets[num_vertices]`),
    /// including the `MINVECT_SIZE` padding for low-degree vertices. The
    /// BFS driver uses this, not [`Csr::num_edges`], as the initial
    /// `edges_to_check` budget.
    #[inline]
    pub(crate) fn total_capacity(&self) -> usize {
        self.offsets[self.num_vertices]
    }

    #[inline]
    pub fn degree(&self, v: usize) -> Result<usize, GraphError> {
        self.bounds_check(v)?;
        Ok(self.end_offsets[v] - self.offsets[v])
    }

    /// The sorted, deduplicated, self-loop-free neighbor slice of `v`.
    #[inline]
    pub fn neighbors(&self, v: usize) -> Result<&[i64], GraphError> {
        self.bounds_check(v)?;
        Ok(&self.neighbors[self.offsets[v]..self.end_offsets[v]])
    }

    /// Same as [`Csr::neighbors`] without the bounds check, for hot BFS loops
    /// that already know `v < num_vertices` by construction (it is always a
    /// value drawn from the frontier or a `0..num_vertices` range).
    #[inline(always)]
    pub(crate) fn neighbors_unchecked(&self, v: usize) -> &[i64] {
        &self.neighbors[self.offsets[v]..self.end_offsets[v]]
    }

    #[inline(always)]
    pub(crate) fn degree_unchecked(&self, v: usize) -> usize {
        self.end_offsets[v] - self.offsets[v]
    }

    fn bounds_check(&self, v: usize) -> Result<(), GraphError> {
        if v >= self.num_vertices {
            return Err(GraphError::VertexOutOfRange {
                vertex: v,
                num_vertices: self.num_vertices,
            });
        }
        Ok(())
    }
}
