use thiserror::Error;

/// Errors surfaced by CSR construction and BFS traversal.
///
/// Contention and self-healing retries (CAS loops, fetch-add reservations)
/// are never reported here — only conditions a caller must react to.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphError {
    /// `Csr::from_edges` was called with an empty edge slice.
    #[error("cannot build a graph from an empty edge list")]
    EmptyEdgeList,

    /// A vertex index passed to a traversal or accessor is outside `[0, num_vertices)`.
    #[error("vertex {vertex} is out of range for a graph with {num_vertices} vertices")]
    VertexOutOfRange { vertex: usize, num_vertices: usize },

    /// A size computation required to allocate CSR or BFS storage would overflow.
    #[error("allocation size overflow while computing storage for {context}")]
    Allocation { context: &'static str },
}
