//! Error types for graph construction and spanning tree sampling.
use thiserror::Error;

/// Errors raised while building graphs or sampling spanning trees.
///
/// Vertices are reported by their `Debug` rendering so that the error
/// type does not depend on the vertex type.
#[derive(Debug, Error)]
pub enum UstError {
    /// A vertex was referenced that is not part of the graph.
    #[error("unknown vertex {0}")]
    UnknownVertex(String),

    /// Sampling was requested on a graph with no vertices.
    #[error("cannot sample a spanning tree of an empty graph")]
    EmptyGraph,

    /// A vertex appears more than once in the vertex set.
    #[error("vertex {0} appears more than once")]
    DuplicateVertex(String),

    /// A vertex is listed as its own neighbor.
    #[error("self-loop at vertex {0}")]
    SelfLoop(String),

    /// An edge appears more than once (multi-edges are not supported).
    #[error("duplicate edge between {0} and {1}")]
    DuplicateEdge(String, String),

    /// `a` lists `b` as a neighbor, but not the other way around.
    #[error("{0} is adjacent to {1}, but {1} is not adjacent to {0}")]
    AsymmetricAdjacency(String, String),

    /// The graph has more than one connected component.
    #[error("graph is disconnected ({components} components)")]
    Disconnected { components: usize },

    /// The diagnostic step limit of a sampler was reached before
    /// the tree spanned the graph.
    #[error("random walks exceeded the step limit of {limit}")]
    StepLimitExceeded { limit: u64 },

    /// Sampling was cancelled between walks.
    #[error("sampling cancelled with {committed} of {total} vertices in the tree")]
    Cancelled { committed: usize, total: usize },

    /// A parent map does not describe a spanning tree of its graph.
    #[error("invalid spanning tree: {0}")]
    InvalidTree(String),

    /// Counting spanning trees failed in the linear algebra backend.
    #[error("linear algebra error: {0}")]
    Linalg(#[from] ndarray_linalg::error::LinalgError),

    /// An output writer failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A worker thread panicked during a batch run.
    #[error("a sampling worker panicked")]
    WorkerPanicked,
}

pub type Result<T> = std::result::Result<T, UstError>;
