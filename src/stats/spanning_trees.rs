//! Spanning tree statistics (number of spanning trees in a graph).
use crate::error::Result;
use crate::graph::{Edge, Graph, Vertex};
use ndarray::{s, Array2};
use ndarray_linalg::Determinant;

/// The precision of the determinant (and other intermediate values).
type MatEl = f64;

/// Computes the Laplacian matrix of a graph (rows in vertex index order).
fn laplacian<V: Vertex>(graph: &Graph<V>) -> Array2<MatEl> {
    let n = graph.len();
    let mut lap = Array2::<MatEl>::zeros((n, n));
    for idx in 0..n {
        lap[[idx, idx]] = graph.neighbor_indices(idx).len() as MatEl;
    }
    for &Edge(a, b) in graph.edges().iter() {
        lap[[a, b]] = -1 as MatEl;
        lap[[b, a]] = -1 as MatEl;
    }
    lap
}

/// Computes the number of spanning trees of `graph` using Kirchhoff's
/// matrix-tree theorem (the determinant of any reduced Laplacian).
///
/// Disconnected graphs (and the empty graph) have no spanning trees.
pub fn spanning_tree_count<V: Vertex>(graph: &Graph<V>) -> Result<MatEl> {
    match graph.len() {
        0 => Ok(0 as MatEl),
        1 => Ok(1 as MatEl), // special case: single node
        _ => {
            let lap = laplacian(graph);
            let reduced = lap.slice(s![1.., 1..]).to_owned();
            Ok(reduced.det()?.max(0 as MatEl))
        }
    }
}
