//! A lightweight undirected graph over arbitrary vertex identifiers.
use crate::error::{Result, UstError};
use petgraph::unionfind::UnionFind;
use std::cmp::{max, min};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Anything that can name a graph node (coordinates, integers, strings...).
pub trait Vertex: Clone + Eq + Hash + Debug {}

impl<T: Clone + Eq + Hash + Debug> Vertex for T {}

/// Edges are pairs of vertex indices `(a, b)` with `a < b`.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct Edge(pub usize, pub usize);

/// An undirected graph without self-loops or multi-edges.
///
/// Vertices are interned to consecutive indices in enumeration order;
/// the index-level accessors (`neighbor_indices`, `edges`) are what the
/// samplers use internally. The graph is immutable once built.
#[derive(Clone, Debug)]
pub struct Graph<V> {
    /// The vertices, in enumeration order.
    vertices: Vec<V>,
    /// Maps vertices to their indices in `vertices`.
    index: HashMap<V, usize>,
    /// The graph's adjacencies (list-of-lists format, by vertex index).
    neighbors: Vec<Vec<usize>>,
    /// The graph's edges, each stored once as `Edge(a, b)` with `a < b`,
    /// sorted by the first element of the pair.
    edges: Vec<Edge>,
    /// The nth element is the starting index of the block of edges
    /// in `edges` of the form (n, *).
    edges_start: Vec<usize>,
}

fn render<V: Debug>(v: &V) -> String {
    format!("{:?}", v)
}

impl<V: Vertex> Graph<V> {
    /// Builds a graph from a vertex → neighbors mapping. Vertices are
    /// enumerated in iteration order and neighbor order is preserved.
    ///
    /// Fails if a neighbor is not itself a key ([UstError::UnknownVertex]),
    /// if a vertex is repeated, if a vertex lists itself or the same
    /// neighbor twice, or if the adjacency is not symmetric.
    pub fn from_adjacency<I>(adjacency: I) -> Result<Graph<V>>
    where
        I: IntoIterator<Item = (V, Vec<V>)>,
    {
        let adjacency: Vec<(V, Vec<V>)> = adjacency.into_iter().collect();
        let (vertices, index) = Graph::intern(adjacency.iter().map(|(v, _)| v.clone()))?;

        let mut neighbors = Vec::<Vec<usize>>::with_capacity(vertices.len());
        for (idx, (v, adj)) in adjacency.iter().enumerate() {
            let mut node_neighbors = Vec::<usize>::with_capacity(adj.len());
            for u in adj.iter() {
                let u_idx = *index
                    .get(u)
                    .ok_or_else(|| UstError::UnknownVertex(render(u)))?;
                if u_idx == idx {
                    return Err(UstError::SelfLoop(render(v)));
                }
                if node_neighbors.contains(&u_idx) {
                    return Err(UstError::DuplicateEdge(render(v), render(u)));
                }
                node_neighbors.push(u_idx);
            }
            neighbors.push(node_neighbors);
        }

        for (a, adj) in neighbors.iter().enumerate() {
            for &b in adj.iter() {
                if !neighbors[b].contains(&a) {
                    return Err(UstError::AsymmetricAdjacency(
                        render(&vertices[a]),
                        render(&vertices[b]),
                    ));
                }
            }
        }
        Ok(Graph::from_parts(vertices, index, neighbors))
    }

    /// Builds a graph from a vertex list and a list of undirected edges.
    /// Neighbor lists are ordered by edge insertion.
    pub fn from_edges<I>(vertices: Vec<V>, edges: I) -> Result<Graph<V>>
    where
        I: IntoIterator<Item = (V, V)>,
    {
        let (vertices, index) = Graph::intern(vertices.into_iter())?;
        let mut neighbors = vec![Vec::<usize>::new(); vertices.len()];
        for (u, v) in edges {
            let a = *index
                .get(&u)
                .ok_or_else(|| UstError::UnknownVertex(render(&u)))?;
            let b = *index
                .get(&v)
                .ok_or_else(|| UstError::UnknownVertex(render(&v)))?;
            if a == b {
                return Err(UstError::SelfLoop(render(&u)));
            }
            if neighbors[a].contains(&b) {
                return Err(UstError::DuplicateEdge(render(&u), render(&v)));
            }
            neighbors[a].push(b);
            neighbors[b].push(a);
        }
        Ok(Graph::from_parts(vertices, index, neighbors))
    }

    fn intern<I>(iter: I) -> Result<(Vec<V>, HashMap<V, usize>)>
    where
        I: Iterator<Item = V>,
    {
        let mut vertices = Vec::<V>::new();
        let mut index = HashMap::<V, usize>::new();
        for v in iter {
            if index.contains_key(&v) {
                return Err(UstError::DuplicateVertex(render(&v)));
            }
            index.insert(v.clone(), vertices.len());
            vertices.push(v);
        }
        Ok((vertices, index))
    }

    /// Assembles a graph from validated parts, deriving the edge list.
    fn from_parts(
        vertices: Vec<V>,
        index: HashMap<V, usize>,
        neighbors: Vec<Vec<usize>>,
    ) -> Graph<V> {
        let mut edges = Vec::<Edge>::with_capacity(neighbors.iter().map(|n| n.len()).sum::<usize>() / 2);
        let mut edges_start = vec![0 as usize; vertices.len()];
        for (a, adj) in neighbors.iter().enumerate() {
            edges_start[a] = edges.len();
            let mut higher: Vec<usize> = adj.iter().cloned().filter(|&b| b > a).collect();
            higher.sort_unstable();
            edges.extend(higher.into_iter().map(|b| Edge(a, b)));
        }
        Graph {
            vertices: vertices,
            index: index,
            neighbors: neighbors,
            edges: edges,
            edges_start: edges_start,
        }
    }

    /// The number of vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// All vertices, in a stable enumeration order.
    pub fn vertices(&self) -> &[V] {
        &self.vertices
    }

    /// The vertex with index `idx`.
    pub fn vertex(&self, idx: usize) -> &V {
        &self.vertices[idx]
    }

    /// The index of `v`, if `v` is in the graph.
    pub fn index_of(&self, v: &V) -> Option<usize> {
        self.index.get(v).copied()
    }

    /// Like [Graph::index_of], but fails with [UstError::UnknownVertex].
    pub fn require(&self, v: &V) -> Result<usize> {
        self.index_of(v)
            .ok_or_else(|| UstError::UnknownVertex(render(v)))
    }

    /// The ordered neighbors of `v`.
    pub fn neighbors(&self, v: &V) -> Result<impl ExactSizeIterator<Item = &V> + '_> {
        let idx = self.require(v)?;
        Ok(self.neighbors[idx].iter().map(move |&u| &self.vertices[u]))
    }

    /// The ordered neighbor indices of the vertex with index `idx`.
    pub fn neighbor_indices(&self, idx: usize) -> &[usize] {
        &self.neighbors[idx]
    }

    pub fn degree(&self, v: &V) -> Result<usize> {
        Ok(self.neighbors[self.require(v)?].len())
    }

    /// The undirected edges of the graph (by vertex index).
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Finds the index (in [Graph::edges]) of the edge between the
    /// vertices with indices `a` and `b`.
    pub fn edge_index(&self, a: usize, b: usize) -> Option<usize> {
        let (a, b) = (min(a, b), max(a, b));
        let mut edge_idx = *self.edges_start.get(a)?;
        while let Some(edge) = self.edges.get(edge_idx) {
            if edge.0 != a {
                break;
            }
            if edge.1 == b {
                return Some(edge_idx);
            }
            edge_idx += 1;
        }
        None
    }

    /// The number of connected components (0 for the empty graph).
    pub fn num_components(&self) -> usize {
        let n = self.len();
        let mut uf = UnionFind::<usize>::new(n);
        for &Edge(a, b) in self.edges.iter() {
            uf.union(a, b);
        }
        (0..n).filter(|&idx| uf.find(idx) == idx).count()
    }

    pub fn is_connected(&self) -> bool {
        self.num_components() <= 1
    }

    /// Fails with [UstError::Disconnected] unless the graph is connected.
    pub fn check_connected(&self) -> Result<()> {
        match self.num_components() {
            components if components > 1 => Err(UstError::Disconnected { components }),
            _ => Ok(()),
        }
    }
}

impl Graph<(usize, usize)> {
    /// Returns a `width` × `height` grid graph with rook adjacency.
    ///
    /// Cells are `(x, y)` pairs enumerated row by row; neighbors are
    /// listed in the order left, up, right, down.
    pub fn grid(width: usize, height: usize) -> Graph<(usize, usize)> {
        Graph::masked_grid(width, height, |_, _| true)
    }

    /// Returns the subgraph of a `width` × `height` grid induced by the
    /// cells `(x, y)` for which `mask(x, y)` holds.
    ///
    /// Kept cells are enumerated row by row and neighbors are listed in
    /// the order left, up, right, down, skipping masked-out cells.
    pub fn masked_grid<F>(width: usize, height: usize, mask: F) -> Graph<(usize, usize)>
    where
        F: Fn(usize, usize) -> bool,
    {
        let mut vertices = Vec::<(usize, usize)>::new();
        let mut index = HashMap::<(usize, usize), usize>::new();
        for y in 0..height {
            for x in 0..width {
                if mask(x, y) {
                    index.insert((x, y), vertices.len());
                    vertices.push((x, y));
                }
            }
        }
        let neighbors = vertices
            .iter()
            .map(|&(x, y)| {
                let mut candidates = Vec::<(usize, usize)>::with_capacity(4);
                if x > 0 {
                    candidates.push((x - 1, y));
                }
                if y > 0 {
                    candidates.push((x, y - 1));
                }
                if x + 1 < width {
                    candidates.push((x + 1, y));
                }
                if y + 1 < height {
                    candidates.push((x, y + 1));
                }
                candidates.iter().filter_map(|cell| index.get(cell).copied()).collect()
            })
            .collect();
        Graph::from_parts(vertices, index, neighbors)
    }
}
