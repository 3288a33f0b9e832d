//! Uniform spanning trees via Wilson's algorithm.
//!
//! Wilson's algorithm [1] grows a tree from a uniformly random root. For
//! every vertex not yet in the tree, it runs a random walk until the walk
//! hits the tree, then adds the loop-erased path of the walk to the tree.
//! The loop erasure is implicit: each step overwrites the walking vertex's
//! successor, so after the walk the successor pointers from the start
//! vertex trace exactly the loop-erased path.
//!
//! # References
//! [1]  Wilson, David Bruce. "Generating random spanning trees more quickly
//!      than the cover time." Proceedings of the twenty-eighth annual ACM
//!      symposium on Theory of computing. 1996.
use crate::buffers::USTBuffer;
use crate::error::{Result, UstError};
use crate::graph::{Graph, Vertex};
use crate::random::RandomSource;
use crate::stats::WalkStats;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::cmp::max;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// A rooted spanning tree, stored as the parent of every non-root vertex.
///
/// The tree's edges are exactly the pairs `(v, parent(v))`.
#[derive(Clone, Debug)]
pub struct ParentMap<V> {
    root: V,
    /// Non-root vertices, in graph enumeration order.
    order: Vec<V>,
    parents: HashMap<V, V>,
}

impl<V: Vertex> ParentMap<V> {
    /// Builds a parent map from `(child, parent)` pairs. No validation is
    /// done; see [ParentMap::verify].
    pub fn from_pairs<I>(root: V, pairs: I) -> ParentMap<V>
    where
        I: IntoIterator<Item = (V, V)>,
    {
        let mut order = Vec::<V>::new();
        let mut parents = HashMap::<V, V>::new();
        for (child, parent) in pairs {
            if parents.insert(child.clone(), parent).is_none() {
                order.push(child);
            }
        }
        ParentMap {
            root: root,
            order: order,
            parents: parents,
        }
    }

    /// Reads the tree out of a finished walk buffer.
    fn from_buffer(graph: &Graph<V>, root: usize, buf: &USTBuffer) -> ParentMap<V> {
        let n = graph.len();
        let mut order = Vec::<V>::with_capacity(n.saturating_sub(1));
        let mut parents = HashMap::<V, V>::with_capacity(n.saturating_sub(1));
        for (idx, v) in graph.vertices().iter().enumerate() {
            if idx != root {
                order.push(v.clone());
                parents.insert(v.clone(), graph.vertex(buf.next[idx]).clone());
            }
        }
        ParentMap {
            root: graph.vertex(root).clone(),
            order: order,
            parents: parents,
        }
    }

    pub fn root(&self) -> &V {
        &self.root
    }

    /// The parent of `v` (`None` for the root and for unknown vertices).
    pub fn parent(&self, v: &V) -> Option<&V> {
        self.parents.get(v)
    }

    /// The number of edges in the tree.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Whether `v` is a vertex of the tree.
    pub fn contains(&self, v: &V) -> bool {
        *v == self.root || self.parents.contains_key(v)
    }

    /// Iterates over `(child, parent)` pairs in graph enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (&V, &V)> + '_ {
        self.order
            .iter()
            .filter_map(move |v| self.parents.get(v).map(|p| (v, p)))
    }

    /// The tree's edges as `(child, parent)` pairs.
    pub fn edges(&self) -> Vec<(V, V)> {
        self.iter().map(|(v, p)| (v.clone(), p.clone())).collect()
    }

    /// The vertices from `v` to the root (inclusive), or `None` if `v`
    /// is not in the tree or the parent pointers from `v` cycle.
    pub fn path_to_root(&self, v: &V) -> Option<Vec<V>> {
        if !self.contains(v) {
            return None;
        }
        let mut path = vec![v.clone()];
        let mut cursor = v;
        while *cursor != self.root {
            if path.len() > self.len() {
                return None;
            }
            cursor = self.parents.get(cursor)?;
            path.push(cursor.clone());
        }
        Some(path)
    }

    /// The unique path in the tree from `a` to `b` (both inclusive), or
    /// `None` if either vertex is not reachable from the root.
    ///
    /// The path climbs from `a` to the lowest common ancestor of `a` and
    /// `b`, then descends to `b`.
    pub fn path(&self, a: &V, b: &V) -> Option<Vec<V>> {
        let mut up = self.path_to_root(a)?;
        let mut down = self.path_to_root(b)?;
        // Both paths end at the root; strip their common tail, keeping
        // the lowest common ancestor on `up`.
        while up.len() > 1 && down.len() > 1 && up[up.len() - 2] == down[down.len() - 2] {
            up.pop();
            down.pop();
        }
        down.pop();
        up.extend(down.into_iter().rev());
        Some(up)
    }

    /// The number of edges between `v` and the root.
    pub fn depth(&self, v: &V) -> Option<usize> {
        self.path_to_root(v).map(|path| path.len() - 1)
    }

    /// The sorted indices (in [Graph::edges]) of the tree's edges.
    /// Two parent maps describe the same undirected tree iff their
    /// edge indices are equal.
    pub fn edge_indices(&self, graph: &Graph<V>) -> Result<Vec<usize>> {
        let mut indices = Vec::<usize>::with_capacity(self.len());
        for (v, p) in self.iter() {
            let a = graph.require(v)?;
            let b = graph.require(p)?;
            let edge = graph.edge_index(a, b).ok_or_else(|| {
                UstError::InvalidTree(format!("{:?} -> {:?} is not an edge of the graph", v, p))
            })?;
            indices.push(edge);
        }
        indices.sort_unstable();
        Ok(indices)
    }

    /// Checks that the map is a spanning tree of `graph` rooted at
    /// [ParentMap::root]: every non-root vertex has a parent, every
    /// `(v, parent(v))` pair is a graph edge, and every vertex reaches
    /// the root without revisiting a vertex.
    pub fn verify(&self, graph: &Graph<V>) -> Result<()> {
        graph.require(&self.root)?;
        if self.parents.contains_key(&self.root) {
            return Err(UstError::InvalidTree(format!(
                "the root {:?} has a parent",
                self.root
            )));
        }
        for v in graph.vertices() {
            if !self.contains(v) {
                return Err(UstError::InvalidTree(format!("{:?} is not in the tree", v)));
            }
        }
        if self.len() + 1 != graph.len() {
            return Err(UstError::InvalidTree(format!(
                "expected {} edges but got {}",
                graph.len() - 1,
                self.len()
            )));
        }
        let mut indices = self.edge_indices(graph)?;
        indices.dedup();
        if indices.len() != self.len() {
            return Err(UstError::InvalidTree("an edge is used twice".to_string()));
        }
        for v in self.order.iter() {
            if self.path_to_root(v).is_none() {
                return Err(UstError::InvalidTree(format!(
                    "{:?} does not reach the root",
                    v
                )));
            }
        }
        Ok(())
    }
}

impl<V: Vertex> PartialEq for ParentMap<V> {
    fn eq(&self, other: &ParentMap<V>) -> bool {
        self.root == other.root && self.order == other.order && self.parents == other.parents
    }
}

impl<V: Vertex> Eq for ParentMap<V> {}

impl<V: Vertex + Serialize> Serialize for ParentMap<V> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let edges: Vec<(&V, &V)> = self.iter().collect();
        let mut state = serializer.serialize_struct("ParentMap", 2)?;
        state.serialize_field("root", &self.root)?;
        state.serialize_field("edges", &edges)?;
        state.end()
    }
}

/// Runs a random walk from the vertex with index `start` until it hits
/// the tree in `buf`, recording each visited vertex's most recent
/// successor in `buf.next`. Returns the index of the tree vertex hit.
///
/// Overwriting `buf.next` on every visit is the loop erasure: when the
/// walk returns to a vertex, the loop since its last visit is forgotten.
///
/// # Arguments
/// * `graph` - The graph to walk on.
/// * `start` - The index of the vertex to start from.
/// * `buf` - The walk buffer; `buf.in_tree` marks the current tree.
/// * `source` - The source of uniform neighbor choices.
/// * `stats` - Running statistics, updated in place.
/// * `step_limit` - An optional cap on `stats.steps` (diagnostic only).
pub fn loop_erased_random_walk<V: Vertex, S: RandomSource>(
    graph: &Graph<V>,
    start: usize,
    buf: &mut USTBuffer,
    source: &mut S,
    stats: &mut WalkStats,
    step_limit: Option<u64>,
) -> Result<usize> {
    buf.walk += 1;
    stats.walks += 1;
    let walk = buf.walk;
    let mut u = start;
    while !buf.in_tree[u] {
        if let Some(limit) = step_limit {
            if stats.steps >= limit {
                return Err(UstError::StepLimitExceeded { limit });
            }
        }
        let neighbors = graph.neighbor_indices(u);
        if neighbors.is_empty() {
            // An isolated vertex can never reach the tree.
            return Err(UstError::Disconnected {
                components: graph.num_components(),
            });
        }
        if buf.visited_in[u] == walk {
            stats.revisits += 1;
        } else {
            buf.visited_in[u] = walk;
        }
        let neighbor = neighbors[source.index(neighbors.len())];
        buf.next[u] = neighbor;
        stats.steps += 1;
        u = neighbor;
    }
    Ok(u)
}

/// Adds the loop-erased path starting at `start` to the tree in `buf`,
/// following `buf.next` until the path meets the tree. Returns the number
/// of vertices added.
pub fn commit_walk(start: usize, buf: &mut USTBuffer) -> usize {
    let mut committed = 0;
    let mut u = start;
    while !buf.in_tree[u] {
        buf.insert(u);
        committed += 1;
        u = buf.next[u];
    }
    committed
}

/// Samples spanning trees from the uniform distribution, reusing its
/// buffers across samples.
pub struct USTSampler {
    /// A buffer for Wilson's algorithm.
    buf: USTBuffer,
    /// Diagnostic cap on the total number of walk steps per sample.
    step_limit: Option<u64>,
}

impl USTSampler {
    /// Creates a UST sampler for graphs of approximate size `n`.
    /// (Buffers grow as needed.)
    pub fn new(n: usize) -> USTSampler {
        USTSampler {
            buf: USTBuffer::new(n),
            step_limit: None,
        }
    }

    /// Caps the total number of random walk steps per sample. A sample
    /// that hits the cap fails with [UstError::StepLimitExceeded].
    ///
    /// This is a diagnostic for catching disconnected inputs; Wilson's
    /// algorithm has no step bound on connected graphs, and a cap that is
    /// ever hit there means the caller is conditioning on fast walks.
    pub fn with_step_limit(mut self, limit: u64) -> USTSampler {
        self.step_limit = Some(limit);
        self
    }

    pub fn step_limit(&self) -> Option<u64> {
        self.step_limit
    }

    /// Draws a random spanning tree of `graph` from the uniform distribution.
    ///
    /// `graph` must be connected: on a disconnected graph the walks from the
    /// components not containing the root never finish (unless a step limit
    /// is set, or a vertex is isolated, which is reported as
    /// [UstError::Disconnected]).
    pub fn random_spanning_tree<V: Vertex, S: RandomSource>(
        &mut self,
        graph: &Graph<V>,
        source: &mut S,
    ) -> Result<ParentMap<V>> {
        self.sample(graph, source, None).map(|(tree, _)| tree)
    }

    /// Like [USTSampler::random_spanning_tree], but also returns statistics
    /// about the random walks.
    pub fn random_spanning_tree_with_stats<V: Vertex, S: RandomSource>(
        &mut self,
        graph: &Graph<V>,
        source: &mut S,
    ) -> Result<(ParentMap<V>, WalkStats)> {
        self.sample(graph, source, None)
    }

    /// Like [USTSampler::random_spanning_tree_with_stats], but checks
    /// `cancel` before each walk and fails with [UstError::Cancelled]
    /// once it is set. Walks are never interrupted midway.
    pub fn random_spanning_tree_cancellable<V: Vertex, S: RandomSource>(
        &mut self,
        graph: &Graph<V>,
        source: &mut S,
        cancel: &AtomicBool,
    ) -> Result<(ParentMap<V>, WalkStats)> {
        self.sample(graph, source, Some(cancel))
    }

    fn sample<V: Vertex, S: RandomSource>(
        &mut self,
        graph: &Graph<V>,
        source: &mut S,
        cancel: Option<&AtomicBool>,
    ) -> Result<(ParentMap<V>, WalkStats)> {
        let n = graph.len();
        if n == 0 {
            return Err(UstError::EmptyGraph);
        }
        self.buf.reset(n);
        let mut stats = WalkStats::default();
        let root = source.index(n);
        self.buf.insert(root);
        for z in 0..n {
            if self.buf.in_tree[z] {
                continue;
            }
            if let Some(flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    return Err(UstError::Cancelled {
                        committed: self.buf.committed,
                        total: n,
                    });
                }
            }
            loop_erased_random_walk(graph, z, &mut self.buf, source, &mut stats, self.step_limit)?;
            let branch = commit_walk(z, &mut self.buf) as u64;
            stats.committed += branch;
            stats.longest_branch = max(stats.longest_branch, branch);
        }
        debug_assert_eq!(self.buf.committed, n);
        Ok((ParentMap::from_buffer(graph, root, &self.buf), stats))
    }
}

/// Draws a uniformly random spanning tree of a connected `graph`.
///
/// Fails with [UstError::EmptyGraph] if the graph has no vertices.
/// Connectivity is not checked (see [generate_connected]); on a
/// disconnected graph this may never return.
pub fn generate<V: Vertex, S: RandomSource>(graph: &Graph<V>, source: &mut S) -> Result<ParentMap<V>> {
    USTSampler::new(graph.len()).random_spanning_tree(graph, source)
}

/// Like [generate], but fails with [UstError::Disconnected] instead of
/// looping forever when `graph` is disconnected.
pub fn generate_connected<V: Vertex, S: RandomSource>(
    graph: &Graph<V>,
    source: &mut S,
) -> Result<ParentMap<V>> {
    graph.check_connected()?;
    generate(graph, source)
}
