//! Tallies of sampled trees, for checking samplers against the uniform
//! distribution.
use crate::error::Result;
use crate::graph::{Graph, Vertex};
use crate::spanning_tree::ParentMap;
use std::collections::HashMap;

/// Counts how often each distinct spanning tree was sampled.
///
/// Trees are keyed by their sorted edge indices, so two samples with
/// different roots but the same edges count as the same tree.
#[derive(Clone, Debug, Default)]
pub struct TreeTally {
    counts: HashMap<Vec<usize>, u64>,
    total: u64,
}

impl TreeTally {
    pub fn new() -> TreeTally {
        TreeTally::default()
    }

    /// Records a sampled tree of `graph`.
    pub fn record<V: Vertex>(&mut self, graph: &Graph<V>, tree: &ParentMap<V>) -> Result<()> {
        let key = tree.edge_indices(graph)?;
        *self.counts.entry(key).or_insert(0) += 1;
        self.total += 1;
        Ok(())
    }

    /// The number of trees recorded.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// The number of distinct trees recorded.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// How often the tree with the given sorted edge indices was recorded.
    pub fn count(&self, edge_indices: &[usize]) -> u64 {
        self.counts.get(edge_indices).copied().unwrap_or(0)
    }

    /// The recorded counts, in no particular order.
    pub fn counts(&self) -> impl Iterator<Item = (&Vec<usize>, &u64)> + '_ {
        self.counts.iter()
    }

    /// Pearson's chi-squared statistic of the tally against the uniform
    /// distribution over `num_trees` trees (with `num_trees - 1` degrees
    /// of freedom). Trees that were never sampled count as zeros.
    pub fn chi_squared(&self, num_trees: usize) -> f64 {
        if num_trees == 0 || self.total == 0 {
            return 0.0;
        }
        let expected = self.total as f64 / num_trees as f64;
        let seen: f64 = self
            .counts
            .values()
            .map(|&c| (c as f64 - expected).powi(2) / expected)
            .sum();
        let unseen = num_trees.saturating_sub(self.distinct()) as f64 * expected;
        seen + unseen
    }
}
