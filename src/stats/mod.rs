//! Statistics for spanning tree samplers.

/// Spanning tree count statistics.
mod spanning_trees;
/// Uniformity checks over many samples.
mod uniformity;
/// Random walk statistics.
mod walks;
/// I/O for sampled trees and statistics.
mod writers;

pub use crate::stats::spanning_trees::spanning_tree_count;
pub use crate::stats::uniformity::TreeTally;
pub use crate::stats::walks::WalkStats;
pub use crate::stats::writers::{JSONLWriter, Sink, TSVWriter, TreeWriter};
