use crate::graph::{Graph, Vertex};
use crate::spanning_tree::ParentMap;
use crate::stats::WalkStats;
use serde::Serialize;
use serde_json::{json, to_value};
use std::io::{stdout, BufWriter, Result, Write};

/// A standard interface for writing sampled trees and statistics
/// (to stdout, by default).
pub trait TreeWriter<V>: Send {
    /// Prints data about the graph before any trees are written.
    fn init(&mut self, graph: &Graph<V>) -> Result<()>;

    /// Prints the `index`th sampled tree and its walk statistics.
    fn tree(
        &mut self,
        index: u64,
        graph: &Graph<V>,
        tree: &ParentMap<V>,
        stats: &WalkStats,
    ) -> Result<()>;

    /// Cleans up after the last tree (flushes output).
    fn close(&mut self) -> Result<()>;
}

/// An output destination for a writer.
pub type Sink = Box<dyn Write + Send>;

fn stdout_sink() -> Sink {
    Box::new(BufWriter::new(stdout()))
}

/// Writes trees in JSONL (JSON Lines) format.
///
/// The first line is `{"init": {"num_vertices": .., "num_edges": ..}}`;
/// each tree is a line of the form
/// `{"tree": {"index": .., "root": .., "edges": [[child, parent], ..]}}`,
/// with an extra `"stats"` object if statistics are enabled.
pub struct JSONLWriter {
    out: Sink,
    /// Determines whether walk statistics are saved for each tree.
    stats: bool,
}

/// Writes trees in TSV (tab-separated values) format.
///
/// Rows in the output contain the following columns:
///   * `index` - The index of the tree in the run.
///   * `root` - The root of the tree.
///   * `steps` - The number of random walk steps used to draw the tree.
///   * `revisits` - The number of loop-erasing steps.
///   * `edges` - The `(child, parent)` pairs of the tree.
pub struct TSVWriter {
    out: Sink,
}

impl JSONLWriter {
    pub fn new(out: Sink, stats: bool) -> JSONLWriter {
        JSONLWriter {
            out: out,
            stats: stats,
        }
    }

    pub fn stdout(stats: bool) -> JSONLWriter {
        JSONLWriter::new(stdout_sink(), stats)
    }
}

impl TSVWriter {
    pub fn new(out: Sink) -> TSVWriter {
        TSVWriter { out: out }
    }

    pub fn stdout() -> TSVWriter {
        TSVWriter::new(stdout_sink())
    }
}

impl<V: Vertex + Serialize> TreeWriter<V> for JSONLWriter {
    fn init(&mut self, graph: &Graph<V>) -> Result<()> {
        let init = json!({
            "num_vertices": graph.len(),
            "num_edges": graph.edges().len(),
        });
        writeln!(self.out, "{}", json!({ "init": init }))
    }

    fn tree(
        &mut self,
        index: u64,
        _graph: &Graph<V>,
        tree: &ParentMap<V>,
        stats: &WalkStats,
    ) -> Result<()> {
        let mut record = to_value(tree)?;
        if let Some(fields) = record.as_object_mut() {
            fields.insert("index".to_string(), json!(index));
            if self.stats {
                fields.insert("stats".to_string(), to_value(stats)?);
            }
        }
        writeln!(self.out, "{}", json!({ "tree": record }))
    }

    fn close(&mut self) -> Result<()> {
        self.out.flush()
    }
}

impl<V: Vertex> TreeWriter<V> for TSVWriter {
    fn init(&mut self, _graph: &Graph<V>) -> Result<()> {
        writeln!(self.out, "index\troot\tsteps\trevisits\tedges")
    }

    fn tree(
        &mut self,
        index: u64,
        _graph: &Graph<V>,
        tree: &ParentMap<V>,
        stats: &WalkStats,
    ) -> Result<()> {
        writeln!(
            self.out,
            "{}\t{:?}\t{}\t{}\t{:?}",
            index,
            tree.root(),
            stats.steps,
            stats.revisits,
            tree.edges()
        )
    }

    fn close(&mut self) -> Result<()> {
        self.out.flush()
    }
}
