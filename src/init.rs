//! Utility functions for loading graph data.
use crate::graph::Graph;
use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::fs;

/// Loads graph data in the NetworkX `adjacency_data` format. Returns an
/// [anyhow::Result] containing a [Graph] and the raw graph JSON tree upon
/// a successful load.
///
/// Vertices are named by the integer `id` of each node, and enumerated in
/// file order.
///
/// # Arguments
///
/// * `path` - the path of the graph JSON file.
pub fn graph_from_networkx(path: &str) -> Result<(Graph<usize>, Value)> {
    let raw = fs::read_to_string(path).with_context(|| format!("Could not load graph from {}", path))?;
    graph_from_networkx_str(&raw)
}

/// Like [graph_from_networkx], but parses an in-memory JSON string.
pub fn graph_from_networkx_str(raw: &str) -> Result<(Graph<usize>, Value)> {
    let data: Value = serde_json::from_str(raw).context("Could not parse graph JSON")?;
    if data["directed"].as_bool() == Some(true) || data["multigraph"].as_bool() == Some(true) {
        bail!("Only simple undirected graphs are supported");
    }

    let raw_nodes = data["nodes"].as_array().context("Could not find `nodes`")?;
    let raw_adj = data["adjacency"]
        .as_array()
        .context("Could not find `adjacency`")?;
    if raw_nodes.len() != raw_adj.len() {
        bail!(
            "Found {} nodes but {} adjacency lists",
            raw_nodes.len(),
            raw_adj.len()
        );
    }

    let mut adjacency = Vec::<(usize, Vec<usize>)>::with_capacity(raw_nodes.len());
    for (index, (node, adj)) in raw_nodes.iter().zip(raw_adj.iter()).enumerate() {
        let id = node["id"]
            .as_u64()
            .with_context(|| format!("Node {} has no integer `id`", index))?;
        let node_neighbors = adj
            .as_array()
            .with_context(|| format!("Adjacency list of node {} is not a list", id))?
            .iter()
            .map(|n| {
                n["id"]
                    .as_u64()
                    .map(|n| n as usize)
                    .with_context(|| format!("Neighbor of node {} has no integer `id`", id))
            })
            .collect::<Result<Vec<usize>>>()?;
        adjacency.push((id as usize, node_neighbors));
    }

    let graph = Graph::from_adjacency(adjacency).context("Invalid graph adjacency")?;
    Ok((graph, data))
}
