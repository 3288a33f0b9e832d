//! Library definition for wilson: uniform spanning trees via Wilson's
//! algorithm.
pub mod buffers;
pub mod config;
pub mod error;
pub mod graph;
pub mod init;
pub mod random;
pub mod run;
pub mod spanning_tree;
pub mod stats;

pub use crate::error::{Result, UstError};
pub use crate::graph::{Graph, Vertex};
pub use crate::random::RandomSource;
pub use crate::spanning_tree::{generate, generate_connected, ParentMap, USTSampler};
