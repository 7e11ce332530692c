//! Graph module orchestrator.
//!
//! The node arena and adjacency relation live in the private `core` module;
//! `notation` renders a graph back into the bracketed topology format.

mod core;
mod notation;

pub use self::core::{Graph, Node, NodeIndex, NodeSpec};
