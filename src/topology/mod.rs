//! Topology module orchestrator.
//!
//! Decodes the compact bracketed notation
//! `<split-tree [<node window space depth x y w h> ...] [[src dst] ...]>`
//! into node specs and index-pair edges, then commits them to a [`crate::Graph`]
//! all at once or not at all.

mod core;
mod scanner;

pub use self::core::{IngestSummary, Topology, parse};
