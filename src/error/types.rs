use std::collections::TryReserveError;

use thiserror::Error;

/// Unified result type for the spatial propagator crate.
pub type Result<T> = std::result::Result<T, PropagatorError>;

/// Errors surfaced by the propagator engine.
#[derive(Debug, Error)]
pub enum PropagatorError {
    #[error("allocation failed: {0}")]
    Allocation(#[from] TryReserveError),
    #[error("window {0} is already bound to a node")]
    DuplicateWindow(u32),
    #[error("topology rejected: {0}")]
    Topology(#[from] TopologyError),
}

impl PropagatorError {
    /// Stable negative code for boundary callers that cannot carry a Rust error.
    pub fn code(&self) -> i32 {
        match self {
            PropagatorError::Allocation(_) => -1,
            PropagatorError::DuplicateWindow(_) => -2,
            PropagatorError::Topology(err) => err.code(),
        }
    }
}

/// Reasons an encoded topology is rejected. Offsets are byte positions in the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    #[error("topology input is empty")]
    Empty,
    #[error("input ends inside an open bracket (depth {depth})")]
    Truncated { depth: usize },
    #[error("unbalanced `{found}` at byte {offset}")]
    Unbalanced { offset: usize, found: char },
    #[error("unknown tag `{tag}` at byte {offset}")]
    UnknownTag { offset: usize, tag: String },
    #[error("unexpected `{found}` at byte {offset}")]
    Unexpected { offset: usize, found: String },
    #[error("`{context}` at byte {offset} has {found} fields, expected {expected}")]
    Arity {
        offset: usize,
        context: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("invalid integer `{token}` at byte {offset}")]
    InvalidInteger { offset: usize, token: String },
    #[error("edge [{src} {dst}] references a node beyond the {declared} declared")]
    DanglingEdge {
        src: usize,
        dst: usize,
        declared: usize,
    },
    #[error("window {0} is declared more than once or already present")]
    DuplicateWindow(u32),
}

impl TopologyError {
    pub fn code(&self) -> i32 {
        match self {
            TopologyError::Empty => -3,
            TopologyError::Truncated { .. } => -4,
            TopologyError::Unbalanced { .. } => -5,
            TopologyError::UnknownTag { .. } => -6,
            TopologyError::Unexpected { .. } => -7,
            TopologyError::Arity { .. } => -8,
            TopologyError::InvalidInteger { .. } => -9,
            TopologyError::DanglingEdge { .. } => -10,
            TopologyError::DuplicateWindow(_) => -11,
        }
    }

    /// Structural problems with the notation itself, as opposed to a
    /// well-formed topology that references something invalid.
    pub fn is_malformed(&self) -> bool {
        !matches!(
            self,
            TopologyError::DanglingEdge { .. } | TopologyError::DuplicateWindow(_)
        )
    }

    pub fn offset(&self) -> Option<usize> {
        match self {
            TopologyError::Unbalanced { offset, .. }
            | TopologyError::UnknownTag { offset, .. }
            | TopologyError::Unexpected { offset, .. }
            | TopologyError::Arity { offset, .. }
            | TopologyError::InvalidInteger { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}
