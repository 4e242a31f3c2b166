//! MeshGraphError: Unified error type for surface-nav public APIs
//!
//! Every fallible operation in the crate (graph baking, graph reassembly,
//! node/edge lookups and node-goal searches) reports through this enum so
//! callers can match on one type.

use thiserror::Error;

/// Unified error type for surface graph construction and queries.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshGraphError {
    /// The input mesh cannot be turned into a graph (bad index count,
    /// vertex index out of range, non-finite vertex position).
    #[error("Malformed mesh: {0}")]
    MalformedMesh(String),
    /// A mesh edge is claimed by a third triangle.
    #[error(
        "Non-manifold edge between canonical vertices {a} and {b}: triangle {triangle} would be its third owner"
    )]
    NonManifoldEdge {
        a: usize,
        b: usize,
        triangle: usize,
    },
    /// A node (triangle) index outside `[0, size)`.
    #[error("Node index {node} out of range (graph has {size} nodes)")]
    NodeOutOfRange { node: usize, size: usize },
    /// An edge index outside `[0, edge_count)`.
    #[error("Edge index {edge} out of range (graph has {size} edges)")]
    EdgeOutOfRange { edge: usize, size: usize },
    /// A node-goal search exhausted its open set without reaching the goal.
    #[error("Goal node {goal} is unreachable from node {start} ({explored} nodes explored)")]
    UnreachableGoal {
        start: usize,
        goal: usize,
        explored: usize,
    },
    /// Persisted graph parts disagree with each other.
    #[error("Invalid surface graph: {0}")]
    InvalidGraph(String),
}
