#![cfg_attr(docsrs, feature(doc_cfg))]
//! # surface-nav
//!
//! surface-nav turns an indexed triangle mesh into a triangle-adjacency graph
//! and answers navigation queries on it: best-first routes toward a triangle or
//! an arbitrary 3D point, and single directional steps from one triangle into
//! the next.
//!
//! ## Features
//! - One-time baking of a [`SurfaceGraph`](topology::surface_graph::SurfaceGraph)
//!   from vertex/index buffers, with exact vertex welding and non-manifold
//!   detection
//! - Node-goal and position-goal search over a shared, read-only graph
//! - Plane-cut surface stepping for callers that follow a direction instead of
//!   a path
//! - Serializable graphs (serde), validated on load
//! - Optional parallel batch search (`rayon` feature)
//!
//! ## Determinism
//!
//! Baking is order-preserving: node ids are triangle indices and edge ids follow
//! first encounter. Searches break ties in insertion order, so the same query
//! on the same graph always returns the same path.
//!
//! ## Usage
//!
//! ```rust
//! use surface_nav::prelude::*;
//!
//! let vertices = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]];
//! let graph = build_surface_graph(&vertices, &[0, 1, 2, 1, 3, 2])?;
//! let path = find_path_to_node(&graph, &Identity, 0, 1)?;
//! assert_eq!(path.indices(), vec![0, 1]);
//! # Ok::<(), surface_nav::mesh_error::MeshGraphError>(())
//! ```
//!
//! ## Logging
//! Diagnostics go through the [`log`] facade; the library never installs a
//! logger.

pub mod algs;
pub mod debug_invariants;
pub mod geometry;
pub mod mesh_error;
pub mod topology;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::builder::{
        BuildOptions, BuildReport, build_surface_graph, build_surface_graph_with,
    };
    #[cfg(feature = "rayon")]
    pub use crate::algs::search::find_paths_par;
    pub use crate::algs::search::{
        SurfacePath, find_path, find_path_to_node, find_path_to_position,
    };
    pub use crate::algs::solver::{Goal, GraphSolver, PathNode};
    pub use crate::algs::stepper::{
        Step, StepFailure, StepOptions, step_toward_point, step_towards,
    };
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::geometry::{AffineFrame, Identity, ReferenceFrame, Segment, Triangle, Vec3};
    pub use crate::mesh_error::MeshGraphError;
    pub use crate::topology::surface_graph::{SurfaceGraph, TriangleEdge, TriangleNode};
    pub use crate::topology::validation::NonManifoldHandling;
}
