//! Top-level module for the surface topology.
//!
//! - [`surface_graph`]: the baked triangle-adjacency graph and its invariants
//! - [`validation`]: mesh audits and non-manifold policy used by the builder

pub mod surface_graph;
pub mod validation;

pub use surface_graph::{SurfaceGraph, SurfaceGraphParts, TriangleEdge, TriangleNode};
pub use validation::NonManifoldHandling;
