//! `SurfaceGraph`: the baked triangle-adjacency model of a mesh surface.
//!
//! One node per triangle (node id = triangle index in the source mesh), an
//! undirected edge record per distinct mesh edge, and for every node the list of
//! triangles reachable across its edges. The graph is an arena: nodes and edges
//! refer to each other only by integer index into the three arrays.
//!
//! The model is read-only once built. Queries borrow it; [`Clone`] gives an
//! independent snapshot when a caller needs one.
//!
//! # Invariants
//!
//! - `triangles.len() == nodes.len()` and `nodes[i].index == i`.
//! - `edges[e].index == e`; every edge has one or two distinct owners, all in
//!   bounds, and every owner lists `e` among its three edges.
//! - `nodes[i].neighbours` has no duplicates, never contains `i`, and equals the
//!   set of other owners of the edges `i` owns.
//! - Adjacency is symmetric.
//!
//! These are checked after every build in debug builds (or with the
//! `check-invariants` feature) and always when reassembling a graph from
//! persisted parts via [`SurfaceGraph::from_parts`] or serde.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::debug_invariants::DebugInvariants;
use crate::geometry::frame::ReferenceFrame;
use crate::geometry::intersection::closest_point_on_triangle;
use crate::geometry::primitives::{Segment, Triangle};
use crate::geometry::vector::Vec3;
use crate::mesh_error::MeshGraphError;

/// Per-triangle adjacency record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriangleNode {
    /// Triangle index in the source mesh.
    pub index: usize,
    /// Distinct triangles sharing an edge with this one, in discovery order.
    pub neighbours: Vec<usize>,
    /// Edge ids for the `(v0,v1)`, `(v0,v2)` and `(v1,v2)` sides.
    pub edges: [usize; 3],
}

/// Undirected mesh edge shared by one or two triangles.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TriangleEdge {
    pub index: usize,
    /// Object-space endpoints.
    pub line: Segment,
    /// First triangle seen with this edge.
    pub triangle0: usize,
    /// Second owner; `None` on a boundary edge.
    pub triangle1: Option<usize>,
}

impl TriangleEdge {
    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.triangle1.is_none()
    }

    pub fn owners(&self) -> impl Iterator<Item = usize> + '_ {
        std::iter::once(self.triangle0).chain(self.triangle1)
    }

    #[inline]
    pub fn is_owned_by(&self, node: usize) -> bool {
        self.triangle0 == node || self.triangle1 == Some(node)
    }

    /// The triangle on the far side of this edge as seen from `node`.
    ///
    /// Returns `triangle1` when `node` is `triangle0` (so `None` on a boundary),
    /// and `triangle0` otherwise.
    #[inline]
    pub fn other_owner(&self, node: usize) -> Option<usize> {
        if self.triangle0 == node {
            self.triangle1
        } else {
            Some(self.triangle0)
        }
    }
}

/// Flat persisted form of a [`SurfaceGraph`]; deserialization goes through
/// [`SurfaceGraph::from_parts`] so a loaded graph is always validated.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SurfaceGraphParts {
    pub triangles: Vec<Triangle>,
    pub nodes: Vec<TriangleNode>,
    pub edges: Vec<TriangleEdge>,
}

/// Triangle adjacency graph of a mesh surface.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SurfaceGraphParts")]
pub struct SurfaceGraph {
    triangles: Vec<Triangle>,
    nodes: Vec<TriangleNode>,
    edges: Vec<TriangleEdge>,
}

static_assertions::assert_impl_all!(SurfaceGraph: Send, Sync, Clone);

impl TryFrom<SurfaceGraphParts> for SurfaceGraph {
    type Error = MeshGraphError;

    fn try_from(parts: SurfaceGraphParts) -> Result<Self, Self::Error> {
        Self::from_parts(parts.triangles, parts.nodes, parts.edges)
    }
}

impl From<SurfaceGraph> for SurfaceGraphParts {
    fn from(g: SurfaceGraph) -> Self {
        SurfaceGraphParts {
            triangles: g.triangles,
            nodes: g.nodes,
            edges: g.edges,
        }
    }
}

impl SurfaceGraph {
    /// Reassemble a graph from index-aligned arrays, e.g. after loading a
    /// baked graph from disk.
    ///
    /// # Errors
    /// `InvalidGraph` if the arrays are misaligned or adjacency disagrees with
    /// edge ownership.
    pub fn from_parts(
        triangles: Vec<Triangle>,
        nodes: Vec<TriangleNode>,
        edges: Vec<TriangleEdge>,
    ) -> Result<Self, MeshGraphError> {
        let graph = Self {
            triangles,
            nodes,
            edges,
        };
        graph.validate_invariants()?;
        Ok(graph)
    }

    /// Used by the builder, which upholds the invariants by construction.
    pub(crate) fn from_parts_unchecked(
        triangles: Vec<Triangle>,
        nodes: Vec<TriangleNode>,
        edges: Vec<TriangleEdge>,
    ) -> Self {
        Self {
            triangles,
            nodes,
            edges,
        }
    }

    pub fn into_parts(self) -> SurfaceGraphParts {
        self.into()
    }

    /// Number of nodes (triangles).
    #[inline]
    pub fn size(&self) -> usize {
        self.triangles.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.size()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn is_in_bounds(&self, node: usize) -> bool {
        node < self.size()
    }

    #[inline]
    pub(crate) fn check_node(&self, node: usize) -> Result<(), MeshGraphError> {
        if self.is_in_bounds(node) {
            Ok(())
        } else {
            Err(MeshGraphError::NodeOutOfRange {
                node,
                size: self.size(),
            })
        }
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn nodes(&self) -> &[TriangleNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[TriangleEdge] {
        &self.edges
    }

    /// Object-space triangle of `node`.
    pub fn triangle(&self, node: usize) -> Result<&Triangle, MeshGraphError> {
        self.check_node(node)?;
        Ok(&self.triangles[node])
    }

    pub fn node(&self, node: usize) -> Result<&TriangleNode, MeshGraphError> {
        self.check_node(node)?;
        Ok(&self.nodes[node])
    }

    pub fn edge(&self, edge: usize) -> Result<&TriangleEdge, MeshGraphError> {
        self.edges.get(edge).ok_or(MeshGraphError::EdgeOutOfRange {
            edge,
            size: self.edges.len(),
        })
    }

    /// The three edge records of `node`, in `(v0,v1)`, `(v0,v2)`, `(v1,v2)` order.
    pub fn edges_of(&self, node: usize) -> Result<[&TriangleEdge; 3], MeshGraphError> {
        let ids = self.node(node)?.edges;
        Ok([self.edge(ids[0])?, self.edge(ids[1])?, self.edge(ids[2])?])
    }

    /// Adjacency list of `node`; empty only for an isolated triangle.
    pub fn neighbours_of(&self, node: usize) -> Result<&[usize], MeshGraphError> {
        Ok(&self.node(node)?.neighbours)
    }

    /// Edges owned by a single triangle.
    pub fn boundary_edges(&self) -> impl Iterator<Item = &TriangleEdge> + '_ {
        self.edges.iter().filter(|e| e.is_boundary())
    }

    /// Triangle of `node` mapped into the caller's space.
    pub fn triangle_world<F: ReferenceFrame + ?Sized>(
        &self,
        frame: &F,
        node: usize,
    ) -> Result<Triangle, MeshGraphError> {
        Ok(self.triangle(node)?.transformed(frame))
    }

    /// Nearest point to `target` on the world-space surface of `node`.
    pub fn closest_point_on_node<F: ReferenceFrame + ?Sized>(
        &self,
        frame: &F,
        target: Vec3,
        node: usize,
    ) -> Result<Vec3, MeshGraphError> {
        let t = self.triangle_world(frame, node)?;
        Ok(closest_point_on_triangle(t.v0(), t.v1(), t.v2(), target))
    }

    /// Object-space variant of [`closest_point_on_node`](Self::closest_point_on_node).
    pub fn closest_point_on_node_local(
        &self,
        target: Vec3,
        node: usize,
    ) -> Result<Vec3, MeshGraphError> {
        let t = self.triangle(node)?;
        Ok(closest_point_on_triangle(t.v0(), t.v1(), t.v2(), target))
    }

    /// World-space centroid of `node`.
    pub fn center_of<F: ReferenceFrame + ?Sized>(
        &self,
        frame: &F,
        node: usize,
    ) -> Result<Vec3, MeshGraphError> {
        Ok(frame.transform_point(self.triangle(node)?.centroid()))
    }

    pub fn center_of_local(&self, node: usize) -> Result<Vec3, MeshGraphError> {
        Ok(self.triangle(node)?.centroid())
    }

    /// World-space unit normal of `node`.
    pub fn normal_of<F: ReferenceFrame + ?Sized>(
        &self,
        frame: &F,
        node: usize,
    ) -> Result<Vec3, MeshGraphError> {
        Ok(self.triangle_world(frame, node)?.normal())
    }
}

impl DebugInvariants for SurfaceGraph {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "SurfaceGraph invalid");
    }

    fn validate_invariants(&self) -> Result<(), MeshGraphError> {
        let invalid =
            |msg: String| -> Result<(), MeshGraphError> { Err(MeshGraphError::InvalidGraph(msg)) };
        let n = self.triangles.len();

        // 1) arrays aligned
        if self.nodes.len() != n {
            return invalid(format!(
                "{} triangles but {} nodes",
                n,
                self.nodes.len()
            ));
        }
        if let Some((i, node)) = self.nodes.iter().enumerate().find(|(i, nd)| nd.index != *i) {
            return invalid(format!("node slot {i} carries index {}", node.index));
        }
        if let Some((e, edge)) = self.edges.iter().enumerate().find(|(e, ed)| ed.index != *e) {
            return invalid(format!("edge slot {e} carries index {}", edge.index));
        }

        // 2) edge ownership: 1..=2 distinct in-bound owners that list the edge
        for edge in &self.edges {
            if edge.triangle1 == Some(edge.triangle0) {
                return invalid(format!("edge {} lists triangle {} twice", edge.index, edge.triangle0));
            }
            for owner in edge.owners() {
                if owner >= n {
                    return invalid(format!("edge {} owned by missing triangle {owner}", edge.index));
                }
                if !self.nodes[owner].edges.contains(&edge.index) {
                    return invalid(format!(
                        "edge {} claims owner {owner}, which does not reference it",
                        edge.index
                    ));
                }
            }
        }

        // 3) neighbour lists match owned edges, no dups/self loops
        for node in &self.nodes {
            let i = node.index;
            if let Some(&e) = node.edges.iter().find(|&&e| e >= self.edges.len()) {
                return invalid(format!("node {i} references missing edge {e}"));
            }
            let listed: BTreeSet<usize> = node.neighbours.iter().copied().collect();
            if listed.len() != node.neighbours.len() {
                return invalid(format!("node {i} has duplicate neighbours"));
            }
            if listed.contains(&i) {
                return invalid(format!("node {i} lists itself as a neighbour"));
            }
            let derived: BTreeSet<usize> = node
                .edges
                .iter()
                .map(|&e| &self.edges[e])
                .filter(|edge| edge.is_owned_by(i))
                .flat_map(|edge| edge.owners())
                .filter(|&o| o != i)
                .collect();
            if listed != derived {
                return invalid(format!(
                    "node {i} neighbours {listed:?} disagree with edge owners {derived:?}"
                ));
            }
        }

        // 4) symmetry
        for node in &self.nodes {
            for &j in &node.neighbours {
                if !self.nodes[j].neighbours.contains(&node.index) {
                    return invalid(format!(
                        "adjacency not symmetric: {} -> {j} without {j} -> {}",
                        node.index, node.index
                    ));
                }
            }
        }

        Ok(())
    }
}
