//! Per-query search state over a read-only [`SurfaceGraph`].
//!
//! A [`GraphSolver`] owns one [`PathNode`] scratch record per graph node and
//! the goal-mode specific cost and termination rules. The graph itself is only
//! borrowed, so any number of solvers can run against the same graph at once
//! (the graph is `Sync`). A solver is used for exactly one search and then
//! dropped.

use serde::{Deserialize, Serialize};

use crate::geometry::frame::ReferenceFrame;
use crate::geometry::vector::{Vec3, distance};
use crate::mesh_error::MeshGraphError;
use crate::topology::surface_graph::SurfaceGraph;

/// Cost of one hop between adjacent triangles. Hop cost is flat, so ordering
/// between candidates comes from the heuristic alone.
pub const STEP_COST: f64 = 1.0;

/// Where a search is headed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Goal {
    /// A specific triangle.
    Node(usize),
    /// An arbitrary world-space point, on the mesh or not.
    Position(Vec3),
}

/// Search bookkeeping for one node.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathNode {
    pub index: usize,
    /// Predecessor on the best known route; `None` for the root or when unset.
    pub parent: Option<usize>,
    pub f: f64,
    pub g: f64,
    pub h: f64,
}

impl PathNode {
    /// Fresh record: no parent, all costs `+∞`.
    pub fn unvisited(index: usize) -> Self {
        Self {
            index,
            parent: None,
            f: f64::INFINITY,
            g: f64::INFINITY,
            h: f64::INFINITY,
        }
    }

    #[inline]
    pub fn is_visited(&self) -> bool {
        self.f.is_finite()
    }
}

/// `f = g + h` for one candidate hop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepCost {
    pub f: f64,
    pub g: f64,
    pub h: f64,
}

/// Scratch state for a single search.
pub struct GraphSolver<'g, F: ReferenceFrame + ?Sized> {
    graph: &'g SurfaceGraph,
    frame: &'g F,
    nodes: Vec<PathNode>,
    /// Set when an expansion failed to beat the expanded node's own cost;
    /// position-goal searches stop on the pop after that.
    settled: bool,
}

impl<'g, F: ReferenceFrame + ?Sized> GraphSolver<'g, F> {
    pub fn new(frame: &'g F, graph: &'g SurfaceGraph) -> Self {
        Self {
            graph,
            frame,
            nodes: (0..graph.size()).map(PathNode::unvisited).collect(),
            settled: false,
        }
    }

    #[inline]
    pub fn graph(&self) -> &'g SurfaceGraph {
        self.graph
    }

    pub fn get_node(&self, node: usize) -> Result<PathNode, MeshGraphError> {
        self.graph.check_node(node)?;
        Ok(self.nodes[node])
    }

    pub fn set_node(&mut self, node: usize, value: PathNode) -> Result<(), MeshGraphError> {
        self.graph.check_node(node)?;
        self.nodes[node] = value;
        Ok(())
    }

    /// Distance from the closest point on `node` to `goal`.
    pub fn compute_h(&self, node: usize, goal: Vec3) -> Result<f64, MeshGraphError> {
        let closest = self.graph.closest_point_on_node(self.frame, goal, node)?;
        Ok(distance(closest, goal))
    }

    /// World-space point the heuristic measures against: the goal triangle's
    /// centroid, or the goal position itself.
    pub fn goal_point(&self, goal: &Goal) -> Result<Vec3, MeshGraphError> {
        match *goal {
            Goal::Node(g) => self.graph.center_of(self.frame, g),
            Goal::Position(p) => Ok(p),
        }
    }

    /// Cost of stepping `from -> to` toward `goal`.
    ///
    /// `g` is the flat [`STEP_COST`]; `h` is the distance from `to`'s closest
    /// point to the goal point (see [`goal_point`](Self::goal_point)).
    pub fn compute_step_cost(
        &self,
        from: usize,
        to: usize,
        goal: &Goal,
    ) -> Result<StepCost, MeshGraphError> {
        self.graph.check_node(from)?;
        let target = self.goal_point(goal)?;
        let h = self.compute_h(to, target)?;
        let g = STEP_COST;
        Ok(StepCost { f: g + h, g, h })
    }

    /// Record the outcome of expanding a node: `improved` is whether any
    /// neighbour scored strictly below the expanded node's `f`.
    pub fn record_expansion(&mut self, improved: bool) {
        self.settled = !improved;
    }

    /// Whether the search should stop on `node`.
    ///
    /// Node goals stop on the goal itself. Position goals stop one pop after
    /// an expansion that produced nothing better than the node being expanded;
    /// the node popped at that point is a probe and is not part of the route.
    pub fn is_destiny(&self, node: usize, goal: &Goal) -> bool {
        match *goal {
            Goal::Node(g) => node == g,
            Goal::Position(_) => self.settled,
        }
    }
}
