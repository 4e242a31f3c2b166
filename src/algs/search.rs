//! Best-first search over a [`SurfaceGraph`].
//!
//! One engine serves both goal kinds:
//!
//! - [`find_path_to_node`]: stop when the goal triangle is popped; the goal is
//!   the last element of the result. Exhausting the frontier is an error.
//! - [`find_path_to_position`]: stop one pop after the frontier stops getting
//!   closer to the target; the probe popped at that point is dropped. Exhausting
//!   the frontier returns everything explored.
//!
//! The result is the *closed sequence*, i.e. every node in the order it was
//! settled, not only the parent chain. [`SurfacePath::route`] recovers the chain.
//!
//! # Determinism
//! The frontier is a binary min-heap on `f`; equal keys pop in insertion order.
//! Identical inputs always give identical paths.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use hashbrown::HashMap as FastMap;
use itertools::Itertools;

use crate::algs::solver::{Goal, GraphSolver, PathNode, STEP_COST};
use crate::geometry::frame::ReferenceFrame;
use crate::geometry::vector::{Vec3, distance};
use crate::mesh_error::MeshGraphError;
use crate::topology::surface_graph::SurfaceGraph;

/// Nodes settled by a search, in settling order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SurfacePath {
    nodes: Vec<PathNode>,
}

impl SurfacePath {
    pub fn nodes(&self) -> &[PathNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn indices(&self) -> Vec<usize> {
        self.nodes.iter().map(|n| n.index).collect()
    }

    /// Final settled node: the goal for node searches, the closest triangle
    /// found for position searches.
    pub fn last(&self) -> Option<usize> {
        self.nodes.last().map(|n| n.index)
    }

    /// Parent chain from the first node to [`last`](Self::last).
    ///
    /// Every parent is settled before its child, so the walk always ends at
    /// the root.
    pub fn route(&self) -> Vec<usize> {
        let Some(mut cur) = self.nodes.last() else {
            return Vec::new();
        };
        let by_index: FastMap<usize, &PathNode> =
            self.nodes.iter().map(|n| (n.index, n)).collect();
        let mut out = vec![cur.index];
        while let Some(p) = cur.parent {
            match by_index.get(&p) {
                Some(&n) => {
                    out.push(p);
                    cur = n;
                }
                None => break,
            }
        }
        out.reverse();
        out
    }

    /// World-space centroid of each settled node.
    pub fn waypoints<F: ReferenceFrame + ?Sized>(
        &self,
        graph: &SurfaceGraph,
        frame: &F,
    ) -> Result<Vec<Vec3>, MeshGraphError> {
        self.nodes
            .iter()
            .map(|n| graph.center_of(frame, n.index))
            .collect()
    }

    /// Polyline length through [`waypoints`](Self::waypoints).
    pub fn length<F: ReferenceFrame + ?Sized>(
        &self,
        graph: &SurfaceGraph,
        frame: &F,
    ) -> Result<f64, MeshGraphError> {
        Ok(self
            .waypoints(graph, frame)?
            .into_iter()
            .tuple_windows()
            .map(|(a, b)| distance(a, b))
            .sum())
    }
}

// Frontier entry; `Ord` is reversed so `BinaryHeap` pops the smallest `f`,
// and among equal `f` the oldest entry.
#[derive(Clone, Copy, Debug)]
struct OpenEntry {
    f: f64,
    seq: u64,
    node: usize,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Default)]
struct OpenSet {
    heap: BinaryHeap<OpenEntry>,
    next_seq: u64,
}

impl OpenSet {
    fn push(&mut self, node: usize, f: f64) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(OpenEntry { f, seq, node });
    }

    fn pop(&mut self) -> Option<usize> {
        self.heap.pop().map(|e| e.node)
    }
}

/// Search from `start` toward either kind of [`Goal`].
///
/// # Errors
/// `NodeOutOfRange` for an invalid start or goal node; `UnreachableGoal` if a
/// node goal is not connected to `start`.
///
/// # Complexity
/// **O(E log N)**: each improvement pushes a new frontier entry and stale
/// entries are skipped on pop.
pub fn find_path<F: ReferenceFrame + ?Sized>(
    graph: &SurfaceGraph,
    frame: &F,
    start: usize,
    goal: Goal,
) -> Result<SurfacePath, MeshGraphError> {
    let mut solver = GraphSolver::new(frame, graph);
    search(&mut solver, start, goal)
}

/// Search from `start` until triangle `goal` is settled.
pub fn find_path_to_node<F: ReferenceFrame + ?Sized>(
    graph: &SurfaceGraph,
    frame: &F,
    start: usize,
    goal: usize,
) -> Result<SurfacePath, MeshGraphError> {
    find_path(graph, frame, start, Goal::Node(goal))
}

/// Search from `start` toward a world-space point.
///
/// Never fails for a valid start: if the frontier runs dry the whole
/// reachable component is returned.
pub fn find_path_to_position<F: ReferenceFrame + ?Sized>(
    graph: &SurfaceGraph,
    frame: &F,
    start: usize,
    goal: Vec3,
) -> Result<SurfacePath, MeshGraphError> {
    find_path(graph, frame, start, Goal::Position(goal))
}

/// Run one search on a caller-owned solver, leaving its per-node records in
/// place for inspection afterwards.
pub fn search<F: ReferenceFrame + ?Sized>(
    solver: &mut GraphSolver<'_, F>,
    start: usize,
    goal: Goal,
) -> Result<SurfacePath, MeshGraphError> {
    let graph = solver.graph();
    graph.check_node(start)?;

    let root = match goal {
        Goal::Node(g) => {
            graph.check_node(g)?;
            PathNode {
                index: start,
                parent: None,
                f: 0.0,
                g: 0.0,
                h: 0.0,
            }
        }
        Goal::Position(p) => {
            let h = solver.compute_h(start, p)?;
            PathNode {
                index: start,
                parent: None,
                f: h + STEP_COST,
                g: STEP_COST,
                h,
            }
        }
    };
    solver.set_node(start, root)?;

    let mut open = OpenSet::default();
    let mut closed = vec![false; graph.size()];
    let mut settled: Vec<PathNode> = Vec::new();
    open.push(start, root.f);

    while let Some(current) = open.pop() {
        if closed[current] {
            continue;
        }
        closed[current] = true;
        let cur = solver.get_node(current)?;
        settled.push(cur);

        if solver.is_destiny(current, &goal) {
            if matches!(goal, Goal::Position(_)) && settled.len() > 1 {
                settled.pop();
            }
            log::debug!(
                "search {start} -> {goal:?} reached after settling {} nodes",
                settled.len()
            );
            return Ok(SurfacePath { nodes: settled });
        }

        let mut improved = false;
        for &next in graph.neighbours_of(current)? {
            if closed[next] {
                continue;
            }
            let cost = solver.compute_step_cost(current, next, &goal)?;
            if cost.f < cur.f {
                improved = true;
            }
            if cost.f < solver.get_node(next)?.f {
                solver.set_node(
                    next,
                    PathNode {
                        index: next,
                        parent: Some(current),
                        f: cost.f,
                        g: cost.g,
                        h: cost.h,
                    },
                )?;
                open.push(next, cost.f);
            }
        }
        log::trace!("expanded node {current} (f = {}, improved = {improved})", cur.f);
        solver.record_expansion(improved);
    }

    match goal {
        Goal::Node(g) => {
            log::debug!(
                "search {start} -> node {g} exhausted after {} nodes",
                settled.len()
            );
            Err(MeshGraphError::UnreachableGoal {
                start,
                goal: g,
                explored: settled.len(),
            })
        }
        Goal::Position(_) => {
            log::debug!(
                "search {start} -> {goal:?} exhausted the component ({} nodes)",
                settled.len()
            );
            Ok(SurfacePath { nodes: settled })
        }
    }
}

/// Run independent searches in parallel over one shared graph.
///
/// Each query gets its own solver; results come back in query order.
#[cfg(feature = "rayon")]
pub fn find_paths_par<F: ReferenceFrame + Sync + ?Sized>(
    graph: &SurfaceGraph,
    frame: &F,
    queries: &[(usize, Goal)],
) -> Vec<Result<SurfacePath, MeshGraphError>> {
    use rayon::prelude::*;

    queries
        .par_iter()
        .map(|&(start, goal)| find_path(graph, frame, start, goal))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algs::builder::build_surface_graph;
    use crate::geometry::frame::Identity;

    fn strip() -> SurfaceGraph {
        let v = vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [1.0, 1.0, 0.0],
            [2.0, 0.0, 0.0],
        ];
        build_surface_graph(&v, &[0, 1, 2, 1, 3, 2, 1, 4, 3]).unwrap()
    }

    #[test]
    fn open_set_pops_min_f_then_fifo() {
        let mut open = OpenSet::default();
        open.push(7, 2.0);
        open.push(3, 1.0);
        open.push(5, 1.0);
        open.push(1, 0.5);
        let order: Vec<_> = std::iter::from_fn(|| open.pop()).collect();
        assert_eq!(order, vec![1, 3, 5, 7]);
    }

    #[test]
    fn strip_end_to_end() {
        let g = strip();
        let path = find_path_to_node(&g, &Identity, 0, 2).unwrap();
        assert_eq!(path.indices(), vec![0, 1, 2]);
        assert_eq!(path.route(), vec![0, 1, 2]);
        assert_eq!(path.last(), Some(2));
    }

    #[test]
    fn start_equal_goal_is_single_node() {
        let g = strip();
        let path = find_path_to_node(&g, &Identity, 1, 1).unwrap();
        assert_eq!(path.indices(), vec![1]);
        assert_eq!(path.length(&g, &Identity).unwrap(), 0.0);
    }

    #[test]
    fn invalid_endpoints_are_rejected() {
        let g = strip();
        assert!(matches!(
            find_path_to_node(&g, &Identity, 3, 0),
            Err(MeshGraphError::NodeOutOfRange { node: 3, size: 3 })
        ));
        assert!(matches!(
            find_path_to_node(&g, &Identity, 0, 9),
            Err(MeshGraphError::NodeOutOfRange { node: 9, .. })
        ));
        assert!(find_path_to_position(&g, &Identity, 4, [0.0; 3]).is_err());
    }

    #[test]
    fn position_search_walks_to_containing_triangle() {
        let g = strip();
        let path = find_path_to_position(&g, &Identity, 0, [1.5, 0.25, 0.0]).unwrap();
        assert_eq!(path.last(), Some(2));
        assert_eq!(path.indices(), vec![0, 1, 2]);
    }

    #[test]
    fn position_inside_start_stays_put() {
        let g = strip();
        let path = find_path_to_position(&g, &Identity, 0, [0.2, 0.2, 0.0]).unwrap();
        assert_eq!(path.indices(), vec![0]);
    }

    #[test]
    fn waypoints_are_centroids() {
        let g = strip();
        let path = find_path_to_node(&g, &Identity, 0, 1).unwrap();
        let w = path.waypoints(&g, &Identity).unwrap();
        assert_eq!(w.len(), 2);
        assert_eq!(w[0], g.center_of_local(0).unwrap());
        assert!(path.length(&g, &Identity).unwrap() > 0.0);
    }
}
