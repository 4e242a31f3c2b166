//! Single directional steps across the surface.
//!
//! Instead of following a precomputed path, the stepper picks the edge of the
//! current triangle that a travel direction leaves through and returns the
//! triangle on the other side. Callers chain steps themselves (and keep their
//! own visited set if they need one).
//
// Plane-cut rule: the travel plane passes through `anchor` with normal
// `plane_normal`. Each edge segment is cut by that plane (the normal is flipped
// per edge to face along the edge, so the one-sided segment test can hit), and
// each cut point is scored by how well `cut - reference` lines up with the
// travel direction. Which side of the plane the anchor is on does not matter.

use crate::geometry::frame::ReferenceFrame;
use crate::geometry::intersection::line_plane_intersection;
use crate::geometry::vector::{Vec3, distance, dot, normalize, scale, sign, sub, ZERO};
use crate::mesh_error::MeshGraphError;
use crate::topology::surface_graph::{SurfaceGraph, TriangleEdge};

/// Lowest possible alignment score; an edge has to beat it to be chosen.
const NO_SCORE: f64 = -1.0;

/// Tuning for [`step_towards`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepOptions {
    /// Point the cut points are scored from; defaults to the anchor.
    pub reference_point: Option<Vec3>,
    /// Reject crossings farther than this from the anchor.
    pub max_radius: Option<f64>,
}

/// Why a step stayed on its triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepFailure {
    /// No edge was cut in a direction better than straight backwards.
    NoCrossing,
    /// The best edge has no triangle on the other side.
    BoundaryEdge { edge: usize },
    /// The best crossing is outside [`StepOptions::max_radius`].
    OutOfRadius { edge: usize, distance: f64 },
}

/// Outcome of one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    Crossed {
        from: usize,
        to: usize,
        edge: usize,
        /// World-space point where the edge was crossed.
        point: Vec3,
        score: f64,
    },
    Stayed {
        node: usize,
        reason: StepFailure,
    },
}

impl Step {
    /// Triangle the caller is on after the step.
    pub fn node(&self) -> usize {
        match *self {
            Step::Crossed { to, .. } => to,
            Step::Stayed { node, .. } => node,
        }
    }

    pub fn is_crossed(&self) -> bool {
        matches!(self, Step::Crossed { .. })
    }
}

struct Candidate<'a> {
    edge: &'a TriangleEdge,
    point: Vec3,
    score: f64,
}

/// Step out of `node` through the edge cut by the travel plane that best
/// matches `surface_direction`.
///
/// A failed step is not an error: the result is [`Step::Stayed`] with the
/// reason.
///
/// # Errors
/// `NodeOutOfRange` if `node` is not in the graph.
pub fn step_towards<F: ReferenceFrame + ?Sized>(
    graph: &SurfaceGraph,
    frame: &F,
    anchor: Vec3,
    plane_normal: Vec3,
    surface_direction: Vec3,
    node: usize,
    opts: StepOptions,
) -> Result<Step, MeshGraphError> {
    let reference = opts.reference_point.unwrap_or(anchor);
    let mut best: Option<Candidate<'_>> = None;

    for edge in graph.edges_of(node)? {
        let p0 = frame.transform_point(edge.line.p0);
        let p1 = frame.transform_point(edge.line.p1);
        let facing = sign(dot(sub(p1, p0), plane_normal));
        let Some(hit) = line_plane_intersection(p0, p1, anchor, scale(plane_normal, facing))
        else {
            continue;
        };
        let score = dot(normalize(sub(hit.point, reference)), surface_direction);
        if score > best.as_ref().map_or(NO_SCORE, |b| b.score) {
            best = Some(Candidate {
                edge,
                point: hit.point,
                score,
            });
        }
    }

    let Some(best) = best else {
        log::trace!("step from node {node}: travel plane cuts no edge");
        return Ok(Step::Stayed {
            node,
            reason: StepFailure::NoCrossing,
        });
    };

    if let Some(radius) = opts.max_radius {
        let d = distance(best.point, anchor);
        if d > radius {
            return Ok(Step::Stayed {
                node,
                reason: StepFailure::OutOfRadius {
                    edge: best.edge.index,
                    distance: d,
                },
            });
        }
    }

    Ok(cross(node, best))
}

/// Step out of `node` through the edge whose midpoint lies most in the
/// direction of `target`, as seen from the triangle's centroid.
///
/// Useful for walking toward a point when no travel plane is at hand. A
/// target at the centroid gives [`StepFailure::NoCrossing`].
///
/// # Errors
/// `NodeOutOfRange` if `node` is not in the graph.
pub fn step_toward_point<F: ReferenceFrame + ?Sized>(
    graph: &SurfaceGraph,
    frame: &F,
    node: usize,
    target: Vec3,
) -> Result<Step, MeshGraphError> {
    let center = graph.center_of(frame, node)?;
    let want = normalize(sub(target, center));
    let mut best: Option<Candidate<'_>> = None;

    if want != ZERO {
        for edge in graph.edges_of(node)? {
            let mid = edge.line.transformed(frame).midpoint();
            let score = dot(normalize(sub(mid, center)), want);
            if score > best.as_ref().map_or(NO_SCORE, |b| b.score) {
                best = Some(Candidate {
                    edge,
                    point: mid,
                    score,
                });
            }
        }
    }

    Ok(match best {
        Some(best) => cross(node, best),
        None => Step::Stayed {
            node,
            reason: StepFailure::NoCrossing,
        },
    })
}

fn cross(node: usize, best: Candidate<'_>) -> Step {
    // an edge this node does not own (dropped non-manifold owner) leads nowhere
    let to = if best.edge.is_owned_by(node) {
        best.edge.other_owner(node)
    } else {
        None
    };
    match to {
        Some(to) => {
            log::trace!(
                "step {node} -> {to} across edge {} (score {:.3})",
                best.edge.index,
                best.score
            );
            Step::Crossed {
                from: node,
                to,
                edge: best.edge.index,
                point: best.point,
                score: best.score,
            }
        }
        None => Step::Stayed {
            node,
            reason: StepFailure::BoundaryEdge {
                edge: best.edge.index,
            },
        },
    }
}
