//! Ray/segment/plane/triangle queries used by the navigation code.
//!
//! All routines are pure. Near-degenerate inputs (zero-area triangles, rays
//! almost parallel to a plane) resolve to "no hit" rather than an error.

use super::primitives::Triangle;
use super::vector::{Vec3, add, cross, dot, norm, normalize, scale, sub};

/// Denominator threshold below which a ray is treated as parallel to a plane.
/// A ray must point *along* the plane normal (positive dot) to hit.
const PARALLEL_EPS: f64 = 1e-6;

/// Intersection of a segment with a plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentPlaneHit {
    pub point: Vec3,
    /// Position of `point` along the segment, `0` at `p0` and `1` at `p1`.
    pub fraction: f64,
}

/// Intersection of a ray with a triangle, with barycentric weights
/// `u` (for `v0`), `v` (for `v1`) and `w = 1 - u - v` (for `v2`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriangleHit {
    pub point: Vec3,
    pub t: f64,
    pub u: f64,
    pub v: f64,
    pub w: f64,
}

/// Distance `t >= 0` along `ray_dir` at which the ray meets the plane through
/// `plane_point` with normal `plane_normal`.
///
/// One-sided: only rays with `dot(plane_normal, ray_dir) > 1e-6` can hit.
/// Inputs are expected to be normalized.
pub fn ray_plane_intersection(
    plane_normal: Vec3,
    plane_point: Vec3,
    ray_origin: Vec3,
    ray_dir: Vec3,
) -> Option<f64> {
    let denom = dot(plane_normal, ray_dir);
    if denom <= PARALLEL_EPS {
        return None;
    }
    let t = dot(sub(plane_point, ray_origin), plane_normal) / denom;
    (t >= 0.0).then_some(t)
}

/// Intersection of the segment `p0 -> p1` with the plane through
/// `plane_point` with normal `plane_normal`, using the one-sided
/// [`ray_plane_intersection`] test.
pub fn line_plane_intersection(
    p0: Vec3,
    p1: Vec3,
    plane_point: Vec3,
    plane_normal: Vec3,
) -> Option<SegmentPlaneHit> {
    let diff = sub(p1, p0);
    let length = norm(diff);
    let dir = normalize(diff);
    let t = ray_plane_intersection(plane_normal, plane_point, p0, dir)?;
    if t > length {
        return None;
    }
    Some(SegmentPlaneHit {
        point: add(p0, scale(dir, t)),
        fraction: t / length,
    })
}

/// Closest point to `p` on segment `start -> end`.
pub fn line_nearest_point(start: Vec3, end: Vec3, p: Vec3) -> Vec3 {
    let line = sub(end, start);
    let len = norm(line);
    let dir = normalize(line);
    let d = dot(sub(p, start), dir).clamp(0.0, len);
    add(start, scale(dir, d))
}

/// Barycentric coordinates `(u, v, w)` of `p` with respect to `a, b, c`,
/// such that `p = u*a + v*b + w*c` when `p` lies in the triangle's plane.
pub fn barycentric(a: Vec3, b: Vec3, c: Vec3, p: Vec3) -> Vec3 {
    let v0 = sub(b, a);
    let v1 = sub(c, a);
    let v2 = sub(p, a);
    let d00 = dot(v0, v0);
    let d01 = dot(v0, v1);
    let d11 = dot(v1, v1);
    let d20 = dot(v2, v0);
    let d21 = dot(v2, v1);
    let denom = d00 * d11 - d01 * d01;
    let v = (d11 * d20 - d01 * d21) / denom;
    let w = (d00 * d21 - d01 * d20) / denom;
    [1.0 - v - w, v, w]
}

/// Closest point to `p` on the (closed) triangle `a, b, c`.
///
/// Voronoi-region walk over vertices, edges and face; degenerate triangles fall
/// through to the nearest edge.
pub fn closest_point_on_triangle(a: Vec3, b: Vec3, c: Vec3, p: Vec3) -> Vec3 {
    let ab = sub(b, a);
    let ac = sub(c, a);
    let ap = sub(p, a);
    let d1 = dot(ab, ap);
    let d2 = dot(ac, ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return a;
    }

    let bp = sub(p, b);
    let d3 = dot(ab, bp);
    let d4 = dot(ac, bp);
    if d3 >= 0.0 && d4 <= d3 {
        return b;
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        return add(a, scale(ab, v));
    }

    let cp = sub(p, c);
    let d5 = dot(ab, cp);
    let d6 = dot(ac, cp);
    if d6 >= 0.0 && d5 <= d6 {
        return c;
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        return add(a, scale(ac, w));
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return add(b, scale(sub(c, b), w));
    }

    let denom = va + vb + vc;
    if denom.abs() <= f64::EPSILON {
        return nearest_on_edges(a, b, c, p);
    }
    let v = vb / denom;
    let w = vc / denom;
    add(a, add(scale(ab, v), scale(ac, w)))
}

fn nearest_on_edges(a: Vec3, b: Vec3, c: Vec3, p: Vec3) -> Vec3 {
    [
        line_nearest_point(a, b, p),
        line_nearest_point(b, c, p),
        line_nearest_point(c, a, p),
    ]
    .into_iter()
    .min_by(|x, y| norm(sub(*x, p)).total_cmp(&norm(sub(*y, p))))
    .unwrap_or(a)
}

/// `true` when `p` is inside or on the boundary of triangle `a, b, c`
/// (same-side test; `p` is assumed to lie in the triangle's plane).
pub fn is_point_inside_triangle(a: Vec3, b: Vec3, c: Vec3, p: Vec3) -> bool {
    same_side(p, a, b, c) && same_side(p, b, a, c) && same_side(p, c, a, b)
}

fn same_side(p0: Vec3, p1: Vec3, a: Vec3, b: Vec3) -> bool {
    let edge = sub(b, a);
    let cp0 = cross(edge, sub(p0, a));
    let cp1 = cross(edge, sub(p1, a));
    dot(cp0, cp1) >= 0.0
}

/// Ray/triangle intersection (two-sided, `t >= 0`).
pub fn ray_triangle_intersection(origin: Vec3, dir: Vec3, tri: &Triangle) -> Option<TriangleHit> {
    let [v0, v1, v2] = tri.vertices();
    let v0v1 = sub(v1, v0);
    let v0v2 = sub(v2, v0);
    let normal = cross(v0v1, v0v2);

    let n_dot_dir = dot(normal, dir);
    if n_dot_dir.abs() < f64::EPSILON {
        return None;
    }
    let denom = dot(normal, normal);
    let d = -dot(normal, v0);
    let t = -(dot(normal, origin) + d) / n_dot_dir;
    if t < 0.0 {
        return None;
    }
    let point = add(origin, scale(dir, t));

    let u = dot(normal, cross(sub(v2, v1), sub(point, v1)));
    if u < 0.0 {
        return None;
    }
    let v = dot(normal, cross(sub(v0, v2), sub(point, v2)));
    if v < 0.0 {
        return None;
    }
    if dot(normal, cross(v0v1, sub(point, v0))) < 0.0 {
        return None;
    }

    let u = u / denom;
    let v = v / denom;
    Some(TriangleHit {
        point,
        t,
        u,
        v,
        w: 1.0 - u - v,
    })
}
