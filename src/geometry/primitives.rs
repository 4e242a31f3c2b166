//! Triangle and segment value types stored in a baked surface graph.

use serde::{Deserialize, Serialize};

use super::frame::ReferenceFrame;
use super::vector::{Vec3, add, cross, normalize, sub};

/// A triangle with its normals cached at construction.
///
/// `normal_scaled` is the raw cross product `(v1 - v0) x (v2 - v0)`; its length
/// is twice the triangle area. `normal` is the same vector normalized (zero for
/// a degenerate triangle).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    normal: Vec3,
    normal_scaled: Vec3,
}

impl Triangle {
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        let normal_scaled = cross(sub(v1, v0), sub(v2, v0));
        Self {
            v0,
            v1,
            v2,
            normal: normalize(normal_scaled),
            normal_scaled,
        }
    }

    #[inline]
    pub fn v0(&self) -> Vec3 {
        self.v0
    }

    #[inline]
    pub fn v1(&self) -> Vec3 {
        self.v1
    }

    #[inline]
    pub fn v2(&self) -> Vec3 {
        self.v2
    }

    #[inline]
    pub fn vertices(&self) -> [Vec3; 3] {
        [self.v0, self.v1, self.v2]
    }

    #[inline]
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    #[inline]
    pub fn normal_scaled(&self) -> Vec3 {
        self.normal_scaled
    }

    pub fn area(&self) -> f64 {
        0.5 * super::vector::norm(self.normal_scaled)
    }

    pub fn centroid(&self) -> Vec3 {
        let sum = add(add(self.v0, self.v1), self.v2);
        [sum[0] / 3.0, sum[1] / 3.0, sum[2] / 3.0]
    }

    /// Map all three vertices through `frame`. Normals are recomputed from the
    /// mapped vertices so non-uniform scale is handled.
    pub fn transformed<F: ReferenceFrame + ?Sized>(&self, frame: &F) -> Self {
        Self::new(
            frame.transform_point(self.v0),
            frame.transform_point(self.v1),
            frame.transform_point(self.v2),
        )
    }
}

/// A straight segment between two points.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub p0: Vec3,
    pub p1: Vec3,
}

impl Segment {
    pub fn new(p0: Vec3, p1: Vec3) -> Self {
        Self { p0, p1 }
    }

    /// Unit direction from `p0` towards `p1`.
    pub fn direction(&self) -> Vec3 {
        normalize(sub(self.p1, self.p0))
    }

    pub fn length(&self) -> f64 {
        super::vector::distance(self.p0, self.p1)
    }

    pub fn midpoint(&self) -> Vec3 {
        super::vector::midpoint(self.p0, self.p1)
    }

    pub fn transformed<F: ReferenceFrame + ?Sized>(&self, frame: &F) -> Self {
        Self::new(frame.transform_point(self.p0), frame.transform_point(self.p1))
    }
}
