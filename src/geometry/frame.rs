//! Local-to-world reference frames.
//!
//! A baked graph stores triangles in the mesh's object space. Queries happen in
//! whatever space the caller works in, so every world-space operation takes a
//! [`ReferenceFrame`] that maps object-space coordinates out. The graph never
//! mutates the frame.

use serde::{Deserialize, Serialize};

use super::vector::{Vec3, add};

/// Maps object-space points and directions into the caller's space.
pub trait ReferenceFrame {
    /// Map a position (translation applies).
    fn transform_point(&self, p: Vec3) -> Vec3;
    /// Map a direction (translation does not apply).
    fn transform_vector(&self, v: Vec3) -> Vec3;
}

/// The object space is the world space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Identity;

impl ReferenceFrame for Identity {
    #[inline]
    fn transform_point(&self, p: Vec3) -> Vec3 {
        p
    }

    #[inline]
    fn transform_vector(&self, v: Vec3) -> Vec3 {
        v
    }
}

/// Affine transform `x -> linear * x + translation`, with `linear` stored row-major.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AffineFrame {
    pub linear: [[f64; 3]; 3],
    pub translation: Vec3,
}

impl Default for AffineFrame {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl AffineFrame {
    pub const IDENTITY: Self = Self {
        linear: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        translation: [0.0, 0.0, 0.0],
    };

    pub fn new(linear: [[f64; 3]; 3], translation: Vec3) -> Self {
        Self {
            linear,
            translation,
        }
    }

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn from_scale(s: Vec3) -> Self {
        Self::new([[s[0], 0.0, 0.0], [0.0, s[1], 0.0], [0.0, 0.0, s[2]]], [0.0; 3])
    }

    /// Rotation of `radians` about the +Z axis (counter-clockwise seen from +Z).
    pub fn from_rotation_z(radians: f64) -> Self {
        let (s, c) = radians.sin_cos();
        Self::new([[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]], [0.0; 3])
    }

    /// `self ∘ inner`: apply `inner` first, then `self`.
    pub fn then_after(&self, inner: &AffineFrame) -> Self {
        let mut linear = [[0.0; 3]; 3];
        for (r, row) in linear.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = (0..3).map(|k| self.linear[r][k] * inner.linear[k][c]).sum();
            }
        }
        Self::new(linear, self.transform_point(inner.translation))
    }
}

impl ReferenceFrame for AffineFrame {
    fn transform_point(&self, p: Vec3) -> Vec3 {
        add(self.transform_vector(p), self.translation)
    }

    fn transform_vector(&self, v: Vec3) -> Vec3 {
        let m = &self.linear;
        [
            m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
            m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
            m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
        ]
    }
}

impl<F: ReferenceFrame + ?Sized> ReferenceFrame for &F {
    #[inline]
    fn transform_point(&self, p: Vec3) -> Vec3 {
        (**self).transform_point(p)
    }

    #[inline]
    fn transform_vector(&self, v: Vec3) -> Vec3 {
        (**self).transform_vector(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (0..3).all(|i| (a[i] - b[i]).abs() < 1e-12)
    }

    #[test]
    fn translation_moves_points_not_vectors() {
        let f = AffineFrame::from_translation([1.0, 2.0, 3.0]);
        assert_eq!(f.transform_point([0.0; 3]), [1.0, 2.0, 3.0]);
        assert_eq!(f.transform_vector([1.0, 0.0, 0.0]), [1.0, 0.0, 0.0]);
    }

    #[test]
    fn rotation_z_quarter_turn() {
        let f = AffineFrame::from_rotation_z(std::f64::consts::FRAC_PI_2);
        assert!(approx(f.transform_point([1.0, 0.0, 0.0]), [0.0, 1.0, 0.0]));
    }

    #[test]
    fn composition_applies_inner_first() {
        let scale = AffineFrame::from_scale([2.0, 2.0, 2.0]);
        let shift = AffineFrame::from_translation([1.0, 0.0, 0.0]);
        let f = shift.then_after(&scale);
        assert_eq!(f.transform_point([1.0, 1.0, 1.0]), [3.0, 2.0, 2.0]);
        let g = scale.then_after(&shift);
        assert_eq!(g.transform_point([1.0, 1.0, 1.0]), [4.0, 2.0, 2.0]);
    }
}
