//! Small `[f64; 3]` vector helpers shared by the geometry and search code.
//!
//! Points and directions are plain arrays so meshes coming from any engine or
//! file format can be fed in without conversion.

/// A 3D point or direction.
pub type Vec3 = [f64; 3];

pub const ZERO: Vec3 = [0.0, 0.0, 0.0];

const EPS: f64 = 1e-12;

#[inline]
pub fn add(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

#[inline]
pub fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
pub fn scale(a: Vec3, s: f64) -> Vec3 {
    [a[0] * s, a[1] * s, a[2] * s]
}

#[inline]
pub fn neg(a: Vec3) -> Vec3 {
    [-a[0], -a[1], -a[2]]
}

#[inline]
pub fn dot(a: Vec3, b: Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline]
pub fn cross(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[inline]
pub fn norm(a: Vec3) -> f64 {
    dot(a, a).sqrt()
}

#[inline]
pub fn distance(a: Vec3, b: Vec3) -> f64 {
    norm(sub(a, b))
}

/// Unit-length copy of `a`, or the zero vector when `a` is (numerically) zero.
#[inline]
pub fn normalize(a: Vec3) -> Vec3 {
    let len = norm(a);
    if len <= EPS { ZERO } else { scale(a, 1.0 / len) }
}

#[inline]
pub fn midpoint(a: Vec3, b: Vec3) -> Vec3 {
    scale(add(a, b), 0.5)
}

/// `+1.0` for non-negative values, `-1.0` otherwise (zero counts as positive).
#[inline]
pub fn sign(x: f64) -> f64 {
    if x >= 0.0 { 1.0 } else { -1.0 }
}

#[inline]
pub fn is_finite(a: Vec3) -> bool {
    a.iter().all(|c| c.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_zero_stays_zero() {
        assert_eq!(normalize(ZERO), ZERO);
        assert_eq!(normalize([0.0, 3.0, 0.0]), [0.0, 1.0, 0.0]);
    }

    #[test]
    fn sign_of_zero_is_positive() {
        assert_eq!(sign(0.0), 1.0);
        assert_eq!(sign(-0.0), 1.0);
        assert_eq!(sign(-2.0), -1.0);
    }

    #[test]
    fn cross_follows_right_hand_rule() {
        assert_eq!(cross([1.0, 0.0, 0.0], [0.0, 1.0, 0.0]), [0.0, 0.0, 1.0]);
    }
}
