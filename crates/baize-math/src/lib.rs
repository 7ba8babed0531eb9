#![warn(missing_docs)]

//! Math utilities for the baize billiards kernel.
//!
//! Thin wrappers around nalgebra providing the planar helpers the physics
//! crate is built on: headings and angles, z-axis rotation, quadratic and
//! quartic root solving, and tolerance constants.
//!
//! Everything here is fixed-size and stack-allocated; these functions sit
//! on the collision-time hot path.

use nalgebra::{Complex, Matrix3, Matrix4, Vector3};

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A complex scalar, used for polynomial roots.
pub type Complex64 = Complex<f64>;

/// Absolute tolerance for root filtering and degeneracy checks.
///
/// A root counts as real when its imaginary part is within `TOL` of zero,
/// and as strictly future when its real part exceeds `TOL`. The strict
/// inequality prevents an already-resolved event from re-triggering at
/// time zero.
pub const TOL: f64 = f64::EPSILON * 100.0;

/// Normalize `v` to unit length. Returns `None` for vectors shorter
/// than [`TOL`].
pub fn try_unit(v: &Vec3) -> Option<Vec3> {
    v.try_normalize(TOL)
}

/// Planar heading of `v`, in `[0, 2π)`.
pub fn heading(v: &Vec3) -> f64 {
    let ang = v.y.atan2(v.x);
    if ang < 0.0 {
        ang + std::f64::consts::TAU
    } else {
        ang
    }
}

/// Unsigned angle between `a` and `b`, in `[0, π]`.
///
/// Undefined for zero vectors; callers guard.
pub fn angle_between(a: &Vec3, b: &Vec3) -> f64 {
    let cos = a.dot(b) / (a.norm() * b.norm());
    cos.clamp(-1.0, 1.0).acos()
}

/// Rotate `v` about the z-axis by `angle` radians.
pub fn rotate_z(v: &Vec3, angle: f64) -> Vec3 {
    let (s, c) = angle.sin_cos();
    Vec3::new(c * v.x - s * v.y, s * v.x + c * v.y, v.z)
}

/// Orientation of the ordered point triple `(p, q, r)` in the table plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// The three points are collinear.
    Collinear,
    /// `p -> q -> r` turns clockwise.
    Clockwise,
    /// `p -> q -> r` turns counter-clockwise.
    CounterClockwise,
}

/// Classify the turn made by `p -> q -> r`.
pub fn orientation(p: &Vec3, q: &Vec3, r: &Vec3) -> Orientation {
    let val = (q.y - p.y) * (r.x - q.x) - (q.x - p.x) * (r.y - q.y);
    if val > 0.0 {
        Orientation::Clockwise
    } else if val < 0.0 {
        Orientation::CounterClockwise
    } else {
        Orientation::Collinear
    }
}

/// Whether segments `a1 -> a2` and `b1 -> b2` intersect, assuming general
/// position (collinear overlaps are not detected).
pub fn segments_intersect(a1: &Vec3, a2: &Vec3, b1: &Vec3, b2: &Vec3) -> bool {
    let o1 = orientation(a1, a2, b1);
    let o2 = orientation(a1, a2, b2);
    let o3 = orientation(b1, b2, a1);
    let o4 = orientation(b1, b2, a2);
    o1 != o2 && o3 != o4
}

const NAN_ROOT: Complex64 = Complex64::new(f64::NAN, f64::NAN);

/// Both roots of `a·x² + b·x + c = 0`.
///
/// Degenerate leading coefficients reduce the degree: a linear equation
/// yields one root, a constant equation none. Missing roots are NaN,
/// which fails every filter in [`min_future_root`].
pub fn quadratic_roots(a: f64, b: f64, c: f64) -> [Complex64; 2] {
    if a.abs() < TOL {
        if b.abs() < TOL {
            return [NAN_ROOT; 2];
        }
        return [Complex64::new(-c / b, 0.0), NAN_ROOT];
    }
    let disc = b * b - 4.0 * a * c;
    if disc >= 0.0 {
        let sq = disc.sqrt();
        [
            Complex64::new((-b + sq) / (2.0 * a), 0.0),
            Complex64::new((-b - sq) / (2.0 * a), 0.0),
        ]
    } else {
        let re = -b / (2.0 * a);
        let im = (-disc).sqrt() / (2.0 * a);
        [Complex64::new(re, im), Complex64::new(re, -im)]
    }
}

/// All four roots of `a·t⁴ + b·t³ + c·t² + d·t + e = 0`.
///
/// Solved as the complex eigenvalues of the companion matrix. Vanishing
/// leading coefficients reduce the degree, with the unused slots NaN-padded.
pub fn quartic_roots(a: f64, b: f64, c: f64, d: f64, e: f64) -> [Complex64; 4] {
    if a.abs() < TOL {
        if b.abs() < TOL {
            let [r0, r1] = quadratic_roots(c, d, e);
            return [r0, r1, NAN_ROOT, NAN_ROOT];
        }
        let [r0, r1, r2] = cubic_roots(b, c, d, e);
        return [r0, r1, r2, NAN_ROOT];
    }
    let companion = Matrix4::new(
        -b / a,
        -c / a,
        -d / a,
        -e / a,
        1.0,
        0.0,
        0.0,
        0.0,
        0.0,
        1.0,
        0.0,
        0.0,
        0.0,
        0.0,
        1.0,
        0.0,
    );
    let eig = companion.complex_eigenvalues();
    [eig[0], eig[1], eig[2], eig[3]]
}

/// All three roots of `a·t³ + b·t² + c·t + d = 0` with `a` non-negligible.
fn cubic_roots(a: f64, b: f64, c: f64, d: f64) -> [Complex64; 3] {
    let companion = Matrix3::new(-b / a, -c / a, -d / a, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0);
    let eig = companion.complex_eigenvalues();
    [eig[0], eig[1], eig[2]]
}

/// Smallest strictly-future real root, or `+∞` if none exists.
///
/// A root qualifies when `|im| <= TOL` and `re > TOL`; NaN roots never
/// qualify.
pub fn min_future_root(roots: &[Complex64]) -> f64 {
    let mut best = f64::INFINITY;
    for root in roots {
        if root.im.abs() <= TOL && root.re > TOL && root.re < best {
            best = root.re;
        }
    }
    best
}
