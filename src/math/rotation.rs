//! Per-frame rotation matrices.
//!
//! A [`RotationSeries`] holds one 3×3 matrix per frame. Matrices are derived
//! either from a pair of direction vectors (Rodrigues construction) or from
//! an angle about a coordinate axis, and are applied to point series with a
//! matrix-vector product per frame.

use nalgebra::{Matrix3, Vector3};

use crate::error::Result;
use crate::math::geometry::{cross3, dot3, ensure_same_len, norm3, normalize3, Vec3};
use crate::topology::Axis;

/// One rotation matrix per frame.
pub type RotationSeries = Vec<Matrix3<f64>>;

/// Matrix filled with `NaN`, the per-frame marker for undefined rotations.
#[must_use]
pub fn undefined_rotation() -> Matrix3<f64> {
    Matrix3::from_element(f64::NAN)
}

/// Skew-symmetric cross-product matrix `[v]×`.
#[must_use]
pub fn skew(v: &Vec3) -> Matrix3<f64> {
    Matrix3::new(
        0.0, -v[2], v[1], //
        v[2], 0.0, -v[0], //
        -v[1], v[0], 0.0,
    )
}

/// Some unit vector orthogonal to `v`.
///
/// Crosses `v` with the coordinate axis it is least aligned with.
fn orthogonal_unit(v: &Vec3) -> Vec3 {
    let ax = v[0].abs();
    let ay = v[1].abs();
    let az = v[2].abs();
    let helper = if ax <= ay && ax <= az {
        Axis::X.unit()
    } else if ay <= az {
        Axis::Y.unit()
    } else {
        Axis::Z.unit()
    };
    normalize3(&cross3(v, &helper))
}

/// Rodrigues rotation for unit vectors with `a · b >= 0`.
///
/// Written as `R = I + [v]× + [v]×² / (1 + c)`, which equals the
/// `(1 − c) / s²` form for unit vectors and stays well conditioned as `s`
/// shrinks.
fn rodrigues(a: &Vec3, b: &Vec3, eps: f64) -> Matrix3<f64> {
    let v = cross3(a, b);
    if norm3(&v) <= eps {
        return Matrix3::identity();
    }
    let c = dot3(a, b);
    let vx = skew(&v);
    Matrix3::identity() + vx + vx * vx / (1.0 + c)
}

/// Rotation taking unit vector `a` onto unit vector `b`.
///
/// Uses `R = I + [v]× + [v]×² · (1 − c) / s²` with `v = a × b`, `s = |v|`,
/// `c = a · b`. Parallel vectors give the identity. For `c < 0` the result
/// is the half turn `2uuᵀ − I` about an axis `u` orthogonal to `a`,
/// followed by the rotation from `−a` onto `b`, so nearly opposite vectors
/// are as accurate as nearly equal ones and exactly opposite ones give the
/// half turn. Non-finite input gives an all-`NaN` matrix.
#[must_use]
pub fn rotation_between_units3(a: &Vec3, b: &Vec3, eps: f64) -> Matrix3<f64> {
    if !a.iter().chain(b).all(|x| x.is_finite()) {
        return undefined_rotation();
    }

    if dot3(a, b) >= 0.0 {
        return rodrigues(a, b, eps);
    }

    let u = Vector3::from(orthogonal_unit(a));
    let half_turn = u * u.transpose() * 2.0 - Matrix3::identity();
    let flipped = [-a[0], -a[1], -a[2]];
    rodrigues(&flipped, b, eps) * half_turn
}

/// Rotation taking the direction of `a` onto the direction of `b`.
///
/// Both vectors are normalized first; only direction matters, the rotation
/// is about the origin and preserves length. A zero-length input gives an
/// all-`NaN` matrix.
#[must_use]
pub fn rotation_between3(a: &Vec3, b: &Vec3, eps: f64) -> Matrix3<f64> {
    rotation_between_units3(&normalize3(a), &normalize3(b), eps)
}

/// Per-frame rotation taking unit vectors `a` onto unit vectors `b`.
///
/// # Errors
///
/// Returns an error if the series lengths differ.
pub fn rotation_between_units(a: &[Vec3], b: &[Vec3], eps: f64) -> Result<RotationSeries> {
    ensure_same_len(a, b)?;
    Ok(a.iter()
        .zip(b)
        .map(|(u, v)| rotation_between_units3(u, v, eps))
        .collect())
}

/// Per-frame rotation taking the direction of `a` onto the direction of `b`.
///
/// # Errors
///
/// Returns an error if the series lengths differ.
pub fn rotation_between(a: &[Vec3], b: &[Vec3], eps: f64) -> Result<RotationSeries> {
    ensure_same_len(a, b)?;
    Ok(a.iter()
        .zip(b)
        .map(|(u, v)| rotation_between3(u, v, eps))
        .collect())
}

/// Right-handed rotation by `angle` radians about a coordinate axis.
#[must_use]
pub fn axis_rotation3(axis: Axis, angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.sin_cos();
    match axis {
        Axis::X => Matrix3::new(
            1.0, 0.0, 0.0, //
            0.0, c, -s, //
            0.0, s, c,
        ),
        Axis::Y => Matrix3::new(
            c, 0.0, s, //
            0.0, 1.0, 0.0, //
            -s, 0.0, c,
        ),
        Axis::Z => Matrix3::new(
            c, -s, 0.0, //
            s, c, 0.0, //
            0.0, 0.0, 1.0,
        ),
    }
}

/// Per-frame rotation about a coordinate axis.
#[must_use]
pub fn axis_rotation(axis: Axis, angles: &[f64]) -> RotationSeries {
    angles.iter().map(|&a| axis_rotation3(axis, a)).collect()
}

/// Apply a matrix to a single point.
#[must_use]
#[inline]
pub fn rotate3(r: &Matrix3<f64>, p: &Vec3) -> Vec3 {
    let out = r * Vector3::from(*p);
    [out[0], out[1], out[2]]
}

/// Apply per-frame rotations to a point series.
///
/// # Errors
///
/// Returns an error if the series lengths differ.
pub fn apply_rotation(rotation: &[Matrix3<f64>], points: &[Vec3]) -> Result<Vec<Vec3>> {
    ensure_same_len(rotation, points)?;
    Ok(rotation
        .iter()
        .zip(points)
        .map(|(r, p)| rotate3(r, p))
        .collect())
}

/// Per-frame product `outer · inner`: apply `inner` first, then `outer`.
///
/// # Errors
///
/// Returns an error if the series lengths differ.
pub fn compose(outer: &[Matrix3<f64>], inner: &[Matrix3<f64>]) -> Result<RotationSeries> {
    ensure_same_len(outer, inner)?;
    Ok(outer.iter().zip(inner).map(|(o, i)| o * i).collect())
}
