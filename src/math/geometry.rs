//! Batched 3-vector geometry.
//!
//! Every series is one `[x, y, z]` per frame. Binary operations require
//! frame-aligned inputs and return [`KinematicsError::LengthMismatch`]
//! otherwise. Geometric degeneracies (zero-length vectors) never fail: they
//! show up as `NaN` in the output and propagate through later arithmetic.

use crate::error::{KinematicsError, Result};
use crate::topology::{Axis, AxisSet};

/// A single 3D vector or point.
pub type Vec3 = [f64; 3];

/// Ensure two series describe the same frames.
///
/// # Errors
///
/// Returns [`KinematicsError::LengthMismatch`] when the lengths differ.
pub fn ensure_same_len<A, B>(a: &[A], b: &[B]) -> Result<()> {
    if a.len() == b.len() {
        Ok(())
    } else {
        Err(KinematicsError::length_mismatch(a.len(), b.len()))
    }
}

/// Dot product of two 3D vectors.
#[must_use]
#[inline]
pub fn dot3(a: &Vec3, b: &Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Cross product of two 3D vectors.
#[must_use]
#[inline]
pub fn cross3(a: &Vec3, b: &Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// Compute the norm of a 3D vector.
#[must_use]
#[inline]
pub fn norm3(v: &Vec3) -> f64 {
    dot3(v, v).sqrt()
}

/// Component-wise `a - b`.
#[must_use]
#[inline]
pub fn sub3(a: &Vec3, b: &Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

/// Component-wise `a + b`.
#[must_use]
#[inline]
pub fn add3(a: &Vec3, b: &Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

/// Normalize a 3D vector to unit length.
///
/// A zero-length vector has no direction and yields `[NaN; 3]`.
#[must_use]
pub fn normalize3(v: &Vec3) -> Vec3 {
    let norm = norm3(v);
    if norm == 0.0 {
        return [f64::NAN; 3];
    }
    [v[0] / norm, v[1] / norm, v[2] / norm]
}

/// Per-frame dot product.
///
/// # Errors
///
/// Returns an error if the series lengths differ.
pub fn dot(a: &[Vec3], b: &[Vec3]) -> Result<Vec<f64>> {
    ensure_same_len(a, b)?;
    Ok(a.iter().zip(b).map(|(u, v)| dot3(u, v)).collect())
}

/// Per-frame cross product.
///
/// # Errors
///
/// Returns an error if the series lengths differ.
pub fn cross(a: &[Vec3], b: &[Vec3]) -> Result<Vec<Vec3>> {
    ensure_same_len(a, b)?;
    Ok(a.iter().zip(b).map(|(u, v)| cross3(u, v)).collect())
}

/// Per-frame Euclidean length. Zero vectors have length 0.
#[must_use]
pub fn distance(v: &[Vec3]) -> Vec<f64> {
    v.iter().map(norm3).collect()
}

/// Per-frame difference `a - b`.
///
/// # Errors
///
/// Returns an error if the series lengths differ.
pub fn difference(a: &[Vec3], b: &[Vec3]) -> Result<Vec<Vec3>> {
    ensure_same_len(a, b)?;
    Ok(a.iter().zip(b).map(|(u, v)| sub3(u, v)).collect())
}

/// Angle between two vectors in radians, in `[0, π]`.
///
/// `NaN` when either vector has zero length.
#[must_use]
pub fn angle3(a: &Vec3, b: &Vec3) -> f64 {
    let denominator = norm3(a) * norm3(b);
    if denominator == 0.0 {
        return f64::NAN;
    }
    // Rounding can push the cosine just past ±1.
    (dot3(a, b) / denominator).clamp(-1.0, 1.0).acos()
}

/// Per-frame angle between two vector series.
///
/// # Errors
///
/// Returns an error if the series lengths differ.
pub fn angle(a: &[Vec3], b: &[Vec3]) -> Result<Vec<f64>> {
    ensure_same_len(a, b)?;
    Ok(a.iter().zip(b).map(|(u, v)| angle3(u, v)).collect())
}

/// Area of the triangle spanned by two edge vectors, per frame.
///
/// # Errors
///
/// Returns an error if the series lengths differ.
pub fn triangle_area(a: &[Vec3], b: &[Vec3]) -> Result<Vec<f64>> {
    ensure_same_len(a, b)?;
    Ok(a.iter()
        .zip(b)
        .map(|(u, v)| norm3(&cross3(u, v)) / 2.0)
        .collect())
}

/// Area of the triangle with corners `p1`, `p2`, `p3`, per frame.
///
/// The edges `p1 - p3` and `p2 - p3` are used.
///
/// # Errors
///
/// Returns an error if the series lengths differ.
pub fn triangle_area_from_points(p1: &[Vec3], p2: &[Vec3], p3: &[Vec3]) -> Result<Vec<f64>> {
    let edge1 = difference(p1, p3)?;
    let edge2 = difference(p2, p3)?;
    triangle_area(&edge1, &edge2)
}

/// Zero every component not in `onto`.
#[must_use]
pub fn project(v: &[Vec3], onto: AxisSet) -> Vec<Vec3> {
    v.iter()
        .map(|p| {
            let mut out = [0.0; 3];
            for axis in onto.axes() {
                out[axis.index()] = p[axis.index()];
            }
            out
        })
        .collect()
}

/// `n` copies of an axis unit vector.
#[must_use]
pub fn unit_vectors(axis: Axis, n: usize) -> Vec<Vec3> {
    vec![axis.unit(); n]
}

/// Per-frame frame-to-frame displacement length.
///
/// The first frame has no predecessor and is `NaN`.
#[must_use]
pub fn step_lengths(v: &[Vec3]) -> Vec<f64> {
    if v.is_empty() {
        return Vec::new();
    }
    std::iter::once(f64::NAN)
        .chain(v.windows(2).map(|w| norm3(&sub3(&w[1], &w[0]))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_dot_and_cross() {
        let a = vec![[1.0, 0.0, 0.0], [1.0, 2.0, 3.0]];
        let b = vec![[0.0, 1.0, 0.0], [4.0, 5.0, 6.0]];
        assert_eq!(dot(&a, &b).unwrap(), vec![0.0, 32.0]);
        assert_eq!(cross(&a, &b).unwrap(), vec![[0.0, 0.0, 1.0], [-3.0, 6.0, -3.0]]);
    }

    #[test]
    fn test_length_mismatch() {
        let a = vec![[1.0, 0.0, 0.0]];
        let b = vec![[0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        assert!(matches!(
            dot(&a, &b),
            Err(KinematicsError::LengthMismatch { left: 1, right: 2 })
        ));
        assert!(angle(&a, &b).is_err());
        assert!(triangle_area(&a, &b).is_err());
    }

    #[test]
    fn test_distance_zero_vector() {
        let d = distance(&[[0.0, 0.0, 0.0], [3.0, 4.0, 0.0]]);
        assert_eq!(d, vec![0.0, 5.0]);
    }

    #[test]
    fn test_angle_identities() {
        let v = [[1.0, 2.0, -0.5]];
        let neg = [[-1.0, -2.0, 0.5]];
        let ortho = [[2.0, -1.0, 0.0]];
        assert_relative_eq!(angle(&v, &v).unwrap()[0], 0.0, epsilon = 1e-7);
        assert_relative_eq!(angle(&v, &neg).unwrap()[0], PI, epsilon = 1e-7);
        assert_relative_eq!(angle(&v, &ortho).unwrap()[0], PI / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_angle_degenerate_is_nan() {
        let a = angle(&[[0.0, 0.0, 0.0]], &[[1.0, 0.0, 0.0]]).unwrap();
        assert!(a[0].is_nan());
    }

    #[test]
    fn test_triangle_area() {
        let area = triangle_area(&[[2.0, 0.0, 0.0]], &[[0.0, 3.0, 0.0]]).unwrap();
        assert_relative_eq!(area[0], 3.0);

        let area = triangle_area_from_points(
            &[[3.0, 1.0, 1.0]],
            &[[1.0, 4.0, 1.0]],
            &[[1.0, 1.0, 1.0]],
        )
        .unwrap();
        assert_relative_eq!(area[0], 3.0);
    }

    #[test]
    fn test_project() {
        let v = [[1.0, 2.0, 3.0]];
        assert_eq!(project(&v, AxisSet::XY), vec![[1.0, 2.0, 0.0]]);
        assert_eq!(project(&v, AxisSet::single(Axis::Z)), vec![[0.0, 0.0, 3.0]]);
    }

    #[test]
    fn test_normalize3() {
        let n = normalize3(&[3.0, 4.0, 0.0]);
        assert_relative_eq!(n[0], 0.6);
        assert_relative_eq!(n[1], 0.8);
        assert_relative_eq!(n[2], 0.0);
        assert!(normalize3(&[0.0; 3])[0].is_nan());
    }

    #[test]
    fn test_step_lengths() {
        let steps = step_lengths(&[[0.0, 0.0, 1.0], [0.0, 0.0, 2.0], [0.0, 3.0, 6.0]]);
        assert!(steps[0].is_nan());
        assert_relative_eq!(steps[1], 1.0);
        assert_relative_eq!(steps[2], 5.0);
        assert!(step_lengths(&[]).is_empty());
    }
}
