//! Property tests for the geometry kernel and the correlation engine.

use approx::assert_relative_eq;
use proptest::prelude::*;

use pose_kinematics::math::geometry::{angle3, distance, norm3, normalize3};
use pose_kinematics::math::rotation::{rotate3, rotation_between_units3};
use pose_kinematics::math::stats;
use pose_kinematics::{cross_correlation, pearson_matrix, SignalTable, Vec3, XcorrNormalization};

fn vec3() -> impl Strategy<Value = Vec3> {
    [-10.0..10.0f64, -10.0..10.0f64, -10.0..10.0f64]
}

fn non_degenerate() -> impl Strategy<Value = Vec3> {
    vec3().prop_filter("vector too short", |v| norm3(v) > 0.1)
}

/// Unit pairs where `b` is `a` or `-a` nudged by a tiny offset.
fn nearly_aligned_pair() -> impl Strategy<Value = (Vec3, Vec3)> {
    (non_degenerate(), vec3(), -14i32..-4, any::<bool>()).prop_map(|(a, d, exp, flip)| {
        let a = normalize3(&a);
        let scale = 10f64.powi(exp);
        let sign = if flip { -1.0 } else { 1.0 };
        let b = normalize3(&[
            sign * a[0] + scale * d[0],
            sign * a[1] + scale * d[1],
            sign * a[2] + scale * d[2],
        ]);
        (a, b)
    })
}

fn check_rotation(a: &Vec3, b: &Vec3) -> Result<(), TestCaseError> {
    let r = rotation_between_units3(a, b, 1e-12);

    let mapped = rotate3(&r, a);
    for i in 0..3 {
        prop_assert!((mapped[i] - b[i]).abs() < 1e-9);
    }

    let gram = r.transpose() * r;
    for i in 0..3 {
        for j in 0..3 {
            let expected = if i == j { 1.0 } else { 0.0 };
            prop_assert!((gram[(i, j)] - expected).abs() < 1e-9);
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn rotation_maps_a_onto_b(a in non_degenerate(), b in non_degenerate()) {
        check_rotation(&normalize3(&a), &normalize3(&b))?;
    }

    #[test]
    fn rotation_maps_nearly_aligned_pairs((a, b) in nearly_aligned_pair()) {
        check_rotation(&a, &b)?;
    }

    #[test]
    fn angle_identities(v in non_degenerate()) {
        let neg = [-v[0], -v[1], -v[2]];
        prop_assert!(angle3(&v, &v).abs() < 1e-6);
        prop_assert!((angle3(&v, &neg) - std::f64::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn distance_is_non_negative(vs in prop::collection::vec(vec3(), 0..20)) {
        prop_assert!(distance(&vs).iter().all(|d| *d >= 0.0));
    }

    #[test]
    fn pearson_matrix_is_symmetric(
        columns in prop::collection::vec(prop::collection::vec(-50.0..50.0f64, 12), 2..5)
    ) {
        let named = columns.into_iter().enumerate().map(|(i, c)| (format!("c{i}"), c));
        let table = SignalTable::from_columns(named).unwrap();
        let m = pearson_matrix(&table);
        for i in 0..m.size() {
            for j in 0..m.size() {
                let (x, y) = (m.value(i, j), m.value(j, i));
                prop_assert!(x == y || (x.is_nan() && y.is_nan()));
            }
        }
    }

    #[test]
    fn xcorr_self_peaks_at_zero(x in prop::collection::vec(-100.0..100.0f64, 3..60)) {
        prop_assume!(stats::std_dev(&x, 0) > 1e-3);
        let xc = cross_correlation(&x, &x, XcorrNormalization::Overlap).unwrap();
        prop_assert_eq!(xc.lag, 0);
        prop_assert!((xc.max - 1.0).abs() < 1e-9);
    }
}

#[test]
fn zero_vector_has_zero_length_and_undefined_angle() {
    assert_eq!(distance(&[[0.0, 0.0, 0.0]]), vec![0.0]);
    assert!(angle3(&[0.0, 0.0, 0.0], &[1.0, 0.0, 0.0]).is_nan());
    assert_relative_eq!(angle3(&[1.0, 0.0, 0.0], &[0.0, 2.0, 0.0]), std::f64::consts::FRAC_PI_2);
}
