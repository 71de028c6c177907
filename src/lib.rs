//! Pose Kinematics Library
//!
//! Kinematic feature extraction, rigid alignment and cross-signal
//! correlation for animal pose time series.
//!
//! A recording is a table of per-frame 3D coordinates for a fixed set of
//! anatomical landmarks. This library turns it into body vectors, joint
//! angles, velocities and lengths, re-expresses it in normalized coordinate
//! frames, and measures how the derived signals move together.
//!
//! # Features
//!
//! - **Static topology**: 9 landmarks, 11 body vectors and 7 joint angles,
//!   addressed by enum or by name
//! - **Immutable skeletons**: every transform returns a new instance
//! - **Levelling**: least-squares ground plane through the feet, rotated to
//!   horizontal
//! - **Masked correlation**: Pearson, lagged cross-correlation and rolling
//!   windows computed on the frames where both signals are finite
//! - **Undefined geometry as `NaN`**: zero-length vectors never raise
//!
//! # Quick Start
//!
//! ```
//! use pose_kinematics::{Axis, Feature, FrameTable, Landmark, Skeleton, SkeletonConfig};
//!
//! let rows: Vec<Vec<f64>> = (0..10)
//!     .map(|frame| (0..27).map(|c| (c * 7 + frame * 3) as f64 % 11.0).collect())
//!     .collect();
//! let frames = FrameTable::new(rows)?;
//! let skeleton = Skeleton::new(frames, SkeletonConfig::raw().with_frame_rate(20.0), "mouse-01")?;
//!
//! let velocity = skeleton.velocity();
//! assert!(velocity.column("nose")?[0].is_nan());
//!
//! let aligned = skeleton.align_on_axis(Landmark::Anus, Landmark::Nose, Axis::X)?;
//! assert_eq!(aligned.node(Landmark::Anus)[3], [0.0, 0.0, 0.0]);
//!
//! let pairs = skeleton.corr(Feature::Angle);
//! assert_eq!(pairs.len(), 21);
//! # Ok::<(), pose_kinematics::KinematicsError>(())
//! ```
//!
//! # Modules
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`math`] | batched vector geometry, rotations, statistics, cross-correlation |
//! | [`skeleton`] | landmark, vector and angle lookups |
//! | [`kinematics`] | velocities, accelerations, lengths, stretch index |
//! | [`transform`] | translate, rotate, level, align |
//! | [`correlation`] | pairwise and rolling correlation |
//! | [`annotation`] | per-frame boolean annotations and event search |
//! | [`describe`] | long-form statistics table |

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]

pub mod annotation;
pub mod config;
pub mod correlation;
pub mod describe;
pub mod error;
pub mod frame;
pub mod kinematics;
pub mod math;
pub mod signal;
pub mod skeleton;
pub mod topology;
pub mod transform;

// Re-exports for convenient access
pub use annotation::{search_events, split_events, Annotations, BinaryMetrics};
pub use config::{CorrelationConfig, SkeletonConfig, XcorrNormalization};
pub use correlation::{
    cross_correlation, pairwise_apply, pearson, pearson_matrix, rolling_correlation,
    xcorr_lag_matrix, xcorr_max_matrix, CrossCorrelation, PairwiseMatrix,
};
pub use describe::{describe, describe_events, Category, DescribeOptions, DescribeRecord, Statistic};
pub use error::{DataQualityWarning, KinematicsError, Result};
pub use frame::{FrameTable, COLUMN_COUNT};
pub use kinematics::Feature;
pub use math::geometry::Vec3;
pub use math::rotation::RotationSeries;
pub use signal::SignalTable;
pub use skeleton::Skeleton;
pub use topology::{Axis, AxisSet, BodyVector, JointAngle, Landmark};
pub use transform::GroundPlane;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn trotting(n: usize) -> FrameTable {
        let rows = (0..n)
            .map(|i| {
                let t = i as f64 * 0.1;
                let mut row = Vec::with_capacity(COLUMN_COUNT);
                for landmark in Landmark::ALL {
                    let k = landmark.index() as f64;
                    let x = k + 2.0 * t + 0.2 * (3.0 * t + k).sin();
                    let y = 0.3 * k + 0.1 * (2.0 * t).cos();
                    let z = if Landmark::FEET.contains(&landmark) {
                        0.02 * x - 0.01 * y + 0.1
                    } else {
                        1.0 + 0.1 * (t + k).sin()
                    };
                    row.extend([x, y, z]);
                }
                row
            })
            .collect();
        FrameTable::new(rows).unwrap()
    }

    #[test]
    fn test_full_pipeline() {
        let skeleton = Skeleton::new(trotting(60), SkeletonConfig::default(), "m1").unwrap();
        assert_eq!(skeleton.index()[20], 1.0);

        let aligned = skeleton
            .align_on_axis(Landmark::Anus, Landmark::Neck, Axis::X)
            .unwrap();
        for p in aligned.node(Landmark::Neck) {
            assert_relative_eq!(p[1], 0.0, epsilon = 1e-9);
            assert_relative_eq!(p[2], 0.0, epsilon = 1e-9);
        }

        let corr = aligned.corr(Feature::Velocity);
        assert_eq!(corr.len(), 36);
        assert!(corr.iter().all(|(_, v)| v.is_nan() || (-1.0..=1.0).contains(v)));

        let records = describe(&aligned, &DescribeOptions::new()).unwrap();
        assert!(!records.is_empty());
    }

    #[test]
    fn test_levelling_at_construction() {
        let skeleton = Skeleton::new(trotting(40), SkeletonConfig::default(), "m2").unwrap();
        assert!(skeleton.warnings().is_empty());
        let plane = skeleton.ground_plane().unwrap();
        assert_relative_eq!(plane.a, 0.0, epsilon = 1e-9);
        assert_relative_eq!(plane.b, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
