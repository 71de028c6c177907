//! Numeric building blocks.
//!
//! This module provides:
//! - [`geometry`]: batched dot/cross products, lengths, angles, areas, projections
//! - [`rotation`]: rotation matrices between directions and about axes
//! - [`stats`]: NaN-skipping descriptive statistics and Pearson correlation
//! - [`fft`]: full linear cross-correlation (direct and FFT)

pub mod fft;
pub mod geometry;
pub mod rotation;
pub mod stats;

pub use fft::{correlation_lags, cross_correlate};
pub use geometry::{angle, cross, distance, dot, triangle_area, triangle_area_from_points, Vec3};
pub use rotation::{
    apply_rotation, axis_rotation, compose, rotation_between, rotation_between_units,
    RotationSeries,
};
