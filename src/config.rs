//! Configuration for skeleton construction and correlation analysis.
//!
//! [`SkeletonConfig`] controls how a [`Skeleton`](crate::Skeleton) is built
//! from a frame table (time base, ground levelling, degeneracy threshold).
//! [`CorrelationConfig`] controls rolling windows and cross-correlation
//! scaling.
//!
//! # Example
//!
//! ```
//! use pose_kinematics::{CorrelationConfig, SkeletonConfig};
//!
//! let config = SkeletonConfig::default().with_frame_rate(30.0);
//! assert!(config.validate().is_ok());
//!
//! let raw = SkeletonConfig::raw();
//! assert!(!raw.horizontal_correction);
//!
//! let rolling = CorrelationConfig::default().with_window(40);
//! assert_eq!(rolling.effective_min_periods(), 40);
//! ```

use crate::error::{KinematicsError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for building a skeleton from raw frames.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SkeletonConfig {
    /// Frames recorded per second.
    ///
    /// When set, the frame index is rescaled to seconds and velocities are
    /// expressed per second. When `None`, the index stays in frames and the
    /// rate factor of all derivatives is 1.
    pub frame_rate: Option<f64>,

    /// Level the ground plane (regress foot contacts to horizontal) right
    /// after construction.
    pub horizontal_correction: bool,

    /// Below this sine magnitude two unit vectors are treated as parallel or
    /// anti-parallel when deriving a rotation.
    pub degenerate_eps: f64,
}

impl Default for SkeletonConfig {
    fn default() -> Self {
        Self {
            frame_rate: Some(20.0),
            horizontal_correction: true,
            degenerate_eps: 1e-12,
        }
    }
}

impl SkeletonConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep coordinates exactly as recorded: frame-number index, no levelling.
    #[must_use]
    pub fn raw() -> Self {
        Self {
            frame_rate: None,
            horizontal_correction: false,
            ..Self::default()
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame rate is not a positive finite number or
    /// the degeneracy threshold is negative.
    pub fn validate(&self) -> Result<()> {
        if let Some(rate) = self.frame_rate {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(KinematicsError::invalid_config(
                    "frame_rate must be positive and finite",
                ));
            }
        }
        if self.degenerate_eps.is_nan() || self.degenerate_eps < 0.0 {
            return Err(KinematicsError::invalid_config(
                "degenerate_eps must be non-negative",
            ));
        }
        Ok(())
    }

    /// Multiplier turning per-frame differences into per-second rates.
    #[must_use]
    pub fn rate_factor(&self) -> f64 {
        self.frame_rate.unwrap_or(1.0)
    }

    /// Set the frame rate.
    #[must_use]
    pub const fn with_frame_rate(mut self, rate: f64) -> Self {
        self.frame_rate = Some(rate);
        self
    }

    /// Keep the index in frame numbers.
    #[must_use]
    pub const fn without_frame_rate(mut self) -> Self {
        self.frame_rate = None;
        self
    }

    /// Enable or disable ground levelling at construction.
    #[must_use]
    pub const fn with_horizontal_correction(mut self, enabled: bool) -> Self {
        self.horizontal_correction = enabled;
        self
    }

    /// Set the degeneracy threshold for rotation derivation.
    #[must_use]
    pub const fn with_degenerate_eps(mut self, eps: f64) -> Self {
        self.degenerate_eps = eps;
        self
    }
}

/// Scaling applied to a cross-correlation curve after z-scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum XcorrNormalization {
    /// Divide by the shorter input length, so a series correlated with
    /// itself peaks at exactly 1.
    #[default]
    Overlap,
    /// Divide by `len(curve) - 1`, the number of lags minus one.
    CurveLength,
}

/// Configuration for the correlation engine.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CorrelationConfig {
    /// Rolling window size in frames.
    pub window: usize,

    /// Label each window at its center instead of its trailing edge.
    pub center: bool,

    /// Minimum observations per window (and per column pair inside it).
    /// `None` means the full window size.
    pub min_periods: Option<usize>,

    /// Cross-correlation curve scaling.
    pub xcorr_normalization: XcorrNormalization,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            window: 20,
            center: true,
            min_periods: None,
            xcorr_normalization: XcorrNormalization::Overlap,
        }
    }
}

impl CorrelationConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the window is empty or `min_periods` is zero or
    /// larger than the window.
    pub fn validate(&self) -> Result<()> {
        if self.window == 0 {
            return Err(KinematicsError::invalid_config("window must be at least 1"));
        }
        match self.min_periods {
            Some(0) => Err(KinematicsError::invalid_config(
                "min_periods must be at least 1",
            )),
            Some(p) if p > self.window => Err(KinematicsError::invalid_config(
                "min_periods cannot exceed window",
            )),
            _ => Ok(()),
        }
    }

    /// Observations required in a window before a value is produced.
    #[must_use]
    pub fn effective_min_periods(&self) -> usize {
        self.min_periods.unwrap_or(self.window)
    }

    /// Set the rolling window size.
    #[must_use]
    pub const fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Set window centering.
    #[must_use]
    pub const fn with_center(mut self, center: bool) -> Self {
        self.center = center;
        self
    }

    /// Set the minimum number of observations.
    #[must_use]
    pub const fn with_min_periods(mut self, min_periods: usize) -> Self {
        self.min_periods = Some(min_periods);
        self
    }

    /// Set the cross-correlation scaling.
    #[must_use]
    pub const fn with_xcorr_normalization(mut self, normalization: XcorrNormalization) -> Self {
        self.xcorr_normalization = normalization;
        self
    }
}
