//! Skeleton instances: landmark positions plus derived body vectors.
//!
//! A [`Skeleton`] is an owned, immutable snapshot. Landmark series are
//! extracted once from the frame table and every body vector is derived
//! from them at construction. Transforms (see [`crate::transform`]) build new
//! instances and never touch the receiver.
//!
//! # Example
//!
//! ```
//! use pose_kinematics::{FrameTable, Skeleton, SkeletonConfig};
//!
//! let rows = vec![vec![1.0; 27]; 4];
//! let frames = FrameTable::new(rows)?;
//! let skeleton = Skeleton::new(frames, SkeletonConfig::raw(), "mouse-01")?;
//!
//! let nose = skeleton.landmark("nose")?;
//! assert_eq!(nose.len(), 4);
//! assert!(skeleton.landmark("paw").is_err());
//! # Ok::<(), pose_kinematics::KinematicsError>(())
//! ```

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use crate::config::SkeletonConfig;
use crate::error::{DataQualityWarning, KinematicsError, Result};
use crate::frame::FrameTable;
use crate::math::geometry::{self, sub3, Vec3};
use crate::math::stats;
use crate::signal::SignalTable;
use crate::topology::{Axis, AxisSet, BodyVector, JointAngle, Landmark};

/// Position series of every landmark, indexed by [`Landmark::index`].
pub type LandmarkSet = [Vec<Vec3>; Landmark::COUNT];

/// Series of every body vector, indexed by [`BodyVector::index`].
pub type VectorSet = [Vec<Vec3>; BodyVector::COUNT];

/// One recorded subject in one coordinate frame.
#[derive(Debug, Clone)]
pub struct Skeleton {
    id: String,
    tags: BTreeMap<String, String>,
    config: SkeletonConfig,
    index: Vec<f64>,
    landmarks: LandmarkSet,
    vectors: VectorSet,
    warnings: Vec<DataQualityWarning>,
}

/// Derive every body vector as `head - tail`.
fn derive_vectors(landmarks: &LandmarkSet) -> VectorSet {
    std::array::from_fn(|i| {
        let (head, tail) = BodyVector::ALL[i].endpoints();
        landmarks[head.index()]
            .iter()
            .zip(&landmarks[tail.index()])
            .map(|(h, t)| sub3(h, t))
            .collect()
    })
}

impl Skeleton {
    /// Build a skeleton from raw frames.
    ///
    /// The frame rate of `config` (if any) rescales the index to seconds.
    /// With `horizontal_correction` the ground plane is levelled before the
    /// instance is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(frames: FrameTable, config: SkeletonConfig, id: impl Into<String>) -> Result<Self> {
        config.validate()?;
        let frames = match config.frame_rate {
            Some(rate) => frames.with_frame_rate(rate)?,
            None => frames,
        };

        let landmarks: LandmarkSet = std::array::from_fn(|i| frames.landmark(Landmark::ALL[i]));
        let skeleton = Self {
            id: id.into(),
            tags: BTreeMap::new(),
            index: frames.index().to_vec(),
            vectors: derive_vectors(&landmarks),
            landmarks,
            warnings: frames.warnings().to_vec(),
            config,
        };
        debug!(
            id = %skeleton.id,
            frames = skeleton.len(),
            frame_rate = ?skeleton.config.frame_rate,
            "built skeleton"
        );

        if skeleton.config.horizontal_correction {
            skeleton.level()
        } else {
            Ok(skeleton)
        }
    }

    /// New instance sharing identity and time base with new landmark
    /// positions; body vectors are re-derived.
    pub(crate) fn with_landmarks(&self, landmarks: LandmarkSet) -> Self {
        Self {
            id: self.id.clone(),
            tags: self.tags.clone(),
            config: self.config.clone(),
            index: self.index.clone(),
            vectors: derive_vectors(&landmarks),
            landmarks,
            warnings: self.warnings.clone(),
        }
    }

    pub(crate) fn push_warning(&mut self, warning: DataQualityWarning) {
        self.warnings.push(warning);
    }

    /// Replace the identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Attach a grouping tag.
    #[must_use]
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Grouping tags.
    #[must_use]
    pub fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }

    /// Construction configuration.
    #[must_use]
    pub fn config(&self) -> &SkeletonConfig {
        &self.config
    }

    /// Frames recorded per second, if known.
    #[must_use]
    pub fn frame_rate(&self) -> Option<f64> {
        self.config.frame_rate
    }

    /// Multiplier turning per-frame differences into rates.
    #[must_use]
    pub fn rate_factor(&self) -> f64 {
        self.config.rate_factor()
    }

    /// Data quality problems repaired while building this instance.
    #[must_use]
    pub fn warnings(&self) -> &[DataQualityWarning] {
        &self.warnings
    }

    /// Row labels (frame numbers or seconds).
    #[must_use]
    pub fn index(&self) -> &[f64] {
        &self.index
    }

    /// Number of frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the recording has no frames.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Position series of a landmark.
    #[must_use]
    pub fn node(&self, landmark: Landmark) -> &[Vec3] {
        &self.landmarks[landmark.index()]
    }

    /// Position series of a landmark, by name.
    ///
    /// # Errors
    ///
    /// Returns [`KinematicsError::UnknownLandmark`] for a name outside the
    /// topology.
    pub fn landmark(&self, name: &str) -> Result<&[Vec3]> {
        Ok(self.node(name.parse()?))
    }

    /// Series of a body vector.
    #[must_use]
    pub fn segment(&self, vector: BodyVector) -> &[Vec3] {
        &self.vectors[vector.index()]
    }

    /// Series of a body vector, by name.
    ///
    /// # Errors
    ///
    /// Returns [`KinematicsError::UnknownVector`] for a name outside the
    /// topology.
    pub fn vector(&self, name: &str) -> Result<&[Vec3]> {
        Ok(self.segment(name.parse()?))
    }

    /// Per-frame angle in radians; `NaN` where either vector has zero length.
    #[must_use]
    pub fn joint_angle(&self, angle: JointAngle) -> Vec<f64> {
        let (left, right) = angle.vectors();
        self.segment(left)
            .iter()
            .zip(self.segment(right))
            .map(|(l, r)| geometry::angle3(l, r))
            .collect()
    }

    /// Per-frame angle, by name.
    ///
    /// # Errors
    ///
    /// Returns [`KinematicsError::UnknownAngle`] for a name outside the
    /// topology.
    pub fn angle(&self, name: &str) -> Result<Vec<f64>> {
        Ok(self.joint_angle(name.parse()?))
    }

    /// Landmark or body vector series, by name.
    ///
    /// # Errors
    ///
    /// Returns [`KinematicsError::UnknownLandmark`] if the name is neither.
    pub fn series(&self, name: &str) -> Result<&[Vec3]> {
        if let Ok(landmark) = name.parse::<Landmark>() {
            return Ok(self.node(landmark));
        }
        name.parse::<BodyVector>()
            .map(|v| self.segment(v))
            .map_err(|_| KinematicsError::UnknownLandmark(name.to_string()))
    }

    /// All landmarks with their position series.
    pub fn landmarks(&self) -> impl Iterator<Item = (Landmark, &[Vec3])> {
        Landmark::ALL
            .into_iter()
            .map(move |l| (l, self.landmarks[l.index()].as_slice()))
    }

    /// All body vectors with their series.
    pub fn vectors(&self) -> impl Iterator<Item = (BodyVector, &[Vec3])> {
        BodyVector::ALL
            .into_iter()
            .map(move |v| (v, self.vectors[v.index()].as_slice()))
    }

    /// Landmark positions, cloned.
    #[must_use]
    pub fn landmark_set(&self) -> LandmarkSet {
        self.landmarks.clone()
    }

    /// Range of every landmark coordinate along one axis.
    ///
    /// Non-finite coordinates are skipped; if none remain the range is
    /// `(NaN, NaN)`.
    #[must_use]
    pub fn axis_extent(&self, axis: Axis) -> (f64, f64) {
        let values: Vec<f64> = self
            .landmarks
            .iter()
            .flat_map(|series| series.iter().map(move |p| p[axis.index()]))
            .collect();
        (stats::min(&values), stats::max(&values))
    }

    /// One coordinate of every landmark and body vector.
    #[must_use]
    pub fn axis_data(&self, axis: Axis) -> SignalTable {
        let component =
            |series: &[Vec3]| -> Vec<f64> { series.iter().map(|p| p[axis.index()]).collect() };
        let columns = self
            .landmarks()
            .map(|(l, s)| (l.name(), component(s)))
            .chain(self.vectors().map(|(v, s)| (v.name(), component(s))));
        SignalTable::from_aligned(self.index.clone(), columns)
    }

    /// Landmark or vector series with the components outside `onto` zeroed.
    ///
    /// # Errors
    ///
    /// Returns [`KinematicsError::UnknownLandmark`] for an unknown name.
    pub fn project(&self, name: &str, onto: AxisSet) -> Result<Vec<Vec3>> {
        Ok(geometry::project(self.series(name)?, onto))
    }

    /// Axis unit vector repeated for every frame.
    #[must_use]
    pub fn unit_vectors(&self, axis: Axis) -> Vec<Vec3> {
        geometry::unit_vectors(axis, self.len())
    }

    /// Export the current landmark positions as a raw frame table.
    ///
    /// # Errors
    ///
    /// Only fails if the internal series disagree in length, which
    /// construction rules out.
    pub fn to_frame_table(&self) -> Result<FrameTable> {
        FrameTable::from_landmarks(self.index.clone(), &self.landmarks)
    }
}

impl fmt::Display for Skeleton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Skeleton({})", self.id)?;
        for (key, value) in &self.tags {
            write!(f, " #{key}={value}")?;
        }
        Ok(())
    }
}
