//! Kinematic features derived from a skeleton.
//!
//! All derivations are pure functions of the landmark positions and the
//! frame rate, recomputed on every call. Frame differences leave the first
//! frame `NaN` (there is no previous frame); second differences leave the
//! first two frames `NaN`.

use std::fmt;
use std::str::FromStr;

use crate::error::KinematicsError;
use crate::math::geometry;
use crate::math::stats;
use crate::signal::SignalTable;
use crate::skeleton::Skeleton;
use crate::topology::{JointAngle, Landmark};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Named family of derived signals, one column per landmark, vector or angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Feature {
    /// Frame-to-frame displacement of each landmark.
    Distance,
    /// Displacement per second.
    Velocity,
    /// Change of velocity per second.
    Acceleration,
    /// Running total of displacement.
    CumulativeDistance,
    /// Joint angles in radians.
    Angle,
    /// Change of joint angle per second.
    AngleVelocity,
    /// Change of angular velocity per second.
    AngleAcceleration,
    /// Length of each body vector.
    VectorLength,
    /// Standard score of each body vector length.
    StretchIndex,
}

impl Feature {
    /// All features.
    pub const ALL: [Self; 9] = [
        Self::Distance,
        Self::Velocity,
        Self::Acceleration,
        Self::CumulativeDistance,
        Self::Angle,
        Self::AngleVelocity,
        Self::AngleAcceleration,
        Self::VectorLength,
        Self::StretchIndex,
    ];

    /// Snake-case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Distance => "distance",
            Self::Velocity => "velocity",
            Self::Acceleration => "acceleration",
            Self::CumulativeDistance => "cumulative_distance",
            Self::Angle => "angle",
            Self::AngleVelocity => "angle_velocity",
            Self::AngleAcceleration => "angle_acceleration",
            Self::VectorLength => "vector_length",
            Self::StretchIndex => "stretch_index",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Feature {
    type Err = KinematicsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| KinematicsError::UnknownFeature(s.to_string()))
    }
}

impl Skeleton {
    /// Compute a feature family.
    #[must_use]
    pub fn feature(&self, feature: Feature) -> SignalTable {
        match feature {
            Feature::Distance => self.distance(),
            Feature::Velocity => self.velocity(),
            Feature::Acceleration => self.acceleration(),
            Feature::CumulativeDistance => self.cumulative_distance(),
            Feature::Angle => self.angles(),
            Feature::AngleVelocity => self.angle_velocity(),
            Feature::AngleAcceleration => self.angle_acceleration(),
            Feature::VectorLength => self.vector_lengths(),
            Feature::StretchIndex => self.stretch_index(),
        }
    }

    /// Compute a feature family by name.
    ///
    /// # Errors
    ///
    /// Returns [`KinematicsError::UnknownFeature`] for an unrecognised name.
    pub fn feature_by_name(&self, name: &str) -> Result<SignalTable, KinematicsError> {
        Ok(self.feature(name.parse()?))
    }

    /// Frame-to-frame displacement length of every landmark.
    #[must_use]
    pub fn distance(&self) -> SignalTable {
        let columns = self
            .landmarks()
            .map(|(l, series)| (l.name(), geometry::step_lengths(series)));
        SignalTable::from_aligned(self.index().to_vec(), columns)
    }

    /// Displacement per second (`distance × frame_rate`).
    #[must_use]
    pub fn velocity(&self) -> SignalTable {
        self.distance().scaled(self.rate_factor())
    }

    /// Change of velocity per second.
    #[must_use]
    pub fn acceleration(&self) -> SignalTable {
        self.velocity().diff().scaled(self.rate_factor())
    }

    /// Running total of displacement.
    #[must_use]
    pub fn cumulative_distance(&self) -> SignalTable {
        self.distance().cumsum()
    }

    /// Total path length of every landmark.
    #[must_use]
    pub fn total_distance(&self) -> Vec<(Landmark, f64)> {
        Landmark::ALL
            .into_iter()
            .zip(self.cumulative_distance().columns())
            .map(|(l, c)| (l, stats::max(c)))
            .collect()
    }

    /// Every joint angle, in radians.
    #[must_use]
    pub fn angles(&self) -> SignalTable {
        let columns = JointAngle::ALL
            .into_iter()
            .map(|a| (a.name(), self.joint_angle(a)));
        SignalTable::from_aligned(self.index().to_vec(), columns)
    }

    /// Change of joint angle per second.
    #[must_use]
    pub fn angle_velocity(&self) -> SignalTable {
        self.angles().diff().scaled(self.rate_factor())
    }

    /// Change of angular velocity per second.
    #[must_use]
    pub fn angle_acceleration(&self) -> SignalTable {
        self.angle_velocity().diff().scaled(self.rate_factor())
    }

    /// Length of every body vector.
    #[must_use]
    pub fn vector_lengths(&self) -> SignalTable {
        let columns = self
            .vectors()
            .map(|(v, series)| (v.name(), geometry::distance(series)));
        SignalTable::from_aligned(self.index().to_vec(), columns)
    }

    /// Standard score of every body vector length over the recording.
    ///
    /// Positive values mark frames where a segment is stretched beyond its
    /// usual length.
    #[must_use]
    pub fn stretch_index(&self) -> SignalTable {
        self.vector_lengths().zscore()
    }
}
