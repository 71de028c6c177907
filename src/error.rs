//! Error types for pose kinematics operations.
//!
//! Fatal problems (unknown topology names, shape mismatches, unparsable
//! input) are reported through [`KinematicsError`]. Degenerate geometry is
//! never an error: it surfaces as `NaN` in numeric output. Recoverable data
//! quality problems are described by [`DataQualityWarning`], which is logged
//! and handed back to the caller alongside the repaired result.

use std::fmt;

use thiserror::Error;

/// Main error type for pose kinematics operations.
#[derive(Error, Debug)]
pub enum KinematicsError {
    /// Landmark name is not part of the static topology.
    #[error("Unknown landmark: {0}")]
    UnknownLandmark(String),

    /// Vector name is not part of the static topology.
    #[error("Unknown vector: {0}")]
    UnknownVector(String),

    /// Angle name is not part of the static topology.
    #[error("Unknown angle: {0}")]
    UnknownAngle(String),

    /// Kinematic feature name is not recognised.
    #[error("Unknown feature: {0}")]
    UnknownFeature(String),

    /// Signal table has no column with this name.
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// No annotation registered under this name.
    #[error("Unknown annotation: {0}")]
    UnknownAnnotation(String),

    /// Axis or plane specification could not be interpreted.
    #[error("Invalid axis specification: {0}")]
    InvalidAxis(String),

    /// Two series that must be frame-aligned have different lengths.
    #[error("Length mismatch: {left} frames vs {right} frames")]
    LengthMismatch { left: usize, right: usize },

    /// A frame row has the wrong number of coordinate columns.
    #[error("Column count mismatch at row {row}: expected {expected}, got {actual}")]
    ColumnCount {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// Input validation errors.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Tabular input could not be parsed.
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Configuration validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Reading tabular input failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for pose kinematics operations.
pub type Result<T> = std::result::Result<T, KinematicsError>;

impl KinematicsError {
    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a length mismatch error.
    #[must_use]
    pub const fn length_mismatch(left: usize, right: usize) -> Self {
        Self::LengthMismatch { left, right }
    }

    /// Create a column count error.
    #[must_use]
    pub const fn column_count(row: usize, expected: usize, actual: usize) -> Self {
        Self::ColumnCount {
            row,
            expected,
            actual,
        }
    }

    /// Create a parse error.
    #[must_use]
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Whether the error comes from a bad reference into the static topology
    /// or another name lookup.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnknownLandmark(_)
                | Self::UnknownVector(_)
                | Self::UnknownAngle(_)
                | Self::UnknownFeature(_)
                | Self::UnknownColumn(_)
                | Self::UnknownAnnotation(_)
                | Self::InvalidAxis(_)
                | Self::InvalidConfig(_)
        )
    }

    /// Whether the error is a series length or column count inconsistency.
    #[must_use]
    pub const fn is_shape_mismatch(&self) -> bool {
        matches!(self, Self::LengthMismatch { .. } | Self::ColumnCount { .. })
    }
}

/// Non-fatal data quality problem that was repaired locally.
#[derive(Debug, Clone, PartialEq)]
pub enum DataQualityWarning {
    /// Annotation length differed from the frame count and was truncated or
    /// padded with `false`.
    AnnotationLength {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// Input rows carried more columns than the topology uses; the extras
    /// were dropped.
    ExtraColumns { expected: usize, actual: usize },

    /// Ground-plane regression was singular; levelling fell back to identity.
    SingularGroundPlane { points: usize },
}

impl fmt::Display for DataQualityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AnnotationLength {
                name,
                expected,
                actual,
            } => write!(
                f,
                "annotation '{name}' has {actual} frames, expected {expected}; length reconciled"
            ),
            Self::ExtraColumns { expected, actual } => write!(
                f,
                "input has {actual} columns, only the first {expected} are used"
            ),
            Self::SingularGroundPlane { points } => write!(
                f,
                "ground plane regression over {points} foot samples is singular; levelling skipped"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = KinematicsError::length_mismatch(10, 5);
        assert!(err.to_string().contains("10"));
        assert!(err.to_string().contains("5"));

        let err = KinematicsError::column_count(3, 27, 12);
        assert!(err.to_string().contains("row 3"));
    }

    #[test]
    fn test_error_taxonomy() {
        assert!(KinematicsError::UnknownLandmark("paw".into()).is_configuration());
        assert!(KinematicsError::invalid_config("bad rate").is_configuration());
        assert!(KinematicsError::length_mismatch(1, 2).is_shape_mismatch());
        assert!(!KinematicsError::parse(1, "x").is_shape_mismatch());
    }

    #[test]
    fn test_warning_display() {
        let w = DataQualityWarning::AnnotationLength {
            name: "freeze".into(),
            expected: 100,
            actual: 90,
        };
        let text = w.to_string();
        assert!(text.contains("freeze"));
        assert!(text.contains("90"));
    }
}
