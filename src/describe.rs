//! Long-form summary of a skeleton's kinematic features.
//!
//! [`describe`] flattens per-column statistics and pairwise correlations of
//! selected feature families into one record per value, each tagged with
//! the feature, the column (or column pair) it belongs to, and the identity
//! of the recording.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::XcorrNormalization;
use crate::correlation::{pearson_matrix, xcorr_lag_matrix, xcorr_max_matrix};
use crate::error::Result;
use crate::kinematics::Feature;
use crate::math::stats;
use crate::skeleton::Skeleton;

/// Kind of summary value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Category {
    /// Per-column statistic.
    Statistics,
    /// Pairwise correlation between two columns.
    Correlation,
}

/// Summary statistic of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Statistic {
    /// Arithmetic mean.
    Mean,
    /// Sample standard deviation.
    Std,
    /// Median.
    Median,
    /// Bias-corrected skewness.
    Skewness,
    /// Bias-corrected excess kurtosis.
    Kurtosis,
    /// Pearson correlation of a column pair.
    Pearson,
    /// Peak of the cross-correlation curve.
    XcorrMax,
    /// Lag in frames at the cross-correlation peak.
    XcorrLag,
}

impl Statistic {
    /// Per-column statistics, in output order.
    pub const COLUMN: [Self; 5] = [Self::Mean, Self::Std, Self::Median, Self::Skewness, Self::Kurtosis];

    /// Pairwise statistics, in output order.
    pub const PAIRWISE: [Self; 3] = [Self::Pearson, Self::XcorrMax, Self::XcorrLag];

    /// Snake-case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Std => "std",
            Self::Median => "median",
            Self::Skewness => "skewness",
            Self::Kurtosis => "kurtosis",
            Self::Pearson => "pearson",
            Self::XcorrMax => "xcorr_max",
            Self::XcorrLag => "xcorr_lag",
        }
    }

    /// Category the statistic belongs to.
    #[must_use]
    pub const fn category(self) -> Category {
        match self {
            Self::Pearson | Self::XcorrMax | Self::XcorrLag => Category::Correlation,
            _ => Category::Statistics,
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One value of the long-form table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DescribeRecord {
    /// Feature family the value was computed from.
    pub feature: Feature,
    /// Column name, or `a_b` for a column pair.
    pub target: String,
    /// Whether the value summarises one column or a pair.
    pub category: Category,
    /// Statistic that produced the value.
    pub statistic: Statistic,
    /// The computed value; `NaN` when undefined.
    pub value: f64,
    /// Recording identifier, when requested.
    pub id: Option<String>,
    /// Recording tags, when requested.
    pub tags: BTreeMap<String, String>,
    /// Event label, when describing an event.
    pub event: Option<String>,
}

/// What [`describe`] includes.
#[derive(Debug, Clone, PartialEq)]
pub struct DescribeOptions {
    /// Restrict to these frames; `None` uses the whole recording.
    pub frames: Option<Vec<usize>>,
    /// Label attached to every record.
    pub event: Option<String>,
    /// Features summarised column by column.
    pub statistics: Vec<Feature>,
    /// Features summarised pair by pair.
    pub correlations: Vec<Feature>,
    /// Attach the recording identifier.
    pub assign_id: bool,
    /// Attach the recording tags.
    pub assign_tags: bool,
    /// Scaling of the cross-correlation curves.
    pub xcorr_normalization: XcorrNormalization,
}

impl Default for DescribeOptions {
    fn default() -> Self {
        Self {
            frames: None,
            event: None,
            statistics: vec![
                Feature::Velocity,
                Feature::Acceleration,
                Feature::Angle,
                Feature::AngleVelocity,
                Feature::AngleAcceleration,
                Feature::VectorLength,
            ],
            correlations: vec![
                Feature::Velocity,
                Feature::Acceleration,
                Feature::Angle,
                Feature::AngleVelocity,
                Feature::AngleAcceleration,
                Feature::StretchIndex,
            ],
            assign_id: true,
            assign_tags: true,
            xcorr_normalization: XcorrNormalization::Overlap,
        }
    }
}

impl DescribeOptions {
    /// Create options with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to a subset of frames.
    #[must_use]
    pub fn with_frames(mut self, frames: Vec<usize>) -> Self {
        self.frames = Some(frames);
        self
    }

    /// Label every record with an event name.
    #[must_use]
    pub fn with_event(mut self, event: impl Into<String>) -> Self {
        self.event = Some(event.into());
        self
    }

    /// Replace the per-column feature list.
    #[must_use]
    pub fn with_statistics(mut self, features: Vec<Feature>) -> Self {
        self.statistics = features;
        self
    }

    /// Replace the pairwise feature list.
    #[must_use]
    pub fn with_correlations(mut self, features: Vec<Feature>) -> Self {
        self.correlations = features;
        self
    }

    /// Toggle identifier and tag columns.
    #[must_use]
    pub const fn with_identity(mut self, assign_id: bool, assign_tags: bool) -> Self {
        self.assign_id = assign_id;
        self.assign_tags = assign_tags;
        self
    }
}

fn column_statistic(statistic: Statistic, values: &[f64]) -> f64 {
    match statistic {
        Statistic::Mean => stats::mean(values),
        Statistic::Std => stats::std_dev(values, 1),
        Statistic::Median => stats::median(values),
        Statistic::Skewness => stats::skewness(values),
        Statistic::Kurtosis => stats::kurtosis(values),
        Statistic::Pearson | Statistic::XcorrMax | Statistic::XcorrLag => f64::NAN,
    }
}

/// Summarise a skeleton as long-form records.
///
/// Statistics come first (feature by feature, statistic by statistic,
/// column by column), then correlations in the same nesting.
///
/// # Errors
///
/// Returns [`crate::KinematicsError::InvalidInput`] if a requested frame is
/// out of range.
pub fn describe(skeleton: &Skeleton, options: &DescribeOptions) -> Result<Vec<DescribeRecord>> {
    let id = options.assign_id.then(|| skeleton.id().to_string());
    let tags = if options.assign_tags {
        skeleton.tags().clone()
    } else {
        BTreeMap::new()
    };
    let record = |feature: Feature, statistic: Statistic, target: String, value: f64| DescribeRecord {
        feature,
        target,
        category: statistic.category(),
        statistic,
        value,
        id: id.clone(),
        tags: tags.clone(),
        event: options.event.clone(),
    };
    let table_for = |feature: Feature| {
        let table = skeleton.feature(feature);
        match &options.frames {
            Some(frames) => table.select_rows(frames),
            None => Ok(table),
        }
    };

    let mut records = Vec::new();
    for &feature in &options.statistics {
        let table = table_for(feature)?;
        for statistic in Statistic::COLUMN {
            for (name, values) in table.iter() {
                records.push(record(
                    feature,
                    statistic,
                    name.to_string(),
                    column_statistic(statistic, values),
                ));
            }
        }
    }

    for &feature in &options.correlations {
        let table = table_for(feature)?;
        let matrices = [
            (Statistic::Pearson, pearson_matrix(&table)),
            (Statistic::XcorrMax, xcorr_max_matrix(&table, options.xcorr_normalization)),
            (Statistic::XcorrLag, xcorr_lag_matrix(&table, options.xcorr_normalization)),
        ];
        for (statistic, matrix) in matrices {
            for (target, value) in matrix.flatten_upper() {
                records.push(record(feature, statistic, target, value));
            }
        }
    }
    Ok(records)
}

/// Describe every event of a recording and concatenate the records.
///
/// # Errors
///
/// Returns [`crate::KinematicsError::InvalidInput`] if an event reaches past
/// the last frame.
pub fn describe_events(
    skeleton: &Skeleton,
    events: &[Range<usize>],
    options: &DescribeOptions,
) -> Result<Vec<DescribeRecord>> {
    let mut records = Vec::new();
    for event in events {
        let mut options = options.clone();
        options.frames = Some(event.clone().collect());
        records.extend(describe(skeleton, &options)?);
    }
    Ok(records)
}

impl Skeleton {
    /// Long-form summary, see [`describe`].
    ///
    /// # Errors
    ///
    /// Same as [`describe`].
    pub fn describe(&self, options: &DescribeOptions) -> Result<Vec<DescribeRecord>> {
        describe(self, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skeleton::tests::walking;
    use approx::assert_relative_eq;

    #[test]
    fn test_record_counts() {
        let skeleton = walking(25).with_tag("group", "control");
        let records = describe(&skeleton, &DescribeOptions::new()).unwrap();

        let stats = records
            .iter()
            .filter(|r| r.category == Category::Statistics)
            .count();
        // (9 + 9 + 7 + 7 + 7 + 11) columns × 5 statistics
        assert_eq!(stats, 250);

        let corrs = records
            .iter()
            .filter(|r| r.category == Category::Correlation)
            .count();
        // (36 + 36 + 21 + 21 + 21 + 55) pairs × 3 statistics
        assert_eq!(corrs, 570);

        let first = &records[0];
        assert_eq!(first.feature, Feature::Velocity);
        assert_eq!(first.statistic, Statistic::Mean);
        assert_eq!(first.target, "nose");
        assert_eq!(first.id.as_deref(), Some("walker"));
        assert_eq!(first.tags.get("group").map(String::as_str), Some("control"));
        assert!(first.event.is_none());
    }

    #[test]
    fn test_values_match_core() {
        let skeleton = walking(30);
        let options = DescribeOptions::new()
            .with_statistics(vec![Feature::Angle])
            .with_correlations(vec![Feature::Velocity]);
        let records = describe(&skeleton, &options).unwrap();

        let body_mean = records
            .iter()
            .find(|r| r.statistic == Statistic::Mean && r.target == "body")
            .unwrap();
        assert_relative_eq!(body_mean.value, stats::mean(&skeleton.angle("body").unwrap()));

        let flat = skeleton.corr(Feature::Velocity);
        let pearson: Vec<&DescribeRecord> = records
            .iter()
            .filter(|r| r.statistic == Statistic::Pearson)
            .collect();
        assert_eq!(pearson.len(), flat.len());
        for (r, (name, value)) in pearson.iter().zip(&flat) {
            assert_eq!(&r.target, name);
            assert!(r.value == *value || (r.value.is_nan() && value.is_nan()));
        }
    }

    #[test]
    fn test_frame_subset_and_event() {
        let skeleton = walking(30);
        let options = DescribeOptions::new()
            .with_statistics(vec![Feature::VectorLength])
            .with_correlations(vec![])
            .with_frames((10..20).collect())
            .with_event("rearing")
            .with_identity(false, false);
        let records = describe(&skeleton, &options).unwrap();
        assert_eq!(records.len(), 11 * 5);
        assert!(records.iter().all(|r| r.event.as_deref() == Some("rearing")));
        assert!(records.iter().all(|r| r.id.is_none() && r.tags.is_empty()));

        let head = skeleton.vector_lengths();
        let head = &head.column("head").unwrap()[10..20];
        let median = records
            .iter()
            .find(|r| r.statistic == Statistic::Median && r.target == "head")
            .unwrap();
        assert_relative_eq!(median.value, stats::median(head));

        let bad = options.with_frames(vec![31]);
        assert!(describe(&skeleton, &bad).is_err());
    }

    #[test]
    fn test_describe_events() {
        let skeleton = walking(30);
        let options = DescribeOptions::new()
            .with_statistics(vec![Feature::Angle])
            .with_correlations(vec![]);
        let records = describe_events(&skeleton, &[0..10, 15..25], &options).unwrap();
        assert_eq!(records.len(), 2 * 7 * 5);
        assert!(describe_events(&skeleton, &[25..35], &options).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_records_serialize() {
        let skeleton = walking(8);
        let options = DescribeOptions::new()
            .with_statistics(vec![Feature::Velocity])
            .with_correlations(vec![]);
        let records = skeleton.describe(&options).unwrap();
        let json = serde_json::to_value(&records[0]).unwrap();
        assert_eq!(json["statistic"], "mean");
        assert_eq!(json["category"], "statistics");
        assert_eq!(json["target"], "nose");
        assert_eq!(json["id"], "walker");
        assert_eq!(json["feature"], "velocity");
    }
}
