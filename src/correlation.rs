//! Correlation engine: pairwise, masked and lag-aware comparisons of the
//! columns of a [`SignalTable`].
//!
//! Every pairwise score is computed on the frames where *both* columns are
//! finite. A column with a leading `NaN` (first-frame velocity) therefore
//! still correlates with the others over the remaining frames, without
//! dropping rows for unrelated pairs.

use crate::config::{CorrelationConfig, XcorrNormalization};
use crate::error::{KinematicsError, Result};
use crate::kinematics::Feature;
use crate::math::{fft, stats};
use crate::signal::SignalTable;
use crate::skeleton::Skeleton;

/// K×K matrix of pairwise scores between named columns.
#[derive(Debug, Clone, PartialEq)]
pub struct PairwiseMatrix {
    names: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl PairwiseMatrix {
    /// Column names, in row/column order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of rows (and columns).
    #[must_use]
    pub fn size(&self) -> usize {
        self.names.len()
    }

    /// Score at row `i`, column `j`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    #[must_use]
    pub fn value(&self, i: usize, j: usize) -> f64 {
        self.values[i][j]
    }

    /// Rows of the matrix.
    #[must_use]
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.values
    }

    /// Score between two named columns.
    ///
    /// # Errors
    ///
    /// Returns [`KinematicsError::UnknownColumn`] if either name is missing.
    pub fn get(&self, row: &str, column: &str) -> Result<f64> {
        let i = self.position(row)?;
        let j = self.position(column)?;
        Ok(self.values[i][j])
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| KinematicsError::UnknownColumn(name.to_string()))
    }

    /// Strict upper triangle as `("a_b", score)` pairs, row by row.
    #[must_use]
    pub fn flatten_upper(&self) -> Vec<(String, f64)> {
        let k = self.size();
        let mut out = Vec::with_capacity(k * k.saturating_sub(1) / 2);
        for i in 0..k {
            for j in i + 1..k {
                out.push((pair_name(&self.names[i], &self.names[j]), self.values[i][j]));
            }
        }
        out
    }

    /// Every entry, diagonal included, as `("a_b", score)` pairs.
    #[must_use]
    pub fn flatten_all(&self) -> Vec<(String, f64)> {
        let mut out = Vec::with_capacity(self.size() * self.size());
        for (i, row) in self.values.iter().enumerate() {
            for (j, &v) in row.iter().enumerate() {
                out.push((pair_name(&self.names[i], &self.names[j]), v));
            }
        }
        out
    }
}

fn pair_name(a: &str, b: &str) -> String {
    format!("{a}_{b}")
}

/// Names of the strict upper-triangle pairs of a table's columns.
fn upper_pair_names(names: &[String]) -> Vec<String> {
    let mut out = Vec::new();
    for (i, a) in names.iter().enumerate() {
        for b in &names[i + 1..] {
            out.push(pair_name(a, b));
        }
    }
    out
}

/// Values of `a` and `b` at the rows where both are finite.
fn finite_intersection(a: &[f64], b: &[f64]) -> (Vec<f64>, Vec<f64>) {
    a.iter()
        .zip(b)
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .map(|(x, y)| (*x, *y))
        .unzip()
}

/// Apply `f` to every ordered column pair, self-pairs included.
///
/// Each pair sees only the rows where both of its columns are finite. A pair
/// with no such row scores `NaN` without calling `f`.
pub fn pairwise_apply<F>(table: &SignalTable, f: F) -> PairwiseMatrix
where
    F: Fn(&[f64], &[f64]) -> f64,
{
    let columns = table.columns();
    let values = columns
        .iter()
        .map(|a| {
            columns
                .iter()
                .map(|b| {
                    let (ma, mb) = finite_intersection(a, b);
                    if ma.is_empty() {
                        f64::NAN
                    } else {
                        f(&ma, &mb)
                    }
                })
                .collect()
        })
        .collect();
    PairwiseMatrix {
        names: table.names().to_vec(),
        values,
    }
}

/// Pearson correlation between every pair of columns.
#[must_use]
pub fn pearson_matrix(table: &SignalTable) -> PairwiseMatrix {
    pairwise_apply(table, stats::pearson)
}

/// Pearson correlation, flattened to the strict upper triangle.
#[must_use]
pub fn pearson(table: &SignalTable) -> Vec<(String, f64)> {
    pearson_matrix(table).flatten_upper()
}

/// Full cross-correlation of two series and its peak.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossCorrelation {
    /// Integer lag of every curve entry, `-(len_b - 1)..=len_a - 1`.
    pub lags: Vec<i64>,
    /// Scaled correlation at each lag.
    pub curve: Vec<f64>,
    /// Peak of the curve, clipped to `[-1, 1]`.
    pub max: f64,
    /// Lag at the peak.
    pub lag: i64,
}

/// Position of the largest value; the first `NaN` wins if any is present.
fn nan_argmax(values: &[f64]) -> Option<usize> {
    if let Some(i) = values.iter().position(|v| v.is_nan()) {
        return Some(i);
    }
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

/// Cross-correlate two series after z-scoring each.
///
/// Constant input has no standard score; the curve is then all `NaN` and so
/// is `max`.
///
/// # Errors
///
/// Returns [`KinematicsError::InvalidInput`] if either series is empty.
pub fn cross_correlation(
    a: &[f64],
    b: &[f64],
    normalization: XcorrNormalization,
) -> Result<CrossCorrelation> {
    if a.is_empty() || b.is_empty() {
        return Err(KinematicsError::invalid_input(
            "cross-correlation needs non-empty series",
        ));
    }
    let za = stats::zscore(a);
    let zb = stats::zscore(b);
    let lags = fft::correlation_lags(a.len(), b.len());
    let raw = fft::cross_correlate(&za, &zb);

    let scale = match normalization {
        XcorrNormalization::Overlap => a.len().min(b.len()) as f64,
        XcorrNormalization::CurveLength => raw.len().saturating_sub(1).max(1) as f64,
    };
    let curve: Vec<f64> = raw.iter().map(|c| c / scale).collect();

    let (max, lag) = match nan_argmax(&curve) {
        Some(i) => (curve[i].clamp(-1.0, 1.0), lags[i]),
        None => (f64::NAN, 0),
    };
    Ok(CrossCorrelation {
        lags,
        curve,
        max,
        lag,
    })
}

/// Peak cross-correlation between every pair of columns.
#[must_use]
pub fn xcorr_max_matrix(table: &SignalTable, normalization: XcorrNormalization) -> PairwiseMatrix {
    pairwise_apply(table, |a, b| {
        cross_correlation(a, b, normalization).map_or(f64::NAN, |x| x.max)
    })
}

/// Lag of the peak cross-correlation between every pair of columns.
#[must_use]
pub fn xcorr_lag_matrix(table: &SignalTable, normalization: XcorrNormalization) -> PairwiseMatrix {
    pairwise_apply(table, |a, b| {
        cross_correlation(a, b, normalization).map_or(f64::NAN, |x| x.lag as f64)
    })
}

/// Row range `[start, end)` of the window labelled at `row`.
fn window_bounds(row: usize, len: usize, window: usize, center: bool) -> (usize, usize) {
    let offset = if center { (window - 1) / 2 } else { 0 };
    let end = (row + 1 + offset).min(len);
    let start = (row + 1 + offset).saturating_sub(window);
    (start, end)
}

/// Windowed Pearson correlation of every column pair.
///
/// Produces one column per strict upper-triangle pair (named `a_b`) and one
/// row per input row. Row `i` correlates the trailing window `[i-w+1, i]`,
/// or with `center` the window `[i-⌊w/2⌋, i-⌊w/2⌋+w-1]`, clipped to the
/// table. A pair needs at least `min_periods` jointly finite rows in the
/// window, otherwise the value is `NaN`.
///
/// # Errors
///
/// Returns [`KinematicsError::InvalidConfig`] for an invalid configuration.
pub fn rolling_correlation(table: &SignalTable, config: &CorrelationConfig) -> Result<SignalTable> {
    config.validate()?;
    let len = table.len();
    let min_periods = config.effective_min_periods();
    let columns = table.columns();

    let mut pairs = Vec::new();
    for i in 0..columns.len() {
        for j in i + 1..columns.len() {
            pairs.push((i, j));
        }
    }

    let mut out: Vec<Vec<f64>> = vec![Vec::with_capacity(len); pairs.len()];
    for row in 0..len {
        let (start, end) = window_bounds(row, len, config.window, config.center);
        for (column, &(i, j)) in out.iter_mut().zip(&pairs) {
            let (a, b) = finite_intersection(&columns[i][start..end], &columns[j][start..end]);
            let value = if a.len() < min_periods {
                f64::NAN
            } else {
                stats::pearson(&a, &b)
            };
            column.push(value);
        }
    }

    Ok(SignalTable::from_aligned(
        table.index().to_vec(),
        upper_pair_names(table.names()).into_iter().zip(out),
    ))
}

impl Skeleton {
    /// Flattened Pearson correlation between the columns of a feature.
    #[must_use]
    pub fn corr(&self, feature: Feature) -> Vec<(String, f64)> {
        pearson(&self.feature(feature))
    }

    /// Rolling Pearson correlation between the columns of a feature.
    ///
    /// # Errors
    ///
    /// Returns [`KinematicsError::InvalidConfig`] for an invalid
    /// configuration.
    pub fn rolling_corr(&self, feature: Feature, config: &CorrelationConfig) -> Result<SignalTable> {
        rolling_correlation(&self.feature(feature), config)
    }
}
