//! Named scalar series over a shared time index.

use crate::error::{KinematicsError, Result};
use crate::math::stats;

/// Column-oriented table of scalar signals.
///
/// Every column has one value per index entry. Derived kinematic features
/// (velocities, angles, lengths) are returned in this form, keyed by the
/// landmark, vector or angle they belong to.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalTable {
    index: Vec<f64>,
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl SignalTable {
    /// Build a table from an index and named columns.
    ///
    /// # Errors
    ///
    /// Returns [`KinematicsError::LengthMismatch`] if a column length differs
    /// from the index, or [`KinematicsError::InvalidInput`] for a duplicate
    /// column name.
    pub fn new<S, I>(index: Vec<f64>, columns: I) -> Result<Self>
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, Vec<f64>)>,
    {
        let mut names = Vec::new();
        let mut data = Vec::new();
        for (name, column) in columns {
            let name = name.into();
            if column.len() != index.len() {
                return Err(KinematicsError::length_mismatch(index.len(), column.len()));
            }
            if names.contains(&name) {
                return Err(KinematicsError::invalid_input(format!(
                    "duplicate column '{name}'"
                )));
            }
            names.push(name);
            data.push(column);
        }
        Ok(Self {
            index,
            names,
            columns: data,
        })
    }

    /// Build a table from columns already known to match the index.
    pub(crate) fn from_aligned<S, I>(index: Vec<f64>, columns: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, Vec<f64>)>,
    {
        let (names, columns): (Vec<String>, Vec<Vec<f64>>) =
            columns.into_iter().map(|(n, c)| (n.into(), c)).unzip();
        debug_assert!(columns.iter().all(|c| c.len() == index.len()));
        Self {
            index,
            names,
            columns,
        }
    }

    /// Build a table with index `0, 1, ..., n-1`.
    ///
    /// # Errors
    ///
    /// Same as [`SignalTable::new`]; the index length is taken from the first
    /// column.
    pub fn from_columns<S, I>(columns: I) -> Result<Self>
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, Vec<f64>)>,
    {
        let columns: Vec<(S, Vec<f64>)> = columns.into_iter().collect();
        let len = columns.first().map_or(0, |(_, c)| c.len());
        let index = (0..len).map(|i| i as f64).collect();
        Self::new(index, columns)
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Row labels (frame numbers or seconds).
    #[must_use]
    pub fn index(&self) -> &[f64] {
        &self.index
    }

    /// Column names in order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Column data in order.
    #[must_use]
    pub fn columns(&self) -> &[Vec<f64>] {
        &self.columns
    }

    /// `(name, column)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter().map(Vec::as_slice))
    }

    /// Look up a column by name.
    ///
    /// # Errors
    ///
    /// Returns [`KinematicsError::UnknownColumn`] if no column has this name.
    pub fn column(&self, name: &str) -> Result<&[f64]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.columns[i].as_slice())
            .ok_or_else(|| KinematicsError::UnknownColumn(name.to_string()))
    }

    /// Keep only the given rows, in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`KinematicsError::InvalidInput`] if a row is out of range.
    pub fn select_rows(&self, rows: &[usize]) -> Result<Self> {
        if let Some(&bad) = rows.iter().find(|&&r| r >= self.len()) {
            return Err(KinematicsError::invalid_input(format!(
                "row {bad} out of range for {} rows",
                self.len()
            )));
        }
        Ok(Self {
            index: rows.iter().map(|&r| self.index[r]).collect(),
            names: self.names.clone(),
            columns: self
                .columns
                .iter()
                .map(|c| rows.iter().map(|&r| c[r]).collect())
                .collect(),
        })
    }

    /// Apply a whole-column transform to every column.
    #[must_use]
    pub fn map_columns<F>(&self, f: F) -> Self
    where
        F: Fn(&[f64]) -> Vec<f64>,
    {
        Self {
            index: self.index.clone(),
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| f(c.as_slice())).collect(),
        }
    }

    /// Multiply every value by a constant.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        self.map_columns(|c| c.iter().map(|v| v * factor).collect())
    }

    /// First difference of every column; the first row becomes `NaN`.
    #[must_use]
    pub fn diff(&self) -> Self {
        self.map_columns(stats::diff)
    }

    /// NaN-skipping running sum of every column.
    #[must_use]
    pub fn cumsum(&self) -> Self {
        self.map_columns(stats::cumsum)
    }

    /// Per-column standard score.
    #[must_use]
    pub fn zscore(&self) -> Self {
        self.map_columns(stats::zscore)
    }

    /// Reduce every column to one value.
    pub fn reduce<F>(&self, f: F) -> Vec<(String, f64)>
    where
        F: Fn(&[f64]) -> f64,
    {
        self.iter().map(|(n, c)| (n.to_string(), f(c))).collect()
    }
}
