//! Raw frame table: one row of landmark coordinates per recorded frame.
//!
//! Rows hold `x, y, z` triples in the fixed landmark order of
//! [`Landmark::ALL`], 27 values per row. The index is the frame number, or
//! seconds once a frame rate is applied.

use std::io::BufRead;

use tracing::warn;

use crate::error::{DataQualityWarning, KinematicsError, Result};
use crate::math::geometry::Vec3;
use crate::topology::Landmark;

/// Number of coordinate columns the topology uses.
pub const COLUMN_COUNT: usize = Landmark::COUNT * 3;

/// Time-indexed table of raw landmark coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameTable {
    index: Vec<f64>,
    rows: Vec<[f64; COLUMN_COUNT]>,
    warnings: Vec<DataQualityWarning>,
}

impl FrameTable {
    /// Build a table from raw rows, indexed by frame number.
    ///
    /// Every row must have the same number of columns, at least
    /// [`COLUMN_COUNT`]. Trailing extra columns are dropped and reported as a
    /// [`DataQualityWarning::ExtraColumns`].
    ///
    /// # Errors
    ///
    /// Returns [`KinematicsError::ColumnCount`] for a short row or a row whose
    /// width differs from the first row.
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self> {
        let width = rows.first().map_or(COLUMN_COUNT, Vec::len);
        let mut parsed = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            if row.len() < COLUMN_COUNT {
                return Err(KinematicsError::column_count(i, COLUMN_COUNT, row.len()));
            }
            if row.len() != width {
                return Err(KinematicsError::column_count(i, width, row.len()));
            }
            let mut fixed = [0.0; COLUMN_COUNT];
            fixed.copy_from_slice(&row[..COLUMN_COUNT]);
            parsed.push(fixed);
        }

        let mut warnings = Vec::new();
        if width > COLUMN_COUNT {
            let warning = DataQualityWarning::ExtraColumns {
                expected: COLUMN_COUNT,
                actual: width,
            };
            warn!(%warning, "dropping extra frame columns");
            warnings.push(warning);
        }

        Ok(Self {
            index: (0..parsed.len()).map(|i| i as f64).collect(),
            rows: parsed,
            warnings,
        })
    }

    /// Parse headerless comma-separated rows.
    ///
    /// Blank lines are skipped and an empty field reads as `NaN` (a missed
    /// detection).
    ///
    /// # Errors
    ///
    /// Returns [`KinematicsError::Io`] if reading fails,
    /// [`KinematicsError::Parse`] for a non-numeric field, and the errors of
    /// [`FrameTable::new`] for malformed rows.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut rows = Vec::new();
        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let row = trimmed
                .split(',')
                .map(|field| {
                    let field = field.trim();
                    if field.is_empty() {
                        Ok(f64::NAN)
                    } else {
                        field.parse::<f64>().map_err(|e| {
                            KinematicsError::parse(line_no + 1, format!("'{field}': {e}"))
                        })
                    }
                })
                .collect::<Result<Vec<f64>>>()?;
            rows.push(row);
        }
        Self::new(rows)
    }

    /// Build a table from per-landmark position series.
    ///
    /// # Errors
    ///
    /// Returns [`KinematicsError::LengthMismatch`] if any series length
    /// differs from the index.
    pub fn from_landmarks(index: Vec<f64>, landmarks: &[Vec<Vec3>; Landmark::COUNT]) -> Result<Self> {
        let n = index.len();
        if let Some(bad) = landmarks.iter().find(|s| s.len() != n) {
            return Err(KinematicsError::length_mismatch(n, bad.len()));
        }
        let rows = (0..n)
            .map(|frame| {
                let mut row = [0.0; COLUMN_COUNT];
                for landmark in Landmark::ALL {
                    let [cx, cy, cz] = landmark.columns();
                    let p = landmarks[landmark.index()][frame];
                    row[cx] = p[0];
                    row[cy] = p[1];
                    row[cz] = p[2];
                }
                row
            })
            .collect();
        Ok(Self {
            index,
            rows,
            warnings: Vec::new(),
        })
    }

    /// Rescale the frame-number index to seconds.
    ///
    /// # Errors
    ///
    /// Returns [`KinematicsError::InvalidConfig`] for a non-positive or
    /// non-finite rate.
    pub fn with_frame_rate(mut self, frame_rate: f64) -> Result<Self> {
        if !frame_rate.is_finite() || frame_rate <= 0.0 {
            return Err(KinematicsError::invalid_config(
                "frame_rate must be positive and finite",
            ));
        }
        for (i, t) in self.index.iter_mut().enumerate() {
            *t = i as f64 / frame_rate;
        }
        Ok(self)
    }

    /// Number of frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table holds no frames.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row labels.
    #[must_use]
    pub fn index(&self) -> &[f64] {
        &self.index
    }

    /// Raw rows.
    #[must_use]
    pub fn rows(&self) -> &[[f64; COLUMN_COUNT]] {
        &self.rows
    }

    /// Data quality problems repaired while building the table.
    #[must_use]
    pub fn warnings(&self) -> &[DataQualityWarning] {
        &self.warnings
    }

    /// Position series of one landmark.
    #[must_use]
    pub fn landmark(&self, landmark: Landmark) -> Vec<Vec3> {
        let [cx, cy, cz] = landmark.columns();
        self.rows.iter().map(|r| [r[cx], r[cy], r[cz]]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(offset: f64) -> Vec<f64> {
        (0..COLUMN_COUNT).map(|c| c as f64 + offset).collect()
    }

    #[test]
    fn test_landmark_columns() {
        let table = FrameTable::new(vec![row(0.0), row(100.0)]).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.index(), &[0.0, 1.0]);
        assert_eq!(
            table.landmark(Landmark::Chest),
            vec![[9.0, 10.0, 11.0], [109.0, 110.0, 111.0]]
        );
        assert!(table.warnings().is_empty());
    }

    #[test]
    fn test_short_and_ragged_rows() {
        let err = FrameTable::new(vec![vec![0.0; 12]]).unwrap_err();
        assert!(matches!(
            err,
            KinematicsError::ColumnCount {
                row: 0,
                expected: 27,
                actual: 12
            }
        ));

        let mut wide = row(0.0);
        wide.push(1.0);
        assert!(FrameTable::new(vec![wide, row(0.0)]).is_err());
    }

    #[test]
    fn test_extra_columns_warn() {
        let mut wide = row(0.0);
        wide.extend([7.0, 8.0]);
        let table = FrameTable::new(vec![wide]).unwrap();
        assert_eq!(
            table.warnings(),
            &[DataQualityWarning::ExtraColumns {
                expected: 27,
                actual: 29
            }]
        );
        assert_eq!(table.landmark(Landmark::TailTip), vec![[24.0, 25.0, 26.0]]);
    }

    #[test]
    fn test_frame_rate_index() {
        let table = FrameTable::new(vec![row(0.0); 3])
            .unwrap()
            .with_frame_rate(20.0)
            .unwrap();
        assert_eq!(table.index(), &[0.0, 0.05, 0.1]);
        assert!(FrameTable::new(vec![row(0.0)])
            .unwrap()
            .with_frame_rate(0.0)
            .is_err());
    }

    #[test]
    fn test_from_reader() {
        let mut text = String::new();
        for _ in 0..2 {
            let line: Vec<String> = (0..COLUMN_COUNT).map(|c| c.to_string()).collect();
            text.push_str(&line.join(","));
            text.push('\n');
        }
        text.push('\n');
        let table = FrameTable::from_reader(text.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.landmark(Landmark::Neck)[1], [3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_from_reader_missing_and_bad_fields() {
        let mut fields: Vec<String> = (0..COLUMN_COUNT).map(|c| c.to_string()).collect();
        fields[0] = String::new();
        let table = FrameTable::from_reader(fields.join(",").as_bytes()).unwrap();
        assert!(table.landmark(Landmark::Nose)[0][0].is_nan());

        fields[0] = "abc".to_string();
        assert!(matches!(
            FrameTable::from_reader(fields.join(",").as_bytes()),
            Err(KinematicsError::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn test_from_landmarks_round_trip() {
        let table = FrameTable::new(vec![row(0.0), row(50.0)]).unwrap();
        let landmarks: [Vec<Vec3>; Landmark::COUNT] =
            std::array::from_fn(|i| table.landmark(Landmark::ALL[i]));
        let rebuilt = FrameTable::from_landmarks(table.index().to_vec(), &landmarks).unwrap();
        assert_eq!(rebuilt.rows(), table.rows());
    }
}
