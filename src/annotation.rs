//! Boolean per-frame annotations and event search.
//!
//! Annotations are named masks over the frames of one recording. They are
//! combined with set algebra, scored against each other, and split into
//! events (runs of consecutive annotated frames).

use std::ops::Range;

use tracing::warn;

use crate::error::{DataQualityWarning, KinematicsError, Result};
use crate::skeleton::Skeleton;

/// Named boolean masks with one entry per frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotations {
    frame_count: usize,
    names: Vec<String>,
    masks: Vec<Vec<bool>>,
}

impl Annotations {
    /// Empty annotation set for a recording of `frame_count` frames.
    #[must_use]
    pub fn new(frame_count: usize) -> Self {
        Self {
            frame_count,
            ..Self::default()
        }
    }

    /// Empty annotation set sized for a skeleton.
    #[must_use]
    pub fn for_skeleton(skeleton: &Skeleton) -> Self {
        Self::new(skeleton.len())
    }

    /// Frames per mask.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Annotation names in insertion order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Whether no annotation has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Add or replace an annotation.
    ///
    /// A mask of the wrong length is truncated or padded with `false`; the
    /// repair is logged and returned.
    pub fn add(&mut self, name: impl Into<String>, mut mask: Vec<bool>) -> Option<DataQualityWarning> {
        let name = name.into();
        let warning = (mask.len() != self.frame_count).then(|| {
            let warning = DataQualityWarning::AnnotationLength {
                name: name.clone(),
                expected: self.frame_count,
                actual: mask.len(),
            };
            warn!(%warning, "reconciling annotation length");
            mask.resize(self.frame_count, false);
            warning
        });

        match self.names.iter().position(|n| *n == name) {
            Some(i) => self.masks[i] = mask,
            None => {
                self.names.push(name);
                self.masks.push(mask);
            }
        }
        warning
    }

    /// Add an annotation computed from a skeleton.
    pub fn annotate<F>(&mut self, name: impl Into<String>, skeleton: &Skeleton, f: F) -> Option<DataQualityWarning>
    where
        F: FnOnce(&Skeleton) -> Vec<bool>,
    {
        self.add(name, f(skeleton))
    }

    /// Mask of one annotation.
    ///
    /// # Errors
    ///
    /// Returns [`KinematicsError::UnknownAnnotation`] if the name is missing.
    pub fn get(&self, name: &str) -> Result<&[bool]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.masks[i].as_slice())
            .ok_or_else(|| KinematicsError::UnknownAnnotation(name.to_string()))
    }

    /// Masks selected by name; an empty selection means every annotation.
    fn selected(&self, names: &[&str]) -> Result<Vec<&[bool]>> {
        if names.is_empty() {
            return Ok(self.masks.iter().map(Vec::as_slice).collect());
        }
        names.iter().map(|n| self.get(n)).collect()
    }

    /// Frames where every selected annotation holds.
    ///
    /// # Errors
    ///
    /// Returns [`KinematicsError::UnknownAnnotation`] for a missing name.
    pub fn intersection(&self, names: &[&str]) -> Result<Vec<bool>> {
        let masks = self.selected(names)?;
        Ok((0..self.frame_count)
            .map(|i| masks.iter().all(|m| m[i]))
            .collect())
    }

    /// Frames where any selected annotation holds.
    ///
    /// # Errors
    ///
    /// Returns [`KinematicsError::UnknownAnnotation`] for a missing name.
    pub fn union(&self, names: &[&str]) -> Result<Vec<bool>> {
        let masks = self.selected(names)?;
        Ok((0..self.frame_count)
            .map(|i| masks.iter().any(|m| m[i]))
            .collect())
    }

    /// Intersection over union of the selected annotations.
    ///
    /// `NaN` when the union is empty.
    ///
    /// # Errors
    ///
    /// Returns [`KinematicsError::UnknownAnnotation`] for a missing name.
    pub fn iou(&self, names: &[&str]) -> Result<f64> {
        let i = count(&self.intersection(names)?);
        let u = count(&self.union(names)?);
        Ok(if u == 0 { f64::NAN } else { i as f64 / u as f64 })
    }

    /// Frame numbers where an annotation holds.
    ///
    /// # Errors
    ///
    /// Returns [`KinematicsError::UnknownAnnotation`] if the name is missing.
    pub fn indices(&self, name: &str) -> Result<Vec<usize>> {
        Ok(true_indices(self.get(name)?))
    }

    /// Fixed-length events of one annotation, see [`search_events`].
    ///
    /// # Errors
    ///
    /// Returns [`KinematicsError::UnknownAnnotation`] if the name is missing,
    /// or [`KinematicsError::InvalidInput`] for a zero length.
    pub fn events(&self, name: &str, length: usize) -> Result<Vec<Range<usize>>> {
        search_events(self.get(name)?, length)
    }
}

fn count(mask: &[bool]) -> usize {
    mask.iter().filter(|&&b| b).count()
}

fn true_indices(mask: &[bool]) -> Vec<usize> {
    mask.iter()
        .enumerate()
        .filter_map(|(i, &b)| b.then_some(i))
        .collect()
}

/// Maximal runs of consecutive `true` frames.
#[must_use]
pub fn split_events(mask: &[bool]) -> Vec<Range<usize>> {
    let mut events = Vec::new();
    let mut start = None;
    for (i, &b) in mask.iter().enumerate() {
        match (b, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                events.push(s..i);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        events.push(s..mask.len());
    }
    events
}

/// Runs of `true` frames chopped into consecutive chunks of exactly
/// `length` frames.
///
/// The remainder of each run that is shorter than `length` is dropped.
///
/// # Errors
///
/// Returns [`KinematicsError::InvalidInput`] for a zero length.
pub fn search_events(mask: &[bool], length: usize) -> Result<Vec<Range<usize>>> {
    if length == 0 {
        return Err(KinematicsError::invalid_input("event length must be at least 1"));
    }
    Ok(split_events(mask)
        .into_iter()
        .flat_map(|run| {
            let chunks = run.len() / length;
            (0..chunks).map(move |k| {
                let start = run.start + k * length;
                start..start + length
            })
        })
        .collect())
}

/// Agreement between a reference mask and a predicted mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryMetrics {
    /// Frames marked in both masks.
    pub true_positive: usize,
    /// Frames marked only in the prediction.
    pub false_positive: usize,
    /// Frames marked in neither mask.
    pub true_negative: usize,
    /// Frames marked only in the reference.
    pub false_negative: usize,
}

/// `num / den`, or 0 when the denominator is 0.
fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

impl BinaryMetrics {
    /// Count the confusion matrix.
    ///
    /// # Errors
    ///
    /// Returns [`KinematicsError::LengthMismatch`] if the masks differ in
    /// length.
    pub fn compute(truth: &[bool], prediction: &[bool]) -> Result<Self> {
        if truth.len() != prediction.len() {
            return Err(KinematicsError::length_mismatch(truth.len(), prediction.len()));
        }
        let mut m = Self {
            true_positive: 0,
            false_positive: 0,
            true_negative: 0,
            false_negative: 0,
        };
        for (&t, &p) in truth.iter().zip(prediction) {
            match (t, p) {
                (true, true) => m.true_positive += 1,
                (false, true) => m.false_positive += 1,
                (false, false) => m.true_negative += 1,
                (true, false) => m.false_negative += 1,
            }
        }
        Ok(m)
    }

    /// Confusion matrix `[[tn, fp], [fn, tp]]`.
    #[must_use]
    pub fn confusion_matrix(&self) -> [[usize; 2]; 2] {
        [
            [self.true_negative, self.false_positive],
            [self.false_negative, self.true_positive],
        ]
    }

    /// Share of frames where both masks agree.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        ratio(
            self.true_positive + self.true_negative,
            self.true_positive + self.true_negative + self.false_positive + self.false_negative,
        )
    }

    /// Share of reference frames that were predicted.
    #[must_use]
    pub fn recall(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_negative)
    }

    /// Share of predicted frames that are in the reference.
    #[must_use]
    pub fn precision(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_positive)
    }

    /// Harmonic mean of precision and recall.
    #[must_use]
    pub fn f1(&self) -> f64 {
        ratio(
            2 * self.true_positive,
            2 * self.true_positive + self.false_positive + self.false_negative,
        )
    }

    /// Intersection over union of the positive class.
    #[must_use]
    pub fn jaccard(&self) -> f64 {
        ratio(
            self.true_positive,
            self.true_positive + self.false_positive + self.false_negative,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skeleton::tests::walking;
    use crate::topology::Landmark;
    use approx::assert_relative_eq;

    fn mask(bits: &str) -> Vec<bool> {
        bits.chars().map(|c| c == '1').collect()
    }

    #[test]
    fn test_length_reconciliation() {
        let mut a = Annotations::new(4);
        assert!(a.add("ok", mask("1010")).is_none());

        let warning = a.add("long", mask("111111")).unwrap();
        assert_eq!(
            warning,
            DataQualityWarning::AnnotationLength {
                name: "long".to_string(),
                expected: 4,
                actual: 6
            }
        );
        assert_eq!(a.get("long").unwrap(), mask("1111").as_slice());

        assert!(a.add("short", mask("1")).is_some());
        assert_eq!(a.get("short").unwrap(), mask("1000").as_slice());
        assert_eq!(a.names().len(), 3);

        a.add("ok", mask("0001"));
        assert_eq!(a.names().len(), 3);
        assert_eq!(a.get("ok").unwrap(), mask("0001").as_slice());
    }

    #[test]
    fn test_set_algebra() {
        let mut a = Annotations::new(5);
        a.add("x", mask("11010"));
        a.add("y", mask("01110"));
        a.add("z", mask("00001"));

        assert_eq!(a.intersection(&["x", "y"]).unwrap(), mask("01010"));
        assert_eq!(a.union(&["x", "y"]).unwrap(), mask("11110"));
        assert_relative_eq!(a.iou(&["x", "y"]).unwrap(), 0.5);
        assert_eq!(a.union(&[]).unwrap(), mask("11111"));
        assert_eq!(a.intersection(&[]).unwrap(), mask("00000"));
        assert!(a.iou(&["x", "w"]).is_err());
        assert!(a.iou(&["z"]).unwrap() == 1.0);

        assert_eq!(a.indices("y").unwrap(), vec![1, 2, 3]);
        assert!(matches!(
            a.indices("w"),
            Err(KinematicsError::UnknownAnnotation(_))
        ));
    }

    #[test]
    fn test_empty_set_iou() {
        let mut a = Annotations::new(3);
        a.add("none", mask("000"));
        assert!(a.iou(&[]).unwrap().is_nan());
    }

    #[test]
    fn test_split_events() {
        assert_eq!(split_events(&mask("0110011101")), vec![1..3, 5..8, 9..10]);
        assert_eq!(split_events(&mask("111")), vec![0..3]);
        assert!(split_events(&mask("000")).is_empty());
        assert!(split_events(&[]).is_empty());
    }

    #[test]
    fn test_search_events() {
        let m = mask("0111111101110");
        assert_eq!(search_events(&m, 3).unwrap(), vec![1..4, 4..7, 9..12]);
        assert_eq!(search_events(&m, 4).unwrap(), vec![1..5]);
        assert!(search_events(&m, 8).unwrap().is_empty());
        assert!(search_events(&m, 0).is_err());
    }

    #[test]
    fn test_annotate_from_skeleton() {
        let skeleton = walking(10);
        let mut a = Annotations::for_skeleton(&skeleton);
        let warning = a.annotate("ahead", &skeleton, |s| {
            s.node(Landmark::Nose).iter().map(|p| p[0] > 6.0).collect()
        });
        assert!(warning.is_none());
        let ahead = a.get("ahead").unwrap();
        assert_eq!(ahead.len(), 10);
        assert!(!ahead[0] && ahead[9]);
        assert_eq!(a.events("ahead", 2).unwrap().len(), count(ahead) / 2);
    }

    #[test]
    fn test_binary_metrics() {
        let truth = mask("11110000");
        let pred = mask("11001100");
        let m = BinaryMetrics::compute(&truth, &pred).unwrap();
        assert_eq!(m.confusion_matrix(), [[2, 2], [2, 2]]);
        assert_relative_eq!(m.accuracy(), 0.5);
        assert_relative_eq!(m.recall(), 0.5);
        assert_relative_eq!(m.precision(), 0.5);
        assert_relative_eq!(m.f1(), 0.5);
        assert_relative_eq!(m.jaccard(), 1.0 / 3.0);

        let none = BinaryMetrics::compute(&mask("00"), &mask("00")).unwrap();
        assert_eq!(none.precision(), 0.0);
        assert_eq!(none.recall(), 0.0);
        assert_eq!(none.accuracy(), 1.0);
        assert!(BinaryMetrics::compute(&truth, &pred[..3]).is_err());
    }
}
