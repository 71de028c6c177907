//! Descriptive statistics over scalar series.
//!
//! Aggregates skip non-finite values, so a leading `NaN` from a frame
//! difference or an undefined angle does not poison a whole column. A
//! statistic that needs more finite samples than are available is `NaN`.

/// Finite values of a series.
fn finite(values: &[f64]) -> impl Iterator<Item = f64> + '_ {
    values.iter().copied().filter(|v| v.is_finite())
}

/// Mean of the finite values.
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    let (sum, count) = finite(values).fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// Standard deviation of the finite values with `ddof` delta degrees of
/// freedom (0 = population, 1 = sample).
#[must_use]
pub fn std_dev(values: &[f64], ddof: usize) -> f64 {
    let n = finite(values).count();
    if n <= ddof {
        return f64::NAN;
    }
    let m = mean(values);
    let ss: f64 = finite(values).map(|v| (v - m).powi(2)).sum();
    (ss / (n - ddof) as f64).sqrt()
}

/// Median of the finite values.
#[must_use]
pub fn median(values: &[f64]) -> f64 {
    let mut sorted: Vec<f64> = finite(values).collect();
    if sorted.is_empty() {
        return f64::NAN;
    }
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Bias-corrected sample skewness of the finite values.
#[must_use]
pub fn skewness(values: &[f64]) -> f64 {
    let n = finite(values).count();
    if n < 3 {
        return f64::NAN;
    }
    let m = mean(values);
    let m2: f64 = finite(values).map(|v| (v - m).powi(2)).sum::<f64>() / n as f64;
    let m3: f64 = finite(values).map(|v| (v - m).powi(3)).sum::<f64>() / n as f64;
    if m2 == 0.0 {
        return 0.0;
    }
    let nf = n as f64;
    let g1 = m3 / m2.powf(1.5);
    g1 * (nf * (nf - 1.0)).sqrt() / (nf - 2.0)
}

/// Bias-corrected sample excess kurtosis of the finite values.
#[must_use]
pub fn kurtosis(values: &[f64]) -> f64 {
    let n = finite(values).count();
    if n < 4 {
        return f64::NAN;
    }
    let m = mean(values);
    let m2: f64 = finite(values).map(|v| (v - m).powi(2)).sum::<f64>() / n as f64;
    let m4: f64 = finite(values).map(|v| (v - m).powi(4)).sum::<f64>() / n as f64;
    if m2 == 0.0 {
        return 0.0;
    }
    let nf = n as f64;
    let g2 = m4 / (m2 * m2) - 3.0;
    ((nf + 1.0) * g2 + 6.0) * (nf - 1.0) / ((nf - 2.0) * (nf - 3.0))
}

/// Standard score of every value using the finite values' mean and
/// population standard deviation. Non-finite inputs stay `NaN`.
#[must_use]
pub fn zscore(values: &[f64]) -> Vec<f64> {
    let m = mean(values);
    let s = std_dev(values, 0);
    values
        .iter()
        .map(|&v| if v.is_finite() { (v - m) / s } else { f64::NAN })
        .collect()
}

/// Pearson correlation of two equally long series.
///
/// Uses every index; callers mask non-finite pairs beforehand. `NaN` for
/// fewer than two samples or a constant series.
#[must_use]
pub fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    if n < 2 {
        return f64::NAN;
    }
    let a = &a[..n];
    let b = &b[..n];
    let ma = a.iter().sum::<f64>() / n as f64;
    let mb = b.iter().sum::<f64>() / n as f64;

    let mut sab = 0.0;
    let mut saa = 0.0;
    let mut sbb = 0.0;
    for (x, y) in a.iter().zip(b) {
        let dx = x - ma;
        let dy = y - mb;
        sab += dx * dy;
        saa += dx * dx;
        sbb += dy * dy;
    }

    let denominator = (saa * sbb).sqrt();
    if denominator == 0.0 {
        return f64::NAN;
    }
    (sab / denominator).clamp(-1.0, 1.0)
}

/// First difference; the first element is `NaN`.
#[must_use]
pub fn diff(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    std::iter::once(f64::NAN)
        .chain(values.windows(2).map(|w| w[1] - w[0]))
        .collect()
}

/// Running sum that skips non-finite values.
///
/// Positions holding a non-finite value stay `NaN`; the sum carries on past
/// them.
#[must_use]
pub fn cumsum(values: &[f64]) -> Vec<f64> {
    let mut total = 0.0;
    values
        .iter()
        .map(|&v| {
            if v.is_finite() {
                total += v;
                total
            } else {
                f64::NAN
            }
        })
        .collect()
}

/// Largest finite value.
#[must_use]
pub fn max(values: &[f64]) -> f64 {
    finite(values).fold(f64::NAN, f64::max)
}

/// Smallest finite value.
#[must_use]
pub fn min(values: &[f64]) -> f64 {
    finite(values).fold(f64::NAN, f64::min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean_std_skip_nan() {
        let v = [f64::NAN, 1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(mean(&v), 2.5);
        assert_relative_eq!(std_dev(&v, 0), 1.25f64.sqrt());
        assert_relative_eq!(std_dev(&v, 1), (5.0f64 / 3.0).sqrt());
        assert!(mean(&[f64::NAN]).is_nan());
        assert!(std_dev(&[1.0], 1).is_nan());
    }

    #[test]
    fn test_median() {
        assert_relative_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_relative_eq!(median(&[4.0, 1.0, f64::NAN, 2.0, 3.0]), 2.5);
        assert!(median(&[]).is_nan());
    }

    #[test]
    fn test_skewness_and_kurtosis() {
        let symmetric = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_relative_eq!(skewness(&symmetric), 0.0, epsilon = 1e-12);
        // Reference values of the bias-corrected estimators.
        assert_relative_eq!(kurtosis(&symmetric), -1.2, epsilon = 1e-12);

        let skewed = [1.0, 1.0, 1.0, 10.0];
        assert!(skewness(&skewed) > 0.0);
        assert_relative_eq!(skewness(&skewed), 2.0, epsilon = 1e-12);
        assert_relative_eq!(kurtosis(&skewed), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zscore() {
        let z = zscore(&[1.0, 2.0, 3.0, f64::NAN]);
        let s = (2.0f64 / 3.0).sqrt();
        assert_relative_eq!(z[0], -1.0 / s);
        assert_relative_eq!(z[1], 0.0);
        assert_relative_eq!(z[2], 1.0 / s);
        assert!(z[3].is_nan());
    }

    #[test]
    fn test_pearson() {
        let a = [1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(pearson(&a, &[2.0, 4.0, 6.0, 8.0]), 1.0);
        assert_relative_eq!(pearson(&a, &[8.0, 6.0, 4.0, 2.0]), -1.0);
        assert!(pearson(&a, &[1.0, 1.0, 1.0, 1.0]).is_nan());
        assert!(pearson(&a[..1], &a[..1]).is_nan());
    }

    #[test]
    fn test_diff_and_cumsum() {
        let d = diff(&[1.0, 4.0, 9.0]);
        assert!(d[0].is_nan());
        assert_eq!(&d[1..], &[3.0, 5.0]);

        let c = cumsum(&[f64::NAN, 1.0, 1.0, f64::NAN, 2.0]);
        assert!(c[0].is_nan());
        assert_eq!(c[1], 1.0);
        assert_eq!(c[2], 2.0);
        assert!(c[3].is_nan());
        assert_eq!(c[4], 4.0);
    }

    #[test]
    fn test_min_max() {
        assert_eq!(max(&[f64::NAN, 1.0, 3.0]), 3.0);
        assert_eq!(min(&[f64::NAN, 1.0, 3.0]), 1.0);
        assert!(max(&[f64::NAN]).is_nan());
    }
}
