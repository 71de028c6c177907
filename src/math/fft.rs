//! Full linear cross-correlation.
//!
//! For inputs `a` (length `n`) and `b` (length `m`) the full correlation has
//! `n + m - 1` entries, entry `i` holding
//!
//! ```text
//! c[i] = Σ_k a[k + lag] · b[k],    lag = i - (m - 1)
//! ```
//!
//! so lags run from `-(m - 1)` to `n - 1`. Short inputs use the direct sum;
//! longer ones go through a zero-padded FFT product.

use num_complex::Complex64;
use rustfft::FftPlanner;

/// Below this many multiply-adds the direct sum is cheaper than an FFT.
const DIRECT_WORK_LIMIT: usize = 4096;

/// Integer lags matching the entries of a full correlation.
#[must_use]
pub fn correlation_lags(len_a: usize, len_b: usize) -> Vec<i64> {
    if len_a == 0 || len_b == 0 {
        return Vec::new();
    }
    let start = -(len_b as i64 - 1);
    (start..len_a as i64).collect()
}

/// Full cross-correlation by direct summation.
#[must_use]
pub fn cross_correlate_direct(a: &[f64], b: &[f64]) -> Vec<f64> {
    let (n, m) = (a.len(), b.len());
    if n == 0 || m == 0 {
        return Vec::new();
    }
    (0..n + m - 1)
        .map(|i| {
            let lag = i as i64 - (m as i64 - 1);
            let k_start = (-lag).max(0) as usize;
            let k_end = (n as i64 - lag).min(m as i64) as usize;
            (k_start..k_end)
                .map(|k| a[(k as i64 + lag) as usize] * b[k])
                .sum::<f64>()
        })
        .collect()
}

/// Full cross-correlation through the FFT.
///
/// Correlating with `b` is convolving with `b` reversed, which becomes a
/// pointwise product of spectra.
#[must_use]
pub fn cross_correlate_fft(a: &[f64], b: &[f64]) -> Vec<f64> {
    let (n, m) = (a.len(), b.len());
    if n == 0 || m == 0 {
        return Vec::new();
    }
    let out_len = n + m - 1;
    let size = out_len.next_power_of_two();

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(size);
    let ifft = planner.plan_fft_inverse(size);

    let mut fa: Vec<Complex64> = a.iter().map(|&x| Complex64::new(x, 0.0)).collect();
    fa.resize(size, Complex64::new(0.0, 0.0));
    let mut fb: Vec<Complex64> = b.iter().rev().map(|&x| Complex64::new(x, 0.0)).collect();
    fb.resize(size, Complex64::new(0.0, 0.0));

    fft.process(&mut fa);
    fft.process(&mut fb);

    let mut product: Vec<Complex64> = fa.iter().zip(&fb).map(|(x, y)| x * y).collect();
    ifft.process(&mut product);

    // rustfft leaves the inverse unnormalized.
    let scale = size as f64;
    product
        .iter()
        .take(out_len)
        .map(|c| c.re / scale)
        .collect()
}

/// Full cross-correlation, choosing the cheaper method.
///
/// Non-finite input always takes the direct path so `NaN` stays confined to
/// the lags that actually touch it.
#[must_use]
pub fn cross_correlate(a: &[f64], b: &[f64]) -> Vec<f64> {
    let all_finite = a.iter().chain(b).all(|x| x.is_finite());
    if !all_finite || a.len().saturating_mul(b.len()) <= DIRECT_WORK_LIMIT {
        cross_correlate_direct(a, b)
    } else {
        cross_correlate_fft(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lags() {
        assert_eq!(correlation_lags(3, 2), vec![-1, 0, 1, 2]);
        assert_eq!(correlation_lags(1, 1), vec![0]);
        assert!(correlation_lags(0, 4).is_empty());
    }

    #[test]
    fn test_direct_small() {
        // c[lag] = Σ a[k + lag] b[k]
        let c = cross_correlate_direct(&[1.0, 2.0, 3.0], &[0.0, 1.0, 0.5]);
        assert_eq!(c.len(), 5);
        // lag -2: a[0]*b[2]
        assert_relative_eq!(c[0], 0.5);
        // lag -1: a[0]*b[1] + a[1]*b[2]
        assert_relative_eq!(c[1], 2.0);
        // lag 0: a[0]*b[0] + a[1]*b[1] + a[2]*b[2]
        assert_relative_eq!(c[2], 3.5);
        // lag 1: a[1]*b[0] + a[2]*b[1]
        assert_relative_eq!(c[3], 3.0);
        // lag 2: a[2]*b[0]
        assert_relative_eq!(c[4], 0.0);
    }

    #[test]
    fn test_fft_matches_direct() {
        let a: Vec<f64> = (0..97).map(|i| (i as f64 * 0.37).sin() + 0.1 * i as f64).collect();
        let b: Vec<f64> = (0..64).map(|i| (i as f64 * 0.21).cos()).collect();
        let direct = cross_correlate_direct(&a, &b);
        let fft = cross_correlate_fft(&a, &b);
        assert_eq!(direct.len(), fft.len());
        for (d, f) in direct.iter().zip(&fft) {
            assert_relative_eq!(*d, *f, epsilon = 1e-8);
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(cross_correlate(&[], &[1.0]).is_empty());
        assert!(cross_correlate_fft(&[1.0], &[]).is_empty());
    }

    #[test]
    fn test_nan_takes_direct_path() {
        let a: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let mut b = a.clone();
        b[0] = f64::NAN;
        let c = cross_correlate(&a, &b);
        // Non-negative lags touch b[0]; negative lags never do.
        assert!(c[0].is_finite());
        assert!(c[c.len() - 1].is_nan());
        assert_eq!(c.len(), 199);
    }
}
