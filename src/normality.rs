//! Normality tests: Shapiro-Wilk and Kolmogorov-Smirnov.
//!
//! Shapiro-Wilk uses Royston's AS R94 algorithm (valid for 3 ≤ n ≤ 5000);
//! Kolmogorov-Smirnov compares the empirical CDF against a normal fitted
//! to the sample's own mean and standard deviation, with the asymptotic
//! Kolmogorov distribution for the p-value.
//!
//! # Examples
//!
//! ```
//! use statcore::normality::{shapiro_wilk, NormalityConfig};
//!
//! let data = [4.9, 5.1, 5.0, 4.8, 5.2, 5.05, 4.95, 5.15, 4.85, 5.0];
//! let r = shapiro_wilk(&data, &NormalityConfig::default()).unwrap();
//! assert!(r.is_normal); // cannot reject normality
//! ```

use crate::error::StatError;
use crate::numeric;
use crate::special;

/// Configuration for normality tests.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NormalityConfig {
    /// Significance level. Default: 0.05.
    pub alpha: f64,
}

impl Default for NormalityConfig {
    fn default() -> Self {
        Self { alpha: 0.05 }
    }
}

/// Outcome of a normality test.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NormalityTestResult {
    /// W for Shapiro-Wilk, D for Kolmogorov-Smirnov.
    pub statistic: f64,
    pub p_value: f64,
    /// `p_value > alpha`: the normality hypothesis is not rejected.
    pub is_normal: bool,
    pub alpha: f64,
}

/// Valid Shapiro-Wilk sample range.
const SW_MIN_N: usize = 3;
const SW_MAX_N: usize = 5000;

// Royston AS R94 polynomial coefficients.
const SW_C1: [f64; 6] = [0.0, 0.221157, -0.147981, -2.07119, 4.434685, -2.706056];
const SW_C2: [f64; 6] = [0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633];
const SW_C3: [f64; 4] = [0.544, -0.39978, 0.025054, -6.714e-4];
const SW_C4: [f64; 4] = [1.3822, -0.77857, 0.062767, -0.0020322];
const SW_C5: [f64; 4] = [-1.5861, -0.31082, -0.083751, 0.0038915];
const SW_C6: [f64; 3] = [-0.4803, -0.082676, 0.0030302];
const SW_G: [f64; 2] = [-2.273, 0.459];

/// Shapiro-Wilk test of normality.
///
/// # Algorithm
/// Royston's AS R94: Blom scores through the inverse normal CDF give the
/// expected normal order statistics; the first one or two coefficients
/// are polynomial-corrected; W is the squared ratio of the weighted
/// range sum to the total sum of squares. The p-value uses the exact
/// arccos form at n = 3, a gamma-type transform for n ≤ 11, and a
/// lognormal transform for n ≥ 12.
///
/// Reference: Royston (1995), "A Remark on Algorithm AS 181: The W-test
/// for Normality", *Applied Statistics* 44(4), pp. 547–551.
///
/// # Errors
/// - [`StatError::SampleSize`] when `n` is outside 3..=5000.
/// - [`StatError::ConstantValues`] when all values are identical.
pub fn shapiro_wilk(
    data: &[f64],
    config: &NormalityConfig,
) -> Result<NormalityTestResult, StatError> {
    let n = data.len();
    if !(SW_MIN_N..=SW_MAX_N).contains(&n) {
        return Err(StatError::SampleSize {
            min: SW_MIN_N,
            max: SW_MAX_N,
            actual: n,
        });
    }
    if data.iter().any(|v| !v.is_finite()) {
        return Err(StatError::NonNumericData {
            variable: String::new(),
        });
    }

    let mut x = data.to_vec();
    x.sort_unstable_by(|a, b| a.partial_cmp(b).expect("finite checked above"));

    if x[n - 1] - x[0] < 1e-300 {
        return Err(StatError::ConstantValues {
            variable: String::new(),
        });
    }

    let (w, p_value) = if n == 3 {
        shapiro_wilk_n3(&x)
    } else {
        let nn2 = n / 2;
        let a = sw_coefficients(n, nn2);
        let w = sw_statistic(&x, &a, n, nn2).min(1.0);
        (w, sw_p_value(w, n).clamp(0.0, 1.0))
    };

    Ok(NormalityTestResult {
        statistic: w,
        p_value,
        is_normal: p_value > config.alpha,
        alpha: config.alpha,
    })
}

// n = 3: a = [1/√2, 0, −1/√2] and an exact p-value.
fn shapiro_wilk_n3(x: &[f64]) -> (f64, f64) {
    let a1 = std::f64::consts::FRAC_1_SQRT_2;
    let mean = (x[0] + x[1] + x[2]) / 3.0;
    let ss = x.iter().map(|&v| (v - mean).powi(2)).sum::<f64>();
    let numerator = a1 * (x[2] - x[0]);
    let w = ((numerator * numerator) / ss).clamp(0.75, 1.0);
    let p = 1.0 - (6.0 / std::f64::consts::PI) * w.sqrt().acos();
    (w, p.clamp(0.0, 1.0))
}

// Horner evaluation: c[0] + c[1]x + c[2]x² + …
fn sw_poly(c: &[f64], x: f64) -> f64 {
    let mut result = c[c.len() - 1];
    for i in (0..c.len() - 1).rev() {
        result = result * x + c[i];
    }
    result
}

// Royston coefficients from Blom's expected normal order statistics.
fn sw_coefficients(n: usize, nn2: usize) -> Vec<f64> {
    let mut a = vec![0.0; nn2];
    let mut m = vec![0.0; nn2];
    let mut summ2 = 0.0;
    for (i, mi) in m.iter_mut().enumerate() {
        let p = (i as f64 + 1.0 - 0.375) / (n as f64 + 0.25);
        *mi = special::normal_quantile(p);
        summ2 += *mi * *mi;
    }
    summ2 *= 2.0;
    let ssumm2 = summ2.sqrt();
    let rsn = 1.0 / (n as f64).sqrt();

    let a1 = sw_poly(&SW_C1, rsn) - m[0] / ssumm2;

    if n <= 5 {
        // Only the first coefficient is corrected.
        let fac = ((summ2 - 2.0 * m[0] * m[0]) / (1.0 - 2.0 * a1 * a1)).sqrt();
        a[0] = a1;
        for i in 1..nn2 {
            a[i] = -m[i] / fac;
        }
    } else {
        // First two coefficients corrected.
        let a2 = -m[1] / ssumm2 + sw_poly(&SW_C2, rsn);
        let fac = ((summ2 - 2.0 * m[0] * m[0] - 2.0 * m[1] * m[1])
            / (1.0 - 2.0 * a1 * a1 - 2.0 * a2 * a2))
            .sqrt();
        a[0] = a1;
        a[1] = a2;
        for i in 2..nn2 {
            a[i] = -m[i] / fac;
        }
    }
    a
}

// W = (Σ aᵢ (x_{n+1−i} − x_i))² / Σ (x − x̄)²
fn sw_statistic(x: &[f64], a: &[f64], n: usize, nn2: usize) -> f64 {
    let mut sa = 0.0;
    for i in 0..nn2 {
        sa += a[i] * (x[n - 1 - i] - x[i]);
    }
    let mean = x.iter().sum::<f64>() / n as f64;
    let ss: f64 = x.iter().map(|&v| (v - mean).powi(2)).sum();
    if ss < 1e-300 {
        return 1.0;
    }
    (sa * sa) / ss
}

// Royston transformation of W to a normal deviate.
fn sw_p_value(w: f64, n: usize) -> f64 {
    let nf = n as f64;
    let w1 = 1.0 - w;
    if w1 <= 0.0 {
        return 1.0;
    }
    let y = w1.ln();

    if n <= 11 {
        let gamma = sw_poly(&SW_G, nf);
        if y >= gamma {
            return 0.0; // extremely non-normal
        }
        let y2 = -(gamma - y).ln();
        let m = sw_poly(&SW_C3, nf);
        let s = sw_poly(&SW_C4, nf).exp();
        if s < 1e-300 {
            return 0.0;
        }
        1.0 - special::normal_cdf((y2 - m) / s)
    } else {
        let xx = nf.ln();
        let m = sw_poly(&SW_C5, xx);
        let s = sw_poly(&SW_C6, xx).exp();
        if s < 1e-300 {
            return 0.0;
        }
        1.0 - special::normal_cdf((y - m) / s)
    }
}

/// Kolmogorov-Smirnov test against a normal fitted to the sample.
///
/// # Algorithm
/// D is the maximum over both one-sided deviations between the empirical
/// CDF and Φ((x − x̄)/s) at every order statistic; the p-value is the
/// asymptotic Kolmogorov survival function at √n·D.
///
/// The parameters are estimated from the same sample, so the p-value is
/// approximate (no Lilliefors correction); it errs conservative.
///
/// # Errors
/// - [`StatError::InsufficientData`] when `n < 3`.
/// - [`StatError::ConstantValues`] when the sample has zero variance.
pub fn kolmogorov_smirnov(
    data: &[f64],
    config: &NormalityConfig,
) -> Result<NormalityTestResult, StatError> {
    let n = data.len();
    if n < 3 {
        return Err(StatError::InsufficientData {
            min_required: 3,
            actual: n,
        });
    }
    if data.iter().any(|v| !v.is_finite()) {
        return Err(StatError::NonNumericData {
            variable: String::new(),
        });
    }

    let mean = numeric::mean(data).expect("finite, non-empty");
    let sd = numeric::std_dev(data).expect("n >= 3");
    if sd == 0.0 {
        return Err(StatError::ConstantValues {
            variable: String::new(),
        });
    }

    let mut sorted = data.to_vec();
    sorted.sort_unstable_by(|a, b| a.partial_cmp(b).expect("finite checked above"));

    let nf = n as f64;
    let mut d = 0.0_f64;
    for (i, &v) in sorted.iter().enumerate() {
        let f = special::normal_cdf((v - mean) / sd);
        let d_plus = (i + 1) as f64 / nf - f;
        let d_minus = f - i as f64 / nf;
        d = d.max(d_plus).max(d_minus);
    }

    let p_value = special::kolmogorov_survival(nf.sqrt() * d);

    Ok(NormalityTestResult {
        statistic: d,
        p_value,
        is_normal: p_value > config.alpha,
        alpha: config.alpha,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> NormalityConfig {
        NormalityConfig::default()
    }

    // --- Shapiro-Wilk ---

    #[test]
    fn shapiro_uniform_sequence() {
        let data: Vec<f64> = (1..=10).map(|i| i as f64).collect();
        let r = shapiro_wilk(&data, &cfg()).unwrap();
        assert!((r.statistic - 0.9701).abs() < 0.001);
        assert!((r.p_value - 0.8914).abs() < 0.005);
        assert!(r.is_normal);
    }

    #[test]
    fn shapiro_near_normal_sample() {
        let data = [4.9, 5.1, 5.0, 4.8, 5.2, 5.05, 4.95, 5.15, 4.85, 5.0];
        let r = shapiro_wilk(&data, &cfg()).unwrap();
        assert!(r.statistic > 0.97);
        assert!(r.p_value > 0.9);
        assert!(r.is_normal);
    }

    #[test]
    fn shapiro_rejects_heavy_skew() {
        let data = [1.0, 1.0, 1.0, 2.0, 2.0, 3.0, 4.0, 5.0, 9.0, 15.0, 30.0, 60.0];
        let r = shapiro_wilk(&data, &cfg()).unwrap();
        assert!(r.statistic < 0.7);
        assert!(r.p_value < 0.01);
        assert!(!r.is_normal);
    }

    #[test]
    fn shapiro_n3_exact_branch() {
        let r = shapiro_wilk(&[1.0, 2.0, 3.0], &cfg()).unwrap();
        assert!(r.statistic > 0.99);
        assert!(r.p_value > 0.9);
    }

    #[test]
    fn shapiro_sample_size_bounds() {
        let err = shapiro_wilk(&[1.0, 2.0], &cfg()).unwrap_err();
        assert_eq!(
            err,
            StatError::SampleSize {
                min: 3,
                max: 5000,
                actual: 2
            }
        );

        let big: Vec<f64> = (0..5001).map(|i| i as f64).collect();
        let err = shapiro_wilk(&big, &cfg()).unwrap_err();
        assert!(matches!(err, StatError::SampleSize { actual: 5001, .. }));
    }

    #[test]
    fn shapiro_constant_sample_errors() {
        let err = shapiro_wilk(&[2.0, 2.0, 2.0, 2.0], &cfg()).unwrap_err();
        assert!(matches!(err, StatError::ConstantValues { .. }));
    }

    #[test]
    fn shapiro_alpha_threshold_applied() {
        let data: Vec<f64> = (1..=10).map(|i| i as f64).collect();
        let strict = NormalityConfig { alpha: 0.95 };
        let r = shapiro_wilk(&data, &strict).unwrap();
        assert!(!r.is_normal); // p ≈ 0.89 < 0.95
    }

    // --- Kolmogorov-Smirnov ---

    #[test]
    fn ks_uniform_sequence() {
        let data: Vec<f64> = (1..=10).map(|i| i as f64).collect();
        let r = kolmogorov_smirnov(&data, &cfg()).unwrap();
        assert!((r.statistic - 0.0955).abs() < 0.001);
        assert!(r.p_value > 0.99);
        assert!(r.is_normal);
    }

    #[test]
    fn ks_detects_gross_departure() {
        // Half the mass far left, half far right.
        let mut data = vec![0.0; 25];
        data.extend(vec![100.0; 25]);
        let r = kolmogorov_smirnov(&data, &cfg()).unwrap();
        assert!(r.statistic > 0.25);
        assert!(!r.is_normal);
    }

    #[test]
    fn ks_statistic_bounds() {
        let data = [3.1, 4.7, 2.2, 5.9, 3.8, 4.1, 2.9, 5.2];
        let r = kolmogorov_smirnov(&data, &cfg()).unwrap();
        assert!(r.statistic > 0.0 && r.statistic < 1.0);
        assert!(r.p_value >= 0.0 && r.p_value <= 1.0);
    }

    #[test]
    fn ks_constant_sample_errors() {
        let err = kolmogorov_smirnov(&[5.0, 5.0, 5.0], &cfg()).unwrap_err();
        assert!(matches!(err, StatError::ConstantValues { .. }));
    }

    #[test]
    fn ks_needs_three_observations() {
        let err = kolmogorov_smirnov(&[1.0, 2.0], &cfg()).unwrap_err();
        assert!(matches!(err, StatError::InsufficientData { .. }));
    }
}
