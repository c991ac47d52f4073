//! t-tests: one-sample, independent two-sample, and paired.
//!
//! Each variant reports a two-sided p-value, a `1 − alpha` confidence
//! interval for the mean difference, Cohen's d, and the assumption
//! checks the test rests on (normality, and variance homogeneity for
//! the independent test). Assumption violations are reported alongside
//! the statistic, never as errors.
//!
//! # Examples
//!
//! ```
//! use statcore::ttest::{one_sample, TTestConfig};
//!
//! let data: Vec<f64> = (1..=10).map(|i| i as f64).collect();
//! let r = one_sample(&data, 5.5, &TTestConfig::default()).unwrap();
//! assert!(r.statistic.abs() < 1e-10);
//! assert_eq!(r.df, 9.0);
//! ```

use crate::assumptions::{self, AssumptionCheck};
use crate::error::StatError;
use crate::numeric;
use crate::sample::complete_pairs;
use crate::special;

/// Sample size below which the normal-theory approximations weaken.
const RECOMMENDED_N: usize = 30;

/// Configuration shared by all t-test variants.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TTestConfig {
    /// Significance level. Default: 0.05.
    pub alpha: f64,
    /// Pooled-variance t when true, Welch's t otherwise. Only the
    /// independent test reads this. Default: false (Welch).
    pub assume_equal_variances: bool,
}

impl Default for TTestConfig {
    fn default() -> Self {
        Self {
            alpha: 0.05,
            assume_equal_variances: false,
        }
    }
}

/// Result of any t-test variant.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TTestResult {
    /// The t statistic (signed).
    pub statistic: f64,
    /// Two-sided p-value.
    pub p_value: f64,
    /// Degrees of freedom. Fractional under Welch.
    pub df: f64,
    /// x̄ − μ₀, x̄₁ − x̄₂, or the mean paired difference.
    pub mean_difference: f64,
    /// `1 − alpha` confidence interval for the mean difference.
    pub confidence_interval: (f64, f64),
    /// Cohen's d (non-negative).
    pub effect_size: f64,
    /// Normality and variance checks for this call.
    pub assumptions: Vec<AssumptionCheck>,
}

/// One-sample t-test of a sample mean against `mu0`.
///
/// `t = (x̄ − μ₀)/(s/√n)`, `df = n − 1`; Cohen's d is `|x̄ − μ₀|/s`.
///
/// # Errors
/// - [`StatError::InsufficientData`] when `n < 2`.
/// - [`StatError::ConstantValues`] when the sample has zero variance.
pub fn one_sample(data: &[f64], mu0: f64, config: &TTestConfig) -> Result<TTestResult, StatError> {
    let values = finite_values(data);
    let n = values.len();
    if n < 2 {
        return Err(StatError::InsufficientData {
            min_required: 2,
            actual: n,
        });
    }
    let mean = numeric::mean(&values).expect("n >= 2");
    let sd = numeric::std_dev(&values).expect("n >= 2");
    if sd == 0.0 {
        return Err(StatError::ConstantValues {
            variable: String::new(),
        });
    }

    let se = sd / (n as f64).sqrt();
    let diff = mean - mu0;
    let df = (n - 1) as f64;
    let statistic = diff / se;

    let assumptions = vec![
        assumptions::check_normality("sample", &values, config.alpha),
        assumptions::check_sample_size("sample", n, RECOMMENDED_N),
    ];

    Ok(TTestResult {
        statistic,
        p_value: two_sided_p(statistic, df),
        df,
        mean_difference: diff,
        confidence_interval: interval(diff, se, df, config.alpha),
        effect_size: diff.abs() / sd,
        assumptions,
    })
}

/// Independent two-sample t-test.
///
/// Pooled-variance t with `df = n₁ + n₂ − 2` when
/// `assume_equal_variances` is set; otherwise Welch's t with the
/// Welch-Satterthwaite df. Cohen's d always uses the pooled standard
/// deviation.
///
/// # Errors
/// - [`StatError::InsufficientData`] when either group has fewer than
///   2 usable observations.
/// - [`StatError::ConstantValues`] when both groups have zero variance.
pub fn independent(
    group1: &[f64],
    group2: &[f64],
    config: &TTestConfig,
) -> Result<TTestResult, StatError> {
    let a = finite_values(group1);
    let b = finite_values(group2);
    let (n1, n2) = (a.len(), b.len());
    if n1 < 2 || n2 < 2 {
        return Err(StatError::InsufficientData {
            min_required: 2,
            actual: n1.min(n2),
        });
    }

    let m1 = numeric::mean(&a).expect("n >= 2");
    let m2 = numeric::mean(&b).expect("n >= 2");
    let v1 = numeric::variance(&a).expect("n >= 2");
    let v2 = numeric::variance(&b).expect("n >= 2");
    if v1 == 0.0 && v2 == 0.0 {
        return Err(StatError::ConstantValues {
            variable: String::new(),
        });
    }

    let (nf1, nf2) = (n1 as f64, n2 as f64);
    let diff = m1 - m2;
    let pooled_var = ((nf1 - 1.0) * v1 + (nf2 - 1.0) * v2) / (nf1 + nf2 - 2.0);

    let (se, df) = if config.assume_equal_variances {
        let se = (pooled_var * (1.0 / nf1 + 1.0 / nf2)).sqrt();
        (se, nf1 + nf2 - 2.0)
    } else {
        // Welch-Satterthwaite
        let (t1, t2) = (v1 / nf1, v2 / nf2);
        let se = (t1 + t2).sqrt();
        let df = (t1 + t2).powi(2)
            / (t1 * t1 / (nf1 - 1.0) + t2 * t2 / (nf2 - 1.0));
        (se, df)
    };
    let statistic = diff / se;

    let assumptions = vec![
        assumptions::check_normality("group 1", &a, config.alpha),
        assumptions::check_normality("group 2", &b, config.alpha),
        assumptions::check_equal_variances(&[&a, &b], config.alpha),
        assumptions::check_sample_size("smaller group", n1.min(n2), RECOMMENDED_N),
    ];

    Ok(TTestResult {
        statistic,
        p_value: two_sided_p(statistic, df),
        df,
        mean_difference: diff,
        confidence_interval: interval(diff, se, df, config.alpha),
        effect_size: diff.abs() / pooled_var.sqrt(),
        assumptions,
    })
}

/// Paired t-test: a one-sample t-test on the pairwise differences.
///
/// Samples must have the same length; rows where either entry is
/// non-finite are dropped pairwise.
///
/// # Errors
/// - [`StatError::UnequalLength`] when the samples differ in length.
/// - [`StatError::InsufficientData`] when fewer than 2 complete pairs
///   remain.
/// - [`StatError::ConstantValues`] when every difference is identical.
pub fn paired(
    sample1: &[f64],
    sample2: &[f64],
    config: &TTestConfig,
) -> Result<TTestResult, StatError> {
    if sample1.len() != sample2.len() {
        return Err(StatError::UnequalLength {
            left: sample1.len(),
            right: sample2.len(),
        });
    }
    let (a, b) = complete_pairs(sample1, sample2);
    let diffs: Vec<f64> = a.iter().zip(&b).map(|(x, y)| x - y).collect();
    let n = diffs.len();
    if n < 2 {
        return Err(StatError::InsufficientData {
            min_required: 2,
            actual: n,
        });
    }

    let mean = numeric::mean(&diffs).expect("n >= 2");
    let sd = numeric::std_dev(&diffs).expect("n >= 2");
    if sd == 0.0 {
        return Err(StatError::ConstantValues {
            variable: String::new(),
        });
    }

    let se = sd / (n as f64).sqrt();
    let df = (n - 1) as f64;
    let statistic = mean / se;

    let assumptions = vec![
        assumptions::check_normality("differences", &diffs, config.alpha),
        assumptions::check_sample_size("pairs", n, RECOMMENDED_N),
    ];

    Ok(TTestResult {
        statistic,
        p_value: two_sided_p(statistic, df),
        df,
        mean_difference: mean,
        confidence_interval: interval(mean, se, df, config.alpha),
        effect_size: mean.abs() / sd,
        assumptions,
    })
}

fn finite_values(data: &[f64]) -> Vec<f64> {
    data.iter().copied().filter(|v| v.is_finite()).collect()
}

fn two_sided_p(t: f64, df: f64) -> f64 {
    (2.0 * (1.0 - special::t_cdf(t.abs(), df))).clamp(0.0, 1.0)
}

fn interval(center: f64, se: f64, df: f64, alpha: f64) -> (f64, f64) {
    let crit = special::t_quantile(1.0 - alpha / 2.0, df);
    (center - crit * se, center + crit * se)
}
