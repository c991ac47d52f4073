//! Correlation analysis: Pearson, Spearman, and full matrices.
//!
//! Pairwise-complete observations throughout: each pair of variables is
//! correlated over the rows where **both** entries are finite, not over
//! the listwise-complete rows of the whole matrix.
//!
//! # Examples
//!
//! ```
//! use statcore::correlation::{pearson, CorrelationConfig};
//!
//! let x: Vec<f64> = (1..=10).map(|i| i as f64).collect();
//! let y = [2.1, 3.9, 6.1, 7.9, 10.1, 11.9, 14.1, 15.9, 18.1, 20.2];
//! let r = pearson(&x, &y, &CorrelationConfig::default()).unwrap();
//! assert!(r.r > 0.99);
//! assert!(r.p_value < 0.001);
//! ```

use crate::error::StatError;
use crate::numeric;
use crate::sample::complete_pairs;
use crate::special;

/// Correlation coefficient to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CorrelationMethod {
    /// Product-moment correlation on raw values.
    Pearson,
    /// Pearson applied to average ranks.
    Spearman,
}

/// Configuration for correlation procedures.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CorrelationConfig {
    /// Method. Default: Pearson.
    pub method: CorrelationMethod,
    /// Significance level for the Fisher-z confidence interval. Default: 0.05.
    pub alpha: f64,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            method: CorrelationMethod::Pearson,
            alpha: 0.05,
        }
    }
}

/// Correlation of a single variable pair.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PairCorrelation {
    pub r: f64,
    /// Two-sided p-value from the t-transform `t = r√(n−2)/√(1−r²)`.
    pub p_value: f64,
    /// Complete pairs used.
    pub n: usize,
    /// Fisher-z interval at `1 − alpha`; `None` when `n < 4`.
    pub confidence_interval: Option<(f64, f64)>,
}

/// Correlation matrix over a named variable set.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CorrelationMatrix {
    pub variables: Vec<String>,
    /// Square, symmetric; diagonal exactly 1.0. Cells involving a
    /// zero-variance variable are NaN (see `warnings`).
    pub matrix: Vec<Vec<f64>>,
    pub method: CorrelationMethod,
    /// One entry per undefined cell or degenerate variable.
    pub warnings: Vec<String>,
}

/// Pearson correlation of one pair over complete observations.
///
/// # Errors
/// - [`StatError::InsufficientData`] when fewer than 3 complete pairs.
/// - [`StatError::ConstantValues`] when either variable has zero variance.
pub fn pearson(
    x: &[f64],
    y: &[f64],
    config: &CorrelationConfig,
) -> Result<PairCorrelation, StatError> {
    let (a, b) = complete_pairs(x, y);
    pair_correlation(&a, &b, config.alpha)
}

/// Spearman rank correlation of one pair over complete observations.
///
/// Computes Pearson on the average ranks of both variables, so tied
/// observations share mid-ranks.
///
/// # Errors
/// Same as [`pearson`].
///
/// # Examples
/// ```
/// use statcore::correlation::{spearman, CorrelationConfig};
///
/// // Any monotone transform gives ρ = 1 exactly.
/// let x: Vec<f64> = (1..=10).map(|i| i as f64).collect();
/// let y: Vec<f64> = x.iter().map(|v| v * v).collect();
/// let r = spearman(&x, &y, &CorrelationConfig::default()).unwrap();
/// assert!((r.r - 1.0).abs() < 1e-12);
/// ```
pub fn spearman(
    x: &[f64],
    y: &[f64],
    config: &CorrelationConfig,
) -> Result<PairCorrelation, StatError> {
    let (a, b) = complete_pairs(x, y);
    if a.len() < 3 {
        return Err(StatError::InsufficientData {
            min_required: 3,
            actual: a.len(),
        });
    }
    let ra = numeric::ranks(&a).expect("complete pairs are finite");
    let rb = numeric::ranks(&b).expect("complete pairs are finite");
    pair_correlation(&ra, &rb, config.alpha)
}

// Core Pearson on already-aligned data.
fn pair_correlation(a: &[f64], b: &[f64], alpha: f64) -> Result<PairCorrelation, StatError> {
    let n = a.len();
    if n < 3 {
        return Err(StatError::InsufficientData {
            min_required: 3,
            actual: n,
        });
    }

    let var_a = numeric::variance(a).expect("n >= 3 and finite");
    let var_b = numeric::variance(b).expect("n >= 3 and finite");
    if var_a == 0.0 {
        return Err(StatError::ConstantValues {
            variable: "x".into(),
        });
    }
    if var_b == 0.0 {
        return Err(StatError::ConstantValues {
            variable: "y".into(),
        });
    }

    let cov = numeric::covariance(a, b).expect("aligned and finite");
    let r = (cov / (var_a.sqrt() * var_b.sqrt())).clamp(-1.0, 1.0);

    Ok(PairCorrelation {
        r,
        p_value: correlation_p_value(r, n),
        n,
        confidence_interval: fisher_z_interval(r, n, alpha),
    })
}

// Two-sided p-value via t = r·√(n−2)/√(1−r²), df = n−2.
fn correlation_p_value(r: f64, n: usize) -> f64 {
    let df = (n - 2) as f64;
    let denom = 1.0 - r * r;
    if denom <= 0.0 {
        return 0.0; // |r| = 1
    }
    let t = r * df.sqrt() / denom.sqrt();
    2.0 * (1.0 - special::t_cdf(t.abs(), df))
}

// Fisher z interval: tanh(atanh(r) ± z_{1−α/2}/√(n−3)).
fn fisher_z_interval(r: f64, n: usize, alpha: f64) -> Option<(f64, f64)> {
    if n < 4 || r.abs() >= 1.0 {
        return None;
    }
    let z = r.atanh();
    let se = 1.0 / ((n - 3) as f64).sqrt();
    let crit = special::normal_quantile(1.0 - alpha / 2.0);
    Some(((z - crit * se).tanh(), (z + crit * se).tanh()))
}

/// Correlation matrix over named numeric columns.
///
/// Each of the `|V|·(|V|−1)/2` unique pairs is computed once over its
/// own complete observations and mirrored. A zero-variance variable
/// yields NaN in its off-diagonal cells plus a warning, rather than an
/// error; the diagonal stays exactly 1.0.
///
/// # Errors
/// - [`StatError::InsufficientData`] when fewer than 2 variables are given.
pub fn correlation_matrix(
    columns: &[&[f64]],
    names: &[String],
    config: &CorrelationConfig,
) -> Result<CorrelationMatrix, StatError> {
    let k = columns.len();
    if k < 2 {
        return Err(StatError::InsufficientData {
            min_required: 2,
            actual: k,
        });
    }

    let name = |i: usize| -> String {
        names.get(i).cloned().unwrap_or_else(|| format!("var_{i}"))
    };

    let mut matrix = vec![vec![0.0; k]; k];
    let mut warnings = Vec::new();
    for (i, row) in matrix.iter_mut().enumerate() {
        row[i] = 1.0;
    }

    for i in 0..k {
        for j in (i + 1)..k {
            let result = match config.method {
                CorrelationMethod::Pearson => pearson(columns[i], columns[j], config),
                CorrelationMethod::Spearman => spearman(columns[i], columns[j], config),
            };
            let r = match result {
                Ok(pc) => pc.r,
                Err(StatError::ConstantValues { .. }) => {
                    warnings.push(format!(
                        "correlation between '{}' and '{}' is undefined (zero variance)",
                        name(i),
                        name(j)
                    ));
                    f64::NAN
                }
                Err(StatError::InsufficientData { actual, .. }) => {
                    warnings.push(format!(
                        "correlation between '{}' and '{}' skipped ({} complete pairs)",
                        name(i),
                        name(j),
                        actual
                    ));
                    f64::NAN
                }
                Err(e) => return Err(e),
            };
            matrix[i][j] = r;
            matrix[j][i] = r;
        }
    }

    Ok(CorrelationMatrix {
        variables: (0..k).map(name).collect(),
        matrix,
        method: config.method,
        warnings,
    })
}
