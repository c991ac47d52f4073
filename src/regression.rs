//! Ordinary least-squares linear regression with inference and
//! residual diagnostics.
//!
//! [`simple`] fits one predictor, [`multiple`] any number. Both solve
//! the normal equations `XᵀX β = Xᵀy` by Cholesky, report per-coefficient
//! standard errors, t-statistics, p-values and confidence intervals
//! (`df = n − p − 1`), R²/adjusted R², the overall F-test against the
//! intercept-only model, and the Durbin-Watson statistic of the
//! residuals.
//!
//! # Examples
//!
//! ```
//! use statcore::regression::{simple, RegressionConfig};
//!
//! let x: Vec<f64> = (1..=10).map(|i| i as f64).collect();
//! let y = [2.1, 3.9, 6.1, 7.9, 10.1, 11.9, 14.1, 15.9, 18.1, 20.2];
//! let r = simple(&x, &y, &RegressionConfig::default()).unwrap();
//! assert!((r.coefficients[1].coefficient - 2.0103).abs() < 1e-4);
//! assert!(r.r_squared > 0.999);
//! ```

use crate::assumptions::{self, AssumptionCheck};
use crate::error::StatError;
use crate::matrix::Matrix;
use crate::numeric;
use crate::special;

/// Pairwise predictor correlation above which a singular fit is blamed
/// on collinearity.
const COLLINEARITY_R: f64 = 0.9999;

/// Configuration for regression fits.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegressionConfig {
    /// Significance level for coefficient confidence intervals.
    /// Default: 0.05.
    pub alpha: f64,
}

impl Default for RegressionConfig {
    fn default() -> Self {
        Self { alpha: 0.05 }
    }
}

/// One fitted coefficient with its inference.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coefficient {
    /// `"intercept"` or the predictor name.
    pub variable: String,
    pub coefficient: f64,
    pub standard_error: f64,
    pub t_statistic: f64,
    /// Two-sided p-value with `df = n − p − 1`.
    pub p_value: f64,
    /// `1 − alpha` confidence interval.
    pub confidence_interval: (f64, f64),
}

/// Residual diagnostics.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegressionDiagnostics {
    /// Durbin-Watson statistic, `Σ(eᵢ−eᵢ₋₁)²/Σeᵢ²`, in [0, 4];
    /// values near 2 indicate no first-order autocorrelation.
    pub durbin_watson: f64,
}

/// Result of an OLS fit.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegressionResult {
    /// Intercept first, then one entry per predictor in input order.
    pub coefficients: Vec<Coefficient>,
    pub r_squared: f64,
    pub adjusted_r_squared: f64,
    /// Overall F against the intercept-only model.
    pub f_statistic: f64,
    pub f_p_value: f64,
    /// Residual standard error, `√(SS_res/(n−p−1))`.
    pub standard_error: f64,
    /// Residuals in input-row order (complete rows only).
    pub residuals: Vec<f64>,
    pub diagnostics: RegressionDiagnostics,
    pub assumptions: Vec<AssumptionCheck>,
}

/// Simple linear regression of `y` on one predictor.
pub fn simple(
    x: &[f64],
    y: &[f64],
    config: &RegressionConfig,
) -> Result<RegressionResult, StatError> {
    multiple(&[("x", x)], y, config)
}

/// Multiple linear regression of `y` on named predictors.
///
/// Rows where `y` or any predictor is non-finite are dropped (listwise
/// deletion). All columns must share the same length.
///
/// # Errors
/// - [`StatError::UnequalLength`] when column lengths differ.
/// - [`StatError::InsufficientData`] when fewer than `p + 2` complete
///   rows remain (at least one residual degree of freedom).
/// - [`StatError::ConstantValues`] when `y` has zero variance.
/// - [`StatError::SingularMatrix`] when the design matrix is not
///   invertible, naming the implicated predictor when a constant column
///   or a near-perfect pairwise correlation identifies one.
pub fn multiple(
    predictors: &[(&str, &[f64])],
    y: &[f64],
    config: &RegressionConfig,
) -> Result<RegressionResult, StatError> {
    if predictors.is_empty() {
        return Err(StatError::InsufficientData {
            min_required: 1,
            actual: 0,
        });
    }
    for (_, col) in predictors {
        if col.len() != y.len() {
            return Err(StatError::UnequalLength {
                left: y.len(),
                right: col.len(),
            });
        }
    }

    // Listwise deletion.
    let keep: Vec<usize> = (0..y.len())
        .filter(|&i| y[i].is_finite() && predictors.iter().all(|(_, c)| c[i].is_finite()))
        .collect();
    let p = predictors.len();
    let n = keep.len();
    if n < p + 2 {
        return Err(StatError::InsufficientData {
            min_required: p + 2,
            actual: n,
        });
    }

    let yv: Vec<f64> = keep.iter().map(|&i| y[i]).collect();
    let columns: Vec<Vec<f64>> = predictors
        .iter()
        .map(|(_, c)| keep.iter().map(|&i| c[i]).collect())
        .collect();

    let y_mean = numeric::mean(&yv).expect("n >= 2");
    let ss_total: f64 = yv.iter().map(|&v| (v - y_mean).powi(2)).sum();
    if ss_total <= 0.0 {
        return Err(StatError::ConstantValues {
            variable: "y".to_string(),
        });
    }

    // Design matrix [1 | x1 | x2 | …]
    let mut design = Matrix::zeros(n, p + 1);
    for i in 0..n {
        design.set(i, 0, 1.0);
        for (j, col) in columns.iter().enumerate() {
            design.set(i, j + 1, col[i]);
        }
    }

    let xt = design.transpose();
    let xtx = xt.mul_mat(&design);
    let xty = xt.mul_vec(&yv);

    let beta = match xtx.cholesky_solve(&xty) {
        Some(b) => b,
        None => {
            return Err(StatError::SingularMatrix {
                variable: implicated_predictor(predictors, &columns),
            })
        }
    };
    let cov_unscaled = xtx
        .spd_inverse()
        .ok_or_else(|| StatError::SingularMatrix {
            variable: implicated_predictor(predictors, &columns),
        })?;

    let fitted = design.mul_vec(&beta);
    let residuals: Vec<f64> = yv.iter().zip(&fitted).map(|(o, f)| o - f).collect();
    let ss_res: f64 = residuals.iter().map(|&e| e * e).sum();

    let df_res = (n - p - 1) as f64;
    let mse = ss_res / df_res;
    let r_squared = (1.0 - ss_res / ss_total).clamp(0.0, 1.0);
    let adjusted_r_squared = 1.0 - (1.0 - r_squared) * (n as f64 - 1.0) / df_res;

    let crit = special::t_quantile(1.0 - config.alpha / 2.0, df_res);
    let mut coefficients = Vec::with_capacity(p + 1);
    for j in 0..=p {
        let se = (mse * cov_unscaled.get(j, j)).sqrt();
        let t = if se > 0.0 { beta[j] / se } else { 0.0 };
        let p_value = (2.0 * (1.0 - special::t_cdf(t.abs(), df_res))).clamp(0.0, 1.0);
        let variable = if j == 0 {
            "intercept".to_string()
        } else {
            predictors[j - 1].0.to_string()
        };
        coefficients.push(Coefficient {
            variable,
            coefficient: beta[j],
            standard_error: se,
            t_statistic: t,
            p_value,
            confidence_interval: (beta[j] - crit * se, beta[j] + crit * se),
        });
    }

    // Overall F against the intercept-only model.
    let (f_statistic, f_p_value) = if r_squared >= 1.0 {
        (f64::INFINITY, 0.0)
    } else {
        let f = (r_squared / p as f64) / ((1.0 - r_squared) / df_res);
        (f, 1.0 - special::f_cdf(f, p as f64, df_res))
    };

    let durbin_watson = if ss_res > 0.0 {
        residuals
            .windows(2)
            .map(|w| (w[1] - w[0]).powi(2))
            .sum::<f64>()
            / ss_res
    } else {
        2.0
    };

    let assumptions = vec![
        assumptions::check_normality("residuals", &residuals, config.alpha),
        assumptions::check_sample_size("observations", n, 10 * p.max(1)),
    ];

    Ok(RegressionResult {
        coefficients,
        r_squared,
        adjusted_r_squared,
        f_statistic,
        f_p_value,
        standard_error: mse.sqrt(),
        residuals,
        diagnostics: RegressionDiagnostics { durbin_watson },
        assumptions,
    })
}

// Blames a constant column, or a member of a near-perfectly correlated
// predictor pair, for a singular design matrix.
fn implicated_predictor(
    predictors: &[(&str, &[f64])],
    columns: &[Vec<f64>],
) -> Option<String> {
    for (j, col) in columns.iter().enumerate() {
        if numeric::variance(col).unwrap_or(0.0) == 0.0 {
            return Some(predictors[j].0.to_string());
        }
    }
    for i in 0..columns.len() {
        for j in (i + 1)..columns.len() {
            if let Some(cov) = numeric::covariance(&columns[i], &columns[j]) {
                let vi = numeric::variance(&columns[i]).unwrap_or(0.0);
                let vj = numeric::variance(&columns[j]).unwrap_or(0.0);
                if vi > 0.0 && vj > 0.0 {
                    let r = cov / (vi.sqrt() * vj.sqrt());
                    if r.abs() >= COLLINEARITY_R {
                        return Some(predictors[j].0.to_string());
                    }
                }
            }
        }
    }
    None
}
