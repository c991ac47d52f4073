//! Rank-based tests: Mann-Whitney U, Wilcoxon signed-rank, and
//! Kruskal-Wallis H.
//!
//! All three use tie-corrected average ranks and a normal (or
//! chi-square, for Kruskal-Wallis) approximation for the p-value; exact
//! small-sample tables are not implemented, so p-values for very small
//! samples are approximate.
//!
//! # Examples
//!
//! ```
//! use statcore::nonparametric::{mann_whitney, NonParametricConfig};
//!
//! let a = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let b = [6.0, 7.0, 8.0, 9.0, 10.0];
//! let r = mann_whitney(&a, &b, &NonParametricConfig::default()).unwrap();
//! assert_eq!(r.statistic, 0.0); // complete separation
//! assert!(r.p_value < 0.05);
//! ```

use crate::error::StatError;
use crate::numeric;
use crate::special;

/// Configuration for the rank-based tests.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NonParametricConfig {
    /// Significance level. Default: 0.05.
    pub alpha: f64,
}

impl Default for NonParametricConfig {
    fn default() -> Self {
        Self { alpha: 0.05 }
    }
}

/// Result of a rank-based test.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NonParametricResult {
    /// U (Mann-Whitney, the smaller of U₁/U₂), T (Wilcoxon, the smaller
    /// signed-rank sum), or H (Kruskal-Wallis, tie-corrected).
    pub statistic: f64,
    /// Normal deviate behind the p-value; `None` for Kruskal-Wallis.
    pub z: Option<f64>,
    pub p_value: f64,
    /// Rank-biserial style effect `r = |z|/√N`; `None` for
    /// Kruskal-Wallis.
    pub effect_size: Option<f64>,
    /// Sample medians, in input order.
    pub medians: Vec<f64>,
    /// Degrees of freedom; only Kruskal-Wallis has one.
    pub df: Option<usize>,
}

/// Mann-Whitney U test for two independent samples.
///
/// Pooled tie-corrected ranks; U is the smaller of U₁/U₂; the p-value
/// uses the normal approximation with continuity correction and tie
/// correction `σ² = n₁n₂/12 · (N+1 − ΣT/(N(N−1)))` where
/// `ΣT = Σ t(t²−1)` over tie groups.
///
/// # Errors
/// - [`StatError::InsufficientData`] when either sample has fewer than
///   2 usable observations.
/// - [`StatError::ConstantValues`] when every pooled value is tied.
pub fn mann_whitney(
    sample1: &[f64],
    sample2: &[f64],
    _config: &NonParametricConfig,
) -> Result<NonParametricResult, StatError> {
    let a = finite_values(sample1);
    let b = finite_values(sample2);
    let (n1, n2) = (a.len(), b.len());
    if n1 < 2 || n2 < 2 {
        return Err(StatError::InsufficientData {
            min_required: 2,
            actual: n1.min(n2),
        });
    }

    let mut pooled = a.clone();
    pooled.extend_from_slice(&b);
    let ranks = numeric::ranks(&pooled).expect("finite, non-empty");
    let r1: f64 = ranks[..n1].iter().sum();

    let (nf1, nf2) = (n1 as f64, n2 as f64);
    let n = nf1 + nf2;
    let u1 = r1 - nf1 * (nf1 + 1.0) / 2.0;
    let u2 = nf1 * nf2 - u1;
    let statistic = u1.min(u2);

    let tie_sum = tie_sum(&pooled);
    let variance = nf1 * nf2 / 12.0 * ((n + 1.0) - tie_sum / (n * (n - 1.0)));
    if variance <= 0.0 {
        return Err(StatError::ConstantValues {
            variable: String::new(),
        });
    }

    let mean_u = nf1 * nf2 / 2.0;
    let z = continuity_corrected_z(u1, mean_u, variance.sqrt());
    let p_value = two_sided_normal_p(z);

    Ok(NonParametricResult {
        statistic,
        z: Some(z),
        p_value,
        effect_size: Some(z.abs() / n.sqrt()),
        medians: vec![
            numeric::median(&a).expect("n >= 2"),
            numeric::median(&b).expect("n >= 2"),
        ],
        df: None,
    })
}

/// Wilcoxon signed-rank test for paired samples.
///
/// Exact-zero differences are discarded; the remaining absolute
/// differences get tie-corrected ranks; T is the smaller of the
/// positive/negative rank sums, with
/// `σ² = n(n+1)(2n+1)/24 − ΣT/48` for the normal approximation.
///
/// # Errors
/// - [`StatError::UnequalLength`] when samples differ in length.
/// - [`StatError::InsufficientData`] when fewer than 2 non-zero
///   differences remain.
pub fn wilcoxon_signed_rank(
    sample1: &[f64],
    sample2: &[f64],
    _config: &NonParametricConfig,
) -> Result<NonParametricResult, StatError> {
    if sample1.len() != sample2.len() {
        return Err(StatError::UnequalLength {
            left: sample1.len(),
            right: sample2.len(),
        });
    }

    let mut diffs: Vec<f64> = Vec::with_capacity(sample1.len());
    let mut a_used = Vec::new();
    let mut b_used = Vec::new();
    for (&x, &y) in sample1.iter().zip(sample2) {
        if x.is_finite() && y.is_finite() {
            a_used.push(x);
            b_used.push(y);
            let d = x - y;
            if d != 0.0 {
                diffs.push(d);
            }
        }
    }
    let n = diffs.len();
    if n < 2 {
        return Err(StatError::InsufficientData {
            min_required: 2,
            actual: n,
        });
    }

    let abs: Vec<f64> = diffs.iter().map(|d| d.abs()).collect();
    let ranks = numeric::ranks(&abs).expect("finite, non-empty");
    let t_plus: f64 = diffs
        .iter()
        .zip(&ranks)
        .filter(|(d, _)| **d > 0.0)
        .map(|(_, r)| r)
        .sum();
    let nf = n as f64;
    let t_minus = nf * (nf + 1.0) / 2.0 - t_plus;
    let statistic = t_plus.min(t_minus);

    let mean_t = nf * (nf + 1.0) / 4.0;
    let variance = nf * (nf + 1.0) * (2.0 * nf + 1.0) / 24.0 - tie_sum(&abs) / 48.0;
    if variance <= 0.0 {
        return Err(StatError::ConstantValues {
            variable: String::new(),
        });
    }

    let z = (t_plus - mean_t) / variance.sqrt();
    let p_value = two_sided_normal_p(z);

    Ok(NonParametricResult {
        statistic,
        z: Some(z),
        p_value,
        effect_size: Some(z.abs() / nf.sqrt()),
        medians: vec![
            numeric::median(&a_used).expect("n >= 2"),
            numeric::median(&b_used).expect("n >= 2"),
        ],
        df: None,
    })
}

/// Kruskal-Wallis H test across independent groups.
///
/// `H = 12/(N(N+1)) Σ Rᵢ²/nᵢ − 3(N+1)`, divided by the tie correction
/// `1 − ΣT/(N³−N)`; p-value from chi-square with `k − 1` df.
///
/// # Errors
/// - [`StatError::InsufficientData`] when fewer than 2 groups or any
///   group has fewer than 2 usable observations.
/// - [`StatError::ConstantValues`] when every observation is tied.
pub fn kruskal_wallis(
    groups: &[&[f64]],
    _config: &NonParametricConfig,
) -> Result<NonParametricResult, StatError> {
    if groups.len() < 2 {
        return Err(StatError::InsufficientData {
            min_required: 2,
            actual: groups.len(),
        });
    }
    let cleaned: Vec<Vec<f64>> = groups.iter().map(|g| finite_values(g)).collect();
    if let Some(g) = cleaned.iter().find(|g| g.len() < 2) {
        return Err(StatError::InsufficientData {
            min_required: 2,
            actual: g.len(),
        });
    }

    let pooled: Vec<f64> = cleaned.iter().flatten().copied().collect();
    let n = pooled.len() as f64;
    let ranks = numeric::ranks(&pooled).expect("finite, non-empty");

    let mut h = 0.0;
    let mut offset = 0;
    for g in &cleaned {
        let ri: f64 = ranks[offset..offset + g.len()].iter().sum();
        h += ri * ri / g.len() as f64;
        offset += g.len();
    }
    h = 12.0 / (n * (n + 1.0)) * h - 3.0 * (n + 1.0);

    let correction = 1.0 - tie_sum(&pooled) / (n * n * n - n);
    if correction <= 0.0 {
        return Err(StatError::ConstantValues {
            variable: String::new(),
        });
    }
    let statistic = h / correction;

    let df = cleaned.len() - 1;
    let p_value = (1.0 - special::chi_square_cdf(statistic, df as f64)).clamp(0.0, 1.0);

    Ok(NonParametricResult {
        statistic,
        z: None,
        p_value,
        effect_size: None,
        medians: cleaned
            .iter()
            .map(|g| numeric::median(g).expect("group size checked"))
            .collect(),
        df: Some(df),
    })
}

fn finite_values(data: &[f64]) -> Vec<f64> {
    data.iter().copied().filter(|v| v.is_finite()).collect()
}

// ΣT = Σ t(t²−1) over groups of tied values.
fn tie_sum(data: &[f64]) -> f64 {
    let mut sorted: Vec<(f64, usize)> = data.iter().copied().zip(0..data.len()).collect();
    sorted.sort_by(|a, b| a.0.partial_cmp(&b.0).expect("finite input"));
    numeric::tie_correction(&sorted)
}

fn continuity_corrected_z(u: f64, mean: f64, sd: f64) -> f64 {
    let d = u - mean;
    if d.abs() <= 0.5 {
        0.0
    } else if d > 0.0 {
        (d - 0.5) / sd
    } else {
        (d + 0.5) / sd
    }
}

fn two_sided_normal_p(z: f64) -> f64 {
    (2.0 * (1.0 - special::normal_cdf(z.abs()))).clamp(0.0, 1.0)
}
