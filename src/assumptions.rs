//! Assumption checks attached to test results.
//!
//! Every parametric test reports the assumptions it rests on. Checks
//! never fail a computation: each one always produces an
//! [`AssumptionCheck`] with a pass/fail/warning outcome, and a
//! recommendation when an assumption does not hold.

use crate::error::StatError;
use crate::normality::{self, NormalityConfig};
use crate::numeric;
use crate::special;

/// Outcome of a single assumption check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AssumptionOutcome {
    /// The assumption holds at the configured level.
    Passed,
    /// The assumption is violated.
    Failed,
    /// The check could not decide (too little data, test out of range).
    Warning,
}

/// One checked assumption, always reported whether it held or not.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssumptionCheck {
    /// Short identifier, e.g. `"normality"` or `"equal_variances"`.
    pub name: String,
    pub outcome: AssumptionOutcome,
    /// What was checked and what was found.
    pub description: String,
    /// Suggested alternative when the assumption failed.
    pub recommendation: Option<String>,
}

impl AssumptionCheck {
    fn passed(name: &str, description: String) -> Self {
        Self {
            name: name.to_string(),
            outcome: AssumptionOutcome::Passed,
            description,
            recommendation: None,
        }
    }

    fn failed(name: &str, description: String, recommendation: &str) -> Self {
        Self {
            name: name.to_string(),
            outcome: AssumptionOutcome::Failed,
            description,
            recommendation: Some(recommendation.to_string()),
        }
    }

    fn warning(name: &str, description: String) -> Self {
        Self {
            name: name.to_string(),
            outcome: AssumptionOutcome::Warning,
            description,
            recommendation: None,
        }
    }
}

/// Checks a sample for normality.
///
/// Uses Shapiro-Wilk for 3 ≤ n ≤ 5000 and falls back to
/// Kolmogorov-Smirnov above that range. Below 3 observations the check
/// is a warning, not a verdict.
pub fn check_normality(label: &str, data: &[f64], alpha: f64) -> AssumptionCheck {
    let name = "normality";
    let config = NormalityConfig { alpha };
    let result = if data.len() <= 5000 {
        normality::shapiro_wilk(data, &config)
    } else {
        normality::kolmogorov_smirnov(data, &config)
    };
    match result {
        Ok(r) if r.is_normal => AssumptionCheck::passed(
            name,
            format!("{label}: no evidence against normality (p = {:.4})", r.p_value),
        ),
        Ok(r) => AssumptionCheck::failed(
            name,
            format!("{label}: normality rejected (p = {:.4})", r.p_value),
            "consider a non-parametric alternative",
        ),
        Err(StatError::ConstantValues { .. }) => AssumptionCheck::warning(
            name,
            format!("{label}: constant values, normality test not applicable"),
        ),
        Err(_) => AssumptionCheck::warning(
            name,
            format!(
                "{label}: too few observations (n = {}) to assess normality",
                data.len()
            ),
        ),
    }
}

/// Checks homogeneity of variances across groups.
///
/// With exactly two groups this is a variance-ratio heuristic (largest
/// over smallest, threshold 4). With three or more it is the
/// Brown-Forsythe test: a one-way F on absolute deviations from each
/// group median, which is robust to non-normality.
pub fn check_equal_variances(groups: &[&[f64]], alpha: f64) -> AssumptionCheck {
    let name = "equal_variances";
    if groups.len() < 2 || groups.iter().any(|g| g.len() < 2) {
        return AssumptionCheck::warning(
            name,
            "too few groups or observations to compare variances".to_string(),
        );
    }

    if groups.len() == 2 {
        let v0 = numeric::variance(groups[0]).unwrap_or(0.0);
        let v1 = numeric::variance(groups[1]).unwrap_or(0.0);
        let (hi, lo) = if v0 >= v1 { (v0, v1) } else { (v1, v0) };
        if lo == 0.0 {
            return if hi == 0.0 {
                AssumptionCheck::warning(
                    name,
                    "both groups have zero variance".to_string(),
                )
            } else {
                AssumptionCheck::failed(
                    name,
                    "one group has zero variance".to_string(),
                    "use Welch's t-test (unequal variances)",
                )
            };
        }
        let ratio = hi / lo;
        return if ratio <= 4.0 {
            AssumptionCheck::passed(
                name,
                format!("variance ratio {ratio:.2} within tolerance"),
            )
        } else {
            AssumptionCheck::failed(
                name,
                format!("variance ratio {ratio:.2} exceeds 4"),
                "use Welch's t-test (unequal variances)",
            )
        };
    }

    match brown_forsythe(groups) {
        Some((f, p)) if p > alpha => AssumptionCheck::passed(
            name,
            format!("Brown-Forsythe F = {f:.4}, p = {p:.4}"),
        ),
        Some((f, p)) => AssumptionCheck::failed(
            name,
            format!("Brown-Forsythe F = {f:.4}, p = {p:.4}"),
            "consider the Kruskal-Wallis test",
        ),
        None => AssumptionCheck::warning(
            name,
            "variance homogeneity could not be assessed".to_string(),
        ),
    }
}

/// Checks expected cell counts for a chi-square test.
///
/// The chi-square approximation weakens when expected counts fall below
/// 5; that is a warning on the result, never an error.
pub fn check_expected_frequencies(expected: &[f64]) -> AssumptionCheck {
    let name = "expected_frequencies";
    let small = expected.iter().filter(|&&e| e < 5.0).count();
    if small == 0 {
        AssumptionCheck::passed(
            name,
            "all expected counts are at least 5".to_string(),
        )
    } else {
        AssumptionCheck {
            name: name.to_string(),
            outcome: AssumptionOutcome::Warning,
            description: format!(
                "{small} of {} expected counts are below 5; the chi-square \
                 approximation may be unreliable",
                expected.len()
            ),
            recommendation: Some(
                "combine sparse categories or collect more observations".to_string(),
            ),
        }
    }
}

/// Flags small samples where asymptotic approximations weaken.
pub fn check_sample_size(label: &str, n: usize, recommended: usize) -> AssumptionCheck {
    let name = "sample_size";
    if n >= recommended {
        AssumptionCheck::passed(name, format!("{label}: n = {n}"))
    } else {
        AssumptionCheck::warning(
            name,
            format!("{label}: n = {n} is below the recommended {recommended}"),
        )
    }
}

// Brown-Forsythe: one-way F on |x − group median|.
fn brown_forsythe(groups: &[&[f64]]) -> Option<(f64, f64)> {
    let k = groups.len();
    let mut deviations: Vec<Vec<f64>> = Vec::with_capacity(k);
    for g in groups {
        let med = numeric::median(g)?;
        deviations.push(g.iter().map(|&x| (x - med).abs()).collect());
    }

    let n_total: usize = deviations.iter().map(|d| d.len()).sum();
    if n_total <= k {
        return None;
    }
    let grand_mean =
        deviations.iter().flatten().sum::<f64>() / n_total as f64;

    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    for d in &deviations {
        let m = d.iter().sum::<f64>() / d.len() as f64;
        ss_between += d.len() as f64 * (m - grand_mean).powi(2);
        ss_within += d.iter().map(|&v| (v - m).powi(2)).sum::<f64>();
    }

    let df_between = (k - 1) as f64;
    let df_within = (n_total - k) as f64;
    if ss_within <= 0.0 {
        // All deviations identical within groups.
        return if ss_between <= 1e-12 {
            Some((0.0, 1.0))
        } else {
            Some((f64::INFINITY, 0.0))
        };
    }
    let f = (ss_between / df_between) / (ss_within / df_within);
    let p = 1.0 - special::f_cdf(f, df_between, df_within);
    Some((f, p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normality_passes_on_regular_sample() {
        let data: Vec<f64> = (1..=10).map(|i| i as f64).collect();
        let c = check_normality("x", &data, 0.05);
        assert_eq!(c.outcome, AssumptionOutcome::Passed);
        assert!(c.recommendation.is_none());
    }

    #[test]
    fn normality_fails_on_heavy_skew() {
        let data = [1.0, 1.0, 1.0, 2.0, 2.0, 3.0, 4.0, 5.0, 9.0, 15.0, 30.0, 60.0];
        let c = check_normality("x", &data, 0.05);
        assert_eq!(c.outcome, AssumptionOutcome::Failed);
        assert!(c.recommendation.is_some());
    }

    #[test]
    fn normality_warns_when_undecidable() {
        let c = check_normality("x", &[1.0, 2.0], 0.05);
        assert_eq!(c.outcome, AssumptionOutcome::Warning);

        let c = check_normality("x", &[3.0, 3.0, 3.0, 3.0], 0.05);
        assert_eq!(c.outcome, AssumptionOutcome::Warning);
        assert!(c.description.contains("constant"));
    }

    #[test]
    fn two_group_variance_ratio() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [2.0, 3.0, 4.0, 5.0, 6.0];
        let c = check_equal_variances(&[&a, &b], 0.05);
        assert_eq!(c.outcome, AssumptionOutcome::Passed);

        let wide = [10.0, 20.0, 30.0, 40.0, 50.0];
        let c = check_equal_variances(&[&a, &wide], 0.05);
        assert_eq!(c.outcome, AssumptionOutcome::Failed);
        assert!(c.recommendation.as_deref().unwrap().contains("Welch"));
    }

    #[test]
    fn brown_forsythe_three_groups() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [2.0, 4.0, 6.0, 8.0, 10.0];
        let c = [10.0, 20.0, 30.0, 40.0, 50.0];
        let check = check_equal_variances(&[&a, &b, &c], 0.05);
        assert_eq!(check.outcome, AssumptionOutcome::Failed);
        // F ≈ 7.151, p ≈ 0.0090
        assert!(check.description.contains("7.15"));
        assert!(check.description.contains("0.0090"));

        let d = [3.0, 4.0, 5.0, 6.0, 7.0];
        let check = check_equal_variances(&[&a, &b2_shift(&a), &d], 0.05);
        assert_eq!(check.outcome, AssumptionOutcome::Passed);
    }

    fn b2_shift(a: &[f64]) -> Vec<f64> {
        a.iter().map(|v| v + 1.0).collect()
    }

    #[test]
    fn equal_variances_degenerate_inputs() {
        let a = [1.0];
        let b = [2.0, 3.0];
        let c = check_equal_variances(&[&a, &b], 0.05);
        assert_eq!(c.outcome, AssumptionOutcome::Warning);

        let flat = [5.0, 5.0, 5.0];
        let c = check_equal_variances(&[&flat, &flat], 0.05);
        assert_eq!(c.outcome, AssumptionOutcome::Warning);

        let varied = [1.0, 2.0, 3.0];
        let c = check_equal_variances(&[&flat, &varied], 0.05);
        assert_eq!(c.outcome, AssumptionOutcome::Failed);
    }

    #[test]
    fn expected_frequencies_threshold() {
        let c = check_expected_frequencies(&[25.0, 22.5, 12.5, 5.0]);
        assert_eq!(c.outcome, AssumptionOutcome::Passed);

        let c = check_expected_frequencies(&[1.125, 4.875, 1.875, 8.125]);
        assert_eq!(c.outcome, AssumptionOutcome::Warning);
        assert!(c.description.contains("3 of 4"));
        assert!(c.recommendation.is_some());
    }

    #[test]
    fn sample_size_threshold() {
        let c = check_sample_size("x", 40, 30);
        assert_eq!(c.outcome, AssumptionOutcome::Passed);
        let c = check_sample_size("x", 12, 30);
        assert_eq!(c.outcome, AssumptionOutcome::Warning);
        assert!(c.description.contains("12"));
    }
}
