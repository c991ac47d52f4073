//! One-way ANOVA with optional Tukey HSD post-hoc comparisons.
//!
//! The omnibus F compares between-group to within-group mean squares;
//! effect size is eta squared (SS_between / SS_total). When Tukey HSD
//! is requested and the omnibus test is significant, every group pair
//! gets an adjusted p-value from the studentized range distribution
//! (Tukey-Kramer form for unequal group sizes).
//!
//! # Examples
//!
//! ```
//! use statcore::anova::{one_way, AnovaConfig};
//!
//! let groups: [(&str, &[f64]); 3] = [
//!     ("a", &[1.0, 2.0, 3.0, 4.0, 5.0]),
//!     ("b", &[6.0, 7.0, 8.0, 9.0, 10.0]),
//!     ("c", &[11.0, 12.0, 13.0, 14.0, 15.0]),
//! ];
//! let r = one_way(&groups, &AnovaConfig::default()).unwrap();
//! assert_eq!(r.df_between, 2);
//! assert_eq!(r.df_within, 12);
//! ```

use crate::assumptions::{self, AssumptionCheck, AssumptionOutcome};
use crate::error::StatError;
use crate::numeric;
use crate::special;

/// Post-hoc strategy after a significant omnibus F.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PostHoc {
    /// No pairwise comparisons.
    #[default]
    None,
    /// Tukey HSD on all group pairs.
    Tukey,
}

/// Configuration for one-way ANOVA.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnovaConfig {
    /// Significance level. Default: 0.05.
    pub alpha: f64,
    /// Post-hoc strategy. Default: none.
    pub post_hoc: PostHoc,
}

impl Default for AnovaConfig {
    fn default() -> Self {
        Self {
            alpha: 0.05,
            post_hoc: PostHoc::None,
        }
    }
}

/// Per-group descriptive summary.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupSummary {
    pub group: String,
    pub n: usize,
    pub mean: f64,
    pub std_dev: f64,
}

/// One Tukey HSD pairwise comparison.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PairwiseComparison {
    /// `"<group A> vs <group B>"`.
    pub comparison: String,
    /// Mean of the first group minus mean of the second.
    pub mean_difference: f64,
    /// Studentized-range adjusted p-value.
    pub adjusted_p_value: f64,
    /// `adjusted_p_value < alpha`.
    pub significant: bool,
}

/// Result of a one-way ANOVA.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnovaResult {
    pub f_statistic: f64,
    pub p_value: f64,
    /// `k − 1`.
    pub df_between: usize,
    /// `N − k`.
    pub df_within: usize,
    pub ss_between: f64,
    pub ss_within: f64,
    /// SS_between / SS_total, in [0, 1].
    pub eta_squared: f64,
    pub groups: Vec<GroupSummary>,
    /// Present only when Tukey HSD was requested and the omnibus F was
    /// significant.
    pub post_hoc_tests: Option<Vec<PairwiseComparison>>,
    pub assumptions: Vec<AssumptionCheck>,
}

/// One-way ANOVA over labelled groups.
///
/// # Errors
/// - [`StatError::InsufficientData`] when fewer than 2 groups, or any
///   group has fewer than 2 usable observations.
/// - [`StatError::ConstantValues`] when every observation is identical
///   (no variance to partition).
pub fn one_way(
    groups: &[(&str, &[f64])],
    config: &AnovaConfig,
) -> Result<AnovaResult, StatError> {
    if groups.len() < 2 {
        return Err(StatError::InsufficientData {
            min_required: 2,
            actual: groups.len(),
        });
    }

    let cleaned: Vec<(&str, Vec<f64>)> = groups
        .iter()
        .map(|(label, data)| {
            (
                *label,
                data.iter().copied().filter(|v| v.is_finite()).collect(),
            )
        })
        .collect();
    if let Some((_, g)) = cleaned.iter().find(|(_, g)| g.len() < 2) {
        return Err(StatError::InsufficientData {
            min_required: 2,
            actual: g.len(),
        });
    }

    let k = cleaned.len();
    let n_total: usize = cleaned.iter().map(|(_, g)| g.len()).sum();
    let grand_mean = cleaned
        .iter()
        .flat_map(|(_, g)| g.iter())
        .sum::<f64>()
        / n_total as f64;

    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    let mut summaries = Vec::with_capacity(k);
    let mut means = Vec::with_capacity(k);
    for (label, g) in &cleaned {
        let mean = numeric::mean(g).expect("group size checked");
        let sd = numeric::std_dev(g).expect("group size checked");
        ss_between += g.len() as f64 * (mean - grand_mean).powi(2);
        ss_within += g.iter().map(|&v| (v - mean).powi(2)).sum::<f64>();
        summaries.push(GroupSummary {
            group: label.to_string(),
            n: g.len(),
            mean,
            std_dev: sd,
        });
        means.push(mean);
    }

    let ss_total = ss_between + ss_within;
    if ss_total <= 0.0 {
        return Err(StatError::ConstantValues {
            variable: String::new(),
        });
    }

    let df_between = k - 1;
    let df_within = n_total - k;
    let ms_within = ss_within / df_within as f64;
    let (f_statistic, p_value) = if ss_within <= 0.0 {
        // Perfect separation: every group internally constant.
        (f64::INFINITY, 0.0)
    } else {
        let f = (ss_between / df_between as f64) / ms_within;
        (f, 1.0 - special::f_cdf(f, df_between as f64, df_within as f64))
    };
    let eta_squared = ss_between / ss_total;

    let mut checks: Vec<AssumptionCheck> = cleaned
        .iter()
        .map(|(label, g)| assumptions::check_normality(label, g, config.alpha))
        .collect();
    let refs: Vec<&[f64]> = cleaned.iter().map(|(_, g)| g.as_slice()).collect();
    checks.push(assumptions::check_equal_variances(&refs, config.alpha));
    for s in &summaries {
        if s.std_dev == 0.0 {
            checks.push(AssumptionCheck {
                name: "zero_variance_group".to_string(),
                outcome: AssumptionOutcome::Warning,
                description: format!("group '{}' has zero variance", s.group),
                recommendation: None,
            });
        }
    }

    let post_hoc_tests = if config.post_hoc == PostHoc::Tukey
        && p_value < config.alpha
        && ms_within > 0.0
    {
        Some(tukey_hsd(&summaries, &means, ms_within, df_within, k, config.alpha))
    } else {
        None
    };

    Ok(AnovaResult {
        f_statistic,
        p_value,
        df_between,
        df_within,
        ss_between,
        ss_within,
        eta_squared,
        groups: summaries,
        post_hoc_tests,
        assumptions: checks,
    })
}

// Tukey-Kramer: q = |Δ| / √(MS_w/2 · (1/nᵢ + 1/nⱼ)), adjusted p from
// the studentized range distribution with k groups and N−k df.
fn tukey_hsd(
    summaries: &[GroupSummary],
    means: &[f64],
    ms_within: f64,
    df_within: usize,
    k: usize,
    alpha: f64,
) -> Vec<PairwiseComparison> {
    let mut out = Vec::with_capacity(k * (k - 1) / 2);
    for i in 0..k {
        for j in (i + 1)..k {
            let diff = means[i] - means[j];
            let se = (ms_within / 2.0
                * (1.0 / summaries[i].n as f64 + 1.0 / summaries[j].n as f64))
                .sqrt();
            let q = diff.abs() / se;
            let adjusted_p_value =
                (1.0 - special::studentized_range_cdf(q, k, df_within as f64)).clamp(0.0, 1.0);
            out.push(PairwiseComparison {
                comparison: format!("{} vs {}", summaries[i].group, summaries[j].group),
                mean_difference: diff,
                adjusted_p_value,
                significant: adjusted_p_value < alpha,
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_groups() -> [(&'static str, &'static [f64]); 3] {
        [
            ("low", &[1.0, 2.0, 3.0, 4.0, 5.0]),
            ("mid", &[6.0, 7.0, 8.0, 9.0, 10.0]),
            ("high", &[11.0, 12.0, 13.0, 14.0, 15.0]),
        ]
    }

    #[test]
    fn omnibus_reference_values() {
        let r = one_way(&three_groups(), &AnovaConfig::default()).unwrap();
        assert!((r.f_statistic - 50.0).abs() < 1e-10);
        assert_eq!(r.df_between, 2);
        assert_eq!(r.df_within, 12);
        assert!((r.ss_between - 250.0).abs() < 1e-10);
        assert!((r.ss_within - 30.0).abs() < 1e-10);
        assert!((r.eta_squared - 250.0 / 280.0).abs() < 1e-12);
        assert!((r.p_value - 1.5128e-6).abs() < 1e-8);
        assert_eq!(r.groups.len(), 3);
        assert!((r.groups[1].mean - 8.0).abs() < 1e-12);
        assert!((r.groups[0].std_dev - 2.5_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn tukey_all_pairs_significant() {
        let config = AnovaConfig {
            post_hoc: PostHoc::Tukey,
            ..AnovaConfig::default()
        };
        let r = one_way(&three_groups(), &config).unwrap();
        let pairs = r.post_hoc_tests.unwrap();
        assert_eq!(pairs.len(), 3);
        assert!(pairs.iter().all(|p| p.significant));

        // low vs mid: Δ = −5, q = 5/√0.5 ≈ 7.071
        let lm = pairs.iter().find(|p| p.comparison == "low vs mid").unwrap();
        assert!((lm.mean_difference - (-5.0)).abs() < 1e-12);
        assert!((lm.adjusted_p_value - 8.34e-4).abs() < 1e-4);

        // low vs high: Δ = −10, far in the tail
        let lh = pairs.iter().find(|p| p.comparison == "low vs high").unwrap();
        assert!((lh.mean_difference - (-10.0)).abs() < 1e-12);
        assert!(lh.adjusted_p_value < 1e-4);
    }

    #[test]
    fn post_hoc_skipped_when_omnibus_not_significant() {
        let groups: [(&str, &[f64]); 3] = [
            ("a", &[1.0, 2.0, 3.0, 4.0, 5.0]),
            ("b", &[1.5, 2.5, 3.5, 4.5, 5.5]),
            ("c", &[2.0, 3.0, 4.0, 5.0, 6.0]),
        ];
        let config = AnovaConfig {
            post_hoc: PostHoc::Tukey,
            ..AnovaConfig::default()
        };
        let r = one_way(&groups, &config).unwrap();
        assert!((r.f_statistic - 0.5).abs() < 1e-12);
        assert!(r.p_value > 0.05);
        assert!(r.post_hoc_tests.is_none());
    }

    #[test]
    fn unequal_group_sizes_use_tukey_kramer() {
        let groups: [(&str, &[f64]); 3] = [
            ("a", &[1.0, 2.0, 3.0, 4.0, 5.0]),
            ("b", &[2.0, 3.0, 4.0, 5.0, 6.0, 7.0]),
            ("c", &[20.0, 21.0, 22.0, 23.0]),
        ];
        let config = AnovaConfig {
            post_hoc: PostHoc::Tukey,
            ..AnovaConfig::default()
        };
        let r = one_way(&groups, &config).unwrap();
        let pairs = r.post_hoc_tests.unwrap();
        assert_eq!(pairs.len(), 3);
        for p in &pairs {
            assert!(p.adjusted_p_value >= 0.0 && p.adjusted_p_value <= 1.0);
        }
        // Only the far group differs.
        let ab = pairs.iter().find(|p| p.comparison == "a vs b").unwrap();
        assert!(!ab.significant);
        let ac = pairs.iter().find(|p| p.comparison == "a vs c").unwrap();
        assert!(ac.significant);
    }

    #[test]
    fn zero_variance_group_warns_but_computes() {
        let groups: [(&str, &[f64]); 2] = [
            ("flat", &[4.0, 4.0, 4.0, 4.0]),
            ("varied", &[1.0, 3.0, 5.0, 7.0]),
        ];
        let r = one_way(&groups, &AnovaConfig::default()).unwrap();
        assert!(r.f_statistic.is_finite());
        assert!(r
            .assumptions
            .iter()
            .any(|c| c.name == "zero_variance_group" && c.description.contains("flat")));
    }

    #[test]
    fn all_constant_errors() {
        let groups: [(&str, &[f64]); 2] = [("a", &[2.0, 2.0, 2.0]), ("b", &[2.0, 2.0])];
        assert!(matches!(
            one_way(&groups, &AnovaConfig::default()).unwrap_err(),
            StatError::ConstantValues { .. }
        ));
    }

    #[test]
    fn insufficient_groups_or_observations() {
        let one: [(&str, &[f64]); 1] = [("a", &[1.0, 2.0, 3.0])];
        assert!(matches!(
            one_way(&one, &AnovaConfig::default()).unwrap_err(),
            StatError::InsufficientData { .. }
        ));
        let tiny: [(&str, &[f64]); 2] = [("a", &[1.0, 2.0]), ("b", &[3.0])];
        assert!(matches!(
            one_way(&tiny, &AnovaConfig::default()).unwrap_err(),
            StatError::InsufficientData { .. }
        ));
    }

    #[test]
    fn non_finite_values_are_dropped() {
        let groups: [(&str, &[f64]); 2] = [
            ("a", &[1.0, 2.0, f64::NAN, 3.0]),
            ("b", &[4.0, 5.0, 6.0]),
        ];
        let r = one_way(&groups, &AnovaConfig::default()).unwrap();
        assert_eq!(r.groups[0].n, 3);
        assert_eq!(r.df_within, 4);
    }
}
