//! Test recommendation from variable types, sample sizes, and group
//! counts.
//!
//! The ranking is a deterministic rule table, not a model: each rule
//! matches a variable-type pattern and assigns a base confidence;
//! when the smallest relevant sample is under 30 observations the
//! parametric option is damped and a rank-based alternative is offered
//! just below it.
//!
//! # Examples
//!
//! ```
//! use statcore::suggest::{suggest_tests, VariableSpec, VariableType};
//!
//! let vars = [
//!     VariableSpec::new("score", VariableType::Numeric, 50),
//!     VariableSpec::new("height", VariableType::Numeric, 50),
//! ];
//! let suggestions = suggest_tests(&vars, None);
//! assert_eq!(suggestions[0].test_name, "correlation");
//! ```

/// Inferred variable type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VariableType {
    Numeric,
    Categorical,
}

/// One variable as seen by the recommender.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VariableSpec {
    pub name: String,
    pub var_type: VariableType,
    /// Usable observation count.
    pub n: usize,
}

impl VariableSpec {
    pub fn new(name: &str, var_type: VariableType, n: usize) -> Self {
        Self {
            name: name.to_string(),
            var_type,
            n,
        }
    }
}

/// One ranked recommendation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TestSuggestion {
    pub test_name: String,
    /// In [0, 1]; suggestions are returned in descending order.
    pub confidence: f64,
    pub reason: String,
}

/// Sample size below which parametric options are demoted and
/// rank-based alternatives promoted.
const SMALL_N: usize = 30;

/// Shapiro-Wilk validity range.
const SW_RANGE: std::ops::RangeInclusive<usize> = 3..=5000;

/// Ranks applicable procedures for the given variables.
///
/// `group_count` describes how many groups a grouping factor splits the
/// numeric variable into (used for t-test vs ANOVA selection); when
/// absent but exactly one categorical variable is present, that
/// variable is assumed to be the grouping factor with an unknown group
/// count, and both two-group and multi-group tests are offered at
/// reduced confidence.
pub fn suggest_tests(
    variables: &[VariableSpec],
    group_count: Option<usize>,
) -> Vec<TestSuggestion> {
    let numeric: Vec<&VariableSpec> = variables
        .iter()
        .filter(|v| v.var_type == VariableType::Numeric)
        .collect();
    let categorical: Vec<&VariableSpec> = variables
        .iter()
        .filter(|v| v.var_type == VariableType::Categorical)
        .collect();

    let mut out = Vec::new();

    match numeric.len() {
        0 => {}
        1 => {
            let v = numeric[0];
            push(
                &mut out,
                "descriptive_statistics",
                0.95,
                format!("'{}' is a single numeric variable", v.name),
            );
            if SW_RANGE.contains(&v.n) {
                push(
                    &mut out,
                    "shapiro_wilk",
                    0.85,
                    format!("'{}' has {} observations, in Shapiro-Wilk range", v.name, v.n),
                );
            } else if v.n > *SW_RANGE.end() {
                push(
                    &mut out,
                    "kolmogorov_smirnov",
                    0.75,
                    format!("'{}' is too large for Shapiro-Wilk", v.name),
                );
            }
        }
        _ => {
            let min_n = numeric.iter().map(|v| v.n).min().unwrap_or(0);
            let small = min_n < SMALL_N;
            push(
                &mut out,
                "correlation",
                if small { 0.7 } else { 0.9 },
                "two or more numeric variables".to_string(),
            );
            push(
                &mut out,
                "linear_regression",
                if small { 0.55 } else { 0.8 },
                if small {
                    format!("numeric predictor/response, but smallest n = {min_n} is limited")
                } else {
                    "numeric predictor and response with adequate sample".to_string()
                },
            );
            if small {
                push(
                    &mut out,
                    "spearman_correlation",
                    0.65,
                    format!("rank-based association is more robust at n = {min_n}"),
                );
            }
        }
    }

    // Group comparisons: one numeric outcome split by a factor.
    if numeric.len() == 1 {
        let n = numeric[0].n;
        let small = n < SMALL_N;
        match group_count {
            Some(2) => {
                push_group_pair(&mut out, "independent_t_test", "mann_whitney_u", small, 2);
            }
            Some(k) if k > 2 => {
                push_group_pair(&mut out, "one_way_anova", "kruskal_wallis", small, k);
            }
            None if categorical.len() == 1 => {
                // Unknown group count: offer both at reduced confidence.
                push(
                    &mut out,
                    "independent_t_test",
                    if small { 0.4 } else { 0.5 },
                    "numeric outcome with a grouping factor of unknown arity".to_string(),
                );
                push(
                    &mut out,
                    "one_way_anova",
                    if small { 0.4 } else { 0.5 },
                    "numeric outcome with a grouping factor of unknown arity".to_string(),
                );
            }
            _ => {}
        }
    }

    if categorical.len() >= 2 {
        push(
            &mut out,
            "chi_square_independence",
            0.85,
            "two categorical variables".to_string(),
        );
    } else if categorical.len() == 1 && numeric.is_empty() {
        push(
            &mut out,
            "frequency_analysis",
            0.9,
            format!("'{}' is a single categorical variable", categorical[0].name),
        );
        push(
            &mut out,
            "chi_square_goodness_of_fit",
            0.6,
            "category counts can be tested against expected proportions".to_string(),
        );
    }

    // Descending confidence, name as a deterministic tie-break.
    out.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.test_name.cmp(&b.test_name))
    });
    out
}

fn push(out: &mut Vec<TestSuggestion>, name: &str, confidence: f64, reason: String) {
    out.push(TestSuggestion {
        test_name: name.to_string(),
        confidence,
        reason,
    });
}

// Parametric test with its rank-based alternative just below it; the
// small-sample heuristic damps the parametric confidence and narrows
// the gap.
fn push_group_pair(
    out: &mut Vec<TestSuggestion>,
    parametric: &str,
    rank_based: &str,
    small: bool,
    k: usize,
) {
    let (pc, rc) = if small { (0.55, 0.5) } else { (0.85, 0.6) };
    push(
        out,
        parametric,
        pc,
        if small {
            format!("numeric outcome across {k} groups, but the sample is small")
        } else {
            format!("numeric outcome across {k} groups")
        },
    );
    push(
        out,
        rank_based,
        rc,
        if small {
            format!("rank-based alternative is more robust for small samples across {k} groups")
        } else {
            format!("rank-based alternative across {k} groups")
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_numeric_suggests_descriptives_first() {
        let vars = [VariableSpec::new("x", VariableType::Numeric, 100)];
        let s = suggest_tests(&vars, None);
        assert_eq!(s[0].test_name, "descriptive_statistics");
        assert_eq!(s[1].test_name, "shapiro_wilk");
    }

    #[test]
    fn huge_numeric_falls_back_to_ks() {
        let vars = [VariableSpec::new("x", VariableType::Numeric, 10_000)];
        let s = suggest_tests(&vars, None);
        assert!(s.iter().any(|t| t.test_name == "kolmogorov_smirnov"));
        assert!(!s.iter().any(|t| t.test_name == "shapiro_wilk"));
    }

    #[test]
    fn two_numeric_suggest_correlation_and_regression() {
        let vars = [
            VariableSpec::new("a", VariableType::Numeric, 60),
            VariableSpec::new("b", VariableType::Numeric, 60),
        ];
        let s = suggest_tests(&vars, None);
        assert_eq!(s[0].test_name, "correlation");
        assert!(s.iter().any(|t| t.test_name == "linear_regression"));
        assert!(!s.iter().any(|t| t.test_name == "spearman_correlation"));
    }

    #[test]
    fn small_samples_damp_parametric_but_keep_it_first() {
        let vars = [VariableSpec::new("y", VariableType::Numeric, 12)];
        let small = suggest_tests(&vars, Some(2));
        let tt = small
            .iter()
            .find(|t| t.test_name == "independent_t_test")
            .unwrap();
        let mwu = small
            .iter()
            .find(|t| t.test_name == "mann_whitney_u")
            .unwrap();
        // Parametric stays on top, but with reduced confidence and the
        // rank-based alternative close behind.
        assert!(tt.confidence > mwu.confidence);

        let vars = [VariableSpec::new("y", VariableType::Numeric, 80)];
        let large = suggest_tests(&vars, Some(2));
        let tt_large = large
            .iter()
            .find(|t| t.test_name == "independent_t_test")
            .unwrap();
        assert!(tt.confidence < tt_large.confidence);
        let gap_small = tt.confidence - mwu.confidence;
        let mwu_large = large
            .iter()
            .find(|t| t.test_name == "mann_whitney_u")
            .unwrap();
        let gap_large = tt_large.confidence - mwu_large.confidence;
        assert!(gap_small < gap_large);
    }

    #[test]
    fn small_two_numeric_ranks_spearman_below_pearson() {
        let vars = [
            VariableSpec::new("a", VariableType::Numeric, 12),
            VariableSpec::new("b", VariableType::Numeric, 12),
        ];
        let s = suggest_tests(&vars, None);
        let corr = s.iter().position(|t| t.test_name == "correlation").unwrap();
        let spear = s
            .iter()
            .position(|t| t.test_name == "spearman_correlation")
            .unwrap();
        assert!(corr < spear);
    }

    #[test]
    fn large_two_group_prefers_t_test() {
        let vars = [VariableSpec::new("y", VariableType::Numeric, 80)];
        let s = suggest_tests(&vars, Some(2));
        assert_eq!(s[0].test_name, "descriptive_statistics");
        let tt = s
            .iter()
            .position(|t| t.test_name == "independent_t_test")
            .unwrap();
        let mwu = s.iter().position(|t| t.test_name == "mann_whitney_u").unwrap();
        assert!(tt < mwu);
    }

    #[test]
    fn many_groups_suggest_anova() {
        let vars = [VariableSpec::new("y", VariableType::Numeric, 90)];
        let s = suggest_tests(&vars, Some(4));
        assert!(s.iter().any(|t| t.test_name == "one_way_anova"));
        assert!(s.iter().any(|t| t.test_name == "kruskal_wallis"));
        assert!(!s.iter().any(|t| t.test_name == "independent_t_test"));
    }

    #[test]
    fn two_categorical_suggest_chi_square() {
        let vars = [
            VariableSpec::new("a", VariableType::Categorical, 50),
            VariableSpec::new("b", VariableType::Categorical, 50),
        ];
        let s = suggest_tests(&vars, None);
        assert_eq!(s[0].test_name, "chi_square_independence");
    }

    #[test]
    fn single_categorical_suggests_frequencies() {
        let vars = [VariableSpec::new("color", VariableType::Categorical, 40)];
        let s = suggest_tests(&vars, None);
        assert_eq!(s[0].test_name, "frequency_analysis");
    }

    #[test]
    fn output_is_sorted_and_bounded() {
        let vars = [
            VariableSpec::new("y", VariableType::Numeric, 15),
            VariableSpec::new("g", VariableType::Categorical, 15),
        ];
        let s = suggest_tests(&vars, Some(3));
        assert!(!s.is_empty());
        for pair in s.windows(2) {
            assert!(pair[0].confidence >= pair[1].confidence);
        }
        for t in &s {
            assert!(t.confidence > 0.0 && t.confidence <= 1.0);
        }
    }

    #[test]
    fn empty_input_yields_no_suggestions() {
        assert!(suggest_tests(&[], None).is_empty());
    }

    #[test]
    fn deterministic_for_same_input() {
        let vars = [
            VariableSpec::new("a", VariableType::Numeric, 25),
            VariableSpec::new("b", VariableType::Numeric, 25),
        ];
        assert_eq!(suggest_tests(&vars, None), suggest_tests(&vars, None));
    }
}
