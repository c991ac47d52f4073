//! Categorical association: contingency tables and chi-square tests.
//!
//! [`crosstab`] builds a row×column count table from two categorical
//! samples aligned by original row index (rows missing in either sample
//! are dropped). [`chi_square_independence`] and
//! [`chi_square_goodness_of_fit`] test the table, reporting Cramér's V
//! as effect size; small expected frequencies are flagged as assumption
//! warnings rather than errors.
//!
//! # Examples
//!
//! ```
//! use statcore::contingency::{crosstab, chi_square_independence};
//! use statcore::sample::CategoricalSample;
//!
//! let group = CategoricalSample::from_options(&[
//!     Some("a"), Some("a"), Some("b"), Some("b"), Some("a"), Some("b"),
//! ]);
//! let outcome = CategoricalSample::from_options(&[
//!     Some("yes"), Some("no"), Some("yes"), Some("no"), Some("yes"), Some("no"),
//! ]);
//! let table = crosstab(&group, &outcome).unwrap();
//! assert_eq!(table.total, 6);
//! let result = chi_square_independence(&table).unwrap();
//! assert_eq!(result.df, 1);
//! ```

use std::collections::BTreeMap;

use crate::assumptions::{self, AssumptionCheck};
use crate::error::StatError;
use crate::sample::CategoricalSample;
use crate::special;

/// A row×column contingency table of observed counts.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContingencyTable {
    /// Row category labels, sorted.
    pub row_labels: Vec<String>,
    /// Column category labels, sorted.
    pub col_labels: Vec<String>,
    /// Observed counts, `counts[i][j]` for row i, column j.
    pub counts: Vec<Vec<u64>>,
    /// Grand total of all cells.
    pub total: u64,
}

impl ContingencyTable {
    /// Builds a table directly from counts. Labels and counts must agree
    /// in shape.
    pub fn from_counts(
        row_labels: Vec<String>,
        col_labels: Vec<String>,
        counts: Vec<Vec<u64>>,
    ) -> Result<Self, StatError> {
        if counts.len() != row_labels.len()
            || counts.iter().any(|r| r.len() != col_labels.len())
        {
            return Err(StatError::UnequalLength {
                left: row_labels.len(),
                right: counts.len(),
            });
        }
        let total = counts.iter().flatten().sum();
        Ok(Self {
            row_labels,
            col_labels,
            counts,
            total,
        })
    }

    /// Row marginal totals.
    pub fn row_totals(&self) -> Vec<u64> {
        self.counts.iter().map(|r| r.iter().sum()).collect()
    }

    /// Column marginal totals.
    pub fn col_totals(&self) -> Vec<u64> {
        let cols = self.col_labels.len();
        let mut totals = vec![0_u64; cols];
        for row in &self.counts {
            for (j, &c) in row.iter().enumerate() {
                totals[j] += c;
            }
        }
        totals
    }
}

/// Result of a chi-square test.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChiSquareResult {
    /// The χ² statistic.
    pub statistic: f64,
    /// Degrees of freedom.
    pub df: usize,
    /// Right-tail p-value.
    pub p_value: f64,
    /// Cramér's V effect size in [0, 1].
    pub cramers_v: f64,
    /// Expected counts under the null, same shape as the observed table.
    pub expected: Vec<Vec<f64>>,
    /// Expected-frequency check; a warning here is never fatal.
    pub assumptions: Vec<AssumptionCheck>,
}

/// Cross-tabulates two categorical samples, pairing entries by their
/// original row index. A row contributes only when both samples have a
/// label at that index (pairwise deletion).
///
/// Category labels are sorted lexicographically along both axes.
///
/// # Errors
/// - [`StatError::MissingValues`] when no complete pairs remain.
pub fn crosstab(
    rows: &CategoricalSample,
    cols: &CategoricalSample,
) -> Result<ContingencyTable, StatError> {
    let col_by_index: BTreeMap<usize, &str> = cols
        .values
        .iter()
        .map(|(i, v)| (*i, v.as_str()))
        .collect();

    let mut cell_counts: BTreeMap<(&str, &str), u64> = BTreeMap::new();
    let mut row_set: BTreeMap<&str, ()> = BTreeMap::new();
    let mut col_set: BTreeMap<&str, ()> = BTreeMap::new();
    let mut paired = 0_u64;

    for (i, row_label) in &rows.values {
        if let Some(&col_label) = col_by_index.get(i) {
            *cell_counts.entry((row_label.as_str(), col_label)).or_insert(0) += 1;
            row_set.insert(row_label.as_str(), ());
            col_set.insert(col_label, ());
            paired += 1;
        }
    }

    if paired == 0 {
        return Err(StatError::MissingValues {
            variable: String::new(),
            usable: 0,
        });
    }

    let row_labels: Vec<String> = row_set.keys().map(|s| s.to_string()).collect();
    let col_labels: Vec<String> = col_set.keys().map(|s| s.to_string()).collect();

    let counts = row_labels
        .iter()
        .map(|r| {
            col_labels
                .iter()
                .map(|c| {
                    cell_counts
                        .get(&(r.as_str(), c.as_str()))
                        .copied()
                        .unwrap_or(0)
                })
                .collect()
        })
        .collect();

    Ok(ContingencyTable {
        row_labels,
        col_labels,
        counts,
        total: paired,
    })
}

/// Chi-square test of independence on an r×c contingency table.
///
/// Expected counts come from the marginal products `Rᵢ·Cⱼ/N`; df is
/// `(r−1)(c−1)`; Cramér's V is `√(χ²/(N·min(r−1, c−1)))`. Cells with
/// expected count below 5 produce an assumption warning, and an
/// expected count of zero (an empty marginal) is rejected.
///
/// # Errors
/// - [`StatError::InsufficientData`] when the table is smaller than 2×2
///   or the grand total is zero.
/// - [`StatError::ConstantValues`] when a marginal total is zero.
pub fn chi_square_independence(table: &ContingencyTable) -> Result<ChiSquareResult, StatError> {
    let r = table.row_labels.len();
    let c = table.col_labels.len();
    if r < 2 || c < 2 {
        return Err(StatError::InsufficientData {
            min_required: 2,
            actual: r.min(c),
        });
    }
    if table.total == 0 {
        return Err(StatError::InsufficientData {
            min_required: 1,
            actual: 0,
        });
    }

    let row_totals = table.row_totals();
    let col_totals = table.col_totals();
    if let Some(i) = row_totals.iter().position(|&t| t == 0) {
        return Err(StatError::ConstantValues {
            variable: table.row_labels[i].clone(),
        });
    }
    if let Some(j) = col_totals.iter().position(|&t| t == 0) {
        return Err(StatError::ConstantValues {
            variable: table.col_labels[j].clone(),
        });
    }

    let n = table.total as f64;
    let mut statistic = 0.0;
    let mut expected = vec![vec![0.0; c]; r];

    for i in 0..r {
        for j in 0..c {
            let e = row_totals[i] as f64 * col_totals[j] as f64 / n;
            expected[i][j] = e;
            let d = table.counts[i][j] as f64 - e;
            statistic += d * d / e;
        }
    }

    let df = (r - 1) * (c - 1);
    let p_value = 1.0 - special::chi_square_cdf(statistic, df as f64);
    let min_dim = (r - 1).min(c - 1) as f64;
    let cramers_v = (statistic / (n * min_dim)).sqrt().min(1.0);

    let flat: Vec<f64> = expected.iter().flatten().copied().collect();
    let checks = vec![assumptions::check_expected_frequencies(&flat)];

    Ok(ChiSquareResult {
        statistic,
        df,
        p_value,
        cramers_v,
        expected,
        assumptions: checks,
    })
}

/// Chi-square goodness-of-fit test of observed counts against expected
/// proportions.
///
/// `expected_proportions` must match `observed` in length; they are
/// normalized to sum to one before scaling by the total, so raw weights
/// are accepted. `None` tests against a uniform distribution. df is
/// `k−1` and Cramér's V is `√(χ²/(N·(k−1)))`.
///
/// # Errors
/// - [`StatError::InsufficientData`] when fewer than 2 categories or no
///   observations.
/// - [`StatError::UnequalLength`] when the proportion vector has a
///   different length.
/// - [`StatError::ConstantValues`] when an expected proportion is not
///   positive.
pub fn chi_square_goodness_of_fit(
    observed: &[u64],
    expected_proportions: Option<&[f64]>,
) -> Result<ChiSquareResult, StatError> {
    let k = observed.len();
    if k < 2 {
        return Err(StatError::InsufficientData {
            min_required: 2,
            actual: k,
        });
    }
    let n: u64 = observed.iter().sum();
    if n == 0 {
        return Err(StatError::InsufficientData {
            min_required: 1,
            actual: 0,
        });
    }

    let proportions: Vec<f64> = match expected_proportions {
        Some(p) => {
            if p.len() != k {
                return Err(StatError::UnequalLength {
                    left: k,
                    right: p.len(),
                });
            }
            if p.iter().any(|&v| !v.is_finite() || v <= 0.0) {
                return Err(StatError::ConstantValues {
                    variable: String::new(),
                });
            }
            let sum: f64 = p.iter().sum();
            p.iter().map(|&v| v / sum).collect()
        }
        None => vec![1.0 / k as f64; k],
    };

    let nf = n as f64;
    let mut statistic = 0.0;
    let mut expected_row = Vec::with_capacity(k);
    for (&o, &p) in observed.iter().zip(&proportions) {
        let e = p * nf;
        let d = o as f64 - e;
        statistic += d * d / e;
        expected_row.push(e);
    }

    let df = k - 1;
    let p_value = 1.0 - special::chi_square_cdf(statistic, df as f64);
    let cramers_v = (statistic / (nf * df as f64)).sqrt().min(1.0);

    let checks = vec![assumptions::check_expected_frequencies(&expected_row)];

    Ok(ChiSquareResult {
        statistic,
        df,
        p_value,
        cramers_v,
        expected: vec![expected_row],
        assumptions: checks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::AssumptionOutcome;

    fn table_2x3() -> ContingencyTable {
        ContingencyTable::from_counts(
            vec!["control".into(), "treatment".into()],
            vec!["high".into(), "low".into(), "mid".into()],
            vec![vec![20, 30, 10], vec![30, 15, 15]],
        )
        .unwrap()
    }

    #[test]
    fn independence_2x3_reference_values() {
        let r = chi_square_independence(&table_2x3()).unwrap();
        assert!((r.statistic - 8.0).abs() < 1e-10);
        assert_eq!(r.df, 2);
        assert!((r.p_value - 0.018316).abs() < 1e-4);
        assert!((r.cramers_v - 0.258199).abs() < 1e-4);
        assert!((r.expected[0][0] - 25.0).abs() < 1e-10);
        assert!((r.expected[1][1] - 22.5).abs() < 1e-10);
        assert_eq!(r.assumptions.len(), 1);
        assert_eq!(r.assumptions[0].outcome, AssumptionOutcome::Passed);
    }

    #[test]
    fn independence_2x2_reference_values() {
        let t = ContingencyTable::from_counts(
            vec!["a".into(), "b".into()],
            vec!["x".into(), "y".into()],
            vec![vec![10, 20], vec![20, 10]],
        )
        .unwrap();
        let r = chi_square_independence(&t).unwrap();
        assert!((r.statistic - 6.666667).abs() < 1e-5);
        assert_eq!(r.df, 1);
        assert!((r.p_value - 0.009823).abs() < 1e-4);
        assert!((r.cramers_v - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn independence_warns_on_small_expected() {
        let t = ContingencyTable::from_counts(
            vec!["a".into(), "b".into()],
            vec!["x".into(), "y".into()],
            vec![vec![1, 5], vec![2, 8]],
        )
        .unwrap();
        let r = chi_square_independence(&t).unwrap();
        // Expected counts 1.125, 4.875, 1.875, 8.125: three below 5.
        let check = &r.assumptions[0];
        assert_eq!(check.name, "expected_frequencies");
        assert_eq!(check.outcome, AssumptionOutcome::Warning);
        assert!(check.description.contains("3 of 4"));
        assert!(check.recommendation.is_some());
    }

    #[test]
    fn independence_rejects_degenerate_table() {
        let t = ContingencyTable::from_counts(
            vec!["only".into()],
            vec!["x".into(), "y".into()],
            vec![vec![5, 5]],
        )
        .unwrap();
        assert!(matches!(
            chi_square_independence(&t).unwrap_err(),
            StatError::InsufficientData { .. }
        ));
    }

    #[test]
    fn independence_rejects_empty_marginal() {
        let t = ContingencyTable::from_counts(
            vec!["a".into(), "b".into()],
            vec!["x".into(), "y".into()],
            vec![vec![0, 0], vec![5, 5]],
        )
        .unwrap();
        assert!(matches!(
            chi_square_independence(&t).unwrap_err(),
            StatError::ConstantValues { .. }
        ));
    }

    #[test]
    fn crosstab_aligns_by_row_index() {
        let group = CategoricalSample::from_options(&[
            Some("a"),
            Some("a"),
            None,
            Some("b"),
            Some("b"),
        ]);
        let outcome = CategoricalSample::from_options(&[
            Some("yes"),
            Some("no"),
            Some("yes"),
            Some("yes"),
            None,
        ]);
        let t = crosstab(&group, &outcome).unwrap();
        // Rows 2 and 4 are incomplete: three pairs remain.
        assert_eq!(t.total, 3);
        assert_eq!(t.row_labels, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(t.col_labels, vec!["no".to_string(), "yes".to_string()]);
        assert_eq!(t.counts, vec![vec![1, 1], vec![0, 1]]);
    }

    #[test]
    fn crosstab_all_missing_errors() {
        let a = CategoricalSample::from_options(&[Some("x"), None]);
        let b = CategoricalSample::from_options(&[None, Some("y")]);
        assert!(matches!(
            crosstab(&a, &b).unwrap_err(),
            StatError::MissingValues { .. }
        ));
    }

    #[test]
    fn goodness_of_fit_uniform_die() {
        let r = chi_square_goodness_of_fit(&[22, 21, 22, 27, 22, 36], None).unwrap();
        assert!((r.statistic - 6.72).abs() < 1e-10);
        assert_eq!(r.df, 5);
        assert!((r.p_value - 0.242311).abs() < 1e-4);
        assert!((r.cramers_v - 0.094657).abs() < 1e-4);
        assert!((r.expected[0][0] - 25.0).abs() < 1e-10);
    }

    #[test]
    fn goodness_of_fit_increasing_counts() {
        let r = chi_square_goodness_of_fit(&[10, 15, 20, 25], None).unwrap();
        assert!((r.statistic - 7.142857).abs() < 1e-5);
        assert_eq!(r.df, 3);
        assert!((r.p_value - 0.067481).abs() < 1e-4);
        assert!((r.cramers_v - 0.184428).abs() < 1e-5);
        assert_eq!(r.expected[0], vec![17.5, 17.5, 17.5, 17.5]);
        assert_eq!(r.assumptions[0].outcome, AssumptionOutcome::Passed);
    }

    #[test]
    fn goodness_of_fit_given_proportions() {
        let r = chi_square_goodness_of_fit(&[45, 35, 20], Some(&[0.5, 0.3, 0.2])).unwrap();
        assert!((r.statistic - 1.333333).abs() < 1e-5);
        assert_eq!(r.df, 2);
        assert!((r.p_value - 0.513417).abs() < 1e-4);
        assert_eq!(r.expected[0], vec![50.0, 30.0, 20.0]);
    }

    #[test]
    fn goodness_of_fit_normalizes_weights() {
        // Raw weights 5:3:2 behave like proportions 0.5:0.3:0.2.
        let a = chi_square_goodness_of_fit(&[45, 35, 20], Some(&[5.0, 3.0, 2.0])).unwrap();
        let b = chi_square_goodness_of_fit(&[45, 35, 20], Some(&[0.5, 0.3, 0.2])).unwrap();
        assert!((a.statistic - b.statistic).abs() < 1e-12);
    }

    #[test]
    fn goodness_of_fit_perfect_fit() {
        let r = chi_square_goodness_of_fit(&[25, 25, 25, 25], None).unwrap();
        assert_eq!(r.statistic, 0.0);
        assert!((r.p_value - 1.0).abs() < 1e-12);
        assert_eq!(r.cramers_v, 0.0);
    }

    #[test]
    fn goodness_of_fit_input_errors() {
        assert!(matches!(
            chi_square_goodness_of_fit(&[10], None).unwrap_err(),
            StatError::InsufficientData { .. }
        ));
        assert!(matches!(
            chi_square_goodness_of_fit(&[10, 20], Some(&[0.5])).unwrap_err(),
            StatError::UnequalLength { .. }
        ));
        assert!(matches!(
            chi_square_goodness_of_fit(&[10, 20], Some(&[1.0, 0.0])).unwrap_err(),
            StatError::ConstantValues { .. }
        ));
        assert!(matches!(
            chi_square_goodness_of_fit(&[0, 0], None).unwrap_err(),
            StatError::InsufficientData { .. }
        ));
    }
}
