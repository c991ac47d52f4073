//! Per-column summary statistics, histogram, and frequency binning.
//!
//! Tolerates dirty input: missing and non-finite entries are excluded
//! from every statistic but reported in `null_count`/`invalid_count`.
//!
//! # Examples
//!
//! ```
//! use statcore::descriptive::describe;
//! use statcore::sample::NumericSample;
//!
//! let data: Vec<f64> = (1..=10).map(|i| i as f64).collect();
//! let stats = describe(&NumericSample::from_slice(&data)).unwrap();
//! assert!((stats.mean - 5.5).abs() < 1e-12);
//! assert!((stats.quartiles[0] - 3.25).abs() < 1e-12);
//! assert!((stats.quartiles[2] - 7.75).abs() < 1e-12);
//! ```

use crate::error::StatError;
use crate::numeric;
use crate::sample::{CategoricalSample, NumericSample};

// ── Summary statistics ────────────────────────────────────────────────

/// Summary statistics of one numeric sample.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DescriptiveStats {
    pub mean: f64,
    pub median: f64,
    /// All values attaining the maximum multiplicity (> 1), ascending.
    /// Empty when every value is distinct.
    pub mode: Vec<f64>,
    /// Sample (n−1) variance. Zero for a constant or single-value sample.
    pub variance: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    /// Q1, median, Q3 via R-7 linear interpolation.
    pub quartiles: [f64; 3],
    pub iqr: f64,
    /// Bias-corrected G₁. `Some(0.0)` for a constant sample (never
    /// NaN); `None` when fewer than 3 non-constant observations make
    /// the statistic undefined.
    pub skewness: Option<f64>,
    /// Bias-corrected excess G₂. `Some(0.0)` for a constant sample;
    /// `None` when fewer than 4 non-constant observations make the
    /// statistic undefined.
    pub kurtosis: Option<f64>,
    /// Number of usable observations.
    pub count: usize,
    pub sum: f64,
    /// Missing entries excluded from every statistic above.
    pub null_count: usize,
    /// Non-finite entries excluded from every statistic above.
    pub invalid_count: usize,
}

/// Computes summary statistics over the usable values of a sample.
///
/// # Errors
/// - [`StatError::MissingValues`] when no usable observations remain.
pub fn describe(sample: &NumericSample) -> Result<DescriptiveStats, StatError> {
    let values = &sample.values;
    let n = values.len();
    if n == 0 {
        return Err(StatError::MissingValues {
            variable: String::new(),
            usable: 0,
        });
    }

    let mut sorted = values.clone();
    sorted.sort_unstable_by(|a, b| a.partial_cmp(b).expect("cleaned sample has no NaN"));

    let mean = numeric::compensated_sum(values) / n as f64;
    let min = sorted[0];
    let max = sorted[n - 1];
    let q1 = numeric::quantile_sorted(&sorted, 0.25).expect("non-empty");
    let q2 = numeric::quantile_sorted(&sorted, 0.5).expect("non-empty");
    let q3 = numeric::quantile_sorted(&sorted, 0.75).expect("non-empty");

    // n=1 and constant samples get variance 0, not an error.
    let variance = numeric::variance(values).unwrap_or(0.0);
    // Zero spread pins the higher moments at 0; a small non-constant
    // sample leaves them undefined rather than defaulted.
    let (skewness, kurtosis) = if variance == 0.0 {
        (Some(0.0), Some(0.0))
    } else {
        (numeric::skewness(values), numeric::kurtosis(values))
    };

    Ok(DescriptiveStats {
        mean,
        median: q2,
        mode: mode_of_sorted(&sorted),
        variance,
        std_dev: variance.sqrt(),
        min,
        max,
        range: max - min,
        quartiles: [q1, q2, q3],
        iqr: q3 - q1,
        skewness,
        kurtosis,
        count: n,
        sum: numeric::compensated_sum(values),
        null_count: sample.null_count,
        invalid_count: sample.invalid_count,
    })
}

// Values with maximal multiplicity > 1, from sorted input.
fn mode_of_sorted(sorted: &[f64]) -> Vec<f64> {
    let mut best = 1usize;
    let mut modes = Vec::new();
    let mut i = 0;
    while i < sorted.len() {
        let mut j = i + 1;
        while j < sorted.len() && sorted[j] == sorted[i] {
            j += 1;
        }
        let run = j - i;
        if run > best {
            best = run;
            modes.clear();
            modes.push(sorted[i]);
        } else if run == best && run > 1 {
            modes.push(sorted[i]);
        }
        i = j;
    }
    modes
}

// ── Histogram ─────────────────────────────────────────────────────────

/// One histogram bin: `[lower, upper)`, except the final bin which is
/// closed on both ends.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width histogram over `[min, max]`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
}

/// Bins the usable values of a sample into `bin_count` equal-width bins.
///
/// A zero-range (constant) sample produces a single bin holding every
/// observation.
///
/// # Errors
/// - [`StatError::MissingValues`] when no usable observations remain.
/// - [`StatError::InsufficientData`] when `bin_count` is zero.
pub fn histogram(sample: &NumericSample, bin_count: usize) -> Result<Histogram, StatError> {
    if bin_count == 0 {
        return Err(StatError::InsufficientData {
            min_required: 1,
            actual: 0,
        });
    }
    let values = &sample.values;
    if values.is_empty() {
        return Err(StatError::MissingValues {
            variable: String::new(),
            usable: 0,
        });
    }

    let lo = numeric::min(values).expect("non-empty");
    let hi = numeric::max(values).expect("non-empty");

    if hi == lo {
        return Ok(Histogram {
            bins: vec![HistogramBin {
                lower: lo,
                upper: hi,
                count: values.len(),
            }],
        });
    }

    let width = (hi - lo) / bin_count as f64;
    let mut counts = vec![0usize; bin_count];
    for &v in values {
        let mut idx = ((v - lo) / width) as usize;
        // The maximum lands in the final, closed bin.
        if idx >= bin_count {
            idx = bin_count - 1;
        }
        counts[idx] += 1;
    }

    let bins = counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: lo + i as f64 * width,
            upper: if i + 1 == bin_count {
                hi
            } else {
                lo + (i + 1) as f64 * width
            },
            count,
        })
        .collect();

    Ok(Histogram { bins })
}

// ── Frequency analysis ────────────────────────────────────────────────

/// One category's frequency.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrequencyEntry {
    pub category: String,
    pub count: usize,
    /// Fraction of usable observations.
    pub proportion: f64,
}

/// Frequency table of one categorical sample.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrequencyTable {
    /// Entries sorted by count descending, ties broken by category name.
    pub entries: Vec<FrequencyEntry>,
    pub null_count: usize,
    pub total: usize,
}

/// Counts category frequencies, excluding missing entries.
///
/// # Errors
/// - [`StatError::MissingValues`] when no usable observations remain.
pub fn frequency_table(sample: &CategoricalSample) -> Result<FrequencyTable, StatError> {
    let n = sample.count();
    if n == 0 {
        return Err(StatError::MissingValues {
            variable: String::new(),
            usable: 0,
        });
    }

    let mut counts: std::collections::BTreeMap<&str, usize> = std::collections::BTreeMap::new();
    for (_, label) in &sample.values {
        *counts.entry(label.as_str()).or_insert(0) += 1;
    }

    let mut entries: Vec<FrequencyEntry> = counts
        .into_iter()
        .map(|(category, count)| FrequencyEntry {
            category: category.to_string(),
            count,
            proportion: count as f64 / n as f64,
        })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then(a.category.cmp(&b.category)));

    Ok(FrequencyTable {
        entries,
        null_count: sample.null_count,
        total: n,
    })
}
