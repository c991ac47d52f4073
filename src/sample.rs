//! Sample model: ordered columns with missing-value accounting.
//!
//! Every engine procedure operates on cleaned samples. Cleaning removes
//! `null` entries and non-finite numbers from computation but keeps count
//! of both, so callers can report data quality alongside any statistic.
//!
//! Invariant: `values.len() + null_count + invalid_count == original_len`.
//!
//! # Examples
//!
//! ```
//! use statcore::sample::NumericSample;
//!
//! let s = NumericSample::from_options(&[Some(1.0), None, Some(f64::NAN), Some(3.0)]);
//! assert_eq!(s.count(), 2);
//! assert_eq!(s.null_count, 1);
//! assert_eq!(s.invalid_count, 1);
//! assert_eq!(s.original_len, 4);
//! ```

/// A cleaned numeric sample.
///
/// `values` holds only finite observations, in their original order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NumericSample {
    /// Finite observations, original order preserved.
    pub values: Vec<f64>,
    /// Entries that were `null`/missing (`None`, or NaN in a raw slice).
    pub null_count: usize,
    /// Entries that were present but not usable (±∞, or NaN under `Some`).
    pub invalid_count: usize,
    /// Length of the input before cleaning.
    pub original_len: usize,
}

impl NumericSample {
    /// Cleans a raw `f64` slice. NaN is treated as a missing marker,
    /// ±∞ as invalid.
    pub fn from_slice(data: &[f64]) -> Self {
        let mut values = Vec::with_capacity(data.len());
        let mut null_count = 0;
        let mut invalid_count = 0;
        for &v in data {
            if v.is_nan() {
                null_count += 1;
            } else if v.is_infinite() {
                invalid_count += 1;
            } else {
                values.push(v);
            }
        }
        Self {
            values,
            null_count,
            invalid_count,
            original_len: data.len(),
        }
    }

    /// Cleans an optional slice. `None` counts as null; a present but
    /// non-finite value counts as invalid.
    pub fn from_options(data: &[Option<f64>]) -> Self {
        let mut values = Vec::with_capacity(data.len());
        let mut null_count = 0;
        let mut invalid_count = 0;
        for v in data {
            match v {
                None => null_count += 1,
                Some(x) if !x.is_finite() => invalid_count += 1,
                Some(x) => values.push(*x),
            }
        }
        Self {
            values,
            null_count,
            invalid_count,
            original_len: data.len(),
        }
    }

    /// Number of usable observations.
    pub fn count(&self) -> usize {
        self.values.len()
    }

    /// True when no usable observations remain.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Extracts index-aligned complete pairs from two raw numeric columns.
///
/// A pair survives only when both entries are finite (pairwise deletion).
/// Used by correlation, paired tests, and regression input assembly.
///
/// # Examples
///
/// ```
/// use statcore::sample::complete_pairs;
///
/// let x = [1.0, f64::NAN, 3.0];
/// let y = [2.0, 5.0, 6.0];
/// let (a, b) = complete_pairs(&x, &y);
/// assert_eq!(a, vec![1.0, 3.0]);
/// assert_eq!(b, vec![2.0, 6.0]);
/// ```
pub fn complete_pairs(x: &[f64], y: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let n = x.len().min(y.len());
    let mut a = Vec::with_capacity(n);
    let mut b = Vec::with_capacity(n);
    for i in 0..n {
        if x[i].is_finite() && y[i].is_finite() {
            a.push(x[i]);
            b.push(y[i]);
        }
    }
    (a, b)
}

/// A categorical sample: ordered labels with missing-value accounting.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CategoricalSample {
    /// Present labels with their original row index.
    pub values: Vec<(usize, String)>,
    /// Entries that were missing.
    pub null_count: usize,
    /// Length of the input before cleaning.
    pub original_len: usize,
}

impl CategoricalSample {
    /// Cleans an optional label slice, recording original row indices so
    /// two categorical samples can later be aligned pairwise.
    pub fn from_options(data: &[Option<&str>]) -> Self {
        let mut values = Vec::with_capacity(data.len());
        let mut null_count = 0;
        for (i, v) in data.iter().enumerate() {
            match v {
                None => null_count += 1,
                Some(s) => values.push((i, s.to_string())),
            }
        }
        Self {
            values,
            null_count,
            original_len: data.len(),
        }
    }

    /// Number of usable observations.
    pub fn count(&self) -> usize {
        self.values.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_slice_splits_null_and_invalid() {
        let s = NumericSample::from_slice(&[1.0, f64::NAN, f64::INFINITY, 4.0, f64::NEG_INFINITY]);
        assert_eq!(s.values, vec![1.0, 4.0]);
        assert_eq!(s.null_count, 1);
        assert_eq!(s.invalid_count, 2);
        assert_eq!(s.original_len, 5);
        assert_eq!(s.count() + s.null_count + s.invalid_count, s.original_len);
    }

    #[test]
    fn from_options_counts_none_as_null() {
        let s = NumericSample::from_options(&[Some(1.0), None, None, Some(2.0)]);
        assert_eq!(s.count(), 2);
        assert_eq!(s.null_count, 2);
        assert_eq!(s.invalid_count, 0);
    }

    #[test]
    fn from_options_counts_nonfinite_as_invalid() {
        let s = NumericSample::from_options(&[Some(f64::NAN), Some(f64::INFINITY), None]);
        assert_eq!(s.count(), 0);
        assert_eq!(s.null_count, 1);
        assert_eq!(s.invalid_count, 2);
        assert!(s.is_empty());
    }

    #[test]
    fn clean_input_passes_through() {
        let s = NumericSample::from_slice(&[1.0, 2.0, 3.0]);
        assert_eq!(s.values, vec![1.0, 2.0, 3.0]);
        assert_eq!(s.null_count, 0);
        assert_eq!(s.invalid_count, 0);
    }

    #[test]
    fn complete_pairs_drops_incomplete_rows() {
        let x = [1.0, f64::NAN, 3.0, 4.0];
        let y = [10.0, 20.0, f64::NAN, 40.0];
        let (a, b) = complete_pairs(&x, &y);
        assert_eq!(a, vec![1.0, 4.0]);
        assert_eq!(b, vec![10.0, 40.0]);
    }

    #[test]
    fn complete_pairs_truncates_to_shorter() {
        let x = [1.0, 2.0, 3.0];
        let y = [4.0, 5.0];
        let (a, b) = complete_pairs(&x, &y);
        assert_eq!(a.len(), 2);
        assert_eq!(b.len(), 2);
    }

    #[test]
    fn categorical_tracks_indices_and_nulls() {
        let s = CategoricalSample::from_options(&[Some("a"), None, Some("b")]);
        assert_eq!(s.count(), 2);
        assert_eq!(s.null_count, 1);
        assert_eq!(s.values[0], (0, "a".to_string()));
        assert_eq!(s.values[1], (2, "b".to_string()));
    }
}
