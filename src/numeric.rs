//! Numeric primitives shared by every engine above them.
//!
//! All functions handle edge cases explicitly and use numerically stable
//! algorithms to avoid catastrophic cancellation.
//!
//! # Algorithms
//!
//! - **Mean**: Neumaier compensated summation for O(ε) error independent of n.
//! - **Variance/StdDev**: Welford's online algorithm.
//!   Reference: Welford (1962), "Note on a Method for Calculating
//!   Corrected Sums of Squares and Products", *Technometrics* 4(3).
//! - **Quantile**: R-7 linear interpolation (default in R, Python, Excel).
//!   Reference: Hyndman & Fan (1996), "Sample Quantiles in Statistical
//!   Packages", *The American Statistician* 50(4).
//! - **Skewness/Kurtosis**: bias-corrected G₁ / excess G₂.
//!   Reference: Joanes & Gill (1998), *The Statistician* 47(1).
//! - **Ranks**: average ranks for ties, as required by Spearman,
//!   Mann-Whitney, Wilcoxon, and Kruskal-Wallis.

/// Neumaier compensated summation for O(ε) error independent of `n`.
///
/// Improved Kahan variant that also handles addends larger in magnitude
/// than the running sum.
///
/// Reference: Neumaier (1974), *Zeitschrift für Angewandte Mathematik
/// und Mechanik* 54(1), pp. 39–51.
pub fn compensated_sum(data: &[f64]) -> f64 {
    let mut sum = 0.0_f64;
    let mut c = 0.0_f64;
    for &x in data {
        let t = sum + x;
        if sum.abs() >= x.abs() {
            c += (sum - t) + x;
        } else {
            c += (x - t) + sum;
        }
        sum = t;
    }
    sum + c
}

/// Arithmetic mean via compensated summation.
///
/// # Returns
/// - `None` if `data` is empty or contains any NaN/Inf.
///
/// # Examples
/// ```
/// use statcore::numeric::mean;
/// let v = [1.0, 2.0, 3.0, 4.0, 5.0];
/// assert!((mean(&v).unwrap() - 3.0).abs() < 1e-15);
/// ```
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() || !data.iter().all(|x| x.is_finite()) {
        return None;
    }
    Some(compensated_sum(data) / data.len() as f64)
}

/// Sample (Bessel-corrected, `n − 1`) variance via Welford's algorithm.
///
/// # Returns
/// - `None` if `data.len() < 2` or contains NaN/Inf.
///
/// # Examples
/// ```
/// use statcore::numeric::variance;
/// let v: Vec<f64> = (1..=10).map(|i| i as f64).collect();
/// assert!((variance(&v).unwrap() - 9.166666666666666).abs() < 1e-12);
/// ```
pub fn variance(data: &[f64]) -> Option<f64> {
    if data.len() < 2 || !data.iter().all(|x| x.is_finite()) {
        return None;
    }
    Some(welford_m2(data) / (data.len() as f64 - 1.0))
}

/// Population (`n` denominator) variance via Welford's algorithm.
///
/// # Returns
/// - `None` if `data` is empty or contains NaN/Inf.
pub fn population_variance(data: &[f64]) -> Option<f64> {
    if data.is_empty() || !data.iter().all(|x| x.is_finite()) {
        return None;
    }
    Some(welford_m2(data) / data.len() as f64)
}

// Sum of squared deviations about the mean, accumulated online.
fn welford_m2(data: &[f64]) -> f64 {
    let mut count = 0.0_f64;
    let mut mean_acc = 0.0_f64;
    let mut m2 = 0.0_f64;
    for &x in data {
        count += 1.0;
        let delta = x - mean_acc;
        mean_acc += delta / count;
        m2 += delta * (x - mean_acc);
    }
    m2
}

/// Sample standard deviation, `sqrt(variance(data))`.
///
/// # Examples
/// ```
/// use statcore::numeric::std_dev;
/// let v: Vec<f64> = (1..=10).map(|i| i as f64).collect();
/// assert!((std_dev(&v).unwrap() - 3.0276503540974917).abs() < 1e-12);
/// ```
pub fn std_dev(data: &[f64]) -> Option<f64> {
    variance(data).map(f64::sqrt)
}

/// Population standard deviation, `sqrt(population_variance(data))`.
pub fn population_std_dev(data: &[f64]) -> Option<f64> {
    population_variance(data).map(f64::sqrt)
}

/// Minimum value in the slice.
///
/// # Returns
/// - `None` if `data` is empty or contains NaN.
pub fn min(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    data.iter().copied().try_fold(f64::INFINITY, |acc, x| {
        if x.is_nan() {
            None
        } else {
            Some(acc.min(x))
        }
    })
}

/// Maximum value in the slice.
///
/// # Returns
/// - `None` if `data` is empty or contains NaN.
pub fn max(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    data.iter().copied().try_fold(f64::NEG_INFINITY, |acc, x| {
        if x.is_nan() {
            None
        } else {
            Some(acc.max(x))
        }
    })
}

/// Median without mutating the input.
///
/// # Returns
/// - `None` if `data` is empty or contains NaN.
///
/// # Examples
/// ```
/// use statcore::numeric::median;
/// assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
/// assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
/// ```
pub fn median(data: &[f64]) -> Option<f64> {
    quantile(data, 0.5)
}

/// `p`-th quantile using the R-7 linear interpolation method.
///
/// # Algorithm
/// For sorted data `x[0..n]` and quantile `p ∈ [0, 1]`:
/// 1. `h = (n − 1) × p`
/// 2. `j = ⌊h⌋`, `g = h − j`
/// 3. return `(1 − g) × x[j] + g × x[j+1]`
///
/// Reference: Hyndman & Fan (1996), *The American Statistician* 50(4).
///
/// # Returns
/// - `None` if `data` is empty, `p` outside `[0, 1]`, or data contains NaN.
///
/// # Examples
/// ```
/// use statcore::numeric::quantile;
/// let v: Vec<f64> = (1..=10).map(|i| i as f64).collect();
/// assert!((quantile(&v, 0.25).unwrap() - 3.25).abs() < 1e-12);
/// assert!((quantile(&v, 0.75).unwrap() - 7.75).abs() < 1e-12);
/// ```
pub fn quantile(data: &[f64], p: f64) -> Option<f64> {
    if data.is_empty() || !(0.0..=1.0).contains(&p) || data.iter().any(|x| x.is_nan()) {
        return None;
    }
    let mut sorted = data.to_vec();
    sorted.sort_unstable_by(|a, b| a.partial_cmp(b).expect("NaN filtered above"));
    quantile_sorted(&sorted, p)
}

/// `p`-th quantile on **pre-sorted** data (R-7 method).
///
/// Avoids the O(n log n) sort when computing several quantiles of the
/// same dataset. The caller must guarantee non-decreasing order.
pub fn quantile_sorted(sorted_data: &[f64], p: f64) -> Option<f64> {
    let n = sorted_data.len();
    if n == 0 || !(0.0..=1.0).contains(&p) {
        return None;
    }
    if n == 1 {
        return Some(sorted_data[0]);
    }
    let h = (n - 1) as f64 * p;
    let j = h.floor() as usize;
    let g = h - h.floor();
    if j + 1 >= n {
        Some(sorted_data[n - 1])
    } else {
        Some((1.0 - g) * sorted_data[j] + g * sorted_data[j + 1])
    }
}

/// Bias-corrected sample skewness G₁.
///
/// # Formula
/// ```text
/// G₁ = [√(n(n−1)) / (n−2)] × (m₃ / m₂^{3/2})
/// ```
/// Matches Excel `SKEW()` and `scipy.stats.skew(bias=False)`.
///
/// Reference: Joanes & Gill (1998), *The Statistician* 47(1), pp. 183–189.
///
/// # Returns
/// - `None` if `data.len() < 3`, data contains NaN/Inf, or variance is zero.
pub fn skewness(data: &[f64]) -> Option<f64> {
    let n = data.len();
    if n < 3 || !data.iter().all(|x| x.is_finite()) {
        return None;
    }
    let nf = n as f64;
    let m = compensated_sum(data) / nf;
    let mut sum2 = 0.0;
    let mut sum3 = 0.0;
    for &x in data {
        let d = x - m;
        let d2 = d * d;
        sum2 += d2;
        sum3 += d2 * d;
    }
    let m2 = sum2 / nf;
    if m2 == 0.0 {
        return None;
    }
    let m3 = sum3 / nf;
    let g1 = m3 / m2.powf(1.5);
    let correction = (nf * (nf - 1.0)).sqrt() / (nf - 2.0);
    Some(correction * g1)
}

/// Bias-corrected excess kurtosis G₂.
///
/// # Formula
/// ```text
/// G₂ = [n(n+1) / ((n−1)(n−2)(n−3))] × Σ[(xᵢ−x̄)/s]⁴ − [3(n−1)² / ((n−2)(n−3))]
/// ```
/// Matches Excel `KURT()` and `scipy.stats.kurtosis(bias=False)`.
/// Zero for a normal distribution, positive for heavy tails.
///
/// Reference: Joanes & Gill (1998), *The Statistician* 47(1), pp. 183–189.
///
/// # Returns
/// - `None` if `data.len() < 4`, data contains NaN/Inf, or variance is zero.
pub fn kurtosis(data: &[f64]) -> Option<f64> {
    let n = data.len();
    if n < 4 || !data.iter().all(|x| x.is_finite()) {
        return None;
    }
    let nf = n as f64;
    let m = compensated_sum(data) / nf;
    let mut sum2 = 0.0;
    let mut sum4 = 0.0;
    for &x in data {
        let d = x - m;
        let d2 = d * d;
        sum2 += d2;
        sum4 += d2 * d2;
    }
    let s2 = sum2 / (nf - 1.0);
    if s2 == 0.0 {
        return None;
    }
    let sum_z4 = sum4 / (s2 * s2);
    let a = nf * (nf + 1.0) / ((nf - 1.0) * (nf - 2.0) * (nf - 3.0));
    let b = 3.0 * (nf - 1.0) * (nf - 1.0) / ((nf - 2.0) * (nf - 3.0));
    Some(a * sum_z4 - b)
}

/// Sample covariance with Bessel's correction.
///
/// # Returns
/// - `None` if `x.len() != y.len()`, `n < 2`, or data contains NaN/Inf.
///
/// # Examples
/// ```
/// use statcore::numeric::covariance;
/// let x = [1.0, 2.0, 3.0, 4.0, 5.0];
/// let y = [2.0, 4.0, 6.0, 8.0, 10.0];
/// assert!((covariance(&x, &y).unwrap() - 5.0).abs() < 1e-14);
/// ```
pub fn covariance(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len();
    if n != y.len() || n < 2 || !x.iter().chain(y.iter()).all(|v| v.is_finite()) {
        return None;
    }
    let nf = n as f64;
    let mean_x = compensated_sum(x) / nf;
    let mean_y = compensated_sum(y) / nf;
    let mut sum = 0.0;
    for i in 0..n {
        sum += (x[i] - mean_x) * (y[i] - mean_y);
    }
    Some(sum / (nf - 1.0))
}

// ── Ranks ─────────────────────────────────────────────────────────────

/// Assigns average ranks to sorted `(value, tag)` pairs.
///
/// Tied positions (values within 1e-12) all receive the average of the
/// ranks they span: positions `i..j` get `(i+1 + j) / 2`.
pub fn average_ranks(sorted: &[(f64, usize)]) -> Vec<f64> {
    let n = sorted.len();
    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && (sorted[j].0 - sorted[i].0).abs() < 1e-12 {
            j += 1;
        }
        let avg_rank = (i + 1 + j) as f64 / 2.0;
        for rank in ranks.iter_mut().take(j).skip(i) {
            *rank = avg_rank;
        }
        i = j;
    }
    ranks
}

/// Tie correction factor Σ tₖ(tₖ² − 1) over all tie groups of sorted pairs.
///
/// Used in the variance of rank-sum statistics (Mann-Whitney, Wilcoxon)
/// and in the Kruskal-Wallis H divisor.
pub fn tie_correction(sorted: &[(f64, usize)]) -> f64 {
    let n = sorted.len();
    let mut correction = 0.0;
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && (sorted[j].0 - sorted[i].0).abs() < 1e-12 {
            j += 1;
        }
        let t = (j - i) as f64;
        if t > 1.0 {
            correction += t * (t * t - 1.0);
        }
        i = j;
    }
    correction
}

/// Average ranks of `data` in **original order** (1-based).
///
/// # Returns
/// - `None` if `data` is empty or contains NaN/Inf.
///
/// # Examples
/// ```
/// use statcore::numeric::ranks;
/// // 20 and 20 tie for ranks 2 and 3 → both get 2.5
/// let r = ranks(&[10.0, 20.0, 20.0, 40.0]).unwrap();
/// assert_eq!(r, vec![1.0, 2.5, 2.5, 4.0]);
/// ```
pub fn ranks(data: &[f64]) -> Option<Vec<f64>> {
    if data.is_empty() || !data.iter().all(|x| x.is_finite()) {
        return None;
    }
    let mut indexed: Vec<(f64, usize)> = data.iter().copied().zip(0..data.len()).collect();
    indexed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
    let sorted_ranks = average_ranks(&indexed);
    let mut out = vec![0.0; data.len()];
    for ((_, orig), &r) in indexed.iter().zip(sorted_ranks.iter()) {
        out[*orig] = r;
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- mean / variance / std_dev ---

    #[test]
    fn mean_one_to_ten() {
        let v: Vec<f64> = (1..=10).map(|i| i as f64).collect();
        assert!((mean(&v).unwrap() - 5.5).abs() < 1e-15);
    }

    #[test]
    fn variance_one_to_ten() {
        let v: Vec<f64> = (1..=10).map(|i| i as f64).collect();
        assert!((variance(&v).unwrap() - 9.166666666666666).abs() < 1e-10);
        assert!((std_dev(&v).unwrap() - 3.0276503540974917).abs() < 1e-10);
    }

    #[test]
    fn population_variance_denominator_n() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((population_variance(&v).unwrap() - 4.0).abs() < 1e-10);
        assert!((variance(&v).unwrap() - 4.571428571428571).abs() < 1e-10);
    }

    #[test]
    fn variance_rejects_single_observation() {
        assert_eq!(variance(&[1.0]), None);
        assert_eq!(std_dev(&[]), None);
    }

    #[test]
    fn rejects_non_finite() {
        assert_eq!(mean(&[1.0, f64::NAN]), None);
        assert_eq!(variance(&[1.0, f64::INFINITY, 2.0]), None);
    }

    #[test]
    fn constant_sample_zero_variance() {
        let v = [5.0; 8];
        assert_eq!(variance(&v), Some(0.0));
        assert_eq!(std_dev(&v), Some(0.0));
    }

    // --- quantile / median ---

    #[test]
    fn quartiles_one_to_ten() {
        let v: Vec<f64> = (1..=10).map(|i| i as f64).collect();
        assert!((quantile(&v, 0.25).unwrap() - 3.25).abs() < 1e-12);
        assert!((quantile(&v, 0.5).unwrap() - 5.5).abs() < 1e-12);
        assert!((quantile(&v, 0.75).unwrap() - 7.75).abs() < 1e-12);
    }

    #[test]
    fn quantile_extremes() {
        let v = [3.0, 1.0, 2.0];
        assert_eq!(quantile(&v, 0.0), Some(1.0));
        assert_eq!(quantile(&v, 1.0), Some(3.0));
        assert_eq!(quantile(&v, -0.1), None);
        assert_eq!(quantile(&v, 1.1), None);
    }

    #[test]
    fn median_odd_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }

    #[test]
    fn quantile_single_element() {
        assert_eq!(quantile(&[7.0], 0.3), Some(7.0));
    }

    // --- skewness / kurtosis ---

    #[test]
    fn skewness_symmetric_is_zero() {
        let v = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert!(skewness(&v).unwrap().abs() < 1e-14);
    }

    #[test]
    fn skewness_right_tail_positive() {
        let v = [1.0, 2.0, 3.0, 4.0, 50.0];
        assert!(skewness(&v).unwrap() > 0.0);
    }

    #[test]
    fn kurtosis_uniform_platykurtic() {
        let v: Vec<f64> = (1..=10).map(|i| i as f64).collect();
        assert!(kurtosis(&v).unwrap() < 0.0);
    }

    #[test]
    fn moments_reject_zero_variance() {
        assert_eq!(skewness(&[2.0, 2.0, 2.0]), None);
        assert_eq!(kurtosis(&[2.0, 2.0, 2.0, 2.0]), None);
    }

    // --- covariance ---

    #[test]
    fn covariance_linear() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 6.0, 8.0, 10.0];
        assert!((covariance(&x, &y).unwrap() - 5.0).abs() < 1e-14);
    }

    #[test]
    fn covariance_length_mismatch() {
        assert_eq!(covariance(&[1.0, 2.0], &[1.0]), None);
    }

    // --- ranks ---

    #[test]
    fn ranks_no_ties() {
        let r = ranks(&[30.0, 10.0, 20.0]).unwrap();
        assert_eq!(r, vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn ranks_average_for_ties() {
        let r = ranks(&[1.0, 2.0, 2.0, 3.0]).unwrap();
        assert_eq!(r, vec![1.0, 2.5, 2.5, 4.0]);
    }

    #[test]
    fn ranks_all_tied() {
        let r = ranks(&[5.0, 5.0, 5.0]).unwrap();
        assert_eq!(r, vec![2.0, 2.0, 2.0]);
    }

    #[test]
    fn tie_correction_counts_groups() {
        // two groups of 2 ties: 2*(4-1) + 2*(4-1) = 12
        let sorted = [(1.0, 0), (1.0, 1), (2.0, 2), (3.0, 3), (3.0, 4)];
        assert_eq!(tie_correction(&sorted), 12.0);
    }

    #[test]
    fn tie_correction_zero_without_ties() {
        let sorted = [(1.0, 0), (2.0, 1), (3.0, 2)];
        assert_eq!(tie_correction(&sorted), 0.0);
    }

    // --- compensated_sum ---

    #[test]
    fn compensated_sum_recovers_small_addends() {
        let data = [1e16, 1.0, -1e16, 1.0];
        assert_eq!(compensated_sum(&data), 2.0);
    }
}
