//! Special functions backing every p-value in the crate.
//!
//! Polynomial and continued-fraction approximations of the distribution
//! functions needed for statistical inference. All p-values derived from
//! these agree with standard reference tables to at least 4 decimal
//! places.
//!
//! # Contents
//!
//! - Standard normal pdf/cdf/quantile (Abramowitz & Stegun 26.2.17 / 26.2.23)
//! - ln Γ (Lanczos), regularized incomplete beta and lower gamma
//! - Student-t cdf/pdf/quantile, F cdf, chi-square cdf
//! - Studentized range cdf (Tukey HSD post-hoc p-values)
//! - Asymptotic Kolmogorov distribution (KS test p-values)

/// 1/√(2π)
const FRAC_1_SQRT_2PI: f64 = 0.3989422804014326779399460599343818684758586311649;

// ── Standard normal ───────────────────────────────────────────────────

/// Standard normal CDF Φ(x).
///
/// # Algorithm
/// Abramowitz & Stegun formula 26.2.17, Horner evaluation.
/// Maximum absolute error < 7.5 × 10⁻⁸.
///
/// Reference: Abramowitz & Stegun (1964), *Handbook of Mathematical
/// Functions*, formula 26.2.17, p. 932.
///
/// # Examples
/// ```
/// use statcore::special::normal_cdf;
/// assert!((normal_cdf(0.0) - 0.5).abs() < 1e-7);
/// assert!((normal_cdf(1.96) - 0.975).abs() < 1e-3);
/// ```
pub fn normal_cdf(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    if x == f64::INFINITY {
        return 1.0;
    }
    if x == f64::NEG_INFINITY {
        return 0.0;
    }

    // Φ(-x) = 1 - Φ(x)
    let abs_x = x.abs();
    let k = 1.0 / (1.0 + 0.2316419 * abs_x);
    let phi = FRAC_1_SQRT_2PI * (-0.5 * abs_x * abs_x).exp();
    let poly = k
        * (0.319381530
            + k * (-0.356563782 + k * (1.781477937 + k * (-1.821255978 + k * 1.330274429))));
    let cdf_abs = 1.0 - phi * poly;

    if x >= 0.0 {
        cdf_abs
    } else {
        1.0 - cdf_abs
    }
}

/// Standard normal PDF φ(x).
pub fn normal_pdf(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    FRAC_1_SQRT_2PI * (-0.5 * x * x).exp()
}

/// Inverse standard normal CDF (quantile function).
///
/// # Algorithm
/// Abramowitz & Stegun formula 26.2.23, rational approximation.
/// Maximum absolute error < 4.5 × 10⁻⁴.
///
/// # Returns
/// - `f64::NAN` if `p` is outside `[0, 1]` or NaN.
/// - `±∞` at the endpoints.
///
/// # Examples
/// ```
/// use statcore::special::normal_quantile;
/// assert!(normal_quantile(0.5).abs() < 1e-4);
/// assert!((normal_quantile(0.975) - 1.96).abs() < 0.01);
/// ```
pub fn normal_quantile(p: f64) -> f64 {
    if p.is_nan() || !(0.0..=1.0).contains(&p) {
        return f64::NAN;
    }
    if p == 0.0 {
        return f64::NEG_INFINITY;
    }
    if p == 1.0 {
        return f64::INFINITY;
    }

    let (q, sign) = if p > 0.5 { (1.0 - p, 1.0) } else { (p, -1.0) };
    let t = (-2.0 * q.ln()).sqrt();

    const C0: f64 = 2.515517;
    const C1: f64 = 0.802853;
    const C2: f64 = 0.010328;
    const D1: f64 = 1.432788;
    const D2: f64 = 0.189269;
    const D3: f64 = 0.001308;

    let z = t - (C0 + C1 * t + C2 * t * t) / (1.0 + D1 * t + D2 * t * t + D3 * t * t * t);
    sign * z
}

// ── Gamma and beta ────────────────────────────────────────────────────

/// Lanczos approximation of ln Γ(x). Relative error < 2 × 10⁻¹⁰ for x > 0.
///
/// Reference: Lanczos (1964), *SIAM Journal on Numerical Analysis* 1(1).
pub fn ln_gamma(x: f64) -> f64 {
    #[allow(clippy::excessive_precision)]
    const COEFFICIENTS: [f64; 9] = [
        0.99999999999980993,
        676.5203681218851,
        -1259.1392167224028,
        771.32342877765313,
        -176.61502916214059,
        12.507343278686905,
        -0.13857109526572012,
        9.9843695780195716e-6,
        1.5056327351493116e-7,
    ];
    const G: f64 = 7.0;

    if x < 0.5 {
        let pi = std::f64::consts::PI;
        return (pi / (pi * x).sin()).ln() - ln_gamma(1.0 - x);
    }

    let x = x - 1.0;
    let mut sum = COEFFICIENTS[0];
    for (i, &c) in COEFFICIENTS[1..].iter().enumerate() {
        sum += c / (x + i as f64 + 1.0);
    }
    let t = x + G + 0.5;
    0.5 * (2.0 * std::f64::consts::PI).ln() + (x + 0.5) * t.ln() - t + sum.ln()
}

/// ln B(a, b) = ln Γ(a) + ln Γ(b) − ln Γ(a+b).
pub fn ln_beta(a: f64, b: f64) -> f64 {
    ln_gamma(a) + ln_gamma(b) - ln_gamma(a + b)
}

/// Regularized incomplete beta function I_x(a, b).
///
/// # Algorithm
/// Continued fraction (Lentz's method) with the symmetry relation
/// `I_x(a,b) = 1 − I_{1−x}(b,a)` for convergence.
///
/// Reference: Press et al. (2007), *Numerical Recipes*, 3rd ed., §6.4.
///
/// # Examples
/// ```
/// use statcore::special::incomplete_beta;
/// assert_eq!(incomplete_beta(0.0, 2.0, 3.0), 0.0);
/// assert!((incomplete_beta(0.5, 1.0, 1.0) - 0.5).abs() < 1e-10);
/// ```
pub fn incomplete_beta(x: f64, a: f64, b: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    if x > (a + 1.0) / (a + b + 2.0) {
        return 1.0 - incomplete_beta(1.0 - x, b, a);
    }
    let ln_prefix = a * x.ln() + b * (1.0 - x).ln() - ln_beta(a, b);
    (ln_prefix.exp() / a) * beta_cf(x, a, b)
}

// Continued fraction for the incomplete beta (Lentz's algorithm).
fn beta_cf(x: f64, a: f64, b: f64) -> f64 {
    const MAX_ITER: usize = 200;
    const EPS: f64 = 1e-14;
    const TINY: f64 = 1e-30;

    let mut c = 1.0;
    let mut d = 1.0 / (1.0 - (a + b) * x / (a + 1.0)).max(TINY);
    let mut h = d;

    for m in 1..=MAX_ITER {
        let m_f = m as f64;
        let num_even = m_f * (b - m_f) * x / ((a + 2.0 * m_f - 1.0) * (a + 2.0 * m_f));
        d = 1.0 / (1.0 + num_even * d).max(TINY);
        c = (1.0 + num_even / c).max(TINY);
        h *= d * c;

        let num_odd = -(a + m_f) * (a + b + m_f) * x / ((a + 2.0 * m_f) * (a + 2.0 * m_f + 1.0));
        d = 1.0 / (1.0 + num_odd * d).max(TINY);
        c = (1.0 + num_odd / c).max(TINY);
        let delta = d * c;
        h *= delta;

        if (delta - 1.0).abs() < EPS {
            break;
        }
    }
    h
}

/// Regularized lower incomplete gamma function P(a, x).
///
/// Series expansion for `x < a + 1`, continued fraction otherwise.
pub fn lower_incomplete_gamma(a: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x < a + 1.0 {
        gamma_series(a, x)
    } else {
        1.0 - gamma_cf(a, x)
    }
}

fn gamma_series(a: f64, x: f64) -> f64 {
    let mut term = 1.0 / a;
    let mut sum = term;
    let mut ap = a;
    for _ in 0..200 {
        ap += 1.0;
        term *= x / ap;
        sum += term;
        if term.abs() < sum.abs() * 1e-14 {
            break;
        }
    }
    sum * (-x + a * x.ln() - ln_gamma(a)).exp()
}

// Continued fraction for the upper incomplete gamma Q(a, x) = 1 − P(a, x).
fn gamma_cf(a: f64, x: f64) -> f64 {
    let mut b = x + 1.0 - a;
    let mut c = 1.0 / 1e-30;
    let mut d = 1.0 / b;
    let mut h = d;
    for i in 1..=200 {
        let an = -(i as f64) * (i as f64 - a);
        b += 2.0;
        d = an * d + b;
        if d.abs() < 1e-30 {
            d = 1e-30;
        }
        c = b + an / c;
        if c.abs() < 1e-30 {
            c = 1e-30;
        }
        d = 1.0 / d;
        let delta = d * c;
        h *= delta;
        if (delta - 1.0).abs() < 1e-14 {
            break;
        }
    }
    h * (-x + a * x.ln() - ln_gamma(a)).exp()
}

// ── Student's t ───────────────────────────────────────────────────────

/// CDF of Student's t-distribution, via the incomplete beta function
/// with `x = df / (df + t²)`.
///
/// # Examples
/// ```
/// use statcore::special::t_cdf;
/// assert!((t_cdf(0.0, 10.0) - 0.5).abs() < 1e-10);
/// assert!((t_cdf(1.96, 1000.0) - 0.975).abs() < 0.002);
/// ```
pub fn t_cdf(t: f64, df: f64) -> f64 {
    if t.is_nan() || df.is_nan() || df <= 0.0 {
        return f64::NAN;
    }
    if t == 0.0 {
        return 0.5;
    }
    let x = df / (df + t * t);
    let ib = incomplete_beta(x, df / 2.0, 0.5);
    if t >= 0.0 {
        1.0 - ib / 2.0
    } else {
        ib / 2.0
    }
}

/// PDF of Student's t-distribution.
pub fn t_pdf(t: f64, df: f64) -> f64 {
    if t.is_nan() || df.is_nan() || df <= 0.0 {
        return f64::NAN;
    }
    let half_df = df / 2.0;
    let log_pdf = ln_gamma(half_df + 0.5)
        - 0.5 * (df * std::f64::consts::PI).ln()
        - ln_gamma(half_df)
        - (half_df + 0.5) * (1.0 + t * t / df).ln();
    log_pdf.exp()
}

/// Quantile of Student's t-distribution.
///
/// Newton-Raphson iteration seeded by the normal quantile; converges in
/// 5–15 iterations for typical inputs. Used for t-test confidence
/// intervals.
///
/// # Examples
/// ```
/// use statcore::special::t_quantile;
/// assert!(t_quantile(0.5, 10.0).abs() < 1e-10);
/// // t_{0.975, 9} ≈ 2.262
/// assert!((t_quantile(0.975, 9.0) - 2.262).abs() < 0.01);
/// ```
pub fn t_quantile(p: f64, df: f64) -> f64 {
    if p.is_nan() || df.is_nan() || df <= 0.0 || p <= 0.0 || p >= 1.0 {
        return f64::NAN;
    }
    if (p - 0.5).abs() < 1e-15 {
        return 0.0;
    }

    let mut t = normal_quantile(p);
    for _ in 0..50 {
        let cdf = t_cdf(t, df);
        let pdf = t_pdf(t, df);
        if pdf.abs() < 1e-300 {
            break;
        }
        let delta = (cdf - p) / pdf;
        t -= delta;
        if delta.abs() < 1e-12 * t.abs().max(1.0) {
            break;
        }
    }
    t
}

// ── F-distribution ────────────────────────────────────────────────────

/// CDF of the F-distribution: `I_y(d1/2, d2/2)` with `y = d1·x/(d1·x + d2)`.
///
/// # Examples
/// ```
/// use statcore::special::f_cdf;
/// assert_eq!(f_cdf(0.0, 5.0, 10.0), 0.0);
/// ```
pub fn f_cdf(x: f64, df1: f64, df2: f64) -> f64 {
    if x.is_nan() || df1.is_nan() || df2.is_nan() || df1 <= 0.0 || df2 <= 0.0 {
        return f64::NAN;
    }
    if x <= 0.0 {
        return 0.0;
    }
    let y = df1 * x / (df1 * x + df2);
    incomplete_beta(y, df1 / 2.0, df2 / 2.0)
}

// ── Chi-square ────────────────────────────────────────────────────────

/// CDF of the chi-square distribution: `P(k/2, x/2)`.
///
/// # Examples
/// ```
/// use statcore::special::chi_square_cdf;
/// // P(X ≤ 3.841) ≈ 0.95 for df=1
/// assert!((chi_square_cdf(3.841, 1.0) - 0.95).abs() < 0.01);
/// ```
pub fn chi_square_cdf(x: f64, k: f64) -> f64 {
    if x.is_nan() || k.is_nan() || k <= 0.0 {
        return f64::NAN;
    }
    if x <= 0.0 {
        return 0.0;
    }
    lower_incomplete_gamma(k / 2.0, x / 2.0)
}

// ── Studentized range ─────────────────────────────────────────────────

/// CDF of the studentized range distribution P(Q ≤ q | k groups, ν df).
///
/// Drives Tukey HSD adjusted p-values. For k sample means with a pooled
/// variance estimate on ν degrees of freedom,
///
/// ```text
/// P(Q ≤ q) = ∫₀^∞ f_ν(u) · k ∫ φ(z) [Φ(z) − Φ(z − q·u)]^{k−1} dz du
/// ```
///
/// where f_ν is the density of s/σ (scaled chi). Both integrals are
/// evaluated with composite Simpson quadrature; the outer collapses to
/// the inner probability alone as ν → ∞.
///
/// Reference: Gleason (1999), "An accurate, non-iterative approximation
/// for studentized range quantiles", *Computational Statistics & Data
/// Analysis* 31(2); integral form per Hartley (1938).
///
/// # Returns
/// - `f64::NAN` if `k < 2` or `df < 1`.
/// - `0.0` if `q ≤ 0`.
pub fn studentized_range_cdf(q: f64, k: usize, df: f64) -> f64 {
    if k < 2 || df.is_nan() || df < 1.0 || q.is_nan() {
        return f64::NAN;
    }
    if q <= 0.0 {
        return 0.0;
    }

    // Large ν: the scale factor is effectively 1.
    if df > 5000.0 {
        return range_probability(q, k).clamp(0.0, 1.0);
    }

    // Density of u = s/σ where ν·s²/σ² ~ χ²_ν:
    // f(u) = C · u^{ν−1} · exp(−ν·u²/2), ln C = (ν/2)ln(ν/2) − lnΓ(ν/2) + ln 2
    let half_df = df / 2.0;
    let ln_c = half_df * half_df.ln() - ln_gamma(half_df) + std::f64::consts::LN_2;

    // u concentrates near 1 with spread ~ 1/√(2ν).
    let spread = 1.0 / (2.0 * df).sqrt();
    let lo = (1.0 - 10.0 * spread).max(1e-8);
    let hi = 1.0 + 10.0 * spread;

    let integrand = |u: f64| -> f64 {
        let ln_f = ln_c + (df - 1.0) * u.ln() - half_df * u * u;
        if ln_f < -700.0 {
            return 0.0;
        }
        ln_f.exp() * range_probability(q * u, k)
    };

    simpson(integrand, lo, hi, 200).clamp(0.0, 1.0)
}

// P(range of k iid standard normals ≤ w)
// = k ∫ φ(z) [Φ(z) − Φ(z − w)]^{k−1} dz
fn range_probability(w: f64, k: usize) -> f64 {
    if w <= 0.0 {
        return 0.0;
    }
    let kf = k as f64;
    let integrand = |z: f64| -> f64 {
        let inner = normal_cdf(z) - normal_cdf(z - w);
        if inner <= 0.0 {
            return 0.0;
        }
        normal_pdf(z) * inner.powf(kf - 1.0)
    };
    (kf * simpson(integrand, -8.0, 8.0 + w.min(16.0), 240)).min(1.0)
}

// Composite Simpson's rule with n (even) intervals.
fn simpson<F: Fn(f64) -> f64>(f: F, a: f64, b: f64, n: usize) -> f64 {
    let n = if n % 2 == 0 { n } else { n + 1 };
    let h = (b - a) / n as f64;
    let mut sum = f(a) + f(b);
    for i in 1..n {
        let x = a + i as f64 * h;
        sum += if i % 2 == 1 { 4.0 } else { 2.0 } * f(x);
    }
    sum * h / 3.0
}

// ── Kolmogorov distribution ───────────────────────────────────────────

/// Asymptotic Kolmogorov survival function Q(λ) = P(√n·D > λ).
///
/// ```text
/// Q(λ) = 2 Σ_{j≥1} (−1)^{j−1} exp(−2 j² λ²)
/// ```
///
/// Used for the Kolmogorov-Smirnov p-value. The series alternates and
/// converges fast for λ ≳ 0.3; below that the survival probability is
/// effectively 1.
///
/// Reference: Kolmogorov (1933); Smirnov (1948), *Annals of Mathematical
/// Statistics* 19(2).
pub fn kolmogorov_survival(lambda: f64) -> f64 {
    if lambda.is_nan() {
        return f64::NAN;
    }
    if lambda <= 0.0 {
        return 1.0;
    }
    if lambda < 0.2 {
        return 1.0;
    }
    let mut sum = 0.0;
    let mut sign = 1.0;
    for j in 1..=100 {
        let jf = j as f64;
        let term = (-2.0 * jf * jf * lambda * lambda).exp();
        sum += sign * term;
        sign = -sign;
        if term < 1e-12 {
            break;
        }
    }
    (2.0 * sum).clamp(0.0, 1.0)
}
