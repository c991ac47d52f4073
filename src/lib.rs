//! # statcore
//!
//! Statistical analysis engine for tabular samples.
//!
//! statcore takes in-memory numeric and categorical columns and computes
//! descriptive statistics, correlation, hypothesis tests, ANOVA with
//! post-hoc comparisons, OLS regression with diagnostics, normality
//! tests, and ranked test recommendations. Every procedure is a pure
//! function: samples and a configuration in, an immutable result record
//! out. Parametric tests attach the assumption checks they rest on;
//! assumption violations are reported next to the statistic, never as
//! errors.
//!
//! ## Modules
//!
//! - [`sample`] — Cleaned numeric/categorical samples with missing-value accounting
//! - [`descriptive`] — Descriptive statistics, histograms, frequency tables
//! - [`correlation`] — Pearson/Spearman coefficients and correlation matrices
//! - [`normality`] — Shapiro-Wilk (Royston AS R94) and Kolmogorov-Smirnov
//! - [`contingency`] — Cross-tabulation and chi-square tests with Cramér's V
//! - [`ttest`] — One-sample, independent (pooled/Welch), and paired t-tests
//! - [`anova`] — One-way ANOVA with Tukey HSD post-hoc comparisons
//! - [`regression`] — Simple/multiple OLS with coefficient inference and Durbin-Watson
//! - [`nonparametric`] — Mann-Whitney U, Wilcoxon signed-rank, Kruskal-Wallis H
//! - [`assumptions`] — Normality/variance-homogeneity checks shared by parametric tests
//! - [`suggest`] — Rule-based test recommendation from variable types and sizes
//! - [`numeric`] — Mean/variance/quantile/rank primitives
//! - [`special`] — Distribution functions (normal, t, F, chi-square, studentized range)
//! - [`matrix`] — Dense matrix support for the regression normal equations
//! - [`error`] — Error types
//!
//! ## Quick Start
//!
//! ```
//! use statcore::descriptive::describe;
//! use statcore::sample::NumericSample;
//! use statcore::ttest::{one_sample, TTestConfig};
//!
//! let sample = NumericSample::from_slice(&[4.1, 5.2, 4.8, 5.5, 4.9, 5.1, 4.7, 5.3]);
//! let stats = describe(&sample).unwrap();
//! assert!(stats.mean > 4.9 && stats.mean < 5.1);
//!
//! let t = one_sample(&sample.values, 5.0, &TTestConfig::default()).unwrap();
//! assert!(t.p_value > 0.05); // no evidence the mean differs from 5
//! ```

pub mod anova;
pub mod assumptions;
pub mod contingency;
pub mod correlation;
pub mod descriptive;
pub mod error;
pub mod matrix;
pub mod nonparametric;
pub mod normality;
pub mod numeric;
pub mod regression;
pub mod sample;
pub mod special;
pub mod suggest;
pub mod ttest;
