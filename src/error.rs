//! Error types for statcore.

use std::fmt;

/// All errors produced by statcore procedures.
///
/// Only input-shape problems abort a computation: too few observations,
/// zero variance where variance is required, a singular design matrix,
/// mismatched paired lengths, or a sample outside a test's valid range.
/// Assumption violations (non-normality, unequal variances, small
/// expected frequencies) are reported as
/// [`AssumptionCheck`](crate::assumptions::AssumptionCheck) warnings
/// alongside a successfully computed statistic, never as errors.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatError {
    /// Below the minimum number of observations for the requested statistic.
    InsufficientData { min_required: usize, actual: usize },
    /// A critical variable has no usable observations after missing-value removal.
    MissingValues { variable: String, usable: usize },
    /// A numeric procedure was given non-numeric input.
    NonNumericData { variable: String },
    /// Zero variance where variance is required (correlation, t-test denominator).
    ConstantValues { variable: String },
    /// Regression design matrix is not invertible.
    SingularMatrix { variable: Option<String> },
    /// An iterative fit failed to converge. Reserved for iterative methods.
    ConvergenceFailure { what: String },
    /// Paired procedure given samples of different lengths.
    UnequalLength { left: usize, right: usize },
    /// Sample size outside the valid range of the requested test.
    SampleSize { min: usize, max: usize, actual: usize },
}

impl fmt::Display for StatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientData {
                min_required,
                actual,
            } => {
                write!(f, "need at least {min_required} observations, got {actual}")
            }
            Self::MissingValues { variable, usable } => {
                write!(f, "variable '{variable}' has only {usable} usable observations")
            }
            Self::NonNumericData { variable } => {
                write!(f, "variable '{variable}' is not numeric")
            }
            Self::ConstantValues { variable } => {
                write!(f, "variable '{variable}' has zero variance")
            }
            Self::SingularMatrix { variable } => match variable {
                Some(v) => write!(f, "design matrix is singular (variable '{v}' implicated)"),
                None => write!(f, "design matrix is singular"),
            },
            Self::ConvergenceFailure { what } => {
                write!(f, "{what} failed to converge")
            }
            Self::UnequalLength { left, right } => {
                write!(f, "paired samples differ in length: {left} vs {right}")
            }
            Self::SampleSize { min, max, actual } => {
                write!(f, "sample size {actual} outside valid range {min}..={max}")
            }
        }
    }
}

impl std::error::Error for StatError {}
