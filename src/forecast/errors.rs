//! Errors for seasonal forecasting (series validation, configuration checks,
//! layout invariants, unsupported methods, and trainer failures).
//!
//! This module defines the model error type, [`ForecastError`], used across
//! the public API and the internal core. It implements `Display`/`Error` and
//! wraps trainer errors from the `svi` layer.
//!
//! ## Conventions
//! - **Indices are 0-based** and refer to row positions in the input series.
//! - Target values may be NaN (unknown future rows) but never ±∞.
//! - Timestamps must strictly increase; this is validated at construction
//!   rather than assumed, so downstream code can rely on it.
//! - Unsupported fitting methods surface as
//!   [`ForecastError::MethodNotImplemented`] naming both the method and the
//!   operation; this is a terminal, user-visible failure, never retried.
use crate::svi::errors::SviError;

/// Crate-wide result alias for forecasting operations.
pub type ForecastResult<T> = Result<T, ForecastError>;

/// Unified error type for seasonal forecasting.
///
/// Covers input/series validation, configuration checks, fit/predict layout
/// invariants, unsupported method stubs, and wrapped trainer failures.
#[derive(Debug, Clone, PartialEq)]
pub enum ForecastError {
    // ---- Input/series validation ----
    /// Series is empty.
    EmptySeries,

    /// Timestamp and value columns have different lengths.
    LengthMismatch { timestamps: usize, values: usize },

    /// Timestamps must strictly increase.
    NonMonotonicTimestamps { index: usize },

    /// A target value is ±∞ (NaN marks an unknown value and is allowed).
    InfiniteTarget { index: usize, value: f64 },

    /// Fitting requires every target to be a finite number.
    MissingTarget { index: usize },

    /// The Gamma-noise model requires strictly positive targets.
    NonPositiveTarget { index: usize, value: f64 },

    /// Advancing a timestamp left the representable date range.
    TimestampOutOfRange { periods: usize },

    // ---- Configuration ----
    /// Harmonic orders must be at least 1.
    InvalidOrder { cycle: &'static str, order: usize },

    /// Unknown calendar frequency name.
    InvalidFrequency { name: String, reason: &'static str },

    /// Unknown estimation method name.
    InvalidMethod { name: String, reason: &'static str },

    // ---- Prediction / decomposition ----
    /// Forecast horizon must be at least one period.
    InvalidHorizon { periods: usize },

    /// Credible-interval mass must lie strictly between 0 and 1.
    InvalidInterval { interval: f64 },

    /// At least one posterior-predictive sample is required.
    InvalidSampleCount { samples: usize },

    /// Model hasn't been fitted yet.
    NotFitted,

    /// The configured method does not support the requested operation.
    MethodNotImplemented { method: &'static str, operation: &'static str },

    /// The requested capability is not implemented.
    NotImplemented { feature: &'static str },

    // ---- Parameter store / layout ----
    /// No parameter stored under the requested name.
    MissingParam { name: String },

    /// A parameter was stored with a different kind than requested.
    ParamKindMismatch { name: String, expected: &'static str },

    /// Coefficient vector length does not match the design-matrix layout.
    LayoutMismatch { expected: usize, actual: usize },

    /// A harmonic column is missing its sine/cosine partner.
    UnpairedHarmonic { cycle: &'static str, order: usize },

    /// A distribution could not be built from the fitted parameters.
    InvalidDistributionParam { distribution: &'static str, value: f64 },

    // ---- Trainer ----
    /// Wrapped trainer error.
    Svi(SviError),
}

impl std::error::Error for ForecastError {}

impl std::fmt::Display for ForecastError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Input/series validation ----
            ForecastError::EmptySeries => {
                write!(f, "Input series is empty.")
            }
            ForecastError::LengthMismatch { timestamps, values } => {
                write!(
                    f,
                    "Timestamp column has {timestamps} rows but value column has {values} rows."
                )
            }
            ForecastError::NonMonotonicTimestamps { index } => {
                write!(f, "Timestamps must strictly increase; violation at index {index}.")
            }
            ForecastError::InfiniteTarget { index, value } => {
                write!(f, "Target at index {index} is infinite: {value}")
            }
            ForecastError::MissingTarget { index } => {
                write!(f, "Fitting requires a finite target at every row; index {index} is unknown.")
            }
            ForecastError::NonPositiveTarget { index, value } => {
                write!(
                    f,
                    "Gamma-noise fitting requires strictly positive targets; index {index} has value {value}"
                )
            }
            ForecastError::TimestampOutOfRange { periods } => {
                write!(f, "Extending the series by {periods} periods left the valid date range.")
            }
            // ---- Configuration ----
            ForecastError::InvalidOrder { cycle, order } => {
                write!(f, "Harmonic order for the {cycle} cycle must be at least 1; got {order}.")
            }
            ForecastError::InvalidFrequency { name, reason } => {
                write!(f, "Invalid frequency '{name}': {reason}")
            }
            ForecastError::InvalidMethod { name, reason } => {
                write!(f, "Invalid method '{name}': {reason}")
            }
            // ---- Prediction / decomposition ----
            ForecastError::InvalidHorizon { periods } => {
                write!(f, "Forecast horizon must be at least one period; got {periods}.")
            }
            ForecastError::InvalidInterval { interval } => {
                write!(f, "Interval mass must lie strictly between 0 and 1; got {interval}.")
            }
            ForecastError::InvalidSampleCount { samples } => {
                write!(f, "At least one posterior-predictive sample is required; got {samples}.")
            }
            ForecastError::NotFitted => {
                write!(f, "Model hasn't been fitted yet.")
            }
            ForecastError::MethodNotImplemented { method, operation } => {
                write!(f, "Did not implement {operation} for method {method}.")
            }
            ForecastError::NotImplemented { feature } => {
                write!(f, "Did not implement {feature}.")
            }
            // ---- Parameter store / layout ----
            ForecastError::MissingParam { name } => {
                write!(f, "No fitted parameter stored under '{name}'.")
            }
            ForecastError::ParamKindMismatch { name, expected } => {
                write!(f, "Parameter '{name}' is not a {expected}.")
            }
            ForecastError::LayoutMismatch { expected, actual } => {
                write!(
                    f,
                    "Coefficient layout mismatch: design matrix has {expected} columns but {actual} coefficients are stored."
                )
            }
            ForecastError::UnpairedHarmonic { cycle, order } => {
                write!(f, "The {cycle} harmonic at order {order} is missing its sine/cosine partner.")
            }
            ForecastError::InvalidDistributionParam { distribution, value } => {
                write!(f, "Cannot build {distribution} distribution from fitted value {value}.")
            }
            // ---- Trainer ----
            ForecastError::Svi(err) => {
                write!(f, "Training failed: {err}")
            }
        }
    }
}

impl From<SviError> for ForecastError {
    fn from(err: SviError) -> ForecastError {
        ForecastError::Svi(err)
    }
}
