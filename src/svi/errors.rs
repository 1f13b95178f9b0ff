//! Errors for the stochastic variational trainer (objective evaluation,
//! gradient handling, option validation, and optimizer backend failures).
//!
//! ## Conventions
//! - The trainer *minimizes* the loss `c(θ) = -ELBO(θ)`; errors about "cost"
//!   refer to that loss.
//! - [`SviError::GradientNotImplemented`] is a control-flow signal, not a
//!   failure: the adapter catches it and falls back to finite differences.
//! - Backend errors from `argmin` are downcast into dedicated wrapper
//!   variants so they never leak across module boundaries.
use argmin::core::{ArgminError, Error};

/// Crate-wide result alias for trainer operations.
pub type SviResult<T> = Result<T, SviError>;

#[derive(Debug, Clone, PartialEq)]
pub enum SviError {
    // ---- Gradient ----
    /// Implies that finite differences should be used.
    GradientNotImplemented,

    /// Gradient dimensions do not match parameter dimensions.
    GradientDimMismatch { expected: usize, found: usize },

    /// Gradient elements need to be finite.
    InvalidGradient { index: usize, value: f64, reason: &'static str },

    // ---- SviOptions ----
    /// Learning rate needs to be positive and finite.
    InvalidLearningRate { lr: f64, reason: &'static str },

    /// Iteration budget needs to be positive.
    InvalidMaxIter { max_iter: usize, reason: &'static str },

    /// Exponential decay rate needs to lie in (0, 1].
    InvalidDecayRate { gamma: f64, reason: &'static str },

    // ---- Objective ----
    /// Objective returned a non-finite loss value.
    NonFiniteCost { value: f64 },

    /// Unconstrained parameter vector has the wrong length.
    ThetaLengthMismatch { expected: usize, actual: usize },

    /// Unconstrained parameter entries must be finite.
    InvalidThetaInput { index: usize, value: f64 },

    // ---- Trainer outcome ----
    /// Estimated parameters must be finite.
    InvalidThetaHat { index: usize, value: f64, reason: &'static str },

    /// Theta hat is missing.
    MissingThetaHat,

    // ---- Argmin ----
    /// Wrapper for argmin::InvalidParameter.
    InvalidParameter { text: String },
    /// Wrapper for argmin::NotImplemented.
    NotImplemented { text: String },
    /// Wrapper for argmin::NotInitialized.
    NotInitialized { text: String },
    /// Wrapper for argmin::ConditionViolated.
    ConditionViolated { text: String },
    /// Wrapper for argmin::PotentialBug.
    PotentialBug { text: String },
    /// Wrapper for other argmin::Error types.
    BackendError { text: String },

    // ---- Fallback ----
    UnknownError,
}

impl std::error::Error for SviError {}

impl std::fmt::Display for SviError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Gradient ----
            SviError::GradientNotImplemented => {
                write!(f, "Analytic gradient not implemented")
            }
            SviError::GradientDimMismatch { expected, found } => {
                write!(f, "Gradient dimension mismatch: expected {expected}, found {found}")
            }
            SviError::InvalidGradient { index, value, reason } => {
                write!(f, "Invalid gradient at index {index}: {value}: {reason}")
            }

            // ---- SviOptions ----
            SviError::InvalidLearningRate { lr, reason } => {
                write!(f, "Invalid learning rate {lr}: {reason}")
            }
            SviError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }
            SviError::InvalidDecayRate { gamma, reason } => {
                write!(f, "Invalid decay rate {gamma}: {reason}")
            }

            // ---- Objective ----
            SviError::NonFiniteCost { value } => {
                write!(f, "Non-finite loss value: {value}")
            }
            SviError::ThetaLengthMismatch { expected, actual } => {
                write!(f, "Theta length mismatch: expected {expected}, actual {actual}")
            }
            SviError::InvalidThetaInput { index, value } => {
                write!(f, "Invalid theta input at index {index}: {value}, must be finite")
            }

            // ---- Trainer outcome ----
            SviError::InvalidThetaHat { index, value, reason } => {
                write!(f, "Invalid estimated parameter at index {index}: {value}: {reason}")
            }
            SviError::MissingThetaHat => {
                write!(f, "Missing estimated parameters (theta hat)")
            }

            // ---- Argmin ----
            SviError::InvalidParameter { text } => {
                write!(f, "Invalid parameter: {text}")
            }
            SviError::NotImplemented { text } => {
                write!(f, "Not implemented: {text}")
            }
            SviError::NotInitialized { text } => {
                write!(f, "Not initialized: {text}")
            }
            SviError::ConditionViolated { text } => {
                write!(f, "Condition violated: {text}")
            }
            SviError::PotentialBug { text } => {
                write!(f, "Potential bug: {text}")
            }
            SviError::BackendError { text } => {
                write!(f, "Backend error: {text}")
            }

            // ---- Fallback ----
            SviError::UnknownError => {
                write!(f, "Unknown error")
            }
        }
    }
}

impl From<Error> for SviError {
    fn from(original_err: Error) -> Self {
        match original_err.downcast() {
            Ok(svi_err) => match svi_err {
                ArgminError::InvalidParameter { text } => SviError::InvalidParameter { text },
                ArgminError::NotImplemented { text } => SviError::NotImplemented { text },
                ArgminError::NotInitialized { text } => SviError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => SviError::ConditionViolated { text },
                ArgminError::PotentialBug { text } => SviError::PotentialBug { text },
                _ => SviError::UnknownError,
            },
            Err(err) => SviError::BackendError { text: err.to_string() },
        }
    }
}
