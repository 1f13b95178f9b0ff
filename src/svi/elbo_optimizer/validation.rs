//! Validation helpers shared by the adapter, the solver, and the outcome
//! constructor. All checks report through [`SviError`]; nothing here panics.
use crate::svi::{
    elbo_optimizer::types::{Grad, Theta},
    errors::{SviError, SviResult},
};

/// Validate a gradient vector: correct dimension and all entries finite.
///
/// # Errors
/// - [`SviError::GradientDimMismatch`] if `grad.len() != dim`.
/// - [`SviError::InvalidGradient`] on the first non-finite entry.
pub fn validate_grad(grad: &Grad, dim: usize) -> SviResult<()> {
    if grad.len() != dim {
        return Err(SviError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    for (index, &value) in grad.iter().enumerate() {
        if !value.is_finite() {
            return Err(SviError::InvalidGradient {
                index,
                value,
                reason: "Gradient entries must be finite.",
            });
        }
    }
    Ok(())
}

/// Validate the best parameter vector returned by the solver.
///
/// # Errors
/// - [`SviError::MissingThetaHat`] if the solver produced no best parameter.
/// - [`SviError::InvalidThetaHat`] on the first non-finite entry.
pub fn validate_theta_hat(theta_hat_opt: Option<Theta>) -> SviResult<Theta> {
    let theta_hat = theta_hat_opt.ok_or(SviError::MissingThetaHat)?;
    for (index, &value) in theta_hat.iter().enumerate() {
        if !value.is_finite() {
            return Err(SviError::InvalidThetaHat {
                index,
                value,
                reason: "Estimated parameters must be finite.",
            });
        }
    }
    Ok(theta_hat)
}

/// Validate the best loss value returned by the solver.
///
/// # Errors
/// - [`SviError::NonFiniteCost`] if the value is NaN or ±∞.
pub fn validate_value(value: f64) -> SviResult<()> {
    if !value.is_finite() {
        return Err(SviError::NonFiniteCost { value });
    }
    Ok(())
}

/// Validate a learning rate: finite and strictly positive.
pub fn verify_learning_rate(lr: f64) -> SviResult<()> {
    if !lr.is_finite() || lr <= 0.0 {
        return Err(SviError::InvalidLearningRate {
            lr,
            reason: "Learning rate must be finite and > 0.",
        });
    }
    Ok(())
}

/// Validate a decay rate: finite and in (0, 1].
pub fn verify_decay_rate(gamma: f64) -> SviResult<()> {
    if !gamma.is_finite() || gamma <= 0.0 || gamma > 1.0 {
        return Err(SviError::InvalidDecayRate {
            gamma,
            reason: "Decay rate must lie in (0, 1].",
        });
    }
    Ok(())
}
