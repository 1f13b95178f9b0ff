//! elbo_optimizer::types — shared numeric aliases for the trainer.
//!
//! Purpose
//! -------
//! Centralize the core numeric types used by the ELBO optimizer. By defining
//! these in one place, the rest of the trainer code can stay agnostic to
//! `ndarray` and Argmin generics and can more easily evolve if the backend
//! changes.
//!
//! Conventions
//! -----------
//! - `Theta` and `Grad` are treated conceptually as column vectors with
//!   length equal to the number of free (unconstrained) parameters.
//! - `Cost` is always a scalar `f64` in loss space, i.e. the negative ELBO;
//!   higher layers handle any sign flips between loss and ELBO.
use ndarray::Array1;
use std::collections::HashMap;

/// Unconstrained parameter vector `θ` for ELBO optimization.
///
/// Alias for `ndarray::Array1<f64>`, used as the canonical parameter type
/// throughout the trainer.
pub type Theta = Array1<f64>;

/// Gradient vector `∇ELBO(θ)` or `∇c(θ)` for optimization.
///
/// Alias for `ndarray::Array1<f64>`, matching the shape of `Theta`.
pub type Grad = Array1<f64>;

/// Scalar objective value used by the optimizer.
///
/// In this crate, this is the loss `c(θ) = -ELBO(θ)`.
pub type Cost = f64;

/// Function-evaluation counters as reported by the solver.
///
/// Maps human-readable counter names (e.g., `"cost_count"`) to counts.
pub type FnEvalMap = HashMap<String, u64>;

/// Step-size growth factor applied on a stable gradient sign (Rprop η⁺).
pub const RPROP_ETA_PLUS: f64 = 1.2;

/// Step-size shrink factor applied on a gradient sign flip (Rprop η⁻).
pub const RPROP_ETA_MINUS: f64 = 0.5;

/// Lower bound on per-parameter Rprop step sizes.
pub const RPROP_STEP_MIN: f64 = 1e-6;

/// Upper bound on per-parameter Rprop step sizes.
pub const RPROP_STEP_MAX: f64 = 50.0;

/// Final multiplier reached by the exponential learning-rate decay over a
/// full training run.
pub const DEFAULT_DECAY_RATE: f64 = 0.1;
