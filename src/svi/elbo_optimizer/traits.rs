//! Public API surface for ELBO minimization.
//!
//! - [`Elbo`]: trait model variants implement for their variational objective.
//! - [`SviOptions`]: configuration for the trainer.
//! - [`SviOutcome`]: normalized result returned by the high-level `train` API.
//!
//! Convention: a model/guide pair exposes the evidence lower bound `ELBO(θ)`;
//! the trainer *minimizes* the loss `c(θ) = -ELBO(θ)`. If an analytic gradient
//! is provided, it should be the gradient of the ELBO (`∇ELBO(θ)`); the
//! adapter flips the sign as needed. For the point-mass guides used by this
//! crate the ELBO reduces to the log joint density evaluated at `θ`.
use crate::svi::{
    elbo_optimizer::{
        types::{Cost, DEFAULT_DECAY_RATE, FnEvalMap, Grad, Theta},
        validation::{validate_theta_hat, validate_value, verify_decay_rate, verify_learning_rate},
    },
    errors::{SviError, SviResult},
};
use argmin::core::TerminationStatus;

/// Model-implemented variational objective.
///
/// You expose `ELBO(θ)`; internally the trainer minimizes the loss
/// `c(θ) = -ELBO(θ)`. If you provide an analytic gradient, return the
/// gradient of the ELBO `∇ELBO(θ)` (the adapter flips the sign to match the
/// loss).
///
/// - `type Data`: per-model data carried into `value`/`grad`/`check`.
///
/// Required:
/// - `value(&Theta, &Data) -> SviResult<Cost>`: evaluate `ELBO(θ)`.
/// - `check(&Theta, &Data) -> SviResult<()>`: validation hook to reject
///   obviously invalid `θ`/`data` pairs. Called once before training.
/// - `batch_size(&Data) -> usize`: number of observations in the batch; the
///   reported per-step loss is normalized by this count.
///
/// Optional:
/// - `grad(&Theta, &Data) -> SviResult<Grad>`: analytic gradient `∇ELBO(θ)`.
///   If not implemented, robust finite differences are used automatically.
pub trait Elbo {
    type Data: 'static;

    // Required methods
    fn value(&self, theta: &Theta, data: &Self::Data) -> SviResult<Cost>;
    fn check(&self, theta: &Theta, data: &Self::Data) -> SviResult<()>;
    fn batch_size(&self, data: &Self::Data) -> usize;

    // Optional methods
    fn grad(&self, _theta: &Theta, _data: &Self::Data) -> SviResult<Grad> {
        Err(SviError::GradientNotImplemented)
    }
}

/// Trainer-level configuration.
///
/// Fields:
/// - `learning_rate: f64` — initial per-parameter Rprop step size.
/// - `max_iter: usize` — fixed iteration budget; the only termination
///   criterion (no convergence-based early stop).
/// - `decay_rate: f64` — final multiplier of the exponential learning-rate
///   decay reached at the end of the budget.
/// - `verbose: bool` — if `true`, attaches the progress observer and prints
///   an overwritten status line.
#[derive(Debug, Clone, PartialEq)]
pub struct SviOptions {
    pub learning_rate: f64,
    pub max_iter: usize,
    pub decay_rate: f64,
    pub verbose: bool,
}

impl SviOptions {
    /// Create a validated set of trainer options.
    ///
    /// # Errors
    /// - [`SviError::InvalidLearningRate`] for non-finite or non-positive
    ///   learning rates.
    /// - [`SviError::InvalidMaxIter`] for a zero iteration budget.
    /// - [`SviError::InvalidDecayRate`] for decay rates outside (0, 1].
    pub fn new(
        learning_rate: f64, max_iter: usize, decay_rate: f64, verbose: bool,
    ) -> SviResult<Self> {
        verify_learning_rate(learning_rate)?;
        if max_iter == 0 {
            return Err(SviError::InvalidMaxIter {
                max_iter,
                reason: "Maximum iterations must be greater than zero.",
            });
        }
        verify_decay_rate(decay_rate)?;
        Ok(Self { learning_rate, max_iter, decay_rate, verbose })
    }

    /// Number of iterations between progress reports:
    /// `max(max_iter / 10_000, 10)`.
    pub fn print_interval(&self) -> usize {
        (self.max_iter / 10_000).max(10)
    }
}

impl Default for SviOptions {
    fn default() -> Self {
        Self { learning_rate: 0.01, max_iter: 1000, decay_rate: DEFAULT_DECAY_RATE, verbose: false }
    }
}

/// Canonical result returned by `train`.
///
/// - `theta_hat`: best unconstrained parameter vector found.
/// - `elbo`: best **ELBO** value (not the loss).
/// - `converged`: `true` if the solver reported a terminating status other
///   than `NotTerminated`; with a fixed budget this normally means the
///   iteration limit was reached.
/// - `status`: human-readable termination status string.
/// - `iterations`: number of optimizer iterations performed.
/// - `fn_evals`: function-evaluation counters reported by `argmin`
///   (e.g. cost_count, gradient_count).
#[derive(Debug, Clone, PartialEq)]
pub struct SviOutcome {
    pub theta_hat: Theta,
    pub elbo: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
}

impl SviOutcome {
    /// Build a validated [`SviOutcome`] from raw solver state.
    ///
    /// Performs:
    /// - `theta_hat` check via `validate_theta_hat` (present and all finite).
    /// - `elbo` check via `validate_value` (finite).
    /// - Maps `TerminationStatus` into `(converged, status)`.
    ///
    /// # Errors
    /// - Propagates any validation errors for `theta_hat` or `elbo`.
    pub fn new(
        theta_hat_opt: Option<Theta>, elbo: f64, converged: TerminationStatus, iterations: u64,
        fn_evals: FnEvalMap,
    ) -> SviResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat_opt)?;
        validate_value(elbo)?;
        let status: String;
        let converged = match converged {
            TerminationStatus::NotTerminated => {
                status = "Not terminated".to_string();
                false
            }
            _ => {
                status = format!("{converged:?}");
                true
            }
        };
        let iterations = iterations as usize;
        Ok(Self { theta_hat, elbo, converged, status, iterations, fn_evals })
    }
}
