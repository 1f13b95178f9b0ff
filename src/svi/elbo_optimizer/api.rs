//! High-level entry point for training a model/guide pair by stochastic
//! variational inference.
//!
//! This validates the starting point via the model's `check` hook, wraps the
//! model in an [`SviAdapter`] (which *minimizes* `-ELBO(θ)`), builds the
//! Rprop solver with its exponential step decay, and delegates the run to
//! `run_rprop`.
use crate::svi::{
    elbo_optimizer::{
        Theta,
        adapter::SviAdapter,
        run::run_rprop,
        rprop::Rprop,
        schedule::ExponentialDecay,
        traits::{Elbo, SviOptions, SviOutcome},
    },
    errors::SviResult,
};

/// Train a variational objective `ELBO(θ)` with Rprop and exponential decay.
///
/// # Behavior
/// - Validates the initial guess via `f.check(theta0, data)`.
/// - Wraps `(f, data)` in an [`SviAdapter`] that exposes a *minimization*
///   problem `c(θ) = -ELBO(θ)` to `argmin`.
/// - Builds an [`ExponentialDecay`] over the fixed budget and an [`Rprop`]
///   solver seeded with the configured learning rate.
/// - Calls `run_rprop`, which configures the executor (initial params, max
///   iters, optional progress observer) and returns an [`SviOutcome`].
/// - Runs the full iteration budget; there is no convergence-based early
///   stop and no divergence detection.
///
/// # Parameters
/// - `f`: Your model implementing [`Elbo`].
/// - `theta0`: Initial unconstrained parameter vector (consumed).
/// - `data`: Model data passed through to `value`/`grad`.
/// - `opts`: Trainer options (learning rate, budget, decay, verbosity).
///
/// # Errors
/// - Propagates any error from `f.check`.
/// - Propagates construction errors from the schedule or solver.
/// - Propagates runtime errors from `run_rprop`.
///
/// # Returns
/// An [`SviOutcome`] containing `theta_hat`, the best ELBO value,
/// termination status, and iteration/function-evaluation counts.
pub fn train<F: Elbo>(
    f: &F, theta0: Theta, data: &F::Data, opts: &SviOptions,
) -> SviResult<SviOutcome> {
    f.check(&theta0, data)?;
    let batch_size = f.batch_size(data);
    let problem = SviAdapter::new(f, data);
    let schedule = ExponentialDecay::new(opts.decay_rate, opts.max_iter)?;
    let solver = Rprop::new(opts.learning_rate, schedule)?;
    run_rprop(theta0, opts, batch_size, problem, solver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svi::{
        elbo_optimizer::types::Grad,
        errors::{SviError, SviResult},
    };
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - A full Rprop run on a smooth objective with a known optimum, through
    //   the adapter, schedule, solver, and runner.
    // - The finite-difference path end to end (no analytic gradient).
    // - Propagation of `check` failures before any optimization happens.
    //
    // They intentionally DO NOT cover:
    // - Regression-model objectives; those live with the model family tests.
    // -------------------------------------------------------------------------

    // ELBO(θ) = -Σ (θᵢ - cᵢ)², maximized exactly at θ = c.
    struct ShiftedQuadratic {
        center: Vec<f64>,
        analytic: bool,
    }

    impl Elbo for ShiftedQuadratic {
        type Data = ();

        fn value(&self, theta: &Theta, _data: &()) -> SviResult<f64> {
            let mut total = 0.0;
            for (i, &c) in self.center.iter().enumerate() {
                total -= (theta[i] - c).powi(2);
            }
            Ok(total)
        }

        fn check(&self, theta: &Theta, _data: &()) -> SviResult<()> {
            if theta.len() != self.center.len() {
                return Err(SviError::ThetaLengthMismatch {
                    expected: self.center.len(),
                    actual: theta.len(),
                });
            }
            Ok(())
        }

        fn batch_size(&self, _data: &()) -> usize {
            self.center.len()
        }

        fn grad(&self, theta: &Theta, _data: &()) -> SviResult<Grad> {
            if !self.analytic {
                return Err(SviError::GradientNotImplemented);
            }
            let mut grad = Grad::zeros(theta.len());
            for (i, &c) in self.center.iter().enumerate() {
                grad[i] = -2.0 * (theta[i] - c);
            }
            Ok(grad)
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify that a full training run locates the optimum of a shifted
    // quadratic within the fixed budget.
    //
    // Given
    // -----
    // - Center (3, -2), analytic gradient, lr 0.05, 300 iterations.
    //
    // Expect
    // ------
    // - theta_hat within 0.05 of the center in every coordinate, and the run
    //   reported as terminated.
    fn train_recovers_quadratic_optimum() {
        let f = ShiftedQuadratic { center: vec![3.0, -2.0], analytic: true };
        let opts = SviOptions::new(0.05, 300, 0.1, false).unwrap();
        let outcome = train(&f, array![0.0, 0.0], &(), &opts).unwrap();
        assert!(outcome.converged, "run should report a terminated status");
        assert!((outcome.theta_hat[0] - 3.0).abs() < 0.05, "got {}", outcome.theta_hat[0]);
        assert!((outcome.theta_hat[1] + 2.0).abs() < 0.05, "got {}", outcome.theta_hat[1]);
    }

    #[test]
    // Purpose
    // -------
    // Exercise the finite-difference gradient path end to end.
    //
    // Given
    // -----
    // - The same quadratic with `analytic = false`.
    //
    // Expect
    // ------
    // - The optimum is still recovered within 0.05 per coordinate.
    fn train_works_without_analytic_gradient() {
        let f = ShiftedQuadratic { center: vec![1.5, 0.5], analytic: false };
        let opts = SviOptions::new(0.05, 300, 0.1, false).unwrap();
        let outcome = train(&f, array![0.0, 0.0], &(), &opts).unwrap();
        assert!((outcome.theta_hat[0] - 1.5).abs() < 0.05);
        assert!((outcome.theta_hat[1] - 0.5).abs() < 0.05);
    }

    #[test]
    // Purpose
    // -------
    // Ensure a failing `check` aborts training before any iteration.
    //
    // Given
    // -----
    // - A three-dimensional starting point against a two-dimensional model.
    //
    // Expect
    // ------
    // - `ThetaLengthMismatch { expected: 2, actual: 3 }`.
    fn train_propagates_check_failure() {
        let f = ShiftedQuadratic { center: vec![1.0, 2.0], analytic: true };
        let opts = SviOptions::new(0.05, 50, 0.1, false).unwrap();
        let err = train(&f, array![0.0, 0.0, 0.0], &(), &opts).unwrap_err();
        assert_eq!(err, SviError::ThetaLengthMismatch { expected: 2, actual: 3 });
    }
}
