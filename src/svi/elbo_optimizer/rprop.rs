//! Resilient backpropagation (Rprop) solver with scheduled step decay.
//!
//! Rprop adapts one step size per parameter from the *sign* of successive
//! gradients and ignores gradient magnitude entirely, which makes it robust
//! for variational objectives whose scale is unknown a priori. The update
//! rule follows the common sign-based variant:
//!
//! - same gradient sign as last step: grow the step size by η⁺ (capped);
//! - sign flip: shrink the step size by η⁻ (floored) and skip the move for
//!   that coordinate this iteration;
//! - move each coordinate against the gradient sign by its step size, scaled
//!   by the [`ExponentialDecay`] factor for the current iteration.
//!
//! The solver plugs into Argmin's `Executor` so that iteration counting,
//! best-cost tracking, observers, and the max-iteration stop all come from
//! the same machinery the rest of the crate uses.
use crate::svi::{
    elbo_optimizer::{
        schedule::ExponentialDecay,
        types::{Grad, RPROP_ETA_MINUS, RPROP_ETA_PLUS, RPROP_STEP_MAX, RPROP_STEP_MIN, Theta},
        validation::{validate_grad, verify_learning_rate},
    },
    errors::{SviError, SviResult},
};
use argmin::core::{CostFunction, Error, Gradient, IterState, KV, Problem, Solver, State};
use ndarray::Array1;

/// Per-run mutable state: one step size and one previous gradient entry per
/// parameter. Allocated lazily on the first iteration, once the parameter
/// dimension is known.
#[derive(Debug, Clone)]
struct RpropState {
    step_sizes: Array1<f64>,
    prev_grad: Array1<f64>,
}

impl RpropState {
    fn new(dim: usize, initial_step: f64) -> Self {
        Self { step_sizes: Array1::from_elem(dim, initial_step), prev_grad: Array1::zeros(dim) }
    }
}

/// Rprop solver with per-parameter adaptive step sizes.
///
/// `learning_rate` seeds every step size; the growth/shrink factors and the
/// step bounds are the crate constants `RPROP_ETA_PLUS`, `RPROP_ETA_MINUS`,
/// `RPROP_STEP_MIN`, and `RPROP_STEP_MAX`. The attached [`ExponentialDecay`]
/// scales each applied move without touching the adaptive step sizes
/// themselves.
#[derive(Debug, Clone)]
pub struct Rprop {
    learning_rate: f64,
    schedule: ExponentialDecay,
    state: Option<RpropState>,
}

impl Rprop {
    /// Construct a validated Rprop solver.
    ///
    /// # Errors
    /// - [`SviError::InvalidLearningRate`] for non-finite or non-positive
    ///   initial step sizes.
    pub fn new(learning_rate: f64, schedule: ExponentialDecay) -> SviResult<Self> {
        verify_learning_rate(learning_rate)?;
        Ok(Self { learning_rate, schedule, state: None })
    }
}

/// Sign with a genuine zero branch.
///
/// `f64::signum` maps 0.0 to 1.0, which would move a coordinate whose
/// gradient was zeroed after a sign flip; this helper keeps it in place.
fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

impl<O> Solver<O, IterState<Theta, Grad, (), (), (), f64>> for Rprop
where
    O: CostFunction<Param = Theta, Output = f64> + Gradient<Param = Theta, Gradient = Grad>,
{
    const NAME: &'static str = "Rprop";

    /// One Rprop iteration.
    ///
    /// # Steps
    /// 1. Take the current parameter vector and evaluate the loss gradient.
    /// 2. Compare gradient signs against the previous iteration and adapt the
    ///    per-parameter step sizes.
    /// 3. Move each coordinate against its gradient sign, scaled by the decay
    ///    factor for this iteration.
    /// 4. Evaluate the loss at the new parameters so the executor can track
    ///    the best point.
    ///
    /// # Errors
    /// - Propagates loss/gradient evaluation failures from the problem.
    /// - Returns [`SviError::NotInitialized`] if the executor was not given
    ///   an initial parameter vector.
    fn next_iter(
        &mut self, problem: &mut Problem<O>,
        mut state: IterState<Theta, Grad, (), (), (), f64>,
    ) -> Result<(IterState<Theta, Grad, (), (), (), f64>, Option<KV>), Error> {
        let mut param = state.take_param().ok_or_else(|| SviError::NotInitialized {
            text: "Rprop requires an initial parameter vector.".to_string(),
        })?;
        let mut grad = problem.gradient(&param)?;
        validate_grad(&grad, param.len()).map_err(Error::from)?;

        let rprop_state =
            self.state.get_or_insert_with(|| RpropState::new(param.len(), self.learning_rate));
        if rprop_state.step_sizes.len() != param.len() {
            return Err(SviError::GradientDimMismatch {
                expected: rprop_state.step_sizes.len(),
                found: param.len(),
            }
            .into());
        }

        let scale = self.schedule.factor(state.get_iter());
        for i in 0..param.len() {
            let sign_product = grad[i] * rprop_state.prev_grad[i];
            if sign_product > 0.0 {
                rprop_state.step_sizes[i] =
                    (rprop_state.step_sizes[i] * RPROP_ETA_PLUS).min(RPROP_STEP_MAX);
            } else if sign_product < 0.0 {
                rprop_state.step_sizes[i] =
                    (rprop_state.step_sizes[i] * RPROP_ETA_MINUS).max(RPROP_STEP_MIN);
                grad[i] = 0.0;
            }
            param[i] -= sign(grad[i]) * rprop_state.step_sizes[i] * scale;
            rprop_state.prev_grad[i] = grad[i];
        }

        let cost = problem.cost(&param)?;
        Ok((state.param(param).cost(cost), None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Construction validation of the solver.
    // - The zero-aware sign helper.
    //
    // They intentionally DO NOT cover:
    // - Full optimization runs; those live in the api-level tests where the
    //   executor, adapter, and schedule are wired together.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify construction rejects non-positive initial step sizes.
    //
    // Given
    // -----
    // - A valid schedule and learning rates 0.05 and 0.0.
    //
    // Expect
    // ------
    // - Ok for 0.05; `InvalidLearningRate` for 0.0.
    fn new_validates_learning_rate() {
        let schedule = ExponentialDecay::new(0.1, 100).unwrap();
        assert!(Rprop::new(0.05, schedule).is_ok());
        assert!(matches!(
            Rprop::new(0.0, schedule).unwrap_err(),
            SviError::InvalidLearningRate { .. }
        ));
    }

    #[test]
    // Purpose
    // -------
    // Ensure the sign helper treats zero as zero, unlike `f64::signum`.
    //
    // Given
    // -----
    // - Positive, negative, and exactly-zero inputs.
    //
    // Expect
    // ------
    // - 1.0, -1.0, and 0.0 respectively.
    fn sign_treats_zero_as_zero() {
        assert_eq!(sign(3.2), 1.0);
        assert_eq!(sign(-0.1), -1.0);
        assert_eq!(sign(0.0), 0.0);
    }
}
