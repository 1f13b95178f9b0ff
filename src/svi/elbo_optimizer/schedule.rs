//! Exponential learning-rate decay for the Rprop trainer.
//!
//! The schedule multiplies the applied step by `gamma^(t / total)`, so the
//! effective rate anneals smoothly from 1 at the first iteration to `gamma`
//! at the end of the fixed budget. There is no warm restart and no
//! plateau detection; the decay is purely a function of the iteration index.
use crate::svi::{elbo_optimizer::validation::verify_decay_rate, errors::{SviError, SviResult}};

/// Exponential decay over a fixed iteration budget.
///
/// `factor(t) = gamma^(t / total_steps)`, monotone non-increasing in `t`,
/// equal to 1 at `t = 0` and to `gamma` at `t = total_steps`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialDecay {
    gamma: f64,
    total_steps: usize,
}

impl ExponentialDecay {
    /// Construct a validated schedule.
    ///
    /// # Errors
    /// - [`SviError::InvalidDecayRate`] if `gamma` is outside (0, 1].
    /// - [`SviError::InvalidMaxIter`] if `total_steps` is zero.
    pub fn new(gamma: f64, total_steps: usize) -> SviResult<Self> {
        verify_decay_rate(gamma)?;
        if total_steps == 0 {
            return Err(SviError::InvalidMaxIter {
                max_iter: total_steps,
                reason: "Schedule length must be greater than zero.",
            });
        }
        Ok(Self { gamma, total_steps })
    }

    /// Multiplier applied to the step at iteration `step`.
    ///
    /// Steps beyond the configured budget saturate at `gamma`.
    pub fn factor(&self, step: u64) -> f64 {
        let progress = (step as f64 / self.total_steps as f64).min(1.0);
        self.gamma.powf(progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Endpoint values and monotonicity of the decay factor.
    // - Saturation past the configured budget.
    // - Construction validation.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify the factor starts at 1, ends at gamma, and never increases.
    //
    // Given
    // -----
    // - gamma = 0.1 over 100 steps.
    //
    // Expect
    // ------
    // - factor(0) = 1, factor(100) = 0.1, factor decreasing in between, and
    //   factor(1000) still 0.1.
    fn factor_decays_from_one_to_gamma() {
        let schedule = ExponentialDecay::new(0.1, 100).unwrap();
        assert!((schedule.factor(0) - 1.0).abs() < 1e-12);
        assert!((schedule.factor(100) - 0.1).abs() < 1e-12);
        let mut prev = f64::INFINITY;
        for step in 0..=100 {
            let f = schedule.factor(step);
            assert!(f <= prev);
            prev = f;
        }
        assert!((schedule.factor(1000) - 0.1).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Ensure invalid construction inputs are rejected.
    //
    // Given
    // -----
    // - gamma out of range, and a zero-length schedule.
    //
    // Expect
    // ------
    // - `InvalidDecayRate` and `InvalidMaxIter` respectively.
    fn new_rejects_invalid_inputs() {
        assert!(matches!(
            ExponentialDecay::new(0.0, 100).unwrap_err(),
            SviError::InvalidDecayRate { .. }
        ));
        assert!(matches!(
            ExponentialDecay::new(0.1, 0).unwrap_err(),
            SviError::InvalidMaxIter { .. }
        ));
    }
}
