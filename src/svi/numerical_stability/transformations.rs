//! Numerical stability utilities.
//!
//! Provides safe implementations of common nonlinear transforms
//! that are prone to overflow/underflow in naïve form.
//! The functions here follow guarded strategies similar to those
//! in major ML libraries (e.g. PyTorch, TensorFlow), using explicit
//! cutoffs (`x > 20.0`) to keep `f64` arithmetic in a well-conditioned regime.
//!
//! # Provided items
//! - [`MEAN_FLOOR`]: a small ε floor applied to conditional means that feed
//!   strictly-positive distribution parameters (Gamma shape/rate).
//! - [`safe_softplus(x)`]: stable version of `ln(1 + exp(x))`,
//!   mapping ℝ → (0, ∞) without overflow.
//! - [`safe_softplus_inv(x)`]: inverse of softplus, mapping
//!   (0, ∞) → ℝ without catastrophic cancellation.
//! - [`safe_logistic(x)`]: stable logistic sigmoid, the derivative of
//!   softplus, used to chain gradients through positivity constraints.
//!
//! # Rationale
//! Unconstrained optimizers work on all of ℝ, while noise scales, degrees of
//! freedom, and rate parameters must stay strictly positive. Softplus is the
//! bridge between the two spaces; the logistic is its derivative.

/// Floor for conditional means that parameterize strictly-positive
/// distributions.
///
/// The Gamma-noise model computes `shape = mean * rate`; a non-positive mean
/// would produce an invalid shape, so the mean is clamped to this floor
/// before use. Clamping is a stability policy, not an error path.
pub const MEAN_FLOOR: f64 = f64::EPSILON;

/// Numerically stable softplus: `softplus(x) = ln(1 + exp(x))`.
///
/// Computes softplus without overflow for large positive `x` and
/// with good precision for large negative `x`. This implementation
/// uses a simple piecewise guard:
///
/// - For sufficiently large `x`, `softplus(x) ≈ x + ln1p(exp(-x)) ≈ x`.
/// - Otherwise, it falls back to `ln1p(exp(x))`.
///
/// The cutoff used here (`x > 20.0`) is a practical threshold that
/// keeps the calculation in a well-conditioned regime for `f64`
/// (similar to the strategy used in common ML libraries like PyTorch).
///
/// # Parameters
/// - `x`: real input
///
/// # Returns
/// - `softplus(x)` as `f64`.
pub fn safe_softplus(x: f64) -> f64 {
    if x > 20.0 { x } else { x.exp().ln_1p() }
}

/// Stable inverse of softplus on `(0, ∞)`: solves for `t` in
/// `softplus(t) = x`, returning `t = ln(exp(x) - 1)`.
///
/// Direct evaluation of `ln(exp(x) - 1)` can overflow or lose precision.
/// This implementation mirrors the guarded strategy of `safe_softplus`:
///
/// - For sufficiently large `x`, `exp(-x)` is tiny and
///   `ln(exp(x) - 1) ≈ x + ln(1 - exp(-x)) ≈ x`.
/// - Otherwise, it uses `ln(expm1(x))`.
///
/// The cutoff (`x > 20.0`) is chosen for numerical robustness with `f64`.
///
/// # Parameters
/// - `x`: a positive real (the softplus output), must be finite and `> 0`.
///
/// # Returns
/// - `t` such that `softplus(t) = x`.
pub fn safe_softplus_inv(x: f64) -> f64 {
    if x > 20.0 { x } else { x.exp_m1().ln() }
}

/// Numerically stable logistic sigmoid `σ(x) = 1 / (1 + exp(-x))`.
///
/// Evaluated branch-wise so that `exp` is only ever taken of a non-positive
/// argument, avoiding overflow on either tail. `σ` is the derivative of
/// softplus, so this is the chain-rule factor for any parameter constrained
/// positive via [`safe_softplus`].
///
/// # Parameters
/// - `x`: real input
///
/// # Returns
/// - `σ(x)` in `(0, 1)`.
pub fn safe_logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Round-tripping softplus with its inverse across small and large inputs.
    // - Overflow behavior of softplus and the logistic on extreme arguments.
    // - The logistic being the numerical derivative of softplus.
    //
    // They intentionally DO NOT cover:
    // - Usage of these transforms inside model gradients; that is exercised by
    //   the regression-model tests.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that `safe_softplus_inv` inverts `safe_softplus` to high accuracy
    // on both sides of the piecewise cutoff.
    //
    // Given
    // -----
    // - Inputs spanning negative, small positive, and beyond-cutoff values.
    //
    // Expect
    // ------
    // - `safe_softplus_inv(safe_softplus(x))` matches `x` within 1e-9.
    fn softplus_roundtrips_with_inverse() {
        for &x in &[-5.0, -0.5, 0.0, 0.3, 1.0, 4.0, 25.0, 100.0] {
            let roundtrip = safe_softplus_inv(safe_softplus(x));
            assert!((roundtrip - x).abs() < 1e-9, "roundtrip failed for {x}: got {roundtrip}");
        }
    }

    #[test]
    // Purpose
    // -------
    // Ensure neither transform overflows on extreme arguments.
    //
    // Given
    // -----
    // - Very large positive and very large negative inputs.
    //
    // Expect
    // ------
    // - `safe_softplus` stays finite and positive; `safe_logistic` stays in
    //   [0, 1] and is finite.
    fn transforms_are_finite_on_extremes() {
        assert!(safe_softplus(1e6).is_finite());
        assert!(safe_softplus(-1e6) >= 0.0);
        assert!(safe_logistic(1e6).is_finite());
        assert!(safe_logistic(-1e6) >= 0.0);
        assert!(safe_logistic(1e6) <= 1.0);
    }

    #[test]
    // Purpose
    // -------
    // Check that the logistic matches the central-difference derivative of
    // softplus at a handful of points.
    //
    // Given
    // -----
    // - Points away from the cutoff with step h = 1e-6.
    //
    // Expect
    // ------
    // - |σ(x) - (softplus(x+h) - softplus(x-h)) / 2h| < 1e-5.
    fn logistic_is_softplus_derivative() {
        let h = 1e-6;
        for &x in &[-3.0, -1.0, 0.0, 0.7, 2.5] {
            let fd = (safe_softplus(x + h) - safe_softplus(x - h)) / (2.0 * h);
            assert!((safe_logistic(x) - fd).abs() < 1e-5);
        }
    }
}
