//! Variational guides for point estimation.
//!
//! A guide pairs with a model variant to define what the trainer actually
//! optimizes and where the fitted values land in the parameter store:
//!
//! - [`Guide::Noop`] — the empty guide used with the MLE variant, whose
//!   parameters are free rather than sampled; fitted values are stored under
//!   their base names.
//! - [`Guide::Delta`] — the point-mass guide used with the MAP-family
//!   variants: every latent collapses to a single point, the ELBO reduces
//!   to the log joint at that point, and fitted values are stored under a
//!   `"delta."`-prefixed namespace.
//!
//! Keeping the naming here, next to the pairing, is what lets the predictor
//! and decomposer resolve the coefficient vector for either method without
//! string matching against feature names.
use crate::forecast::{
    core::{config::Method, params::ParamStore},
    errors::ForecastResult,
    models::regression::RegressionModel,
};
use crate::svi::elbo_optimizer::types::Theta;

/// Point-estimation guide paired with a model variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guide {
    /// Empty guide: nothing is sampled, parameters are free (MLE).
    Noop,
    /// Point-mass guide: latents collapse to optimized points (MAP family).
    Delta,
}

impl Guide {
    /// The guide conventionally paired with each estimation method.
    pub fn for_method(method: Method) -> Guide {
        match method {
            Method::Mle => Guide::Noop,
            _ => Guide::Delta,
        }
    }

    /// Store name for a parameter with the given base name.
    ///
    /// The Delta guide namespaces its optimized points, mirroring how
    /// auto-generated point guides name the parameters they own.
    pub fn param_name(&self, base: &str) -> String {
        match self {
            Guide::Noop => base.to_string(),
            Guide::Delta => format!("delta.{base}"),
        }
    }

    /// Write the constrained parameters at `theta` into `store` under this
    /// guide's names. The store is cleared first, so exactly one fit's
    /// parameters are ever live.
    ///
    /// # Errors
    /// - Propagates layout errors from
    ///   [`RegressionModel::constrained_params`].
    pub fn materialize(
        &self, model: &RegressionModel, theta: &Theta, store: &mut ParamStore,
    ) -> ForecastResult<()> {
        let params = model.constrained_params(theta)?;
        store.clear();
        for (base, value) in params {
            let name = self.param_name(base);
            match value {
                crate::forecast::core::params::ParamValue::Scalar(v) => {
                    store.insert_scalar(&name, v)
                }
                crate::forecast::core::params::ParamValue::Vector(v) => {
                    store.insert_vector(&name, v)
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::models::regression::ModelKind;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Method-to-guide pairing and the naming convention.
    // - Materialization of a trained θ into the store under guide names.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Pin the conventional pairing and the Delta prefix.
    //
    // Given
    // -----
    // - All four methods and the base name "betas".
    //
    // Expect
    // ------
    // - MLE pairs with Noop and keeps bare names; the rest pair with Delta
    //   and gain the "delta." prefix.
    fn pairing_and_naming_follow_method() {
        assert_eq!(Guide::for_method(Method::Mle), Guide::Noop);
        assert_eq!(Guide::for_method(Method::Map), Guide::Delta);
        assert_eq!(Guide::for_method(Method::MapGamma), Guide::Delta);
        assert_eq!(Guide::Noop.param_name("betas"), "betas");
        assert_eq!(Guide::Delta.param_name("betas"), "delta.betas");
    }

    #[test]
    // Purpose
    // -------
    // Verify materialization writes every parameter under the guide's names
    // and clears whatever was stored before.
    //
    // Given
    // -----
    // - A two-feature MAP model, θ = (0.1, 0.2, 0.0, 0.0), and a store
    //   pre-populated with a stale entry.
    //
    // Expect
    // ------
    // - The stale entry is gone; "delta.betas", "delta.sigma", and
    //   "delta.df" are present; the coefficient vector reads back exactly.
    fn materialize_writes_prefixed_names() {
        let model = RegressionModel::new(ModelKind::Map, 2);
        let mut store = ParamStore::new();
        store.insert_scalar("stale", 9.9);

        let guide = Guide::for_method(Method::Map);
        guide.materialize(&model, &array![0.1, 0.2, 0.0, 0.0], &mut store).unwrap();

        assert!(store.scalar("stale").is_err());
        assert_eq!(store.vector("delta.betas").unwrap(), &array![0.1, 0.2]);
        assert!(store.scalar("delta.sigma").is_ok());
        assert!(store.scalar("delta.df").is_ok());
        assert_eq!(store.len(), 3);
    }
}
