//! Model configuration: estimation method, column names, harmonic orders,
//! and trainer settings.
//!
//! Purpose
//! -------
//! Centralize everything that is fixed at model construction time. A
//! [`ForecastConfig`] is immutable once handed to a model; refitting with
//! different settings means building a new configuration.
//!
//! Conventions
//! -----------
//! - Defaults mirror common usage: columns `"ds"`/`"y"`, harmonic orders
//!   10/5/3 (yearly/monthly/weekly), learning rate 0.01, 1000 iterations.
//! - The builder-style `with_*` methods validate their inputs and return
//!   `ForecastResult<Self>`, so an invalid configuration cannot be
//!   constructed.
//! - [`Method`] parses case-insensitively from the conventional short names
//!   (`"MLE"`, `"MAP"`, `"MAPGamma"`, `"MCMC"`).
use crate::forecast::errors::{ForecastError, ForecastResult};
use std::str::FromStr;

/// Estimation method for the seasonal regression.
///
/// Variants:
/// - `Mle`: unregularized point estimate with Gaussian noise.
/// - `Map`: maximum a posteriori point estimate with Student-T noise.
/// - `MapGamma`: maximum a posteriori point estimate with Gamma noise for
///   strictly positive targets.
/// - `Mcmc`: full Bayesian posterior sampling; declared but not implemented.
///   Every operation gated on a point estimate rejects it with a typed
///   not-implemented error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Mle,
    Map,
    MapGamma,
    Mcmc,
}

impl Method {
    /// Whether this method produces a point estimate that prediction and
    /// seasonality decomposition can consume.
    pub fn is_point_estimate(&self) -> bool {
        !matches!(self, Method::Mcmc)
    }

    /// Short display name used in error messages and status lines.
    pub fn name(&self) -> &'static str {
        match self {
            Method::Mle => "MLE",
            Method::Map => "MAP",
            Method::MapGamma => "MAPGamma",
            Method::Mcmc => "MCMC",
        }
    }

    /// Human-readable description printed when fitting starts.
    pub fn description(&self) -> &'static str {
        match self {
            Method::Mle => "maximum likelihood estimation",
            Method::Map => "maximum a posteriori estimation",
            Method::MapGamma => "maximum a posteriori estimation with Gamma noise",
            Method::Mcmc => "Markov chain Monte Carlo",
        }
    }
}

impl FromStr for Method {
    type Err = ForecastError;

    /// Parse an estimation method from a string (case-insensitive).
    ///
    /// Accepts `"MLE"`, `"MAP"`, `"MAPGamma"`, and `"MCMC"` in any case
    /// variant. Any other value returns [`ForecastError::InvalidMethod`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mle" => Ok(Method::Mle),
            "map" => Ok(Method::Map),
            "mapgamma" => Ok(Method::MapGamma),
            "mcmc" => Ok(Method::Mcmc),
            _ => Err(ForecastError::InvalidMethod {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'MLE', 'MAP', 'MAPGamma' or 'MCMC'.",
            }),
        }
    }
}

/// Immutable model configuration.
///
/// Fields
/// ------
/// - `method`: estimation method, fixed for the model's lifetime.
/// - `time_col` / `target_col`: column labels carried through to rendered
///   forecast tables.
/// - `year_order` / `month_order` / `week_order`: harmonic orders per cycle;
///   the design matrix gets `1 + 2·(year + month + week)` columns.
/// - `learning_rate`: initial Rprop step size.
/// - `max_iter`: fixed trainer iteration budget.
/// - `seed`: optional RNG seed making posterior-predictive sampling
///   reproducible; `None` seeds from entropy.
/// - `verbose`: whether fitting prints the overwritten progress line.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastConfig {
    pub method: Method,
    pub time_col: String,
    pub target_col: String,
    pub year_order: usize,
    pub month_order: usize,
    pub week_order: usize,
    pub learning_rate: f64,
    pub max_iter: usize,
    pub seed: Option<u64>,
    pub verbose: bool,
}

impl ForecastConfig {
    /// Configuration with conventional defaults for the given method.
    pub fn new(method: Method) -> Self {
        ForecastConfig {
            method,
            time_col: "ds".to_string(),
            target_col: "y".to_string(),
            year_order: 10,
            month_order: 5,
            week_order: 3,
            learning_rate: 0.01,
            max_iter: 1000,
            seed: None,
            verbose: true,
        }
    }

    /// Set the harmonic orders per cycle.
    ///
    /// # Errors
    /// - [`ForecastError::InvalidOrder`] if any order is zero.
    pub fn with_orders(
        mut self, year_order: usize, month_order: usize, week_order: usize,
    ) -> ForecastResult<Self> {
        for (cycle, order) in
            [("yearly", year_order), ("monthly", month_order), ("weekly", week_order)]
        {
            if order == 0 {
                return Err(ForecastError::InvalidOrder { cycle, order });
            }
        }
        self.year_order = year_order;
        self.month_order = month_order;
        self.week_order = week_order;
        Ok(self)
    }

    /// Set the initial learning rate.
    ///
    /// # Errors
    /// - Wrapped [`SviError::InvalidLearningRate`] for non-finite or
    ///   non-positive rates.
    ///
    /// [`SviError::InvalidLearningRate`]: crate::svi::errors::SviError
    pub fn with_learning_rate(mut self, learning_rate: f64) -> ForecastResult<Self> {
        crate::svi::elbo_optimizer::validation::verify_learning_rate(learning_rate)?;
        self.learning_rate = learning_rate;
        Ok(self)
    }

    /// Set the fixed iteration budget.
    ///
    /// # Errors
    /// - Wrapped [`SviError::InvalidMaxIter`] for a zero budget.
    ///
    /// [`SviError::InvalidMaxIter`]: crate::svi::errors::SviError
    pub fn with_max_iter(mut self, max_iter: usize) -> ForecastResult<Self> {
        if max_iter == 0 {
            return Err(crate::svi::errors::SviError::InvalidMaxIter {
                max_iter,
                reason: "Maximum iterations must be greater than zero.",
            }
            .into());
        }
        self.max_iter = max_iter;
        Ok(self)
    }

    /// Rename the timestamp and target columns used in rendered output.
    pub fn with_columns(mut self, time_col: &str, target_col: &str) -> Self {
        self.time_col = time_col.to_string();
        self.target_col = target_col.to_string();
        self
    }

    /// Fix the RNG seed used for posterior-predictive sampling.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Silence the progress line.
    pub fn quiet(mut self) -> Self {
        self.verbose = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Default values of `ForecastConfig::new`.
    // - Validation in the builder methods.
    // - Method parsing and the point-estimate predicate.
    //
    // They intentionally DO NOT cover:
    // - How configurations drive fitting; that is integration-test territory.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify the documented defaults.
    //
    // Given
    // -----
    // - A fresh configuration for MLE.
    //
    // Expect
    // ------
    // - Columns "ds"/"y", orders 10/5/3, lr 0.01, 1000 iterations, no seed.
    fn new_uses_conventional_defaults() {
        let config = ForecastConfig::new(Method::Mle);
        assert_eq!(config.time_col, "ds");
        assert_eq!(config.target_col, "y");
        assert_eq!(
            (config.year_order, config.month_order, config.week_order),
            (10, 5, 3)
        );
        assert_eq!(config.learning_rate, 0.01);
        assert_eq!(config.max_iter, 1000);
        assert_eq!(config.seed, None);
        assert!(config.verbose);
    }

    #[test]
    // Purpose
    // -------
    // Ensure zero harmonic orders are rejected and name the offending cycle.
    //
    // Given
    // -----
    // - `with_orders(1, 0, 1)`.
    //
    // Expect
    // ------
    // - `InvalidOrder { cycle: "monthly", order: 0 }`.
    fn with_orders_rejects_zero() {
        let err = ForecastConfig::new(Method::Mle).with_orders(1, 0, 1).unwrap_err();
        assert_eq!(err, ForecastError::InvalidOrder { cycle: "monthly", order: 0 });
    }

    #[test]
    // Purpose
    // -------
    // Ensure trainer settings are validated through the builder.
    //
    // Given
    // -----
    // - A negative learning rate and a zero iteration budget.
    //
    // Expect
    // ------
    // - Wrapped trainer errors for both.
    fn trainer_settings_are_validated() {
        assert!(ForecastConfig::new(Method::Mle).with_learning_rate(-1.0).is_err());
        assert!(ForecastConfig::new(Method::Mle).with_max_iter(0).is_err());
        assert!(ForecastConfig::new(Method::Mle).with_learning_rate(0.05).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Verify method parsing accepts case variants and rejects unknown names.
    //
    // Given
    // -----
    // - "mle", "MAP", "mapgamma", "MCMC", and "NUTS".
    //
    // Expect
    // ------
    // - The four known methods parse; "NUTS" fails with `InvalidMethod`.
    fn method_parses_case_insensitively() {
        assert_eq!("mle".parse::<Method>().unwrap(), Method::Mle);
        assert_eq!("MAP".parse::<Method>().unwrap(), Method::Map);
        assert_eq!("mapgamma".parse::<Method>().unwrap(), Method::MapGamma);
        assert_eq!("MCMC".parse::<Method>().unwrap(), Method::Mcmc);
        assert!(matches!(
            "NUTS".parse::<Method>().unwrap_err(),
            ForecastError::InvalidMethod { .. }
        ));
    }

    #[test]
    // Purpose
    // -------
    // Check the point-estimate predicate used to gate predict/decompose.
    //
    // Given
    // -----
    // - All four methods.
    //
    // Expect
    // ------
    // - Only MCMC is not a point estimate.
    fn point_estimate_predicate_excludes_mcmc() {
        assert!(Method::Mle.is_point_estimate());
        assert!(Method::Map.is_point_estimate());
        assert!(Method::MapGamma.is_point_estimate());
        assert!(!Method::Mcmc.is_point_estimate());
    }
}
