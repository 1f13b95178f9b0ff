//! The user-facing seasonal forecasting model.
//!
//! Purpose
//! -------
//! Tie the pipeline together: harmonic features over a validated series, a
//! regression variant trained by stochastic variational inference, fitted
//! parameters in an instance-owned store, and posterior-predictive
//! forecasting plus per-cycle seasonality decomposition on top.
//!
//! Key behaviors
//! -------------
//! - `fit` recomputes the design matrix fresh from raw timestamps, clears
//!   the owned parameter store, trains the configured variant, and snapshots
//!   both the history (to anchor future frames) and the feature layout (to
//!   fail fast on drift at predict/decompose time).
//! - `predict` forward-simulates the fitted model at the observation site
//!   and reduces the samples to a point forecast with rank-selected bounds,
//!   row-aligned with its input.
//! - The seasonality getters rebuild one curve per calendar cycle from the
//!   stored coefficients.
//! - Methods outside the point-estimate set (MCMC), and trend extraction,
//!   are explicit typed not-implemented stubs.
//!
//! Concurrency
//! -----------
//! Everything here is synchronous and single-threaded. Because each model
//! owns its parameter store, fitting two models concurrently is safe at the
//! process level; a single instance is still one-fit-at-a-time by `&mut`.
use crate::{
    forecast::{
        core::{
            config::ForecastConfig,
            features::{CycleKind, DesignMatrix, FeatureTag},
            params::ParamStore,
            series::{Frequency, TimeSeries},
        },
        errors::{ForecastError, ForecastResult},
        models::{
            guide::Guide,
            regression::{DesignData, ModelKind, RegressionModel},
        },
    },
    posterior::{
        predictive::{credible_interval, sample_predictive},
        seasonality::{SeasonalCurve, decompose},
    },
    svi::elbo_optimizer::{SviOptions, SviOutcome, train},
};
use chrono::NaiveDateTime;
use ndarray::Array1;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Forecast table returned by [`SeasonalModel::predict`]: one row per input
/// row, in input order.
///
/// Fields
/// ------
/// - `timestamps`: copied from the input series.
/// - `actual`: the input targets (NaN where unknown).
/// - `yhat` / `yhat_lower` / `yhat_upper`: point forecast and interval
///   bounds.
/// - `time_label` / `target_label`: column headers from the configuration,
///   used when rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub timestamps: Vec<NaiveDateTime>,
    pub actual: Array1<f64>,
    pub yhat: Array1<f64>,
    pub yhat_lower: Array1<f64>,
    pub yhat_upper: Array1<f64>,
    pub time_label: String,
    pub target_label: String,
}

impl Forecast {
    /// Number of forecast rows.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

impl std::fmt::Display for Forecast {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{:>19}  {:>12}  {:>12}  {:>12}  {:>12}",
            self.time_label, self.target_label, "yhat", "yhat_upper", "yhat_lower"
        )?;
        for i in 0..self.len() {
            writeln!(
                f,
                "{:>19}  {:>12.6}  {:>12.6}  {:>12.6}  {:>12.6}",
                self.timestamps[i].format("%Y-%m-%d %H:%M:%S"),
                self.actual[i],
                self.yhat[i],
                self.yhat_upper[i],
                self.yhat_lower[i]
            )?;
        }
        Ok(())
    }
}

/// Decomposable seasonal forecasting model.
///
/// Construct with a [`ForecastConfig`], call [`fit`] on a fully observed
/// history, then [`predict`] / the seasonality getters /
/// [`make_future_series`] as needed. The configuration is immutable for the
/// instance's lifetime.
///
/// [`fit`]: SeasonalModel::fit
/// [`predict`]: SeasonalModel::predict
/// [`make_future_series`]: SeasonalModel::make_future_series
#[derive(Debug, Clone)]
pub struct SeasonalModel {
    config: ForecastConfig,
    params: ParamStore,
    history: Option<TimeSeries>,
    layout: Option<Vec<FeatureTag>>,
    outcome: Option<SviOutcome>,
}

impl SeasonalModel {
    pub fn new(config: ForecastConfig) -> SeasonalModel {
        SeasonalModel { config, params: ParamStore::new(), history: None, layout: None, outcome: None }
    }

    /// The configuration this model was built with.
    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Trainer outcome of the last fit, if any.
    pub fn fit_outcome(&self) -> Option<&SviOutcome> {
        self.outcome.as_ref()
    }

    /// Fitted parameters of the last fit.
    pub fn params(&self) -> &ParamStore {
        &self.params
    }

    /// Fit the configured regression variant to a fully observed history.
    ///
    /// ## Steps
    /// 1. Reject methods without an implemented model (MCMC) and any
    ///    unobserved or (for the Gamma variant) non-positive target.
    /// 2. Build the harmonic design matrix from the raw timestamps.
    /// 3. Clear the owned parameter store, train from the variant's initial
    ///    θ over the fixed iteration budget, and let the paired guide
    ///    materialize the fitted parameters back into the store.
    /// 4. Snapshot the history and the feature layout for later calls.
    ///
    /// # Errors
    /// - [`ForecastError::MethodNotImplemented`] for MCMC.
    /// - [`ForecastError::MissingTarget`] / [`ForecastError::NonPositiveTarget`]
    ///   for invalid training targets.
    /// - Wrapped trainer errors from the optimization run.
    pub fn fit(&mut self, data: &TimeSeries) -> ForecastResult<()> {
        let kind = ModelKind::from_method(self.config.method).ok_or(
            ForecastError::MethodNotImplemented {
                method: self.config.method.name(),
                operation: "fit",
            },
        )?;
        data.require_observed()?;
        if kind == ModelKind::MapGamma {
            for (index, &value) in data.values.iter().enumerate() {
                if value <= 0.0 {
                    return Err(ForecastError::NonPositiveTarget { index, value });
                }
            }
        }

        let design = DesignMatrix::build(
            data,
            self.config.year_order,
            self.config.month_order,
            self.config.week_order,
        )?;
        let model = RegressionModel::new(kind, design.width());
        let train_data = DesignData { x: design.features, y: data.values.clone() };

        if self.config.verbose {
            println!("Employing {}", self.config.method.description());
        }
        let opts = SviOptions::new(
            self.config.learning_rate,
            self.config.max_iter,
            crate::svi::elbo_optimizer::DEFAULT_DECAY_RATE,
            self.config.verbose,
        )?;
        self.params.clear();
        let outcome = train(&model, model.initial_theta(), &train_data, &opts)?;
        let guide = Guide::for_method(self.config.method);
        guide.materialize(&model, &outcome.theta_hat, &mut self.params)?;

        self.history = Some(data.clone());
        self.layout = Some(design.layout);
        self.outcome = Some(outcome);
        Ok(())
    }

    /// Forecast every row of `data` with a credible interval.
    ///
    /// Draws `sample_count` posterior-predictive samples of the observation
    /// site per row and reduces them to `(mean, lower, upper)` at the given
    /// interval mass. Output rows align one-to-one with input rows and carry
    /// the (possibly NaN) input target for downstream comparison.
    ///
    /// # Errors
    /// - [`ForecastError::MethodNotImplemented`] unless the method is a
    ///   point estimate.
    /// - [`ForecastError::NotFitted`] before a successful [`fit`].
    /// - [`ForecastError::LayoutMismatch`] if the rebuilt feature layout
    ///   differs from the fit-time snapshot.
    /// - [`ForecastError::InvalidInterval`] / [`ForecastError::InvalidSampleCount`]
    ///   for out-of-range reduction settings.
    ///
    /// [`fit`]: SeasonalModel::fit
    pub fn predict(
        &self, data: &TimeSeries, sample_count: usize, interval: f64,
    ) -> ForecastResult<Forecast> {
        let kind = ModelKind::from_method(self.config.method).ok_or(
            ForecastError::MethodNotImplemented {
                method: self.config.method.name(),
                operation: "predict",
            },
        )?;
        let layout = self.layout.as_ref().ok_or(ForecastError::NotFitted)?;

        let design = DesignMatrix::build(
            data,
            self.config.year_order,
            self.config.month_order,
            self.config.week_order,
        )?;
        if design.layout != *layout {
            return Err(ForecastError::LayoutMismatch {
                expected: layout.len(),
                actual: design.layout.len(),
            });
        }

        let model = RegressionModel::new(kind, design.width());
        let guide = Guide::for_method(self.config.method);
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let samples = sample_predictive(
            &model,
            &guide,
            &self.params,
            &design.features,
            sample_count,
            &mut rng,
        )?;
        let summary = credible_interval(&samples, interval)?;

        Ok(Forecast {
            timestamps: data.timestamps.clone(),
            actual: data.values.clone(),
            yhat: summary.yhat,
            yhat_lower: summary.yhat_lower,
            yhat_upper: summary.yhat_upper,
            time_label: self.config.time_col.clone(),
            target_label: self.config.target_col.clone(),
        })
    }

    /// Extend the fitted history `periods` steps into the future with NaN
    /// targets, optionally keeping the historical rows.
    ///
    /// # Errors
    /// - [`ForecastError::NotFitted`] before a successful fit.
    /// - Propagates horizon/date-range errors from
    ///   [`TimeSeries::extend_future`].
    pub fn make_future_series(
        &self, periods: usize, frequency: Frequency, include_history: bool,
    ) -> ForecastResult<TimeSeries> {
        let history = self.history.as_ref().ok_or(ForecastError::NotFitted)?;
        history.extend_future(periods, frequency, include_history)
    }

    /// Decomposed weekly seasonality (day index 0 = Monday).
    pub fn weekly_seasonality(&self) -> ForecastResult<SeasonalCurve> {
        self.seasonality(CycleKind::Weekly)
    }

    /// Decomposed monthly seasonality (day index 1-based).
    pub fn monthly_seasonality(&self) -> ForecastResult<SeasonalCurve> {
        self.seasonality(CycleKind::Monthly)
    }

    /// Decomposed yearly seasonality (day index 1-based over a leap year).
    pub fn yearly_seasonality(&self) -> ForecastResult<SeasonalCurve> {
        self.seasonality(CycleKind::Yearly)
    }

    /// Trend extraction is not implemented.
    pub fn trend(&self) -> ForecastResult<SeasonalCurve> {
        Err(ForecastError::NotImplemented { feature: "trend extraction" })
    }

    fn seasonality(&self, cycle: CycleKind) -> ForecastResult<SeasonalCurve> {
        if ModelKind::from_method(self.config.method).is_none() {
            return Err(ForecastError::MethodNotImplemented {
                method: self.config.method.name(),
                operation: "seasonality decomposition",
            });
        }
        let layout = self.layout.as_ref().ok_or(ForecastError::NotFitted)?;
        let guide = Guide::for_method(self.config.method);
        let betas = self.params.vector(&guide.param_name("betas"))?;
        decompose(cycle, betas, layout)
    }
}
