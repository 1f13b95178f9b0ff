//! seasonal_forecast — decomposable calendar-seasonal time-series
//! forecasting.
//!
//! Purpose
//! -------
//! Regress a timestamped target on a deterministic harmonic basis derived
//! from the calendar (yearly, monthly, and weekly cycles), fit the
//! regression as a point estimate through a variational objective, and read
//! the fit back out as forecasts with credible intervals and per-cycle
//! seasonal curves.
//!
//! Key behaviors
//! -------------
//! - [`TimeSeries`] validates timestamped observations once, at the
//!   boundary; everything downstream relies on its invariants.
//! - [`DesignMatrix`] turns timestamps into a tagged harmonic feature
//!   matrix whose column layout is snapshotted at fit time and verified at
//!   predict/decompose time.
//! - [`SeasonalModel`] pairs a regression variant (Gaussian MLE, Student-T
//!   MAP, or Gamma-noise MAP) with its guide, trains it with Rprop under an
//!   exponential step decay, and owns the resulting [`ParamStore`].
//! - The `posterior` module samples the fitted observation site for
//!   uncertainty intervals and reconstructs seasonal curves from the
//!   fitted coefficients.
//!
//! Invariants & assumptions
//! ------------------------
//! - Execution is synchronous and single-threaded; a training run blocks
//!   until its fixed iteration budget completes.
//! - Each model instance owns its fitted state; fitting one model never
//!   affects another.
//! - Methods outside the implemented set (MCMC) and trend extraction fail
//!   with typed not-implemented errors rather than guessing.
//!
//! Downstream usage
//! ----------------
//! ```no_run
//! use ndarray::Array1;
//! use seasonal_forecast::{ForecastConfig, Frequency, Method, SeasonalModel, TimeSeries};
//!
//! # fn main() -> Result<(), seasonal_forecast::ForecastError> {
//! # let (timestamps, values): (Vec<chrono::NaiveDateTime>, Array1<f64>) = (vec![], Array1::zeros(0));
//! let history = TimeSeries::new(timestamps, values)?;
//! let config = ForecastConfig::new(Method::Mle).with_orders(10, 5, 3)?.with_seed(42);
//! let mut model = SeasonalModel::new(config);
//! model.fit(&history)?;
//!
//! let future = model.make_future_series(30, Frequency::Daily, true)?;
//! let forecast = model.predict(&future, 100, 0.95)?;
//! let weekly = model.weekly_seasonality()?;
//! println!("{forecast}\n{weekly}");
//! # Ok(())
//! # }
//! ```

pub mod forecast;
pub mod posterior;
pub mod svi;

pub use forecast::{
    core::{
        config::{ForecastConfig, Method},
        features::{CycleKind, DesignMatrix, FeatureTag, Phase},
        params::{ParamStore, ParamValue},
        series::{Frequency, TimeSeries},
    },
    errors::{ForecastError, ForecastResult},
    models::{
        guide::Guide,
        regression::{DesignData, ModelKind, RegressionModel},
        seasonal::{Forecast, SeasonalModel},
    },
};
pub use posterior::{PredictiveSummary, SeasonalCurve};
pub use svi::elbo_optimizer::{Elbo, SviOptions, SviOutcome};
