//! Post-fit inference: posterior-predictive forecasting and seasonality
//! decomposition over a fitted model's parameter store.

pub mod predictive;
pub mod seasonality;

pub use predictive::{PredictiveSummary, credible_interval, sample_predictive};
pub use seasonality::{SeasonalCurve, decompose};
