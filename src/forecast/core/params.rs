//! Instance-scoped storage for fitted parameters.
//!
//! Purpose
//! -------
//! Hold the named scalar and vector parameters produced by a fit — the
//! coefficient vector plus the noise/shape parameters — so the predictor and
//! the seasonality decomposer can read them back by name.
//!
//! Key behaviors
//! -------------
//! - Each fitted model owns its [`ParamStore`]; there is no process-wide
//!   state, so fitting one model never disturbs another.
//! - Fitting clears the store before repopulating it, so stale parameters
//!   from a previous fit can never leak into a new one.
//! - Lookups are by exact name and kind; a missing name or a kind mismatch
//!   is a descriptive error, not a silent default.
//!
//! Conventions
//! -----------
//! - Coefficients are stored under `"betas"`, noise scale under `"sigma"`,
//!   degrees of freedom under `"df"`, and the Gamma rate under `"rate"`.
//!   MAP-family methods prefix these with the point guide's `"delta."`
//!   namespace; the guide owns that naming.
use crate::forecast::errors::{ForecastError, ForecastResult};
use ndarray::Array1;
use std::collections::BTreeMap;

/// A single fitted parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Scalar(f64),
    Vector(Array1<f64>),
}

/// Named storage for fitted parameters, owned by one model instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamStore {
    params: BTreeMap<String, ParamValue>,
}

impl ParamStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every stored parameter. Called at the start of each fit.
    pub fn clear(&mut self) {
        self.params.clear();
    }

    /// Store (or overwrite) a scalar parameter.
    pub fn insert_scalar(&mut self, name: &str, value: f64) {
        self.params.insert(name.to_string(), ParamValue::Scalar(value));
    }

    /// Store (or overwrite) a vector parameter.
    pub fn insert_vector(&mut self, name: &str, value: Array1<f64>) {
        self.params.insert(name.to_string(), ParamValue::Vector(value));
    }

    /// Read a scalar parameter by name.
    ///
    /// # Errors
    /// - [`ForecastError::MissingParam`] when no parameter has that name.
    /// - [`ForecastError::ParamKindMismatch`] when the name holds a vector.
    pub fn scalar(&self, name: &str) -> ForecastResult<f64> {
        match self.params.get(name) {
            Some(ParamValue::Scalar(value)) => Ok(*value),
            Some(ParamValue::Vector(_)) => {
                Err(ForecastError::ParamKindMismatch { name: name.to_string(), expected: "scalar" })
            }
            None => Err(ForecastError::MissingParam { name: name.to_string() }),
        }
    }

    /// Read a vector parameter by name.
    ///
    /// # Errors
    /// - [`ForecastError::MissingParam`] when no parameter has that name.
    /// - [`ForecastError::ParamKindMismatch`] when the name holds a scalar.
    pub fn vector(&self, name: &str) -> ForecastResult<&Array1<f64>> {
        match self.params.get(name) {
            Some(ParamValue::Vector(value)) => Ok(value),
            Some(ParamValue::Scalar(_)) => {
                Err(ForecastError::ParamKindMismatch { name: name.to_string(), expected: "vector" })
            }
            None => Err(ForecastError::MissingParam { name: name.to_string() }),
        }
    }

    /// Number of stored parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Whether the store holds no parameters (i.e. nothing has been fitted).
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}
