//! Stochastic variational trainer: ELBO objective trait, Rprop solver with
//! exponential step decay, Argmin adapter/runner, and progress reporting.
//!
//! The public surface is [`train`], [`Elbo`], [`SviOptions`], and
//! [`SviOutcome`]; the remaining modules are the wiring underneath.
pub mod adapter;
pub mod api;
pub mod progress;
pub mod rprop;
pub mod run;
pub mod schedule;
pub mod traits;
pub mod types;
pub mod validation;

pub use api::train;
pub use rprop::Rprop;
pub use schedule::ExponentialDecay;
pub use traits::{Elbo, SviOptions, SviOutcome};
pub use types::{Cost, DEFAULT_DECAY_RATE, FnEvalMap, Grad, Theta};
