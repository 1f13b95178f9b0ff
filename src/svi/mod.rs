//! Stochastic variational inference: the gradient-based trainer used to fit
//! the regression model family, plus the guarded numerical transforms shared
//! with the models.

pub mod elbo_optimizer;
pub mod errors;
pub mod numerical_stability;
