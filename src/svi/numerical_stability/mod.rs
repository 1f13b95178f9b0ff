//! Guarded nonlinear transforms shared by the model family and the trainer.

pub mod transformations;
