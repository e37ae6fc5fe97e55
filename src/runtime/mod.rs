//! Batch runtime for curve evaluation.

pub mod executor;

pub use executor::{BatchSummary, CurveFailure, Runtime, RuntimeConfig, RuntimeError};
