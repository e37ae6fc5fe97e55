//! Errors raised while validating or evaluating a model.

use thiserror::Error;

/// Errors from model construction and evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// A parameter lies outside its physical domain.
    #[error("{model}: parameter `{parameter}` = {value} must be {requirement}")]
    Domain {
        model: &'static str,
        parameter: &'static str,
        value: f64,
        requirement: &'static str,
    },

    /// A positional parameter vector has the wrong length.
    #[error("{model}: expected {expected} parameters, got {actual}")]
    ParameterCount {
        model: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The scattering vector is negative or not finite.
    #[error("q = {q} must be finite and >= 0")]
    InvalidQ { q: f64 },

    /// The model has a non-removable singularity at this q.
    #[error("{model} is singular at q = {q}")]
    Singular { model: &'static str, q: f64 },

    /// No model with this name exists.
    #[error("unknown model `{0}`")]
    UnknownModel(String),

    /// Named parameters could not be parsed.
    #[error("invalid model description: {0}")]
    Json(String),
}

impl ModelError {
    pub fn domain(
        model: &'static str,
        parameter: &'static str,
        value: f64,
        requirement: &'static str,
    ) -> Self {
        ModelError::Domain {
            model,
            parameter,
            value,
            requirement,
        }
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        ModelError::Json(err.to_string())
    }
}

/// Result alias for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
