//! A one-dimensional intensity curve: one model evaluated over a q sweep.

use rayon::prelude::*;
use thiserror::Error;

use crate::model::{check_q, FormFactor, Model, ModelError};

/// A model together with the q values to evaluate it at.
#[derive(Clone, Debug)]
pub struct Curve {
    /// Caller-chosen identifier, reported back in callbacks.
    pub id: String,

    pub model: Model,

    /// Scattering vector magnitudes in Å⁻¹.
    pub q_values: Vec<f64>,

    /// `scale × P(q) + background` in cm⁻¹. Empty until evaluated.
    pub intensity: Vec<f64>,
}

impl Curve {
    /// Create a curve. Fails if the model parameters are out of domain.
    pub fn new(id: impl Into<String>, model: Model, q_values: Vec<f64>) -> Result<Self, CurveError> {
        model.validate()?;
        Ok(Self {
            id: id.into(),
            model,
            q_values,
            intensity: Vec::new(),
        })
    }

    /// Create from raw pointers (for FFI).
    ///
    /// # Safety
    /// `id` must be a valid NUL-terminated string and `q_ptr` must point to
    /// `len` readable values.
    pub unsafe fn from_raw(
        id: *const std::ffi::c_char,
        model: Model,
        q_ptr: *const f64,
        len: usize,
    ) -> Result<Self, CurveError> {
        use std::ffi::CStr;

        if id.is_null() || (q_ptr.is_null() && len > 0) {
            return Err(CurveError::NullPointer);
        }
        let id = CStr::from_ptr(id)
            .to_str()
            .map_err(|_| CurveError::InvalidUtf8)?
            .to_string();
        let q_values = if len == 0 {
            Vec::new()
        } else {
            std::slice::from_raw_parts(q_ptr, len).to_vec()
        };
        Self::new(id, model, q_values)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.q_values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.q_values.is_empty()
    }

    /// True once every q value has an intensity.
    #[inline]
    pub fn is_evaluated(&self) -> bool {
        self.intensity.len() == self.q_values.len()
    }

    #[inline]
    pub fn q_ref(&self) -> &[f64] {
        &self.q_values
    }

    #[inline]
    pub fn intensity_ref(&self) -> &[f64] {
        &self.intensity
    }

    /// Evaluate every point on the calling thread.
    pub fn evaluate(&mut self) -> Result<(), CurveError> {
        self.intensity = evaluate_q(&self.model, &self.q_values, false)?;
        Ok(())
    }

    /// Evaluate with the points spread over the rayon pool.
    pub fn evaluate_parallel(&mut self) -> Result<(), CurveError> {
        self.intensity = evaluate_q(&self.model, &self.q_values, true)?;
        Ok(())
    }
}

/// Intensity of `model` at every value of `q_values`.
///
/// The parameters are validated once; each q is still checked.
pub fn evaluate_q(model: &Model, q_values: &[f64], parallel: bool) -> Result<Vec<f64>, ModelError> {
    model.validate()?;
    let (scale, background) = (model.scale(), model.background());
    let point = |&q: &f64| -> Result<f64, ModelError> {
        check_q(q)?;
        Ok(scale * model.compute(q)? + background)
    };
    if parallel {
        q_values.par_iter().map(point).collect()
    } else {
        q_values.iter().map(point).collect()
    }
}

/// Errors that can occur when creating or evaluating curves.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurveError {
    #[error("null pointer passed")]
    NullPointer,

    #[error("invalid UTF-8 in string")]
    InvalidUtf8,

    #[error(transparent)]
    Model(#[from] ModelError),
}
