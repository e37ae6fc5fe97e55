//! Core model traits.

use super::error::{ModelError, Result};
use super::registry::ModelKind;

/// Factor converting an intensity computed from Å-based lengths and
/// Å⁻² scattering length densities to cm⁻¹.
pub const CM_PER_ANGSTROM: f64 = 1.0e8;

/// A scattering model with a fixed set of parameters.
///
/// Implementors provide [`FormFactor::compute`] for already validated
/// inputs; the provided methods validate and apply the common finishing
/// steps.
pub trait FormFactor {
    /// Which model this is.
    fn kind(&self) -> ModelKind;

    /// Multiplicative scale (typically a volume fraction).
    fn scale(&self) -> f64;

    /// Flat background in cm⁻¹.
    fn background(&self) -> f64;

    /// Check every parameter against its physical domain.
    fn validate(&self) -> Result<()>;

    /// `P(q)` in cm⁻¹, excluding scale and background.
    ///
    /// Parameters and `q` are assumed valid.
    fn compute(&self, q: f64) -> Result<f64>;

    /// `P(q)` in cm⁻¹ after validating parameters and `q`.
    fn form_factor(&self, q: f64) -> Result<f64> {
        check_q(q)?;
        self.validate()?;
        self.compute(q)
    }

    /// `scale × P(q) + background`.
    fn intensity(&self, q: f64) -> Result<f64> {
        Ok(self.scale() * self.form_factor(q)? + self.background())
    }

    /// Intensity at polar detector coordinates.
    ///
    /// All models here are orientationally averaged, so the angle does not
    /// enter the result.
    fn intensity_polar(&self, q: f64, _phi: f64) -> Result<f64> {
        self.intensity(q)
    }

    /// Intensity at Cartesian detector coordinates.
    fn intensity_xy(&self, qx: f64, qy: f64) -> Result<f64> {
        self.intensity_polar(qx.hypot(qy), qy.atan2(qx))
    }
}

/// Positional parameter contract.
///
/// The order of [`ParameterVector::NAMES`] is the order of the flat parameter
/// arrays accepted at the C boundary and must not change.
pub trait ParameterVector: Sized {
    /// Parameter names in positional order.
    const NAMES: &'static [&'static str];

    /// Build from a positional slice of exactly `NAMES.len()` values.
    fn from_slice(values: &[f64]) -> Result<Self>;

    /// Flatten in positional order.
    fn to_vec(&self) -> Vec<f64>;

    fn parameter_names() -> &'static [&'static str] {
        Self::NAMES
    }
}

/// Declare a parameter struct together with its positional contract.
macro_rules! parameter_vector {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field:ident
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
        pub struct $name {
            $(
                $(#[$field_meta])*
                pub $field: f64,
            )+
        }

        impl $crate::model::traits::ParameterVector for $name {
            const NAMES: &'static [&'static str] = &[$(stringify!($field)),+];

            fn from_slice(values: &[f64]) -> $crate::model::Result<Self> {
                match *values {
                    [$($field),+] => Ok(Self { $($field),+ }),
                    _ => Err($crate::model::ModelError::ParameterCount {
                        model: stringify!($name),
                        expected: Self::NAMES.len(),
                        actual: values.len(),
                    }),
                }
            }

            fn to_vec(&self) -> Vec<f64> {
                vec![$(self.$field),+]
            }
        }
    };
}

pub(crate) use parameter_vector;

/// Reject negative or non-finite `q`.
pub fn check_q(q: f64) -> Result<()> {
    if q.is_finite() && q >= 0.0 {
        Ok(())
    } else {
        Err(ModelError::InvalidQ { q })
    }
}

pub(crate) fn finite(model: &'static str, parameter: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ModelError::domain(model, parameter, value, "finite"))
    }
}

pub(crate) fn positive(model: &'static str, parameter: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ModelError::domain(model, parameter, value, "finite and > 0"))
    }
}

pub(crate) fn non_negative(model: &'static str, parameter: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ModelError::domain(model, parameter, value, "finite and >= 0"))
    }
}

pub(crate) fn at_least_one(model: &'static str, parameter: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 1.0 {
        Ok(())
    } else {
        Err(ModelError::domain(model, parameter, value, "finite and >= 1"))
    }
}

/// Scale and background must be finite for every model.
pub(crate) fn scale_and_background(model: &'static str, scale: f64, background: f64) -> Result<()> {
    finite(model, "scale", scale)?;
    finite(model, "background", background)
}
