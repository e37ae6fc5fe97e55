//! Rectangular parallelepiped model.

use super::error::Result;
use super::registry::ModelKind;
use super::traits::{
    finite, parameter_vector, positive, scale_and_background, FormFactor, CM_PER_ANGSTROM,
};
use crate::kernel::parallelepiped::parallelepiped_average;

parameter_vector! {
    /// Rectangular solid with edges `short_a ≤ middle_b ≤ long_c`.
    pub struct Parallelepiped {
        scale,
        short_a,
        middle_b,
        long_c,
        contrast,
        background,
    }
}

impl Parallelepiped {
    pub fn volume(&self) -> f64 {
        self.short_a * self.middle_b * self.long_c
    }
}

impl FormFactor for Parallelepiped {
    fn kind(&self) -> ModelKind {
        ModelKind::Parallelepiped
    }

    fn scale(&self) -> f64 {
        self.scale
    }

    fn background(&self) -> f64 {
        self.background
    }

    fn validate(&self) -> Result<()> {
        let model = "Parallelepiped";
        scale_and_background(model, self.scale, self.background)?;
        positive(model, "short_a", self.short_a)?;
        positive(model, "middle_b", self.middle_b)?;
        positive(model, "long_c", self.long_c)?;
        finite(model, "contrast", self.contrast)
    }

    fn compute(&self, q: f64) -> Result<f64> {
        let average = parallelepiped_average(q, self.short_a, self.middle_b, self.long_c);
        Ok(average * self.contrast * self.contrast * self.volume() * CM_PER_ANGSTROM)
    }
}
