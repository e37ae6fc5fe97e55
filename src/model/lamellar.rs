//! Lamellar phase models.
//!
//! All four models are closed-form in `q` and diverge as `1/q²` toward
//! `q = 0`, which is reported as [`ModelError::Singular`].

use std::f64::consts::PI;

use super::error::{ModelError, Result};
use super::registry::ModelKind;
use super::traits::{
    at_least_one, finite, non_negative, parameter_vector, positive, scale_and_background,
    FormFactor, CM_PER_ANGSTROM,
};
use crate::kernel::lamellar::{gaussian_bilayer, head_tail_bilayer, CailleStack, MAX_LAYER_COUNT};

fn reject_origin(model: &'static str, q: f64) -> Result<()> {
    if q == 0.0 {
        Err(ModelError::Singular { model, q })
    } else {
        Ok(())
    }
}

fn layer_count(model: &'static str, value: f64) -> Result<()> {
    at_least_one(model, "layer_count", value)?;
    if value <= MAX_LAYER_COUNT {
        Ok(())
    } else {
        Err(ModelError::domain(model, "layer_count", value, "<= 1e6"))
    }
}

parameter_vector! {
    /// Randomly oriented bilayers with Gaussian interfaces, no interference
    /// between layers.
    pub struct Lamellar {
        scale,
        /// Bilayer thickness.
        delta,
        /// Interfacial roughness as a fraction of `delta`.
        sigma,
        contrast,
        background,
    }
}

impl FormFactor for Lamellar {
    fn kind(&self) -> ModelKind {
        ModelKind::Lamellar
    }

    fn scale(&self) -> f64 {
        self.scale
    }

    fn background(&self) -> f64 {
        self.background
    }

    fn validate(&self) -> Result<()> {
        let model = "Lamellar";
        scale_and_background(model, self.scale, self.background)?;
        positive(model, "delta", self.delta)?;
        non_negative(model, "sigma", self.sigma)?;
        finite(model, "contrast", self.contrast)
    }

    fn compute(&self, q: f64) -> Result<f64> {
        reject_origin("Lamellar", q)?;
        let bilayer = gaussian_bilayer(q, self.delta, self.sigma * self.delta, self.contrast);
        Ok(2.0 * PI * bilayer / (q * q) / self.delta * CM_PER_ANGSTROM)
    }
}

parameter_vector! {
    /// Stack of Gaussian bilayers with Caillé fluctuations.
    pub struct LamellarStack {
        scale,
        /// Repeat distance.
        spacing,
        /// Bilayer thickness.
        delta,
        /// Interfacial roughness as a fraction of `delta`.
        sigma,
        contrast,
        layer_count,
        caille,
        background,
    }
}

impl FormFactor for LamellarStack {
    fn kind(&self) -> ModelKind {
        ModelKind::LamellarStack
    }

    fn scale(&self) -> f64 {
        self.scale
    }

    fn background(&self) -> f64 {
        self.background
    }

    fn validate(&self) -> Result<()> {
        let model = "LamellarStack";
        scale_and_background(model, self.scale, self.background)?;
        positive(model, "spacing", self.spacing)?;
        positive(model, "delta", self.delta)?;
        non_negative(model, "sigma", self.sigma)?;
        finite(model, "contrast", self.contrast)?;
        layer_count(model, self.layer_count)?;
        non_negative(model, "caille", self.caille)
    }

    fn compute(&self, q: f64) -> Result<f64> {
        reject_origin("LamellarStack", q)?;
        let bilayer = gaussian_bilayer(q, self.delta, self.sigma * self.delta, self.contrast);
        let stack = CailleStack::new(self.spacing, self.layer_count, self.caille);
        Ok(2.0 * PI * bilayer * stack.structure_factor(q) / (self.spacing * q * q) * CM_PER_ANGSTROM)
    }
}

parameter_vector! {
    /// Stack of head/tail bilayers with Caillé fluctuations.
    pub struct LamellarStackHeadGroup {
        scale,
        /// Repeat distance.
        spacing,
        tail_thickness,
        head_thickness,
        tail_sld,
        head_sld,
        solvent_sld,
        layer_count,
        caille,
        background,
    }
}

impl FormFactor for LamellarStackHeadGroup {
    fn kind(&self) -> ModelKind {
        ModelKind::LamellarStackHeadGroup
    }

    fn scale(&self) -> f64 {
        self.scale
    }

    fn background(&self) -> f64 {
        self.background
    }

    fn validate(&self) -> Result<()> {
        let model = "LamellarStackHeadGroup";
        scale_and_background(model, self.scale, self.background)?;
        positive(model, "spacing", self.spacing)?;
        positive(model, "tail_thickness", self.tail_thickness)?;
        non_negative(model, "head_thickness", self.head_thickness)?;
        finite(model, "tail_sld", self.tail_sld)?;
        finite(model, "head_sld", self.head_sld)?;
        finite(model, "solvent_sld", self.solvent_sld)?;
        layer_count(model, self.layer_count)?;
        non_negative(model, "caille", self.caille)
    }

    fn compute(&self, q: f64) -> Result<f64> {
        reject_origin("LamellarStackHeadGroup", q)?;
        let bilayer = head_tail_bilayer(
            q,
            self.tail_thickness,
            self.head_thickness,
            self.tail_sld,
            self.head_sld,
            self.solvent_sld,
        );
        let stack = CailleStack::new(self.spacing, self.layer_count, self.caille);
        Ok(2.0 * PI * bilayer * stack.structure_factor(q) / (self.spacing * q * q) * CM_PER_ANGSTROM)
    }
}

parameter_vector! {
    /// Randomly oriented head/tail bilayers, no interference between layers.
    pub struct LamellarHeadGroup {
        scale,
        tail_thickness,
        head_thickness,
        tail_sld,
        head_sld,
        solvent_sld,
        background,
    }
}

impl FormFactor for LamellarHeadGroup {
    fn kind(&self) -> ModelKind {
        ModelKind::LamellarHeadGroup
    }

    fn scale(&self) -> f64 {
        self.scale
    }

    fn background(&self) -> f64 {
        self.background
    }

    fn validate(&self) -> Result<()> {
        let model = "LamellarHeadGroup";
        scale_and_background(model, self.scale, self.background)?;
        positive(model, "tail_thickness", self.tail_thickness)?;
        non_negative(model, "head_thickness", self.head_thickness)?;
        finite(model, "tail_sld", self.tail_sld)?;
        finite(model, "head_sld", self.head_sld)?;
        finite(model, "solvent_sld", self.solvent_sld)
    }

    fn compute(&self, q: f64) -> Result<f64> {
        reject_origin("LamellarHeadGroup", q)?;
        let bilayer = head_tail_bilayer(
            q,
            self.tail_thickness,
            self.head_thickness,
            self.tail_sld,
            self.head_sld,
            self.solvent_sld,
        );
        let thickness = 2.0 * (self.tail_thickness + self.head_thickness);
        Ok(2.0 * PI * bilayer / (q * q) / thickness * CM_PER_ANGSTROM)
    }
}
