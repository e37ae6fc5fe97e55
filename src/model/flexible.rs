//! Flexible (worm-like) cylinder models.
//!
//! Each model multiplies the single-chain structure factor of a worm-like
//! chain by the squared amplitude of its cross-section. The chain part is
//! evaluated by [`WormlikeChain`].

use std::f64::consts::PI;

use super::error::{ModelError, Result};
use super::registry::ModelKind;
use super::traits::{
    finite, parameter_vector, positive, scale_and_background, FormFactor, CM_PER_ANGSTROM,
};
use crate::kernel::cylinder::elliptical_cross_section;
use crate::kernel::wormlike::WormlikeChain;
use crate::math::distribution::SchulzDistribution;
use crate::math::quadrature::{GAUSS20, GAUSS76};
use crate::math::special::bessel_j1_ratio;

fn circular_cross_section(q: f64, radius: f64) -> f64 {
    let amplitude = bessel_j1_ratio(q * radius);
    amplitude * amplitude
}

parameter_vector! {
    /// Semi-flexible chain with a circular cross-section.
    pub struct FlexibleCylinder {
        scale,
        /// Contour length.
        length,
        kuhn_length,
        radius,
        contrast,
        background,
    }
}

impl FormFactor for FlexibleCylinder {
    fn kind(&self) -> ModelKind {
        ModelKind::FlexibleCylinder
    }

    fn scale(&self) -> f64 {
        self.scale
    }

    fn background(&self) -> f64 {
        self.background
    }

    fn validate(&self) -> Result<()> {
        let model = "FlexibleCylinder";
        scale_and_background(model, self.scale, self.background)?;
        positive(model, "length", self.length)?;
        positive(model, "kuhn_length", self.kuhn_length)?;
        positive(model, "radius", self.radius)?;
        finite(model, "contrast", self.contrast)
    }

    fn compute(&self, q: f64) -> Result<f64> {
        let chain = WormlikeChain::new(self.length, self.kuhn_length)?;
        let volume = PI * self.radius * self.radius * self.length;
        Ok(chain.structure_factor(q)
            * circular_cross_section(q, self.radius)
            * volume
            * self.contrast
            * self.contrast
            * CM_PER_ANGSTROM)
    }
}

parameter_vector! {
    /// Semi-flexible chain with an elliptical cross-section.
    pub struct FlexibleEllipticalCylinder {
        scale,
        /// Contour length.
        length,
        kuhn_length,
        /// Minor radius of the cross-section.
        radius,
        /// Major over minor radius.
        axis_ratio,
        contrast,
        background,
    }
}

impl FormFactor for FlexibleEllipticalCylinder {
    fn kind(&self) -> ModelKind {
        ModelKind::FlexibleEllipticalCylinder
    }

    fn scale(&self) -> f64 {
        self.scale
    }

    fn background(&self) -> f64 {
        self.background
    }

    fn validate(&self) -> Result<()> {
        let model = "FlexibleEllipticalCylinder";
        scale_and_background(model, self.scale, self.background)?;
        positive(model, "length", self.length)?;
        positive(model, "kuhn_length", self.kuhn_length)?;
        positive(model, "radius", self.radius)?;
        positive(model, "axis_ratio", self.axis_ratio)?;
        finite(model, "contrast", self.contrast)
    }

    fn compute(&self, q: f64) -> Result<f64> {
        let chain = WormlikeChain::new(self.length, self.kuhn_length)?;
        let major = self.radius * self.axis_ratio;
        let volume = PI * self.radius * major * self.length;
        Ok(chain.structure_factor(q)
            * elliptical_cross_section(q, self.radius, major)
            * volume
            * self.contrast
            * self.contrast
            * CM_PER_ANGSTROM)
    }
}

parameter_vector! {
    /// Semi-flexible circular chain with a Schulz distribution of contour
    /// lengths.
    pub struct FlexibleCylinderPolyLength {
        scale,
        /// Mean contour length.
        length,
        /// Relative standard deviation of the contour length.
        polydispersity,
        kuhn_length,
        radius,
        contrast,
        background,
    }
}

impl FormFactor for FlexibleCylinderPolyLength {
    fn kind(&self) -> ModelKind {
        ModelKind::FlexibleCylinderPolyLength
    }

    fn scale(&self) -> f64 {
        self.scale
    }

    fn background(&self) -> f64 {
        self.background
    }

    fn validate(&self) -> Result<()> {
        let model = "FlexibleCylinderPolyLength";
        scale_and_background(model, self.scale, self.background)?;
        positive(model, "length", self.length)?;
        positive(model, "polydispersity", self.polydispersity)?;
        positive(model, "kuhn_length", self.kuhn_length)?;
        positive(model, "radius", self.radius)?;
        finite(model, "contrast", self.contrast)
    }

    fn compute(&self, q: f64) -> Result<f64> {
        let distribution = SchulzDistribution::new(self.length, self.polydispersity)?;
        let area = PI * self.radius * self.radius;
        let cross_section = circular_cross_section(q, self.radius);
        // the chain statistics change with every sampled length
        let weighted = GAUSS20.try_integrate(distribution.bounds(), |l| {
            let chain = WormlikeChain::new(l, self.kuhn_length)?;
            let volume = area * l;
            Ok::<f64, ModelError>(
                chain.structure_factor(q) * cross_section * volume * volume * distribution.density(l),
            )
        })?;
        Ok(weighted / (area * self.length) * self.contrast * self.contrast * CM_PER_ANGSTROM)
    }
}

parameter_vector! {
    /// Semi-flexible circular chain with a Schulz distribution of radii.
    pub struct FlexibleCylinderPolyRadius {
        scale,
        /// Contour length.
        length,
        kuhn_length,
        /// Mean radius.
        radius,
        /// Relative standard deviation of the radius.
        polydispersity,
        contrast,
        background,
    }
}

impl FormFactor for FlexibleCylinderPolyRadius {
    fn kind(&self) -> ModelKind {
        ModelKind::FlexibleCylinderPolyRadius
    }

    fn scale(&self) -> f64 {
        self.scale
    }

    fn background(&self) -> f64 {
        self.background
    }

    fn validate(&self) -> Result<()> {
        let model = "FlexibleCylinderPolyRadius";
        scale_and_background(model, self.scale, self.background)?;
        positive(model, "length", self.length)?;
        positive(model, "kuhn_length", self.kuhn_length)?;
        positive(model, "radius", self.radius)?;
        positive(model, "polydispersity", self.polydispersity)?;
        finite(model, "contrast", self.contrast)
    }

    fn compute(&self, q: f64) -> Result<f64> {
        let distribution = SchulzDistribution::new(self.radius, self.polydispersity)?;
        let chain = WormlikeChain::new(self.length, self.kuhn_length)?;
        let weighted = GAUSS76.integrate(distribution.bounds(), |r| {
            let volume = PI * r * r * self.length;
            circular_cross_section(q, r) * volume * volume * distribution.density(r)
        });
        let mean_volume =
            PI * self.radius * self.radius * self.length * distribution.second_moment_ratio();
        Ok(chain.structure_factor(q) * weighted / mean_volume
            * self.contrast
            * self.contrast
            * CM_PER_ANGSTROM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::traits::ParameterVector;
    use approx::assert_relative_eq;

    fn flexible() -> FlexibleCylinder {
        FlexibleCylinder {
            scale: 1.0,
            length: 1000.0,
            kuhn_length: 100.0,
            radius: 20.0,
            contrast: 5.3e-6,
            background: 0.0,
        }
    }

    #[test]
    fn test_forward_limit() {
        let model = flexible();
        let volume = PI * 20.0 * 20.0 * 1000.0;
        let expected = 5.3e-6 * 5.3e-6 * volume * 1e8;
        assert_relative_eq!(model.intensity(0.0).unwrap(), expected, max_relative = 1e-12);
    }

    #[test]
    fn test_small_q_stays_at_forward_limit() {
        let model = flexible();
        let forward = model.intensity(0.0).unwrap();
        for q in [1e-5, 1e-6, 3e-8, 1e-8, 1e-10] {
            let ratio = model.intensity(q).unwrap() / forward;
            assert!(ratio <= 1.0 + 1e-9 && ratio > 1.0 - 1e-3, "I({q})/I(0) = {ratio}");
        }
    }

    #[test]
    fn test_intensity_decreases() {
        let model = flexible();
        let mut previous = model.intensity(0.001).unwrap();
        for q in [0.005, 0.01, 0.05, 0.1] {
            let current = model.intensity(q).unwrap();
            assert!(current < previous, "q = {q}");
            previous = current;
        }
    }

    #[test]
    fn test_circular_elliptical_matches_flexible() {
        let circular = flexible();
        let elliptical = FlexibleEllipticalCylinder {
            scale: 1.0,
            length: 1000.0,
            kuhn_length: 100.0,
            radius: 20.0,
            axis_ratio: 1.0,
            contrast: 5.3e-6,
            background: 0.0,
        };
        for q in [0.0, 0.02, 0.1] {
            assert_relative_eq!(
                elliptical.intensity(q).unwrap(),
                circular.intensity(q).unwrap(),
                max_relative = 1e-10
            );
        }
    }

    #[test]
    fn test_narrow_length_distribution_approaches_monodisperse() {
        let mono = flexible();
        let poly = FlexibleCylinderPolyLength {
            scale: 1.0,
            length: 1000.0,
            polydispersity: 0.01,
            kuhn_length: 100.0,
            radius: 20.0,
            contrast: 5.3e-6,
            background: 0.0,
        };
        for q in [0.0, 0.01, 0.05] {
            assert_relative_eq!(
                poly.intensity(q).unwrap(),
                mono.intensity(q).unwrap(),
                max_relative = 1e-2
            );
        }
    }

    #[test]
    fn test_narrow_radius_distribution_approaches_monodisperse() {
        let mono = flexible();
        let poly = FlexibleCylinderPolyRadius::from_slice(&[
            1.0, 1000.0, 100.0, 20.0, 0.01, 5.3e-6, 0.0,
        ])
        .unwrap();
        assert_eq!(poly.polydispersity, 0.01);
        for q in [0.0, 0.01, 0.05] {
            assert_relative_eq!(
                poly.intensity(q).unwrap(),
                mono.intensity(q).unwrap(),
                max_relative = 1e-2
            );
        }
    }

    #[test]
    fn test_invalid_chain() {
        let model = FlexibleCylinder {
            kuhn_length: 0.0,
            ..flexible()
        };
        assert!(model.intensity(0.1).is_err());
        assert!(FlexibleCylinderPolyLength::from_slice(&[1.0, 1000.0]).is_err());
    }
}
