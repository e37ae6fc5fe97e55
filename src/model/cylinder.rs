//! Cylinder family models.

use std::f64::consts::PI;

use super::error::Result;
use super::registry::ModelKind;
use super::traits::{
    at_least_one, finite, non_negative, parameter_vector, positive, scale_and_background,
    FormFactor, CM_PER_ANGSTROM,
};
use crate::kernel::cylinder::{
    cylinder_average, elliptical_cylinder_average, hollow_cyl_kernel, CoreShellCylinderShape,
    StackedDiscShape,
};
use crate::math::distribution::{LogNormalDistribution, SchulzDistribution};
use crate::math::quadrature::{Interval, QuadratureOrder, GAUSS20, GAUSS76};

parameter_vector! {
    /// Uniform right circular cylinder.
    pub struct Cylinder {
        scale,
        radius,
        length,
        contrast,
        background,
    }
}

impl FormFactor for Cylinder {
    fn kind(&self) -> ModelKind {
        ModelKind::Cylinder
    }

    fn scale(&self) -> f64 {
        self.scale
    }

    fn background(&self) -> f64 {
        self.background
    }

    fn validate(&self) -> Result<()> {
        let model = "Cylinder";
        scale_and_background(model, self.scale, self.background)?;
        positive(model, "radius", self.radius)?;
        positive(model, "length", self.length)?;
        finite(model, "contrast", self.contrast)
    }

    fn compute(&self, q: f64) -> Result<f64> {
        let average = cylinder_average(q, self.radius, self.length / 2.0, &GAUSS76);
        let volume = PI * self.radius * self.radius * self.length;
        Ok(average * self.contrast * self.contrast * volume * CM_PER_ANGSTROM)
    }
}

parameter_vector! {
    /// Cylinder with an elliptical cross-section, 76-point cross-section
    /// average.
    pub struct EllipticalCylinder76 {
        scale,
        minor_radius,
        /// Major over minor radius.
        axis_ratio,
        length,
        contrast,
        background,
    }
}

parameter_vector! {
    /// Cylinder with an elliptical cross-section, 20-point cross-section
    /// average.
    pub struct EllipticalCylinder20 {
        scale,
        minor_radius,
        /// Major over minor radius.
        axis_ratio,
        length,
        contrast,
        background,
    }
}

fn validate_elliptical(
    model: &'static str,
    scale: f64,
    minor_radius: f64,
    axis_ratio: f64,
    length: f64,
    contrast: f64,
    background: f64,
) -> Result<()> {
    scale_and_background(model, scale, background)?;
    positive(model, "minor_radius", minor_radius)?;
    positive(model, "axis_ratio", axis_ratio)?;
    positive(model, "length", length)?;
    finite(model, "contrast", contrast)
}

fn elliptical_cylinder(
    q: f64,
    minor_radius: f64,
    axis_ratio: f64,
    length: f64,
    contrast: f64,
    inner: QuadratureOrder,
) -> f64 {
    let average = elliptical_cylinder_average(q, minor_radius, axis_ratio, length, inner.rule());
    let volume = PI * minor_radius * (axis_ratio * minor_radius) * length;
    average * contrast * contrast * volume * CM_PER_ANGSTROM
}

impl FormFactor for EllipticalCylinder76 {
    fn kind(&self) -> ModelKind {
        ModelKind::EllipticalCylinder76
    }

    fn scale(&self) -> f64 {
        self.scale
    }

    fn background(&self) -> f64 {
        self.background
    }

    fn validate(&self) -> Result<()> {
        validate_elliptical(
            "EllipticalCylinder76",
            self.scale,
            self.minor_radius,
            self.axis_ratio,
            self.length,
            self.contrast,
            self.background,
        )
    }

    fn compute(&self, q: f64) -> Result<f64> {
        Ok(elliptical_cylinder(
            q,
            self.minor_radius,
            self.axis_ratio,
            self.length,
            self.contrast,
            QuadratureOrder::SeventySix,
        ))
    }
}

impl FormFactor for EllipticalCylinder20 {
    fn kind(&self) -> ModelKind {
        ModelKind::EllipticalCylinder20
    }

    fn scale(&self) -> f64 {
        self.scale
    }

    fn background(&self) -> f64 {
        self.background
    }

    fn validate(&self) -> Result<()> {
        validate_elliptical(
            "EllipticalCylinder20",
            self.scale,
            self.minor_radius,
            self.axis_ratio,
            self.length,
            self.contrast,
            self.background,
        )
    }

    fn compute(&self, q: f64) -> Result<f64> {
        Ok(elliptical_cylinder(
            q,
            self.minor_radius,
            self.axis_ratio,
            self.length,
            self.contrast,
            QuadratureOrder::Twenty,
        ))
    }
}

parameter_vector! {
    /// Hollow cylinder (tube) with a solvent-filled core.
    pub struct HollowCylinder {
        scale,
        core_radius,
        /// Outer radius.
        radius,
        length,
        contrast,
        background,
    }
}

impl FormFactor for HollowCylinder {
    fn kind(&self) -> ModelKind {
        ModelKind::HollowCylinder
    }

    fn scale(&self) -> f64 {
        self.scale
    }

    fn background(&self) -> f64 {
        self.background
    }

    fn validate(&self) -> Result<()> {
        let model = "HollowCylinder";
        scale_and_background(model, self.scale, self.background)?;
        positive(model, "radius", self.radius)?;
        non_negative(model, "core_radius", self.core_radius)?;
        if self.core_radius >= self.radius {
            return Err(super::ModelError::domain(
                model,
                "core_radius",
                self.core_radius,
                "smaller than radius",
            ));
        }
        positive(model, "length", self.length)?;
        finite(model, "contrast", self.contrast)
    }

    fn compute(&self, q: f64) -> Result<f64> {
        let average = GAUSS76.integrate(Interval::UNIT, |x| {
            hollow_cyl_kernel(q, self.core_radius, self.radius, self.length, x)
        });
        let volume = PI * (self.radius * self.radius - self.core_radius * self.core_radius) * self.length;
        Ok(average * self.contrast * self.contrast * volume * CM_PER_ANGSTROM)
    }
}

parameter_vector! {
    /// Cylinder with a Schulz distribution of radii.
    pub struct CylinderPolyRadius {
        scale,
        /// Mean radius.
        radius,
        length,
        /// Relative standard deviation of the radius.
        polydispersity,
        contrast,
        background,
    }
}

impl FormFactor for CylinderPolyRadius {
    fn kind(&self) -> ModelKind {
        ModelKind::CylinderPolyRadius
    }

    fn scale(&self) -> f64 {
        self.scale
    }

    fn background(&self) -> f64 {
        self.background
    }

    fn validate(&self) -> Result<()> {
        let model = "CylinderPolyRadius";
        scale_and_background(model, self.scale, self.background)?;
        positive(model, "radius", self.radius)?;
        positive(model, "length", self.length)?;
        positive(model, "polydispersity", self.polydispersity)?;
        finite(model, "contrast", self.contrast)
    }

    fn compute(&self, q: f64) -> Result<f64> {
        let distribution = SchulzDistribution::new(self.radius, self.polydispersity)?;
        let half_length = self.length / 2.0;
        let contrast_sq = self.contrast * self.contrast;
        let weighted = GAUSS20.integrate(distribution.bounds(), |r| {
            let volume = PI * r * r * self.length;
            cylinder_average(q, r, half_length, &GAUSS76)
                * contrast_sq
                * volume
                * volume
                * distribution.density(r)
        });
        let mean_volume =
            PI * self.radius * self.radius * self.length * distribution.second_moment_ratio();
        Ok(weighted / mean_volume * CM_PER_ANGSTROM)
    }
}

parameter_vector! {
    /// Cylinder with a Schulz distribution of lengths.
    pub struct CylinderPolyLength {
        scale,
        radius,
        /// Mean length.
        length,
        /// Relative standard deviation of the length.
        polydispersity,
        contrast,
        background,
    }
}

impl FormFactor for CylinderPolyLength {
    fn kind(&self) -> ModelKind {
        ModelKind::CylinderPolyLength
    }

    fn scale(&self) -> f64 {
        self.scale
    }

    fn background(&self) -> f64 {
        self.background
    }

    fn validate(&self) -> Result<()> {
        let model = "CylinderPolyLength";
        scale_and_background(model, self.scale, self.background)?;
        positive(model, "radius", self.radius)?;
        positive(model, "length", self.length)?;
        positive(model, "polydispersity", self.polydispersity)?;
        finite(model, "contrast", self.contrast)
    }

    fn compute(&self, q: f64) -> Result<f64> {
        let distribution = SchulzDistribution::new(self.length, self.polydispersity)?;
        let contrast_sq = self.contrast * self.contrast;
        let weighted = GAUSS20.integrate(distribution.bounds(), |l| {
            let volume = PI * self.radius * self.radius * l;
            cylinder_average(q, self.radius, l / 2.0, &GAUSS20)
                * contrast_sq
                * volume
                * volume
                * distribution.density(l)
        });
        let mean_volume = PI * self.radius * self.radius * self.length;
        Ok(weighted / mean_volume * CM_PER_ANGSTROM)
    }
}

parameter_vector! {
    /// Core-shell cylinder with equal shell thickness on the rim and faces.
    pub struct CoreShellCylinder {
        scale,
        core_radius,
        /// Shell thickness.
        thickness,
        /// Core length.
        length,
        core_sld,
        shell_sld,
        solvent_sld,
        background,
    }
}

impl CoreShellCylinder {
    fn shape(&self) -> CoreShellCylinderShape {
        CoreShellCylinderShape {
            core_radius: self.core_radius,
            radial_thickness: self.thickness,
            face_thickness: self.thickness,
            half_length: self.length / 2.0,
            core_sld: self.core_sld,
            shell_sld: self.shell_sld,
            solvent_sld: self.solvent_sld,
        }
    }
}

impl FormFactor for CoreShellCylinder {
    fn kind(&self) -> ModelKind {
        ModelKind::CoreShellCylinder
    }

    fn scale(&self) -> f64 {
        self.scale
    }

    fn background(&self) -> f64 {
        self.background
    }

    fn validate(&self) -> Result<()> {
        let model = "CoreShellCylinder";
        scale_and_background(model, self.scale, self.background)?;
        positive(model, "core_radius", self.core_radius)?;
        non_negative(model, "thickness", self.thickness)?;
        positive(model, "length", self.length)?;
        finite(model, "core_sld", self.core_sld)?;
        finite(model, "shell_sld", self.shell_sld)?;
        finite(model, "solvent_sld", self.solvent_sld)
    }

    fn compute(&self, q: f64) -> Result<f64> {
        let shape = self.shape();
        Ok(shape.average(q) / shape.outer_volume() * CM_PER_ANGSTROM)
    }
}

parameter_vector! {
    /// Core-shell cylinder with a log-normal distribution of core radii and
    /// independent rim and face thicknesses.
    pub struct PolyCoreShellCylinder {
        scale,
        /// Median core radius.
        radius,
        /// Standard deviation of the log of the core radius.
        sigma,
        /// Core length.
        length,
        radial_thickness,
        face_thickness,
        core_sld,
        shell_sld,
        solvent_sld,
        background,
    }
}

impl FormFactor for PolyCoreShellCylinder {
    fn kind(&self) -> ModelKind {
        ModelKind::PolyCoreShellCylinder
    }

    fn scale(&self) -> f64 {
        self.scale
    }

    fn background(&self) -> f64 {
        self.background
    }

    fn validate(&self) -> Result<()> {
        let model = "PolyCoreShellCylinder";
        scale_and_background(model, self.scale, self.background)?;
        positive(model, "radius", self.radius)?;
        positive(model, "sigma", self.sigma)?;
        positive(model, "length", self.length)?;
        non_negative(model, "radial_thickness", self.radial_thickness)?;
        non_negative(model, "face_thickness", self.face_thickness)?;
        finite(model, "core_sld", self.core_sld)?;
        finite(model, "shell_sld", self.shell_sld)?;
        finite(model, "solvent_sld", self.solvent_sld)
    }

    fn compute(&self, q: f64) -> Result<f64> {
        let distribution = LogNormalDistribution::new(self.radius, self.sigma)?;
        let bounds = distribution.bounds();
        let mut weighted = 0.0;
        let mut outer_area = 0.0;
        for (r, weight) in GAUSS20.nodes(bounds) {
            let density = distribution.density(r);
            let shape = CoreShellCylinderShape {
                core_radius: r,
                radial_thickness: self.radial_thickness,
                face_thickness: self.face_thickness,
                half_length: self.length / 2.0,
                core_sld: self.core_sld,
                shell_sld: self.shell_sld,
                solvent_sld: self.solvent_sld,
            };
            let outer = r + self.radial_thickness;
            weighted += weight * density * shape.average(q);
            outer_area += weight * density * outer * outer;
        }
        let half_width = bounds.half_width();
        let mean_volume =
            PI * half_width * outer_area * (self.length + 2.0 * self.face_thickness);
        Ok(half_width * weighted / mean_volume * CM_PER_ANGSTROM)
    }
}

parameter_vector! {
    /// Stack of core discs, each coated on both faces by a layer.
    pub struct StackedDiscs {
        scale,
        core_radius,
        core_thickness,
        layer_thickness,
        core_sld,
        layer_sld,
        solvent_sld,
        /// Number of discs in the stack.
        stack_count,
        /// Relative Gaussian disorder of the repeat distance.
        gaussian_sigma,
        background,
    }
}

impl StackedDiscs {
    fn shape(&self) -> StackedDiscShape {
        StackedDiscShape {
            core_radius: self.core_radius,
            half_thickness: self.core_thickness / 2.0,
            layer_thickness: self.layer_thickness,
            core_sld: self.core_sld,
            layer_sld: self.layer_sld,
            solvent_sld: self.solvent_sld,
            stack_count: self.stack_count,
            gaussian_sigma: self.gaussian_sigma,
        }
    }
}

impl FormFactor for StackedDiscs {
    fn kind(&self) -> ModelKind {
        ModelKind::StackedDiscs
    }

    fn scale(&self) -> f64 {
        self.scale
    }

    fn background(&self) -> f64 {
        self.background
    }

    fn validate(&self) -> Result<()> {
        let model = "StackedDiscs";
        scale_and_background(model, self.scale, self.background)?;
        positive(model, "core_radius", self.core_radius)?;
        positive(model, "core_thickness", self.core_thickness)?;
        non_negative(model, "layer_thickness", self.layer_thickness)?;
        finite(model, "core_sld", self.core_sld)?;
        finite(model, "layer_sld", self.layer_sld)?;
        finite(model, "solvent_sld", self.solvent_sld)?;
        at_least_one(model, "stack_count", self.stack_count)?;
        non_negative(model, "gaussian_sigma", self.gaussian_sigma)
    }

    fn compute(&self, q: f64) -> Result<f64> {
        let shape = self.shape();
        Ok(shape.average(q) / shape.volume() * CM_PER_ANGSTROM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::traits::ParameterVector;
    use crate::model::ModelError;
    use approx::assert_relative_eq;

    fn cylinder() -> Cylinder {
        Cylinder {
            scale: 1.0,
            radius: 20.0,
            length: 400.0,
            contrast: 3e-6,
            background: 0.0,
        }
    }

    #[test]
    fn test_cylinder_forward_limit() {
        let model = cylinder();
        let volume = PI * 20.0 * 20.0 * 400.0;
        assert_relative_eq!(
            model.intensity(0.0).unwrap(),
            9e-12 * volume * 1e8,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_cylinder_scale_and_background_are_linear() {
        let base = cylinder();
        let scaled = Cylinder { scale: 2.0, ..base };
        let shifted = Cylinder { background: 0.5, ..base };
        for q in [0.001, 0.02, 0.1, 0.3] {
            let p = base.intensity(q).unwrap();
            assert!(p >= 0.0);
            assert_eq!(scaled.intensity(q).unwrap(), 2.0 * p);
            assert_eq!(shifted.intensity(q).unwrap(), p + 0.5);
        }
    }

    #[test]
    fn test_cylinder_parameter_order() {
        let model = Cylinder::from_slice(&[0.5, 20.0, 400.0, 3e-6, 0.01]).unwrap();
        assert_eq!(model.radius, 20.0);
        assert_eq!(model.length, 400.0);
        assert_eq!(model.to_vec(), vec![0.5, 20.0, 400.0, 3e-6, 0.01]);
    }

    #[test]
    fn test_cylinder_rejects_invalid() {
        let bad = Cylinder {
            radius: -1.0,
            ..cylinder()
        };
        assert!(matches!(bad.intensity(0.1), Err(ModelError::Domain { parameter: "radius", .. })));
        assert!(matches!(cylinder().intensity(-0.1), Err(ModelError::InvalidQ { .. })));
    }

    #[test]
    fn test_elliptical_cylinder_orders_agree() {
        let fine = EllipticalCylinder76 {
            scale: 1.0,
            minor_radius: 20.0,
            axis_ratio: 1.5,
            length: 400.0,
            contrast: 3e-6,
            background: 0.0,
        };
        let coarse = EllipticalCylinder20::from_slice(&fine.to_vec()).unwrap();
        let (a, b) = (fine.intensity(0.05).unwrap(), coarse.intensity(0.05).unwrap());
        assert_relative_eq!(a, b, max_relative = 1e-4);

        // circular cross-section is the plain cylinder
        let circular = EllipticalCylinder76 {
            axis_ratio: 1.0,
            ..fine
        };
        assert_relative_eq!(
            circular.intensity(0.05).unwrap(),
            cylinder().intensity(0.05).unwrap(),
            max_relative = 1e-6
        );
    }

    #[test]
    fn test_hollow_cylinder_forward_limit() {
        let model = HollowCylinder {
            scale: 0.7,
            core_radius: 20.0,
            radius: 30.0,
            length: 400.0,
            contrast: 2e-6,
            background: 0.1,
        };
        let volume = PI * (30.0 * 30.0 - 20.0 * 20.0) * 400.0;
        let expected = 0.7 * 4e-12 * volume * 1e8 + 0.1;
        assert_relative_eq!(model.intensity(0.0).unwrap(), expected, max_relative = 1e-12);
        assert_relative_eq!(model.intensity(1e-5).unwrap(), expected, max_relative = 1e-5);
    }

    #[test]
    fn test_hollow_cylinder_core_must_fit() {
        let model = HollowCylinder {
            scale: 1.0,
            core_radius: 30.0,
            radius: 30.0,
            length: 400.0,
            contrast: 2e-6,
            background: 0.0,
        };
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_narrow_radius_distribution_matches_monodisperse() {
        let poly = CylinderPolyRadius {
            scale: 1.0,
            radius: 20.0,
            length: 400.0,
            polydispersity: 0.01,
            contrast: 3e-6,
            background: 0.0,
        };
        let q = 0.05;
        assert_relative_eq!(
            poly.intensity(q).unwrap(),
            cylinder().intensity(q).unwrap(),
            max_relative = 1e-2
        );
    }

    #[test]
    fn test_narrow_length_distribution_matches_monodisperse() {
        let poly = CylinderPolyLength {
            scale: 1.0,
            radius: 20.0,
            length: 400.0,
            polydispersity: 0.01,
            contrast: 3e-6,
            background: 0.0,
        };
        let q = 0.005;
        assert_relative_eq!(
            poly.intensity(q).unwrap(),
            cylinder().intensity(q).unwrap(),
            max_relative = 1e-2
        );
        assert!(CylinderPolyLength {
            polydispersity: 0.0,
            ..poly
        }
        .intensity(q)
        .is_err());
    }

    #[test]
    fn test_core_shell_cylinder_forward_limit() {
        let model = CoreShellCylinder {
            scale: 1.0,
            core_radius: 20.0,
            thickness: 10.0,
            length: 400.0,
            core_sld: 1e-6,
            shell_sld: 4e-6,
            solvent_sld: 1e-6,
            background: 0.0,
        };
        let core_volume = PI * 20.0 * 20.0 * 400.0;
        let outer_volume = PI * 30.0 * 30.0 * 420.0;
        let amplitude = core_volume * -3e-6 + outer_volume * 3e-6;
        let expected = amplitude * amplitude / outer_volume * 1e8;
        assert_relative_eq!(model.intensity(0.0).unwrap(), expected, max_relative = 1e-12);
    }

    #[test]
    fn test_poly_core_shell_narrow_matches_core_shell() {
        let poly = PolyCoreShellCylinder {
            scale: 1.0,
            radius: 20.0,
            sigma: 0.005,
            length: 400.0,
            radial_thickness: 10.0,
            face_thickness: 10.0,
            core_sld: 1e-6,
            shell_sld: 4e-6,
            solvent_sld: 1e-6,
            background: 0.0,
        };
        let mono = CoreShellCylinder {
            scale: 1.0,
            core_radius: 20.0,
            thickness: 10.0,
            length: 400.0,
            core_sld: 1e-6,
            shell_sld: 4e-6,
            solvent_sld: 1e-6,
            background: 0.0,
        };
        let q = 0.02;
        assert_relative_eq!(
            poly.intensity(q).unwrap(),
            mono.intensity(q).unwrap(),
            max_relative = 1e-2
        );
    }

    #[test]
    fn test_stacked_discs_single_disc_forward_limit() {
        let model = StackedDiscs {
            scale: 1.0,
            core_radius: 100.0,
            core_thickness: 10.0,
            layer_thickness: 5.0,
            core_sld: 4e-6,
            layer_sld: 2e-6,
            solvent_sld: 1e-6,
            stack_count: 1.0,
            gaussian_sigma: 0.0,
            background: 0.0,
        };
        let area = PI * 100.0 * 100.0;
        let amplitude = area * 10.0 * 3e-6 + area * 1e-6 * (20.0 - 10.0);
        let volume = area * 20.0;
        let expected = amplitude * amplitude / volume * 1e8;
        assert_relative_eq!(model.intensity(0.0).unwrap(), expected, max_relative = 1e-12);
        assert!(StackedDiscs {
            stack_count: 0.0,
            ..model
        }
        .validate()
        .is_err());
    }
}
