//! Ellipsoid family models.

use std::f64::consts::PI;

use super::error::Result;
use super::registry::ModelKind;
use super::traits::{
    finite, parameter_vector, positive, scale_and_background, FormFactor, CM_PER_ANGSTROM,
};
use crate::kernel::ellipsoid::{
    ellipsoid_average, triaxial_average, CoreShellSpheroid, SpheroidShape,
};

parameter_vector! {
    /// Ellipsoid with three independent semi-axes.
    pub struct TriaxialEllipsoid {
        scale,
        semi_axis_a,
        semi_axis_b,
        semi_axis_c,
        contrast,
        background,
    }
}

impl FormFactor for TriaxialEllipsoid {
    fn kind(&self) -> ModelKind {
        ModelKind::TriaxialEllipsoid
    }

    fn scale(&self) -> f64 {
        self.scale
    }

    fn background(&self) -> f64 {
        self.background
    }

    fn validate(&self) -> Result<()> {
        let model = "TriaxialEllipsoid";
        scale_and_background(model, self.scale, self.background)?;
        positive(model, "semi_axis_a", self.semi_axis_a)?;
        positive(model, "semi_axis_b", self.semi_axis_b)?;
        positive(model, "semi_axis_c", self.semi_axis_c)?;
        finite(model, "contrast", self.contrast)
    }

    fn compute(&self, q: f64) -> Result<f64> {
        let (a, b, c) = (self.semi_axis_a, self.semi_axis_b, self.semi_axis_c);
        let volume = 4.0 * PI / 3.0 * a * b * c;
        Ok(triaxial_average(q, a, b, c) * self.contrast * self.contrast * volume * CM_PER_ANGSTROM)
    }
}

parameter_vector! {
    /// Ellipsoid of revolution.
    pub struct Ellipsoid {
        scale,
        /// Semi-axis along the symmetry axis.
        polar_radius,
        equatorial_radius,
        contrast,
        background,
    }
}

impl FormFactor for Ellipsoid {
    fn kind(&self) -> ModelKind {
        ModelKind::Ellipsoid
    }

    fn scale(&self) -> f64 {
        self.scale
    }

    fn background(&self) -> f64 {
        self.background
    }

    fn validate(&self) -> Result<()> {
        let model = "Ellipsoid";
        scale_and_background(model, self.scale, self.background)?;
        positive(model, "polar_radius", self.polar_radius)?;
        positive(model, "equatorial_radius", self.equatorial_radius)?;
        finite(model, "contrast", self.contrast)
    }

    fn compute(&self, q: f64) -> Result<f64> {
        let (a, c) = (self.equatorial_radius, self.polar_radius);
        let volume = 4.0 * PI / 3.0 * a * a * c;
        Ok(ellipsoid_average(q, a, c) * self.contrast * self.contrast * volume * CM_PER_ANGSTROM)
    }
}

parameter_vector! {
    /// Oblate spheroid with a core and a shell.
    pub struct OblateCoreShell {
        scale,
        core_major,
        core_minor,
        shell_major,
        shell_minor,
        /// Core against shell.
        core_contrast,
        /// Shell against solvent.
        shell_contrast,
        background,
    }
}

parameter_vector! {
    /// Prolate spheroid with a core and a shell.
    pub struct ProlateCoreShell {
        scale,
        core_major,
        core_minor,
        shell_major,
        shell_minor,
        /// Core against shell.
        core_contrast,
        /// Shell against solvent.
        shell_contrast,
        background,
    }
}

fn validate_spheroid(model: &'static str, spheroid: &CoreShellSpheroid) -> Result<()> {
    positive(model, "core_major", spheroid.core_major)?;
    positive(model, "core_minor", spheroid.core_minor)?;
    positive(model, "shell_major", spheroid.shell_major)?;
    positive(model, "shell_minor", spheroid.shell_minor)?;
    finite(model, "core_contrast", spheroid.core_contrast)?;
    finite(model, "shell_contrast", spheroid.shell_contrast)
}

fn spheroid_form_factor(spheroid: &CoreShellSpheroid, q: f64) -> f64 {
    spheroid.average(q) / spheroid.outer_volume() * CM_PER_ANGSTROM
}

macro_rules! core_shell_spheroid_model {
    ($model:ident, $shape:expr) => {
        impl $model {
            fn spheroid(&self) -> CoreShellSpheroid {
                CoreShellSpheroid {
                    shape: $shape,
                    core_major: self.core_major,
                    core_minor: self.core_minor,
                    shell_major: self.shell_major,
                    shell_minor: self.shell_minor,
                    core_contrast: self.core_contrast,
                    shell_contrast: self.shell_contrast,
                }
            }
        }

        impl FormFactor for $model {
            fn kind(&self) -> ModelKind {
                ModelKind::$model
            }

            fn scale(&self) -> f64 {
                self.scale
            }

            fn background(&self) -> f64 {
                self.background
            }

            fn validate(&self) -> Result<()> {
                let model = stringify!($model);
                scale_and_background(model, self.scale, self.background)?;
                validate_spheroid(model, &self.spheroid())
            }

            fn compute(&self, q: f64) -> Result<f64> {
                Ok(spheroid_form_factor(&self.spheroid(), q))
            }
        }
    };
}

core_shell_spheroid_model!(OblateCoreShell, SpheroidShape::Oblate);
core_shell_spheroid_model!(ProlateCoreShell, SpheroidShape::Prolate);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::special::sphere_amplitude;
    use crate::model::traits::ParameterVector;
    use approx::assert_relative_eq;

    #[test]
    fn test_ellipsoid_with_equal_axes_is_sphere() {
        let model = Ellipsoid {
            scale: 1.0,
            polar_radius: 50.0,
            equatorial_radius: 50.0,
            contrast: 2e-6,
            background: 0.0,
        };
        let volume = 4.0 * PI / 3.0 * 50.0_f64.powi(3);
        for q in [0.0, 0.01, 0.05, 0.2] {
            let sphere = 4e-12 * volume * 1e8 * sphere_amplitude(q * 50.0).powi(2);
            assert_relative_eq!(model.intensity(q).unwrap(), sphere, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_small_q_matches_forward_limit() {
        let model = Ellipsoid {
            scale: 1.0,
            polar_radius: 20.0,
            equatorial_radius: 20.0,
            contrast: 1e-6,
            background: 0.0,
        };
        let forward = model.intensity(0.0).unwrap();
        for q in [1e-7, 1e-8, 1e-9] {
            assert_relative_eq!(model.intensity(q).unwrap(), forward, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_ellipsoid_parameter_order() {
        let model = Ellipsoid::from_slice(&[1.0, 80.0, 20.0, 1e-6, 0.0]).unwrap();
        assert_eq!(model.polar_radius, 80.0);
        assert_eq!(model.equatorial_radius, 20.0);
        assert_eq!(
            Ellipsoid::parameter_names(),
            &["scale", "polar_radius", "equatorial_radius", "contrast", "background"]
        );
    }

    #[test]
    fn test_triaxial_forward_limit() {
        let model = TriaxialEllipsoid {
            scale: 1.0,
            semi_axis_a: 20.0,
            semi_axis_b: 30.0,
            semi_axis_c: 60.0,
            contrast: 1e-6,
            background: 0.0,
        };
        let volume = 4.0 * PI / 3.0 * 20.0 * 30.0 * 60.0;
        assert_relative_eq!(model.intensity(0.0).unwrap(), 1e-12 * volume * 1e8, max_relative = 1e-12);
        assert!(TriaxialEllipsoid {
            semi_axis_b: 0.0,
            ..model
        }
        .validate()
        .is_err());
    }

    #[test]
    fn test_core_shell_spheroid_with_matched_core_is_homogeneous() {
        // zero core contrast leaves a homogeneous spheroid with the shell
        // dimensions; a sphere of those dimensions has a closed form
        let model = ProlateCoreShell {
            scale: 1.0,
            core_major: 30.0,
            core_minor: 30.0,
            shell_major: 40.0,
            shell_minor: 40.0,
            core_contrast: 0.0,
            shell_contrast: 2e-6,
            background: 0.0,
        };
        let volume = 4.0 * PI / 3.0 * 40.0_f64.powi(3);
        let q = 0.03;
        let expected = 4e-12 * volume * 1e8 * sphere_amplitude(q * 40.0).powi(2);
        assert_relative_eq!(model.intensity(q).unwrap(), expected, max_relative = 1e-10);

        let oblate = OblateCoreShell::from_slice(&model.to_vec()).unwrap();
        assert_relative_eq!(oblate.intensity(q).unwrap(), expected, max_relative = 1e-10);
    }

    #[test]
    fn test_oblate_and_prolate_differ() {
        let values = [1.0, 60.0, 20.0, 70.0, 30.0, 1e-6, 2e-6, 0.0];
        let oblate = OblateCoreShell::from_slice(&values).unwrap();
        let prolate = ProlateCoreShell::from_slice(&values).unwrap();
        assert_eq!(oblate.kind(), ModelKind::OblateCoreShell);
        assert_ne!(oblate.intensity(0.05).unwrap(), prolate.intensity(0.05).unwrap());
    }
}
