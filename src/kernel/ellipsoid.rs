//! Ellipsoidal shape kernels.

use std::f64::consts::{FRAC_PI_2, PI};

use serde::{Deserialize, Serialize};

use crate::math::quadrature::{Interval, GAUSS76};
use crate::math::special::sphere_amplitude;

/// Squared amplitude of an ellipsoid of revolution with equatorial semi-axis
/// `equatorial` and polar semi-axis `polar`, at axis cosine `x`.
#[inline]
pub fn ellipsoid_kernel(q: f64, equatorial: f64, polar: f64, x: f64) -> f64 {
    let nu = polar / equatorial;
    let arg = q * equatorial * (1.0 + x * x * (nu * nu - 1.0)).sqrt();
    let amplitude = sphere_amplitude(arg);
    amplitude * amplitude
}

/// Orientational average of [`ellipsoid_kernel`] over `x ∈ [0, 1]`.
pub fn ellipsoid_average(q: f64, equatorial: f64, polar: f64) -> f64 {
    GAUSS76.integrate(Interval::UNIT, |x| ellipsoid_kernel(q, equatorial, polar, x))
}

/// Squared amplitude of a triaxial ellipsoid.
///
/// `x` parameterizes the azimuth as `π x / 2` and `y` is the cosine of the
/// polar angle; both range over `[0, 1]`.
#[inline]
pub fn triaxial_kernel(q: f64, a: f64, b: f64, c: f64, x: f64, y: f64) -> f64 {
    let (sin_p, cos_p) = (FRAC_PI_2 * x).sin_cos();
    let radius_sq =
        a * a * cos_p * cos_p + b * b * sin_p * sin_p * (1.0 - y * y) + c * c * y * y;
    let amplitude = sphere_amplitude(q * radius_sq.sqrt());
    amplitude * amplitude
}

/// Orientational average of [`triaxial_kernel`] over the unit square.
pub fn triaxial_average(q: f64, a: f64, b: f64, c: f64) -> f64 {
    GAUSS76.integrate(Interval::UNIT, |x| {
        GAUSS76.integrate(Interval::UNIT, |y| triaxial_kernel(q, a, b, c, x, y))
    })
}

/// Which semi-axis of a spheroid is the symmetry axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpheroidShape {
    /// Symmetry axis is the major axis.
    Prolate,
    /// Symmetry axis is the minor axis.
    Oblate,
}

/// A core-shell spheroid. Contrasts are relative: the core contrast is
/// core against shell and the shell contrast is shell against solvent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoreShellSpheroid {
    pub shape: SpheroidShape,
    pub core_major: f64,
    pub core_minor: f64,
    pub shell_major: f64,
    pub shell_minor: f64,
    pub core_contrast: f64,
    pub shell_contrast: f64,
}

impl CoreShellSpheroid {
    fn volume_of(&self, major: f64, minor: f64) -> f64 {
        let pi43 = 4.0 / 3.0 * PI;
        match self.shape {
            SpheroidShape::Prolate => pi43 * major * minor * minor,
            SpheroidShape::Oblate => pi43 * major * major * minor,
        }
    }

    fn effective_radius(&self, major: f64, minor: f64, x: f64) -> f64 {
        let (polar, equatorial) = match self.shape {
            SpheroidShape::Prolate => (major, minor),
            SpheroidShape::Oblate => (minor, major),
        };
        (polar * polar * x * x + equatorial * equatorial * (1.0 - x * x)).sqrt()
    }

    pub fn core_volume(&self) -> f64 {
        self.volume_of(self.core_major, self.core_minor)
    }

    /// Volume enclosed by the outer surface of the shell.
    pub fn outer_volume(&self) -> f64 {
        self.volume_of(self.shell_major, self.shell_minor)
    }

    /// Squared amplitude at axis cosine `x`, in `(contrast · volume)²`.
    pub fn kernel(&self, q: f64, x: f64) -> f64 {
        let core = sphere_amplitude(q * self.effective_radius(self.core_major, self.core_minor, x))
            * self.core_volume()
            * self.core_contrast;
        let shell =
            sphere_amplitude(q * self.effective_radius(self.shell_major, self.shell_minor, x))
                * self.outer_volume()
                * self.shell_contrast;
        (core + shell) * (core + shell)
    }

    /// Orientational average of [`Self::kernel`] over `x ∈ [0, 1]`.
    pub fn average(&self, q: f64) -> f64 {
        GAUSS76.integrate(Interval::UNIT, |x| self.kernel(q, x))
    }
}

/// Squared amplitude of a core-shell prolate or oblate spheroid.
pub fn core_shell_spheroid_kernel(spheroid: &CoreShellSpheroid, q: f64, x: f64) -> f64 {
    spheroid.kernel(q, x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_spherical_ellipsoid_is_orientation_free() {
        let sphere = sphere_amplitude(0.1 * 40.0).powi(2);
        for x in [0.0, 0.5, 1.0] {
            assert_relative_eq!(ellipsoid_kernel(0.1, 40.0, 40.0, x), sphere, max_relative = 1e-12);
        }
        assert_relative_eq!(ellipsoid_average(0.1, 40.0, 40.0), sphere, max_relative = 1e-12);
    }

    #[test]
    fn test_triaxial_equatorial_plane() {
        // at y = 0 the azimuth sweeps between a and b
        let q = 0.05;
        assert_relative_eq!(
            triaxial_kernel(q, 30.0, 30.0, 90.0, 0.37, 0.0),
            sphere_amplitude(q * 30.0).powi(2),
            max_relative = 1e-12
        );
        assert_relative_eq!(
            triaxial_kernel(q, 30.0, 45.0, 90.0, 1.0, 0.0),
            sphere_amplitude(q * 45.0).powi(2),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_triaxial_forward_limit() {
        assert_relative_eq!(triaxial_average(0.0, 20.0, 35.0, 60.0), 1.0, max_relative = 1e-12);
    }

    #[test]
    fn test_core_shell_spheroid_volumes() {
        let prolate = CoreShellSpheroid {
            shape: SpheroidShape::Prolate,
            core_major: 100.0,
            core_minor: 50.0,
            shell_major: 110.0,
            shell_minor: 60.0,
            core_contrast: 1e-6,
            shell_contrast: 2e-6,
        };
        let oblate = CoreShellSpheroid {
            shape: SpheroidShape::Oblate,
            ..prolate
        };
        let pi43 = 4.0 / 3.0 * PI;
        assert_relative_eq!(prolate.outer_volume(), pi43 * 110.0 * 60.0 * 60.0);
        assert_relative_eq!(oblate.outer_volume(), pi43 * 110.0 * 110.0 * 60.0);
    }

    #[test]
    fn test_core_shell_spheroid_forward_amplitude() {
        let spheroid = CoreShellSpheroid {
            shape: SpheroidShape::Oblate,
            core_major: 60.0,
            core_minor: 20.0,
            shell_major: 70.0,
            shell_minor: 30.0,
            core_contrast: 1e-6,
            shell_contrast: -3e-6,
        };
        let amplitude = spheroid.core_volume() * 1e-6 + spheroid.outer_volume() * -3e-6;
        assert_relative_eq!(spheroid.average(0.0), amplitude * amplitude, max_relative = 1e-12);
        assert_eq!(
            core_shell_spheroid_kernel(&spheroid, 0.02, 0.4),
            spheroid.kernel(0.02, 0.4)
        );
    }
}
