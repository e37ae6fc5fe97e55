//! Cylindrical shape kernels.
//!
//! Angles are measured between the cylinder axis and the scattering vector.
//! Every kernel returns a squared amplitude; the `*_average` helpers fold in
//! the orientational average over the isotropic distribution of axes.

use std::f64::consts::{FRAC_2_PI, PI};

use crate::math::quadrature::{GaussRule, Interval, GAUSS76};
use crate::math::special::{bessel_j1_ratio, sinc};

/// Squared amplitude of a uniform right circular cylinder at one orientation,
/// weighted by the `sin θ` Jacobian.
///
/// `half_length` is half of the cylinder length.
#[inline]
pub fn cyl_kernel(q: f64, radius: f64, half_length: f64, theta: f64) -> f64 {
    let (sin_t, cos_t) = theta.sin_cos();
    let axial = sinc(q * half_length * cos_t);
    let radial = bessel_j1_ratio(q * radius * sin_t);
    axial * axial * radial * radial * sin_t
}

/// Orientational average of [`cyl_kernel`] over `θ ∈ [0, π/2]`.
pub fn cylinder_average(q: f64, radius: f64, half_length: f64, rule: &GaussRule) -> f64 {
    rule.integrate(Interval::QUARTER_TURN, |theta| {
        cyl_kernel(q, radius, half_length, theta)
    })
}

/// Squared amplitude of a hollow cylinder (a tube) as a function of the
/// axis cosine `x`.
pub fn hollow_cyl_kernel(q: f64, core_radius: f64, radius: f64, length: f64, x: f64) -> f64 {
    let gamma_sq = (core_radius / radius).powi(2);
    let sin_t = (1.0 - x * x).sqrt();
    let shell = bessel_j1_ratio(q * radius * sin_t);
    let core = bessel_j1_ratio(q * core_radius * sin_t);
    let psi = (shell - gamma_sq * core) / (1.0 - gamma_sq);
    let axial = sinc(q * length * x / 2.0);
    psi * psi * axial * axial
}

/// Squared cross-section amplitude of an elliptical cylinder.
///
/// `ra` is the minor radius already scaled by the outer orientation node,
/// `axis_ratio` the ratio of major to minor radius and `phi` the angle around
/// the cross-section in `[0, π]`.
#[inline]
pub fn ellip_cyl_kernel(q: f64, ra: f64, axis_ratio: f64, phi: f64) -> f64 {
    let nu_sq = axis_ratio * axis_ratio;
    let arg = q * ra * ((1.0 + nu_sq) / 2.0 + (1.0 - nu_sq) * phi.cos() / 2.0).sqrt();
    let amplitude = bessel_j1_ratio(arg);
    amplitude * amplitude
}

/// Orientational average for an elliptical cylinder.
///
/// The outer integral runs over the axis cosine with the 76-point rule; the
/// cross-section average uses `inner` over `[0, π]` and is normalized by π.
pub fn elliptical_cylinder_average(
    q: f64,
    minor_radius: f64,
    axis_ratio: f64,
    length: f64,
    inner: &GaussRule,
) -> f64 {
    GAUSS76.integrate(Interval::UNIT, |x| {
        let ra = minor_radius * (1.0 - x * x).sqrt();
        let cross_section = inner.integrate(Interval::HALF_TURN, |phi| {
            ellip_cyl_kernel(q, ra, axis_ratio, phi)
        }) / PI;
        let axial = sinc(q * length * x / 2.0);
        cross_section * axial * axial
    })
}

/// Squared cross-section amplitude of an elliptical rod with semi-axes `a`
/// and `b`, averaged over the in-plane angle.
pub fn elliptical_cross_section(q: f64, a: f64, b: f64) -> f64 {
    let average = GAUSS76.integrate(Interval::QUARTER_TURN, |phi| {
        let (sin_p, cos_p) = phi.sin_cos();
        let arg = q * (a * a * sin_p * sin_p + b * b * cos_p * cos_p).sqrt();
        let amplitude = bessel_j1_ratio(arg);
        amplitude * amplitude
    });
    average * FRAC_2_PI
}

/// A cylinder with a core and a uniform shell on the curved surface and the
/// end faces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoreShellCylinderShape {
    pub core_radius: f64,
    pub radial_thickness: f64,
    pub face_thickness: f64,
    /// Half of the core length.
    pub half_length: f64,
    pub core_sld: f64,
    pub shell_sld: f64,
    pub solvent_sld: f64,
}

impl CoreShellCylinderShape {
    /// Outer radius including the shell.
    #[inline]
    pub fn outer_radius(&self) -> f64 {
        self.core_radius + self.radial_thickness
    }

    /// Volume enclosed by the outer surface of the shell.
    pub fn outer_volume(&self) -> f64 {
        let outer = self.outer_radius();
        PI * outer * outer * (2.0 * self.half_length + 2.0 * self.face_thickness)
    }

    /// Squared amplitude at axis angle `theta`, weighted by `sin θ`.
    ///
    /// Amplitudes of the core and of the whole particle are summed with
    /// their signed contrasts before squaring, so the result is in units of
    /// `(contrast · volume)²`.
    pub fn kernel(&self, q: f64, theta: f64) -> f64 {
        let (sin_t, cos_t) = theta.sin_cos();
        let outer = self.outer_radius();
        let core_volume = PI * self.core_radius * self.core_radius * (2.0 * self.half_length);
        let outer_volume = self.outer_volume();

        let core = core_volume
            * (self.core_sld - self.shell_sld)
            * sinc(q * self.half_length * cos_t)
            * bessel_j1_ratio(q * self.core_radius * sin_t);
        let shell = outer_volume
            * (self.shell_sld - self.solvent_sld)
            * sinc(q * (self.half_length + self.face_thickness) * cos_t)
            * bessel_j1_ratio(q * outer * sin_t);

        (core + shell) * (core + shell) * sin_t
    }

    /// Orientational average of [`Self::kernel`] over `θ ∈ [0, π/2]`.
    pub fn average(&self, q: f64) -> f64 {
        GAUSS76.integrate(Interval::QUARTER_TURN, |theta| self.kernel(q, theta))
    }
}

/// A stack of core discs separated by layers, with Gaussian disorder of the
/// repeat distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackedDiscShape {
    pub core_radius: f64,
    /// Half of the core thickness.
    pub half_thickness: f64,
    pub layer_thickness: f64,
    pub core_sld: f64,
    pub layer_sld: f64,
    pub solvent_sld: f64,
    /// Number of discs; fractional values enter the stacking sum as given.
    pub stack_count: f64,
    pub gaussian_sigma: f64,
}

impl StackedDiscShape {
    /// Repeat distance of the stack.
    #[inline]
    pub fn spacing(&self) -> f64 {
        2.0 * self.layer_thickness + 2.0 * self.half_thickness
    }

    /// Volume of all core discs including their layers.
    pub fn volume(&self) -> f64 {
        PI * self.core_radius * self.core_radius * self.spacing() * self.stack_count
    }

    /// Interference between discs along the stack axis at `q·cos θ`.
    pub fn stacking_factor(&self, q_axial: f64) -> f64 {
        let n = self.stack_count;
        let d = self.spacing();
        let mut sum = 0.0;
        let mut k = 1.0;
        while k < n {
            let damping = q_axial * q_axial * d * d * self.gaussian_sigma * self.gaussian_sigma * k
                / 2.0;
            sum += (n - k) * (q_axial * d * k).cos() * (-damping).exp();
            k += 1.0;
        }
        1.0 + 2.0 * sum / n
    }

    /// Squared amplitude of one disc times the stacking factor, weighted by
    /// `sin θ`.
    pub fn kernel(&self, q: f64, theta: f64) -> f64 {
        let (sin_t, cos_t) = theta.sin_cos();
        let area = PI * self.core_radius * self.core_radius;
        let total = 2.0 * (self.layer_thickness + self.half_thickness);
        let radial = bessel_j1_ratio(q * self.core_radius * sin_t);
        let core_axial = sinc(q * self.half_thickness * cos_t);
        let outer_axial = sinc(q * (self.half_thickness + self.layer_thickness) * cos_t);

        let core = area
            * (2.0 * self.half_thickness)
            * (self.core_sld - self.solvent_sld)
            * core_axial
            * radial;
        let layers = area
            * (self.layer_sld - self.solvent_sld)
            * (total * outer_axial - 2.0 * self.half_thickness * core_axial)
            * radial;

        (core + layers) * (core + layers) * sin_t * self.stacking_factor(q * cos_t)
    }

    /// Orientational average of [`Self::kernel`] over `θ ∈ [0, π/2]`.
    pub fn average(&self, q: f64) -> f64 {
        GAUSS76.integrate(Interval::QUARTER_TURN, |theta| self.kernel(q, theta))
    }
}
