//! Rectangular parallelepiped kernel.

use std::f64::consts::FRAC_PI_2;

use crate::math::quadrature::{Interval, GAUSS76};
use crate::math::special::sinc;

/// Squared amplitude of the rectangular cross-section.
///
/// Lengths are normalized to the middle edge `b`: `a_ratio = a / b` and
/// `mu = q·b·sqrt(1 - σ²)` for the outer orientation node `σ`. `u` runs over
/// `[0, 1]` and parameterizes the in-plane angle as `π u / 2`.
#[inline]
pub fn pp_kernel(a_ratio: f64, mu: f64, u: f64) -> f64 {
    let (sin_u, cos_u) = (FRAC_PI_2 * u).sin_cos();
    let first = sinc(mu / 2.0 * cos_u);
    let second = sinc(mu * a_ratio / 2.0 * sin_u);
    first * first * second * second
}

/// Orientational average for a parallelepiped with edges `a ≤ b ≤ c`.
pub fn parallelepiped_average(q: f64, a: f64, b: f64, c: f64) -> f64 {
    let mu = q * b;
    let a_ratio = a / b;
    let c_ratio = c / b;
    GAUSS76.integrate(Interval::UNIT, |sigma| {
        let mu_sigma = mu * (1.0 - sigma * sigma).sqrt();
        let cross_section = GAUSS76.integrate(Interval::UNIT, |u| pp_kernel(a_ratio, mu_sigma, u));
        let axial = sinc(mu * c_ratio * sigma / 2.0);
        cross_section * axial * axial
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_pp_kernel_zero_arguments() {
        assert_eq!(pp_kernel(0.5, 0.0, 0.3), 1.0);
        // u = 0 zeroes the second argument exactly
        let first = sinc(1.5 / 2.0).powi(2);
        assert_relative_eq!(pp_kernel(0.5, 1.5, 0.0), first, max_relative = 1e-15);
    }

    #[test]
    fn test_parallelepiped_forward_limit() {
        assert_relative_eq!(
            parallelepiped_average(0.0, 10.0, 20.0, 40.0),
            1.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_parallelepiped_decreases_from_forward_limit() {
        let small = parallelepiped_average(0.01, 10.0, 20.0, 40.0);
        let larger = parallelepiped_average(0.05, 10.0, 20.0, 40.0);
        assert!(small < 1.0);
        assert!(larger < small);
    }
}
