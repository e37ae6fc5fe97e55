//! Numerical building blocks: quadrature, special functions and size
//! distributions.

pub mod distribution;
pub mod quadrature;
pub mod special;

pub use distribution::{schulz_point, LogNormalDistribution, SchulzDistribution};
pub use quadrature::{GaussRule, Interval, QuadratureOrder, GAUSS20, GAUSS76};
pub use special::{bessel_j1, bessel_j1_ratio, ln_gamma, sech, sinc, sphere_amplitude};
