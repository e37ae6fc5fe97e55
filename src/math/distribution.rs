//! Size distributions for polydispersity averaging.

use super::quadrature::Interval;
use super::special::ln_gamma;
use crate::model::ModelError;

/// Nominal half-width of the Schulz integration range, in standard deviations.
const SCHULZ_RANGE: f64 = 3.4;
/// Relative polydispersity above which the upper bound is widened.
const SCHULZ_BROAD_THRESHOLD: f64 = 0.3;
/// Widening of the upper bound per unit of polydispersity above the threshold.
const SCHULZ_BROAD_SLOPE: f64 = 18.0;
/// Half-width of the log-normal range in units of sigma.
const LOG_NORMAL_RANGE: f64 = 4.0;

/// Schulz (gamma family) distribution of a size variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchulzDistribution {
    mean: f64,
    polydispersity: f64,
    z: f64,
}

impl SchulzDistribution {
    /// Create from the mean size and the relative polydispersity `σ/mean`.
    pub fn new(mean: f64, polydispersity: f64) -> Result<Self, ModelError> {
        if !(mean.is_finite() && mean > 0.0) {
            return Err(ModelError::domain(
                "SchulzDistribution",
                "mean",
                mean,
                "finite and > 0",
            ));
        }
        if !(polydispersity.is_finite() && polydispersity > 0.0) {
            return Err(ModelError::domain(
                "SchulzDistribution",
                "polydispersity",
                polydispersity,
                "finite and > 0",
            ));
        }
        let z = (1.0 / polydispersity) * (1.0 / polydispersity) - 1.0;
        Ok(Self {
            mean,
            polydispersity,
            z,
        })
    }

    #[inline]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    #[inline]
    pub fn polydispersity(&self) -> f64 {
        self.polydispersity
    }

    /// Shape parameter `z = 1/pd² - 1`.
    #[inline]
    pub fn z(&self) -> f64 {
        self.z
    }

    /// Probability density at `x`.
    #[inline]
    pub fn density(&self, x: f64) -> f64 {
        schulz_point(x, self.mean, self.z)
    }

    /// `<x²>/<x>²`, used to normalize by the mean particle volume when the
    /// volume scales with the square of the distributed size.
    #[inline]
    pub fn second_moment_ratio(&self) -> f64 {
        (self.z + 2.0) / (self.z + 1.0)
    }

    /// Integration range covering the distribution.
    ///
    /// The lower bound uses the nominal 3.4σ half-width and is clamped at
    /// zero; the upper bound is widened for broad distributions.
    pub fn bounds(&self) -> Interval {
        let pd = self.polydispersity;
        let mut range = SCHULZ_RANGE;
        let lower = (self.mean * (1.0 - range * pd)).max(0.0);
        if pd > SCHULZ_BROAD_THRESHOLD {
            range = SCHULZ_RANGE + (pd - SCHULZ_BROAD_THRESHOLD) * SCHULZ_BROAD_SLOPE;
        }
        let upper = self.mean * (1.0 + range * pd);
        Interval::new(lower, upper)
    }
}

/// Normalized Schulz density of `x` for the given mean and shape parameter.
///
/// Evaluated in log space so that large `z` (narrow distributions) does not
/// overflow the power and gamma terms.
pub fn schulz_point(x: f64, mean: f64, z: f64) -> f64 {
    let log_density = z * x.ln() - ln_gamma(z + 1.0) + (z + 1.0) * ((z + 1.0) / mean).ln()
        - (x / mean * (z + 1.0));
    log_density.exp()
}

/// Log-normal distribution of a radius, parameterized by its median and the
/// standard deviation of `ln r`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogNormalDistribution {
    median: f64,
    sigma: f64,
}

impl LogNormalDistribution {
    pub fn new(median: f64, sigma: f64) -> Result<Self, ModelError> {
        if !(median.is_finite() && median > 0.0) {
            return Err(ModelError::domain(
                "LogNormalDistribution",
                "median",
                median,
                "finite and > 0",
            ));
        }
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(ModelError::domain(
                "LogNormalDistribution",
                "sigma",
                sigma,
                "finite and > 0",
            ));
        }
        Ok(Self { median, sigma })
    }

    #[inline]
    pub fn median(&self) -> f64 {
        self.median
    }

    #[inline]
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Probability density at `r`.
    pub fn density(&self, r: f64) -> f64 {
        let t = (self.median / r).ln() / self.sigma;
        (1.0 / (r * self.sigma * (2.0 * std::f64::consts::PI).sqrt())) * (-(0.5 * t * t)).exp()
    }

    /// `[median·e^(-4σ), median·e^(4σ)]`.
    pub fn bounds(&self) -> Interval {
        let log_median = self.median.ln();
        Interval::new(
            (log_median - LOG_NORMAL_RANGE * self.sigma).exp(),
            (log_median + LOG_NORMAL_RANGE * self.sigma).exp(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::quadrature::{GAUSS20, GAUSS76};
    use approx::assert_relative_eq;

    #[test]
    fn test_schulz_shape_parameter() {
        let dist = SchulzDistribution::new(50.0, 0.1).unwrap();
        assert_relative_eq!(dist.z(), 99.0, max_relative = 1e-12);
        assert_relative_eq!(dist.second_moment_ratio(), 101.0 / 100.0);
    }

    #[test]
    fn test_schulz_normalization() {
        for z in [1.0_f64, 10.0, 100.0] {
            let pd = 1.0 / (z + 1.0).sqrt();
            let dist = SchulzDistribution::new(50.0, pd).unwrap();
            let total = GAUSS20.integrate(dist.bounds(), |x| dist.density(x));
            assert_relative_eq!(total, 1.0, max_relative = 5e-3);
        }
    }

    #[test]
    fn test_schulz_mean_is_preserved() {
        let dist = SchulzDistribution::new(80.0, 0.2).unwrap();
        let mean = GAUSS76.integrate(dist.bounds(), |x| x * dist.density(x));
        assert_relative_eq!(mean, 80.0, max_relative = 1e-3);
    }

    #[test]
    fn test_schulz_narrow_does_not_overflow() {
        let dist = SchulzDistribution::new(20.0, 0.001).unwrap();
        let peak = dist.density(20.0);
        assert!(peak.is_finite());
        assert!(peak > 0.0);
    }

    #[test]
    fn test_schulz_bounds() {
        let narrow = SchulzDistribution::new(100.0, 0.1).unwrap().bounds();
        assert_relative_eq!(narrow.lower, 66.0, max_relative = 1e-12);
        assert_relative_eq!(narrow.upper, 134.0, max_relative = 1e-12);

        // broad: lower bound clamps at zero, upper bound widens
        let broad = SchulzDistribution::new(100.0, 0.5).unwrap().bounds();
        assert_eq!(broad.lower, 0.0);
        assert_relative_eq!(broad.upper, 100.0 * (1.0 + 7.0 * 0.5), max_relative = 1e-12);
    }

    #[test]
    fn test_schulz_rejects_non_positive() {
        assert!(SchulzDistribution::new(50.0, 0.0).is_err());
        assert!(SchulzDistribution::new(50.0, -0.1).is_err());
        assert!(SchulzDistribution::new(0.0, 0.1).is_err());
        assert!(SchulzDistribution::new(50.0, f64::NAN).is_err());
    }

    #[test]
    fn test_log_normal_normalization() {
        let dist = LogNormalDistribution::new(20.0, 0.2).unwrap();
        let total = GAUSS20.integrate(dist.bounds(), |r| dist.density(r));
        assert_relative_eq!(total, 1.0, max_relative = 1e-3);
    }

    #[test]
    fn test_log_normal_bounds() {
        let dist = LogNormalDistribution::new(20.0, 0.1).unwrap();
        let bounds = dist.bounds();
        assert_relative_eq!(bounds.lower, 20.0 * (-0.4_f64).exp(), max_relative = 1e-12);
        assert_relative_eq!(bounds.upper, 20.0 * 0.4_f64.exp(), max_relative = 1e-12);
        assert!(LogNormalDistribution::new(20.0, 0.0).is_err());
    }
}
