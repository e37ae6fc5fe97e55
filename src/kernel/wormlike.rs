//! Single-chain scattering function of a worm-like (Kratky–Porod) chain with
//! excluded volume.
//!
//! The chain is described by its contour length `L` and Kuhn length `b`.
//! Below a crossover `q·b` the scattering is an excluded-volume corrected
//! Debye function; above it a pair of power laws is matched in value and
//! slope at the crossover, plus the rigid-rod `π/(qL)` term. Long and short
//! chains use different exponents and crossover points.

use std::f64::consts::PI;

use crate::math::special::sech;
use crate::model::ModelError;

/// Power-law exponents for long chains.
const P1_LONG: f64 = 4.12;
const P2_LONG: f64 = 4.42;
/// Power-law exponents for short chains.
const P1_SHORT: f64 = 5.36;
const P2_SHORT: f64 = 5.62;
/// `q·b` at which long chains switch to the power laws.
const Q0_LONG: f64 = 3.1;
/// Lower bound on the short-chain crossover `q·b`.
const Q0_SHORT_MIN: f64 = 3.0;
/// `q·b` below which the short-chain Guinier expansion is used.
const GUINIER_LIMIT: f64 = 0.01;
/// `u = q²Rg²` below which the closed forms in `u` switch to their series.
const SERIES_LIMIT: f64 = 1e-3;

/// Excluded-volume power-law amplitudes.
const C1: f64 = 1.22;
const C2: f64 = 0.4288;
const C3: f64 = -1.651;
/// Centre and width of the tanh crossover between Debye and power law.
const CROSSOVER_CENTRE: f64 = 1.523;
const CROSSOVER_WIDTH: f64 = 0.1477;
/// Flory exponent.
const NU: f64 = 0.585;
/// Relative step of the finite-difference slope test in the corrected
/// excluded-volume function.
const SLOPE_STEP: f64 = 1.05;

/// Swelling of the ideal radius of gyration, `α²(L/b)`.
pub fn alpha_square(x: f64) -> f64 {
    (1.0 + (x / 3.12).powi(2) + (x / 8.67).powi(3)).powf(0.176 / 3.0)
}

/// Weight of the power-law branch, rising from 0 to 1 around `x = 1.523`.
pub fn crossover_weight(x: f64) -> f64 {
    0.5 * (1.0 + ((x - CROSSOVER_CENTRE) / CROSSOVER_WIDTH).tanh())
}

/// Excluded-volume power law in `x = q·Rg`.
fn excluded_volume_tail(x: f64) -> f64 {
    C1 * x.powf(-1.0 / NU) + C2 * x.powf(-2.0 / NU) + C3 * x.powf(-3.0 / NU)
}

/// Debye function `2(e^{-u} + u - 1)/u²`.
fn debye(u: f64) -> f64 {
    if u < SERIES_LIMIT {
        1.0 - u / 3.0 + u * u / 12.0 - u * u * u / 60.0
    } else {
        2.0 * ((-u).exp() + u - 1.0) / (u * u)
    }
}

/// Finite-length correction `4/15 + 7/(15u) - (11/15 + 7/(15u))e^{-u}`.
fn finite_length_term(u: f64) -> f64 {
    if u < SERIES_LIMIT {
        u / 2.0 - 13.0 * u * u / 45.0 + 37.0 * u * u * u / 360.0
    } else {
        4.0 / 15.0 + 7.0 / (15.0 * u) - (11.0 / 15.0 + 7.0 / (15.0 * u)) * (-u).exp()
    }
}

/// Long or short chain, split at `L = 4b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainRegime {
    Long,
    Short,
}

/// A worm-like chain with its regime-dependent power-law amplitudes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WormlikeChain {
    contour_length: f64,
    kuhn_length: f64,
    regime: ChainRegime,
    /// Crossover `q·b` for the power-law branch.
    q0: f64,
    a1: f64,
    a2: f64,
}

impl WormlikeChain {
    /// Create a chain of contour length `L` and Kuhn length `b`.
    ///
    /// Both lengths must be finite and positive.
    pub fn new(contour_length: f64, kuhn_length: f64) -> Result<Self, ModelError> {
        if !(contour_length.is_finite() && contour_length > 0.0) {
            return Err(ModelError::domain(
                "WormlikeChain",
                "length",
                contour_length,
                "finite and > 0",
            ));
        }
        if !(kuhn_length.is_finite() && kuhn_length > 0.0) {
            return Err(ModelError::domain(
                "WormlikeChain",
                "kuhn_length",
                kuhn_length,
                "finite and > 0",
            ));
        }

        let mut chain = Self {
            contour_length,
            kuhn_length,
            regime: if contour_length > 4.0 * kuhn_length {
                ChainRegime::Long
            } else {
                ChainRegime::Short
            },
            q0: Q0_LONG,
            a1: 0.0,
            a2: 0.0,
        };
        let (q0, a1, a2) = match chain.regime {
            ChainRegime::Long => {
                let (a1, a2) = chain.long_amplitudes(P1_LONG, P2_LONG, Q0_LONG);
                (Q0_LONG, a1, a2)
            }
            ChainRegime::Short => {
                let q0 = (1.9 / chain.rg_square_short().sqrt()).max(Q0_SHORT_MIN);
                let (a1, a2) = chain.short_amplitudes(P1_SHORT, P2_SHORT, q0);
                (q0, a1, a2)
            }
        };
        chain.q0 = q0;
        chain.a1 = a1;
        chain.a2 = a2;
        Ok(chain)
    }

    #[inline]
    pub fn contour_length(&self) -> f64 {
        self.contour_length
    }

    #[inline]
    pub fn kuhn_length(&self) -> f64 {
        self.kuhn_length
    }

    #[inline]
    pub fn regime(&self) -> ChainRegime {
        self.regime
    }

    /// Ratio of contour to Kuhn length.
    #[inline]
    fn ratio(&self) -> f64 {
        self.contour_length / self.kuhn_length
    }

    /// Amplitude of the finite-length correction in the long-chain branch.
    fn finite_length_amplitude(&self) -> f64 {
        let ratio = self.ratio();
        if ratio > 10.0 {
            3.06 / ratio.powf(0.44)
        } else {
            1.0
        }
    }

    /// Ideal worm-like chain `Rg²`, including end effects.
    pub fn rg_square_zero(&self) -> f64 {
        let (l, b) = (self.contour_length, self.kuhn_length);
        let r = b / l;
        (l * b / 6.0) * (1.0 - 1.5 * r + 1.5 * r * r - 0.75 * r.powi(3) * (1.0 - (-2.0 * l / b).exp()))
    }

    /// Swollen `Rg²` for short chains.
    pub fn rg_square_short(&self) -> f64 {
        alpha_square(self.ratio()) * self.rg_square_zero()
    }

    /// Swollen `Rg²` in the long-chain limit.
    pub fn rg_square(&self) -> f64 {
        alpha_square(self.ratio()) * self.contour_length * self.kuhn_length / 6.0
    }

    /// `Rg²·q²` with the long-chain radius.
    #[inline]
    pub fn u(&self, q: f64) -> f64 {
        self.rg_square() * q * q
    }

    /// `Rg²·q²` with the short-chain radius.
    #[inline]
    pub fn u_short(&self, q: f64) -> f64 {
        self.rg_square_short() * q * q
    }

    /// Debye function with the long-chain radius.
    pub fn debye(&self, q: f64) -> f64 {
        debye(self.u(q))
    }

    /// Debye function with the short-chain radius.
    pub fn debye_short(&self, q: f64) -> f64 {
        debye(self.u_short(q))
    }

    /// Debye function blended into the excluded-volume power law.
    pub fn excluded_volume(&self, q: f64) -> f64 {
        let x = q * self.rg_square().sqrt();
        let w = crossover_weight(x);
        (1.0 - w) * self.debye(q) + w * excluded_volume_tail(x)
    }

    /// [`Self::excluded_volume`] with the power-law term dropped wherever the
    /// blended function is locally non-decreasing in `q`.
    ///
    /// The slope is taken as a forward difference with step `0.05·q`.
    pub fn excluded_volume_corrected(&self, q: f64) -> f64 {
        let stepped = q * SLOPE_STEP;
        let slope = (self.excluded_volume(stepped) - self.excluded_volume(q)) / (stepped - q);
        let x = q * self.rg_square().sqrt();
        let w = crossover_weight(x);
        // an overflowing tail leaves a NaN slope; drop the tail then too
        let tail = if slope < 0.0 {
            w * excluded_volume_tail(x)
        } else {
            0.0
        };
        (1.0 - w) * self.debye(q) + tail
    }

    /// Power-law amplitudes for long chains matched at `q0`.
    ///
    /// `value` and `slope` are the low-q branch and its derivative at the
    /// crossover; the two amplitudes reproduce both.
    fn long_amplitudes(&self, p1: f64, p2: f64, q0: f64) -> (f64, f64) {
        let (l, b) = (self.contour_length, self.kuhn_length);
        let c = self.finite_length_amplitude();
        let rg2 = self.rg_square();
        let rg4 = rg2 * rg2;
        let rg = rg2.sqrt();
        let (b2, b3, b4) = (b * b, b * b * b, b * b * b * b);
        let (q02, q03) = (q0 * q0, q0 * q0 * q0);
        let (q04, q05) = (q03 * q0, q03 * q0 * q0);

        let x = rg * q0 / b;
        let ex = (-(q02 * rg2 / b2)).exp();
        let blend = (x - CROSSOVER_CENTRE) / CROSSOVER_WIDTH;
        let th = blend.tanh();
        let sh2 = sech(blend).powi(2);
        let tail = excluded_volume_tail(x);
        let tail_slope = -(3.0 * C3 * rg * x.powf(-1.0 - 3.0 / NU)
            + 2.0 * C2 * rg * x.powf(-1.0 - 2.0 / NU)
            + C1 * rg * x.powf(-1.0 - 1.0 / NU))
            / NU;
        let lower = 1.0 + 0.5 * (-1.0 - th);
        let upper = 1.0 + th;
        let g = -1.0 + ex + q02 * rg2 / b2;
        let k = 11.0 / 15.0 + 7.0 * b2 / (15.0 * q02 * rg2);

        let finite = b * c * (4.0 / 15.0 - ex * k + 7.0 * b2 / (15.0 * q02 * rg2));
        let finite_slope = b
            * c
            * (-(14.0 * b3 / (15.0 * q03 * rg2))
                + 14.0 * b3 * ex / (15.0 * q03 * rg2)
                + 2.0 * ex * q0 * k * rg2 / b);

        let value = -(b * PI / (l * q0))
            + finite / l
            + 2.0 * b4 * g * lower / (q04 * rg4)
            + 0.5 * tail * upper;
        let slope = b2 * PI / (l * q02) + finite_slope / l + rg * tail * sh2 / (2.0 * CROSSOVER_WIDTH)
            - b4 * rg * g * sh2 / (CROSSOVER_WIDTH * q04 * rg4)
            + 2.0 * b4 * (2.0 * q0 * rg2 / b - 2.0 * ex * q0 * rg2 / b) * lower / (q04 * rg4)
            - 8.0 * b4 * b * g * lower / (q05 * rg4)
            + 0.5 * tail_slope * upper;

        let denominator =
            1.0 / (b * p1 * q0.powf(-1.0 - p1 - p2) - b * p2 * q0.powf(-1.0 - p1 - p2));
        let mixed = -q0.powf(-p1) * slope - b * p1 * q0.powf(-1.0 - p1) * value;
        let a1 = q0.powf(p1) * value + denominator * q0.powf(p1 - p2) * mixed;
        let a2 = -denominator * mixed;
        (a1, a2)
    }

    /// Power-law amplitudes for short chains matched at `q0`.
    fn short_amplitudes(&self, p1: f64, p2: f64, q0: f64) -> (f64, f64) {
        let (l, b) = (self.contour_length, self.kuhn_length);
        let rg2 = self.rg_square_short();
        let rg4 = rg2 * rg2;
        let b3 = b * b * b;
        let q02 = q0 * q0;
        let t = q02 * rg2 / (b * b);
        let (et, emt) = (t.exp(), (-t).exp());

        let bracket = |p: f64| {
            8.0 * b3 * l * (1.0 - et) - 2.0 * b3 * l * p * (1.0 - et)
                + 4.0 * b * l * q02 * rg2 * (1.0 + et)
                - 2.0 * b * et * l * p * q02 * rg2
                + et * PI * q02 * q0 * rg4 * (p - 1.0)
        };
        let denominator = l * (p1 - p2) * rg4;
        let a1 = b * emt * q0.powf(p1 - 4.0) * bracket(p2) / denominator;
        let a2 = -b * emt * q0.powf(p2 - 4.0) * bracket(p1) / denominator;
        (a1, a2)
    }

    /// Normalized single-chain scattering function `S(q)`, equal to 1 at
    /// `q = 0`.
    pub fn structure_factor(&self, q: f64) -> f64 {
        if q == 0.0 {
            return 1.0;
        }
        let (l, b) = (self.contour_length, self.kuhn_length);
        let qb = q * b;
        match self.regime {
            ChainRegime::Long if qb <= Q0_LONG => {
                self.excluded_volume_corrected(q)
                    + self.finite_length_amplitude() * finite_length_term(self.u(q)) * (b / l)
            }
            ChainRegime::Long => {
                self.a1 / qb.powf(P1_LONG) + self.a2 / qb.powf(P2_LONG) + PI / (q * l)
            }
            ChainRegime::Short if qb <= self.q0 => {
                if qb <= GUINIER_LIMIT {
                    1.0 - self.rg_square_short() * q * q / 3.0
                } else {
                    self.debye_short(q)
                }
            }
            ChainRegime::Short => {
                self.a1 / qb.powf(P1_SHORT) + self.a2 / qb.powf(P2_SHORT) + PI / (q * l)
            }
        }
    }
}

/// `S(q)` of a worm-like chain with contour length `L` and Kuhn length `b`.
pub fn sk_wr(q: f64, contour_length: f64, kuhn_length: f64) -> Result<f64, ModelError> {
    Ok(WormlikeChain::new(contour_length, kuhn_length)?.structure_factor(q))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rejects_non_positive_lengths() {
        assert!(WormlikeChain::new(0.0, 10.0).is_err());
        assert!(WormlikeChain::new(100.0, 0.0).is_err());
        assert!(WormlikeChain::new(-5.0, 10.0).is_err());
        assert!(WormlikeChain::new(100.0, f64::INFINITY).is_err());
        assert!(sk_wr(0.01, 100.0, -1.0).is_err());
    }

    #[test]
    fn test_regime_split() {
        assert_eq!(WormlikeChain::new(1000.0, 100.0).unwrap().regime(), ChainRegime::Long);
        assert_eq!(WormlikeChain::new(200.0, 50.0).unwrap().regime(), ChainRegime::Short);
        assert_eq!(WormlikeChain::new(100.0, 50.0).unwrap().regime(), ChainRegime::Short);
    }

    #[test]
    fn test_radius_of_gyration() {
        let chain = WormlikeChain::new(1000.0, 100.0).unwrap();
        assert_relative_eq!(alpha_square(10.0), 1.1613704402693217, max_relative = 1e-12);
        assert_relative_eq!(chain.rg_square(), 19356.174004488694, max_relative = 1e-12);
        let short = WormlikeChain::new(100.0, 50.0).unwrap();
        assert_relative_eq!(short.rg_square_short(), 453.43031836553143, max_relative = 1e-12);
    }

    #[test]
    fn test_forward_limit() {
        for (l, b) in [(1000.0, 100.0), (100.0, 50.0)] {
            let chain = WormlikeChain::new(l, b).unwrap();
            assert_eq!(chain.structure_factor(0.0), 1.0);
        }
        // Guinier behaviour at small q
        let chain = WormlikeChain::new(1000.0, 100.0).unwrap();
        let q = 1e-4;
        assert_relative_eq!(
            chain.structure_factor(q),
            1.0 - chain.rg_square() * q * q / 3.0,
            max_relative = 1e-4
        );
    }

    #[test]
    fn test_long_chain_continuous_at_power_law_switch() {
        let chain = WormlikeChain::new(1000.0, 100.0).unwrap();
        let q = Q0_LONG / 100.0;
        let below = chain.structure_factor(q * (1.0 - 1e-9));
        let above = chain.structure_factor(q * (1.0 + 1e-9));
        assert_relative_eq!(below, 0.13145140661833368, max_relative = 1e-6);
        assert_relative_eq!(below, above, max_relative = 1e-2);
    }

    #[test]
    fn test_short_chain_continuous_at_switches() {
        let chain = WormlikeChain::new(100.0, 50.0).unwrap();
        let q = chain.q0 / 50.0;
        let below = chain.structure_factor(q * (1.0 - 1e-9));
        let above = chain.structure_factor(q * (1.0 + 1e-9));
        assert_relative_eq!(below, above, max_relative = 1e-2);

        let q = GUINIER_LIMIT / 50.0;
        let below = chain.structure_factor(q * (1.0 - 1e-9));
        let above = chain.structure_factor(q * (1.0 + 1e-9));
        assert_relative_eq!(below, above, max_relative = 1e-5);
    }

    #[test]
    fn test_small_q_approaches_one() {
        for (l, b) in [(1000.0, 100.0), (100.0, 50.0)] {
            let chain = WormlikeChain::new(l, b).unwrap();
            for q in [1e-5, 1e-6, 1e-7, 1e-8, 1e-12] {
                let s = chain.structure_factor(q);
                assert!((s - 1.0).abs() < 1e-3, "S({q}) = {s} for L={l}, b={b}");
                assert!(s <= 1.0);
            }
        }
        assert_relative_eq!(debye(1e-12), 1.0, max_relative = 1e-12);
        assert_relative_eq!(finite_length_term(1e-10), 5e-11, max_relative = 1e-9);
    }

    #[test]
    fn test_series_forms_match_closed_forms_at_switch() {
        let below = SERIES_LIMIT * (1.0 - 1e-9);
        let above = SERIES_LIMIT * (1.0 + 1e-9);
        assert_relative_eq!(debye(below), debye(above), max_relative = 1e-9);
        assert_relative_eq!(finite_length_term(below), finite_length_term(above), max_relative = 1e-6);
    }

    #[test]
    fn test_power_law_switch_sweep() {
        // S(q) keeps decreasing through the q·b crossover for both regimes
        for (l, b) in [(1000.0, 100.0), (100.0, 50.0)] {
            let chain = WormlikeChain::new(l, b).unwrap();
            let q0 = chain.q0 / b;
            let factors = [0.9, 0.95, 0.99, 1.0 - 1e-9, 1.0 + 1e-9, 1.01, 1.05, 1.1];
            let values: Vec<f64> = factors.iter().map(|f| chain.structure_factor(q0 * f)).collect();
            for pair in values.windows(2) {
                assert!(pair[1] <= pair[0], "non-monotone near q0 for L={l}, b={b}");
                assert_relative_eq!(pair[0], pair[1], max_relative = 0.1);
            }
            assert_relative_eq!(values[3], values[4], max_relative = 1e-6);
        }
        let short = WormlikeChain::new(100.0, 50.0).unwrap();
        assert_relative_eq!(short.structure_factor(0.06 * 0.9), 0.6735424836302502, max_relative = 1e-9);
        assert_relative_eq!(short.structure_factor(0.06 * 1.1), 0.5647893731746847, max_relative = 1e-9);
    }

    #[test]
    fn test_regime_switch_jump() {
        // the two regimes are fitted separately; L = 4b is not a continuous seam
        let b = 50.0;
        let short = WormlikeChain::new(4.0 * b, b).unwrap();
        let long = WormlikeChain::new(4.0 * b * (1.0 + 1e-9), b).unwrap();
        assert_eq!(short.regime(), ChainRegime::Short);
        assert_eq!(long.regime(), ChainRegime::Long);

        assert_relative_eq!(short.structure_factor(0.002), long.structure_factor(0.002), max_relative = 1e-3);

        let golden = [
            (0.04, 0.56761877939996, 0.5552516233050997),
            (0.1, 0.1690418866320201, 0.1743759044628893),
        ];
        for (q, s_short, s_long) in golden {
            assert_relative_eq!(short.structure_factor(q), s_short, max_relative = 1e-9);
            assert_relative_eq!(long.structure_factor(q), s_long, max_relative = 1e-9);
        }
        let jump = (long.structure_factor(0.1) / short.structure_factor(0.1) - 1.0).abs();
        assert!(jump > 0.03 && jump < 0.035);
    }

    #[test]
    fn test_decays_at_high_q() {
        let chain = WormlikeChain::new(1000.0, 100.0).unwrap();
        let low = chain.structure_factor(0.01);
        let high = chain.structure_factor(0.2);
        assert!(high > 0.0);
        assert!(high < low);
    }

    #[test]
    fn test_crossover_weight() {
        assert_relative_eq!(crossover_weight(CROSSOVER_CENTRE), 0.5);
        assert!(crossover_weight(0.0) < 1e-4);
        assert!(crossover_weight(3.0) > 1.0 - 1e-4);
    }
}
