//! Fixed-order Gauss-Legendre quadrature.
//!
//! Two rules are used throughout the crate: a 20-point rule for the cheaper
//! polydispersity and cross-section integrals and a 76-point rule for the
//! orientation averages. The order used by each model is fixed; there is no
//! adaptive refinement, so a given parameter set always performs the same
//! sequence of floating point operations.
//!
//! A rule on `[-1, 1]` is mapped onto `[a, b]` as
//!
//! ```text
//! ∫ f dx ≈ (b - a)/2 · Σ wᵢ f((zᵢ(b - a) + a + b)/2)
//! ```

use serde::{Deserialize, Serialize};

/// Supported quadrature orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum QuadratureOrder {
    /// 20-point rule.
    Twenty,
    /// 76-point rule.
    #[default]
    SeventySix,
}

impl QuadratureOrder {
    /// Number of nodes.
    pub fn points(&self) -> usize {
        match self {
            QuadratureOrder::Twenty => 20,
            QuadratureOrder::SeventySix => 76,
        }
    }

    /// The static rule for this order.
    pub fn rule(&self) -> &'static GaussRule {
        match self {
            QuadratureOrder::Twenty => &GAUSS20,
            QuadratureOrder::SeventySix => &GAUSS76,
        }
    }
}

/// A closed integration interval `[lower, upper]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub lower: f64,
    pub upper: f64,
}

impl Interval {
    /// `[0, 1]`, used for integrals over cos θ.
    pub const UNIT: Interval = Interval {
        lower: 0.0,
        upper: 1.0,
    };

    /// `[0, π/2]`, used for integrals over θ.
    pub const QUARTER_TURN: Interval = Interval {
        lower: 0.0,
        upper: std::f64::consts::FRAC_PI_2,
    };

    /// `[0, π]`.
    pub const HALF_TURN: Interval = Interval {
        lower: 0.0,
        upper: std::f64::consts::PI,
    };

    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Map an abscissa of the reference interval onto this interval.
    #[inline]
    pub fn map(&self, z: f64) -> f64 {
        (z * (self.upper - self.lower) + self.upper + self.lower) / 2.0
    }

    /// Jacobian of [`Interval::map`].
    #[inline]
    pub fn half_width(&self) -> f64 {
        (self.upper - self.lower) / 2.0
    }
}

/// An immutable Gauss-Legendre rule on `[-1, 1]`.
#[derive(Debug)]
pub struct GaussRule {
    abscissas: &'static [f64],
    weights: &'static [f64],
}

/// The 20-point rule.
pub static GAUSS20: GaussRule = GaussRule {
    abscissas: &GAUSS20_Z,
    weights: &GAUSS20_WT,
};

/// The 76-point rule.
pub static GAUSS76: GaussRule = GaussRule {
    abscissas: &GAUSS76_Z,
    weights: &GAUSS76_WT,
};

impl GaussRule {
    /// Number of nodes.
    #[inline]
    pub fn order(&self) -> usize {
        self.abscissas.len()
    }

    #[inline]
    pub fn abscissas(&self) -> &'static [f64] {
        self.abscissas
    }

    #[inline]
    pub fn weights(&self) -> &'static [f64] {
        self.weights
    }

    /// Nodes and weights mapped onto `domain`. The weights are the raw rule
    /// weights; the caller applies [`Interval::half_width`] to the sum.
    pub fn nodes(&self, domain: Interval) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.abscissas
            .iter()
            .zip(self.weights)
            .map(move |(&z, &w)| (domain.map(z), w))
    }

    /// Integrate `f` over `domain`.
    pub fn integrate<F>(&self, domain: Interval, mut f: F) -> f64
    where
        F: FnMut(f64) -> f64,
    {
        let mut summ = 0.0;
        for (x, w) in self.nodes(domain) {
            summ += w * f(x);
        }
        domain.half_width() * summ
    }

    /// Integrate a fallible integrand, stopping at the first error.
    pub fn try_integrate<F, E>(&self, domain: Interval, mut f: F) -> Result<f64, E>
    where
        F: FnMut(f64) -> Result<f64, E>,
    {
        let mut summ = 0.0;
        for (x, w) in self.nodes(domain) {
            summ += w * f(x)?;
        }
        Ok(domain.half_width() * summ)
    }
}

/// Abscissas of the 20-point Gauss-Legendre rule on [-1, 1], ascending.
pub static GAUSS20_Z: [f64; 20] = [
    -0.9931285991850949,
    -0.9639719272779138,
    -0.912234428251326,
    -0.8391169718222189,
    -0.7463319064601508,
    -0.636053680726515,
    -0.5108670019508271,
    -0.37370608871541955,
    -0.22778585114164507,
    -0.07652652113349734,
    0.07652652113349734,
    0.22778585114164507,
    0.37370608871541955,
    0.5108670019508271,
    0.636053680726515,
    0.7463319064601508,
    0.8391169718222189,
    0.912234428251326,
    0.9639719272779138,
    0.9931285991850949,
];

/// Weights of the 20-point Gauss-Legendre rule, paired with [`GAUSS20_Z`].
pub static GAUSS20_WT: [f64; 20] = [
    0.017614007139152264,
    0.04060142980038705,
    0.06267204833410904,
    0.08327674157670474,
    0.10193011981724048,
    0.11819453196151831,
    0.1316886384491765,
    0.14209610931838215,
    0.14917298647260382,
    0.15275338713072598,
    0.15275338713072598,
    0.14917298647260382,
    0.14209610931838215,
    0.1316886384491765,
    0.11819453196151831,
    0.10193011981724048,
    0.08327674157670474,
    0.06267204833410904,
    0.04060142980038705,
    0.017614007139152264,
];

/// Abscissas of the 76-point Gauss-Legendre rule on [-1, 1], ascending.
pub static GAUSS76_Z: [f64; 76] = [
    -0.9995059483621531,
    -0.9973977863553555,
    -0.993608772723527,
    -0.9881444533598375,
    -0.9810139389756559,
    -0.972229228520377,
    -0.9618051267587678,
    -0.9497592077108964,
    -0.9361117819348108,
    -0.9208858612521501,
    -0.9041071195455669,
    -0.8858038492920828,
    -0.8660069137719819,
    -0.8447496949833424,
    -0.8220680373289746,
    -0.7980001871612001,
    -0.7725867282818097,
    -0.7458705135036104,
    -0.7178965923877036,
    -0.6887121352776406,
    -0.6583663537581427,
    -0.6269104176722665,
    -0.594397368836793,
    -0.5608820316012375,
    -0.5264209204012426,
    -0.4910721444621939,
    -0.45489530981372633,
    -0.4179514187803273,
    -0.38030276711750444,
    -0.342012838966962,
    -0.3031461998079078,
    -0.26376838758499427,
    -0.22394580219647414,
    -0.18374559352891448,
    -0.14323554822726753,
    -0.10248397539122703,
    -0.06155959139061121,
    -0.020531403993998637,
    0.020531403993998637,
    0.06155959139061121,
    0.10248397539122703,
    0.14323554822726753,
    0.18374559352891448,
    0.22394580219647414,
    0.26376838758499427,
    0.3031461998079078,
    0.342012838966962,
    0.38030276711750444,
    0.4179514187803273,
    0.45489530981372633,
    0.4910721444621939,
    0.5264209204012426,
    0.5608820316012375,
    0.594397368836793,
    0.6269104176722665,
    0.6583663537581427,
    0.6887121352776406,
    0.7178965923877036,
    0.7458705135036104,
    0.7725867282818097,
    0.7980001871612001,
    0.8220680373289746,
    0.8447496949833424,
    0.8660069137719819,
    0.8858038492920828,
    0.9041071195455669,
    0.9208858612521501,
    0.9361117819348108,
    0.9497592077108964,
    0.9618051267587678,
    0.972229228520377,
    0.9810139389756559,
    0.9881444533598375,
    0.993608772723527,
    0.9973977863553555,
    0.9995059483621531,
];

/// Weights of the 76-point Gauss-Legendre rule, paired with [`GAUSS76_Z`].
pub static GAUSS76_WT: [f64; 76] = [
    0.0012677916340853004,
    0.0029491029536424275,
    0.0046279352280373795,
    0.0062991804973284915,
    0.007959847477239724,
    0.009607105414713796,
    0.01123816856966773,
    0.012850283847510083,
    0.01444073174827673,
    0.01600682991224856,
    0.01754593729147422,
    0.019055458467190516,
    0.020532847967908073,
    0.021975614534416255,
    0.023381325307011168,
    0.024747609920659663,
    0.02607216449798604,
    0.027352755531827554,
    0.02858722365005401,
    0.02977348725590512,
    0.030909546037491624,
    0.03199348434042161,
    0.03302347439779174,
    0.03399777941205631,
    0.03491475648355073,
    0.03577285938071396,
    0.03657064114732961,
    0.0373067565423816,
    0.037979964308405285,
    0.03858912926450679,
    0.03913322422051836,
    0.03961133170906204,
    0.04002264553259683,
    0.04036647212284399,
    0.040642231710294754,
    0.04084945930182845,
    0.04098780546479398,
    0.041057036916229465,
    0.041057036916229465,
    0.04098780546479398,
    0.04084945930182845,
    0.040642231710294754,
    0.04036647212284399,
    0.04002264553259683,
    0.03961133170906204,
    0.03913322422051836,
    0.03858912926450679,
    0.037979964308405285,
    0.0373067565423816,
    0.03657064114732961,
    0.03577285938071396,
    0.03491475648355073,
    0.03399777941205631,
    0.03302347439779174,
    0.03199348434042161,
    0.030909546037491624,
    0.02977348725590512,
    0.02858722365005401,
    0.027352755531827554,
    0.02607216449798604,
    0.024747609920659663,
    0.023381325307011168,
    0.021975614534416255,
    0.020532847967908073,
    0.019055458467190516,
    0.01754593729147422,
    0.01600682991224856,
    0.01444073174827673,
    0.012850283847510083,
    0.01123816856966773,
    0.009607105414713796,
    0.007959847477239724,
    0.0062991804973284915,
    0.0046279352280373795,
    0.0029491029536424275,
    0.0012677916340853004,
];
