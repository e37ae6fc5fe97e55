//! Special functions used by the scattering kernels.
//!
//! The Bessel and log-gamma approximations are the rational/Lanczos forms the
//! SANS reduction packages have always used. They are kept as-is rather than
//! replaced by higher-precision implementations so that fitted parameters
//! reproduce across implementations.

/// Coefficients of the Lanczos series used by [`ln_gamma`].
const LANCZOS_COEFFICIENTS: [f64; 6] = [
    76.18009172947146,
    -86.50532032941677,
    24.01409824083091,
    -1.231739572450155,
    0.1208650973866179e-2,
    -0.5395239384953e-5,
];

/// Bessel function of the first kind, order one.
///
/// Rational approximation for |x| < 8 and the asymptotic phase/amplitude
/// form beyond. Relative error is below 1e-8 over the range used here.
pub fn bessel_j1(x: f64) -> f64 {
    let ax = x.abs();
    if ax < 8.0 {
        let y = x * x;
        let ans1 = x
            * (72362614232.0
                + y * (-7895059235.0
                    + y * (242396853.1
                        + y * (-2972611.439 + y * (15704.48260 + y * (-30.16036606))))));
        let ans2 = 144725228442.0
            + y * (2300535178.0
                + y * (18583304.74 + y * (99447.43394 + y * (376.9991397 + y * 1.0))));
        ans1 / ans2
    } else {
        let z = 8.0 / ax;
        let y = z * z;
        let xx = ax - 2.356194491;
        let ans1 = 1.0
            + y * (0.183105e-2
                + y * (-0.3516396496e-4 + y * (0.2457520174e-5 + y * (-0.240337019e-6))));
        let ans2 = 0.04687499995
            + y * (-0.2002690873e-3
                + y * (0.8449199096e-5 + y * (-0.88228987e-6 + y * 0.105787412e-6)));
        let ans = (0.636619772 / ax).sqrt() * (xx.cos() * ans1 - z * xx.sin() * ans2);
        if x < 0.0 {
            -ans
        } else {
            ans
        }
    }
}

/// `2·J1(x)/x`, the normalized amplitude of a disc. Equal to 1 at `x = 0`.
#[inline]
pub fn bessel_j1_ratio(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        2.0 * bessel_j1(x) / x
    }
}

/// Natural logarithm of the gamma function for `x > 0`.
pub fn ln_gamma(x: f64) -> f64 {
    let mut y = x;
    let mut tmp = x + 5.5;
    tmp -= (x + 0.5) * tmp.ln();
    let mut ser = 1.000000000190015;
    for c in LANCZOS_COEFFICIENTS {
        y += 1.0;
        ser += c / y;
    }
    -tmp + (2.5066282746310005 * ser / x).ln()
}

/// `sin(x)/x`, equal to 1 at `x = 0`.
#[inline]
pub fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        x.sin() / x
    }
}

/// Normalized amplitude of a uniform sphere, `3(sin x - x cos x)/x³`.
/// Equal to 1 at `x = 0`; small arguments use the Taylor series.
#[inline]
pub fn sphere_amplitude(x: f64) -> f64 {
    if x.abs() < 1e-2 {
        let x2 = x * x;
        1.0 - x2 / 10.0 + x2 * x2 / 280.0
    } else {
        3.0 * (x.sin() - x * x.cos()) / (x * x * x)
    }
}

/// Hyperbolic secant.
#[inline]
pub fn sech(x: f64) -> f64 {
    1.0 / x.cosh()
}
