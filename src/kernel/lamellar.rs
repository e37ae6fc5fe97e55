//! Lamellar (bilayer) form factors and the Caillé stacking structure factor.

use std::f64::consts::PI;

/// Euler–Mascheroni constant, to the precision used by the Caillé sum.
const EULER: f64 = 0.5772156649;

/// Instrumental q-resolution folded into the Caillé sum, in Å⁻¹.
pub const CAILLE_RESOLUTION: f64 = 0.0025;

/// Largest stack accepted by the stacked models. The Caillé sum has one term
/// per layer.
pub const MAX_LAYER_COUNT: f64 = 1.0e6;

/// Form factor of a bilayer of thickness `delta` with Gaussian interfacial
/// roughness `sigma` (absolute, in Å).
#[inline]
pub fn gaussian_bilayer(q: f64, delta: f64, sigma: f64, contrast: f64) -> f64 {
    // 1 - cos(qδ)·e^{-a} split into two non-negative terms
    let damping = -0.5 * q * q * sigma * sigma;
    let half_phase = (0.5 * q * delta).sin();
    let bracket = -damping.exp_m1() + 2.0 * half_phase * half_phase * damping.exp();
    2.0 * contrast * contrast / (q * q) * bracket
}

/// Form factor of a bilayer made of a tail region of half-thickness
/// `tail_thickness` flanked by head groups of thickness `head_thickness`.
pub fn head_tail_bilayer(
    q: f64,
    tail_thickness: f64,
    head_thickness: f64,
    tail_sld: f64,
    head_sld: f64,
    solvent_sld: f64,
) -> f64 {
    let head_contrast = head_sld - solvent_sld;
    let tail_contrast = tail_sld - solvent_sld;
    let amplitude = head_contrast * ((q * (head_thickness + tail_thickness)).sin() - (q * tail_thickness).sin())
        + tail_contrast * (q * tail_thickness).sin();
    amplitude * amplitude * 4.0 / (q * q)
}

/// Structure factor of a finite stack of fluctuating membranes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CailleStack {
    /// Repeat distance in Å.
    pub spacing: f64,
    /// Number of layers; truncated toward zero.
    pub layer_count: f64,
    /// Caillé parameter η.
    pub caille: f64,
}

impl CailleStack {
    pub fn new(spacing: f64, layer_count: f64, caille: f64) -> Self {
        Self {
            spacing,
            layer_count: layer_count.trunc(),
            caille,
        }
    }

    /// `S(q) = 1 + 2 Σ (1 - i/N) cos(...) exp(...)` for `i` in `1..N-1`.
    ///
    /// Cost is linear in the layer count.
    pub fn structure_factor(&self, q: f64) -> f64 {
        let n = self.layer_count;
        let d = self.spacing;
        let dq = CAILLE_RESOLUTION;
        // the sum stops one short of N - 1
        let last = n as i64 - 1;
        let mut sum = 0.0;
        for i in 1..last {
            let fi = i as f64;
            let alpha = self.caille / 4.0 / PI / PI * ((PI * fi).ln() + EULER);
            let t1 = 2.0 * dq * dq * d * d * alpha;
            let t2 = 2.0 * q * q * d * d * alpha;
            let t3 = dq * dq * d * d * fi * fi;
            let term = (1.0 - fi / n)
                * (d * q * fi / (1.0 + t1)).cos()
                * (-(t2 + t3) / (2.0 * (1.0 + t1))).exp()
                / (1.0 + t1).sqrt();
            sum += term;
        }
        1.0 + 2.0 * sum
    }
}
