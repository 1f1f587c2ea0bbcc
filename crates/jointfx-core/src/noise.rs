//! Deterministic coherent noise used to drive every smooth modulation value.
//!
//! The interpolator is a plain function of its phase: the same `t` always
//! yields the same output for a given seed, and nothing observed downstream
//! feeds back into it.

use rand::prelude::*;
use std::f32::consts::PI;

use crate::constants::DEFAULT_NOISE_SEED;

const LATTICE: usize = 256;

/// Gradient noise over one coordinate, remapped onto a bounded weight.
#[derive(Clone, Debug)]
pub struct NoiseInterpolator {
    perm: [u8; LATTICE],
}

impl Default for NoiseInterpolator {
    fn default() -> Self {
        Self::with_seed(DEFAULT_NOISE_SEED)
    }
}

impl NoiseInterpolator {
    pub fn with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut perm = [0u8; LATTICE];
        for (i, p) in perm.iter_mut().enumerate() {
            *p = i as u8;
        }
        perm.shuffle(&mut rng);
        Self { perm }
    }

    /// Weight in \[0, 1\] for phase `t`.
    ///
    /// A raised-cosine carrier is perturbed by gradient noise under an envelope
    /// that vanishes where the carrier touches 0 or 1, so `sample(0) == 0`,
    /// `sample(1) == 1` and the result never leaves the unit interval.
    pub fn sample(&self, t: f32) -> f32 {
        let t = if t.is_finite() { t } else { 0.0 };
        let carrier = 0.5 - 0.5 * (PI * t).cos();
        let envelope = 4.0 * carrier * (1.0 - carrier);
        // gradient(t) lies in [-0.5, 0.5] so the perturbation stays within min(c, 1 - c)
        let w = carrier + 0.5 * self.gradient(t) * envelope;
        w.clamp(0.0, 1.0)
    }

    /// Linear interpolation between `min` and `max` weighted by [`Self::sample`].
    #[inline]
    pub fn interpolate(&self, min: f32, max: f32, t: f32) -> f32 {
        let w = self.sample(t);
        let v = min + (max - min) * w;
        // guard against float drift at the ends
        if min <= max {
            v.clamp(min, max)
        } else {
            v.clamp(max, min)
        }
    }

    // 1D Perlin noise, output in [-0.5, 0.5].
    fn gradient(&self, x: f32) -> f32 {
        let cell = x.floor();
        let xf = x - cell;
        let i0 = (cell as i64).rem_euclid(LATTICE as i64) as usize;
        let i1 = (i0 + 1) % LATTICE;
        let g0 = self.lattice_gradient(i0);
        let g1 = self.lattice_gradient(i1);
        let u = fade(xf);
        let n0 = g0 * xf;
        let n1 = g1 * (xf - 1.0);
        n0 + (n1 - n0) * u
    }

    #[inline]
    fn lattice_gradient(&self, i: usize) -> f32 {
        // 16 evenly spaced slopes in [-1, 1]
        let h = self.perm[i] & 15;
        h as f32 / 7.5 - 1.0
    }
}

#[inline]
fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}
