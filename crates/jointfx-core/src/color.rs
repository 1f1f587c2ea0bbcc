use glam::Vec3;
use rand::Rng;
use smallvec::{smallvec, SmallVec};

use crate::noise::NoiseInterpolator;
use crate::state::ModulationState;

/// Color stop at normalized position `time` along the trail.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ColorKey {
    pub rgb: [f32; 3],
    pub time: f32,
}

/// Alpha stop at normalized position `time` along the trail.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct AlphaKey {
    pub alpha: f32,
    pub time: f32,
}

/// Color/alpha stops handed to a polyline sink.
#[derive(Clone, Debug, PartialEq)]
pub struct Gradient {
    pub color_keys: SmallVec<[ColorKey; 2]>,
    pub alpha_keys: SmallVec<[AlphaKey; 2]>,
}

impl Default for Gradient {
    fn default() -> Self {
        Self::constant([1.0, 1.0, 1.0], default_alpha_keys())
    }
}

impl Gradient {
    /// Same color at both ends, alpha taken from `alpha_keys`.
    pub fn constant(rgb: [f32; 3], alpha_keys: SmallVec<[AlphaKey; 2]>) -> Self {
        Self {
            color_keys: smallvec![
                ColorKey { rgb, time: 0.0 },
                ColorKey { rgb, time: 1.0 }
            ],
            alpha_keys,
        }
    }

    #[inline]
    pub fn head_color(&self) -> Option<[f32; 3]> {
        self.color_keys.first().map(|k| k.rgb)
    }

    /// Color stops as raw bytes, `[r, g, b, time]` per key.
    #[inline]
    pub fn color_key_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.color_keys.as_slice())
    }

    /// Alpha stops as raw bytes, `[alpha, time]` per key.
    #[inline]
    pub fn alpha_key_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.alpha_keys.as_slice())
    }
}

/// Opaque at the head, fading out at the tail.
pub fn default_alpha_keys() -> SmallVec<[AlphaKey; 2]> {
    smallvec![
        AlphaKey {
            alpha: 1.0,
            time: 0.0
        },
        AlphaKey {
            alpha: 0.0,
            time: 1.0
        }
    ]
}

/// HSV to RGB with `h` in turns (\[0, 1\) wraps), `s` and `v` in \[0, 1\].
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> [f32; 3] {
    let h = h.rem_euclid(1.0) * 6.0;
    let c = v * s;
    let x = c * (1.0 - ((h % 2.0) - 1.0).abs());
    let m = v - c;
    let (r, g, b) = if h < 1.0 {
        (c, x, 0.0)
    } else if h < 2.0 {
        (x, c, 0.0)
    } else if h < 3.0 {
        (0.0, c, x)
    } else if h < 4.0 {
        (0.0, x, c)
    } else if h < 5.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };
    [r + m, g + m, b + m]
}

/// Hue of an RGB color in turns. Greys read as hue 0.
pub fn rgb_to_hue(rgb: [f32; 3]) -> f32 {
    let c = Vec3::from_array(rgb);
    let max = c.max_element();
    let min = c.min_element();
    let delta = max - min;
    if delta <= f32::EPSILON {
        return 0.0;
    }
    let [r, g, b] = rgb;
    let sector = if max == r {
        ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };
    (sector / 6.0).rem_euclid(1.0)
}

// rem_euclid rounds tiny negatives up to exactly 1.0
fn wrap_unit(x: f32) -> f32 {
    let w = x.rem_euclid(1.0);
    if w >= 1.0 {
        0.0
    } else {
        w
    }
}

/// Energy-gated hue modulation.
#[derive(Clone, Debug)]
pub struct ColorModulator {
    alpha_keys: SmallVec<[AlphaKey; 2]>,
}

impl Default for ColorModulator {
    fn default() -> Self {
        Self::new(default_alpha_keys())
    }
}

impl ColorModulator {
    pub fn new(alpha_keys: SmallVec<[AlphaKey; 2]>) -> Self {
        Self { alpha_keys }
    }

    /// Moves the hue state when `energy > threshold`; otherwise keeps the
    /// previous tick's hue. Returns true when the gate was open.
    pub fn gate(
        &self,
        state: &mut ModulationState,
        noise: &NoiseInterpolator,
        energy: f32,
        threshold: f32,
    ) -> bool {
        if energy.is_nan() || energy <= threshold {
            return false;
        }
        state.hue_offset = energy.clamp(0.0, 1.0);
        state.hue_variation = noise.interpolate(0.0, 1.0, energy);
        true
    }

    /// One jittered hue around the current offset, wrapped into \[0, 1\).
    pub fn draw_hue<R: Rng + ?Sized>(&self, state: &ModulationState, rng: &mut R) -> f32 {
        let spread = state.hue_variation.abs();
        let jitter = if spread > 0.0 {
            rng.gen_range(-spread..=spread)
        } else {
            0.0
        };
        wrap_unit(state.hue_offset + jitter)
    }

    /// Gate the hue state on `energy`, then build this tick's constant gradient.
    pub fn update<R: Rng + ?Sized>(
        &self,
        state: &mut ModulationState,
        noise: &NoiseInterpolator,
        energy: f32,
        threshold: f32,
        rng: &mut R,
    ) -> Gradient {
        self.gate(state, noise, energy, threshold);
        let hue = self.draw_hue(state, rng);
        Gradient::constant(hsv_to_rgb(hue, 1.0, 1.0), self.alpha_keys.clone())
    }
}
