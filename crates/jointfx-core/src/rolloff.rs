use std::f32::consts::PI;

use crate::constants::{DEFAULT_AVATAR_HEIGHT, MIN_AVATAR_HEIGHT, ROLLOFF_SAMPLE_COUNT};

/// One `(distance, gain)` control point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RolloffKey {
    pub distance: f32,
    pub gain: f32,
}

/// Distance-to-gain attenuation profile, built once from avatar height.
#[derive(Clone, Debug, PartialEq)]
pub struct RolloffCurve {
    keys: [RolloffKey; ROLLOFF_SAMPLE_COUNT],
    height: f32,
}

impl RolloffCurve {
    /// Samples a Gaussian with `mean = height` and `std_dev = height / 3` at
    /// evenly spaced distances from 0 to `height` inclusive. Gains are raw
    /// density values, not normalized to a peak of 1.
    ///
    /// Non-finite heights, and heights below [`MIN_AVATAR_HEIGHT`], fall back
    /// to [`DEFAULT_AVATAR_HEIGHT`].
    pub fn build(height: f32) -> Self {
        let height = if height.is_finite() && height >= MIN_AVATAR_HEIGHT {
            height
        } else {
            log::warn!(
                "rolloff: unusable height {}, using {}",
                height,
                DEFAULT_AVATAR_HEIGHT
            );
            DEFAULT_AVATAR_HEIGHT
        };
        let mean = height;
        let std_dev = height / 3.0;
        let step = height / (ROLLOFF_SAMPLE_COUNT - 1) as f32;
        let mut keys = [RolloffKey {
            distance: 0.0,
            gain: 0.0,
        }; ROLLOFF_SAMPLE_COUNT];
        for (i, key) in keys.iter_mut().enumerate() {
            let x = if i == ROLLOFF_SAMPLE_COUNT - 1 {
                height
            } else {
                i as f32 * step
            };
            *key = RolloffKey {
                distance: x,
                gain: gaussian_density(x, mean, std_dev),
            };
        }
        Self { keys, height }
    }

    #[inline]
    pub fn keys(&self) -> &[RolloffKey] {
        &self.keys
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Piecewise-linear gain at `distance`, held flat outside the sampled span.
    pub fn evaluate(&self, distance: f32) -> f32 {
        let first = self.keys[0];
        let last = self.keys[ROLLOFF_SAMPLE_COUNT - 1];
        if distance <= first.distance {
            return first.gain;
        }
        if distance >= last.distance {
            return last.gain;
        }
        for pair in self.keys.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if distance <= b.distance {
                let span = b.distance - a.distance;
                let t = if span > 0.0 {
                    (distance - a.distance) / span
                } else {
                    0.0
                };
                return a.gain + (b.gain - a.gain) * t;
            }
        }
        last.gain
    }
}

/// Normal probability density at `x`.
#[inline]
pub fn gaussian_density(x: f32, mean: f32, std_dev: f32) -> f32 {
    let z = (x - mean) / std_dev;
    (1.0 / (std_dev * (2.0 * PI).sqrt())) * (-0.5 * z * z).exp()
}
