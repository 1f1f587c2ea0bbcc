//! Per-controller modulation state carried from tick to tick.
//!
//! Hue fields only move when the spectral energy gate opens; width and
//! duration are recomputed unconditionally every tick.

/// Values the controller derives from noise and audio energy.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModulationState {
    /// Base hue in \[0, 1\].
    pub hue_offset: f32,
    /// Half-width of the random hue jitter, in \[0, 1\].
    pub hue_variation: f32,
    pub current_width: f32,
    pub current_duration: f32,
}

/// Inclusive `[min, max]` range of a modulated value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Range {
    pub min: f32,
    pub max: f32,
}

impl Range {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub const fn from_array(r: [f32; 2]) -> Self {
        Self { min: r[0], max: r[1] }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}
