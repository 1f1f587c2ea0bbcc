use jointfx_core::{
    Range, DEFAULT_CHEST_JOINT, DEFAULT_DURATION_RANGE, DEFAULT_ENERGY_THRESHOLD,
    DEFAULT_FOOT_JOINT, DEFAULT_HEAD_JOINT, DEFAULT_HIP_JOINT, DEFAULT_NOISE_SEED,
    DEFAULT_PITCH_RANGE, DEFAULT_SPECTRUM_SIZE, DEFAULT_TAIL_WIDTH_RATIO, DEFAULT_TRAIL_JOINTS,
    DEFAULT_VOLUME, DEFAULT_WIDTH_RANGE, DURATION_NOISE_OFFSET, DURATION_NOISE_SPEED,
    WIDTH_NOISE_SPEED,
};

use crate::error::EffectError;

#[derive(Clone, Debug)]
pub struct EffectConfig {
    pub trail_joints: Vec<String>,
    pub hip_joint: String,
    pub chest_joint: String,
    pub head_joint: String,
    pub foot_joint: String,

    pub width_range: Range,
    pub duration_range: Range,
    pub pitch_range: Range,
    pub tail_width_ratio: f32,

    pub width_noise_speed: f32,
    pub duration_noise_speed: f32,
    pub duration_noise_offset: f32,
    pub noise_seed: u64,

    pub energy_threshold: f32,
    pub spectrum_size: usize,

    pub volume: f32,
    /// Sound toggle value before the driver writes one; the sink starts in this state.
    pub sound_on_start: bool,
    /// Prefix for parameter names, e.g. `"JointFx/"`.
    pub param_prefix: String,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            trail_joints: DEFAULT_TRAIL_JOINTS.iter().map(|s| s.to_string()).collect(),
            hip_joint: DEFAULT_HIP_JOINT.to_string(),
            chest_joint: DEFAULT_CHEST_JOINT.to_string(),
            head_joint: DEFAULT_HEAD_JOINT.to_string(),
            foot_joint: DEFAULT_FOOT_JOINT.to_string(),
            width_range: Range::from_array(DEFAULT_WIDTH_RANGE),
            duration_range: Range::from_array(DEFAULT_DURATION_RANGE),
            pitch_range: Range::from_array(DEFAULT_PITCH_RANGE),
            tail_width_ratio: DEFAULT_TAIL_WIDTH_RATIO,
            width_noise_speed: WIDTH_NOISE_SPEED,
            duration_noise_speed: DURATION_NOISE_SPEED,
            duration_noise_offset: DURATION_NOISE_OFFSET,
            noise_seed: DEFAULT_NOISE_SEED,
            energy_threshold: DEFAULT_ENERGY_THRESHOLD,
            spectrum_size: DEFAULT_SPECTRUM_SIZE,
            volume: DEFAULT_VOLUME,
            sound_on_start: true,
            param_prefix: "JointFx/".to_string(),
        }
    }
}

impl EffectConfig {
    pub fn validate(&self) -> Result<(), EffectError> {
        if self.trail_joints.is_empty() {
            return Err(EffectError::NoTrails);
        }
        if self.spectrum_size == 0 {
            return Err(EffectError::InvalidSpectrumSize);
        }
        for (what, r) in [
            ("width", self.width_range),
            ("duration", self.duration_range),
            ("pitch", self.pitch_range),
        ] {
            if !r.is_valid() {
                return Err(EffectError::InvalidRange {
                    what,
                    min: r.min,
                    max: r.max,
                });
            }
        }
        Ok(())
    }

    #[inline]
    pub fn param_name(&self, leaf: &str) -> String {
        format!("{}{}", self.param_prefix, leaf)
    }
}
