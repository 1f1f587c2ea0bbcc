use glam::Vec3;

// Shared trail/sound tuning constants used by the controller and the native front-end.

// Timing
pub const FIXED_TICK_RATE: f32 = 60.0; // assumed ticks per second when sizing trails

// Motion
pub const VELOCITY_SCALE: f32 = 5.0; // joint distance that maps to full pitch

// Spectrum
pub const DEFAULT_SPECTRUM_SIZE: usize = 256;
pub const DEFAULT_ENERGY_THRESHOLD: f32 = 0.1; // hue only changes above this mean magnitude

// Rolloff
pub const ROLLOFF_SAMPLE_COUNT: usize = 11;
pub const DEFAULT_AVATAR_HEIGHT: f32 = 1.0;
pub const MIN_AVATAR_HEIGHT: f32 = f32::EPSILON; // smaller heights overflow the density

// Trail envelope defaults (world units / seconds)
pub const DEFAULT_WIDTH_RANGE: [f32; 2] = [0.02, 0.08];
pub const DEFAULT_DURATION_RANGE: [f32; 2] = [0.25, 1.0];
pub const DEFAULT_TAIL_WIDTH_RATIO: f32 = 0.1; // end width relative to head width

// Noise phase speeds (noise units per second)
pub const WIDTH_NOISE_SPEED: f32 = 0.7;
pub const DURATION_NOISE_SPEED: f32 = 0.4;
pub const DURATION_NOISE_OFFSET: f32 = 17.3; // decorrelates duration from width

// Sound defaults
pub const DEFAULT_PITCH_RANGE: [f32; 2] = [0.8, 1.6];
pub const DEFAULT_VOLUME: f32 = 0.6;

// Noise lattice
pub const DEFAULT_NOISE_SEED: u64 = 42;

// Default joint layout (humanoid bone paths)
pub const DEFAULT_TRAIL_JOINTS: [&str; 2] = [
    "Armature/Hips/Spine/Chest/UpperArm.L/LowerArm.L/Hand.L",
    "Armature/Hips/Spine/Chest/UpperArm.R/LowerArm.R/Hand.R",
];
pub const DEFAULT_HIP_JOINT: &str = "Armature/Hips";
pub const DEFAULT_CHEST_JOINT: &str = "Armature/Hips/Spine/Chest";
pub const DEFAULT_HEAD_JOINT: &str = "Armature/Hips/Spine/Chest/Neck/Head";
pub const DEFAULT_FOOT_JOINT: &str = "Armature/Hips/UpperLeg.L/LowerLeg.L/Foot.L";

#[inline]
pub fn up_axis() -> Vec3 {
    Vec3::Y
}
