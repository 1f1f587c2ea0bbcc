use glam::Vec3;

use crate::constants::VELOCITY_SCALE;
use crate::noise::NoiseInterpolator;
use crate::state::Range;

/// Command the controller forwards to the audio sink.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackAction {
    Play,
    Stop,
    /// Sink stopped on its own while the toggle is still on.
    Restart,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SoundTick {
    /// `None` when the reference joints were unavailable this tick.
    pub pitch: Option<f32>,
    pub playing: bool,
    pub action: Option<PlaybackAction>,
}

/// Distance between the two reference joints, scaled into \[0, 1\].
#[inline]
pub fn normalized_velocity(a: Vec3, b: Vec3) -> f32 {
    let v = a.distance(b) / VELOCITY_SCALE;
    if v.is_finite() {
        v.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Motion-driven pitch plus edge-triggered play/stop state.
#[derive(Clone, Debug)]
pub struct SoundModulator {
    pub pitch_range: Range,
    previous_toggle: bool,
    last_pitch: f32,
}

impl SoundModulator {
    /// `initial_toggle` is the playback state the sink starts in; the first
    /// tick only acts if the toggle differs from it.
    pub fn new(pitch_range: Range, initial_toggle: bool) -> Self {
        Self {
            pitch_range,
            previous_toggle: initial_toggle,
            last_pitch: pitch_range.min,
        }
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.previous_toggle
    }

    #[inline]
    pub fn last_pitch(&self) -> f32 {
        self.last_pitch
    }

    pub fn pitch_for(&mut self, noise: &NoiseInterpolator, a: Vec3, b: Vec3) -> f32 {
        let t = normalized_velocity(a, b);
        self.last_pitch = noise.interpolate(self.pitch_range.min, self.pitch_range.max, t);
        self.last_pitch
    }

    /// Acts only on toggle edges, plus a restart when the toggle holds on but
    /// the sink reports it has stopped.
    pub fn transition(&mut self, toggle: bool, sink_playing: bool) -> Option<PlaybackAction> {
        let previous = std::mem::replace(&mut self.previous_toggle, toggle);
        match (previous, toggle) {
            (false, true) => Some(PlaybackAction::Play),
            (true, false) => Some(PlaybackAction::Stop),
            (true, true) if !sink_playing => Some(PlaybackAction::Restart),
            _ => None,
        }
    }

    pub fn tick(
        &mut self,
        noise: &NoiseInterpolator,
        joints: Option<(Vec3, Vec3)>,
        toggle: bool,
        sink_playing: bool,
    ) -> SoundTick {
        let pitch = joints.map(|(a, b)| self.pitch_for(noise, a, b));
        let action = self.transition(toggle, sink_playing);
        SoundTick {
            pitch,
            playing: toggle,
            action,
        }
    }
}
