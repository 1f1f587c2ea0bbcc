use glam::Vec3;
use jointfx_core::{
    capacity_for_duration, rgb_to_hue, up_axis, ColorModulator, Gradient, ModulationState,
    NoiseInterpolator, Range, RolloffCurve, SoundModulator, SpectrumFrame, TrailInstance,
    TrailStyle, WindowKind, DEFAULT_AVATAR_HEIGHT, MIN_AVATAR_HEIGHT,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::RefCell;
use std::rc::Rc;

use crate::audio::{apply_playback, AudioSink};
use crate::config::EffectConfig;
use crate::error::EffectError;
use crate::params::{BoundParam, ParameterStore};
use crate::render::{push_trail, PolylineSink};
use crate::skeleton::JointSampler;

/// Per-frame lifecycle the host drives.
pub trait FrameEffect {
    /// One-time setup. On failure the effect disables itself.
    fn start(&mut self) -> Result<(), EffectError>;
    /// Runs every sub-step for this frame. Failures are logged, never returned.
    fn tick(&mut self, elapsed_sec: f64);
    fn update_trail(&mut self, slot: usize) -> Result<(), EffectError>;
    fn update_modulation(&mut self, elapsed_sec: f64);
    fn is_enabled(&self) -> bool;
    fn disable(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Idle,
    Running,
    Disabled,
}

struct TrailSlot {
    trail: TrailInstance,
    sink: Box<dyn PolylineSink>,
    missing: bool,
}

/// Trails, hue and sound for one figure.
pub struct JointEffectController {
    config: EffectConfig,
    skeleton: Rc<dyn JointSampler>,
    params: Rc<RefCell<dyn ParameterStore>>,
    audio: Option<Box<dyn AudioSink>>,
    trails: Vec<TrailSlot>,
    pending_sinks: usize,

    noise: NoiseInterpolator,
    color: ColorModulator,
    sound: SoundModulator,
    state: ModulationState,
    spectrum: SpectrumFrame,
    gradient: Gradient,
    rolloff: Option<RolloffCurve>,
    jitter_rng: StdRng,

    out_width: BoundParam<f32>,
    out_duration: BoundParam<f32>,
    out_hue: BoundParam<f32>,
    out_energy: BoundParam<f32>,
    sound_toggle: BoundParam<bool>,

    sound_joints_missing: bool,
    lifecycle: Lifecycle,
}

impl JointEffectController {
    /// `trail_sinks` pair up with `config.trail_joints` in order.
    pub fn new(
        config: EffectConfig,
        skeleton: Rc<dyn JointSampler>,
        params: Rc<RefCell<dyn ParameterStore>>,
        trail_sinks: Vec<Box<dyn PolylineSink>>,
        audio: Option<Box<dyn AudioSink>>,
    ) -> Self {
        let pending_sinks = trail_sinks.len();
        let trails = config
            .trail_joints
            .iter()
            .zip(trail_sinks)
            .map(|(joint, sink)| TrailSlot {
                trail: TrailInstance::new(joint.clone()),
                sink,
                missing: false,
            })
            .collect();
        let out_width = BoundParam::new(config.param_name("Width"), 0.0);
        let out_duration = BoundParam::new(config.param_name("Duration"), 0.0);
        let out_hue = BoundParam::new(config.param_name("Hue"), 0.0);
        let out_energy = BoundParam::new(config.param_name("Energy"), 0.0);
        let sound_toggle = BoundParam::new(config.param_name("Sound"), config.sound_on_start);
        Self {
            noise: NoiseInterpolator::with_seed(config.noise_seed),
            color: ColorModulator::default(),
            sound: SoundModulator::new(config.pitch_range, config.sound_on_start),
            state: ModulationState::default(),
            spectrum: SpectrumFrame::new(config.spectrum_size),
            gradient: Gradient::default(),
            rolloff: None,
            jitter_rng: StdRng::from_entropy(),
            out_width,
            out_duration,
            out_hue,
            out_energy,
            sound_toggle,
            sound_joints_missing: false,
            lifecycle: Lifecycle::Idle,
            config,
            skeleton,
            params,
            audio,
            trails,
            pending_sinks,
        }
    }

    /// Fixes the hue jitter sequence, for reproducible runs.
    pub fn with_jitter_seed(mut self, seed: u64) -> Self {
        self.jitter_rng = StdRng::seed_from_u64(seed);
        self
    }

    #[inline]
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    #[inline]
    pub fn config(&self) -> &EffectConfig {
        &self.config
    }

    #[inline]
    pub fn state(&self) -> &ModulationState {
        &self.state
    }

    #[inline]
    pub fn gradient(&self) -> &Gradient {
        &self.gradient
    }

    #[inline]
    pub fn rolloff(&self) -> Option<&RolloffCurve> {
        self.rolloff.as_ref()
    }

    #[inline]
    pub fn pitch(&self) -> f32 {
        self.sound.last_pitch()
    }

    #[inline]
    pub fn sound_on(&self) -> bool {
        self.sound.is_playing()
    }

    pub fn trail(&self, slot: usize) -> Option<&TrailInstance> {
        self.trails.get(slot).map(|s| &s.trail)
    }

    pub fn trail_count(&self) -> usize {
        self.trails.len()
    }

    /// Apply a preset selection. Unset fields keep their current values.
    pub fn apply_style(&mut self, style: &TrailStyle) {
        if let Some(rgb) = style.color {
            self.state.hue_offset = rgb_to_hue(rgb);
        }
        if let Some(w) = style.width.filter(|w| w.is_finite() && *w >= 0.0) {
            self.config.width_range = Range::new(w * 0.5, w);
        }
        if let Some(l) = style.length_sec.filter(|l| l.is_finite() && *l >= 0.0) {
            self.config.duration_range = Range::new(l * 0.5, l);
        }
        if let Some(tex) = &style.texture {
            for slot in &mut self.trails {
                slot.sink.set_texture(tex);
            }
        }
    }

    fn try_start(&mut self) -> Result<(), EffectError> {
        self.config.validate()?;
        if self.pending_sinks != self.config.trail_joints.len() {
            log::error!(
                "setup: {} trail joints but {} polyline sinks",
                self.config.trail_joints.len(),
                self.pending_sinks
            );
            return Err(EffectError::SinkUnavailable("polyline"));
        }
        {
            let mut store = self
                .params
                .try_borrow_mut()
                .map_err(|_| EffectError::SinkUnavailable("parameter store"))?;
            self.out_width.bind_output(&mut *store);
            self.out_duration.bind_output(&mut *store);
            self.out_hue.bind_output(&mut *store);
            self.out_energy.bind_output(&mut *store);
            self.sound_toggle.bind_input(&mut *store);
        }

        let height = self.measure_height();
        let curve = RolloffCurve::build(height);
        match self.audio.as_deref_mut() {
            Some(audio) => {
                audio.set_volume(self.config.volume);
                audio.set_rolloff_curve(&curve);
                // sink must match the toggle the sound modulator starts from
                if self.config.sound_on_start && !audio.is_playing() {
                    audio.play();
                } else if !self.config.sound_on_start && audio.is_playing() {
                    audio.stop();
                }
            }
            None => log::warn!("setup: no audio sink, sound and color reactivity disabled"),
        }
        self.rolloff = Some(curve);

        for slot in &mut self.trails {
            slot.sink.set_color_gradient(&self.gradient);
        }
        Ok(())
    }

    // Vertical head-to-foot distance, or the default scale when unavailable.
    fn measure_height(&self) -> f32 {
        let head = self.skeleton.position(&self.config.head_joint);
        let foot = self.skeleton.position(&self.config.foot_joint);
        match (head, foot) {
            (Some(h), Some(f)) => {
                let height = (h - f).dot(up_axis());
                if height.is_finite() && height >= MIN_AVATAR_HEIGHT {
                    log::info!("setup: avatar height {:.3}", height);
                    height
                } else {
                    log::warn!("setup: degenerate avatar height {}, using default", height);
                    DEFAULT_AVATAR_HEIGHT
                }
            }
            _ => {
                log::warn!("setup: head/foot joints unavailable, using default height");
                DEFAULT_AVATAR_HEIGHT
            }
        }
    }

    fn publish(param: &mut BoundParam<f32>, store: &RefCell<dyn ParameterStore>, value: f32) {
        match store.try_borrow_mut() {
            Ok(mut s) => param.publish(&mut *s, value),
            Err(_) => {
                param.cached = value;
                log::warn!("params: store busy, '{}' not written", param.name);
            }
        }
    }

    fn sample_energy(&mut self) -> Result<f32, EffectError> {
        let audio = self
            .audio
            .as_deref_mut()
            .ok_or(EffectError::SinkUnavailable("audio"))?;
        audio.read_spectrum(self.spectrum.as_mut_slice(), WindowKind::Blackman);
        Ok(self.spectrum.energy())
    }

    fn update_color(&mut self) -> Result<(), EffectError> {
        let energy = self.sample_energy()?;
        self.gradient = self.color.update(
            &mut self.state,
            &self.noise,
            energy,
            self.config.energy_threshold,
            &mut self.jitter_rng,
        );
        for slot in &mut self.trails {
            slot.sink.set_color_gradient(&self.gradient);
        }
        Self::publish(&mut self.out_hue, &self.params, self.state.hue_offset);
        Self::publish(&mut self.out_energy, &self.params, energy);
        Ok(())
    }

    fn update_sound(&mut self) -> Result<(), EffectError> {
        let toggle = match self.params.try_borrow() {
            Ok(store) => self.sound_toggle.refresh(&*store),
            Err(_) => self.sound_toggle.cached,
        };
        let audio = self
            .audio
            .as_deref_mut()
            .ok_or(EffectError::SinkUnavailable("audio"))?;
        let hip = self.skeleton.position(&self.config.hip_joint);
        let chest = self.skeleton.position(&self.config.chest_joint);
        let joints = hip.zip(chest);

        let tick = self
            .sound
            .tick(&self.noise, joints, toggle, audio.is_playing());
        if let Some(pitch) = tick.pitch {
            audio.set_pitch(pitch);
        }
        if let Some(action) = tick.action {
            apply_playback(audio, action);
        }

        if joints.is_none() {
            let missing = if hip.is_none() {
                &self.config.hip_joint
            } else {
                &self.config.chest_joint
            };
            return Err(EffectError::JointNotFound(missing.clone()));
        }
        if self.sound_joints_missing {
            log::info!("sound: reference joints resolved again");
            self.sound_joints_missing = false;
        }
        Ok(())
    }

    fn report_trail(&mut self, slot: usize, result: Result<(), EffectError>) {
        let Some(s) = self.trails.get_mut(slot) else {
            return;
        };
        match result {
            Ok(()) => {
                if s.missing {
                    log::info!("trail: '{}' resolved again", s.trail.joint_path);
                    s.missing = false;
                }
            }
            Err(EffectError::JointNotFound(path)) => {
                if !s.missing {
                    log::warn!("trail: joint '{}' not found, skipping", path);
                    s.missing = true;
                }
            }
            Err(e) => log::warn!("trail {}: {}", slot, e),
        }
    }
}

impl FrameEffect for JointEffectController {
    fn start(&mut self) -> Result<(), EffectError> {
        match self.lifecycle {
            Lifecycle::Running => return Ok(()),
            Lifecycle::Disabled => return Err(EffectError::Disabled),
            Lifecycle::Idle => {}
        }
        match self.try_start() {
            Ok(()) => {
                self.lifecycle = Lifecycle::Running;
                log::info!(
                    "[effect] started trails={} audio={}",
                    self.trails.len(),
                    self.audio.is_some()
                );
                Ok(())
            }
            Err(e) => {
                log::error!("[effect] setup failed, disabling: {}", e);
                self.lifecycle = Lifecycle::Disabled;
                Err(e)
            }
        }
    }

    fn tick(&mut self, elapsed_sec: f64) {
        match self.lifecycle {
            Lifecycle::Running => {}
            Lifecycle::Idle => {
                log::debug!("[effect] tick before start ignored");
                return;
            }
            Lifecycle::Disabled => return,
        }

        self.update_modulation(elapsed_sec);

        for slot in 0..self.trails.len() {
            let result = self.update_trail(slot);
            self.report_trail(slot, result);
        }

        if let Err(e) = self.update_color() {
            log::debug!("color: skipped ({})", e);
        }

        match self.update_sound() {
            Ok(()) => {}
            Err(EffectError::JointNotFound(path)) => {
                if !self.sound_joints_missing {
                    log::warn!("sound: joint '{}' not found, pitch held", path);
                    self.sound_joints_missing = true;
                }
            }
            Err(e) => log::debug!("sound: skipped ({})", e),
        }
    }

    fn update_trail(&mut self, slot: usize) -> Result<(), EffectError> {
        let s = self
            .trails
            .get_mut(slot)
            .ok_or(EffectError::NoSuchTrail(slot))?;
        let point: Vec3 = self
            .skeleton
            .position(&s.trail.joint_path)
            .ok_or_else(|| EffectError::JointNotFound(s.trail.joint_path.clone()))?;
        // assumes FIXED_TICK_RATE ticks per second regardless of the host's real rate
        let capacity = capacity_for_duration(self.state.current_duration);
        s.trail.update(point, capacity);
        push_trail(
            s.sink.as_mut(),
            &s.trail,
            self.state.current_width,
            self.config.tail_width_ratio,
        );
        Ok(())
    }

    fn update_modulation(&mut self, elapsed_sec: f64) {
        let cfg = &self.config;
        let width_phase = (elapsed_sec * cfg.width_noise_speed as f64) as f32;
        let duration_phase = (elapsed_sec * cfg.duration_noise_speed as f64) as f32
            + cfg.duration_noise_offset;
        self.state.current_width =
            self.noise
                .interpolate(cfg.width_range.min, cfg.width_range.max, width_phase);
        self.state.current_duration = self.noise.interpolate(
            cfg.duration_range.min,
            cfg.duration_range.max,
            duration_phase,
        );
        Self::publish(&mut self.out_width, &self.params, self.state.current_width);
        Self::publish(
            &mut self.out_duration,
            &self.params,
            self.state.current_duration,
        );
    }

    fn is_enabled(&self) -> bool {
        self.lifecycle != Lifecycle::Disabled
    }

    fn disable(&mut self) {
        if self.lifecycle != Lifecycle::Disabled {
            log::info!("[effect] disabled");
            self.lifecycle = Lifecycle::Disabled;
        }
    }
}

impl Drop for JointEffectController {
    fn drop(&mut self) {
        if let Some(audio) = self.audio.as_deref_mut() {
            if audio.is_playing() {
                audio.stop();
            }
        }
    }
}
