use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use glam::Vec3;
use instant::Instant;
use rand::prelude::*;

use jointfx::{
    AudioSink, EffectConfig, FrameEffect, JointEffectController, JointSampler,
    MemoryParameterStore, ParameterStore, PolylineSink,
};
use jointfx_core::{
    Gradient, PresetBank, PresetKind, PresetSelector, RolloffCurve, WindowKind, FIXED_TICK_RATE,
};

const DEFAULT_TICKS: u32 = 600;

/// Procedural walk cycle: hips bob, hands swing, chest sways.
struct SimSkeleton {
    clock: Rc<Cell<f64>>,
}

impl JointSampler for SimSkeleton {
    fn position(&self, joint_path: &str) -> Option<Vec3> {
        let t = self.clock.get() as f32;
        let stride = (t * std::f32::consts::TAU * 0.9).sin();
        let hips = Vec3::new(0.0, 0.95 + 0.03 * (2.0 * stride).abs(), t * 1.2);
        let leaf = joint_path.rsplit('/').next()?;
        let p = match leaf {
            "Hips" => hips,
            "Chest" => hips + Vec3::new(0.05 * stride, 0.45, 0.0),
            "Head" => hips + Vec3::new(0.0, 0.75, 0.02),
            "Hand.L" => hips + Vec3::new(-0.35, 0.05, 0.4 * stride),
            "Hand.R" => hips + Vec3::new(0.35, 0.05, -0.4 * stride),
            "Foot.L" => Vec3::new(-0.12, 0.0, hips.z + 0.3 * stride),
            "Foot.R" => Vec3::new(0.12, 0.0, hips.z - 0.3 * stride),
            _ => return None,
        };
        Some(p)
    }
}

#[derive(Default)]
struct TrailStats {
    uploads: u64,
    max_points: usize,
    last_width: f32,
    last_color: [f32; 3],
    gradient_bytes: Vec<u8>,
}

struct LoggingPolyline {
    name: String,
    stats: Rc<RefCell<TrailStats>>,
}

impl PolylineSink for LoggingPolyline {
    fn set_position_count(&mut self, count: usize) {
        let mut s = self.stats.borrow_mut();
        s.uploads += 1;
        s.max_points = s.max_points.max(count);
    }

    fn set_position(&mut self, _index: usize, _point: Vec3) {}

    fn set_width(&mut self, start: f32, _end: f32) {
        self.stats.borrow_mut().last_width = start;
    }

    fn set_color_gradient(&mut self, gradient: &Gradient) {
        let mut s = self.stats.borrow_mut();
        if let Some(rgb) = gradient.head_color() {
            s.last_color = rgb;
        }
        // staging buffer a GPU-side sink would copy from
        s.gradient_bytes.clear();
        s.gradient_bytes.extend_from_slice(gradient.color_key_bytes());
        s.gradient_bytes.extend_from_slice(gradient.alpha_key_bytes());
    }

    fn set_texture(&mut self, name: &str) {
        log::info!("[{}] texture -> {}", self.name, name);
    }
}

/// Fake emitter whose spectrum pulses on a two-beat-per-second envelope.
struct SimAudio {
    clock: Rc<Cell<f64>>,
    playing: bool,
    pitch: f32,
    rng: StdRng,
    transitions: Rc<Cell<u32>>,
}

impl AudioSink for SimAudio {
    fn play(&mut self) {
        self.playing = true;
        self.transitions.set(self.transitions.get() + 1);
    }

    fn stop(&mut self) {
        self.playing = false;
        self.transitions.set(self.transitions.get() + 1);
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch;
    }

    fn set_volume(&mut self, volume: f32) {
        log::info!("[audio] volume {:.2}", volume);
    }

    fn set_rolloff_curve(&mut self, curve: &RolloffCurve) {
        let keys = curve.keys();
        log::info!(
            "[audio] rolloff height={:.2} gain0={:.4} gain_end={:.4}",
            curve.height(),
            keys[0].gain,
            keys[keys.len() - 1].gain
        );
    }

    fn read_spectrum(&mut self, buffer: &mut [f32], _window: WindowKind) {
        if !self.playing {
            buffer.iter_mut().for_each(|b| *b = 0.0);
            return;
        }
        let t = self.clock.get() as f32;
        let beat = 0.5 + 0.5 * (t * std::f32::consts::TAU * 2.0).sin();
        let n = buffer.len().max(1) as f32;
        for (i, b) in buffer.iter_mut().enumerate() {
            let tilt = (-(i as f32) / (n * 0.25)).exp();
            *b = beat * self.pitch * tilt * self.rng.gen_range(0.5..1.5);
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let ticks: u32 = match std::env::args().nth(1) {
        Some(arg) => arg
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid tick count '{}': {}", arg, e))?,
        None => DEFAULT_TICKS,
    };

    let clock = Rc::new(Cell::new(0.0_f64));
    let skeleton = Rc::new(SimSkeleton {
        clock: clock.clone(),
    });
    let params = Rc::new(RefCell::new(MemoryParameterStore::new()));

    let config = EffectConfig::default();
    let stats: Vec<Rc<RefCell<TrailStats>>> = config
        .trail_joints
        .iter()
        .map(|_| Rc::new(RefCell::new(TrailStats::default())))
        .collect();
    let sinks: Vec<Box<dyn PolylineSink>> = config
        .trail_joints
        .iter()
        .zip(&stats)
        .map(|(joint, s)| {
            Box::new(LoggingPolyline {
                name: joint.rsplit('/').next().unwrap_or(joint).to_string(),
                stats: s.clone(),
            }) as Box<dyn PolylineSink>
        })
        .collect();
    let transitions = Rc::new(Cell::new(0));
    let audio = SimAudio {
        clock: clock.clone(),
        playing: false,
        pitch: 1.0,
        rng: StdRng::seed_from_u64(7),
        transitions: transitions.clone(),
    };

    let sound_param = config.param_name("Sound");
    let mut controller = JointEffectController::new(
        config,
        skeleton,
        params.clone(),
        sinks,
        Some(Box::new(audio)),
    );
    controller
        .start()
        .map_err(|e| anyhow::anyhow!("controller setup failed: {}", e))?;

    let mut presets = PresetSelector::new(PresetBank {
        colors: vec![[1.0, 0.2, 0.6], [0.2, 0.8, 1.0]],
        widths: vec![0.05, 0.12],
        lengths: vec![0.5, 1.5],
        textures: vec!["soft".into(), "streak".into()],
    });

    let dt = Duration::from_secs_f64(1.0 / FIXED_TICK_RATE as f64);
    let wall_start = Instant::now();
    let mut busy = Duration::ZERO;
    let mut gate_changes = 0u32;
    let mut last_hue = controller.state().hue_offset;

    for i in 0..ticks {
        clock.set(clock.get() + dt.as_secs_f64());

        // driver flips sound off for the middle third of the run
        if i == ticks / 3 || i == 2 * ticks / 3 {
            let mut store = params.borrow_mut();
            if let Some(h) = store.find(&sound_param) {
                let on = store.read_bool(h).unwrap_or(true);
                store.write_bool(h, !on);
            }
        }
        if i == ticks / 2 {
            for kind in [PresetKind::Width, PresetKind::Length, PresetKind::Texture] {
                if let Ok(style) = presets.select(kind, 1) {
                    controller.apply_style(style);
                }
            }
        }

        let t0 = Instant::now();
        controller.tick(clock.get());
        busy += t0.elapsed();

        let hue = controller.state().hue_offset;
        if hue != last_hue {
            gate_changes += 1;
            last_hue = hue;
        }
    }

    log::info!(
        "ran {} ticks in {:.1?} (effect busy {:.1?}, {:.2} us/tick)",
        ticks,
        wall_start.elapsed(),
        busy,
        busy.as_secs_f64() * 1e6 / ticks.max(1) as f64
    );
    for (joint, s) in controller.config().trail_joints.iter().zip(&stats) {
        let s = s.borrow();
        log::info!(
            "trail {}: uploads={} max_points={} width={:.3} color=({:.2},{:.2},{:.2}) gradient={}B",
            joint,
            s.uploads,
            s.max_points,
            s.last_width,
            s.last_color[0],
            s.last_color[1],
            s.last_color[2],
            s.gradient_bytes.len()
        );
    }
    log::info!(
        "hue changes={} pitch={:.3} sound_on={} transitions={}",
        gate_changes,
        controller.pitch(),
        controller.sound_on(),
        transitions.get()
    );
    for p in params.borrow().iter() {
        log::info!("param {} = {:?}", p.name, p.value);
    }
    Ok(())
}
