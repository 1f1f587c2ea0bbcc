// Host-side tests for the joint effect controller, driven through recording sinks.

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::*;
use glam::Vec3;
use jointfx::jointfx_core::{Range, TrailStyle, WindowKind, DEFAULT_AVATAR_HEIGHT};
use jointfx::{
    AudioSink, EffectConfig, EffectError, FrameEffect, JointEffectController, Lifecycle,
    MemoryParameterStore, ParamKind, ParameterStore, PolylineSink,
};

const DT: f64 = 1.0 / 60.0;

struct Rig {
    skeleton: Rc<MapSkeleton>,
    params: Rc<RefCell<MemoryParameterStore>>,
    trails: Vec<Rc<RefCell<PolylineLog>>>,
    audio: Rc<RefCell<AudioLog>>,
}

fn config() -> EffectConfig {
    EffectConfig {
        trail_joints: vec![HAND_L.to_string(), HAND_R.to_string()],
        hip_joint: HIPS.to_string(),
        chest_joint: CHEST.to_string(),
        head_joint: HEAD.to_string(),
        foot_joint: FOOT.to_string(),
        ..Default::default()
    }
}

fn build_with(
    config: EffectConfig,
    params: Rc<RefCell<MemoryParameterStore>>,
    with_audio: bool,
) -> (Rig, JointEffectController) {
    let skeleton = Rc::new(MapSkeleton::humanoid());
    let trails: Vec<Rc<RefCell<PolylineLog>>> = config
        .trail_joints
        .iter()
        .map(|_| Rc::new(RefCell::new(PolylineLog::default())))
        .collect();
    let sinks: Vec<Box<dyn PolylineSink>> = trails
        .iter()
        .map(|t| Box::new(RecordingPolyline(t.clone())) as Box<dyn PolylineSink>)
        .collect();
    let audio = Rc::new(RefCell::new(AudioLog::default()));
    let audio_sink: Option<Box<dyn AudioSink>> = if with_audio {
        Some(Box::new(RecordingAudio(audio.clone())))
    } else {
        None
    };
    let controller =
        JointEffectController::new(config, skeleton.clone(), params.clone(), sinks, audio_sink)
            .with_jitter_seed(5);
    (
        Rig {
            skeleton,
            params,
            trails,
            audio,
        },
        controller,
    )
}

fn build(config: EffectConfig) -> (Rig, JointEffectController) {
    build_with(
        config,
        Rc::new(RefCell::new(MemoryParameterStore::new())),
        true,
    )
}

fn started(config: EffectConfig) -> (Rig, JointEffectController) {
    let (rig, mut c) = build(config);
    c.start().expect("start");
    (rig, c)
}

fn read_float(rig: &Rig, name: &str) -> Option<f32> {
    let store = rig.params.borrow();
    store.find(name).and_then(|h| store.read_float(h))
}

fn write_sound(rig: &Rig, on: bool) {
    let mut store = rig.params.borrow_mut();
    let h = store.find("JointFx/Sound").expect("sound param");
    assert!(store.write_bool(h, on));
}

#[test]
fn start_sizes_rolloff_from_avatar_height() {
    let (rig, c) = started(config());
    assert_eq!(c.lifecycle(), Lifecycle::Running);
    let audio = rig.audio.borrow();
    let curve = audio.rolloff.as_ref().expect("rolloff sent");
    assert!((curve.height() - 1.8).abs() < 1e-5);
    assert_eq!(c.rolloff(), Some(curve));
    assert_eq!(audio.volume, Some(c.config().volume));
    assert_eq!(audio.calls, vec![AudioCall::Play]);
}

#[test]
fn missing_height_joints_use_default_scale() {
    let (rig, mut c) = build(config());
    rig.skeleton.remove(HEAD);
    c.start().expect("start");
    let curve = c.rolloff().expect("rolloff");
    assert_eq!(curve.height(), DEFAULT_AVATAR_HEIGHT);
}

#[test]
fn tick_before_start_does_nothing() {
    let (rig, mut c) = build(config());
    c.tick(1.0);
    assert_eq!(rig.trails[0].borrow().uploads, 0);
    assert_eq!(rig.audio.borrow().spectrum_reads, 0);
    assert_eq!(c.lifecycle(), Lifecycle::Idle);
}

#[test]
fn trail_keeps_duration_worth_of_points() {
    let mut cfg = config();
    cfg.duration_range = Range::new(0.5, 0.5);
    let (rig, mut c) = started(cfg);
    let mut expected = Vec::new();
    for i in 0..40 {
        let p = Vec3::new(i as f32 * 0.01, 1.0, 0.0);
        rig.skeleton.set(HAND_L, p);
        expected.push(p);
        c.tick(i as f64 * DT);
    }
    let log = rig.trails[0].borrow();
    assert_eq!(log.uploads, 40);
    assert_eq!(log.positions.len(), 30);
    assert_eq!(log.positions, expected[10..].to_vec());
    assert_eq!(c.trail(0).map(|t| t.capacity()), Some(30));
}

#[test]
fn zero_duration_still_keeps_one_point() {
    let mut cfg = config();
    cfg.duration_range = Range::new(0.0, 0.0);
    let (rig, mut c) = started(cfg);
    for i in 0..5 {
        rig.skeleton.set(HAND_R, Vec3::splat(i as f32));
        c.tick(i as f64 * DT);
    }
    let log = rig.trails[1].borrow();
    assert_eq!(log.positions, vec![Vec3::splat(4.0)]);
}

#[test]
fn width_tapers_to_tail_ratio() {
    let mut cfg = config();
    cfg.width_range = Range::new(0.05, 0.05);
    cfg.tail_width_ratio = 0.1;
    let (rig, mut c) = started(cfg);
    c.tick(0.3);
    let (start, end) = rig.trails[0].borrow().width.expect("width set");
    assert!((start - 0.05).abs() < 1e-6);
    assert!((end - 0.005).abs() < 1e-6);
    assert!((read_float(&rig, "JointFx/Width").unwrap() - 0.05).abs() < 1e-6);
}

#[test]
fn modulated_values_stay_in_configured_ranges() {
    let (rig, mut c) = started(config());
    let cfg = c.config().clone();
    for i in 0..600 {
        c.tick(i as f64 * DT);
        let s = c.state();
        assert!(s.current_width >= cfg.width_range.min && s.current_width <= cfg.width_range.max);
        assert!(
            s.current_duration >= cfg.duration_range.min
                && s.current_duration <= cfg.duration_range.max
        );
    }
    let duration = read_float(&rig, "JointFx/Duration").unwrap();
    assert_eq!(duration, c.state().current_duration);
}

#[test]
fn missing_joint_skips_only_that_trail() {
    let (rig, mut c) = started(config());
    rig.skeleton.remove(HAND_L);
    for i in 0..3 {
        c.tick(i as f64 * DT);
    }
    assert_eq!(rig.trails[0].borrow().uploads, 0);
    assert_eq!(rig.trails[1].borrow().uploads, 3);
    assert_eq!(rig.audio.borrow().spectrum_reads, 3);

    rig.skeleton.set(HAND_L, Vec3::ONE);
    c.tick(3.0 * DT);
    assert_eq!(rig.trails[0].borrow().uploads, 1);
    assert_eq!(c.trail(0).and_then(|t| t.newest()), Some(Vec3::ONE));
}

#[test]
fn hue_holds_through_quiet_frames() {
    let (rig, mut c) = started(config());
    let mut hues = Vec::new();
    for (i, level) in [0.05_f32, 0.5, 0.05].into_iter().enumerate() {
        rig.audio.borrow_mut().level = level;
        c.tick(i as f64 * DT);
        hues.push(c.state().clone());
    }
    assert_eq!(hues[0].hue_offset, 0.0);
    assert!((hues[1].hue_offset - 0.5).abs() < 1e-6);
    assert_eq!(hues[1].hue_offset, hues[2].hue_offset);
    assert_eq!(hues[1].hue_variation, hues[2].hue_variation);
    assert_eq!(read_float(&rig, "JointFx/Hue"), Some(hues[2].hue_offset));
    assert_eq!(rig.audio.borrow().window, Some(WindowKind::Blackman));
}

#[test]
fn gradient_reaches_every_trail_each_tick() {
    let (rig, mut c) = started(config());
    rig.audio.borrow_mut().level = 0.8;
    c.tick(0.0);
    c.tick(DT);
    for t in &rig.trails {
        let log = t.borrow();
        // one from start, one per tick
        assert_eq!(log.gradients.len(), 3);
        assert_eq!(log.gradients.last(), Some(c.gradient()));
    }
}

#[test]
fn sound_toggle_is_edge_triggered_through_params() {
    let (rig, mut c) = started(config());
    rig.audio.borrow_mut().calls.clear();

    let sequence = [true, true, false, false, true];
    for (i, on) in sequence.into_iter().enumerate() {
        write_sound(&rig, on);
        c.tick(i as f64 * DT);
    }
    assert_eq!(
        rig.audio.borrow().calls,
        vec![AudioCall::Stop, AudioCall::Play]
    );
    assert!(c.sound_on());
}

#[test]
fn stopped_sink_restarts_while_toggled_on() {
    let (rig, mut c) = started(config());
    rig.audio.borrow_mut().calls.clear();
    rig.audio.borrow_mut().playing = false;
    c.tick(0.0);
    assert_eq!(rig.audio.borrow().calls, vec![AudioCall::Play]);
    c.tick(DT);
    assert_eq!(rig.audio.borrow().calls.len(), 1);
}

#[test]
fn start_silences_a_sink_already_playing_when_toggled_off() {
    let (rig, mut c) = build(EffectConfig {
        sound_on_start: false,
        ..config()
    });
    rig.audio.borrow_mut().playing = true;
    c.start().expect("start");
    assert_eq!(rig.audio.borrow().calls, vec![AudioCall::Stop]);

    for i in 0..5 {
        c.tick(i as f64 * DT);
    }
    assert!(!c.sound_on());
    assert!(
        !rig.audio.borrow().playing,
        "sink should stay silent while the toggle is off"
    );
    assert_eq!(rig.audio.borrow().calls, vec![AudioCall::Stop]);

    write_sound(&rig, true);
    c.tick(5.0 * DT);
    assert_eq!(
        rig.audio.borrow().calls,
        vec![AudioCall::Stop, AudioCall::Play]
    );
}

#[test]
fn large_joint_separation_gives_max_pitch() {
    let (rig, mut c) = started(config());
    rig.skeleton.set(CHEST, Vec3::new(0.0, 11.0, 0.0));
    c.tick(0.0);
    let pitch = rig.audio.borrow().pitch.expect("pitch set");
    assert!((pitch - c.config().pitch_range.max).abs() < 1e-5);
    assert_eq!(c.pitch(), pitch);
}

#[test]
fn missing_sound_joint_holds_pitch() {
    let (rig, mut c) = started(config());
    c.tick(0.0);
    let before = rig.audio.borrow().pitch;
    rig.skeleton.set(CHEST, Vec3::new(0.0, 6.0, 0.0));
    rig.skeleton.remove(HIPS);
    c.tick(DT);
    assert_eq!(rig.audio.borrow().pitch, before);
    assert_eq!(rig.trails[0].borrow().uploads, 2);
}

#[test]
fn no_audio_sink_keeps_trails_running() {
    let (rig, mut c) = build_with(
        config(),
        Rc::new(RefCell::new(MemoryParameterStore::new())),
        false,
    );
    c.start().expect("start without audio");
    for i in 0..4 {
        c.tick(i as f64 * DT);
    }
    assert_eq!(rig.trails[0].borrow().uploads, 4);
    // only the initial gradient
    assert_eq!(rig.trails[0].borrow().gradients.len(), 1);
    assert!(c.rolloff().is_some());
}

#[test]
fn setup_failure_disables_controller() {
    let mut cfg = config();
    cfg.trail_joints.clear();
    let (rig, mut c) = build(cfg);
    assert_eq!(c.start(), Err(EffectError::NoTrails));
    assert_eq!(c.lifecycle(), Lifecycle::Disabled);
    assert!(!c.is_enabled());
    c.tick(0.0);
    assert_eq!(rig.audio.borrow().spectrum_reads, 0);
    assert_eq!(c.start(), Err(EffectError::Disabled));
}

#[test]
fn invalid_range_is_a_setup_failure() {
    let mut cfg = config();
    cfg.pitch_range = Range::new(2.0, 1.0);
    let (_rig, mut c) = build(cfg);
    assert_eq!(
        c.start(),
        Err(EffectError::InvalidRange {
            what: "pitch",
            min: 2.0,
            max: 1.0
        })
    );
}

#[test]
fn sink_count_mismatch_is_a_setup_failure() {
    let skeleton = Rc::new(MapSkeleton::humanoid());
    let params = Rc::new(RefCell::new(MemoryParameterStore::new()));
    let log = Rc::new(RefCell::new(PolylineLog::default()));
    let sinks: Vec<Box<dyn PolylineSink>> = vec![Box::new(RecordingPolyline(log))];
    let mut c = JointEffectController::new(config(), skeleton, params, sinks, None);
    assert_eq!(c.start(), Err(EffectError::SinkUnavailable("polyline")));
    assert_eq!(c.lifecycle(), Lifecycle::Disabled);
}

#[test]
fn disable_stops_processing() {
    let (rig, mut c) = started(config());
    c.tick(0.0);
    c.disable();
    c.tick(DT);
    assert_eq!(rig.trails[0].borrow().uploads, 1);
}

#[test]
fn existing_output_param_is_left_to_its_owner() {
    let params = Rc::new(RefCell::new(MemoryParameterStore::new()));
    {
        let mut store = params.borrow_mut();
        let h = store.add("JointFx/Width", ParamKind::Float);
        store.write_float(h, 9.0);
    }
    let (rig, mut c) = build_with(config(), params, true);
    c.start().expect("start");
    c.tick(0.5);
    assert_eq!(read_float(&rig, "JointFx/Width"), Some(9.0));
    assert_eq!(
        read_float(&rig, "JointFx/Duration"),
        Some(c.state().current_duration)
    );
}

#[test]
fn two_controllers_share_a_store_without_clobbering() {
    let params = Rc::new(RefCell::new(MemoryParameterStore::new()));
    let mut first_cfg = config();
    first_cfg.width_range = Range::new(0.01, 0.01);
    let mut second_cfg = config();
    second_cfg.width_range = Range::new(0.2, 0.2);
    let (rig, mut first) = build_with(first_cfg, params.clone(), true);
    let (_rig2, mut second) = build_with(second_cfg, params, true);
    first.start().expect("first");
    second.start().expect("second");
    for i in 0..3 {
        first.tick(i as f64 * DT);
        second.tick(i as f64 * DT);
    }
    assert!((read_float(&rig, "JointFx/Width").unwrap() - 0.01).abs() < 1e-6);
    assert!((second.state().current_width - 0.2).abs() < 1e-6);
}

#[test]
fn busy_store_does_not_abort_the_frame() {
    let (rig, mut c) = started(config());
    let guard = rig.params.borrow();
    c.tick(0.0);
    drop(guard);
    assert_eq!(rig.trails[0].borrow().uploads, 1);
    assert_eq!(rig.audio.borrow().spectrum_reads, 1);
}

#[test]
fn style_applies_width_length_texture_and_base_hue() {
    let (rig, mut c) = started(config());
    c.apply_style(&TrailStyle {
        color: Some([0.0, 0.0, 1.0]),
        width: Some(0.2),
        length_sec: Some(2.0),
        texture: Some("streak".to_string()),
    });
    assert_eq!(c.config().width_range, Range::new(0.1, 0.2));
    assert_eq!(c.config().duration_range, Range::new(1.0, 2.0));
    assert!((c.state().hue_offset - 2.0 / 3.0).abs() < 1e-5);
    for t in &rig.trails {
        assert_eq!(t.borrow().texture.as_deref(), Some("streak"));
    }
}

#[test]
fn drop_stops_playing_sound() {
    let (rig, c) = started(config());
    assert!(rig.audio.borrow().playing);
    drop(c);
    assert!(!rig.audio.borrow().playing);
    assert_eq!(rig.audio.borrow().calls.last(), Some(&AudioCall::Stop));
}
