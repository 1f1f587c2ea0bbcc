// Recording host collaborators shared by the controller tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use fnv::FnvHashMap;
use glam::Vec3;
use jointfx::jointfx_core::{Gradient, RolloffCurve, WindowKind};
use jointfx::{AudioSink, JointSampler, PolylineSink};

pub const HAND_L: &str = "Rig/Hips/Chest/Hand.L";
pub const HAND_R: &str = "Rig/Hips/Chest/Hand.R";
pub const HIPS: &str = "Rig/Hips";
pub const CHEST: &str = "Rig/Hips/Chest";
pub const HEAD: &str = "Rig/Hips/Chest/Head";
pub const FOOT: &str = "Rig/Hips/Foot.L";

#[derive(Default)]
pub struct MapSkeleton {
    joints: RefCell<FnvHashMap<String, Vec3>>,
}

impl MapSkeleton {
    pub fn humanoid() -> Self {
        let s = Self::default();
        s.set(HIPS, Vec3::new(0.0, 1.0, 0.0));
        s.set(CHEST, Vec3::new(0.0, 1.5, 0.0));
        s.set(HEAD, Vec3::new(0.0, 1.8, 0.0));
        s.set(FOOT, Vec3::new(0.1, 0.0, 0.0));
        s.set(HAND_L, Vec3::new(-0.4, 1.0, 0.0));
        s.set(HAND_R, Vec3::new(0.4, 1.0, 0.0));
        s
    }

    pub fn set(&self, joint: &str, p: Vec3) {
        self.joints.borrow_mut().insert(joint.to_string(), p);
    }

    pub fn remove(&self, joint: &str) {
        self.joints.borrow_mut().remove(joint);
    }
}

impl JointSampler for MapSkeleton {
    fn position(&self, joint_path: &str) -> Option<Vec3> {
        self.joints.borrow().get(joint_path).copied()
    }
}

#[derive(Default, Debug)]
pub struct PolylineLog {
    pub positions: Vec<Vec3>,
    pub uploads: usize,
    pub width: Option<(f32, f32)>,
    pub gradients: Vec<Gradient>,
    pub texture: Option<String>,
}

pub struct RecordingPolyline(pub Rc<RefCell<PolylineLog>>);

impl PolylineSink for RecordingPolyline {
    fn set_position_count(&mut self, count: usize) {
        let mut log = self.0.borrow_mut();
        log.uploads += 1;
        log.positions.resize(count, Vec3::ZERO);
    }

    fn set_position(&mut self, index: usize, point: Vec3) {
        self.0.borrow_mut().positions[index] = point;
    }

    fn set_width(&mut self, start: f32, end: f32) {
        self.0.borrow_mut().width = Some((start, end));
    }

    fn set_color_gradient(&mut self, gradient: &Gradient) {
        self.0.borrow_mut().gradients.push(gradient.clone());
    }

    fn set_texture(&mut self, name: &str) {
        self.0.borrow_mut().texture = Some(name.to_string());
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum AudioCall {
    Play,
    Stop,
}

#[derive(Default, Debug)]
pub struct AudioLog {
    pub playing: bool,
    pub calls: Vec<AudioCall>,
    pub pitch: Option<f32>,
    pub volume: Option<f32>,
    pub rolloff: Option<RolloffCurve>,
    pub spectrum_reads: usize,
    pub window: Option<WindowKind>,
    /// Value written into every bin on the next reads.
    pub level: f32,
}

pub struct RecordingAudio(pub Rc<RefCell<AudioLog>>);

impl AudioSink for RecordingAudio {
    fn play(&mut self) {
        let mut log = self.0.borrow_mut();
        log.playing = true;
        log.calls.push(AudioCall::Play);
    }

    fn stop(&mut self) {
        let mut log = self.0.borrow_mut();
        log.playing = false;
        log.calls.push(AudioCall::Stop);
    }

    fn is_playing(&self) -> bool {
        self.0.borrow().playing
    }

    fn set_pitch(&mut self, pitch: f32) {
        self.0.borrow_mut().pitch = Some(pitch);
    }

    fn set_volume(&mut self, volume: f32) {
        self.0.borrow_mut().volume = Some(volume);
    }

    fn set_rolloff_curve(&mut self, curve: &RolloffCurve) {
        self.0.borrow_mut().rolloff = Some(curve.clone());
    }

    fn read_spectrum(&mut self, buffer: &mut [f32], window: WindowKind) {
        let mut log = self.0.borrow_mut();
        log.spectrum_reads += 1;
        log.window = Some(window);
        buffer.iter_mut().for_each(|b| *b = log.level);
    }
}
