//! Joint-following trails, audio-reactive hue and motion-driven sound for
//! animated skeletal figures.
//!
//! The host owns the frame loop, the skeleton and the render/audio backends;
//! it hands them to a [`JointEffectController`] and calls
//! [`FrameEffect::tick`] once per frame.

pub mod audio;
pub mod config;
pub mod error;
pub mod frame;
pub mod params;
pub mod render;
pub mod skeleton;

pub use audio::AudioSink;
pub use config::EffectConfig;
pub use error::EffectError;
pub use frame::{FrameEffect, JointEffectController, Lifecycle};
pub use params::{
    ControlParameter, MemoryParameterStore, ParamHandle, ParamKind, ParamValue, ParameterStore,
};
pub use render::PolylineSink;
pub use skeleton::JointSampler;

pub use jointfx_core;
