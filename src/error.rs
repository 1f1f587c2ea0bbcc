use thiserror::Error;

/// Failures of a controller sub-step or of controller setup.
#[derive(Debug, Error, PartialEq)]
pub enum EffectError {
    #[error("joint '{0}' did not resolve")]
    JointNotFound(String),
    #[error("{0} sink unavailable")]
    SinkUnavailable(&'static str),
    #[error("no trails configured")]
    NoTrails,
    #[error("trail slot {0} does not exist")]
    NoSuchTrail(usize),
    #[error("invalid {what} range [{min}, {max}]")]
    InvalidRange { what: &'static str, min: f32, max: f32 },
    #[error("spectrum size must be at least 1")]
    InvalidSpectrumSize,
    #[error("controller is disabled")]
    Disabled,
}
