pub mod color;
pub mod constants;
pub mod noise;
pub mod preset;
pub mod rolloff;
pub mod sound;
pub mod spectrum;
pub mod state;
pub mod trail;

pub use color::*;
pub use constants::*;
pub use noise::*;
pub use preset::*;
pub use rolloff::*;
pub use sound::*;
pub use spectrum::*;
pub use state::*;
pub use trail::*;
