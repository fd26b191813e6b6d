pub mod dsp;
pub mod effects; // Stereo effect chain
pub mod io;
pub mod sequencing; // Test sequences and note tables
pub mod synth; // Engine, configuration and control messages

#[cfg(feature = "serde")]
pub mod config;
pub mod error;

pub use effects::{Effect, EffectKind, EffectParam, StereoSample};
pub use synth::{config::SynthConfig, engine::SynthEngine, message::SynthMessage};

pub const DEFAULT_SAMPLE_RATE: f32 = 44_100.0;
/// Highest note frequency the engine will accept.
pub const MAX_NOTE_FREQUENCY: f32 = 20_000.0;
pub(crate) const MIN_TIME: f32 = 0.001;
