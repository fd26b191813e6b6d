//! The stereo effect chain.
//!
//! Effects form a closed family: [`Effect`] is a sum type over the three
//! processors, dispatched with a `match` on the per-sample path. Each variant
//! owns its private DSP state (filter memory, delay buffers, octave phase).
//! The chain itself is a plain `Vec<Effect>` applied in list order.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Dry/wet feedback echo.
pub mod delay;
/// One-pole low-pass filter effect.
pub mod lowpass;
/// Square-wave octave doubler.
pub mod octave;

pub use delay::DelayEffect;
pub use lowpass::LowPassEffect;
pub use octave::OctaveEffect;

/// One stereo frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StereoSample {
    pub left: f32,
    pub right: f32,
}

impl StereoSample {
    pub const SILENCE: StereoSample = StereoSample {
        left: 0.0,
        right: 0.0,
    };

    pub const fn new(left: f32, right: f32) -> Self {
        Self { left, right }
    }

    /// Same value on both channels.
    pub const fn mono(value: f32) -> Self {
        Self {
            left: value,
            right: value,
        }
    }
}

impl From<StereoSample> for (f32, f32) {
    fn from(sample: StereoSample) -> Self {
        (sample.left, sample.right)
    }
}

impl From<(f32, f32)> for StereoSample {
    fn from((left, right): (f32, f32)) -> Self {
        Self { left, right }
    }
}

/// Behaviour shared by every effect in the chain.
///
/// `process` runs once per output sample on the audio thread: no allocation,
/// no locks, no I/O.
pub trait StereoEffect: Send {
    fn process(&mut self, input: StereoSample) -> StereoSample;

    /// Clear internal state. Called whenever a new note triggers.
    fn reset(&mut self);

    /// Receive the pitch and sample rate of a newly triggered note.
    ///
    /// Default implementation does nothing (pitch-independent effects).
    fn set_note_context(&mut self, _frequency: f32, _sample_rate: f32) {
        // Default: do nothing
    }

    /// Apply a live parameter change. Returns false if the effect has no
    /// such parameter.
    fn apply_param(&mut self, _param: EffectParam) -> bool {
        false
    }
}

/// Tag naming an effect type.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    LowPass,
    Delay,
    Octave,
}

impl EffectKind {
    /// Case-insensitive lookup including synonyms:
    /// `delay`/`echo`, `lowpass`/`lpf`/`filter`, `octave`.
    pub fn from_name(name: &str) -> Option<Self> {
        const TABLE: &[(&str, EffectKind)] = &[
            ("delay", EffectKind::Delay),
            ("echo", EffectKind::Delay),
            ("lowpass", EffectKind::LowPass),
            ("lpf", EffectKind::LowPass),
            ("filter", EffectKind::LowPass),
            ("octave", EffectKind::Octave),
        ];

        let name = name.trim();
        TABLE
            .iter()
            .find(|(alias, _)| alias.eq_ignore_ascii_case(name))
            .map(|&(_, kind)| kind)
    }

    pub fn name(self) -> &'static str {
        match self {
            EffectKind::LowPass => "lowpass",
            EffectKind::Delay => "delay",
            EffectKind::Octave => "octave",
        }
    }
}

/// A live parameter change pushed from a control surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectParam {
    /// Low-pass cutoff in Hz. Must stay below Nyquist.
    Cutoff(f32),
    /// Delay time in seconds, 0.001..=5.0.
    DelayTime(f32),
    /// Delay feedback, clamped to 0.0..=0.95.
    Feedback(f32),
    /// Delay wet/dry mix, clamped to 0.0..=1.0.
    Mix(f32),
    /// Octave wet/dry blend, clamped to 0.0..=1.0.
    OctaveBlend(f32),
    /// Octave up (true) or down (false).
    OctaveHigher(bool),
}

impl EffectParam {
    /// The effect type that owns this parameter.
    pub fn target(&self) -> EffectKind {
        match self {
            EffectParam::Cutoff(_) => EffectKind::LowPass,
            EffectParam::DelayTime(_) | EffectParam::Feedback(_) | EffectParam::Mix(_) => {
                EffectKind::Delay
            }
            EffectParam::OctaveBlend(_) | EffectParam::OctaveHigher(_) => EffectKind::Octave,
        }
    }
}

/// One slot of the effect chain.
#[derive(Debug, Clone)]
pub enum Effect {
    LowPass(LowPassEffect),
    Delay(DelayEffect),
    Octave(OctaveEffect),
}

impl Effect {
    /// Build a fresh effect of `kind` with default parameters.
    pub fn new(kind: EffectKind, sample_rate: f32) -> Self {
        match kind {
            EffectKind::LowPass => Effect::LowPass(LowPassEffect::new(
                lowpass::DEFAULT_CUTOFF_HZ,
                sample_rate,
            )),
            EffectKind::Delay => Effect::Delay(DelayEffect::new(
                delay::DEFAULT_TIME_SECONDS,
                delay::DEFAULT_FEEDBACK,
                delay::DEFAULT_MIX,
                sample_rate,
            )),
            EffectKind::Octave => Effect::Octave(OctaveEffect::new(
                octave::DEFAULT_HIGHER,
                octave::DEFAULT_BLEND,
            )),
        }
    }

    pub fn kind(&self) -> EffectKind {
        match self {
            Effect::LowPass(_) => EffectKind::LowPass,
            Effect::Delay(_) => EffectKind::Delay,
            Effect::Octave(_) => EffectKind::Octave,
        }
    }
}

impl StereoEffect for Effect {
    #[inline]
    fn process(&mut self, input: StereoSample) -> StereoSample {
        match self {
            Effect::LowPass(fx) => fx.process(input),
            Effect::Delay(fx) => fx.process(input),
            Effect::Octave(fx) => fx.process(input),
        }
    }

    fn reset(&mut self) {
        match self {
            Effect::LowPass(fx) => fx.reset(),
            Effect::Delay(fx) => fx.reset(),
            Effect::Octave(fx) => fx.reset(),
        }
    }

    fn set_note_context(&mut self, frequency: f32, sample_rate: f32) {
        match self {
            Effect::LowPass(fx) => fx.set_note_context(frequency, sample_rate),
            Effect::Delay(fx) => fx.set_note_context(frequency, sample_rate),
            Effect::Octave(fx) => fx.set_note_context(frequency, sample_rate),
        }
    }

    fn apply_param(&mut self, param: EffectParam) -> bool {
        match self {
            Effect::LowPass(fx) => fx.apply_param(param),
            Effect::Delay(fx) => fx.apply_param(param),
            Effect::Octave(fx) => fx.apply_param(param),
        }
    }
}

/// Run `input` through every effect in order.
#[inline]
pub fn process_chain(chain: &mut [Effect], input: StereoSample) -> StereoSample {
    chain.iter_mut().fold(input, |sample, fx| fx.process(sample))
}
