use crate::dsp::oscillator::{wrap_phase, OscillatorKind};

use super::{EffectParam, StereoEffect, StereoSample};

pub const DEFAULT_HIGHER: bool = true;
pub const DEFAULT_BLEND: f32 = 0.5;

/// Blends a square wave one octave above (or below) the playing note into
/// the signal.
///
/// The effect cannot hear the pitch of its input; the engine pushes the note
/// frequency and sample rate in through [`StereoEffect::set_note_context`]
/// on every trigger. Until that happens the input passes through unchanged.
#[derive(Debug, Clone)]
pub struct OctaveEffect {
    higher: bool,
    blend: f32,
    phase: f32,
    frequency: f32,
    sample_rate: f32,
}

impl OctaveEffect {
    pub fn new(higher: bool, blend: f32) -> Self {
        let mut effect = Self {
            higher,
            blend: DEFAULT_BLEND,
            phase: 0.0,
            frequency: 0.0,
            sample_rate: 0.0,
        };
        effect.set_blend(blend);
        effect
    }

    pub fn set_higher(&mut self, higher: bool) {
        self.higher = higher;
    }

    pub fn set_blend(&mut self, blend: f32) {
        if !blend.is_nan() {
            self.blend = blend.clamp(0.0, 1.0);
        }
    }

    pub fn set_frequency(&mut self, frequency: f32) {
        self.frequency = frequency;
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
    }

    pub fn higher(&self) -> bool {
        self.higher
    }

    pub fn blend(&self) -> f32 {
        self.blend
    }

    /// Frequency of the generated square wave.
    pub fn octave_frequency(&self) -> f32 {
        self.frequency * if self.higher { 2.0 } else { 0.5 }
    }
}

impl StereoEffect for OctaveEffect {
    #[inline]
    fn process(&mut self, input: StereoSample) -> StereoSample {
        if !(self.frequency > 0.0 && self.sample_rate > 0.0) {
            return input;
        }

        let octave = OscillatorKind::Square.sample_at(self.phase);
        self.phase = wrap_phase(self.phase + self.octave_frequency() / self.sample_rate);

        let dry = 1.0 - self.blend;
        StereoSample {
            left: dry * input.left + self.blend * octave,
            right: dry * input.right + self.blend * octave,
        }
    }

    fn reset(&mut self) {
        self.phase = 0.0;
    }

    fn set_note_context(&mut self, frequency: f32, sample_rate: f32) {
        self.set_frequency(frequency);
        self.set_sample_rate(sample_rate);
    }

    fn apply_param(&mut self, param: EffectParam) -> bool {
        match param {
            EffectParam::OctaveBlend(blend) => {
                self.set_blend(blend);
                true
            }
            EffectParam::OctaveHigher(higher) => {
                self.set_higher(higher);
                true
            }
            _ => false,
        }
    }
}
