use crate::dsp::filter::{one_pole_alpha, OnePole};

use super::{EffectParam, StereoEffect, StereoSample};

pub const DEFAULT_CUTOFF_HZ: f32 = 1_000.0;

/// One-pole low-pass applied independently to each channel.
///
/// Cutoff changes are validated against the current Nyquist frequency;
/// out-of-range values are ignored and the previous cutoff stays in effect.
#[derive(Debug, Clone)]
pub struct LowPassEffect {
    left: OnePole,
    right: OnePole,
    cutoff_hz: f32,
    sample_rate: f32,
    alpha: f32,
}

impl LowPassEffect {
    pub fn new(cutoff_hz: f32, sample_rate: f32) -> Self {
        let mut effect = Self {
            left: OnePole::new(),
            right: OnePole::new(),
            cutoff_hz: DEFAULT_CUTOFF_HZ,
            sample_rate: if sample_rate > 0.0 {
                sample_rate
            } else {
                crate::DEFAULT_SAMPLE_RATE
            },
            alpha: 1.0,
        };
        effect.update_alpha();
        effect.set_cutoff(cutoff_hz);
        effect
    }

    /// Accepts `0 < cutoff < sample_rate / 2`; anything else is ignored.
    pub fn set_cutoff(&mut self, cutoff_hz: f32) -> bool {
        if cutoff_hz > 0.0 && cutoff_hz < self.sample_rate * 0.5 {
            self.cutoff_hz = cutoff_hz;
            self.update_alpha();
            true
        } else {
            false
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        if sample_rate > 0.0 && sample_rate != self.sample_rate {
            self.sample_rate = sample_rate;
            self.update_alpha();
        }
    }

    fn update_alpha(&mut self) {
        if let Some(alpha) = one_pole_alpha(self.cutoff_hz, self.sample_rate) {
            self.alpha = alpha;
        }
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff_hz
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }
}

impl StereoEffect for LowPassEffect {
    #[inline]
    fn process(&mut self, input: StereoSample) -> StereoSample {
        StereoSample {
            left: self.left.next_sample(input.left, self.alpha),
            right: self.right.next_sample(input.right, self.alpha),
        }
    }

    fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
    }

    fn set_note_context(&mut self, _frequency: f32, sample_rate: f32) {
        self.set_sample_rate(sample_rate);
    }

    fn apply_param(&mut self, param: EffectParam) -> bool {
        match param {
            EffectParam::Cutoff(hz) => self.set_cutoff(hz),
            _ => false,
        }
    }
}
