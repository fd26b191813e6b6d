use crate::dsp::delay::StereoDelayLine;

use super::{EffectParam, StereoEffect, StereoSample};

/*
Feedback Delay (Echo)
=====================

    delayed          = line[index]
    line[index]      = input + delayed * feedback
    output           = (1 - mix) * input + mix * delayed

A single impulse comes back after `len` samples at amplitude `mix`, then
again every `len` samples, each repeat scaled by another `feedback`:

    t = 0        1 - mix            (dry)
    t = len      mix
    t = 2·len    mix · feedback
    t = 3·len    mix · feedback²

Feedback is capped at 0.95 so the repeats always die away. The line length
is round(delay_time · sample_rate), at least one sample. Changing either
the delay time or the sample rate reallocates and clears the line; echoes in
flight are lost.
*/

pub const DEFAULT_TIME_SECONDS: f32 = 0.3;
pub const DEFAULT_FEEDBACK: f32 = 0.5;
pub const DEFAULT_MIX: f32 = 0.5;

pub const MIN_TIME_SECONDS: f32 = 0.001;
pub const MAX_TIME_SECONDS: f32 = 5.0;
pub const MAX_FEEDBACK: f32 = 0.95;

#[derive(Debug, Clone)]
pub struct DelayEffect {
    line: StereoDelayLine,
    delay_time: f32,
    feedback: f32,
    mix: f32,
    sample_rate: f32,
}

impl DelayEffect {
    pub fn new(delay_time: f32, feedback: f32, mix: f32, sample_rate: f32) -> Self {
        let sample_rate = if sample_rate > 0.0 {
            sample_rate
        } else {
            crate::DEFAULT_SAMPLE_RATE
        };
        let delay_time = if (MIN_TIME_SECONDS..=MAX_TIME_SECONDS).contains(&delay_time) {
            delay_time
        } else {
            DEFAULT_TIME_SECONDS
        };

        let mut effect = Self {
            line: StereoDelayLine::new(delay_samples(delay_time, sample_rate)),
            delay_time,
            feedback: DEFAULT_FEEDBACK,
            mix: DEFAULT_MIX,
            sample_rate,
        };
        effect.set_feedback(feedback);
        effect.set_mix(mix);
        effect
    }

    /// Accepts 0.001..=5.0 seconds; anything else is ignored.
    ///
    /// Always clears the line; reallocates only when the length changes.
    pub fn set_delay_time(&mut self, seconds: f32) -> bool {
        if !(MIN_TIME_SECONDS..=MAX_TIME_SECONDS).contains(&seconds) {
            return false;
        }
        self.delay_time = seconds;
        self.update_length();
        true
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        if sample_rate > 0.0 && sample_rate != self.sample_rate {
            self.sample_rate = sample_rate;
            self.update_length();
        }
    }

    pub fn set_feedback(&mut self, feedback: f32) {
        if !feedback.is_nan() {
            self.feedback = feedback.clamp(0.0, MAX_FEEDBACK);
        }
    }

    pub fn set_mix(&mut self, mix: f32) {
        if !mix.is_nan() {
            self.mix = mix.clamp(0.0, 1.0);
        }
    }

    fn update_length(&mut self) {
        let len = delay_samples(self.delay_time, self.sample_rate);
        if len != self.line.len() {
            self.line.resize(len);
        } else {
            self.line.reset();
        }
    }

    pub fn delay_time(&self) -> f32 {
        self.delay_time
    }

    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    pub fn mix(&self) -> f32 {
        self.mix
    }

    /// Current line length in samples.
    pub fn delay_samples(&self) -> usize {
        self.line.len()
    }
}

/// round(seconds · sample_rate), at least 1.
pub fn delay_samples(seconds: f32, sample_rate: f32) -> usize {
    let samples = (seconds * sample_rate).round();
    if samples.is_finite() && samples >= 1.0 {
        samples as usize
    } else {
        1
    }
}

impl StereoEffect for DelayEffect {
    #[inline]
    fn process(&mut self, input: StereoSample) -> StereoSample {
        let (delayed_l, delayed_r) = self.line.read();

        self.line.write(
            input.left + delayed_l * self.feedback,
            input.right + delayed_r * self.feedback,
        );

        let dry = 1.0 - self.mix;
        StereoSample {
            left: dry * input.left + self.mix * delayed_l,
            right: dry * input.right + self.mix * delayed_r,
        }
    }

    fn reset(&mut self) {
        self.line.reset();
    }

    fn set_note_context(&mut self, _frequency: f32, sample_rate: f32) {
        self.set_sample_rate(sample_rate);
    }

    fn apply_param(&mut self, param: EffectParam) -> bool {
        match param {
            EffectParam::DelayTime(seconds) => self.set_delay_time(seconds),
            EffectParam::Feedback(feedback) => {
                self.set_feedback(feedback);
                true
            }
            EffectParam::Mix(mix) => {
                self.set_mix(mix);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impulse_echoes_after_delay_samples() {
        let sample_rate = 1_000.0;
        let mut delay = DelayEffect::new(0.01, 0.5, 0.5, sample_rate);
        let n = delay.delay_samples();
        assert_eq!(n, 10);

        let mut out = Vec::with_capacity(3 * n + 1);
        out.push(delay.process(StereoSample::mono(1.0)));
        for _ in 1..=(2 * n) {
            out.push(delay.process(StereoSample::SILENCE));
        }

        assert_eq!(out[0], StereoSample::mono(0.5));
        assert!(out[1..n].iter().all(|s| *s == StereoSample::SILENCE));
        assert_eq!(out[n], StereoSample::mono(0.5));
        assert!(out[n + 1..2 * n].iter().all(|s| *s == StereoSample::SILENCE));
        // second repeat carries one more feedback factor
        assert_eq!(out[2 * n], StereoSample::mono(0.5 * 0.5));
    }

    #[test]
    fn length_is_rounded_with_minimum_one() {
        assert_eq!(delay_samples(0.3, 48_000.0), 14_400);
        assert_eq!(delay_samples(0.0015, 1_000.0), 2);
        assert_eq!(delay_samples(0.0001, 1_000.0), 1);
        assert_eq!(delay_samples(f32::NAN, 1_000.0), 1);
    }

    #[test]
    fn feedback_and_mix_are_clamped() {
        let mut delay = DelayEffect::new(0.1, 2.0, 1.5, 48_000.0);
        assert_eq!(delay.feedback(), MAX_FEEDBACK);
        assert_eq!(delay.mix(), 1.0);

        delay.set_feedback(-1.0);
        delay.set_mix(-1.0);
        assert_eq!(delay.feedback(), 0.0);
        assert_eq!(delay.mix(), 0.0);
    }

    #[test]
    fn out_of_range_delay_time_is_ignored() {
        let mut delay = DelayEffect::new(0.3, 0.5, 0.5, 48_000.0);
        assert!(!delay.set_delay_time(0.0));
        assert!(!delay.set_delay_time(6.0));
        assert_eq!(delay.delay_time(), 0.3);
        assert_eq!(delay.delay_samples(), 14_400);

        assert!(delay.set_delay_time(0.5));
        assert_eq!(delay.delay_samples(), 24_000);
    }

    #[test]
    fn resize_drops_in_flight_echo() {
        let sample_rate = 1_000.0;
        let mut delay = DelayEffect::new(0.005, 0.5, 1.0, sample_rate);
        delay.process(StereoSample::mono(1.0));
        delay.set_sample_rate(2_000.0);
        assert_eq!(delay.delay_samples(), 10);

        for _ in 0..30 {
            assert_eq!(delay.process(StereoSample::SILENCE), StereoSample::SILENCE);
        }
    }

    #[test]
    fn delay_time_change_with_same_length_clears_echo() {
        let mut delay = DelayEffect::new(0.0101, 0.5, 1.0, 1_000.0);
        delay.process(StereoSample::mono(1.0));

        assert!(delay.set_delay_time(0.0099));
        assert_eq!(delay.delay_samples(), 10);
        for _ in 0..20 {
            assert_eq!(delay.process(StereoSample::SILENCE), StereoSample::SILENCE);
        }
    }

    #[test]
    fn rejected_delay_time_is_not_applied() {
        let mut delay = DelayEffect::new(0.3, 0.5, 0.5, 48_000.0);
        assert!(!delay.apply_param(EffectParam::DelayTime(99.0)));
        assert_eq!(delay.delay_time(), 0.3);
        assert!(delay.apply_param(EffectParam::DelayTime(0.2)));
        assert!(delay.apply_param(EffectParam::Feedback(0.1)));
        assert!(!delay.apply_param(EffectParam::Cutoff(500.0)));
    }

    #[test]
    fn same_sample_rate_keeps_buffer() {
        let mut delay = DelayEffect::new(0.003, 0.0, 1.0, 1_000.0);
        delay.process(StereoSample::mono(1.0));
        delay.set_note_context(440.0, 1_000.0);
        delay.process(StereoSample::SILENCE);
        delay.process(StereoSample::SILENCE);
        assert_eq!(delay.process(StereoSample::SILENCE), StereoSample::mono(1.0));
    }

    #[test]
    fn repeats_decay_with_max_feedback() {
        let mut delay = DelayEffect::new(0.001, 10.0, 1.0, 1_000.0);
        delay.process(StereoSample::mono(1.0));
        let mut last = 1.0;
        for _ in 0..500 {
            let out = delay.process(StereoSample::SILENCE).left.abs();
            assert!(out <= last);
            last = out;
        }
        assert!(last < 1e-9);
    }
}
