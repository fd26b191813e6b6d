use std::f32::consts::TAU;

/*
One-Pole Low-Pass
=================

The simplest useful IIR filter: an exponential moving average.

    state += alpha * (input - state)

Each sample the output moves a fixed fraction `alpha` of the way toward the
input. Large alpha tracks the input closely (bright), small alpha lags
behind it (dark). The coefficient comes from the RC-circuit analogue:

    dt    = 1 / sample_rate
    rc    = 1 / (2π · cutoff)
    alpha = dt / (rc + dt)

Roll-off is a gentle 6 dB/octave above the cutoff. A step input reaches
1 - (1 - alpha)^n after n samples, so ~5/alpha samples is enough to settle
within 1%.

| cutoff @ 48 kHz | alpha  |
| --------------- | ------ |
| 100 Hz          | 0.0129 |
| 1 kHz           | 0.1157 |
| 10 kHz          | 0.5669 |
*/

/// Coefficient for a one-pole low-pass, clamped to [0, 1].
///
/// Returns `None` when either input is non-positive.
#[inline]
pub fn one_pole_alpha(cutoff_hz: f32, sample_rate: f32) -> Option<f32> {
    if !(cutoff_hz > 0.0 && sample_rate > 0.0) {
        return None;
    }
    let dt = 1.0 / sample_rate;
    let rc = 1.0 / (TAU * cutoff_hz);
    Some((dt / (rc + dt)).clamp(0.0, 1.0))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OnePole {
    state: f32,
}

impl OnePole {
    pub fn new() -> Self {
        Self { state: 0.0 }
    }

    #[inline]
    pub fn next_sample(&mut self, input: f32, alpha: f32) -> f32 {
        self.state += alpha * (input - self.state);
        self.state
    }

    pub fn render(&mut self, buffer: &mut [f32], alpha: f32) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(*sample, alpha);
        }
    }

    pub fn state(&self) -> f32 {
        self.state
    }

    pub fn reset(&mut self) {
        self.state = 0.0;
    }
}
