use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Phase-Accumulator Oscillators
=============================

Every waveform here is a pure function of a phase value in [0, 1). The phase
lives with the caller (the synth engine), not inside the oscillator, so the
same oscillator value can be swapped out mid-note without a discontinuity in
phase: the new waveform simply picks up wherever the old one left off.

Per sample:

    sample  = law(phase)
    phase  += frequency / sample_rate
    phase   = phase mod 1.0

Wrapping uses a true modulo rather than a single `phase -= 1.0`, so a huge
increment (a jump to a very high frequency at a very low sample rate) still
lands back inside [0, 1) in one step.

Waveform laws:
--------------

  Sine:      sin(2π · phase)
  Square:    +1 for phase < 0.5, -1 otherwise (50% duty)
  Sawtooth:  2 · phase - 1                       (rising ramp)
  Triangle:  4 · phase - 1      for phase < 0.5
             -4 · phase + 3     otherwise        (symmetric up/down)

     Sine         Square        Sawtooth      Triangle
   1 ┤ ╭╮        ┌──┐           ╱│   ╱│        ╱╲
     │╭╯╰╮       │  │          ╱ │  ╱ │       ╱  ╲
   0 ┼╯──╰╮──    ┼──┼──┐      ╱──┼─╱──┼─     ╱────╲───
     │    ╰╮╭    │  │  │     ╱   │╱   │           ╲  ╱
  -1 ┤     ╰╯       └──┘                          ╲╱

None of these are band-limited. Sawtooth and square alias audibly at high
pitches; that is accepted for this engine.
*/

/// Which waveform law an oscillator follows.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OscillatorKind {
    Sine,
    #[default]
    Square,
    Sawtooth,
    Triangle,
}

impl OscillatorKind {
    pub const ALL: [OscillatorKind; 4] = [
        OscillatorKind::Sine,
        OscillatorKind::Square,
        OscillatorKind::Sawtooth,
        OscillatorKind::Triangle,
    ];

    /// Case-insensitive lookup. Accepts `saw` and `tri` as shorthands.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("sine") {
            Some(Self::Sine)
        } else if name.eq_ignore_ascii_case("square") {
            Some(Self::Square)
        } else if name.eq_ignore_ascii_case("sawtooth") || name.eq_ignore_ascii_case("saw") {
            Some(Self::Sawtooth)
        } else if name.eq_ignore_ascii_case("triangle") || name.eq_ignore_ascii_case("tri") {
            Some(Self::Triangle)
        } else {
            None
        }
    }

    /// Like [`from_name`](Self::from_name) but falls back to square for
    /// empty or unknown names.
    pub fn from_name_or_default(name: &str) -> Self {
        Self::from_name(name).unwrap_or_default()
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Sine => "sine",
            Self::Square => "square",
            Self::Sawtooth => "sawtooth",
            Self::Triangle => "triangle",
        }
    }

    /// Waveform value at `phase` without advancing anything.
    #[inline]
    pub fn sample_at(self, phase: f32) -> f32 {
        match self {
            Self::Sine => (TAU * phase).sin(),
            Self::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Self::Sawtooth => 2.0 * phase - 1.0,
            Self::Triangle => {
                if phase < 0.5 {
                    4.0 * phase - 1.0
                } else {
                    -4.0 * phase + 3.0
                }
            }
        }
    }

    /// Produce one sample and advance `phase` by `frequency / sample_rate`.
    ///
    /// Non-positive (or NaN) frequency or sample rate returns silence and
    /// leaves `phase` untouched.
    #[inline]
    pub fn generate(self, frequency: f32, sample_rate: f32, phase: &mut f32) -> f32 {
        if !(frequency > 0.0 && sample_rate > 0.0) {
            return 0.0;
        }

        let sample = self.sample_at(*phase);
        *phase = wrap_phase(*phase + frequency / sample_rate);
        sample
    }

    /// Oscillators carry no state of their own; the phase belongs to the caller.
    pub fn reset(&mut self) {}
}

/// Fold any finite phase back into [0, 1).
#[inline]
pub fn wrap_phase(phase: f32) -> f32 {
    let wrapped = phase.rem_euclid(1.0);
    // rem_euclid can round up to exactly 1.0 for tiny negative inputs
    if wrapped >= 1.0 || !wrapped.is_finite() {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 48_000.0;

    #[test]
    fn output_stays_in_unit_range() {
        for kind in OscillatorKind::ALL {
            for &freq in &[1.0, 55.0, 440.0, 3_000.0, 19_999.0] {
                let mut phase = 0.0;
                for _ in 0..4_800 {
                    let s = kind.generate(freq, SAMPLE_RATE, &mut phase);
                    assert!((-1.0..=1.0).contains(&s), "{kind:?} at {freq} Hz produced {s}");
                    assert!((0.0..1.0).contains(&phase), "phase escaped: {phase}");
                }
            }
        }
    }

    #[test]
    fn one_period_returns_phase_to_start() {
        // 48000 / 480 = 100 samples per cycle, exactly
        let freq = 480.0;
        let period = (SAMPLE_RATE / freq) as usize;

        for kind in OscillatorKind::ALL {
            let mut phase = 0.0;
            for _ in 0..period {
                kind.generate(freq, SAMPLE_RATE, &mut phase);
            }
            let distance = phase.min(1.0 - phase);
            assert!(distance < 1e-4, "{kind:?}: phase drifted to {phase}");
        }
    }

    #[test]
    fn sine_hits_zero_and_peak() {
        let mut phase = 0.0;
        let at_zero = OscillatorKind::Sine.generate(440.0, SAMPLE_RATE, &mut phase);
        assert!(at_zero.abs() < 1e-6);

        let mut phase = 0.25;
        let at_quarter = OscillatorKind::Sine.generate(440.0, SAMPLE_RATE, &mut phase);
        assert!((at_quarter - 1.0).abs() < 1e-5, "got {at_quarter}");
    }

    #[test]
    fn square_is_exactly_plus_or_minus_one() {
        for &p in &[0.0, 0.1, 0.25, 0.4999] {
            let mut phase = p;
            assert_eq!(OscillatorKind::Square.generate(1.0, SAMPLE_RATE, &mut phase), 1.0);
        }
        for &p in &[0.5, 0.75, 0.9999] {
            let mut phase = p;
            assert_eq!(OscillatorKind::Square.generate(1.0, SAMPLE_RATE, &mut phase), -1.0);
        }
    }

    #[test]
    fn sawtooth_and_triangle_shapes() {
        assert_eq!(OscillatorKind::Sawtooth.sample_at(0.0), -1.0);
        assert_eq!(OscillatorKind::Sawtooth.sample_at(0.5), 0.0);
        assert_eq!(OscillatorKind::Triangle.sample_at(0.0), -1.0);
        assert_eq!(OscillatorKind::Triangle.sample_at(0.25), 0.0);
        assert_eq!(OscillatorKind::Triangle.sample_at(0.5), 1.0);
        assert_eq!(OscillatorKind::Triangle.sample_at(0.75), 0.0);
    }

    #[test]
    fn invalid_inputs_are_silent_and_keep_phase() {
        for kind in OscillatorKind::ALL {
            let mut phase = 0.3;
            assert_eq!(kind.generate(0.0, SAMPLE_RATE, &mut phase), 0.0);
            assert_eq!(kind.generate(-10.0, SAMPLE_RATE, &mut phase), 0.0);
            assert_eq!(kind.generate(440.0, 0.0, &mut phase), 0.0);
            assert_eq!(kind.generate(f32::NAN, SAMPLE_RATE, &mut phase), 0.0);
            assert_eq!(phase, 0.3);
        }
    }

    #[test]
    fn huge_increment_still_wraps() {
        let mut phase = 0.0;
        OscillatorKind::Sine.generate(1_000_000.0, 3.0, &mut phase);
        assert!((0.0..1.0).contains(&phase), "phase {phase}");
    }

    #[test]
    fn names_are_case_insensitive() {
        assert_eq!(OscillatorKind::from_name("SINE"), Some(OscillatorKind::Sine));
        assert_eq!(OscillatorKind::from_name("Saw"), Some(OscillatorKind::Sawtooth));
        assert_eq!(OscillatorKind::from_name("tri"), Some(OscillatorKind::Triangle));
        assert_eq!(OscillatorKind::from_name("bogus"), None);
        assert_eq!(OscillatorKind::from_name_or_default("bogus"), OscillatorKind::Square);
        assert_eq!(OscillatorKind::from_name_or_default(""), OscillatorKind::Square);
    }
}
