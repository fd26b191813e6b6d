use crate::MIN_TIME;

/*
ADSR Envelope
=============

A linear Attack/Decay/Sustain/Release generator. It turns the note gate (a
plain on/off flag) into an amplitude multiplier in [0, 1] that the engine
applies to the oscillator before the effect chain.

Vocabulary
----------

  gate      The note-on flag, sampled once per call to `process`. The
            envelope is level-triggered: it looks at the flag every sample
            and changes stage when the flag disagrees with the stage.

  elapsed   Samples spent in the current stage. Every stage transition resets
            it to zero, and each stage computes its level from it directly:

                level = elapsed / stage_samples        (attack)

            Computing from a counter instead of accumulating an increment
            means the ramp lands on its target exactly, no drift.

  stage_samples
            stage_time_seconds * sample_rate. The sample rate is passed per
            call so a rate change takes effect on the next sample.


The Shape
---------

  Level
    1.0 ┐    ╱╲
        │   ╱  ╲_________
    S   │  ╱             ╲
        │ ╱               ╲
    0.0 └╱─────────────────╲──→ Time
        Attack Decay Sustain Release

State machine:

    Idle ──gate on──→ Attack ──done──→ Decay ──done──→ Sustain
      ↑                  │               │               │
      │                  └──gate off─────┴───────────────┘
      │                                  ↓
      └─────────────done─────────── Release

Release ramps from whatever level the envelope had when the gate dropped,
so a note released halfway through its attack fades from there instead of
jumping to the sustain level first.

All stage times are clamped to at least 1 ms, and the sustain level to
[0, 1].
*/

/// The current stage of the envelope state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeState {
    Idle,
    Attack,
    Decay,
    Sustain,
    Release,
}

#[derive(Debug, Clone)]
pub struct Envelope {
    attack_time: f32,
    decay_time: f32,
    sustain_level: f32,
    release_time: f32,

    stage: EnvelopeState,
    level: f32,
    elapsed: u32,

    // level at the moment the gate dropped
    release_start_level: f32,
}

impl Default for Envelope {
    fn default() -> Self {
        Self::new()
    }
}

impl Envelope {
    pub fn new() -> Self {
        Self::adsr(0.01, 0.1, 0.7, 0.3)
    }

    pub fn adsr(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            attack_time: clamp_time(attack),
            decay_time: clamp_time(decay),
            sustain_level: clamp_level(sustain),
            release_time: clamp_time(release),

            stage: EnvelopeState::Idle,
            level: 0.0,
            elapsed: 0,
            release_start_level: 0.0,
        }
    }

    /// Advance by one sample and return the new level.
    ///
    /// A non-positive sample rate leaves the envelope frozen at its current level.
    pub fn process(&mut self, note_on: bool, sample_rate: f32) -> f32 {
        if !(sample_rate > 0.0) {
            return self.level;
        }

        match (note_on, self.stage) {
            (true, EnvelopeState::Idle) => self.enter(EnvelopeState::Attack),
            (false, EnvelopeState::Attack | EnvelopeState::Decay | EnvelopeState::Sustain) => {
                self.release_start_level = self.level;
                self.enter(EnvelopeState::Release);
            }
            _ => {}
        }

        match self.stage {
            EnvelopeState::Idle => {
                self.level = 0.0;
            }

            EnvelopeState::Attack => {
                let total = self.attack_time * sample_rate;
                if (self.elapsed as f32) < total {
                    self.level = self.elapsed as f32 / total;
                    self.elapsed += 1;
                } else {
                    self.level = 1.0;
                    self.enter(EnvelopeState::Decay);
                }
            }

            EnvelopeState::Decay => {
                let total = self.decay_time * sample_rate;
                if (self.elapsed as f32) < total {
                    let progress = self.elapsed as f32 / total;
                    self.level = 1.0 - progress * (1.0 - self.sustain_level);
                    self.elapsed += 1;
                } else {
                    self.level = self.sustain_level;
                    self.enter(EnvelopeState::Sustain);
                }
            }

            EnvelopeState::Sustain => {
                self.level = self.sustain_level;
            }

            EnvelopeState::Release => {
                let total = self.release_time * sample_rate;
                if (self.elapsed as f32) < total {
                    let progress = self.elapsed as f32 / total;
                    self.level = self.release_start_level * (1.0 - progress);
                    self.elapsed += 1;
                } else {
                    self.level = 0.0;
                    self.enter(EnvelopeState::Idle);
                }
            }
        }

        debug_assert!((0.0..=1.0).contains(&self.level));
        self.level
    }

    /// Render a block of levels for a constant gate.
    pub fn render(&mut self, buffer: &mut [f32], note_on: bool, sample_rate: f32) {
        for sample in buffer.iter_mut() {
            *sample = self.process(note_on, sample_rate);
        }
    }

    fn enter(&mut self, stage: EnvelopeState) {
        self.stage = stage;
        self.elapsed = 0;
    }

    /// Force Idle at level 0, whatever the stage. Used for hard retriggers.
    pub fn reset(&mut self) {
        self.stage = EnvelopeState::Idle;
        self.level = 0.0;
        self.elapsed = 0;
        self.release_start_level = 0.0;
    }

    /// Returns true while the envelope is producing output (not idle).
    pub fn is_active(&self) -> bool {
        self.stage != EnvelopeState::Idle
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn state(&self) -> EnvelopeState {
        self.stage
    }

    pub fn set_attack(&mut self, seconds: f32) {
        self.attack_time = clamp_time(seconds);
    }

    pub fn set_decay(&mut self, seconds: f32) {
        self.decay_time = clamp_time(seconds);
    }

    pub fn set_sustain(&mut self, level: f32) {
        self.sustain_level = clamp_level(level);
    }

    pub fn set_release(&mut self, seconds: f32) {
        self.release_time = clamp_time(seconds);
    }

    pub fn attack(&self) -> f32 {
        self.attack_time
    }

    pub fn decay(&self) -> f32 {
        self.decay_time
    }

    pub fn sustain(&self) -> f32 {
        self.sustain_level
    }

    pub fn release(&self) -> f32 {
        self.release_time
    }
}

fn clamp_time(seconds: f32) -> f32 {
    if seconds.is_nan() {
        MIN_TIME
    } else {
        seconds.max(MIN_TIME)
    }
}

fn clamp_level(level: f32) -> f32 {
    if level.is_nan() {
        0.0
    } else {
        level.clamp(0.0, 1.0)
    }
}
