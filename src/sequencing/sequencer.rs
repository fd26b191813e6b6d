/*
Test Sequencer
==============

Plays a fixed list of notes so the synth can be heard without a MIDI
controller. Time is counted in sample frames, not wall-clock time, so the
sequencer can run inside the audio callback next to the engine:

  for each block:
      sequencer.advance(frames, |offset, msg| ...)   // note events
      engine renders the block

One note occupies three phases:

  ├──── duration ────┤── pause_after ──┤
  NoteOn             NoteOff            next NoteOn

When looping, a fixed one second gap separates the last note's pause from
the first note of the next repetition.

Events are reported with their frame offset inside the current block, so a
caller that splits rendering at those offsets gets sample-accurate timing.
*/

use crate::synth::message::SynthMessage;

use super::notes::*;

/// Silence between repetitions when looping.
pub const LOOP_GAP_SECONDS: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequenceNote {
    /// Hz.
    pub frequency: f32,
    /// Seconds the note is held.
    pub duration: f32,
    /// 0.0 to 1.0. The mono engine plays every note at full level.
    pub velocity: f32,
    /// Seconds of silence after the note is released.
    pub pause_after: f32,
}

impl SequenceNote {
    pub const fn new(frequency: f32, duration: f32, velocity: f32, pause_after: f32) -> Self {
        Self {
            frequency,
            duration,
            velocity,
            pause_after,
        }
    }
}

const fn n(frequency: f32, duration: f32, velocity: f32, pause_after: f32) -> SequenceNote {
    SequenceNote::new(frequency, duration, velocity, pause_after)
}

const SCALE: &[SequenceNote] = &[
    n(C4, 0.5, 0.8, 0.1),
    n(D4, 0.5, 0.8, 0.1),
    n(E4, 0.5, 0.8, 0.1),
    n(F4, 0.5, 0.8, 0.1),
    n(G4, 0.5, 0.8, 0.1),
    n(A4, 0.5, 0.8, 0.1),
    n(B4, 0.5, 0.8, 0.1),
    n(C5, 1.0, 0.9, 0.5),
];

const CHORDS: &[SequenceNote] = &[
    // C major
    n(C4, 0.3, 0.8, 0.05),
    n(E4, 0.3, 0.8, 0.05),
    n(G4, 0.3, 0.8, 0.05),
    n(C5, 0.5, 0.9, 0.2),
    // F major
    n(F4, 0.3, 0.8, 0.05),
    n(A4, 0.3, 0.8, 0.05),
    n(C5, 0.3, 0.8, 0.05),
    n(F5, 0.5, 0.9, 0.2),
    // G major
    n(G4, 0.3, 0.8, 0.05),
    n(B4, 0.3, 0.8, 0.05),
    n(D5, 0.3, 0.8, 0.05),
    n(G5, 0.5, 0.9, 0.2),
    n(C5, 1.0, 1.0, 0.5),
];

// Twinkle twinkle little star
const MELODY: &[SequenceNote] = &[
    n(C4, 0.4, 0.8, 0.1),
    n(C4, 0.4, 0.8, 0.1),
    n(G4, 0.4, 0.8, 0.1),
    n(G4, 0.4, 0.8, 0.1),
    n(A4, 0.4, 0.8, 0.1),
    n(A4, 0.4, 0.8, 0.1),
    n(G4, 0.8, 0.9, 0.2),
    n(F4, 0.4, 0.8, 0.1),
    n(F4, 0.4, 0.8, 0.1),
    n(E4, 0.4, 0.8, 0.1),
    n(E4, 0.4, 0.8, 0.1),
    n(D4, 0.4, 0.8, 0.1),
    n(D4, 0.4, 0.8, 0.1),
    n(C4, 1.0, 0.9, 0.5),
];

const DEMO: &[SequenceNote] = &[
    // quick run up
    n(C4, 0.2, 0.6, 0.05),
    n(D4, 0.2, 0.7, 0.05),
    n(E4, 0.2, 0.8, 0.05),
    n(F4, 0.2, 0.8, 0.05),
    n(G4, 0.2, 0.9, 0.05),
    n(A4, 0.2, 0.9, 0.05),
    n(B4, 0.2, 1.0, 0.05),
    n(C5, 0.5, 1.0, 0.3),
    // arpeggio
    n(C4, 0.3, 0.9, 0.1),
    n(E4, 0.3, 0.7, 0.1),
    n(G4, 0.3, 0.8, 0.1),
    n(C5, 0.6, 1.0, 0.3),
    // back down, mixed rhythm
    n(B4, 0.25, 0.8, 0.1),
    n(A4, 0.25, 0.8, 0.1),
    n(G4, 0.5, 0.9, 0.1),
    n(F4, 0.25, 0.7, 0.1),
    n(E4, 0.25, 0.7, 0.1),
    n(D4, 0.5, 0.8, 0.1),
    n(C4, 1.0, 1.0, 0.5),
];

/// A named list of notes.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    pub name: String,
    pub notes: Vec<SequenceNote>,
}

impl Sequence {
    pub const PRESETS: [&'static str; 4] = ["scale", "chord", "melody", "demo"];

    pub fn new(name: impl Into<String>, notes: Vec<SequenceNote>) -> Self {
        Self {
            name: name.into(),
            notes,
        }
    }

    /// Built-in sequence by name, case-insensitive. Unknown names give the
    /// demo sequence.
    pub fn preset(name: &str) -> Self {
        let key = name.trim().to_ascii_lowercase();
        let (name, notes) = match key.as_str() {
            "scale" => ("scale", SCALE),
            "chord" => ("chord", CHORDS),
            "melody" => ("melody", MELODY),
            "demo" => ("demo", DEMO),
            _ => {
                tracing::debug!(sequence = name, "unknown sequence, playing demo");
                ("demo", DEMO)
            }
        };
        Self::new(name, notes.to_vec())
    }

    /// Length of one pass in seconds, pauses included.
    pub fn duration(&self) -> f32 {
        self.notes
            .iter()
            .map(|note| note.duration.max(0.0) + note.pause_after.max(0.0))
            .sum()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Start,
    Holding,
    Pausing,
    LoopGap,
    Done,
}

/// Steps a [`Sequence`] in sample frames and reports note events.
#[derive(Debug, Clone)]
pub struct Sequencer {
    sequence: Sequence,
    sample_rate: f32,
    looping: bool,

    step: Step,
    index: usize,
    remaining: u64,
}

impl Sequencer {
    pub fn new(sequence: Sequence, sample_rate: f32) -> Self {
        Self {
            sequence,
            sample_rate: if sample_rate > 0.0 {
                sample_rate
            } else {
                crate::DEFAULT_SAMPLE_RATE
            },
            looping: false,
            step: Step::Start,
            index: 0,
            remaining: 0,
        }
    }

    /// Repeat forever with [`LOOP_GAP_SECONDS`] between passes.
    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Rewind to the first note.
    pub fn restart(&mut self) {
        self.step = Step::Start;
        self.index = 0;
        self.remaining = 0;
    }

    /// Stop playing. Returns the note-off to send if a note was held.
    pub fn stop(&mut self) -> Option<SynthMessage> {
        let held = self.step == Step::Holding;
        self.step = Step::Done;
        self.remaining = 0;
        held.then_some(SynthMessage::NoteOff)
    }

    pub fn is_finished(&self) -> bool {
        self.step == Step::Done
    }

    /// The note currently held, if any.
    pub fn current_note(&self) -> Option<&SequenceNote> {
        match self.step {
            Step::Holding => self.sequence.notes.get(self.index),
            _ => None,
        }
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    /// Move forward `frames` frames, calling `emit(offset, message)` for every
    /// event in `[0, frames)`, in order.
    pub fn advance(&mut self, frames: u64, mut emit: impl FnMut(u64, SynthMessage)) {
        if frames == 0 {
            return;
        }
        let mut pos = 0;
        loop {
            if self.step == Step::Start {
                self.begin_note(0, pos, &mut emit);
            }
            if self.step == Step::Done {
                return;
            }

            let left = frames - pos;
            if self.remaining >= left {
                self.remaining -= left;
                return;
            }
            pos += self.remaining;
            self.remaining = 0;

            match self.step {
                Step::Holding => {
                    emit(pos, SynthMessage::NoteOff);
                    self.step = Step::Pausing;
                    self.remaining = self.frames(self.sequence.notes[self.index].pause_after);
                }
                Step::Pausing => {
                    let next = self.index + 1;
                    if next < self.sequence.notes.len() {
                        self.begin_note(next, pos, &mut emit);
                    } else if self.looping {
                        self.step = Step::LoopGap;
                        self.remaining = self.frames(LOOP_GAP_SECONDS).max(1);
                    } else {
                        self.step = Step::Done;
                    }
                }
                Step::LoopGap => self.begin_note(0, pos, &mut emit),
                Step::Start | Step::Done => {}
            }
        }
    }

    fn begin_note(&mut self, index: usize, pos: u64, emit: &mut impl FnMut(u64, SynthMessage)) {
        let Some(note) = self.sequence.notes.get(index) else {
            self.step = Step::Done;
            return;
        };
        self.index = index;
        self.step = Step::Holding;
        self.remaining = self.frames(note.duration);
        emit(
            pos,
            SynthMessage::NoteOn {
                frequency: note.frequency,
            },
        );
    }

    fn frames(&self, seconds: f32) -> u64 {
        (seconds.max(0.0) * self.sample_rate).round() as u64
    }
}
