/*
Note Frequencies
================

Equal temperament relative to A4 = 440 Hz:

  f(n) = 440 * 2^(n / 12)        n = semitones above (or below) A4

The constants below cover the range the built-in sequences use, rounded to
two decimals the way note tables usually print them. For anything else, use
`note_frequency` with a semitone offset, or `io::midi_note_to_freq` with a
MIDI note number (A4 = 69).

  C4  D4  E4  F4  G4  A4  B4  C5  D5  E5  F5  G5
  -9  -7  -5  -4  -2   0   2   3   5   7   8  10
*/

pub const A4_FREQUENCY: f32 = 440.0;

pub const C4: f32 = 261.63;
pub const D4: f32 = 293.66;
pub const E4: f32 = 329.63;
pub const F4: f32 = 349.23;
pub const G4: f32 = 392.00;
pub const A4: f32 = 440.00;
pub const B4: f32 = 493.88;
pub const C5: f32 = 523.25;
pub const D5: f32 = 587.33;
pub const E5: f32 = 659.25;
pub const F5: f32 = 698.46;
pub const G5: f32 = 783.99;

/// Frequency `semitones` away from A4.
pub fn note_frequency(semitones: i32) -> f32 {
    A4_FREQUENCY * 2.0_f32.powf(semitones as f32 / 12.0)
}
