//! Low-level DSP primitives used by the effects and the synth engine.
//!
//! These components are allocation-free on their per-sample paths and
//! realtime-safe, so they can be embedded directly inside effect structs.
//! They stay focused on the signal-processing math; parameter policy
//! (clamping, rejection of bad values) lives one layer up.

/// Stereo circular delay line.
pub mod delay;
/// Attack/decay/sustain/release envelope generator.
pub mod envelope;
/// One-pole low-pass filter core.
pub mod filter;
/// Phase-accumulator oscillator waveforms.
pub mod oscillator;

pub use envelope::{Envelope, EnvelopeState};
pub use oscillator::OscillatorKind;
