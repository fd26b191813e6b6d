/*
Audio Sinks
===========

The engine produces one stereo frame per call. A sink decides where those
frames go. Two shapes are supported:

Interleaved device buffers (desktop)
------------------------------------

Audio APIs hand the callback one interleaved buffer:

  channels = 2:   L R L R L R ...
  channels = 1:   M M M ...           (M = left)
  channels = 4:   L R c c L R c c ... (c = (L + R) / 2)

`render_interleaved` fills it frame by frame. Leftover samples at the end
(a buffer that is not a whole number of frames) are zeroed.

Double buffer (embedded DMA)
----------------------------

A circular DMA transfer streams one i16 buffer split into two halves:

  ┌─────────── half 0 ───────────┬─────────── half 1 ───────────┐
  │ L R L R ...                  │ L R L R ...                  │
  └──────────────────────────────┴──────────────────────────────┘
        ▲ refill when the DMA                  ▲ refill when the DMA
          reports "half 0 done"                  reports "half 1 done"

The interrupt only records which half finished (`HalfSignal::notify`). The
fill task picks it up with `take()` and renders that half from the engine.
The signal is a single slot, not a queue: if both halves complete before the
fill task wakes, only the latest one is reported.
*/

use std::sync::atomic::{AtomicU8, Ordering};

use crate::{effects::StereoSample, synth::engine::SynthEngine};

/// Render `out.len() / channels` frames into an interleaved buffer.
///
/// `channels == 0` leaves the engine untouched and zeroes `out`.
pub fn render_interleaved(engine: &mut SynthEngine, out: &mut [f32], channels: usize) {
    if channels == 0 {
        out.fill(0.0);
        return;
    }

    let mut frames = out.chunks_exact_mut(channels);
    for frame in frames.by_ref() {
        write_frame(frame, engine.next_sample());
    }
    frames.into_remainder().fill(0.0);
}

#[inline]
fn write_frame(frame: &mut [f32], sample: StereoSample) {
    match frame {
        [mono] => *mono = sample.left,
        [left, right, rest @ ..] => {
            *left = sample.left;
            *right = sample.right;
            rest.fill(0.5 * (sample.left + sample.right));
        }
        [] => {}
    }
}

/// Float sample in [-1, 1] to i16 full scale, clipping out-of-range input.
#[inline]
pub fn to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * 32767.0) as i16
}

/// Which half of a [`DoubleBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Half {
    First,
    Second,
}

impl Half {
    fn index(self) -> usize {
        match self {
            Half::First => 0,
            Half::Second => 1,
        }
    }
}

/// Coalescing "half N completed" flag, set from interrupt context.
#[derive(Debug, Default)]
pub struct HalfSignal {
    // 0 = nothing pending, 1 = first, 2 = second
    pending: AtomicU8,
}

impl HalfSignal {
    pub const fn new() -> Self {
        Self {
            pending: AtomicU8::new(0),
        }
    }

    /// Record that `half` finished playing. Overwrites an unconsumed signal.
    pub fn notify(&self, half: Half) {
        self.pending.store(half.index() as u8 + 1, Ordering::Release);
    }

    /// Consume the pending signal, if any.
    pub fn take(&self) -> Option<Half> {
        match self.pending.swap(0, Ordering::Acquire) {
            1 => Some(Half::First),
            2 => Some(Half::Second),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire) != 0
    }
}

/// Interleaved stereo i16 buffer split into two equal halves.
#[derive(Debug, Clone)]
pub struct DoubleBuffer {
    samples: Vec<i16>,
    half_frames: usize,
}

impl DoubleBuffer {
    pub const CHANNELS: usize = 2;

    /// `half_frames` stereo frames per half. Zero is bumped to one.
    pub fn new(half_frames: usize) -> Self {
        let half_frames = half_frames.max(1);
        Self {
            samples: vec![0; 2 * half_frames * Self::CHANNELS],
            half_frames,
        }
    }

    pub fn half_frames(&self) -> usize {
        self.half_frames
    }

    /// Render one half from the engine.
    pub fn fill_half(&mut self, half: Half, engine: &mut SynthEngine) {
        let len = self.half_frames * Self::CHANNELS;
        let start = half.index() * len;
        for frame in self.samples[start..start + len].chunks_exact_mut(Self::CHANNELS) {
            let sample = engine.next_sample();
            frame[0] = to_i16(sample.left);
            frame[1] = to_i16(sample.right);
        }
    }

    /// Fill both halves, first then second. Call once before starting the
    /// transfer.
    pub fn prime(&mut self, engine: &mut SynthEngine) {
        self.fill_half(Half::First, engine);
        self.fill_half(Half::Second, engine);
    }

    /// Refill whichever half `signal` reports, if any. Returns the half that
    /// was rendered.
    pub fn service(&mut self, signal: &HalfSignal, engine: &mut SynthEngine) -> Option<Half> {
        let half = signal.take()?;
        self.fill_half(half, engine);
        Some(half)
    }

    pub fn half(&self, half: Half) -> &[i16] {
        let len = self.half_frames * Self::CHANNELS;
        let start = half.index() * len;
        &self.samples[start..start + len]
    }

    /// The whole buffer, as handed to the DMA controller.
    pub fn as_slice(&self) -> &[i16] {
        &self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing_engine() -> SynthEngine {
        let mut engine = SynthEngine::new(48_000.0);
        engine.trigger_note(440.0);
        engine
    }

    #[test]
    fn interleaves_stereo() {
        let mut engine = playing_engine();
        let mut out = [9.0f32; 6];
        render_interleaved(&mut engine, &mut out, 2);
        // 440 Hz square at 48 kHz stays high for the first 55 samples
        assert_eq!(out, [1.0; 6]);
    }

    #[test]
    fn extra_channels_get_the_mean() {
        let mut engine = playing_engine();
        let mut out = [0.0f32; 8];
        render_interleaved(&mut engine, &mut out, 4);
        assert_eq!(out, [1.0; 8]);
        assert!((engine.phase() - 2.0 * 440.0 / 48_000.0).abs() < 1e-6);
    }

    #[test]
    fn partial_trailing_frame_is_zeroed() {
        let mut engine = playing_engine();
        let mut out = [5.0f32; 5];
        render_interleaved(&mut engine, &mut out, 2);
        assert_eq!(out, [1.0, 1.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn mono_gets_left() {
        let mut engine = playing_engine();
        let mut out = [0.0f32; 3];
        render_interleaved(&mut engine, &mut out, 1);
        assert_eq!(out, [1.0; 3]);

        let mut none = [3.0f32; 2];
        render_interleaved(&mut engine, &mut none, 0);
        assert_eq!(none, [0.0; 2]);
    }

    #[test]
    fn i16_conversion_clips() {
        assert_eq!(to_i16(1.0), 32767);
        assert_eq!(to_i16(-1.0), -32767);
        assert_eq!(to_i16(2.5), 32767);
        assert_eq!(to_i16(-3.0), -32767);
        assert_eq!(to_i16(0.0), 0);
    }

    #[test]
    fn half_signal_coalesces() {
        let signal = HalfSignal::new();
        assert_eq!(signal.take(), None);

        signal.notify(Half::First);
        signal.notify(Half::Second);
        assert!(signal.is_pending());
        assert_eq!(signal.take(), Some(Half::Second));
        assert_eq!(signal.take(), None);
    }

    #[test]
    fn double_buffer_fills_requested_half() {
        let mut engine = playing_engine();
        let mut buffer = DoubleBuffer::new(4);
        assert_eq!(buffer.as_slice().len(), 16);

        let signal = HalfSignal::new();
        signal.notify(Half::Second);
        assert_eq!(buffer.service(&signal, &mut engine), Some(Half::Second));

        assert!(buffer.half(Half::First).iter().all(|&s| s == 0));
        assert!(buffer.half(Half::Second).iter().all(|&s| s == 32767));
        assert_eq!(buffer.service(&signal, &mut engine), None);
    }

    #[test]
    fn silent_engine_fills_zeros() {
        let mut engine = SynthEngine::new(48_000.0);
        let mut buffer = DoubleBuffer::new(8);
        buffer.prime(&mut engine);
        assert!(buffer.as_slice().iter().all(|&s| s == 0));
    }
}
