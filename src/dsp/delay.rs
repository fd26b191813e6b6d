/*
Stereo Circular Delay Line
==========================

Two parallel ring buffers (left and right) sharing one index. The buffer
length IS the delay: the slot under the index holds the sample written
exactly `len` samples ago.

    read   delayed = buffer[index]
    write  buffer[index] = new value
    step   index = (index + 1) % len

      write/read ──┐
                   ↓
      [ s4 | s5 | s0 | s1 | s2 | s3 ]     len = 6
                   └─ oldest sample, written 6 steps ago

Resizing reallocates and zero-fills both channels and rewinds the index, so
any echo in flight is dropped. That only happens on an explicit resize
(delay time or sample rate change), never while processing.
*/

#[derive(Debug, Clone)]
pub struct StereoDelayLine {
    left: Vec<f32>,
    right: Vec<f32>,
    index: usize,
}

impl StereoDelayLine {
    /// Create a line delaying by `len` samples (at least 1).
    pub fn new(len: usize) -> Self {
        let len = len.max(1);
        Self {
            left: vec![0.0; len],
            right: vec![0.0; len],
            index: 0,
        }
    }

    /// Number of samples of delay.
    pub fn len(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// The pair that will be overwritten by the next `write`.
    #[inline]
    pub fn read(&self) -> (f32, f32) {
        (self.left[self.index], self.right[self.index])
    }

    /// Store a pair at the current slot and move on.
    #[inline]
    pub fn write(&mut self, left: f32, right: f32) {
        self.left[self.index] = left;
        self.right[self.index] = right;
        self.index += 1;
        if self.index >= self.left.len() {
            self.index = 0;
        }
    }

    /// Reallocate to `len` samples (at least 1), zeroed, index rewound.
    ///
    /// Allocates. Keep it off the audio thread.
    pub fn resize(&mut self, len: usize) {
        let len = len.max(1);
        self.left = vec![0.0; len];
        self.right = vec![0.0; len];
        self.index = 0;
    }

    pub fn reset(&mut self) {
        self.left.fill(0.0);
        self.right.fill(0.0);
        self.index = 0;
    }
}
