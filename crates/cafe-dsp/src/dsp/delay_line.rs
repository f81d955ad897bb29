/// Fixed-capacity circular sample buffer
///
/// A single cursor serves as both read and write position: callers read the
/// oldest sample, overwrite it, then advance. With capacity `N` every sample
/// written comes back out exactly `N` writes later.
#[derive(Debug, Clone)]
pub struct DelayLine {
    buffer: Vec<f32>,
    index: usize,
}

impl DelayLine {
    /// Create a zero-filled delay line. `capacity` must be non-zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "delay line capacity must be non-zero");
        Self {
            buffer: vec![0.0; capacity],
            index: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Sample at the cursor
    #[inline]
    pub fn read(&self) -> f32 {
        self.buffer[self.index]
    }

    /// Overwrite the sample at the cursor and advance it with wrap
    #[inline]
    pub fn write_and_advance(&mut self, sample: f32) {
        self.buffer[self.index] = sample;
        self.index = (self.index + 1) % self.buffer.len();
    }

    pub fn position(&self) -> usize {
        self.index
    }

    /// Zero the buffer and rewind the cursor
    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.index = 0;
    }
}
