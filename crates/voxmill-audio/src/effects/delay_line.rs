//! Ring buffer shared by the delay-based effects.

/// A ring buffer delay line with fractional reads.
///
/// Delays count back from the next write: after `write(x)`, `read(1)` is `x`.
/// Read before writing to get a delay of `d` input samples with `read(d)`.
#[derive(Debug, Clone)]
pub struct DelayLine {
    buffer: Vec<f64>,
    write_pos: usize,
}

impl DelayLine {
    /// Creates a delay line holding up to `max_samples` samples.
    pub fn new(max_samples: usize) -> Self {
        Self {
            buffer: vec![0.0; max_samples.max(4)],
            write_pos: 0,
        }
    }

    /// Number of samples the line holds.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Writes a sample and advances the write position.
    pub fn write(&mut self, sample: f64) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
    }

    /// Reads the sample `delay_samples` positions back. Delays beyond the
    /// capacity wrap.
    pub fn read(&self, delay_samples: usize) -> f64 {
        let len = self.buffer.len();
        let read_pos = (self.write_pos + len - delay_samples % len) % len;
        self.buffer[read_pos]
    }

    /// Reads at a fractional delay with linear interpolation, clamped to
    /// `[0, capacity - 2]` so the upper tap stays inside the line.
    pub fn read_interpolated(&self, delay_samples: f64) -> f64 {
        let max_delay = (self.buffer.len() - 2) as f64;
        let delay = delay_samples.clamp(0.0, max_delay);
        let delay_int = delay.floor() as usize;
        let frac = delay - delay_int as f64;

        let a = self.read(delay_int);
        let b = self.read(delay_int + 1);
        a * (1.0 - frac) + b * frac
    }
}
