use crate::numeric::SAMPLE_RATE;
use cafe_core::{CafeError, Result};

/// Interleaved stereo 32-bit float frames handed over by the host
#[derive(Clone, Copy, Debug)]
pub struct StereoBlock<'a> {
    /// Interleaved samples (L, R, L, R, ...)
    pub samples: &'a [f32],
    /// Sample rate in Hz, as reported by the host
    pub sample_rate: u32,
}

impl<'a> StereoBlock<'a> {
    pub fn new(samples: &'a [f32], sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Number of whole L/R frames
    pub fn num_frames(&self) -> usize {
        self.samples.len() / 2
    }

    /// True when the buffer holds only whole frames
    pub fn is_valid(&self) -> bool {
        self.samples.len() % 2 == 0
    }

    /// True when the host rate matches the rate the filter chain is tuned for
    pub fn is_native_rate(&self) -> bool {
        self.sample_rate == SAMPLE_RATE
    }
}

/// Split an interleaved buffer into left and right channels
pub fn deinterleave(buffer: &[f32]) -> Result<(Vec<f32>, Vec<f32>)> {
    let mut left = Vec::with_capacity(buffer.len() / 2);
    let mut right = Vec::with_capacity(buffer.len() / 2);
    deinterleave_into(buffer, &mut left, &mut right)?;
    Ok((left, right))
}

/// Split an interleaved buffer into caller-owned channel storage
///
/// Both vectors are cleared first. On error they are left empty.
pub fn deinterleave_into(buffer: &[f32], left: &mut Vec<f32>, right: &mut Vec<f32>) -> Result<()> {
    left.clear();
    right.clear();

    if buffer.len() % 2 != 0 {
        return Err(CafeError::InvalidBufferShape { len: buffer.len() });
    }

    for frame in buffer.chunks_exact(2) {
        left.push(frame[0]);
        right.push(frame[1]);
    }

    Ok(())
}

/// Merge left and right channels back into an interleaved buffer
pub fn reinterleave(left: &[f32], right: &[f32]) -> Result<Vec<f32>> {
    let mut output = Vec::with_capacity(left.len() * 2);
    reinterleave_into(left, right, &mut output)?;
    Ok(output)
}

/// Merge channels into caller-owned storage (cleared first)
pub fn reinterleave_into(left: &[f32], right: &[f32], output: &mut Vec<f32>) -> Result<()> {
    output.clear();

    if left.len() != right.len() {
        return Err(CafeError::ChannelLengthMismatch {
            left: left.len(),
            right: right.len(),
        });
    }

    output.reserve(left.len() * 2);
    for (&l, &r) in left.iter().zip(right) {
        output.push(l);
        output.push(r);
    }

    Ok(())
}
