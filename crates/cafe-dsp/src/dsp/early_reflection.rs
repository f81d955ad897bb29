use super::delay_line::DelayLine;

/// Early Reflections - Six-tap room reflection network
///
/// Each tap owns an 8192-sample ring of the mono downmix. All six cursors
/// advance once per sample, so every tap currently returns the downmix from
/// one full ring ago; the taps differ only in gain. Gains are scaled by the
/// room size and the reflection sum is mixed back into both channels, the
/// right side slightly weaker.
pub struct EarlyReflectionStage {
    taps: [DelayLine; TAP_COUNT],
}

pub const TAP_COUNT: usize = 6;
pub const TAP_BUFFER_LEN: usize = 8192;

/// Nominal reflection delays in milliseconds (not used for addressing)
pub const NOMINAL_DELAYS_MS: [u32; TAP_COUNT] = [15, 23, 31, 47, 63, 79];

const TAP_GAINS: [f32; TAP_COUNT] = [0.30, 0.25, 0.20, 0.15, 0.10, 0.05];
const RIGHT_SPREAD: f32 = 0.9;
const REFLECTION_MIX: f32 = 0.15;

impl EarlyReflectionStage {
    pub fn new() -> Self {
        Self {
            taps: std::array::from_fn(|_| DelayLine::new(TAP_BUFFER_LEN)),
        }
    }

    /// Process both channels in place
    pub fn process(&mut self, left: &mut [f32], right: &mut [f32], room_size: f32) {
        let gains = TAP_GAINS.map(|g| g * room_size);

        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let downmix = (*l + *r) * 0.5;
            let mut reflection_left = 0.0;
            let mut reflection_right = 0.0;

            for (tap, &gain) in self.taps.iter_mut().zip(gains.iter()) {
                let delayed = tap.read();
                reflection_left += delayed * gain;
                reflection_right += delayed * gain * RIGHT_SPREAD;
                tap.write_and_advance(downmix);
            }

            *l += reflection_left * REFLECTION_MIX;
            *r += reflection_right * REFLECTION_MIX;
        }
    }

    /// Clear every tap
    pub fn reset(&mut self) {
        for tap in &mut self.taps {
            tap.reset();
        }
    }

    /// Cursor position of each tap
    pub fn tap_positions(&self) -> [usize; TAP_COUNT] {
        std::array::from_fn(|j| self.taps[j].position())
    }
}

impl Default for EarlyReflectionStage {
    fn default() -> Self {
        Self::new()
    }
}
