use super::delay_line::DelayLine;

/// Stereo Widener - Mid/Side with all-pass decorrelated side channel
///
/// The side component is scaled by the width control and passed through a
/// 512-sample Schroeder all-pass before being matrixed back to L/R. The
/// all-pass keeps the magnitude spectrum of the side signal and smears its
/// phase, which reads as a wider, less localized image.
pub struct StereoWidenerStage {
    all_pass: DelayLine,
}

pub const ALL_PASS_LEN: usize = 512;
const ALL_PASS_GAIN: f32 = 0.7;

impl StereoWidenerStage {
    pub fn new() -> Self {
        Self {
            all_pass: DelayLine::new(ALL_PASS_LEN),
        }
    }

    /// Process both channels in place
    ///
    /// `width` is clamped to [0, 1]; 0 collapses the output to mono.
    pub fn process(&mut self, left: &mut [f32], right: &mut [f32], width: f32) {
        let width = width.clamp(0.0, 1.0);

        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let mid = (*l + *r) * 0.5;
            let side = (*l - *r) * width;

            let processed_side = self.process_all_pass(side);

            *l = mid + processed_side;
            *r = mid - processed_side;
        }
    }

    #[inline]
    fn process_all_pass(&mut self, input: f32) -> f32 {
        let delayed = self.all_pass.read();
        self.all_pass.write_and_advance(input + delayed * ALL_PASS_GAIN);
        delayed - input * ALL_PASS_GAIN
    }

    pub fn reset(&mut self) {
        self.all_pass.reset();
    }
}

impl Default for StereoWidenerStage {
    fn default() -> Self {
        Self::new()
    }
}
