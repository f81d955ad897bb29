/// Binaural Distance - Attenuation and short FIR coloration
///
/// Scales both channels by a distance-dependent attenuation, then colors them
/// with a 6-tap head-related FIR. The right channel uses the same taps scaled
/// by 0.9 for a slight interaural asymmetry.
///
/// The filter runs in place and reads its own progressively updated history,
/// so it only ever looks backward within the current buffer. The first
/// `FIR_TAPS` samples of every buffer are left attenuated but unfiltered.
pub struct BinauralStage {
    coefficients: [f32; FIR_TAPS],
}

pub const FIR_TAPS: usize = 6;

const HRTF_COEFFICIENTS: [f32; FIR_TAPS] = [0.5, 0.3, 0.1, -0.1, -0.05, 0.02];
const RIGHT_ASYMMETRY: f32 = 0.9;

impl BinauralStage {
    pub fn new() -> Self {
        Self {
            coefficients: HRTF_COEFFICIENTS,
        }
    }

    /// Gain applied for a listener at `distance` meters
    #[inline]
    pub fn attenuation(distance: f32) -> f32 {
        1.0 / (1.0 + distance * 0.3)
    }

    /// Process both channels in place
    pub fn process(&mut self, left: &mut [f32], right: &mut [f32], distance: f32) {
        let attenuation = Self::attenuation(distance);
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            *l *= attenuation;
            *r *= attenuation;
        }

        self.apply_fir(left, right);
    }

    fn apply_fir(&self, left: &mut [f32], right: &mut [f32]) {
        let len = left.len().min(right.len());

        for i in FIR_TAPS..len {
            let mut left_sum = 0.0;
            let mut right_sum = 0.0;

            for (j, &coeff) in self.coefficients.iter().enumerate() {
                left_sum += left[i - j] * coeff;
                right_sum += right[i - j] * coeff * RIGHT_ASYMMETRY;
            }

            left[i] = left_sum;
            right[i] = right_sum;
        }
    }
}

impl Default for BinauralStage {
    fn default() -> Self {
        Self::new()
    }
}
