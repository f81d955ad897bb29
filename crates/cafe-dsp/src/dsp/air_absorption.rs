/// Air Absorption - Distance-dependent high-frequency rolloff
///
/// One-pole low-pass per channel. The previous output of each channel is
/// carried across calls so consecutive buffers filter as one stream.
pub struct AirAbsorptionStage {
    previous_left: f32,
    previous_right: f32,
}

impl AirAbsorptionStage {
    pub fn new() -> Self {
        Self {
            previous_left: 0.0,
            previous_right: 0.0,
        }
    }

    /// Feed-forward coefficient for a listener at `distance` meters
    #[inline]
    pub fn coefficient(distance: f32) -> f32 {
        (0.98 - distance * 0.002).clamp(0.85, 0.98)
    }

    /// Process both channels in place
    pub fn process(&mut self, left: &mut [f32], right: &mut [f32], distance: f32) {
        let coeff = Self::coefficient(distance);
        let feedback = 1.0 - coeff;

        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            *l = *l * coeff + self.previous_left * feedback;
            *r = *r * coeff + self.previous_right * feedback;

            self.previous_left = *l;
            self.previous_right = *r;
        }
    }

    /// Last output sample of each channel as `(left, right)`
    pub fn previous(&self) -> (f32, f32) {
        (self.previous_left, self.previous_right)
    }

    pub fn reset(&mut self) {
        self.previous_left = 0.0;
        self.previous_right = 0.0;
    }
}

impl Default for AirAbsorptionStage {
    fn default() -> Self {
        Self::new()
    }
}
