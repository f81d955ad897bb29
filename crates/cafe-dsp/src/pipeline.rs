use crate::control::{snapshot_channel, ParameterHandle};
use crate::dsp::{AirAbsorptionStage, BinauralStage, EarlyReflectionStage, StereoWidenerStage};
use crate::frame;
use cafe_core::{CafeSettings, Parameters, DEFAULT_ROOM_SIZE};
use crossbeam_channel::Receiver;

/// Café mode processing chain
///
/// Runs every stereo buffer through, in order:
/// 1. Binaural distance attenuation and FIR coloration
/// 2. Early room reflections
/// 3. Air absorption low-pass
/// 4. Mid/side stereo widening
/// 5. Final gain by intensity
///
/// All filter state lives here for the lifetime of the session and carries
/// from one buffer to the next. Buffers must be fed in stream order from a
/// single audio thread; parameter changes from other threads go through a
/// [`ParameterHandle`].
pub struct Pipeline {
    params: Parameters,
    enabled: bool,

    binaural: BinauralStage,
    early_reflections: EarlyReflectionStage,
    air_absorption: AirAbsorptionStage,
    widener: StereoWidenerStage,

    // Scratch channel storage reused across calls
    left: Vec<f32>,
    right: Vec<f32>,

    control: Option<Receiver<Parameters>>,
}

impl Pipeline {
    /// Create a pipeline with default parameters
    pub fn new() -> Self {
        Self::with_parameters(Parameters::default())
    }

    pub fn with_parameters(params: Parameters) -> Self {
        Self {
            params,
            enabled: true,
            binaural: BinauralStage::new(),
            early_reflections: EarlyReflectionStage::new(),
            air_absorption: AirAbsorptionStage::new(),
            widener: StereoWidenerStage::new(),
            left: Vec::new(),
            right: Vec::new(),
            control: None,
        }
    }

    /// Create a pipeline from session settings
    pub fn from_settings(settings: &CafeSettings) -> Self {
        let mut pipeline = Self::with_parameters(settings.parameters());
        pipeline.enabled = settings.enabled;
        if settings.buffer_frames > 0 {
            pipeline.left.reserve(settings.buffer_frames);
            pipeline.right.reserve(settings.buffer_frames);
        }
        pipeline
    }

    /// Process an interleaved stereo buffer into a freshly allocated one
    ///
    /// Odd-length buffers are returned unchanged without touching any state.
    pub fn process(&mut self, buffer: &[f32]) -> Vec<f32> {
        let mut output = Vec::with_capacity(buffer.len());
        self.process_into(buffer, &mut output);
        output
    }

    /// Process an interleaved stereo buffer into `output` (cleared first)
    pub fn process_into(&mut self, buffer: &[f32], output: &mut Vec<f32>) {
        self.apply_pending_parameters();

        if !self.enabled {
            pass_through(buffer, output);
            return;
        }

        if let Err(err) = frame::deinterleave_into(buffer, &mut self.left, &mut self.right) {
            tracing::trace!("Passing buffer through unprocessed: {}", err);
            pass_through(buffer, output);
            return;
        }

        self.run_chain();

        if let Err(err) = frame::reinterleave_into(&self.left, &self.right, output) {
            tracing::warn!("Failed to reinterleave processed audio: {}", err);
            pass_through(buffer, output);
        }
    }

    fn run_chain(&mut self) {
        let params = self.params;
        let (left, right) = (&mut self.left[..], &mut self.right[..]);

        self.binaural.process(left, right, params.distance());
        self.early_reflections.process(left, right, params.room_size());
        self.air_absorption.process(left, right, params.distance());
        self.widener.process(left, right, params.spatial_width());

        let gain = params.intensity();
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            *l *= gain;
            *r *= gain;
        }
    }

    /// Adopt the newest snapshot published by a [`ParameterHandle`], if any
    fn apply_pending_parameters(&mut self) {
        if let Some(rx) = &self.control {
            while let Ok(params) = rx.try_recv() {
                self.params = params;
            }
        }
    }

    /// Current parameters (as of the last processed buffer or local update)
    pub fn parameters(&self) -> Parameters {
        self.params
    }

    /// Update all parameters; effective from the next buffer
    ///
    /// Values are clamped into range. `None` for the room size restores the
    /// default room.
    pub fn update_parameters(
        &mut self,
        intensity: f32,
        spatial_width: f32,
        room_size: Option<f32>,
    ) {
        self.params.update(
            intensity,
            spatial_width,
            room_size.unwrap_or(DEFAULT_ROOM_SIZE),
        );
        self.log_parameters();
    }

    pub fn set_intensity(&mut self, intensity: f32) {
        self.params.set_intensity(intensity);
        self.log_parameters();
    }

    pub fn set_spatial_width(&mut self, spatial_width: f32) {
        self.params.set_spatial_width(spatial_width);
        self.log_parameters();
    }

    pub fn set_room_size(&mut self, room_size: f32) {
        self.params.set_room_size(room_size);
        self.log_parameters();
    }

    fn log_parameters(&self) {
        tracing::debug!(
            "Café mode parameters: intensity={:.2}, width={:.2}, room_size={:.2}, distance={:.2}",
            self.params.intensity(),
            self.params.spatial_width(),
            self.params.room_size(),
            self.params.distance()
        );
    }

    /// Create a handle for updating parameters from another thread
    ///
    /// The handle becomes the owner of the parameters: each snapshot it
    /// publishes carries all values, so a change made through the local
    /// setters is overwritten by the handle's next publish.
    ///
    /// Replaces any previously created handle's link; the old handle keeps
    /// working locally but its snapshots are no longer picked up.
    pub fn control_handle(&mut self) -> ParameterHandle {
        let (handle, rx) = snapshot_channel(self.params);
        self.control = Some(rx);
        handle
    }

    /// Enable or bypass processing. A bypassed pipeline leaves its filter
    /// state untouched.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            tracing::debug!("Café mode {}", if enabled { "enabled" } else { "disabled" });
        }
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Clear all filter state, as if the pipeline had just been created
    pub fn reset(&mut self) {
        self.early_reflections.reset();
        self.air_absorption.reset();
        self.widener.reset();
        tracing::debug!("Café mode filter state reset");
    }

    pub fn air_absorption(&self) -> &AirAbsorptionStage {
        &self.air_absorption
    }

    pub fn early_reflections(&self) -> &EarlyReflectionStage {
        &self.early_reflections
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn pass_through(buffer: &[f32], output: &mut Vec<f32>) {
    output.clear();
    output.extend_from_slice(buffer);
}
