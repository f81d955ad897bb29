/// DSP (Digital Signal Processing) stages for café mode
///
/// Contains the real-time stages run by the pipeline, in processing order:
/// - Binaural: Distance attenuation and short head-related FIR
/// - Early Reflections: Six-tap room reflection network
/// - Air Absorption: Distance-dependent one-pole low-pass
/// - Stereo Widener: Mid/Side with all-pass decorrelated side
///
/// plus the circular delay line shared by the stateful stages.
pub mod delay_line;

pub mod binaural;
pub mod early_reflection;
pub mod air_absorption;
pub mod stereo_widener;

// Re-export commonly used types for convenience
pub use delay_line::DelayLine;

pub use binaural::BinauralStage;
pub use early_reflection::EarlyReflectionStage;
pub use air_absorption::AirAbsorptionStage;
pub use stereo_widener::StereoWidenerStage;
