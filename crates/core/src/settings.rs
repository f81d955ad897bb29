use crate::error::{CafeError, Result};
use crate::params::{
    Parameters, DEFAULT_INTENSITY, DEFAULT_ROOM_SIZE, DEFAULT_SPATIAL_WIDTH,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Session configuration for café mode
///
/// Holds the initial effect parameters plus the stream shape the host uses
/// when feeding the pipeline. Every key is optional in the TOML form; missing
/// keys take the defaults below.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CafeSettings {
    pub intensity: f32,
    pub spatial_width: f32,
    pub room_size: f32,
    /// Start with processing enabled (false = bypass)
    pub enabled: bool,
    /// Informational only, the filter chain is tuned for a single rate
    pub sample_rate: u32,
    /// Frames per buffer handed to the pipeline
    pub buffer_frames: usize,
}

impl Default for CafeSettings {
    fn default() -> Self {
        Self {
            intensity: DEFAULT_INTENSITY,
            spatial_width: DEFAULT_SPATIAL_WIDTH,
            room_size: DEFAULT_ROOM_SIZE,
            enabled: true,
            sample_rate: 44100,
            buffer_frames: 1024,
        }
    }
}

impl CafeSettings {
    /// Parse settings from a TOML document
    pub fn from_toml_str(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    /// Load settings from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| CafeError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_toml_str(&contents)?;
        tracing::debug!("Loaded café mode settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Effect parameters described by these settings, clamped into range
    pub fn parameters(&self) -> Parameters {
        Parameters::new(self.intensity, self.spatial_width, self.room_size)
    }
}
