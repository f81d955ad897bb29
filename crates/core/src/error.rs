use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the café mode crates
#[derive(Debug, Error)]
pub enum CafeError {
    /// Interleaved stereo buffers must hold whole L/R frames
    #[error("invalid buffer shape: {len} samples is not a whole number of stereo frames")]
    InvalidBufferShape { len: usize },

    #[error("channel length mismatch: left has {left} samples, right has {right}")]
    ChannelLengthMismatch { left: usize, right: usize },

    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, CafeError>;
