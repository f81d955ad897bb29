mod stream;

use anyhow::{Context, Result};
use cafe_core::CafeSettings;
use cafe_dsp::Pipeline;
use clap::Parser;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Café mode: simulate café acoustics on a raw stereo stream
///
/// Reads interleaved little-endian 32-bit float stereo samples and writes the
/// processed stream in the same format.
#[derive(Parser, Debug)]
#[command(name = "cafe-mode", version)]
struct Args {
    /// Input file, or "-" for stdin
    #[arg(short, long, default_value = "-")]
    input: String,

    /// Output file, or "-" for stdout
    #[arg(short, long, default_value = "-")]
    output: String,

    /// Settings file (TOML). Defaults to <config dir>/cafe-mode/config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Effect intensity (0.0 - 1.0)
    #[arg(long)]
    intensity: Option<f32>,

    /// Stereo width (0.0 - 1.0)
    #[arg(long)]
    width: Option<f32>,

    /// Room size (0.1 - 1.0)
    #[arg(long)]
    room_size: Option<f32>,

    /// Frames per processing buffer
    #[arg(long)]
    buffer_frames: Option<usize>,

    /// Pass audio through without processing
    #[arg(long)]
    bypass: bool,

    /// Log a JSON summary of the processed stream
    #[arg(long)]
    stats: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Log to stderr so stdout stays a clean audio stream
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,cafe_mode=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let settings = resolve_settings(&args)?;

    tracing::info!(
        "Starting café mode: intensity={:.2}, width={:.2}, room_size={:.2}, buffer={} frames{}",
        settings.intensity,
        settings.spatial_width,
        settings.room_size,
        settings.buffer_frames,
        if settings.enabled { "" } else { " (bypassed)" }
    );

    let mut pipeline = Pipeline::from_settings(&settings);
    let input = open_input(&args.input).await?;
    let output = open_output(&args.output).await?;

    let stats = stream::run(
        &mut pipeline,
        input,
        output,
        settings.sample_rate,
        settings.buffer_frames,
    )
    .await?;

    tracing::info!(
        "Processed {} frames in {} buffers",
        stats.frames,
        stats.buffers
    );
    if args.stats {
        let summary = serde_json::to_string(&stats).context("Failed to serialize stats")?;
        tracing::info!("Stream stats: {}", summary);
    }

    Ok(())
}

/// Merge the settings file (if any) with command-line overrides
fn resolve_settings(args: &Args) -> Result<CafeSettings> {
    let mut settings = match &args.config {
        Some(path) => CafeSettings::load(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => load_default_settings(),
    };

    if let Some(intensity) = args.intensity {
        settings.intensity = intensity;
    }
    if let Some(width) = args.width {
        settings.spatial_width = width;
    }
    if let Some(room_size) = args.room_size {
        settings.room_size = room_size;
    }
    if let Some(buffer_frames) = args.buffer_frames {
        settings.buffer_frames = buffer_frames;
    }
    if args.bypass {
        settings.enabled = false;
    }

    if settings.buffer_frames == 0 {
        anyhow::bail!("buffer_frames must be at least 1");
    }

    Ok(settings)
}

/// Settings from the default location, falling back to built-in defaults
fn load_default_settings() -> CafeSettings {
    let path = match default_config_path() {
        Ok(path) => path,
        Err(e) => {
            tracing::debug!("No config directory available: {}", e);
            return CafeSettings::default();
        }
    };

    if !path.exists() {
        return CafeSettings::default();
    }

    match CafeSettings::load(&path) {
        Ok(settings) => {
            tracing::info!("Using settings from {}", path.display());
            settings
        }
        Err(e) => {
            tracing::warn!("Ignoring invalid settings file {}: {}", path.display(), e);
            CafeSettings::default()
        }
    }
}

/// Get the settings file path (platform-specific)
fn default_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Failed to get config directory"))?
        .join("cafe-mode");

    Ok(config_dir.join("config.toml"))
}

async fn open_input(path: &str) -> Result<Box<dyn AsyncRead + Unpin + Send>> {
    if path == "-" {
        return Ok(Box::new(tokio::io::stdin()));
    }
    let file = tokio::fs::File::open(Path::new(path))
        .await
        .with_context(|| format!("Failed to open input {}", path))?;
    Ok(Box::new(file))
}

async fn open_output(path: &str) -> Result<Box<dyn AsyncWrite + Unpin + Send>> {
    if path == "-" {
        return Ok(Box::new(tokio::io::stdout()));
    }
    let file = tokio::fs::File::create(Path::new(path))
        .await
        .with_context(|| format!("Failed to create output {}", path))?;
    Ok(Box::new(file))
}
