//! Stateless numeric helpers for the code around the pipeline: level
//! conversions, mel scale, peak normalization, fades and metering.

/// Sample rate the filter chain is tuned for
pub const SAMPLE_RATE: u32 = 44_100;

/// Floor used when converting silence to decibels
const MIN_LINEAR: f32 = 0.000_001;

/// Peak level targeted by [`normalize`], leaving some headroom
const NORMALIZE_PEAK: f32 = 0.95;

/// Convert dB to linear gain
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

/// Convert linear gain to dB, flooring at -120 dB
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    20.0 * linear.max(MIN_LINEAR).log10()
}

pub fn frequency_to_mel(frequency: f32) -> f32 {
    2595.0 * (1.0 + frequency / 700.0).log10()
}

pub fn mel_to_frequency(mel: f32) -> f32 {
    700.0 * (10.0_f32.powf(mel / 2595.0) - 1.0)
}

/// Scale samples so the loudest one sits at 0.95 full scale
///
/// Silent or empty input is returned unchanged.
pub fn normalize(samples: &[f32]) -> Vec<f32> {
    let peak = peak(samples);
    if peak == 0.0 {
        return samples.to_vec();
    }

    let scale = NORMALIZE_PEAK / peak;
    samples.iter().map(|&s| s * scale).collect()
}

/// Linear fade from silence over the first `fade_samples` samples
pub fn fade_in(samples: &mut [f32], fade_samples: usize) {
    let len = fade_samples.min(samples.len());
    for (i, sample) in samples[..len].iter_mut().enumerate() {
        *sample *= i as f32 / len as f32;
    }
}

/// Linear fade to silence over the last `fade_samples` samples
pub fn fade_out(samples: &mut [f32], fade_samples: usize) {
    let len = fade_samples.min(samples.len());
    let start = samples.len() - len;
    for (i, sample) in samples[start..].iter_mut().enumerate() {
        *sample *= (len - i - 1) as f32 / len as f32;
    }
}

/// Largest absolute sample value, 0.0 for empty input
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0_f32, |acc, &s| acc.max(s.abs()))
}

/// Peak level in dBFS (negative infinity for silence)
pub fn peak_dbfs(samples: &[f32]) -> f32 {
    let peak = peak(samples);
    if peak > 0.0 {
        20.0 * peak.log10()
    } else {
        f32::NEG_INFINITY
    }
}

/// RMS level in dBFS (negative infinity for silence)
pub fn rms_dbfs(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return f32::NEG_INFINITY;
    }

    let sum_squares: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    let rms = (sum_squares / samples.len() as f64).sqrt();

    if rms > 0.0 {
        (20.0 * rms.log10()) as f32
    } else {
        f32::NEG_INFINITY
    }
}
