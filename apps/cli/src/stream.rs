use anyhow::{Context, Result};
use cafe_dsp::{numeric, Pipeline, StereoBlock};
use serde::Serialize;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

const BYTES_PER_SAMPLE: usize = 4;

/// Summary of a processed stream
#[derive(Debug, Default, Serialize)]
pub struct StreamStats {
    pub frames: usize,
    pub buffers: usize,
    /// Samples passed through because they did not form a whole frame
    pub unpaired_samples: usize,
    /// Output peak level. Silence reports -120 dBFS, the `linear_to_db`
    /// floor, so the JSON summary stays finite.
    pub peak_dbfs: f32,
    /// Output RMS level, floored at -120 dBFS like `peak_dbfs`
    pub rms_dbfs: f32,
}

/// Pump raw f32 LE interleaved stereo audio from `input` through the
/// pipeline into `output`, `buffer_frames` frames at a time
///
/// A stray sample at the end of the input that does not complete a frame is
/// written out unchanged after the processed frames of its buffer.
pub async fn run<R, W>(
    pipeline: &mut Pipeline,
    mut input: R,
    mut output: W,
    sample_rate: u32,
    buffer_frames: usize,
) -> Result<StreamStats>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut raw = vec![0u8; buffer_frames * 2 * BYTES_PER_SAMPLE];
    let mut samples = Vec::with_capacity(buffer_frames * 2);
    let mut processed = Vec::with_capacity(buffer_frames * 2);
    let mut encoded = Vec::with_capacity(raw.len());

    let mut stats = StreamStats::default();
    let mut peak = 0.0_f32;
    let mut sum_squares = 0.0_f64;
    let mut sample_count = 0usize;
    let mut rate_checked = false;

    loop {
        let filled = read_full(&mut input, &mut raw)
            .await
            .context("Failed to read input stream")?;
        if filled == 0 {
            break;
        }

        let whole = filled - filled % BYTES_PER_SAMPLE;
        if whole != filled {
            tracing::warn!("Dropping {} trailing bytes of a partial sample", filled - whole);
        }

        samples.clear();
        samples.extend(
            raw[..whole]
                .chunks_exact(BYTES_PER_SAMPLE)
                .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]])),
        );

        let block = StereoBlock::new(&samples, sample_rate);
        if !rate_checked && !block.is_native_rate() {
            tracing::warn!(
                "Input is {} Hz; café mode filters are tuned for {} Hz",
                block.sample_rate,
                numeric::SAMPLE_RATE
            );
        }
        rate_checked = true;

        let frame_samples = block.num_frames() * 2;
        stats.frames += block.num_frames();
        stats.buffers += 1;

        pipeline.process_into(&block.samples[..frame_samples], &mut processed);
        if !block.is_valid() {
            stats.unpaired_samples += 1;
            processed.extend_from_slice(&block.samples[frame_samples..]);
        }

        peak = peak.max(numeric::peak(&processed));
        sum_squares += processed.iter().map(|&s| (s as f64) * (s as f64)).sum::<f64>();
        sample_count += processed.len();

        encoded.clear();
        for sample in &processed {
            encoded.extend_from_slice(&sample.to_le_bytes());
        }
        output
            .write_all(&encoded)
            .await
            .context("Failed to write output stream")?;

        if filled < raw.len() {
            break;
        }
    }

    output.flush().await.context("Failed to flush output stream")?;

    stats.peak_dbfs = numeric::linear_to_db(peak);
    stats.rms_dbfs = if sample_count > 0 {
        numeric::linear_to_db((sum_squares / sample_count as f64).sqrt() as f32)
    } else {
        numeric::linear_to_db(0.0)
    };

    Ok(stats)
}

/// Read until `buf` is full or the input ends
async fn read_full<R: AsyncRead + Unpin>(input: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = input.read(&mut buf[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(samples: &[f32]) -> Vec<u8> {
        samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }

    fn decode(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect()
    }

    #[tokio::test]
    async fn test_stream_matches_direct_processing() {
        let samples: Vec<f32> = (0..200).map(|i| (i as f32 * 0.1).sin() * 0.5).collect();
        let input = encode(&samples);

        let mut pipeline = Pipeline::new();
        let mut output = Vec::new();
        let stats = run(&mut pipeline, &input[..], &mut output, 44100, 25)
            .await
            .unwrap();

        assert_eq!(stats.frames, 100);
        assert_eq!(stats.buffers, 4);
        assert_eq!(stats.unpaired_samples, 0);

        let mut reference = Pipeline::new();
        let mut expected = Vec::new();
        for chunk in samples.chunks(50) {
            expected.extend(reference.process(chunk));
        }
        assert_eq!(decode(&output), expected);
    }

    #[tokio::test]
    async fn test_trailing_odd_sample_passes_through() {
        let input = encode(&[0.5, -0.5, 0.25]);

        let mut pipeline = Pipeline::new();
        let mut output = Vec::new();
        let stats = run(&mut pipeline, &input[..], &mut output, 44100, 4)
            .await
            .unwrap();

        assert_eq!(stats.frames, 1);
        assert_eq!(stats.unpaired_samples, 1);

        let mut expected = Pipeline::new().process(&[0.5, -0.5]);
        expected.push(0.25);
        assert_eq!(decode(&output), expected);
    }

    #[tokio::test]
    async fn test_trailing_odd_sample_in_last_of_many_buffers() {
        // 50 frames plus one stray sample, read 16 frames at a time
        let mut samples: Vec<f32> = (0..100).map(|i| (i as f32 * 0.3).cos() * 0.6).collect();
        samples.push(0.125);
        let input = encode(&samples);

        let mut pipeline = Pipeline::new();
        let mut output = Vec::new();
        let stats = run(&mut pipeline, &input[..], &mut output, 44100, 16)
            .await
            .unwrap();

        assert_eq!(stats.buffers, 4);
        assert_eq!(stats.frames, 50);
        assert_eq!(stats.unpaired_samples, 1);

        let mut reference = Pipeline::new();
        let mut expected = Vec::new();
        for chunk in samples[..100].chunks(32) {
            expected.extend(reference.process(chunk));
        }
        expected.push(0.125);

        let output = decode(&output);
        assert_eq!(output, expected);
        // The final buffer carries processed frames, not the dry input
        assert_ne!(output[96..100], samples[96..100]);
    }

    #[tokio::test]
    async fn test_non_native_rate_still_processes() {
        let samples: Vec<f32> = (0..32).map(|i| (i as f32 * 0.2).sin() * 0.5).collect();
        let input = encode(&samples);

        let mut pipeline = Pipeline::new();
        let mut output = Vec::new();
        run(&mut pipeline, &input[..], &mut output, 48000, 16)
            .await
            .unwrap();

        assert_eq!(decode(&output), Pipeline::new().process(&samples));
    }

    #[tokio::test]
    async fn test_bypass_stream_is_identical() {
        let samples: Vec<f32> = (0..64).map(|i| i as f32 / 64.0).collect();
        let input = encode(&samples);

        let mut pipeline = Pipeline::new();
        pipeline.set_enabled(false);
        let mut output = Vec::new();
        run(&mut pipeline, &input[..], &mut output, 44100, 8)
            .await
            .unwrap();

        assert_eq!(output, input);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let mut pipeline = Pipeline::new();
        let mut output = Vec::new();
        let stats = run(&mut pipeline, &b""[..], &mut output, 44100, 8)
            .await
            .unwrap();

        assert_eq!(stats.frames, 0);
        assert_eq!(stats.buffers, 0);
        assert!(output.is_empty());
    }

    #[tokio::test]
    async fn test_silent_stream_reports_level_floor() {
        let input = encode(&[0.0; 64]);

        let mut pipeline = Pipeline::new();
        let mut output = Vec::new();
        let stats = run(&mut pipeline, &input[..], &mut output, 44100, 16)
            .await
            .unwrap();

        assert!((stats.peak_dbfs + 120.0).abs() < 1e-3);
        assert!((stats.rms_dbfs + 120.0).abs() < 1e-3);
        let json = serde_json::to_string(&stats).unwrap();
        assert!(!json.contains("null"));
    }
}
