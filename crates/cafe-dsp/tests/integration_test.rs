use cafe_core::CafeSettings;
use cafe_dsp::*;

/// Interleaved stereo test tone: 440 Hz left, 660 Hz right
fn stereo_tone(frames: usize) -> Vec<f32> {
    let sample_rate = numeric::SAMPLE_RATE as f32;
    let mut samples = Vec::with_capacity(frames * 2);
    for i in 0..frames {
        let t = i as f32 / sample_rate;
        samples.push((2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5);
        samples.push((2.0 * std::f32::consts::PI * 660.0 * t).sin() * 0.5);
    }
    samples
}

#[test]
fn test_single_frame_matches_chain() {
    let mut pipeline = Pipeline::new();
    let output = pipeline.process(&[1.0, 0.0]);

    // Defaults: intensity 0.5, width 0.5, distance 6.5
    let attenuation = 1.0_f32 / (1.0 + 6.5 * 0.3);
    let coeff = (0.98_f32 - 6.5 * 0.002).clamp(0.85, 0.98);
    let left = attenuation * coeff;
    let mid = left * 0.5;
    let side = left * 0.5;
    let processed_side = -side * 0.7;

    assert!((output[0] - (mid + processed_side) * 0.5).abs() < 1e-6);
    assert!((output[1] - (mid - processed_side) * 0.5).abs() < 1e-6);
}

#[test]
fn test_chunked_processing_carries_state() {
    let frames = [0.9, -0.3, 0.4, 0.2, -0.7, 0.5, 0.1, -0.8];

    let mut whole = Pipeline::new();
    let whole_output = whole.process(&frames);

    let mut chunked = Pipeline::new();
    let mut chunked_output = chunked.process(&frames[..4]);
    chunked_output.extend(chunked.process(&frames[4..]));

    assert_eq!(
        whole.air_absorption().previous(),
        chunked.air_absorption().previous()
    );
    assert_eq!(
        whole.early_reflections().tap_positions(),
        chunked.early_reflections().tap_positions()
    );
    assert_eq!(whole_output, chunked_output);
}

#[test]
fn test_state_persists_between_buffers() {
    // The same input twice gives different output once filter history exists
    let input = stereo_tone(64);
    let mut pipeline = Pipeline::new();
    let first = pipeline.process(&input);
    let second = pipeline.process(&input);
    assert_ne!(first, second);
}

#[test]
fn test_determinism() {
    let input = stereo_tone(1024);
    let mut a = Pipeline::new();
    let mut b = Pipeline::new();

    for _ in 0..4 {
        let out_a = a.process(&input);
        let out_b = b.process(&input);
        let bits_a: Vec<u32> = out_a.iter().map(|x| x.to_bits()).collect();
        let bits_b: Vec<u32> = out_b.iter().map(|x| x.to_bits()).collect();
        assert_eq!(bits_a, bits_b);
    }
}

#[test]
fn test_fir_warm_up_region() {
    // Chain without the later stages: check the binaural stage directly
    let input = stereo_tone(8);
    let (mut left, mut right) = deinterleave(&input).unwrap();
    let (orig_left, orig_right) = (left.clone(), right.clone());

    let distance = 6.5;
    let attenuation = BinauralStage::attenuation(distance);
    BinauralStage::new().process(&mut left, &mut right, distance);

    for i in 0..6 {
        assert_eq!(left[i], orig_left[i] * attenuation);
        assert_eq!(right[i], orig_right[i] * attenuation);
    }
    for i in 6..8 {
        assert_ne!(left[i], orig_left[i] * attenuation);
    }
}

#[test]
fn test_process_into_reuses_output() {
    let input = stereo_tone(128);
    let mut a = Pipeline::new();
    let mut b = Pipeline::new();

    let mut output = Vec::new();
    for _ in 0..3 {
        a.process_into(&input, &mut output);
        assert_eq!(output, b.process(&input));
    }
}

#[test]
fn test_output_stays_bounded() {
    let mut pipeline = Pipeline::new();
    pipeline.update_parameters(1.0, 1.0, Some(1.0));
    let input = stereo_tone(4096);

    for _ in 0..8 {
        let output = pipeline.process(&input);
        assert!(output.iter().all(|x| x.is_finite()));
        assert!(numeric::peak(&output) < 1.0);
    }
}

#[test]
fn test_pipeline_from_settings_file() {
    let settings = CafeSettings::from_toml_str(
        r#"
        intensity = 0.0
        spatial_width = 0.8
        "#,
    )
    .unwrap();

    let mut pipeline = Pipeline::from_settings(&settings);
    let output = pipeline.process(&stereo_tone(32));
    assert!(output.iter().all(|&x| x == 0.0));
}

#[tokio::test]
async fn test_parameter_updates_from_another_thread() {
    let mut pipeline = Pipeline::new();
    let mut handle = pipeline.control_handle();
    let input = stereo_tone(256);

    let control = tokio::task::spawn_blocking(move || {
        for step in 0..=100 {
            handle.set_intensity(1.0 - step as f32 / 100.0);
            handle.set_spatial_width(step as f32 / 100.0);
        }
        handle
    });

    let audio_input = input.clone();
    let audio = tokio::task::spawn_blocking(move || {
        for _ in 0..50 {
            let output = pipeline.process(&audio_input);
            assert!(output.iter().all(|x| x.is_finite()));

            // Every snapshot is internally consistent
            let params = pipeline.parameters();
            assert_eq!(params.distance(), 3.0 + params.intensity() * 7.0);
        }
        pipeline
    });

    let handle = control.await.unwrap();
    let mut pipeline = audio.await.unwrap();

    assert_eq!(handle.parameters().intensity(), 0.0);
    let output = pipeline.process(&input);
    assert!(output.iter().all(|&x| x == 0.0));
    assert_eq!(pipeline.parameters().spatial_width(), 1.0);
}
