//! Integration tests for timbre-analysis.
//!
//! Exercises the full pipeline (parameter selection, spectrogram, descriptor
//! extraction, diffing) through the public API using synthetic signals with
//! known properties.

use std::f32::consts::PI;

use timbre_analysis::{
    OutputKind, StftAnalyzer, align_and_diff, build_spectrogram, extract_features, select_params,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Generate a sine wave at a given frequency and amplitude.
fn sine(freq_hz: f32, sample_rate: f32, num_samples: usize, amplitude: f32) -> Vec<f32> {
    (0..num_samples)
        .map(|i| amplitude * (2.0 * PI * freq_hz * i as f32 / sample_rate).sin())
        .collect()
}

/// Deterministic noise from a xorshift generator.
fn noise(num_samples: usize, seed: u32) -> Vec<f32> {
    let mut state = seed;
    (0..num_samples)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state as i32 as f32) / (i32::MAX as f32)
        })
        .collect()
}

// ===========================================================================
// 1. Single-file analysis pipeline
// ===========================================================================

#[test]
fn pipeline_tone_produces_expected_grid() {
    let sample_rate = 16_000;
    let signal = sine(440.0, sample_rate as f32, 4096, 1.0);

    let params = select_params(signal.len(), sample_rate).unwrap();
    assert_eq!(params.fft_exponent, 12);
    assert_eq!(params.num_bins, 2049);
    assert_eq!(params.slide_length, 1024);

    let spectrogram = build_spectrogram(&signal, &params).unwrap();
    assert_eq!(spectrogram.num_frames, 1);
    assert_eq!(spectrogram.num_bins, 2049);
    assert!(spectrogram.data.iter().flatten().all(|v| v.is_finite()));
}

#[test]
fn pipeline_descriptors_track_signal_character() {
    let sample_rate = 48_000;
    let mut params = select_params(48_000, sample_rate).unwrap();
    params.output = OutputKind::Magnitude;
    let analyzer = StftAnalyzer::new(&params).unwrap();

    let tonal = analyzer.analyze(&sine(1000.0, 48_000.0, 48_000, 0.8));
    let noisy = analyzer.analyze(&noise(48_000, 0x2F6E2B1));

    let tonal_features = extract_features(&tonal).unwrap();
    let noisy_features = extract_features(&noisy).unwrap();

    assert_eq!(tonal_features.len(), tonal.num_frames);
    assert_eq!(noisy_features.len(), noisy.num_frames);

    let mean = |v: &[f32]| v.iter().sum::<f32>() / v.len() as f32;

    // A pure tone is peaky, noise is flat
    assert!(mean(&noisy_features.flatness) > mean(&tonal_features.flatness));
    // Noise spreads energy across bins, so its entropy is higher
    assert!(mean(&noisy_features.entropy) > mean(&tonal_features.entropy));
    // Steady signals produce little novelty after the first frame
    assert_eq!(tonal_features.novelty[0], 0.0);
}

#[test]
fn pipeline_time_axes_agree() {
    let sample_rate = 48_000;
    let signal = noise(30_000, 0xDECAF);
    let params = select_params(signal.len(), sample_rate).unwrap();

    let mut mag_params = params.clone();
    mag_params.output = OutputKind::Magnitude;
    let spectrogram = StftAnalyzer::new(&mag_params).unwrap().analyze(&signal);
    let features = extract_features(&spectrogram).unwrap();

    assert_eq!(spectrogram.times(), features.times());
}

// ===========================================================================
// 2. Two-file comparison pipeline
// ===========================================================================

#[test]
fn compare_same_recording_is_silent() {
    let sample_rate = 48_000;
    let signal = noise(20_000, 0xACE);
    let params = select_params(signal.len(), sample_rate).unwrap();

    let diff = align_and_diff(&signal, &signal, &params, &params).unwrap();

    assert_eq!(diff.audio.len(), signal.len());
    assert!(diff.audio.iter().all(|&v| v == 0.0));
    assert!(diff.spectrogram.data.iter().flatten().all(|&v| v == 0.0));
}

#[test]
fn compare_against_shorter_reference() {
    // A 5-second sample against a 3-second baseline: every output takes the
    // baseline's shape.
    let sample_rate = 16_000;
    let sample = sine(440.0, 16_000.0, 5 * 16_000, 0.8);
    let baseline = noise(3 * 16_000, 0xB0BA);

    let sample_params = select_params(sample.len(), sample_rate).unwrap();
    let baseline_params = select_params(baseline.len(), sample_rate).unwrap();

    let diff = align_and_diff(&sample, &baseline, &sample_params, &baseline_params).unwrap();

    assert_eq!(diff.audio.len(), baseline.len());
    let expected_frames = (baseline.len() - 4096) / 1024 + 1;
    assert_eq!(diff.spectrogram.num_frames, expected_frames);

    // A diff against a different signal is not silent
    assert!(diff.audio.iter().any(|&v| v != 0.0));
}

#[test]
fn compare_is_antisymmetric_end_to_end() {
    let sample_rate = 48_000;
    let a = sine(500.0, 48_000.0, 24_000, 0.7);
    let b = noise(20_000, 0x5EED);
    let pa = select_params(a.len(), sample_rate).unwrap();
    let pb = select_params(b.len(), sample_rate).unwrap();

    let ab = align_and_diff(&a, &b, &pa, &pb).unwrap();
    let ba = align_and_diff(&b, &a, &pb, &pa).unwrap();

    for (x, y) in ab.audio.iter().zip(&ba.audio) {
        assert_eq!(*x, -*y);
    }
    for (fa, fb) in ab.spectrogram.data.iter().zip(&ba.spectrogram.data) {
        for (x, y) in fa.iter().zip(fb) {
            assert_eq!(*x, -*y);
        }
    }
}
