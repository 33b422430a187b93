//! A/B comparison of a recording against a reference.

use crate::commands::common::{CliWindow, resolve_params};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use timbre_analysis::compare::{
    diff_signals, diff_spectrograms, mse, rmse, snr_db, spectral_correlation,
};
use timbre_analysis::build_spectrogram;
use timbre_io::read_wav;

#[derive(Args)]
pub struct CompareArgs {
    /// Input WAV file to evaluate
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Reference WAV file (e.g., a pink-noise baseline)
    #[arg(value_name = "REFERENCE")]
    reference: PathBuf,

    /// Pin the window size to 2^N instead of deriving it per signal
    #[arg(long, value_name = "N")]
    fft_exponent: Option<u32>,

    /// Window function
    #[arg(long, value_enum, default_value = "hann")]
    window: CliWindow,

    /// Write a JSON report
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
}

#[derive(Serialize)]
struct CompareReport {
    input: String,
    reference: String,
    sample_rate: u32,
    compared_samples: usize,
    compared_frames: usize,
    num_bins: usize,
    audio: AudioMetrics,
    spectral: SpectralMetrics,
    match_quality: String,
}

#[derive(Serialize)]
struct AudioMetrics {
    mse: f32,
    rmse: f32,
    snr_db: f32,
    diff_peak: f32,
}

#[derive(Serialize)]
struct SpectralMetrics {
    correlation: f32,
    mean_abs_diff_db: f32,
    max_abs_diff_db: f32,
}

pub fn run(args: CompareArgs) -> anyhow::Result<()> {
    println!("A/B Comparison");
    println!("==============");
    println!("  Input:     {}", args.input.display());
    println!("  Reference: {}", args.reference.display());
    println!();

    let (input_samples, input_spec) = read_wav(&args.input)?;
    let (ref_samples, ref_spec) = read_wav(&args.reference)?;

    if input_spec.sample_rate != ref_spec.sample_rate {
        anyhow::bail!(
            "Sample rate mismatch: {} vs {}",
            input_spec.sample_rate,
            ref_spec.sample_rate
        );
    }
    let sample_rate = input_spec.sample_rate;

    let input_params = resolve_params(
        input_samples.len(),
        sample_rate,
        args.fft_exponent,
        args.window,
    )?;
    let ref_params = resolve_params(
        ref_samples.len(),
        sample_rate,
        args.fft_exponent,
        args.window,
    )?;

    let input_spec_db = build_spectrogram(&input_samples, &input_params)?;
    let ref_spec_db = build_spectrogram(&ref_samples, &ref_params)?;

    // Truncate-to-shorter policy, applied to samples and frames independently
    let audio_diff = diff_signals(&input_samples, &ref_samples);
    let spec_diff = diff_spectrograms(&input_spec_db, &ref_spec_db)?;

    println!(
        "Comparing {} samples ({:.2}s at {} Hz), {} frames",
        audio_diff.len(),
        audio_diff.len() as f32 / sample_rate as f32,
        sample_rate,
        spec_diff.num_frames
    );
    println!();

    let mse_val = mse(&input_samples, &ref_samples);
    let rmse_val = rmse(&input_samples, &ref_samples);
    let snr_val = snr_db(&ref_samples, &input_samples);
    let diff_peak = audio_diff.iter().fold(0.0f32, |acc, &v| acc.max(v.abs()));

    println!("Audio Metrics");
    println!("-------------");
    println!("  MSE:       {:.6}", mse_val);
    println!("  RMSE:      {:.6}", rmse_val);
    println!("  SNR:       {:.1} dB", snr_val);
    println!("  Diff peak: {:.6}", diff_peak);
    println!();

    let correlation = spectral_correlation(&input_spec_db, &ref_spec_db);
    let diff_values = spec_diff.data.iter().flatten().copied();
    let (mut abs_sum, mut abs_max, mut count) = (0.0f64, 0.0f32, 0usize);
    for v in diff_values {
        abs_sum += f64::from(v.abs());
        abs_max = abs_max.max(v.abs());
        count += 1;
    }
    let mean_abs_diff = if count > 0 {
        (abs_sum / count as f64) as f32
    } else {
        0.0
    };

    println!("Spectral Metrics");
    println!("----------------");
    println!("  Correlation:       {:.4}", correlation);
    println!("  Mean |diff|:       {:.2} dB", mean_abs_diff);
    println!("  Max  |diff|:       {:.2} dB", abs_max);
    println!();

    let match_quality = if correlation > 0.99 && snr_val > 40.0 {
        "Excellent"
    } else if correlation > 0.95 && snr_val > 30.0 {
        "Good"
    } else if correlation > 0.90 && snr_val > 20.0 {
        "Fair"
    } else {
        "Poor"
    };

    println!("Summary");
    println!("-------");
    println!("  Match quality: {}", match_quality);

    if let Some(path) = &args.output {
        let report = CompareReport {
            input: args.input.to_string_lossy().into_owned(),
            reference: args.reference.to_string_lossy().into_owned(),
            sample_rate,
            compared_samples: audio_diff.len(),
            compared_frames: spec_diff.num_frames,
            num_bins: spec_diff.num_bins,
            audio: AudioMetrics {
                mse: mse_val,
                rmse: rmse_val,
                snr_db: snr_val,
                diff_peak,
            },
            spectral: SpectralMetrics {
                correlation,
                mean_abs_diff_db: mean_abs_diff,
                max_abs_diff_db: abs_max,
            },
            match_quality: match_quality.to_string(),
        };
        std::fs::write(path, serde_json::to_string_pretty(&report)?)?;
        println!("\nWrote report to {}", path.display());
    }

    Ok(())
}
