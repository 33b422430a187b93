//! Single-file spectral analysis command.

use crate::commands::common::{CliWindow, resolve_params};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use timbre_analysis::export::{
    export_features_csv, export_spectrogram_csv, export_spectrogram_pgm,
};
use timbre_analysis::{FeatureSeries, OutputKind, StftAnalyzer, extract_features};
use timbre_io::read_wav;

/// Dynamic range used when rendering spectrogram images.
const PGM_DB_RANGE: f32 = 80.0;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Also extract per-frame spectral descriptors
    #[arg(long)]
    features: bool,

    /// Pin the window size to 2^N instead of deriving it from the signal
    #[arg(long, value_name = "N")]
    fft_exponent: Option<u32>,

    /// Window function
    #[arg(long, value_enum, default_value = "hann")]
    window: CliWindow,

    /// Write the dB spectrogram as CSV
    #[arg(long, value_name = "PATH")]
    spectrogram_csv: Option<PathBuf>,

    /// Write the dB spectrogram as a PGM image
    #[arg(long, value_name = "PATH")]
    spectrogram_pgm: Option<PathBuf>,

    /// Write the descriptor series as CSV
    #[arg(long, value_name = "PATH")]
    features_csv: Option<PathBuf>,

    /// Write a JSON report
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
}

#[derive(Serialize)]
struct AnalyzeReport {
    input: String,
    sample_rate: u32,
    length_samples: usize,
    duration_seconds: f32,
    fft_exponent: u32,
    window_size: usize,
    slide_length: usize,
    num_frames: usize,
    num_bins: usize,
    db_min: f32,
    db_max: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    features: Option<FeatureReport>,
}

#[derive(Serialize)]
struct FeatureReport {
    times: Vec<f32>,
    flatness: Vec<f32>,
    novelty: Vec<f32>,
    entropy: Vec<f32>,
    rms: Vec<f32>,
    slope: Vec<f32>,
}

impl From<&FeatureSeries> for FeatureReport {
    fn from(features: &FeatureSeries) -> Self {
        Self {
            times: features.times(),
            flatness: features.flatness.clone(),
            novelty: features.novelty.clone(),
            entropy: features.entropy.clone(),
            rms: features.rms.clone(),
            slope: features.slope.clone(),
        }
    }
}

pub fn run(args: AnalyzeArgs) -> anyhow::Result<()> {
    println!("Analyzing {}...", args.input.display());

    let (samples, spec) = read_wav(&args.input)?;
    if samples.is_empty() {
        anyhow::bail!("{} contains no samples", args.input.display());
    }

    let sample_rate = spec.sample_rate;
    println!(
        "  {} samples, {} Hz, {:.2}s",
        samples.len(),
        sample_rate,
        samples.len() as f32 / sample_rate as f32
    );

    let mut params = resolve_params(samples.len(), sample_rate, args.fft_exponent, args.window)?;
    // Descriptors read the linear magnitude grid; dB conversion comes after
    params.output = OutputKind::Magnitude;
    tracing::info!(
        fft_exponent = params.fft_exponent,
        slide_length = params.slide_length,
        "transform parameters"
    );

    let analyzer = StftAnalyzer::new(&params)?;
    let magnitudes = analyzer.analyze(&samples);
    let spectrogram_db = magnitudes.to_db();

    let (mut db_min, mut db_max) = (f32::INFINITY, f32::NEG_INFINITY);
    for &v in spectrogram_db.data.iter().flatten() {
        db_min = db_min.min(v);
        db_max = db_max.max(v);
    }

    println!(
        "  window 2^{} = {} samples, hop {} samples",
        params.fft_exponent,
        params.window_size(),
        params.slide_length
    );
    println!(
        "  {} frames x {} bins, {:.1} dB to {:.1} dB",
        spectrogram_db.num_frames, spectrogram_db.num_bins, db_min, db_max
    );

    let features = if args.features || args.features_csv.is_some() {
        let series = extract_features(&magnitudes)?;
        print_feature_summary(&series);
        Some(series)
    } else {
        None
    };

    if let Some(path) = &args.spectrogram_csv {
        export_spectrogram_csv(&spectrogram_db, path)?;
        println!("Wrote spectrogram to {}", path.display());
    }
    if let Some(path) = &args.spectrogram_pgm {
        export_spectrogram_pgm(&spectrogram_db, path, PGM_DB_RANGE)?;
        println!("Wrote spectrogram image to {}", path.display());
    }
    if let (Some(path), Some(series)) = (&args.features_csv, &features) {
        export_features_csv(series, path)?;
        println!("Wrote descriptors to {}", path.display());
    }

    if let Some(path) = &args.output {
        let report = AnalyzeReport {
            input: args.input.to_string_lossy().into_owned(),
            sample_rate,
            length_samples: samples.len(),
            duration_seconds: samples.len() as f32 / sample_rate as f32,
            fft_exponent: params.fft_exponent,
            window_size: params.window_size(),
            slide_length: params.slide_length,
            num_frames: spectrogram_db.num_frames,
            num_bins: spectrogram_db.num_bins,
            db_min,
            db_max,
            features: features.as_ref().map(FeatureReport::from),
        };
        std::fs::write(path, serde_json::to_string_pretty(&report)?)?;
        println!("Wrote report to {}", path.display());
    }

    Ok(())
}

fn print_feature_summary(features: &FeatureSeries) {
    let mean = |v: &[f32]| {
        if v.is_empty() {
            0.0
        } else {
            v.iter().sum::<f32>() / v.len() as f32
        }
    };

    println!("\nDescriptor means over {} frames:", features.len());
    println!("  flatness: {:.4}", mean(&features.flatness));
    println!("  novelty:  {:.4}", mean(&features.novelty));
    println!("  entropy:  {:.4}", mean(&features.entropy));
    println!("  rms:      {:.4}", mean(&features.rms));
    println!("  slope:    {:.6}", mean(&features.slope));
}
