//! Alignment and differencing of two recordings.
//!
//! Comparisons are always made at the shorter input's resolution: the longer
//! signal (or spectrogram frame axis) is truncated, never the shorter one
//! padded, so the diff contains no synthetic content. Audio and spectrogram
//! truncation are applied independently; when the two recordings use
//! different transform parameters their frame-to-sample ratios differ and
//! the two cuts need not cover the same time span.

use crate::params::TransformParams;
use crate::spectrogram::{Spectrogram, build_spectrogram};
use crate::{AnalysisError, Result};

/// Element-wise difference of two recordings, audio and spectrogram.
#[derive(Debug, Clone)]
pub struct AlignedDiff {
    /// Sample-wise `a - b`, truncated to the shorter signal.
    pub audio: Vec<f32>,
    /// Frame-wise `a - b` of the dB spectrograms, truncated to the shorter
    /// frame axis.
    pub spectrogram: Spectrogram,
}

/// Sample-wise difference truncated to the shorter signal.
///
/// Antisymmetric: swapping the arguments negates every element.
pub fn diff_signals(a: &[f32], b: &[f32]) -> Vec<f32> {
    let len = a.len().min(b.len());
    a[..len]
        .iter()
        .zip(&b[..len])
        .map(|(x, y)| x - y)
        .collect()
}

/// Frame-wise difference of two spectrograms.
///
/// The longer frame axis is truncated to the shorter one; the frequency axis
/// must already agree.
///
/// # Errors
/// [`AnalysisError::ShapeMismatch`] when the bin counts differ; the frame
/// axis is the only axis the truncation policy covers.
pub fn diff_spectrograms(a: &Spectrogram, b: &Spectrogram) -> Result<Spectrogram> {
    if a.num_bins != b.num_bins {
        return Err(AnalysisError::ShapeMismatch(format!(
            "spectrograms have {} and {} frequency bins",
            a.num_bins, b.num_bins
        )));
    }

    let num_frames = a.num_frames.min(b.num_frames);
    let shorter = if b.num_frames < a.num_frames { b } else { a };

    let data: Vec<Vec<f32>> = (0..num_frames)
        .map(|f| {
            a.data[f]
                .iter()
                .zip(&b.data[f])
                .map(|(x, y)| x - y)
                .collect()
        })
        .collect();

    Ok(Spectrogram {
        data,
        window_size: shorter.window_size,
        slide_length: shorter.slide_length,
        sample_rate: shorter.sample_rate,
        num_frames,
        num_bins: shorter.num_bins,
        output: shorter.output,
    })
}

/// Align two recordings and compute both diffs.
///
/// Builds a dB spectrogram per signal with its own parameters, then applies
/// the truncate-to-shorter policy to the audio (sample axis) and the
/// spectrograms (frame axis) independently.
///
/// # Errors
/// Anything [`build_spectrogram`] reports, plus
/// [`AnalysisError::ShapeMismatch`] when the two parameter sets disagree on
/// bin count.
pub fn align_and_diff(
    signal_a: &[f32],
    signal_b: &[f32],
    params_a: &TransformParams,
    params_b: &TransformParams,
) -> Result<AlignedDiff> {
    let spec_a = build_spectrogram(signal_a, params_a)?;
    let spec_b = build_spectrogram(signal_b, params_b)?;

    Ok(AlignedDiff {
        audio: diff_signals(signal_a, signal_b),
        spectrogram: diff_spectrograms(&spec_a, &spec_b)?,
    })
}

/// Mean squared error over the overlapping prefix of two signals.
pub fn mse(a: &[f32], b: &[f32]) -> f32 {
    let len = a.len().min(b.len());
    if len == 0 {
        return 0.0;
    }
    let sum: f32 = a[..len]
        .iter()
        .zip(&b[..len])
        .map(|(x, y)| (x - y).powi(2))
        .sum();
    sum / len as f32
}

/// Root mean squared error over the overlapping prefix of two signals.
pub fn rmse(a: &[f32], b: &[f32]) -> f32 {
    mse(a, b).sqrt()
}

/// Signal-to-noise ratio in dB, treating `test` as a degraded `reference`.
pub fn snr_db(reference: &[f32], test: &[f32]) -> f32 {
    let len = reference.len().min(test.len());
    if len == 0 {
        return 0.0;
    }

    let signal_power: f32 = reference[..len].iter().map(|x| x.powi(2)).sum();
    let noise_power: f32 = reference[..len]
        .iter()
        .zip(&test[..len])
        .map(|(r, t)| (r - t).powi(2))
        .sum();

    if noise_power > 1e-10 {
        10.0 * (signal_power / noise_power).log10()
    } else {
        f32::INFINITY
    }
}

/// Pearson correlation between two spectrogram grids over their aligned
/// frames.
///
/// Returns a value in `[-1, 1]`; 1 means the aligned grids match up to an
/// affine scale. Degenerate inputs (bin-count mismatch, no overlap, constant
/// grids) report 0.
pub fn spectral_correlation(a: &Spectrogram, b: &Spectrogram) -> f32 {
    if a.num_bins != b.num_bins {
        return 0.0;
    }
    let num_frames = a.num_frames.min(b.num_frames);
    let count = num_frames * a.num_bins;
    if count == 0 {
        return 0.0;
    }

    let sum = |s: &Spectrogram| -> f32 {
        s.data[..num_frames]
            .iter()
            .flat_map(|frame| frame.iter())
            .sum()
    };
    let mean_a = sum(a) / count as f32;
    let mean_b = sum(b) / count as f32;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for f in 0..num_frames {
        for (x, y) in a.data[f].iter().zip(&b.data[f]) {
            let dx = x - mean_a;
            let dy = y - mean_b;
            cov += dx * dy;
            var_a += dx * dx;
            var_b += dy * dy;
        }
    }

    if var_a > 1e-10 && var_b > 1e-10 {
        cov / (var_a.sqrt() * var_b.sqrt())
    } else {
        0.0
    }
}
