//! Per-frame spectral descriptors.
//!
//! All descriptors operate on the linear magnitude (or power) grid produced
//! by [`StftAnalyzer::analyze`](crate::spectrogram::StftAnalyzer::analyze),
//! not on dB values. [`extract_features`] computes the five series in one
//! pass; the per-frame functions are public for callers that only need one.

use crate::spectrogram::Spectrogram;
use crate::{AnalysisError, Result};

/// One descriptor value per spectrogram frame, five descriptors per run.
///
/// Every series has the same length as the source spectrogram's frame count
/// and shares its time axis.
#[derive(Debug, Clone, Default)]
pub struct FeatureSeries {
    /// Geometric-to-arithmetic mean ratio per frame, in `[0, 1]`.
    pub flatness: Vec<f32>,
    /// Positive spectral difference against the previous frame; 0 for the
    /// first frame.
    pub novelty: Vec<f32>,
    /// Shannon entropy of the sum-normalized frame.
    pub entropy: Vec<f32>,
    /// Root mean square of the frame.
    pub rms: Vec<f32>,
    /// Least-squares slope of value against bin index.
    pub slope: Vec<f32>,
    slide_length: usize,
    sample_rate: u32,
}

impl FeatureSeries {
    /// Number of frames covered by each series.
    pub fn len(&self) -> usize {
        self.flatness.len()
    }

    /// True when no frames were analyzed.
    pub fn is_empty(&self) -> bool {
        self.flatness.is_empty()
    }

    /// Time axis shared by all five series, in seconds.
    pub fn times(&self) -> Vec<f32> {
        (0..self.len())
            .map(|f| f as f32 * self.slide_length as f32 / self.sample_rate as f32)
            .collect()
    }
}

/// Spectral flatness of one frame: geometric mean over arithmetic mean.
///
/// 1 for a flat (noise-like) spectrum, near 0 for a peaky (tonal) one.
/// All-zero frames report 0.
pub fn spectral_flatness(frame: &[f32]) -> f32 {
    if frame.is_empty() {
        return 0.0;
    }
    let n = frame.len() as f32;

    let log_sum: f32 = frame.iter().map(|&v| v.max(1e-10).ln()).sum();
    let geometric_mean = (log_sum / n).exp();
    let arithmetic_mean = frame.iter().sum::<f32>() / n;

    if arithmetic_mean > 1e-10 {
        (geometric_mean / arithmetic_mean).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Shannon entropy of one frame normalized to a probability distribution.
///
/// 0 when a single bin carries all the energy (and for all-zero frames),
/// `ln(num_bins)` for a perfectly uniform spectrum.
pub fn spectral_entropy(frame: &[f32]) -> f32 {
    let total: f32 = frame.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }

    frame
        .iter()
        .filter(|&&v| v > 0.0)
        .map(|&v| {
            let p = v / total;
            -p * p.ln()
        })
        .sum()
}

/// Root mean square of one frame.
pub fn frame_rms(frame: &[f32]) -> f32 {
    if frame.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = frame.iter().map(|&v| v * v).sum();
    (sum_sq / frame.len() as f32).sqrt()
}

/// Least-squares slope of value against bin index.
///
/// Positive when energy is skewed toward high frequencies.
pub fn spectral_slope(frame: &[f32]) -> f32 {
    let n = frame.len();
    if n < 2 {
        return 0.0;
    }

    let nf = n as f32;
    let mean_x = (nf - 1.0) / 2.0;
    let mean_y = frame.iter().sum::<f32>() / nf;

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (i, &v) in frame.iter().enumerate() {
        let dx = i as f32 - mean_x;
        numerator += dx * (v - mean_y);
        denominator += dx * dx;
    }

    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Positive spectral difference between two consecutive frames.
///
/// Only bins that grew contribute, so onsets register and decays do not.
pub fn spectral_flux(prev: &[f32], curr: &[f32]) -> f32 {
    prev.iter()
        .zip(curr.iter())
        .map(|(&p, &c)| {
            let diff = c - p;
            if diff > 0.0 { diff * diff } else { 0.0 }
        })
        .sum::<f32>()
        .sqrt()
}

/// Compute all five descriptor series for a spectrogram.
///
/// # Errors
/// [`AnalysisError::ShapeMismatch`] when a frame's bin count disagrees with
/// the spectrogram header; that indicates a construction bug in the caller.
pub fn extract_features(spectrogram: &Spectrogram) -> Result<FeatureSeries> {
    let num_frames = spectrogram.num_frames;
    let mut series = FeatureSeries {
        flatness: Vec::with_capacity(num_frames),
        novelty: Vec::with_capacity(num_frames),
        entropy: Vec::with_capacity(num_frames),
        rms: Vec::with_capacity(num_frames),
        slope: Vec::with_capacity(num_frames),
        slide_length: spectrogram.slide_length,
        sample_rate: spectrogram.sample_rate,
    };

    let mut prev: Option<&[f32]> = None;
    for (idx, frame) in spectrogram.data.iter().enumerate() {
        if frame.len() != spectrogram.num_bins {
            return Err(AnalysisError::ShapeMismatch(format!(
                "frame {} has {} bins, spectrogram header says {}",
                idx,
                frame.len(),
                spectrogram.num_bins
            )));
        }

        series.flatness.push(spectral_flatness(frame));
        series.entropy.push(spectral_entropy(frame));
        series.rms.push(frame_rms(frame));
        series.slope.push(spectral_slope(frame));
        series.novelty.push(match prev {
            Some(p) => spectral_flux(p, frame),
            None => 0.0,
        });

        prev = Some(frame);
    }

    Ok(series)
}
