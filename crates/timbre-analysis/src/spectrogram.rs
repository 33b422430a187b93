//! STFT spectrogram construction and decibel scaling.
//!
//! [`StftAnalyzer`] turns a signal into the raw time-frequency grid described
//! by its [`TransformParams`]; [`build_spectrogram`] is the one-call pipeline
//! that also converts the grid to decibels.

use crate::fft::Fft;
use crate::params::{MIN_SIGNAL_LEN, OutputKind, TransformParams};
use crate::{AnalysisError, Result};

/// Floor applied before `log10` so silent bins map to a finite dB value
/// instead of negative infinity. Fixed so results are reproducible.
pub const DB_EPSILON: f32 = 1e-10;

/// Convert a power value to decibels (`10 * log10`, floored at
/// [`DB_EPSILON`]).
pub fn power_to_db(power: f32) -> f32 {
    10.0 * power.max(DB_EPSILON).log10()
}

/// Convert a magnitude value to decibels (`20 * log10`, floored at
/// [`DB_EPSILON`]).
pub fn magnitude_to_db(magnitude: f32) -> f32 {
    20.0 * magnitude.max(DB_EPSILON).log10()
}

/// Spectrogram data structure
#[derive(Debug, Clone)]
pub struct Spectrogram {
    /// 2D grid `[time_frame][frequency_bin]`
    pub data: Vec<Vec<f32>>,
    /// Window size used by the transform
    pub window_size: usize,
    /// Hop between frames in samples
    pub slide_length: usize,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of time frames
    pub num_frames: usize,
    /// Number of frequency bins (window_size / 2 + 1)
    pub num_bins: usize,
    /// Scale of the stored values before dB conversion
    pub output: OutputKind,
}

impl Spectrogram {
    /// Get frequency in Hz for a given bin index
    pub fn bin_to_freq(&self, bin: usize) -> f32 {
        bin as f32 * self.sample_rate as f32 / self.window_size as f32
    }

    /// Get time in seconds for a given frame index
    pub fn frame_to_time(&self, frame: usize) -> f32 {
        frame as f32 * self.slide_length as f32 / self.sample_rate as f32
    }

    /// Time axis for all frames, in seconds.
    pub fn times(&self) -> Vec<f32> {
        (0..self.num_frames).map(|f| self.frame_to_time(f)).collect()
    }

    /// Get value at a specific frame and bin, or `None` if out of bounds
    pub fn get(&self, frame: usize, bin: usize) -> Option<f32> {
        self.data.get(frame).and_then(|f| f.get(bin)).copied()
    }

    /// Get the spectrum for a specific time frame
    pub fn get_frame(&self, frame: usize) -> Option<&[f32]> {
        self.data.get(frame).map(|v| v.as_slice())
    }

    /// Convert the grid to decibels.
    ///
    /// Power values map through [`power_to_db`], magnitudes through
    /// [`magnitude_to_db`]. Both mappings are monotonic and produce finite
    /// values for every non-negative input. Apply once; the result stores dB.
    pub fn to_db(&self) -> Spectrogram {
        let convert = match self.output {
            OutputKind::Power => power_to_db,
            OutputKind::Magnitude => magnitude_to_db,
        };
        let data = self
            .data
            .iter()
            .map(|frame| frame.iter().map(|&v| convert(v)).collect())
            .collect();

        Spectrogram {
            data,
            window_size: self.window_size,
            slide_length: self.slide_length,
            sample_rate: self.sample_rate,
            num_frames: self.num_frames,
            num_bins: self.num_bins,
            output: self.output,
        }
    }
}

/// STFT (Short-Time Fourier Transform) analyzer
///
/// Holds the FFT plan and window coefficients for one parameter set.
pub struct StftAnalyzer {
    params: TransformParams,
    fft: Fft,
    window_coeffs: Vec<f32>,
}

impl StftAnalyzer {
    /// Create an analyzer for the given parameters.
    ///
    /// # Errors
    /// [`AnalysisError::Transform`] when the parameter invariants do not
    /// hold (see [`TransformParams::validate`]).
    pub fn new(params: &TransformParams) -> Result<Self> {
        params.validate()?;
        let window_size = params.window_size();
        Ok(Self {
            params: params.clone(),
            fft: Fft::new(window_size),
            window_coeffs: params.window.coefficients(window_size),
        })
    }

    /// The parameters this analyzer was built from.
    pub fn params(&self) -> &TransformParams {
        &self.params
    }

    /// Compute the raw (linear-valued) spectrogram of a signal.
    ///
    /// Frame count is `(len - window_size) / slide_length + 1`, or zero when
    /// the signal is shorter than one window. Every frame holds
    /// `num_bins` non-negative values in the scale selected by
    /// `params.output`.
    pub fn analyze(&self, signal: &[f32]) -> Spectrogram {
        let window_size = self.params.window_size();
        let hop = self.params.slide_length;

        let num_frames = if signal.len() >= window_size {
            (signal.len() - window_size) / hop + 1
        } else {
            0
        };

        let mut data = Vec::with_capacity(num_frames);
        for frame_idx in 0..num_frames {
            let start = frame_idx * hop;
            let mut frame: Vec<f32> = signal[start..start + window_size].to_vec();

            for (sample, &coeff) in frame.iter_mut().zip(self.window_coeffs.iter()) {
                *sample *= coeff;
            }

            let spectrum = self.fft.forward(&frame);
            let values: Vec<f32> = match self.params.output {
                OutputKind::Power => spectrum.iter().map(|c| c.norm_sqr()).collect(),
                OutputKind::Magnitude => spectrum.iter().map(|c| c.norm()).collect(),
            };
            data.push(values);
        }

        Spectrogram {
            data,
            window_size,
            slide_length: hop,
            sample_rate: self.params.sample_rate,
            num_frames,
            num_bins: self.params.num_bins,
            output: self.params.output,
        }
    }
}

/// Build a decibel-scaled spectrogram in one call.
///
/// Runs the transform and converts the resulting grid to dB. This is the
/// standard pipeline entry point; use [`StftAnalyzer`] directly when the
/// linear-valued grid is needed (e.g. for descriptor extraction).
///
/// # Errors
/// [`AnalysisError::InvalidSignal`] for an empty signal,
/// [`AnalysisError::Transform`] for inconsistent parameters.
pub fn build_spectrogram(signal: &[f32], params: &TransformParams) -> Result<Spectrogram> {
    if signal.is_empty() {
        return Err(AnalysisError::InvalidSignal {
            len: 0,
            min: MIN_SIGNAL_LEN,
        });
    }
    let analyzer = StftAnalyzer::new(params)?;
    Ok(analyzer.analyze(signal).to_db())
}
