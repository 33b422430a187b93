//! Transform parameters and adaptive parameter selection.
//!
//! The STFT window size is expressed as a power-of-two exponent. For a given
//! exponent `e`, the derived quantities are fixed:
//!
//! - window size `2^e`
//! - frequency bins `2^(e-1) + 1` (DC to Nyquist for a real transform)
//! - slide length `2^(e-2)` (75% overlap between successive windows)
//!
//! [`select_params`] derives the exponent from the signal length so that the
//! window never exceeds the available samples, capped at [`MAX_FFT_EXPONENT`]
//! for long signals.

use crate::fft::Window;
use crate::{AnalysisError, Result};

/// Largest allowed FFT exponent. Windows are capped at 2^12 = 4096 samples.
pub const MAX_FFT_EXPONENT: u32 = 12;

/// Smallest allowed FFT exponent. Below 2^2 the slide length degenerates.
pub const MIN_FFT_EXPONENT: u32 = 2;

/// Shortest signal the selector accepts (one window at the minimum exponent).
pub const MIN_SIGNAL_LEN: usize = 1 << MIN_FFT_EXPONENT;

/// Frequency-axis scale of the transform output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleKind {
    /// Linearly spaced bins, one per FFT bin.
    #[default]
    Linear,
}

/// Scale of the values produced by the transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputKind {
    /// Squared magnitude per bin.
    #[default]
    Power,
    /// Magnitude (absolute value) per bin.
    Magnitude,
}

/// Parameters of one short-time transform run.
///
/// Construct through [`select_params`], [`TransformParams::from_exponent`] or
/// [`TransformParams::reference`]; the derived fields (`num_bins`,
/// `slide_length`) must stay consistent with `fft_exponent` and are checked
/// by [`TransformParams::validate`] before the transform runs.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformParams {
    /// Window size as a power-of-two exponent (window = 2^fft_exponent).
    pub fft_exponent: u32,
    /// Number of frequency bins per frame, `2^(fft_exponent-1) + 1`.
    pub num_bins: usize,
    /// Hop between successive windows in samples, `2^(fft_exponent-2)`.
    pub slide_length: usize,
    /// Sample rate of the analyzed signal in Hz.
    pub sample_rate: u32,
    /// Lower edge of the analyzed band in Hz.
    pub low_freq: f32,
    /// Upper edge of the analyzed band in Hz.
    pub high_freq: f32,
    /// Window function applied to each frame.
    pub window: Window,
    /// Frequency-axis scale.
    pub scale: ScaleKind,
    /// Value scale of the raw transform output.
    pub output: OutputKind,
}

impl TransformParams {
    /// Build params for a fixed window exponent.
    ///
    /// # Panics
    /// Panics in debug builds when `fft_exponent` is outside
    /// [`MIN_FFT_EXPONENT`]..=[`MAX_FFT_EXPONENT`].
    pub fn from_exponent(fft_exponent: u32, sample_rate: u32) -> Self {
        debug_assert!(
            (MIN_FFT_EXPONENT..=MAX_FFT_EXPONENT).contains(&fft_exponent),
            "fft exponent {fft_exponent} out of range"
        );
        Self {
            fft_exponent,
            num_bins: (1 << (fft_exponent - 1)) + 1,
            slide_length: 1 << (fft_exponent - 2),
            sample_rate,
            low_freq: 0.0,
            high_freq: 20_000.0,
            window: Window::Hann,
            scale: ScaleKind::Linear,
            output: OutputKind::Power,
        }
    }

    /// The fixed reference configuration used for baseline comparisons:
    /// 4096-sample Hann window, 2049 bins, 1024-sample hop, 0-20 kHz, power
    /// output.
    pub fn reference(sample_rate: u32) -> Self {
        Self::from_exponent(MAX_FFT_EXPONENT, sample_rate)
    }

    /// Window size in samples (2^fft_exponent).
    pub fn window_size(&self) -> usize {
        1 << self.fft_exponent
    }

    /// Check the internal invariants.
    ///
    /// Returns [`AnalysisError::Transform`] when the derived fields do not
    /// match the exponent; such params would produce a grid with an
    /// inconsistent shape.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_FFT_EXPONENT..=MAX_FFT_EXPONENT).contains(&self.fft_exponent) {
            return Err(AnalysisError::Transform(format!(
                "fft exponent {} outside {}..={}",
                self.fft_exponent, MIN_FFT_EXPONENT, MAX_FFT_EXPONENT
            )));
        }
        let expected_bins = (1usize << (self.fft_exponent - 1)) + 1;
        if self.num_bins != expected_bins {
            return Err(AnalysisError::Transform(format!(
                "num_bins {} does not match exponent {} (expected {})",
                self.num_bins, self.fft_exponent, expected_bins
            )));
        }
        let expected_slide = 1usize << (self.fft_exponent - 2);
        if self.slide_length != expected_slide {
            return Err(AnalysisError::Transform(format!(
                "slide_length {} does not match exponent {} (expected {})",
                self.slide_length, self.fft_exponent, expected_slide
            )));
        }
        Ok(())
    }
}

/// Derive transform parameters from the signal length.
///
/// The exponent is `floor(log2(len))` capped at [`MAX_FFT_EXPONENT`], so the
/// window never exceeds the available samples and never grows past 4096.
///
/// # Errors
/// [`AnalysisError::InvalidSignal`] when the signal is shorter than
/// [`MIN_SIGNAL_LEN`] samples.
pub fn select_params(signal_len: usize, sample_rate: u32) -> Result<TransformParams> {
    if signal_len < MIN_SIGNAL_LEN {
        return Err(AnalysisError::InvalidSignal {
            len: signal_len,
            min: MIN_SIGNAL_LEN,
        });
    }
    let raw_exponent = signal_len.ilog2();
    Ok(TransformParams::from_exponent(
        raw_exponent.min(MAX_FFT_EXPONENT),
        sample_rate,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_configuration() {
        // 4096 samples at 16 kHz: the fixed baseline setup
        let params = select_params(4096, 16_000).unwrap();
        assert_eq!(params.fft_exponent, 12);
        assert_eq!(params.num_bins, 2049);
        assert_eq!(params.slide_length, 1024);
        assert_eq!(params, TransformParams::reference(16_000));
    }

    #[test]
    fn test_short_signal() {
        // 64 <= 100 < 128, so the exponent must floor to 6
        let params = select_params(100, 48_000).unwrap();
        assert_eq!(params.fft_exponent, 6);
        assert_eq!(params.num_bins, 33);
        assert_eq!(params.slide_length, 16);
    }

    #[test]
    fn test_power_of_two_boundary() {
        // Exactly a power of two vs one sample short of it
        assert_eq!(select_params(128, 48_000).unwrap().fft_exponent, 7);
        assert_eq!(select_params(127, 48_000).unwrap().fft_exponent, 6);
    }

    #[test]
    fn test_long_signal_caps_at_ceiling() {
        let params = select_params(10 * 48_000, 48_000).unwrap();
        assert_eq!(params.fft_exponent, MAX_FFT_EXPONENT);
        assert_eq!(params.window_size(), 4096);
    }

    #[test]
    fn test_too_short_signal_rejected() {
        for len in 0..MIN_SIGNAL_LEN {
            assert!(matches!(
                select_params(len, 48_000),
                Err(AnalysisError::InvalidSignal { .. })
            ));
        }
        assert!(select_params(MIN_SIGNAL_LEN, 48_000).is_ok());
    }

    #[test]
    fn test_validate_catches_inconsistent_bins() {
        let mut params = TransformParams::from_exponent(10, 48_000);
        assert!(params.validate().is_ok());

        params.num_bins = 512;
        assert!(matches!(
            params.validate(),
            Err(AnalysisError::Transform(_))
        ));
    }
}
