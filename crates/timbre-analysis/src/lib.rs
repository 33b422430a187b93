//! Timbre Analysis - spectral analysis core
//!
//! This crate turns audio signals into decibel-scaled spectrograms, computes
//! per-frame spectral descriptors, and diffs two recordings against each
//! other:
//!
//! - [`params`] - transform parameters and adaptive selection from signal
//!   length
//! - [`fft`] - FFT wrapper with windowing functions
//! - [`spectrogram`] - STFT-based time-frequency analysis and dB scaling
//! - [`features`] - per-frame descriptors (flatness, novelty, entropy, rms,
//!   slope)
//! - [`compare`] - alignment and differencing of two recordings
//! - [`export`] - CSV/PGM export for external visualization
//!
//! ## Example workflow
//!
//! ```rust,ignore
//! use timbre_analysis::{select_params, build_spectrogram, extract_features};
//!
//! // 1. Derive transform parameters from the signal
//! let params = select_params(signal.len(), sample_rate)?;
//!
//! // 2. Build the dB spectrogram
//! let spectrogram = build_spectrogram(&signal, &params)?;
//!
//! // 3. Compare against a reference recording
//! let diff = timbre_analysis::align_and_diff(&signal, &reference, &params, &ref_params)?;
//! ```
//!
//! Every operation is a pure function of its inputs: the same signal and
//! parameters always produce the same grid, so no component retries and all
//! failures surface as [`AnalysisError`] values.

pub mod compare;
pub mod export;
pub mod features;
pub mod fft;
pub mod params;
pub mod spectrogram;

// Re-export main types
pub use compare::{AlignedDiff, align_and_diff, diff_signals, diff_spectrograms};
pub use features::{FeatureSeries, extract_features};
pub use fft::{Fft, Window};
pub use params::{
    MAX_FFT_EXPONENT, MIN_FFT_EXPONENT, MIN_SIGNAL_LEN, OutputKind, ScaleKind, TransformParams,
    select_params,
};
pub use spectrogram::{
    DB_EPSILON, Spectrogram, StftAnalyzer, build_spectrogram, magnitude_to_db, power_to_db,
};

/// Error types for analysis operations.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// Signal too short (or empty) to derive a valid transform window.
    #[error("invalid signal: {len} samples (need at least {min})")]
    InvalidSignal {
        /// Length of the offending signal.
        len: usize,
        /// Minimum accepted length.
        min: usize,
    },

    /// The transform was invoked with an inconsistent parameter set.
    #[error("transform error: {0}")]
    Transform(String),

    /// Inputs whose shapes disagree with the operation's contract. Indicates
    /// a caller bug, not a runtime condition.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),
}

/// Convenience result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
