//! Shared CLI helpers used across multiple commands.

use clap::ValueEnum;
use timbre_analysis::{
    MAX_FFT_EXPONENT, MIN_FFT_EXPONENT, TransformParams, Window, select_params,
};

/// Window functions selectable from the command line.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum CliWindow {
    /// Hann window (raised cosine)
    #[default]
    Hann,
    /// Hamming window
    Hamming,
    /// Blackman window
    Blackman,
    /// Rectangular (no windowing)
    Rectangular,
}

impl From<CliWindow> for Window {
    fn from(w: CliWindow) -> Self {
        match w {
            CliWindow::Hann => Window::Hann,
            CliWindow::Hamming => Window::Hamming,
            CliWindow::Blackman => Window::Blackman,
            CliWindow::Rectangular => Window::Rectangular,
        }
    }
}

/// Resolve transform parameters for a signal.
///
/// Adaptive selection from the signal length by default; `fft_exponent`
/// pins the window size instead (the fixed-parameter variant). Both paths
/// produce the same kind of params and feed the same pipeline.
pub fn resolve_params(
    signal_len: usize,
    sample_rate: u32,
    fft_exponent: Option<u32>,
    window: CliWindow,
) -> anyhow::Result<TransformParams> {
    let mut params = match fft_exponent {
        Some(exponent) => {
            if !(MIN_FFT_EXPONENT..=MAX_FFT_EXPONENT).contains(&exponent) {
                anyhow::bail!(
                    "--fft-exponent {} out of range ({}..={})",
                    exponent,
                    MIN_FFT_EXPONENT,
                    MAX_FFT_EXPONENT
                );
            }
            TransformParams::from_exponent(exponent, sample_rate)
        }
        None => select_params(signal_len, sample_rate)?,
    };
    params.window = window.into();
    Ok(params)
}
