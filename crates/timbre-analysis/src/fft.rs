//! FFT wrapper with windowing functions.
//!
//! The analysis pipeline only needs the forward direction: real samples in,
//! positive-frequency complex bins out. The actual transform is delegated to
//! [`rustfft`]; this module owns the plan and the window coefficients.

use rustfft::{FftPlanner, num_complex::Complex};
use std::f32::consts::PI;
use std::sync::Arc;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Window {
    /// Rectangular (no windowing)
    Rectangular,
    /// Hann window (raised cosine)
    #[default]
    Hann,
    /// Hamming window
    Hamming,
    /// Blackman window
    Blackman,
}

impl Window {
    /// Apply window to a buffer
    pub fn apply(&self, buffer: &mut [f32]) {
        let n = buffer.len() as f32;
        match self {
            Window::Rectangular => {}
            Window::Hann => {
                for (i, sample) in buffer.iter_mut().enumerate() {
                    *sample *= 0.5 * (1.0 - (2.0 * PI * i as f32 / n).cos());
                }
            }
            Window::Hamming => {
                for (i, sample) in buffer.iter_mut().enumerate() {
                    *sample *= 0.54 - 0.46 * (2.0 * PI * i as f32 / n).cos();
                }
            }
            Window::Blackman => {
                for (i, sample) in buffer.iter_mut().enumerate() {
                    let x = 2.0 * PI * i as f32 / n;
                    *sample *= 0.42 - 0.5 * x.cos() + 0.08 * (2.0 * x).cos();
                }
            }
        }
    }

    /// Get window coefficients
    pub fn coefficients(&self, size: usize) -> Vec<f32> {
        let mut coeffs = vec![1.0; size];
        self.apply(&mut coeffs);
        coeffs
    }
}

/// Forward FFT processor with a cached plan.
pub struct Fft {
    fft: Arc<dyn rustfft::Fft<f32>>,
    size: usize,
}

impl Fft {
    /// Create a new FFT processor for the given size
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);
        Self { fft, size }
    }

    /// Get FFT size
    pub fn size(&self) -> usize {
        self.size
    }

    /// Perform forward FFT on real input
    ///
    /// Returns the positive-frequency half of the complex spectrum
    /// (size/2 + 1 bins, DC to Nyquist). Input shorter than the FFT size
    /// is zero-padded; longer input is truncated.
    pub fn forward(&self, input: &[f32]) -> Vec<Complex<f32>> {
        let mut buffer: Vec<Complex<f32>> = input
            .iter()
            .take(self.size)
            .map(|&x| Complex::new(x, 0.0))
            .collect();
        buffer.resize(self.size, Complex::new(0.0, 0.0));

        self.fft.process(&mut buffer);

        buffer.truncate(self.size / 2 + 1);
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_bin_count() {
        let fft = Fft::new(256);
        let input = vec![0.0; 256];
        assert_eq!(fft.forward(&input).len(), 129);
    }

    #[test]
    fn test_window_hann() {
        let mut buffer = vec![1.0; 100];
        Window::Hann.apply(&mut buffer);

        // Hann window should be 0 at edges, 1 at center
        assert!(buffer[0] < 0.01);
        assert!(buffer[99] < 0.01);
        assert!((buffer[50] - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_dc_detection() {
        let fft = Fft::new(256);

        // DC signal
        let input = vec![1.0; 256];
        let spectrum = fft.forward(&input);

        // DC bin should be large, others small
        let dc_mag = spectrum[0].norm();
        let other_mag: f32 = spectrum[1..].iter().map(|c| c.norm()).sum();

        assert!(dc_mag > other_mag * 10.0);
    }

    #[test]
    fn test_tone_lands_in_expected_bin() {
        let fft = Fft::new(1024);
        // Bin-centered tone: bin 16 = 16 cycles over the window
        let input: Vec<f32> = (0..1024)
            .map(|i| (2.0 * PI * 16.0 * i as f32 / 1024.0).sin())
            .collect();

        let spectrum = fft.forward(&input);
        let peak = spectrum
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.norm().partial_cmp(&b.norm()).unwrap())
            .map(|(i, _)| i)
            .unwrap();

        assert_eq!(peak, 16);
    }
}
