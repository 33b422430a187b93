//! Test signal generation command.

use clap::{Args, Subcommand, ValueEnum};
use std::f32::consts::PI;
use std::path::{Path, PathBuf};
use timbre_io::{WavSpec, write_wav};

#[derive(Args)]
pub struct GenerateArgs {
    #[command(subcommand)]
    command: GenerateCommand,
}

/// Noise spectra selectable from the command line.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum NoiseColor {
    /// Equal power across all frequencies
    #[default]
    White,
    /// Equal power per octave (1/f spectrum)
    Pink,
}

#[derive(Subcommand)]
enum GenerateCommand {
    /// Generate a sine tone
    Tone {
        /// Output WAV file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Frequency in Hz
        #[arg(long, default_value = "440.0")]
        freq: f32,

        /// Duration in seconds
        #[arg(long, default_value = "1.0")]
        duration: f32,

        /// Sample rate
        #[arg(long, default_value = "48000")]
        sample_rate: u32,

        /// Amplitude (0-1)
        #[arg(long, default_value = "0.8")]
        amplitude: f32,
    },

    /// Generate white or pink noise
    Noise {
        /// Output WAV file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Noise color
        #[arg(long, value_enum, default_value = "white")]
        color: NoiseColor,

        /// Duration in seconds
        #[arg(long, default_value = "1.0")]
        duration: f32,

        /// Sample rate
        #[arg(long, default_value = "48000")]
        sample_rate: u32,

        /// Amplitude (0-1)
        #[arg(long, default_value = "0.5")]
        amplitude: f32,
    },
}

pub fn run(args: GenerateArgs) -> anyhow::Result<()> {
    match args.command {
        GenerateCommand::Tone {
            output,
            freq,
            duration,
            sample_rate,
            amplitude,
        } => {
            let num_samples = (duration * sample_rate as f32) as usize;
            let samples: Vec<f32> = (0..num_samples)
                .map(|i| amplitude * (2.0 * PI * freq * i as f32 / sample_rate as f32).sin())
                .collect();

            write_output(&output, &samples, sample_rate)?;
            println!(
                "Wrote {:.2}s {} Hz tone to {}",
                duration,
                freq,
                output.display()
            );
        }

        GenerateCommand::Noise {
            output,
            color,
            duration,
            sample_rate,
            amplitude,
        } => {
            let num_samples = (duration * sample_rate as f32) as usize;
            let white = white_noise(num_samples);
            let samples = match color {
                NoiseColor::White => normalize(white, amplitude),
                NoiseColor::Pink => normalize(pink_filter(&white), amplitude),
            };

            write_output(&output, &samples, sample_rate)?;
            println!(
                "Wrote {:.2}s of {:?} noise to {}",
                duration,
                color,
                output.display()
            );
        }
    }

    Ok(())
}

fn write_output(path: &Path, samples: &[f32], sample_rate: u32) -> anyhow::Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
    };
    write_wav(path, samples, spec)?;
    Ok(())
}

/// Uniform white noise in [-1, 1] from a xorshift generator.
fn white_noise(num_samples: usize) -> Vec<f32> {
    let mut state = 0x2545F491u32;
    (0..num_samples)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state as i32 as f32) / (i32::MAX as f32)
        })
        .collect()
}

/// Shape white noise into pink with Kellet's cascade of one-pole filters.
fn pink_filter(white: &[f32]) -> Vec<f32> {
    let (mut b0, mut b1, mut b2) = (0.0f32, 0.0f32, 0.0f32);
    white
        .iter()
        .map(|&w| {
            b0 = 0.99765 * b0 + w * 0.0990460;
            b1 = 0.96300 * b1 + w * 0.2965164;
            b2 = 0.57000 * b2 + w * 1.0526913;
            b0 + b1 + b2 + w * 0.1848
        })
        .collect()
}

/// Scale a buffer so its peak sits at `amplitude`.
fn normalize(mut samples: Vec<f32>, amplitude: f32) -> Vec<f32> {
    let peak = samples.iter().fold(0.0f32, |acc, &v| acc.max(v.abs()));
    if peak > 0.0 {
        let scale = amplitude / peak;
        for v in &mut samples {
            *v *= scale;
        }
    }
    samples
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_peak() {
        let samples = normalize(vec![0.1, -0.5, 0.25], 0.8);
        let peak = samples.iter().fold(0.0f32, |acc, &v| acc.max(v.abs()));
        assert!((peak - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_pink_rolls_off_high_frequencies() {
        // Pink noise should carry less high-frequency energy than the white
        // noise it was shaped from.
        let white = white_noise(48_000);
        let pink = normalize(pink_filter(&white), 1.0);
        let white = normalize(white, 1.0);

        let hf_energy = |signal: &[f32]| -> f32 {
            // Crude high-pass: energy of the first difference
            signal
                .windows(2)
                .map(|w| (w[1] - w[0]).powi(2))
                .sum::<f32>()
        };

        assert!(hf_energy(&pink) < hf_energy(&white));
    }
}
