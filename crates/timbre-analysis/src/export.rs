//! Export formats for analysis results.
//!
//! Hands analysis products to external visualization tools:
//! - CSV for spectrograms and descriptor series
//! - PGM grayscale images for spectrograms

use crate::features::FeatureSeries;
use crate::spectrogram::Spectrogram;
use std::io::Write;
use std::path::Path;

/// Export a spectrogram to CSV.
///
/// Time on rows, frequency bins on columns. The first row labels each column
/// with its bin frequency in Hz, the first column labels each row with its
/// frame time in seconds. Values are written as stored (convert with
/// [`Spectrogram::to_db`] first for dB output).
pub fn export_spectrogram_csv(
    spectrogram: &Spectrogram,
    path: impl AsRef<Path>,
) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;

    write!(file, "time_s")?;
    for bin in 0..spectrogram.num_bins {
        write!(file, ",{:.2}", spectrogram.bin_to_freq(bin))?;
    }
    writeln!(file)?;

    for frame in 0..spectrogram.num_frames {
        write!(file, "{:.6}", spectrogram.frame_to_time(frame))?;
        if let Some(spectrum) = spectrogram.get_frame(frame) {
            for &value in spectrum {
                write!(file, ",{:.6}", value)?;
            }
        }
        writeln!(file)?;
    }

    Ok(())
}

/// Export descriptor series to CSV, one row per frame.
pub fn export_features_csv(
    features: &FeatureSeries,
    path: impl AsRef<Path>,
) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;

    writeln!(file, "time_s,flatness,novelty,entropy,rms,slope")?;
    let times = features.times();
    for i in 0..features.len() {
        writeln!(
            file,
            "{:.6},{:.6},{:.6},{:.6},{:.6},{:.6}",
            times[i],
            features.flatness[i],
            features.novelty[i],
            features.entropy[i],
            features.rms[i],
            features.slope[i]
        )?;
    }

    Ok(())
}

/// Export a dB spectrogram to PGM grayscale image format.
///
/// PGM is a simple ASCII format most image tools can open. Time runs along
/// the X axis, frequency along Y (low frequencies at the bottom). Values
/// below `max - db_range` map to black.
pub fn export_spectrogram_pgm(
    spectrogram: &Spectrogram,
    path: impl AsRef<Path>,
    db_range: f32,
) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;

    let width = spectrogram.num_frames;
    let height = spectrogram.num_bins;

    writeln!(file, "P2")?;
    writeln!(file, "# {} frames x {} bins", width, height)?;
    writeln!(file, "{} {}", width, height)?;
    writeln!(file, "255")?;

    let max_db = spectrogram
        .data
        .iter()
        .flatten()
        .copied()
        .fold(f32::NEG_INFINITY, f32::max);

    for bin in (0..height).rev() {
        for frame in 0..width {
            let db = spectrogram.get(frame, bin).unwrap_or(f32::NEG_INFINITY);
            let normalized = ((db - (max_db - db_range)) / db_range).clamp(0.0, 1.0);
            let pixel = (normalized * 255.0) as u8;
            if frame > 0 {
                write!(file, " ")?;
            }
            write!(file, "{}", pixel)?;
        }
        writeln!(file)?;
    }

    Ok(())
}
