//! WAV file I/O for the timbre analysis tools.
//!
//! Provides [`read_wav`] and [`write_wav`]: files come back as mono f32
//! sample buffers regardless of their on-disk channel count and bit depth,
//! which is the only shape the analysis pipeline consumes.

mod wav;

pub use wav::{WavSpec, read_wav, write_wav};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
