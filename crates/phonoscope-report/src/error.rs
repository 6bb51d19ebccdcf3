//! Error types for report composition.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Composition or serialization failure.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A spectrogram with no frames or no bins cannot be painted.
    #[error("{panel}: spectrogram has {frames} frames and {bins} bins")]
    EmptySpectrogram {
        /// Panel title.
        panel: &'static str,
        /// Frame count.
        frames: usize,
        /// Bin count.
        bins: usize,
    },

    /// Patient id or date unusable as an artifact name.
    #[error("invalid report metadata: {0}")]
    InvalidMeta(String),

    /// Raster data length does not match its dimensions.
    #[error("image {index} holds {actual} bytes, expected {expected}")]
    ImageData {
        /// Resource index of the image.
        index: usize,
        /// Bytes required by width × height × 3.
        expected: usize,
        /// Bytes present.
        actual: usize,
    },

    /// Writing the finished document failed.
    #[error("failed to write report to {path}: {source}")]
    Write {
        /// Destination file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}
