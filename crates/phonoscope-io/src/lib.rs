//! Audio loading for Phonoscope.
//!
//! This crate provides:
//!
//! - **WAV file I/O**: [`read_wav`] and [`write_wav`] via hound
//! - **Compressed formats**: MP3, FLAC, OGG Vorbis and AAC/M4A via symphonia
//! - **One entry point**: [`load_audio`] picks the decoder, mixes down to mono
//!   and rejects empty recordings
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use phonoscope_io::load_audio;
//!
//! let audio = load_audio("recording.mp3")?;
//! println!("{:.2}s at {} Hz", audio.duration_secs(), audio.sample_rate);
//! ```

mod decode;
mod loader;
mod wav;

pub use decode::{decode_file, probe_info};
pub use loader::{AudioInfo, DecodedAudio, audio_info, load_audio};
pub use wav::{WavFormat, WavInfo, WavSpec, read_wav, read_wav_info, write_wav};

use std::path::PathBuf;

/// Error types for audio loading.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Container or codec error from the compressed-format decoder.
    #[error("decode error: {0}")]
    Decode(#[from] symphonia::core::errors::Error),

    /// The container has no decodable audio track.
    #[error("no audio track found")]
    NoTrack,

    /// The stream does not declare a sample rate.
    #[error("unknown sample rate")]
    UnknownSampleRate,

    /// The file decoded to zero samples.
    #[error("{} contains no audio samples", path.display())]
    Empty {
        /// File that was decoded.
        path: PathBuf,
    },

    /// The requested sample format is not supported.
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio loading.
pub type Result<T> = std::result::Result<T, Error>;
