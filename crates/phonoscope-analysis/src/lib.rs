//! Phonoscope Analysis - voice and speech analysis of a single recording
//!
//! This crate turns a mono sample buffer into the signals a voice report is
//! drawn from:
//!
//! - [`spectrogram`] - wideband and narrowband STFT magnitudes in dB
//! - [`pitch`] - probabilistic YIN fundamental frequency with voicing
//! - [`energy`] - framewise RMS intensity on the pitch grid
//! - [`zcr`] - thresholded zero-crossing rate
//! - [`pipeline`] - runs all of the above concurrently over one buffer
//!
//! Supporting modules: [`buffer`] (the validated input), [`frames`]
//! (centered frame grids), [`db`] (amplitude to dB with top_db clipping),
//! [`fft`] (rustfft wrapper and windows), [`note`] (note names) and
//! [`error`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use phonoscope_analysis::{AnalysisParams, NoopObserver, SampleBuffer, analyze};
//!
//! let buffer = SampleBuffer::new(samples, 16000)?;
//! let params = AnalysisParams::default();
//! let report = analyze(&buffer, &params, &params.tracker(), &NoopObserver)?;
//!
//! println!("voiced: {:.0}%", report.pitch.voiced_ratio() * 100.0);
//! for warning in &report.warnings {
//!     eprintln!("warning: {warning}");
//! }
//! ```

pub mod buffer;
pub mod db;
pub mod energy;
pub mod error;
pub mod fft;
pub mod frames;
pub mod note;
pub mod pipeline;
pub mod pitch;
pub mod spectrogram;
pub mod zcr;

pub use buffer::SampleBuffer;
pub use db::{AMIN, DbScale};
pub use energy::{EnergyEstimator, EnergyTrack};
pub use error::{ParameterError, PitchError};
pub use fft::{Fft, Window};
pub use frames::{FrameConfig, FrameGrid, Padding};
pub use pipeline::{
    AnalysisObserver, AnalysisParams, AnalysisReport, DEFAULT_FMAX, DEFAULT_FMIN, MAX_THRESHOLD,
    NoopObserver, Stage, Warning, analyze,
};
pub use pitch::{PitchRange, PitchTrack, PitchTracker, Pyin, PyinConfig};
pub use spectrogram::{Spectrogram, StftAnalyzer, StftConfig, Units};
pub use zcr::{DEFAULT_THRESHOLD, ZcrTrack, ZeroCrossingAnalyzer};
