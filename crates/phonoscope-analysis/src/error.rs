//! Error types for the analysis pipeline.

use thiserror::Error;

/// Invalid input or parameters, detected before any analysis runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    /// The decoded buffer holds no samples.
    #[error("audio buffer is empty")]
    EmptyBuffer,

    /// Sample rate of zero.
    #[error("sample rate must be greater than zero")]
    ZeroSampleRate,

    /// Silencing threshold outside its domain.
    #[error("threshold {0} out of range [0, 0.5]")]
    ThresholdOutOfRange(f32),

    /// Pitch search bounds not ordered.
    #[error("fmin ({fmin} Hz) must be lower than fmax ({fmax} Hz)")]
    PitchRangeInverted {
        /// Lower bound in Hz.
        fmin: f32,
        /// Upper bound in Hz.
        fmax: f32,
    },

    /// Lower pitch bound not strictly positive.
    #[error("fmin must be greater than 0 Hz, got {0}")]
    NonPositiveFmin(f32),

    /// Upper pitch bound at or above Nyquist.
    #[error("fmax ({fmax} Hz) must be below the Nyquist frequency ({nyquist} Hz)")]
    FmaxAboveNyquist {
        /// Upper bound in Hz.
        fmax: f32,
        /// Half the sample rate.
        nyquist: f32,
    },

    /// Frame or hop length unusable for the named analysis.
    #[error("invalid {analysis} framing: frame_length {frame_length}, hop_length {hop_length}")]
    InvalidFraming {
        /// Which analysis the framing belongs to.
        analysis: &'static str,
        /// Frame (FFT) length in samples.
        frame_length: usize,
        /// Hop length in samples.
        hop_length: usize,
    },

    /// dB dynamic range not strictly positive.
    #[error("top_db must be positive, got {0}")]
    InvalidTopDb(f32),
}

/// Failure of the pitch estimator.
///
/// The pipeline never propagates this: it substitutes an unvoiced track and
/// records a warning.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PitchError {
    /// The buffer contains NaN or infinite samples.
    #[error("buffer contains non-finite samples")]
    NonFiniteInput,

    /// The period search range is empty for this frame length and sample rate.
    #[error(
        "no usable period range: periods {min_period}..={max_period} samples (frame length {frame_length})"
    )]
    EmptySearchRange {
        /// Shortest candidate period in samples.
        min_period: usize,
        /// Longest candidate period in samples.
        max_period: usize,
        /// Analysis frame length in samples.
        frame_length: usize,
    },

    /// Any other estimator-specific failure.
    #[error("pitch estimation failed: {0}")]
    Estimator(String),
}
