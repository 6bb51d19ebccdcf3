//! Immutable mono sample buffer shared by every analysis stage.

use crate::error::ParameterError;

/// Mono audio samples plus their sample rate.
///
/// Always holds at least one sample and a non-zero sample rate; both are
/// checked on construction. Analyses borrow the buffer read-only, so one
/// instance can be handed to several rayon workers at once.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl SampleBuffer {
    /// Wrap decoded samples.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Result<Self, ParameterError> {
        if sample_rate == 0 {
            return Err(ParameterError::ZeroSampleRate);
        }
        if samples.is_empty() {
            return Err(ParameterError::EmptyBuffer);
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// The samples.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples (always ≥ 1).
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false; kept for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Nyquist frequency in Hz.
    pub fn nyquist(&self) -> f32 {
        self.sample_rate as f32 / 2.0
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }

    /// Release the samples.
    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_zero_rate() {
        assert_eq!(
            SampleBuffer::new(vec![], 16000),
            Err(ParameterError::EmptyBuffer)
        );
        assert_eq!(
            SampleBuffer::new(vec![0.0], 0),
            Err(ParameterError::ZeroSampleRate)
        );
    }

    #[test]
    fn duration() {
        let buffer = SampleBuffer::new(vec![0.0; 24000], 48000).unwrap();
        assert!((buffer.duration_secs() - 0.5).abs() < 1e-12);
        assert_eq!(buffer.nyquist(), 24000.0);
    }
}
