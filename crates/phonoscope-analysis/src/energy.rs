//! Framewise energy (intensity) analysis
//!
//! RMS level per frame on the same centered grid as the pitch tracker, so
//! intensity and pitch contours line up frame for frame.

use crate::buffer::SampleBuffer;
use crate::db::DbScale;
use crate::frames::{FrameConfig, FrameGrid, Padding};

/// Compute RMS (Root Mean Square) level of a signal
///
/// Returns RMS value in linear scale (not dB)
pub fn rms(signal: &[f32]) -> f32 {
    if signal.is_empty() {
        return 0.0;
    }

    let sum_sq: f32 = signal.iter().map(|&x| x * x).sum();
    (sum_sq / signal.len() as f32).sqrt()
}

/// Compute peak level (maximum absolute value)
pub fn peak(signal: &[f32]) -> f32 {
    signal.iter().fold(0.0_f32, |acc, &x| acc.max(x.abs()))
}

/// RMS energy per frame and its decibel transform
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyTrack {
    /// Linear RMS per frame
    pub rms: Vec<f32>,
    /// RMS in dB re 1.0, clipped to the configured range below the maximum
    pub db: Vec<f32>,
    /// Frame grid shared with the pitch track
    pub grid: FrameGrid,
}

impl EnergyTrack {
    /// Number of frames
    pub fn len(&self) -> usize {
        self.rms.len()
    }

    /// True when the track has no frames
    pub fn is_empty(&self) -> bool {
        self.rms.is_empty()
    }

    /// Frame times in seconds
    pub fn times(&self) -> Vec<f32> {
        self.grid.times()
    }

    /// Smallest and largest dB value
    pub fn db_range(&self) -> Option<(f32, f32)> {
        self.db.iter().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

/// Framewise RMS estimator
#[derive(Debug, Clone, Copy, Default)]
pub struct EnergyEstimator {
    frames: FrameConfig,
    scale: DbScale,
}

impl EnergyEstimator {
    /// Estimator with the given framing and dB scale
    pub fn new(frames: FrameConfig, scale: DbScale) -> Self {
        Self { frames, scale }
    }

    /// Compute the energy track of `buffer`
    pub fn rms(&self, buffer: &SampleBuffer) -> EnergyTrack {
        let grid = self
            .frames
            .grid(buffer.len(), buffer.sample_rate(), Padding::Zeros);
        let padded = grid.pad_signal(buffer.samples());

        let rms: Vec<f32> = grid.frames(&padded).map(rms).collect();
        let db = self.scale.to_db(&rms);

        tracing::debug!(num_frames = rms.len(), "rms done");

        EnergyTrack { rms, db, grid }
    }
}
