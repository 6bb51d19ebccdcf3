//! Thresholded zero-crossing rate.
//!
//! Low-level noise around zero produces a flood of spurious crossings, so
//! samples quieter than a threshold are silenced first. A silenced sample
//! holds the sign of the last audible sample in its frame: only a move from
//! one audible polarity to the other counts as a crossing.

use crate::buffer::SampleBuffer;
use crate::frames::{FrameConfig, FrameGrid, Padding};

/// Default silencing threshold.
pub const DEFAULT_THRESHOLD: f32 = 0.05;

/// Zero-crossing rate per frame
#[derive(Debug, Clone, PartialEq)]
pub struct ZcrTrack {
    /// Fraction of sign changes per frame, in [0, 1)
    pub rate: Vec<f32>,
    /// Frame grid (edge padded)
    pub grid: FrameGrid,
    /// Threshold the track was computed with
    pub threshold: f32,
}

impl ZcrTrack {
    /// Number of frames
    pub fn len(&self) -> usize {
        self.rate.len()
    }

    /// True when the track has no frames
    pub fn is_empty(&self) -> bool {
        self.rate.is_empty()
    }

    /// Frame times in seconds
    pub fn times(&self) -> Vec<f32> {
        self.grid.times()
    }

    /// Mean rate over all frames
    pub fn mean(&self) -> f32 {
        if self.rate.is_empty() {
            return 0.0;
        }
        self.rate.iter().sum::<f32>() / self.rate.len() as f32
    }
}

/// Copy of `signal` with every sample quieter than `threshold` set to 0.
pub fn silence_below(signal: &[f32], threshold: f32) -> Vec<f32> {
    signal
        .iter()
        .map(|&x| if x.abs() < threshold { 0.0 } else { x })
        .collect()
}

/// Count polarity changes between audible samples of one frame.
pub fn count_crossings(frame: &[f32]) -> usize {
    let mut last_positive: Option<bool> = None;
    let mut crossings = 0;

    for &x in frame {
        if x == 0.0 {
            continue;
        }
        let positive = x > 0.0;
        if let Some(prev) = last_positive
            && prev != positive
        {
            crossings += 1;
        }
        last_positive = Some(positive);
    }

    crossings
}

/// Framewise zero-crossing analyzer
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroCrossingAnalyzer {
    frames: FrameConfig,
}

impl ZeroCrossingAnalyzer {
    /// Analyzer with the given framing
    pub fn new(frames: FrameConfig) -> Self {
        Self { frames }
    }

    /// Zero-crossing rate of `buffer` after silencing samples below `threshold`
    ///
    /// `buffer` itself is never modified.
    pub fn zcr(&self, buffer: &SampleBuffer, threshold: f32) -> ZcrTrack {
        let cleaned = silence_below(buffer.samples(), threshold);
        let grid = self
            .frames
            .grid(cleaned.len(), buffer.sample_rate(), Padding::Edge);
        let padded = grid.pad_signal(&cleaned);
        let frame_length = grid.frame_length() as f32;

        let rate: Vec<f32> = grid
            .frames(&padded)
            .map(|frame| count_crossings(frame) as f32 / frame_length)
            .collect();

        tracing::debug!(num_frames = rate.len(), threshold, "zcr done");

        ZcrTrack {
            rate,
            grid,
            threshold,
        }
    }
}
