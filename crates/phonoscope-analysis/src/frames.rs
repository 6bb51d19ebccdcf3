//! Centered frame grids.
//!
//! Every framewise analysis in this crate (STFT, pitch, RMS, ZCR) slices the
//! buffer the same way: pad `frame_length / 2` samples at both ends, then take
//! frames of `frame_length` samples every `hop_length` samples. Frame `i` is
//! therefore centered on sample `i * hop_length`.

use crate::error::ParameterError;

/// How the buffer edges are extended before framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Padding {
    /// Zero-fill.
    Zeros,
    /// Repeat the first/last sample.
    Edge,
}

/// Frame and hop length of a time-domain framewise analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameConfig {
    /// Samples per frame.
    pub frame_length: usize,
    /// Samples between frame centers.
    pub hop_length: usize,
}

impl Default for FrameConfig {
    /// 2048-sample frames every 512 samples.
    fn default() -> Self {
        Self {
            frame_length: 2048,
            hop_length: 512,
        }
    }
}

impl FrameConfig {
    /// Check that both lengths are non-zero.
    pub fn validate(&self, analysis: &'static str) -> Result<(), ParameterError> {
        if self.frame_length == 0 || self.hop_length == 0 {
            return Err(ParameterError::InvalidFraming {
                analysis,
                frame_length: self.frame_length,
                hop_length: self.hop_length,
            });
        }
        Ok(())
    }

    /// Grid over `signal_len` samples.
    pub fn grid(&self, signal_len: usize, sample_rate: u32, padding: Padding) -> FrameGrid {
        FrameGrid::new(
            signal_len,
            self.frame_length,
            self.hop_length,
            sample_rate,
            padding,
        )
    }
}

/// Time axis of a framewise analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameGrid {
    frame_length: usize,
    hop_length: usize,
    sample_rate: u32,
    num_frames: usize,
    padding: Padding,
}

impl FrameGrid {
    /// Grid for a signal of `signal_len` samples.
    ///
    /// Callers validate `frame_length ≥ 1` and `hop_length ≥ 1`.
    pub fn new(
        signal_len: usize,
        frame_length: usize,
        hop_length: usize,
        sample_rate: u32,
        padding: Padding,
    ) -> Self {
        debug_assert!(frame_length >= 1 && hop_length >= 1);
        let padded_len = signal_len + 2 * (frame_length / 2);
        let num_frames = if padded_len >= frame_length {
            (padded_len - frame_length) / hop_length + 1
        } else {
            0
        };

        Self {
            frame_length,
            hop_length,
            sample_rate,
            num_frames,
            padding,
        }
    }

    /// Frame length in samples.
    pub fn frame_length(&self) -> usize {
        self.frame_length
    }

    /// Hop length in samples.
    pub fn hop_length(&self) -> usize {
        self.hop_length
    }

    /// Sample rate of the analysed signal.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of frames.
    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    /// Padding applied at each edge.
    pub fn pad(&self) -> usize {
        self.frame_length / 2
    }

    /// Edge padding mode.
    pub fn padding(&self) -> Padding {
        self.padding
    }

    /// Time in seconds of frame `index` (the frame center).
    pub fn frame_time(&self, index: usize) -> f32 {
        index as f32 * self.hop_length as f32 / self.sample_rate as f32
    }

    /// Times of all frames.
    pub fn times(&self) -> Vec<f32> {
        (0..self.num_frames).map(|i| self.frame_time(i)).collect()
    }

    /// Frame index nearest to `time` seconds, clamped to the grid.
    pub fn frame_at(&self, time: f32) -> usize {
        let idx = (time * self.sample_rate as f32 / self.hop_length as f32).round();
        (idx.max(0.0) as usize).min(self.num_frames.saturating_sub(1))
    }

    /// Copy of `signal` with the grid's edge padding applied.
    pub fn pad_signal(&self, signal: &[f32]) -> Vec<f32> {
        let pad = self.pad();
        let (head, tail) = match self.padding {
            Padding::Zeros => (0.0, 0.0),
            Padding::Edge => (
                signal.first().copied().unwrap_or(0.0),
                signal.last().copied().unwrap_or(0.0),
            ),
        };

        let mut padded = Vec::with_capacity(signal.len() + 2 * pad);
        padded.resize(pad, head);
        padded.extend_from_slice(signal);
        padded.resize(signal.len() + 2 * pad, tail);
        padded
    }

    /// Iterate frames of an already padded signal.
    pub fn frames<'a>(&self, padded: &'a [f32]) -> impl Iterator<Item = &'a [f32]> + 'a {
        let frame_length = self.frame_length;
        let hop_length = self.hop_length;
        (0..self.num_frames).map(move |i| {
            let start = i * hop_length;
            &padded[start..start + frame_length]
        })
    }
}
