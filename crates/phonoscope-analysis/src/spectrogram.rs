//! STFT-based spectrogram generation
//!
//! Provides time-frequency analysis through Short-Time Fourier Transform.
//! Frames are centered (zero-padded by half a window at both ends), so frame
//! `i` describes the signal around sample `i * hop_size`.

use crate::buffer::SampleBuffer;
use crate::db::DbScale;
use crate::error::ParameterError;
use crate::fft::{Fft, Window};
use crate::frames::{FrameGrid, Padding};

/// Units of the values stored in a [`Spectrogram`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Units {
    /// Linear STFT magnitude.
    Magnitude,
    /// Decibels re 1.0 after top_db clipping.
    Decibels,
}

/// Spectrogram data structure
///
/// Values are stored row-major with one row per frequency bin:
/// `data[bin * num_frames + frame]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrogram {
    data: Vec<f32>,
    /// FFT size used
    pub fft_size: usize,
    /// Hop size between frames
    pub hop_size: usize,
    /// Sample rate
    pub sample_rate: u32,
    /// Number of time frames
    pub num_frames: usize,
    /// Number of frequency bins (fft_size / 2 + 1)
    pub num_bins: usize,
    /// What the values mean
    pub units: Units,
}

impl Spectrogram {
    /// Get frequency in Hz for a given bin index
    pub fn bin_to_freq(&self, bin: usize) -> f32 {
        bin as f32 * self.sample_rate as f32 / self.fft_size as f32
    }

    /// Get time in seconds for a given frame index
    pub fn frame_to_time(&self, frame: usize) -> f32 {
        frame as f32 * self.hop_size as f32 / self.sample_rate as f32
    }

    /// Get duration in seconds
    pub fn duration(&self) -> f32 {
        self.frame_to_time(self.num_frames)
    }

    /// Get maximum frequency (Nyquist)
    pub fn max_frequency(&self) -> f32 {
        self.sample_rate as f32 / 2.0
    }

    /// Get value at specific frequency bin and time frame
    ///
    /// Returns None if out of bounds
    pub fn get(&self, bin: usize, frame: usize) -> Option<f32> {
        if bin >= self.num_bins || frame >= self.num_frames {
            return None;
        }
        Some(self.data[bin * self.num_frames + frame])
    }

    /// All frames of one frequency bin
    pub fn row(&self, bin: usize) -> Option<&[f32]> {
        if bin >= self.num_bins {
            return None;
        }
        let start = bin * self.num_frames;
        Some(&self.data[start..start + self.num_frames])
    }

    /// All bins of one time frame
    pub fn column(&self, frame: usize) -> Option<Vec<f32>> {
        if frame >= self.num_frames {
            return None;
        }
        Some(
            (0..self.num_bins)
                .map(|bin| self.data[bin * self.num_frames + frame])
                .collect(),
        )
    }

    /// Raw row-major values
    pub fn values(&self) -> &[f32] {
        &self.data
    }

    /// Smallest and largest value, or None for an empty grid
    pub fn range(&self) -> Option<(f32, f32)> {
        self.data.iter().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }

    /// Find peak frequency at a given time frame
    pub fn peak_frequency(&self, frame: usize) -> Option<f32> {
        let column = self.column(frame)?;
        let (peak_bin, _) = column
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))?;
        Some(self.bin_to_freq(peak_bin))
    }

    /// Convert magnitudes to decibels
    ///
    /// The top_db floor is computed over the whole grid, not per frame.
    pub fn to_db(&self, scale: DbScale) -> Spectrogram {
        let mut data = self.data.clone();
        if self.units == Units::Magnitude {
            scale.apply(&mut data);
        }

        Spectrogram {
            data,
            units: Units::Decibels,
            ..*self
        }
    }
}

/// FFT size, hop and window of one spectrogram view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StftConfig {
    /// Window (FFT) length in samples
    pub n_fft: usize,
    /// Hop between frames in samples
    pub hop_length: usize,
    /// Analysis window
    pub window: Window,
}

impl StftConfig {
    /// Short window, fine time resolution: 512 / 128.
    pub fn wideband() -> Self {
        Self {
            n_fft: 512,
            hop_length: 128,
            window: Window::Hann,
        }
    }

    /// Long window, fine frequency resolution: 4096 / 1024.
    pub fn narrowband() -> Self {
        Self {
            n_fft: 4096,
            hop_length: 1024,
            window: Window::Hann,
        }
    }

    /// Check `n_fft ≥ 2` and `hop_length ≥ 1`.
    pub fn validate(&self, analysis: &'static str) -> Result<(), ParameterError> {
        if self.n_fft < 2 || self.hop_length == 0 {
            return Err(ParameterError::InvalidFraming {
                analysis,
                frame_length: self.n_fft,
                hop_length: self.hop_length,
            });
        }
        Ok(())
    }
}

/// STFT (Short-Time Fourier Transform) analyzer
pub struct StftAnalyzer {
    fft_size: usize,
    hop_size: usize,
    window: Window,
    sample_rate: u32,
    fft: Fft,
    window_coeffs: Vec<f32>,
}

impl StftAnalyzer {
    /// Create a new STFT analyzer
    ///
    /// # Arguments
    /// * `sample_rate` - Sample rate in Hz
    /// * `fft_size` - FFT size (power of 2 recommended)
    /// * `hop_size` - Hop size between frames
    /// * `window` - Window function to use
    pub fn new(sample_rate: u32, fft_size: usize, hop_size: usize, window: Window) -> Self {
        let fft = Fft::new(fft_size);
        let window_coeffs = window.coefficients(fft_size);

        Self {
            fft_size,
            hop_size,
            window,
            sample_rate,
            fft,
            window_coeffs,
        }
    }

    /// Analyzer for a [`StftConfig`]
    pub fn from_config(sample_rate: u32, config: &StftConfig) -> Self {
        Self::new(sample_rate, config.n_fft, config.hop_length, config.window)
    }

    /// Frame grid this analyzer produces for `signal_len` samples
    pub fn grid(&self, signal_len: usize) -> FrameGrid {
        FrameGrid::new(
            signal_len,
            self.fft_size,
            self.hop_size,
            self.sample_rate,
            Padding::Zeros,
        )
    }

    /// Compute magnitude spectrogram from audio signal
    pub fn analyze(&self, signal: &[f32]) -> Spectrogram {
        let grid = self.grid(signal.len());
        let padded = grid.pad_signal(signal);
        let num_frames = grid.num_frames();
        let num_bins = self.fft_size / 2 + 1;
        let mut data = vec![0.0; num_bins * num_frames];

        let mut frame = vec![0.0; self.fft_size];
        for (frame_idx, samples) in grid.frames(&padded).enumerate() {
            for ((dst, &src), &coeff) in frame
                .iter_mut()
                .zip(samples.iter())
                .zip(self.window_coeffs.iter())
            {
                *dst = src * coeff;
            }

            let spectrum = self.fft.forward(&frame);

            for (bin, c) in spectrum.iter().enumerate() {
                data[bin * num_frames + frame_idx] = c.norm();
            }
        }

        tracing::debug!(
            fft_size = self.fft_size,
            hop_size = self.hop_size,
            window = ?self.window,
            num_frames,
            "stft done"
        );

        Spectrogram {
            data,
            fft_size: self.fft_size,
            hop_size: self.hop_size,
            sample_rate: self.sample_rate,
            num_frames,
            num_bins,
            units: Units::Magnitude,
        }
    }
}

/// Magnitude spectrogram of `buffer`, converted to decibels with `scale`.
pub fn compute(buffer: &SampleBuffer, config: &StftConfig, scale: DbScale) -> Spectrogram {
    StftAnalyzer::from_config(buffer.sample_rate(), config)
        .analyze(buffer.samples())
        .to_db(scale)
}
