//! FFT wrapper with windowing functions

use rustfft::{FftPlanner, num_complex::Complex};
use std::f32::consts::PI;
use std::sync::Arc;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Window {
    /// Rectangular (no windowing)
    Rectangular,
    /// Hann window (periodic raised cosine)
    #[default]
    Hann,
    /// Hamming window
    Hamming,
}

impl Window {
    /// Apply window to a buffer
    ///
    /// Windows are periodic (DFT-even): the denominator is the buffer length,
    /// so a Hann window of length `n` ends one sample short of zero.
    pub fn apply(&self, buffer: &mut [f32]) {
        let n = buffer.len();
        match self {
            Window::Rectangular => {}
            Window::Hann => {
                for (i, sample) in buffer.iter_mut().enumerate() {
                    let w = 0.5 * (1.0 - (2.0 * PI * i as f32 / n as f32).cos());
                    *sample *= w;
                }
            }
            Window::Hamming => {
                for (i, sample) in buffer.iter_mut().enumerate() {
                    let w = 0.54 - 0.46 * (2.0 * PI * i as f32 / n as f32).cos();
                    *sample *= w;
                }
            }
        }
    }

    /// Get window coefficients
    pub fn coefficients(&self, size: usize) -> Vec<f32> {
        let mut coeffs = vec![1.0; size];
        self.apply(&mut coeffs);
        coeffs
    }

    /// Parse a window name as used in settings files.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "hann" | "hanning" => Some(Window::Hann),
            "hamming" => Some(Window::Hamming),
            "rectangular" | "rect" | "none" | "boxcar" => Some(Window::Rectangular),
            _ => None,
        }
    }
}

/// FFT processor with cached forward and inverse plans
///
/// Plans are shared behind `Arc`, so one `Fft` can be used from several
/// rayon workers at once.
#[derive(Clone)]
pub struct Fft {
    fft: Arc<dyn rustfft::Fft<f32>>,
    ifft: Arc<dyn rustfft::Fft<f32>>,
    size: usize,
}

impl Fft {
    /// Create a new FFT processor for the given size
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);
        let ifft = planner.plan_fft_inverse(size);

        Self { fft, ifft, size }
    }

    /// Get FFT size
    pub fn size(&self) -> usize {
        self.size
    }

    /// Perform forward FFT on real input
    ///
    /// Returns complex spectrum (size/2 + 1 bins for positive frequencies)
    pub fn forward(&self, input: &[f32]) -> Vec<Complex<f32>> {
        let mut buffer: Vec<Complex<f32>> = input.iter().map(|&x| Complex::new(x, 0.0)).collect();

        // Pad or truncate to FFT size
        buffer.resize(self.size, Complex::new(0.0, 0.0));

        self.fft.process(&mut buffer);

        // Return only positive frequencies (DC to Nyquist)
        buffer.truncate(self.size / 2 + 1);
        buffer
    }

    /// Perform forward FFT on complex input (in-place)
    pub fn forward_complex(&self, buffer: &mut [Complex<f32>]) {
        self.fft.process(buffer);
    }

    /// Perform inverse FFT on complex buffer (in-place, normalized)
    pub fn inverse_complex(&self, buffer: &mut [Complex<f32>]) {
        self.ifft.process(buffer);

        let scale = 1.0 / self.size as f32;
        for c in buffer.iter_mut() {
            *c *= scale;
        }
    }

    /// Cross-correlation of `template` against `signal` for lags `0..=max_lag`.
    ///
    /// `r[lag] = Σ_j template[j] · signal[j + lag]`, computed in the frequency
    /// domain. The FFT size must cover `template.len() + max_lag` so no lag
    /// wraps around.
    pub fn cross_correlate(&self, template: &[f32], signal: &[f32], max_lag: usize) -> Vec<f32> {
        debug_assert!(template.len() + max_lag <= self.size);

        let to_complex = |xs: &[f32]| {
            let mut buf: Vec<Complex<f32>> = xs.iter().map(|&x| Complex::new(x, 0.0)).collect();
            buf.resize(self.size, Complex::new(0.0, 0.0));
            buf
        };

        let mut spec_t = to_complex(template);
        let mut spec_s = to_complex(&signal[..signal.len().min(self.size)]);
        self.forward_complex(&mut spec_t);
        self.forward_complex(&mut spec_s);

        for (s, t) in spec_s.iter_mut().zip(spec_t.iter()) {
            *s *= t.conj();
        }
        self.inverse_complex(&mut spec_s);

        spec_s.iter().take(max_lag + 1).map(|c| c.re).collect()
    }
}
