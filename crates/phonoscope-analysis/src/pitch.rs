//! Fundamental frequency tracking with probabilistic YIN (pYIN)
//!
//! ## Algorithm
//!
//! pYIN (Mauch & Dixon, 2014) extends YIN (de Cheveigné & Kawahara, 2002)
//! with a probabilistic trough selection and HMM smoothing:
//!
//! 1. **Difference function** - d(τ) = Σ(x[j] - x[j+τ])², via FFT
//!    cross-correlation and running energies
//! 2. **Cumulative mean normalized difference** - d'(τ) over the period range
//!    implied by `[fmin, fmax]`
//! 3. **Parabolic interpolation** - sub-sample period of each trough
//! 4. **Trough probabilities** - a Beta prior over YIN thresholds and a
//!    Boltzmann prior over trough order
//! 5. **Viterbi decoding** - voiced pitch bins (0.1 semitone) plus a
//!    mirrored set of unvoiced states; transitions are local in pitch and
//!    rarely switch voicing
//!
//! Frequencies of unvoiced frames are `None`, never 0 Hz.

use rayon::prelude::*;

use crate::buffer::SampleBuffer;
use crate::error::PitchError;
use crate::fft::Fft;
use crate::frames::{FrameConfig, FrameGrid, Padding};

/// Pitch search bounds in Hz
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchRange {
    /// Lowest frequency considered
    pub fmin: f32,
    /// Highest frequency considered
    pub fmax: f32,
}

impl PitchRange {
    /// Bounds from `fmin` to `fmax`
    pub fn new(fmin: f32, fmax: f32) -> Self {
        Self { fmin, fmax }
    }
}

/// Per-frame pitch estimate
#[derive(Debug, Clone, PartialEq)]
pub struct PitchTrack {
    /// Fundamental frequency in Hz, `None` where unvoiced
    pub frequency: Vec<Option<f32>>,
    /// Voicing decision per frame
    pub voiced: Vec<bool>,
    /// Probability that the frame is voiced, in [0, 1]
    pub voiced_probability: Vec<f32>,
    /// Frame grid of the track
    pub grid: FrameGrid,
}

impl PitchTrack {
    /// Track with every frame unvoiced and probability 0
    pub fn unvoiced(grid: FrameGrid) -> Self {
        let n = grid.num_frames();
        Self {
            frequency: vec![None; n],
            voiced: vec![false; n],
            voiced_probability: vec![0.0; n],
            grid,
        }
    }

    /// Number of frames
    pub fn len(&self) -> usize {
        self.frequency.len()
    }

    /// True when the track has no frames
    pub fn is_empty(&self) -> bool {
        self.frequency.is_empty()
    }

    /// Frame times in seconds
    pub fn times(&self) -> Vec<f32> {
        self.grid.times()
    }

    /// Fraction of frames judged voiced
    pub fn voiced_ratio(&self) -> f32 {
        if self.voiced.is_empty() {
            return 0.0;
        }
        self.voiced.iter().filter(|&&v| v).count() as f32 / self.voiced.len() as f32
    }

    /// Lowest and highest voiced frequency
    pub fn frequency_range(&self) -> Option<(f32, f32)> {
        self.frequency.iter().flatten().fold(None, |acc, &f| match acc {
            None => Some((f, f)),
            Some((lo, hi)) => Some((lo.min(f), hi.max(f))),
        })
    }

    /// Median of the voiced frequencies
    pub fn median_frequency(&self) -> Option<f32> {
        let mut voiced: Vec<f32> = self.frequency.iter().flatten().copied().collect();
        if voiced.is_empty() {
            return None;
        }
        voiced.sort_by(f32::total_cmp);
        let mid = voiced.len() / 2;
        Some(if voiced.len() % 2 == 0 {
            0.5 * (voiced[mid - 1] + voiced[mid])
        } else {
            voiced[mid]
        })
    }
}

/// A fundamental frequency estimator
///
/// Implementations report failure instead of panicking; the pipeline turns a
/// failure into an unvoiced track on [`PitchTracker::grid`].
pub trait PitchTracker: Send + Sync {
    /// Frame grid the estimator produces for `buffer`
    fn grid(&self, buffer: &SampleBuffer) -> FrameGrid;

    /// Estimate the pitch track of `buffer` within `range`
    fn track(&self, buffer: &SampleBuffer, range: PitchRange) -> Result<PitchTrack, PitchError>;
}

/// pYIN tuning parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PyinConfig {
    /// Analysis framing (centered, zero padded)
    pub frames: FrameConfig,
    /// Number of YIN thresholds between 0 and 1
    pub n_thresholds: usize,
    /// Shape parameters of the Beta prior over thresholds
    pub beta_parameters: (u32, u32),
    /// Decay of the Boltzmann prior over trough order
    pub boltzmann_parameter: f64,
    /// Pitch bin width in semitones
    pub resolution: f64,
    /// Fastest allowed pitch change in octaves per second
    pub max_transition_rate: f64,
    /// Probability of switching between voiced and unvoiced per frame
    pub switch_probability: f64,
    /// Probability mass given to the global minimum when no trough passes
    pub no_trough_probability: f64,
}

impl Default for PyinConfig {
    fn default() -> Self {
        Self {
            frames: FrameConfig::default(),
            n_thresholds: 100,
            beta_parameters: (2, 18),
            boltzmann_parameter: 2.0,
            resolution: 0.1,
            max_transition_rate: 35.92,
            switch_probability: 0.01,
            no_trough_probability: 0.01,
        }
    }
}

/// Probabilistic YIN tracker
#[derive(Debug, Clone, Copy, Default)]
pub struct Pyin {
    config: PyinConfig,
}

impl Pyin {
    /// Tracker with the given configuration
    pub fn new(config: PyinConfig) -> Self {
        Self { config }
    }

    /// Tracker configuration
    pub fn config(&self) -> &PyinConfig {
        &self.config
    }
}

impl PitchTracker for Pyin {
    fn grid(&self, buffer: &SampleBuffer) -> FrameGrid {
        self.config
            .frames
            .grid(buffer.len(), buffer.sample_rate(), Padding::Zeros)
    }

    fn track(&self, buffer: &SampleBuffer, range: PitchRange) -> Result<PitchTrack, PitchError> {
        if buffer.samples().iter().any(|x| !x.is_finite()) {
            return Err(PitchError::NonFiniteInput);
        }
        if !(range.fmin > 0.0 && range.fmin < range.fmax) {
            return Err(PitchError::Estimator(format!(
                "invalid pitch range {}..{} Hz",
                range.fmin, range.fmax
            )));
        }

        let cfg = &self.config;
        let sr = f64::from(buffer.sample_rate());
        let fmin = f64::from(range.fmin);
        let fmax = f64::from(range.fmax);
        let frame_length = cfg.frames.frame_length;
        let win_length = frame_length / 2;

        let min_period = ((sr / fmax).floor() as usize).max(1);
        let max_period =
            ((sr / fmin).ceil() as usize).min(frame_length.saturating_sub(win_length + 1));
        if max_period < min_period + 2 {
            return Err(PitchError::EmptySearchRange {
                min_period,
                max_period,
                frame_length,
            });
        }

        let grid = self.grid(buffer);
        let padded = grid.pad_signal(buffer.samples());
        let fft = Fft::new(frame_length.next_power_of_two());
        let priors = TroughPriors::new(cfg);
        let periods = PeriodRange {
            min: min_period,
            max: max_period,
        };

        let frames: Vec<&[f32]> = grid.frames(&padded).collect();
        let candidates: Vec<Vec<Candidate>> = frames
            .par_iter()
            .map(|frame| {
                let cmnd = cumulative_mean_normalized_difference(&fft, frame, win_length, periods);
                let shifts = parabolic_shifts(&cmnd);
                trough_probabilities(&cmnd, &priors, cfg.no_trough_probability)
                    .into_iter()
                    .map(|(idx, prob)| Candidate {
                        period: (min_period + idx) as f64 + shifts[idx],
                        probability: prob,
                    })
                    .collect()
            })
            .collect();

        let bins = PitchBins::new(fmin, fmax, cfg.resolution);
        let observations: Vec<Observation> = candidates
            .iter()
            .map(|frame| Observation::from_candidates(frame, &bins, sr))
            .collect();

        let max_semitones =
            (cfg.max_transition_rate * 12.0 * grid.hop_length() as f64 / sr).round() as usize;
        let states = viterbi(
            &observations,
            &bins,
            &LocalTransition::new(bins.count, max_semitones * bins.per_semitone + 1),
            cfg.switch_probability,
        );

        let mut track = PitchTrack::unvoiced(grid);
        for (t, (&state, obs)) in states.iter().zip(observations.iter()).enumerate() {
            let voiced = state < bins.count;
            track.voiced[t] = voiced;
            track.voiced_probability[t] = obs.voiced_probability as f32;
            track.frequency[t] = voiced.then(|| bins.frequency(state) as f32);
        }

        tracing::debug!(
            num_frames = track.len(),
            min_period,
            max_period,
            pitch_bins = bins.count,
            voiced_ratio = track.voiced_ratio(),
            "pyin done"
        );

        Ok(track)
    }
}

#[derive(Debug, Clone, Copy)]
struct PeriodRange {
    min: usize,
    max: usize,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    period: f64,
    probability: f64,
}

/// Cumulative mean normalized difference d'(τ) for τ in `periods`.
///
/// Index 0 of the result corresponds to `periods.min`.
fn cumulative_mean_normalized_difference(
    fft: &Fft,
    frame: &[f32],
    win_length: usize,
    periods: PeriodRange,
) -> Vec<f64> {
    let acf = fft.cross_correlate(&frame[..win_length], frame, periods.max);

    // energy(τ) = Σ_{j=τ}^{τ+W-1} x[j]²
    let mut prefix = Vec::with_capacity(frame.len() + 1);
    prefix.push(0.0_f64);
    let mut acc = 0.0_f64;
    for &x in frame {
        acc += f64::from(x) * f64::from(x);
        prefix.push(acc);
    }
    let energy = |tau: usize| {
        let e = prefix[tau + win_length] - prefix[tau];
        if e.abs() < 1e-6 { 0.0 } else { e }
    };

    let e0 = energy(0);
    let difference: Vec<f64> = (0..=periods.max)
        .map(|tau| {
            let r = f64::from(acf[tau]);
            let r = if r.abs() < 1e-6 { 0.0 } else { r };
            (e0 + energy(tau) - 2.0 * r).max(0.0)
        })
        .collect();

    let mut running = 0.0;
    let mut cmnd = Vec::with_capacity(periods.max - periods.min + 1);
    for tau in 1..=periods.max {
        running += difference[tau];
        if tau >= periods.min {
            let mean = running / tau as f64;
            cmnd.push(difference[tau] / (mean + f64::MIN_POSITIVE));
        }
    }
    cmnd
}

/// Vertex offset of the parabola through each point and its neighbours.
///
/// Offsets of more than one sample are discarded, as are both end points.
fn parabolic_shifts(y: &[f64]) -> Vec<f64> {
    let mut shifts = vec![0.0; y.len()];
    for i in 1..y.len().saturating_sub(1) {
        let a = y[i + 1] + y[i - 1] - 2.0 * y[i];
        let b = (y[i + 1] - y[i - 1]) / 2.0;
        if b.abs() < a.abs() {
            shifts[i] = -b / a;
        }
    }
    shifts
}

/// Threshold and trough-order priors, fixed per configuration.
struct TroughPriors {
    /// Upper edge of each threshold interval
    thresholds: Vec<f64>,
    /// Beta probability mass of each threshold interval
    beta_probs: Vec<f64>,
    boltzmann: f64,
}

impl TroughPriors {
    fn new(cfg: &PyinConfig) -> Self {
        let n = cfg.n_thresholds.max(1);
        let (a, b) = cfg.beta_parameters;
        let edges: Vec<f64> = (0..=n).map(|k| k as f64 / n as f64).collect();
        let cdf: Vec<f64> = edges.iter().map(|&x| beta_cdf(x, a, b)).collect();

        Self {
            thresholds: edges[1..].to_vec(),
            beta_probs: cdf.windows(2).map(|w| w[1] - w[0]).collect(),
            boltzmann: cfg.boltzmann_parameter,
        }
    }
}

/// CDF of Beta(a, b) for integer shape parameters.
///
/// Uses the binomial identity I_x(a, b) = P[Binomial(a+b-1, x) ≥ a].
fn beta_cdf(x: f64, a: u32, b: u32) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    let n = a + b - 1;
    let mut total = 0.0;
    let mut binom = 1.0_f64; // C(n, 0)
    for j in 0..=n {
        if j > 0 {
            binom *= f64::from(n - j + 1) / f64::from(j);
        }
        if j >= a {
            total += binom * x.powi(j as i32) * (1.0 - x).powi((n - j) as i32);
        }
    }
    total.clamp(0.0, 1.0)
}

/// Boltzmann (truncated geometric) pmf on {0, …, n-1}.
fn boltzmann_pmf(k: usize, lambda: f64, n: usize) -> f64 {
    let norm = 1.0 - (-lambda * n as f64).exp();
    (1.0 - (-lambda).exp()) * (-lambda * k as f64).exp() / norm
}

/// Probability of each trough of a d'(τ) curve being the true period.
///
/// Returns `(index, probability)` for troughs with non-zero probability.
fn trough_probabilities(cmnd: &[f64], priors: &TroughPriors, no_trough_prob: f64) -> Vec<(usize, f64)> {
    let n = cmnd.len();
    if n < 2 {
        return Vec::new();
    }

    let troughs: Vec<usize> = (0..n)
        .filter(|&i| {
            if i == 0 {
                cmnd[0] < cmnd[1]
            } else if i == n - 1 {
                cmnd[i] < cmnd[i - 1]
            } else {
                cmnd[i] < cmnd[i - 1] && cmnd[i] <= cmnd[i + 1]
            }
        })
        .collect();
    if troughs.is_empty() {
        return Vec::new();
    }

    let mut probs = vec![0.0; troughs.len()];
    for (&threshold, &beta) in priors.thresholds.iter().zip(priors.beta_probs.iter()) {
        let below = troughs.iter().filter(|&&i| cmnd[i] < threshold).count();
        if below == 0 {
            continue;
        }
        let mut position = 0;
        for (t, &i) in troughs.iter().enumerate() {
            if cmnd[i] < threshold {
                probs[t] += boltzmann_pmf(position, priors.boltzmann, below) * beta;
                position += 1;
            }
        }
    }

    // The lowest trough inherits the mass of thresholds it fails to pass
    let global_min = troughs
        .iter()
        .enumerate()
        .min_by(|&(_, &a), &(_, &b)| cmnd[a].total_cmp(&cmnd[b]))
        .map_or(0, |(t, _)| t);
    let min_height = cmnd[troughs[global_min]];
    let unpassed: f64 = priors
        .thresholds
        .iter()
        .zip(priors.beta_probs.iter())
        .filter(|&(&threshold, _)| min_height >= threshold)
        .map(|(_, &beta)| beta)
        .sum();
    probs[global_min] += no_trough_prob * unpassed;

    troughs
        .into_iter()
        .zip(probs)
        .filter(|&(_, p)| p > 0.0)
        .collect()
}

/// Log-spaced pitch bins between fmin and fmax.
struct PitchBins {
    fmin: f64,
    per_semitone: usize,
    count: usize,
}

impl PitchBins {
    fn new(fmin: f64, fmax: f64, resolution: f64) -> Self {
        let per_semitone = (1.0 / resolution).ceil().max(1.0) as usize;
        let count = (12.0 * per_semitone as f64 * (fmax / fmin).log2()).floor() as usize + 1;
        Self {
            fmin,
            per_semitone,
            count,
        }
    }

    fn bins_per_octave(&self) -> f64 {
        12.0 * self.per_semitone as f64
    }

    fn index(&self, freq: f64) -> usize {
        let idx = (self.bins_per_octave() * (freq / self.fmin).log2()).round();
        (idx.max(0.0) as usize).min(self.count - 1)
    }

    fn frequency(&self, index: usize) -> f64 {
        self.fmin * 2f64.powf(index as f64 / self.bins_per_octave())
    }
}

/// Sparse voiced observation probabilities of one frame.
struct Observation {
    /// (pitch bin, probability), sorted by bin, bins unique
    voiced: Vec<(usize, f64)>,
    voiced_probability: f64,
}

impl Observation {
    fn from_candidates(candidates: &[Candidate], bins: &PitchBins, sample_rate: f64) -> Self {
        let mut voiced: Vec<(usize, f64)> = candidates
            .iter()
            .map(|c| (bins.index(sample_rate / c.period), c.probability))
            .collect();
        voiced.sort_by_key(|&(bin, _)| bin);
        voiced.dedup_by(|next, kept| {
            if next.0 == kept.0 {
                kept.1 += next.1;
                true
            } else {
                false
            }
        });

        let voiced_probability = voiced.iter().map(|&(_, p)| p).sum::<f64>().clamp(0.0, 1.0);
        Self {
            voiced,
            voiced_probability,
        }
    }

    /// Dense log observation probabilities: voiced bins then unvoiced bins.
    fn log_probs(&self, n_bins: usize, out: &mut [f64]) {
        let unvoiced = ((1.0 - self.voiced_probability) / n_bins as f64 + TINY).ln();
        let floor = TINY.ln();
        out[..n_bins].fill(floor);
        out[n_bins..].fill(unvoiced);
        for &(bin, p) in &self.voiced {
            out[bin] = (p + TINY).ln();
        }
    }
}

const TINY: f64 = f64::MIN_POSITIVE;

/// Banded triangular transition between neighbouring pitch bins.
struct LocalTransition {
    half_width: usize,
    /// log weight by distance |i - j|
    log_weight: Vec<f64>,
    /// log of each source row's normaliser
    log_norm: Vec<f64>,
}

impl LocalTransition {
    fn new(n_bins: usize, width: usize) -> Self {
        // Odd width keeps the triangle centered on the source bin
        let width = if width % 2 == 0 { width + 1 } else { width };
        let half_width = width / 2;
        let weight: Vec<f64> = (0..=half_width)
            .map(|d| 1.0 - 2.0 * d as f64 / (width as f64 + 1.0))
            .collect();

        let log_norm = (0..n_bins)
            .map(|i| {
                let lo = i.saturating_sub(half_width);
                let hi = (i + half_width).min(n_bins - 1);
                (lo..=hi).map(|j| weight[i.abs_diff(j)]).sum::<f64>().ln()
            })
            .collect();

        Self {
            half_width,
            log_weight: weight.iter().map(|w| w.ln()).collect(),
            log_norm,
        }
    }

    fn log_prob(&self, from: usize, to: usize) -> f64 {
        self.log_weight[from.abs_diff(to)] - self.log_norm[from]
    }
}

/// Most likely state sequence over voiced bins `0..n` and unvoiced bins `n..2n`.
fn viterbi(
    observations: &[Observation],
    bins: &PitchBins,
    local: &LocalTransition,
    switch_probability: f64,
) -> Vec<usize> {
    let n = bins.count;
    let n_states = 2 * n;
    let num_frames = observations.len();
    if num_frames == 0 {
        return Vec::new();
    }

    // log P(voicing_to | voicing_from), index [from][to]; 0 = voiced, 1 = unvoiced
    let stay = (1.0 - switch_probability + TINY).ln();
    let switch = (switch_probability + TINY).ln();
    let log_switch = [[stay, switch], [switch, stay]];

    let mut log_obs = vec![0.0; n_states];
    let mut value = vec![0.0; n_states];
    let mut next = vec![0.0; n_states];
    let mut backptr: Vec<Vec<u16>> = Vec::with_capacity(num_frames);

    // Start unvoiced with a uniform pitch prior
    observations[0].log_probs(n, &mut log_obs);
    let init_unvoiced = (1.0 / n as f64 + TINY).ln();
    for s in 0..n_states {
        let log_init = if s < n { TINY.ln() } else { init_unvoiced };
        value[s] = log_init + log_obs[s];
    }
    backptr.push(Vec::new());

    for obs in &observations[1..] {
        obs.log_probs(n, &mut log_obs);
        let mut ptr = vec![0u16; n_states];

        for to_voicing in 0..2 {
            for j in 0..n {
                let lo = j.saturating_sub(local.half_width);
                let hi = (j + local.half_width).min(n - 1);
                let mut best = f64::NEG_INFINITY;
                let mut best_state = 0;

                for from_voicing in 0..2 {
                    let base = from_voicing * n;
                    let switch_cost = log_switch[from_voicing][to_voicing];
                    for i in lo..=hi {
                        let score = value[base + i] + switch_cost + local.log_prob(i, j);
                        if score > best {
                            best = score;
                            best_state = base + i;
                        }
                    }
                }

                let to = to_voicing * n + j;
                next[to] = best + log_obs[to];
                ptr[to] = best_state as u16;
            }
        }

        std::mem::swap(&mut value, &mut next);
        backptr.push(ptr);
    }

    let mut state = value
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map_or(n, |(s, _)| s);

    let mut states = vec![0; num_frames];
    for t in (0..num_frames).rev() {
        states[t] = state;
        if t > 0 {
            state = backptr[t][state] as usize;
        }
    }
    states
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn sine(sample_rate: u32, freq: f32, len: usize) -> SampleBuffer {
        let samples = (0..len)
            .map(|i| 0.8 * (2.0 * PI * freq * i as f32 / sample_rate as f32).sin())
            .collect();
        SampleBuffer::new(samples, sample_rate).unwrap()
    }

    #[test]
    fn beta_cdf_matches_closed_form() {
        // Beta(2, 18): 1 - (1-x)^19 - 19x(1-x)^18
        for &x in &[0.01_f64, 0.05, 0.1, 0.3] {
            let expected = 1.0 - (1.0 - x).powi(19) - 19.0 * x * (1.0 - x).powi(18);
            assert!((beta_cdf(x, 2, 18) - expected).abs() < 1e-12);
        }
        assert_eq!(beta_cdf(0.0, 2, 18), 0.0);
        assert_eq!(beta_cdf(1.0, 2, 18), 1.0);
    }

    #[test]
    fn boltzmann_pmf_sums_to_one() {
        let total: f64 = (0..5).map(|k| boltzmann_pmf(k, 2.0, 5)).sum();
        assert!((total - 1.0).abs() < 1e-12);
        assert!(boltzmann_pmf(0, 2.0, 5) > boltzmann_pmf(1, 2.0, 5));
    }

    #[test]
    fn deepest_trough_takes_unpassed_mass() {
        let priors = TroughPriors::new(&PyinConfig::default());
        // every trough sits above every threshold
        let cmnd = [1.5, 1.2, 1.4, 1.1, 1.3];
        let probs = trough_probabilities(&cmnd, &priors, 0.01);
        assert_eq!(probs.len(), 1);
        assert_eq!(probs[0].0, 3);
        assert!((probs[0].1 - 0.01).abs() < 1e-9);
    }

    #[test]
    fn parabolic_shift_finds_vertex() {
        // y = (x - 2.3)^2 sampled at 0..5
        let y: Vec<f64> = (0..5).map(|x| (x as f64 - 2.3).powi(2)).collect();
        let shifts = parabolic_shifts(&y);
        assert!((shifts[2] - 0.3).abs() < 1e-9);
        assert_eq!(shifts[0], 0.0);
        assert_eq!(shifts[4], 0.0);
    }

    #[test]
    fn cmnd_dips_at_the_period() {
        let sr = 16000;
        let buffer = sine(sr, 400.0, 2048);
        let fft = Fft::new(2048);
        let periods = PeriodRange { min: 16, max: 200 };
        let cmnd = cumulative_mean_normalized_difference(&fft, buffer.samples(), 1024, periods);

        // Period of 400 Hz at 16 kHz is exactly 40 samples
        let at_period = cmnd[40 - periods.min];
        assert!(at_period < 0.01, "d'(40) = {at_period}");
        assert!(cmnd[30 - periods.min] > 0.5);
    }

    #[test]
    fn pitch_bins_roundtrip() {
        let bins = PitchBins::new(80.0, 1000.0, 0.1);
        assert_eq!(bins.per_semitone, 10);
        let idx = bins.index(440.0);
        assert!((bins.frequency(idx) - 440.0).abs() < 2.0);
        assert_eq!(bins.index(10.0), 0);
        assert_eq!(bins.index(1e6), bins.count - 1);
    }

    #[test]
    fn tracks_a_steady_sine() {
        let buffer = sine(16000, 220.0, 16000);
        let track = Pyin::default()
            .track(&buffer, PitchRange::new(80.0, 1000.0))
            .unwrap();

        assert_eq!(track.len(), 16000 / 512 + 1);
        let median = track.median_frequency().unwrap();
        assert!((median - 220.0).abs() < 3.0, "median {median}");
        assert!(track.voiced_ratio() > 0.8);
    }

    #[test]
    fn silence_is_unvoiced() {
        let buffer = SampleBuffer::new(vec![0.0; 8000], 16000).unwrap();
        let track = Pyin::default()
            .track(&buffer, PitchRange::new(80.0, 1000.0))
            .unwrap();

        assert!(track.frequency.iter().all(Option::is_none));
        assert!(track.voiced.iter().all(|&v| !v));
        assert!(track.voiced_probability.iter().all(|&p| p == 0.0));
    }

    #[test]
    fn rejects_non_finite_samples() {
        let mut samples = vec![0.1; 4000];
        samples[100] = f32::NAN;
        let buffer = SampleBuffer::new(samples, 16000).unwrap();
        assert_eq!(
            Pyin::default().track(&buffer, PitchRange::new(80.0, 1000.0)),
            Err(PitchError::NonFiniteInput)
        );
    }

    #[test]
    fn rejects_frame_too_short_for_range() {
        let config = PyinConfig {
            frames: FrameConfig {
                frame_length: 32,
                hop_length: 8,
            },
            ..PyinConfig::default()
        };
        let buffer = sine(16000, 220.0, 4000);
        let err = Pyin::new(config)
            .track(&buffer, PitchRange::new(80.0, 1000.0))
            .unwrap_err();
        assert!(matches!(err, PitchError::EmptySearchRange { .. }), "{err}");
    }

    #[test]
    fn unvoiced_track_has_grid_length() {
        let buffer = sine(22050, 100.0, 10000);
        let tracker = Pyin::default();
        let track = PitchTrack::unvoiced(tracker.grid(&buffer));
        assert_eq!(track.len(), 10000 / 512 + 1);
        assert_eq!(track.frequency_range(), None);
        assert_eq!(track.median_frequency(), None);
    }
}
