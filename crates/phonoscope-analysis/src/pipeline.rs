//! The analysis pipeline: five independent stages over one buffer
//!
//! Both spectrograms, the pitch track, the energy track and the
//! zero-crossing track are computed concurrently on the rayon pool. The only
//! coupling between stages is the frame grid shared by pitch and energy.

use std::fmt;
use std::time::{Duration, Instant};

use crate::buffer::SampleBuffer;
use crate::db::DbScale;
use crate::energy::{EnergyEstimator, EnergyTrack};
use crate::error::{ParameterError, PitchError};
use crate::frames::FrameConfig;
use crate::pitch::{PitchRange, PitchTrack, PitchTracker, Pyin, PyinConfig};
use crate::spectrogram::{self, Spectrogram, StftConfig};
use crate::zcr::{DEFAULT_THRESHOLD, ZcrTrack, ZeroCrossingAnalyzer};

/// Largest accepted silencing threshold.
pub const MAX_THRESHOLD: f32 = 0.5;

/// C1 in Hz.
pub const DEFAULT_FMIN: f32 = 32.703_197;

/// C6 in Hz.
pub const DEFAULT_FMAX: f32 = 1046.502_3;

/// Every tunable of one pipeline run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisParams {
    /// ZCR silencing threshold, in [0, 0.5]
    pub threshold: f32,
    /// Pitch search bounds
    pub pitch_range: PitchRange,
    /// Short-window spectrogram
    pub wideband: StftConfig,
    /// Long-window spectrogram
    pub narrowband: StftConfig,
    /// pYIN settings, including the pitch/energy framing
    pub pitch: PyinConfig,
    /// Zero-crossing framing
    pub zcr_frames: FrameConfig,
    /// Decibel conversion for spectrograms and energy
    pub db: DbScale,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            pitch_range: PitchRange::new(DEFAULT_FMIN, DEFAULT_FMAX),
            wideband: StftConfig::wideband(),
            narrowband: StftConfig::narrowband(),
            pitch: PyinConfig::default(),
            zcr_frames: FrameConfig::default(),
            db: DbScale::default(),
        }
    }
}

impl AnalysisParams {
    /// Check the parameters against `buffer` before any computation.
    pub fn validate(&self, buffer: &SampleBuffer) -> Result<(), ParameterError> {
        if buffer.is_empty() {
            return Err(ParameterError::EmptyBuffer);
        }
        if buffer.sample_rate() == 0 {
            return Err(ParameterError::ZeroSampleRate);
        }
        if !(0.0..=MAX_THRESHOLD).contains(&self.threshold) {
            return Err(ParameterError::ThresholdOutOfRange(self.threshold));
        }

        let PitchRange { fmin, fmax } = self.pitch_range;
        if !(fmin > 0.0) {
            return Err(ParameterError::NonPositiveFmin(fmin));
        }
        if !(fmin < fmax) {
            return Err(ParameterError::PitchRangeInverted { fmin, fmax });
        }
        let nyquist = buffer.nyquist();
        if fmax >= nyquist {
            return Err(ParameterError::FmaxAboveNyquist { fmax, nyquist });
        }

        self.wideband.validate("wideband spectrogram")?;
        self.narrowband.validate("narrowband spectrogram")?;
        self.pitch.frames.validate("pitch")?;
        self.zcr_frames.validate("zero-crossing")?;

        if !(self.db.top_db > 0.0) {
            return Err(ParameterError::InvalidTopDb(self.db.top_db));
        }
        Ok(())
    }

    /// pYIN tracker configured from these parameters
    pub fn tracker(&self) -> Pyin {
        Pyin::new(self.pitch)
    }
}

/// One unit of work in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Short-window STFT
    Wideband,
    /// Long-window STFT
    Narrowband,
    /// Fundamental frequency tracking
    Pitch,
    /// Framewise RMS
    Energy,
    /// Thresholded zero-crossing rate
    ZeroCrossing,
}

impl Stage {
    /// All stages, in report order
    pub const ALL: [Stage; 5] = [
        Stage::Wideband,
        Stage::Narrowband,
        Stage::Pitch,
        Stage::Energy,
        Stage::ZeroCrossing,
    ];

    /// Human-readable stage name
    pub fn name(self) -> &'static str {
        match self {
            Stage::Wideband => "wideband spectrogram",
            Stage::Narrowband => "narrowband spectrogram",
            Stage::Pitch => "pitch",
            Stage::Energy => "intensity",
            Stage::ZeroCrossing => "zero-crossing rate",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Receives stage progress from [`analyze`].
///
/// Callbacks arrive from rayon worker threads, possibly concurrently.
pub trait AnalysisObserver: Sync {
    /// A stage is about to run.
    fn stage_started(&self, _stage: Stage) {}

    /// A stage completed after `elapsed`.
    fn stage_finished(&self, _stage: Stage, _elapsed: Duration) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl AnalysisObserver for NoopObserver {}

/// A non-fatal condition met while analysing.
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// The pitch tracker failed; the report carries an unvoiced track.
    PitchFallback(PitchError),
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::PitchFallback(err) => {
                write!(f, "pitch tracking unavailable ({err}); pitch contour omitted")
            }
        }
    }
}

/// Output of one pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    /// Wideband spectrogram in dB
    pub wideband: Spectrogram,
    /// Narrowband spectrogram in dB
    pub narrowband: Spectrogram,
    /// Pitch track (unvoiced throughout if tracking failed)
    pub pitch: PitchTrack,
    /// Energy on the pitch grid
    pub energy: EnergyTrack,
    /// Zero-crossing rate
    pub zcr: ZcrTrack,
    /// Non-fatal conditions
    pub warnings: Vec<Warning>,
}

impl AnalysisReport {
    /// True if the pitch track is a fallback
    pub fn pitch_fell_back(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w, Warning::PitchFallback(_)))
    }
}

fn timed<T>(observer: &dyn AnalysisObserver, stage: Stage, work: impl FnOnce() -> T) -> T {
    observer.stage_started(stage);
    let start = Instant::now();
    let out = work();
    let elapsed = start.elapsed();
    tracing::debug!(%stage, elapsed_ms = elapsed.as_secs_f64() * 1e3, "stage finished");
    observer.stage_finished(stage, elapsed);
    out
}

/// Run every analysis over `buffer`.
///
/// Parameters are validated before any stage starts. A pitch tracker failure
/// does not fail the run: the track is replaced by an unvoiced one on the
/// tracker's grid and a [`Warning::PitchFallback`] is recorded.
pub fn analyze(
    buffer: &SampleBuffer,
    params: &AnalysisParams,
    tracker: &dyn PitchTracker,
    observer: &dyn AnalysisObserver,
) -> Result<AnalysisReport, ParameterError> {
    params.validate(buffer)?;

    let start = Instant::now();
    let pitch_grid = tracker.grid(buffer);
    let energy_estimator = EnergyEstimator::new(
        FrameConfig {
            frame_length: pitch_grid.frame_length(),
            hop_length: pitch_grid.hop_length(),
        },
        params.db,
    );
    let zcr_analyzer = ZeroCrossingAnalyzer::new(params.zcr_frames);

    let ((wideband, narrowband), (pitch, (energy, zcr))) = rayon::join(
        || {
            rayon::join(
                || {
                    timed(observer, Stage::Wideband, || {
                        spectrogram::compute(buffer, &params.wideband, params.db)
                    })
                },
                || {
                    timed(observer, Stage::Narrowband, || {
                        spectrogram::compute(buffer, &params.narrowband, params.db)
                    })
                },
            )
        },
        || {
            rayon::join(
                || {
                    timed(observer, Stage::Pitch, || {
                        tracker.track(buffer, params.pitch_range)
                    })
                },
                || {
                    rayon::join(
                        || timed(observer, Stage::Energy, || energy_estimator.rms(buffer)),
                        || {
                            timed(observer, Stage::ZeroCrossing, || {
                                zcr_analyzer.zcr(buffer, params.threshold)
                            })
                        },
                    )
                },
            )
        },
    );

    let mut warnings = Vec::new();
    let pitch = match pitch {
        Ok(track) => track,
        Err(err) => {
            tracing::warn!(error = %err, "pitch tracking failed, using unvoiced track");
            warnings.push(Warning::PitchFallback(err));
            PitchTrack::unvoiced(pitch_grid)
        }
    };

    tracing::debug!(
        samples = buffer.len(),
        sample_rate = buffer.sample_rate(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1e3,
        "analysis done"
    );

    Ok(AnalysisReport {
        wideband,
        narrowband,
        pitch,
        energy,
        zcr,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn tone(sample_rate: u32, secs: f32) -> SampleBuffer {
        let n = (sample_rate as f32 * secs) as usize;
        let samples = (0..n)
            .map(|i| 0.5 * (2.0 * PI * 200.0 * i as f32 / sample_rate as f32).sin())
            .collect();
        SampleBuffer::new(samples, sample_rate).unwrap()
    }

    #[test]
    fn default_params_are_valid() {
        let buffer = tone(16000, 0.1);
        assert_eq!(AnalysisParams::default().validate(&buffer), Ok(()));
    }

    #[test]
    fn rejects_bad_parameters() {
        let buffer = tone(16000, 0.1);
        let base = AnalysisParams::default();

        let cases = [
            (
                AnalysisParams {
                    threshold: 0.6,
                    ..base
                },
                ParameterError::ThresholdOutOfRange(0.6),
            ),
            (
                AnalysisParams {
                    threshold: -0.1,
                    ..base
                },
                ParameterError::ThresholdOutOfRange(-0.1),
            ),
            (
                AnalysisParams {
                    pitch_range: PitchRange::new(0.0, 500.0),
                    ..base
                },
                ParameterError::NonPositiveFmin(0.0),
            ),
            (
                AnalysisParams {
                    pitch_range: PitchRange::new(500.0, 100.0),
                    ..base
                },
                ParameterError::PitchRangeInverted {
                    fmin: 500.0,
                    fmax: 100.0,
                },
            ),
            (
                AnalysisParams {
                    pitch_range: PitchRange::new(50.0, 8000.0),
                    ..base
                },
                ParameterError::FmaxAboveNyquist {
                    fmax: 8000.0,
                    nyquist: 8000.0,
                },
            ),
            (
                AnalysisParams {
                    db: DbScale::with_top_db(0.0),
                    ..base
                },
                ParameterError::InvalidTopDb(0.0),
            ),
        ];

        for (params, expected) in cases {
            assert_eq!(params.validate(&buffer), Err(expected));
        }
    }

    #[test]
    fn rejects_zero_hop() {
        let buffer = tone(16000, 0.1);
        let params = AnalysisParams {
            wideband: StftConfig {
                hop_length: 0,
                ..StftConfig::wideband()
            },
            ..AnalysisParams::default()
        };
        assert!(matches!(
            params.validate(&buffer),
            Err(ParameterError::InvalidFraming { .. })
        ));
    }

    #[test]
    fn energy_shares_pitch_grid() {
        let buffer = tone(16000, 0.5);
        let params = AnalysisParams::default();
        let report = analyze(&buffer, &params, &params.tracker(), &NoopObserver).unwrap();

        assert_eq!(report.energy.grid, report.pitch.grid);
        assert_eq!(report.pitch.len(), buffer.len() / 512 + 1);
        assert!(report.warnings.is_empty());
        assert!(!report.pitch_fell_back());
    }

    #[test]
    fn warning_mentions_cause() {
        let warning = Warning::PitchFallback(PitchError::NonFiniteInput);
        assert!(warning.to_string().contains("non-finite"));
    }
}
