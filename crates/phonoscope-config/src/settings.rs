//! Settings file format and conversion to analysis parameters.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use phonoscope_analysis::note::{note_name, note_to_hz};
use phonoscope_analysis::{
    AnalysisParams, DEFAULT_THRESHOLD, DbScale, FrameConfig, PitchRange, PyinConfig, StftConfig,
    Window,
};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::paths::user_config_path;

/// Default patient identifier used in artifact names.
pub const DEFAULT_PATIENT_ID: &str = "test_patient";

/// Default date string used in artifact names.
pub const DEFAULT_DATE: &str = "20251231";

/// A pitch bound given either in Hz or as a note name.
///
/// In TOML: `fmin = 65.4` or `fmin = "C2"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PitchBound {
    /// Frequency in Hz
    Hz(f32),
    /// Note name such as `"C1"`, `"A#4"`, `"Db5"`
    Note(String),
}

impl PitchBound {
    /// Resolve to Hz.
    pub fn hz(&self) -> Result<f32, ConfigError> {
        match self {
            PitchBound::Hz(hz) => Ok(*hz),
            PitchBound::Note(name) => {
                note_to_hz(name).ok_or_else(|| ConfigError::InvalidNote(name.clone()))
            }
        }
    }
}

impl FromStr for PitchBound {
    type Err = ConfigError;

    /// Numbers are Hz; anything else must be a valid note name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(hz) = s.parse::<f32>() {
            return Ok(PitchBound::Hz(hz));
        }
        if note_to_hz(s).is_none() {
            return Err(ConfigError::InvalidNote(s.to_string()));
        }
        Ok(PitchBound::Note(s.to_string()))
    }
}

impl fmt::Display for PitchBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PitchBound::Hz(hz) => match note_name(*hz) {
                Some(note) => write!(f, "{hz} Hz (~{note})"),
                None => write!(f, "{hz} Hz"),
            },
            PitchBound::Note(name) => match note_to_hz(name) {
                Some(hz) => write!(f, "{name} ({hz:.2} Hz)"),
                None => f.write_str(name),
            },
        }
    }
}

/// `[analysis]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Zero-crossing silencing threshold, in [0, 0.5]
    pub threshold: f32,
    /// Lowest pitch searched
    pub fmin: PitchBound,
    /// Highest pitch searched
    pub fmax: PitchBound,
    /// Dynamic range of the dB conversions
    pub top_db: f32,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            fmin: PitchBound::Note("C1".to_string()),
            fmax: PitchBound::Note("C6".to_string()),
            top_db: DbScale::default().top_db,
        }
    }
}

/// `[spectrogram.wideband]` / `[spectrogram.narrowband]` tables.
///
/// Unset fields keep the view's built-in value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StftSettings {
    /// FFT length in samples
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_fft: Option<usize>,
    /// Hop length in samples
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hop_length: Option<usize>,
    /// Window name: hann, hamming or rectangular
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<String>,
}

impl StftSettings {
    fn resolve(&self, base: StftConfig) -> Result<StftConfig, ConfigError> {
        let window = match &self.window {
            Some(name) => {
                Window::from_name(name).ok_or_else(|| ConfigError::UnknownWindow(name.clone()))?
            }
            None => base.window,
        };
        Ok(StftConfig {
            n_fft: self.n_fft.unwrap_or(base.n_fft),
            hop_length: self.hop_length.unwrap_or(base.hop_length),
            window,
        })
    }
}

/// `[spectrogram]` table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectrogramSettings {
    /// Short-window view (512 / 128 unless overridden)
    pub wideband: StftSettings,
    /// Long-window view (4096 / 1024 unless overridden)
    pub narrowband: StftSettings,
}

/// `[pitch]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PitchSettings {
    /// Frame length of pitch and intensity
    pub frame_length: usize,
    /// Hop length of pitch and intensity
    pub hop_length: usize,
    /// Number of YIN thresholds
    pub n_thresholds: usize,
    /// Beta prior shape parameters
    pub beta_parameters: [u32; 2],
    /// Boltzmann prior decay
    pub boltzmann_parameter: f64,
    /// Pitch bin width in semitones
    pub resolution: f64,
    /// Fastest pitch change in octaves per second
    pub max_transition_rate: f64,
    /// Voiced/unvoiced switch probability
    pub switch_probability: f64,
    /// Mass given to the global minimum when no trough passes
    pub no_trough_probability: f64,
}

impl Default for PitchSettings {
    fn default() -> Self {
        let pyin = PyinConfig::default();
        Self {
            frame_length: pyin.frames.frame_length,
            hop_length: pyin.frames.hop_length,
            n_thresholds: pyin.n_thresholds,
            beta_parameters: [pyin.beta_parameters.0, pyin.beta_parameters.1],
            boltzmann_parameter: pyin.boltzmann_parameter,
            resolution: pyin.resolution,
            max_transition_rate: pyin.max_transition_rate,
            switch_probability: pyin.switch_probability,
            no_trough_probability: pyin.no_trough_probability,
        }
    }
}

fn probability(field: &'static str, value: f64) -> Result<f64, ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::InvalidValue {
            field,
            reason: format!("{value} is not a probability"),
        })
    }
}

fn positive(field: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::InvalidValue {
            field,
            reason: format!("{value} must be positive"),
        })
    }
}

impl PitchSettings {
    fn to_config(&self) -> Result<PyinConfig, ConfigError> {
        let [a, b] = self.beta_parameters;
        if a == 0 || b == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pitch.beta_parameters",
                reason: format!("[{a}, {b}]: both must be at least 1"),
            });
        }
        if self.n_thresholds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pitch.n_thresholds",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(PyinConfig {
            frames: FrameConfig {
                frame_length: self.frame_length,
                hop_length: self.hop_length,
            },
            n_thresholds: self.n_thresholds,
            beta_parameters: (a, b),
            boltzmann_parameter: positive("pitch.boltzmann_parameter", self.boltzmann_parameter)?,
            resolution: positive("pitch.resolution", self.resolution)?,
            max_transition_rate: positive("pitch.max_transition_rate", self.max_transition_rate)?,
            switch_probability: probability("pitch.switch_probability", self.switch_probability)?,
            no_trough_probability: probability(
                "pitch.no_trough_probability",
                self.no_trough_probability,
            )?,
        })
    }
}

/// `[zcr]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZcrSettings {
    /// Frame length in samples
    pub frame_length: usize,
    /// Hop length in samples
    pub hop_length: usize,
}

impl Default for ZcrSettings {
    fn default() -> Self {
        let frames = FrameConfig::default();
        Self {
            frame_length: frames.frame_length,
            hop_length: frames.hop_length,
        }
    }
}

/// `[report]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Identifier used in the artifact name
    pub patient_id: String,
    /// Date string used in the artifact name
    pub date: String,
    /// Directory the report is written to (current directory if unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            patient_id: DEFAULT_PATIENT_ID.to_string(),
            date: DEFAULT_DATE.to_string(),
            output_dir: None,
        }
    }
}

/// Complete settings file.
///
/// # TOML Format
///
/// ```toml
/// [analysis]
/// threshold = 0.05
/// fmin = "C2"
/// fmax = 800.0
/// top_db = 60.0
///
/// [spectrogram.narrowband]
/// n_fft = 8192
///
/// [pitch]
/// hop_length = 256
///
/// [report]
/// patient_id = "p042"
/// date = "20250301"
/// ```
///
/// Every table and field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Core analysis parameters
    pub analysis: AnalysisSettings,
    /// Spectrogram views
    pub spectrogram: SpectrogramSettings,
    /// pYIN tuning and the pitch/intensity grid
    pub pitch: PitchSettings,
    /// Zero-crossing grid
    pub zcr: ZcrSettings,
    /// Artifact naming and destination
    pub report: ReportSettings,
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load settings from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Load the user settings file if it exists.
    pub fn load_user() -> Result<Option<Self>, ConfigError> {
        let path = user_config_path();
        if path.is_file() {
            Self::load(&path).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Settings from `explicit` if given, else the user file, else defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None => Ok(Self::load_user()?.unwrap_or_default()),
        }
    }

    /// Save the settings to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the settings to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Pipeline parameters described by these settings.
    ///
    /// Range checks that depend on the recording (Nyquist, ordering of the
    /// pitch bounds) are left to [`AnalysisParams::validate`].
    pub fn to_params(&self) -> Result<AnalysisParams, ConfigError> {
        let a = &self.analysis;
        Ok(AnalysisParams {
            threshold: a.threshold,
            pitch_range: PitchRange::new(a.fmin.hz()?, a.fmax.hz()?),
            wideband: self.spectrogram.wideband.resolve(StftConfig::wideband())?,
            narrowband: self
                .spectrogram
                .narrowband
                .resolve(StftConfig::narrowband())?,
            pitch: self.pitch.to_config()?,
            zcr_frames: FrameConfig {
                frame_length: self.zcr.frame_length,
                hop_length: self.zcr.hop_length,
            },
            db: DbScale::with_top_db(a.top_db),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_analysis_defaults() {
        let params = Settings::default().to_params().unwrap();
        let expected = AnalysisParams::default();

        assert!((params.pitch_range.fmin - expected.pitch_range.fmin).abs() < 1e-3);
        assert!((params.pitch_range.fmax - expected.pitch_range.fmax).abs() < 1e-2);
        assert_eq!(params.wideband, expected.wideband);
        assert_eq!(params.narrowband, expected.narrowband);
        assert_eq!(params.pitch, expected.pitch);
        assert_eq!(params.zcr_frames, expected.zcr_frames);
        assert_eq!(params.db, expected.db);
        assert_eq!(params.threshold, expected.threshold);
    }

    #[test]
    fn empty_file_is_all_defaults() {
        assert_eq!(Settings::from_toml("").unwrap(), Settings::default());
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let settings = Settings::from_toml(
            r#"
            [analysis]
            fmin = 75
            fmax = "A5"

            [spectrogram.narrowband]
            n_fft = 8192

            [report]
            patient_id = "p042"
            "#,
        )
        .unwrap();

        assert_eq!(settings.analysis.fmin, PitchBound::Hz(75.0));
        assert_eq!(settings.analysis.threshold, DEFAULT_THRESHOLD);
        assert_eq!(settings.report.date, DEFAULT_DATE);

        let params = settings.to_params().unwrap();
        assert!((params.pitch_range.fmax - 880.0).abs() < 1e-2);
        assert_eq!(params.narrowband.n_fft, 8192);
        assert_eq!(params.narrowband.hop_length, 1024);
        assert_eq!(params.wideband, StftConfig::wideband());
    }

    #[test]
    fn pitch_bound_from_cli_string() {
        assert_eq!("110".parse::<PitchBound>().unwrap(), PitchBound::Hz(110.0));
        assert_eq!(
            "Bb3".parse::<PitchBound>().unwrap(),
            PitchBound::Note("Bb3".into())
        );
        assert!(matches!(
            "loud".parse::<PitchBound>(),
            Err(ConfigError::InvalidNote(_))
        ));
    }

    #[test]
    fn pitch_bound_display() {
        assert_eq!(PitchBound::Hz(440.0).to_string(), "440 Hz (~A4)");
        assert_eq!(PitchBound::Note("A4".into()).to_string(), "A4 (440.00 Hz)");
    }

    #[test]
    fn bad_values_are_reported() {
        let bad_note = Settings::from_toml("[analysis]\nfmin = \"X9\"").unwrap();
        assert!(matches!(bad_note.to_params(), Err(ConfigError::InvalidNote(_))));

        let bad_window =
            Settings::from_toml("[spectrogram.wideband]\nwindow = \"kaiser\"").unwrap();
        assert!(matches!(
            bad_window.to_params(),
            Err(ConfigError::UnknownWindow(_))
        ));

        let bad_prob = Settings::from_toml("[pitch]\nswitch_probability = 1.5").unwrap();
        assert!(matches!(
            bad_prob.to_params(),
            Err(ConfigError::InvalidValue {
                field: "pitch.switch_probability",
                ..
            })
        ));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        assert!(matches!(
            Settings::from_toml("[analysis\nthreshold = "),
            Err(ConfigError::TomlParse(_))
        ));
    }
}
