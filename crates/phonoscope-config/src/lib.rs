//! Configuration for Phonoscope voice reports.
//!
//! A single TOML settings file controls every analysis parameter and the
//! naming of the generated report. All tables and fields are optional;
//! command-line flags override file values.
//!
//! # Features
//!
//! - **Settings**: Load and save [`Settings`] from TOML files
//! - **Pitch bounds**: Hz values or note names (`"C1"`, `"A#4"`, `"Db5"`)
//! - **Paths**: Platform-specific config directory
//!
//! # Example
//!
//! ```rust,no_run
//! use phonoscope_config::Settings;
//!
//! // Explicit file, else ~/.config/phonoscope/config.toml, else defaults
//! let settings = Settings::discover(None).unwrap();
//! let params = settings.to_params().unwrap();
//! println!("pitch range: {} .. {}", settings.analysis.fmin, settings.analysis.fmax);
//! ```

mod error;
mod settings;

/// Platform-specific paths for configuration.
pub mod paths;

pub use error::ConfigError;
pub use paths::{CONFIG_FILE_NAME, user_config_dir, user_config_path};
pub use settings::{
    AnalysisSettings, DEFAULT_DATE, DEFAULT_PATIENT_ID, PitchBound, PitchSettings, ReportSettings,
    Settings, SpectrogramSettings, StftSettings, ZcrSettings,
};
