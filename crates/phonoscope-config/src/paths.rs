//! Platform-specific configuration paths.
//!
//! # Directory Structure
//!
//! - **User config**: `~/.config/phonoscope/` (Linux), `~/Library/Application Support/phonoscope/` (macOS), `%APPDATA%\phonoscope\` (Windows)
//! - **Settings file**: `config.toml` inside the user config directory

use std::path::PathBuf;

/// Application name used for directory paths.
const APP_NAME: &str = "phonoscope";

/// File name of the settings file.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Returns the user-specific configuration directory.
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the path of the user settings file (which may not exist).
pub fn user_config_path() -> PathBuf {
    user_config_dir().join(CONFIG_FILE_NAME)
}
