//! Configuration module for launchrank
//!
//! Handles locating and loading settings from YAML files and environment variables.

mod settings;

pub use settings::*;

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable naming an explicit settings file
pub const SETTINGS_PATH_VAR: &str = "LAUNCHRANK_SETTINGS_PATH";

/// Find the settings file to use, if any.
///
/// An explicit path wins, then `LAUNCHRANK_SETTINGS_PATH`, then
/// `./launchrank.yml`, then the per-user config directory.
pub fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(path) = std::env::var_os(SETTINGS_PATH_VAR) {
        return Some(PathBuf::from(path));
    }

    let local = PathBuf::from("launchrank.yml");
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("launchrank").join("settings.yml"))
        .filter(|path| path.is_file())
}

/// Load settings, falling back to defaults when no file is found, then
/// apply environment overrides.
pub fn load(explicit: Option<&Path>) -> Result<Settings> {
    let mut settings = match locate(explicit) {
        Some(path) => {
            info!("Loading settings from {}", path.display());
            Settings::from_file(&path)?
        }
        None => Settings::default(),
    };
    settings.merge_env();
    Ok(settings)
}
