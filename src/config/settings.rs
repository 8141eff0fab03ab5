//! Settings structures for launchrank configuration

use crate::learn::{default_register_path, DEFAULT_PRUNE_THRESHOLD};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main settings structure, mirrors `settings.yml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub register: RegisterSettings,
    pub search: SearchSettings,
    pub catalog: CatalogSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to a mapping
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: Settings = serde_yaml::from_str(content)?;
        Ok(settings)
    }

    /// Merge with environment variables (LAUNCHRANK_* prefix)
    pub fn merge_env(&mut self) {
        self.merge_vars(|name| std::env::var(name).ok());
    }

    pub(crate) fn merge_vars<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = var("LAUNCHRANK_DEBUG") {
            self.general.debug = matches!(val.trim(), "1" | "true" | "yes" | "on");
        }
        if let Some(val) = var("LAUNCHRANK_REGISTER_PATH") {
            if !val.is_empty() {
                self.register.path = Some(PathBuf::from(val));
            }
        }
        if let Some(val) = var("LAUNCHRANK_SAVE_INTERVAL") {
            if let Ok(secs) = val.trim().parse() {
                self.register.save_interval_secs = secs;
            }
        }
    }

    /// Where the learning register lives
    pub fn register_path(&self) -> PathBuf {
        self.register
            .path
            .clone()
            .unwrap_or_else(default_register_path)
    }
}

/// General settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug logging
    pub debug: bool,
}

/// Learning register settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterSettings {
    /// Register file; the per-user data directory when unset
    pub path: Option<PathBuf>,
    /// Seconds between autosaves, 0 disables them
    pub save_interval_secs: u64,
    /// Registers larger than this are pruned when saved
    pub prune_threshold: usize,
}

impl Default for RegisterSettings {
    fn default() -> Self {
        Self {
            path: None,
            save_interval_secs: 300,
            prune_threshold: DEFAULT_PRUNE_THRESHOLD,
        }
    }
}

/// Search behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Rows shown per query
    pub max_results: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self { max_results: 10 }
    }
}

/// Which sources to build and how
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Directories to index
    pub directories: Vec<PathBuf>,
    /// Index dotfiles
    pub include_hidden: bool,
    /// How deep to descend below each directory (1 = direct children)
    pub max_depth: usize,
    /// Enable the calculator text source
    pub calculator: bool,
    /// Enable the URL text source
    pub urls: bool,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            directories: dirs::home_dir().into_iter().collect(),
            include_hidden: false,
            max_depth: 1,
            calculator: true,
            urls: true,
        }
    }
}
