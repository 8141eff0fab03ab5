//! Register file operations.
//!
//! The register is stored as one JSON document, written atomically
//! (temp file → fsync → rename) so a crash mid-save leaves the previous
//! file intact.

use super::error::RegisterError;
use super::mnemonics::Mnemonics;
use super::register::LearningRegister;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Current register file format version
pub const REGISTER_FILE_VERSION: u32 = 1;

#[derive(Serialize)]
struct RegisterFileOut<'a> {
    version: u32,
    saved_at: DateTime<Utc>,
    entries: &'a BTreeMap<String, Mnemonics>,
    correlation: &'a BTreeMap<String, String>,
    favorites: &'a BTreeSet<String>,
}

#[derive(Deserialize)]
struct RegisterFileIn {
    version: u32,
    #[serde(default)]
    saved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    entries: BTreeMap<String, Mnemonics>,
    #[serde(default)]
    correlation: Option<BTreeMap<String, String>>,
    #[serde(default)]
    favorites: BTreeSet<String>,
}

/// Default location of the register file
pub fn default_register_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("launchrank")
        .join("register.json")
}

impl LearningRegister {
    /// Load the register at `path`, starting empty when it is missing or unreadable
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(register) => register,
            Err(e) if e.is_not_found() => {
                info!("No register at {}, starting empty", path.display());
                Self::new()
            }
            Err(e) => {
                warn!("{}; starting with an empty register", e);
                Self::new()
            }
        }
    }

    /// Load the register at `path`
    ///
    /// # Errors
    /// Returns `RegisterError` if the file cannot be read, parsed, or has a
    /// newer format version.
    pub fn try_load(path: &Path) -> Result<Self, RegisterError> {
        let text = std::fs::read_to_string(path).map_err(|source| RegisterError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: RegisterFileIn =
            serde_json::from_str(&text).map_err(|source| RegisterError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        if file.version > REGISTER_FILE_VERSION {
            return Err(RegisterError::UnsupportedVersion {
                found: file.version,
                supported: REGISTER_FILE_VERSION,
            });
        }

        let mut register = Self::empty();
        register.entries = file.entries;
        register.favorites = file.favorites;
        match file.correlation {
            Some(correlation) => register.correlation = correlation,
            None => register.seed_default_correlations(),
        }

        info!(
            "Loaded register from {} ({} entries, saved {})",
            path.display(),
            register.len(),
            file.saved_at
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| "at an unknown time".to_string())
        );
        Ok(register)
    }

    /// Prune, then write the register to `path` atomically
    ///
    /// # Errors
    /// Returns `RegisterError` on serialization, write, or rename failure;
    /// the file at `path` is untouched in that case.
    pub fn save(&mut self, path: &Path) -> Result<(), RegisterError> {
        self.prune();

        let file = RegisterFileOut {
            version: REGISTER_FILE_VERSION,
            saved_at: Utc::now(),
            entries: &self.entries,
            correlation: &self.correlation,
            favorites: &self.favorites,
        };
        let json = serde_json::to_vec_pretty(&file)?;
        write_atomic(path, &json)?;

        self.mark_clean();
        info!("Saved register to {} ({} entries)", path.display(), self.len());
        Ok(())
    }
}

/// Write `bytes` to `path` via a temp file in the same directory
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), RegisterError> {
    let write_err = |source| RegisterError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }

    let tmp_path = path.with_extension("json.tmp");
    let mut file = std::fs::File::create(&tmp_path).map_err(write_err)?;
    file.write_all(bytes).map_err(write_err)?;
    file.sync_all().map_err(write_err)?;
    drop(file);

    std::fs::rename(&tmp_path, path).map_err(|source| {
        let _ = std::fs::remove_file(&tmp_path);
        write_err(source)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{Object, ObjectKind};

    #[derive(Debug)]
    struct Leaf(&'static str);

    impl Object for Leaf {
        fn key(&self) -> String {
            format!("file:{}", self.0)
        }

        fn display(&self) -> String {
            self.0.to_string()
        }

        fn kind(&self) -> ObjectKind {
            ObjectKind::File
        }
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("register.json");

        let mut register = LearningRegister::new();
        let leaf = Leaf("notes.txt");
        let action = Leaf("open");
        register.record_hit(&leaf, "no");
        register.record_hit(&leaf, "");
        register.set_correlation(&action, &leaf);
        register.add_favorite(&leaf);
        register.save(&path).unwrap();
        assert!(!register.is_dirty());

        let loaded = LearningRegister::try_load(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.mnemonics(&leaf), register.mnemonics(&leaf));
        assert_eq!(loaded.get_correlation_bonus(&action, &leaf), 50.0);
        assert!(loaded.is_favorite(&leaf));
        assert!(!loaded.is_dirty());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        let err = LearningRegister::try_load(&path).unwrap_err();
        assert!(err.is_not_found());

        let register = LearningRegister::load(&path);
        assert!(register.is_empty());
        assert!(register.correlation("app:org.gnome.Terminal.desktop").is_some());
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("register.json");
        std::fs::write(&path, b"{ not json").unwrap();

        assert!(matches!(
            LearningRegister::try_load(&path),
            Err(RegisterError::Parse { .. })
        ));
        let register = LearningRegister::load(&path);
        assert!(register.is_empty());
    }

    #[test]
    fn test_missing_correlation_is_seeded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("register.json");
        std::fs::write(
            &path,
            br#"{"version": 1, "entries": {"file:a": {"count": 2, "keys": {"a": 1}}}}"#,
        )
        .unwrap();

        let register = LearningRegister::try_load(&path).unwrap();
        assert_eq!(register.len(), 1);
        assert_eq!(register.score_key("file:a", ""), 50.0 * (1.0 - 1.0 / 3.0));
        assert_eq!(
            register.correlation("app:org.gnome.Terminal.desktop"),
            Some("action:launch-again")
        );
    }

    #[test]
    fn test_newer_version_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("register.json");
        std::fs::write(&path, br#"{"version": 99}"#).unwrap();

        assert!(matches!(
            LearningRegister::try_load(&path),
            Err(RegisterError::UnsupportedVersion { found: 99, .. })
        ));
    }

    #[test]
    fn test_failed_save_keeps_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("register.json");

        let mut register = LearningRegister::new();
        register.record_hit(&Leaf("a"), "");
        register.save(&path).unwrap();
        let before = std::fs::read(&path).unwrap();

        // A directory where the temp file should go makes the write fail
        std::fs::create_dir(path.with_extension("json.tmp")).unwrap();
        register.record_hit(&Leaf("b"), "");
        assert!(matches!(
            register.save(&path),
            Err(RegisterError::Write { .. })
        ));
        assert!(register.is_dirty());
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }
}
