//! Register persistence errors

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading or writing the register file
#[derive(Debug, Error)]
pub enum RegisterError {
    #[error("failed to read register file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse register file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported register file version {found} (expected at most {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("failed to serialize register: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write register file '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl RegisterError {
    /// Whether the error only means there is no register file yet
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Read { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}
