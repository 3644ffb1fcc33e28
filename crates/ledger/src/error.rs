use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or saving snapshots.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to decode snapshot: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("snapshot schema version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u64, supported: u32 },

    #[error("malformed snapshot: {0}")]
    Malformed(String),

    #[error("snapshot store lock poisoned")]
    Poisoned,
}
