//! Snapshot persistence adapters.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, RwLock};

use crate::error::LedgerError;
use crate::migrate;
use crate::model::Snapshot;

/// Trait for snapshot storage backends.
///
/// Every save is a full snapshot of the entity graph; implementations may
/// simply replace whatever they held before.
pub trait SnapshotStore: Send + Sync {
    /// Load the persisted graph. An empty backend yields an empty snapshot.
    fn load(&self) -> Result<Snapshot, LedgerError>;

    /// Replace the persisted graph with `snapshot`.
    fn save(&self, snapshot: &Snapshot) -> Result<(), LedgerError>;

    /// Short human-readable description, e.g. `file:/var/lib/scorebook/database.json`.
    fn describe(&self) -> String;
}

/// In-memory snapshot store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: RwLock<Snapshot>,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful saves since construction.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// The most recently saved snapshot.
    pub fn latest(&self) -> Result<Snapshot, LedgerError> {
        self.load()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Snapshot, LedgerError> {
        let snapshot = self.snapshot.read().map_err(|_| LedgerError::Poisoned)?;
        Ok(snapshot.clone())
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), LedgerError> {
        let mut current = self.snapshot.write().map_err(|_| LedgerError::Poisoned)?;
        *current = snapshot.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

/// File-backed snapshot store: one JSON document, replaced atomically.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    /// Serializes writers so concurrent saves never share the temp file.
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open the store at `path`, creating parent directories and an empty
    /// database file if none exists yet.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| LedgerError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let store = Self {
            path,
            write_lock: Mutex::new(()),
        };

        if store.path.exists() {
            tracing::info!(path = %store.path.display(), "Using existing database file");
        } else {
            store.save(&Snapshot::default())?;
            tracing::info!(path = %store.path.display(), "Created initial database file");
        }

        Ok(store)
    }
}

impl SnapshotStore for FileStore {
    fn load(&self) -> Result<Snapshot, LedgerError> {
        let json = fs::read_to_string(&self.path).map_err(|source| LedgerError::Read {
            path: self.path.clone(),
            source,
        })?;

        if json.trim().is_empty() {
            return Ok(Snapshot::default());
        }

        let value: serde_json::Value = serde_json::from_str(&json)?;
        migrate::upgrade(value)
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), LedgerError> {
        let json = serde_json::to_string_pretty(snapshot)?;
        let _guard = self.write_lock.lock().map_err(|_| LedgerError::Poisoned)?;

        // Atomic write: write to temp, then rename
        let temp_path = self.path.with_extension("tmp");
        let write_err = |source| LedgerError::Write {
            path: self.path.clone(),
            source,
        };
        fs::write(&temp_path, json).map_err(write_err)?;
        fs::rename(&temp_path, &self.path).map_err(write_err)?;

        Ok(())
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}
