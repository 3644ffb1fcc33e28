//! Snapshot model and persistence adapters for Scorebook.
//!
//! The server keeps the whole entity graph in memory and hands a complete
//! [`Snapshot`] to a [`SnapshotStore`] after every mutation. This crate owns
//! the canonical on-disk shape of that graph and the adapters that persist it:
//!
//! - [`MemoryStore`]: keeps the last snapshot in memory (tests, throwaway runs)
//! - [`FileStore`]: one pretty-printed JSON document, replaced atomically
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use ledger::{FileStore, Snapshot, SnapshotStore};
//!
//! let store = FileStore::new("/var/lib/scorebook/database.json").unwrap();
//! let mut snapshot = store.load().unwrap();
//! snapshot.users.clear();
//! store.save(&snapshot).unwrap();
//! ```
//!
//! # Schema versions
//!
//! Snapshots carry `schemaVersion`. Files written before versioning (version 0)
//! are upgraded on load by [`migrate::upgrade`]; nothing outside that module
//! has to know older shapes existed.

pub mod error;
pub mod migrate;
pub mod model;
pub mod store;

pub use error::LedgerError;
pub use migrate::SCHEMA_VERSION;
pub use model::{
    GameEntry, IdSet, Match, Player, PlayerMatchRecord, Snapshot, Team, User, GAME_SLOTS,
};
pub use store::{FileStore, MemoryStore, SnapshotStore};
