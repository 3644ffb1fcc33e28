//! Scorebook: a REST backend for teams, players, matches and per-game stats.
//!
//! - [`roster`]: the in-memory entity graph and its invariants
//! - [`persist`]: hands snapshots to a [`ledger::SnapshotStore`]
//! - [`http`]: axum routes, body coercion, the password guard
//! - [`serve`]: process bootstrap

pub mod error;
pub mod http;
pub mod persist;
pub mod roster;
pub mod serve;
pub mod telemetry;

pub use error::{Error, Result};
pub use http::{router, AppState};
pub use persist::Persister;
pub use roster::Roster;
