//! The in-process entity graph and every operation that mutates it.
//!
//! A [`Roster`] owns the only live copy of users, teams, players and matches.
//! Each operation takes the graph lock once, runs its whole
//! read-validate-mutate sequence, and (for mutations) clones the result into
//! the [`Persister`] after releasing the lock.

mod accounts;
mod games;
mod guard;
mod matches;
mod players;
mod teams;
mod views;

use std::sync::{Arc, RwLock};

use ledger::{Snapshot, SnapshotStore};
use scoreconf::SavePolicy;

use crate::error::{Error, Result};
use crate::persist::Persister;

pub use accounts::NewAccount;
pub use games::parse_game_slot;
pub use matches::{MatchPatch, NewMatch};
pub use players::{NewPlayer, PlayerPatch};
pub use views::PublicUser;

/// Minimum password length at registration and on change.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Valid graduation years, inclusive.
pub const GRADUATION_YEARS: std::ops::RangeInclusive<i32> = 1900..=2100;

pub struct Roster {
    graph: RwLock<Snapshot>,
    persister: Persister,
    hash_cost: u32,
}

impl Roster {
    /// Build a roster over an already-loaded graph.
    pub fn new(graph: Snapshot, persister: Persister, hash_cost: u32) -> Self {
        Self {
            graph: RwLock::new(graph),
            persister,
            hash_cost,
        }
    }

    /// Load the graph from `store` and wire a persister back to it.
    ///
    /// Must be called from within a Tokio runtime (see [`Persister::new`]).
    pub fn open(
        store: Arc<dyn SnapshotStore>,
        policy: SavePolicy,
        hash_cost: u32,
    ) -> std::result::Result<Self, ledger::LedgerError> {
        let graph = store.load()?;
        tracing::info!(
            users = graph.users.len(),
            teams = graph.teams.len(),
            players = graph.players.len(),
            matches = graph.matches.len(),
            store = %store.describe(),
            "Roster loaded"
        );
        let persister = Persister::new(store, policy);
        Ok(Self::new(graph, persister, hash_cost))
    }

    pub fn persister(&self) -> &Persister {
        &self.persister
    }

    /// Wait for any queued snapshot saves to finish.
    pub async fn flush(&self) {
        self.persister.flush().await;
    }

    /// Copy of the current graph.
    pub fn snapshot(&self) -> Result<Snapshot> {
        self.read(|graph| Ok(graph.clone()))
    }

    fn read<T>(&self, f: impl FnOnce(&Snapshot) -> Result<T>) -> Result<T> {
        let graph = self.graph.read().map_err(|_| Error::poisoned())?;
        f(&graph)
    }

    /// Apply `f` under the write lock; on success hand the new graph to the persister.
    ///
    /// A failed operation must leave the graph untouched, so every `f`
    /// validates before its first write.
    async fn mutate<T>(&self, f: impl FnOnce(&mut Snapshot) -> Result<T>) -> Result<T> {
        let (value, snapshot) = {
            let mut graph = self.graph.write().map_err(|_| Error::poisoned())?;
            let value = f(&mut graph)?;
            (value, graph.clone())
        };
        self.persister.persist(snapshot).await;
        Ok(value)
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use ledger::MemoryStore;

    pub const PASSWORD: &str = "correct horse";

    /// Roster over a memory store with a cheap hash cost.
    pub fn roster() -> (Roster, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let persister = Persister::new(store.clone(), SavePolicy::WriteThrough);
        (Roster::new(Snapshot::default(), persister, 4), store)
    }

    pub async fn account(roster: &Roster, name: &str) -> PublicUser {
        roster
            .register(NewAccount {
                email: Some(format!("{name}@example.com")),
                password: Some(PASSWORD.to_string()),
                username: Some(name.to_string()),
                display_name: None,
            })
            .await
            .unwrap()
    }
}
