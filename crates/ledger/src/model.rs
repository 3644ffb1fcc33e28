//! Canonical entity shapes (schema version 1).
//!
//! Field names are camelCase on the wire and on disk. Id sets keep insertion
//! order so list endpoints return entities in the order they were created.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::migrate::SCHEMA_VERSION;

/// The three game slots every per-player record carries.
pub const GAME_SLOTS: [u8; 3] = [1, 2, 3];

/// Insertion-ordered set of entity ids.
///
/// Linear membership checks; teams hold tens of players, not thousands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdSet(Vec<String>);

impl IdSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an id. Returns false if it was already present.
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.contains(&id) {
            return false;
        }
        self.0.push(id);
        true
    }

    /// Remove an id. Returns false if it was not present.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|existing| existing != id);
        self.0.len() != before
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|existing| existing == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for IdSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = IdSet::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

/// An account. Owns teams through `team_ids`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
    /// Stored lowercased; compared case-insensitively.
    pub email: String,
    /// bcrypt hash. Never leaves the process in a response.
    pub password_hash: String,
    pub username: String,
    pub display_name: String,
    #[serde(default)]
    pub team_ids: IdSet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub team_id: String,
    pub owner_id: String,
    pub display_name: String,
    #[serde(default)]
    pub player_ids: IdSet,
    #[serde(default)]
    pub match_ids: IdSet,
    #[serde(default)]
    pub awards_list: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub player_id: String,
    pub display_name: String,
    pub team_id: String,
    /// Within 1900..=2100 when set.
    #[serde(default)]
    pub graduation_year: Option<i32>,
}

/// Statistics for one player in one game of a match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEntry {
    #[serde(rename = "Wood")]
    pub wood: i64,
    #[serde(rename = "Score")]
    pub score: i64,
    #[serde(rename = "isVarsity", default)]
    pub is_varsity: bool,
}

/// Per-player record within a match, keyed by game slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerMatchRecord {
    pub games: BTreeMap<u8, GameEntry>,
}

impl Default for PlayerMatchRecord {
    /// All three slots present with zeroed entries.
    fn default() -> Self {
        Self {
            games: GAME_SLOTS
                .iter()
                .map(|&slot| (slot, GameEntry::default()))
                .collect(),
        }
    }
}

impl PlayerMatchRecord {
    /// Copy of this record with any missing slot filled with the default entry.
    pub fn filled(&self) -> Self {
        let mut record = self.clone();
        for slot in GAME_SLOTS {
            record.games.entry(slot).or_default();
        }
        record
    }

    /// Entry for a slot, defaulted when absent.
    pub fn game(&self, slot: u8) -> GameEntry {
        self.games.get(&slot).copied().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub match_id: String,
    pub team_id: String,
    /// Unix timestamp in milliseconds.
    pub date: i64,
    #[serde(default)]
    pub opposing_team_name: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub per_player_data: BTreeMap<String, PlayerMatchRecord>,
}

/// The complete entity graph, as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub schema_version: u32,
    #[serde(default)]
    pub users: BTreeMap<String, User>,
    #[serde(default)]
    pub teams: BTreeMap<String, Team>,
    #[serde(default)]
    pub players: BTreeMap<String, Player>,
    #[serde(default)]
    pub matches: BTreeMap<String, Match>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            users: BTreeMap::new(),
            teams: BTreeMap::new(),
            players: BTreeMap::new(),
            matches: BTreeMap::new(),
        }
    }
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
            && self.teams.is_empty()
            && self.players.is_empty()
            && self.matches.is_empty()
    }
}
