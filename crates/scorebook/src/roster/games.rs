//! Per-player game records inside a match.

use ledger::{GameEntry, PlayerMatchRecord, GAME_SLOTS};

use super::guard::{owned_team, team_match, team_player};
use super::Roster;
use crate::error::{Error, Result};

/// Parse a game slot from its path segment. Accepts `1`, `2` or `3` in any
/// integral numeric spelling (`"2"`, `" 2 "`, `"2.0"`).
pub fn parse_game_slot(raw: &str) -> Result<u8> {
    let invalid = || Error::validation("gameIndex must be 1, 2 or 3");
    let value: f64 = raw.trim().parse().map_err(|_| invalid())?;
    if value.fract() != 0.0 {
        return Err(invalid());
    }
    GAME_SLOTS
        .into_iter()
        .find(|&slot| f64::from(slot) == value)
        .ok_or_else(invalid)
}

impl Roster {
    /// Overwrite one slot of a player's record in a match.
    ///
    /// Checks run in order: ownership, match in team, player in team, slot.
    /// A player with no record yet gets the default three-slot record first.
    pub async fn set_game_entry(
        &self,
        user_id: &str,
        team_id: &str,
        match_id: &str,
        player_id: &str,
        slot: &str,
        entry: GameEntry,
    ) -> Result<GameEntry> {
        self.mutate(|graph| {
            owned_team(graph, user_id, team_id)?;
            team_match(graph, team_id, match_id)?;
            team_player(graph, team_id, player_id)?;
            let slot = parse_game_slot(slot)?;

            let game_match = graph
                .matches
                .get_mut(match_id)
                .ok_or_else(Error::match_not_found)?;
            game_match
                .per_player_data
                .entry(player_id.to_string())
                .or_default()
                .games
                .insert(slot, entry);

            tracing::info!(
                match_id = %match_id,
                player_id = %player_id,
                slot,
                wood = entry.wood,
                score = entry.score,
                "Game entry recorded"
            );
            Ok(entry)
        })
        .await
    }

    /// A player's record in a match with every slot filled.
    ///
    /// The player itself is not looked up: a player with no record (including
    /// one that has since been deleted) reads as the default record.
    pub fn player_match_data(
        &self,
        user_id: &str,
        team_id: &str,
        match_id: &str,
        player_id: &str,
    ) -> Result<PlayerMatchRecord> {
        self.read(|graph| {
            owned_team(graph, user_id, team_id)?;
            let game_match = team_match(graph, team_id, match_id)?;
            Ok(game_match
                .per_player_data
                .get(player_id)
                .map(PlayerMatchRecord::filled)
                .unwrap_or_default())
        })
    }
}
