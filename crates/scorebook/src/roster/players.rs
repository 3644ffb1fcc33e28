use ledger::Player;

use super::guard::{owned_team, owned_team_mut, team_player};
use super::teams::non_blank;
use super::{new_id, now_millis, Roster, GRADUATION_YEARS};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Default)]
pub struct NewPlayer {
    pub display_name: Option<String>,
    /// `None` leaves the year unset; any number must be a valid year.
    pub graduation_year: Option<f64>,
}

/// Partial player update. Only `Some` fields change.
#[derive(Debug, Clone, Default)]
pub struct PlayerPatch {
    pub display_name: Option<String>,
    /// A present-but-null year arrives as `NaN` and is rejected.
    pub graduation_year: Option<f64>,
}

impl Roster {
    pub async fn create_player(&self, user_id: &str, team_id: &str, new: NewPlayer) -> Result<Player> {
        let display_name =
            non_blank(new.display_name).unwrap_or_else(|| format!("Player {}", now_millis()));
        let graduation_year = new.graduation_year.map(checked_year).transpose()?;

        self.mutate(|graph| {
            let team = owned_team_mut(graph, user_id, team_id)?;
            let player = Player {
                player_id: new_id(),
                display_name,
                team_id: team.team_id.clone(),
                graduation_year,
            };
            team.player_ids.insert(player.player_id.clone());
            graph.players.insert(player.player_id.clone(), player.clone());
            tracing::info!(team_id = %team_id, player_id = %player.player_id, "Player created");
            Ok(player)
        })
        .await
    }

    pub fn list_players(&self, user_id: &str, team_id: &str) -> Result<Vec<Player>> {
        self.read(|graph| {
            let team = owned_team(graph, user_id, team_id)?;
            Ok(team
                .player_ids
                .iter()
                .filter_map(|id| graph.players.get(id).cloned())
                .collect())
        })
    }

    pub fn player(&self, user_id: &str, team_id: &str, player_id: &str) -> Result<Player> {
        self.read(|graph| {
            owned_team(graph, user_id, team_id)?;
            team_player(graph, team_id, player_id).cloned()
        })
    }

    pub async fn update_player(
        &self,
        user_id: &str,
        team_id: &str,
        player_id: &str,
        patch: PlayerPatch,
    ) -> Result<Player> {
        self.mutate(|graph| {
            owned_team(graph, user_id, team_id)?;
            team_player(graph, team_id, player_id)?;
            let year = patch.graduation_year.map(checked_year).transpose()?;

            let player = graph
                .players
                .get_mut(player_id)
                .ok_or_else(Error::player_not_found)?;
            if let Some(name) = non_blank(patch.display_name) {
                player.display_name = name;
            }
            if let Some(year) = year {
                player.graduation_year = Some(year);
            }
            Ok(player.clone())
        })
        .await
    }

    /// Remove a player and scrub its records from every match of the team.
    pub async fn delete_player(&self, user_id: &str, team_id: &str, player_id: &str) -> Result<()> {
        self.mutate(|graph| {
            owned_team(graph, user_id, team_id)?;
            team_player(graph, team_id, player_id)?;

            let team = graph.teams.get_mut(team_id).ok_or_else(Error::team_not_found)?;
            for match_id in team.match_ids.iter() {
                if let Some(game_match) = graph.matches.get_mut(match_id) {
                    game_match.per_player_data.remove(player_id);
                }
            }
            team.player_ids.remove(player_id);
            graph.players.remove(player_id);

            tracing::info!(team_id = %team_id, player_id = %player_id, "Player deleted");
            Ok(())
        })
        .await
    }
}

fn checked_year(raw: f64) -> Result<i32> {
    let invalid = || Error::validation("graduationYear must be a valid year");
    let bounds = f64::from(*GRADUATION_YEARS.start())..=f64::from(*GRADUATION_YEARS.end());
    // Range is checked on the raw value so 2100.5 cannot truncate its way in
    if !bounds.contains(&raw) {
        return Err(invalid());
    }
    Ok(raw.trunc() as i32)
}
