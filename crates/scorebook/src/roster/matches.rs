use std::collections::BTreeMap;

use ledger::{Match, PlayerMatchRecord};

use super::guard::{owned_team, owned_team_mut, team_match};
use super::teams::non_blank;
use super::{new_id, now_millis, Roster};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Default)]
pub struct NewMatch {
    /// Epoch milliseconds; `None` means now.
    pub date: Option<i64>,
    pub opposing_team_name: Option<String>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MatchPatch {
    pub date: Option<i64>,
    /// Replaces the name only when non-blank.
    pub opposing_team_name: Option<String>,
    /// Replaces the comment whenever present, blank included.
    pub comment: Option<String>,
}

impl Roster {
    /// Create a match with a default record for every current team player.
    pub async fn create_match(&self, user_id: &str, team_id: &str, new: NewMatch) -> Result<Match> {
        let date = new.date.unwrap_or_else(now_millis);

        self.mutate(|graph| {
            let team = owned_team_mut(graph, user_id, team_id)?;
            let per_player_data: BTreeMap<_, _> = team
                .player_ids
                .iter()
                .map(|player_id| (player_id.to_string(), PlayerMatchRecord::default()))
                .collect();

            let game_match = Match {
                match_id: new_id(),
                team_id: team.team_id.clone(),
                date,
                opposing_team_name: trimmed(new.opposing_team_name),
                comment: trimmed(new.comment),
                per_player_data,
            };
            team.match_ids.insert(game_match.match_id.clone());
            graph
                .matches
                .insert(game_match.match_id.clone(), game_match.clone());

            tracing::info!(
                team_id = %team_id,
                match_id = %game_match.match_id,
                players = game_match.per_player_data.len(),
                "Match created"
            );
            Ok(game_match)
        })
        .await
    }

    pub fn list_matches(&self, user_id: &str, team_id: &str) -> Result<Vec<Match>> {
        self.read(|graph| {
            let team = owned_team(graph, user_id, team_id)?;
            Ok(team
                .match_ids
                .iter()
                .filter_map(|id| graph.matches.get(id).cloned())
                .collect())
        })
    }

    pub fn game_match(&self, user_id: &str, team_id: &str, match_id: &str) -> Result<Match> {
        self.read(|graph| {
            owned_team(graph, user_id, team_id)?;
            team_match(graph, team_id, match_id).cloned()
        })
    }

    pub async fn update_match(
        &self,
        user_id: &str,
        team_id: &str,
        match_id: &str,
        patch: MatchPatch,
    ) -> Result<Match> {
        self.mutate(|graph| {
            owned_team(graph, user_id, team_id)?;
            team_match(graph, team_id, match_id)?;

            let game_match = graph
                .matches
                .get_mut(match_id)
                .ok_or_else(Error::match_not_found)?;
            if let Some(date) = patch.date {
                game_match.date = date;
            }
            if let Some(name) = non_blank(patch.opposing_team_name) {
                game_match.opposing_team_name = name;
            }
            if let Some(comment) = patch.comment {
                game_match.comment = comment.trim().to_string();
            }
            Ok(game_match.clone())
        })
        .await
    }

    pub async fn delete_match(&self, user_id: &str, team_id: &str, match_id: &str) -> Result<()> {
        self.mutate(|graph| {
            owned_team(graph, user_id, team_id)?;
            team_match(graph, team_id, match_id)?;

            graph.matches.remove(match_id);
            if let Some(team) = graph.teams.get_mut(team_id) {
                team.match_ids.remove(match_id);
            }
            tracing::info!(team_id = %team_id, match_id = %match_id, "Match deleted");
            Ok(())
        })
        .await
    }
}

fn trimmed(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}
