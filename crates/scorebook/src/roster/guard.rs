//! Ownership checks shared by every team-scoped operation.

use ledger::{Match, Player, Snapshot, Team};

use crate::error::{Error, Result};

/// Resolve `team_id` as a team owned by `user_id`.
///
/// Errors in check order: unknown user, unknown team, team owned by someone else.
pub(super) fn owned_team<'a>(graph: &'a Snapshot, user_id: &str, team_id: &str) -> Result<&'a Team> {
    if !graph.users.contains_key(user_id) {
        return Err(Error::user_not_found());
    }
    let team = graph.teams.get(team_id).ok_or_else(Error::team_not_found)?;
    if team.owner_id != user_id {
        return Err(Error::forbidden_team());
    }
    Ok(team)
}

/// Mutable variant of [`owned_team`].
pub(super) fn owned_team_mut<'a>(
    graph: &'a mut Snapshot,
    user_id: &str,
    team_id: &str,
) -> Result<&'a mut Team> {
    owned_team(graph, user_id, team_id)?;
    graph.teams.get_mut(team_id).ok_or_else(Error::team_not_found)
}

/// A player that exists and belongs to `team_id`.
pub(super) fn team_player<'a>(graph: &'a Snapshot, team_id: &str, player_id: &str) -> Result<&'a Player> {
    graph
        .players
        .get(player_id)
        .filter(|player| player.team_id == team_id)
        .ok_or_else(Error::player_not_found)
}

/// A match that exists and belongs to `team_id`.
pub(super) fn team_match<'a>(graph: &'a Snapshot, team_id: &str, match_id: &str) -> Result<&'a Match> {
    graph
        .matches
        .get(match_id)
        .filter(|game_match| game_match.team_id == team_id)
        .ok_or_else(Error::match_not_found)
}
