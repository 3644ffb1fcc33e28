use ledger::{IdSet, Team};

use super::guard::{owned_team, owned_team_mut};
use super::{new_id, now_millis, Roster};
use crate::error::{Error, Result};

impl Roster {
    pub async fn create_team(&self, user_id: &str, display_name: Option<String>) -> Result<Team> {
        let display_name = non_blank(display_name).unwrap_or_else(|| format!("Team {}", now_millis()));

        self.mutate(|graph| {
            let user = graph.users.get_mut(user_id).ok_or_else(Error::user_not_found)?;
            let team = Team {
                team_id: new_id(),
                owner_id: user.user_id.clone(),
                display_name,
                player_ids: IdSet::new(),
                match_ids: IdSet::new(),
                awards_list: Vec::new(),
            };
            user.team_ids.insert(team.team_id.clone());
            graph.teams.insert(team.team_id.clone(), team.clone());
            tracing::info!(user_id = %user_id, team_id = %team.team_id, "Team created");
            Ok(team)
        })
        .await
    }

    /// Teams in the order the user created them. Only checks that the user exists.
    pub fn list_teams(&self, user_id: &str) -> Result<Vec<Team>> {
        self.read(|graph| {
            let user = graph.users.get(user_id).ok_or_else(Error::user_not_found)?;
            Ok(user
                .team_ids
                .iter()
                .filter_map(|id| graph.teams.get(id).cloned())
                .collect())
        })
    }

    pub fn team(&self, user_id: &str, team_id: &str) -> Result<Team> {
        self.read(|graph| owned_team(graph, user_id, team_id).cloned())
    }

    /// Rename a team. A blank or absent name keeps the current one.
    pub async fn update_team(
        &self,
        user_id: &str,
        team_id: &str,
        display_name: Option<String>,
    ) -> Result<Team> {
        self.mutate(|graph| {
            let team = owned_team_mut(graph, user_id, team_id)?;
            if let Some(name) = non_blank(display_name) {
                team.display_name = name;
            }
            Ok(team.clone())
        })
        .await
    }

    /// Delete a team along with every player and match it contains.
    pub async fn delete_team(&self, user_id: &str, team_id: &str) -> Result<()> {
        self.mutate(|graph| {
            owned_team(graph, user_id, team_id)?;
            let team = graph.teams.remove(team_id).ok_or_else(Error::team_not_found)?;

            for player_id in team.player_ids.iter() {
                graph.players.remove(player_id);
            }
            for match_id in team.match_ids.iter() {
                graph.matches.remove(match_id);
            }
            if let Some(owner) = graph.users.get_mut(user_id) {
                owner.team_ids.remove(team_id);
            }

            tracing::info!(
                team_id = %team_id,
                players = team.player_ids.len(),
                matches = team.match_ids.len(),
                "Team deleted"
            );
            Ok(())
        })
        .await
    }
}

/// Trimmed value, or `None` when absent or blank.
pub(super) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::testing::{account, roster};
    use crate::roster::{NewMatch, NewPlayer};

    #[tokio::test]
    async fn test_create_and_list_in_order() {
        let (roster, _store) = roster();
        let user = account(&roster, "ann").await;

        let first = roster.create_team(&user.user_id, Some(" Varsity ".into())).await.unwrap();
        let second = roster.create_team(&user.user_id, None).await.unwrap();

        assert_eq!(first.display_name, "Varsity");
        assert!(second.display_name.starts_with("Team "));
        assert_eq!(first.owner_id, user.user_id);

        let listed: Vec<_> = roster
            .list_teams(&user.user_id)
            .unwrap()
            .into_iter()
            .map(|team| team.team_id)
            .collect();
        assert_eq!(listed, vec![first.team_id.clone(), second.team_id]);
        assert!(roster.public_user(&user.user_id).unwrap().team_ids.contains(&first.team_id));
    }

    #[tokio::test]
    async fn test_create_for_unknown_user() {
        let (roster, store) = roster();
        assert_eq!(
            roster.create_team("ghost", None).await.unwrap_err(),
            Error::user_not_found()
        );
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_rename_keeps_name() {
        let (roster, _store) = roster();
        let user = account(&roster, "ann").await;
        let team = roster.create_team(&user.user_id, Some("Varsity".into())).await.unwrap();

        let same = roster
            .update_team(&user.user_id, &team.team_id, Some("  ".into()))
            .await
            .unwrap();
        assert_eq!(same.display_name, "Varsity");

        let renamed = roster
            .update_team(&user.user_id, &team.team_id, Some("JV".into()))
            .await
            .unwrap();
        assert_eq!(renamed.display_name, "JV");
    }

    #[tokio::test]
    async fn test_delete_cascades() {
        let (roster, _store) = roster();
        let user = account(&roster, "ann").await;
        let keep = roster.create_team(&user.user_id, None).await.unwrap();
        let doomed = roster.create_team(&user.user_id, None).await.unwrap();

        let player = roster
            .create_player(&user.user_id, &doomed.team_id, NewPlayer::default())
            .await
            .unwrap();
        let game_match = roster
            .create_match(&user.user_id, &doomed.team_id, NewMatch::default())
            .await
            .unwrap();

        roster.delete_team(&user.user_id, &doomed.team_id).await.unwrap();

        let graph = roster.snapshot().unwrap();
        assert!(!graph.teams.contains_key(&doomed.team_id));
        assert!(!graph.players.contains_key(&player.player_id));
        assert!(!graph.matches.contains_key(&game_match.match_id));
        assert!(graph.teams.contains_key(&keep.team_id));

        let owner = &graph.users[&user.user_id];
        assert!(!owner.team_ids.contains(&doomed.team_id));
        assert!(owner.team_ids.contains(&keep.team_id));
    }

    #[tokio::test]
    async fn test_other_user_is_forbidden() {
        let (roster, _store) = roster();
        let owner = account(&roster, "ann").await;
        let intruder = account(&roster, "bob").await;
        let team = roster.create_team(&owner.user_id, None).await.unwrap();

        assert_eq!(
            roster.team(&intruder.user_id, &team.team_id).unwrap_err(),
            Error::forbidden_team()
        );
        assert_eq!(
            roster.delete_team(&intruder.user_id, &team.team_id).await.unwrap_err(),
            Error::forbidden_team()
        );
        assert!(roster.team(&owner.user_id, &team.team_id).is_ok());
    }
}
