use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use ledger::GameEntry;
use serde_json::json;

use super::extract::{date, stat, truthy, Guarded};
use super::AppState;
use crate::error::Result;
use crate::roster::{MatchPatch, NewMatch};

#[tracing::instrument(name = "http.match.create", skip(state, guarded))]
pub async fn create_match(
    State(state): State<AppState>,
    Path((user_id, team_id)): Path<(String, String)>,
    guarded: Guarded,
) -> Result<impl IntoResponse> {
    let body = &guarded.body;
    let new = NewMatch {
        date: date(body.get("date")),
        opposing_team_name: body.text("opposingTeamName"),
        comment: body.text("comment"),
    };
    let game_match = state.roster.create_match(&user_id, &team_id, new).await?;
    Ok((StatusCode::CREATED, Json(json!({ "match": game_match }))))
}

#[tracing::instrument(name = "http.match.list", skip(state))]
pub async fn list_matches(
    State(state): State<AppState>,
    Path((user_id, team_id)): Path<(String, String)>,
) -> Result<impl IntoResponse> {
    let matches = state.roster.list_matches(&user_id, &team_id)?;
    Ok(Json(json!({ "matches": matches })))
}

#[tracing::instrument(name = "http.match.get", skip(state))]
pub async fn get_match(
    State(state): State<AppState>,
    Path((user_id, team_id, match_id)): Path<(String, String, String)>,
) -> Result<impl IntoResponse> {
    let game_match = state.roster.game_match(&user_id, &team_id, &match_id)?;
    Ok(Json(json!({ "match": game_match })))
}

#[tracing::instrument(name = "http.match.update", skip(state, guarded))]
pub async fn update_match(
    State(state): State<AppState>,
    Path((user_id, team_id, match_id)): Path<(String, String, String)>,
    guarded: Guarded,
) -> Result<impl IntoResponse> {
    let body = &guarded.body;
    let patch = MatchPatch {
        date: date(body.get("date")),
        opposing_team_name: body.text("opposingTeamName"),
        comment: body.text_or_blank("comment"),
    };
    let game_match = state
        .roster
        .update_match(&user_id, &team_id, &match_id, patch)
        .await?;
    Ok(Json(json!({ "match": game_match })))
}

#[tracing::instrument(name = "http.match.delete", skip(state, _guarded))]
pub async fn delete_match(
    State(state): State<AppState>,
    Path((user_id, team_id, match_id)): Path<(String, String, String)>,
    _guarded: Guarded,
) -> Result<impl IntoResponse> {
    state
        .roster
        .delete_match(&user_id, &team_id, &match_id)
        .await?;
    Ok(Json(json!({ "success": true })))
}

#[tracing::instrument(name = "http.game.set", skip(state, guarded))]
pub async fn set_game_entry(
    State(state): State<AppState>,
    Path((user_id, team_id, match_id, player_id, game_index)): Path<(
        String,
        String,
        String,
        String,
        String,
    )>,
    guarded: Guarded,
) -> Result<impl IntoResponse> {
    let body = &guarded.body;
    let entry = GameEntry {
        wood: stat(body.get("Wood")),
        score: stat(body.get("Score")),
        is_varsity: truthy(body.get("isVarsity")),
    };
    let stored = state
        .roster
        .set_game_entry(&user_id, &team_id, &match_id, &player_id, &game_index, entry)
        .await?;
    Ok(Json(json!({ "playerGame": stored })))
}

#[tracing::instrument(name = "http.game.get", skip(state))]
pub async fn player_match_data(
    State(state): State<AppState>,
    Path((user_id, team_id, match_id, player_id)): Path<(String, String, String, String)>,
) -> Result<impl IntoResponse> {
    let record = state
        .roster
        .player_match_data(&user_id, &team_id, &match_id, &player_id)?;
    Ok(Json(json!({ "perPlayerData": record })))
}
