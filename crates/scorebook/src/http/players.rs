use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use super::extract::{year_on_create, year_on_update, Guarded};
use super::AppState;
use crate::error::Result;
use crate::roster::{NewPlayer, PlayerPatch};

#[tracing::instrument(name = "http.player.create", skip(state, guarded))]
pub async fn create_player(
    State(state): State<AppState>,
    Path((user_id, team_id)): Path<(String, String)>,
    guarded: Guarded,
) -> Result<impl IntoResponse> {
    let body = &guarded.body;
    let new = NewPlayer {
        display_name: body.text("displayName"),
        graduation_year: year_on_create(body.get("graduationYear")),
    };
    let player = state.roster.create_player(&user_id, &team_id, new).await?;
    Ok((StatusCode::CREATED, Json(json!({ "player": player }))))
}

#[tracing::instrument(name = "http.player.list", skip(state))]
pub async fn list_players(
    State(state): State<AppState>,
    Path((user_id, team_id)): Path<(String, String)>,
) -> Result<impl IntoResponse> {
    let players = state.roster.list_players(&user_id, &team_id)?;
    Ok(Json(json!({ "players": players })))
}

#[tracing::instrument(name = "http.player.get", skip(state))]
pub async fn get_player(
    State(state): State<AppState>,
    Path((user_id, team_id, player_id)): Path<(String, String, String)>,
) -> Result<impl IntoResponse> {
    let player = state.roster.player(&user_id, &team_id, &player_id)?;
    Ok(Json(json!({ "player": player })))
}

#[tracing::instrument(name = "http.player.update", skip(state, guarded))]
pub async fn update_player(
    State(state): State<AppState>,
    Path((user_id, team_id, player_id)): Path<(String, String, String)>,
    guarded: Guarded,
) -> Result<impl IntoResponse> {
    let body = &guarded.body;
    let patch = PlayerPatch {
        display_name: body.text("displayName"),
        graduation_year: year_on_update(body.get("graduationYear")),
    };
    let player = state
        .roster
        .update_player(&user_id, &team_id, &player_id, patch)
        .await?;
    Ok(Json(json!({ "player": player })))
}

#[tracing::instrument(name = "http.player.delete", skip(state, _guarded))]
pub async fn delete_player(
    State(state): State<AppState>,
    Path((user_id, team_id, player_id)): Path<(String, String, String)>,
    _guarded: Guarded,
) -> Result<impl IntoResponse> {
    state
        .roster
        .delete_player(&user_id, &team_id, &player_id)
        .await?;
    Ok(Json(json!({ "success": true })))
}
