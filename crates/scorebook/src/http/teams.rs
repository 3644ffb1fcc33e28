use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use super::extract::Guarded;
use super::AppState;
use crate::error::Result;

#[tracing::instrument(name = "http.team.create", skip(state, guarded))]
pub async fn create_team(
    State(state): State<AppState>,
    guarded: Guarded,
) -> Result<impl IntoResponse> {
    let team = state
        .roster
        .create_team(&guarded.user_id, guarded.body.text("displayName"))
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "team": team }))))
}

#[tracing::instrument(name = "http.team.list", skip(state))]
pub async fn list_teams(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse> {
    let teams = state.roster.list_teams(&user_id)?;
    Ok(Json(json!({ "teams": teams })))
}

#[tracing::instrument(name = "http.team.get", skip(state))]
pub async fn get_team(
    State(state): State<AppState>,
    Path((user_id, team_id)): Path<(String, String)>,
) -> Result<impl IntoResponse> {
    let team = state.roster.team(&user_id, &team_id)?;
    Ok(Json(json!({ "team": team })))
}

#[tracing::instrument(name = "http.team.update", skip(state, guarded))]
pub async fn update_team(
    State(state): State<AppState>,
    Path((user_id, team_id)): Path<(String, String)>,
    guarded: Guarded,
) -> Result<impl IntoResponse> {
    let team = state
        .roster
        .update_team(&user_id, &team_id, guarded.body.text("displayName"))
        .await?;
    Ok(Json(json!({ "team": team })))
}

#[tracing::instrument(name = "http.team.delete", skip(state, _guarded))]
pub async fn delete_team(
    State(state): State<AppState>,
    Path((user_id, team_id)): Path<(String, String)>,
    _guarded: Guarded,
) -> Result<impl IntoResponse> {
    state.roster.delete_team(&user_id, &team_id).await?;
    Ok(Json(json!({ "success": true })))
}
