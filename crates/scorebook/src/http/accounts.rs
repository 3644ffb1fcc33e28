use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use super::extract::{Body, Guarded};
use super::AppState;
use crate::error::Result;
use crate::roster::NewAccount;

#[tracing::instrument(name = "http.account.register", skip(state, body))]
pub async fn register(State(state): State<AppState>, body: Body) -> Result<impl IntoResponse> {
    let user = state
        .roster
        .register(NewAccount {
            email: body.text("email"),
            password: body.text("password"),
            username: body.text("username"),
            display_name: body.text("displayName"),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "user": user }))))
}

/// Login for the UI's auth screen. Errors keep the `{ok, error}` envelope.
#[tracing::instrument(name = "http.account.login", skip(state, body))]
pub async fn login(State(state): State<AppState>, body: Body) -> Response {
    match state
        .roster
        .login(body.text("email"), body.text("password"))
        .await
    {
        Ok(user) => Json(json!({ "ok": true, "user": user })).into_response(),
        Err(e) => (e.status(), Json(json!({ "ok": false, "error": e.to_string() }))).into_response(),
    }
}

#[tracing::instrument(name = "http.account.get", skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse> {
    let user = state.roster.public_user(&user_id)?;
    Ok(Json(json!({ "user": user })))
}

#[tracing::instrument(name = "http.account.password", skip(state, guarded))]
pub async fn change_password(
    State(state): State<AppState>,
    guarded: Guarded,
) -> Result<impl IntoResponse> {
    state
        .roster
        .change_password(&guarded.user_id, guarded.body.text("newPassword"))
        .await?;
    Ok(Json(json!({ "success": true })))
}

#[tracing::instrument(name = "http.account.display_name", skip(state, guarded))]
pub async fn change_display_name(
    State(state): State<AppState>,
    guarded: Guarded,
) -> Result<impl IntoResponse> {
    let user = state
        .roster
        .change_display_name(&guarded.user_id, guarded.body.text("displayName"))
        .await?;
    Ok(Json(json!({ "user": user })))
}

#[tracing::instrument(name = "http.account.delete", skip(state, guarded))]
pub async fn delete_account(
    State(state): State<AppState>,
    guarded: Guarded,
) -> Result<impl IntoResponse> {
    state.roster.delete_account(&guarded.user_id).await?;
    Ok(Json(json!({ "success": true })))
}
