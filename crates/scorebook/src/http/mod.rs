//! HTTP surface: routing, CORS, and the discovery and health endpoints.

mod accounts;
pub mod extract;
mod matches;
mod players;
mod teams;

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::State;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::Method;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::roster::Roster;

/// Shared state for every handler.
#[derive(Clone)]
pub struct AppState {
    pub roster: Arc<Roster>,
    pub started: Instant,
}

impl AppState {
    pub fn new(roster: Arc<Roster>) -> Self {
        Self {
            roster,
            started: Instant::now(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let team = "/users/{user_id}/teams/{team_id}";

    Router::new()
        .route("/", get(serve_root))
        .route("/health", get(handle_health))
        .route("/accounts", post(accounts::register))
        .route("/auth/login", post(accounts::login))
        .route(
            "/accounts/{user_id}",
            get(accounts::get_user).delete(accounts::delete_account),
        )
        .route("/accounts/{user_id}/password", post(accounts::change_password))
        .route(
            "/accounts/{user_id}/displayName",
            post(accounts::change_display_name),
        )
        .route(
            "/users/{user_id}/teams",
            get(teams::list_teams).post(teams::create_team),
        )
        .route(
            team,
            get(teams::get_team)
                .put(teams::update_team)
                .delete(teams::delete_team),
        )
        .route(
            &format!("{team}/players"),
            get(players::list_players).post(players::create_player),
        )
        .route(
            &format!("{team}/players/{{player_id}}"),
            get(players::get_player)
                .put(players::update_player)
                .delete(players::delete_player),
        )
        .route(
            &format!("{team}/matches"),
            get(matches::list_matches).post(matches::create_match),
        )
        .route(
            &format!("{team}/matches/{{match_id}}"),
            get(matches::get_match)
                .put(matches::update_match)
                .delete(matches::delete_match),
        )
        .route(
            &format!("{team}/matches/{{match_id}}/players/{{player_id}}"),
            get(matches::player_match_data),
        )
        .route(
            &format!("{team}/matches/{{match_id}}/players/{{player_id}}/games/{{game_index}}"),
            put(matches::set_game_entry),
        )
        .layer(cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(3600))
}

/// Serve root discovery endpoint
async fn serve_root() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": "Scorebook",
        "version": env!("CARGO_PKG_VERSION"),
        "links": {
            "accounts": "/accounts",
            "login": "/auth/login",
            "teams": "/users/{userId}/teams",
            "health": "/health",
        }
    }))
}

/// Health check endpoint
async fn handle_health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let persister = state.roster.persister();

    Json(serde_json::json!({
        "status": "healthy",
        "uptime_secs": state.started.elapsed().as_secs(),
        "version": env!("CARGO_PKG_VERSION"),
        "storage": {
            "backend": persister.describe(),
            "save_policy": persister.policy().to_string(),
            "saves_ok": persister.stats().succeeded(),
            "saves_failed": persister.stats().failed(),
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::Persister;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use ledger::{MemoryStore, Snapshot};
    use scoreconf::SavePolicy;
    use tower::ServiceExt;

    fn app() -> Router {
        let persister = Persister::new(Arc::new(MemoryStore::new()), SavePolicy::WriteThrough);
        let roster = Roster::new(Snapshot::default(), persister, 4);
        router(AppState::new(Arc::new(roster)))
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["storage"]["backend"], "memory");
        assert_eq!(json["storage"]["save_policy"], "write-through");
    }

    #[tokio::test]
    async fn test_root_discovery() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["name"], "Scorebook");
        assert_eq!(json["links"]["health"], "/health");
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/accounts")
                    .header("Origin", "http://localhost:5173")
                    .header("Access-Control-Request-Method", "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response.status().is_success());
        let headers = response.headers();
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert_eq!(headers["access-control-max-age"], "3600");
    }
}
