//! Password guard and ownership checks across the team-scoped routes.

mod common;

use axum::http::StatusCode;
use common::{TestApp, PASSWORD};
use serde_json::json;

#[tokio::test]
async fn test_other_user_gets_forbidden_everywhere() {
    let (app, _store) = TestApp::new();
    let owner = app.register("owner").await;
    let intruder = app.register("intruder").await;
    let team_id = app.create_team(&owner).await;
    let player_id = app.create_player(&owner, &team_id).await;
    let match_id = app.create_match(&owner, &team_id).await;

    let base = format!("/users/{intruder}/teams/{team_id}");
    let reads = [
        base.clone(),
        format!("{base}/players"),
        format!("{base}/players/{player_id}"),
        format!("{base}/matches"),
        format!("{base}/matches/{match_id}"),
        format!("{base}/matches/{match_id}/players/{player_id}"),
    ];
    for uri in &reads {
        let (status, body) = app.get(uri).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "GET {uri}");
        assert_eq!(body["error"], "forbidden: team does not belong to user");
    }

    // The intruder's own password passes the guard; ownership still fails
    let (status, _) = app
        .put(
            &format!("{base}/matches/{match_id}/players/{player_id}/games/1"),
            json!({ "password": PASSWORD, "Wood": 1, "Score": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.delete(&base, json!({ "password": PASSWORD })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Owner still sees everything intact
    let (status, _) = app.get(&format!("/users/{owner}/teams/{team_id}")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_not_found_order() {
    let (app, _store) = TestApp::new();
    let user_id = app.register("coach").await;
    let team_id = app.create_team(&user_id).await;

    let (status, body) = app.get("/users/ghost/teams/anything").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "user not found");

    let (status, body) = app.get(&format!("/users/{user_id}/teams/ghost")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "team not found");

    let (status, body) = app
        .get(&format!("/users/{user_id}/teams/{team_id}/players/ghost"))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "player not found in team");

    let (status, body) = app
        .get(&format!("/users/{user_id}/teams/{team_id}/matches/ghost"))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "match not found in team");

    let (status, _) = app.get("/users/ghost/teams").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_password_guard() {
    let (app, store) = TestApp::new();
    let user_id = app.register("coach").await;
    let uri = format!("/users/{user_id}/teams");
    let saves = store.save_count();

    let (status, body) = app.post(&uri, json!({ "displayName": "No password" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "password is required in request body");

    let (status, body) = app.post(&uri, json!({ "password": "wrong password" })).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid password");

    // Unknown user fails the guard before anything else
    let (status, body) = app
        .post("/users/ghost/teams", json!({ "password": PASSWORD }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid password");

    // currentPassword is accepted in place of password
    let (status, _) = app.post(&uri, json!({ "currentPassword": PASSWORD })).await;
    assert_eq!(status, StatusCode::CREATED);

    assert_eq!(store.save_count(), saves + 1);
}

#[tokio::test]
async fn test_cross_team_ids_are_not_found() {
    let (app, _store) = TestApp::new();
    let user_id = app.register("coach").await;
    let home = app.create_team(&user_id).await;
    let away = app.create_team(&user_id).await;
    let away_player = app.create_player(&user_id, &away).await;
    let home_match = app.create_match(&user_id, &home).await;

    let (status, body) = app
        .put(
            &format!(
                "/users/{user_id}/teams/{home}/matches/{home_match}/players/{away_player}/games/1"
            ),
            json!({ "password": PASSWORD, "Wood": 1, "Score": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "player not found in team");

    let (status, _) = app
        .get(&format!("/users/{user_id}/teams/{away}/matches/{home_match}"))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_game_index_validation() {
    let (app, _store) = TestApp::new();
    let user_id = app.register("coach").await;
    let team_id = app.create_team(&user_id).await;
    let player_id = app.create_player(&user_id, &team_id).await;
    let match_id = app.create_match(&user_id, &team_id).await;
    let base =
        format!("/users/{user_id}/teams/{team_id}/matches/{match_id}/players/{player_id}");

    let (status, _) = app
        .put(
            &format!("{base}/games/1"),
            json!({ "password": PASSWORD, "Wood": 5, "Score": 150 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    for index in ["0", "4", "1.5", "abc"] {
        let (status, body) = app
            .put(
                &format!("{base}/games/{index}"),
                json!({ "password": PASSWORD, "Wood": 9, "Score": 9 }),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "index {index}");
        assert_eq!(body["error"], "gameIndex must be 1, 2 or 3");
    }

    let (_, body) = app.get(&base).await;
    assert_eq!(
        body["perPlayerData"]["games"]["1"],
        json!({ "Wood": 5, "Score": 150, "isVarsity": false })
    );
    for slot in ["2", "3"] {
        assert_eq!(body["perPlayerData"]["games"][slot], common::default_game());
    }
}
