//! Account, session and API key flows over the full router.

mod common;

use axum::http::StatusCode;
use common::{Auth, spawn_app};
use serde_json::json;

#[tokio::test]
async fn test_signup_rejects_duplicate_username() {
    let app = spawn_app().await;

    app.signup("alice", "secret1").await;

    let response = app
        .send(
            "POST",
            "/signup",
            Auth::Anonymous,
            Some(json!({ "username": "alice", "password": "secret1" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), "Username already exists");
    assert_eq!(response.body["success"], json!(false));
}

#[tokio::test]
async fn test_signup_requires_both_fields() {
    let app = spawn_app().await;

    let response = app
        .send(
            "POST",
            "/signup",
            Auth::Anonymous,
            Some(json!({ "username": "alice" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), "Username and password are required");
}

#[tokio::test]
async fn test_signin_failures() {
    let app = spawn_app().await;
    app.signup("alice", "secret1").await;

    let response = app
        .send(
            "POST",
            "/signin",
            Auth::Anonymous,
            Some(json!({ "username": "alice", "password": "wrong" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.message(), "Invalid password");

    let response = app
        .send(
            "POST",
            "/signin",
            Auth::Anonymous,
            Some(json!({ "username": "bob", "password": "x" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.message(), "User not found");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = spawn_app().await;

    let response = app
        .send(
            "POST",
            "/signup",
            Auth::Anonymous,
            Some(json!({ "username": 42, "password": "secret1" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["success"], json!(false));
}

#[tokio::test]
async fn test_session_profile_and_signout() {
    let app = spawn_app().await;
    let user_id = app.signup("alice", "secret1").await;

    let response = app.send("GET", "/profile", Auth::Anonymous, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.message(), "Authentication required");

    let cookie = app.signin("alice", "secret1").await;
    let response = app.send("GET", "/profile", Auth::Cookie(&cookie), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["user_id"], json!(user_id));
    assert_eq!(response.body["data"]["username"], json!("alice"));
    assert_eq!(response.body["data"]["credential_kind"], json!("session"));

    let response = app.send("POST", "/signout", Auth::Cookie(&cookie), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.message(), "Logged out successfully");

    let response = app.send("GET", "/profile", Auth::Cookie(&cookie), None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    // Signing out twice is harmless
    let response = app.send("POST", "/signout", Auth::Cookie(&cookie), None).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_invalid_expiration_is_rejected_without_persisting() {
    let app = spawn_app().await;
    let cookie = app.reviewer("alice").await;

    for body in [
        json!({ "expiration_hours": -1 }),
        json!({ "expiration_hours": 0 }),
        json!({ "expiration_hours": "soon" }),
    ] {
        let response = app
            .send("POST", "/tokens", Auth::Cookie(&cookie), Some(body))
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            response.message(),
            "expiration_hours must be a positive number"
        );
    }

    let response = app
        .send(
            "POST",
            "/tokens",
            Auth::Cookie(&cookie),
            Some(json!({ "expiration_hours": 1_000_000 })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app.send("GET", "/tokens", Auth::Cookie(&cookie), None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.message(), "No tokens found for this user");
}

#[tokio::test]
async fn test_token_without_body_uses_default_lifetime() {
    let app = spawn_app().await;
    let cookie = app.reviewer("alice").await;

    let response = app.send("POST", "/tokens", Auth::Cookie(&cookie), None).await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert!(response.body["data"]["token"].is_string());
    assert!(response.body["data"]["expires_at"].is_string());
}

#[tokio::test]
async fn test_bearer_token_lifecycle() {
    let app = spawn_app().await;
    let user_id = app.signup("alice", "secret1").await;
    let cookie = app.signin("alice", "secret1").await;
    let (key_id, token) = app.issue_token(&cookie).await;

    let response = app.send("GET", "/profile", Auth::Bearer(&token), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["user_id"], json!(user_id));
    assert_eq!(response.body["data"]["credential_kind"], json!("bearer"));

    let response = app.send("GET", "/tokens", Auth::Bearer(&token), None).await;
    assert_eq!(response.status, StatusCode::OK);
    let tokens = response.body["data"]["tokens"].as_array().unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0]["key_id"], json!(key_id));
    assert!(!response.body.to_string().contains(&token));

    let response = app
        .send(
            "DELETE",
            &format!("/tokens/{key_id}"),
            Auth::Bearer(&token),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.message(), "Token deleted successfully");

    let response = app.send("GET", "/profile", Auth::Bearer(&token), None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.message(), "No stored API keys for this user");

    let response = app
        .send(
            "DELETE",
            &format!("/tokens/{key_id}"),
            Auth::Cookie(&cookie),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.message(), "Token not found for this user");
}

#[tokio::test]
async fn test_cannot_delete_another_users_token() {
    let app = spawn_app().await;
    let alice = app.reviewer("alice").await;
    let bob = app.reviewer("bob").await;
    let (key_id, token) = app.issue_token(&alice).await;

    let response = app
        .send("DELETE", &format!("/tokens/{key_id}"), Auth::Cookie(&bob), None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app.send("GET", "/profile", Auth::Bearer(&token), None).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_rejects_garbage_bearer_token() {
    let app = spawn_app().await;

    let response = app
        .send("GET", "/profile", Auth::Bearer("not-a-token"), None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.message(), "Invalid API key");
}

#[tokio::test]
async fn test_session_and_bearer_together_conflict() {
    let app = spawn_app().await;
    let cookie = app.reviewer("alice").await;
    let (_, token) = app.issue_token(&cookie).await;

    let response = app
        .send(
            "GET",
            "/profile",
            Auth::Both {
                cookie: &cookie,
                token: &token,
            },
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["success"], json!(false));
}

#[tokio::test]
async fn test_admin_only_actions() {
    let app = spawn_app().await;
    let reviewer = app.reviewer("reviewer").await;
    let admin = app.admin("admin").await;
    let movie = json!({ "title": "Heat", "release_year": 1995 });

    let response = app
        .send("POST", "/movies", Auth::Cookie(&reviewer), Some(movie.clone()))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let (_, reviewer_token) = app.issue_token(&reviewer).await;
    let response = app
        .send(
            "POST",
            "/movies",
            Auth::Bearer(&reviewer_token),
            Some(movie.clone()),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .send("POST", "/movies", Auth::Cookie(&admin), Some(movie))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.message(), "Movie added successfully");

    let response = app.send("GET", "/profile", Auth::Cookie(&admin), None).await;
    assert_eq!(response.body["data"]["is_admin"], json!(true));
}

#[tokio::test]
async fn test_admins_do_not_author_reviews() {
    let app = spawn_app().await;
    let admin = app.admin("admin").await;

    let response = app
        .send(
            "POST",
            "/movies",
            Auth::Cookie(&admin),
            Some(json!({ "title": "Heat" })),
        )
        .await;
    let movie_id = response.body["data"]["movie_id"].as_i64().unwrap();

    let response = app
        .send(
            "POST",
            &format!("/movies/{movie_id}/reviews"),
            Auth::Cookie(&admin),
            Some(json!({ "star_rating": 8.0, "review_text": "Great" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_non_numeric_token_id_is_json_bad_request() {
    let app = spawn_app().await;
    let cookie = app.reviewer("alice").await;

    let response = app
        .send("DELETE", "/tokens/abc", Auth::Cookie(&cookie), None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["success"], json!(false));
    assert!(!response.message().is_empty());
}
