#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use marquee::api::AppState;
use marquee::config::Config;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

pub struct TestApp {
    pub state: Arc<AppState>,
    pub router: Router,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn message(&self) -> &str {
        self.body["message"].as_str().unwrap_or_default()
    }
}

/// How a request authenticates.
#[derive(Clone, Copy)]
pub enum Auth<'a> {
    Anonymous,
    Cookie(&'a str),
    Bearer(&'a str),
    Both { cookie: &'a str, token: &'a str },
}

pub fn test_config() -> Config {
    let db_path =
        std::env::temp_dir().join(format!("marquee-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());
    config.server.secure_cookies = false;
    config.security.token_secret = "integration-test-secret".to_string();
    config.security.argon2_memory_cost_kib = 256;
    config.security.argon2_time_cost = 1;
    config.observability.metrics_enabled = false;
    config
}

pub async fn spawn_app() -> TestApp {
    let state = marquee::api::create_app_state_from_config(test_config(), None)
        .await
        .expect("failed to create app state");
    let router = marquee::api::router(state.clone())
        .await
        .expect("failed to build router");
    TestApp { state, router }
}

impl TestApp {
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        auth: Auth<'_>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);

        match auth {
            Auth::Anonymous => {}
            Auth::Cookie(cookie) => builder = builder.header(header::COOKIE, cookie),
            Auth::Bearer(token) => {
                builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
            }
            Auth::Both { cookie, token } => {
                builder = builder
                    .header(header::COOKIE, cookie)
                    .header(header::AUTHORIZATION, format!("Bearer {token}"));
            }
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Registers a user and returns its id.
    pub async fn signup(&self, username: &str, password: &str) -> i32 {
        let response = self
            .send(
                "POST",
                "/signup",
                Auth::Anonymous,
                Some(json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        i32::try_from(response.body["data"]["user_id"].as_i64().unwrap()).unwrap()
    }

    /// Signs in and returns the `name=value` session cookie.
    pub async fn signin(&self, username: &str, password: &str) -> String {
        let response = self
            .send(
                "POST",
                "/signin",
                Auth::Anonymous,
                Some(json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        session_cookie(&response.headers).expect("signin did not set a session cookie")
    }

    /// Creates a user, signs in and returns the session cookie.
    pub async fn reviewer(&self, username: &str) -> String {
        self.signup(username, "secret1").await;
        self.signin(username, "secret1").await
    }

    pub async fn admin(&self, username: &str) -> String {
        self.signup(username, "secret1").await;
        assert!(self.state.store().set_user_admin(username, true).await.unwrap());
        self.signin(username, "secret1").await
    }

    /// Issues an API key with the session and returns `(key_id, token)`.
    pub async fn issue_token(&self, cookie: &str) -> (i64, String) {
        let response = self
            .send(
                "POST",
                "/tokens",
                Auth::Cookie(cookie),
                Some(json!({ "expiration_hours": 1 })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        (
            response.body["data"]["key_id"].as_i64().unwrap(),
            response.body["data"]["token"].as_str().unwrap().to_string(),
        )
    }
}

pub fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|value| value.split(';').next().map(str::to_string))
}
