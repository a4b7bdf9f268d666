#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test;
use blog_server::infrastructure::config::{AppConfig, DeletePolicy};
use blog_server::infrastructure::database::{create_pool, run_migrations};
use blog_server::infrastructure::storage::LocalStorage;
use blog_server::state::AppState;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tempfile::TempDir;

pub struct TestContext {
    pub state: AppState,
    pub media_dir: TempDir,
    pub static_dir: TempDir,
}

pub fn test_config(delete_policy: DeletePolicy) -> AppConfig {
    let mut vars = HashMap::new();
    vars.insert("DATABASE_URL", "sqlite::memory:".to_string());
    vars.insert(
        "JWT_SECRET",
        "test-secret-key-for-testing-only-32chars".to_string(),
    );
    let mut config = AppConfig::from_lookup(|key| vars.get(key).cloned())
        .expect("test configuration");
    config.delete_policy = delete_policy;
    config
}

pub async fn setup() -> TestContext {
    setup_with(DeletePolicy::AnyAuthenticated).await
}

pub async fn setup_with(delete_policy: DeletePolicy) -> TestContext {
    let config = test_config(delete_policy);
    let pool = create_pool(&config.database_url, 1)
        .await
        .expect("in-memory database");
    run_migrations(&pool).await.expect("migrations");

    let media_dir = tempfile::tempdir().expect("media dir");
    let static_dir = tempfile::tempdir().expect("static dir");
    let media = Arc::new(LocalStorage::new(media_dir.path(), "/media/"));
    let static_files = Arc::new(LocalStorage::new(static_dir.path(), "/static/"));
    let state = AppState::build(pool, &config, media, static_files).expect("app state");

    TestContext {
        state,
        media_dir,
        static_dir,
    }
}

/// Sends a request and returns the status and the JSON body (`Null` when empty).
pub async fn send<S, R, B>(app: &S, req: R) -> (StatusCode, Value)
where
    S: Service<R, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    match app.call(req).await {
        Ok(resp) => {
            let status = resp.status();
            let body = test::read_body(resp).await;
            let value = if body.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&body).unwrap_or(Value::Null)
            };
            (status, value)
        }
        Err(err) => (err.error_response().status(), Value::Null),
    }
}

/// Registers a user and returns the issued token.
pub async fn register<S, B>(app: &S, username: &str, email: &str, password: &str) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "username": username, "email": email, "password": password }))
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
    body["token"].as_str().expect("token in response").to_string()
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}
