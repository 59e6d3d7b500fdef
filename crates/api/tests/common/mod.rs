#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use deepdrama_core::script_filter::TabPresets;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use deepdrama_api::config::ServerConfig;
use deepdrama_api::router::build_app_router;
use deepdrama_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
///
/// The database URL is unused because tests hand in the pool `sqlx::test`
/// created for them.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database_url: String::new(),
        database_max_connections: 5,
        tab_presets: TabPresets::default(),
    }
}

/// Build the full application router, using the given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    send(app, Method::DELETE, uri, None).await
}

/// Create a script through the API and return its `data` object.
pub async fn create_script(pool: &PgPool, body: Value) -> Value {
    let response = post_json(build_test_app(pool.clone()), "/api/scripts/create", body).await;
    assert_eq!(response.status(), 200);
    body_json(response).await["data"].clone()
}

/// Record a rating through the API and return its `data` object.
pub async fn create_rating(pool: &PgPool, body: Value) -> Value {
    let response = post_json(build_test_app(pool.clone()), "/api/ratings/create", body).await;
    assert_eq!(response.status(), 200);
    body_json(response).await["data"].clone()
}
