//! Router-level tests driven through `tower::ServiceExt::oneshot`.
//!
//! The pool points at a closed port, so anything that reaches the database
//! fails fast; validation, throttling and error mapping are exercised
//! without a running Postgres.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use tower::ServiceExt;

use character_sync::api;
use character_sync::app_state::AppState;
use character_sync::config::{RateLimitConfig, UpstreamConfig};
use character_sync::persistence::CharacterRepository;
use character_sync::service::SyncService;
use character_sync::upstream::UpstreamClient;

fn offline_app(rate_limit: RateLimitConfig) -> Router {
    let options = PgConnectOptions::new()
        .host("127.0.0.1")
        .port(1)
        .username("nobody")
        .database("nothing");
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_millis(500))
        .connect_lazy_with(options);

    let upstream = UpstreamClient::new(&UpstreamConfig {
        scheme: "http".to_string(),
        allow_explicit_scheme: true,
        timeout_secs: 2,
        max_pages: 10,
    })
    .unwrap();

    let sync_service = Arc::new(SyncService::new(upstream, CharacterRepository::new(pool)));
    api::build_app(AppState { sync_service }, rate_limit)
}

/// Generous enough that a single test never trips it.
fn relaxed() -> RateLimitConfig {
    RateLimitConfig {
        burst: 100,
        window_secs: 1,
    }
}

async fn send(app: &Router, method: Method, uri: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
    send(app, Method::GET, uri).await
}

async fn post(app: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
    send(app, Method::POST, uri).await
}

fn error_message(body: &[u8]) -> String {
    let json: serde_json::Value = serde_json::from_slice(body).unwrap();
    json["error"]["message"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn invalid_sort_order_returns_400() {
    let app = offline_app(relaxed());
    let (status, body) = get(&app, "/data?sort_field=id&sort_order=NOPE").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "Sort order must be ASC or DESC");
}

#[tokio::test]
async fn invalid_sort_field_returns_400() {
    let app = offline_app(relaxed());
    let (status, body) = get(&app, "/data?sort_field=name&sort_order=ASC").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "Sort field must be id or data");
}

#[tokio::test]
async fn sort_injection_attempt_is_rejected() {
    let app = offline_app(relaxed());
    let uri = "/data?sort_field=id%3B%20DROP%20TABLE%20character&sort_order=ASC";
    let (status, _) = get(&app, uri).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_query_parameters_return_400() {
    let app = offline_app(relaxed());
    let (status, _) = get(&app, "/data?sort_field=id").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = post(&app, "/sync?source_url=example.com").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = get(&app, "/db-mon").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn valid_sort_reaches_database() {
    let app = offline_app(relaxed());
    let (status, _) = get(&app, "/data?sort_field=ID&sort_order=desc").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn unknown_aspect_returns_400() {
    let app = offline_app(relaxed());
    let (status, body) = get(&app, "/db-mon?aspect=latency").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "Unrecognized aspect");
}

#[tokio::test]
async fn health_checks_return_empty_500_when_database_is_down() {
    let app = offline_app(relaxed());
    for uri in ["/db-mon?aspect=conn", "/db-mon?aspect=records"] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }
}

#[tokio::test]
async fn sync_with_unreachable_upstream_and_database_fails() {
    let app = offline_app(relaxed());
    let uri = "/sync?source_url=http%3A%2F%2F127.0.0.1%3A1&resource=character";
    let (status, _) = post(&app, uri).await;
    assert_ne!(status, StatusCode::NOT_FOUND);
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn burst_beyond_limit_returns_429() {
    let app = offline_app(RateLimitConfig::default());
    let mut statuses = Vec::new();
    for _ in 0..5 {
        let request = Request::builder()
            .uri("/db-mon?aspect=unknown")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            assert!(response.headers().contains_key(header::RETRY_AFTER));
        }
        statuses.push(response.status());
    }

    assert_eq!(statuses.first(), Some(&StatusCode::BAD_REQUEST));
    assert!(statuses.contains(&StatusCode::TOO_MANY_REQUESTS));
}

#[tokio::test]
async fn routes_have_independent_buckets() {
    let app = offline_app(RateLimitConfig {
        burst: 1,
        window_secs: 60,
    });

    let (first, _) = get(&app, "/data?sort_field=x&sort_order=ASC").await;
    let (second, _) = get(&app, "/data?sort_field=x&sort_order=ASC").await;
    let (other, _) = get(&app, "/db-mon?aspect=unknown").await;

    assert_eq!(first, StatusCode::BAD_REQUEST);
    assert_eq!(second, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(other, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn liveness_is_not_rate_limited() {
    let app = offline_app(RateLimitConfig {
        burst: 1,
        window_secs: 60,
    });
    for _ in 0..3 {
        let (status, body) = get(&app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "healthy");
    }
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = offline_app(relaxed());
    let (status, body) = get(&app, "/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(json["paths"].get("/sync").is_some());
}
