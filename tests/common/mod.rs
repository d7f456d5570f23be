//! Shared helpers for HTTP-level tests

#![allow(dead_code)]

use std::time::Duration;

use appadmin::cli::ServerConfig;
use appadmin::web::{router, AppState};
use axum::http::{HeaderName, HeaderValue};
use axum_test::TestServer;
use serde_json::{json, Value};

pub const TOKEN: &str = "secret-token";

/// Starts the console in-process against `api_uri`
pub fn console(api_uri: &str, cache_ttl: Option<Duration>) -> TestServer {
    let config = ServerConfig {
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        api_base_url: api_uri.to_string(),
        cache_ttl,
        cache_max_entries: 100,
        request_timeout: Duration::from_secs(5),
    };
    let state = AppState::from_config(&config).expect("state should build");
    TestServer::new(router(state)).expect("test server should start")
}

pub fn token_header() -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("x-access-token"),
        HeaderValue::from_static(TOKEN),
    )
}

pub fn delivery_json(id: u64) -> Value {
    json!({
        "id": id,
        "response_status": 200,
        "error_class": null,
        "created_at": "2024-05-01T12:00:00Z",
        "completed_at": "2024-05-01T12:00:01Z",
        "webhook_event": "artwork.published",
        "webhook_id": "wh-1",
        "webhook_url": "https://example.com/hook"
    })
}

pub fn application_json(extra: Value) -> Value {
    let mut app = json!({
        "id": "1",
        "name": "One",
        "client_id": "client_id",
        "client_secret": "client_secret",
        "redirect_urls": [],
        "created_at": "2024-05-01T12:00:00Z",
        "updated_at": "2024-05-01T12:00:00Z"
    });
    if let (Some(app), Some(extra)) = (app.as_object_mut(), extra.as_object()) {
        for (key, value) in extra {
            app.insert(key.clone(), value.clone());
        }
    }
    app
}
