//! HTTP tests for the webhook delivery pages

mod common;

use std::time::Duration;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use common::{console, delivery_json, token_header, TOKEN};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEN_MINUTES: Option<Duration> = Some(Duration::from_secs(600));

async fn mount_listing(server: &MockServer, count: u64, expected_calls: u64) {
    let body: Vec<_> = (1..=count).map(delivery_json).collect();
    Mock::given(method("GET"))
        .and(path("/webhook_deliveries"))
        .and(header("X-Access-Token", TOKEN))
        .and(query_param("client_application_id", "abc"))
        .and(query_param("page", "1"))
        .and(query_param("size", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_listing_renders_deliveries_and_caches_them() {
    let api = MockServer::start().await;
    mount_listing(&api, 10, 1).await;
    let console = console(&api.uri(), TEN_MINUTES);
    let (name, value) = token_header();

    let first = console
        .get("/webhook_deliveries")
        .add_query_param("client_application_id", "abc")
        .add_header(name.clone(), value.clone())
        .await;
    let second = console
        .get("/webhook_deliveries")
        .add_query_param("client_application_id", "abc")
        .add_query_param("page", "1")
        .add_query_param("size", "10")
        .add_header(name, value)
        .await;

    assert_eq!(first.status_code(), StatusCode::OK);
    let html = first.text();
    assert_eq!(html.matches("class=\"delivery\"").count(), 10);
    assert!(html.contains("2024-05-01 12:00:00 UTC"));
    // No X-Total-Count upstream, so only the current page is shown
    assert!(html.contains("Page 1</span>"));
    assert_eq!(second.text(), html);
}

#[tokio::test]
async fn test_listing_without_cache_calls_upstream_every_time() {
    let api = MockServer::start().await;
    mount_listing(&api, 3, 2).await;
    let console = console(&api.uri(), None);

    for _ in 0..2 {
        let (name, value) = token_header();
        let response = console
            .get("/webhook_deliveries")
            .add_query_param("client_application_id", "abc")
            .add_header(name, value)
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
    }
}

#[tokio::test]
async fn test_listing_uses_reported_total() {
    let api = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/webhook_deliveries"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(vec![delivery_json(11)])
                .insert_header("X-Total-Count", "21"),
        )
        .mount(&api)
        .await;
    let console = console(&api.uri(), TEN_MINUTES);
    let (name, value) = token_header();

    let response = console
        .get("/webhook_deliveries")
        .add_query_param("client_application_id", "abc")
        .add_query_param("page", "2")
        .add_header(name, value)
        .await;

    let html = response.text();
    assert!(html.contains("Page 2 of 3"));
    assert!(html.contains("rel=\"prev\""));
    assert!(html.contains("rel=\"next\""));
}

#[tokio::test]
async fn test_listing_upstream_failure_renders_banner() {
    let api = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/webhook_deliveries"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database unavailable"))
        .expect(2)
        .mount(&api)
        .await;
    let console = console(&api.uri(), TEN_MINUTES);

    for _ in 0..2 {
        let (name, value) = token_header();
        let response = console
            .get("/webhook_deliveries")
            .add_query_param("client_application_id", "abc")
            .add_header(name, value)
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
        let html = response.text();
        assert!(html.contains("alert-danger"));
        assert!(html.contains("database unavailable"));
        assert!(!html.contains("class=\"delivery\""));
    }
}

#[tokio::test]
async fn test_listing_unreachable_upstream_renders_banner() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let uri = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    let console = console(&uri, TEN_MINUTES);
    let (name, value) = token_header();

    let response = console
        .get("/webhook_deliveries")
        .add_query_param("client_application_id", "abc")
        .add_header(name, value)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
    assert!(response.text().contains("Could not reach the platform API"));
}

#[tokio::test]
async fn test_listing_requires_application_id() {
    let api = MockServer::start().await;
    let console = console(&api.uri(), TEN_MINUTES);
    let (name, value) = token_header();

    let response = console.get("/webhook_deliveries").add_header(name, value).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(response.text().contains("client_application_id is required"));
}

#[tokio::test]
async fn test_missing_token_asks_to_sign_in() {
    let api = MockServer::start().await;
    mount_listing(&api, 1, 0).await;
    let console = console(&api.uri(), TEN_MINUTES);

    let response = console
        .get("/webhook_deliveries")
        .add_query_param("client_application_id", "abc")
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert!(response.text().contains("Sign in required"));
}

#[tokio::test]
async fn test_token_is_read_from_session_cookie() {
    let api = MockServer::start().await;
    mount_listing(&api, 1, 1).await;
    let console = console(&api.uri(), TEN_MINUTES);

    let cookie = format!("access_token={}", TOKEN);
    let response = console
        .get("/webhook_deliveries")
        .add_query_param("client_application_id", "abc")
        .add_header(
            HeaderName::from_static("cookie"),
            HeaderValue::from_str(&cookie).unwrap(),
        )
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_detail_is_fetched_every_time() {
    let api = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/webhook_deliveries/42"))
        .and(header("X-Access-Token", TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(delivery_json(42)))
        .expect(2)
        .mount(&api)
        .await;
    let console = console(&api.uri(), TEN_MINUTES);

    for _ in 0..2 {
        let (name, value) = token_header();
        let response = console.get("/webhook_deliveries/42").add_header(name, value).await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let html = response.text();
        assert!(html.contains("<td id=\"id\">42</td>"));
        assert!(html.contains("artwork.published"));
    }
}

#[tokio::test]
async fn test_detail_id_cannot_reach_other_upstream_paths() {
    let api = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/webhook_deliveries/..%2Fclient_applications%2F1"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&api)
        .await;
    Mock::given(method("GET"))
        .and(path("/client_applications/1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&api)
        .await;
    let console = console(&api.uri(), TEN_MINUTES);
    let (name, value) = token_header();

    let response = console
        .get("/webhook_deliveries/..%2Fclient_applications%2F1")
        .add_header(name, value)
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_detail_not_found() {
    let api = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/webhook_deliveries/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&api)
        .await;
    let console = console(&api.uri(), TEN_MINUTES);
    let (name, value) = token_header();

    let response = console
        .get("/webhook_deliveries/missing")
        .add_header(name, value)
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert!(response.text().contains("Not found: webhook delivery missing"));
}

#[tokio::test]
async fn test_health() {
    let api = MockServer::start().await;
    let console = console(&api.uri(), TEN_MINUTES);

    let response = console.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), "ok");
}
