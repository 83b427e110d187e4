//! Integration tests for `FeedClient` and remote `CatalogSource`.
//!
//! Each test stands up a local `wiremock` server so no real network traffic
//! is made.

use beanscout_catalog::{CatalogError, CatalogSource, FeedClient};
use beanscout_core::ScoreBaseline;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// 5-second timeout, descriptive UA, no retries.
fn test_client() -> FeedClient {
    FeedClient::new(5, "beanscout-test/0.1", 0, 0).expect("failed to build test FeedClient")
}

fn test_client_with_retries(max_retries: u32) -> FeedClient {
    FeedClient::new(5, "beanscout-test/0.1", max_retries, 0)
        .expect("failed to build test FeedClient")
}

fn feed_json(count: usize) -> serde_json::Value {
    let items: Vec<_> = (0..count)
        .map(|i| {
            json!({
                "title": format!("Drink {i}"),
                "description": "Coffee drink",
                "ingredients": ["Espresso", "Milk"],
                "image": format!("https://img.example.com/{i}.jpg"),
                "id": i + 1
            })
        })
        .collect();
    serde_json::Value::Array(items)
}

fn remote_source(server: &MockServer, limit: usize) -> CatalogSource {
    CatalogSource::Remote {
        client: test_client(),
        url: format!("{}/coffee/hot", server.uri()),
        limit,
        pricing_seed: 42,
        baseline: ScoreBaseline::new(2.5).unwrap(),
    }
}

#[tokio::test]
async fn fetch_items_returns_feed_records() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/coffee/hot"))
        .and(header("user-agent", "beanscout-test/0.1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feed_json(3)))
        .mount(&server)
        .await;

    let items = test_client()
        .fetch_items(&format!("{}/coffee/hot", server.uri()))
        .await
        .expect("feed should load");
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["title"], "Drink 0");
}

#[tokio::test]
async fn fetch_items_maps_404_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = test_client()
        .fetch_items(&format!("{}/coffee/hot", server.uri()))
        .await;
    assert!(
        matches!(result, Err(CatalogError::NotFound { .. })),
        "got: {result:?}"
    );
}

#[tokio::test]
async fn fetch_items_maps_500_to_unexpected_status_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let result = test_client_with_retries(3)
        .fetch_items(&format!("{}/coffee/hot", server.uri()))
        .await;
    assert!(
        matches!(result, Err(CatalogError::UnexpectedStatus { status: 500, .. })),
        "got: {result:?}"
    );
}

#[tokio::test]
async fn fetch_items_reports_rate_limit_with_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "0"))
        .mount(&server)
        .await;

    let result = test_client()
        .fetch_items(&format!("{}/coffee/hot", server.uri()))
        .await;
    match result {
        Err(CatalogError::RateLimited {
            host,
            retry_after_secs,
        }) => {
            assert_eq!(host, "127.0.0.1");
            assert_eq!(retry_after_secs, 0);
        }
        other => panic!("expected RateLimited, got: {other:?}"),
    }
}

#[tokio::test]
async fn fetch_items_retries_rate_limit_then_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "0"))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feed_json(2)))
        .mount(&server)
        .await;

    let items = test_client_with_retries(3)
        .fetch_items(&format!("{}/coffee/hot", server.uri()))
        .await
        .expect("third attempt should succeed");
    assert_eq!(items.len(), 2);
}

#[tokio::test]
async fn fetch_items_rejects_malformed_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = test_client()
        .fetch_items(&format!("{}/coffee/hot", server.uri()))
        .await;
    assert!(
        matches!(result, Err(CatalogError::Deserialize { .. })),
        "got: {result:?}"
    );
}

#[tokio::test]
async fn fetch_items_rejects_non_array_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .mount(&server)
        .await;

    let result = test_client()
        .fetch_items(&format!("{}/coffee/hot", server.uri()))
        .await;
    assert!(matches!(result, Err(CatalogError::Deserialize { .. })));
}

#[tokio::test]
async fn fetch_items_rejects_invalid_url() {
    let result = test_client().fetch_items("not a url").await;
    assert!(matches!(result, Err(CatalogError::InvalidFeedUrl { .. })));

    let result = test_client().fetch_items("ftp://example.com/feed").await;
    assert!(matches!(result, Err(CatalogError::InvalidFeedUrl { .. })));
}

#[tokio::test]
async fn remote_source_keeps_first_limit_items() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/coffee/hot"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feed_json(25)))
        .mount(&server)
        .await;

    let catalog = remote_source(&server, 20)
        .fetch_catalog()
        .await
        .expect("catalog should load");
    assert_eq!(catalog.products.len(), 20);
    assert_eq!(catalog.products[0].id, "1");
    assert_eq!(catalog.products[0].name, "Drink 0");
    assert_eq!(catalog.products[0].flavor_notes(), ["Espresso", "Milk"]);
    assert_eq!(
        catalog.products[0].image_url.as_deref(),
        Some("https://img.example.com/0.jpg")
    );
    assert_eq!(catalog.baseline.value(), 2.5);
}

#[tokio::test]
async fn remote_source_is_deterministic_across_refreshes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feed_json(5)))
        .mount(&server)
        .await;

    let source = remote_source(&server, 20);
    let first = source.fetch_catalog().await.unwrap();
    let second = source.fetch_catalog().await.unwrap();
    assert_eq!(first.products, second.products);
}

#[tokio::test]
async fn remote_source_propagates_feed_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = remote_source(&server, 20).fetch_catalog().await;
    assert!(matches!(
        result,
        Err(CatalogError::UnexpectedStatus { status: 503, .. })
    ));
}
