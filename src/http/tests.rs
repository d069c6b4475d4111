//! Tests for the HTTP client module

use super::*;
use crate::error::Error;
use crate::types::BackoffType;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_config(base_url: String) -> HttpClientConfig {
    HttpClientConfig::builder()
        .base_url(base_url)
        .backoff(
            BackoffType::Constant,
            Duration::from_millis(5),
            Duration::from_millis(50),
        )
        .build()
}

async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.unwrap_or_default().len()
}

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.max_attempts, 5);
    assert_eq!(config.backoff_type, BackoffType::Exponential);
    assert_eq!(config.initial_backoff, Duration::from_secs(1));
    assert!(config.timeout.is_none());
    assert!(config.base_url.is_none());
    assert!(config.rate_limit.is_none());
    assert!(config.user_agent.starts_with("revinate-tap/"));
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .base_url("https://porter.example.com")
        .timeout(Duration::from_secs(60))
        .max_attempts(3)
        .backoff(
            BackoffType::Constant,
            Duration::from_millis(200),
            Duration::from_secs(30),
        )
        .header("X-Custom", "value")
        .rate_limit(RateLimiterConfig::per_second(2))
        .user_agent("test-agent/1.0")
        .build();

    assert_eq!(
        config.base_url,
        Some("https://porter.example.com".to_string())
    );
    assert_eq!(config.timeout, Some(Duration::from_secs(60)));
    assert_eq!(config.max_attempts, 3);
    assert_eq!(config.backoff_type, BackoffType::Constant);
    assert_eq!(config.initial_backoff, Duration::from_millis(200));
    assert_eq!(config.max_backoff, Duration::from_secs(30));
    assert_eq!(
        config.default_headers.get("X-Custom"),
        Some(&"value".to_string())
    );
    assert_eq!(config.rate_limit, Some(RateLimiterConfig::per_second(2)));
    assert_eq!(config.user_agent, "test-agent/1.0");
}

#[test]
fn test_request_config_builder() {
    let config = RequestConfig::new()
        .query("page", "1")
        .query("size", "10")
        .header("X-Request-Id", "abc123");

    assert_eq!(config.query.get("page"), Some(&"1".to_string()));
    assert_eq!(config.query.get("size"), Some(&"10".to_string()));
    assert_eq!(
        config.headers.get("X-Request-Id"),
        Some(&"abc123".to_string())
    );
}

#[tokio::test]
async fn test_http_client_get_json_with_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/hotels"))
        .and(query_param("page", "0"))
        .and(query_param("size", "10"))
        .and(query_param("sort", "id,ASC"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "content": [{"name": "Grand"}]
        })))
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(fast_config(mock_server.uri())).unwrap();
    let body: serde_json::Value = client
        .get_json_with_config(
            "/hotels",
            RequestConfig::new()
                .query("page", "0")
                .query("size", "10")
                .query("sort", "id,ASC"),
        )
        .await
        .unwrap();

    assert_eq!(body["content"][0]["name"], "Grand");
}

#[tokio::test]
async fn test_http_client_default_and_request_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reviews"))
        .and(header("X-Revinate-Porter-Key", "key-123"))
        .and(header("X-Request-Id", "req-456"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(mock_server.uri())
        .header("X-Revinate-Porter-Key", "key-123")
        .build();

    let client = HttpClient::with_config(config).unwrap();
    let response = client
        .get_with_config("/reviews", RequestConfig::new().header("X-Request-Id", "req-456"))
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_retry_503_four_times_then_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/hotels"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(4)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/hotels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(fast_config(mock_server.uri())).unwrap();
    let response = client.get("/hotels").await.unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(request_count(&mock_server).await, 5);
}

#[tokio::test]
async fn test_404_fails_after_one_attempt() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/hotels/99/reviewssnapshot"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(fast_config(mock_server.uri())).unwrap();
    let err = client.get("/hotels/99/reviewssnapshot").await.unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 404, ref body } if body == "Not found"));
    assert_eq!(request_count(&mock_server).await, 1);
}

#[tokio::test]
async fn test_429_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(fast_config(mock_server.uri())).unwrap();
    let err = client.get("/reviews").await.unwrap_err();

    assert_eq!(err.status(), Some(429));
    assert_eq!(request_count(&mock_server).await, 1);
}

#[tokio::test]
async fn test_persistent_500_gives_up_after_max_attempts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reviews"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Server error"))
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(fast_config(mock_server.uri())).unwrap();
    let err = client.get("/reviews").await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert_eq!(request_count(&mock_server).await, 5);
}

#[tokio::test]
async fn test_custom_max_attempts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(mock_server.uri())
        .max_attempts(2)
        .backoff(
            BackoffType::Constant,
            Duration::from_millis(5),
            Duration::from_millis(5),
        )
        .build();
    let client = HttpClient::with_config(config).unwrap();

    assert!(client.get("/hotels").await.is_err());
    assert_eq!(request_count(&mock_server).await, 2);
}

#[tokio::test]
async fn test_connection_error_is_retried() {
    // Nothing listens on the reserved port, so every attempt fails to connect
    let config = HttpClientConfig::builder()
        .base_url("http://127.0.0.1:9")
        .max_attempts(2)
        .backoff(
            BackoffType::Constant,
            Duration::from_millis(5),
            Duration::from_millis(5),
        )
        .build();
    let client = HttpClient::with_config(config).unwrap();

    let err = client.get("/hotels").await.unwrap_err();
    assert!(matches!(err, Error::Http(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_full_url_bypasses_base() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/hotels"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(fast_config("http://unused.invalid".to_string())).unwrap();
    let response = client
        .get(&format!("{}/hotels", mock_server.uri()))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[test]
fn test_calculate_backoff_exponential() {
    let config = HttpClientConfig::builder()
        .backoff(
            BackoffType::Exponential,
            Duration::from_secs(1),
            Duration::from_secs(60),
        )
        .build();

    let client = HttpClient::with_config(config).unwrap();

    assert_eq!(client.calculate_backoff(0), Duration::from_secs(1));
    assert_eq!(client.calculate_backoff(1), Duration::from_secs(2));
    assert_eq!(client.calculate_backoff(2), Duration::from_secs(4));
    assert_eq!(client.calculate_backoff(3), Duration::from_secs(8));
}

#[test]
fn test_calculate_backoff_respects_max() {
    let config = HttpClientConfig::builder()
        .backoff(
            BackoffType::Exponential,
            Duration::from_millis(100),
            Duration::from_millis(500),
        )
        .build();

    let client = HttpClient::with_config(config).unwrap();

    assert_eq!(client.calculate_backoff(10), Duration::from_millis(500));
    assert_eq!(client.calculate_backoff(40), Duration::from_millis(500));
}

#[test]
fn test_calculate_backoff_constant() {
    let config = HttpClientConfig::builder()
        .backoff(
            BackoffType::Constant,
            Duration::from_millis(100),
            Duration::from_secs(10),
        )
        .build();

    let client = HttpClient::with_config(config).unwrap();

    assert_eq!(client.calculate_backoff(0), Duration::from_millis(100));
    assert_eq!(client.calculate_backoff(4), Duration::from_millis(100));
}

#[test]
fn test_http_client_debug_and_limiter() {
    let config = HttpClientConfig::builder()
        .header("X-Revinate-Porter-Key", "super-secret")
        .rate_limit(RateLimiterConfig::per_second(5))
        .build();
    let client = HttpClient::with_config(config).unwrap();

    let debug_str = format!("{client:?}");
    assert!(debug_str.contains("HttpClient"));
    assert!(!debug_str.contains("super-secret"));
    assert!(client.has_rate_limiter());
    assert!(!HttpClient::new().unwrap().has_rate_limiter());
}
