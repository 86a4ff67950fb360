//! HTTP client for the waste collection API.
//!
//! `ApiClient` knows the endpoint of every [`ResourceKind`] and implements
//! [`Fetcher`] for each cacheable payload type.

use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::resource::Resource;

use super::{ApiError, Fetcher};

// ============================================================================
// Constants
// ============================================================================

/// Default API location (the backend's development server).
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Upper bound for a single backoff delay.
const MAX_BACKOFF_MS: u64 = 60_000;

/// Exponential backoff, capped at `MAX_BACKOFF_MS`.
fn next_backoff_ms(current: u64) -> u64 {
    current.saturating_mul(2).min(MAX_BACKOFF_MS)
}

/// API client for the waste collection backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    /// Extra attempts after a 429 before giving up with `RateLimited`.
    rate_limit_retries: u32,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_options(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS), 0)
    }

    pub fn with_options(
        base_url: &str,
        timeout: Duration,
        rate_limit_retries: u32,
    ) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            rate_limit_retries,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if response is successful, returning an error with body if not.
    /// Returns Ok(Some(response)) for success, Ok(None) for rate limit (should retry),
    /// or Err for other errors.
    async fn check_response_for_retry(
        response: reqwest::Response,
    ) -> Result<Option<reqwest::Response>, ApiError> {
        if response.status().is_success() {
            Ok(Some(response))
        } else if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            Ok(None)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            debug!(url = %url, "GET");
            let response = self
                .client
                .get(&url)
                .header(header::ACCEPT, "application/json")
                .send()
                .await?;

            match Self::check_response_for_retry(response).await? {
                Some(response) => {
                    let text = response.text().await?;
                    return serde_json::from_str(&text).map_err(|e| {
                        ApiError::InvalidResponse(format!("Failed to parse JSON response from {}: {}", url, e))
                    });
                }
                None => {
                    retries += 1;
                    if retries > self.rate_limit_retries {
                        return Err(ApiError::RateLimited);
                    }
                    warn!(url = %url, retry = retries, backoff_ms = backoff_ms, "Rate limited, backing off");
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    backoff_ms = next_backoff_ms(backoff_ms);
                }
            }
        }
    }

    /// Fetch any resource kind. Zone-scoped kinds fail with `MissingScope`
    /// before any request is sent when `scope` is `None`.
    pub async fn fetch_resource<T: Resource>(&self, scope: Option<&str>) -> Result<T, ApiError> {
        let path = T::KIND.path(scope).ok_or(ApiError::MissingScope(T::KIND))?;
        self.get(&path).await
    }
}

impl<T: Resource> Fetcher<T> for ApiClient {
    fn fetch<'a>(&'a self, scope: Option<&'a str>) -> BoxFuture<'a, Result<T, ApiError>> {
        self.fetch_resource::<T>(scope).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DownloadLinks, NextPickups, Schedule, StreetZoneMapping};
    use crate::resource::ResourceKind;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve canned `(status line, body)` responses, one per connection, and
    /// count the requests received.
    async fn stub_server(responses: Vec<(&'static str, &'static str)>) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();

        tokio::spawn(async move {
            for (status, body) in responses {
                let (mut socket, _) = match listener.accept().await {
                    Ok(conn) => conn,
                    Err(_) => return,
                };
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                counter.fetch_add(1, Ordering::SeqCst);
                let reply = format!(
                    "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(reply.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        (format!("http://{}", addr), hits)
    }

    #[tokio::test]
    async fn test_fetch_next_pickups() {
        let (url, hits) = stub_server(vec![(
            "200 OK",
            r#"{"zone":"B1","reference_date":"2025-08-08","next_pickups":[{"type":"Restmüll","date":"2025-08-08"}]}"#,
        )])
        .await;
        let client = ApiClient::new(&url).unwrap();

        let next: NextPickups = client.fetch_resource(Some("B1")).await.unwrap();
        assert_eq!(next.zone, "B1");
        assert_eq!(next.next_pickups[0].waste_type, "Restmüll");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fetch_through_fetcher_trait() {
        let (url, _) = stub_server(vec![("200 OK", r#"{"Hauptstraße":"A1"}"#)]).await;
        let client = ApiClient::new(&url).unwrap();
        let fetcher: &dyn Fetcher<StreetZoneMapping> = &client;

        let mapping = fetcher.fetch(None).await.unwrap();
        assert_eq!(mapping.zone_for("Hauptstraße").unwrap().as_str(), "A1");
    }

    #[tokio::test]
    async fn test_rate_limited_surfaces_status() {
        let (url, _) = stub_server(vec![("429 Too Many Requests", "{}")]).await;
        let client = ApiClient::new(&url).unwrap();

        let err = client.fetch_resource::<Schedule>(Some("A1")).await.unwrap_err();
        assert!(err.is_rate_limited());
        assert_eq!(err.status(), Some(429));
    }

    #[tokio::test]
    async fn test_rate_limit_retry_then_success() {
        let (url, hits) = stub_server(vec![
            ("429 Too Many Requests", "{}"),
            ("200 OK", r#"{"Ring":"C2"}"#),
        ])
        .await;
        let client = ApiClient::with_options(&url, Duration::from_secs(5), 1).unwrap();

        let mapping: StreetZoneMapping = client.fetch_resource(None).await.unwrap();
        assert_eq!(mapping.len(), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_not_found() {
        let (url, _) = stub_server(vec![("404 Not Found", r#"{"detail":"Zone not found"}"#)]).await;
        let client = ApiClient::new(&url).unwrap();

        let err = client.fetch_resource::<Schedule>(Some("E4")).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(ref body) if body.contains("Zone not found")));
    }

    #[tokio::test]
    async fn test_invalid_json_is_invalid_response() {
        let (url, _) = stub_server(vec![("200 OK", r#"{"reference_date": 5}"#)]).await;
        let client = ApiClient::new(&url).unwrap();

        let err = client.fetch_resource::<DownloadLinks>(None).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn test_missing_scope_sends_nothing() {
        let (url, hits) = stub_server(vec![("200 OK", "{}")]).await;
        let client = ApiClient::new(&url).unwrap();

        let err = client.fetch_resource::<NextPickups>(None).await.unwrap_err();
        assert!(matches!(err, ApiError::MissingScope(ResourceKind::NextPickups)));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_backoff_doubles_then_caps() {
        assert_eq!(next_backoff_ms(INITIAL_BACKOFF_MS), 2000);
        assert_eq!(next_backoff_ms(32_000), MAX_BACKOFF_MS);
        assert_eq!(next_backoff_ms(MAX_BACKOFF_MS), MAX_BACKOFF_MS);
        assert_eq!(next_backoff_ms(u64::MAX), MAX_BACKOFF_MS);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::new("https://abfall.example.org/").unwrap();
        assert_eq!(client.base_url(), "https://abfall.example.org");
    }
}
