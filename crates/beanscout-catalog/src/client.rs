use std::time::Duration;

use reqwest::Client;

use crate::error::CatalogError;
use crate::retry::retry_with_backoff;

/// Default wait when a 429 carries no usable `Retry-After` header.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// HTTP client for third-party coffee feeds.
///
/// Classifies 429, 404 and other non-2xx responses as typed errors. Transient
/// errors (429, network failures) are retried with exponential backoff up to
/// `max_retries` additional attempts.
pub struct FeedClient {
    client: Client,
    max_retries: u32,
    /// Base delay for exponential backoff: `backoff_base_secs * 2^attempt`.
    backoff_base_secs: u64,
}

impl FeedClient {
    /// # Errors
    ///
    /// Returns [`CatalogError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_retries,
            backoff_base_secs,
        })
    }

    /// Fetches the feed at `url` as a list of raw JSON items.
    ///
    /// Items are returned undecoded so one malformed record cannot fail the
    /// whole feed; see [`crate::normalize::normalize_feed`].
    ///
    /// # Errors
    ///
    /// - [`CatalogError::InvalidFeedUrl`]: `url` is not an absolute http(s) URL.
    /// - [`CatalogError::RateLimited`]: HTTP 429 after all retries.
    /// - [`CatalogError::NotFound`]: HTTP 404 (not retried).
    /// - [`CatalogError::UnexpectedStatus`]: any other non-2xx status (not retried).
    /// - [`CatalogError::Http`]: network or TLS failure after all retries.
    /// - [`CatalogError::Deserialize`]: the body is not a JSON array.
    pub async fn fetch_items(&self, url: &str) -> Result<Vec<serde_json::Value>, CatalogError> {
        let parsed = reqwest::Url::parse(url).map_err(|e| CatalogError::InvalidFeedUrl {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(CatalogError::InvalidFeedUrl {
                url: url.to_owned(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }
        let host = parsed.host_str().unwrap_or(url).to_owned();

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = parsed.clone();
            let host = host.clone();
            async move {
                let response = self.client.get(url.clone()).send().await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.trim().parse::<u64>().ok())
                        .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
                    return Err(CatalogError::RateLimited {
                        host,
                        retry_after_secs,
                    });
                }

                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(CatalogError::NotFound {
                        url: url.to_string(),
                    });
                }

                if !status.is_success() {
                    return Err(CatalogError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                }

                let body = response.text().await?;
                serde_json::from_str::<Vec<serde_json::Value>>(&body).map_err(|e| {
                    CatalogError::Deserialize {
                        context: format!("coffee feed from {host}"),
                        source: e,
                    }
                })
            }
        })
        .await
    }
}
