//! Page retrieval
//!
//! The scanner consumes pages through the [`PageFetcher`] seam so batch
//! orchestration can be exercised without a network. The production
//! implementation is a thin reqwest client; rendering JavaScript-heavy
//! pages is out of scope and left to an external browser collaborator that
//! can hand us its serialized DOM instead.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tracing::debug;

use crate::error::ScanError;

pub type FetchResult = Result<String, ScanError>;

/// Capability to turn a URL into an HTML body.
///
/// Implementations must be safe to call concurrently from multiple batch
/// pipelines.
pub trait PageFetcher: Send + Sync {
    fn fetch<'a>(&'a self, url: &'a str) -> Pin<Box<dyn Future<Output = FetchResult> + Send + 'a>>;
}

/// HTTP fetcher over reqwest.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, ScanError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| ScanError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> Pin<Box<dyn Future<Output = FetchResult> + Send + 'a>> {
        Box::pin(async move {
            let parsed = reqwest::Url::parse(url)
                .map_err(|_| ScanError::InvalidUrl(url.to_string()))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ScanError::InvalidUrl(url.to_string()));
            }

            debug!(url, "fetching page");
            let response = self
                .client
                .get(parsed)
                .send()
                .await
                .map_err(|e| ScanError::Fetch {
                    url: url.to_string(),
                    reason: e.to_string(),
                })?;

            let status = response.status();
            if !status.is_success() {
                return Err(ScanError::Fetch {
                    url: url.to_string(),
                    reason: format!("HTTP {}", status),
                });
            }

            response.text().await.map_err(|e| ScanError::Fetch {
                url: url.to_string(),
                reason: e.to_string(),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_url_rejected() {
        let fetcher = HttpFetcher::new("test-agent", Duration::from_secs(5)).unwrap();
        let err = fetcher.fetch("not a url").await.unwrap_err();
        assert!(matches!(err, ScanError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_non_http_scheme_rejected() {
        let fetcher = HttpFetcher::new("test-agent", Duration::from_secs(5)).unwrap();
        let err = fetcher.fetch("ftp://example.com/page").await.unwrap_err();
        assert!(matches!(err, ScanError::InvalidUrl(_)));
    }
}
