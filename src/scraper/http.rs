//! HTTP page fetcher using reqwest.

use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

use crate::config::ScraperConfig;
use crate::retry::{retry_when, RetryConfig};

/// Failure fetching an upstream page
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("HTTP {status}: {url}")]
    Status { status: StatusCode, url: String },

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl ScrapeError {
    /// Rate limiting, server errors and transport failures are worth retrying
    pub fn is_transient(&self) -> bool {
        match self {
            ScrapeError::Status { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            ScrapeError::Request(e) => e.is_timeout() || e.is_connect() || e.is_request(),
        }
    }
}

/// Fetches raw HTML with a fixed identifying user agent
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    retry: RetryConfig,
}

impl HttpFetcher {
    /// Build a fetcher from scraper configuration
    pub fn new(config: &ScraperConfig) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            retry: RetryConfig::network(config.max_retries),
        })
    }

    /// GET `url` and return the body; non-2xx responses are errors
    pub async fn fetch_html(&self, url: &str) -> Result<String, ScrapeError> {
        retry_when(
            &self.retry,
            url,
            || self.fetch_once(url),
            ScrapeError::is_transient,
        )
        .await
    }

    async fn fetch_once(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                status,
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_error(code: u16) -> ScrapeError {
        ScrapeError::Status {
            status: StatusCode::from_u16(code).unwrap(),
            url: "https://example.com".to_string(),
        }
    }

    #[test]
    fn test_transient_statuses() {
        assert!(status_error(429).is_transient());
        assert!(status_error(503).is_transient());
        assert!(!status_error(404).is_transient());
        assert!(!status_error(403).is_transient());
    }

    #[test]
    fn test_status_error_message() {
        assert_eq!(
            status_error(404).to_string(),
            "HTTP 404 Not Found: https://example.com"
        );
    }

    #[test]
    fn test_fetcher_builds_from_config() {
        let fetcher = HttpFetcher::new(&ScraperConfig::default());
        assert!(fetcher.is_ok());
    }
}
