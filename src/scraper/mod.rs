//! Scraper module for fetching HTML content from the target site
//!
//! This module provides the [`Fetch`] capability the crawler consumes and
//! its HTTP implementation with browser-like headers. Requests are made one
//! at a time; there are no retries or delays.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use reqwest::Client;
use thiserror::Error;

use crate::config::Config;

/// Errors that can occur during scraping operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScraperError {
    /// Network-related errors (connection timeout, DNS failure, etc.)
    #[error("Failed to connect to server: {0}")]
    NetworkError(String),

    /// HTTP non-success status code errors
    #[error("Server returned status {0}")]
    HttpError(u16),

    /// Error reading response body
    #[error("Failed to read response body: {0}")]
    ResponseError(String),
}

/// Anything that can turn a URL into page text
pub trait Fetch {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, ScraperError>> + Send;
}

/// Result of a successful page fetch
#[derive(Debug)]
pub struct ScraperResult {
    /// The HTML content of the page
    pub html: String,
    /// The HTTP status code
    pub status: u16,
}

/// HTTP client settings
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Whole-request timeout
    pub request_timeout: Duration,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// User agent header value
    pub user_agent: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        ScraperConfig::from(&Config::default())
    }
}

impl From<&Config> for ScraperConfig {
    fn from(config: &Config) -> Self {
        Self {
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            connect_timeout: Duration::from_secs(config.connect_timeout_secs),
            user_agent: config.user_agent.clone(),
        }
    }
}

/// HTTP client for fetching listing pages
pub struct Scraper {
    client: Client,
    config: ScraperConfig,
    request_count: AtomicUsize,
}

impl Scraper {
    /// Create a new Scraper with default configuration
    pub fn new() -> Result<Self, ScraperError> {
        Self::with_config(ScraperConfig::default())
    }

    /// Create a new Scraper with custom configuration
    pub fn with_config(config: ScraperConfig) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| ScraperError::NetworkError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            request_count: AtomicUsize::new(0),
        })
    }

    /// Fetch a page from the given URL
    pub async fn fetch_page(&self, url: &str) -> Result<ScraperResult, ScraperError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(url, request = count, "Fetching page");

        let response = self
            .client
            .get(url)
            .header("User-Agent", self.config.user_agent.as_str())
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .header("Accept-Language", "en-US,en;q=0.9")
            .header("Accept-Encoding", "gzip, deflate, br")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ScraperError::NetworkError("Connection timeout".to_string())
                } else if e.is_connect() {
                    ScraperError::NetworkError("Failed to connect to server".to_string())
                } else {
                    ScraperError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        let status_code = status.as_u16();

        if !status.is_success() {
            tracing::warn!(url, status = status_code, "Fetch failed");
            return Err(ScraperError::HttpError(status_code));
        }

        let html = response
            .text()
            .await
            .map_err(|e| ScraperError::ResponseError(e.to_string()))?;

        Ok(ScraperResult {
            html,
            status: status_code,
        })
    }

    /// Get current request count
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }
}

impl Fetch for Scraper {
    async fn fetch(&self, url: &str) -> Result<String, ScraperError> {
        self.fetch_page(url).await.map(|result| result.html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[test]
    fn test_scraper_creation() {
        let scraper = Scraper::new().unwrap();
        assert_eq!(scraper.request_count(), 0);
    }

    #[test]
    fn test_default_config() {
        let config = ScraperConfig::default();
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
    }

    #[test]
    fn test_config_from_app_config() {
        let app_config = Config {
            request_timeout_secs: 3,
            connect_timeout_secs: 1,
            user_agent: "harvester-test".to_string(),
            ..Config::default()
        };
        let config = ScraperConfig::from(&app_config);
        assert_eq!(config.request_timeout, Duration::from_secs(3));
        assert_eq!(config.connect_timeout, Duration::from_secs(1));
        assert_eq!(config.user_agent, "harvester-test");
    }

    #[tokio::test]
    async fn test_fetch_page_success() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/anime/all")
            .match_query(mockito::Matcher::Any)
            .match_header("user-agent", "harvester-test")
            .with_status(200)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body("<h5>カウボーイビバップ</h5>")
            .expect(1)
            .create_async()
            .await;

        let scraper = Scraper::with_config(ScraperConfig {
            user_agent: "harvester-test".to_string(),
            ..ScraperConfig::default()
        })
        .unwrap();

        let url = format!("{}/anime/all?sort=title&order=asc&page=1", server.url());
        let result = scraper.fetch_page(&url).await.unwrap();

        assert_eq!(result.status, 200);
        assert_eq!(result.html, "<h5>カウボーイビバップ</h5>");
        assert_eq!(scraper.request_count(), 1);

        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/anime/all")
            .with_status(503)
            .with_body("unavailable")
            .expect(1)
            .create_async()
            .await;

        let scraper = Scraper::new().unwrap();
        let err = scraper
            .fetch(&format!("{}/anime/all", server.url()))
            .await
            .unwrap_err();

        assert_eq!(err, ScraperError::HttpError(503));
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_not_found_is_not_retried() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/missing")
            .with_status(404)
            .expect(1)
            .create_async()
            .await;

        let scraper = Scraper::new().unwrap();
        let err = scraper
            .fetch(&format!("{}/missing", server.url()))
            .await
            .unwrap_err();

        assert_eq!(err, ScraperError::HttpError(404));
        assert_eq!(scraper.request_count(), 1);
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        let scraper = Scraper::with_config(ScraperConfig {
            connect_timeout: Duration::from_secs(2),
            ..ScraperConfig::default()
        })
        .unwrap();

        // Bind then drop a listener to get a port nothing listens on.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let err = scraper
            .fetch(&format!("http://127.0.0.1:{}/", port))
            .await
            .unwrap_err();
        assert!(matches!(err, ScraperError::NetworkError(_)));
    }
}
