//! HTTP client used for repository documents.
//!
//! Provides a wrapper around reqwest with:
//! - A default timeout and user agent
//! - Cache-busting requests (repositories are edited in place on their hosts)
//! - Status checking, so non-success responses surface as errors
//! - JSON decoding with the document URL in the error message

use crate::config::{AppConfig, NetworkConfig};
use crate::{Result, SekaiError};
use reqwest::{header, Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// HTTP client for fetching repository documents.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    /// Default timeout for requests.
    default_timeout: Duration,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration.
    pub fn new() -> Result<Self> {
        Self::with_timeout(NetworkConfig::REQUEST_TIMEOUT)
    }

    /// Create a new HTTP client with a custom default timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(AppConfig::USER_AGENT)
            .build()
            .map_err(|e| SekaiError::Network {
                message: format!("Failed to create HTTP client: {}", e),
                cause: None,
            })?;

        Ok(Self {
            client,
            default_timeout: timeout,
        })
    }

    /// Default timeout applied to every request.
    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Make a GET request, failing on any non-success status.
    pub async fn get(&self, url: &str) -> Result<Response> {
        let response = self
            .client
            .get(url)
            .header(header::CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SekaiError::Timeout(self.default_timeout)
                } else {
                    SekaiError::Network {
                        message: format!("GET {} failed: {}", url, e),
                        cause: std::error::Error::source(&e).map(|s| s.to_string()),
                    }
                }
            })?;

        check_response_status(response, url)
    }

    /// GET a document and decode it as JSON.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.get(url).await?;
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                SekaiError::Timeout(self.default_timeout)
            } else {
                SekaiError::Network {
                    message: format!("Reading body of {} failed: {}", url, e),
                    cause: std::error::Error::source(&e).map(|s| s.to_string()),
                }
            }
        })?;
        debug!("Fetched {} bytes from {}", body.len(), extract_domain(url));

        serde_json::from_str(&body).map_err(|e| SekaiError::Json {
            message: format!("{}: {}", url, e),
            source: Some(e),
        })
    }
}

fn check_response_status(response: Response, url: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    Err(SekaiError::HttpStatus {
        url: url.to_string(),
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
    })
}

/// Extract domain from a URL.
pub fn extract_domain(url: &str) -> String {
    url::Url::parse(url)
        .map(|u| u.host_str().unwrap_or("unknown").to_string())
        .unwrap_or_else(|_| "unknown".to_string())
}
