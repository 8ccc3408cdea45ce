//! reqwest-backed transport
//!
//! Provides the default [`Transport`] implementation:
//! - Per-client timeout and user agent
//! - Default headers merged into every request
//! - Cookies flattened into one `Cookie` header
//!
//! No retries and no rate limiting happen here. A failed fetch is reported
//! upward immediately.

use super::transport::{Request, Response, Transport};
use crate::error::{Error, Result};
use crate::types::HeaderMultiMap;
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout
    pub timeout: Duration,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            default_headers: HashMap::new(),
            user_agent: format!("media-extract/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// HTTP client implementing [`Transport`]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    fn build_request(&self, request: &Request) -> reqwest::RequestBuilder {
        let mut req = self
            .client
            .request(request.method.into(), request.url.as_str());

        for (key, value) in &self.config.default_headers {
            if !request.headers.contains_key(key) {
                req = req.header(key.as_str(), value.as_str());
            }
        }

        for (key, values) in &request.headers {
            for value in values {
                req = req.header(key.as_str(), value.as_str());
            }
        }

        if let Some(cookie) = request.cookie_header() {
            req = req.header(reqwest::header::COOKIE, cookie);
        }

        if let Some(body) = &request.body {
            req = req.body(body.clone());
        }

        req
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn execute(&self, request: &Request) -> Result<Response> {
        let response = self.build_request(request).send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout {
                    timeout_ms: self.config.timeout.as_millis() as u64,
                }
            } else {
                Error::Network(e)
            }
        })?;

        let status = response.status().as_u16();
        let url = response.url().to_string();

        let mut headers = HeaderMultiMap::new();
        for (name, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                headers
                    .entry(name.as_str().to_string())
                    .or_default()
                    .push(value.to_string());
            }
        }

        let body = response.bytes().await?;
        debug!("Received {} ({} bytes) from {}", status, body.len(), url);

        Ok(Response {
            status,
            url,
            headers,
            body,
        })
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
