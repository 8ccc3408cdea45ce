//! Transport abstraction
//!
//! The extraction core never talks to the network directly. Adapters build a
//! [`Request`] and hand it to [`fetch`], which runs it on a [`Transport`]
//! while honouring the caller's cancellation token.

use crate::error::{Error, Result};
use crate::types::{CookieMap, HeaderMultiMap, Method};
use async_trait::async_trait;
use bytes::Bytes;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// A single outgoing request
#[derive(Debug, Clone, Default)]
pub struct Request {
    /// HTTP method
    pub method: Method,
    /// Absolute target URL
    pub url: String,
    /// Request headers, multiple values per name allowed
    pub headers: HeaderMultiMap,
    /// Cookies sent with the request
    pub cookies: CookieMap,
    /// Raw request body
    pub body: Option<Vec<u8>>,
    /// Non-2xx statuses the caller is prepared to handle itself
    pub tolerated_statuses: Vec<u16>,
}

impl Request {
    /// Create a request with the given method and URL
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            ..Default::default()
        }
    }

    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    /// Append a header value
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .entry(name.into())
            .or_default()
            .push(value.into());
        self
    }

    /// Set a cookie
    #[must_use]
    pub fn cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    /// Set the raw body
    #[must_use]
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Accept a non-success status instead of failing the fetch
    #[must_use]
    pub fn tolerate(mut self, status: u16) -> Self {
        self.tolerated_statuses.push(status);
        self
    }

    /// Render cookies as a single `Cookie` header value
    pub fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        let joined = self
            .cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ");
        Some(joined)
    }
}

/// A raw response as seen by adapters
#[derive(Debug, Clone)]
pub struct Response {
    /// Status code
    pub status: u16,
    /// Final URL after redirects
    pub url: String,
    /// Response headers with lowercase names
    pub headers: HeaderMultiMap,
    /// Response body
    pub body: Bytes,
}

impl Response {
    /// Whether the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// First value of a header (name is matched case-insensitively)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Body decoded as UTF-8
    pub fn text(&self) -> Result<String> {
        String::from_utf8(self.body.to_vec())
            .map_err(|e| Error::parsing(format!("Response body is not UTF-8: {e}")))
    }
}

/// Executes requests; implemented by [`super::HttpClient`] and by test doubles
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform the request and return the raw response, whatever its status
    async fn execute(&self, request: &Request) -> Result<Response>;
}

/// Run a request, failing on cancellation or on an untolerated status
///
/// Never retries. A cancelled token always wins over a concurrent completion.
pub async fn fetch(
    transport: &dyn Transport,
    request: &Request,
    cancel: &CancellationToken,
) -> Result<Response> {
    if cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }

    debug!("Fetching {} {}", request.method, request.url);

    let response = tokio::select! {
        biased;
        () = cancel.cancelled() => return Err(Error::Cancelled),
        response = transport.execute(request) => response?,
    };

    if !response.is_success() && !request.tolerated_statuses.contains(&response.status) {
        return Err(Error::http_status(response.status, &request.url));
    }

    Ok(response)
}
