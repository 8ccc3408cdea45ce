//! Cursor and page container types
//!
//! Defines the continuation token handed out by adapters and the container
//! each page fetch returns.

use crate::error::{Error, ExtractionFailure, Result};
use crate::http::Request;
use crate::types::{CookieMap, HeaderMultiMap, Method};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Current version of the serialized cursor envelope
pub const CURSOR_ENVELOPE_VERSION: u32 = 1;

// ============================================================================
// Page (continuation cursor)
// ============================================================================

/// Opaque continuation token for a paginated list
///
/// Everything an adapter needs to request the next page: the request to
/// replay plus an adapter-owned payload. The core never interprets it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Target URL of the next request
    pub url: String,

    /// HTTP method of the next request
    #[serde(default)]
    pub method: Method,

    /// Request headers to replay
    #[serde(default, skip_serializing_if = "HeaderMultiMap::is_empty")]
    pub headers: HeaderMultiMap,

    /// Cookies to replay
    #[serde(default, skip_serializing_if = "CookieMap::is_empty")]
    pub cookies: CookieMap,

    /// Request body to replay (e.g. a POSTed continuation)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    /// Adapter-specific payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<PageData>,
}

/// Type-erased payload attached to a cursor by the adapter that created it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageData {
    /// Identity of the owning adapter (e.g. "bilibili:series")
    pub owner: String,
    /// Adapter-defined data, preserved verbatim
    pub payload: Value,
}

impl Page {
    /// Create a GET cursor for a URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: Method::GET,
            headers: HeaderMultiMap::new(),
            cookies: CookieMap::new(),
            body: None,
            extra: None,
        }
    }

    /// Set the HTTP method
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
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

    /// Set the request body
    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Attach an adapter payload
    pub fn with_data<T: Serialize>(mut self, owner: impl Into<String>, data: &T) -> Result<Self> {
        self.extra = Some(PageData {
            owner: owner.into(),
            payload: serde_json::to_value(data)?,
        });
        Ok(self)
    }

    /// Read back the adapter payload, checking ownership
    ///
    /// Fails with [`Error::InvalidCursor`] if the payload is missing, belongs
    /// to another adapter, or does not have the expected shape.
    pub fn data<T: DeserializeOwned>(&self, owner: &str) -> Result<T> {
        let extra = self
            .extra
            .as_ref()
            .ok_or_else(|| Error::invalid_cursor(format!("cursor carries no data for {owner}")))?;

        if extra.owner != owner {
            return Err(Error::invalid_cursor(format!(
                "cursor belongs to {}, not {owner}",
                extra.owner
            )));
        }

        serde_json::from_value(extra.payload.clone())
            .map_err(|e| Error::invalid_cursor(format!("malformed {owner} cursor data: {e}")))
    }

    /// Serialize to a self-contained, URL-safe token
    pub fn to_token(&self) -> Result<String> {
        let envelope = CursorEnvelope {
            version: CURSOR_ENVELOPE_VERSION,
            page: self.clone(),
        };
        let json = serde_json::to_vec(&envelope)?;
        Ok(URL_SAFE_NO_PAD.encode(json))
    }

    /// Restore a cursor from a token produced by [`Page::to_token`]
    pub fn from_token(token: &str) -> Result<Self> {
        let bytes = URL_SAFE_NO_PAD
            .decode(token.trim())
            .map_err(|e| Error::invalid_cursor(format!("token is not base64: {e}")))?;

        let envelope: CursorEnvelope = serde_json::from_slice(&bytes)
            .map_err(|e| Error::invalid_cursor(format!("token is not a cursor: {e}")))?;

        if envelope.version != CURSOR_ENVELOPE_VERSION {
            return Err(Error::invalid_cursor(format!(
                "unsupported cursor version {}",
                envelope.version
            )));
        }

        Ok(envelope.page)
    }

    /// Build the request this cursor describes
    pub fn to_request(&self) -> Request {
        Request {
            method: self.method,
            url: self.url.clone(),
            headers: self.headers.clone(),
            cookies: self.cookies.clone(),
            body: self.body.clone().map(String::into_bytes),
            tolerated_statuses: Vec::new(),
        }
    }
}

/// Versioned wire form of a cursor
#[derive(Debug, Serialize, Deserialize)]
struct CursorEnvelope {
    #[serde(rename = "v")]
    version: u32,
    page: Page,
}

// ============================================================================
// InfoItemsPage (result page container)
// ============================================================================

/// One page of extracted items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoItemsPage<T> {
    /// Items in platform order
    pub items: Vec<T>,

    /// Cursor for the next page; `None` when the platform reports the end
    #[serde(default)]
    pub next_page: Option<Page>,

    /// Failures while extracting individual items of this page
    #[serde(default)]
    pub errors: Vec<ExtractionFailure>,
}

impl<T> InfoItemsPage<T> {
    /// Create a page without item errors
    pub fn new(items: Vec<T>, next_page: Option<Page>) -> Self {
        Self {
            items,
            next_page,
            errors: Vec::new(),
        }
    }

    /// Create a page with item errors
    pub fn with_errors(
        items: Vec<T>,
        next_page: Option<Page>,
        errors: Vec<ExtractionFailure>,
    ) -> Self {
        Self {
            items,
            next_page,
            errors,
        }
    }

    /// An empty final page
    pub fn empty() -> Self {
        Self::new(Vec::new(), None)
    }

    /// Whether another page can be requested
    pub fn has_next_page(&self) -> bool {
        self.next_page.is_some()
    }
}
