//! Link handlers
//!
//! URL recognition is a narrow collaborator: each service provides a
//! factory that says whether it accepts a URL and how to normalize it.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A normalized link to an extraction target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkHandler {
    /// URL exactly as supplied by the caller
    pub original_url: String,
    /// Canonical URL of the target
    pub url: String,
    /// Platform id of the target
    pub id: String,
}

impl LinkHandler {
    /// Create a link handler
    pub fn new(
        original_url: impl Into<String>,
        url: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        Self {
            original_url: original_url.into(),
            url: url.into(),
            id: id.into(),
        }
    }
}

/// Recognizes and normalizes URLs of one kind for one service
pub trait LinkHandlerFactory: Send + Sync {
    /// Whether this factory understands the URL
    fn accepts(&self, url: &str) -> bool;

    /// Extract the platform id from a URL
    fn id_from_url(&self, url: &str) -> Result<String>;

    /// Build the canonical URL for an id
    fn url_from_id(&self, id: &str) -> Result<String>;

    /// Build a link handler from a caller-supplied URL
    fn from_url(&self, url: &str) -> Result<LinkHandler> {
        if !self.accepts(url) {
            return Err(Error::parsing(format!("Malformed url: {url}")));
        }
        let id = self.id_from_url(url)?;
        let canonical = self.url_from_id(&id)?;
        Ok(LinkHandler::new(url, canonical, id))
    }
}
