//! Service routing module
//!
//! Maps URLs and service identifiers to platform adapters.
//!
//! # Overview
//!
//! A [`StreamingService`] bundles a platform's link handlers and extractor
//! factories. The [`ServiceRegistry`] is built once at startup and passed by
//! reference to every extraction call; services are tried in registration
//! order and the first one that accepts a URL wins.

mod registry;

pub use registry::ServiceRegistry;

use crate::error::Result;
use crate::extractor::{LinkHandler, LinkHandlerFactory, PlaylistExtractor};
use crate::types::ServiceId;

/// A media platform the crate can extract from
pub trait StreamingService: Send + Sync {
    /// Stable numeric id
    fn service_id(&self) -> ServiceId;

    /// Short lowercase name (e.g. "bilibili")
    fn name(&self) -> &'static str;

    /// Recognizes playlist URLs
    fn playlist_links(&self) -> &dyn LinkHandlerFactory;

    /// Create an unfetched playlist extractor for a link
    fn playlist_extractor_for(&self, link: LinkHandler) -> Result<Box<dyn PlaylistExtractor>>;

    /// Whether any of this service's link handlers accept the URL
    fn accepts_url(&self, url: &str) -> bool {
        self.playlist_links().accepts(url)
    }

    /// Create an unfetched playlist extractor for a URL
    fn playlist_extractor(&self, url: &str) -> Result<Box<dyn PlaylistExtractor>> {
        let link = self.playlist_links().from_url(url)?;
        self.playlist_extractor_for(link)
    }
}

#[cfg(test)]
mod tests;
