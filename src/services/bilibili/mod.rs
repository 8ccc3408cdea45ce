//! Bilibili adapter
//!
//! Supports user series (`space.bilibili.com/<mid>/channel/seriesdetail?sid=<sid>`
//! and the newer `/<mid>/lists/<sid>?type=series` form) as playlists.

mod item;
mod link;
mod playlist;

pub use item::BilibiliFeedItemExtractor;
pub use link::{split_series_id, SeriesLinkHandlerFactory};
pub use playlist::{BilibiliPlaylistExtractor, SeriesCursor};

use crate::config::BilibiliConfig;
use crate::error::Result;
use crate::extractor::{LinkHandler, LinkHandlerFactory, PlaylistExtractor};
use crate::http::Transport;
use crate::service::StreamingService;
use crate::types::ServiceId;
use std::sync::Arc;

/// Service id of Bilibili
pub const BILIBILI_SERVICE_ID: ServiceId = 5;

/// Owner tag of series cursors
pub const SERIES_CURSOR_OWNER: &str = "bilibili:series";

/// The Bilibili service
pub struct BilibiliService {
    config: BilibiliConfig,
    transport: Arc<dyn Transport>,
    series_links: SeriesLinkHandlerFactory,
}

impl BilibiliService {
    pub fn new(config: BilibiliConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config,
            transport,
            series_links: SeriesLinkHandlerFactory,
        }
    }
}

impl StreamingService for BilibiliService {
    fn service_id(&self) -> ServiceId {
        BILIBILI_SERVICE_ID
    }

    fn name(&self) -> &'static str {
        "bilibili"
    }

    fn playlist_links(&self) -> &dyn LinkHandlerFactory {
        &self.series_links
    }

    fn playlist_extractor_for(&self, link: LinkHandler) -> Result<Box<dyn PlaylistExtractor>> {
        Ok(Box::new(BilibiliPlaylistExtractor::new(
            link,
            self.config.clone(),
            Arc::clone(&self.transport),
        )?))
    }
}

#[cfg(test)]
mod tests;
