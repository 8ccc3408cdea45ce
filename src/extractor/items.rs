//! Stream items and their collection
//!
//! List pages are made of item extractors; the collector resolves each one
//! into a [`StreamInfoItem`], dropping items whose identity cannot be read
//! and recording every failure against the page.

use crate::error::{ExtractionFailure, Result};
use crate::pagination::{InfoItemsPage, Page};
use crate::types::ServiceId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Kind of stream an item points to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamType {
    /// Type could not be determined
    #[default]
    None,
    /// Regular on-demand video
    VideoStream,
    /// Audio-only stream
    AudioStream,
    /// Live video
    LiveStream,
    /// Live audio
    AudioLiveStream,
    /// Finished live stream still being processed
    PostLiveStream,
    /// Finished live audio stream still being processed
    PostLiveAudioStream,
}

impl StreamType {
    /// Whether the stream is live right now
    pub fn is_live(self) -> bool {
        matches!(self, Self::LiveStream | Self::AudioLiveStream)
    }
}

/// A normalized entry of a stream list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamInfoItem {
    pub service_id: ServiceId,
    pub url: String,
    pub name: String,
    pub thumbnail_url: String,
    pub stream_type: StreamType,
    /// Duration in seconds, -1 when unknown
    pub duration: i64,
    /// View count, -1 when unknown
    pub view_count: i64,
    pub uploader_name: String,
    pub uploader_url: Option<String>,
    pub uploader_avatar_url: Option<String>,
    pub uploader_verified: bool,
    pub textual_upload_date: Option<String>,
    pub upload_date: Option<DateTime<Utc>>,
}

impl StreamInfoItem {
    /// Create an item with the required fields and unknown everything else
    pub fn new(service_id: ServiceId, url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            service_id,
            url: url.into(),
            name: name.into(),
            thumbnail_url: String::new(),
            stream_type: StreamType::None,
            duration: -1,
            view_count: -1,
            uploader_name: String::new(),
            uploader_url: None,
            uploader_avatar_url: None,
            uploader_verified: false,
            textual_upload_date: None,
            upload_date: None,
        }
    }
}

/// Field accessors for one raw list entry
pub trait StreamInfoItemExtractor {
    fn name(&self) -> Result<String>;
    fn url(&self) -> Result<String>;
    fn thumbnail_url(&self) -> Result<String>;
    fn stream_type(&self) -> Result<StreamType>;
    fn duration(&self) -> Result<i64>;
    fn view_count(&self) -> Result<i64>;
    fn uploader_name(&self) -> Result<String>;
    fn uploader_url(&self) -> Result<Option<String>>;
    fn uploader_avatar_url(&self) -> Result<Option<String>>;

    /// Sponsored entries are not part of the list
    fn is_ad(&self) -> Result<bool> {
        Ok(false)
    }

    fn uploader_verified(&self) -> Result<bool> {
        Ok(false)
    }

    fn textual_upload_date(&self) -> Result<Option<String>> {
        Ok(None)
    }

    fn upload_date(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(None)
    }
}

/// Resolves item extractors into items, collecting per-item failures
#[derive(Debug)]
pub struct StreamItemsCollector {
    service_id: ServiceId,
    items: Vec<StreamInfoItem>,
    errors: Vec<ExtractionFailure>,
}

impl StreamItemsCollector {
    /// Create a collector for a service
    pub fn new(service_id: ServiceId) -> Self {
        Self {
            service_id,
            items: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Resolve one entry
    ///
    /// Name and URL are required; without them the entry is dropped. Other
    /// fields fall back to their unknown value and the failure is recorded.
    pub fn commit(&mut self, extractor: &dyn StreamInfoItemExtractor) {
        match extractor.is_ad() {
            Ok(true) => return,
            Ok(false) => {}
            Err(e) => self.errors.push(ExtractionFailure::for_field("item.is_ad", &e)),
        }

        let required = extractor.name().and_then(|name| Ok((name, extractor.url()?)));
        let (name, url) = match required {
            Ok(pair) => pair,
            Err(e) => {
                debug!("Dropping list entry: {e}");
                self.errors.push(ExtractionFailure::for_field("item", &e));
                return;
            }
        };

        let mut item = StreamInfoItem::new(self.service_id, url, name);

        if let Some(v) = self.optional("item.thumbnail_url", extractor.thumbnail_url()) {
            item.thumbnail_url = v;
        }
        if let Some(v) = self.optional("item.stream_type", extractor.stream_type()) {
            item.stream_type = v;
        }
        if let Some(v) = self.optional("item.duration", extractor.duration()) {
            item.duration = v;
        }
        if let Some(v) = self.optional("item.view_count", extractor.view_count()) {
            item.view_count = v;
        }
        if let Some(v) = self.optional("item.uploader_name", extractor.uploader_name()) {
            item.uploader_name = v;
        }
        if let Some(v) = self.optional("item.uploader_url", extractor.uploader_url()) {
            item.uploader_url = v;
        }
        if let Some(v) = self.optional("item.uploader_avatar_url", extractor.uploader_avatar_url()) {
            item.uploader_avatar_url = v;
        }
        if let Some(v) = self.optional("item.uploader_verified", extractor.uploader_verified()) {
            item.uploader_verified = v;
        }
        if let Some(v) = self.optional("item.textual_upload_date", extractor.textual_upload_date()) {
            item.textual_upload_date = v;
        }
        if let Some(v) = self.optional("item.upload_date", extractor.upload_date()) {
            item.upload_date = v;
        }

        self.items.push(item);
    }

    fn optional<T>(&mut self, field: &str, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.errors.push(ExtractionFailure::for_field(field, &e));
                None
            }
        }
    }

    /// Items collected so far
    pub fn items(&self) -> &[StreamInfoItem] {
        &self.items
    }

    /// Failures collected so far
    pub fn errors(&self) -> &[ExtractionFailure] {
        &self.errors
    }

    /// Finish into a page container
    pub fn into_page(self, next_page: Option<Page>) -> InfoItemsPage<StreamInfoItem> {
        InfoItemsPage::with_errors(self.items, next_page, self.errors)
    }
}
