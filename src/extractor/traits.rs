//! Capability interface implemented by platform adapters

use super::items::StreamInfoItem;
use super::link::LinkHandler;
use crate::error::Result;
use crate::info::PlaylistType;
use crate::pagination::{InfoItemsPage, Page};
use crate::types::ServiceId;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Base contract of every extractor
///
/// `fetch_page` must be called exactly once before any accessor. Accessors
/// are independent: one failing says nothing about the others.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Id of the service this extractor belongs to
    fn service_id(&self) -> ServiceId;

    /// The link this extractor was created for
    fn link(&self) -> &LinkHandler;

    /// Fetch and parse the primary content
    ///
    /// Fails the whole extraction if the primary content cannot be obtained.
    async fn fetch_page(&mut self, cancel: &CancellationToken) -> Result<()>;

    /// Whether `fetch_page` has completed successfully
    fn is_fetched(&self) -> bool;

    /// Display name of the target
    fn name(&self) -> Result<String>;

    /// Platform id of the target
    fn id(&self) -> Result<String> {
        Ok(self.link().id.clone())
    }

    /// Canonical URL of the target
    fn url(&self) -> Result<String> {
        Ok(self.link().url.clone())
    }

    /// URL as originally supplied
    fn original_url(&self) -> Result<String> {
        Ok(self.link().original_url.clone())
    }
}

/// An extractor whose target is a paginated list of items
#[async_trait]
pub trait ListExtractor<T>: Extractor {
    /// First page of items; requires `fetch_page`
    async fn initial_page(&self, cancel: &CancellationToken) -> Result<InfoItemsPage<T>>;

    /// Page addressed by a cursor previously produced by this adapter
    ///
    /// Must work without `fetch_page`, so cursors can be replayed on a fresh
    /// extractor. Fails with `InvalidCursor` for foreign cursors.
    async fn page(&self, page: &Page, cancel: &CancellationToken) -> Result<InfoItemsPage<T>>;
}

/// Playlist accessors
pub trait PlaylistExtractor: ListExtractor<StreamInfoItem> {
    /// Number of streams, as reported by the platform
    fn stream_count(&self) -> Result<i64>;

    /// Playlist thumbnail
    fn thumbnail_url(&self) -> Result<String>;

    /// Playlist banner
    fn banner_url(&self) -> Result<String>;

    /// Uploader channel URL
    fn uploader_url(&self) -> Result<String>;

    /// Uploader display name
    fn uploader_name(&self) -> Result<String>;

    /// Uploader avatar
    fn uploader_avatar_url(&self) -> Result<String>;

    /// Sub-channel URL
    fn sub_channel_url(&self) -> Result<String>;

    /// Sub-channel display name
    fn sub_channel_name(&self) -> Result<String>;

    /// Sub-channel avatar
    fn sub_channel_avatar_url(&self) -> Result<String>;

    /// Whether this is a normal playlist or a platform-generated mix
    fn playlist_type(&self) -> Result<PlaylistType> {
        Ok(PlaylistType::Normal)
    }
}
