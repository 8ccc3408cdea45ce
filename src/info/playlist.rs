//! Playlist aggregation
//!
//! Drives a [`PlaylistExtractor`] through its fields and item pages and
//! assembles a [`PlaylistInfo`] that tolerates partial failure.

use super::handle::InfoHandle;
use super::ledger::{FailureLedger, FieldClass};
use crate::error::{ExtractionFailure, Result};
use crate::extractor::{PlaylistExtractor, StreamInfoItem};
use crate::pagination::{collect_all, InfoItemsPage, Page};
use crate::service::ServiceRegistry;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

// ============================================================================
// Playlist Type
// ============================================================================

/// Normal playlist or one of the platform-generated mixes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaylistType {
    /// A playlist curated by someone
    #[default]
    Normal,
    /// Streams related to one stream
    MixStream,
    /// Music streams related to one stream
    MixMusic,
    /// Streams from or related to one channel
    MixChannel,
    /// Streams of one (musical) genre
    MixGenre,
}

impl PlaylistType {
    /// Mixes are generated on the fly and have no natural end
    pub fn is_infinite(self) -> bool {
        !matches!(self, Self::Normal)
    }
}

// ============================================================================
// Items Mode
// ============================================================================

/// How many items `get_info_with` loads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemsMode {
    /// First page plus a cursor for the rest
    #[default]
    FirstPage,
    /// Every page, except for infinite playlists which stop after the first
    FullList,
}

// ============================================================================
// Playlist Info
// ============================================================================

/// Normalized playlist metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistInfo {
    #[serde(flatten)]
    pub handle: InfoHandle,
    pub thumbnail_url: String,
    pub banner_url: String,
    pub uploader_url: String,
    pub uploader_name: String,
    pub uploader_avatar_url: String,
    pub sub_channel_url: String,
    pub sub_channel_name: String,
    pub sub_channel_avatar_url: String,
    pub stream_count: i64,
    pub playlist_type: PlaylistType,
    /// Items in platform order
    pub related_items: Vec<StreamInfoItem>,
    /// Cursor for more items; `None` when the list is complete
    pub next_page: Option<Page>,
    /// Significant failures; a non-empty list means a degraded result
    pub errors: Vec<ExtractionFailure>,
}

impl PlaylistInfo {
    /// Create an info with only identity filled in
    pub fn new(handle: InfoHandle) -> Self {
        Self {
            handle,
            thumbnail_url: String::new(),
            banner_url: String::new(),
            uploader_url: String::new(),
            uploader_name: String::new(),
            uploader_avatar_url: String::new(),
            sub_channel_url: String::new(),
            sub_channel_name: String::new(),
            sub_channel_avatar_url: String::new(),
            stream_count: 0,
            playlist_type: PlaylistType::Normal,
            related_items: Vec::new(),
            next_page: None,
            errors: Vec::new(),
        }
    }

    /// Whether any significant failure was recorded
    pub fn is_degraded(&self) -> bool {
        !self.errors.is_empty()
    }

    fn apply_page(&mut self, page: InfoItemsPage<StreamInfoItem>) {
        self.related_items = page.items;
        self.next_page = page.next_page;
        self.errors.extend(page.errors);
    }
}

// ============================================================================
// Aggregation
// ============================================================================

/// Read every playlist field from a fetched extractor
///
/// Identity fields are critical. Everything else is best effort; see
/// [`FailureLedger`] for the uploader-group policy. No items are loaded.
pub fn collect_fields<E: PlaylistExtractor + ?Sized>(extractor: &E) -> Result<PlaylistInfo> {
    let mut ledger = FailureLedger::new();

    let name = ledger.record("name", FieldClass::Critical, extractor.name())?;
    let id = ledger.record("id", FieldClass::Critical, extractor.id())?;
    let url = ledger.record("url", FieldClass::Critical, extractor.url())?;
    let original_url = ledger
        .attempt("original_url", FieldClass::Optional, extractor.original_url())?
        .unwrap_or_else(|| extractor.link().original_url.clone());

    let mut info = PlaylistInfo::new(InfoHandle {
        service_id: extractor.service_id(),
        id,
        url,
        original_url,
        name,
    });

    info.stream_count =
        ledger.record("stream_count", FieldClass::Optional, extractor.stream_count())?;
    info.thumbnail_url =
        ledger.record("thumbnail_url", FieldClass::Optional, extractor.thumbnail_url())?;
    info.uploader_url =
        ledger.record("uploader_url", FieldClass::UploaderGroup, extractor.uploader_url())?;
    info.uploader_name =
        ledger.record("uploader_name", FieldClass::UploaderGroup, extractor.uploader_name())?;
    info.uploader_avatar_url = ledger.record(
        "uploader_avatar_url",
        FieldClass::UploaderGroup,
        extractor.uploader_avatar_url(),
    )?;
    info.sub_channel_url = ledger.record(
        "sub_channel_url",
        FieldClass::UploaderGroup,
        extractor.sub_channel_url(),
    )?;
    info.sub_channel_name = ledger.record(
        "sub_channel_name",
        FieldClass::UploaderGroup,
        extractor.sub_channel_name(),
    )?;
    info.sub_channel_avatar_url = ledger.record(
        "sub_channel_avatar_url",
        FieldClass::UploaderGroup,
        extractor.sub_channel_avatar_url(),
    )?;
    info.banner_url = ledger.record("banner_url", FieldClass::Optional, extractor.banner_url())?;
    info.playlist_type =
        ledger.record("playlist_type", FieldClass::Optional, extractor.playlist_type())?;

    info.errors = ledger.finish();
    Ok(info)
}

/// Aggregate a fetched extractor and load its items
pub async fn from_extractor<E: PlaylistExtractor + ?Sized>(
    extractor: &E,
    mode: ItemsMode,
    cancel: &CancellationToken,
) -> Result<PlaylistInfo> {
    let mut info = collect_fields(extractor)?;

    let Some(first) = initial_page_or_record(&mut info, extractor, cancel).await? else {
        return Ok(info);
    };

    if mode == ItemsMode::FirstPage || !first.has_next_page() {
        info.apply_page(first);
        return Ok(info);
    }

    if info.playlist_type.is_infinite() {
        debug!(
            "{} is an infinite {:?} playlist, keeping only the first page",
            info.handle.id, info.playlist_type
        );
        info.apply_page(first);
        return Ok(info);
    }

    let full = collect_all(extractor, first, cancel).await?;
    info.apply_page(full);
    Ok(info)
}

/// Fetch the first page, recording a non-terminal failure into the info
async fn initial_page_or_record<E: PlaylistExtractor + ?Sized>(
    info: &mut PlaylistInfo,
    extractor: &E,
    cancel: &CancellationToken,
) -> Result<Option<InfoItemsPage<StreamInfoItem>>> {
    match extractor.initial_page(cancel).await {
        Ok(page) => Ok(Some(page)),
        Err(e) if e.is_terminal() => Err(e),
        Err(e) => {
            warn!("Could not get items of {}: {e}", info.handle.url);
            info.errors
                .push(ExtractionFailure::for_field("related_items", &e));
            Ok(None)
        }
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Extract a playlist with its first page of items
pub async fn get_info(
    registry: &ServiceRegistry,
    url: &str,
    cancel: &CancellationToken,
) -> Result<PlaylistInfo> {
    get_info_with(registry, url, ItemsMode::FirstPage, cancel).await
}

/// Extract a playlist, loading items according to `mode`
pub async fn get_info_with(
    registry: &ServiceRegistry,
    url: &str,
    mode: ItemsMode,
    cancel: &CancellationToken,
) -> Result<PlaylistInfo> {
    let service = registry.service_by_url(url)?;
    let mut extractor = service.playlist_extractor(url)?;
    extractor.fetch_page(cancel).await?;

    let info = from_extractor(extractor.as_ref(), mode, cancel).await?;
    info!(
        "Extracted playlist {} ({} items, {} errors)",
        info.handle.id,
        info.related_items.len(),
        info.errors.len()
    );
    Ok(info)
}

/// Fetch the page a cursor points to
pub async fn get_more_items(
    registry: &ServiceRegistry,
    url: &str,
    page: &Page,
    cancel: &CancellationToken,
) -> Result<InfoItemsPage<StreamInfoItem>> {
    let service = registry.service_by_url(url)?;
    let extractor = service.playlist_extractor(url)?;
    extractor.page(page, cancel).await
}
