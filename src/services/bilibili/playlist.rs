//! Bilibili series playlists
//!
//! A series is fetched with two calls: the series metadata (required) and
//! the owner's user card (only feeds the uploader fields). A card answered
//! with an error status or an API error code degrades those fields; a card
//! that cannot be reached at all fails the fetch.
//! Items come from the paginated archives endpoint.

use super::item::BilibiliFeedItemExtractor;
use super::link::split_series_id;
use super::{BILIBILI_SERVICE_ID, SERIES_CURSOR_OWNER};
use crate::config::BilibiliConfig;
use crate::error::{Error, Result};
use crate::extractor::{
    Extractor, LinkHandler, ListExtractor, PlaylistExtractor, StreamInfoItem, StreamItemsCollector,
};
use crate::http::{fetch, Request, Transport};
use crate::pagination::{InfoItemsPage, Page};
use crate::parse::Document;
use crate::types::{force_https, ServiceId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Adapter state carried inside series cursors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesCursor {
    pub mid: String,
    pub series_id: String,
    /// 1-based page number the cursor points to
    pub pn: u32,
}

/// Playlist extractor for user series
pub struct BilibiliPlaylistExtractor {
    link: LinkHandler,
    mid: String,
    series_id: String,
    config: BilibiliConfig,
    transport: Arc<dyn Transport>,
    meta: Option<Document>,
    card: Option<std::result::Result<Document, String>>,
}

impl BilibiliPlaylistExtractor {
    pub fn new(
        link: LinkHandler,
        config: BilibiliConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        let (mid, series_id) = split_series_id(&link.id)?;
        let (mid, series_id) = (mid.to_string(), series_id.to_string());
        Ok(Self {
            link,
            mid,
            series_id,
            config,
            transport,
            meta: None,
            card: None,
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_base_url.trim_end_matches('/'))
    }

    fn archives_page(&self, pn: u32) -> Result<Page> {
        let url = self.api_url(&format!(
            "/x/series/archives?mid={}&series_id={}&only_normal=true&sort=desc&pn={pn}&ps={}",
            self.mid, self.series_id, self.config.page_size
        ));
        Page::new(url).with_data(
            SERIES_CURSOR_OWNER,
            &SeriesCursor {
                mid: self.mid.clone(),
                series_id: self.series_id.clone(),
                pn,
            },
        )
    }

    fn meta(&self) -> Result<&Document> {
        self.meta.as_ref().ok_or(Error::NotFetched)
    }

    fn card(&self, field: &str) -> Result<&Document> {
        match &self.card {
            Some(Ok(card)) => Ok(card),
            Some(Err(reason)) => Err(Error::field(
                field,
                format!("uploader card unavailable: {reason}"),
            )),
            None => Err(Error::NotFetched),
        }
    }

    async fn fetch_archives(
        &self,
        page: &Page,
        cursor: &SeriesCursor,
        cancel: &CancellationToken,
    ) -> Result<InfoItemsPage<StreamInfoItem>> {
        let response = fetch(self.transport.as_ref(), &page.to_request(), cancel).await?;
        let doc = api_document(Document::from_bytes(&response.body)?)?;

        let total = doc.i64("data.page.total")?;
        let size = match doc.i64("data.page.size") {
            Ok(size) if size > 0 => size,
            _ => i64::from(self.config.page_size),
        };
        let skipped = i64::from(cursor.pn - 1).saturating_mul(size);
        let fetched = i64::from(cursor.pn).saturating_mul(size);

        // An empty page is only an end of list when nothing is left to fetch
        let archives = doc.select("$.data.archives[*]")?;
        if archives.is_empty() && skipped < total {
            return Err(Error::parsing(format!(
                "Missing field 'data.archives' on page {} of {total} items",
                cursor.pn
            )));
        }

        let mut collector = StreamItemsCollector::new(BILIBILI_SERVICE_ID);
        for item in &archives {
            collector.commit(&BilibiliFeedItemExtractor::new(item));
        }

        let next_page = if !archives.is_empty() && fetched < total {
            let pn = cursor
                .pn
                .checked_add(1)
                .ok_or_else(|| Error::invalid_cursor("page number out of range"))?;
            Some(self.archives_page(pn)?)
        } else {
            None
        };

        debug!(
            "Series {}:{} page {}: {} items of {total}",
            self.mid,
            self.series_id,
            cursor.pn,
            collector.items().len()
        );
        Ok(collector.into_page(next_page))
    }
}

/// Unwrap the `{code, message, data}` envelope of API responses
fn api_document(doc: Document) -> Result<Document> {
    let code = doc.i64("code")?;
    if code != 0 {
        let message = doc.str("message").unwrap_or("unknown error");
        return Err(Error::parsing(format!("API error {code}: {message}")));
    }
    Ok(doc)
}

#[async_trait]
impl Extractor for BilibiliPlaylistExtractor {
    fn service_id(&self) -> ServiceId {
        BILIBILI_SERVICE_ID
    }

    fn link(&self) -> &LinkHandler {
        &self.link
    }

    async fn fetch_page(&mut self, cancel: &CancellationToken) -> Result<()> {
        if self.meta.is_some() {
            return Err(Error::AlreadyFetched);
        }

        let url = self.api_url(&format!("/x/series/series?series_id={}", self.series_id));
        let response = fetch(self.transport.as_ref(), &Request::get(url), cancel).await?;
        let meta = Document::from_bytes(&response.body)
            .and_then(api_document)
            .map_err(|e| Error::critical(format!("series {} unavailable: {e}", self.series_id)))?;

        let card_url = self.api_url(&format!("/x/web-interface/card?mid={}", self.mid));
        let card = match fetch(self.transport.as_ref(), &Request::get(card_url), cancel).await {
            Ok(response) => Document::from_bytes(&response.body)
                .and_then(api_document)
                .map_err(|e| e.to_string()),
            Err(e @ Error::HttpStatus { .. }) => Err(e.to_string()),
            Err(e) => return Err(e),
        };
        if let Err(reason) = &card {
            warn!("Uploader card for {} unavailable: {reason}", self.mid);
        }

        self.meta = Some(meta);
        self.card = Some(card);
        Ok(())
    }

    fn is_fetched(&self) -> bool {
        self.meta.is_some()
    }

    fn name(&self) -> Result<String> {
        self.meta()?.str("data.meta.name").map(str::to_string)
    }
}

#[async_trait]
impl ListExtractor<StreamInfoItem> for BilibiliPlaylistExtractor {
    async fn initial_page(
        &self,
        cancel: &CancellationToken,
    ) -> Result<InfoItemsPage<StreamInfoItem>> {
        self.meta()?;
        let page = self.archives_page(1)?;
        self.page(&page, cancel).await
    }

    async fn page(
        &self,
        page: &Page,
        cancel: &CancellationToken,
    ) -> Result<InfoItemsPage<StreamInfoItem>> {
        let cursor: SeriesCursor = page.data(SERIES_CURSOR_OWNER)?;
        if cursor.mid != self.mid || cursor.series_id != self.series_id {
            return Err(Error::invalid_cursor(format!(
                "cursor is for series {}:{}, not {}:{}",
                cursor.mid, cursor.series_id, self.mid, self.series_id
            )));
        }
        if cursor.pn == 0 {
            return Err(Error::invalid_cursor("page numbers start at 1"));
        }
        self.fetch_archives(page, &cursor, cancel).await
    }
}

impl PlaylistExtractor for BilibiliPlaylistExtractor {
    fn stream_count(&self) -> Result<i64> {
        self.meta()?.i64("data.meta.total")
    }

    fn thumbnail_url(&self) -> Result<String> {
        self.meta()?.str("data.meta.cover").map(force_https)
    }

    fn banner_url(&self) -> Result<String> {
        Ok(String::new())
    }

    fn uploader_url(&self) -> Result<String> {
        let mid = self.meta()?.i64("data.meta.mid")?;
        Ok(format!(
            "{}/{mid}",
            self.config.web_base_url.trim_end_matches('/')
        ))
    }

    fn uploader_name(&self) -> Result<String> {
        self.card("uploader_name")?.str("data.card.name").map(str::to_string)
    }

    fn uploader_avatar_url(&self) -> Result<String> {
        self.card("uploader_avatar_url")?.str("data.card.face").map(force_https)
    }

    fn sub_channel_url(&self) -> Result<String> {
        Ok(String::new())
    }

    fn sub_channel_name(&self) -> Result<String> {
        Ok(String::new())
    }

    fn sub_channel_avatar_url(&self) -> Result<String> {
        Ok(String::new())
    }
}
