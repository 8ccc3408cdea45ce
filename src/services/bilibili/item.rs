//! Bilibili feed entries

use crate::error::{Error, Result};
use crate::extractor::{StreamInfoItemExtractor, StreamType};
use crate::parse::{integer_at, string_at};
use crate::types::{force_https, OptionStringExt};
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Reads one entry of a series archive list
#[derive(Debug, Clone)]
pub struct BilibiliFeedItemExtractor<'a> {
    item: &'a Value,
}

impl<'a> BilibiliFeedItemExtractor<'a> {
    pub fn new(item: &'a Value) -> Self {
        Self { item }
    }

    fn published(&self) -> Result<DateTime<Utc>> {
        let ts = integer_at(self.item, "pubdate")?;
        DateTime::from_timestamp(ts, 0)
            .ok_or_else(|| Error::parsing(format!("pubdate out of range: {ts}")))
    }
}

impl StreamInfoItemExtractor for BilibiliFeedItemExtractor<'_> {
    fn name(&self) -> Result<String> {
        string_at(self.item, "title").map(str::to_string)
    }

    fn url(&self) -> Result<String> {
        if let Ok(uri) = string_at(self.item, "uri") {
            return Ok(uri.to_string());
        }
        let bvid = string_at(self.item, "bvid")?;
        Ok(format!("https://www.bilibili.com/video/{bvid}"))
    }

    fn thumbnail_url(&self) -> Result<String> {
        string_at(self.item, "pic").map(force_https)
    }

    fn stream_type(&self) -> Result<StreamType> {
        Ok(StreamType::VideoStream)
    }

    fn duration(&self) -> Result<i64> {
        integer_at(self.item, "duration")
    }

    fn view_count(&self) -> Result<i64> {
        integer_at(self.item, "stat.view")
    }

    fn uploader_name(&self) -> Result<String> {
        string_at(self.item, "owner.name").map(str::to_string)
    }

    fn uploader_url(&self) -> Result<Option<String>> {
        Ok(None)
    }

    fn uploader_avatar_url(&self) -> Result<Option<String>> {
        string_at(self.item, "owner.face").map(|face| force_https(face).none_if_empty())
    }

    fn textual_upload_date(&self) -> Result<Option<String>> {
        Ok(Some(self.published()?.format("%Y-%m-%d %H:%M:%S").to_string()))
    }

    fn upload_date(&self) -> Result<Option<DateTime<Utc>>> {
        self.published().map(Some)
    }
}
