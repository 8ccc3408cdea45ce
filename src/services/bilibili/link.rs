//! Bilibili series link handling

use crate::error::{Error, Result};
use crate::extractor::LinkHandlerFactory;
use once_cell::sync::Lazy;
use regex::Regex;

static SERIES_DETAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://space\.bilibili\.com/(\d+)/channel/seriesdetail\?(?:[^#]*&)?sid=(\d+)")
        .expect("valid regex")
});

static SERIES_LIST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://space\.bilibili\.com/(\d+)/lists/(\d+)\?(?:[^#]*&)?type=series")
        .expect("valid regex")
});

/// Series ids are `<mid>:<series_id>`
pub fn split_series_id(id: &str) -> Result<(&str, &str)> {
    id.split_once(':')
        .filter(|(mid, sid)| is_numeric(mid) && is_numeric(sid))
        .ok_or_else(|| Error::parsing(format!("Malformed series id: {id}")))
}

fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Recognizes user series URLs
#[derive(Debug, Clone, Copy, Default)]
pub struct SeriesLinkHandlerFactory;

impl LinkHandlerFactory for SeriesLinkHandlerFactory {
    fn accepts(&self, url: &str) -> bool {
        SERIES_DETAIL.is_match(url) || SERIES_LIST.is_match(url)
    }

    fn id_from_url(&self, url: &str) -> Result<String> {
        let captures = SERIES_DETAIL
            .captures(url)
            .or_else(|| SERIES_LIST.captures(url))
            .ok_or_else(|| Error::parsing(format!("Not a bilibili series url: {url}")))?;
        Ok(format!("{}:{}", &captures[1], &captures[2]))
    }

    fn url_from_id(&self, id: &str) -> Result<String> {
        let (mid, sid) = split_series_id(id)?;
        Ok(format!(
            "https://space.bilibili.com/{mid}/channel/seriesdetail?sid={sid}"
        ))
    }
}
