//! Tests for the Bilibili adapter

use super::*;
use crate::error::{Error, ErrorKind};
use crate::extractor::{Extractor, ListExtractor, StreamInfoItemExtractor};
use crate::http::{HttpClient, HttpClientConfig};
use crate::pagination::{collect_all, Page};
use serde_json::json;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SERIES_URL: &str = "https://space.bilibili.com/7/channel/seriesdetail?sid=42";

fn test_service(server: &MockServer) -> BilibiliService {
    service_with_client(server, HttpClientConfig::builder().build())
}

fn service_with_client(server: &MockServer, client: HttpClientConfig) -> BilibiliService {
    let config = BilibiliConfig {
        api_base_url: server.uri(),
        web_base_url: "https://space.bilibili.com".to_string(),
        page_size: 2,
    };
    let client = HttpClient::with_config(client).unwrap();
    BilibiliService::new(config, Arc::new(client))
}

/// Cursor for page `pn` of the test series
fn series_page(server: &MockServer, pn: u32) -> Page {
    Page::new(format!(
        "{}/x/series/archives?mid=7&series_id=42&pn={pn}&ps=2",
        server.uri()
    ))
    .with_data(
        SERIES_CURSOR_OWNER,
        &SeriesCursor {
            mid: "7".to_string(),
            series_id: "42".to_string(),
            pn,
        },
    )
    .unwrap()
}

async fn mount_archives_body(server: &MockServer, pn: u32, data: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/x/series/archives"))
        .and(query_param("pn", pn.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "data": data
        })))
        .mount(server)
        .await;
}

fn archive(n: u32) -> serde_json::Value {
    json!({
        "title": format!("Video {n}"),
        "bvid": format!("BV{n}"),
        "pic": format!("http://i0.hdslb.com/{n}.jpg"),
        "duration": 60 + n,
        "pubdate": 1_700_000_000,
        "stat": {"view": 1000 * n},
        "owner": {"name": "Uploader", "face": "http://i0.hdslb.com/face.jpg"}
    })
}

async fn mount_series(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/x/series/series"))
        .and(query_param("series_id", "42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "message": "0",
            "data": {"meta": {
                "name": "My Series",
                "mid": 7,
                "total": 3,
                "cover": "http://i0.hdslb.com/cover.jpg"
            }}
        })))
        .mount(server)
        .await;
}

async fn mount_card(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/x/web-interface/card"))
        .and(query_param("mid", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "data": {"card": {"name": "Uploader", "face": "http://i0.hdslb.com/face.jpg"}}
        })))
        .mount(server)
        .await;
}

async fn mount_archives(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/x/series/archives"))
        .and(query_param("pn", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "data": {
                "archives": [archive(1), archive(2)],
                "page": {"num": 1, "size": 2, "total": 3}
            }
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/x/series/archives"))
        .and(query_param("pn", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "data": {
                "archives": [archive(3)],
                "page": {"num": 2, "size": 2, "total": 3}
            }
        })))
        .mount(server)
        .await;
}

// ============================================================================
// Link Tests
// ============================================================================

#[test]
fn test_series_links() {
    let factory = SeriesLinkHandlerFactory;

    assert!(factory.accepts(SERIES_URL));
    assert!(factory.accepts("https://space.bilibili.com/7/lists/42?type=series"));
    assert!(factory.accepts("http://space.bilibili.com/7/channel/seriesdetail?ctype=0&sid=42"));
    assert!(!factory.accepts("https://space.bilibili.com/7/lists/42?type=season"));
    assert!(!factory.accepts("https://www.youtube.com/playlist?list=PL1"));

    let link = factory
        .from_url("https://space.bilibili.com/7/lists/42?type=series")
        .unwrap();
    assert_eq!(link.id, "7:42");
    assert_eq!(link.url, SERIES_URL);
    assert_eq!(
        link.original_url,
        "https://space.bilibili.com/7/lists/42?type=series"
    );
}

#[test]
fn test_split_series_id() {
    assert_eq!(split_series_id("7:42").unwrap(), ("7", "42"));
    assert!(split_series_id("7").is_err());
    assert!(split_series_id("a:42").is_err());
    assert!(split_series_id(":42").is_err());
}

#[test]
fn test_service_identity() {
    let client = HttpClient::new().unwrap();
    let service = BilibiliService::new(BilibiliConfig::default(), Arc::new(client));
    assert_eq!(service.service_id(), BILIBILI_SERVICE_ID);
    assert_eq!(service.name(), "bilibili");
    assert!(service.accepts_url(SERIES_URL));
    assert!(matches!(
        service.playlist_extractor("https://example.com/list"),
        Err(Error::Parsing { .. })
    ));
}

// ============================================================================
// Item Tests
// ============================================================================

#[test]
fn test_feed_item_fields() {
    let value = archive(1);
    let item = BilibiliFeedItemExtractor::new(&value);

    assert_eq!(item.name().unwrap(), "Video 1");
    assert_eq!(item.url().unwrap(), "https://www.bilibili.com/video/BV1");
    assert_eq!(item.thumbnail_url().unwrap(), "https://i0.hdslb.com/1.jpg");
    assert_eq!(item.duration().unwrap(), 61);
    assert_eq!(item.view_count().unwrap(), 1000);
    assert_eq!(item.uploader_name().unwrap(), "Uploader");
    assert_eq!(item.uploader_url().unwrap(), None);
    assert_eq!(
        item.textual_upload_date().unwrap().as_deref(),
        Some("2023-11-14 22:13:20")
    );
    assert_eq!(item.upload_date().unwrap().unwrap().timestamp(), 1_700_000_000);
}

#[test]
fn test_feed_item_prefers_uri() {
    let value = json!({"title": "x", "uri": "https://b23.tv/abc", "bvid": "BV9"});
    let item = BilibiliFeedItemExtractor::new(&value);
    assert_eq!(item.url().unwrap(), "https://b23.tv/abc");
    assert!(item.duration().is_err());
}

// ============================================================================
// Extractor Tests
// ============================================================================

#[tokio::test]
async fn test_fetch_and_fields() {
    let server = MockServer::start().await;
    mount_series(&server).await;
    mount_card(&server).await;

    let service = test_service(&server);
    let mut extractor = service.playlist_extractor(SERIES_URL).unwrap();
    assert!(!extractor.is_fetched());

    extractor.fetch_page(&CancellationToken::new()).await.unwrap();
    assert!(extractor.is_fetched());

    assert_eq!(extractor.service_id(), BILIBILI_SERVICE_ID);
    assert_eq!(extractor.id().unwrap(), "7:42");
    assert_eq!(extractor.name().unwrap(), "My Series");
    assert_eq!(extractor.stream_count().unwrap(), 3);
    assert_eq!(
        extractor.thumbnail_url().unwrap(),
        "https://i0.hdslb.com/cover.jpg"
    );
    assert_eq!(
        extractor.uploader_url().unwrap(),
        "https://space.bilibili.com/7"
    );
    assert_eq!(extractor.uploader_name().unwrap(), "Uploader");
    assert_eq!(
        extractor.uploader_avatar_url().unwrap(),
        "https://i0.hdslb.com/face.jpg"
    );
    assert_eq!(extractor.banner_url().unwrap(), "");
    assert_eq!(extractor.sub_channel_name().unwrap(), "");
}

#[tokio::test]
async fn test_lifecycle_guards() {
    let server = MockServer::start().await;
    mount_series(&server).await;
    mount_card(&server).await;

    let service = test_service(&server);
    let mut extractor = service.playlist_extractor(SERIES_URL).unwrap();

    assert!(matches!(extractor.name(), Err(Error::NotFetched)));
    assert!(matches!(
        extractor.initial_page(&CancellationToken::new()).await,
        Err(Error::NotFetched)
    ));

    let cancel = CancellationToken::new();
    extractor.fetch_page(&cancel).await.unwrap();
    assert!(matches!(
        extractor.fetch_page(&cancel).await,
        Err(Error::AlreadyFetched)
    ));
}

#[tokio::test]
async fn test_card_failure_only_affects_uploader_fields() {
    let server = MockServer::start().await;
    mount_series(&server).await;
    Mock::given(method("GET"))
        .and(path("/x/web-interface/card"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let service = test_service(&server);
    let mut extractor = service.playlist_extractor(SERIES_URL).unwrap();
    extractor.fetch_page(&CancellationToken::new()).await.unwrap();

    assert_eq!(extractor.name().unwrap(), "My Series");
    assert!(extractor.uploader_url().is_ok());
    let err = extractor.uploader_name().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parsing);
    assert!(matches!(&err, Error::FieldExtraction { field, .. } if field == "uploader_name"));
    assert!(err.to_string().contains("uploader card unavailable"));
}

#[tokio::test]
async fn test_card_api_error_only_affects_uploader_fields() {
    let server = MockServer::start().await;
    mount_series(&server).await;
    Mock::given(method("GET"))
        .and(path("/x/web-interface/card"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": -404,
            "message": "no such user"
        })))
        .mount(&server)
        .await;

    let service = test_service(&server);
    let mut extractor = service.playlist_extractor(SERIES_URL).unwrap();
    extractor.fetch_page(&CancellationToken::new()).await.unwrap();

    let err = extractor.uploader_avatar_url().unwrap_err();
    assert!(
        matches!(&err, Error::FieldExtraction { field, .. } if field == "uploader_avatar_url")
    );
    assert!(err.to_string().contains("no such user"));
}

#[tokio::test]
async fn test_card_timeout_fails_fetch() {
    let server = MockServer::start().await;
    mount_series(&server).await;
    Mock::given(method("GET"))
        .and(path("/x/web-interface/card"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let client = HttpClientConfig::builder()
        .timeout(Duration::from_millis(300))
        .build();
    let service = service_with_client(&server, client);
    let mut extractor = service.playlist_extractor(SERIES_URL).unwrap();

    let err = extractor
        .fetch_page(&CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Timeout { timeout_ms: 300 }));
    assert!(err.is_terminal());
    assert!(!extractor.is_fetched());
}

#[tokio::test]
async fn test_series_api_error_is_critical() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/x/series/series"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": -404,
            "message": "not found"
        })))
        .mount(&server)
        .await;

    let service = test_service(&server);
    let mut extractor = service.playlist_extractor(SERIES_URL).unwrap();
    let err = extractor
        .fetch_page(&CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::CriticalExtraction { .. }));
    assert!(err.to_string().contains("not found"));
}

#[tokio::test]
async fn test_pagination() {
    let server = MockServer::start().await;
    mount_series(&server).await;
    mount_card(&server).await;
    mount_archives(&server).await;

    let cancel = CancellationToken::new();
    let service = test_service(&server);
    let mut extractor = service.playlist_extractor(SERIES_URL).unwrap();
    extractor.fetch_page(&cancel).await.unwrap();

    let first = extractor.initial_page(&cancel).await.unwrap();
    assert_eq!(first.items.len(), 2);
    assert!(first.errors.is_empty());
    assert_eq!(first.items[0].name, "Video 1");
    assert_eq!(first.items[0].service_id, BILIBILI_SERVICE_ID);

    let next = first.next_page.clone().unwrap();
    let cursor: SeriesCursor = next.data(SERIES_CURSOR_OWNER).unwrap();
    assert_eq!(cursor.pn, 2);

    let second = extractor.page(&next, &cancel).await.unwrap();
    assert_eq!(second.items.len(), 1);
    assert_eq!(second.items[0].name, "Video 3");
    assert!(second.next_page.is_none());

    let all = collect_all(extractor.as_ref(), first, &cancel).await.unwrap();
    let names: Vec<_> = all.items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["Video 1", "Video 2", "Video 3"]);
    assert!(all.next_page.is_none());
}

#[tokio::test]
async fn test_page_replay_without_fetch() {
    let server = MockServer::start().await;
    mount_archives(&server).await;

    let cancel = CancellationToken::new();
    let service = test_service(&server);
    let start = Page::new(format!(
        "{}/x/series/archives?mid=7&series_id=42&pn=1&ps=2",
        server.uri()
    ))
    .with_data(
        SERIES_CURSOR_OWNER,
        &SeriesCursor {
            mid: "7".to_string(),
            series_id: "42".to_string(),
            pn: 1,
        },
    )
    .unwrap();

    let producer = service.playlist_extractor(SERIES_URL).unwrap();
    let first = producer.page(&start, &cancel).await.unwrap();
    let token = first.next_page.unwrap().to_token().unwrap();

    let fresh = service.playlist_extractor(SERIES_URL).unwrap();
    assert!(!fresh.is_fetched());
    let page = Page::from_token(&token).unwrap();
    let more = fresh.page(&page, &cancel).await.unwrap();
    assert_eq!(more.items.len(), 1);
    assert_eq!(more.items[0].url, "https://www.bilibili.com/video/BV3");
}

#[tokio::test]
async fn test_missing_archives_is_not_end_of_list() {
    let server = MockServer::start().await;
    mount_archives_body(
        &server,
        1,
        json!({"page": {"num": 1, "size": 2, "total": 3}}),
    )
    .await;
    mount_archives_body(
        &server,
        2,
        json!({"archives": [], "page": {"num": 2, "size": 2, "total": 3}}),
    )
    .await;

    let cancel = CancellationToken::new();
    let extractor = test_service(&server).playlist_extractor(SERIES_URL).unwrap();

    for pn in [1, 2] {
        let err = extractor
            .page(&series_page(&server, pn), &cancel)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parsing, "page {pn}");
        assert!(err.to_string().contains("data.archives"), "page {pn}");
    }
}

#[tokio::test]
async fn test_empty_page_past_the_end() {
    let server = MockServer::start().await;
    mount_archives_body(
        &server,
        3,
        json!({"archives": [], "page": {"num": 3, "size": 2, "total": 3}}),
    )
    .await;
    mount_archives_body(
        &server,
        1,
        json!({"page": {"num": 1, "size": 2, "total": 0}}),
    )
    .await;

    let cancel = CancellationToken::new();
    let extractor = test_service(&server).playlist_extractor(SERIES_URL).unwrap();

    for pn in [3, 1] {
        let page = extractor.page(&series_page(&server, pn), &cancel).await.unwrap();
        assert!(page.items.is_empty(), "page {pn}");
        assert!(page.next_page.is_none(), "page {pn}");
        assert!(page.errors.is_empty(), "page {pn}");
    }
}

#[tokio::test]
async fn test_non_positive_page_size_uses_configured_size() {
    let server = MockServer::start().await;
    mount_archives_body(
        &server,
        1,
        json!({"archives": [archive(1), archive(2)], "page": {"num": 1, "size": 0, "total": 3}}),
    )
    .await;
    mount_archives_body(
        &server,
        2,
        json!({"archives": [archive(3)], "page": {"num": 2, "size": -1, "total": 3}}),
    )
    .await;

    let cancel = CancellationToken::new();
    let extractor = test_service(&server).playlist_extractor(SERIES_URL).unwrap();

    let first = extractor.page(&series_page(&server, 1), &cancel).await.unwrap();
    let next: SeriesCursor = first
        .next_page
        .as_ref()
        .unwrap()
        .data(SERIES_CURSOR_OWNER)
        .unwrap();
    assert_eq!(next.pn, 2);

    let second = extractor.page(&series_page(&server, 2), &cancel).await.unwrap();
    assert_eq!(second.items.len(), 1);
    assert!(second.next_page.is_none());
}

#[tokio::test]
async fn test_last_page_number_is_invalid_cursor() {
    let server = MockServer::start().await;
    mount_archives_body(
        &server,
        u32::MAX,
        json!({"archives": [archive(1)], "page": {"num": 1, "size": 2, "total": i64::MAX}}),
    )
    .await;

    let extractor = test_service(&server).playlist_extractor(SERIES_URL).unwrap();
    let err = extractor
        .page(&series_page(&server, u32::MAX), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidCursor { .. }));
}

#[tokio::test]
async fn test_foreign_cursors_rejected() {
    let server = MockServer::start().await;
    let service = test_service(&server);
    let extractor = service.playlist_extractor(SERIES_URL).unwrap();
    let cancel = CancellationToken::new();

    let bare = Page::new("https://example.com/next");
    assert!(matches!(
        extractor.page(&bare, &cancel).await,
        Err(Error::InvalidCursor { .. })
    ));

    let other_owner = Page::new("https://example.com/next")
        .with_data("youtube:playlist", &json!({"token": "abc"}))
        .unwrap();
    assert!(matches!(
        extractor.page(&other_owner, &cancel).await,
        Err(Error::InvalidCursor { .. })
    ));

    let other_series = Page::new("https://example.com/next")
        .with_data(
            SERIES_CURSOR_OWNER,
            &SeriesCursor {
                mid: "7".to_string(),
                series_id: "99".to_string(),
                pn: 2,
            },
        )
        .unwrap();
    assert!(matches!(
        extractor.page(&other_series, &cancel).await,
        Err(Error::InvalidCursor { .. })
    ));

    assert!(server.received_requests().await.unwrap().is_empty());
}
