//! Tests for service routing

use super::*;
use crate::config::ExtractorConfig;
use crate::error::Error;
use crate::http::HttpClient;
use crate::services::bilibili::BILIBILI_SERVICE_ID;
use std::sync::Arc;

/// Accepts every URL under a prefix; never builds extractors
struct PrefixLinks(&'static str);

impl LinkHandlerFactory for PrefixLinks {
    fn accepts(&self, url: &str) -> bool {
        url.starts_with(self.0)
    }

    fn id_from_url(&self, url: &str) -> Result<String> {
        Ok(url.trim_start_matches(self.0).to_string())
    }

    fn url_from_id(&self, id: &str) -> Result<String> {
        Ok(format!("{}{id}", self.0))
    }
}

struct PrefixService {
    id: ServiceId,
    name: &'static str,
    links: PrefixLinks,
}

impl PrefixService {
    fn new(id: ServiceId, name: &'static str, prefix: &'static str) -> Arc<Self> {
        Arc::new(Self {
            id,
            name,
            links: PrefixLinks(prefix),
        })
    }
}

impl StreamingService for PrefixService {
    fn service_id(&self) -> ServiceId {
        self.id
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn playlist_links(&self) -> &dyn LinkHandlerFactory {
        &self.links
    }

    fn playlist_extractor_for(&self, link: LinkHandler) -> Result<Box<dyn PlaylistExtractor>> {
        Err(Error::UnsupportedUrl {
            service: self.name.to_string(),
            kind: "playlist".to_string(),
            url: link.url,
        })
    }
}

#[test]
fn test_first_registered_match_wins() {
    let mut registry = ServiceRegistry::new();
    registry
        .register(PrefixService::new(1, "broad", "https://media.example/"))
        .unwrap();
    registry
        .register(PrefixService::new(2, "narrow", "https://media.example/list/"))
        .unwrap();

    let service = registry
        .service_by_url("https://media.example/list/1")
        .unwrap();
    assert_eq!(service.name(), "broad");
    assert_eq!(registry.services().len(), 2);
}

#[test]
fn test_no_matching_service() {
    let mut registry = ServiceRegistry::new();
    registry
        .register(PrefixService::new(1, "one", "https://one.example/"))
        .unwrap();

    let err = registry
        .service_by_url("https://two.example/list")
        .err()
        .unwrap();
    assert!(matches!(err, Error::NoMatchingService { ref url } if url == "https://two.example/list"));
    assert!(err.is_terminal());
}

#[test]
fn test_duplicate_registration_rejected() {
    let mut registry = ServiceRegistry::new();
    registry
        .register(PrefixService::new(1, "one", "https://one.example/"))
        .unwrap();

    assert!(registry
        .register(PrefixService::new(1, "other", "https://other.example/"))
        .is_err());
    assert!(registry
        .register(PrefixService::new(2, "one", "https://other.example/"))
        .is_err());
    assert_eq!(registry.services().len(), 1);
}

#[test]
fn test_lookup_by_id_and_name() {
    let mut registry = ServiceRegistry::new();
    registry
        .register(PrefixService::new(3, "three", "https://three.example/"))
        .unwrap();

    assert_eq!(registry.service_by_id(3).unwrap().name(), "three");
    assert_eq!(registry.service_by_name("THREE").unwrap().service_id(), 3);
    assert!(matches!(
        registry.service_by_id(4).err().unwrap(),
        Error::UnknownService { .. }
    ));
    assert!(matches!(
        registry.service_by_name("four").err().unwrap(),
        Error::UnknownService { .. }
    ));
}

#[test]
fn test_extractor_errors_pass_through() {
    let service = PrefixService::new(1, "one", "https://one.example/");
    let err = service
        .playlist_extractor("https://one.example/abc")
        .err()
        .unwrap();
    assert!(matches!(err, Error::UnsupportedUrl { ref url, .. } if url == "https://one.example/abc"));
}

#[test]
fn test_default_registry() {
    let client = HttpClient::new().unwrap();
    let registry = ServiceRegistry::with_defaults(&ExtractorConfig::default(), Arc::new(client));

    let service = registry
        .service_by_url("https://space.bilibili.com/7/channel/seriesdetail?sid=42")
        .unwrap();
    assert_eq!(service.service_id(), BILIBILI_SERVICE_ID);
    assert_eq!(format!("{registry:?}"), r#"[(5, "bilibili")]"#);
}
