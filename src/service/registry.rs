//! Explicit registry of known services

use super::StreamingService;
use crate::config::ExtractorConfig;
use crate::error::{Error, Result};
use crate::http::Transport;
use crate::services::bilibili::BilibiliService;
use crate::types::ServiceId;
use std::sync::Arc;
use tracing::debug;

/// Ordered set of services, looked up by URL, id or name
#[derive(Default)]
pub struct ServiceRegistry {
    services: Vec<Arc<dyn StreamingService>>,
}

impl ServiceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with every built-in service
    pub fn with_defaults(config: &ExtractorConfig, transport: Arc<dyn Transport>) -> Self {
        let mut registry = Self::new();
        registry.services.push(Arc::new(BilibiliService::new(
            config.services.bilibili.clone(),
            transport,
        )));
        registry
    }

    /// Add a service; ids and names must be unique
    pub fn register(&mut self, service: Arc<dyn StreamingService>) -> Result<()> {
        if let Some(existing) = self
            .services
            .iter()
            .find(|s| s.service_id() == service.service_id() || s.name() == service.name())
        {
            return Err(Error::config(format!(
                "service {} ({}) conflicts with registered {} ({})",
                service.name(),
                service.service_id(),
                existing.name(),
                existing.service_id()
            )));
        }
        self.services.push(service);
        Ok(())
    }

    /// All services in registration order
    pub fn services(&self) -> &[Arc<dyn StreamingService>] {
        &self.services
    }

    /// First service, in registration order, that accepts the URL
    pub fn service_by_url(&self, url: &str) -> Result<Arc<dyn StreamingService>> {
        let service = self
            .services
            .iter()
            .find(|s| s.accepts_url(url))
            .ok_or_else(|| Error::no_matching_service(url))?;
        debug!("Matched service {} for {url}", service.name());
        Ok(Arc::clone(service))
    }

    /// Service with the given id
    pub fn service_by_id(&self, id: ServiceId) -> Result<Arc<dyn StreamingService>> {
        self.services
            .iter()
            .find(|s| s.service_id() == id)
            .cloned()
            .ok_or_else(|| Error::UnknownService {
                service: id.to_string(),
            })
    }

    /// Service with the given name (case-insensitive)
    pub fn service_by_name(&self, name: &str) -> Result<Arc<dyn StreamingService>> {
        self.services
            .iter()
            .find(|s| s.name().eq_ignore_ascii_case(name))
            .cloned()
            .ok_or_else(|| Error::UnknownService {
                service: name.to_string(),
            })
    }
}

impl std::fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.services.iter().map(|s| (s.service_id(), s.name())))
            .finish()
    }
}
