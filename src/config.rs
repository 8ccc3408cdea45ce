//! Runtime configuration
//!
//! Loaded from YAML (or JSON, which serde_yaml also accepts). Every field
//! has a default, so an empty document is a valid configuration.

use crate::error::{Error, Result};
use crate::http::HttpClientConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete extractor configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// HTTP transport settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Per-service settings
    #[serde(default)]
    pub services: ServicesConfig,
}

impl ExtractorConfig {
    /// Transport configuration derived from the `http` section
    pub fn http_client_config(&self) -> HttpClientConfig {
        let mut builder =
            HttpClientConfig::builder().timeout(Duration::from_secs(self.http.timeout_secs));

        if let Some(agent) = &self.http.user_agent {
            builder = builder.user_agent(agent);
        }
        for (key, value) in &self.http.headers {
            builder = builder.header(key, value);
        }

        builder.build()
    }

    /// Check values serde cannot check
    pub fn validate(&self) -> Result<()> {
        if self.http.timeout_secs == 0 {
            return Err(Error::config("http.timeout_secs must be greater than 0"));
        }
        if self.services.bilibili.page_size == 0 {
            return Err(Error::config(
                "services.bilibili.page_size must be greater than 0",
            ));
        }
        for (name, url) in [
            ("services.bilibili.api_base_url", &self.services.bilibili.api_base_url),
            ("services.bilibili.web_base_url", &self.services.bilibili.web_base_url),
        ] {
            url::Url::parse(url)
                .map_err(|e| Error::config(format!("{name} is not a valid URL: {e}")))?;
        }
        Ok(())
    }
}

// ============================================================================
// HTTP
// ============================================================================

/// HTTP transport settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Headers sent with every request
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: None,
            headers: HashMap::new(),
        }
    }
}

// ============================================================================
// Services
// ============================================================================

/// Settings for the built-in services
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServicesConfig {
    /// Bilibili settings
    #[serde(default)]
    pub bilibili: BilibiliConfig,
}

/// Bilibili settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BilibiliConfig {
    /// Base URL of the JSON API
    #[serde(default = "default_bilibili_api")]
    pub api_base_url: String,

    /// Base URL of user space pages
    #[serde(default = "default_bilibili_web")]
    pub web_base_url: String,

    /// Items requested per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_bilibili_api() -> String {
    "https://api.bilibili.com".to_string()
}

fn default_bilibili_web() -> String {
    "https://space.bilibili.com".to_string()
}

fn default_page_size() -> u32 {
    30
}

impl Default for BilibiliConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_bilibili_api(),
            web_base_url: default_bilibili_web(),
            page_size: default_page_size(),
        }
    }
}

// ============================================================================
// Loader Functions
// ============================================================================

/// Load configuration from a YAML or JSON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ExtractorConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "Failed to read config file '{}': {e}",
            path.display()
        ))
    })?;
    load_config_from_str(&content)
}

/// Load configuration from a YAML or JSON string
pub fn load_config_from_str(content: &str) -> Result<ExtractorConfig> {
    if content.trim().is_empty() {
        return Ok(ExtractorConfig::default());
    }
    let config: ExtractorConfig = serde_yaml::from_str(content)?;
    config.validate()?;
    Ok(config)
}
