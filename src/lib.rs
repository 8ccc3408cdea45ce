// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # media-extract
//!
//! Metadata extraction from media platforms that keeps going when
//! individual fields fail.
//!
//! ## Features
//!
//! - **Partial results**: every field is extracted in isolation; failures are
//!   returned as data next to the values that did extract
//! - **Uploader heuristic**: a wholly missing uploader is treated as absent,
//!   not as a broken extraction
//! - **Resumable pagination**: cursors serialize to opaque tokens that can be
//!   stored and replayed later
//! - **Full-list accumulation**: bounded lists can be walked to the end;
//!   generated mixes stop after the first page
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use media_extract::{get_info, ExtractorConfig, HttpClient, ServiceRegistry};
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> media_extract::Result<()> {
//!     let config = ExtractorConfig::default();
//!     let client = HttpClient::with_config(config.http_client_config())?;
//!     let registry = ServiceRegistry::with_defaults(&config, Arc::new(client));
//!
//!     let url = "https://space.bilibili.com/7/channel/seriesdetail?sid=42";
//!     let info = get_info(&registry, url, &CancellationToken::new()).await?;
//!     for failure in &info.errors {
//!         eprintln!("degraded: {failure}");
//!     }
//!
//!     if let Some(next) = &info.next_page {
//!         println!("resume with {}", next.to_token()?);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         Public API                              │
//! │  get_info(url)   get_info_with(url, mode)   get_more_items(page)│
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────────────┴──────┬────────────┬──────────────┐
//! │ Service  │    Aggregator            │ Pagination │  Extractor   │
//! ├──────────┼──────────────────────────┼────────────┼──────────────┤
//! │ Registry │ FailureLedger            │ Page       │ Extractor    │
//! │ Links    │ Uploader group policy    │ Token      │ ListExtractor│
//! │          │ PlaylistInfo             │ collect_all│ Collector    │
//! └──────────┴──────────────────────────┴────────────┴──────────────┘
//!                                │
//! ┌──────────────────────────────┴──────────────────────────────────┐
//! │  Transport (reqwest, cancellable)    Document (JSON lookups)    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types and captured failures
pub mod error;

/// Common types and type aliases
pub mod types;

/// Cancellable HTTP transport
pub mod http;

/// Response documents and path lookups
pub mod parse;

/// Cursors, result pages and full-list accumulation
pub mod pagination;

/// Extractor traits, link handlers and stream items
pub mod extractor;

/// Partial-result aggregation and the public extraction API
pub mod info;

/// Service routing
pub mod service;

/// Built-in platform adapters
pub mod services;

/// Runtime configuration
pub mod config;

/// Cursor persistence
pub mod state;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, ErrorKind, ExtractionFailure, Result};
pub use types::*;

// Re-export commonly used types
pub use config::{load_config, load_config_from_str, ExtractorConfig};
pub use extractor::{PlaylistExtractor, StreamInfoItem, StreamType};
pub use http::{HttpClient, HttpClientConfig, Transport};
pub use info::playlist::{get_info, get_info_with, get_more_items};
pub use info::{ItemsMode, PlaylistInfo, PlaylistType};
pub use pagination::{collect_all, InfoItemsPage, Page};
pub use service::{ServiceRegistry, StreamingService};
pub use state::CursorStore;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
