//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::{load_config, ExtractorConfig};
use crate::error::{Error, Result};
use crate::extractor::StreamInfoItem;
use crate::http::HttpClient;
use crate::info::playlist::{get_info_with, get_more_items};
use crate::info::{ItemsMode, PlaylistInfo};
use crate::pagination::{InfoItemsPage, Page};
use crate::service::ServiceRegistry;
use crate::state::CursorStore;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// `info` output: the playlist plus its cursor as a token
#[derive(Serialize)]
struct InfoOutput<'a> {
    #[serde(flatten)]
    info: &'a PlaylistInfo,
    next_page_token: Option<String>,
}

/// `more` output: one page plus its cursor as a token
#[derive(Serialize)]
struct PageOutput<'a> {
    #[serde(flatten)]
    page: &'a InfoItemsPage<StreamInfoItem>,
    next_page_token: Option<String>,
}

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    ///
    /// Ctrl-C cancels the extraction in flight.
    pub async fn run(&self) -> Result<()> {
        let cancel = CancellationToken::new();
        let interrupt = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("Interrupted, cancelling");
                    cancel.cancel();
                }
            })
        };

        let result = match &self.cli.command {
            Commands::Info { url, full } => self.info(url, *full, &cancel).await,
            Commands::More {
                url,
                cursor,
                resume,
            } => self.more(url, cursor.as_deref(), *resume, &cancel).await,
            Commands::Services => self.services(),
        };

        interrupt.abort();
        result
    }

    /// Load configuration, falling back to defaults
    fn load_config(&self) -> Result<ExtractorConfig> {
        match &self.cli.config {
            Some(path) => load_config(path),
            None => Ok(ExtractorConfig::default()),
        }
    }

    /// Build the registry with a client configured from the config file
    fn build_registry(&self) -> Result<ServiceRegistry> {
        let config = self.load_config()?;
        let client = HttpClient::with_config(config.http_client_config())?;
        Ok(ServiceRegistry::with_defaults(&config, Arc::new(client)))
    }

    /// Open the cursor store, in memory when no state file is given
    fn load_state(&self) -> Result<CursorStore> {
        match &self.cli.state {
            Some(path) => CursorStore::from_file(path),
            None => Ok(CursorStore::in_memory()),
        }
    }

    async fn info(&self, url: &str, full: bool, cancel: &CancellationToken) -> Result<()> {
        let registry = self.build_registry()?;
        let store = self.load_state()?;
        let mode = if full {
            ItemsMode::FullList
        } else {
            ItemsMode::FirstPage
        };

        let info = get_info_with(&registry, url, mode, cancel).await?;
        if info.is_degraded() {
            warn!("{} fields could not be extracted", info.errors.len());
        }

        store.set_cursor(url, info.next_page.as_ref()).await?;
        self.output(&InfoOutput {
            next_page_token: token_of(info.next_page.as_ref())?,
            info: &info,
        })
    }

    async fn more(
        &self,
        url: &str,
        cursor: Option<&str>,
        resume: bool,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let registry = self.build_registry()?;
        let store = self.load_state()?;

        let page = match cursor {
            Some(token) => Page::from_token(token)?,
            None if resume && store.is_in_memory() => {
                return Err(Error::config("--resume needs a state file (use -s)"));
            }
            None => store
                .cursor(url)
                .await?
                .ok_or_else(|| Error::state(format!("No saved cursor for {url}")))?,
        };

        let more = get_more_items(&registry, url, &page, cancel).await?;
        info!(
            "Fetched {} items, {}",
            more.items.len(),
            if more.has_next_page() {
                "more available"
            } else {
                "end of list"
            }
        );

        store.set_cursor(url, more.next_page.as_ref()).await?;
        self.output(&PageOutput {
            next_page_token: token_of(more.next_page.as_ref())?,
            page: &more,
        })
    }

    fn services(&self) -> Result<()> {
        let registry = self.build_registry()?;
        let services: Vec<_> = registry
            .services()
            .iter()
            .map(|s| json!({"id": s.service_id(), "name": s.name()}))
            .collect();
        self.output(&services)
    }

    fn output<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let text = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        println!("{text}");
        Ok(())
    }
}

fn token_of(page: Option<&Page>) -> Result<Option<String>> {
    page.map(Page::to_token).transpose()
}
