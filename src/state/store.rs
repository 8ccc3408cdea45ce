//! Cursor store implementation
//!
//! Provides file-based cursor persistence with atomic writes.

use super::types::CursorState;
use crate::error::{Error, Result};
use crate::pagination::Page;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Persists cursors so lists can be resumed across runs
#[derive(Debug, Clone)]
pub struct CursorStore {
    /// Path to the state file; empty in memory-only mode
    path: PathBuf,
    state: Arc<RwLock<CursorState>>,
    /// Whether every update is written through
    auto_save: bool,
}

impl CursorStore {
    /// Create a store backed by a file, starting empty
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            state: Arc::new(RwLock::new(CursorState::new())),
            auto_save: true,
        }
    }

    /// Create a store that only writes on [`save`](Self::save)
    pub fn without_auto_save(path: impl AsRef<Path>) -> Self {
        Self {
            auto_save: false,
            ..Self::new(path)
        }
    }

    /// Create an in-memory store (no file persistence)
    pub fn in_memory() -> Self {
        Self {
            path: PathBuf::new(),
            state: Arc::new(RwLock::new(CursorState::new())),
            auto_save: false,
        }
    }

    /// Open a store, loading the file if it exists
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let state = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| Error::state(format!("Failed to read state file: {e}")))?;
            parse_state(&contents)?
        } else {
            CursorState::new()
        };

        Ok(Self {
            path,
            state: Arc::new(RwLock::new(state)),
            auto_save: true,
        })
    }

    /// Reload the file, replacing the cached state
    pub async fn load(&self) -> Result<()> {
        if self.is_in_memory() || !self.path.exists() {
            return Ok(());
        }

        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| Error::state(format!("Failed to read state file: {e}")))?;
        let loaded = parse_state(&contents)?;

        *self.state.write().await = loaded;
        Ok(())
    }

    /// Write the state file
    pub async fn save(&self) -> Result<()> {
        if self.is_in_memory() {
            return Ok(());
        }

        let contents = self.to_json_pretty().await?;

        // Write to temp file first, then rename for atomicity
        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents)
            .await
            .map_err(|e| Error::state(format!("Failed to write state file: {e}")))?;

        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| Error::state(format!("Failed to rename state file: {e}")))?;

        debug!("Saved cursors to {}", self.path.display());
        Ok(())
    }

    /// Saved cursor for a list URL
    ///
    /// Fails with `InvalidCursor` if the saved token no longer decodes.
    pub async fn cursor(&self, url: &str) -> Result<Option<Page>> {
        let state = self.state.read().await;
        state.get(url).map(super::SavedCursor::page).transpose()
    }

    /// Save the cursor of a list URL; `None` forgets it
    pub async fn set_cursor(&self, url: &str, page: Option<&Page>) -> Result<()> {
        {
            let mut state = self.state.write().await;
            match page {
                Some(page) => state.set(url, page)?,
                None => {
                    state.remove(url);
                }
            }
        }

        if self.auto_save {
            self.save().await?;
        }
        Ok(())
    }

    /// URLs with a saved cursor
    pub async fn urls(&self) -> Vec<String> {
        self.state.read().await.cursors.keys().cloned().collect()
    }

    /// Forget every cursor
    pub async fn clear(&self) -> Result<()> {
        *self.state.write().await = CursorState::new();

        if self.auto_save {
            self.save().await?;
        }
        Ok(())
    }

    /// Snapshot of the current state
    pub async fn snapshot(&self) -> CursorState {
        self.state.read().await.clone()
    }

    /// Export state as pretty-printed JSON
    pub async fn to_json_pretty(&self) -> Result<String> {
        let state = self.state.read().await;
        serde_json::to_string_pretty(&*state)
            .map_err(|e| Error::state(format!("Failed to serialize state: {e}")))
    }

    /// Path of the state file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the store has no backing file
    pub fn is_in_memory(&self) -> bool {
        self.path.as_os_str().is_empty()
    }
}

fn parse_state(contents: &str) -> Result<CursorState> {
    serde_json::from_str(contents)
        .map_err(|e| Error::state(format!("Failed to parse state file: {e}")))
}
