//! Saved cursor types
//!
//! These types are serialized to JSON and persisted between runs.

use crate::error::Result;
use crate::pagination::Page;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Every saved cursor, keyed by the list URL it continues
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CursorState {
    #[serde(default)]
    pub cursors: BTreeMap<String, SavedCursor>,
}

impl CursorState {
    /// Create an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Saved cursor for a list URL
    pub fn get(&self, url: &str) -> Option<&SavedCursor> {
        self.cursors.get(url)
    }

    /// Save a cursor for a list URL, replacing any previous one
    pub fn set(&mut self, url: &str, page: &Page) -> Result<()> {
        self.cursors
            .insert(url.to_string(), SavedCursor::new(page)?);
        Ok(())
    }

    /// Forget the cursor of a list URL
    pub fn remove(&mut self, url: &str) -> Option<SavedCursor> {
        self.cursors.remove(url)
    }

    pub fn len(&self) -> usize {
        self.cursors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cursors.is_empty()
    }
}

/// A cursor token plus when it was saved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedCursor {
    /// Token produced by [`Page::to_token`]
    pub token: String,
    pub saved_at: DateTime<Utc>,
}

impl SavedCursor {
    /// Serialize a cursor for saving
    pub fn new(page: &Page) -> Result<Self> {
        Ok(Self {
            token: page.to_token()?,
            saved_at: Utc::now(),
        })
    }

    /// Restore the cursor
    pub fn page(&self) -> Result<Page> {
        Page::from_token(&self.token)
    }
}
