//! Cursor persistence module
//!
//! Keeps continuation tokens between runs so a caller can resume a list
//! where it stopped.
//!
//! # Overview
//!
//! The state module provides:
//! - `CursorState` - serializable map from list URL to saved cursor
//! - `CursorStore` - file-based persistence with atomic writes

mod store;
mod types;

pub use store::CursorStore;
pub use types::{CursorState, SavedCursor};
