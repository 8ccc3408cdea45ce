//! Pagination module
//!
//! Cursor-based continuation for item lists.
//!
//! # Overview
//!
//! Adapters return an [`InfoItemsPage`] per fetch. Its `next_page` is a
//! [`Page`]: an opaque cursor that can be persisted as a token and replayed
//! later against the same service. [`collect_all`] walks cursors to the end
//! of a bounded list.

mod accumulator;
mod types;

pub use accumulator::collect_all;
pub use types::{InfoItemsPage, Page, PageData, CURSOR_ENVELOPE_VERSION};
