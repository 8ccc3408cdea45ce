//! Extractor capability interface
//!
//! Defines the traits every platform adapter implements, the link handler
//! contract used for URL recognition, and the stream item model shared by
//! all list extractors.

mod items;
mod link;
mod traits;

pub use items::{StreamInfoItem, StreamInfoItemExtractor, StreamItemsCollector, StreamType};
pub use link::{LinkHandler, LinkHandlerFactory};
pub use traits::{Extractor, ListExtractor, PlaylistExtractor};
