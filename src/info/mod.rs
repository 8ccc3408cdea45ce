//! Aggregated info module
//!
//! Turns a fetched extractor into a normalized, partially-failable result.
//!
//! # Overview
//!
//! - `FailureLedger` - per-field failure capture and the uploader-group policy
//! - `PlaylistInfo` - normalized playlist metadata plus items, cursor, errors
//! - `get_info` / `get_info_with` / `get_more_items` - public entry points

mod handle;
mod ledger;
pub mod playlist;

pub use handle::InfoHandle;
pub use ledger::{
    surface_uploader_failures, FailureLedger, FieldClass, UPLOADER_SUPPRESSION_THRESHOLD,
};
pub use playlist::{ItemsMode, PlaylistInfo, PlaylistType};
