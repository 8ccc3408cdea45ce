//! Identity of an extraction target

use crate::types::ServiceId;
use serde::{Deserialize, Serialize};

/// Who and what was extracted; fixed once the aggregator has built it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoHandle {
    /// Service the target belongs to
    pub service_id: ServiceId,
    /// Platform id of the target
    pub id: String,
    /// Canonical URL
    pub url: String,
    /// URL as originally supplied by the caller
    pub original_url: String,
    /// Display name
    pub name: String,
}
