//! Per-field failure capture
//!
//! The aggregator runs every accessor through a [`FailureLedger`], which
//! decides per field class whether a failure aborts the call, is recorded,
//! or is held back until the uploader-group policy has been applied.

use crate::error::{Error, ExtractionFailure, Result};
use tracing::{debug, warn};

/// Uploader-group failures at or above this count, with no other failures,
/// are treated as "this target has no uploader" and suppressed
pub const UPLOADER_SUPPRESSION_THRESHOLD: usize = 3;

/// How a field's failure is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldClass {
    /// Identity data; failure aborts the call
    Critical,
    /// Failure is recorded and the field keeps its default
    Optional,
    /// Uploader/sub-channel identity; failure is held for the group policy
    UploaderGroup,
}

/// Whether held uploader-group failures become result errors
///
/// They do when anything else already failed, or when fewer than
/// [`UPLOADER_SUPPRESSION_THRESHOLD`] group fields failed.
pub fn surface_uploader_failures(other_failures: usize, group_failures: usize) -> bool {
    group_failures > 0
        && (other_failures > 0 || group_failures < UPLOADER_SUPPRESSION_THRESHOLD)
}

/// Accumulates field failures in declaration order
#[derive(Debug, Default)]
pub struct FailureLedger {
    failures: Vec<ExtractionFailure>,
    uploader_failures: Vec<ExtractionFailure>,
}

impl FailureLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one field result through the ledger
    ///
    /// Returns `Ok(None)` when a non-critical field failed and was recorded.
    /// Critical fields and terminal errors (network, cancellation) return
    /// `Err` and must abort the extraction.
    pub fn attempt<T>(
        &mut self,
        field: &str,
        class: FieldClass,
        result: Result<T>,
    ) -> Result<Option<T>> {
        let error = match result {
            Ok(value) => return Ok(Some(value)),
            Err(e) => e,
        };

        if error.is_terminal() {
            return Err(error);
        }

        match class {
            FieldClass::Critical => Err(Error::critical(format!(
                "could not get {field}: {error}"
            ))),
            FieldClass::Optional => {
                debug!("Optional field {field} failed: {error}");
                self.failures
                    .push(ExtractionFailure::for_field(field, &error));
                Ok(None)
            }
            FieldClass::UploaderGroup => {
                debug!("Uploader field {field} failed: {error}");
                self.uploader_failures
                    .push(ExtractionFailure::for_field(field, &error));
                Ok(None)
            }
        }
    }

    /// [`attempt`](Self::attempt), falling back to the type default
    pub fn record<T: Default>(
        &mut self,
        field: &str,
        class: FieldClass,
        result: Result<T>,
    ) -> Result<T> {
        Ok(self.attempt(field, class, result)?.unwrap_or_default())
    }

    /// Number of non-group failures so far
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Number of held uploader-group failures so far
    pub fn uploader_failure_count(&self) -> usize {
        self.uploader_failures.len()
    }

    /// Apply the uploader-group policy and return the significant failures
    ///
    /// Non-group failures come first, in the order they were recorded,
    /// followed by the group failures if they are surfaced.
    pub fn finish(self) -> Vec<ExtractionFailure> {
        let Self {
            mut failures,
            uploader_failures,
        } = self;

        if surface_uploader_failures(failures.len(), uploader_failures.len()) {
            warn!(
                "{} uploader fields failed alongside {} other failures",
                uploader_failures.len(),
                failures.len()
            );
            failures.extend(uploader_failures);
        } else if !uploader_failures.is_empty() {
            debug!(
                "Suppressing {} uploader failures: target has no uploader",
                uploader_failures.len()
            );
        }

        failures
    }
}
