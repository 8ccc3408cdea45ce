//! Error types for media-extract
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Field-level failures are not returned to callers as `Err`; they are
//! snapshotted into [`ExtractionFailure`] values and carried as data on the
//! extracted info.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The main error type for media-extract
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Extraction Errors
    // ============================================================================
    #[error("Critical extraction failure: {message}")]
    CriticalExtraction { message: String },

    #[error("Could not extract field '{field}': {message}")]
    FieldExtraction { field: String, message: String },

    #[error("Parsing error: {message}")]
    Parsing { message: String },

    #[error("Page has not been fetched yet")]
    NotFetched,

    #[error("Page was already fetched")]
    AlreadyFetched,

    // ============================================================================
    // Pagination Errors
    // ============================================================================
    #[error("Invalid cursor: {message}")]
    InvalidCursor { message: String },

    // ============================================================================
    // Routing Errors
    // ============================================================================
    #[error("No service matches url: {url}")]
    NoMatchingService { url: String },

    #[error("Unknown service: {service}")]
    UnknownService { service: String },

    #[error("Service '{service}' does not support {kind} urls: {url}")]
    UnsupportedUrl {
        service: String,
        kind: String,
        url: String,
    },

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Extraction cancelled")]
    Cancelled,

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // State Errors
    // ============================================================================
    #[error("State error: {message}")]
    State { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a critical extraction error
    pub fn critical(message: impl Into<String>) -> Self {
        Self::CriticalExtraction {
            message: message.into(),
        }
    }

    /// Create a field extraction error
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FieldExtraction {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a parsing error
    pub fn parsing(message: impl Into<String>) -> Self {
        Self::Parsing {
            message: message.into(),
        }
    }

    /// Create an invalid cursor error
    pub fn invalid_cursor(message: impl Into<String>) -> Self {
        Self::InvalidCursor {
            message: message.into(),
        }
    }

    /// Create a no matching service error
    pub fn no_matching_service(url: impl Into<String>) -> Self {
        Self::NoMatchingService { url: url.into() }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, url: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            url: url.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a state error
    pub fn state(message: impl Into<String>) -> Self {
        Self::State {
            message: message.into(),
        }
    }

    /// Coarse classification of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::CriticalExtraction { .. } => ErrorKind::Critical,
            Error::FieldExtraction { .. }
            | Error::Parsing { .. }
            | Error::NotFetched
            | Error::AlreadyFetched
            | Error::JsonParse(_) => ErrorKind::Parsing,
            Error::InvalidCursor { .. } => ErrorKind::InvalidCursor,
            Error::NoMatchingService { .. }
            | Error::UnknownService { .. }
            | Error::UnsupportedUrl { .. } => ErrorKind::Routing,
            Error::Network(_) | Error::HttpStatus { .. } | Error::InvalidUrl(_) => {
                ErrorKind::Network
            }
            Error::Cancelled | Error::Timeout { .. } => ErrorKind::Cancelled,
            _ => ErrorKind::Other,
        }
    }

    /// Check if this error must terminate the whole extraction call
    ///
    /// Terminal errors are never recorded as field failures.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Critical | ErrorKind::Network | ErrorKind::Cancelled | ErrorKind::Routing
        )
    }
}

/// Result type alias for media-extract
pub type Result<T> = std::result::Result<T, Error>;

// ============================================================================
// Error Kind
// ============================================================================

/// Coarse error classification, stable across serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Required identity data unavailable
    Critical,
    /// A field or document could not be parsed
    Parsing,
    /// Cursor malformed or foreign
    InvalidCursor,
    /// URL or service could not be resolved
    Routing,
    /// Transport-level failure
    Network,
    /// Aborted by the caller's token or the configured timeout
    Cancelled,
    /// Anything else
    Other,
}

// ============================================================================
// Captured Failures
// ============================================================================

/// A failure captured during extraction and carried as data
///
/// Unlike [`Error`], this is cloneable and comparable so that results holding
/// it can be persisted and compared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionFailure {
    /// Name of the field or step that failed, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    /// Error classification
    pub kind: ErrorKind,

    /// Top-level error message
    pub message: String,

    /// Messages of the underlying causes, outermost first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<String>,
}

impl ExtractionFailure {
    /// Capture an error without field attribution
    pub fn from_error(error: &Error) -> Self {
        let mut causes = Vec::new();
        let mut source = std::error::Error::source(error);
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }

        Self {
            field: None,
            kind: error.kind(),
            message: error.to_string(),
            causes,
        }
    }

    /// Capture an error for a named field
    pub fn for_field(field: impl Into<String>, error: &Error) -> Self {
        Self {
            field: Some(field.into()),
            ..Self::from_error(error)
        }
    }
}

impl std::fmt::Display for ExtractionFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{field}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}
