//! HTTP transport module
//!
//! Provides the transport boundary the extraction core fetches through.
//!
//! # Features
//!
//! - **Transport trait**: adapters depend on `dyn Transport`, so tests can
//!   substitute an in-memory double
//! - **Cancellation**: `fetch` races each request against a `CancellationToken`
//! - **Status policy**: non-2xx responses fail unless explicitly tolerated

mod client;
mod transport;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use transport::{fetch, Request, Response, Transport};
