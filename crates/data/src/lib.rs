//! Metrics sources for the dashboard.
//!
//! This crate knows where a snapshot comes from and how to get it:
//! - endpoint parsing (HTTP URL or local file)
//! - cache-busted HTTP fetches
//! - file reads for locally generated documents
//!
//! It never retries and never keeps state between fetches.

/// Endpoint parsing and cache-busting.
pub mod endpoint;
/// Fetch error types.
pub mod error;
/// Concrete sources.
pub mod providers;

use async_trait::async_trait;
use trade_dash_domain::MetricsSnapshot;

pub use endpoint::{MetricsEndpoint, cache_busted};
pub use error::FetchError;
pub use providers::{FileMetricsSource, HttpMetricsSource};
pub use reqwest::Url;

/// Something that can produce a fresh snapshot on demand.
#[async_trait]
pub trait MetricsSource: Send + Sync {
    /// Fetches and parses one snapshot.
    ///
    /// # Errors
    /// Returns a [`FetchError`] if the document cannot be retrieved or parsed.
    async fn fetch(&self) -> Result<MetricsSnapshot, FetchError>;

    /// Human-readable description of where snapshots come from.
    fn describe(&self) -> String;
}

/// Builds the source matching an endpoint.
///
/// # Errors
/// Returns an error if the HTTP client cannot be built.
pub fn source_for(
    endpoint: MetricsEndpoint,
    timeout: Option<std::time::Duration>,
) -> Result<Box<dyn MetricsSource>, FetchError> {
    match endpoint {
        MetricsEndpoint::Http(url) => Ok(Box::new(HttpMetricsSource::new(url, timeout)?)),
        MetricsEndpoint::File(path) => Ok(Box::new(FileMetricsSource::new(path))),
    }
}
