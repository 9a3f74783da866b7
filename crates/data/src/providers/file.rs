use crate::MetricsSource;
use crate::error::FetchError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};
use trade_dash_domain::MetricsSnapshot;

/// Reads snapshots from a file on every fetch.
#[derive(Debug, Clone)]
pub struct FileMetricsSource {
    path: PathBuf,
}

impl FileMetricsSource {
    /// Creates a source for `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl MetricsSource for FileMetricsSource {
    #[instrument(skip(self), fields(path = %self.path.display()), level = "debug")]
    async fn fetch(&self) -> Result<MetricsSnapshot, FetchError> {
        let body = tokio::fs::read(&self.path)
            .await
            .map_err(|source| FetchError::Io {
                path: self.path.clone(),
                source,
            })?;
        let snapshot: MetricsSnapshot = serde_json::from_slice(&body)?;

        debug!(bytes = body.len(), "metrics snapshot read");
        Ok(snapshot)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
