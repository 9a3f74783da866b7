use std::path::PathBuf;
use thiserror::Error;

/// Reasons a snapshot fetch can fail.
///
/// The loader collapses every variant into one displayed message; the
/// variants exist for logs.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status} from {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed metrics document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid endpoint {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
}
