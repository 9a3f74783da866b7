//! Concrete metrics sources.

mod file;
mod http;

pub use file::FileMetricsSource;
pub use http::HttpMetricsSource;
