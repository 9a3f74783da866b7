use crate::error::FetchError;
use reqwest::Url;
use std::fmt;
use std::path::{Path, PathBuf};

/// Query parameter used to defeat intermediary caches.
pub const CACHE_BUST_PARAM: &str = "_";

/// Where the metrics document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricsEndpoint {
    /// Fetched over HTTP(S).
    Http(Url),
    /// Read from the local filesystem.
    File(PathBuf),
}

impl MetricsEndpoint {
    /// Parses an endpoint string.
    ///
    /// - `http://` / `https://` URLs are used as is.
    /// - `file://` URLs and absolute paths point at a local file.
    /// - Anything else is a relative reference resolved against `base`,
    ///   so `./metrics.json` behaves like it does for a browser page.
    ///
    /// # Errors
    /// Returns [`FetchError::InvalidEndpoint`] if the string cannot be
    /// interpreted.
    pub fn parse(raw: &str, base: &Url) -> Result<Self, FetchError> {
        let raw = raw.trim();
        let invalid = |reason: String| FetchError::InvalidEndpoint {
            endpoint: raw.to_string(),
            reason,
        };

        if raw.is_empty() {
            return Err(invalid("empty endpoint".to_string()));
        }

        if raw.starts_with("http://") || raw.starts_with("https://") {
            return Url::parse(raw)
                .map(Self::Http)
                .map_err(|e| invalid(e.to_string()));
        }

        if raw.starts_with("file://") {
            let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
            return url
                .to_file_path()
                .map(Self::File)
                .map_err(|()| invalid("not a local file url".to_string()));
        }

        if Path::new(raw).is_absolute() {
            return Ok(Self::File(PathBuf::from(raw)));
        }

        if !matches!(base.scheme(), "http" | "https") {
            return Err(invalid(format!("base url {base} is not http(s)")));
        }

        base.join(raw)
            .map(Self::Http)
            .map_err(|e| invalid(e.to_string()))
    }
}

impl fmt::Display for MetricsEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(url) => write!(f, "{url}"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Returns `url` with the cache-busting parameter set to `epoch_ms`.
#[must_use]
pub fn cache_busted(url: &Url, epoch_ms: i64) -> Url {
    let mut busted = url.clone();
    busted
        .query_pairs_mut()
        .append_pair(CACHE_BUST_PARAM, &epoch_ms.to_string());
    busted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://127.0.0.1:8000/dashboard/").unwrap()
    }

    #[test]
    fn test_relative_endpoint_resolves_against_base() {
        let endpoint = MetricsEndpoint::parse("./metrics.json", &base()).unwrap();
        assert_eq!(
            endpoint,
            MetricsEndpoint::Http(
                Url::parse("http://127.0.0.1:8000/dashboard/metrics.json").unwrap()
            )
        );
    }

    #[test]
    fn test_absolute_url_ignores_base() {
        let endpoint = MetricsEndpoint::parse("https://example.com/m.json", &base()).unwrap();
        assert_eq!(endpoint.to_string(), "https://example.com/m.json");
    }

    #[test]
    fn test_absolute_path_is_file() {
        let endpoint = MetricsEndpoint::parse("/tmp/metrics.json", &base()).unwrap();
        assert_eq!(endpoint, MetricsEndpoint::File(PathBuf::from("/tmp/metrics.json")));
    }

    #[test]
    fn test_empty_endpoint_rejected() {
        let err = MetricsEndpoint::parse("  ", &base()).unwrap_err();
        assert!(matches!(err, FetchError::InvalidEndpoint { .. }));
    }

    #[test]
    fn test_cache_busted_appends_timestamp() {
        let url = Url::parse("http://127.0.0.1:8000/metrics.json").unwrap();
        let busted = cache_busted(&url, 1_700_000_000_123);

        assert_eq!(
            busted.as_str(),
            "http://127.0.0.1:8000/metrics.json?_=1700000000123"
        );
        // original untouched
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_cache_busted_keeps_existing_query() {
        let url = Url::parse("http://h/metrics.json?desk=a").unwrap();
        assert_eq!(cache_busted(&url, 5).query(), Some("desk=a&_=5"));
    }
}
