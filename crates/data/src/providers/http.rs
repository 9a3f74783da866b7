use crate::endpoint::cache_busted;
use crate::error::FetchError;
use crate::MetricsSource;
use async_trait::async_trait;
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::{debug, instrument};
use trade_dash_domain::MetricsSnapshot;

/// Fetches snapshots over HTTP.
///
/// Every fetch is a single `GET` with a fresh `_=<epoch-ms>` parameter. There
/// is no retry and, unless configured, no timeout.
#[derive(Clone)]
pub struct HttpMetricsSource {
    http: Client,
    url: Url,
}

impl HttpMetricsSource {
    /// Creates a new HTTP source.
    ///
    /// # Errors
    /// Returns an error if the underlying client cannot be built.
    pub fn new(url: Url, timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = Client::builder().pool_idle_timeout(Duration::from_secs(30));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            url,
        })
    }

    /// Returns the endpoint without the cache-busting parameter.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl MetricsSource for HttpMetricsSource {
    #[instrument(skip(self), fields(url = %self.url), level = "debug")]
    async fn fetch(&self) -> Result<MetricsSnapshot, FetchError> {
        let url = cache_busted(&self.url, chrono::Utc::now().timestamp_millis());

        let resp = self.http.get(url.clone()).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                url: url.to_string(),
            });
        }

        let body = resp.bytes().await?;
        let snapshot: MetricsSnapshot = serde_json::from_slice(&body)?;

        debug!(
            bytes = body.len(),
            series = snapshot.series.len(),
            trades = snapshot.trades.len(),
            "metrics snapshot fetched"
        );

        Ok(snapshot)
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::extract::Query;
    use axum::routing::get;
    use std::collections::HashMap;
    use std::net::SocketAddr;
    use std::sync::{Arc, Mutex};

    const DOC: &str = r#"{
        "updated_at": "2025-03-01T12:34:56+00:00",
        "kpi": {"net_pnl": 1.5, "fees_total": 0.1, "win_rate": 1.0, "avg_spread_bps": 2.0,
                "trades": 1, "sharpe": 0.0, "realized_vol": 0.0, "max_drawdown": 0.0,
                "max_dd_duration": 0},
        "series": [],
        "trades": [{"t": "2025-03-01T12:00:00+00:00", "pair": "BTC-USD", "side": "long",
                    "qty": 0.01, "gross_pnl": 1.7, "fees_total": 0.1, "slippage": 0.1,
                    "net_pnl": 1.5, "hold_ms": 900}]
    }"#;

    async fn serve(router: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        addr
    }

    fn source(addr: SocketAddr, path: &str) -> HttpMetricsSource {
        let url = Url::parse(&format!("http://{addr}{path}")).unwrap();
        HttpMetricsSource::new(url, Some(Duration::from_secs(5))).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_sends_cache_buster_and_parses() {
        let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let captured = seen.clone();
        let router = Router::new().route(
            "/metrics.json",
            get(move |Query(query): Query<HashMap<String, String>>| {
                let captured = captured.clone();
                async move {
                    if let Some(v) = query.get("_") {
                        captured.lock().unwrap().push(v.clone());
                    }
                    DOC
                }
            }),
        );
        let addr = serve(router).await;

        let snapshot = source(addr, "/metrics.json").fetch().await.unwrap();

        assert_eq!(snapshot.trades.len(), 1);
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].parse::<i64>().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_fetch_rejects_error_status() {
        let addr = serve(Router::new()).await;

        let err = source(addr, "/metrics.json").fetch().await.unwrap_err();

        match err {
            FetchError::Status { status, .. } => assert_eq!(status.as_u16(), 404),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_rejects_non_json_body() {
        let router = Router::new().route("/metrics.json", get(|| async { "<html>oops</html>" }));
        let addr = serve(router).await;

        let err = source(addr, "/metrics.json").fetch().await.unwrap_err();

        assert!(matches!(err, FetchError::Parse(_)));
    }
}
