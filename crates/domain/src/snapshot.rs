use crate::metric::Metric;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// One fetched copy of the full metrics document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// When the producer wrote the document.
    pub updated_at: DateTime<FixedOffset>,
    /// Headline figures.
    pub kpi: Kpi,
    /// Per-trade series, ascending in time.
    #[serde(default)]
    pub series: Vec<SeriesPoint>,
    /// Recent trades, ascending in time.
    #[serde(default)]
    pub trades: Vec<Trade>,
}

impl MetricsSnapshot {
    /// Returns the last `n` trades (all of them when fewer exist), oldest first.
    #[must_use]
    pub fn tail_trades(&self, n: usize) -> &[Trade] {
        let start = self.trades.len().saturating_sub(n);
        &self.trades[start..]
    }

    /// Checks that both `series` and `trades` are non-decreasing in time.
    #[must_use]
    pub fn is_time_ordered(&self) -> bool {
        self.series.windows(2).all(|w| w[0].t <= w[1].t)
            && self.trades.windows(2).all(|w| w[0].t <= w[1].t)
    }
}

/// Headline KPIs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Kpi {
    /// Net P&L after fees.
    pub net_pnl: Metric,
    /// Sum of fees paid.
    pub fees_total: Metric,
    /// Fraction of trades with positive net P&L (0..=1).
    pub win_rate: Metric,
    /// Average quoted spread in basis points.
    pub avg_spread_bps: Metric,
    /// Number of trades.
    pub trades: Metric,
    /// Naive per-trade Sharpe ratio.
    pub sharpe: Metric,
    /// Realized volatility of per-trade net P&L.
    pub realized_vol: Metric,
    /// Largest peak-to-trough decline of cumulative P&L.
    pub max_drawdown: Metric,
    /// Duration of the largest drawdown in seconds.
    pub max_dd_duration: Metric,
}

/// A point of the per-trade time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub t: DateTime<FixedOffset>,
    pub spread_bps: f64,
    pub net_pnl: f64,
    pub cum_pnl: f64,
    pub roll_vol: f64,
    pub drawdown: f64,
}

/// A completed trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Producer-assigned sequence number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub t: DateTime<FixedOffset>,
    pub pair: String,
    pub side: String,
    pub qty: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spread_bps: Option<f64>,
    pub gross_pnl: f64,
    pub fees_total: f64,
    pub slippage: f64,
    pub net_pnl: f64,
    /// Holding time in milliseconds.
    pub hold_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "updated_at": "2025-03-01T12:34:56+00:00",
        "kpi": {
            "net_pnl": 12.5, "fees_total": 1.25, "win_rate": 0.6,
            "avg_spread_bps": 3.2, "trades": 2, "sharpe": "n/a",
            "realized_vol": 0.01, "max_drawdown": -4.0, "max_dd_duration": 0
        },
        "series": [
            {"t": "2025-03-01T12:00:00+00:00", "spread_bps": 3.0, "net_pnl": 5.0,
             "cum_pnl": 5.0, "roll_vol": 0.0, "drawdown": 0.0},
            {"t": "2025-03-01T12:05:00+00:00", "spread_bps": 3.4, "net_pnl": 7.5,
             "cum_pnl": 12.5, "roll_vol": 1.7, "drawdown": 0.0}
        ],
        "trades": [
            {"id": 1, "t": "2025-03-01T12:00:00+00:00", "pair": "BTC-USD", "side": "long",
             "qty": 0.01, "spread_bps": 3.0, "gross_pnl": 6.0, "fees_total": 0.5,
             "slippage": 0.5, "net_pnl": 5.0, "hold_ms": 1200},
            {"t": "2025-03-01T12:05:00+00:00", "pair": "ETH-USD", "side": "short",
             "qty": 0.2, "gross_pnl": 8.25, "fees_total": 0.75,
             "slippage": 0.0, "net_pnl": 7.5, "hold_ms": 800}
        ]
    }"#;

    #[test]
    fn test_snapshot_parses_producer_document() {
        let snapshot: MetricsSnapshot = serde_json::from_str(DOC).unwrap();

        assert_eq!(snapshot.series.len(), 2);
        assert_eq!(snapshot.trades.len(), 2);
        assert_eq!(snapshot.trades[0].id, Some(1));
        assert_eq!(snapshot.trades[1].id, None);
        assert_eq!(snapshot.kpi.sharpe, Metric::from("n/a"));
        assert_eq!(snapshot.kpi.trades.as_f64(), Some(2.0));
        assert!(snapshot.is_time_ordered());
    }

    #[test]
    fn test_snapshot_defaults_missing_collections() {
        let doc = r#"{"updated_at": "2025-03-01T12:34:56Z", "kpi": {
            "net_pnl": 0, "fees_total": 0, "win_rate": 0, "avg_spread_bps": 0, "trades": 0,
            "sharpe": 0, "realized_vol": 0, "max_drawdown": 0, "max_dd_duration": 0}}"#;
        let snapshot: MetricsSnapshot = serde_json::from_str(doc).unwrap();

        assert!(snapshot.series.is_empty());
        assert!(snapshot.trades.is_empty());
        assert!(snapshot.tail_trades(50).is_empty());
    }

    #[test]
    fn test_tail_trades() {
        let snapshot: MetricsSnapshot = serde_json::from_str(DOC).unwrap();

        assert_eq!(snapshot.tail_trades(1).len(), 1);
        assert_eq!(snapshot.tail_trades(1)[0].pair, "ETH-USD");
        assert_eq!(snapshot.tail_trades(50).len(), 2);
    }

    #[test]
    fn test_detects_out_of_order_trades() {
        let mut snapshot: MetricsSnapshot = serde_json::from_str(DOC).unwrap();
        snapshot.trades.reverse();

        assert!(!snapshot.is_time_ordered());
    }
}
