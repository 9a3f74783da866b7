//! Data model for trading-performance metrics snapshots.
//!
//! A snapshot is the whole `metrics.json` document produced upstream:
//! - headline KPIs
//! - a time series of spread, P&L and risk figures
//! - the recent trades the series was computed from
//!
//! Snapshots are immutable once parsed; a refresh replaces them wholesale.

/// Scalar KPI values.
pub mod metric;
/// Snapshot document types.
pub mod snapshot;

pub use metric::Metric;
pub use snapshot::{Kpi, MetricsSnapshot, SeriesPoint, Trade};
