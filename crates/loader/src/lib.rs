//! Metrics loader: owns the dashboard state and keeps it fresh.
//!
//! This crate provides:
//! - `DashboardStore`, the explicit state container (`snapshot`, `error`)
//! - `MetricsLoader`, which turns refresh events into fetches
//! - `RefreshTrigger`, the event source for manual and timed refreshes
//!
//! Overlapping reloads are not serialised: whichever resolves last wins.

/// Reload orchestration.
pub mod loader;
/// State container.
pub mod state;
/// Refresh event sources.
pub mod trigger;

pub use loader::{MetricsLoader, SnapshotObserver};
pub use state::{DashboardState, DashboardStore};
pub use trigger::{
    RefreshEvent, RefreshEvents, RefreshReason, RefreshTrigger, clamp_auto_refresh,
    refresh_channel, spawn_interval_trigger,
};
