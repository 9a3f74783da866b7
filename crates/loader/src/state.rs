use std::sync::Arc;
use tokio::sync::watch;
use trade_dash_domain::MetricsSnapshot;

/// What the view sees: the latest snapshot and the latest error.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    /// Last successfully applied snapshot.
    pub snapshot: Option<Arc<MetricsSnapshot>>,
    /// Description of the last failed fetch, cleared by the next success.
    pub error: Option<String>,
}

impl DashboardState {
    /// True before the first snapshot or error has been applied.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.snapshot.is_none() && self.error.is_none()
    }
}

/// Explicit state container with exactly two update entry points.
///
/// Every change is published to subscribers. Writes are last-write-wins:
/// the store has no notion of request ordering.
#[derive(Clone)]
pub struct DashboardStore {
    tx: Arc<watch::Sender<DashboardState>>,
}

impl DashboardStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(DashboardState::default());
        Self { tx: Arc::new(tx) }
    }

    /// Replaces the snapshot and clears the error.
    pub fn apply_snapshot(&self, snapshot: MetricsSnapshot) -> Arc<MetricsSnapshot> {
        let snapshot = Arc::new(snapshot);
        let applied = snapshot.clone();
        self.tx.send_modify(|state| {
            state.snapshot = Some(snapshot);
            state.error = None;
        });
        applied
    }

    /// Records an error, keeping whatever snapshot is already held.
    pub fn apply_error(&self, message: impl Into<String>) {
        let message = message.into();
        self.tx.send_modify(|state| state.error = Some(message));
    }

    /// Returns a copy of the current state.
    #[must_use]
    pub fn current(&self) -> DashboardState {
        self.tx.borrow().clone()
    }

    /// Returns the current snapshot, if any.
    #[must_use]
    pub fn snapshot(&self) -> Option<Arc<MetricsSnapshot>> {
        self.tx.borrow().snapshot.clone()
    }

    /// Returns the last error, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.tx.borrow().error.clone()
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.tx.subscribe()
    }
}

impl Default for DashboardStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn snapshot_with_pnl(net_pnl: f64) -> MetricsSnapshot {
        let doc = format!(
            r#"{{"updated_at": "2025-03-01T12:34:56+00:00", "kpi": {{
                "net_pnl": {net_pnl}, "fees_total": 0, "win_rate": 0, "avg_spread_bps": 0,
                "trades": 0, "sharpe": 0, "realized_vol": 0, "max_drawdown": 0,
                "max_dd_duration": 0}}}}"#
        );
        serde_json::from_str(&doc).unwrap()
    }

    fn pnl(state: &DashboardState) -> Option<f64> {
        state.snapshot.as_ref().and_then(|s| s.kpi.net_pnl.as_f64())
    }

    #[test]
    fn test_store_starts_loading() {
        let store = DashboardStore::new();
        assert!(store.current().is_loading());
    }

    #[test]
    fn test_apply_snapshot_clears_error() {
        let store = DashboardStore::new();
        store.apply_error("boom");
        store.apply_snapshot(snapshot_with_pnl(1.0));

        let state = store.current();
        assert_eq!(state.error, None);
        assert_eq!(pnl(&state), Some(1.0));
    }

    #[test]
    fn test_apply_error_keeps_stale_snapshot() {
        let store = DashboardStore::new();
        store.apply_snapshot(snapshot_with_pnl(2.0));
        store.apply_error("connection refused");

        let state = store.current();
        assert_eq!(state.error.as_deref(), Some("connection refused"));
        assert_eq!(pnl(&state), Some(2.0));
        assert!(!state.is_loading());
    }

    #[test]
    fn test_new_snapshot_replaces_old_one() {
        let store = DashboardStore::new();
        let first = store.apply_snapshot(snapshot_with_pnl(1.0));
        let second = store.apply_snapshot(snapshot_with_pnl(2.0));

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first.kpi.net_pnl.as_f64(), Some(1.0));
        assert!(Arc::ptr_eq(&store.snapshot().unwrap(), &second));
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let store = DashboardStore::new();
        let mut rx = store.subscribe();

        store.apply_snapshot(snapshot_with_pnl(3.0));

        rx.changed().await.unwrap();
        assert_eq!(pnl(&rx.borrow_and_update()), Some(3.0));
    }
}
