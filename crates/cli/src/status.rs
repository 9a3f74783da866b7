use std::io::{self, Write};
use std::sync::Mutex;
use tracing::debug;
use trade_dash_domain::MetricsSnapshot;
use trade_dash_loader::{DashboardState, SnapshotObserver};
use trade_dash_view::updated_label;

/// "Updated HH:MM:SS" line printed above a frame.
///
/// Taken from the state being drawn, so the label always belongs to the same
/// snapshot as the body. A failed fetch keeps the last successful time.
pub fn frame_label(state: &DashboardState) -> Option<String> {
    state.snapshot.as_deref().map(updated_label)
}

/// Mirrors the last-updated time into the terminal window title.
pub struct WindowTitle<W> {
    out: Mutex<W>,
}

impl WindowTitle<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> WindowTitle<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }
}

impl<W: Write + Send> SnapshotObserver for WindowTitle<W> {
    fn snapshot_applied(&self, snapshot: &MetricsSnapshot) {
        let Ok(mut out) = self.out.lock() else {
            return;
        };
        let written = write!(out, "\x1b]0;trade-dash: {}\x07", updated_label(snapshot))
            .and_then(|()| out.flush());
        if let Err(e) = written {
            debug!(error = %e, "failed to set window title");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use trade_dash_loader::DashboardStore;

    fn snapshot_at(updated_at: &str) -> MetricsSnapshot {
        serde_json::from_str(&format!(
            r#"{{"updated_at": "{updated_at}", "kpi": {{
                "net_pnl": 0, "fees_total": 0, "win_rate": 0, "avg_spread_bps": 0,
                "trades": 0, "sharpe": 0, "realized_vol": 0, "max_drawdown": 0,
                "max_dd_duration": 0}}}}"#
        ))
        .unwrap()
    }

    #[test]
    fn test_frame_label_follows_drawn_snapshot() {
        let store = DashboardStore::new();
        let mut changes = store.subscribe();
        assert_eq!(frame_label(&changes.borrow_and_update()), None);

        store.apply_snapshot(snapshot_at("2025-03-01T18:04:09+00:00"));
        let first = changes.borrow_and_update().clone();
        store.apply_snapshot(snapshot_at("2025-03-01T18:05:30+00:00"));
        let second = changes.borrow_and_update().clone();

        assert_eq!(frame_label(&first).as_deref(), Some("Updated 18:04:09"));
        assert_eq!(frame_label(&second).as_deref(), Some("Updated 18:05:30"));
    }

    #[test]
    fn test_frame_label_survives_failed_fetch() {
        let store = DashboardStore::new();
        store.apply_snapshot(snapshot_at("2025-03-01T18:04:09+00:00"));
        store.apply_error("connection refused");

        assert_eq!(
            frame_label(&store.current()).as_deref(),
            Some("Updated 18:04:09")
        );
    }

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_window_title_tracks_updated_at() {
        let buf = SharedBuf::default();
        let title = WindowTitle::new(buf.clone());

        title.snapshot_applied(&snapshot_at("2025-03-01T18:04:09+00:00"));

        let written = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert_eq!(written, "\x1b]0;trade-dash: Updated 18:04:09\x07");
    }
}
