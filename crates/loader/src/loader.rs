use crate::state::DashboardStore;
use crate::trigger::{RefreshEvents, RefreshReason};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{Instrument, debug, info, info_span, warn};
use trade_dash_data::{FetchError, MetricsSource};
use trade_dash_domain::MetricsSnapshot;
use uuid::Uuid;

/// Notified after every successfully applied snapshot.
///
/// Used for side effects that live outside the main render tree, such as the
/// "Updated HH:MM:SS" status line.
pub trait SnapshotObserver: Send + Sync {
    /// Called with the snapshot that was just applied.
    fn snapshot_applied(&self, snapshot: &MetricsSnapshot);
}

/// Turns refresh requests into fetches and applies their outcome.
pub struct MetricsLoader {
    /// Where snapshots come from.
    source: Arc<dyn MetricsSource>,
    /// Shared dashboard state.
    store: DashboardStore,
    /// Side-effect observers.
    observers: Vec<Arc<dyn SnapshotObserver>>,
}

impl MetricsLoader {
    /// Creates a loader writing into `store`.
    pub fn new(source: Arc<dyn MetricsSource>, store: DashboardStore) -> Self {
        Self {
            source,
            store,
            observers: Vec::new(),
        }
    }

    /// Registers an observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn SnapshotObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Returns the state container.
    #[must_use]
    pub fn store(&self) -> &DashboardStore {
        &self.store
    }

    /// Performs one fetch and applies the result.
    ///
    /// On success the snapshot replaces the current one and the error is
    /// cleared. On failure the error message is recorded and the previous
    /// snapshot stays visible. Concurrent calls are not coordinated.
    ///
    /// # Errors
    /// Returns the fetch error after it has been recorded in the store.
    pub async fn reload(&self) -> Result<Arc<MetricsSnapshot>, FetchError> {
        match self.source.fetch().await {
            Ok(snapshot) => {
                if !snapshot.is_time_ordered() {
                    warn!("snapshot series or trades are not in time order");
                }

                let applied = self.store.apply_snapshot(snapshot);
                for observer in &self.observers {
                    observer.snapshot_applied(&applied);
                }

                info!(
                    updated_at = %applied.updated_at,
                    series = applied.series.len(),
                    trades = applied.trades.len(),
                    "snapshot applied"
                );
                Ok(applied)
            }
            Err(e) => {
                warn!(error = %e, "snapshot fetch failed");
                self.store.apply_error(e.to_string());
                Err(e)
            }
        }
    }

    /// Reloads once at start, then once per refresh event.
    ///
    /// Each event gets its own task, so a slow fetch never delays the next
    /// request. Returns after the event stream closes and in-flight reloads
    /// have finished.
    pub async fn run(self: Arc<Self>, mut events: RefreshEvents) {
        let mut in_flight = JoinSet::new();

        info!(source = %self.source.describe(), "metrics loader started");
        self.spawn_reload(&mut in_flight, RefreshReason::Startup);

        while let Some(event) = events.recv().await {
            while in_flight.try_join_next().is_some() {}

            debug!(
                reason = ?event.reason,
                requested_at = %event.requested_at,
                in_flight = in_flight.len(),
                "refresh requested"
            );
            self.spawn_reload(&mut in_flight, event.reason);
        }

        while in_flight.join_next().await.is_some() {}
        info!("metrics loader stopped");
    }

    fn spawn_reload(self: &Arc<Self>, in_flight: &mut JoinSet<()>, reason: RefreshReason) {
        let span = info_span!("reload", reload_id = %Uuid::new_v4(), reason = ?reason);
        let loader = Arc::clone(self);
        in_flight.spawn(
            async move {
                // outcome already recorded in the store
                let _ = loader.reload().await;
            }
            .instrument(span),
        );
    }
}
