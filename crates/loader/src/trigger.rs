//! Refresh event sources.
//!
//! What triggers a reload is decoupled from how a reload is performed: any
//! number of [`RefreshTrigger`] handles feed one [`RefreshEvents`] stream
//! that the loader consumes.

use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, info};

/// Shortest allowed auto-refresh period.
pub const MIN_AUTO_REFRESH: Duration = Duration::from_secs(5);
/// Longest allowed auto-refresh period.
pub const MAX_AUTO_REFRESH: Duration = Duration::from_secs(300);

/// Why a refresh was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshReason {
    /// Automatic load when the dashboard starts.
    Startup,
    /// Explicit user action.
    Manual,
    /// Opt-in periodic refresh.
    Interval,
}

/// A request to reload the snapshot.
#[derive(Debug, Clone)]
pub struct RefreshEvent {
    /// Reason.
    pub reason: RefreshReason,
    /// When the request was made.
    pub requested_at: DateTime<Utc>,
}

impl RefreshEvent {
    /// Creates an event stamped with the current time.
    pub fn now(reason: RefreshReason) -> Self {
        Self {
            reason,
            requested_at: Utc::now(),
        }
    }
}

/// Handle used to request refreshes.
#[derive(Debug, Clone)]
pub struct RefreshTrigger {
    tx: mpsc::Sender<RefreshEvent>,
}

impl RefreshTrigger {
    /// Requests a refresh. Returns `false` once the loader has gone away.
    pub async fn request(&self, reason: RefreshReason) -> bool {
        self.tx.send(RefreshEvent::now(reason)).await.is_ok()
    }

    /// Requests a manual refresh.
    pub async fn manual(&self) -> bool {
        self.request(RefreshReason::Manual).await
    }

    /// Checks if the consuming side has been dropped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Stream of refresh requests consumed by the loader.
#[derive(Debug)]
pub struct RefreshEvents {
    rx: mpsc::Receiver<RefreshEvent>,
}

impl RefreshEvents {
    /// Waits for the next request; `None` once every trigger is dropped.
    pub async fn recv(&mut self) -> Option<RefreshEvent> {
        self.rx.recv().await
    }
}

/// Creates a connected trigger / event stream pair.
pub fn refresh_channel() -> (RefreshTrigger, RefreshEvents) {
    let (tx, rx) = mpsc::channel(64);
    (RefreshTrigger { tx }, RefreshEvents { rx })
}

/// Clamps an auto-refresh period to the supported range.
#[must_use]
pub fn clamp_auto_refresh(every: Duration) -> Duration {
    every.clamp(MIN_AUTO_REFRESH, MAX_AUTO_REFRESH)
}

/// Emits [`RefreshReason::Interval`] events every `every` (clamped).
///
/// The first event fires one period after start; the startup load already
/// covers time zero. The task ends when the loader stops listening.
pub fn spawn_interval_trigger(trigger: RefreshTrigger, every: Duration) -> JoinHandle<()> {
    let period = clamp_auto_refresh(every);

    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(every_secs = period.as_secs(), "auto-refresh started");

        loop {
            ticker.tick().await;
            if !trigger.request(RefreshReason::Interval).await {
                debug!("refresh stream closed, stopping auto-refresh");
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_auto_refresh() {
        assert_eq!(clamp_auto_refresh(Duration::from_secs(1)), MIN_AUTO_REFRESH);
        assert_eq!(clamp_auto_refresh(Duration::from_secs(15)), Duration::from_secs(15));
        assert_eq!(clamp_auto_refresh(Duration::from_secs(3600)), MAX_AUTO_REFRESH);
    }

    #[tokio::test]
    async fn test_manual_trigger_delivers_event() {
        let (trigger, mut events) = refresh_channel();

        assert!(trigger.manual().await);

        let event = events.recv().await.unwrap();
        assert_eq!(event.reason, RefreshReason::Manual);
    }

    #[tokio::test]
    async fn test_events_end_when_triggers_dropped() {
        let (trigger, mut events) = refresh_channel();
        let other = trigger.clone();
        drop(trigger);
        drop(other);

        assert!(events.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_trigger_reports_closed_stream() {
        let (trigger, events) = refresh_channel();
        drop(events);

        assert!(trigger.is_closed());
        assert!(!trigger.manual().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_trigger_waits_one_period() {
        let (trigger, mut events) = refresh_channel();
        let started = Instant::now();
        let handle = spawn_interval_trigger(trigger, Duration::from_secs(10));

        let first = events.recv().await.unwrap();
        assert_eq!(first.reason, RefreshReason::Interval);
        assert!(started.elapsed() >= Duration::from_secs(10));

        let second = events.recv().await.unwrap();
        assert_eq!(second.reason, RefreshReason::Interval);
        assert!(started.elapsed() >= Duration::from_secs(20));

        drop(events);
        handle.await.unwrap();
    }
}
