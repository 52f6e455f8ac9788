//! Background eviction of stale attempt records and expired sessions.

use crate::services::{AppMetrics, LoginGuard, SessionManager};
use std::{sync::Arc, time::Duration};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Counts from one sweep pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SweepReport {
    pub evicted_records: usize,
    pub expired_sessions: usize,
}

/// Run a single sweep over both tables and refresh gauges if available
pub fn sweep_once(
    guard: &LoginGuard,
    sessions: &SessionManager,
    metrics: Option<&AppMetrics>,
) -> SweepReport {
    let report = SweepReport {
        evicted_records: guard.sweep(),
        expired_sessions: sessions.sweep(),
    };

    if let Some(metrics) = metrics {
        metrics.set_table_sizes(guard.tracked_identifiers(), sessions.active_sessions());
    }

    if report != SweepReport::default() {
        info!(
            evicted_records = report.evicted_records,
            expired_sessions = report.expired_sessions,
            "Sweep removed stale entries"
        );
    } else {
        debug!("Sweep found nothing to remove");
    }

    report
}

/// Spawn a task sweeping every `interval` on the current Tokio runtime
pub fn spawn_sweeper(
    guard: Arc<LoginGuard>,
    sessions: Arc<SessionManager>,
    metrics: Option<Arc<AppMetrics>>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            sweep_once(&guard, &sessions, metrics.as_deref());
        }
    })
}
