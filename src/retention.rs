// Background retention sweep: removes confessions past the retention window.
//
// One sweep runs as soon as the task starts, then one per interval tick.
// The clock lives in the service, so tests drive expiry with a ManualClock
// and call `run_sweep` directly instead of waiting on the timer.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error};

use crate::service::ConfessionService;

/// Default time between sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Live status of the sweeper, exposed via GET /api/admin/status.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepStatus {
    /// When the last sweep finished.
    pub last_run_at: Option<DateTime<Utc>>,
    /// Confessions removed by the last sweep.
    pub last_removed: usize,
    /// Confessions removed since the process started.
    pub total_removed: usize,
    /// Error from the last sweep, if it failed.
    pub last_error: Option<String>,
}

/// Run a single sweep and record the outcome.
pub async fn run_sweep(service: &ConfessionService, status: &RwLock<SweepStatus>) {
    let result = service.sweep_expired().await;
    let mut status = status.write().await;
    status.last_run_at = Some(Utc::now());
    match result {
        Ok(removed) => {
            debug!(removed, "Retention sweep finished");
            status.last_removed = removed;
            status.total_removed += removed;
            status.last_error = None;
        }
        Err(e) => {
            error!(error = %e, "Retention sweep failed");
            status.last_removed = 0;
            status.last_error = Some(e.to_string());
        }
    }
}

/// Launch the recurring sweep in a background tokio task.
/// Abort the returned handle to stop it.
pub fn spawn_retention_sweeper(
    service: Arc<ConfessionService>,
    status: Arc<RwLock<SweepStatus>>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // A stalled runtime shouldn't trigger a burst of catch-up sweeps.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            run_sweep(&service, &status).await;
        }
    })
}
