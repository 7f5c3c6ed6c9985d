//! Periodic expiry of idle sessions.
//!
//! A session whose table has not been touched for longer than the idle
//! timeout is discarded, exactly as if the user had ended it.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use crate::sessions::SessionStore;

/// Run the idle-session sweep loop until `cancel` is triggered.
pub async fn run(
    sessions: Arc<SessionStore>,
    idle_timeout: Duration,
    interval: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(
        idle_timeout_secs = idle_timeout.as_secs(),
        interval_secs = interval.as_secs(),
        "Session sweeper started"
    );

    let idle = chrono::Duration::from_std(idle_timeout)
        .unwrap_or_else(|_| chrono::Duration::days(36_500));
    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Session sweeper stopping");
                break;
            }
            _ = ticker.tick() => {
                let cutoff = Utc::now()
                    .checked_sub_signed(idle)
                    .unwrap_or(chrono::DateTime::<Utc>::MIN_UTC);
                let purged = sessions.purge_idle(cutoff).await;
                if purged > 0 {
                    tracing::info!(purged, "Session sweeper: discarded idle sessions");
                } else {
                    tracing::debug!("Session sweeper: nothing to discard");
                }
            }
        }
    }
}
