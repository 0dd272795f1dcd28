//! Recurring sync trigger.

use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::info;

use super::{SyncError, SyncService};
use crate::config::SyncConfig;

/// Start the recurring trigger: first run after `startup_delay_secs`, then
/// every `interval_hours`.
pub fn spawn(service: SyncService, config: &SyncConfig) -> JoinHandle<()> {
    let startup_delay = Duration::from_secs(config.startup_delay_secs);
    let interval = Duration::from_secs(config.interval_hours.max(1) * 3600);

    info!(
        "Sync scheduled: first run in {:?}, then every {}h",
        startup_delay,
        interval.as_secs() / 3600
    );

    tokio::spawn(async move {
        tokio::time::sleep(startup_delay).await;

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            trigger(&service);
        }
    })
}

/// Submit one scheduled run; returns false when a run was already active.
pub fn trigger(service: &SyncService) -> bool {
    match service.submit() {
        Ok(_) => {
            info!("Scheduled sync started");
            true
        }
        Err(SyncError::AlreadyRunning(status)) => {
            info!(
                "Scheduled sync skipped, run in progress ({}/{})",
                status.processed, status.total
            );
            false
        }
    }
}
