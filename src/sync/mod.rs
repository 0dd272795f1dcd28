//! Background player sync
//!
//! A single-slot job: at most one full sync runs at a time, whether started
//! from the REST API, the CLI or the scheduler.

pub mod job;
pub mod scheduler;
pub mod status;

pub use job::{run_full_sync, FullSyncOptions};
pub use status::{SyncError, SyncStatus, SyncTracker};

use std::sync::{Arc, Mutex};
use tracing::info;

use crate::scraper::HttpFetcher;
use crate::storage::PlayerRepository;

/// Submits full syncs onto the background runtime
#[derive(Clone)]
pub struct SyncService {
    tracker: Arc<SyncTracker>,
    fetcher: HttpFetcher,
    repository: Arc<Mutex<PlayerRepository>>,
    options: FullSyncOptions,
}

impl SyncService {
    pub fn new(
        fetcher: HttpFetcher,
        repository: Arc<Mutex<PlayerRepository>>,
        options: FullSyncOptions,
    ) -> Self {
        Self {
            tracker: Arc::new(SyncTracker::new()),
            fetcher,
            repository,
            options,
        }
    }

    pub fn status(&self) -> SyncStatus {
        self.tracker.snapshot()
    }

    #[cfg(test)]
    pub fn tracker(&self) -> &Arc<SyncTracker> {
        &self.tracker
    }

    /// Start a run in the background and return its initial status.
    ///
    /// Rejected with the live status while another run holds the slot.
    pub fn submit(&self) -> Result<SyncStatus, SyncError> {
        let guard = self.tracker.try_start()?;
        let accepted = self.tracker.snapshot();

        let service = self.clone();
        tokio::spawn(async move {
            run_full_sync(guard, &service.fetcher, &service.repository, &service.options).await;
        });

        info!("Sync submitted");
        Ok(accepted)
    }
}
