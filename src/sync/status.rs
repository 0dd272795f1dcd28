//! Sync run status: one owned tracker, one writer, many readers.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;

use super::job::SyncProgress;

/// Where a sync run currently is
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPhase {
    #[default]
    Idle,
    FetchingIndex,
    Syncing,
}

/// Point-in-time view of the sync job
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SyncStatus {
    pub running: bool,
    pub phase: SyncPhase,
    pub processed: usize,
    pub total: usize,
    pub errors: usize,
    pub message: String,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Error)]
pub enum SyncError {
    /// A run is already active; carries its status at the time of the attempt
    #[error("sync already running: {}", .0.message)]
    AlreadyRunning(SyncStatus),
}

/// Owns the current [`SyncStatus`].
///
/// Only the holder of a [`SyncGuard`] writes; anyone may take a snapshot.
#[derive(Debug, Default)]
pub struct SyncTracker {
    status: RwLock<SyncStatus>,
}

impl SyncTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current status
    pub fn snapshot(&self) -> SyncStatus {
        self.read().clone()
    }

    /// Claim the single run slot.
    ///
    /// The check and the claim happen under one write lock, so two callers
    /// can never both start. A rejected caller gets the live status and the
    /// running job's counters are left untouched.
    pub fn try_start(self: &Arc<Self>) -> Result<SyncGuard, SyncError> {
        let mut status = self.write();
        if status.running {
            return Err(SyncError::AlreadyRunning(status.clone()));
        }

        *status = SyncStatus {
            running: true,
            phase: SyncPhase::FetchingIndex,
            message: "Sync started".to_string(),
            started_at: Some(Utc::now()),
            ..SyncStatus::default()
        };

        Ok(SyncGuard {
            tracker: Arc::clone(self),
            finished: false,
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, SyncStatus> {
        self.status.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, SyncStatus> {
        self.status.write().unwrap_or_else(|e| e.into_inner())
    }
}

/// Write handle for the active run. Dropping it always returns the tracker
/// to idle, including when the run panics or its task is cancelled.
#[derive(Debug)]
pub struct SyncGuard {
    tracker: Arc<SyncTracker>,
    finished: bool,
}

impl SyncGuard {
    pub fn set_message(&self, message: impl Into<String>) {
        self.tracker.write().message = message.into();
    }

    /// Index collected; start the per-player phase
    pub fn begin_syncing(&self, total: usize) {
        let mut status = self.tracker.write();
        status.phase = SyncPhase::Syncing;
        status.total = total;
        status.message = format!("Syncing {} players", total);
    }

    /// Record cumulative batch progress
    pub fn record_progress(&self, progress: SyncProgress) {
        let mut status = self.tracker.write();
        status.processed = progress.processed;
        status.total = progress.total;
        status.errors = progress.errors;
        status.message = format!(
            "Processed {}/{} players ({} errors)",
            progress.processed, progress.total, progress.errors
        );
    }

    /// End the run with a final message
    pub fn finish(mut self, message: impl Into<String>) {
        self.set_message(message);
        self.finished = true;
    }
}

impl Drop for SyncGuard {
    fn drop(&mut self) {
        let mut status = self.tracker.write();
        status.running = false;
        status.phase = SyncPhase::Idle;
        status.finished_at = Some(Utc::now());
        if !self.finished {
            status.message = format!(
                "Sync aborted after {}/{} players",
                status.processed, status.total
            );
        }
    }
}
