//! API request/response types.

use serde::{Deserialize, Serialize};

use crate::storage::StoredPlayer;
use crate::sync::SyncStatus;

/// Default page size for stored player listings
pub const DEFAULT_PLAYERS_LIMIT: u32 = 5000;

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub version: String,
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Query string for `/api/players`.
#[derive(Debug, Default, Deserialize)]
pub struct PlayersQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// One page of stored players.
#[derive(Debug, Serialize, Deserialize)]
pub struct PlayersResponse {
    pub players: Vec<StoredPlayer>,
    pub total: u64,
    pub limit: u32,
    pub offset: u32,
}

/// Body of a rejected sync start.
#[derive(Debug, Serialize)]
pub struct SyncConflictResponse {
    pub error: String,
    pub message: String,
    pub status: SyncStatus,
}
