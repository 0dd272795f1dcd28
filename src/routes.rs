//! API route handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Local;
use std::sync::{Arc, Mutex};
use tracing::{error, info};

use crate::scraper::parsers::{PlayerParser, PlayerRecord, SeasonStatRow, TeamParser, TeamRecord};
use crate::scraper::{current_season, player_url, team_url, HttpFetcher, ScrapeError};
use crate::storage::{PlayerRepository, StoredPlayer};
use crate::sync::{SyncError, SyncService, SyncStatus};
use crate::types::{
    ErrorResponse, HealthResponse, PlayersQuery, PlayersResponse, SyncConflictResponse,
    DEFAULT_PLAYERS_LIMIT,
};

/// Application state shared across handlers.
pub struct AppState {
    pub fetcher: HttpFetcher,
    pub repository: Arc<Mutex<PlayerRepository>>,
    pub sync: SyncService,
}

/// Error type for API handlers.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.into(),
        }
    }

    pub fn bad_gateway(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.into(),
        }
    }
}

impl From<ScrapeError> for ApiError {
    fn from(e: ScrapeError) -> Self {
        error!("Upstream fetch failed: {}", e);
        Self::bad_gateway(e.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        error!("Storage error: {:#}", e);
        Self::internal(format!("{:#}", e))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.status.to_string(),
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

fn with_repository<T>(
    state: &AppState,
    f: impl FnOnce(&PlayerRepository) -> anyhow::Result<T>,
) -> Result<T, ApiError> {
    let repo = state
        .repository
        .lock()
        .map_err(|_| ApiError::internal("player repository lock poisoned"))?;
    Ok(f(&repo)?)
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Scrape one player page live.
pub async fn get_player(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<String>,
) -> Result<Json<PlayerRecord>, ApiError> {
    let html = state.fetcher.fetch_html(&player_url(&player_id)).await?;
    Ok(Json(PlayerParser::parse(&html, &player_id)))
}

/// Scrape one team page live for the current season.
pub async fn get_team(
    State(state): State<Arc<AppState>>,
    Path(team_id): Path<String>,
) -> Result<Json<TeamRecord>, ApiError> {
    let season = current_season(Local::now().date_naive());
    fetch_team(&state, &team_id, &season).await
}

/// Scrape one team page live for a given season.
pub async fn get_team_season(
    State(state): State<Arc<AppState>>,
    Path((team_id, season)): Path<(String, String)>,
) -> Result<Json<TeamRecord>, ApiError> {
    fetch_team(&state, &team_id, &season).await
}

async fn fetch_team(
    state: &AppState,
    team_id: &str,
    season: &str,
) -> Result<Json<TeamRecord>, ApiError> {
    let team_id = team_id.to_uppercase();
    let html = state.fetcher.fetch_html(&team_url(&team_id, season)).await?;
    Ok(Json(TeamParser::parse(&html, &team_id, season)))
}

/// List synced players.
pub async fn list_players(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PlayersQuery>,
) -> Result<Json<PlayersResponse>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_PLAYERS_LIMIT);
    let offset = query.offset.unwrap_or(0);

    let (players, total) = with_repository(&state, |repo| {
        Ok((repo.get_players(limit, offset)?, repo.count_players()?))
    })?;

    Ok(Json(PlayersResponse {
        players,
        total,
        limit,
        offset,
    }))
}

/// Get one synced player.
pub async fn get_stored_player(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<String>,
) -> Result<Json<StoredPlayer>, ApiError> {
    with_repository(&state, |repo| repo.get_player(&player_id))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Player not found: {}", player_id)))
}

/// Get a synced player's season rows.
pub async fn get_stored_player_stats(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<String>,
) -> Result<Json<Vec<SeasonStatRow>>, ApiError> {
    let stats = with_repository(&state, |repo| repo.get_player_stats(&player_id))?;
    Ok(Json(stats))
}

/// Start a background sync; 409 with the live status if one is running.
pub async fn start_sync(State(state): State<Arc<AppState>>) -> Response {
    match state.sync.submit() {
        Ok(status) => {
            info!("Sync started via API");
            (StatusCode::ACCEPTED, Json(status)).into_response()
        }
        Err(SyncError::AlreadyRunning(status)) => {
            let body = SyncConflictResponse {
                error: StatusCode::CONFLICT.to_string(),
                message: "Sync already running".to_string(),
                status,
            };
            (StatusCode::CONFLICT, Json(body)).into_response()
        }
    }
}

/// Current sync status.
pub async fn sync_status(State(state): State<Arc<AppState>>) -> Json<SyncStatus> {
    Json(state.sync.status())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScraperConfig;
    use crate::sync::FullSyncOptions;

    fn test_state() -> Arc<AppState> {
        let fetcher = HttpFetcher::new(&ScraperConfig::default()).unwrap();
        let repository = Arc::new(Mutex::new(PlayerRepository::in_memory().unwrap()));
        let sync = SyncService::new(
            fetcher.clone(),
            repository.clone(),
            FullSyncOptions::default(),
        );
        Arc::new(AppState {
            fetcher,
            repository,
            sync,
        })
    }

    fn seed_player(state: &AppState, player_id: &str, name: &str) {
        let record = PlayerRecord {
            player_id: player_id.to_string(),
            name: name.to_string(),
            url: player_url(player_id),
            ..Default::default()
        };
        state
            .repository
            .lock()
            .unwrap()
            .upsert_player(&record)
            .unwrap();
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let Json(body) = health().await;
        assert!(body.ok);
        assert!(!body.version.is_empty());
    }

    #[tokio::test]
    async fn test_list_players_defaults() {
        let state = test_state();
        seed_player(&state, "jamesle01", "LeBron James");
        seed_player(&state, "curryst01", "Stephen Curry");

        let Json(page) = list_players(State(state), Query(PlayersQuery::default()))
            .await
            .unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.limit, 5000);
        assert_eq!(page.offset, 0);
        assert_eq!(page.players[0].player_id, "jamesle01");
    }

    #[tokio::test]
    async fn test_stored_player_not_found() {
        let state = test_state();
        let err = get_stored_player(State(state), Path("nobody01".to_string()))
            .await
            .unwrap_err();

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Player not found: nobody01");
    }

    #[tokio::test]
    async fn test_stored_player_found() {
        let state = test_state();
        seed_player(&state, "jamesle01", "LeBron James");

        let Json(player) = get_stored_player(State(state.clone()), Path("jamesle01".to_string()))
            .await
            .unwrap();
        assert_eq!(player.name.as_deref(), Some("LeBron James"));

        let Json(stats) = get_stored_player_stats(State(state), Path("jamesle01".to_string()))
            .await
            .unwrap();
        assert!(stats.is_empty());
    }

    #[tokio::test]
    async fn test_start_sync_conflict() {
        let state = test_state();
        let guard = state.sync.tracker().try_start().unwrap();
        guard.begin_syncing(40);

        let response = start_sync(State(state.clone())).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = body_json(response).await;
        assert_eq!(body["status"]["running"], true);
        assert_eq!(body["status"]["total"], 40);
        assert_eq!(body["status"]["phase"], "syncing");

        let Json(status) = sync_status(State(state)).await;
        assert!(status.running);
        assert_eq!(status.total, 40);
    }

    #[test]
    fn test_scrape_error_maps_to_bad_gateway() {
        let err = ApiError::from(ScrapeError::Status {
            status: StatusCode::NOT_FOUND,
            url: player_url("nobody01"),
        });
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}
