//! Basketball Reference API
//!
//! REST API, background sync and CLI for basketball-reference.com player and
//! team data.

mod cli;
mod client;
mod config;
mod retry;
mod routes;
mod scraper;
mod storage;
mod sync;
mod types;

use axum::{routing::get, routing::post, Router};
use clap::Parser;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};
use crate::config::AppConfig;
use crate::routes::AppState;
use crate::scraper::HttpFetcher;
use crate::storage::PlayerRepository;
use crate::sync::{FullSyncOptions, SyncService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bbref_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Serve {
            host,
            port,
            no_schedule,
        } => run_server(host, port, no_schedule).await,
        Commands::Player { player_id, format } => cli::run_player(player_id, format).await,
        Commands::Team {
            team_id,
            season,
            format,
        } => cli::run_team(team_id, season, format).await,
        Commands::Sync {
            letters,
            limit,
            batch_size,
            delay_ms,
        } => cli::run_sync(letters, limit, batch_size, delay_ms).await,
        Commands::Client { base_url, command } => cli::run_client(base_url, command).await,
    }
}

/// Build the API router.
fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/player/:player_id", get(routes::get_player))
        .route("/api/team/:team_id", get(routes::get_team))
        .route("/api/team/:team_id/:season", get(routes::get_team_season))
        .route("/api/players", get(routes::list_players))
        .route("/api/players/:player_id", get(routes::get_stored_player))
        .route(
            "/api/players/:player_id/stats",
            get(routes::get_stored_player_stats),
        )
        .route("/api/sync", post(routes::start_sync))
        .route("/api/sync/status", get(routes::sync_status))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Run the API server.
async fn run_server(
    host: Option<String>,
    port: Option<u16>,
    no_schedule: bool,
) -> anyhow::Result<()> {
    // Load configuration
    let mut config = AppConfig::load()?;

    // Override with CLI args
    if let Some(h) = host {
        config.server.host = h;
    }
    if let Some(p) = port {
        config.server.port = p;
    }
    if no_schedule {
        config.sync.schedule_enabled = false;
    }

    tracing::info!("Configuration loaded");
    tracing::info!("Database path: {}", config.database.path);

    let fetcher = HttpFetcher::new(&config.scraper)?;
    let repository = Arc::new(Mutex::new(PlayerRepository::new(Path::new(
        &config.database.path,
    ))?));
    let sync_service = SyncService::new(
        fetcher.clone(),
        repository.clone(),
        FullSyncOptions::from_config(&config.sync),
    );

    if config.sync.schedule_enabled {
        sync::scheduler::spawn(sync_service.clone(), &config.sync);
    } else {
        tracing::info!("Scheduled sync disabled");
    }

    // Create application state
    let state = Arc::new(AppState {
        fetcher,
        repository,
        sync: sync_service,
    });

    let app = router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    tracing::info!("Basketball Reference API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
