//! Full player sync: enumerate ids from the a-z index pages, then fetch,
//! parse and persist every player page in paced batches.

use serde::Serialize;
use std::fmt::Display;
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::status::SyncGuard;
use crate::config::SyncConfig;
use crate::scraper::parsers::{IndexEntry, PlayerParser, PlayerRecord, PlayersIndexParser};
use crate::scraper::{player_url, players_index_url, HttpFetcher, RateLimiter};
use crate::storage::{PlayerRepository, UpsertOutcome};

/// Index pages, one per surname initial
pub const LETTERS: &str = "abcdefghijklmnopqrstuvwxyz";

/// Cumulative progress reported after each batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncProgress {
    pub processed: usize,
    pub total: usize,
    pub errors: usize,
}

/// Final counters of a batch sync
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    pub processed: usize,
    pub errors: usize,
}

#[derive(Debug, Clone)]
pub struct IndexOptions {
    pub letters: Vec<char>,
    /// Pause between consecutive letter fetches
    pub delay: Duration,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            letters: LETTERS.chars().collect(),
            delay: Duration::from_millis(1500),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub batch_size: usize,
    /// Pause between consecutive player fetches
    pub delay: Duration,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            batch_size: 20,
            delay: Duration::from_millis(2000),
        }
    }
}

/// Everything a full run needs besides its collaborators
#[derive(Debug, Clone, Default)]
pub struct FullSyncOptions {
    pub index: IndexOptions,
    pub batch: BatchOptions,
    /// Only sync the first N ids from the index
    pub limit: Option<usize>,
}

impl FullSyncOptions {
    pub fn from_config(config: &SyncConfig) -> Self {
        Self {
            index: IndexOptions {
                letters: LETTERS.chars().collect(),
                delay: Duration::from_millis(config.index_delay_ms),
            },
            batch: BatchOptions {
                batch_size: config.batch_size,
                delay: Duration::from_millis(config.delay_ms),
            },
            limit: None,
        }
    }
}

/// Fetch every index page and concatenate the entries.
///
/// A failed letter is logged and skipped; it never aborts the walk.
pub async fn get_all_player_ids_from_index<F, Fut, E, P>(
    fetch_html: F,
    parse_index: P,
    options: &IndexOptions,
) -> Vec<IndexEntry>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<String, E>>,
    E: Display,
    P: Fn(&str, char) -> Vec<IndexEntry>,
{
    let limiter = RateLimiter::new(options.delay);
    let mut all = Vec::new();
    info!(
        "Fetching {} index pages, {:?} apart",
        options.letters.len(),
        limiter.interval()
    );

    for &letter in &options.letters {
        limiter.acquire().await;

        match fetch_html(players_index_url(letter)).await {
            Ok(html) => {
                let players = parse_index(&html, letter);
                info!("Index '{}': {} players", letter, players.len());
                all.extend(players);
            }
            Err(e) => warn!("Failed to fetch index letter {}: {}", letter, e),
        }
    }

    all
}

/// Fetch, parse and persist each player in fixed-size batches.
///
/// Every id counts towards `processed`; a fetch or persist failure also
/// bumps `errors` and moves on. `on_progress` runs after each batch.
pub async fn sync_players_in_batches<F, Fut, E, P, S, PE, G>(
    players: &[IndexEntry],
    fetch_html: F,
    parse_page: P,
    mut persist: S,
    options: &BatchOptions,
    mut on_progress: G,
) -> SyncSummary
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<String, E>>,
    E: Display,
    P: Fn(&str, &str) -> PlayerRecord,
    S: FnMut(&PlayerRecord) -> Result<(), PE>,
    PE: Display,
    G: FnMut(SyncProgress),
{
    let limiter = RateLimiter::new(options.delay);
    let total = players.len();
    let mut summary = SyncSummary::default();

    for batch in players.chunks(options.batch_size.max(1)) {
        for entry in batch {
            limiter.acquire().await;

            let result = match fetch_html(player_url(&entry.player_id)).await {
                Ok(html) => {
                    let record = parse_page(&html, &entry.player_id);
                    persist(&record).map_err(|e| e.to_string())
                }
                Err(e) => Err(e.to_string()),
            };

            summary.processed += 1;
            if let Err(e) = result {
                summary.errors += 1;
                warn!("Failed to sync {}: {}", entry.player_id, e);
            }
        }

        let progress = SyncProgress {
            processed: summary.processed,
            total,
            errors: summary.errors,
        };
        info!(
            "Sync progress: {}/{} ({} errors)",
            progress.processed, progress.total, progress.errors
        );
        on_progress(progress);
    }

    summary
}

/// Run index walk and batch sync against the live site, writing into
/// `repository` and reporting through `guard`.
pub async fn run_full_sync(
    guard: SyncGuard,
    fetcher: &HttpFetcher,
    repository: &Mutex<PlayerRepository>,
    options: &FullSyncOptions,
) -> SyncSummary {
    let fetch = move |url: String| async move { fetcher.fetch_html(&url).await };

    guard.set_message(format!(
        "Fetching player index ({} letters)",
        options.index.letters.len()
    ));
    let mut players =
        get_all_player_ids_from_index(fetch, PlayersIndexParser::parse, &options.index).await;
    if let Some(limit) = options.limit {
        players.truncate(limit);
    }

    if players.is_empty() {
        warn!("Player index is empty, nothing to sync");
        guard.finish("No players found in index");
        return SyncSummary::default();
    }

    info!("Syncing {} players", players.len());
    guard.begin_syncing(players.len());

    let mut stats_failures = 0usize;
    let persist = |record: &PlayerRecord| -> anyhow::Result<()> {
        if persist_player(repository, record)?.stats_error.is_some() {
            stats_failures += 1;
        }
        Ok(())
    };

    let summary = sync_players_in_batches(
        &players,
        fetch,
        PlayerParser::parse,
        persist,
        &options.batch,
        |progress| guard.record_progress(progress),
    )
    .await;

    let message = completion_message(&summary, stats_failures);
    info!("{}", message);
    guard.finish(message);

    summary
}

/// Write one player; a lost stats write is logged and reported, not raised.
fn persist_player(
    repository: &Mutex<PlayerRepository>,
    record: &PlayerRecord,
) -> anyhow::Result<UpsertOutcome> {
    let repo = repository
        .lock()
        .map_err(|_| anyhow::anyhow!("player repository lock poisoned"))?;
    let outcome = repo.upsert_player(record)?;
    match &outcome.stats_error {
        Some(e) => warn!("Saved {} without season rows: {}", record.player_id, e),
        None => debug!(
            "Saved {} with {} season rows",
            record.player_id, outcome.stats_written
        ),
    }
    Ok(outcome)
}

fn completion_message(summary: &SyncSummary, stats_failures: usize) -> String {
    let mut message = format!(
        "Sync complete: {} processed, {} errors",
        summary.processed, summary.errors
    );
    if stats_failures > 0 {
        message.push_str(&format!(", {} without season stats", stats_failures));
    }
    message
}
