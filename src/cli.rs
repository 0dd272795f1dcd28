//! CLI commands for bbref-api.
//!
//! Supports API server mode, one-off page scrapes, a one-shot full sync and
//! a client for a running server.

use chrono::Local;
use clap::{Parser, Subcommand};
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::client::ApiClient;
use crate::config::AppConfig;
use crate::scraper::coerce::CellValue;
use crate::scraper::parsers::{PlayerParser, PlayerRecord, SeasonStatRow, TeamParser, TeamRecord};
use crate::scraper::{current_season, player_url, team_url, HttpFetcher};
use crate::storage::PlayerRepository;
use crate::sync::{run_full_sync, FullSyncOptions, SyncTracker};
use crate::types::DEFAULT_PLAYERS_LIMIT;

#[derive(Parser)]
#[command(name = "bbref-api")]
#[command(version, about = "Basketball Reference scraper, sync job and REST API", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the API server
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,

        /// Do not start the recurring background sync
        #[arg(long)]
        no_schedule: bool,
    },

    /// Scrape one player page and print what was extracted
    Player {
        /// Player id, e.g. jamesle01
        #[arg(value_name = "PLAYER_ID")]
        player_id: String,

        /// Output format (json, table)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Scrape one team season page
    Team {
        /// Team abbreviation, e.g. LAL
        #[arg(value_name = "TEAM_ID")]
        team_id: String,

        /// Season end year, e.g. 2025 for 2024-25 (default: current season)
        #[arg(value_name = "SEASON")]
        season: Option<String>,

        /// Output format (json, table)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Run one full sync into the configured database
    Sync {
        /// Only walk these index letters, e.g. "abc" (default: a-z)
        #[arg(short, long)]
        letters: Option<String>,

        /// Only sync the first N players found
        #[arg(long)]
        limit: Option<usize>,

        /// Players per batch
        #[arg(long)]
        batch_size: Option<usize>,

        /// Pause between player fetches in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,
    },

    /// Call a running API server
    Client {
        /// Server base URL
        #[arg(long, default_value = "http://localhost:3001")]
        base_url: String,

        #[command(subcommand)]
        command: ClientCommand,
    },
}

#[derive(Subcommand)]
pub enum ClientCommand {
    /// GET /api/player/:player_id
    Player { player_id: String },

    /// GET /api/team/:team_id[/:season]
    Team {
        team_id: String,
        season: Option<String>,
    },

    /// GET /api/players
    Players {
        #[arg(long, default_value_t = DEFAULT_PLAYERS_LIMIT)]
        limit: u32,

        #[arg(long, default_value_t = 0)]
        offset: u32,
    },

    /// GET /api/players/:player_id
    Stored { player_id: String },
}

/// Fetch, parse and print one player.
pub async fn run_player(player_id: String, format: String) -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    let fetcher = HttpFetcher::new(&config.scraper)?;

    let url = player_url(&player_id);
    eprintln!("Fetching {} ...", url);
    let html = fetcher.fetch_html(&url).await?;
    eprintln!("HTML length: {}", html.len());

    let record = PlayerParser::parse(&html, &player_id);

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&record)?),
        "table" => print_player(&record),
        _ => {
            eprintln!("Unknown format: {}. Using JSON.", format);
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
    }

    Ok(())
}

/// Fetch, parse and print one team season.
pub async fn run_team(team_id: String, season: Option<String>, format: String) -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    let fetcher = HttpFetcher::new(&config.scraper)?;

    let team_id = team_id.to_uppercase();
    let season = season.unwrap_or_else(|| current_season(Local::now().date_naive()));
    let url = team_url(&team_id, &season);
    eprintln!("Fetching {} ...", url);
    let html = fetcher.fetch_html(&url).await?;

    let record = TeamParser::parse(&html, &team_id, &season);

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&record)?),
        "table" => print_team(&record),
        _ => {
            eprintln!("Unknown format: {}. Using JSON.", format);
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
    }

    Ok(())
}

/// Run one full sync in the foreground.
pub async fn run_sync(
    letters: Option<String>,
    limit: Option<usize>,
    batch_size: Option<usize>,
    delay_ms: Option<u64>,
) -> anyhow::Result<()> {
    let mut config = AppConfig::load()?;

    // Override with CLI args
    if let Some(size) = batch_size {
        config.sync.batch_size = size;
    }
    if let Some(delay) = delay_ms {
        config.sync.delay_ms = delay;
    }

    let mut options = FullSyncOptions::from_config(&config.sync);
    options.limit = limit;
    if let Some(letters) = letters {
        options.index.letters = parse_letters(&letters);
        if options.index.letters.is_empty() {
            anyhow::bail!("No index letters in {:?}", letters);
        }
    }

    let fetcher = HttpFetcher::new(&config.scraper)?;
    let repository = Mutex::new(PlayerRepository::new(Path::new(&config.database.path))?);
    let tracker = Arc::new(SyncTracker::new());
    let guard = tracker.try_start()?;

    eprintln!("Database: {}", config.database.path);
    eprintln!(
        "Letters: {}",
        options.index.letters.iter().collect::<String>()
    );

    let summary = run_full_sync(guard, &fetcher, &repository, &options).await;

    let status = tracker.snapshot();
    println!("{}", status.message);
    println!("Processed: {}", summary.processed);
    println!("Errors:    {}", summary.errors);

    Ok(())
}

/// Call a running server and print the JSON response.
pub async fn run_client(base_url: String, command: ClientCommand) -> anyhow::Result<()> {
    let client = ApiClient::new(&base_url)?;

    let output = match command {
        ClientCommand::Player { player_id } => {
            serde_json::to_string_pretty(&client.get_player_stats(&player_id).await?)?
        }
        ClientCommand::Team { team_id, season } => serde_json::to_string_pretty(
            &client.get_team_stats(&team_id, season.as_deref()).await?,
        )?,
        ClientCommand::Players { limit, offset } => {
            let page = client.get_players_from_db(limit, offset).await?;
            eprintln!(
                "{} of {} players (offset {})",
                page.players.len(),
                page.total,
                page.offset
            );
            serde_json::to_string_pretty(&page)?
        }
        ClientCommand::Stored { player_id } => match client.get_player_from_db(&player_id).await? {
            Some(player) => serde_json::to_string_pretty(&player)?,
            None => {
                eprintln!("Player {} not synced yet", player_id);
                return Ok(());
            }
        },
    };

    println!("{}", output);
    Ok(())
}

/// Lowercase ascii letters in input order, without repeats.
fn parse_letters(input: &str) -> Vec<char> {
    let mut letters = Vec::new();
    for c in input.chars().map(|c| c.to_ascii_lowercase()) {
        if c.is_ascii_lowercase() && !letters.contains(&c) {
            letters.push(c);
        }
    }
    letters
}

fn or_dash(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}

fn fmt_opt<T: std::fmt::Display>(value: Option<T>, width: usize, precision: usize) -> String {
    match value {
        Some(v) => format!("{:>width$.precision$}", v, width = width, precision = precision),
        None => format!("{:>width$}", "-", width = width),
    }
}

fn print_player(record: &PlayerRecord) {
    println!("{} ({})", record.name, record.player_id);
    println!("{}", record.url);
    println!();

    println!("=== Bio ===");
    println!("  Team:      {}", or_dash(&record.team));
    println!("  Position:  {}", or_dash(&record.position));
    println!("  Height:    {}", or_dash(&record.height));
    println!("  Weight:    {}", or_dash(&record.weight));
    println!("  Born:      {}", or_dash(&record.birth_date));
    println!("  Hometown:  {}", or_dash(&record.hometown));
    println!(
        "  Age:       {}",
        record.age.map(|a| a.to_string()).unwrap_or_else(|| "-".to_string())
    );
    println!("  Jersey:    {}", or_dash(&record.jersey_number));
    println!();

    if !record.summary.is_empty() {
        println!("=== Summary ===");
        for (label, value) in &record.summary {
            println!("  {:>6}: {}", label, serde_json::to_string(value).unwrap_or_default());
        }
        println!();
    }

    let rows = record.season_rows();
    if !rows.is_empty() {
        println!("=== Per Game ===");
        println!(
            "{:<8} {:<4} {:<4} {:>3} {:>6} {:>6} {:>6} {:>6}",
            "Season", "Tm", "Lg", "G", "PTS", "TRB", "AST", "FG%"
        );
        for row in &rows {
            print_season_row(row);
        }
        println!();
    }
}

fn print_season_row(row: &SeasonStatRow) {
    println!(
        "{:<8} {:<4} {:<4} {} {} {} {} {}",
        row.season,
        or_dash(&row.team),
        or_dash(&row.league),
        fmt_opt(row.games, 3, 0),
        fmt_opt(row.pts_per_g, 6, 1),
        fmt_opt(row.trb_per_g, 6, 1),
        fmt_opt(row.ast_per_g, 6, 1),
        fmt_opt(row.fg_pct, 6, 3),
    );
}

fn print_team(record: &TeamRecord) {
    println!("{} {} ({})", record.season, record.name, record.team_id);
    println!("{}", record.url);
    println!();

    println!("=== Team ===");
    match record.record {
        Some(r) => println!("  Record:    {}-{}", r.wins, r.losses),
        None => println!("  Record:    -"),
    }
    println!("  PTS/G:     {}", fmt_opt(record.pts_per_game, 0, 1));
    println!("  Opp PTS/G: {}", fmt_opt(record.opp_pts_per_game, 0, 1));
    println!("  SRS:       {}", fmt_opt(record.srs, 0, 2));
    println!("  Pace:      {}", fmt_opt(record.pace, 0, 1));
    println!("  ORtg:      {}", fmt_opt(record.off_rtg, 0, 1));
    println!("  DRtg:      {}", fmt_opt(record.def_rtg, 0, 1));
    println!();

    if !record.roster.is_empty() {
        println!("=== Roster ===");
        println!(
            "{:<24} {:<10} {:>4} {:>6} {:>6} {:>6}",
            "Player", "Id", "Pos", "PTS", "TRB", "AST"
        );
        for entry in &record.roster {
            let cell = |v: &Option<CellValue>| {
                v.as_ref().map(|c| c.to_text()).unwrap_or_else(|| "-".to_string())
            };
            println!(
                "{:<24} {:<10} {:>4} {:>6} {:>6} {:>6}",
                entry.player,
                or_dash(&entry.player_id),
                or_dash(&entry.pos),
                cell(&entry.pts),
                cell(&entry.trb),
                cell(&entry.ast),
            );
        }
        println!();
    }
}
