//! SQLite repository for synced player data

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

use super::schema::create_tables;
use crate::scraper::parsers::{PlayerRecord, SeasonStatRow};

/// A player row from `player_info`, with `per_game` and `url` lifted out of
/// the stored `raw_data` blob
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredPlayer {
    pub player_id: String,
    pub name: Option<String>,
    pub team: Option<String>,
    pub position: Option<String>,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub jersey_number: Option<String>,
    pub birth_date: Option<String>,
    pub age: Option<u32>,
    pub hometown: Option<String>,
    pub summary: serde_json::Value,
    pub per_game: serde_json::Value,
    pub url: Option<String>,
    pub updated_at: Option<String>,
}

impl StoredPlayer {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let summary: String = row.get(10)?;
        let raw_data: String = row.get(11)?;
        let mut raw_data: serde_json::Value = serde_json::from_str(&raw_data).unwrap_or_default();
        let per_game = match raw_data.get_mut("per_game") {
            Some(v) => v.take(),
            None => serde_json::Value::Array(Vec::new()),
        };
        let url = raw_data
            .get("url")
            .and_then(|v| v.as_str())
            .map(str::to_string);

        Ok(Self {
            player_id: row.get(0)?,
            name: row.get(1)?,
            team: row.get(2)?,
            position: row.get(3)?,
            height: row.get(4)?,
            weight: row.get(5)?,
            jersey_number: row.get(6)?,
            birth_date: row.get(7)?,
            age: row.get(8)?,
            hometown: row.get(9)?,
            summary: serde_json::from_str(&summary).unwrap_or_default(),
            per_game,
            url,
            updated_at: row.get(12)?,
        })
    }
}

/// Result of writing one player.
///
/// The bio row and the season rows are separate writes; a failed stats
/// write leaves the bio row in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpsertOutcome {
    pub stats_written: usize,
    pub stats_error: Option<String>,
}

const PLAYER_COLUMNS: &str = "player_id, name, team, position, height, weight, jersey_number, \
     birth_date, age, hometown, summary, raw_data, updated_at";

/// Repository for player bios and season stats
pub struct PlayerRepository {
    conn: Connection,
}

impl PlayerRepository {
    /// Create a new repository, initializing the database if needed
    pub fn new(db_path: &Path) -> Result<Self> {
        // Create parent directories if needed
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create database directory")?;
        }

        let conn = Connection::open(db_path).context("Failed to open database")?;

        // Create tables if they don't exist
        create_tables(&conn)?;

        Ok(Self { conn })
    }

    /// Create an in-memory repository (for testing)
    #[cfg(test)]
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        create_tables(&conn)?;
        Ok(Self { conn })
    }

    // ==================== Write Operations ====================

    /// Upsert a scraped player and replace their season rows.
    ///
    /// Fails only when the bio write fails.
    pub fn upsert_player(&self, record: &PlayerRecord) -> Result<UpsertOutcome> {
        let summary = serde_json::to_string(&record.summary)?;
        let raw_data = serde_json::to_string(&serde_json::json!({
            "per_game": record.per_game,
            "url": record.url,
        }))?;

        self.conn
            .execute(
                r#"
                INSERT INTO player_info
                (player_id, name, team, position, height, weight, jersey_number,
                 birth_date, age, hometown, summary, raw_data, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, datetime('now'))
                ON CONFLICT(player_id) DO UPDATE SET
                    name = excluded.name,
                    team = excluded.team,
                    position = excluded.position,
                    height = excluded.height,
                    weight = excluded.weight,
                    jersey_number = excluded.jersey_number,
                    birth_date = excluded.birth_date,
                    age = excluded.age,
                    hometown = excluded.hometown,
                    summary = excluded.summary,
                    raw_data = excluded.raw_data,
                    updated_at = excluded.updated_at
                "#,
                params![
                    record.player_id,
                    record.name,
                    record.team,
                    record.position,
                    record.height,
                    record.weight,
                    record.jersey_number,
                    record.birth_date,
                    record.age,
                    record.hometown,
                    summary,
                    raw_data,
                ],
            )
            .with_context(|| format!("Failed to upsert player {}", record.player_id))?;

        let rows = record.season_rows();
        let outcome = match self.upsert_player_stats(&record.player_id, &rows) {
            Ok(stats_written) => UpsertOutcome {
                stats_written,
                stats_error: None,
            },
            Err(e) => {
                warn!("Stats write failed for {}: {:#}", record.player_id, e);
                UpsertOutcome {
                    stats_written: 0,
                    stats_error: Some(format!("{:#}", e)),
                }
            }
        };

        Ok(outcome)
    }

    /// Replace all season rows for a player (delete then insert)
    pub fn upsert_player_stats(&self, player_id: &str, rows: &[SeasonStatRow]) -> Result<usize> {
        self.conn
            .execute("DELETE FROM player_stats WHERE player_id = ?1", [player_id])
            .context("Failed to clear season stats")?;

        let mut stmt = self.conn.prepare(
            r#"
            INSERT INTO player_stats
            (player_id, season, team, league, games, games_started, pts_per_g,
             trb_per_g, ast_per_g, stl_per_g, blk_per_g, fg_pct, fg3_pct, ft_pct)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            "#,
        )?;

        for row in rows {
            stmt.execute(params![
                player_id,
                row.season,
                row.team,
                row.league,
                row.games,
                row.games_started,
                row.pts_per_g,
                row.trb_per_g,
                row.ast_per_g,
                row.stl_per_g,
                row.blk_per_g,
                row.fg_pct,
                row.fg3_pct,
                row.ft_pct,
            ])?;
        }

        Ok(rows.len())
    }

    // ==================== Query Operations ====================

    /// Page through stored players ordered by name
    pub fn get_players(&self, limit: u32, offset: u32) -> Result<Vec<StoredPlayer>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM player_info ORDER BY name, player_id LIMIT ?1 OFFSET ?2",
            PLAYER_COLUMNS
        ))?;

        let players = stmt
            .query_map([limit, offset], StoredPlayer::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(players)
    }

    /// Get one stored player
    pub fn get_player(&self, player_id: &str) -> Result<Option<StoredPlayer>> {
        let player = self
            .conn
            .query_row(
                &format!("SELECT {} FROM player_info WHERE player_id = ?1", PLAYER_COLUMNS),
                [player_id],
                StoredPlayer::from_row,
            )
            .optional()?;

        Ok(player)
    }

    /// Get the total number of stored players
    pub fn count_players(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM player_info", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    /// Get a player's season rows in insertion (page) order
    pub fn get_player_stats(&self, player_id: &str) -> Result<Vec<SeasonStatRow>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT season, team, league, games, games_started, pts_per_g, trb_per_g,
                   ast_per_g, stl_per_g, blk_per_g, fg_pct, fg3_pct, ft_pct
            FROM player_stats
            WHERE player_id = ?1
            ORDER BY id
            "#,
        )?;

        let rows = stmt
            .query_map([player_id], |row| {
                Ok(SeasonStatRow {
                    season: row.get(0)?,
                    team: row.get(1)?,
                    league: row.get(2)?,
                    games: row.get(3)?,
                    games_started: row.get(4)?,
                    pts_per_g: row.get(5)?,
                    trb_per_g: row.get(6)?,
                    ast_per_g: row.get(7)?,
                    stl_per_g: row.get(8)?,
                    blk_per_g: row.get(9)?,
                    fg_pct: row.get(10)?,
                    fg3_pct: row.get(11)?,
                    ft_pct: row.get(12)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
    }
}
