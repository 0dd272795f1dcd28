//! SQLite schema definitions for synced player data
//!
//! Tables:
//! - player_info: One row per player (bio fields, summary and raw per-game JSON)
//! - player_stats: One row per player and season, replaced on every sync

use rusqlite::{Connection, Result};

/// Create all tables in the database
pub fn create_tables(conn: &Connection) -> Result<()> {
    // Player bio and raw scrape payload
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS player_info (
            player_id TEXT PRIMARY KEY,
            name TEXT,
            team TEXT,
            position TEXT,
            height TEXT,
            weight TEXT,
            jersey_number TEXT,
            birth_date TEXT,
            age INTEGER,
            hometown TEXT,
            summary TEXT NOT NULL DEFAULT '{}',
            raw_data TEXT NOT NULL DEFAULT '{}',
            updated_at TEXT DEFAULT (datetime('now'))
        )
        "#,
        [],
    )?;

    // Season-level per-game stats
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS player_stats (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            player_id TEXT NOT NULL,
            season TEXT NOT NULL,
            team TEXT,
            league TEXT,
            games INTEGER,
            games_started INTEGER,
            pts_per_g REAL,
            trb_per_g REAL,
            ast_per_g REAL,
            stl_per_g REAL,
            blk_per_g REAL,
            fg_pct REAL,
            fg3_pct REAL,
            ft_pct REAL
        )
        "#,
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_player_info_name ON player_info(name)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_player_stats_player ON player_stats(player_id)",
        [],
    )?;

    Ok(())
}
