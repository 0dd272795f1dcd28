//! Configuration for the Basketball Reference API.

use serde::{Deserialize, Serialize};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Upstream fetch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Retries for 429/5xx responses and transport errors
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; BasketballStatsBot/1.0)".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    2
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

/// Batch sync configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Pause between player page fetches
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    /// Pause between index letter fetches
    #[serde(default = "default_index_delay_ms")]
    pub index_delay_ms: u64,
    #[serde(default = "default_schedule_enabled")]
    pub schedule_enabled: bool,
    #[serde(default = "default_startup_delay_secs")]
    pub startup_delay_secs: u64,
    #[serde(default = "default_interval_hours")]
    pub interval_hours: u64,
}

fn default_batch_size() -> usize {
    20
}

fn default_delay_ms() -> u64 {
    2000
}

fn default_index_delay_ms() -> u64 {
    1500
}

fn default_schedule_enabled() -> bool {
    true
}

fn default_startup_delay_secs() -> u64 {
    15
}

fn default_interval_hours() -> u64 {
    24
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            delay_ms: default_delay_ms(),
            index_delay_ms: default_index_delay_ms(),
            schedule_enabled: default_schedule_enabled(),
            startup_delay_secs: default_startup_delay_secs(),
            interval_hours: default_interval_hours(),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: String,
}

fn default_database_path() -> String {
    "data/bbref.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl AppConfig {
    /// Load configuration from environment and config file
    pub fn load() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            // Start with defaults
            .add_source(config::Config::try_from(&AppConfig::default())?)
            // Add config file if exists
            .add_source(config::File::with_name("config").required(false))
            // Override with environment variables (BBREF_SYNC__BATCH_SIZE, etc.)
            .add_source(
                config::Environment::with_prefix("BBREF")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.sync.batch_size, 20);
        assert_eq!(config.sync.delay_ms, 2000);
        assert_eq!(config.sync.index_delay_ms, 1500);
        assert_eq!(config.sync.interval_hours, 24);
        assert_eq!(config.sync.startup_delay_secs, 15);
        assert!(config.scraper.user_agent.contains("BasketballStatsBot"));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"sync": {"batch_size": 100}, "database": {}}"#).unwrap();
        assert_eq!(config.sync.batch_size, 100);
        assert_eq!(config.sync.delay_ms, 2000);
        assert_eq!(config.database.path, "data/bbref.db");
        assert_eq!(config.server.host, "0.0.0.0");
    }
}
