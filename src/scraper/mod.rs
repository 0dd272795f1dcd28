//! Web scraper module for basketball-reference.com
//!
//! Provides the HTTP fetcher, request pacing, and HTML parsers.

pub mod coerce;
pub mod http;
pub mod parsers;
pub mod rate_limiter;

use chrono::{Datelike, NaiveDate};

pub use http::{HttpFetcher, ScrapeError};
pub use rate_limiter::RateLimiter;

/// Base URL for basketball-reference.com
pub const BASE_URL: &str = "https://www.basketball-reference.com";

/// Build player page URL
pub fn player_url(player_id: &str) -> String {
    let first = player_id
        .chars()
        .next()
        .map(|c| c.to_ascii_lowercase())
        .unwrap_or_default();
    format!("{}/players/{}/{}.html", BASE_URL, first, player_id)
}

/// Build team season page URL
pub fn team_url(team_id: &str, season: &str) -> String {
    format!("{}/teams/{}/{}.html", BASE_URL, team_id, season)
}

/// Build alphabetical players index URL
pub fn players_index_url(letter: char) -> String {
    format!("{}/players/{}/", BASE_URL, letter)
}

/// Season label for team pages on `today`: seasons are named after the year
/// they end in, and a new one starts in October.
pub fn current_season(today: NaiveDate) -> String {
    let year = if today.month() >= 10 {
        today.year() + 1
    } else {
        today.year()
    };
    year.to_string()
}
