//! Typed client for a running Basketball Reference API server.

use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::scraper::parsers::{PlayerRecord, TeamRecord};
use crate::storage::StoredPlayer;
use crate::types::PlayersResponse;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message}")]
    Api { status: StatusCode, message: String },
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// Client for the `/api` routes
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| ClientError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(base_url.to_string()));
        }

        Ok(Self {
            client: Client::new(),
            base_url,
        })
    }

    /// Live-scraped player
    pub async fn get_player_stats(&self, player_id: &str) -> Result<PlayerRecord> {
        let url = self.endpoint(&["api", "player", player_id])?;
        self.get_json(url).await
    }

    /// Live-scraped team; the server picks the current season when `season` is `None`
    pub async fn get_team_stats(&self, team_id: &str, season: Option<&str>) -> Result<TeamRecord> {
        let url = match season {
            Some(season) => self.endpoint(&["api", "team", team_id, season])?,
            None => self.endpoint(&["api", "team", team_id])?,
        };
        self.get_json(url).await
    }

    /// One page of synced players
    pub async fn get_players_from_db(&self, limit: u32, offset: u32) -> Result<PlayersResponse> {
        let mut url = self.endpoint(&["api", "players"])?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("offset", &offset.to_string());
        self.get_json(url).await
    }

    /// One synced player, `None` when the server has no row for it
    pub async fn get_player_from_db(&self, player_id: &str) -> Result<Option<StoredPlayer>> {
        let url = self.endpoint(&["api", "players", player_id])?;
        match self.get_json(url).await {
            Ok(player) => Ok(Some(player)),
            Err(ClientError::Api {
                status: StatusCode::NOT_FOUND,
                ..
            }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status,
                message: error_message(status, &body),
            });
        }

        Ok(response.json::<T>().await?)
    }
}

/// Prefer the server's own explanation, then the status text
fn error_message(status: StatusCode, body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|v| v.get("message").or_else(|| v.get("error")))
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trims_and_encodes() {
        let client = ApiClient::new("http://localhost:3001/").unwrap();
        assert_eq!(
            client.endpoint(&["api", "player", "jamesle01"]).unwrap().as_str(),
            "http://localhost:3001/api/player/jamesle01"
        );
        assert_eq!(
            client.endpoint(&["api", "players", "a b/c"]).unwrap().as_str(),
            "http://localhost:3001/api/players/a%20b%2Fc"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = ApiClient::new("https://stats.example.com/bbref").unwrap();
        assert_eq!(
            client.endpoint(&["api", "team", "LAL", "2025"]).unwrap().as_str(),
            "https://stats.example.com/bbref/api/team/LAL/2025"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            ApiClient::new("not a url"),
            Err(ClientError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            ApiClient::new("mailto:someone@example.com"),
            Err(ClientError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn test_error_message_prefers_server_body() {
        let body = r#"{"error":"502 Bad Gateway","message":"HTTP 404 Not Found: https://x"}"#;
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, body),
            "HTTP 404 Not Found: https://x"
        );
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, r#"{"error":"upstream down"}"#),
            "upstream down"
        );
        assert_eq!(
            error_message(StatusCode::SERVICE_UNAVAILABLE, "<html>oops</html>"),
            "Service Unavailable"
        );
    }
}
