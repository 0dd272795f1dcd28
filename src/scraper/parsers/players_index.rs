//! Alphabetical player index parser (e.g. `/players/a/`).

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

use super::extract::{element_text, player_id_from_href};

/// One player listed on an index page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexEntry {
    pub player_id: String,
    pub name: String,
}

static INDEX_ROW: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table#players tbody tr, .stats_table tbody tr").unwrap());
static ROW_PLAYER_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"td a[href*="/players/"]"#).unwrap());

/// Parser for player index pages
pub struct PlayersIndexParser;

impl PlayersIndexParser {
    /// Parse one letter's index page into unique `(player_id, name)` entries,
    /// in page order.
    pub fn parse(html: &str, letter: char) -> Vec<IndexEntry> {
        let document = Html::parse_document(html);

        let mut players = Self::parse_rows(&document);
        if players.is_empty() {
            players = Self::parse_links(&document, letter);
        }

        players
    }

    /// Primary: one link per index table row.
    fn parse_rows(document: &Html) -> Vec<IndexEntry> {
        let mut players: Vec<IndexEntry> = Vec::new();

        for row in document.select(&INDEX_ROW) {
            let Some(link) = row.select(&ROW_PLAYER_LINK).next() else {
                continue;
            };
            let href = link.value().attr("href").unwrap_or_default();
            if let Some(player_id) = player_id_from_href(href) {
                push_unique(
                    &mut players,
                    IndexEntry {
                        player_id,
                        name: element_text(&link),
                    },
                );
            }
        }

        players
    }

    /// Fallback for markup variants: any link under `/players/<letter>/`.
    fn parse_links(document: &Html, letter: char) -> Vec<IndexEntry> {
        let mut players: Vec<IndexEntry> = Vec::new();

        let letter = letter.to_ascii_lowercase();
        if !letter.is_ascii_lowercase() {
            return players;
        }
        let Ok(selector) = Selector::parse(&format!(r#"a[href*="/players/{}/"]"#, letter)) else {
            return players;
        };

        for link in document.select(&selector) {
            let href = link.value().attr("href").unwrap_or_default();
            let Some(player_id) = player_id_from_href(href) else {
                continue;
            };
            let name = element_text(&link);
            if !name.is_empty() {
                push_unique(&mut players, IndexEntry { player_id, name });
            }
        }

        players
    }
}

fn push_unique(players: &mut Vec<IndexEntry>, entry: IndexEntry) {
    if !players.iter().any(|p| p.player_id == entry.player_id) {
        players.push(entry);
    }
}
