//! Player page parser for basketball-reference.com.

use chrono::{Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::extract::{element_text, first_match, non_empty, normalize_ws, Strategy};
use crate::scraper::coerce::{age_from_birth_date, coerce_number_or_text, parse_born_date, CellValue};
use crate::scraper::player_url;

/// One per-game table row keyed by the column's `data-stat` attribute.
pub type StatLine = BTreeMap<String, CellValue>;

/// A summary grid entry: one value, or a current-season/career pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SummaryValue {
    Scalar(String),
    CurrentCareer { current: String, career: String },
}

/// Everything extracted from one player page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    pub player_id: String,
    pub name: String,
    pub team: Option<String>,
    pub position: Option<String>,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub birth_date: Option<String>,
    pub hometown: Option<String>,
    pub jersey_number: Option<String>,
    pub age: Option<u32>,
    pub summary: BTreeMap<String, SummaryValue>,
    pub per_game: Vec<StatLine>,
    pub url: String,
}

impl PlayerRecord {
    /// Per-game rows that carry a real season label, mapped to storage shape.
    pub fn season_rows(&self) -> Vec<SeasonStatRow> {
        self.per_game
            .iter()
            .map(SeasonStatRow::from_stat_line)
            .filter(SeasonStatRow::is_persistable)
            .collect()
    }
}

static SEASON_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}(-\d{2})?$").unwrap());
static SEASON_PREFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(19|20)\d{2}").unwrap());

/// Season-level stats as stored in `player_stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonStatRow {
    pub season: String,
    pub team: Option<String>,
    pub league: Option<String>,
    pub games: Option<u32>,
    pub games_started: Option<u32>,
    pub pts_per_g: Option<f64>,
    pub trb_per_g: Option<f64>,
    pub ast_per_g: Option<f64>,
    pub stl_per_g: Option<f64>,
    pub blk_per_g: Option<f64>,
    pub fg_pct: Option<f64>,
    pub fg3_pct: Option<f64>,
    pub ft_pct: Option<f64>,
}

impl SeasonStatRow {
    /// Map a raw per-game row, resolving the column aliases upstream has used
    /// over time (`year_id` vs `season`, `g` vs `games`, ...).
    pub fn from_stat_line(line: &StatLine) -> Self {
        let text = |keys: &[&str]| {
            keys.iter()
                .find_map(|k| line.get(*k))
                .map(CellValue::to_text)
                .and_then(|s| non_empty(s.trim().to_string()))
        };
        let number = |keys: &[&str]| keys.iter().find_map(|k| line.get(*k)).and_then(CellValue::as_f64);
        let count = |keys: &[&str]| {
            number(keys)
                .filter(|n| *n >= 0.0)
                .map(|n| n as u32)
        };

        Self {
            season: text(&["season", "year_id"]).unwrap_or_default(),
            team: text(&["team_id", "team_name_abbr", "team"]),
            league: text(&["comp_name_abbr", "lg_id", "league"]),
            games: count(&["games", "g"]),
            games_started: count(&["games_started", "gs"]),
            pts_per_g: number(&["pts_per_g"]),
            trb_per_g: number(&["trb_per_g"]),
            ast_per_g: number(&["ast_per_g"]),
            stl_per_g: number(&["stl_per_g"]),
            blk_per_g: number(&["blk_per_g"]),
            fg_pct: number(&["fg_pct"]),
            fg3_pct: number(&["fg3_pct"]),
            ft_pct: number(&["ft_pct"]),
        }
    }

    /// Career, header and footer rows have no season label and are never stored.
    pub fn is_persistable(&self) -> bool {
        let season = self.season.trim();
        !season.is_empty() && (SEASON_RE.is_match(season) || SEASON_PREFIX_RE.is_match(season))
    }
}

static H1_NAME: Lazy<Selector> = Lazy::new(|| Selector::parse(r#"h1[itemprop="name"]"#).unwrap());
static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());
static TEAM_LINK: Lazy<Selector> = Lazy::new(|| Selector::parse(r#"a[href*="/teams/"]"#).unwrap());
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());
static META_PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("#meta p").unwrap());
static HEIGHT: Lazy<Selector> = Lazy::new(|| Selector::parse(r#"span[itemprop="height"]"#).unwrap());
static WEIGHT: Lazy<Selector> = Lazy::new(|| Selector::parse(r#"span[itemprop="weight"]"#).unwrap());
static BIRTH: Lazy<Selector> = Lazy::new(|| Selector::parse(r#"[itemprop="birthDate"]"#).unwrap());
static SUMMARY_GRID: Lazy<Selector> = Lazy::new(|| Selector::parse(".stats_pullout").unwrap());
static GRID_BLOCK: Lazy<Selector> = Lazy::new(|| Selector::parse("div").unwrap());
static PER_GAME_TABLES: Lazy<Selector> =
    Lazy::new(|| Selector::parse("#div_per_game_stats table").unwrap());
static TABLE: Lazy<Selector> = Lazy::new(|| Selector::parse("table").unwrap());
static PTS_HEADER: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"th[data-stat="pts_per_g"]"#).unwrap());
static HEADER_CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("thead th").unwrap());
static BODY_ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tbody tr").unwrap());
static ROW_CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td, th").unwrap());

static TEAM_ABBR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{3}$").unwrap());
static STATS_SUFFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\s*Stats.*$").unwrap());
static POSITION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)Position:\s*").unwrap());
static HEIGHT_WEIGHT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+-\d+)\s*,\s*(\d+)\s*lb").unwrap());
static BORN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Born:\s*(.+?)\s+in\s+([^▪\n]+)").unwrap());
static JERSEY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:No\.\s*|#)(\d{1,3})\b").unwrap());

const BULLET: char = '▪';

/// A parsed player document plus its biographical text block.
struct PlayerPage {
    document: Html,
    player_id: String,
    /// One normalized line per biographical paragraph.
    bio: String,
}

impl PlayerPage {
    fn new(html: &str, player_id: &str) -> Self {
        let document = Html::parse_document(html);
        let mut paragraphs: Vec<String> = document.select(&META_PARAGRAPH).map(|p| element_text(&p)).collect();
        if paragraphs.is_empty() {
            paragraphs = document.select(&PARAGRAPH).map(|p| element_text(&p)).collect();
        }
        let bio = paragraphs
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        Self {
            document,
            player_id: player_id.to_string(),
            bio,
        }
    }

    fn born_captures(&self) -> Option<regex::Captures<'_>> {
        BORN_RE.captures(&self.bio)
    }
}

/// Parser for player pages
pub struct PlayerParser;

impl PlayerParser {
    /// Parse a player page, computing age as of today.
    pub fn parse(html: &str, player_id: &str) -> PlayerRecord {
        Self::parse_as_of(html, player_id, Local::now().date_naive())
    }

    /// Parse a player page, computing age as of `today`.
    pub fn parse_as_of(html: &str, player_id: &str, today: NaiveDate) -> PlayerRecord {
        let page = PlayerPage::new(html, player_id);

        let name_strategies: [Strategy<PlayerPage, String>; 2] = [name_from_heading, name_from_title];
        let height_strategies: [Strategy<PlayerPage, String>; 2] = [height_from_tag, height_from_bio];
        let weight_strategies: [Strategy<PlayerPage, String>; 2] = [weight_from_tag, weight_from_bio];
        let birth_strategies: [Strategy<PlayerPage, String>; 2] = [birth_date_from_tag, birth_date_from_bio];
        let per_game_strategies: [Strategy<PlayerPage, Vec<StatLine>>; 2] =
            [per_game_by_player_id, per_game_by_points_column];

        let birth_date = first_match(&page, &birth_strategies);
        let age = birth_date
            .as_deref()
            .and_then(|date| age_from_birth_date(date, today));

        PlayerRecord {
            player_id: player_id.to_string(),
            name: first_match(&page, &name_strategies).unwrap_or_default(),
            team: team_from_links(&page),
            position: position_from_bio(&page),
            height: first_match(&page, &height_strategies),
            weight: first_match(&page, &weight_strategies),
            birth_date,
            hometown: hometown_from_bio(&page),
            jersey_number: jersey_from_bio(&page),
            age,
            summary: parse_summary(&page.document),
            per_game: first_match(&page, &per_game_strategies).unwrap_or_default(),
            url: player_url(player_id),
        }
    }
}

fn name_from_heading(page: &PlayerPage) -> Option<String> {
    page.document
        .select(&H1_NAME)
        .next()
        .and_then(|h1| non_empty(element_text(&h1)))
}

fn name_from_title(page: &PlayerPage) -> Option<String> {
    let title = page.document.select(&TITLE).next().map(|t| element_text(&t))?;
    let head = title.split('|').next().unwrap_or_default();
    non_empty(STATS_SUFFIX_RE.replace(head, "").trim().to_string())
}

fn team_from_links(page: &PlayerPage) -> Option<String> {
    page.document
        .select(&TEAM_LINK)
        .map(|a| element_text(&a))
        .find(|text| TEAM_ABBR_RE.is_match(text))
}

fn position_from_bio(page: &PlayerPage) -> Option<String> {
    let paragraph = page
        .document
        .select(&PARAGRAPH)
        .map(|p| element_text(&p))
        .find(|text| text.contains("Position:"))?;
    let after = POSITION_RE.splitn(&paragraph, 2).nth(1).unwrap_or_default();
    let before_bullet = after.split(BULLET).next().unwrap_or_default();
    non_empty(before_bullet.trim().to_string())
}

fn height_from_tag(page: &PlayerPage) -> Option<String> {
    page.document
        .select(&HEIGHT)
        .next()
        .and_then(|span| non_empty(element_text(&span)))
}

fn weight_from_tag(page: &PlayerPage) -> Option<String> {
    page.document
        .select(&WEIGHT)
        .next()
        .and_then(|span| non_empty(element_text(&span)))
}

fn height_from_bio(page: &PlayerPage) -> Option<String> {
    HEIGHT_WEIGHT_RE
        .captures(&page.bio)
        .map(|caps| caps[1].to_string())
}

fn weight_from_bio(page: &PlayerPage) -> Option<String> {
    HEIGHT_WEIGHT_RE
        .captures(&page.bio)
        .map(|caps| format!("{}lb", &caps[2]))
}

fn birth_date_from_tag(page: &PlayerPage) -> Option<String> {
    let tag = page.document.select(&BIRTH).next()?;
    let attr = ["data-birth", "datetime", "content"]
        .iter()
        .find_map(|name| tag.value().attr(name))
        .map(str::to_string);
    attr.or_else(|| non_empty(element_text(&tag)))
        .and_then(|raw| parse_born_date(&raw))
}

fn birth_date_from_bio(page: &PlayerPage) -> Option<String> {
    page.born_captures()
        .and_then(|caps| parse_born_date(&caps[1]))
}

fn hometown_from_bio(page: &PlayerPage) -> Option<String> {
    let caps = page.born_captures()?;
    let place = caps[2].split(BULLET).next().unwrap_or_default();
    non_empty(place.trim().to_string())
}

fn jersey_from_bio(page: &PlayerPage) -> Option<String> {
    JERSEY_RE
        .captures(&page.bio)
        .map(|caps| caps[1].to_string())
}

/// Summary grid: each block holds a label and one or two value cells.
fn parse_summary(document: &Html) -> BTreeMap<String, SummaryValue> {
    let mut summary = BTreeMap::new();
    let Some(grid) = document.select(&SUMMARY_GRID).next() else {
        return summary;
    };

    for block in grid.select(&GRID_BLOCK) {
        let children: Vec<ElementRef> = block.children().filter_map(ElementRef::wrap).collect();

        let label = children
            .iter()
            .find(|el| is_label_cell(el))
            .map(element_text)
            .unwrap_or_default();
        let values: Vec<String> = children
            .iter()
            .filter(|el| is_value_cell(el))
            .map(element_text)
            .collect();

        if label.is_empty() || values.is_empty() {
            continue;
        }

        let value = if values.len() == 2 {
            SummaryValue::CurrentCareer {
                current: values[0].clone(),
                career: values[1].clone(),
            }
        } else {
            SummaryValue::Scalar(values[0].clone())
        };
        summary.insert(label, value);
    }

    summary
}

fn has_class(el: &ElementRef, class: &str) -> bool {
    el.value().classes().any(|c| c == class)
}

fn is_label_cell(el: &ElementRef) -> bool {
    el.value().name() == "span" || has_class(el, "p1")
}

fn is_value_cell(el: &ElementRef) -> bool {
    el.value().name() == "p" || has_class(el, "p2") || has_class(el, "p3")
}

fn per_game_by_player_id(page: &PlayerPage) -> Option<Vec<StatLine>> {
    page.document
        .select(&PER_GAME_TABLES)
        .find(|table| table.value().id() == Some(page.player_id.as_str()))
        .map(|table| parse_per_game_table(&table))
}

fn per_game_by_points_column(page: &PlayerPage) -> Option<Vec<StatLine>> {
    page.document
        .select(&TABLE)
        .find(|table| table.select(&PTS_HEADER).next().is_some())
        .map(|table| parse_per_game_table(&table))
}

/// Rows keyed by each column's `data-stat`; header text is never trusted.
fn parse_per_game_table(table: &ElementRef) -> Vec<StatLine> {
    let columns: Vec<&str> = table
        .select(&HEADER_CELL)
        .filter_map(|th| th.value().attr("data-stat"))
        .collect();

    table
        .select(&BODY_ROW)
        .filter_map(|tr| {
            let line: StatLine = tr
                .select(&ROW_CELL)
                .filter_map(|cell| {
                    let stat = cell.value().attr("data-stat")?;
                    if !columns.contains(&stat) {
                        return None;
                    }
                    let text = normalize_ws(&cell.text().collect::<String>());
                    if text.is_empty() {
                        return None;
                    }
                    Some((stat.to_string(), coerce_number_or_text(&text)))
                })
                .collect();
            (!line.is_empty()).then_some(line)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><title>LeBron James Stats, Height, Weight, Position | Basketball-Reference.com</title></head>
<body>
<div id="meta">
  <h1 itemprop="name"><span>LeBron James</span></h1>
  <p><strong>Position:</strong> Small Forward and Point Guard &#9642; <strong>Shoots:</strong> Right</p>
  <p><span itemprop="height">6-9</span>,&nbsp;<span itemprop="weight">250lb</span> (206cm, 113kg)</p>
  <p><a href="/teams/LAL/2025.html">LAL</a> Team: <a href="/teams/LAL/2025.html">Los Angeles Lakers</a></p>
  <p><strong>Born: </strong><span itemprop="birthDate" id="necro-birth" data-birth="1984-12-30">December 30, 1984</span> in&nbsp;Akron,&nbsp;Ohio us</p>
  <p>Wears No. 23 for the Lakers</p>
</div>
<div class="stats_pullout">
  <div class="p1">
    <div><span><strong>PTS</strong></span><p>23.7</p><p>27.0</p></div>
    <div><span><strong>G</strong></span><p>70</p><p>1562</p></div>
  </div>
  <div class="p3">
    <div><span><strong>WS</strong></span><p>7.8</p></div>
  </div>
</div>
<div id="div_per_game_stats">
<table id="jamesle01">
  <thead><tr>
    <th data-stat="year_id">Season</th><th data-stat="team_name_abbr">Team</th>
    <th data-stat="comp_name_abbr">Lg</th><th data-stat="games">G</th>
    <th data-stat="games_started">GS</th><th data-stat="pts_per_g">PTS</th>
    <th data-stat="fg_pct">FG%</th>
  </tr></thead>
  <tbody>
    <tr><th data-stat="year_id">2003-04</th><td data-stat="team_name_abbr">CLE</td><td data-stat="comp_name_abbr">NBA</td><td data-stat="games">79</td><td data-stat="games_started">79</td><td data-stat="pts_per_g">20.9</td><td data-stat="fg_pct">.417</td></tr>
    <tr><th data-stat="year_id">2004-05</th><td data-stat="team_name_abbr">CLE</td><td data-stat="comp_name_abbr">NBA</td><td data-stat="games">80</td><td data-stat="games_started">80</td><td data-stat="pts_per_g">27.2</td><td data-stat="fg_pct">.472</td></tr>
    <tr class="spacer"><td data-stat="unknown"></td></tr>
    <tr><th data-stat="year_id">Career</th><td data-stat="team_name_abbr"></td><td data-stat="comp_name_abbr">NBA</td><td data-stat="games">1562</td><td data-stat="games_started">1561</td><td data-stat="pts_per_g">27.0</td><td data-stat="fg_pct">.505</td></tr>
  </tbody>
</table>
</div>
</body>
</html>"#;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    #[test]
    fn test_parse_identity_and_bio() {
        let record = PlayerParser::parse_as_of(SAMPLE_HTML, "jamesle01", today());

        assert_eq!(record.player_id, "jamesle01");
        assert_eq!(record.name, "LeBron James");
        assert_eq!(record.team.as_deref(), Some("LAL"));
        assert_eq!(record.position.as_deref(), Some("Small Forward and Point Guard"));
        assert_eq!(record.height.as_deref(), Some("6-9"));
        assert_eq!(record.weight.as_deref(), Some("250lb"));
        assert_eq!(record.birth_date.as_deref(), Some("1984-12-30"));
        assert_eq!(record.hometown.as_deref(), Some("Akron, Ohio us"));
        assert_eq!(record.jersey_number.as_deref(), Some("23"));
        assert_eq!(record.age, Some(40));
        assert_eq!(
            record.url,
            "https://www.basketball-reference.com/players/j/jamesle01.html"
        );
    }

    #[test]
    fn test_parse_summary() {
        let record = PlayerParser::parse_as_of(SAMPLE_HTML, "jamesle01", today());

        assert_eq!(
            record.summary.get("PTS"),
            Some(&SummaryValue::CurrentCareer {
                current: "23.7".into(),
                career: "27.0".into()
            })
        );
        assert_eq!(record.summary.get("WS"), Some(&SummaryValue::Scalar("7.8".into())));
        assert_eq!(record.summary.len(), 3);
    }

    #[test]
    fn test_parse_per_game() {
        let record = PlayerParser::parse_as_of(SAMPLE_HTML, "jamesle01", today());

        // The spacer row has no known column and is dropped
        assert_eq!(record.per_game.len(), 3);
        let first = &record.per_game[0];
        assert_eq!(first.get("year_id"), Some(&CellValue::Text("2003-04".into())));
        assert_eq!(first.get("team_name_abbr"), Some(&CellValue::Text("CLE".into())));
        assert_eq!(first.get("pts_per_g"), Some(&CellValue::Number(20.9)));
        assert_eq!(first.get("fg_pct"), Some(&CellValue::Number(0.417)));
    }

    #[test]
    fn test_season_rows_skip_career() {
        let record = PlayerParser::parse_as_of(SAMPLE_HTML, "jamesle01", today());
        let rows = record.season_rows();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].season, "2003-04");
        assert_eq!(rows[0].team.as_deref(), Some("CLE"));
        assert_eq!(rows[0].league.as_deref(), Some("NBA"));
        assert_eq!(rows[0].games, Some(79));
        assert_eq!(rows[1].pts_per_g, Some(27.2));
    }

    #[test]
    fn test_season_filter() {
        let row = |season: &str| SeasonStatRow {
            season: season.to_string(),
            ..Default::default()
        };

        assert!(row("2023-24").is_persistable());
        assert!(row("1999").is_persistable());
        assert!(row("2019-20*").is_persistable());
        assert!(!row("Career").is_persistable());
        assert!(!row("").is_persistable());
        assert!(!row("3 Yrs").is_persistable());
    }

    #[test]
    fn test_numeric_season_label() {
        let mut line = StatLine::new();
        line.insert("season".into(), CellValue::Number(1999.0));
        line.insert("g".into(), CellValue::Number(50.0));

        let row = SeasonStatRow::from_stat_line(&line);
        assert_eq!(row.season, "1999");
        assert_eq!(row.games, Some(50));
        assert!(row.is_persistable());
    }

    #[test]
    fn test_fallbacks_without_tags() {
        let html = r#"<html><head><title>Bill Russell Stats | Basketball-Reference.com</title></head>
        <body><div id="meta">
          <p>Position: Center &#9642; Shoots: Right</p>
          <p>6-10, 215lb (208cm, 97kg)</p>
          <p>Born: February 12, 1934 in Monroe, Louisiana &#9642; #6</p>
        </div>
        <table><thead><tr><th data-stat="season">Season</th><th data-stat="pts_per_g">PTS</th></tr></thead>
        <tbody><tr><th data-stat="season">1956-57</th><td data-stat="pts_per_g">14.7</td></tr></tbody></table>
        </body></html>"#;

        let record = PlayerParser::parse_as_of(html, "russebi01", today());

        assert_eq!(record.name, "Bill Russell");
        assert_eq!(record.position.as_deref(), Some("Center"));
        assert_eq!(record.height.as_deref(), Some("6-10"));
        assert_eq!(record.weight.as_deref(), Some("215lb"));
        assert_eq!(record.birth_date.as_deref(), Some("1934-02-12"));
        assert_eq!(record.hometown.as_deref(), Some("Monroe, Louisiana"));
        assert_eq!(record.jersey_number.as_deref(), Some("6"));
        assert_eq!(record.team, None);
        assert_eq!(record.per_game.len(), 1);
        assert_eq!(record.season_rows()[0].pts_per_g, Some(14.7));
    }

    #[test]
    fn test_per_game_prefers_table_named_after_player() {
        let html = r#"<html><body>
        <table id="playoffs"><thead><tr><th data-stat="year_id">Season</th><th data-stat="pts_per_g">PTS</th></tr></thead>
        <tbody><tr><th data-stat="year_id">2019-20</th><td data-stat="pts_per_g">27.6</td></tr></tbody></table>
        <div id="div_per_game_stats"><table id="davisan02">
        <thead><tr><th data-stat="year_id">Season</th><th data-stat="pts_per_g">PTS</th></tr></thead>
        <tbody><tr><th data-stat="year_id">2012-13</th><td data-stat="pts_per_g">13.5</td></tr>
        <tr><th data-stat="year_id">2013-14</th><td data-stat="pts_per_g">20.8</td></tr></tbody></table></div>
        </body></html>"#;

        let record = PlayerParser::parse_as_of(html, "davisan02", today());
        assert_eq!(record.per_game.len(), 2);
        assert_eq!(record.per_game[0].get("pts_per_g"), Some(&CellValue::Number(13.5)));

        // Another player's id falls through to the first table with a points column
        let other = PlayerParser::parse_as_of(html, "jamesle01", today());
        assert_eq!(other.per_game.len(), 1);
        assert_eq!(other.per_game[0].get("pts_per_g"), Some(&CellValue::Number(27.6)));
    }

    #[test]
    fn test_missing_bio_paragraph() {
        let html = r#"<html><head><title>Someone Stats</title></head><body><h1>Someone</h1></body></html>"#;
        let record = PlayerParser::parse_as_of(html, "someone01", today());

        assert_eq!(record.name, "Someone");
        assert_eq!(record.birth_date, None);
        assert_eq!(record.hometown, None);
        assert_eq!(record.jersey_number, None);
        assert_eq!(record.age, None);
        assert!(record.per_game.is_empty());
        assert!(record.summary.is_empty());
    }

    #[test]
    fn test_parse_empty_html() {
        let record = PlayerParser::parse("", "nobody01");
        assert_eq!(record.player_id, "nobody01");
        assert!(record.name.is_empty());
        assert_eq!(record.position, None);
    }
}
