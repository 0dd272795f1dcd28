//! Team season page parser for basketball-reference.com.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

use super::extract::{
    element_text, first_match, non_empty, normalize_ws, player_id_from_href, Strategy,
};
use crate::scraper::coerce::{coerce_number_or_text, CellValue};
use crate::scraper::team_url;

/// Franchise nicknames used to pick the team name out of a multi-line heading.
const FRANCHISES: [&str; 30] = [
    "Lakers",
    "Celtics",
    "Nets",
    "Knicks",
    "76ers",
    "Raptors",
    "Bulls",
    "Cavaliers",
    "Pistons",
    "Pacers",
    "Bucks",
    "Hawks",
    "Hornets",
    "Heat",
    "Magic",
    "Wizards",
    "Nuggets",
    "Timberwolves",
    "Thunder",
    "Trail Blazers",
    "Jazz",
    "Warriors",
    "Clippers",
    "Suns",
    "Kings",
    "Mavericks",
    "Rockets",
    "Grizzlies",
    "Pelicans",
    "Spurs",
];

/// Win/loss record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRecordLine {
    pub wins: u32,
    pub losses: u32,
}

/// Team season data
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRecord {
    pub team_id: String,
    pub season: String,
    pub name: String,
    pub record: Option<TeamRecordLine>,
    pub pts_per_game: Option<f64>,
    pub opp_pts_per_game: Option<f64>,
    pub srs: Option<f64>,
    pub pace: Option<f64>,
    pub off_rtg: Option<f64>,
    pub def_rtg: Option<f64>,
    pub roster: Vec<RosterEntry>,
    pub url: String,
}

/// One player row of the team's per-game table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    pub player_id: Option<String>,
    pub player: String,
    pub pos: Option<String>,
    pub age: Option<CellValue>,
    pub g: Option<CellValue>,
    pub gs: Option<CellValue>,
    pub mp: Option<CellValue>,
    pub pts: Option<CellValue>,
    pub trb: Option<CellValue>,
    pub ast: Option<CellValue>,
    pub fg_pct: Option<CellValue>,
    pub fg3_pct: Option<CellValue>,
    pub ft_pct: Option<CellValue>,
}

static H1: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").unwrap());
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());
static TABLE: Lazy<Selector> = Lazy::new(|| Selector::parse("table").unwrap());
static PTS_CELL: Lazy<Selector> = Lazy::new(|| Selector::parse(r#"td[data-stat="pts_per_g"]"#).unwrap());
static NAME_CELL: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"td[data-stat="name_display"]"#).unwrap());
static BODY_ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tbody tr").unwrap());
static DATA_CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td[data-stat]").unwrap());
static LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());

static FRANCHISE_RE: Lazy<Regex> = Lazy::new(|| {
    let names = FRANCHISES.join("|");
    Regex::new(&format!(r"(?i)\s+([^\n]+(?:{})[^\n]*)", names)).unwrap()
});
static HEADING_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s+([A-Za-z ][^\n]*?)(?:\n|Roster|$)").unwrap());
static ROSTER_SUFFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\s*Roster and Stats\s*$").unwrap());
static ROSTER_TAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\s*Roster.*$").unwrap());

static RECORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Record:\s*(\d+)-(\d+)").unwrap());
static PTS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"PTS/G:\s*([\d.]+)").unwrap());
static OPP_PTS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Opp PTS/G:\s*([\d.]+)").unwrap());
static SRS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"SRS[:\s]*([-\d.]+)").unwrap());
static PACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Pace[:\s]*([\d.]+)").unwrap());
static OFF_RTG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Off Rtg[:\s]*([\d.]+)").unwrap());
static DEF_RTG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Def Rtg[:\s]*([\d.]+)").unwrap());

/// Raw heading text, used by the name strategies.
struct Heading(String);

/// Parser for team season pages
pub struct TeamParser;

impl TeamParser {
    /// Parse a team page; every field degrades independently.
    pub fn parse(html: &str, team_id: &str, season: &str) -> TeamRecord {
        let document = Html::parse_document(html);

        let heading = Heading(
            document
                .select(&H1)
                .next()
                .map(|h1| h1.text().collect::<String>().trim().to_string())
                .unwrap_or_default(),
        );
        let name_strategies: [Strategy<Heading, String>; 3] =
            [name_from_franchise, name_from_heading_line, name_from_heading_text];

        let paragraphs = document
            .select(&PARAGRAPH)
            .map(|p| p.text().collect::<String>())
            .collect::<Vec<_>>()
            .join(" ");

        TeamRecord {
            team_id: team_id.to_string(),
            season: season.to_string(),
            name: first_match(&heading, &name_strategies).unwrap_or_default(),
            record: parse_record(&paragraphs),
            pts_per_game: labeled_number(&PTS_RE, &paragraphs),
            opp_pts_per_game: labeled_number(&OPP_PTS_RE, &paragraphs),
            srs: labeled_number(&SRS_RE, &paragraphs),
            pace: labeled_number(&PACE_RE, &paragraphs),
            off_rtg: labeled_number(&OFF_RTG_RE, &paragraphs),
            def_rtg: labeled_number(&DEF_RTG_RE, &paragraphs),
            roster: parse_roster(&document),
            url: team_url(team_id, season),
        }
    }
}

fn name_from_franchise(heading: &Heading) -> Option<String> {
    let caps = FRANCHISE_RE.captures(&heading.0)?;
    non_empty(strip_roster_suffix(caps[1].trim()))
}

fn name_from_heading_line(heading: &Heading) -> Option<String> {
    let caps = HEADING_LINE_RE.captures(&heading.0)?;
    non_empty(strip_roster_suffix(caps[1].trim()))
}

fn name_from_heading_text(heading: &Heading) -> Option<String> {
    let collapsed = normalize_ws(&heading.0);
    non_empty(ROSTER_TAIL_RE.replace(&collapsed, "").trim().to_string())
}

fn strip_roster_suffix(name: &str) -> String {
    ROSTER_SUFFIX_RE.replace(name, "").trim().to_string()
}

fn parse_record(text: &str) -> Option<TeamRecordLine> {
    let caps = RECORD_RE.captures(text)?;
    Some(TeamRecordLine {
        wins: caps[1].parse().ok()?,
        losses: caps[2].parse().ok()?,
    })
}

fn labeled_number(re: &Regex, text: &str) -> Option<f64> {
    re.captures(text)
        .and_then(|caps| caps[1].parse::<f64>().ok())
        .filter(|n| n.is_finite())
}

/// The roster table is the only one carrying both player names and points per game.
fn parse_roster(document: &Html) -> Vec<RosterEntry> {
    let Some(table) = document.select(&TABLE).find(|t| {
        t.select(&PTS_CELL).next().is_some() && t.select(&NAME_CELL).next().is_some()
    }) else {
        return Vec::new();
    };

    table.select(&BODY_ROW).map(|tr| roster_entry(&tr)).collect()
}

fn roster_entry(row: &ElementRef) -> RosterEntry {
    let name_cell = row.select(&NAME_CELL).next();
    let link = name_cell.and_then(|cell| cell.select(&LINK).next());
    let player = link
        .or(name_cell)
        .map(|el| element_text(&el))
        .unwrap_or_default();
    let player_id = link
        .and_then(|a| a.value().attr("href"))
        .and_then(player_id_from_href);

    RosterEntry {
        player_id,
        player,
        pos: cell_text(row, "pos"),
        age: stat_cell(row, "age"),
        g: stat_cell(row, "g"),
        gs: stat_cell(row, "gs"),
        mp: stat_cell(row, "mp_per_g"),
        pts: stat_cell(row, "pts_per_g"),
        trb: stat_cell(row, "trb_per_g"),
        ast: stat_cell(row, "ast_per_g"),
        fg_pct: stat_cell(row, "fg_pct"),
        fg3_pct: stat_cell(row, "fg3_pct"),
        ft_pct: stat_cell(row, "ft_pct"),
    }
}

fn cell_text(row: &ElementRef, stat: &str) -> Option<String> {
    row.select(&DATA_CELL)
        .find(|td| td.value().attr("data-stat") == Some(stat))
        .and_then(|td| non_empty(element_text(&td)))
}

fn stat_cell(row: &ElementRef, stat: &str) -> Option<CellValue> {
    // Team tables name games/starts `games`/`games_started` where player tables use `g`/`gs`
    let single = [stat];
    let aliases: &[&str] = match stat {
        "g" => &["g", "games"],
        "gs" => &["gs", "games_started"],
        _ => &single,
    };
    aliases
        .iter()
        .find_map(|alias| cell_text(row, alias))
        .map(|text| coerce_number_or_text(&text))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HTML: &str = r#"<!DOCTYPE html>
<html>
<body>
<div id="meta">
<h1>
      <span>2024-25</span>
      <span>Los Angeles Lakers</span>
    Roster and Stats
</h1>
<p><strong>Record:</strong> 50-32, Finished 3rd in NBA Western Conference</p>
<p><strong>PTS/G:</strong> 112.2 (15th of 30) <strong>Opp PTS/G:</strong> 112.3 (17th of 30)</p>
<p><strong>SRS</strong>: 0.28 (16th of 30) <strong>Pace</strong>: 98.7 (21st of 30)</p>
<p><strong>Off Rtg</strong>: 115.3 (10th of 30) <strong>Def Rtg</strong>: 113.8 (17th of 30)</p>
</div>
<table id="roster">
  <tbody><tr><td data-stat="player"><a href="/players/j/jamesle01.html">LeBron James</a></td></tr></tbody>
</table>
<table id="per_game_stats">
  <tbody>
    <tr>
      <td data-stat="name_display"><a href="/players/j/jamesle01.html">LeBron James</a></td>
      <td data-stat="age">40</td><td data-stat="pos">PF</td>
      <td data-stat="games">70</td><td data-stat="games_started">70</td>
      <td data-stat="mp_per_g">34.9</td><td data-stat="pts_per_g">24.4</td>
      <td data-stat="trb_per_g">7.8</td><td data-stat="ast_per_g">8.2</td>
      <td data-stat="fg_pct">.513</td><td data-stat="fg3_pct">.376</td><td data-stat="ft_pct">.782</td>
    </tr>
    <tr>
      <td data-stat="name_display">Two-Way Player</td>
      <td data-stat="g">3</td><td data-stat="pts_per_g">1.0</td>
    </tr>
  </tbody>
</table>
</body>
</html>"#;

    #[test]
    fn test_parse_team_identity() {
        let team = TeamParser::parse(SAMPLE_HTML, "LAL", "2025");

        assert_eq!(team.team_id, "LAL");
        assert_eq!(team.season, "2025");
        assert_eq!(team.name, "Los Angeles Lakers");
        assert_eq!(team.url, "https://www.basketball-reference.com/teams/LAL/2025.html");
    }

    #[test]
    fn test_parse_team_ratings() {
        let team = TeamParser::parse(SAMPLE_HTML, "LAL", "2025");

        assert_eq!(team.record, Some(TeamRecordLine { wins: 50, losses: 32 }));
        assert_eq!(team.pts_per_game, Some(112.2));
        assert_eq!(team.opp_pts_per_game, Some(112.3));
        assert_eq!(team.srs, Some(0.28));
        assert_eq!(team.pace, Some(98.7));
        assert_eq!(team.off_rtg, Some(115.3));
        assert_eq!(team.def_rtg, Some(113.8));
    }

    #[test]
    fn test_parse_roster() {
        let team = TeamParser::parse(SAMPLE_HTML, "LAL", "2025");

        assert_eq!(team.roster.len(), 2);
        let lebron = &team.roster[0];
        assert_eq!(lebron.player, "LeBron James");
        assert_eq!(lebron.player_id.as_deref(), Some("jamesle01"));
        assert_eq!(lebron.pos.as_deref(), Some("PF"));
        assert_eq!(lebron.g, Some(CellValue::Number(70.0)));
        assert_eq!(lebron.gs, Some(CellValue::Number(70.0)));
        assert_eq!(lebron.pts, Some(CellValue::Number(24.4)));
        assert_eq!(lebron.fg3_pct, Some(CellValue::Number(0.376)));

        let two_way = &team.roster[1];
        assert_eq!(two_way.player, "Two-Way Player");
        assert_eq!(two_way.player_id, None);
        assert_eq!(two_way.g, Some(CellValue::Number(3.0)));
        assert_eq!(two_way.gs, None);
        assert_eq!(two_way.pos, None);
    }

    #[test]
    fn test_missing_labels_are_independent() {
        let html = r#"<html><body><h1>2024-25 Boston Celtics Roster and Stats</h1>
            <p>Pace: 97.1</p></body></html>"#;
        let team = TeamParser::parse(html, "BOS", "2025");

        assert_eq!(team.name, "Boston Celtics");
        assert_eq!(team.pace, Some(97.1));
        assert_eq!(team.record, None);
        assert_eq!(team.srs, None);
        assert!(team.roster.is_empty());
    }

    #[test]
    fn test_unknown_franchise_name() {
        let html = "<html><body><h1>1949-50\n    Anderson Packers\n  Roster and Stats</h1></body></html>";
        let team = TeamParser::parse(html, "AND", "1950");
        assert_eq!(team.name, "Anderson Packers");
    }

    #[test]
    fn test_parse_empty_html() {
        let team = TeamParser::parse("<html></html>", "LAL", "2025");
        assert!(team.name.is_empty());
        assert!(team.roster.is_empty());
        assert_eq!(team.pts_per_game, None);
    }
}
