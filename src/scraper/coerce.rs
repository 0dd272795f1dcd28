//! Locale-free coercion of upstream text: birth dates, ages and stat cells.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static ISO_DATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());
static MONTH_DAY_YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z]+)\.?\s+(\d{1,2}),?\s+(\d{4})$").unwrap());
static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}$").unwrap());

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// A table cell after numeric coercion.
///
/// Numeric cells become `Number`; anything else (team abbreviations,
/// season labels, awards) is kept verbatim as `Text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(_) => None,
        }
    }

    /// Render the cell the way upstream printed it; whole numbers lose the
    /// trailing `.0` so `1999.0` reads back as `"1999"`.
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            CellValue::Number(n) => n.to_string(),
            CellValue::Text(s) => s.clone(),
        }
    }
}

/// Normalize an upstream birth date to `YYYY-MM-DD`.
///
/// Accepts ISO dates unchanged, `Month D, YYYY` (case-insensitive month name
/// or its three-letter prefix, day clamped to 1..=31) and bare years, which
/// default to January 1st. Everything else yields `None`.
pub fn parse_born_date(text: &str) -> Option<String> {
    let s = text.trim();
    if s.is_empty() {
        return None;
    }

    if ISO_DATE_RE.is_match(s) {
        return Some(s.to_string());
    }

    if let Some(caps) = MONTH_DAY_YEAR_RE.captures(s) {
        let month = month_number(&caps[1])?;
        let day: u32 = caps[2].parse().ok()?;
        let day = day.clamp(1, 31);
        return Some(format!("{}-{:02}-{:02}", &caps[3], month, day));
    }

    if YEAR_RE.is_match(s) {
        return Some(format!("{}-01-01", s));
    }

    None
}

fn month_number(name: &str) -> Option<u32> {
    let lower = name.to_ascii_lowercase();
    // Full names, plus abbreviations such as "Dec" or "Sept"
    MONTHS
        .iter()
        .position(|m| *m == lower || (matches!(lower.len(), 3 | 4) && m.starts_with(&lower)))
        .map(|i| i as u32 + 1)
}

/// Whole years between `iso_date` and `today`.
///
/// Returns `None` when the date is not a valid ISO date or lies in the future.
pub fn age_from_birth_date(iso_date: &str, today: NaiveDate) -> Option<u32> {
    let born = NaiveDate::parse_from_str(iso_date.trim(), "%Y-%m-%d").ok()?;

    let mut age = today.year() - born.year();
    if (today.month(), today.day()) < (born.month(), born.day()) {
        age -= 1;
    }

    u32::try_from(age).ok()
}

/// Coerce a stat cell: finite numbers become `Number`, the rest stays text.
pub fn coerce_number_or_text(cell_text: &str) -> CellValue {
    let trimmed = cell_text.trim();
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => CellValue::Number(n),
        _ => CellValue::Text(trimmed.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_iso_date_is_identity() {
        for iso in ["1984-12-30", "2001-02-03", "1950-01-01"] {
            assert_eq!(parse_born_date(iso).as_deref(), Some(iso));
        }
    }

    #[test]
    fn test_month_day_year() {
        assert_eq!(
            parse_born_date("December 30, 1984").as_deref(),
            Some("1984-12-30")
        );
        assert_eq!(parse_born_date("march 5, 1990").as_deref(), Some("1990-03-05"));
        assert_eq!(parse_born_date("Sep 9, 2001").as_deref(), Some("2001-09-09"));
    }

    #[test]
    fn test_day_is_clamped() {
        assert_eq!(parse_born_date("June 45, 1999").as_deref(), Some("1999-06-31"));
        assert_eq!(parse_born_date("June 0, 1999").as_deref(), Some("1999-06-01"));
    }

    #[test]
    fn test_bare_year() {
        assert_eq!(parse_born_date("1947").as_deref(), Some("1947-01-01"));
    }

    #[test]
    fn test_malformed_dates() {
        assert_eq!(parse_born_date(""), None);
        assert_eq!(parse_born_date("unknown"), None);
        assert_eq!(parse_born_date("Smarch 3, 1990"), None);
        assert_eq!(parse_born_date("12/30/1984"), None);
    }

    #[test]
    fn test_age_from_birth_date() {
        assert_eq!(age_from_birth_date("1984-12-30", date(2025, 1, 15)), Some(40));
        assert_eq!(age_from_birth_date("1984-12-30", date(2024, 12, 29)), Some(39));
        assert_eq!(age_from_birth_date("1984-12-30", date(2024, 12, 30)), Some(40));
    }

    #[test]
    fn test_age_invalid_or_negative() {
        assert_eq!(age_from_birth_date("not a date", date(2025, 1, 1)), None);
        assert_eq!(age_from_birth_date("2030-01-01", date(2025, 1, 1)), None);
    }

    #[test]
    fn test_coerce_number_or_text() {
        assert_eq!(coerce_number_or_text(" 27.1 "), CellValue::Number(27.1));
        assert_eq!(coerce_number_or_text(".504"), CellValue::Number(0.504));
        assert_eq!(coerce_number_or_text("LAL"), CellValue::Text("LAL".to_string()));
        assert_eq!(
            coerce_number_or_text("2023-24"),
            CellValue::Text("2023-24".to_string())
        );
        assert_eq!(coerce_number_or_text("NaN"), CellValue::Text("NaN".to_string()));
    }

    #[test]
    fn test_cell_to_text() {
        assert_eq!(CellValue::Number(1999.0).to_text(), "1999");
        assert_eq!(CellValue::Number(0.5).to_text(), "0.5");
        assert_eq!(CellValue::Text("Career".into()).to_text(), "Career");
    }
}
