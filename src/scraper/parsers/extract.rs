//! Shared extraction helpers: ordered strategy chains and text cleanup.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::ElementRef;

/// Player id inside a link such as `/players/j/jamesle01.html`.
pub static PLAYER_HREF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/players/[a-z]/([a-z]+\d+)\.html").unwrap());

/// A single way of pulling one field out of a page.
pub type Strategy<C, T> = fn(&C) -> Option<T>;

/// Try each strategy in order and return the first hit.
pub fn first_match<C, T>(page: &C, strategies: &[Strategy<C, T>]) -> Option<T> {
    strategies.iter().find_map(|strategy| strategy(page))
}

/// Collapse runs of whitespace (including non-breaking spaces) and trim.
pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whitespace-normalized text content of an element.
pub fn element_text(element: &ElementRef) -> String {
    normalize_ws(&element.text().collect::<String>())
}

/// `Some(text)` unless the text is empty.
pub fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Extract the player id from an href, if it points at a player page.
pub fn player_id_from_href(href: &str) -> Option<String> {
    PLAYER_HREF_RE
        .captures(href)
        .map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn always_none(_: &i32) -> Option<String> {
        None
    }

    fn doubled(n: &i32) -> Option<String> {
        Some((n * 2).to_string())
    }

    fn tripled(n: &i32) -> Option<String> {
        Some((n * 3).to_string())
    }

    #[test]
    fn test_first_match_order() {
        assert_eq!(first_match(&2, &[always_none, doubled, tripled]), Some("4".into()));
        assert_eq!(first_match(&2, &[tripled, doubled]), Some("6".into()));
        assert_eq!(first_match(&2, &[always_none]), None);
    }

    #[test]
    fn test_normalize_ws() {
        assert_eq!(normalize_ws("  Akron,\u{a0}Ohio \n us "), "Akron, Ohio us");
    }

    #[test]
    fn test_player_id_from_href() {
        assert_eq!(
            player_id_from_href("/players/j/jamesle01.html").as_deref(),
            Some("jamesle01")
        );
        assert_eq!(player_id_from_href("/players/j/"), None);
        assert_eq!(player_id_from_href("/teams/LAL/2025.html"), None);
    }
}
