//! Record parser for the film locations dataset.
//!
//! A record looks like
//! `"#1 Single" (2006) {Cats and Dogs (#1.4)}\t\tLos Angeles, California, USA\t(studio)`:
//! a quoted title, optional annotations, then tab-separated fields of which
//! the last non-parenthesized one is the filming location.

use serde::{Deserialize, Serialize};

/// A title and the free-text location it was filmed at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilmLocationPair {
    /// `None` when the quoting of the record could not be read.
    pub title: Option<String>,
    pub location: String,
}

/// Parse one raw dataset line.
pub fn parse_record(line: &str) -> FilmLocationPair {
    FilmLocationPair {
        title: parse_title(line),
        location: parse_location(line),
    }
}

/// Parse every line, preserving order.
pub fn parse_records<'a, I>(lines: I) -> Vec<FilmLocationPair>
where
    I: IntoIterator<Item = &'a str>,
{
    lines.into_iter().map(parse_record).collect()
}

/// The text between the first two double quotes.
///
/// Only lines with exactly two quotes (plain title) or four (title plus a
/// quoted episode or alternate title) have a readable title.
pub fn parse_title(line: &str) -> Option<String> {
    match line.matches('"').count() {
        2 | 4 => {
            let mut parts = line.split('"');
            parts.next();
            parts.next().map(str::to_string)
        }
        _ => None,
    }
}

/// The filming location: the last tab-separated field once trailing
/// parenthesized notes are removed.
pub fn parse_location(line: &str) -> String {
    let mut fields: Vec<&str> = line.split('\t').collect();
    while fields.len() > 1 && is_note(fields[fields.len() - 1]) {
        fields.pop();
    }

    // Only the leading field is left: it still carries the title.
    if fields.len() == 1 {
        return strip_header(fields[0]).to_string();
    }
    fields[fields.len() - 1].trim().to_string()
}

fn is_parenthesized(field: &str) -> bool {
    field.starts_with('(') && field.ends_with(')')
}

fn is_note(field: &str) -> bool {
    let field = field.trim();
    field.is_empty() || is_parenthesized(field)
}

/// Drop a leading quoted title and any `(...)` / `{...}` annotations after it.
fn strip_header(field: &str) -> &str {
    let mut rest = field.trim();

    if let Some(after_open) = rest.strip_prefix('"') {
        rest = match after_open.find('"') {
            Some(close) => &after_open[close + 1..],
            None => after_open,
        };
    }

    loop {
        rest = rest.trim_start();
        let close = match rest.chars().next() {
            Some('(') => ')',
            Some('{') => '}',
            _ => break,
        };
        match matching_close(rest, close) {
            Some(end) => rest = &rest[end + 1..],
            None => break,
        }
    }
    rest.trim()
}

/// Byte index of the bracket closing the one at position 0, honouring nesting.
fn matching_close(s: &str, close: char) -> Option<usize> {
    let open = s.chars().next()?;
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_two_quotes() {
        assert_eq!(
            parse_title(r#""Name of the film" (2022) Location, Country"#),
            Some("Name of the film".to_string())
        );
    }

    #[test]
    fn test_title_four_quotes() {
        let line = "\"60 Minutes\" (1968) {\"Andy\" (#2.5)}\tNew York City, New York, USA";
        assert_eq!(parse_title(line), Some("60 Minutes".to_string()));
    }

    #[test]
    fn test_title_bad_quote_count() {
        assert_eq!(parse_title("No quotes (1999)\tParis, France"), None);
        assert_eq!(parse_title("\"Unclosed (1999)\tParis, France"), None);
        assert_eq!(parse_title("\"A\" \"B\" \"C\"\tParis"), None);
    }

    #[test]
    fn test_title_empty_quotes() {
        assert_eq!(parse_title("\"\" (2001)\tRome, Italy"), Some(String::new()));
    }

    #[test]
    fn test_location_without_tabs() {
        assert_eq!(
            parse_location(r#""Name of the film" (2022) Location, Country"#),
            "Location, Country"
        );
    }

    #[test]
    fn test_location_plain() {
        assert_eq!(parse_location("New York, USA"), "New York, USA");
    }

    #[test]
    fn test_location_strips_trailing_notes() {
        let line = "\"Title\" (Alt)\t(2021)\tNew York, USA\t(on location)\t(uncredited)";
        assert_eq!(parse_location(line), "New York, USA");
    }

    #[test]
    fn test_location_after_parenthetical_field() {
        let line = "\"Title\" (Alt)\t(2021)\tNew York, USA";
        assert_eq!(parse_location(line), "New York, USA");
    }

    #[test]
    fn test_location_skips_empty_fields() {
        let line = "\"#1 Single\" (2006)\t\t\t\tLos Angeles, California, USA\t";
        assert_eq!(parse_location(line), "Los Angeles, California, USA");
    }

    #[test]
    fn test_location_only_notes_left() {
        // Every trailing field is a note; the leading field has no location.
        let line = "\"Lost\" (2004)\t(2004)\t(pilot)";
        assert_eq!(parse_location(line), "");
    }

    #[test]
    fn test_location_episode_braces() {
        let line = r##""#VanLifeAttila" (2016) {Barkerville (#1.2)} Barkerville, British Columbia, Canada"##;
        assert_eq!(parse_location(line), "Barkerville, British Columbia, Canada");
    }

    #[test]
    fn test_parse_record() {
        let pair = parse_record("\"Eve\" (1950)\t\t\tSan Francisco, California, USA\t(exteriors)");
        assert_eq!(pair.title.as_deref(), Some("Eve"));
        assert_eq!(pair.location, "San Francisco, California, USA");
    }

    #[test]
    fn test_parse_records_keeps_order() {
        let pairs = parse_records(["\"A\" (1969)\tOslo, Norway", "B (1969)\tRome, Italy"]);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].title.as_deref(), Some("A"));
        assert_eq!(pairs[1].title, None);
        assert_eq!(pairs[1].location, "Rome, Italy");
    }

    #[test]
    fn test_matching_close_nested() {
        assert_eq!(matching_close("{a (b) c} d", '}'), Some(8));
        assert_eq!(matching_close("(a (b) c", ')'), None);
    }
}
