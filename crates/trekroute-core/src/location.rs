//! Extraction of a geocodable place name from a free-text stop description.
//!
//! Itinerary text is written for people: `"Fly Kathmandu to Lukla (2,840m)"`,
//! `"Rest day at Dole"`. The destination of the day's travel is the place the
//! stop should be drawn at, so the parser keeps only the text after the last
//! `to` (or, failing that, the last `at`) and drops parenthetical notes.

use std::sync::LazyLock;

use regex::Regex;

static PARENTHETICAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]*\)?").expect("valid regex"));
static TO_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bto\b").expect("valid regex"));
static AT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bat\b").expect("valid regex"));

/// Returns the clean place name for `raw`, or an empty string when nothing
/// usable remains.
///
/// Rules, in order:
/// 1. Parenthetical annotations (including an unclosed trailing one) are removed.
/// 2. If the word `to` appears (case-insensitive), keep what follows its last occurrence.
/// 3. Otherwise, if the word `at` appears, keep what follows its last occurrence.
/// 4. Whitespace is collapsed and separator punctuation trimmed from both ends.
#[must_use]
pub fn parse_location_name(raw: &str) -> String {
    let without_notes = PARENTHETICAL_RE.replace_all(raw, " ");

    let tail = last_match_end(&TO_RE, &without_notes)
        .or_else(|| last_match_end(&AT_RE, &without_notes))
        .map_or(without_notes.as_ref(), |end| &without_notes[end..]);

    tail.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_matches(|c: char| matches!(c, ',' | ';' | ':' | '.' | '-' | '/' | '\u{2013}' | '\u{2014}'))
        .trim()
        .to_string()
}

fn last_match_end(re: &Regex, text: &str) -> Option<usize> {
    re.find_iter(text).last().map(|m| m.end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_destination_after_to() {
        assert_eq!(parse_location_name("Lukla to Namche Bazaar"), "Namche Bazaar");
    }

    #[test]
    fn takes_text_after_last_to() {
        assert_eq!(
            parse_location_name("Kathmandu to Lukla to Phakding"),
            "Phakding"
        );
    }

    #[test]
    fn to_is_case_insensitive() {
        assert_eq!(parse_location_name("TREK TO Gorak Shep"), "Gorak Shep");
    }

    #[test]
    fn to_inside_a_word_is_ignored() {
        assert_eq!(parse_location_name("Tatopani"), "Tatopani");
        assert_eq!(parse_location_name("Tato Pani"), "Tato Pani");
    }

    #[test]
    fn takes_text_after_at() {
        assert_eq!(parse_location_name("Rest day at Dole"), "Dole");
    }

    #[test]
    fn to_wins_over_at() {
        assert_eq!(
            parse_location_name("Start at Jiri and walk to Shivalaya"),
            "Shivalaya"
        );
    }

    #[test]
    fn strips_parenthetical_annotation() {
        assert_eq!(parse_location_name("Thorong La (5416m)"), "Thorong La");
    }

    #[test]
    fn parenthetical_containing_to_does_not_split() {
        assert_eq!(
            parse_location_name("Dingboche (optional hike to Nangkartshang)"),
            "Dingboche"
        );
    }

    #[test]
    fn strips_unclosed_parenthetical() {
        assert_eq!(parse_location_name("Manang (3540m"), "Manang");
    }

    #[test]
    fn whole_string_used_when_no_keyword() {
        assert_eq!(parse_location_name("  Lukla  "), "Lukla");
    }

    #[test]
    fn collapses_inner_whitespace_and_trailing_punctuation() {
        assert_eq!(parse_location_name("Fly to  Jomsom ,"), "Jomsom");
    }

    #[test]
    fn empty_and_whitespace_input_is_unparseable() {
        assert_eq!(parse_location_name(""), "");
        assert_eq!(parse_location_name("   \t"), "");
    }

    #[test]
    fn dangling_to_is_unparseable() {
        assert_eq!(parse_location_name("Walk to"), "");
    }
}
