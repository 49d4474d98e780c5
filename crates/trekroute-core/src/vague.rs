//! Detection of generic mountaineering names that no geocoder can place.
//!
//! `"Camp 2"` or `"High Camp"` exist on hundreds of mountains; a lookup either
//! finds nothing or finds the wrong one. Such names skip the network and go
//! straight to interpolation.

use std::sync::LazyLock;

use regex::Regex;

static VAGUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:high\s+camp|base\s+camp|camp(?:\s*\d+)?|abc|pass|summit|checkpoint(?:\s*\d+)?|rest\s+day)\b",
    )
    .expect("valid regex")
});

/// `true` when `name` contains a generic term (camp, high/base camp, ABC,
/// pass, summit, checkpoint, rest day) as a whole word.
#[must_use]
pub fn is_vague_name(name: &str) -> bool {
    VAGUE_RE.is_match(name)
}
