//! Fuzzy song-title matching, used to skip near-duplicate files
//! (alternate takes, "(1)" re-exports, "live"/"remastered" variants)
//! before they are analyzed twice.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"[\W_]+").unwrap();
    static ref QUALIFIER: Regex = Regex::new(r"\b(copy|remastered|live|version|edit)\b").unwrap();
    static ref TRAILING_INDEX: Regex = Regex::new(r"\s*\(?\d+\)?$").unwrap();
}

/// Canonical form of a song title or file name for duplicate detection.
pub fn normalize_title(name: &str) -> String {
    let name = name.to_lowercase();
    let name = name
        .replace(".midi", "")
        .replace(".mid", "")
        .replace(".json", "")
        .replace("(copy)", "");
    let name = NON_WORD.replace_all(&name, " ");
    let name = QUALIFIER.replace_all(&name, "");
    let name = TRAILING_INDEX.replace_all(&name, "");
    name.trim().to_owned()
}

/// Levenshtein similarity ratio in [0, 1].
pub fn similarity(a: &str, b: &str) -> f64 {
    let longest = a.len().max(b.len());
    if longest == 0 {
        return 1.0;
    }
    let dist = f64::from(bio::alignment::distance::levenshtein(
        a.as_bytes(),
        b.as_bytes(),
    ));
    1.0 - dist / longest as f64
}

/// True when `title` is close enough to any already-seen title.
pub fn is_similar(title: &str, seen: &[String], threshold: f64) -> bool {
    seen.iter().any(|s| similarity(title, s) >= threshold)
}
