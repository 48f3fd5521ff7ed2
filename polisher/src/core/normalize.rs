//! Lossy prompt compression for source text.
//!
//! Deletes every whitespace character, keeps only word tokens (letters, digits
//! and `_`), lowercases and stems each token, then concatenates the stems with
//! no separator. Deleting whitespace merges neighbouring identifiers, and
//! punctuation never survives, so the result is not reversible and is not
//! guaranteed to keep the code recognisable. Callers treat it as an optional
//! size heuristic.

use std::sync::LazyLock;

use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\p{Alphabetic}\p{Nd}_]+").expect("word pattern should be valid")
});

/// Compress `source` into its stemmed, whitespace-free form.
pub fn normalize(source: &str) -> String {
    let condensed: String = source.chars().filter(|c| !c.is_whitespace()).collect();
    let stemmer = Stemmer::create(Algorithm::English);
    WORD_RE
        .find_iter(&condensed)
        .map(|token| stemmer.stem(&token.as_str().to_lowercase()).into_owned())
        .collect()
}

/// Text to embed in prompts: normalized when `enabled`, verbatim otherwise.
pub fn prepare(source: &str, enabled: bool) -> String {
    if enabled {
        normalize(source)
    } else {
        source.to_string()
    }
}
