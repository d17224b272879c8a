//! Text normalization and tokenization shared by skill extraction and similarity.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

/// A token starts with a letter and may carry the symbols common in tech terms
/// (`c++`, `c#`, `node.js`, `scikit-learn`).
static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z][A-Za-z0-9+.#-]*").expect("token regex is valid"));

/// Trims, lowercases, and collapses every whitespace run (newlines and tabs included)
/// into a single space.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Extracts the set of lowercased tokens in `text`.
#[allow(dead_code)]
pub fn tokenize(text: &str) -> BTreeSet<String> {
    TOKEN_RE
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}
