//! Jaccard word-overlap similarity

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Runs of non-word characters
static NON_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_]+").expect("valid tokenizer regex"));

/// Minimum token length (exclusive) counted by the scorer
const MIN_TOKEN_LEN: usize = 2;

/// Lowercase `text` and split it on runs of non-word characters.
///
/// Empty fragments are dropped.
pub fn tokenize(text: &str) -> Vec<String> {
    NON_WORD
        .split(&text.to_lowercase())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn token_set(text: &str) -> HashSet<String> {
    tokenize(text)
        .into_iter()
        .filter(|t| t.chars().count() > MIN_TOKEN_LEN)
        .collect()
}

/// Jaccard similarity of the word sets of `a` and `b`, in `[0, 1]`.
///
/// Only tokens longer than two characters count. Two texts with no such
/// tokens score 0.
pub fn similarity(a: &str, b: &str) -> f32 {
    let set_a = token_set(a);
    let set_b = token_set(b);

    let union = set_a.union(&set_b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = set_a.intersection(&set_b).count();

    intersection as f32 / union as f32
}
