//! Percentage string metrics on top of rapidfuzz.
//!
//! All functions return a value in `0.0..=100.0`. Inputs are compared as-is;
//! case folding is the caller's job.

use std::collections::BTreeSet;

use rapidfuzz::fuzz;

/// Indel-normalized similarity of two strings.
pub fn ratio(a: &str, b: &str) -> f64 {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => 100.0,
        (true, false) | (false, true) => 0.0,
        (false, false) => fuzz::ratio(a.chars(), b.chars()) * 100.0,
    }
}

/// [`ratio`] after sorting whitespace-separated tokens.
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

/// Token-set comparison: 100 when one side's words are a subset of the other's,
/// otherwise the best [`ratio`] between the shared words and each side's extras.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let shared = join(tokens_a.intersection(&tokens_b));
    let only_a = join(tokens_a.difference(&tokens_b));
    let only_b = join(tokens_b.difference(&tokens_a));

    if !shared.is_empty() && (only_a.is_empty() || only_b.is_empty()) {
        return 100.0;
    }

    let with_a = append(&shared, &only_a);
    let with_b = append(&shared, &only_b);

    let mut best = ratio(&with_a, &with_b);
    if !shared.is_empty() {
        best = best.max(ratio(&shared, &with_a)).max(ratio(&shared, &with_b));
    }
    best
}

fn sorted_tokens(value: &str) -> String {
    let mut tokens: Vec<&str> = value.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn join<'a, 'b: 'a>(tokens: impl Iterator<Item = &'a &'b str>) -> String {
    tokens.copied().collect::<Vec<_>>().join(" ")
}

fn append(head: &str, tail: &str) -> String {
    match (head.is_empty(), tail.is_empty()) {
        (true, _) => tail.to_string(),
        (false, true) => head.to_string(),
        (false, false) => format!("{head} {tail}"),
    }
}
