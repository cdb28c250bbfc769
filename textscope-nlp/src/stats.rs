//! Plain counts used by the text report

use std::collections::HashMap;

/// Whitespace-separated words
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Occurrences of each alphabetic character, lower-cased, most frequent first
/// (ties in character order)
pub fn character_frequencies(text: &str) -> Vec<(char, usize)> {
    let mut counts: HashMap<char, usize> = HashMap::new();
    for c in text.chars().filter(|c| c.is_alphabetic()) {
        for lower in c.to_lowercase() {
            *counts.entry(lower).or_default() += 1;
        }
    }

    let mut sorted: Vec<(char, usize)> = counts.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    sorted
}
