//! Extractive summary built from the highest scoring sentences

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::Document;
use crate::entities::NamedEntities;
use crate::lexicon::Lexicon;
use crate::phrases::KeyPhrase;

static TRANSITION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:However|Moreover|Furthermore|Nevertheless),?\s+")
        .expect("transition pattern is valid")
});

const FREQUENCY_WEIGHT: f64 = 0.4;
const POSITION_WEIGHT: f64 = 0.25;
const ENTITY_WEIGHT: f64 = 0.2;
const PHRASE_WEIGHT: f64 = 0.15;

/// A sentence is kept only if more than this share of its tokens is new
const NOVELTY_THRESHOLD: f64 = 0.6;

/// Key phrases considered when scoring sentences
pub const SUMMARY_KEY_PHRASES: usize = 5;

struct Candidate<'a> {
    index: usize,
    text: &'a str,
    tokens: HashSet<&'a str>,
    score: f64,
}

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn position_score(index: usize, total: usize) -> f64 {
    let total = total as f64;
    let i = index as f64;
    if index == 0 {
        1.5
    } else if i < total * 0.1 || i > total * 0.9 {
        1.2
    } else {
        1.0
    }
}

pub fn summarize(
    doc: &Document,
    lexicon: &Lexicon,
    entities: &NamedEntities,
    key_phrases: &[KeyPhrase],
    num_sentences: usize,
) -> String {
    let mut frequencies: HashMap<&str, usize> = HashMap::new();
    for token in doc.word_tokens() {
        if !lexicon.is_stopword(&token.lower) {
            *frequencies.entry(token.lemma.as_str()).or_default() += 1;
        }
    }

    let all_entities: HashSet<String> = entities
        .values()
        .flatten()
        .map(|e| e.to_lowercase())
        .collect();
    let phrases: Vec<&str> = key_phrases
        .iter()
        .take(SUMMARY_KEY_PHRASES)
        .map(|p| p.phrase.as_str())
        .collect();

    let total = doc.sentences().len();
    let mut seen_texts = HashSet::new();
    let mut candidates: Vec<Candidate<'_>> = Vec::new();

    for (index, sentence) in doc.sentences().iter().enumerate() {
        let text = doc.sentence_text(sentence);
        if !seen_texts.insert(text) {
            continue;
        }
        let tokens = doc.sentence_tokens(sentence);

        let lemmas: Vec<&str> = tokens
            .iter()
            .filter(|t| t.is_word() && !lexicon.is_stopword(&t.lower))
            .map(|t| t.lemma.as_str())
            .collect();
        let frequency_score = if lemmas.is_empty() {
            0.0
        } else {
            let sum: usize = lemmas.iter().map(|l| frequencies.get(l).copied().unwrap_or(0)).sum();
            sum as f64 / lemmas.len() as f64
        };

        let lower = normalize(text);
        let entity_score = all_entities.iter().filter(|e| lower.contains(e.as_str())).count();
        let phrase_score = phrases.iter().filter(|p| lower.contains(*p)).count();

        let score = frequency_score * FREQUENCY_WEIGHT
            + position_score(index, total) * POSITION_WEIGHT
            + entity_score as f64 * ENTITY_WEIGHT
            + phrase_score as f64 * PHRASE_WEIGHT;

        candidates.push(Candidate {
            index,
            text,
            tokens: tokens.iter().map(|t| t.lower.as_str()).collect(),
            score,
        });
    }

    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    candidates.truncate(num_sentences);

    let mut seen_tokens: HashSet<&str> = HashSet::new();
    let mut chosen: Vec<&Candidate<'_>> = Vec::new();
    for candidate in &candidates {
        if candidate.tokens.is_empty() {
            continue;
        }
        let new = candidate.tokens.difference(&seen_tokens).count();
        if new as f64 / candidate.tokens.len() as f64 > NOVELTY_THRESHOLD {
            seen_tokens.extend(candidate.tokens.iter().copied());
            chosen.push(candidate);
        }
    }
    chosen.sort_by_key(|c| c.index);

    let joined = chosen.iter().map(|c| c.text).collect::<Vec<_>>().join(" ");
    let stripped = TRANSITION_RE.replace_all(&joined, "");
    capitalize_first(&stripped)
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::extract_entities;
    use crate::phrases::extract_key_phrases;

    fn summary_of(text: &str, n: usize) -> String {
        let lexicon = Lexicon::embedded().unwrap();
        let doc = Document::parse(text, &lexicon);
        let entities = extract_entities(&doc, &lexicon);
        let phrases = extract_key_phrases(&doc, SUMMARY_KEY_PHRASES);
        summarize(&doc, &lexicon, &entities, &phrases, n)
    }

    #[test]
    fn test_short_text_is_its_own_summary() {
        assert_eq!(summary_of("Rust is fast.", 3), "Rust is fast.");
    }

    #[test]
    fn test_summary_keeps_document_order_and_limit() {
        let text = "Solar power adoption grew quickly last year. \
                    Cats sleep. \
                    Solar panels became cheaper and solar farms expanded. \
                    Birds fly. \
                    Analysts expect solar power to keep growing.";
        let summary = summary_of(text, 2);
        assert!(summary.starts_with("Solar power adoption grew quickly last year."));
        assert_eq!(summary.matches(". ").count() + 1, 2);
        assert!(!summary.contains("Cats sleep"));
    }

    #[test]
    fn test_transition_words_removed_and_capitalised() {
        let summary = summary_of("However, the plan worked.", 3);
        assert_eq!(summary, "The plan worked.");
    }

    #[test]
    fn test_duplicate_sentences_collapsed() {
        let summary = summary_of("The plan worked. The plan worked. The plan worked.", 3);
        assert_eq!(summary, "The plan worked.");
    }

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("élan vital"), "Élan vital");
        assert_eq!(capitalize_first(""), "");
    }
}
