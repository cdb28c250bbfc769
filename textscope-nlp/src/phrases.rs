//! Noun-phrase extraction ranked by a TF-IDF style relevance

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::round_to;
use crate::tagger::PosTag;
use crate::tokenize::Token;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyPhrase {
    pub phrase: String,
    pub relevance_score: f64,
    pub frequency: usize,
    pub importance: f64,
}

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Unique noun phrases in order of first appearance
///
/// A phrase is a maximal run of adjectives followed by one or more nouns,
/// kept when it spans at least two tokens or is a single proper noun.
pub fn noun_phrases(doc: &Document) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut phrases = Vec::new();

    for sentence in doc.sentences() {
        let tokens = doc.sentence_tokens(sentence);
        let mut i = 0;
        while i < tokens.len() {
            let start = i;
            while i < tokens.len() && tokens[i].tag == PosTag::Adjective {
                i += 1;
            }
            let nouns_start = i;
            while i < tokens.len() && tokens[i].tag.is_noun() {
                i += 1;
            }

            if i == nouns_start {
                if i == start {
                    i += 1;
                }
                continue;
            }

            let run: &[Token] = &tokens[start..i];
            if run.len() >= 2 || run[0].tag == PosTag::ProperNoun {
                let phrase = normalize(&doc.text()[run[0].start..run[run.len() - 1].end]);
                if seen.insert(phrase.clone()) {
                    phrases.push(phrase);
                }
            }
        }
    }

    phrases
}

/// Top `top_n` key phrases by relevance, ties broken by phrase text
pub fn extract_key_phrases(doc: &Document, top_n: usize) -> Vec<KeyPhrase> {
    let phrases = noun_phrases(doc);
    if phrases.is_empty() {
        return Vec::new();
    }

    let haystack = normalize(doc.text());
    let token_count = doc.tokens().len().max(1) as f64;
    let unique = phrases.len() as f64;

    let mut scored: Vec<KeyPhrase> = phrases
        .into_iter()
        .map(|phrase| {
            let frequency = haystack.matches(phrase.as_str()).count();
            let tf = frequency as f64 / token_count;
            let idf = (unique / (1.0 + frequency as f64)).ln();
            let score = tf * idf;
            KeyPhrase {
                phrase,
                relevance_score: round_to(score, 4),
                frequency,
                importance: round_to(score * 100.0, 2),
            }
        })
        .collect();

    scored.sort_by(|a, b| {
        b.relevance_score
            .total_cmp(&a.relevance_score)
            .then_with(|| a.phrase.cmp(&b.phrase))
    });
    scored.truncate(top_n);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::Lexicon;

    fn parse(text: &str) -> Document {
        let lexicon = Lexicon::embedded().unwrap();
        Document::parse(text, &lexicon)
    }

    #[test]
    fn test_noun_phrases() {
        let doc = parse("The beautiful garden has a stone wall. She loves the stone wall, said Alice.");
        let phrases = noun_phrases(&doc);
        assert!(phrases.contains(&"beautiful garden".to_string()));
        assert!(phrases.contains(&"stone wall".to_string()));
        assert!(phrases.contains(&"alice".to_string()));
        assert_eq!(phrases.iter().filter(|p| *p == "stone wall").count(), 1);
    }

    #[test]
    fn test_single_common_noun_is_not_a_phrase() {
        let doc = parse("The cat slept.");
        assert!(noun_phrases(&doc).is_empty());
        assert!(extract_key_phrases(&doc, 10).is_empty());
    }

    #[test]
    fn test_key_phrase_scores() {
        let doc = parse(
            "Machine learning helps the data science team. Machine learning is popular. \
             Deep networks need large datasets.",
        );
        let phrases = extract_key_phrases(&doc, 10);
        let top = phrases
            .iter()
            .find(|p| p.phrase == "machine learning")
            .unwrap();
        assert_eq!(top.frequency, 2);
        assert!(phrases.iter().all(|p| p.frequency >= 1));
        for pair in phrases.windows(2) {
            assert!(pair[0].relevance_score >= pair[1].relevance_score);
        }
    }

    #[test]
    fn test_top_n_limits_results() {
        let doc = parse("Red apples, green pears, ripe plums and sweet cherries filled the old basket.");
        assert_eq!(extract_key_phrases(&doc, 2).len(), 2);
    }
}
