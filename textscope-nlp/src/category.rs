//! Keyword-based content categorisation

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::lexicon::Lexicon;
use crate::round_to;
use crate::tokenize::TokenKind;

/// Categories in tie-breaking order with their keywords
const CATEGORIES: [(&str, [&str; 5]); 5] = [
    ("technical", ["code", "programming", "software", "data", "algorithm"]),
    ("business", ["market", "business", "company", "financial", "revenue"]),
    ("academic", ["research", "study", "analysis", "theory", "methodology"]),
    ("news", ["reported", "announced", "according", "today", "recently"]),
    ("casual", ["like", "think", "feel", "maybe", "probably"]),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentCategory {
    pub primary_category: String,
    pub confidence_score: f64,
    pub category_distribution: BTreeMap<String, f64>,
}

pub fn categorize(doc: &Document, lexicon: &Lexicon) -> ContentCategory {
    let mut words: HashSet<&str> = HashSet::new();
    for token in doc.tokens() {
        if token.kind != TokenKind::Word || lexicon.is_stopword(&token.lower) {
            continue;
        }
        words.insert(token.lower.as_str());
        words.insert(token.lemma.as_str());
    }

    let mut distribution = BTreeMap::new();
    let mut primary = (CATEGORIES[0].0, 0.0);
    for (name, keywords) in CATEGORIES {
        let matched = keywords.iter().filter(|k| words.contains(*k)).count();
        let score = round_to(matched as f64 / keywords.len() as f64, 2);
        if score > primary.1 {
            primary = (name, score);
        }
        distribution.insert(name.to_string(), score);
    }

    ContentCategory {
        primary_category: primary.0.to_string(),
        confidence_score: primary.1,
        category_distribution: distribution,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category_of(text: &str) -> ContentCategory {
        let lexicon = Lexicon::embedded().unwrap();
        let doc = Document::parse(text, &lexicon);
        categorize(&doc, &lexicon)
    }

    #[test]
    fn test_technical_text() {
        let result = category_of("The software team rewrote the algorithm and cleaned up the code.");
        assert_eq!(result.primary_category, "technical");
        assert_eq!(result.confidence_score, 0.6);
        assert_eq!(result.category_distribution["business"], 0.0);
        assert_eq!(result.category_distribution.len(), 5);
    }

    #[test]
    fn test_lemmas_match_keywords() {
        let result = category_of("Several studies and analyses support the theory.");
        assert_eq!(result.primary_category, "academic");
        assert_eq!(result.confidence_score, 0.6);
    }

    #[test]
    fn test_tie_goes_to_earlier_category() {
        let result = category_of("The company shared data.");
        assert_eq!(result.category_distribution["technical"], 0.2);
        assert_eq!(result.category_distribution["business"], 0.2);
        assert_eq!(result.primary_category, "technical");
    }

    #[test]
    fn test_no_keywords() {
        let result = category_of("Birds sing.");
        assert_eq!(result.primary_category, "technical");
        assert_eq!(result.confidence_score, 0.0);
    }
}
