//! Named-entity recognition
//!
//! Dates, times, amounts of money and percentages are found with regular
//! expressions. People, organisations and locations are runs of capitalised
//! words classified against the gazetteers, suffix lists and the preceding
//! preposition.

use std::collections::{BTreeMap, HashSet};
use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::document::{Document, Sentence};
use crate::lexicon::Lexicon;
use crate::tagger::PosTag;
use crate::tokenize::{Token, TokenKind};

const MONTHS: &str = "January|February|March|April|May|June|July|August|September|October|November|December";
const MONTHS_SHORT: &str = "Jan|Feb|Mar|Apr|Jun|Jul|Aug|Sep|Sept|Oct|Nov|Dec";
const WEEKDAYS: &str = "Monday|Tuesday|Wednesday|Thursday|Friday|Saturday|Sunday";

static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    let pattern = format!(
        r"\b(?:(?:{m}|(?:{s})\.?)\s+\d{{1,2}}(?:st|nd|rd|th)?(?:,?\s+\d{{4}})?|\d{{1,2}}(?:st|nd|rd|th)?\s+(?:{m})(?:,?\s+\d{{4}})?|(?:{m})\s+\d{{4}}|\d{{4}}-\d{{2}}-\d{{2}}|\d{{1,2}}/\d{{1,2}}/\d{{2,4}}|(?:{w}))\b",
        m = MONTHS,
        s = MONTHS_SHORT,
        w = WEEKDAYS
    );
    Regex::new(&pattern).expect("date pattern is valid")
});

static TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b\d{1,2}:\d{2}(?:\s?[ap]\.?m\b\.?)?|\b\d{1,2}\s?[ap]\.?m\b\.?|\b(?:noon|midnight)\b")
        .expect("time pattern is valid")
});

static MONEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)[$€£¥]\s?\d+(?:[.,]\d+)*(?:\s?(?:million|billion|trillion|thousand|bn|m|k)\b)?|\b\d+(?:[.,]\d+)*\s?(?:million\s|billion\s)?(?:dollars|euros|pounds|yen|usd|eur|gbp)\b",
    )
    .expect("money pattern is valid")
});

static PERCENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b\d+(?:\.\d+)?(?:\s?%|\s(?:percent|per cent)\b)")
        .expect("percent pattern is valid")
});

/// Lower-case words allowed between the capitalised words of one name
const CONNECTORS: &[&str] = &["of", "and", "&", "de", "van", "von"];

/// Prepositions after which an unknown name is read as a place
const LOCATIVE_PREPOSITIONS: &[&str] = &[
    "in", "at", "near", "from", "to", "across", "throughout", "towards",
];

const CALENDAR_WORDS: &[&str] = &[
    "january", "february", "march", "april", "may", "june", "july", "august", "september",
    "october", "november", "december", "monday", "tuesday", "wednesday", "thursday", "friday",
    "saturday", "sunday",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityKind {
    Person,
    Organization,
    Location,
    Date,
    Time,
    Money,
    Percent,
}

/// Entities grouped by kind; only kinds with at least one entity are present
pub type NamedEntities = BTreeMap<EntityKind, Vec<String>>;

pub fn extract_entities(doc: &Document, lexicon: &Lexicon) -> NamedEntities {
    let mut found: Vec<(usize, EntityKind, String)> = Vec::new();

    let patterns: [(EntityKind, &Regex); 4] = [
        (EntityKind::Money, &MONEY_RE),
        (EntityKind::Percent, &PERCENT_RE),
        (EntityKind::Date, &DATE_RE),
        (EntityKind::Time, &TIME_RE),
    ];
    let mut claimed: Vec<Range<usize>> = Vec::new();
    for (kind, re) in patterns {
        for m in re.find_iter(doc.text()) {
            let range = m.range();
            if claimed.iter().any(|r| r.start < range.end && range.start < r.end) {
                continue;
            }
            found.push((m.start(), kind, m.as_str().trim().to_string()));
            claimed.push(range);
        }
    }

    let lowercase_words: HashSet<&str> = doc
        .tokens()
        .iter()
        .filter(|t| t.kind == TokenKind::Word && t.text == t.lower)
        .map(|t| t.lower.as_str())
        .collect();

    let finder = NameFinder {
        doc,
        lexicon,
        claimed: &claimed,
        lowercase_words: &lowercase_words,
    };
    for sentence in doc.sentences() {
        finder.scan(sentence, &mut found);
    }

    found.sort_by_key(|(start, _, _)| *start);

    let mut entities = NamedEntities::new();
    for (_, kind, text) in found {
        let list = entities.entry(kind).or_default();
        if !list.contains(&text) {
            list.push(text);
        }
    }
    entities
}

struct NameFinder<'a> {
    doc: &'a Document,
    lexicon: &'a Lexicon,
    claimed: &'a [Range<usize>],
    lowercase_words: &'a HashSet<&'a str>,
}

impl<'a> NameFinder<'a> {
    fn scan(&self, sentence: &Sentence, found: &mut Vec<(usize, EntityKind, String)>) {
        let tokens = self.doc.sentence_tokens(sentence);
        let first_word = tokens.iter().position(|t| t.kind == TokenKind::Word);

        let mut i = 0;
        while i < tokens.len() {
            if !self.is_name_word(tokens, i, first_word == Some(i)) {
                i += 1;
                continue;
            }

            let start = i;
            let mut end = i + 1;
            loop {
                // "Dr." keeps its period inside the name
                if end + 1 < tokens.len()
                    && tokens[end].text == "."
                    && self.lexicon.is_title(&tokens[end - 1].lower)
                    && self.is_name_word(tokens, end + 1, false)
                {
                    end += 2;
                } else if end < tokens.len() && self.is_name_word(tokens, end, false) {
                    end += 1;
                } else if end + 1 < tokens.len()
                    && CONNECTORS.contains(&tokens[end].lower.as_str())
                    && self.is_name_word(tokens, end + 1, false)
                {
                    end += 2;
                } else {
                    break;
                }
            }

            let span = &tokens[start..end];
            let preceding = start.checked_sub(1).map(|p| tokens[p].lower.as_str());
            if span[0].tag != PosTag::ProperNoun
                && span.len() > 1
                && self.classify(span, preceding).is_none()
            {
                // "Later Sarah called": the sentence-initial word is not part of the name
                self.classify_span(&span[1..], Some(span[0].lower.as_str()), found);
            } else {
                self.classify_span(span, preceding, found);
            }
            i = end;
        }
    }

    /// Capitalised word that can be part of a name
    fn is_name_word(&self, tokens: &[Token], i: usize, sentence_initial: bool) -> bool {
        let token = &tokens[i];
        if !token.is_capitalized() || CALENDAR_WORDS.contains(&token.lower.as_str()) {
            return false;
        }
        if self
            .claimed
            .iter()
            .any(|r| r.start < token.end && token.start < r.end)
        {
            return false;
        }
        if token.tag == PosTag::ProperNoun {
            return true;
        }
        sentence_initial
            && !self.lexicon.is_stopword(&token.lower)
            && !self.lowercase_words.contains(token.lower.as_str())
            && token.tag.is_noun()
    }

    fn classify_span(
        &self,
        span: &[Token],
        preceding: Option<&str>,
        found: &mut Vec<(usize, EntityKind, String)>,
    ) {
        // Leading determiners and connectors are not part of the name
        let skip = span
            .iter()
            .take_while(|t| t.tag == PosTag::Determiner || !t.is_capitalized())
            .count();
        let span = &span[skip..];
        if span.is_empty() {
            return;
        }

        let kind = self.classify(span, preceding);
        if kind == Some(EntityKind::Organization) || !span.iter().any(is_coordinator) {
            if let Some(kind) = kind {
                found.push((span[0].start, kind, self.span_text(span)));
            }
            return;
        }

        // "Alice and Bob" names two people
        let mut part_start = 0;
        for (i, token) in span.iter().enumerate() {
            if is_coordinator(token) {
                self.push_part(&span[part_start..i], preceding, found);
                part_start = i + 1;
            }
        }
        self.push_part(&span[part_start..], preceding, found);
    }

    fn push_part(
        &self,
        part: &[Token],
        preceding: Option<&str>,
        found: &mut Vec<(usize, EntityKind, String)>,
    ) {
        if part.is_empty() {
            return;
        }
        if let Some(kind) = self.classify(part, preceding) {
            found.push((part[0].start, kind, self.span_text(part)));
        }
    }

    fn span_text(&self, span: &[Token]) -> String {
        let text = &self.doc.text()[span[0].start..span[span.len() - 1].end];
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn classify(&self, span: &[Token], preceding: Option<&str>) -> Option<EntityKind> {
        let lexicon = self.lexicon;
        let words: Vec<&Token> = span.iter().filter(|t| t.text != ".").collect();
        let lower = words
            .iter()
            .map(|t| t.lower.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let multi_word = words.len() > 1;
        let first = words.first()?;
        let last = words.last()?;

        if lexicon.is_organization(&lower) {
            return Some(EntityKind::Organization);
        }
        if lexicon.is_location(&lower) {
            return Some(EntityKind::Location);
        }
        if lexicon.is_title(&first.lower) {
            return multi_word.then_some(EntityKind::Person);
        }
        if multi_word && words.iter().any(|t| lexicon.is_org_suffix(&t.lower)) {
            return Some(EntityKind::Organization);
        }
        if multi_word && lexicon.is_location_suffix(&last.lower) {
            return Some(EntityKind::Location);
        }
        if lexicon.is_given_name(&first.lower) {
            return Some(EntityKind::Person);
        }
        if !multi_word && first.is_acronym() {
            return Some(EntityKind::Organization);
        }
        if preceding.is_some_and(|p| LOCATIVE_PREPOSITIONS.contains(&p)) {
            return Some(EntityKind::Location);
        }
        if multi_word && first.tag == PosTag::ProperNoun && words.iter().all(|t| t.is_capitalized()) {
            return Some(EntityKind::Person);
        }
        None
    }
}

fn is_coordinator(token: &Token) -> bool {
    token.lower == "and" || token.lower == "&"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entities_of(text: &str) -> NamedEntities {
        let lexicon = Lexicon::embedded().unwrap();
        let doc = Document::parse(text, &lexicon);
        extract_entities(&doc, &lexicon)
    }

    fn names(entities: &NamedEntities, kind: EntityKind) -> Vec<&str> {
        entities
            .get(&kind)
            .map(|v| v.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_people_organizations_locations() {
        let entities = entities_of(
            "Yesterday John Smith joined Microsoft in Seattle. Dr. Jane Doe visited the Bank of America.",
        );
        assert_eq!(names(&entities, EntityKind::Person), vec!["John Smith", "Dr. Jane Doe"]);
        assert_eq!(
            names(&entities, EntityKind::Organization),
            vec!["Microsoft", "Bank of America"]
        );
        assert_eq!(names(&entities, EntityKind::Location), vec!["Seattle"]);
    }

    #[test]
    fn test_pattern_entities() {
        let entities = entities_of(
            "On March 5, 2024 at 10:30 am the company paid $2.5 million, a rise of 12%.",
        );
        assert_eq!(names(&entities, EntityKind::Date), vec!["March 5, 2024"]);
        assert_eq!(names(&entities, EntityKind::Time), vec!["10:30 am"]);
        assert_eq!(names(&entities, EntityKind::Money), vec!["$2.5 million"]);
        assert_eq!(names(&entities, EntityKind::Percent), vec!["12%"]);
    }

    #[test]
    fn test_coordinated_names_are_split() {
        let entities = entities_of("The report was written by Alice and Bob.");
        assert_eq!(names(&entities, EntityKind::Person), vec!["Alice", "Bob"]);
    }

    #[test]
    fn test_duplicates_removed_and_empty_kinds_omitted() {
        let entities = entities_of("We met Sarah. Later Sarah called.");
        assert_eq!(names(&entities, EntityKind::Person), vec!["Sarah"]);
        assert!(!entities.contains_key(&EntityKind::Money));
        assert_eq!(entities.len(), 1);
    }

    #[test]
    fn test_sentence_initial_common_words_ignored() {
        let entities = entities_of("Results improved. The results were good.");
        assert!(entities.is_empty());
    }

    #[test]
    fn test_serializes_with_uppercase_keys() {
        let entities = entities_of("Alice moved to Berlin.");
        let json = serde_json::to_value(&entities).unwrap();
        assert_eq!(json["PERSON"][0], "Alice");
        assert_eq!(json["LOCATION"][0], "Berlin");
    }
}
