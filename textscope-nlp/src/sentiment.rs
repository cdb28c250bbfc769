//! Lexicon-based sentiment scoring and professional writing metrics

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::lexicon::Lexicon;
use crate::readability::count_syllables;
use crate::round_to;
use crate::tokenize::TokenKind;

static PASSIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(am|is|are|was|were|be|been|being)\s+\w+ed\b")
        .expect("passive voice pattern is valid")
});

/// Sentences with more word tokens than this count as long
const LONG_SENTENCE_WORDS: usize = 20;

/// Non-stop words occurring more often than this count as repetitive
const REPETITION_THRESHOLD: usize = 3;

const NEGATION_FACTOR: f64 = -0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Subjective,
    Objective,
    Professional,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Subjective => "subjective",
            Tone::Objective => "objective",
            Tone::Professional => "professional",
        }
    }
}

/// Counts of writing-style issues plus an overall clarity score (0-100)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfessionalMetrics {
    pub passive_voice_count: usize,
    pub long_sentences: usize,
    pub complex_words: usize,
    pub repetitive_words: usize,
    pub clarity_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentAnalysis {
    pub sentiment: SentimentLabel,
    pub polarity: f64,
    pub subjectivity: f64,
    pub confidence: f64,
    pub tone: Tone,
    pub professional_metrics: ProfessionalMetrics,
}

/// Score the document's sentiment
///
/// Each sentiment word contributes its polarity and subjectivity. A preceding
/// intensifier scales both, a preceding negation flips and halves the
/// polarity. Punctuation ends the reach of both modifiers.
pub fn analyze_sentiment(
    doc: &Document,
    lexicon: &Lexicon,
    metrics: ProfessionalMetrics,
) -> SentimentAnalysis {
    let mut assessments: Vec<(f64, f64)> = Vec::new();
    let mut multiplier = 1.0;
    let mut negated = false;

    for token in doc.tokens() {
        if token.kind == TokenKind::Punct {
            multiplier = 1.0;
            negated = false;
            continue;
        }

        let word = token.lower.as_str();
        if let Some(entry) = lexicon
            .sentiment(word)
            .or_else(|| lexicon.sentiment(&token.lemma))
        {
            let mut polarity = entry.polarity * multiplier;
            let subjectivity = entry.subjectivity * multiplier;
            if negated {
                polarity *= NEGATION_FACTOR;
            }
            assessments.push((polarity, subjectivity));
            multiplier = 1.0;
            negated = false;
        } else if let Some(factor) = lexicon.intensifier(word) {
            multiplier *= factor;
        } else if lexicon.is_negation(word) {
            negated = true;
        }
    }

    let (polarity, subjectivity) = if assessments.is_empty() {
        (0.0, 0.0)
    } else {
        let n = assessments.len() as f64;
        let polarity = assessments.iter().map(|(p, _)| p).sum::<f64>() / n;
        let subjectivity = assessments.iter().map(|(_, s)| s).sum::<f64>() / n;
        (polarity.clamp(-1.0, 1.0), subjectivity.clamp(0.0, 1.0))
    };

    let confidence = (polarity.abs() + (1.0 - (subjectivity - 0.5).abs())) / 2.0;

    let sentiment = if polarity > 0.0 {
        SentimentLabel::Positive
    } else if polarity < 0.0 {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    };

    let tone = if subjectivity > 0.7 {
        Tone::Subjective
    } else if subjectivity < 0.3 {
        Tone::Objective
    } else {
        Tone::Professional
    };

    SentimentAnalysis {
        sentiment,
        polarity: round_to(polarity, 3),
        subjectivity: round_to(subjectivity, 3),
        confidence: round_to(confidence, 3),
        tone,
        professional_metrics: metrics,
    }
}

/// Passive voice, long sentences, complex and repeated words
pub fn professional_metrics(doc: &Document, lexicon: &Lexicon) -> ProfessionalMetrics {
    let sentence_count = doc.sentences().len();

    let passive_voice_count = doc
        .sentences()
        .iter()
        .filter(|s| PASSIVE_RE.is_match(doc.sentence_text(s)))
        .count();

    let long_sentences = doc
        .sentences()
        .iter()
        .filter(|s| doc.sentence_tokens(s).iter().filter(|t| t.is_word()).count() > LONG_SENTENCE_WORDS)
        .count();

    let mut total_words = 0usize;
    let mut complex_words = 0usize;
    let mut frequencies: HashMap<&str, usize> = HashMap::new();
    for token in doc.word_tokens() {
        total_words += 1;
        if count_syllables(&token.lower) > 2 {
            complex_words += 1;
        }
        if !lexicon.is_stopword(&token.lower) {
            *frequencies.entry(token.lower.as_str()).or_default() += 1;
        }
    }
    let repetitive_words = frequencies
        .values()
        .filter(|&&count| count > REPETITION_THRESHOLD)
        .count();

    let clarity_score = if total_words > 0 && sentence_count > 0 {
        let sentences = sentence_count as f64;
        let words = total_words as f64;
        let factors = [
            1.0 - passive_voice_count as f64 / sentences,
            1.0 - long_sentences as f64 / sentences,
            1.0 - complex_words as f64 / words,
            1.0 - repetitive_words as f64 / words,
        ];
        round_to(factors.iter().map(|f| f * 25.0).sum(), 2)
    } else {
        0.0
    };

    ProfessionalMetrics {
        passive_voice_count,
        long_sentences,
        complex_words,
        repetitive_words,
        clarity_score,
    }
}
