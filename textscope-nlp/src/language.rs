//! Language identification by script and function-word profile

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::lexicon::Lexicon;
use crate::tokenize::TokenKind;

pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// Texts with more whitespace-separated words than this get high confidence
const HIGH_CONFIDENCE_WORDS: usize = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageInfo {
    pub language_code: String,
    /// `None` when the language is unknown
    pub is_english: Option<bool>,
    pub confidence: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Script {
    Latin,
    Cyrillic,
    Greek,
    Arabic,
    Hebrew,
    Devanagari,
    Thai,
    Hangul,
    Kana,
    Han,
}

impl Script {
    fn of(c: char) -> Option<Script> {
        let script = match c as u32 {
            0x0041..=0x024F | 0x1E00..=0x1EFF if c.is_alphabetic() => Script::Latin,
            0x0370..=0x03FF | 0x1F00..=0x1FFF => Script::Greek,
            0x0400..=0x052F => Script::Cyrillic,
            0x0590..=0x05FF => Script::Hebrew,
            0x0600..=0x06FF | 0x0750..=0x077F => Script::Arabic,
            0x0900..=0x097F => Script::Devanagari,
            0x0E00..=0x0E7F => Script::Thai,
            0x1100..=0x11FF | 0x3130..=0x318F | 0xAC00..=0xD7AF => Script::Hangul,
            0x3040..=0x30FF => Script::Kana,
            0x4E00..=0x9FFF | 0x3400..=0x4DBF => Script::Han,
            _ => return None,
        };
        Some(script)
    }

    fn language_code(&self) -> Option<&'static str> {
        match self {
            Script::Latin => None,
            Script::Cyrillic => Some("ru"),
            Script::Greek => Some("el"),
            Script::Arabic => Some("ar"),
            Script::Hebrew => Some("he"),
            Script::Devanagari => Some("hi"),
            Script::Thai => Some("th"),
            Script::Hangul => Some("ko"),
            Script::Kana => Some("ja"),
            Script::Han => Some("zh"),
        }
    }
}

const SCRIPTS: [Script; 10] = [
    Script::Latin,
    Script::Cyrillic,
    Script::Greek,
    Script::Arabic,
    Script::Hebrew,
    Script::Devanagari,
    Script::Thai,
    Script::Hangul,
    Script::Kana,
    Script::Han,
];

fn detect_code(doc: &Document, lexicon: &Lexicon) -> Option<String> {
    let mut counts = [0usize; SCRIPTS.len()];
    for c in doc.text().chars() {
        if let Some(script) = Script::of(c) {
            if let Some(i) = SCRIPTS.iter().position(|s| *s == script) {
                counts[i] += 1;
            }
        }
    }

    let (dominant, count) = SCRIPTS
        .iter()
        .zip(counts.iter())
        .max_by_key(|(_, count)| **count)?;
    if *count == 0 {
        return None;
    }

    if *dominant != Script::Latin {
        // Japanese mixes kana with Han characters
        let kana = counts[8];
        if *dominant == Script::Han && kana > 0 {
            return Some("ja".to_string());
        }
        return dominant.language_code().map(str::to_string);
    }

    let mut best: Option<(&str, usize)> = None;
    for profile in lexicon.languages() {
        let hits = doc
            .tokens()
            .iter()
            .filter(|t| t.kind == TokenKind::Word && profile.words.contains(&t.lower))
            .count();
        if hits > 0 && best.map_or(true, |(_, b)| hits > b) {
            best = Some((profile.code.as_str(), hits));
        }
    }
    best.map(|(code, _)| code.to_string())
}

pub fn detect_language(doc: &Document, lexicon: &Lexicon) -> LanguageInfo {
    match detect_code(doc, lexicon) {
        Some(code) => {
            let confidence = if doc.text().split_whitespace().count() > HIGH_CONFIDENCE_WORDS {
                "high"
            } else {
                "medium"
            };
            LanguageInfo {
                is_english: Some(code == "en"),
                language_code: code,
                confidence: confidence.to_string(),
            }
        }
        None => LanguageInfo {
            language_code: UNKNOWN_LANGUAGE.to_string(),
            is_english: None,
            confidence: "low".to_string(),
        },
    }
}
