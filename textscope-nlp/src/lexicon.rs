//! Language resources used by the toolkit
//!
//! Every resource is a small UTF-8 text file. The files under `resources/` are
//! compiled into the binary; a deployment can point the toolkit at a directory
//! holding its own copies of the same files instead.
//!
//! File formats (blank lines and `#` comments are ignored):
//! - `*.txt`: one lower-case entry per line
//! - `sentiment_en.tsv`: `word<TAB>polarity<TAB>subjectivity`
//! - `intensifiers.tsv`: `word<TAB>multiplier`
//! - `languages.tsv`: `code<TAB>space separated function words`
//! - `lemma_exceptions.tsv`: `inflected<TAB>lemma`

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{NlpError, Result};

const STOPWORDS: &str = "stopwords_en.txt";
const SENTIMENT: &str = "sentiment_en.tsv";
const INTENSIFIERS: &str = "intensifiers.tsv";
const NEGATIONS: &str = "negations.txt";
const GIVEN_NAMES: &str = "given_names.txt";
const TITLES: &str = "titles.txt";
const ORGANIZATIONS: &str = "organizations.txt";
const ORG_SUFFIXES: &str = "org_suffixes.txt";
const LOCATIONS: &str = "locations.txt";
const LOCATION_SUFFIXES: &str = "location_suffixes.txt";
const ABBREVIATIONS: &str = "abbreviations.txt";
const LANGUAGES: &str = "languages.tsv";
const LEMMA_EXCEPTIONS: &str = "lemma_exceptions.tsv";

/// Names of every resource file a resource directory must provide
pub const RESOURCE_FILES: [&str; 13] = [
    STOPWORDS,
    SENTIMENT,
    INTENSIFIERS,
    NEGATIONS,
    GIVEN_NAMES,
    TITLES,
    ORGANIZATIONS,
    ORG_SUFFIXES,
    LOCATIONS,
    LOCATION_SUFFIXES,
    ABBREVIATIONS,
    LANGUAGES,
    LEMMA_EXCEPTIONS,
];

fn embedded_resource(name: &str) -> Option<&'static str> {
    let content = match name {
        STOPWORDS => include_str!("../resources/stopwords_en.txt"),
        SENTIMENT => include_str!("../resources/sentiment_en.tsv"),
        INTENSIFIERS => include_str!("../resources/intensifiers.tsv"),
        NEGATIONS => include_str!("../resources/negations.txt"),
        GIVEN_NAMES => include_str!("../resources/given_names.txt"),
        TITLES => include_str!("../resources/titles.txt"),
        ORGANIZATIONS => include_str!("../resources/organizations.txt"),
        ORG_SUFFIXES => include_str!("../resources/org_suffixes.txt"),
        LOCATIONS => include_str!("../resources/locations.txt"),
        LOCATION_SUFFIXES => include_str!("../resources/location_suffixes.txt"),
        ABBREVIATIONS => include_str!("../resources/abbreviations.txt"),
        LANGUAGES => include_str!("../resources/languages.tsv"),
        LEMMA_EXCEPTIONS => include_str!("../resources/lemma_exceptions.tsv"),
        _ => return None,
    };
    Some(content)
}

/// Where the lexicon was loaded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceSource {
    Embedded,
    Directory(PathBuf),
}

impl std::fmt::Display for ResourceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceSource::Embedded => write!(f, "embedded"),
            ResourceSource::Directory(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Polarity and subjectivity of a sentiment-bearing word
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentEntry {
    pub polarity: f64,
    pub subjectivity: f64,
}

/// Function-word profile for one language
#[derive(Debug, Clone)]
pub struct LanguageProfile {
    pub code: String,
    pub words: HashSet<String>,
}

/// All language resources, loaded once and shared read-only
#[derive(Debug, Clone)]
pub struct Lexicon {
    source: ResourceSource,
    stopwords: HashSet<String>,
    sentiment: HashMap<String, SentimentEntry>,
    intensifiers: HashMap<String, f64>,
    negations: HashSet<String>,
    given_names: HashSet<String>,
    titles: HashSet<String>,
    organizations: HashSet<String>,
    org_suffixes: HashSet<String>,
    locations: HashSet<String>,
    location_suffixes: HashSet<String>,
    abbreviations: HashSet<String>,
    languages: Vec<LanguageProfile>,
    lemma_exceptions: HashMap<String, String>,
}

impl Lexicon {
    /// Build the lexicon from the resources compiled into the binary
    pub fn embedded() -> Result<Self> {
        Self::from_reader(ResourceSource::Embedded, |name| {
            embedded_resource(name)
                .map(str::to_string)
                .ok_or_else(|| NlpError::ModelUnavailable(format!("no embedded resource {}", name)))
        })
    }

    /// Build the lexicon from a directory holding every file in [`RESOURCE_FILES`]
    pub fn from_dir(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(NlpError::ModelUnavailable(format!(
                "resource directory not found: {}",
                dir.display()
            )));
        }

        let lexicon = Self::from_reader(ResourceSource::Directory(dir.to_path_buf()), |name| {
            let path = dir.join(name);
            std::fs::read_to_string(&path).map_err(|e| {
                NlpError::ModelUnavailable(format!("cannot read {}: {}", path.display(), e))
            })
        })?;

        info!("Loaded NLP resources from {}", dir.display());
        Ok(lexicon)
    }

    fn from_reader<F>(source: ResourceSource, mut read: F) -> Result<Self>
    where
        F: FnMut(&str) -> Result<String>,
    {
        let lexicon = Self {
            stopwords: parse_word_list(&read(STOPWORDS)?),
            sentiment: parse_sentiment(&read(SENTIMENT)?)?,
            intensifiers: parse_intensifiers(&read(INTENSIFIERS)?)?,
            negations: parse_word_list(&read(NEGATIONS)?),
            given_names: parse_word_list(&read(GIVEN_NAMES)?),
            titles: parse_word_list(&read(TITLES)?),
            organizations: parse_word_list(&read(ORGANIZATIONS)?),
            org_suffixes: parse_word_list(&read(ORG_SUFFIXES)?),
            locations: parse_word_list(&read(LOCATIONS)?),
            location_suffixes: parse_word_list(&read(LOCATION_SUFFIXES)?),
            abbreviations: parse_word_list(&read(ABBREVIATIONS)?),
            languages: parse_languages(&read(LANGUAGES)?)?,
            lemma_exceptions: parse_pairs(LEMMA_EXCEPTIONS, &read(LEMMA_EXCEPTIONS)?)?,
            source,
        };

        debug!(
            source = %lexicon.source,
            stopwords = lexicon.stopwords.len(),
            sentiment_words = lexicon.sentiment.len(),
            languages = lexicon.languages.len(),
            "Lexicon loaded"
        );

        Ok(lexicon)
    }

    pub fn source(&self) -> &ResourceSource {
        &self.source
    }

    pub fn is_stopword(&self, lower: &str) -> bool {
        self.stopwords.contains(lower)
    }

    pub fn sentiment(&self, lower: &str) -> Option<SentimentEntry> {
        self.sentiment.get(lower).copied()
    }

    pub fn intensifier(&self, lower: &str) -> Option<f64> {
        self.intensifiers.get(lower).copied()
    }

    pub fn is_negation(&self, lower: &str) -> bool {
        self.negations.contains(lower)
    }

    pub fn is_given_name(&self, lower: &str) -> bool {
        self.given_names.contains(lower)
    }

    /// Personal title; accepts a trailing period (`Dr.`)
    pub fn is_title(&self, lower: &str) -> bool {
        self.titles.contains(lower.trim_end_matches('.'))
    }

    pub fn is_organization(&self, lower: &str) -> bool {
        self.organizations.contains(lower)
    }

    pub fn is_org_suffix(&self, lower: &str) -> bool {
        self.org_suffixes.contains(lower.trim_end_matches('.'))
    }

    pub fn is_location(&self, lower: &str) -> bool {
        self.locations.contains(lower)
    }

    pub fn is_location_suffix(&self, lower: &str) -> bool {
        self.location_suffixes.contains(lower)
    }

    /// Abbreviation without its final period (`e.g`, `dr`)
    pub fn is_abbreviation(&self, lower: &str) -> bool {
        self.abbreviations.contains(lower)
    }

    pub fn languages(&self) -> &[LanguageProfile] {
        &self.languages
    }

    pub fn lemma_exception(&self, lower: &str) -> Option<&str> {
        self.lemma_exceptions.get(lower).map(String::as_str)
    }
}

/// Non-empty, non-comment lines with their 1-based line numbers
fn content_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

fn parse_word_list(content: &str) -> HashSet<String> {
    content_lines(content)
        .map(|(_, line)| line.to_lowercase())
        .collect()
}

fn malformed(file: &str, line: usize, reason: impl Into<String>) -> NlpError {
    NlpError::Resource {
        file: file.to_string(),
        line,
        reason: reason.into(),
    }
}

fn parse_number(file: &str, line: usize, field: &str) -> Result<f64> {
    field
        .trim()
        .parse::<f64>()
        .map_err(|e| malformed(file, line, format!("invalid number '{}': {}", field, e)))
}

fn parse_sentiment(content: &str) -> Result<HashMap<String, SentimentEntry>> {
    let mut entries = HashMap::new();
    for (line_no, line) in content_lines(content) {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != 3 {
            return Err(malformed(SENTIMENT, line_no, "expected 3 tab-separated fields"));
        }
        let polarity = parse_number(SENTIMENT, line_no, fields[1])?;
        let subjectivity = parse_number(SENTIMENT, line_no, fields[2])?;
        if !(-1.0..=1.0).contains(&polarity) || !(0.0..=1.0).contains(&subjectivity) {
            return Err(malformed(SENTIMENT, line_no, "score out of range"));
        }
        entries.insert(
            fields[0].trim().to_lowercase(),
            SentimentEntry {
                polarity,
                subjectivity,
            },
        );
    }
    Ok(entries)
}

fn parse_intensifiers(content: &str) -> Result<HashMap<String, f64>> {
    let mut entries = HashMap::new();
    for (line_no, line) in content_lines(content) {
        let (word, multiplier) = line
            .split_once('\t')
            .ok_or_else(|| malformed(INTENSIFIERS, line_no, "expected 2 tab-separated fields"))?;
        let multiplier = parse_number(INTENSIFIERS, line_no, multiplier)?;
        entries.insert(word.trim().to_lowercase(), multiplier);
    }
    Ok(entries)
}

fn parse_languages(content: &str) -> Result<Vec<LanguageProfile>> {
    let mut profiles = Vec::new();
    for (line_no, line) in content_lines(content) {
        let (code, words) = line
            .split_once('\t')
            .ok_or_else(|| malformed(LANGUAGES, line_no, "expected code and word list"))?;
        let words: HashSet<String> = words.split_whitespace().map(str::to_lowercase).collect();
        if words.is_empty() {
            return Err(malformed(LANGUAGES, line_no, "empty word list"));
        }
        profiles.push(LanguageProfile {
            code: code.trim().to_string(),
            words,
        });
    }
    Ok(profiles)
}

fn parse_pairs(file: &str, content: &str) -> Result<HashMap<String, String>> {
    let mut pairs = HashMap::new();
    for (line_no, line) in content_lines(content) {
        let (key, value) = line
            .split_once('\t')
            .ok_or_else(|| malformed(file, line_no, "expected 2 tab-separated fields"))?;
        pairs.insert(key.trim().to_lowercase(), value.trim().to_lowercase());
    }
    Ok(pairs)
}
