//! The toolkit facade: load resources once, analyse many texts

use std::path::Path;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::category::{categorize, ContentCategory};
use crate::document::Document;
use crate::entities::{extract_entities, NamedEntities};
use crate::error::{NlpError, Result};
use crate::language::{detect_language, LanguageInfo};
use crate::lexicon::{Lexicon, ResourceSource};
use crate::phrases::{extract_key_phrases, KeyPhrase};
use crate::readability::{analyze_readability, Readability};
use crate::sentiment::{analyze_sentiment, professional_metrics, SentimentAnalysis};
use crate::summary::{summarize, SUMMARY_KEY_PHRASES};

const SELF_TEST_TEXT: &str = "This is a test sentence for the text analysis toolkit.";

/// Tunables of a single analysis run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    pub key_phrase_count: usize,
    pub summary_sentences: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            key_phrase_count: 10,
            summary_sentences: 3,
        }
    }
}

/// Output of every analysis over one text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextAnalysis {
    pub sentiment_analysis: SentimentAnalysis,
    pub readability: Readability,
    pub key_phrases: Vec<KeyPhrase>,
    pub named_entities: NamedEntities,
    pub language_info: LanguageInfo,
    pub content_category: ContentCategory,
    pub summary: String,
}

/// Loaded language resources plus the analysis routines
///
/// Immutable after construction; share it between requests behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Toolkit {
    lexicon: Lexicon,
}

impl Toolkit {
    /// Toolkit over the resources compiled into the binary
    pub fn embedded() -> Result<Self> {
        Ok(Self {
            lexicon: Lexicon::embedded()?,
        })
    }

    /// Toolkit over the resource files in `dir`
    pub fn from_dir(dir: &Path) -> Result<Self> {
        Ok(Self {
            lexicon: Lexicon::from_dir(dir)?,
        })
    }

    /// Load from `resource_dir` when given, otherwise from the embedded resources
    pub fn load(resource_dir: Option<&Path>) -> Result<Self> {
        let toolkit = match resource_dir {
            Some(dir) => Self::from_dir(dir)?,
            None => Self::embedded()?,
        };
        toolkit.self_test()?;
        info!("NLP toolkit ready (resources: {})", toolkit.source());
        Ok(toolkit)
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn source(&self) -> &ResourceSource {
        self.lexicon.source()
    }

    /// Tokenize, split, tag and lemmatize `text`
    pub fn parse(&self, text: &str) -> Document {
        Document::parse(text, &self.lexicon)
    }

    /// Run every analysis over `text`
    pub fn analyze(&self, text: &str, options: &AnalysisOptions) -> Result<TextAnalysis> {
        if text.trim().is_empty() {
            return Err(NlpError::EmptyInput);
        }

        let started = Instant::now();
        let doc = self.parse(text);
        let lexicon = &self.lexicon;

        let metrics = professional_metrics(&doc, lexicon);
        let readability = analyze_readability(&doc, &metrics);
        let sentiment_analysis = analyze_sentiment(&doc, lexicon, metrics);

        let ranked = extract_key_phrases(&doc, options.key_phrase_count.max(SUMMARY_KEY_PHRASES));
        let named_entities = extract_entities(&doc, lexicon);
        let summary = summarize(
            &doc,
            lexicon,
            &named_entities,
            &ranked,
            options.summary_sentences,
        );
        let mut key_phrases = ranked;
        key_phrases.truncate(options.key_phrase_count);

        let analysis = TextAnalysis {
            sentiment_analysis,
            readability,
            key_phrases,
            named_entities,
            language_info: detect_language(&doc, lexicon),
            content_category: categorize(&doc, lexicon),
            summary,
        };

        debug!(
            tokens = doc.tokens().len(),
            sentences = doc.sentences().len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Text analysed"
        );

        Ok(analysis)
    }

    /// Check that the loaded resources produce a usable parse
    pub fn self_test(&self) -> Result<()> {
        let doc = self.parse(SELF_TEST_TEXT);
        if doc.tokens().is_empty() || doc.sentences().is_empty() {
            return Err(NlpError::ModelUnavailable(
                "self-test produced an empty parse".to_string(),
            ));
        }
        if self.lexicon.languages().is_empty() {
            return Err(NlpError::ModelUnavailable(
                "no language profiles loaded".to_string(),
            ));
        }
        Ok(())
    }
}
