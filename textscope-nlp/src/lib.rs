//! # textscope-nlp
//!
//! A small deterministic NLP toolkit and the analyses built on it:
//! sentiment, readability, key phrases, named entities, language,
//! content category and an extractive summary.
//!
//! ```no_run
//! use textscope_nlp::{AnalysisOptions, Toolkit};
//!
//! let toolkit = Toolkit::embedded()?;
//! let analysis = toolkit.analyze("The launch went well.", &AnalysisOptions::default())?;
//! println!("{}", analysis.sentiment_analysis.polarity);
//! # Ok::<(), textscope_nlp::NlpError>(())
//! ```

pub mod category;
pub mod document;
pub mod entities;
pub mod error;
pub mod language;
pub mod lemma;
pub mod lexicon;
pub mod phrases;
pub mod pipeline;
pub mod readability;
pub mod sentiment;
pub mod stats;
pub mod summary;
pub mod tagger;
pub mod tokenize;

pub use category::ContentCategory;
pub use document::{Document, Sentence};
pub use entities::{EntityKind, NamedEntities};
pub use error::{NlpError, Result};
pub use language::LanguageInfo;
pub use lexicon::{Lexicon, ResourceSource, RESOURCE_FILES};
pub use phrases::KeyPhrase;
pub use pipeline::{AnalysisOptions, TextAnalysis, Toolkit};
pub use readability::{ProfessionalScores, Readability};
pub use sentiment::{ProfessionalMetrics, SentimentAnalysis, SentimentLabel, Tone};

/// Round half away from zero to `places` decimals
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::round_to;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.12345, 3), 0.123);
        assert_eq!(round_to(-0.35, 3), -0.35);
        assert_eq!(round_to(99.999, 2), 100.0);
    }
}
