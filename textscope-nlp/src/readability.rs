//! Flesch reading ease, professional writing scores and improvement hints

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::round_to;
use crate::sentiment::ProfessionalMetrics;
use crate::tokenize::words;

const VOWELS: &str = "aeiouy";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfessionalScores {
    pub clarity: f64,
    pub conciseness: f64,
    pub objectivity: f64,
    pub vocabulary_diversity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Readability {
    /// Absent when the text has no words or no sentences
    pub flesch_reading_ease: Option<f64>,
    pub avg_sentence_length: f64,
    pub word_count: usize,
    pub sentence_count: usize,
    pub syllable_count: usize,
    pub difficulty_level: String,
    pub professional_scores: ProfessionalScores,
    pub writing_improvements: Vec<String>,
}

/// Vowel groups in a word, less a silent final `e`, at least one
pub fn count_syllables(word: &str) -> usize {
    let lower = word.to_lowercase();
    let mut count = 0usize;
    let mut previous_vowel = false;
    for c in lower.chars() {
        let vowel = VOWELS.contains(c);
        if vowel && !previous_vowel {
            count += 1;
        }
        previous_vowel = vowel;
    }
    if lower.ends_with('e') {
        count = count.saturating_sub(1);
    }
    count.max(1)
}

pub fn difficulty_level(flesch: Option<f64>) -> &'static str {
    let Some(score) = flesch else {
        return "Unknown";
    };
    match score {
        s if s >= 90.0 => "Very Easy",
        s if s >= 80.0 => "Easy",
        s if s >= 70.0 => "Fairly Easy",
        s if s >= 60.0 => "Standard",
        s if s >= 50.0 => "Fairly Difficult",
        s if s >= 30.0 => "Difficult",
        _ => "Very Difficult",
    }
}

pub fn analyze_readability(doc: &Document, metrics: &ProfessionalMetrics) -> Readability {
    let text_words: Vec<&str> = words(doc.text()).collect();
    let word_count = text_words.len();
    let sentence_count = doc.sentences().len();
    let syllable_count: usize = text_words.iter().map(|w| count_syllables(w)).sum();

    let avg_sentence_length = if sentence_count > 0 {
        word_count as f64 / sentence_count as f64
    } else {
        0.0
    };

    let flesch = (word_count > 0 && sentence_count > 0).then(|| {
        206.835
            - 1.015 * (word_count as f64 / sentence_count as f64)
            - 84.6 * (syllable_count as f64 / word_count as f64)
    });

    let token_count = doc.word_tokens().count();

    Readability {
        flesch_reading_ease: flesch.map(|f| round_to(f, 2)),
        avg_sentence_length: round_to(avg_sentence_length, 2),
        word_count,
        sentence_count,
        syllable_count,
        difficulty_level: difficulty_level(flesch).to_string(),
        professional_scores: professional_scores(metrics, sentence_count, word_count),
        writing_improvements: writing_improvements(metrics, sentence_count, token_count),
    }
}

/// Share of a count in a total, as a 0-100 score where fewer is better
fn inverse_percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    round_to((100.0 - count as f64 / total as f64 * 100.0).max(0.0), 2)
}

fn professional_scores(
    metrics: &ProfessionalMetrics,
    sentence_count: usize,
    word_count: usize,
) -> ProfessionalScores {
    ProfessionalScores {
        clarity: metrics.clarity_score,
        conciseness: inverse_percentage(metrics.long_sentences, sentence_count),
        objectivity: inverse_percentage(metrics.passive_voice_count, sentence_count),
        vocabulary_diversity: inverse_percentage(metrics.repetitive_words, word_count),
    }
}

fn writing_improvements(
    metrics: &ProfessionalMetrics,
    sentence_count: usize,
    token_count: usize,
) -> Vec<String> {
    let sentences = sentence_count as f64;
    let mut improvements = Vec::new();

    if metrics.passive_voice_count as f64 > sentences * 0.2 {
        improvements.push("Consider reducing passive voice usage for more direct communication");
    }
    if metrics.long_sentences as f64 > sentences * 0.3 {
        improvements.push("Break down long sentences to improve clarity and readability");
    }
    if metrics.complex_words as f64 > token_count as f64 * 0.2 {
        improvements.push("Simplify complex vocabulary where possible to enhance understanding");
    }
    if metrics.repetitive_words > 0 {
        improvements.push("Vary word choice to avoid repetition and maintain reader engagement");
    }

    improvements.into_iter().map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::Lexicon;
    use crate::sentiment::professional_metrics;

    fn readability_of(text: &str) -> Readability {
        let lexicon = Lexicon::embedded().unwrap();
        let doc = Document::parse(text, &lexicon);
        let metrics = professional_metrics(&doc, &lexicon);
        analyze_readability(&doc, &metrics)
    }

    #[test]
    fn test_count_syllables() {
        assert_eq!(count_syllables("cat"), 1);
        assert_eq!(count_syllables("the"), 1);
        assert_eq!(count_syllables("table"), 1);
        assert_eq!(count_syllables("reading"), 2);
        assert_eq!(count_syllables("beautiful"), 3);
        assert_eq!(count_syllables("Analysis"), 4);
        assert_eq!(count_syllables("42"), 1);
    }

    #[test]
    fn test_difficulty_bands() {
        assert_eq!(difficulty_level(Some(95.0)), "Very Easy");
        assert_eq!(difficulty_level(Some(80.0)), "Easy");
        assert_eq!(difficulty_level(Some(75.5)), "Fairly Easy");
        assert_eq!(difficulty_level(Some(60.0)), "Standard");
        assert_eq!(difficulty_level(Some(55.0)), "Fairly Difficult");
        assert_eq!(difficulty_level(Some(30.0)), "Difficult");
        assert_eq!(difficulty_level(Some(-12.0)), "Very Difficult");
        assert_eq!(difficulty_level(None), "Unknown");
    }

    #[test]
    fn test_simple_text_scores() {
        let result = readability_of("The cat sat on the mat. The dog ran.");
        assert_eq!(result.word_count, 9);
        assert_eq!(result.sentence_count, 2);
        assert_eq!(result.syllable_count, 9);
        assert_eq!(result.avg_sentence_length, 4.5);
        // 206.835 - 1.015 * 4.5 - 84.6 * 1.0
        let flesch = result.flesch_reading_ease.unwrap();
        assert!((flesch - 117.67).abs() < 0.011);
        assert_eq!(result.difficulty_level, "Very Easy");
        assert!(result.writing_improvements.is_empty());
        assert_eq!(result.professional_scores.conciseness, 100.0);
    }

    #[test]
    fn test_flesch_absent_without_words() {
        let result = readability_of("?!");
        assert_eq!(result.word_count, 0);
        assert_eq!(result.sentence_count, 1);
        assert_eq!(result.flesch_reading_ease, None);
        assert_eq!(result.difficulty_level, "Unknown");
        assert_eq!(result.professional_scores.vocabulary_diversity, 100.0);
    }

    #[test]
    fn test_improvements_for_passive_and_repetitive_text() {
        let result =
            readability_of("The code was reviewed. The code was tested. The code code shipped.");
        assert!(result
            .writing_improvements
            .iter()
            .any(|s| s.contains("passive voice")));
        assert!(result
            .writing_improvements
            .iter()
            .any(|s| s.contains("repetition")));
        assert!(result.professional_scores.objectivity < 100.0);
    }
}
