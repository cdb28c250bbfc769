//! Parsed representation shared by every analysis

use std::ops::Range;

use crate::lemma::lemmatize;
use crate::lexicon::Lexicon;
use crate::tagger::tag_sentence;
use crate::tokenize::{split_sentences, tokenize, Token, TokenKind};

/// One sentence: its byte span in the text and the range of its tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    pub start: usize,
    pub end: usize,
    pub tokens: Range<usize>,
}

/// Tokenized, sentence-split, tagged and lemmatized text
#[derive(Debug, Clone)]
pub struct Document {
    text: String,
    tokens: Vec<Token>,
    sentences: Vec<Sentence>,
}

impl Document {
    pub fn parse(text: &str, lexicon: &Lexicon) -> Self {
        let mut tokens = tokenize(text);

        let sentences: Vec<Sentence> = split_sentences(text, lexicon)
            .into_iter()
            .map(|span| {
                let first = tokens.partition_point(|t| t.start < span.start);
                let last = tokens.partition_point(|t| t.start < span.end);
                Sentence {
                    start: span.start,
                    end: span.end,
                    tokens: first..last,
                }
            })
            .collect();

        for sentence in &sentences {
            tag_sentence(&mut tokens[sentence.tokens.clone()], lexicon);
        }
        for token in tokens.iter_mut().filter(|t| t.kind == TokenKind::Word) {
            token.lemma = lemmatize(&token.lower, lexicon);
        }

        Self {
            text: text.to_string(),
            tokens,
            sentences,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    pub fn sentence_text(&self, sentence: &Sentence) -> &str {
        &self.text[sentence.start..sentence.end]
    }

    pub fn sentence_tokens(&self, sentence: &Sentence) -> &[Token] {
        &self.tokens[sentence.tokens.clone()]
    }

    /// Word and number tokens, skipping punctuation
    pub fn word_tokens(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter().filter(|t| t.is_word())
    }
}
