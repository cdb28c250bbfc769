//! Word tokenizer and sentence splitter

use once_cell::sync::Lazy;
use regex::Regex;

use crate::lexicon::Lexicon;
use crate::tagger::PosTag;

/// Numbers with internal separators, words with internal hyphens or
/// apostrophes, an ellipsis, or any other single visible character.
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d+(?:[.,:]\d+)+|[\p{L}\p{N}_]+(?:[-'’][\p{L}\p{N}_]+)*|\.\.\.|\S")
        .expect("token pattern is valid")
});

/// Plain `\w+` runs, the word definition used by the readability counts
static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("word pattern is valid"));

static NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+(?:[.,:]\d+)*$").expect("number pattern is valid"));

static TERMINATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[.!?]+["'”’)\]]*"#).expect("terminator pattern is valid"));

static PARAGRAPH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n[ \t\r]*\n").expect("paragraph pattern is valid"));

const CLITICS: [&str; 6] = ["s", "re", "ll", "ve", "d", "m"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Word,
    Number,
    Punct,
}

/// One token of the parsed document
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Surface form (clitics normalised to ASCII apostrophes)
    pub text: String,
    pub lower: String,
    /// Byte span in the source text
    pub start: usize,
    pub end: usize,
    pub kind: TokenKind,
    pub tag: PosTag,
    pub lemma: String,
}

impl Token {
    fn new(text: String, start: usize, end: usize) -> Self {
        let lower = text.to_lowercase();
        let kind = if NUMBER_RE.is_match(&text) {
            TokenKind::Number
        } else if text.chars().any(char::is_alphanumeric) {
            TokenKind::Word
        } else {
            TokenKind::Punct
        };
        Self {
            lemma: lower.clone(),
            text,
            lower,
            start,
            end,
            kind,
            tag: PosTag::Unknown,
        }
    }

    /// Words and numbers, i.e. everything except punctuation
    pub fn is_word(&self) -> bool {
        self.kind != TokenKind::Punct
    }

    pub fn is_capitalized(&self) -> bool {
        self.kind == TokenKind::Word && self.text.chars().next().is_some_and(char::is_uppercase)
    }

    /// Two or more letters, all upper case (`NASA`, `IBM`)
    pub fn is_acronym(&self) -> bool {
        self.kind == TokenKind::Word
            && self.text.chars().count() >= 2
            && self.text.chars().all(|c| c.is_uppercase())
    }
}

/// Split text into word, number and punctuation tokens
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    for m in TOKEN_RE.find_iter(text) {
        split_clitics(m.as_str(), m.start(), &mut tokens);
    }
    tokens
}

/// `don't` -> `do` + `n't`, `it's` -> `it` + `'s`, `can't` -> `can` + `n't`
fn split_clitics(word: &str, start: usize, out: &mut Vec<Token>) {
    let normalized = word.replace('’', "'");
    let lower = normalized.to_lowercase();

    // Stem ends where the last three chars (`n't` in either apostrophe) begin
    let negation_stem = word
        .char_indices()
        .rev()
        .nth(2)
        .map(|(i, _)| i)
        .filter(|&i| i > 0);

    if let (true, Some(stem_len)) = (lower.ends_with("n't"), negation_stem) {
        let stem = &word[..stem_len];
        let stem_text = match stem.to_lowercase().as_str() {
            "ca" => format!("{}n", stem),
            "wo" if stem.starts_with('W') => "Will".to_string(),
            "wo" => "will".to_string(),
            _ => stem.to_string(),
        };
        out.push(Token::new(stem_text, start, start + stem_len));
        out.push(Token::new("n't".to_string(), start + stem_len, start + word.len()));
        return;
    }

    if let Some(pos) = normalized.rfind('\'') {
        let suffix = normalized[pos + 1..].to_lowercase();
        if pos > 0 && CLITICS.contains(&suffix.as_str()) {
            // Byte offset of the apostrophe in the source word
            let source_pos = word
                .char_indices()
                .filter(|(_, c)| *c == '\'' || *c == '’')
                .map(|(i, _)| i)
                .last()
                .unwrap_or(pos);
            out.push(Token::new(
                word[..source_pos].replace('’', "'"),
                start,
                start + source_pos,
            ));
            out.push(Token::new(
                format!("'{}", suffix),
                start + source_pos,
                start + word.len(),
            ));
            return;
        }
    }

    out.push(Token::new(normalized, start, start + word.len()));
}

/// `\w+` words of the text
pub fn words(text: &str) -> impl Iterator<Item = &str> {
    WORD_RE.find_iter(text).map(|m| m.as_str())
}

/// Byte span of one sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// Split text into trimmed, non-empty sentence spans
pub fn split_sentences(text: &str, lexicon: &Lexicon) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut paragraph_start = 0;

    for brk in PARAGRAPH_RE.find_iter(text) {
        split_paragraph(text, paragraph_start, brk.start(), lexicon, &mut spans);
        paragraph_start = brk.end();
    }
    split_paragraph(text, paragraph_start, text.len(), lexicon, &mut spans);

    spans
}

fn split_paragraph(text: &str, from: usize, to: usize, lexicon: &Lexicon, spans: &mut Vec<Span>) {
    let paragraph = &text[from..to];
    let mut start = 0;

    for m in TERMINATOR_RE.find_iter(paragraph) {
        let end = m.end();
        if !ends_sentence(&paragraph[end..]) {
            continue;
        }

        let terminator = m.as_str();
        if terminator.starts_with('.') && !terminator.starts_with("..") {
            let before = &paragraph[start..m.start()];
            let word = before
                .rsplit(char::is_whitespace)
                .next()
                .unwrap_or("")
                .trim_start_matches(|c: char| !c.is_alphanumeric());
            let single_initial =
                word.chars().count() == 1 && word.chars().all(char::is_uppercase);
            if single_initial || lexicon.is_abbreviation(&word.to_lowercase()) {
                continue;
            }
        }

        push_trimmed(text, from + start, from + end, spans);
        start = end;
    }

    push_trimmed(text, from + start, to, spans);
}

/// A terminator ends a sentence at end of text, or before whitespace that is
/// not followed by a lower-case letter.
fn ends_sentence(rest: &str) -> bool {
    match rest.chars().next() {
        None => true,
        Some(c) if !c.is_whitespace() => false,
        Some(_) => match rest.trim_start().chars().next() {
            None => true,
            Some(next) => !next.is_lowercase(),
        },
    }
}

fn push_trimmed(text: &str, start: usize, end: usize, spans: &mut Vec<Span>) {
    let slice = &text[start..end];
    let leading = slice.len() - slice.trim_start().len();
    let trimmed = slice.trim();
    if trimmed.is_empty() {
        return;
    }
    let start = start + leading;
    spans.push(Span {
        start,
        end: start + trimmed.len(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    fn sentences(text: &str) -> Vec<String> {
        let lexicon = Lexicon::embedded().unwrap();
        split_sentences(text, &lexicon)
            .into_iter()
            .map(|s| text[s.start..s.end].to_string())
            .collect()
    }

    #[test]
    fn test_tokenize_words_and_punctuation() {
        let tokens = tokenize("Hello, world! It costs $3.50 today.");
        assert_eq!(
            texts(&tokens),
            vec!["Hello", ",", "world", "!", "It", "costs", "$", "3.50", "today", "."]
        );
        assert_eq!(tokens[0].kind, TokenKind::Word);
        assert_eq!(tokens[1].kind, TokenKind::Punct);
        assert_eq!(tokens[7].kind, TokenKind::Number);
        assert_eq!(&"Hello, world!"[tokens[2].start..tokens[2].end], "world");
    }

    #[test]
    fn test_tokenize_keeps_hyphenated_words() {
        let tokens = tokenize("A well-known state-of-the-art tool");
        assert_eq!(texts(&tokens), vec!["A", "well-known", "state-of-the-art", "tool"]);
    }

    #[test]
    fn test_tokenize_splits_clitics() {
        let tokens = tokenize("I don't think it's ready, and we can't wait.");
        assert_eq!(
            texts(&tokens),
            vec![
                "I", "do", "n't", "think", "it", "'s", "ready", ",", "and", "we", "can", "n't",
                "wait", "."
            ]
        );
    }

    #[test]
    fn test_tokenize_handles_curly_apostrophe() {
        let text = "They won’t go.";
        let tokens = tokenize(text);
        assert_eq!(texts(&tokens), vec!["They", "will", "n't", "go", "."]);
        assert_eq!(&text[tokens[2].start..tokens[2].end], "n’t");
    }

    #[test]
    fn test_tokenize_mixed_apostrophes() {
        let text = "ab’cn't";
        let tokens = tokenize(text);
        assert_eq!(texts(&tokens), vec!["ab’c", "n't"]);
        assert_eq!(&text[tokens[0].start..tokens[0].end], "ab’c");
        assert_eq!(&text[tokens[1].start..tokens[1].end], "n't");

        let text = "y’all'dn't";
        let tokens = tokenize(text);
        let last = tokens.last().unwrap();
        assert_eq!(last.text, "n't");
        assert_eq!(&text[last.start..last.end], "n't");
        assert_eq!(tokens[0].start, 0);

        let text = "Isn’t it?";
        let tokens = tokenize(text);
        assert_eq!(texts(&tokens), vec!["Is", "n't", "it", "?"]);
        assert_eq!(&text[tokens[1].start..tokens[1].end], "n’t");
    }

    #[test]
    fn test_words_regex() {
        let found: Vec<&str> = words("It's a well-known fact.").collect();
        assert_eq!(found, vec!["It", "s", "a", "well", "known", "fact"]);
    }

    #[test]
    fn test_split_sentences_basic() {
        assert_eq!(
            sentences("The sky is blue. Is it? Yes!"),
            vec!["The sky is blue.", "Is it?", "Yes!"]
        );
    }

    #[test]
    fn test_split_sentences_respects_abbreviations() {
        assert_eq!(
            sentences("Dr. Smith met Mr. Jones. They talked about the U.S. Economy."),
            vec!["Dr. Smith met Mr. Jones.", "They talked about the U.S. Economy."]
        );
    }

    #[test]
    fn test_split_sentences_decimals_and_lowercase() {
        assert_eq!(
            sentences("Growth was 3.5 percent. Prices rose, e.g. Rent went up."),
            vec!["Growth was 3.5 percent.", "Prices rose, e.g. Rent went up."]
        );
        assert_eq!(sentences("It was fine. and then more."), vec!["It was fine. and then more."]);
    }

    #[test]
    fn test_split_sentences_paragraphs_and_no_terminator() {
        assert_eq!(
            sentences("A heading\n\nSome text without a stop"),
            vec!["A heading", "Some text without a stop"]
        );
        assert_eq!(sentences("   "), Vec::<String>::new());
    }

    #[test]
    fn test_split_sentences_closing_quote() {
        assert_eq!(
            sentences("He said \"Stop.\" Then he left."),
            vec!["He said \"Stop.\"", "Then he left."]
        );
    }
}
