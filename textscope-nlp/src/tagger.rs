//! Rule-based part-of-speech tagger
//!
//! Closed-class words come from fixed lists, sentiment words are adjectives,
//! everything else is decided by capitalisation, suffix and the previous tag.
//! Tags follow the Penn Treebank set, coarsened to what the analyses need.

use serde::Serialize;

use crate::lexicon::Lexicon;
use crate::tokenize::{Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PosTag {
    Noun,
    PluralNoun,
    ProperNoun,
    Verb,
    VerbPast,
    VerbGerund,
    VerbParticiple,
    VerbThirdPerson,
    VerbPresent,
    Adjective,
    Adverb,
    Determiner,
    Preposition,
    Conjunction,
    Pronoun,
    PossessivePronoun,
    Modal,
    Number,
    To,
    WhWord,
    Interjection,
    PossessiveMarker,
    Punctuation,
    Unknown,
}

impl PosTag {
    /// Penn Treebank name of the tag
    pub fn penn(&self) -> &'static str {
        match self {
            PosTag::Noun => "NN",
            PosTag::PluralNoun => "NNS",
            PosTag::ProperNoun => "NNP",
            PosTag::Verb => "VB",
            PosTag::VerbPast => "VBD",
            PosTag::VerbGerund => "VBG",
            PosTag::VerbParticiple => "VBN",
            PosTag::VerbThirdPerson => "VBZ",
            PosTag::VerbPresent => "VBP",
            PosTag::Adjective => "JJ",
            PosTag::Adverb => "RB",
            PosTag::Determiner => "DT",
            PosTag::Preposition => "IN",
            PosTag::Conjunction => "CC",
            PosTag::Pronoun => "PRP",
            PosTag::PossessivePronoun => "PRP$",
            PosTag::Modal => "MD",
            PosTag::Number => "CD",
            PosTag::To => "TO",
            PosTag::WhWord => "WP",
            PosTag::Interjection => "UH",
            PosTag::PossessiveMarker => "POS",
            PosTag::Punctuation => ".",
            PosTag::Unknown => "XX",
        }
    }

    pub fn is_noun(&self) -> bool {
        matches!(self, PosTag::Noun | PosTag::PluralNoun | PosTag::ProperNoun)
    }

    fn is_be_or_have(lower: &str) -> bool {
        matches!(
            lower,
            "am" | "is" | "are" | "was" | "were" | "be" | "been" | "being" | "have" | "has"
                | "had" | "having" | "'s" | "'re" | "'ve"
        )
    }
}

const DETERMINERS: &[&str] = &[
    "the", "a", "an", "this", "that", "these", "those", "every", "each", "some", "any", "no",
    "another", "all", "both", "either", "neither", "such",
];

const PREPOSITIONS: &[&str] = &[
    "of", "in", "on", "at", "by", "for", "with", "about", "against", "between", "into",
    "through", "during", "before", "after", "above", "below", "from", "up", "down", "out", "off",
    "over", "under", "across", "along", "among", "around", "behind", "beneath", "beside",
    "beyond", "despite", "except", "inside", "near", "onto", "outside", "per", "since", "toward",
    "towards", "upon", "within", "without", "via", "like", "than", "as",
];

const CONJUNCTIONS: &[&str] = &[
    "and", "or", "but", "nor", "yet", "because", "although", "though", "while", "if", "unless",
    "whereas", "whether",
];

const PRONOUNS: &[&str] = &[
    "i", "me", "you", "he", "him", "she", "her", "it", "we", "us", "they", "them", "myself",
    "yourself", "himself", "herself", "itself", "ourselves", "themselves", "someone", "anyone",
    "everyone", "nobody", "something", "anything", "everything", "nothing",
];

const POSSESSIVES: &[&str] = &["my", "your", "his", "its", "our", "their"];

const MODALS: &[&str] = &["can", "could", "may", "might", "must", "shall", "should", "will", "would"];

const WH_WORDS: &[&str] = &["what", "which", "who", "whom", "whose", "when", "where", "why", "how"];

const ADVERBS: &[&str] = &[
    "not", "n't", "never", "always", "often", "also", "very", "really", "just", "still",
    "already", "even", "only", "too", "quite", "rather", "almost", "here", "there", "now", "then",
    "today", "yesterday", "tomorrow", "soon", "again", "ever", "however", "therefore", "thus",
    "perhaps", "maybe", "so", "well",
];

const INTERJECTIONS: &[&str] = &["oh", "wow", "hey", "yes", "ouch", "hello"];

const IRREGULAR_PAST: &[&str] = &[
    "said", "made", "went", "took", "came", "saw", "knew", "got", "gave", "found", "thought",
    "told", "became", "left", "felt", "brought", "began", "kept", "held", "wrote", "stood",
    "heard", "meant", "met", "ran", "paid", "sat", "spoke", "led", "grew", "lost", "fell",
    "sent", "built", "understood", "drew", "broke", "spent", "rose", "drove", "bought", "wore",
    "chose", "slept", "won", "sold", "taught", "caught", "fought",
];

/// Sentiment words that are verbs rather than adjectives
const SENTIMENT_VERBS: &[&str] = &["love", "loved", "hate", "hated", "enjoy", "enjoyed", "failed"];

const ADJECTIVE_SUFFIXES: &[&str] = &[
    "ous", "ful", "ive", "able", "ible", "ical", "ial", "ual", "less", "ish", "ary", "ic",
];

const NOUN_SUFFIXES: &[&str] = &[
    "tion", "sion", "ment", "ness", "ity", "ism", "ship", "ence", "ance", "er", "or", "ist",
    "ure", "age", "ogy", "ics",
];

/// Tag the tokens of one sentence in place
pub fn tag_sentence(tokens: &mut [Token], lexicon: &Lexicon) {
    let mut previous = PosTag::Unknown;
    let mut previous_lower = String::new();
    let mut first_word = true;

    for i in 0..tokens.len() {
        let context = Context {
            previous,
            previous_lower: &previous_lower,
            next: tokens.get(i + 1).and_then(|t| closed_class(&t.lower)),
            sentence_initial: first_word,
        };
        let tag = tag_token(&tokens[i], &context, lexicon);
        let token = &mut tokens[i];
        token.tag = tag;
        if token.kind == TokenKind::Word {
            first_word = false;
        }
        previous = tag;
        previous_lower = token.lower.clone();
    }
}

/// Neighbourhood of the token being tagged
struct Context<'a> {
    previous: PosTag,
    previous_lower: &'a str,
    /// Closed-class tag of the following token, if it has one
    next: Option<PosTag>,
    sentence_initial: bool,
}

fn tag_token(token: &Token, context: &Context<'_>, lexicon: &Lexicon) -> PosTag {
    match token.kind {
        TokenKind::Punct => return PosTag::Punctuation,
        TokenKind::Number => return PosTag::Number,
        TokenKind::Word => {}
    }

    let lower = token.lower.as_str();
    if let Some(tag) = closed_class(lower) {
        return tag;
    }

    if token.is_acronym() {
        return PosTag::ProperNoun;
    }

    if token.is_capitalized() {
        if !context.sentence_initial {
            return PosTag::ProperNoun;
        }
        if lexicon.is_given_name(lower) || lexicon.is_location(lower) || lexicon.is_organization(lower)
        {
            return PosTag::ProperNoun;
        }
    }

    if matches!(context.previous, PosTag::To | PosTag::Modal) {
        return PosTag::Verb;
    }

    if lexicon.sentiment(lower).is_some() {
        if lower.ends_with("ly") {
            return PosTag::Adverb;
        }
        if !SENTIMENT_VERBS.contains(&lower) {
            return PosTag::Adjective;
        }
    }

    by_suffix(lower, context)
}

fn closed_class(lower: &str) -> Option<PosTag> {
    let tag = match lower {
        "to" => PosTag::To,
        "'s" => PosTag::PossessiveMarker,
        "am" | "are" | "'re" | "'m" => PosTag::VerbPresent,
        "is" | "has" | "does" => PosTag::VerbThirdPerson,
        "was" | "were" | "had" | "did" => PosTag::VerbPast,
        "be" | "have" | "do" => PosTag::Verb,
        "been" => PosTag::VerbParticiple,
        "being" | "having" | "doing" => PosTag::VerbGerund,
        _ if MODALS.contains(&lower) || lower == "'ll" || lower == "'d" => PosTag::Modal,
        _ if DETERMINERS.contains(&lower) => PosTag::Determiner,
        _ if POSSESSIVES.contains(&lower) => PosTag::PossessivePronoun,
        _ if PRONOUNS.contains(&lower) => PosTag::Pronoun,
        _ if WH_WORDS.contains(&lower) => PosTag::WhWord,
        _ if CONJUNCTIONS.contains(&lower) => PosTag::Conjunction,
        _ if PREPOSITIONS.contains(&lower) => PosTag::Preposition,
        _ if ADVERBS.contains(&lower) => PosTag::Adverb,
        _ if INTERJECTIONS.contains(&lower) => PosTag::Interjection,
        _ if IRREGULAR_PAST.contains(&lower) => PosTag::VerbPast,
        _ => return None,
    };
    Some(tag)
}

fn by_suffix(lower: &str, context: &Context<'_>) -> PosTag {
    let len = lower.chars().count();

    if len > 4 && lower.ends_with("ly") {
        return PosTag::Adverb;
    }
    if len > 4 && lower.ends_with("ing") {
        // "the running water", "machine learning"
        return match context.previous {
            PosTag::Determiner | PosTag::PossessivePronoun | PosTag::Adjective | PosTag::Noun => {
                PosTag::Noun
            }
            _ => PosTag::VerbGerund,
        };
    }
    if len > 3 && lower.ends_with("ed") {
        return if PosTag::is_be_or_have(context.previous_lower) {
            PosTag::VerbParticiple
        } else {
            PosTag::VerbPast
        };
    }
    if ADJECTIVE_SUFFIXES.iter().any(|s| lower.ends_with(s)) && len > 4 {
        return PosTag::Adjective;
    }
    if NOUN_SUFFIXES.iter().any(|s| lower.ends_with(s)) && len > 3 {
        return PosTag::Noun;
    }
    if len > 3
        && lower.ends_with('s')
        && !lower.ends_with("ss")
        && !lower.ends_with("us")
        && !lower.ends_with("is")
    {
        let after_subject_pronoun = matches!(context.previous_lower, "he" | "she" | "it");
        // "Alice loves the garden", "learning helps our team"
        let between_noun_and_object = matches!(context.previous, PosTag::Noun | PosTag::ProperNoun)
            && matches!(
                context.next,
                Some(PosTag::Determiner | PosTag::Pronoun | PosTag::PossessivePronoun)
            );
        return if after_subject_pronoun || between_noun_and_object {
            PosTag::VerbThirdPerson
        } else {
            PosTag::PluralNoun
        };
    }

    PosTag::Noun
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize::tokenize;

    fn tags(text: &str) -> Vec<(String, &'static str)> {
        let lexicon = Lexicon::embedded().unwrap();
        let mut tokens = tokenize(text);
        tag_sentence(&mut tokens, &lexicon);
        tokens.into_iter().map(|t| (t.text, t.tag.penn())).collect()
    }

    #[test]
    fn test_closed_class_and_suffixes() {
        let tagged = tags("The quick development of modern systems was finished quickly.");
        let expected = [
            ("The", "DT"),
            ("quick", "JJ"),
            ("development", "NN"),
            ("of", "IN"),
            ("modern", "NN"),
            ("systems", "NNS"),
            ("was", "VBD"),
            ("finished", "VBN"),
            ("quickly", "RB"),
            (".", "."),
        ];
        for (got, want) in tagged.iter().zip(expected.iter()) {
            assert_eq!((got.0.as_str(), got.1), *want);
        }
    }

    #[test]
    fn test_capitalised_words_are_proper_nouns() {
        let tagged = tags("Yesterday Alice visited Paris with NASA engineers.");
        assert_eq!(tagged[1], ("Alice".to_string(), "NNP"));
        assert_eq!(tagged[3], ("Paris".to_string(), "NNP"));
        assert_eq!(tagged[5], ("NASA".to_string(), "NNP"));
        assert_eq!(tagged[6], ("engineers".to_string(), "NNS"));
    }

    #[test]
    fn test_sentiment_words_are_adjectives() {
        let tagged = tags("It was a beautiful and terrible day.");
        assert_eq!(tagged[3].1, "JJ");
        assert_eq!(tagged[5].1, "JJ");
    }

    #[test]
    fn test_verb_after_modal_and_to() {
        let tagged = tags("We should report results and want to improve them.");
        assert_eq!(tagged[2], ("report".to_string(), "VB"));
        assert_eq!(tagged[7], ("improve".to_string(), "VB"));
    }

    #[test]
    fn test_third_person_after_pronoun() {
        let tagged = tags("She writes reports.");
        assert_eq!(tagged[1].1, "VBZ");
        assert_eq!(tagged[2].1, "NNS");
    }

    #[test]
    fn test_third_person_between_noun_and_object() {
        let tagged = tags("Machine learning helps the team.");
        assert_eq!(tagged[1], ("learning".to_string(), "NN"));
        assert_eq!(tagged[2], ("helps".to_string(), "VBZ"));
    }

    #[test]
    fn test_irregular_past() {
        let tagged = tags("He said nothing.");
        assert_eq!(tagged[1].1, "VBD");
    }
}
