//! Noun lemmatizer: irregular exceptions first, then plural suffix rules

use crate::lexicon::Lexicon;

const SUFFIX_RULES: [(&str, &str); 6] = [
    ("ies", "y"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("sses", "ss"),
    ("xes", "x"),
    ("zes", "z"),
];

/// Lemma of a lower-cased word
pub fn lemmatize(lower: &str, lexicon: &Lexicon) -> String {
    if let Some(lemma) = lexicon.lemma_exception(lower) {
        return lemma.to_string();
    }

    if lower.chars().count() <= 3 || !lower.chars().all(char::is_alphabetic) {
        return lower.to_string();
    }

    for (suffix, replacement) in SUFFIX_RULES {
        if let Some(stem) = lower.strip_suffix(suffix) {
            return format!("{}{}", stem, replacement);
        }
    }

    if lower.ends_with('s') && !["ss", "us", "is"].iter().any(|s| lower.ends_with(s)) {
        return lower[..lower.len() - 1].to_string();
    }

    lower.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lemmatize() {
        let lexicon = Lexicon::embedded().unwrap();
        let cases = [
            ("children", "child"),
            ("analyses", "analysis"),
            ("studies", "study"),
            ("churches", "church"),
            ("classes", "class"),
            ("boxes", "box"),
            ("reports", "report"),
            ("movies", "movie"),
            ("status", "status"),
            ("basis", "basis"),
            ("gas", "gas"),
            ("well-known", "well-known"),
            ("data", "data"),
        ];
        for (word, lemma) in cases {
            assert_eq!(lemmatize(word, &lexicon), lemma, "lemma of {}", word);
        }
    }
}
