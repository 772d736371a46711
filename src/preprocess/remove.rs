//! Remove characters that rarely matter for analysis
use regex::Regex;
use std::sync::OnceLock;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use super::cached;

/// Strip diacritics: decompose, then drop the combining marks
pub fn accents(text: &str) -> String {
    text.nfkd().filter(|&c| !is_combining_mark(c)).collect()
}

static PUNCT: OnceLock<Regex> = OnceLock::new();

/// Every punctuation character becomes a single space, so words on either side stay apart
pub fn punctuation(text: &str) -> String {
    cached(&PUNCT, r"\p{P}").replace_all(text, " ").into_owned()
}

static BRACKETS: OnceLock<Regex> = OnceLock::new();

/// Drop short bracketed asides: `(...)`, `[...]`, `{...}` without nested brackets
pub fn brackets(text: &str) -> String {
    cached(&BRACKETS, r"\([^()]{0,1000}?\)|\[[^\[\]]{0,1000}?\]|\{[^{}]{0,1000}?\}")
        .replace_all(text, "")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_accents() {
        assert_eq!(accents("Peña Nieto, café"), "Pena Nieto, cafe");
    }

    #[test]
    fn punctuation_becomes_space() {
        assert_eq!(punctuation("jobs, wages; (trust-funds)!"), "jobs  wages   trust funds  ");
    }

    #[test]
    fn drops_bracketed_asides() {
        assert_eq!(brackets("the bill (H.R. 2) passed [applause]."), "the bill  passed .");
    }
}
