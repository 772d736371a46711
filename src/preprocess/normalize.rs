//! Normalize characters that have many equivalent spellings
use regex::Regex;
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;

use super::cached;

/// Unicode normalization forms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    Nfc,
    Nfd,
    Nfkc,
    Nfkd,
}

/// Canonical (or compatibility) composition/decomposition
pub fn unicode(text: &str, form: Form) -> String {
    match form {
        Form::Nfc => text.nfc().collect(),
        Form::Nfd => text.nfd().collect(),
        Form::Nfkc => text.nfkc().collect(),
        Form::Nfkd => text.nfkd().collect(),
    }
}

/// Fancy quotes, primes and guillemets to plain ASCII `'` and `"`
pub fn quotation_marks(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '\u{2032}' | '\u{2039}'
            | '\u{203A}' | '\u{275B}' | '\u{275C}' | '\u{FF07}' | '`' | '\u{00B4}' => '\'',
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '\u{2033}' | '\u{00AB}'
            | '\u{00BB}' | '\u{275D}' | '\u{275E}' | '\u{301D}' | '\u{301E}' | '\u{301F}'
            | '\u{FF02}' => '"',
            other => other,
        })
        .collect()
}

static ZWSP: OnceLock<Regex> = OnceLock::new();
static LINEBREAK: OnceLock<Regex> = OnceLock::new();
static NONBREAKING_SPACE: OnceLock<Regex> = OnceLock::new();

/// Drop zero-width spaces, collapse line break runs to one `\n` and other whitespace runs to one
/// space, then trim. Applying it twice changes nothing.
pub fn whitespace(text: &str) -> String {
    let text = cached(&ZWSP, r"[\u{200B}\u{2060}\u{FEFF}]+").replace_all(text, "");
    let text = cached(&LINEBREAK, r"(?:\r\n|[\n\v\r])+").replace_all(&text, "\n");
    let text = cached(&NONBREAKING_SPACE, r"[^\S\n\v]+").replace_all(&text, " ");
    text.trim().to_string()
}

static HYPHENATED_WORD: OnceLock<Regex> = OnceLock::new();

/// Re-join words split across a line break by a hyphen, "work-\ners" to "workers"
pub fn hyphenated_words(text: &str) -> String {
    cached(&HYPHENATED_WORD, r"(\w*[^\W\d_])-[^\S\n]*\n\s*([^\W\d_]\w*)")
        .replace_all(text, "$1$2")
        .into_owned()
}

static BULLET_POINTS: OnceLock<Regex> = OnceLock::new();

/// Bullet glyphs at the start of a line become `-`
pub fn bullet_points(text: &str) -> String {
    cached(&BULLET_POINTS,
        r"(?m)^([^\S\n]*)[\u{2022}\u{2023}\u{2043}\u{204C}\u{204D}\u{2219}\u{25AA}\u{25CF}\u{25E6}\u{29BE}\u{29BF}\u{30FB}]")
        .replace_all(text, "${1}-")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composes_accents() {
        let decomposed = "Nin\u{0303}o";
        assert_eq!(unicode(decomposed, Form::Nfc), "Niño");
        assert_eq!(unicode("Niño", Form::Nfd).chars().count(), 5);
        assert_eq!(unicode("\u{FB01}scal", Form::Nfkc), "fiscal");
    }

    #[test]
    fn straightens_quotes() {
        assert_eq!(quotation_marks("\u{201C}it\u{2019}s\u{201D}"), "\"it's\"");
    }

    #[test]
    fn whitespace_is_idempotent() {
        let samples = [
            "  plain text  ",
            "a\u{200B}b \t c",
            "line one\r\n\r\nline two\n\n\n\nthree",
            "\u{00A0}\u{2003}wide\u{3000}spaces\u{00A0}",
            "\u{000B}vertical\u{000B}tab",
            "",
            "\n\n",
        ];
        for sample in samples.iter() {
            let once = whitespace(sample);
            assert_eq!(whitespace(&once), once, "not idempotent for {:?}", sample);
            assert!(!once.contains("  "));
            assert!(!once.contains("\n\n"));
        }
        assert_eq!(whitespace("a\u{200B}b \t c"), "ab c");
    }

    #[test]
    fn rejoins_line_break_hyphenation() {
        assert_eq!(hyphenated_words("American work-\ners and well-paid jobs"),
            "American workers and well-paid jobs");
        assert_eq!(hyphenated_words("section 12-\n14"), "section 12-\n14");
    }

    #[test]
    fn bullets_become_dashes() {
        assert_eq!(bullet_points("\u{2022} jobs\n  \u{25E6} wages"), "- jobs\n  - wages");
    }
}
