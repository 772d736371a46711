//! Replace entities that are noise for word-level analysis with placeholder tokens
use regex::Regex;
use std::sync::OnceLock;

use super::cached;

static URL: OnceLock<Regex> = OnceLock::new();
static EMAIL: OnceLock<Regex> = OnceLock::new();
static NUMBER: OnceLock<Regex> = OnceLock::new();
static CURRENCY: OnceLock<Regex> = OnceLock::new();
static HASHTAG: OnceLock<Regex> = OnceLock::new();
static USER_HANDLE: OnceLock<Regex> = OnceLock::new();

pub fn urls(text: &str, repl: &str) -> String {
    cached(&URL, r#"(?i)\b(?:https?://|ftp://|www\.)[^\s<>"]+[^\s<>".,;:!?)\]'"]"#)
        .replace_all(text, repl)
        .into_owned()
}

pub fn emails(text: &str, repl: &str) -> String {
    cached(&EMAIL, r"(?i)\b[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}\b")
        .replace_all(text, repl)
        .into_owned()
}

/// Integers and decimals, with optional sign and thousands separators
pub fn numbers(text: &str, repl: &str) -> String {
    cached(&NUMBER, r"[+-]?\b\d+(?:[.,]\d+)*\b")
        .replace_all(text, repl)
        .into_owned()
}

pub fn currency_symbols(text: &str, repl: &str) -> String {
    cached(&CURRENCY, r"\p{Sc}")
        .replace_all(text, repl)
        .into_owned()
}

pub fn hashtags(text: &str, repl: &str) -> String {
    cached(&HASHTAG, r"(?:^|\B)#\w*[^\W\d_]\w*")
        .replace_all(text, repl)
        .into_owned()
}

pub fn user_handles(text: &str, repl: &str) -> String {
    cached(&USER_HANDLE, r"(?:^|\B)@\w{2,}")
        .replace_all(text, repl)
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_urls_and_emails() {
        let text = "See www.senate.gov/jobs. or write staff@mail.house.gov.";
        assert_eq!(emails(&urls(text, "_URL_"), "_EMAIL_"), "See _URL_. or write _EMAIL_.");
    }

    #[test]
    fn replaces_numbers() {
        assert_eq!(numbers("raise it to $7.25 for 1,000,000 workers", "_NUMBER_"),
            "raise it to $_NUMBER_ for _NUMBER_ workers");
        assert_eq!(currency_symbols("$7.25", "_CUR_"), "_CUR_7.25");
    }

    #[test]
    fn replaces_tags_and_handles() {
        assert_eq!(hashtags("#RaiseTheWage now", "_TAG_"), "_TAG_ now");
        assert_eq!(user_handles("thanks @SenSanders", "_USER_"), "thanks _USER_");
        assert_eq!(user_handles("staff@mail.gov", "_USER_"), "staff@mail.gov");
    }
}
