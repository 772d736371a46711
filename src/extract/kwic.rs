//! Keyword in context: every occurrence of a keyword with the text around it
use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use std::fmt;

use crate::errors::*;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct KwicOptions {
    pub ignore_case: bool,
    /// Characters of context on each side
    pub window_width: usize,
    /// Pad context out to the full window width so keywords line up
    pub pad_context: bool,
}

impl Default for KwicOptions {
    fn default() -> Self {
        KwicOptions { ignore_case: true, window_width: 50, pad_context: false }
    }
}

impl KwicOptions {
    pub fn window_width(mut self, width: usize) -> Self {
        self.window_width = width;
        self
    }

    pub fn ignore_case(mut self, ignore: bool) -> Self {
        self.ignore_case = ignore;
        self
    }

    pub fn pad_context(mut self, pad: bool) -> Self {
        self.pad_context = pad;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kwic {
    pub pre: String,
    pub keyword: String,
    pub post: String,
}

impl fmt::Display for Kwic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} {}", self.pre, self.keyword, self.post)
    }
}

/// Lazy scan for a keyword pattern. Built by `keyword_in_context`.
pub struct KwicMatches<'t> {
    text: &'t str,
    re: Regex,
    options: KwicOptions,
    position: usize,
}

impl<'t> Iterator for KwicMatches<'t> {
    type Item = Kwic;

    fn next(&mut self) -> Option<Kwic> {
        while self.position <= self.text.len() {
            let m = self.re.find_at(self.text, self.position)?;
            if m.start() == m.end() {
                // skip empty matches, one character at a time
                self.position = m.end() + self.text[m.end()..].chars().next().map_or(1, char::len_utf8);
                continue;
            }
            self.position = m.end();
            return Some(self.context(m.start(), m.end()));
        }
        None
    }
}

impl<'t> KwicMatches<'t> {
    fn context(&self, start: usize, end: usize) -> Kwic {
        let width = self.options.window_width;
        let pre_start = self.text[..start].char_indices()
            .rev()
            .take(width)
            .last()
            .map_or(start, |(i, _)| i);
        let post_end = self.text[end..].char_indices()
            .nth(width)
            .map_or(self.text.len(), |(i, _)| end + i);
        let pre = flatten(&self.text[pre_start..start]);
        let post = flatten(&self.text[end..post_end]);
        if self.options.pad_context {
            Kwic {
                pre: format!("{:>width$}", pre, width = width),
                keyword: self.text[start..end].to_string(),
                post: format!("{:<width$}", post, width = width),
            }
        } else {
            Kwic { pre, keyword: self.text[start..end].to_string(), post }
        }
    }
}

fn flatten(text: &str) -> String {
    text.replace('\n', " ")
}

/// Occurrences of `keyword` (a regular expression) in `text`, in order
pub fn keyword_in_context<'t>(text: &'t str, keyword: &str, options: KwicOptions) -> Result<KwicMatches<'t>> {
    let re = RegexBuilder::new(keyword)
        .case_insensitive(options.ignore_case)
        .build()?;
    Ok(KwicMatches { text, re, options, position: 0 })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPEECH: &str = "We stand with working families.\nThe workers of Ohio deserve better.";

    #[test]
    fn finds_keywords_with_context() {
        let hits: Vec<Kwic> = keyword_in_context(SPEECH, "work(ing|ers?)", KwicOptions::default().window_width(10))
            .unwrap()
            .collect();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0], Kwic { pre: "tand with ".into(), keyword: "working".into(), post: " families.".into() });
        assert_eq!(hits[1].pre, "lies. The ");
        assert_eq!(hits[1].keyword, "workers");
        assert_eq!(hits[1].post, " of Ohio d");
    }

    #[test]
    fn respects_case_and_padding() {
        let strict = KwicOptions::default().ignore_case(false);
        assert_eq!(keyword_in_context("Workers work", "work", strict).unwrap().count(), 1);
        assert_eq!(keyword_in_context("Workers work", "work", KwicOptions::default()).unwrap().count(), 2);

        let padded = KwicOptions::default().window_width(6).pad_context(true);
        let hit = keyword_in_context("a job", "job", padded).unwrap().next().unwrap();
        assert_eq!(hit.pre, "    a ");
        assert_eq!(hit.post, "      ");
    }

    #[test]
    fn bad_keyword_is_an_error() {
        assert!(keyword_in_context(SPEECH, "work(", KwicOptions::default()).is_err());
        assert_eq!(keyword_in_context(SPEECH, "x*", KwicOptions::default()).unwrap().count(), 0);
    }
}
