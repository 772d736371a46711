//! Annotated documents and spans of their tokens
use serde::Serialize;
use std::fmt;
use std::ops::Range;

use crate::lang::Pos;
use crate::record::{MetaValue, Metadata};

/// How to turn a token into a term string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Normalize {
    /// Surface text as written
    Orth,
    Lower,
    Lemma,
}

impl std::str::FromStr for Normalize {
    type Err = crate::errors::Error;

    fn from_str(s: &str) -> crate::errors::Result<Normalize> {
        match s.to_lowercase().as_str() {
            "orth" | "text" => Ok(Normalize::Orth),
            "lower" => Ok(Normalize::Lower),
            "lemma" => Ok(Normalize::Lemma),
            _ => Err(crate::errors::Error::InvalidConfig(format!(
                "unknown normalization '{}', expected orth, lower or lemma", s))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub text: String,
    /// Position in the document
    pub i: usize,
    /// Byte offset into the document text
    pub idx: usize,
    pub lower: String,
    pub lemma: String,
    pub pos: Pos,
    pub is_stop: bool,
    pub is_punct: bool,
    pub is_alpha: bool,
    pub is_digit: bool,
    /// Followed by whitespace
    pub whitespace: bool,
    pub sent_start: bool,
}

impl Token {
    /// Byte offset just past the token
    pub fn end(&self) -> usize {
        self.idx + self.text.len()
    }

    pub fn is_title(&self) -> bool {
        let mut chars = self.text.chars();
        chars.next().map_or(false, char::is_uppercase) && !chars.any(char::is_uppercase)
            && self.text.chars().any(char::is_alphabetic)
    }

    pub fn is_upper(&self) -> bool {
        self.text.chars().any(char::is_alphabetic) && !self.text.chars().any(char::is_lowercase)
    }

    pub fn is_lower(&self) -> bool {
        self.text.chars().any(char::is_alphabetic) && !self.text.chars().any(char::is_uppercase)
    }

    pub fn norm(&self, normalize: Normalize) -> &str {
        match normalize {
            Normalize::Orth => &self.text,
            Normalize::Lower => &self.lower,
            Normalize::Lemma => &self.lemma,
        }
    }
}

/// A text annotated by a language model, along with the metadata of its record
#[derive(Debug, Clone)]
pub struct Document {
    text: String,
    meta: Metadata,
    tokens: Vec<Token>,
    model: String,
}

impl Document {
    pub fn new(text: String, meta: Metadata, tokens: Vec<Token>, model: String) -> Self {
        Document { text, meta, tokens, model }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn meta(&self) -> &Metadata {
        &self.meta
    }

    pub fn get_meta(&self, field: &str) -> Option<&MetaValue> {
        self.meta.get(field)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn model_name(&self) -> &str {
        &self.model
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn n_sents(&self) -> usize {
        self.tokens.iter().filter(|t| t.sent_start).count()
    }

    /// Tokens `start..end`. Panics if the range is out of bounds, like slicing.
    pub fn span(&self, start: usize, end: usize) -> Span {
        assert!(start <= end && end <= self.tokens.len(),
            "span {}..{} out of bounds for a {} token document", start, end, self.tokens.len());
        Span { doc: self, start, end }
    }

    pub fn sentences(&self) -> impl Iterator<Item = Span> + '_ {
        let mut starts: Vec<usize> = self.tokens.iter()
            .filter(|t| t.sent_start)
            .map(|t| t.i)
            .collect();
        starts.push(self.tokens.len());
        let spans: Vec<Span> = starts.windows(2).map(|w| self.span(w[0], w[1])).collect();
        spans.into_iter()
    }

    /// Short summary: token count and the first 50 characters
    pub fn preview(&self) -> String {
        let snippet: String = self.text.chars().take(50).collect::<String>().replace('\n', " ");
        let ellipsis = if self.text.chars().count() > 50 { "..." } else { "" };
        format!("Doc({} tokens: \"{}{}\")", self.tokens.len(), snippet, ellipsis)
    }
}

/// A contiguous run of tokens borrowed from a document
#[derive(Clone, Copy)]
pub struct Span<'d> {
    doc: &'d Document,
    pub start: usize,
    pub end: usize,
}

impl<'d> Span<'d> {
    pub fn doc(&self) -> &'d Document {
        self.doc
    }

    pub fn tokens(&self) -> &'d [Token] {
        &self.doc.tokens[self.start..self.end]
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Byte range of the span in the document text
    pub fn char_range(&self) -> Range<usize> {
        match (self.tokens().first(), self.tokens().last()) {
            (Some(first), Some(last)) => first.idx..last.end(),
            _ => 0..0,
        }
    }

    pub fn text(&self) -> &'d str {
        &self.doc.text[self.char_range()]
    }

    /// Token lemmas, separated wherever the original tokens were
    pub fn lemma(&self) -> String {
        self.joined(Normalize::Lemma)
    }

    pub fn joined(&self, normalize: Normalize) -> String {
        let mut out = String::new();
        let tokens = self.tokens();
        for (n, token) in tokens.iter().enumerate() {
            out.push_str(token.norm(normalize));
            if token.whitespace && n + 1 < tokens.len() {
                out.push(' ');
            }
        }
        out
    }
}

impl<'d> PartialEq for Span<'d> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.start == other.start && self.end == other.end
    }
}

impl<'d> fmt::Debug for Span<'d> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.text())
    }
}

impl<'d> fmt::Display for Span<'d> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.text())
    }
}
