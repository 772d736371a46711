//! Pulling words, n-grams, patterns and key terms out of documents
use crate::doc::{Document, Span, Token};
use crate::lang::Pos;

pub mod keyterms;
pub mod kwic;
pub mod matcher;
pub mod pattern;
pub mod regex_matches;

pub use self::keyterms::{keyterms, Algorithm, EdgeWeighting, KeytermParams, TopN};
pub use self::kwic::{keyword_in_context, Kwic, KwicOptions};
pub use self::matcher::{token_matches, TokenMatches};
pub use self::pattern::TokenPattern;
pub use self::regex_matches::{regex_matches, Alignment};

/// Which tokens `words` and `ngrams` keep
#[derive(Debug, Clone, PartialEq)]
pub struct WordFilter {
    pub filter_stops: bool,
    pub filter_punct: bool,
    pub filter_nums: bool,
    /// Keep only these parts of speech, if set
    pub include_pos: Option<Vec<Pos>>,
}

impl Default for WordFilter {
    fn default() -> Self {
        WordFilter { filter_stops: true, filter_punct: true, filter_nums: false, include_pos: None }
    }
}

impl WordFilter {
    /// Keep everything
    pub fn none() -> Self {
        WordFilter { filter_stops: false, filter_punct: false, filter_nums: false, include_pos: None }
    }

    fn keeps(&self, token: &Token) -> bool {
        !(self.filter_stops && token.is_stop)
            && !(self.filter_punct && token.is_punct)
            && !(self.filter_nums && token.pos == Pos::Num)
            && self.include_pos.as_ref().map_or(true, |pos| pos.contains(&token.pos))
    }
}

pub fn words<'d>(doc: &'d Document, filter: &WordFilter) -> impl Iterator<Item = &'d Token> + 'd {
    let filter = filter.clone();
    doc.tokens().iter().filter(move |t| filter.keeps(t))
}

/// Runs of `n` consecutive tokens. Punctuation never appears inside an n-gram; with
/// `filter_stops`, stop words may appear inside but not at either end.
pub fn ngrams<'d>(doc: &'d Document, n: usize, filter: &WordFilter) -> impl Iterator<Item = Span<'d>> + 'd {
    let filter = filter.clone();
    let count = if n == 0 { 0 } else { (doc.len() + 1).saturating_sub(n) };
    (0..count).map(move |i| doc.span(i, i + n)).filter(move |span| {
        let tokens = span.tokens();
        let edges_ok = !filter.filter_stops
            || !(tokens[0].is_stop || tokens[tokens.len() - 1].is_stop);
        edges_ok
            && tokens.iter().all(|t| !t.is_punct)
            && !(filter.filter_nums && tokens.iter().any(|t| t.pos == Pos::Num))
            && filter.include_pos.as_ref().map_or(true, |pos| tokens.iter().all(|t| pos.contains(&t.pos)))
    })
}
