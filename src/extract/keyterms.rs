//! Graph-based key term extraction (TextRank and its relatives)
//!
//! Words are ranked by PageRank over their co-occurrence graph, candidate terms are the longest
//! runs of content words, and a term scores the sum of its words' ranks.
use serde::Deserialize;
use std::cmp::Ordering;
use std::str::FromStr;

use crate::doc::{Document, Normalize, Token};
use crate::errors::*;
use crate::farm::{new_farm_set, FarmSet};
pub use crate::graph::EdgeWeighting;
use crate::graph::CooccurrenceGraph;
use crate::lang::pos::ALL_POS;
use crate::lang::Pos;

/// Terms at least this similar to a better-ranked term are dropped
pub const DEDUP_THRESHOLD: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Binary edges, window of 2
    TextRank,
    /// Counted edges, window of 10
    SingleRank,
    /// SingleRank with jumps biased towards words seen early in the document
    PositionRank,
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Algorithm> {
        match s.to_lowercase().replace('_', "").as_str() {
            "textrank" => Ok(Algorithm::TextRank),
            "singlerank" => Ok(Algorithm::SingleRank),
            "positionrank" => Ok(Algorithm::PositionRank),
            _ => Err(Error::InvalidConfig(format!(
                "unknown key term algorithm '{}', expected textrank, singlerank or positionrank", s))),
        }
    }
}

/// How many terms to return
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TopN {
    Count(usize),
    /// A fraction (0, 1] of the distinct candidate terms, rounded
    Fraction(f64),
}

impl TopN {
    fn resolve(self, candidates: usize) -> usize {
        match self {
            TopN::Count(n) => n,
            TopN::Fraction(f) => (candidates as f64 * f).round() as usize,
        }
    }
}

impl FromStr for TopN {
    type Err = Error;

    fn from_str(s: &str) -> Result<TopN> {
        if let Ok(n) = s.parse::<usize>() {
            return Ok(TopN::Count(n));
        }
        match s.parse::<f64>() {
            Ok(f) if f > 0.0 && f <= 1.0 => Ok(TopN::Fraction(f)),
            _ => Err(Error::InvalidConfig(format!(
                "topn must be a count or a fraction in (0, 1], got '{}'", s))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct KeytermParams {
    pub algorithm: Algorithm,
    pub normalize: Normalize,
    pub window_size: usize,
    pub edge_weighting: EdgeWeighting,
    pub include_pos: Vec<Pos>,
    pub topn: TopN,
}

impl Default for KeytermParams {
    fn default() -> Self {
        KeytermParams::new(Algorithm::TextRank)
    }
}

impl KeytermParams {
    /// The usual settings for each algorithm
    pub fn new(algorithm: Algorithm) -> Self {
        let (window_size, edge_weighting) = match algorithm {
            Algorithm::TextRank => (2, EdgeWeighting::Binary),
            Algorithm::SingleRank | Algorithm::PositionRank => (10, EdgeWeighting::Count),
        };
        KeytermParams {
            algorithm,
            normalize: Normalize::Lemma,
            window_size,
            edge_weighting,
            include_pos: ALL_POS.iter().cloned().filter(|pos| pos.is_nominal()).collect(),
            topn: TopN::Count(10),
        }
    }

    pub fn normalize(mut self, normalize: Normalize) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    pub fn edge_weighting(mut self, edge_weighting: EdgeWeighting) -> Self {
        self.edge_weighting = edge_weighting;
        self
    }

    pub fn include_pos(mut self, include_pos: Vec<Pos>) -> Self {
        self.include_pos = include_pos;
        self
    }

    pub fn topn(mut self, topn: TopN) -> Self {
        self.topn = topn;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.window_size < 2 {
            return Err(Error::InvalidConfig(format!("window_size must be at least 2, got {}", self.window_size)));
        }
        if let TopN::Fraction(f) = self.topn {
            if !(f > 0.0 && f <= 1.0) {
                return Err(Error::InvalidConfig(format!("topn fraction must be in (0, 1], got {}", f)));
            }
        }
        Ok(())
    }
}

fn is_word(token: &Token) -> bool {
    !token.is_stop && !token.is_punct && token.pos != Pos::Sym && !token.text.trim().is_empty()
}

/// Top key terms of a document with their scores, best first
pub fn keyterms(doc: &Document, params: &KeytermParams) -> Result<Vec<(String, f64)>> {
    params.validate()?;
    let words: Vec<&str> = doc.tokens().iter()
        .filter(|t| is_word(t))
        .map(|t| t.norm(params.normalize))
        .collect();
    if words.is_empty() {
        return Ok(vec![]);
    }
    let graph = CooccurrenceGraph::build(&words, params.window_size, params.edge_weighting);
    let ranks = match params.algorithm {
        Algorithm::PositionRank => {
            let mut bias = vec![0.0; graph.len()];
            for (position, word) in words.iter().enumerate() {
                if let Some(id) = graph.id(word) {
                    bias[id] += 1.0 / (position as f64 + 1.0);
                }
            }
            graph.pagerank(Some(bias.as_slice()))
        }
        _ => graph.pagerank(None),
    };
    let word_score = |w: &str| graph.id(w).map_or(0.0, |id| ranks[id]);

    let mut seen: FarmSet<String> = new_farm_set();
    let mut scored: Vec<(String, f64)> = vec![];
    for run in candidate_runs(doc.tokens(), &params.include_pos) {
        let norms: Vec<&str> = run.iter().map(|t| t.norm(params.normalize)).collect();
        let term = norms.join(" ");
        if seen.insert(term.clone()) {
            let score = norms.iter().map(|w| word_score(w)).sum();
            scored.push((term, score));
        }
    }
    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal).then_with(|| b.0.cmp(&a.0))
    });

    let topn = params.topn.resolve(scored.len());
    let mut kept: Vec<(String, f64)> = vec![];
    for (term, score) in scored {
        if kept.len() >= topn {
            break;
        }
        if kept.iter().all(|(k, _)| token_sort_ratio(k, &term) < DEDUP_THRESHOLD) {
            kept.push((term, score));
        }
    }
    debug!("{} key terms from {} words in {}", kept.len(), words.len(), doc.preview());
    Ok(kept)
}

/// Maximal runs of content words with an allowed part of speech
fn candidate_runs<'d>(tokens: &'d [Token], include_pos: &[Pos]) -> Vec<&'d [Token]> {
    let mut runs = vec![];
    let mut start = None;
    for (i, token) in tokens.iter().enumerate() {
        let fits = is_word(token) && include_pos.contains(&token.pos) && !(token.sent_start && start.is_some());
        match (fits, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                runs.push(&tokens[s..i]);
                start = if is_word(token) && include_pos.contains(&token.pos) { Some(i) } else { None };
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push(&tokens[s..]);
    }
    runs
}

/// Similarity of two terms regardless of word order: the words of each are sorted, then
/// compared by longest common subsequence, scaled to [0, 1].
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    fn sorted_chars(s: &str) -> Vec<char> {
        let mut words: Vec<&str> = s.split_whitespace().collect();
        words.sort_unstable();
        words.join(" ").chars().collect()
    }
    let (a, b) = (sorted_chars(a), sorted_chars(b));
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let mut prev = vec![0usize; b.len() + 1];
    for ca in &a {
        let mut row = vec![0usize; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            row[j + 1] = if ca == cb { prev[j] + 1 } else { row[j].max(prev[j + 1]) };
        }
        prev = row;
    }
    2.0 * prev[b.len()] as f64 / (a.len() + b.len()) as f64
}
