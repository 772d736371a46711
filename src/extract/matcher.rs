//! Token-pattern matching over annotated documents
use crate::doc::{Document, Span, Token};
use crate::extract::pattern::{Quantifier, TokenPattern, TokenSpec};

/// Matches of a pattern in document order. At each position the longest match wins, and the
/// scan resumes after it, so matches never overlap.
pub struct TokenMatches<'d> {
    doc: &'d Document,
    ends: MatchTable,
    position: usize,
}

impl<'d> Iterator for TokenMatches<'d> {
    type Item = Span<'d>;

    fn next(&mut self) -> Option<Span<'d>> {
        while self.position < self.doc.len() {
            let start = self.position;
            match self.ends.longest(start) {
                Some(end) if end > start => {
                    self.position = end;
                    return Some(self.doc.span(start, end));
                }
                _ => self.position += 1,
            }
        }
        None
    }
}

pub fn token_matches<'d>(doc: &'d Document, pattern: &TokenPattern) -> TokenMatches<'d> {
    TokenMatches { doc, ends: MatchTable::build(&pattern.specs, doc.tokens()), position: 0 }
}

/// Furthest end reachable by the tail `specs[k..]` from every token position.
///
/// Filled from the last position and the last spec backwards, so each cell reads only cells
/// already computed and the whole table costs one pass per spec over the document.
struct MatchTable {
    /// `rest[k * (n_tokens + 1) + p]`: longest end of `specs[k..]` starting at `p`
    rest: Vec<Option<usize>>,
}

impl MatchTable {
    fn build(specs: &[TokenSpec], tokens: &[Token]) -> MatchTable {
        let width = tokens.len() + 1;
        let cell = |k: usize, p: usize| k * width + p;
        let mut rest = vec![None; (specs.len() + 1) * width];
        // `repeat[cell(k, p)]`: longest end of zero or more `specs[k]` followed by `specs[k + 1..]`
        let mut repeat = vec![None; specs.len() * width];
        for p in (0..width).rev() {
            rest[cell(specs.len(), p)] = Some(p);
            for (k, spec) in specs.iter().enumerate().rev() {
                let hit = p < tokens.len() && spec.satisfied_by(&tokens[p]);
                let next = rest[cell(k + 1, p)];
                let after = if p < tokens.len() { rest[cell(k + 1, p + 1)] } else { None };
                let again = if hit { repeat[cell(k, p + 1)] } else { None };
                repeat[cell(k, p)] = again.max(next);
                rest[cell(k, p)] = match spec.op {
                    Quantifier::One => if hit { after } else { None },
                    Quantifier::Not => if p < tokens.len() && !hit { after } else { None },
                    Quantifier::Optional => if hit { after.max(next) } else { next },
                    Quantifier::ZeroOrMore => repeat[cell(k, p)],
                    Quantifier::OneOrMore => again,
                };
            }
        }
        MatchTable { rest }
    }

    fn longest(&self, at: usize) -> Option<usize> {
        self.rest[at]
    }
}
