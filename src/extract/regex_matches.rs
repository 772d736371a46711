//! Regular-expression matches against document text, snapped onto token boundaries
use regex::Regex;
use serde::Deserialize;
use std::str::FromStr;

use crate::doc::{Document, Span};
use crate::errors::*;

/// What to do with a match whose edges fall inside tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Keep only matches that start and end exactly on token boundaries
    Strict,
    /// Shrink to the tokens lying wholly inside the match
    Contract,
    /// Grow to every token the match touches
    Expand,
}

impl Default for Alignment {
    fn default() -> Self {
        Alignment::Strict
    }
}

impl FromStr for Alignment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Alignment> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(Alignment::Strict),
            "contract" => Ok(Alignment::Contract),
            "expand" => Ok(Alignment::Expand),
            _ => Err(Error::InvalidConfig(format!(
                "unknown alignment '{}', expected strict, contract or expand", s))),
        }
    }
}

/// Token spans for every match of `re` in the document text, in text order. Matches that cover
/// no whole token (or, when strict, do not line up with tokens) are skipped.
pub fn regex_matches<'d>(doc: &'d Document, re: &'d Regex, alignment: Alignment)
    -> impl Iterator<Item = Span<'d>> + 'd {
    re.find_iter(doc.text()).filter_map(move |m| {
        let tokens = doc.tokens();
        let (start, end) = match alignment {
            Alignment::Strict => {
                let start = tokens.iter().position(|t| t.idx == m.start())?;
                let last = tokens[start..].iter().position(|t| t.end() == m.end())?;
                (start, start + last + 1)
            }
            Alignment::Contract => (
                tokens.partition_point(|t| t.idx < m.start()),
                tokens.partition_point(|t| t.end() <= m.end()),
            ),
            Alignment::Expand => (
                tokens.partition_point(|t| t.end() <= m.start()),
                tokens.partition_point(|t| t.idx < m.end()),
            ),
        };
        if start < end {
            Some(doc.span(start, end))
        } else {
            None
        }
    })
}
