//! Token patterns: per-token attribute constraints with repetition operators
//!
//! Two spellings are accepted. JSON, as a list of objects:
//!
//! ```text
//! [{"POS": {"IN": ["ADJ", "DET"]}, "OP": "+"}, {"ORTH": {"REGEX": "workers?"}}]
//! ```
//!
//! and a compact string, one `ATTR:VALUE[:OP]` per token, where VALUE is `A|B` (any of),
//! `!A|B` (none of) or `/regex/`:
//!
//! ```text
//! POS:ADJ|DET:+ ORTH:/workers?/
//! ```
use nom::branch::alt;
use nom::bytes::complete::{is_not, take_while1};
use nom::character::complete::{char, multispace0, multispace1, one_of};
use nom::combinator::{all_consuming, map, opt};
use nom::multi::separated_list1;
use nom::sequence::{delimited, pair, preceded, tuple};
use nom::IResult;
use regex::Regex;
use serde_json::Value;
use std::str::FromStr;

use crate::doc::Token;
use crate::errors::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attr {
    Orth,
    Lower,
    Lemma,
    Pos,
    IsAlpha,
    IsDigit,
    IsPunct,
    IsStop,
    IsTitle,
    IsUpper,
    IsLower,
    IsSentStart,
    Length,
}

impl Attr {
    pub fn from_name(name: &str) -> Result<Attr> {
        Ok(match name.to_uppercase().as_str() {
            "ORTH" | "TEXT" => Attr::Orth,
            "LOWER" => Attr::Lower,
            "LEMMA" => Attr::Lemma,
            "POS" => Attr::Pos,
            "IS_ALPHA" => Attr::IsAlpha,
            "IS_DIGIT" => Attr::IsDigit,
            "IS_PUNCT" => Attr::IsPunct,
            "IS_STOP" => Attr::IsStop,
            "IS_TITLE" => Attr::IsTitle,
            "IS_UPPER" => Attr::IsUpper,
            "IS_LOWER" => Attr::IsLower,
            "IS_SENT_START" => Attr::IsSentStart,
            "LENGTH" => Attr::Length,
            _ => return Err(Error::InvalidPattern(format!("unknown token attribute '{}'", name))),
        })
    }

    fn is_flag(self) -> bool {
        match self {
            Attr::IsAlpha | Attr::IsDigit | Attr::IsPunct | Attr::IsStop | Attr::IsTitle
            | Attr::IsUpper | Attr::IsLower | Attr::IsSentStart => true,
            _ => false,
        }
    }

    fn value<'t>(self, token: &'t Token) -> AttrValue<'t> {
        match self {
            Attr::Orth => AttrValue::Str(&token.text),
            Attr::Lower => AttrValue::Str(&token.lower),
            Attr::Lemma => AttrValue::Str(&token.lemma),
            Attr::Pos => AttrValue::Str(token.pos.as_str()),
            Attr::IsAlpha => AttrValue::Bool(token.is_alpha),
            Attr::IsDigit => AttrValue::Bool(token.is_digit),
            Attr::IsPunct => AttrValue::Bool(token.is_punct),
            Attr::IsStop => AttrValue::Bool(token.is_stop),
            Attr::IsTitle => AttrValue::Bool(token.is_title()),
            Attr::IsUpper => AttrValue::Bool(token.is_upper()),
            Attr::IsLower => AttrValue::Bool(token.is_lower()),
            Attr::IsSentStart => AttrValue::Bool(token.sent_start),
            Attr::Length => AttrValue::Int(token.text.chars().count() as i64),
        }
    }
}

/// A value a token attribute is compared against
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Str(String),
    Bool(bool),
    Int(i64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum AttrValue<'t> {
    Str(&'t str),
    Bool(bool),
    Int(i64),
}

impl Literal {
    fn equals(&self, lit: AttrValue) -> bool {
        match (self, lit) {
            (Literal::Str(a), AttrValue::Str(b)) => a == b,
            (Literal::Bool(a), AttrValue::Bool(b)) => *a == b,
            (Literal::Int(a), AttrValue::Int(b)) => *a == b,
            _ => false,
        }
    }

    /// Read a scalar written as text, typed for the attribute it constrains
    fn parse_for(attr: Attr, raw: &str) -> Result<Literal> {
        if attr.is_flag() {
            match raw.to_lowercase().as_str() {
                "true" | "1" => Ok(Literal::Bool(true)),
                "false" | "0" => Ok(Literal::Bool(false)),
                _ => Err(Error::InvalidPattern(format!("{:?} expects true or false, got '{}'", attr, raw))),
            }
        } else if attr == Attr::Length {
            raw.parse::<i64>()
                .map(Literal::Int)
                .map_err(|_| Error::InvalidPattern(format!("LENGTH expects an integer, got '{}'", raw)))
        } else {
            Ok(Literal::Str(raw.to_string()))
        }
    }

    fn from_json(attr: Attr, value: &Value) -> Result<Literal> {
        match *value {
            Value::String(ref s) => Literal::parse_for(attr, s),
            Value::Bool(b) => Ok(Literal::Bool(b)),
            Value::Number(ref n) => n.as_i64()
                .map(Literal::Int)
                .ok_or_else(|| Error::InvalidPattern(format!("expected an integer, got {}", n))),
            ref other => Err(Error::InvalidPattern(format!("expected a scalar, got {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmp {
    Eq,
    Ne,
    Ge,
    Le,
    Gt,
    Lt,
}

impl Cmp {
    fn from_symbol(sym: &str) -> Option<Cmp> {
        Some(match sym {
            "==" => Cmp::Eq,
            "!=" => Cmp::Ne,
            ">=" => Cmp::Ge,
            "<=" => Cmp::Le,
            ">" => Cmp::Gt,
            "<" => Cmp::Lt,
            _ => return None,
        })
    }

    fn holds(self, a: i64, b: i64) -> bool {
        match self {
            Cmp::Eq => a == b,
            Cmp::Ne => a != b,
            Cmp::Ge => a >= b,
            Cmp::Le => a <= b,
            Cmp::Gt => a > b,
            Cmp::Lt => a < b,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Predicate {
    Equals(Literal),
    In(Vec<Literal>),
    NotIn(Vec<Literal>),
    Regex(Regex),
    Compare(Cmp, i64),
}

#[derive(Debug, Clone)]
pub struct Constraint {
    pub attr: Attr,
    pub predicate: Predicate,
}

impl Constraint {
    pub fn holds(&self, token: &Token) -> bool {
        let lit = self.attr.value(token);
        match self.predicate {
            Predicate::Equals(ref v) => v.equals(lit),
            Predicate::In(ref vs) => vs.iter().any(|v| v.equals(lit)),
            Predicate::NotIn(ref vs) => !vs.iter().any(|v| v.equals(lit)),
            Predicate::Regex(ref re) => match lit {
                AttrValue::Str(s) => re.is_match(s),
                AttrValue::Bool(b) => re.is_match(&b.to_string()),
                AttrValue::Int(i) => re.is_match(&i.to_string()),
            },
            Predicate::Compare(cmp, n) => match lit {
                AttrValue::Int(i) => cmp.holds(i, n),
                _ => false,
            },
        }
    }
}

/// How many tokens one token spec may consume
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    /// `1`: exactly one
    One,
    /// `?`: zero or one
    Optional,
    /// `+`
    OneOrMore,
    /// `*`
    ZeroOrMore,
    /// `!`: exactly one token that does not satisfy the constraints
    Not,
}

impl Quantifier {
    fn from_symbol(sym: &str) -> Result<Quantifier> {
        Ok(match sym {
            "1" => Quantifier::One,
            "?" => Quantifier::Optional,
            "+" => Quantifier::OneOrMore,
            "*" => Quantifier::ZeroOrMore,
            "!" => Quantifier::Not,
            _ => return Err(Error::InvalidPattern(format!("unknown operator '{}'", sym))),
        })
    }
}

#[derive(Debug, Clone)]
pub struct TokenSpec {
    pub constraints: Vec<Constraint>,
    pub op: Quantifier,
}

impl TokenSpec {
    /// All constraints hold (an empty token spec matches any token)
    pub fn satisfied_by(&self, token: &Token) -> bool {
        self.constraints.iter().all(|c| c.holds(token))
    }
}

#[derive(Debug, Clone)]
pub struct TokenPattern {
    pub specs: Vec<TokenSpec>,
}

impl TokenPattern {
    pub fn new(specs: Vec<TokenSpec>) -> Result<TokenPattern> {
        if specs.is_empty() {
            return Err(Error::InvalidPattern("a pattern needs at least one token".to_string()));
        }
        Ok(TokenPattern { specs })
    }

    pub fn from_json_str(text: &str) -> Result<TokenPattern> {
        let value: Value = serde_json::from_str(text)
            .map_err(|err| Error::InvalidPattern(format!("not valid JSON: {}", err)))?;
        TokenPattern::from_json(&value)
    }

    pub fn from_json(value: &Value) -> Result<TokenPattern> {
        let items = value.as_array()
            .ok_or_else(|| Error::InvalidPattern("expected a list of token objects".to_string()))?;
        let mut specs = vec![];
        for item in items {
            let object = item.as_object()
                .ok_or_else(|| Error::InvalidPattern(format!("expected a token object, got {}", item)))?;
            let mut spec = TokenSpec { constraints: vec![], op: Quantifier::One };
            for (key, value) in object {
                if key == "OP" {
                    let sym = value.as_str()
                        .ok_or_else(|| Error::InvalidPattern("OP must be a string".to_string()))?;
                    spec.op = Quantifier::from_symbol(sym)?;
                    continue;
                }
                let attr = Attr::from_name(key)?;
                for predicate in predicates_from_json(attr, value)? {
                    spec.constraints.push(Constraint { attr, predicate });
                }
            }
            specs.push(spec);
        }
        TokenPattern::new(specs)
    }

    /// Parse the compact `ATTR:VALUE[:OP]` form
    pub fn parse_compact(text: &str) -> Result<TokenPattern> {
        let (_, raw) = compact_pattern(text)
            .map_err(|err| Error::InvalidPattern(format!("cannot parse '{}': {:?}", text, err)))?;
        let mut specs = vec![];
        for (attr_name, value, op) in raw {
            let attr = Attr::from_name(attr_name)?;
            let predicate = match value {
                RawValue::Regex(re) => Predicate::Regex(Regex::new(re)?),
                RawValue::List(negated, items) => {
                    if !negated && items.len() == 1 {
                        compact_scalar(attr, items[0])?
                    } else {
                        let values = items.iter()
                            .map(|i| Literal::parse_for(attr, i))
                            .collect::<Result<Vec<_>>>()?;
                        if negated { Predicate::NotIn(values) } else { Predicate::In(values) }
                    }
                }
            };
            let op = match op {
                Some(sym) => Quantifier::from_symbol(&sym.to_string())?,
                None => Quantifier::One,
            };
            specs.push(TokenSpec { constraints: vec![Constraint { attr, predicate }], op });
        }
        TokenPattern::new(specs)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

/// JSON when it looks like a list, the compact form otherwise
impl FromStr for TokenPattern {
    type Err = Error;

    fn from_str(s: &str) -> Result<TokenPattern> {
        if s.trim_start().starts_with('[') {
            TokenPattern::from_json_str(s)
        } else {
            TokenPattern::parse_compact(s)
        }
    }
}

fn predicates_from_json(attr: Attr, value: &Value) -> Result<Vec<Predicate>> {
    let object = match value.as_object() {
        Some(object) => object,
        None => return Ok(vec![Predicate::Equals(Literal::from_json(attr, value)?)]),
    };
    let list = |v: &Value| -> Result<Vec<Literal>> {
        v.as_array()
            .ok_or_else(|| Error::InvalidPattern(format!("expected a list, got {}", v)))?
            .iter()
            .map(|item| Literal::from_json(attr, item))
            .collect()
    };
    let mut out = vec![];
    for (key, v) in object {
        let predicate = match key.as_str() {
            "IN" => Predicate::In(list(v)?),
            "NOT_IN" => Predicate::NotIn(list(v)?),
            "REGEX" => {
                let re = v.as_str()
                    .ok_or_else(|| Error::InvalidPattern("REGEX must be a string".to_string()))?;
                Predicate::Regex(Regex::new(re)?)
            }
            sym => {
                let cmp = Cmp::from_symbol(sym)
                    .ok_or_else(|| Error::InvalidPattern(format!("unknown predicate '{}'", sym)))?;
                let n = v.as_i64()
                    .ok_or_else(|| Error::InvalidPattern(format!("'{}' needs an integer", sym)))?;
                Predicate::Compare(cmp, n)
            }
        };
        out.push(predicate);
    }
    Ok(out)
}

/// A single compact value, which may carry a comparison prefix for LENGTH (`LENGTH:>=4`)
fn compact_scalar(attr: Attr, raw: &str) -> Result<Predicate> {
    if attr == Attr::Length {
        for sym in &["==", "!=", ">=", "<=", ">", "<"] {
            if let Some(rest) = raw.strip_prefix(sym) {
                let n = rest.parse::<i64>()
                    .map_err(|_| Error::InvalidPattern(format!("LENGTH expects an integer, got '{}'", rest)))?;
                return Ok(Predicate::Compare(Cmp::from_symbol(sym).unwrap_or(Cmp::Eq), n));
            }
        }
    }
    Ok(Predicate::Equals(Literal::parse_for(attr, raw)?))
}

//
// Compact form grammar
//
#[derive(Debug, PartialEq)]
enum RawValue<'a> {
    Regex(&'a str),
    List(bool, Vec<&'a str>),
}

fn attr_name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphabetic() || c == '_')(input)
}

fn regex_value(input: &str) -> IResult<&str, RawValue> {
    map(delimited(char('/'), is_not("/"), char('/')), RawValue::Regex)(input)
}

fn item(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace() && c != ':' && c != '|' && c != '/')(input)
}

fn list_value(input: &str) -> IResult<&str, RawValue> {
    map(pair(opt(char('!')), separated_list1(char('|'), item)),
        |(neg, items)| RawValue::List(neg.is_some(), items))(input)
}

fn token_spec(input: &str) -> IResult<&str, (&str, RawValue, Option<char>)> {
    map(
        tuple((attr_name, char(':'), alt((regex_value, list_value)), opt(preceded(char(':'), one_of("!?+*1"))))),
        |(attr, _, value, op)| (attr, value, op),
    )(input)
}

fn compact_pattern(input: &str) -> IResult<&str, Vec<(&str, RawValue, Option<char>)>> {
    all_consuming(delimited(multispace0, separated_list1(multispace1, token_spec), multispace0))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORKERS_JSON: &str =
        r#"[{"POS": {"IN": ["ADJ", "DET"]}, "OP": "+"}, {"ORTH": {"REGEX": "workers?"}}]"#;

    #[test]
    fn parses_json_patterns() {
        let pattern: TokenPattern = WORKERS_JSON.parse().unwrap();
        assert_eq!(pattern.len(), 2);
        assert_eq!(pattern.specs[0].op, Quantifier::OneOrMore);
        assert_eq!(pattern.specs[0].constraints[0].attr, Attr::Pos);
        assert_eq!(pattern.specs[1].op, Quantifier::One);
        match pattern.specs[1].constraints[0].predicate {
            Predicate::Regex(ref re) => assert_eq!(re.as_str(), "workers?"),
            ref other => panic!("expected regex, got {:?}", other),
        }
    }

    #[test]
    fn parses_compact_patterns() {
        let pattern: TokenPattern = "POS:ADJ|DET:+ ORTH:/workers?/".parse().unwrap();
        assert_eq!(pattern.len(), 2);
        assert_eq!(pattern.specs[0].op, Quantifier::OneOrMore);
        match pattern.specs[0].constraints[0].predicate {
            Predicate::In(ref vs) => assert_eq!(vs, &vec![Literal::Str("ADJ".into()), Literal::Str("DET".into())]),
            ref other => panic!("expected IN, got {:?}", other),
        }
        let negated: TokenPattern = " IS_STOP:false:* POS:!PUNCT|SYM LENGTH:>=4:? ".parse().unwrap();
        assert_eq!(negated.specs[0].op, Quantifier::ZeroOrMore);
        assert!(matches!(negated.specs[1].constraints[0].predicate, Predicate::NotIn(_)));
        assert!(matches!(negated.specs[2].constraints[0].predicate, Predicate::Compare(Cmp::Ge, 4)));
    }

    #[test]
    fn rejects_malformed_patterns() {
        for bad in &["", "POS", "POS:ADJ:%", "COLOR:red", "LENGTH:long", "[]", "[{\"POS\": [1]}]",
            r#"[{"ORTH": "x", "OP": "++"}]"#] {
            assert!(bad.parse::<TokenPattern>().is_err(), "accepted {:?}", bad);
        }
    }
}
