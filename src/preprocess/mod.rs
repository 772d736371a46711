//! Text preprocessing
//!
//! Every step is a pure `&str -> String` function. Steps are destructive: none of them can be
//! undone from their output, so keep the raw text around if you need it later.
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

use crate::errors::*;

pub mod normalize;
pub mod remove;
pub mod replace;

/// A boxed preprocessing step
pub type StepFn = Box<dyn Fn(&str) -> String + Send + Sync>;

struct Step {
    name: String,
    func: StepFn,
}

/// An ordered chain of preprocessing steps
#[derive(Default)]
pub struct Pipeline {
    steps: Vec<Step>,
}

impl Pipeline {
    pub fn new() -> Self {
        Pipeline { steps: vec![] }
    }

    /// Append a step; steps run in the order they were added
    pub fn then<S, F>(mut self, name: S, func: F) -> Self
        where S: Into<String>, F: Fn(&str) -> String + Send + Sync + 'static {
        self.steps.push(Step {
            name: name.into(),
            func: Box::new(func),
        });
        self
    }

    /// Build a pipeline from step names such as `unicode`, `quotation_marks`, `whitespace`
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        let mut pipeline = Pipeline::new();
        for name in names {
            let name = name.as_ref();
            let func = step_by_name(name)
                .ok_or_else(|| Error::InvalidConfig(format!(
                    "unknown preprocessing step '{}', expected one of {:?}", name, STEP_NAMES)))?;
            pipeline.steps.push(Step { name: name.to_string(), func });
        }
        Ok(pipeline)
    }

    pub fn apply(&self, text: &str) -> String {
        let mut out = text.to_string();
        for step in &self.steps {
            out = (step.func)(&out);
        }
        out
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Pipeline({:?})", self.step_names())
    }
}

pub const STEP_NAMES: &[&str] = &[
    "unicode", "quotation_marks", "whitespace", "hyphenated_words", "bullet_points",
    "accents", "punctuation", "brackets",
    "urls", "emails", "numbers", "currency_symbols", "hashtags", "user_handles",
];

fn step_by_name(name: &str) -> Option<StepFn> {
    let func: StepFn = match name {
        "unicode" => Box::new(|t: &str| normalize::unicode(t, normalize::Form::Nfc)),
        "quotation_marks" => Box::new(normalize::quotation_marks),
        "whitespace" => Box::new(normalize::whitespace),
        "hyphenated_words" => Box::new(normalize::hyphenated_words),
        "bullet_points" => Box::new(normalize::bullet_points),
        "accents" => Box::new(remove::accents),
        "punctuation" => Box::new(remove::punctuation),
        "brackets" => Box::new(remove::brackets),
        "urls" => Box::new(|t: &str| replace::urls(t, "_URL_")),
        "emails" => Box::new(|t: &str| replace::emails(t, "_EMAIL_")),
        "numbers" => Box::new(|t: &str| replace::numbers(t, "_NUMBER_")),
        "currency_symbols" => Box::new(|t: &str| replace::currency_symbols(t, "_CUR_")),
        "hashtags" => Box::new(|t: &str| replace::hashtags(t, "_TAG_")),
        "user_handles" => Box::new(|t: &str| replace::user_handles(t, "_USER_")),
        _ => return None,
    };
    Some(func)
}

/// Compile a constant pattern once
pub(crate) fn cached(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("constant regex must compile"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_run_in_order() {
        let pipeline = Pipeline::new()
            .then("upper", |t: &str| t.to_uppercase())
            .then("exclaim", |t: &str| format!("{}!", t));
        assert_eq!(pipeline.apply("workers"), "WORKERS!");
        assert_eq!(pipeline.step_names(), vec!["upper", "exclaim"]);
    }

    #[test]
    fn named_pipeline_cleans_quotes_and_spacing() {
        let pipeline = Pipeline::from_names(&["unicode", "quotation_marks", "whitespace"]).unwrap();
        let raw = "  \u{201C}American workers\u{201D}   deserve\u{00A0}a raise.\r\n\r\n\nThank you. ";
        assert_eq!(pipeline.apply(raw), "\"American workers\" deserve a raise.\nThank you.");
    }

    #[test]
    fn unknown_step_is_a_config_error() {
        match Pipeline::from_names(&["whitespace", "stemming"]) {
            Err(Error::InvalidConfig(msg)) => assert!(msg.contains("stemming")),
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn every_listed_step_resolves() {
        for name in STEP_NAMES {
            assert!(step_by_name(name).is_some(), "{}", name);
        }
    }
}
