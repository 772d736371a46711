//! Language models: tokenization, tagging and lemmatization
//!
//! A model is a lexicon plus the rules in `tagger` and `lemmatizer`. One model ships inside the
//! crate (`en_lexicon_sm`); others can be loaded from a directory holding `lexicon.tsv` and
//! `stopwords.txt`. Loaded models are cached for the life of the process.
use std::path::Path;
use std::sync::{Arc, Mutex, OnceLock};

use crate::doc::{Document, Token};
use crate::errors::*;
use crate::farm::{new_farm, FarmMap};
use crate::record::Record;

pub mod lemmatizer;
pub mod lexicon;
pub mod pos;
pub mod tagger;
pub mod tokenizer;

use self::lexicon::Lexicon;
pub use self::pos::Pos;
use self::tokenizer::Piece;

/// The model that ships with the crate
pub const DEFAULT_MODEL: &str = "en_lexicon_sm";

const EN_LEXICON_SM: &str = include_str!("data/en_lexicon_sm/lexicon.tsv");
const EN_STOPWORDS_SM: &str = include_str!("data/en_lexicon_sm/stopwords.txt");

#[derive(Debug)]
pub struct LanguageModel {
    name: String,
    lexicon: Lexicon,
}

impl LanguageModel {
    pub fn new<S: Into<String>>(name: S, lexicon: Lexicon) -> Self {
        LanguageModel { name: name.into(), lexicon }
    }

    /// A model compiled into the crate, if `name` is one
    pub fn builtin(name: &str) -> Option<Result<LanguageModel>> {
        match name {
            DEFAULT_MODEL => Some(Lexicon::parse(EN_LEXICON_SM, EN_STOPWORDS_SM)
                .map(|lex| LanguageModel::new(name, lex))),
            _ => None,
        }
    }

    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<LanguageModel> {
        let dir = dir.as_ref();
        let name = dir.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| dir.display().to_string());
        Ok(LanguageModel::new(name, Lexicon::from_dir(dir)?))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn is_stop(&self, lower: &str) -> bool {
        self.lexicon.is_stop(lower)
    }

    /// Tokenize, mark sentences, tag and lemmatize
    pub fn annotate(&self, text: &str) -> Vec<Token> {
        let pieces = tokenizer::tokenize(text);
        let starts = sentence_starts(&pieces);
        let texts: Vec<&str> = pieces.iter().map(|p| p.text).collect();
        let tags = tagger::tag(&self.lexicon, &texts, &starts);
        pieces.iter()
            .zip(starts)
            .zip(tags)
            .enumerate()
            .map(|(i, ((piece, sent_start), pos))| {
                let lower = piece.text.to_lowercase();
                Token {
                    text: piece.text.to_string(),
                    i,
                    idx: piece.idx,
                    lemma: lemmatizer::lemmatize(&self.lexicon, piece.text, &lower, pos),
                    is_stop: self.lexicon.is_stop(&lower),
                    is_punct: pos == Pos::Punct,
                    is_alpha: piece.text.chars().all(char::is_alphabetic),
                    is_digit: piece.text.chars().all(|c| c.is_ascii_digit()),
                    lower,
                    pos,
                    whitespace: piece.whitespace,
                    sent_start,
                }
            })
            .collect()
    }

    pub fn make_doc(&self, record: Record) -> Document {
        let tokens = self.annotate(&record.text);
        Document::new(record.text, record.meta, tokens, self.name.clone())
    }
}

fn is_terminal(text: &str) -> bool {
    matches!(text, "." | "!" | "?" | "..." | "…")
}

fn is_closer(text: &str) -> bool {
    matches!(text, "\"" | "'" | ")" | "]")
}

/// A sentence starts at the first token, and after terminal punctuation (optionally followed by
/// a closing quote or bracket) or a line break, unless the next word is lowercase.
fn sentence_starts(pieces: &[Piece]) -> Vec<bool> {
    let mut starts = Vec::with_capacity(pieces.len());
    for (i, piece) in pieces.iter().enumerate() {
        if i == 0 {
            starts.push(true);
            continue;
        }
        let prev = pieces[i - 1].text;
        let after_terminal = is_terminal(prev)
            || (is_closer(prev) && i >= 2 && is_terminal(pieces[i - 2].text));
        let boundary = (after_terminal && pieces[i - 1].whitespace) || piece.newline_before;
        let lowercase = piece.text.chars().next().map_or(false, char::is_lowercase);
        starts.push(boundary && !lowercase);
    }
    starts
}

static MODELS: OnceLock<Mutex<FarmMap<String, Arc<LanguageModel>>>> = OnceLock::new();

/// Load a model by name or directory path, reusing it if it was loaded before
pub fn load(id: &str) -> Result<Arc<LanguageModel>> {
    let registry = MODELS.get_or_init(|| Mutex::new(new_farm()));
    let mut models = registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(model) = models.get(id) {
        return Ok(model.clone());
    }
    let model = match LanguageModel::builtin(id) {
        Some(model) => model?,
        None => {
            let dir = Path::new(id);
            if !dir.join("lexicon.tsv").is_file() {
                return Err(Error::ModelUnavailable(id.to_string()));
            }
            LanguageModel::from_dir(dir)?
        }
    };
    info!("Loaded language model '{}' ({} lexicon entries)", model.name(), model.lexicon().len());
    let model = Arc::new(model);
    models.insert(id.to_string(), model.clone());
    Ok(model)
}

/// Annotate a record with the named model
pub fn make_doc(record: Record, model_id: &str) -> Result<Document> {
    Ok(load(model_id)?.make_doc(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Metadata;

    #[test]
    fn builtin_model_is_cached() {
        let a = load(DEFAULT_MODEL).unwrap();
        let b = load(DEFAULT_MODEL).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(a.is_stop("the"));
        assert!(!a.is_stop("workers"));
    }

    #[test]
    fn unknown_model_is_unavailable() {
        match load("xx_no_such_model") {
            Err(Error::ModelUnavailable(name)) => assert_eq!(name, "xx_no_such_model"),
            other => panic!("expected ModelUnavailable, got {:?}", other.map(|m| m.name().to_string())),
        }
    }

    #[test]
    fn loads_a_model_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("lexicon.tsv"), "wage\tNOUN\n").unwrap();
        let model = load(dir.path().to_str().unwrap()).unwrap();
        assert_eq!(model.lexicon().len(), 1);
        assert!(!model.is_stop("the"));
    }

    #[test]
    fn annotates_the_reference_phrase() {
        let model = load(DEFAULT_MODEL).unwrap();
        let tokens = model.annotate("Mr. President, we must protect the skilled American workers.");
        let pos: Vec<&str> = tokens.iter().map(|t| t.pos.as_str()).collect();
        assert_eq!(pos, vec!["PROPN", "PROPN", "PUNCT", "PRON", "AUX", "VERB", "DET", "ADJ", "ADJ",
            "NOUN", "PUNCT"]);
        assert_eq!(tokens[9].lemma, "worker");
        assert_eq!(tokens[8].lemma, "american");
        assert!(tokens[0].sent_start);
        assert!(!tokens[1].sent_start);
    }

    #[test]
    fn marks_sentences() {
        let model = load(DEFAULT_MODEL).unwrap();
        let doc = model.make_doc(Record::new("Jobs matter. Wages matter! the end\nNew line", Metadata::new()));
        let starts: Vec<&str> = doc.tokens().iter().filter(|t| t.sent_start).map(|t| t.text.as_str()).collect();
        assert_eq!(starts, vec!["Jobs", "Wages", "New"]);
    }
}
