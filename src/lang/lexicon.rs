//! Word lists backing a language model: tags and lemmas per word form, plus stop words
use std::fs;
use std::io;
use std::path::Path;

use crate::errors::*;
use crate::farm::{new_farm, FarmMap, FarmSet};
use crate::lang::pos::Pos;

/// What the lexicon knows about one lowercase word form
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// Possible tags, most likely first
    pub tags: Vec<Pos>,
    pub lemma: Option<String>,
}

impl Entry {
    pub fn has(&self, pos: Pos) -> bool {
        self.tags.contains(&pos)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    entries: FarmMap<String, Entry>,
    stop_words: FarmSet<String>,
}

impl Lexicon {
    /// Parse `word<TAB>TAG[|TAG..][<TAB>lemma]` lines and one-per-line stop words.
    ///
    /// `#` starts a comment line. A word listed twice gets the union of its tags.
    pub fn parse(lexicon: &str, stop_words: &str) -> Result<Lexicon> {
        let mut entries: FarmMap<String, Entry> = new_farm();
        for (line_no, line) in lexicon.lines().enumerate() {
            let line = line.trim_end();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut fields = line.split('\t');
            let word = fields.next().unwrap_or("").trim().to_lowercase();
            let tags = fields.next()
                .ok_or_else(|| Error::Other(format!("lexicon line {}: no tags for '{}'", line_no + 1, word)))?
                .split('|')
                .map(|t| t.parse::<Pos>())
                .collect::<Result<Vec<Pos>>>()?;
            let lemma = fields.next().map(str::trim).filter(|l| !l.is_empty()).map(String::from);
            if word.is_empty() || tags.is_empty() {
                return Err(Error::Other(format!("lexicon line {}: malformed entry", line_no + 1)));
            }
            let entry = entries.entry(word).or_insert_with(|| Entry { tags: vec![], lemma: None });
            for tag in tags {
                if !entry.tags.contains(&tag) {
                    entry.tags.push(tag);
                }
            }
            if entry.lemma.is_none() {
                entry.lemma = lemma;
            }
        }
        let stop_words = stop_words
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(str::to_lowercase)
            .collect();
        Ok(Lexicon { entries, stop_words })
    }

    /// Read `lexicon.tsv` (required) and `stopwords.txt` (optional) from a model directory
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Lexicon> {
        let dir = dir.as_ref();
        let lexicon = fs::read_to_string(dir.join("lexicon.tsv"))
            .map_err(|err| Error::MissingFile("model lexicon", Some(err)))?;
        let stop_words = match fs::read_to_string(dir.join("stopwords.txt")) {
            Ok(text) => text,
            Err(ref err) if err.kind() == io::ErrorKind::NotFound => String::new(),
            Err(err) => return Err(err.into()),
        };
        Lexicon::parse(&lexicon, &stop_words)
    }

    pub fn get(&self, lower: &str) -> Option<&Entry> {
        self.entries.get(lower)
    }

    /// True when `lower` is listed and may carry `pos`
    pub fn allows(&self, lower: &str, pos: Pos) -> bool {
        self.get(lower).map_or(false, |e| e.has(pos))
    }

    pub fn is_stop(&self, lower: &str) -> bool {
        self.stop_words.contains(lower)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
