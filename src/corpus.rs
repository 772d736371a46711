//! A collection of annotated documents sharing one language model
use regex::Regex;
use std::fmt;
use std::ops::Index;
use std::slice;
use std::sync::Arc;

use crate::counter::Counter;
use crate::doc::{Document, Normalize};
use crate::errors::*;
use crate::extract::{keyterms, regex_matches, token_matches, Alignment, KeytermParams, TokenPattern};
use crate::lang::{self, LanguageModel};
use crate::record::{MetaValue, Record};

/// Log progress every this many documents
const PROGRESS_EVERY: usize = 100;

pub struct Corpus {
    model: Arc<LanguageModel>,
    docs: Vec<Document>,
    n_tokens: usize,
    n_sents: usize,
}

impl Corpus {
    /// An empty corpus using the named model
    pub fn new(model_id: &str) -> Result<Corpus> {
        Ok(Corpus::with_model(lang::load(model_id)?))
    }

    pub fn with_model(model: Arc<LanguageModel>) -> Corpus {
        Corpus { model, docs: vec![], n_tokens: 0, n_sents: 0 }
    }

    /// Annotate every record, stopping at the first error
    pub fn from_records<I>(model_id: &str, records: I) -> Result<Corpus>
        where I: IntoIterator<Item = Result<Record>> {
        let mut corpus = Corpus::new(model_id)?;
        corpus.add_records(records)?;
        Ok(corpus)
    }

    pub fn add_records<I>(&mut self, records: I) -> Result<()>
        where I: IntoIterator<Item = Result<Record>> {
        for record in records {
            self.add_record(record?);
        }
        info!("{}", self);
        Ok(())
    }

    pub fn add_record(&mut self, record: Record) {
        let doc = self.model.make_doc(record);
        self.add_doc(doc);
    }

    pub fn add_doc(&mut self, doc: Document) {
        if doc.model_name() != self.model.name() {
            warn!("Adding a document annotated by '{}' to a '{}' corpus", doc.model_name(), self.model.name());
        }
        self.n_tokens += doc.len();
        self.n_sents += doc.n_sents();
        self.docs.push(doc);
        if self.docs.len() % PROGRESS_EVERY == 0 {
            info!("Annotated {} documents ({} tokens)", self.docs.len(), self.n_tokens);
        }
    }

    pub fn model(&self) -> &LanguageModel {
        &self.model
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn n_tokens(&self) -> usize {
        self.n_tokens
    }

    pub fn n_sents(&self) -> usize {
        self.n_sents
    }

    pub fn iter(&self) -> slice::Iter<Document> {
        self.docs.iter()
    }

    /// Documents satisfying `pred`, in corpus order, at most `limit` of them
    pub fn get<'a, F>(&'a self, pred: F, limit: Option<usize>) -> impl Iterator<Item = &'a Document> + 'a
        where F: Fn(&Document) -> bool + 'a {
        self.docs.iter()
            .filter(move |doc| pred(*doc))
            .take(limit.unwrap_or(usize::MAX))
    }

    /// Hand every value of one metadata field to `agg`: `min`, `max`, a `Counter`, and so on.
    /// Documents without the field are skipped.
    pub fn agg_metadata<'a, F, T>(&'a self, field: &str, agg: F) -> T
        where F: FnOnce(&mut dyn Iterator<Item = &'a MetaValue>) -> T {
        let mut values = self.docs.iter().filter_map(|doc| doc.get_meta(field));
        agg(&mut values)
    }

    /// How often each word occurs across the corpus, skipping punctuation
    pub fn word_counts(&self, normalize: Normalize) -> Counter<String> {
        let mut counts = Counter::new();
        for token in self.docs.iter().flat_map(|d| d.tokens()).filter(|t| !t.is_punct) {
            counts.increment(token.norm(normalize).to_string());
        }
        counts
    }

    /// Tally the lemmatized text of every pattern match in the corpus
    pub fn match_counts(&self, pattern: &TokenPattern) -> Counter<String> {
        self.docs.iter()
            .flat_map(|doc| token_matches(doc, pattern))
            .map(|span| span.lemma())
            .collect()
    }

    /// Sum each key term's score over the documents where `re` matches on token boundaries
    pub fn keyterm_weights(&self, re: &Regex, params: &KeytermParams) -> Result<Counter<String, f64>> {
        let mut weights = Counter::new();
        let mut n_docs = 0;
        for doc in self.get(|doc| regex_matches(doc, re, Alignment::Strict).next().is_some(), None) {
            weights.update(keyterms(doc, params)?);
            n_docs += 1;
        }
        info!("Aggregated key terms over {} of {} documents", n_docs, self.docs.len());
        Ok(weights)
    }
}

impl Index<usize> for Corpus {
    type Output = Document;

    fn index(&self, i: usize) -> &Document {
        &self.docs[i]
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a Document;
    type IntoIter = slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.docs.iter()
    }
}

impl fmt::Display for Corpus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Corpus({} docs, {} tokens)", self.docs.len(), self.n_tokens)
    }
}

impl fmt::Debug for Corpus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Corpus({} docs, {} tokens, model {})", self.docs.len(), self.n_tokens, self.model.name())
    }
}
