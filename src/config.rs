//! Settings for an analysis run, read from an optional JSON file and overridden by flags
use clap::{Arg, ArgMatches};
use serde::{Deserialize, Deserializer};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::corpus::Corpus;
use crate::dataset::{Dataset, RecordFilter};
use crate::errors::*;
use crate::doc::Normalize;
use crate::extract::{KeytermParams, KwicOptions, TokenPattern, TopN};
use crate::extract::keyterms::Algorithm;
use crate::graph::EdgeWeighting;
use crate::lang::{Pos, DEFAULT_MODEL};
use crate::preprocess::Pipeline;
use crate::record::Record;

/// Adjectives and determiners right before "worker" or "workers"
pub const WORKER_PATTERN: &str =
    r#"[{"POS": {"IN": ["ADJ", "DET"]}, "OP": "+"}, {"ORTH": {"REGEX": "workers?"}}]"#;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub data_dir: PathBuf,
    pub model: String,
    /// Records to load
    pub limit: usize,
    /// Which records to load, besides `limit`
    pub filter: RecordFilter,
    /// Keyword regex for keyword-in-context
    pub keyword: String,
    pub kwic_window: usize,
    /// Preprocessing step names, in order
    pub preprocess: Vec<String>,
    /// Token pattern, as JSON or in the compact form
    pub pattern: String,
    /// Documents must match this regex to have their key terms aggregated
    pub doc_regex: String,
    /// Fields given in a file override the session's TextRank settings
    #[serde(deserialize_with = "merge_keyterms")]
    pub keyterms: KeytermParams,
    /// Rows to print from each ranking
    pub top: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            data_dir: PathBuf::from("data"),
            model: DEFAULT_MODEL.to_string(),
            limit: 500,
            filter: RecordFilter::default(),
            keyword: "work(ing|ers?)".to_string(),
            kwic_window: 35,
            preprocess: vec!["unicode".into(), "quotation_marks".into(), "whitespace".into()],
            pattern: WORKER_PATTERN.to_string(),
            doc_regex: "workers?".to_string(),
            keyterms: session_keyterms(),
            top: 20,
        }
    }
}

/// TextRank over a wider window, counting repeated co-occurrences
fn session_keyterms() -> KeytermParams {
    KeytermParams::new(Algorithm::TextRank)
        .window_size(10)
        .edge_weighting(EdgeWeighting::Count)
}

/// Switch algorithms, taking the new algorithm's window and weighting
fn with_algorithm(previous: KeytermParams, algorithm: Algorithm) -> KeytermParams {
    KeytermParams::new(algorithm)
        .normalize(previous.normalize)
        .include_pos(previous.include_pos)
        .topn(previous.topn)
}

/// A `keyterms` block as written in a settings file
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct KeytermOverrides {
    algorithm: Option<Algorithm>,
    normalize: Option<Normalize>,
    window_size: Option<usize>,
    edge_weighting: Option<EdgeWeighting>,
    include_pos: Option<Vec<Pos>>,
    topn: Option<TopN>,
}

fn merge_keyterms<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<KeytermParams, D::Error> {
    let overrides = KeytermOverrides::deserialize(deserializer)?;
    let mut params = session_keyterms();
    if let Some(algorithm) = overrides.algorithm {
        params = with_algorithm(params, algorithm);
    }
    if let Some(normalize) = overrides.normalize {
        params.normalize = normalize;
    }
    if let Some(window) = overrides.window_size {
        params.window_size = window;
    }
    if let Some(weighting) = overrides.edge_weighting {
        params.edge_weighting = weighting;
    }
    if let Some(include_pos) = overrides.include_pos {
        params.include_pos = include_pos;
    }
    if let Some(topn) = overrides.topn {
        params.topn = topn;
    }
    Ok(params)
}

/// Flags every binary accepts
pub fn common_args<'a, 'b>() -> Vec<Arg<'a, 'b>> {
    vec![
        Arg::from_usage("--config [FILE] 'JSON file of settings; flags override it'"),
        Arg::from_usage("--data-dir [DIR] 'where the dataset is cached (default: data)'"),
        Arg::from_usage("--model [MODEL] 'language model name or directory (default: en_lexicon_sm)'"),
        Arg::from_usage("--limit [N] 'number of records to load (default: 500)'"),
        Arg::from_usage("--download 'fetch the dataset first if it is not cached'"),
    ]
}

fn parsed<T: FromStr>(matches: &ArgMatches, name: &str) -> Result<Option<T>> {
    match matches.value_of(name) {
        None => Ok(None),
        Some(raw) => raw.parse::<T>()
            .map(Some)
            .map_err(|_| Error::InvalidConfig(format!("bad value for --{}: '{}'", name, raw))),
    }
}

impl AnalysisConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<AnalysisConfig> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| Error::MissingFile("configuration file", Some(err)))?;
        let config: AnalysisConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Start from `--config` (or the defaults) and apply whichever flags were given.
    /// Flags a binary doesn't define are simply absent.
    pub fn from_matches(matches: &ArgMatches) -> Result<AnalysisConfig> {
        let mut config = match matches.value_of("config") {
            Some(path) => AnalysisConfig::from_json_file(path)?,
            None => AnalysisConfig::default(),
        };
        if let Some(dir) = matches.value_of("data-dir") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(model) = matches.value_of("model") {
            config.model = model.to_string();
        }
        if let Some(limit) = parsed(matches, "limit")? {
            config.limit = limit;
        }
        if let Some(keyword) = matches.value_of("keyword") {
            config.keyword = keyword.to_string();
        }
        if let Some(window) = parsed(matches, "window")? {
            config.kwic_window = window;
        }
        if let Some(pattern) = matches.value_of("pattern") {
            config.pattern = pattern.to_string();
        }
        if let Some(doc_regex) = matches.value_of("doc-regex") {
            config.doc_regex = doc_regex.to_string();
        }
        if let Some(algorithm) = parsed::<Algorithm>(matches, "algorithm")? {
            config.keyterms = with_algorithm(config.keyterms, algorithm);
        }
        if let Some(normalize) = parsed(matches, "normalize")? {
            config.keyterms.normalize = normalize;
        }
        if let Some(window) = parsed(matches, "window-size")? {
            config.keyterms.window_size = window;
        }
        if let Some(weighting) = parsed(matches, "edge-weighting")? {
            config.keyterms.edge_weighting = weighting;
        }
        if let Some(topn) = parsed(matches, "topn")? {
            config.keyterms.topn = topn;
        }
        if let Some(top) = parsed(matches, "top")? {
            config.top = top;
        }
        config.validate()?;
        Ok(config)
    }

    /// Check every setting that can be checked before touching the dataset
    pub fn validate(&self) -> Result<()> {
        self.pipeline()?;
        self.token_pattern()?;
        self.record_filter().validated()?;
        self.keyterms.validate()?;
        regex::Regex::new(&self.doc_regex)?;
        regex::Regex::new(&self.keyword)?;
        Ok(())
    }

    pub fn dataset(&self) -> Dataset {
        Dataset::capitol_words(&self.data_dir)
    }

    /// The configured filter with the configured limit
    pub fn record_filter(&self) -> RecordFilter {
        self.filter.clone().limit(self.limit)
    }

    pub fn pipeline(&self) -> Result<Pipeline> {
        Pipeline::from_names(self.preprocess.as_slice())
    }

    pub fn token_pattern(&self) -> Result<TokenPattern> {
        self.pattern.parse()
    }

    pub fn kwic_options(&self) -> KwicOptions {
        KwicOptions::default().window_width(self.kwic_window)
    }

    /// Preprocessed records from the cached dataset, fetching it first when `download` is set
    pub fn records(&self, download: bool) -> Result<impl Iterator<Item = Result<Record>>> {
        let dataset = self.dataset();
        if download {
            dataset.download(false)?;
        }
        let pipeline = self.pipeline()?;
        let records = dataset.records(&self.record_filter())?;
        Ok(records.map(move |rec| rec.map(|r| r.preprocess(&pipeline))))
    }

    pub fn load_corpus(&self, download: bool) -> Result<Corpus> {
        Corpus::from_records(&self.model, self.records(download)?)
    }
}
