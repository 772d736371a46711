//! Explore how the U.S. Congress has spoken about workers
//!
//! Walks through one analysis session over the Capitol Words dataset, printing each stage:
//! keywords in context for a single speech, preprocessing, annotation and pattern matching on it,
//! then the same patterns and key terms aggregated over a corpus of speeches.
//!

// argument parsing
#[macro_use] extern crate clap;
// logging
#[macro_use] extern crate log;

use regex::Regex;

use rollcall::config::{common_args, AnalysisConfig};
use rollcall::counter::Counter;
use rollcall::dataset::RecordFilter;
use rollcall::errors::*;
use rollcall::extract::{keyterms, keyword_in_context, token_matches};
use rollcall::record::MetaValue;

pub fn main() {
    // Main can't return a Result, and the ? operator needs the enclosing function to return Result
    inner_main().expect("Could not recover. Exiting.");
}

pub fn inner_main() -> Result<()> {
    env_logger::init();
    let args = app_from_crate!()
        .args(&common_args())
        .arg_from_usage("--keyword [REGEX] 'keyword to show in context (default: work(ing|ers?))'")
        .arg_from_usage("--window [CHARS] 'context characters on each side (default: 35)'")
        .arg_from_usage("--pattern [PATTERN] 'token pattern, JSON or ATTR:VALUE[:OP] form'")
        .arg_from_usage("--doc-regex [REGEX] 'only aggregate key terms of speeches matching this'")
        .arg_from_usage("--top [N] 'rows to print from each ranking (default: 20)'")
        .get_matches();
    let config = AnalysisConfig::from_matches(&args)?;

    // The dataset
    let dataset = config.dataset();
    println!("{:#}", serde_json::to_value(dataset.info())?);
    dataset.download(false)?;

    // One speech, raw
    let record = match dataset.records(&RecordFilter::default().limit(1))?.next() {
        Some(record) => record?,
        None => return Err(Error::Other("the dataset has no records".to_string())),
    };
    println!("{}", serde_json::to_string_pretty(&record)?);
    for kwic in keyword_in_context(&record.text, &config.keyword, config.kwic_options())? {
        println!("{:?}", (kwic.pre, kwic.keyword, kwic.post));
    }

    // Cleaned up and annotated
    let pipeline = config.pipeline()?;
    let record = record.preprocess(&pipeline);
    println!("{}", record.text.chars().take(200).collect::<String>());
    let doc = rollcall::make_doc(record, &config.model)?;
    println!("{}", doc.preview());
    println!("{:?}", doc.meta());

    let pattern = config.token_pattern()?;
    let matches: Vec<_> = token_matches(&doc, &pattern).collect();
    println!("{:?}", matches);

    // Many speeches
    let corpus = config.load_corpus(false)?;
    println!("{}", corpus);
    let dates = (corpus.agg_metadata("date", |d| d.min().cloned()),
        corpus.agg_metadata("date", |d| d.max().cloned()));
    println!("{:?}", dates);
    let speakers: Counter<MetaValue> = corpus.agg_metadata("speaker_name", |names| names.cloned().collect());
    println!("{:?}", speakers);

    println!("{:?}", corpus.match_counts(&pattern).most_common(Some(config.top)));

    if corpus.is_empty() {
        warn!("No speeches loaded, nothing to rank");
        return Ok(());
    }
    println!("{:?}", keyterms(&corpus[0], &config.keyterms)?);

    let doc_regex = Regex::new(&config.doc_regex)?;
    let weights = corpus.keyterm_weights(&doc_regex, &config.keyterms)?;
    println!("{:?}", weights.most_common(Some(config.top)));
    Ok(())
}
