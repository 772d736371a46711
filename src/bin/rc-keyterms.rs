//! Aggregate key terms over speeches mentioning a regex
//!
//! Ranks the key terms of every speech that matches `--doc-regex` and sums their scores, so
//! the top of the list is what those speeches are mostly about.
//!

// argument parsing
#[macro_use] extern crate clap;

use regex::Regex;

use rollcall::config::{common_args, AnalysisConfig};
use rollcall::errors::*;

pub fn main() {
    // Main can't return a Result, and the ? operator needs the enclosing function to return Result
    inner_main().expect("Could not recover. Exiting.");
}

pub fn inner_main() -> Result<()> {
    env_logger::init();
    let args = app_from_crate!()
        .args(&common_args())
        .arg_from_usage("--doc-regex [REGEX] 'only speeches matching this (default: workers?)'")
        .arg_from_usage("--algorithm [NAME] 'textrank, singlerank or positionrank'")
        .arg_from_usage("--normalize [FORM] 'orth, lower or lemma (default: lemma)'")
        .arg_from_usage("--window-size [N] 'co-occurrence window (default: 10)'")
        .arg_from_usage("--edge-weighting [W] 'binary or count (default: count)'")
        .arg_from_usage("--topn [N] 'key terms per speech, a count or a fraction (default: 10)'")
        .arg_from_usage("--top [N] 'aggregated terms to print (default: 20)'")
        .get_matches();
    let config = AnalysisConfig::from_matches(&args)?;
    let doc_regex = Regex::new(&config.doc_regex)?;
    let corpus = config.load_corpus(args.is_present("download"))?;

    let weights = corpus.keyterm_weights(&doc_regex, &config.keyterms)?;
    for (term, weight) in weights.most_common(Some(config.top)) {
        println!("{:.4}\t{}", weight, term);
    }
    Ok(())
}
