//! Count lemmatized token pattern matches across speeches
//!
//! The default pattern finds runs of adjectives and determiners right before "worker(s)",
//! so the output reads like a list of the ways workers are described.
//!

// argument parsing
#[macro_use] extern crate clap;

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
        .arg_from_usage("[pattern] 'token pattern, JSON or ATTR:VALUE[:OP] form (default: adjectives before workers)'")
        .arg_from_usage("--top [N] 'most common matches to print (default: 20)'")
        .get_matches();
    let config = AnalysisConfig::from_matches(&args)?;
    let pattern = config.token_pattern()?;
    let corpus = config.load_corpus(args.is_present("download"))?;

    for (lemma, count) in corpus.match_counts(&pattern).most_common(Some(config.top)) {
        println!("{}\t{}", count, lemma);
    }
    Ok(())
}
