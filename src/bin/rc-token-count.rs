//! Count the tokens in the selected speeches
//!
//! Prints the number of unicode word-boundary segments in the raw text, then the number of
//! tokens and sentences after preprocessing and annotation.
//!

// argument parsing
#[macro_use] extern crate clap;
// logging
#[macro_use] extern crate log;

use unicode_segmentation::UnicodeSegmentation;

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
        .get_matches();
    let config = AnalysisConfig::from_matches(&args)?;
    let dataset = config.dataset();
    if args.is_present("download") {
        dataset.download(false)?;
    }

    let mut segments = 0;
    for text in dataset.texts(&config.record_filter())? {
        segments += text?.split_word_bounds().filter(|s| !s.trim().is_empty()).count();
    }
    info!("{} raw segments", segments);

    let corpus = config.load_corpus(false)?;
    println!("{}\t{}\t{}\t{}", corpus.len(), segments, corpus.n_tokens(), corpus.n_sents());
    Ok(())
}
