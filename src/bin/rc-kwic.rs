//! Show a keyword in context across speeches
//!
//! Prints one line per occurrence: the speaker and date, then the keyword with its context
//! padded so the keywords line up.
//!

// argument parsing
#[macro_use] extern crate clap;

use rollcall::config::{common_args, AnalysisConfig};
use rollcall::errors::*;
use rollcall::extract::keyword_in_context;

pub fn main() {
    // Main can't return a Result, and the ? operator needs the enclosing function to return Result
    inner_main().expect("Could not recover. Exiting.");
}

pub fn inner_main() -> Result<()> {
    env_logger::init();
    let args = app_from_crate!()
        .args(&common_args())
        .arg_from_usage("[keyword] 'keyword regex (default: work(ing|ers?))'")
        .arg_from_usage("--window [CHARS] 'context characters on each side (default: 35)'")
        .arg_from_usage("--case-sensitive 'match the keyword exactly as written'")
        .get_matches();
    let config = AnalysisConfig::from_matches(&args)?;
    let options = config.kwic_options()
        .ignore_case(!args.is_present("case-sensitive"))
        .pad_context(true);

    let mut hits = 0;
    for record in config.records(args.is_present("download"))? {
        let record = record?;
        let source = format!("{} {}",
            record.get("speaker_name").map(|v| v.to_string()).unwrap_or_default(),
            record.get("date").map(|v| v.to_string()).unwrap_or_default());
        for kwic in keyword_in_context(&record.text, &config.keyword, options)? {
            println!("{}\t{}", source, kwic);
            hits += 1;
        }
    }
    eprintln!("{} occurrences", hits);
    Ok(())
}
