//! End to end over a small gzip-compressed copy of the dataset
use flate2::write::GzEncoder;
use flate2::Compression;
use regex::Regex;
use serde_json::json;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use rollcall::dataset::{Dataset, RecordFilter};
use rollcall::extract::{keyterms, keyword_in_context, regex_matches, Alignment, KwicOptions};
use rollcall::{AnalysisConfig, Corpus, MetaValue};

fn write_fixture(data_dir: &Path) {
    let speeches = vec![
        json!({"text": "Mr. President, we must protect the skilled American workers. \u{201c}Working families\u{201d} \
                need a raise.", "speaker_name": "Bernie Sanders", "speaker_party": "I", "chamber": "Senate",
               "congress": 110, "date": "2007-05-01", "title": "THE MINIMUM WAGE"}),
        json!({"text": "Mr. Speaker, the budget   is balanced.\n\n\nWe did it for young workers and their families.",
               "speaker_name": "John Kasich", "speaker_party": "R", "chamber": "House",
               "congress": 105, "date": "1997-08-01", "title": "BUDGET"}),
        json!({"text": "Skilled workers built this country. The minimum wage must go up for working families.",
               "speaker_name": "Bernie Sanders", "speaker_party": "I", "chamber": "House",
               "congress": 106, "date": "1999-03-02", "title": null}),
        json!({"text": "The Senate will now vote on the nomination.", "speaker_name": "Harry Reid",
               "speaker_party": "D", "chamber": "Senate", "congress": 113, "date": "2014-02-12"}),
    ];
    let dir = data_dir.join("capitol_words");
    fs::create_dir_all(&dir).unwrap();
    let file = File::create(dir.join("capitol-words-py3.json.gz")).unwrap();
    let mut gz = GzEncoder::new(file, Compression::default());
    for speech in speeches {
        writeln!(gz, "{}", speech).unwrap();
    }
    gz.finish().unwrap();
}

fn config(data_dir: &Path) -> AnalysisConfig {
    AnalysisConfig { data_dir: data_dir.to_path_buf(), limit: 3, ..AnalysisConfig::default() }
}

#[test]
fn reads_the_compressed_cache() {
    let tmp = tempfile::tempdir().unwrap();
    write_fixture(tmp.path());
    let dataset = Dataset::capitol_words(tmp.path());
    assert!(dataset.is_downloaded());
    assert_eq!(dataset.records(&RecordFilter::default()).unwrap().count(), 4);

    let sanders = RecordFilter::default().speaker_name(vec!["Bernie Sanders"]).chamber(vec!["House"]);
    let records: Vec<_> = dataset.records(&sanders).unwrap().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("congress"), Some(&MetaValue::Int(106)));
    assert!(records[0].get("title").is_none());

    let senate_2000s = RecordFilter::default().chamber(vec!["Senate"]).date_range(Some("2000-01-01"), Some("2010-01-01"));
    assert_eq!(dataset.records(&senate_2000s).unwrap().count(), 1);
}

#[test]
fn keyword_in_context_on_the_first_record() {
    let tmp = tempfile::tempdir().unwrap();
    write_fixture(tmp.path());
    let record = Dataset::capitol_words(tmp.path())
        .records(&RecordFilter::default().limit(1)).unwrap()
        .next().unwrap().unwrap();
    let hits: Vec<_> = keyword_in_context(&record.text, "work(ing|ers?)", KwicOptions::default().window_width(35))
        .unwrap()
        .collect();
    let keywords: Vec<&str> = hits.iter().map(|k| k.keyword.as_str()).collect();
    assert_eq!(keywords, vec!["workers", "Working"]);
    assert!(hits.iter().all(|k| k.pre.chars().count() <= 35 && k.post.chars().count() <= 35));
}

#[test]
fn preprocessing_is_idempotent_on_real_text() {
    let tmp = tempfile::tempdir().unwrap();
    write_fixture(tmp.path());
    let config = config(tmp.path());
    let pipeline = config.pipeline().unwrap();
    for record in config.dataset().records(&RecordFilter::default()).unwrap() {
        let once = pipeline.apply(&record.unwrap().text);
        assert_eq!(pipeline.apply(&once), once);
        assert!(!once.contains('\u{201c}'));
        assert!(!once.contains("  "));
    }
}

#[test]
fn corpus_metadata_and_matches() {
    let tmp = tempfile::tempdir().unwrap();
    write_fixture(tmp.path());
    let config = config(tmp.path());
    let corpus = config.load_corpus(false).unwrap();
    assert_eq!(corpus.len(), 3);
    assert_eq!(corpus.to_string(), format!("Corpus(3 docs, {} tokens)", corpus.n_tokens()));

    let first = corpus.agg_metadata("date", |d| d.min().cloned()).unwrap();
    let last = corpus.agg_metadata("date", |d| d.max().cloned()).unwrap();
    assert!(first <= last);
    for doc in &corpus {
        let date = doc.get_meta("date").unwrap();
        assert!(&first <= date && date <= &last);
    }
    assert_eq!(first, MetaValue::from("1997-08-01"));

    let pattern = config.token_pattern().unwrap();
    let counts = corpus.match_counts(&pattern);
    assert_eq!(counts.get(&"skilled worker".to_string()), 1);
    assert_eq!(counts.get(&"the skilled american worker".to_string()), 1);
    assert_eq!(counts.get(&"young worker".to_string()), 1);
}

#[test]
fn regex_matches_cover_their_surface_text() {
    let tmp = tempfile::tempdir().unwrap();
    write_fixture(tmp.path());
    let corpus = config(tmp.path()).load_corpus(false).unwrap();
    let re = Regex::new("(?i)workers?|minimum wage").unwrap();
    let mut found = 0;
    for doc in &corpus {
        for span in regex_matches(doc, &re, Alignment::Strict) {
            assert!(re.is_match(span.text()));
            assert_eq!(re.find(span.text()).unwrap().as_str(), span.text());
            found += 1;
        }
    }
    assert_eq!(found, 4);
}

#[test]
fn key_terms_are_deterministic() {
    let tmp = tempfile::tempdir().unwrap();
    write_fixture(tmp.path());
    let config = config(tmp.path());
    let a = config.load_corpus(false).unwrap();
    let b = Corpus::from_records(&config.model, config.records(false).unwrap()).unwrap();
    for (x, y) in a.iter().zip(b.iter()) {
        assert_eq!(keyterms(x, &config.keyterms).unwrap(), keyterms(y, &config.keyterms).unwrap());
    }
    let re = Regex::new(&config.doc_regex).unwrap();
    let weights_a = a.keyterm_weights(&re, &config.keyterms).unwrap().most_common(Some(config.top));
    let weights_b = b.keyterm_weights(&re, &config.keyterms).unwrap().most_common(Some(config.top));
    assert_eq!(weights_a, weights_b);
    assert!(!weights_a.is_empty());
    assert!(weights_a.windows(2).all(|w| w[0].1 >= w[1].1));
}
