//! The Capitol Words dataset: download, cache and stream its records
//!
//! The dataset is one JSON object per line, gzip-compressed: about 11k speeches from the
//! Congressional Record, each with the speaker, party, chamber, congress and date.
use flate2::read::GzDecoder;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use crate::errors::*;
use crate::preprocess::cached;
use crate::record::{MetaValue, Record};

pub const NAME: &str = "capitol_words";
pub const SITE_URL: &str = "http://sunlightlabs.github.io/Capitol-Words/";
pub const DESCRIPTION: &str = "Collection of ~11k speeches in the Congressional Record given by \
    notable U.S. politicians between Jan 1996 and Jun 2016.";
pub const DOWNLOAD_URL: &str = "https://github.com/bdewilde/textacy-data/releases/download/\
    capitol_words_py3_v1.0/capitol-words-py3.json.gz";
pub const FILENAME: &str = "capitol-words-py3.json.gz";
/// Earliest and latest speech dates, inclusive
pub const FULL_DATE_RANGE: (&str, &str) = ("1996-01-01", "2016-06-30");
/// Exclusive end of the full range
const DATE_RANGE_END: &str = "2016-07-01";

pub const PARTIES: &[&str] = &["D", "I", "R"];
pub const CHAMBERS: &[&str] = &["House", "Senate"];
pub const CONGRESSES: std::ops::RangeInclusive<i64> = 104..=114;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetInfo {
    pub name: &'static str,
    pub site_url: &'static str,
    pub description: &'static str,
}

/// Records to keep while streaming. Every set field must match; unset fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RecordFilter {
    pub speaker_name: Option<Vec<String>>,
    pub speaker_party: Option<Vec<String>>,
    pub chamber: Option<Vec<String>>,
    pub congress: Option<Vec<i64>>,
    /// `[start, end)` as ISO dates; either end may be left open
    pub date_range: Option<(Option<String>, Option<String>)>,
    /// Minimum text length in characters
    pub min_len: Option<usize>,
    /// Stop after this many matching records
    pub limit: Option<usize>,
}

static ISO_DATE: OnceLock<Regex> = OnceLock::new();

fn iso_date() -> &'static Regex {
    cached(&ISO_DATE, r"^\d{4}-\d{2}-\d{2}$")
}

impl RecordFilter {
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn speaker_name<S: Into<String>>(mut self, names: Vec<S>) -> Self {
        self.speaker_name = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn speaker_party<S: Into<String>>(mut self, parties: Vec<S>) -> Self {
        self.speaker_party = Some(parties.into_iter().map(Into::into).collect());
        self
    }

    pub fn chamber<S: Into<String>>(mut self, chambers: Vec<S>) -> Self {
        self.chamber = Some(chambers.into_iter().map(Into::into).collect());
        self
    }

    pub fn congress(mut self, congresses: Vec<i64>) -> Self {
        self.congress = Some(congresses);
        self
    }

    pub fn date_range(mut self, start: Option<&str>, end: Option<&str>) -> Self {
        self.date_range = Some((start.map(String::from), end.map(String::from)));
        self
    }

    pub fn min_len(mut self, min_len: usize) -> Self {
        self.min_len = Some(min_len);
        self
    }

    /// Check every value against what the dataset can contain, and clamp the date range to the
    /// dataset's span.
    pub fn validated(&self) -> Result<RecordFilter> {
        fn check<T: std::fmt::Debug>(field: &str, values: &Option<Vec<T>>, ok: impl Fn(&T) -> bool)
            -> Result<()> {
            if let Some(bad) = values.iter().flatten().find(|v| !ok(*v)) {
                return Err(Error::InvalidConfig(format!("{} {:?} is not in the dataset", field, bad)));
            }
            Ok(())
        }
        check("speaker_party", &self.speaker_party, |p| PARTIES.contains(&p.as_str()))?;
        check("chamber", &self.chamber, |c| CHAMBERS.contains(&c.as_str()))?;
        check("congress", &self.congress, |c| CONGRESSES.contains(c))?;

        let mut out = self.clone();
        if let Some((ref start, ref end)) = self.date_range {
            for date in start.iter().chain(end.iter()) {
                if !iso_date().is_match(date) {
                    return Err(Error::InvalidConfig(format!("date '{}' is not YYYY-MM-DD", date)));
                }
            }
            let start = start.as_deref().map_or(FULL_DATE_RANGE.0, |s| s.max(FULL_DATE_RANGE.0));
            let end = end.as_deref().map_or(DATE_RANGE_END, |e| e.min(DATE_RANGE_END));
            if start >= end {
                return Err(Error::InvalidConfig(format!("empty date range [{}, {})", start, end)));
            }
            out.date_range = Some((Some(start.to_string()), Some(end.to_string())));
        }
        Ok(out)
    }

    pub fn accepts(&self, record: &Record) -> bool {
        fn text_in(record: &Record, field: &str, allowed: &Option<Vec<String>>) -> bool {
            match *allowed {
                None => true,
                Some(ref allowed) => record.get(field)
                    .and_then(MetaValue::as_str)
                    .map_or(false, |v| allowed.iter().any(|a| a == v)),
            }
        }
        if !text_in(record, "speaker_name", &self.speaker_name)
            || !text_in(record, "speaker_party", &self.speaker_party)
            || !text_in(record, "chamber", &self.chamber) {
            return false;
        }
        if let Some(ref congresses) = self.congress {
            if !record.get("congress").and_then(MetaValue::as_int).map_or(false, |c| congresses.contains(&c)) {
                return false;
            }
        }
        if let Some((ref start, ref end)) = self.date_range {
            let date = match record.get("date").and_then(MetaValue::as_str) {
                Some(date) => date,
                None => return false,
            };
            if start.as_deref().map_or(false, |s| date < s) || end.as_deref().map_or(false, |e| date >= e) {
                return false;
            }
        }
        self.min_len.map_or(true, |min| record.text.chars().count() >= min)
    }
}

/// A locally cached copy of the Capitol Words dataset
#[derive(Debug, Clone)]
pub struct Dataset {
    data_dir: PathBuf,
    url: String,
}

impl Dataset {
    /// The dataset cached under `<data_dir>/capitol_words/`
    pub fn capitol_words<P: AsRef<Path>>(data_dir: P) -> Self {
        Dataset { data_dir: data_dir.as_ref().join(NAME), url: DOWNLOAD_URL.to_string() }
    }

    /// Fetch from somewhere else: a mirror, or a `file://` path
    pub fn with_url<S: Into<String>>(mut self, url: S) -> Self {
        self.url = url.into();
        self
    }

    pub fn info(&self) -> DatasetInfo {
        DatasetInfo { name: NAME, site_url: SITE_URL, description: DESCRIPTION }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn filepath(&self) -> PathBuf {
        self.data_dir.join(FILENAME)
    }

    pub fn is_downloaded(&self) -> bool {
        self.filepath().is_file()
    }

    /// Fetch the dataset unless it is already cached (or `force` is set). Returns the cached path.
    pub fn download(&self, force: bool) -> Result<PathBuf> {
        let target = self.filepath();
        if target.is_file() && !force {
            info!("Dataset already cached at {}", target.display());
            return Ok(target);
        }
        fs::create_dir_all(&self.data_dir)?;
        let partial = target.with_extension("part");
        if partial.exists() {
            fs::remove_file(&partial)?;
        }

        let mut reader: Box<dyn Read> = match self.url.strip_prefix("file://") {
            Some(path) => Box::new(File::open(path)
                .map_err(|err| Error::DownloadError(self.url.clone(), err.to_string()))?),
            None => {
                let response = ureq::get(&self.url)
                    .call()
                    .map_err(|err| Error::DownloadError(self.url.clone(), err.to_string()))?;
                Box::new(response.into_body().into_reader())
            }
        };
        info!("Downloading {} -> {}", self.url, target.display());
        let mut file = File::create(&partial)?;
        let started = Instant::now();
        let mut last_report = Instant::now();
        let mut total_bytes = 0u64;
        let mut buffer = vec![0u8; 1024 * 1024];
        loop {
            let read = reader.read(&mut buffer)
                .map_err(|err| Error::DownloadError(self.url.clone(), err.to_string()))?;
            if read == 0 {
                break;
            }
            file.write_all(&buffer[..read])?;
            total_bytes += read as u64;
            if last_report.elapsed() >= Duration::from_secs(2) {
                info!("Download progress: {:.1} MiB ({:.1}s)",
                    total_bytes as f64 / (1024.0 * 1024.0), started.elapsed().as_secs_f64());
                last_report = Instant::now();
            }
        }
        file.flush()?;
        fs::rename(&partial, &target)?;
        info!("Downloaded {:.1} MiB in {:.1}s", total_bytes as f64 / (1024.0 * 1024.0),
            started.elapsed().as_secs_f64());
        Ok(target)
    }

    /// Stream the cached records that pass `filter`. Call again to start over.
    pub fn records(&self, filter: &RecordFilter) -> Result<Records> {
        let filter = filter.validated()?;
        let path = self.filepath();
        let file = File::open(&path).map_err(|err| Error::MissingFile("cached Capitol Words dataset", Some(err)))?;
        let mut reader = BufReader::new(file);
        let gzipped = reader.fill_buf()?.starts_with(&[0x1f, 0x8b]);
        let inner: Box<dyn Read> = if gzipped {
            Box::new(GzDecoder::new(reader))
        } else {
            Box::new(reader)
        };
        debug!("Reading {} ({})", path.display(), if gzipped { "gzip" } else { "plain" });
        Ok(Records { lines: BufReader::new(inner).lines(), filter, line_no: 0, yielded: 0 })
    }

    /// Like `records`, text only
    pub fn texts(&self, filter: &RecordFilter) -> Result<impl Iterator<Item = Result<String>>> {
        Ok(self.records(filter)?.map(|rec| rec.map(|r| r.text)))
    }
}

/// Lazily parsed records from the cached file
pub struct Records {
    lines: io::Lines<BufReader<Box<dyn Read>>>,
    filter: RecordFilter,
    line_no: usize,
    yielded: usize,
}

impl Iterator for Records {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Result<Record>> {
        if self.filter.limit.map_or(false, |limit| self.yielded >= limit) {
            return None;
        }
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(err) => return Some(Err(err.into())),
            };
            self.line_no += 1;
            if line.trim().is_empty() {
                continue;
            }
            let value: Value = match serde_json::from_str(&line) {
                Ok(value) => value,
                Err(err) => return Some(Err(err.into())),
            };
            match Record::from_json(value) {
                Some(record) => if self.filter.accepts(&record) {
                    self.yielded += 1;
                    return Some(Ok(record));
                },
                None => warn!("Skipping line {}: no text field", self.line_no),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Metadata;

    fn record(date: &str, party: &str, congress: i64, text: &str) -> Record {
        let mut meta = Metadata::new();
        meta.insert("date".into(), date.into());
        meta.insert("speaker_party".into(), party.into());
        meta.insert("congress".into(), congress.into());
        meta.insert("chamber".into(), "Senate".into());
        Record::new(text, meta)
    }

    #[test]
    fn validation_rejects_values_outside_the_dataset() {
        assert!(RecordFilter::default().speaker_party(vec!["Q"]).validated().is_err());
        assert!(RecordFilter::default().chamber(vec!["Parliament"]).validated().is_err());
        assert!(RecordFilter::default().congress(vec![99]).validated().is_err());
        assert!(RecordFilter::default().date_range(Some("May 1999"), None).validated().is_err());
        assert!(RecordFilter::default().date_range(Some("2001-01-01"), Some("2000-01-01")).validated().is_err());
        assert!(RecordFilter::default().speaker_party(vec!["D", "I"]).congress(vec![104, 114]).validated().is_ok());
    }

    #[test]
    fn date_range_is_clamped_and_half_open() {
        let filter = RecordFilter::default().date_range(Some("1990-01-01"), Some("2000-01-01")).validated().unwrap();
        assert_eq!(filter.date_range, Some((Some("1996-01-01".to_string()), Some("2000-01-01".to_string()))));
        assert!(filter.accepts(&record("1999-12-31", "D", 106, "x")));
        assert!(!filter.accepts(&record("2000-01-01", "D", 106, "x")));
        let open = RecordFilter::default().date_range(Some("2016-01-01"), None).validated().unwrap();
        assert_eq!(open.date_range, Some((Some("2016-01-01".to_string()), Some("2016-07-01".to_string()))));
        assert!(open.accepts(&record("2016-06-30", "D", 114, "x")));
        assert!(RecordFilter::default().date_range(Some("2017-01-01"), None).validated().is_err());
    }

    #[test]
    fn filters_on_metadata_and_length() {
        let filter = RecordFilter::default().speaker_party(vec!["R"]).congress(vec![105]).min_len(5);
        assert!(filter.accepts(&record("1998-01-01", "R", 105, "hello")));
        assert!(!filter.accepts(&record("1998-01-01", "D", 105, "hello")));
        assert!(!filter.accepts(&record("1998-01-01", "R", 106, "hello")));
        assert!(!filter.accepts(&record("1998-01-01", "R", 105, "hi")));
        assert!(RecordFilter::default().accepts(&Record::new("", Metadata::new())));
    }

    #[test]
    fn missing_cache_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = Dataset::capitol_words(dir.path());
        assert!(!dataset.is_downloaded());
        match dataset.records(&RecordFilter::default()) {
            Err(Error::MissingFile(_, Some(_))) => {}
            Err(other) => panic!("unexpected error {}", other),
            Ok(_) => panic!("read records from nowhere"),
        }
    }

    #[test]
    fn reads_plain_json_lines_with_limit() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = Dataset::capitol_words(dir.path());
        fs::create_dir_all(dataset.data_dir()).unwrap();
        fs::write(dataset.filepath(),
            "{\"text\": \"one\", \"date\": \"1997-01-01\"}\n\n{\"date\": \"1997-01-02\"}\n\
             {\"text\": \"two\"}\n{\"text\": \"three\"}\n").unwrap();
        let texts: Vec<String> = dataset.texts(&RecordFilter::default().limit(2)).unwrap()
            .collect::<Result<_>>().unwrap();
        assert_eq!(texts, vec!["one", "two"]);
        assert_eq!(dataset.records(&RecordFilter::default()).unwrap().count(), 3);
    }

    #[test]
    fn download_copies_into_the_cache() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("mirror.json");
        fs::write(&source, "{\"text\": \"Mr. Speaker\"}\n").unwrap();
        let dataset = Dataset::capitol_words(dir.path().join("data"))
            .with_url(format!("file://{}", source.display()));
        let path = dataset.download(false).unwrap();
        assert_eq!(path, dataset.filepath());
        assert!(dataset.is_downloaded());
        assert!(!path.with_extension("part").exists());
        assert_eq!(dataset.records(&RecordFilter::default()).unwrap().count(), 1);
        assert_eq!(dataset.info().name, "capitol_words");
    }
}
