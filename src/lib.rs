//! Text analysis for the Congressional Record
//!
//! Fetch the Capitol Words speeches, clean them up, annotate them with a small rule-based English
//! model, and pull out keywords in context, token-pattern matches and key terms, aggregated over
//! a corpus. The included binaries walk through that session step by step.

#[macro_use] extern crate log;

pub mod config;
pub mod corpus;
pub mod counter;
pub mod dataset;
pub mod doc;
pub mod errors;
pub mod extract;
pub mod farm;
pub mod graph;
pub mod lang;
pub mod preprocess;
pub mod record;

pub use crate::config::AnalysisConfig;
pub use crate::corpus::Corpus;
pub use crate::counter::Counter;
pub use crate::dataset::{Dataset, RecordFilter};
pub use crate::doc::{Document, Normalize, Span, Token};
pub use crate::errors::{Error, Result};
pub use crate::lang::{load, make_doc, LanguageModel, Pos};
pub use crate::preprocess::Pipeline;
pub use crate::record::{MetaValue, Metadata, Record};
