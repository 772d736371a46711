//
// Errors
//
use std::error;
use std::fmt;
use std::io;
use std::result;

/// Type alias for rollcall errors
pub type Result<X> = result::Result<X, Error>;

/// Wrapper for many kinds of errors occuring as part of an analysis run
#[derive(Debug)]
pub enum Error {
    IOError(io::Error),
    JsonError(serde_json::Error),
    RegexError(regex::Error),
    DownloadError(String, String),
    MissingFile(&'static str, Option<io::Error>),
    ModelUnavailable(String),
    InvalidPattern(String),
    InvalidConfig(String),
    Other(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::IOError(ref err) => write!(f, "IO error: {}", err),
            Error::JsonError(ref err) => write!(f, "JSON error: {}", err),
            Error::RegexError(ref err) => write!(f, "Regex error: {}", err),
            Error::DownloadError(ref url, ref info) => {
                write!(f, "Failed downloading '{}': {}", url, info)
            }
            Error::MissingFile(ref info, ref opt_err) => {
                write!(f,
                    "The {} must already exist at this point but there was a problem opening it. \
                    Wrong directory? Maybe missed the download step? The OS error was: ",
                    info)?;
                if let Some(ref err) = *opt_err { write!(f, "{}", err) }
                else { write!(f, "Unknown") }
            }
            Error::ModelUnavailable(ref name) => write!(f,
                "Language model '{}' is not available. It is neither built in nor a directory \
                containing a lexicon.tsv", name),
            Error::InvalidPattern(ref info) => write!(f, "Invalid token pattern: {}", info),
            Error::InvalidConfig(ref info) => write!(f, "Invalid configuration: {}", info),
            Error::Other(ref info) => write!(f, "{}", info),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::IOError(ref err) => Some(err),
            Error::JsonError(ref err) => Some(err),
            Error::RegexError(ref err) => Some(err),
            Error::MissingFile(_, Some(ref err)) => Some(err),
            _ => None,
        }
    }
}
//
// Convert everything else into Error
//
impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::IOError(err)
    }
}
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::JsonError(err)
    }
}
impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error::RegexError(err)
    }
}

//
// Convert Error into a general io Error
//
impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        io::Error::new(io::ErrorKind::Other, err)
    }
}
