//! Error type shared by every counter source and the pipeline.

use crate::collector::procfs::parser::ParseError;

/// Error type for collection failures.
#[derive(Debug)]
pub enum CollectError {
    /// Filter configuration is invalid (conflicting or unparsable patterns).
    Config(String),
    /// The counter source could not be opened or enumerated.
    SourceUnavailable(std::io::Error),
    /// A record in the counter source is malformed.
    Malformed(ParseError),
    /// The consumer went away before the producer finished.
    SinkClosed,
}

impl std::fmt::Display for CollectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectError::Config(msg) => write!(f, "configuration error: {}", msg),
            CollectError::SourceUnavailable(e) => write!(f, "source unavailable: {}", e),
            CollectError::Malformed(e) => write!(f, "malformed record: {}", e.message),
            CollectError::SinkClosed => write!(f, "metric sink closed before end of stream"),
        }
    }
}

impl std::error::Error for CollectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CollectError::SourceUnavailable(e) => Some(e),
            CollectError::Malformed(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CollectError {
    fn from(e: std::io::Error) -> Self {
        CollectError::SourceUnavailable(e)
    }
}

impl From<ParseError> for CollectError {
    fn from(e: ParseError) -> Self {
        CollectError::Malformed(e)
    }
}
