use crate::types::LineNumber;
use thiserror::Error;

/// A record that failed validation. Always fatal to an ingestion run.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("line {line}: malformed timestamp {value:?}: {reason}")]
    MalformedTimestamp {
        line: LineNumber,
        value: String,
        reason: String,
    },

    #[error("line {line}: malformed size {value:?}: {source}")]
    MalformedSize {
        line: LineNumber,
        value: String,
        source: std::num::ParseIntError,
    },

    #[error("line {line}: expected verb upload|download, got: {value}")]
    InvalidVerb { line: LineNumber, value: String },

    #[error("line {line}: username must not be empty")]
    EmptyUsername { line: LineNumber },
}

impl ParseError {
    pub fn line(&self) -> LineNumber {
        match self {
            ParseError::MalformedTimestamp { line, .. }
            | ParseError::MalformedSize { line, .. }
            | ParseError::InvalidVerb { line, .. }
            | ParseError::EmptyUsername { line } => *line,
        }
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("duplicate transfer for {username} at {timestamp}")]
    DuplicateKey { username: String, timestamp: String },

    #[error("size {size_kb} KB exceeds the storable range")]
    SizeOutOfRange { size_kb: u64 },

    #[error("invalid direction code {code:?} in stored row")]
    InvalidDirection { code: String },

    #[error("stored timestamp {value:?} is not readable: {reason}")]
    InvalidTimestamp { value: String, reason: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("aggregate query returned no row")]
    EmptyResult,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Fatal outcome of an ingestion run. Every variant tied to input names
/// the line it happened on.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        line: LineNumber,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: unable to read input: {source}")]
    Read {
        line: LineNumber,
        source: std::io::Error,
    },

    #[error("line {line}: data already imported ({username} at {timestamp})")]
    Duplicate {
        line: LineNumber,
        username: String,
        timestamp: String,
    },

    #[error("line {line}: unable to insert row: {source}")]
    Insert {
        line: LineNumber,
        source: StoreError,
    },

    #[error("unable to open input {path}: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IngestError {
    /// The input line the failure is attributed to, if any.
    pub fn line(&self) -> Option<LineNumber> {
        match self {
            IngestError::Parse(e) => Some(e.line()),
            IngestError::FieldCount { line, .. }
            | IngestError::Read { line, .. }
            | IngestError::Duplicate { line, .. }
            | IngestError::Insert { line, .. } => Some(*line),
            IngestError::Open { .. } | IngestError::Store(_) => None,
        }
    }
}

pub type IngestResult<T> = Result<T, IngestError>;
