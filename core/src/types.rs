//! Shared primitive types used across the ingestion pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A 1-based physical line number in the input file.
pub type LineNumber = u64;

/// Which way a transfer went.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Upload,
    Download,
}

impl Direction {
    /// Map an input verb to a direction. Case-sensitive.
    pub fn from_verb(verb: &str) -> Option<Self> {
        match verb {
            "upload" => Some(Direction::Upload),
            "download" => Some(Direction::Download),
            _ => None,
        }
    }

    pub fn as_verb(self) -> &'static str {
        match self {
            Direction::Upload => "upload",
            Direction::Download => "download",
        }
    }

    /// Single-character on-disk discriminant.
    pub fn as_code(self) -> char {
        match self {
            Direction::Upload => 'U',
            Direction::Download => 'D',
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'U' => Some(Direction::Upload),
            'D' => Some(Direction::Download),
            _ => None,
        }
    }
}

/// One parsed, validated transfer record.
///
/// Identity is `(username, timestamp)`; the store enforces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferEvent {
    pub timestamp: DateTime<Utc>,
    pub username: String,
    pub direction: Direction,
    pub size_kb: u64,
}
