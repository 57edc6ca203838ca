//! Ingestion driver: record source → row parser → event store.
//!
//! RULES:
//!   - Records are handled strictly one at a time, in source order.
//!   - A malformed row stops the run. Rows before it stay committed.
//!   - A duplicate row stops the run unless the policy says to skip it.
//!   - The header is only sniffed on the first record.

use crate::{
    error::{IngestError, IngestResult, StoreError},
    record_source::RecordReader,
    row_parser::parse_row,
    store::EventStore,
    types::LineNumber,
};
use serde::{Deserialize, Serialize};
use std::{fs::File, io::BufRead, io::BufReader, path::Path};

/// First-field label that marks a header row.
pub const HEADER_LABEL: &str = "timestamp";

/// What to do when a row's `(username, timestamp)` is already stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    #[default]
    ErrorOnDuplicates,
    SkipDuplicates,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestSummary {
    /// Last physical line read, header and blank lines included.
    pub lines_read: LineNumber,
    pub header_skipped: bool,
    pub inserted: u64,
    pub duplicates_skipped: u64,
}

/// Ingest every record from `source` into `store`.
pub fn ingest<R: BufRead>(
    store: &EventStore,
    source: R,
    policy: DuplicatePolicy,
) -> IngestResult<IngestSummary> {
    let mut reader = RecordReader::new(source);
    let mut summary = IngestSummary::default();
    let mut first = true;

    for record in reader.by_ref() {
        let (line, fields) = record?;

        if std::mem::take(&mut first) && fields[0] == HEADER_LABEL {
            log::debug!("line {line}: header row, skipping");
            summary.header_skipped = true;
            continue;
        }

        let event = parse_row(&fields, line)?;

        match store.insert(&event) {
            Ok(()) => {
                log::debug!(
                    "line {line}: {} {} {} KB",
                    event.username,
                    event.direction.as_verb(),
                    event.size_kb
                );
                summary.inserted += 1;
            }
            Err(StoreError::DuplicateKey { username, timestamp }) => match policy {
                DuplicatePolicy::SkipDuplicates => {
                    log::warn!("line {line}: data already imported, skipping");
                    summary.duplicates_skipped += 1;
                }
                DuplicatePolicy::ErrorOnDuplicates => {
                    return Err(IngestError::Duplicate {
                        line,
                        username,
                        timestamp,
                    });
                }
            },
            Err(source) => return Err(IngestError::Insert { line, source }),
        }
    }

    // The reader has stepped one past the last line on EOF.
    summary.lines_read = reader.line().saturating_sub(1);
    Ok(summary)
}

/// Open `path` and ingest it.
pub fn ingest_file(
    store: &EventStore,
    path: impl AsRef<Path>,
    policy: DuplicatePolicy,
) -> IngestResult<IngestSummary> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| IngestError::Open {
        path: path.display().to_string(),
        source,
    })?;

    log::info!("Importing events from {}", path.display());
    let summary = ingest(store, BufReader::new(file), policy)?;
    log::info!(
        "Imported {} events ({} duplicates skipped)",
        summary.inserted,
        summary.duplicates_skipped
    );
    Ok(summary)
}
