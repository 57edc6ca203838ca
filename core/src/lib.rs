//! Transfer log ingestion: parse a CSV log of file-transfer events,
//! persist each one exactly once in SQLite, and answer a few fixed
//! questions over what was stored.

pub mod analytics;
pub mod config;
pub mod error;
pub mod ingest;
pub mod record_source;
pub mod row_parser;
pub mod store;
pub mod types;
