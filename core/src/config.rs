//! Run configuration: where the store and input live, and run policy.
//!
//! Loaded from an optional JSON file; the CLI layers its flags on top.

use crate::ingest::DuplicatePolicy;
use serde::{Deserialize, Serialize};

pub const DEFAULT_DB_PATH: &str = "log_parser.db";
pub const DEFAULT_INPUT_PATH: &str = "server_log.csv";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    pub db_path: String,
    pub input_path: String,
    pub duplicate_policy: DuplicatePolicy,
    pub analyze: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            db_path: DEFAULT_DB_PATH.to_string(),
            input_path: DEFAULT_INPUT_PATH.to_string(),
            duplicate_policy: DuplicatePolicy::ErrorOnDuplicates,
            analyze: false,
        }
    }
}

impl IngestConfig {
    /// Read a JSON config file. Missing keys take their defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: IngestConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config {path}: {e}"))?;
        Ok(config)
    }
}
