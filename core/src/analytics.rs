//! Fixed analytics questions over the stored transfers.
//!
//! These are three named computations, not a query API. Questions that
//! need anything else should go straight to a read-only copy of the DB.

use crate::{error::StoreResult, store::EventStore};
use serde::{Deserialize, Serialize};

/// Transfers strictly larger than this count as large.
pub const LARGE_TRANSFER_THRESHOLD_KB: i64 = 50;

/// The point question: how often did this user transfer on this date?
pub const POINT_QUESTION_USER: &str = "jeff22";
/// Calendar date in UTC, `YYYY-MM-DD`.
pub const POINT_QUESTION_DATE: &str = "2020-04-15";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    /// Distinct usernames across all stored events.
    pub unique_users: u64,
    /// Events with `size_kb > LARGE_TRANSFER_THRESHOLD_KB`.
    pub large_uploads: u64,
    /// Events for `POINT_QUESTION_USER` on `POINT_QUESTION_DATE`.
    pub user_transfers_on_date: u64,
}

pub fn analyze(store: &EventStore) -> StoreResult<AnalyticsReport> {
    let counts = store.aggregate_counts(
        LARGE_TRANSFER_THRESHOLD_KB,
        POINT_QUESTION_USER,
        POINT_QUESTION_DATE,
    )?;
    log::debug!("analytics: {counts:?}");

    Ok(AnalyticsReport {
        unique_users: counts.unique_users,
        large_uploads: counts.large_transfers,
        user_transfers_on_date: counts.user_transfers_on_date,
    })
}
