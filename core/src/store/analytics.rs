use super::EventStore;
use crate::error::{StoreError, StoreResult};
use rusqlite::{params, OptionalExtension};

/// Raw figures behind the fixed analytics questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AggregateCounts {
    pub unique_users: u64,
    pub large_transfers: u64,
    pub user_transfers_on_date: u64,
}

impl EventStore {
    // ── Analytics ──────────────────────────────────────────────

    /// All three figures in one statement, so they share one read.
    pub(crate) fn aggregate_counts(
        &self,
        large_threshold_kb: i64,
        username: &str,
        date: &str,
    ) -> StoreResult<AggregateCounts> {
        let counts = self
            .conn
            .query_row(
                "SELECT
                    (SELECT COUNT(DISTINCT username) FROM transfers),
                    (SELECT COUNT(*) FROM transfers WHERE size_kb > ?1),
                    (SELECT COUNT(*) FROM transfers
                      WHERE username = ?2 AND DATE(timestamp) = ?3)",
                params![large_threshold_kb, username, date],
                |row| {
                    Ok(AggregateCounts {
                        unique_users: row.get::<_, i64>(0)? as u64,
                        large_transfers: row.get::<_, i64>(1)? as u64,
                        user_transfers_on_date: row.get::<_, i64>(2)? as u64,
                    })
                },
            )
            .optional()?;

        counts.ok_or(StoreError::EmptyResult)
    }
}
