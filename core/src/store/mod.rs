//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database.
//! The driver and analytics call store methods; they never execute SQL.

mod analytics;

use crate::{
    error::{StoreError, StoreResult},
    types::{Direction, TransferEvent},
};
use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

/// On-disk timestamp layout. UTC, second precision.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct EventStore {
    conn: Connection,
}

impl EventStore {
    /// Open (or create) the event database at `path`.
    pub fn open(path: &str) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        // WAL is best-effort; some filesystems refuse it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        log::debug!("opened event store at {path}");
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Create the transfers table and its indexes if absent. Safe to call
    /// on every start.
    pub fn ensure_schema(&self) -> StoreResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_transfers.sql"))?;
        Ok(())
    }

    // ── Transfers ──────────────────────────────────────────────

    /// Insert one event. A second event for the same `(username, timestamp)`
    /// fails with `StoreError::DuplicateKey`. Each insert commits on its own.
    pub fn insert(&self, event: &TransferEvent) -> StoreResult<()> {
        let size_kb = i64::try_from(event.size_kb).map_err(|_| StoreError::SizeOutOfRange {
            size_kb: event.size_kb,
        })?;
        let timestamp = format_timestamp(&event.timestamp);

        let result = self.conn.execute(
            "INSERT INTO transfers (timestamp, direction, username, size_kb)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                timestamp,
                event.direction.as_code().to_string(),
                event.username,
                size_kb,
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(StoreError::DuplicateKey {
                username: event.username.clone(),
                timestamp,
            }),
            Err(e) => Err(e.into()),
        }
    }

    pub fn event_count(&self) -> StoreResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM transfers", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    pub fn contains(&self, username: &str, timestamp: &DateTime<Utc>) -> StoreResult<bool> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM transfers WHERE username = ?1 AND timestamp = ?2",
                params![username, format_timestamp(timestamp)],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// All events for `username`, oldest first.
    pub fn events_for_user(&self, username: &str) -> StoreResult<Vec<TransferEvent>> {
        let mut stmt = self.conn.prepare(
            "SELECT timestamp, username, direction, size_kb
             FROM transfers WHERE username = ?1
             ORDER BY timestamp ASC",
        )?;
        let rows = stmt
            .query_map(params![username], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(timestamp, username, direction, size_kb)| {
                Ok(TransferEvent {
                    timestamp: parse_timestamp(&timestamp)?,
                    username,
                    direction: decode_direction(&direction)?,
                    size_kb: size_kb as u64,
                })
            })
            .collect()
    }
}

pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

fn parse_timestamp(value: &str) -> StoreResult<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| StoreError::InvalidTimestamp {
            value: value.to_string(),
            reason: e.to_string(),
        })
}

fn decode_direction(code: &str) -> StoreResult<Direction> {
    let mut chars = code.chars();
    let direction = match (chars.next(), chars.next()) {
        (Some(c), None) => Direction::from_code(c),
        _ => None,
    };
    direction.ok_or_else(|| StoreError::InvalidDirection {
        code: code.to_string(),
    })
}

/// Uniqueness violations are told apart from other constraint failures
/// (e.g. the direction CHECK) by SQLite's extended result code.
fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}
