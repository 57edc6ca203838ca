//! Analytics tests — the three fixed figures.

use chrono::{TimeZone, Utc};
use transfer_log_core::{
    analytics::{analyze, AnalyticsReport},
    ingest::{ingest, DuplicatePolicy},
    store::EventStore,
    types::{Direction, TransferEvent},
};

fn store() -> EventStore {
    let store = EventStore::in_memory().expect("in-memory store");
    store.ensure_schema().expect("schema");
    store
}

#[test]
fn empty_store_reports_zeroes() {
    let report = analyze(&store()).unwrap();
    assert_eq!(
        report,
        AnalyticsReport {
            unique_users: 0,
            large_uploads: 0,
            user_transfers_on_date: 0,
        }
    );
}

#[test]
fn three_users_two_large_uploads() {
    let store = store();
    for (i, (user, size)) in [("alice", 10), ("bob", 60), ("carol", 75)].into_iter().enumerate() {
        store
            .insert(&TransferEvent {
                timestamp: Utc.with_ymd_and_hms(2020, 4, 12, 10, 0, i as u32).unwrap(),
                username: user.to_string(),
                direction: Direction::Upload,
                size_kb: size,
            })
            .unwrap();
    }

    let report = analyze(&store).unwrap();
    assert_eq!(report.unique_users, 3);
    assert_eq!(report.large_uploads, 2);
}

/// Exactly 50 KB is not large; the threshold is strict.
#[test]
fn threshold_is_exclusive() {
    let store = store();
    store
        .insert(&TransferEvent {
            timestamp: Utc.with_ymd_and_hms(2020, 4, 12, 10, 0, 0).unwrap(),
            username: "alice".into(),
            direction: Direction::Upload,
            size_kb: 50,
        })
        .unwrap();
    assert_eq!(analyze(&store).unwrap().large_uploads, 0);
}

#[test]
fn point_question_counts_one_user_on_one_day() {
    let store = store();
    let input = "\
timestamp,username,operation,size
Tue Apr 14 23:59:59 UTC 2020,jeff22,upload,1
Wed Apr 15 00:00:00 UTC 2020,jeff22,upload,1
Wed Apr 15 12:30:00 UTC 2020,jeff22,download,80
Wed Apr 15 23:59:59 UTC 2020,jeff22,upload,5
Thu Apr 16 00:00:00 UTC 2020,jeff22,upload,1
Wed Apr 15 12:30:00 UTC 2020,sarah94,upload,1
";
    ingest(&store, input.as_bytes(), DuplicatePolicy::ErrorOnDuplicates).unwrap();

    let report = analyze(&store).unwrap();
    assert_eq!(report.user_transfers_on_date, 3);
    assert_eq!(report.unique_users, 2);
    assert_eq!(report.large_uploads, 1);
}
