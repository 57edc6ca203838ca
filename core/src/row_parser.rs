//! Row parser: one raw record in, one validated `TransferEvent` out.
//!
//! Field order is `timestamp, username, verb, size_kb`. The verb is
//! checked before anything else so a bad verb is always reported as
//! such, and direction derivation afterwards cannot fail.

use crate::{
    error::ParseError,
    types::{Direction, LineNumber, TransferEvent},
};
use chrono::{DateTime, NaiveDateTime, Timelike, Utc};

pub const FIELD_COUNT: usize = 4;

/// Zone abbreviations are 3 to 5 uppercase letters and carry no offset.
const ZONE_LEN: std::ops::RangeInclusive<usize> = 3..=5;

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

pub fn parse_row<S: AsRef<str>>(
    fields: &[S; FIELD_COUNT],
    line: LineNumber,
) -> Result<TransferEvent, ParseError> {
    let [timestamp, username, verb, size_kb] = fields;
    let (timestamp, username, verb, size_kb) = (
        timestamp.as_ref(),
        username.as_ref(),
        verb.as_ref(),
        size_kb.as_ref(),
    );

    let Some(direction) = Direction::from_verb(verb) else {
        return Err(ParseError::InvalidVerb {
            line,
            value: verb.to_string(),
        });
    };

    let timestamp = parse_unix_date(timestamp).map_err(|reason| {
        ParseError::MalformedTimestamp {
            line,
            value: timestamp.to_string(),
            reason,
        }
    })?;

    if username.is_empty() {
        return Err(ParseError::EmptyUsername { line });
    }

    let size_kb = size_kb
        .parse::<u64>()
        .map_err(|source| ParseError::MalformedSize {
            line,
            value: size_kb.to_string(),
            source,
        })?;

    Ok(TransferEvent {
        timestamp,
        username: username.to_string(),
        direction,
        size_kb,
    })
}

/// Parse the Unix `date` form, e.g. `Sun Apr 12 22:10:38 UTC 2020`.
///
/// The weekday is checked for syntax only; the calendar date decides the
/// instant. The day of month may be space padded. Any zone abbreviation
/// is read as offset zero, so `EDT` and `UTC` name the same instant.
pub fn parse_unix_date(value: &str) -> Result<DateTime<Utc>, String> {
    let parts: Vec<&str> = value.split_whitespace().collect();
    let [weekday, month, day, time, zone, year] = parts.as_slice() else {
        return Err(format!("expected 6 parts, found {}", parts.len()));
    };

    if !WEEKDAYS.contains(weekday) {
        return Err(format!("unknown weekday {weekday:?}"));
    }
    if !ZONE_LEN.contains(&zone.len()) || !zone.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(format!("unsupported zone {zone:?}"));
    }

    let text = format!("{month} {day} {time} {year}");
    let naive = NaiveDateTime::parse_from_str(&text, "%b %d %H:%M:%S %Y")
        .map_err(|e| e.to_string())?;
    // chrono encodes second 60 as a nanosecond overflow.
    if naive.nanosecond() >= 1_000_000_000 {
        return Err(format!("second out of range in {time:?}"));
    }
    Ok(naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_a_download_row() {
        let event = parse_row(&["Sun Apr 12 22:10:38 UTC 2020", "sarah94", "download", "34"], 1)
            .unwrap();

        assert_eq!(event.timestamp, Utc.with_ymd_and_hms(2020, 4, 12, 22, 10, 38).unwrap());
        assert_eq!(event.username, "sarah94");
        assert_eq!(event.direction, Direction::Download);
        assert_eq!(event.size_kb, 34);
    }

    #[test]
    fn direction_round_trips_to_its_verb() {
        for verb in ["upload", "download"] {
            let event = parse_row(&["Wed Apr 15 09:00:00 UTC 2020", "jeff22", verb, "1"], 3)
                .unwrap();
            assert_eq!(event.direction.as_verb(), verb);
        }
    }

    #[test]
    fn verbs_are_case_sensitive() {
        for verb in ["Upload", "DOWNLOAD", "uploads", "", "delete"] {
            let err = parse_row(&["Sun Apr 12 22:10:38 UTC 2020", "sarah94", verb, "34"], 7)
                .unwrap_err();
            match err {
                ParseError::InvalidVerb { line, value } => {
                    assert_eq!(line, 7);
                    assert_eq!(value, verb);
                }
                other => panic!("expected InvalidVerb for {verb:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn bad_verb_wins_over_bad_timestamp() {
        let err = parse_row(&["yesterday", "sarah94", "sideload", "x"], 2).unwrap_err();
        assert!(matches!(err, ParseError::InvalidVerb { .. }), "got {err:?}");
    }

    #[test]
    fn rejects_malformed_timestamps() {
        for ts in [
            "2020-04-12T22:10:38Z",
            "Sun Apr 12 22:10:38 2020",
            "Sun Apr 12 22:10:38 +0200 2020",
            "Sun Apr 12 22:10:38 utc 2020",
            "Sun Apr 12 22:10:38 U7C 2020",
            "Sun Apr 12 22:10:38 Z 2020",
            "Sun Apr 32 22:10:38 UTC 2020",
            "Xyz Apr 12 22:10:38 UTC 2020",
        ] {
            let err = parse_row(&[ts, "sarah94", "upload", "34"], 4).unwrap_err();
            assert!(
                matches!(err, ParseError::MalformedTimestamp { line: 4, .. }),
                "{ts:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn leap_second_is_malformed() {
        let err = parse_row(&["Wed Apr 15 23:59:60 UTC 2020", "jeff22", "upload", "1"], 6)
            .unwrap_err();
        assert!(
            matches!(err, ParseError::MalformedTimestamp { line: 6, .. }),
            "got {err:?}"
        );
        assert!(parse_unix_date("Wed Apr 15 23:59:59 UTC 2020").is_ok());
    }

    #[test]
    fn any_zone_abbreviation_reads_as_utc() {
        let expected = Utc.with_ymd_and_hms(2020, 4, 12, 22, 10, 38).unwrap();
        for zone in ["UTC", "GMT", "EDT", "PST", "CEST"] {
            let ts = parse_unix_date(&format!("Sun Apr 12 22:10:38 {zone} 2020")).unwrap();
            assert_eq!(ts, expected, "zone {zone}");
        }
    }

    #[test]
    fn accepts_space_padded_day() {
        let ts = parse_unix_date("Sun Apr  5 01:02:03 UTC 2020").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2020, 4, 5, 1, 2, 3).unwrap());
    }

    #[test]
    fn rejects_negative_and_non_numeric_sizes() {
        for size in ["-1", "12kb", "", "3.5"] {
            let err = parse_row(&["Sun Apr 12 22:10:38 UTC 2020", "sarah94", "upload", size], 9)
                .unwrap_err();
            assert!(
                matches!(err, ParseError::MalformedSize { line: 9, .. }),
                "{size:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn zero_size_is_valid() {
        let event = parse_row(&["Sun Apr 12 22:10:38 UTC 2020", "sarah94", "upload", "0"], 1)
            .unwrap();
        assert_eq!(event.size_kb, 0);
    }

    #[test]
    fn rejects_empty_username() {
        let err = parse_row(&["Sun Apr 12 22:10:38 UTC 2020", "", "upload", "1"], 5).unwrap_err();
        assert!(matches!(err, ParseError::EmptyUsername { line: 5 }));
    }
}
