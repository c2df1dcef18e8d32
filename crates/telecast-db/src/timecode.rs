//! Time-of-day codec for broadcast schedules.
//!
//! Program rows persist only a wall-clock `HH:MM:SS` value; the date is
//! re-derived against a reference date at read time. An end time of
//! exactly `00:00:00` means "midnight at the end of the reference day"
//! and anchors to the following day.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::StoreError;

/// Decodes a `startAt` time-of-day against the reference date `on`.
///
/// # Errors
///
/// Returns [`StoreError::Format`] if `value` is not a strict `HH:MM:SS`
/// string with each field in range.
pub fn decode_start(value: &str, on: NaiveDate) -> Result<NaiveDateTime, StoreError> {
    let time = parse_time_of_day(value)?;
    Ok(on.and_time(time))
}

/// Decodes an `endAt` time-of-day against the reference date `on`.
///
/// `00:00:00` anchors to midnight of the day after `on`; a broadcast
/// that ends at midnight ends at the start of the following day, never
/// at the start of the reference day. All other values behave exactly
/// like [`decode_start`].
///
/// # Errors
///
/// Returns [`StoreError::Format`] if `value` is not a strict `HH:MM:SS`
/// string with each field in range, or if the rollover leaves the
/// supported date range.
pub fn decode_end(value: &str, on: NaiveDate) -> Result<NaiveDateTime, StoreError> {
    let time = parse_time_of_day(value)?;
    if time == NaiveTime::MIN {
        let next = on.succ_opt().ok_or_else(|| StoreError::Format {
            value: value.to_owned(),
            reason: "midnight rollover leaves the supported date range",
        })?;
        return Ok(next.and_time(time));
    }
    Ok(on.and_time(time))
}

/// Encodes an instant back to its persisted `HH:MM:SS` form.
///
/// The date component is discarded; only the wall-clock time-of-day is
/// stored.
#[must_use]
pub fn encode(at: NaiveDateTime) -> String {
    at.time().format("%H:%M:%S").to_string()
}

/// Strictly parses `HH:MM:SS` (two ASCII digits per field, hours 0-23,
/// minutes/seconds 0-59).
fn parse_time_of_day(value: &str) -> Result<NaiveTime, StoreError> {
    let format_err = |reason| StoreError::Format {
        value: value.to_owned(),
        reason,
    };

    let mut fields = value.split(':');
    let (Some(hh), Some(mm), Some(ss), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(format_err("expected HH:MM:SS"));
    };

    let hours = parse_field(hh).ok_or_else(|| format_err("hours must be two digits"))?;
    let minutes = parse_field(mm).ok_or_else(|| format_err("minutes must be two digits"))?;
    let seconds = parse_field(ss).ok_or_else(|| format_err("seconds must be two digits"))?;

    NaiveTime::from_hms_opt(hours, minutes, seconds).ok_or_else(|| format_err("field out of range"))
}

/// Parses one exactly-two-ASCII-digit field.
fn parse_field(field: &str) -> Option<u32> {
    if field.len() != 2 || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_decode_start_anchors_to_reference_date() {
        // Arrange
        let on = date(2024, 5, 1);

        // Act
        let at = decode_start("06:30:15", on).unwrap();

        // Assert
        assert_eq!(at.to_string(), "2024-05-01 06:30:15");
    }

    #[test]
    fn test_decode_end_midnight_rolls_to_next_day() {
        // Arrange
        let on = date(2024, 5, 1);

        // Act
        let at = decode_end("00:00:00", on).unwrap();

        // Assert
        assert_eq!(at.to_string(), "2024-05-02 00:00:00");
    }

    #[test]
    fn test_decode_end_non_midnight_stays_on_reference_date() {
        // Arrange
        let on = date(2024, 5, 1);

        // Act
        let at = decode_end("23:59:59", on).unwrap();

        // Assert
        assert_eq!(at.to_string(), "2024-05-01 23:59:59");
    }

    #[test]
    fn test_rollover_adds_exactly_one_day() {
        // Arrange
        let on = date(2024, 5, 1);

        // Act
        let start = decode_start("00:00:00", on).unwrap();
        let end = decode_end("00:00:00", on).unwrap();

        // Assert
        assert_eq!(end - start, chrono::Duration::hours(24));
    }

    #[test]
    fn test_program_crossing_midnight() {
        // A 30-minute program {23:30:00 .. 00:00:00} on 2024-05-01
        // crosses into 2024-05-02.
        // Arrange
        let on = date(2024, 5, 1);

        // Act
        let start = decode_start("23:30:00", on).unwrap();
        let end = decode_end("00:00:00", on).unwrap();

        // Assert
        assert_eq!(start.to_string(), "2024-05-01 23:30:00");
        assert_eq!(end.to_string(), "2024-05-02 00:00:00");
        assert_eq!(end - start, chrono::Duration::minutes(30));
    }

    #[test]
    fn test_morning_program_no_rollover() {
        // Arrange
        let on = date(2024, 5, 1);

        // Act
        let start = decode_start("06:00:00", on).unwrap();
        let end = decode_end("07:00:00", on).unwrap();

        // Assert
        assert_eq!(start.date(), on);
        assert_eq!(end.date(), on);
        assert!(end > start);
    }

    #[test]
    fn test_round_trip_non_midnight() {
        // Arrange
        let on = date(2024, 5, 1);

        for raw in ["00:00:01", "06:00:00", "12:34:56", "23:59:59"] {
            // Act & Assert
            assert_eq!(encode(decode_start(raw, on).unwrap()), raw);
            assert_eq!(encode(decode_end(raw, on).unwrap()), raw);
        }
    }

    #[test]
    fn test_round_trip_midnight_end() {
        // Rollover moves the date, not the wall-clock projection.
        // Arrange
        let on = date(2024, 5, 1);

        // Act
        let encoded = encode(decode_end("00:00:00", on).unwrap());

        // Assert
        assert_eq!(encoded, "00:00:00");
    }

    #[test]
    fn test_rejects_malformed_strings() {
        // Arrange
        let on = date(2024, 5, 1);
        let bad = [
            "",
            "06:00",
            "06:00:00:00",
            "6:00:00",
            "06:0:00",
            "06:00:0",
            "ab:cd:ef",
            "06-00-00",
            " 06:00:00",
            "+6:00:00",
        ];

        for raw in bad {
            // Act & Assert
            assert!(decode_start(raw, on).unwrap_err().is_format(), "{raw:?}");
            assert!(decode_end(raw, on).unwrap_err().is_format(), "{raw:?}");
        }
    }

    #[test]
    fn test_rejects_out_of_range_fields() {
        // Arrange
        let on = date(2024, 5, 1);

        for raw in ["24:00:00", "12:60:00", "12:00:60", "99:99:99"] {
            // Act & Assert
            assert!(decode_start(raw, on).unwrap_err().is_format(), "{raw:?}");
        }
    }
}
