//! Timestamp resolution for log lines.
//!
//! Textual timestamps are tried against a fixed list of layouts. Naive
//! date-times (no offset) are read as UTC so results are deterministic.

use chrono::{DateTime, NaiveDateTime, Utc};

/// 2000-01-01T00:00:00Z
const MIN_PLAUSIBLE_EPOCH: f64 = 946_684_800.0;
/// 2100-01-01T00:00:00Z
const MAX_PLAUSIBLE_EPOCH: f64 = 4_102_444_800.0;

/// Epoch units tried by [`from_epoch`]: seconds, millis, micros, nanos
const EPOCH_SCALES: [f64; 4] = [1.0, 1e3, 1e6, 1e9];

const OFFSET_FORMATS: &[&str] = &[
    "%d/%b/%Y:%H:%M:%S %z",
    "%Y-%m-%d %H:%M:%S%.f %z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S,%3f",
    "%Y/%m/%d %H:%M:%S%.f",
    "%d/%b/%Y:%H:%M:%S",
    "%d/%b/%Y %H:%M:%S",
];

/// Parse a textual timestamp in any of the supported layouts.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(text, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }

    // Epoch values serialized as strings
    text.parse::<f64>().ok().and_then(from_epoch)
}

/// Convert seconds since the epoch, without any plausibility check.
pub fn from_epoch_seconds(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    let whole = seconds.floor();
    if whole < i64::MIN as f64 || whole > i64::MAX as f64 {
        return None;
    }
    let nanos = (((seconds - whole) * 1e9).round() as u32).min(999_999_999);
    DateTime::from_timestamp(whole as i64, nanos)
}

/// Interpret a number as an epoch timestamp if it lands between 2000 and 2100
/// in seconds, milliseconds, microseconds or nanoseconds.
pub fn from_epoch(value: f64) -> Option<DateTime<Utc>> {
    if !value.is_finite() {
        return None;
    }
    EPOCH_SCALES
        .iter()
        .map(|scale| value / scale)
        .find(|seconds| (MIN_PLAUSIBLE_EPOCH..MAX_PLAUSIBLE_EPOCH).contains(seconds))
        .and_then(from_epoch_seconds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_rfc3339() {
        let ts = parse_timestamp("2023-10-10T13:55:36.250Z").unwrap();
        assert_eq!(ts.timestamp_millis(), 1_696_946_136_250);
    }

    #[test]
    fn test_parse_access_log_date_with_offset() {
        let ts = parse_timestamp("10/Oct/2000:13:55:36 -0700").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2000, 10, 10, 20, 55, 36).unwrap());
    }

    #[test]
    fn test_parse_access_log_date_without_offset_is_utc() {
        let ts = parse_timestamp("10/Oct/2023:13:55:36").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2023, 10, 10, 13, 55, 36).unwrap());
    }

    #[test]
    fn test_parse_naive_with_comma_millis() {
        let ts = parse_timestamp("2023-10-10 13:55:36,123").unwrap();
        assert_eq!(ts.timestamp_subsec_millis(), 123);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("42"), None);
    }

    #[test]
    fn test_from_epoch_detects_units() {
        let expected = Utc.with_ymd_and_hms(2023, 10, 10, 13, 55, 36).unwrap();
        assert_eq!(from_epoch(1_696_946_136.0), Some(expected));
        assert_eq!(from_epoch(1_696_946_136_000.0), Some(expected));
        assert_eq!(from_epoch(1_696_946_136_000_000.0), Some(expected));
    }

    #[test]
    fn test_from_epoch_rejects_implausible_values() {
        assert_eq!(from_epoch(1000.0), None);
        assert_eq!(from_epoch(f64::NAN), None);
        assert_eq!(from_epoch(-5.0), None);
    }

    #[test]
    fn test_from_epoch_seconds_keeps_fraction() {
        let ts = from_epoch_seconds(1000.5).unwrap();
        assert_eq!(ts.timestamp(), 1000);
        assert_eq!(ts.timestamp_subsec_millis(), 500);
    }
}
