use chrono::{DateTime, Local, NaiveDate, NaiveTime, SecondsFormat, Utc};

use crate::constants::REPORT_DATE_FORMAT;

/// Current timestamp in UTC.
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Fixed-width RFC 3339 (microseconds, `Z` suffix) so that string order
/// matches chronological order inside SQLite and JSON documents.
pub fn to_sqlite(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse an RFC 3339 timestamp. A bare `YYYY-MM-DD` date is read as midnight UTC.
pub fn from_sqlite(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    match s.parse::<DateTime<Utc>>() {
        Ok(dt) => Ok(dt),
        Err(e) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(|d| d.and_time(NaiveTime::MIN).and_utc())
            .map_err(|_| e),
    }
}

/// Run date as written in report names: local calendar day of `at`.
pub fn report_date(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format(REPORT_DATE_FORMAT).to_string()
}

/// Serde adapter writing timestamps in the `to_sqlite` encoding.
pub mod rfc3339 {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::to_sqlite(dt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::from_sqlite(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_roundtrip() {
        let dt = now();
        let s = to_sqlite(&dt);
        let parsed = from_sqlite(&s).unwrap();
        assert_eq!(dt.timestamp_micros(), parsed.timestamp_micros());
    }

    #[test]
    fn test_fixed_width_encoding() {
        let whole = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(to_sqlite(&whole), "2026-01-02T03:04:05.000000Z");
        let fractional = whole + Duration::microseconds(120);
        assert_eq!(to_sqlite(&whole).len(), to_sqlite(&fractional).len());
    }

    #[test]
    fn test_string_order_matches_time_order() {
        let base = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let samples = [
            base - Duration::days(40),
            base - Duration::microseconds(1),
            base,
            base + Duration::milliseconds(500),
            base + Duration::seconds(1),
        ];
        for pair in samples.windows(2) {
            assert!(to_sqlite(&pair[0]) < to_sqlite(&pair[1]));
        }
    }

    #[test]
    fn test_parse_offset_and_bare_date() {
        let with_offset = from_sqlite("2026-01-02T05:00:00+02:00").unwrap();
        assert_eq!(with_offset, Utc.with_ymd_and_hms(2026, 1, 2, 3, 0, 0).unwrap());

        let bare = from_sqlite("2025-12-31").unwrap();
        assert_eq!(bare, Utc.with_ymd_and_hms(2025, 12, 31, 0, 0, 0).unwrap());

        assert!(from_sqlite("yesterday").is_err());
    }

    #[test]
    fn test_report_date_shape() {
        let date = report_date(&now());
        assert_eq!(date.len(), 10);
        assert!(NaiveDate::parse_from_str(&date, REPORT_DATE_FORMAT).is_ok());
    }
}
