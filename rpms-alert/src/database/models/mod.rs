//! Database models for rpms-alert.
//!
//! These models map directly to the database schema. Dates are stored as
//! ISO-8601 text and parsed when a row is converted into a domain value.

pub mod care;
pub mod user;
pub mod vitals;

pub use care::*;
pub use user::*;
pub use vitals::*;

use chrono::{NaiveDate, NaiveDateTime};

use crate::{Error, Result};

pub(crate) fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| Error::Database(format!("malformed {} '{}': {}", field, value, e)))
}

/// Accepts `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` and the same
/// without seconds.
pub(crate) fn parse_datetime(field: &str, value: &str) -> Result<NaiveDateTime> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];
    let value = value.trim();
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .ok_or_else(|| Error::Database(format!("malformed {} '{}'", field, value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("birth_date", "1985-12-10").unwrap(),
            NaiveDate::from_ymd_opt(1985, 12, 10).unwrap()
        );
        assert!(matches!(
            parse_date("birth_date", "10/12/1985"),
            Err(Error::Database(_))
        ));
    }

    #[test]
    fn test_parse_datetime_variants() {
        let expected = NaiveDate::from_ymd_opt(2026, 11, 2)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        assert_eq!(parse_datetime("t", "2026-11-02 09:30:00").unwrap(), expected);
        assert_eq!(parse_datetime("t", "2026-11-02T09:30:00").unwrap(), expected);
        assert_eq!(parse_datetime("t", "2026-11-02 09:30").unwrap(), expected);
        assert!(parse_datetime("t", "tomorrow").is_err());
    }
}
