use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::ingest::row::CellValue;

/// Spreadsheet serial of 1970-01-01.
const UNIX_EPOCH_SERIAL: f64 = 25569.0;
const MILLIS_PER_DAY: f64 = 86_400_000.0;

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Converts a spreadsheet serial day count to its UTC calendar date.
pub fn from_serial(serial: f64) -> Option<NaiveDate> {
    let millis = (serial - UNIX_EPOCH_SERIAL) * MILLIS_PER_DAY;
    if !millis.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis(millis.trunc() as i64).map(|dt| dt.date_naive())
}

/// Parses a free-form date string.
pub fn parse_date_text(raw: &str) -> Option<NaiveDate> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc().date());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.naive_utc().date());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt.date());
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

/// Resolves a date cell: native dates by UTC calendar day, numbers as serial
/// day counts, anything else as free-form text.
pub fn coerce_date(cell: &CellValue) -> Option<NaiveDate> {
    match cell {
        CellValue::Date(dt) => Some(dt.date_naive()),
        CellValue::Number(serial) => from_serial(*serial),
        CellValue::Text(text) => parse_date_text(text),
        CellValue::Bool(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_serial_epoch_offset() {
        assert_eq!(from_serial(25569.0), Some(ymd(1970, 1, 1)));
        assert_eq!(from_serial(45000.0), Some(ymd(2023, 3, 15)));
        let expected = ymd(1970, 1, 1) + chrono::Duration::days(45000 - 25569);
        assert_eq!(from_serial(45000.0), Some(expected));
    }

    #[test]
    fn test_serial_fraction_keeps_day() {
        assert_eq!(from_serial(45000.75), Some(ymd(2023, 3, 15)));
    }

    #[test]
    fn test_serial_out_of_range() {
        assert_eq!(from_serial(f64::NAN), None);
        assert_eq!(from_serial(1e300), None);
    }

    #[test]
    fn test_text_formats() {
        let want = Some(ymd(2024, 3, 5));
        assert_eq!(parse_date_text("2024-03-05"), want);
        assert_eq!(parse_date_text("2024-03-05T10:15:00Z"), want);
        assert_eq!(parse_date_text("2024-03-05 10:15:00"), want);
        assert_eq!(parse_date_text("2024/03/05"), want);
        assert_eq!(parse_date_text("03/05/2024"), want);
        assert_eq!(parse_date_text("3/5/2024 9:30"), want);
        assert_eq!(parse_date_text("March 5, 2024"), want);
        assert_eq!(parse_date_text("Mar 5, 2024"), want);
        assert_eq!(parse_date_text("5 March 2024"), want);
        assert_eq!(parse_date_text("Tue, 5 Mar 2024 10:00:00 +0000"), want);
    }

    #[test]
    fn test_text_offset_converts_to_utc_day() {
        assert_eq!(
            parse_date_text("2024-03-05T23:30:00-02:00"),
            Some(ymd(2024, 3, 6))
        );
    }

    #[test]
    fn test_unparseable_text() {
        assert_eq!(parse_date_text(""), None);
        assert_eq!(parse_date_text("Invalid Date"), None);
        assert_eq!(parse_date_text("2024-13-40"), None);
    }

    #[test]
    fn test_coerce_native_date_uses_utc_day() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 5, 23, 59, 0).unwrap();
        assert_eq!(coerce_date(&CellValue::Date(dt)), Some(ymd(2024, 3, 5)));
        assert_eq!(coerce_date(&CellValue::Number(45000.0)), Some(ymd(2023, 3, 15)));
        assert_eq!(coerce_date(&CellValue::Bool(true)), None);
    }
}
