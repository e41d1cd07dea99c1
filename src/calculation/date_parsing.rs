//! Date parsing for spreadsheet cells.
//!
//! Dates arrive either as spreadsheet serial numbers or as text typed in a
//! handful of calendar formats. Parsing never fails the run: a value that
//! cannot be read is reported as [`CellDate::Unparseable`] and callers treat
//! it as "no date".

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};

use crate::models::Cell;

/// Text formats tried for date-only values, in order.
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%Y年%m月%d日"];

/// Text formats tried for values carrying a time part, in order.
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Returns day zero of the spreadsheet serial date system (1899-12-30).
pub fn serial_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or(NaiveDate::MIN)
}

/// The result of reading a date out of a cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellDate {
    /// The cell held nothing.
    Empty,
    /// The cell held a readable date.
    Date(NaiveDate),
    /// The cell held a value that is not a date; the raw text is kept for diagnostics.
    Unparseable(String),
}

impl CellDate {
    /// Returns the date, treating unparseable values as absent.
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            CellDate::Date(date) => Some(*date),
            _ => None,
        }
    }
}

/// Converts a spreadsheet serial number into a calendar date.
///
/// The integral part counts days from 1899-12-30; any time-of-day fraction
/// is dropped. No time zone is applied.
///
/// # Example
///
/// ```
/// use appraisal_engine::calculation::serial_to_date;
/// use chrono::NaiveDate;
///
/// assert_eq!(serial_to_date(45292.0), NaiveDate::from_ymd_opt(2024, 1, 1));
/// assert_eq!(serial_to_date(45292.75), NaiveDate::from_ymd_opt(2024, 1, 1));
/// ```
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial.abs() > 3_000_000.0 {
        return None;
    }
    serial_epoch().checked_add_signed(Duration::days(serial.trunc() as i64))
}

/// Parses a text value as a calendar date.
///
/// Accepts ISO-style dates with `-`, `/` or `.` separators, `YYYY年M月D日`,
/// compact `YYYYMMDD`, the same with a time part, RFC 3339 timestamps (the
/// written calendar date is kept, no offset conversion), and bare serial
/// numbers.
pub fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if text.bytes().all(|b| b.is_ascii_digit()) {
        if text.len() == 8 {
            return NaiveDate::parse_from_str(
                &format!("{}-{}-{}", &text[0..4], &text[4..6], &text[6..8]),
                "%Y-%m-%d",
            )
            .ok();
        }
        return text.parse::<f64>().ok().and_then(serial_to_date);
    }
    if let Ok(serial) = text.parse::<f64>() {
        return serial_to_date(serial);
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// Reads a date out of a cell.
///
/// Numbers are serial dates; a zero serial counts as empty, matching
/// exports that write 0 for "no date". Text goes through
/// [`parse_date_text`].
///
/// # Example
///
/// ```
/// use appraisal_engine::calculation::{parse_cell_date, CellDate};
/// use appraisal_engine::models::Cell;
/// use chrono::NaiveDate;
///
/// let date = parse_cell_date(&Cell::from("2024/08/01"));
/// assert_eq!(date, CellDate::Date(NaiveDate::from_ymd_opt(2024, 8, 1).unwrap()));
/// assert_eq!(parse_cell_date(&Cell::Empty), CellDate::Empty);
/// ```
pub fn parse_cell_date(cell: &Cell) -> CellDate {
    match cell {
        Cell::Empty => CellDate::Empty,
        Cell::Number(n) if *n == 0.0 => CellDate::Empty,
        Cell::Number(n) => serial_to_date(*n)
            .map(CellDate::Date)
            .unwrap_or_else(|| CellDate::Unparseable(cell.text())),
        Cell::Text(s) if s.trim().is_empty() => CellDate::Empty,
        Cell::Text(s) => parse_date_text(s)
            .map(CellDate::Date)
            .unwrap_or_else(|| CellDate::Unparseable(s.trim().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_serial_epoch() {
        assert_eq!(serial_epoch(), date(1899, 12, 30));
        assert_eq!(serial_to_date(1.0), Some(date(1899, 12, 31)));
    }

    #[test]
    fn test_known_serials() {
        assert_eq!(serial_to_date(45292.0), Some(date(2024, 1, 1)));
        assert_eq!(serial_to_date(45657.0), Some(date(2024, 12, 31)));
        assert_eq!(serial_to_date(45078.0), Some(date(2023, 6, 1)));
    }

    #[test]
    fn test_serial_fraction_is_dropped() {
        assert_eq!(serial_to_date(45505.99), Some(date(2024, 8, 1)));
    }

    #[test]
    fn test_serial_rejects_non_finite() {
        assert_eq!(serial_to_date(f64::NAN), None);
        assert_eq!(serial_to_date(f64::INFINITY), None);
    }

    #[test]
    fn test_text_formats() {
        assert_eq!(parse_date_text("2024-08-01"), Some(date(2024, 8, 1)));
        assert_eq!(parse_date_text("2024/8/1"), Some(date(2024, 8, 1)));
        assert_eq!(parse_date_text("2024.08.01"), Some(date(2024, 8, 1)));
        assert_eq!(parse_date_text("2024年8月1日"), Some(date(2024, 8, 1)));
        assert_eq!(parse_date_text("20240801"), Some(date(2024, 8, 1)));
        assert_eq!(parse_date_text(" 2024-08-01 "), Some(date(2024, 8, 1)));
    }

    #[test]
    fn test_text_with_time_part() {
        assert_eq!(parse_date_text("2024-08-01 09:30:00"), Some(date(2024, 8, 1)));
        assert_eq!(parse_date_text("2024-08-01T23:59:59"), Some(date(2024, 8, 1)));
        assert_eq!(parse_date_text("2024/08/01 08:00:00"), Some(date(2024, 8, 1)));
    }

    #[test]
    fn test_rfc3339_keeps_written_date() {
        assert_eq!(
            parse_date_text("2024-08-01T00:30:00+08:00"),
            Some(date(2024, 8, 1))
        );
    }

    #[test]
    fn test_text_serial() {
        assert_eq!(parse_date_text("45292"), Some(date(2024, 1, 1)));
    }

    #[test]
    fn test_unparseable_text() {
        assert_eq!(parse_date_text("尚未到職"), None);
        assert_eq!(parse_date_text("2024-13-01"), None);
        assert_eq!(parse_date_text(""), None);
    }

    #[test]
    fn test_parse_cell_date_variants() {
        assert_eq!(
            parse_cell_date(&Cell::Number(45505.0)),
            CellDate::Date(date(2024, 8, 1))
        );
        assert_eq!(parse_cell_date(&Cell::Number(0.0)), CellDate::Empty);
        assert_eq!(parse_cell_date(&Cell::from("   ")), CellDate::Empty);
        assert_eq!(
            parse_cell_date(&Cell::from("明年")),
            CellDate::Unparseable("明年".to_string())
        );
    }

    #[test]
    fn test_cell_date_accessor() {
        assert_eq!(CellDate::Unparseable("x".to_string()).date(), None);
        assert_eq!(CellDate::Empty.date(), None);
        assert_eq!(CellDate::Date(date(2024, 1, 1)).date(), Some(date(2024, 1, 1)));
    }
}
