//! Spreadsheet cell model.
//!
//! Exported spreadsheets mix text, numbers and blanks freely in the same
//! column. [`Cell`] keeps that as a tagged union and every conversion out of
//! it has a documented default instead of implicit coercion.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single decoded spreadsheet cell.
///
/// # Example
///
/// ```
/// use appraisal_engine::models::Cell;
///
/// assert_eq!(Cell::Number(1001.0).text(), "1001");
/// assert_eq!(Cell::Text(" 3 ".to_string()).text(), "3");
/// assert!(Cell::Empty.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Cell {
    /// Text content, kept exactly as decoded.
    Text(String),
    /// Numeric content, including date serials.
    Number(f64),
    /// No content.
    #[default]
    Empty,
}

/// A row of cells, in column order.
pub type Row = Vec<Cell>;

impl Cell {
    /// Returns true for [`Cell::Empty`] and for text that is blank after trimming.
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }

    /// Returns the cell as trimmed text.
    ///
    /// Integral numbers render without a fractional part, so an identifier
    /// stored as `1001.0` reads as `"1001"`. Empty cells read as `""`.
    pub fn text(&self) -> String {
        match self {
            Cell::Text(s) => s.trim().to_string(),
            Cell::Number(n) => format_number(*n),
            Cell::Empty => String::new(),
        }
    }

    /// Returns true if the cell's text contains `keyword` as a substring.
    pub fn contains(&self, keyword: &str) -> bool {
        match self {
            Cell::Text(s) => s.contains(keyword),
            Cell::Number(n) => format_number(*n).contains(keyword),
            Cell::Empty => false,
        }
    }

    /// Returns true if the cell's trimmed text equals `keyword`.
    pub fn equals(&self, keyword: &str) -> bool {
        !self.is_empty() && self.text() == keyword.trim()
    }

    /// Reads the cell as a non-negative hour quantity.
    ///
    /// Numbers are taken as-is. Text is parsed leniently: the longest leading
    /// numeric prefix is used, so `"12.5 小時"` reads as 12.5. Returns `None`
    /// for empty cells, text without a numeric prefix and negative values;
    /// callers default those to zero.
    pub fn hours(&self) -> Option<Decimal> {
        let value = match self {
            Cell::Number(n) => Decimal::try_from(*n).ok()?.normalize(),
            Cell::Text(s) => parse_leading_decimal(s)?,
            Cell::Empty => return None,
        };
        (value >= Decimal::ZERO).then_some(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value.to_string())
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Parses the longest prefix of `s` (after leading whitespace) that forms a
/// decimal number: optional sign, digits, optional fraction, optional
/// exponent (`1.8e2` reads as 180).
fn parse_leading_decimal(s: &str) -> Option<Decimal> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let digits_start = end;
    end = skip_digits(bytes, end);
    let mut has_digits = end > digits_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let fraction_start = end + 1;
        let fraction_end = skip_digits(bytes, fraction_start);
        // "12." keeps the integral part only
        if fraction_end > fraction_start {
            has_digits = true;
            end = fraction_end;
        }
    }
    if !has_digits {
        return None;
    }

    let candidate = s[..end].trim_start_matches('+');
    let mantissa = if candidate.starts_with('.') || candidate.starts_with("-.") {
        candidate.replacen('.', "0.", 1)
    } else {
        candidate.to_string()
    };

    match parse_exponent(bytes, end) {
        Some(exponent) => Decimal::from_scientific(&format!("{}e{}", mantissa, exponent))
            .ok()
            .map(|d| d.normalize()),
        None => mantissa.parse::<Decimal>().ok(),
    }
}

fn skip_digits(bytes: &[u8], mut index: usize) -> usize {
    while index < bytes.len() && bytes[index].is_ascii_digit() {
        index += 1;
    }
    index
}

/// Reads `[eE][+-]?digits` at `start`; a bare `e` is not an exponent.
fn parse_exponent(bytes: &[u8], start: usize) -> Option<String> {
    if !matches!(bytes.get(start), Some(b'e') | Some(b'E')) {
        return None;
    }
    let mut index = start + 1;
    let negative = match bytes.get(index) {
        Some(b'-') => {
            index += 1;
            true
        }
        Some(b'+') => {
            index += 1;
            false
        }
        _ => false,
    };
    let digits_end = skip_digits(bytes, index);
    if digits_end == index {
        return None;
    }
    let digits = std::str::from_utf8(&bytes[index..digits_end]).ok()?;
    Some(if negative {
        format!("-{}", digits)
    } else {
        digits.to_string()
    })
}
