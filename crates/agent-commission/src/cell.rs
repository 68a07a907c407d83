//! Cell values read from a worksheet and the numeric coercion applied to them

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};

/// A single worksheet cell.
///
/// Worksheets carry whatever the author typed, so every column may mix
/// numbers, text, dates and blanks.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
    Date(NaiveDateTime),
}

impl CellValue {
    /// Coerce to a number for arithmetic.
    ///
    /// Never fails: blanks, unparsable text and non-finite values all become 0.
    /// Dates become their Excel serial number.
    pub fn to_number(&self) -> f64 {
        match self {
            CellValue::Empty => 0.0,
            CellValue::Number(n) if n.is_nan() => 0.0,
            CellValue::Number(n) => *n,
            CellValue::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            CellValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return 0.0;
                }
                match trimmed.parse::<f64>() {
                    Ok(n) if n.is_finite() => n,
                    _ => 0.0,
                }
            }
            CellValue::Date(dt) => datetime_to_excel_serial(dt),
        }
    }

    /// True only for number cells; numeric-looking text does not count
    pub fn is_numeric(&self) -> bool {
        matches!(self, CellValue::Number(_))
    }

    /// Empty cell or empty string
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Plain string form of the value, without locale formatting
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(n) => format!("{}", n),
            CellValue::Text(s) => s.clone(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Date(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Empty => serializer.serialize_none(),
            CellValue::Number(n) => serializer.serialize_f64(*n),
            CellValue::Text(s) => serializer.serialize_str(s),
            CellValue::Bool(b) => serializer.serialize_bool(*b),
            CellValue::Date(dt) => {
                serializer.serialize_str(&dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string())
            }
        }
    }
}

/// Day zero of the 1900 date system (Excel counts the fictional 1900-02-29)
fn excel_epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// Convert an Excel serial date (days since 1899-12-30) to a date-time
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let millis = (serial * 86_400_000.0).round() as i64;
    excel_epoch().checked_add_signed(Duration::milliseconds(millis))
}

/// Convert a date-time to its Excel serial number
pub fn datetime_to_excel_serial(dt: &NaiveDateTime) -> f64 {
    (*dt - excel_epoch()).num_milliseconds() as f64 / 86_400_000.0
}
