//! Display formatting (es-ES) and console table rendering

use chrono::{Datelike, NaiveDateTime};
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::cell::CellValue;
use crate::constants::EMPTY_DISPLAY;
use crate::sheet::ProcessedSheet;

/// Spanish month names, January first
const MONTH_NAMES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Full es-ES name of a month (1-12)
pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("")
}

/// Format a number es-ES style with two decimals: `15.000,00`.
///
/// Spanish only groups thousands when the integer part has five or more
/// digits, so 1500 stays `1500,00`.
pub fn format_decimal(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let grouped = if int_part.len() >= 5 {
        group_thousands(int_part, '.')
    } else {
        int_part.to_string()
    };

    let negative = value < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0');
    format!("{}{},{}", if negative { "-" } else { "" }, grouped, frac_part)
}

fn group_thousands(digits: &str, separator: char) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}

/// Currency amount: `$15.000,00`
pub fn format_currency(value: f64) -> String {
    let decimal = format_decimal(value);
    match decimal.strip_prefix('-') {
        Some(unsigned) => format!("-${}", unsigned),
        None => format!("${}", decimal),
    }
}

/// Fraction as a percentage with two decimals: 0.015 -> `1.50%`
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// Date as es-ES short date: `15/3/2024`
pub fn format_date(value: &NaiveDateTime) -> String {
    format!("{}/{}/{}", value.day(), value.month(), value.year())
}

/// Render a cell for on-screen display.
///
/// Numbers strictly between 0 and 1 are shown as percentages; anything with
/// magnitude of at least 1 as an es-ES amount; the rest with four decimals.
pub fn format_for_display(value: &CellValue) -> String {
    match value {
        CellValue::Empty => EMPTY_DISPLAY.to_string(),
        CellValue::Text(s) if s.is_empty() => EMPTY_DISPLAY.to_string(),
        CellValue::Text(s) => s.trim().to_string(),
        CellValue::Number(n) => {
            if *n > 0.0 && *n < 1.0 {
                format_percent(*n)
            } else if n.abs() >= 1.0 {
                format_decimal(*n)
            } else {
                // `-0.0 + 0.0` is `0.0`, so negative zero prints unsigned
                format!("{:.4}", n + 0.0)
            }
        }
        CellValue::Bool(b) => b.to_string(),
        CellValue::Date(dt) => format_date(dt),
    }
}

/// True when the value should be right-aligned as a number
pub fn is_numeric(value: &CellValue) -> bool {
    value.is_numeric()
}

/// Render the projected table (with a row number column) for the console
pub fn render_table(sheet: &ProcessedSheet) -> String {
    let mut builder = Builder::default();

    let mut header = vec!["#".to_string()];
    header.extend(sheet.projection.iter().cloned());
    builder.push_record(header);

    for row in &sheet.table {
        let mut record = vec![row.sequence().to_string()];
        record.extend(
            sheet
                .projection
                .iter()
                .map(|h| format_for_display(&row.value(h))),
        );
        builder.push_record(record);
    }

    let mut table = builder.build();
    table.with(Style::modern());
    table.to_string()
}
