//! Report generation: header row, data rows and total row with per-cell formats

use chrono::{Datelike, NaiveDate};

use crate::cell::CellValue;
use crate::commission::CommissionRow;
use crate::config::Config;
use crate::constants::{
    ADJUSTED_TOTAL_HEADER, AGENT_COLUMN_MIN, COL_AGENT, COL_EARNED_AMOUNT, COL_ITEM_CODE,
    COL_ITEM_NAME, COLUMN_PADDING, DEFAULT_COLUMN_MIN, ITEM_NAME_COLUMN_MIN, TOTAL_LABEL,
};
use crate::display::{
    format_currency, format_decimal, format_for_display, format_percent, month_name,
};
use crate::totals::{total_adjusted, total_earned};

/// How a report cell is formatted when serialized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellFormat {
    Currency,
    Percentage,
    PlainNumber,
    Label,
    Blank,
}

impl CellFormat {
    /// Format for a cell under `header` holding `value`.
    ///
    /// Header substrings decide first: MONTO, TOTAL or COLUMNA mean currency,
    /// then % or UTIL mean percentage. Otherwise the value type decides.
    pub fn for_cell(header: &str, value: &CellValue) -> Self {
        if value.is_blank() {
            return CellFormat::Blank;
        }
        if ["MONTO", "TOTAL", "COLUMNA"].iter().any(|k| header.contains(k)) {
            CellFormat::Currency
        } else if header.contains('%') || header.contains("UTIL") {
            CellFormat::Percentage
        } else if value.is_numeric() {
            CellFormat::PlainNumber
        } else {
            CellFormat::Label
        }
    }

    /// Text form used by plain-text report outputs
    pub fn render(&self, value: &CellValue) -> String {
        match (self, value) {
            (CellFormat::Blank, _) => String::new(),
            (CellFormat::Currency, CellValue::Number(n)) => format_currency(*n),
            (CellFormat::Percentage, CellValue::Number(n)) => format_percent(*n),
            (CellFormat::PlainNumber, CellValue::Number(n)) => format_decimal(*n),
            (_, CellValue::Text(s)) => s.trim().to_string(),
            (_, other) => format_for_display(other),
        }
    }
}

/// One formatted cell of the report
#[derive(Debug, Clone, PartialEq)]
pub struct ReportCell {
    pub value: CellValue,
    pub format: CellFormat,
}

impl ReportCell {
    fn new(header: &str, value: CellValue) -> Self {
        let format = CellFormat::for_cell(header, &value);
        Self { value, format }
    }

    fn blank() -> Self {
        Self {
            value: CellValue::Empty,
            format: CellFormat::Blank,
        }
    }

    pub fn render(&self) -> String {
        self.format.render(&self.value)
    }
}

/// Report ready to hand to a spreadsheet or text encoder
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOutput {
    /// Output file name without extension
    pub file_name: String,
    pub sheet_name: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<ReportCell>>,
    pub total: Vec<ReportCell>,
    /// Width hint per column, in characters
    pub column_widths: Vec<usize>,
}

/// Build the report for the table's projected columns.
///
/// `today` names the file; it is the export date, not a date from the data.
pub fn export(
    table: &[CommissionRow],
    projection: &[String],
    config: &Config,
    today: NaiveDate,
) -> ReportOutput {
    let rows = table
        .iter()
        .map(|row| {
            projection
                .iter()
                .map(|header| ReportCell::new(header, row.value(header)))
                .collect()
        })
        .collect();

    ReportOutput {
        file_name: report_file_name(table, &config.fallback_agent, today),
        sheet_name: config.sheet_name.clone(),
        header: projection.to_vec(),
        rows,
        total: total_row(table, projection),
        column_widths: projection.iter().map(String::as_str).map(column_width).collect(),
    }
}

/// Trailing row with the commission sums and the TOTAL label
fn total_row(table: &[CommissionRow], projection: &[String]) -> Vec<ReportCell> {
    projection
        .iter()
        .map(|header| match header.as_str() {
            COL_EARNED_AMOUNT => ReportCell::new(header, CellValue::Number(total_earned(table))),
            // Compared against ADJUSTED_TOTAL_HEADER, never the real adjusted
            // column name, so the adjusted total cell is left blank.
            ADJUSTED_TOTAL_HEADER => {
                ReportCell::new(header, CellValue::Number(total_adjusted(table)))
            }
            COL_ITEM_CODE => ReportCell {
                value: CellValue::from(TOTAL_LABEL),
                format: CellFormat::Label,
            },
            _ => ReportCell::blank(),
        })
        .collect()
}

/// Column width hint: header length plus padding, never below the
/// column's minimum
pub fn column_width(header: &str) -> usize {
    let minimum = match header {
        COL_ITEM_NAME => ITEM_NAME_COLUMN_MIN,
        COL_AGENT => AGENT_COLUMN_MIN,
        _ => DEFAULT_COLUMN_MIN,
    };
    (header.chars().count() + COLUMN_PADDING).max(minimum)
}

/// `"{agent} - {month} {year}"`, with the agent taken from the first row
pub fn report_file_name(table: &[CommissionRow], fallback_agent: &str, today: NaiveDate) -> String {
    let agent = table
        .first()
        .map(|row| row.value(COL_AGENT).as_text().trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| fallback_agent.to_string());

    format!("{} - {} {}", agent, month_name(today.month()), today.year())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::RawRow;
    use crate::sheet::{process, ProcessedSheet};

    fn sheet(agents: &[&str]) -> ProcessedSheet {
        let rows: Vec<RawRow> = agents
            .iter()
            .enumerate()
            .map(|(i, agent)| {
                [
                    ("CodArt", CellValue::from(format!("A{}", i + 1).as_str())),
                    ("Articulo", "Widget".into()),
                    ("Cantidad#sumar", 10.0.into()),
                    ("TOTAL sin IVA#sumar", 1000.0.into()),
                    ("UTIL_porc", 20.0.into()),
                    ("Vendedor", CellValue::from(*agent)),
                ]
                .into_iter()
                .collect()
            })
            .collect();
        process(&rows)
    }

    fn october() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn test_report_layout() {
        let sheet = sheet(&["Ana", "Ana"]);
        let report = export(&sheet.table, &sheet.projection, &Config::default(), october());

        assert_eq!(report.header, sheet.projection);
        assert_eq!(report.rows.len(), 2);
        assert!(report.rows.iter().all(|r| r.len() == report.header.len()));
        assert_eq!(report.total.len(), report.header.len());
        assert_eq!(report.sheet_name, "Reporte");
        assert_eq!(report.rows[1][0].value, CellValue::from("A2"));
    }

    #[test]
    fn test_total_row() {
        let sheet = sheet(&["Ana", "Ana"]);
        let report = export(&sheet.table, &sheet.projection, &Config::default(), october());
        let col = |name: &str| report.header.iter().position(|h| h == name).unwrap();

        assert_eq!(report.total[col("CodArt")].value, CellValue::from("TOTAL"));
        assert_eq!(report.total[col("MONTO GANADO")].value, CellValue::Number(30.0));
        assert_eq!(report.total[col("MONTO GANADO")].format, CellFormat::Currency);
        assert_eq!(report.total[col("Articulo")].format, CellFormat::Blank);
    }

    #[test]
    fn test_adjusted_total_cell_stays_blank() {
        // Known discrepancy: the total row looks for "COLUMNA TRES" while the
        // derived column is "COLUMNA 3", so no adjusted total is emitted.
        let sheet = sheet(&["Ana"]);
        let report = export(&sheet.table, &sheet.projection, &Config::default(), october());
        let col = report.header.iter().position(|h| h == "COLUMNA 3").unwrap();

        assert_eq!(report.total[col], ReportCell::blank());
        assert!((total_adjusted(&sheet.table) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_cell_formats() {
        let num = CellValue::Number(12.0);
        let text = CellValue::from("Widget");

        assert_eq!(CellFormat::for_cell("MONTO GANADO", &num), CellFormat::Currency);
        assert_eq!(CellFormat::for_cell("TOTAL sin IVA#sumar", &num), CellFormat::Currency);
        assert_eq!(CellFormat::for_cell("COLUMNA 3", &num), CellFormat::Currency);
        assert_eq!(CellFormat::for_cell("% UTIL GANADA", &num), CellFormat::Percentage);
        assert_eq!(CellFormat::for_cell("UTIL_porc", &num), CellFormat::Percentage);
        assert_eq!(CellFormat::for_cell("Cantidad#sumar", &num), CellFormat::PlainNumber);
        assert_eq!(CellFormat::for_cell("Articulo", &text), CellFormat::Label);
        assert_eq!(CellFormat::for_cell("MONTO GANADO", &CellValue::Empty), CellFormat::Blank);
    }

    #[test]
    fn test_render_by_format() {
        assert_eq!(CellFormat::Currency.render(&CellValue::Number(1500.0)), "$1500,00");
        assert_eq!(CellFormat::Percentage.render(&CellValue::Number(0.015)), "1.50%");
        assert_eq!(CellFormat::PlainNumber.render(&CellValue::Number(10.0)), "10,00");
        assert_eq!(CellFormat::Label.render(&CellValue::from(" Ana ")), "Ana");
        assert_eq!(CellFormat::Blank.render(&CellValue::Number(3.0)), "");
    }

    #[test]
    fn test_column_widths() {
        assert_eq!(column_width("Articulo"), 40);
        assert_eq!(column_width("Vendedor"), 30);
        assert_eq!(column_width("CodArt"), 15);
        assert_eq!(column_width("TOTAL sin IVA#sumar"), 23);
    }

    #[test]
    fn test_file_name_uses_first_agent_and_export_date() {
        let sheet = sheet(&["  Ana ", "Luis"]);
        assert_eq!(
            report_file_name(&sheet.table, "Sin vendedor", october()),
            "Ana - octubre 2026"
        );
    }

    #[test]
    fn test_file_name_fallback() {
        assert_eq!(
            report_file_name(&[], "Sin vendedor", october()),
            "Sin vendedor - octubre 2026"
        );

        let blank = sheet(&["   "]);
        assert_eq!(
            report_file_name(&blank.table, "Sin vendedor", october()),
            "Sin vendedor - octubre 2026"
        );
    }
}
