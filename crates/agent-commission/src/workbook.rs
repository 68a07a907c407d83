//! Spreadsheet codec boundary
//!
//! Reading turns the first worksheet of an Excel file (or a CSV export) into
//! `RawRow`s. Writing serializes a `ReportOutput` as a styled `.xlsx` or a
//! `.csv`, and the table itself as JSON.

use calamine::{open_workbook_auto, Data, Reader};
use chrono::{NaiveDate, NaiveDateTime};
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::cell::{datetime_to_excel_serial, excel_serial_to_datetime, CellValue};
use crate::commission::CommissionRow;
use crate::constants;
use crate::error::{CommissionError, CommissionResult};
use crate::normalize::RawRow;
use crate::reports::{CellFormat, ReportCell, ReportOutput};

// =============================================================================
// Reading
// =============================================================================

/// Rows of the first worksheet of a file
#[derive(Debug, Clone, Default)]
pub struct DecodedSheet {
    pub sheet_name: String,
    pub rows: Vec<RawRow>,
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default()
}

/// Whether the decoder can read this file, judged by extension
pub fn is_supported(path: &Path) -> bool {
    let ext = extension(path);
    constants::EXCEL_EXTENSIONS.contains(&ext.as_str()) || ext == constants::CSV_EXTENSION
}

/// Decode the first worksheet of `path` into raw rows
pub fn read_sheet(path: &Path) -> CommissionResult<DecodedSheet> {
    if !is_supported(path) {
        return Err(CommissionError::UnsupportedFile(path.display().to_string()));
    }
    let sheet = if extension(path) == constants::CSV_EXTENSION {
        read_csv(path)?
    } else {
        read_excel(path)?
    };

    debug!(
        sheet = %sheet.sheet_name,
        rows = sheet.rows.len(),
        "decoded {}",
        path.display()
    );
    Ok(sheet)
}

fn read_excel(path: &Path) -> CommissionResult<DecodedSheet> {
    let mut workbook = open_workbook_auto(path).map_err(|e| CommissionError::decode(path, e))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| CommissionError::decode(path, "workbook has no worksheets"))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| CommissionError::decode(path, e))?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(DecodedSheet {
            sheet_name,
            rows: Vec::new(),
        });
    };

    let headers = unique_headers(header_row.iter().map(|d| cell_from_data(d).as_text()));
    let rows = rows
        .map(|row| row.iter().map(cell_from_data).collect::<Vec<_>>())
        .filter(|cells| !cells.iter().all(CellValue::is_blank))
        .map(|cells| raw_row(&headers, cells))
        .collect();

    Ok(DecodedSheet { sheet_name, rows })
}

fn read_csv(path: &Path) -> CommissionResult<DecodedSheet> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| CommissionError::decode(path, e))?;

    let headers = unique_headers(
        rdr.headers()
            .map_err(|e| CommissionError::decode(path, e))?
            .iter()
            .map(str::to_string),
    );

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| CommissionError::decode(path, e))?;
        let cells: Vec<CellValue> = record.iter().map(csv_cell).collect();
        if cells.iter().all(CellValue::is_blank) {
            continue;
        }
        rows.push(raw_row(&headers, cells));
    }

    let sheet_name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(constants::NO_SHEET_NAME)
        .to_string();

    Ok(DecodedSheet { sheet_name, rows })
}

/// Pair every header with its cell; short rows are padded with blanks
fn raw_row(headers: &[String], cells: Vec<CellValue>) -> RawRow {
    let mut row = RawRow::new();
    let mut cells = cells.into_iter();
    for header in headers {
        row.push(header.as_str(), cells.next().unwrap_or_default());
    }
    row
}

/// Make header names usable as record keys: blank headers become `__EMPTY`,
/// `__EMPTY_1`, ... and repeated names get `_1`, `_2` suffixes.
pub fn unique_headers(raw: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    raw.map(|name| {
        let base = if name.is_empty() {
            "__EMPTY".to_string()
        } else {
            name
        };
        let count = seen.entry(base.clone()).or_insert(0);
        let unique = if *count == 0 {
            base
        } else {
            format!("{}_{}", base, count)
        };
        *count += 1;
        unique
    })
    .collect()
}

fn cell_from_data(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            excel_serial_to_datetime(serial)
                .map(CellValue::Date)
                .unwrap_or(CellValue::Number(serial))
        }
        Data::DateTimeIso(s) => parse_iso_datetime(s)
            .map(CellValue::Date)
            .unwrap_or_else(|| CellValue::Text(s.clone())),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn csv_cell(field: &str) -> CellValue {
    if field.is_empty() {
        return CellValue::Empty;
    }
    match field.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => CellValue::Number(n),
        _ => CellValue::Text(field.to_string()),
    }
}

// =============================================================================
// Writing
// =============================================================================

/// Replace characters that are not allowed in file names
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c if c.is_control() => '-',
            c => c,
        })
        .collect()
}

/// `<dir>/<sanitized name>.<ext>`
pub fn output_path(dir: &Path, file_name: &str, ext: &str) -> PathBuf {
    dir.join(format!("{}.{}", sanitize_file_name(file_name), ext))
}

/// Cell formats of the styled report
struct ReportStyles {
    title: Format,
    plain: Format,
    currency: Format,
    percent: Format,
    number: Format,
    date: Format,
    total: Format,
    total_currency: Format,
    total_percent: Format,
    total_number: Format,
}

impl ReportStyles {
    fn new() -> Self {
        let total = Format::new()
            .set_bold()
            .set_background_color(constants::TOTAL_BACKGROUND)
            .set_border_top(FormatBorder::Medium);

        Self {
            title: Format::new()
                .set_bold()
                .set_font_color(constants::TITLE_FONT)
                .set_background_color(constants::TITLE_BACKGROUND)
                .set_align(FormatAlign::Center),
            plain: Format::new(),
            currency: Format::new().set_num_format(constants::CURRENCY_NUM_FORMAT),
            percent: Format::new().set_num_format(constants::PERCENT_NUM_FORMAT),
            number: Format::new().set_num_format(constants::NUMBER_NUM_FORMAT),
            date: Format::new().set_num_format(constants::DATE_NUM_FORMAT),
            total_currency: total.clone().set_num_format(constants::CURRENCY_NUM_FORMAT),
            total_percent: total.clone().set_num_format(constants::PERCENT_NUM_FORMAT),
            total_number: total.clone().set_num_format(constants::NUMBER_NUM_FORMAT),
            total,
        }
    }

    fn data(&self, cell: &ReportCell) -> &Format {
        if matches!(cell.value, CellValue::Date(_)) {
            return &self.date;
        }
        match cell.format {
            CellFormat::Currency => &self.currency,
            CellFormat::Percentage => &self.percent,
            CellFormat::PlainNumber => &self.number,
            CellFormat::Label | CellFormat::Blank => &self.plain,
        }
    }

    fn total(&self, cell: &ReportCell) -> &Format {
        match cell.format {
            CellFormat::Currency => &self.total_currency,
            CellFormat::Percentage => &self.total_percent,
            CellFormat::PlainNumber => &self.total_number,
            CellFormat::Label | CellFormat::Blank => &self.total,
        }
    }
}

fn write_cell(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &ReportCell,
    format: &Format,
) -> Result<(), XlsxError> {
    match &cell.value {
        CellValue::Empty => sheet.write_blank(row, col, format)?,
        CellValue::Number(n) => sheet.write_number_with_format(row, col, *n, format)?,
        CellValue::Text(s) => sheet.write_string_with_format(row, col, s, format)?,
        CellValue::Bool(b) => sheet.write_boolean_with_format(row, col, *b, format)?,
        CellValue::Date(dt) => {
            sheet.write_number_with_format(row, col, datetime_to_excel_serial(dt), format)?
        }
    };

    Ok(())
}

fn write_report_sheet(sheet: &mut Worksheet, report: &ReportOutput) -> Result<(), XlsxError> {
    let styles = ReportStyles::new();
    sheet.set_name(&report.sheet_name)?;

    for (col, header) in report.header.iter().enumerate() {
        let col = col as u16;
        sheet.write_string_with_format(0, col, header, &styles.title)?;
        if let Some(width) = report.column_widths.get(col as usize) {
            sheet.set_column_width(col, *width as f64)?;
        }
    }

    for (i, row) in report.rows.iter().enumerate() {
        let r = (i + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            write_cell(sheet, r, col as u16, cell, styles.data(cell))?;
        }
    }

    let total_row = (report.rows.len() + 1) as u32;
    for (col, cell) in report.total.iter().enumerate() {
        write_cell(sheet, total_row, col as u16, cell, styles.total(cell))?;
    }

    Ok(())
}

/// Write the report as a styled Excel workbook
pub fn write_xlsx(report: &ReportOutput, path: &Path) -> CommissionResult<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    write_report_sheet(sheet, report).map_err(|e| CommissionError::encode(path, e))?;
    workbook
        .save(path)
        .map_err(|e| CommissionError::encode(path, e))?;

    info!(rows = report.rows.len(), "wrote {}", path.display());
    Ok(())
}

/// Write the report as CSV with display-formatted cells
pub fn write_report_csv(report: &ReportOutput, path: &Path) -> CommissionResult<()> {
    let encode = |e: csv::Error| CommissionError::encode(path, e);
    let mut wtr = csv::Writer::from_path(path).map_err(encode)?;

    wtr.write_record(&report.header).map_err(encode)?;
    for row in &report.rows {
        wtr.write_record(row.iter().map(ReportCell::render))
            .map_err(encode)?;
    }
    wtr.write_record(report.total.iter().map(ReportCell::render))
        .map_err(encode)?;

    wtr.flush().map_err(|e| CommissionError::encode(path, e))?;
    info!(rows = report.rows.len(), "wrote {}", path.display());
    Ok(())
}

/// Write the table as a pretty-printed JSON array of records
pub fn write_json(table: &[CommissionRow], path: &Path) -> CommissionResult<()> {
    let json = serde_json::to_string_pretty(table).map_err(|e| CommissionError::encode(path, e))?;
    std::fs::write(path, json).map_err(|e| CommissionError::encode(path, e))?;

    info!(rows = table.len(), "wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::sheet::process;

    const WORKSHEET_CSV: &str = "\
CodArt, Articulo ,Cantidad#sumar,TOTAL sin IVA#sumar,UTIL_porc,Vendedor
A1,Widget,10,1000,20,Ana
,,,,,
B2,Gadget,1,500,N/A,Ana
";

    fn write_input(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn october() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn test_unique_headers() {
        let headers = unique_headers(
            ["A", "", "A", "", "B", "A"].iter().map(|s| s.to_string()),
        );
        assert_eq!(headers, vec!["A", "__EMPTY", "A_1", "__EMPTY_1", "B", "A_2"]);
    }

    #[test]
    fn test_cell_from_data() {
        assert_eq!(cell_from_data(&Data::Int(3)), CellValue::Number(3.0));
        assert_eq!(cell_from_data(&Data::Empty), CellValue::Empty);
        assert_eq!(
            cell_from_data(&Data::String("Ana".into())),
            CellValue::from("Ana")
        );
        assert_eq!(
            cell_from_data(&Data::DateTimeIso("2024-03-05".into())),
            CellValue::Date(
                NaiveDate::from_ymd_opt(2024, 3, 5)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap()
            )
        );
    }

    #[test]
    fn test_unsupported_extension() {
        let err = read_sheet(Path::new("notes.txt")).unwrap_err();
        assert!(matches!(err, CommissionError::UnsupportedFile(_)));
        assert!(is_supported(Path::new("ventas.XLSX")));
        assert!(!is_supported(Path::new("ventas")));
    }

    #[test]
    fn test_missing_file_is_decode_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_sheet(&dir.path().join("missing.xlsx")).unwrap_err();
        assert!(matches!(err, CommissionError::Decode { .. }));
    }

    #[test]
    fn test_read_csv_worksheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_input(dir.path(), "ventas.csv", WORKSHEET_CSV);

        let decoded = read_sheet(&path).unwrap();
        assert_eq!(decoded.sheet_name, "ventas");
        assert_eq!(decoded.rows.len(), 2);
        assert_eq!(decoded.rows[0].get(" Articulo "), Some(&CellValue::from("Widget")));
        assert_eq!(decoded.rows[0].get("UTIL_porc"), Some(&CellValue::Number(20.0)));
        assert_eq!(decoded.rows[1].get("UTIL_porc"), Some(&CellValue::from("N/A")));

        let sheet = process(&decoded.rows);
        assert!(sheet.all_headers.contains(&"Articulo".to_string()));
        assert!((sheet.table[0].commission.earned_amount - 15.0).abs() < 1e-9);
        assert_eq!(sheet.table[1].commission.earned_amount, 0.0);
        assert_eq!(sheet.table[1].sequence(), 2);
    }

    #[test]
    fn test_xlsx_report_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "ventas.csv", WORKSHEET_CSV);
        let sheet = process(&read_sheet(&input).unwrap().rows);
        let report =
            crate::reports::export(&sheet.table, &sheet.projection, &Config::default(), october());

        let path = output_path(dir.path(), &report.file_name, "xlsx");
        assert!(path.ends_with("Ana - octubre 2026.xlsx"));
        write_xlsx(&report, &path).unwrap();

        let written = read_sheet(&path).unwrap();
        assert_eq!(written.sheet_name, "Reporte");
        // two data rows plus the total row
        assert_eq!(written.rows.len(), 3);
        assert_eq!(written.rows[0].get("MONTO GANADO"), Some(&CellValue::Number(15.0)));
        assert_eq!(written.rows[2].get("CodArt"), Some(&CellValue::from("TOTAL")));
        assert_eq!(written.rows[2].get("MONTO GANADO"), Some(&CellValue::Number(15.0)));
        assert_eq!(written.rows[2].get("COLUMNA 3"), Some(&CellValue::Empty));
    }

    #[test]
    fn test_csv_report() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "ventas.csv", WORKSHEET_CSV);
        let sheet = process(&read_sheet(&input).unwrap().rows);
        let report =
            crate::reports::export(&sheet.table, &sheet.projection, &Config::default(), october());

        let path = output_path(dir.path(), &report.file_name, "csv");
        write_report_csv(&report, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("CodArt,Articulo,"));
        assert!(lines[1].contains("$15,00") || lines[1].contains("\"$15,00\""));
        assert!(lines[1].contains("1.50%"));
        assert!(lines[3].starts_with("TOTAL,"));
    }

    #[test]
    fn test_json_export_omits_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "ventas.csv", WORKSHEET_CSV);
        let sheet = process(&read_sheet(&input).unwrap().rows);

        let path = dir.path().join("datos.json");
        write_json(&sheet.table, &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let records = value.as_array().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["Articulo"], "Widget");
        assert_eq!(records[0]["MONTO GANADO"], 15.0);
        assert!(records[0].get("sequence").is_none());
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("Ana/Luis - octubre 2026"), "Ana-Luis - octubre 2026");
        assert_eq!(sanitize_file_name("a:b*c?"), "a-b-c-");
    }
}
