//! Sheet processing: raw rows to the commission table and its display columns

use tracing::debug;

use crate::commission::{derive, CommissionRow};
use crate::constants::{DERIVED_HEADERS, PREFERRED_COLUMNS};
use crate::normalize::{HeaderMap, RawRow};

/// Ordered commission rows; row order is the worksheet's row order
pub type Table = Vec<CommissionRow>;

/// Result of processing one worksheet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessedSheet {
    pub table: Table,
    /// Every canonical header of the worksheet, in column order
    pub all_headers: Vec<String>,
    /// Columns to show and export
    pub projection: Vec<String>,
}

/// Normalize and derive every row, then pick the display columns.
///
/// Headers come from the first row, as the decoder emits the same header set
/// for every row. Empty input gives an empty sheet, not an error.
pub fn process(raw_rows: &[RawRow]) -> ProcessedSheet {
    let Some(first) = raw_rows.first() else {
        return ProcessedSheet::default();
    };

    let headers = HeaderMap::from_row(first);
    let table: Table = raw_rows
        .iter()
        .enumerate()
        .map(|(index, raw)| derive(headers.normalize(raw, index)))
        .collect();

    let all_headers = headers.canonical().to_vec();
    let projection = display_projection(&all_headers);

    debug!(rows = table.len(), "processed worksheet rows");
    debug!(?all_headers, "all headers");
    debug!(?projection, "displayed headers");

    ProcessedSheet {
        table,
        all_headers,
        projection,
    }
}

/// Preferred columns present in the worksheet, plus the derived columns,
/// in preferred-column order
pub fn display_projection(all_headers: &[String]) -> Vec<String> {
    PREFERRED_COLUMNS
        .iter()
        .filter(|&&column| {
            all_headers.iter().any(|h| h == column) || DERIVED_HEADERS.contains(&column)
        })
        .map(|column| column.to_string())
        .collect()
}
