//! Working session: the loaded worksheet and the table derived from it

use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::commission::CommissionRow;
use crate::config::Config;
use crate::constants::NO_SHEET_NAME;
use crate::error::CommissionResult;
use crate::normalize::RawRow;
use crate::reports::{export, ReportOutput};
use crate::sheet::{process, ProcessedSheet};
use crate::totals;
use crate::workbook;

/// State of one read/edit/export cycle
#[derive(Debug, Default)]
pub struct Session {
    source: Option<PathBuf>,
    sheet_name: String,
    sheet: ProcessedSheet,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a worksheet file, replacing the current table.
    ///
    /// On failure the session keeps its previous contents.
    pub fn read(&mut self, path: &Path) -> CommissionResult<()> {
        let decoded = workbook::read_sheet(path)?;
        self.load(decoded.sheet_name, &decoded.rows);
        self.source = Some(path.to_path_buf());
        info!(
            rows = self.sheet.table.len(),
            sheet = %self.sheet_name,
            "loaded {}",
            path.display()
        );
        Ok(())
    }

    /// Replace the table with already decoded rows
    pub fn load(&mut self, sheet_name: impl Into<String>, rows: &[RawRow]) {
        self.sheet = process(rows);
        self.sheet_name = sheet_name.into();
        self.source = None;
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn sheet(&self) -> &ProcessedSheet {
        &self.sheet
    }

    pub fn table(&self) -> &[CommissionRow] {
        &self.sheet.table
    }

    pub fn all_headers(&self) -> &[String] {
        &self.sheet.all_headers
    }

    pub fn projection(&self) -> &[String] {
        &self.sheet.projection
    }

    /// Name of the loaded worksheet, `N/A` when nothing is loaded
    pub fn sheet_name(&self) -> &str {
        if self.sheet_name.is_empty() {
            NO_SHEET_NAME
        } else {
            &self.sheet_name
        }
    }

    pub fn total_earned(&self) -> f64 {
        totals::total_earned(&self.sheet.table)
    }

    pub fn total_adjusted(&self) -> f64 {
        totals::total_adjusted(&self.sheet.table)
    }

    /// Delete a row (0-based index) after the user confirmed it
    pub fn delete_row(&mut self, index: usize) -> CommissionResult<CommissionRow> {
        let removed = totals::delete_row(&mut self.sheet.table, index)?;
        info!(sequence = removed.sequence(), "deleted row");
        Ok(removed)
    }

    /// Drop everything loaded
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Build the export report for the current table
    pub fn report(&self, config: &Config, today: NaiveDate) -> ReportOutput {
        export(&self.sheet.table, &self.sheet.projection, config, today)
    }
}
