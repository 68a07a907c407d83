//! Row normalization: raw worksheet records to canonical, numbered rows
//!
//! Values are copied by header position rather than by name. Two original
//! headers that only differ in surrounding whitespace (`" UTIL_porc"` and
//! `"UTIL_porc "`) both keep their column; lookups by canonical name then see
//! the right-most one.

use crate::cell::CellValue;

/// One decoded worksheet row, keyed by the original header text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    cells: Vec<(String, CellValue)>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, header: impl Into<String>, value: CellValue) {
        self.cells.push((header.into(), value));
    }

    /// Value under an original header (exact, untrimmed match)
    pub fn get(&self, header: &str) -> Option<&CellValue> {
        self.nth(header, 0)
    }

    /// Value of the `n`-th column (0-based) named `header`
    fn nth(&self, header: &str, n: usize) -> Option<&CellValue> {
        self.cells
            .iter()
            .filter(|(h, _)| h == header)
            .nth(n)
            .map(|(_, v)| v)
    }

    /// Original headers in column order
    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(h, _)| h.as_str())
    }
}

impl<K: Into<String>, V: Into<CellValue>> FromIterator<(K, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// A row keyed by canonical (trimmed) headers plus its 1-based sequence number
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRow {
    pub sequence: usize,
    cells: Vec<(String, CellValue)>,
}

impl NormalizedRow {
    /// Value under a canonical header; with duplicate headers the last column wins
    pub fn get(&self, header: &str) -> Option<&CellValue> {
        self.cells.iter().rev().find(|(h, _)| h == header).map(|(_, v)| v)
    }

    /// Canonical headers in column order, duplicates included
    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(h, _)| h.as_str())
    }

    pub fn cells(&self) -> &[(String, CellValue)] {
        &self.cells
    }
}

/// Trim every header once, keeping positions
pub fn canonical_headers(original: &[String]) -> Vec<String> {
    original.iter().map(|h| h.trim().to_string()).collect()
}

/// Original-to-canonical header mapping shared by every row of a sheet
#[derive(Debug, Clone, Default)]
pub struct HeaderMap {
    original: Vec<String>,
    canonical: Vec<String>,
}

impl HeaderMap {
    pub fn new(original: Vec<String>) -> Self {
        let canonical = canonical_headers(&original);
        Self {
            original,
            canonical,
        }
    }

    /// Build the mapping from the headers of a sample row (the sheet's first)
    pub fn from_row(raw: &RawRow) -> Self {
        Self::new(raw.headers().map(str::to_string).collect())
    }

    pub fn canonical(&self) -> &[String] {
        &self.canonical
    }

    /// Normalize one row; `index` is the 0-based position in the sheet.
    ///
    /// The k-th column named `h` in the mapping takes the k-th column named
    /// `h` in the row, so repeated names keep their own values.
    pub fn normalize(&self, raw: &RawRow, index: usize) -> NormalizedRow {
        let cells = self
            .original
            .iter()
            .enumerate()
            .zip(&self.canonical)
            .map(|((position, original), canonical)| {
                let occurrence = self.original[..position]
                    .iter()
                    .filter(|h| *h == original)
                    .count();
                let value = raw.nth(original, occurrence).cloned().unwrap_or_default();
                (canonical.clone(), value)
            })
            .collect();

        NormalizedRow {
            sequence: index + 1,
            cells,
        }
    }
}

/// Normalize a row using its own headers
pub fn normalize(raw: &RawRow, index: usize) -> NormalizedRow {
    HeaderMap::from_row(raw).normalize(raw, index)
}
