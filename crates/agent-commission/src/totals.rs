//! Column totals and row deletion over the commission table

use crate::commission::CommissionRow;
use crate::constants::{COL_ADJUSTED_AMOUNT, COL_EARNED_AMOUNT};
use crate::error::{CommissionError, CommissionResult};

/// Sum of a column over the current rows; non-numeric cells count as 0
pub fn total_of(table: &[CommissionRow], header: &str) -> f64 {
    table.iter().map(|row| row.value(header).to_number()).sum()
}

/// Total earned commission
pub fn total_earned(table: &[CommissionRow]) -> f64 {
    total_of(table, COL_EARNED_AMOUNT)
}

/// Total adjusted commission
pub fn total_adjusted(table: &[CommissionRow]) -> f64 {
    total_of(table, COL_ADJUSTED_AMOUNT)
}

/// Remove the row at `index` (0-based) and renumber the rest 1..N.
///
/// Only ever called on an explicit, confirmed user request. An out-of-range
/// index leaves the table untouched.
pub fn delete_row(
    table: &mut Vec<CommissionRow>,
    index: usize,
) -> CommissionResult<CommissionRow> {
    if index >= table.len() {
        return Err(CommissionError::IndexOutOfRange {
            index,
            len: table.len(),
        });
    }

    let removed = table.remove(index);
    for (i, row) in table.iter_mut().enumerate() {
        row.row.sequence = i + 1;
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellValue;
    use crate::normalize::RawRow;
    use crate::sheet::process;

    fn table(lines: &[(&str, f64, f64)]) -> Vec<CommissionRow> {
        let rows: Vec<RawRow> = lines
            .iter()
            .map(|(code, total, profit)| {
                [
                    ("CodArt", CellValue::from(*code)),
                    ("TOTAL sin IVA#sumar", CellValue::Number(*total)),
                    ("UTIL_porc", CellValue::Number(*profit)),
                ]
                .into_iter()
                .collect()
            })
            .collect();
        process(&rows).table
    }

    #[test]
    fn test_totals_sum_derived_columns() {
        let t = table(&[("A", 1000.0, 20.0), ("B", 2000.0, 70.0), ("C", 500.0, 3.0)]);

        assert!((total_earned(&t) - 115.0).abs() < 1e-9);
        assert!((total_adjusted(&t) - 115.0 / 1.5).abs() < 1e-9);
        assert!((total_of(&t, "TOTAL sin IVA#sumar") - 3500.0).abs() < 1e-9);
        assert_eq!(total_of(&t, "CodArt"), 0.0);
    }

    #[test]
    fn test_empty_table_totals_are_zero() {
        assert_eq!(total_earned(&[]), 0.0);
        assert_eq!(total_adjusted(&[]), 0.0);
    }

    #[test]
    fn test_delete_renumbers_and_keeps_order() {
        let mut t = table(&[("A", 1.0, 0.0), ("B", 1.0, 0.0), ("C", 1.0, 0.0), ("D", 1.0, 0.0)]);

        let removed = delete_row(&mut t, 1).unwrap();
        assert_eq!(removed.value("CodArt"), CellValue::from("B"));

        let sequences: Vec<_> = t.iter().map(|r| r.sequence()).collect();
        assert_eq!(sequences, vec![1, 2, 3]);
        let codes: Vec<_> = t.iter().map(|r| r.value("CodArt")).collect();
        assert_eq!(codes, vec!["A".into(), "C".into(), "D".into()]);
    }

    #[test]
    fn test_delete_reduces_totals_by_row_contribution() {
        let mut t = table(&[("A", 1000.0, 20.0), ("B", 2000.0, 70.0)]);
        let before = total_earned(&t);

        let removed = delete_row(&mut t, 1).unwrap();
        let after = total_earned(&t);

        assert!((before - after - removed.commission.earned_amount).abs() < 1e-9);
        assert!((after - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_delete_out_of_range() {
        let mut t = table(&[("A", 1.0, 0.0)]);
        let err = delete_row(&mut t, 1).unwrap_err();

        assert!(matches!(err, CommissionError::IndexOutOfRange { index: 1, len: 1 }));
        assert_eq!(t.len(), 1);
        assert_eq!(t[0].sequence(), 1);
    }
}
