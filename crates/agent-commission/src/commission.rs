//! Derived commission columns

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::cell::CellValue;
use crate::constants::{
    ADJUSTMENT_DIVISOR, COL_ADJUSTED_AMOUNT, COL_EARNED_AMOUNT, COL_EARNED_RATE,
    COL_PROFIT_PERCENT, COL_TOTAL_BEFORE_TAX, DERIVED_HEADERS,
};
use crate::normalize::NormalizedRow;
use crate::rates::commission_rate;

/// The three values computed for every row
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Commission {
    /// Rate from the tier ladder (0.015 means 1.5%)
    pub earned_rate: f64,
    /// Pre-tax total times the earned rate
    pub earned_amount: f64,
    /// Earned amount divided by `ADJUSTMENT_DIVISOR`
    pub adjusted_amount: f64,
}

impl Commission {
    pub fn compute(profit_percent: f64, total_before_tax: f64) -> Self {
        let earned_rate = commission_rate(profit_percent);
        let earned_amount = total_before_tax * earned_rate;
        let adjusted_amount = earned_amount / ADJUSTMENT_DIVISOR;

        Self {
            earned_rate,
            earned_amount,
            adjusted_amount,
        }
    }

    /// Derived value by header name
    pub fn get(&self, header: &str) -> Option<f64> {
        match header {
            COL_EARNED_RATE => Some(self.earned_rate),
            COL_EARNED_AMOUNT => Some(self.earned_amount),
            COL_ADJUSTED_AMOUNT => Some(self.adjusted_amount),
            _ => None,
        }
    }
}

/// A table row: normalized worksheet values plus its commission
#[derive(Debug, Clone, PartialEq)]
pub struct CommissionRow {
    pub row: NormalizedRow,
    pub commission: Commission,
}

impl CommissionRow {
    pub fn sequence(&self) -> usize {
        self.row.sequence
    }

    /// Cell value by canonical header. Derived headers shadow worksheet
    /// columns of the same name.
    pub fn value(&self, header: &str) -> CellValue {
        if let Some(derived) = self.commission.get(header) {
            return CellValue::Number(derived);
        }
        self.row.get(header).cloned().unwrap_or_default()
    }

    /// Header order of the row as exported: worksheet headers (first
    /// occurrence) then derived headers not already present
    fn export_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for header in self.row.headers().chain(DERIVED_HEADERS) {
            if !keys.contains(&header) {
                keys.push(header);
            }
        }
        keys
    }
}

/// Serializes as a flat record without the sequence number
impl Serialize for CommissionRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let keys = self.export_keys();
        let mut map = serializer.serialize_map(Some(keys.len()))?;
        for key in keys {
            map.serialize_entry(key, &self.value(key))?;
        }
        map.end()
    }
}

/// Compute the derived columns for a normalized row.
///
/// Missing or non-numeric inputs count as 0, so this never fails.
pub fn derive(row: NormalizedRow) -> CommissionRow {
    let profit_percent = row
        .get(COL_PROFIT_PERCENT)
        .map(CellValue::to_number)
        .unwrap_or(0.0);
    let total_before_tax = row
        .get(COL_TOTAL_BEFORE_TAX)
        .map(CellValue::to_number)
        .unwrap_or(0.0);

    CommissionRow {
        commission: Commission::compute(profit_percent, total_before_tax),
        row,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{normalize, RawRow};

    fn row(pairs: &[(&str, CellValue)]) -> NormalizedRow {
        let raw: RawRow = pairs.iter().cloned().collect();
        normalize(&raw, 0)
    }

    #[test]
    fn test_widget_example() {
        let derived = derive(row(&[
            ("CodArt", "A1".into()),
            ("TOTAL sin IVA#sumar", 1000.0.into()),
            ("UTIL_porc", 20.0.into()),
        ]));

        assert_eq!(derived.commission.earned_rate, 0.015);
        assert!((derived.commission.earned_amount - 15.0).abs() < 1e-9);
        assert!((derived.commission.adjusted_amount - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_non_numeric_profit_is_zero() {
        let derived = derive(row(&[
            ("TOTAL sin IVA#sumar", 1000.0.into()),
            ("UTIL_porc", "N/A".into()),
        ]));
        assert_eq!(derived.commission, Commission::default());

        let missing = derive(row(&[("TOTAL sin IVA#sumar", 1000.0.into())]));
        assert_eq!(missing.commission, Commission::default());
    }

    #[test]
    fn test_adjusted_is_earned_over_divisor() {
        for (profit, total) in [(7.0, 333.33), (50.0, 12_345.67), (120.0, -80.0)] {
            let c = Commission::compute(profit, total);
            assert!((c.adjusted_amount - c.earned_amount / 1.5).abs() < 1e-9);
        }
    }

    #[test]
    fn test_derived_value_shadows_worksheet_column() {
        let derived = derive(row(&[
            ("MONTO GANADO", "old".into()),
            ("TOTAL sin IVA#sumar", 200.0.into()),
            ("UTIL_porc", 70.0.into()),
        ]));
        assert_eq!(derived.value("MONTO GANADO"), CellValue::Number(10.0));
        assert_eq!(derived.value("Vendedor"), CellValue::Empty);
    }

    #[test]
    fn test_json_record_order_and_no_sequence() {
        let derived = derive(row(&[
            ("CodArt", "A1".into()),
            ("COLUMNA 3", "x".into()),
            ("UTIL_porc", 1.0.into()),
        ]));

        let json = serde_json::to_string(&derived).unwrap();
        let expected = concat!(
            r#"{"CodArt":"A1","COLUMNA 3":0.0,"UTIL_porc":1.0,"#,
            r#""% UTIL GANADA":0.0,"MONTO GANADO":0.0}"#
        );
        assert_eq!(json, expected);
    }
}
