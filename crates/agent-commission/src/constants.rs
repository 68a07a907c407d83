//! Centralized constants for the agent commission tool
//!
//! Column names here must match the worksheet headers exactly (after trimming).
//! Report locations and names that users may want to change live in config.toml.

// =============================================================================
// Worksheet Columns
// =============================================================================

/// Item code, used as the label column of the total row
pub const COL_ITEM_CODE: &str = "CodArt";

/// Item description
pub const COL_ITEM_NAME: &str = "Articulo";

/// Quantity sold
pub const COL_QUANTITY: &str = "Cantidad#sumar";

/// Line total before tax
pub const COL_TOTAL_BEFORE_TAX: &str = "TOTAL sin IVA#sumar";

/// Profit percentage of the line (20 means 20%)
pub const COL_PROFIT_PERCENT: &str = "UTIL_porc";

/// Sales agent name
pub const COL_AGENT: &str = "Vendedor";

// =============================================================================
// Derived Columns
// =============================================================================

/// Commission rate earned for the line's profit tier
pub const COL_EARNED_RATE: &str = "% UTIL GANADA";

/// Commission amount earned on the line
pub const COL_EARNED_AMOUNT: &str = "MONTO GANADO";

/// Earned amount after the fixed adjustment divisor
pub const COL_ADJUSTED_AMOUNT: &str = "COLUMNA 3";

/// Header the total row checks for the adjusted-amount sum.
/// Never equal to `COL_ADJUSTED_AMOUNT`, so that total cell stays blank.
pub const ADJUSTED_TOTAL_HEADER: &str = "COLUMNA TRES";

/// All derived headers, in the order they are appended to a row
pub const DERIVED_HEADERS: [&str; 3] = [COL_EARNED_RATE, COL_EARNED_AMOUNT, COL_ADJUSTED_AMOUNT];

/// Columns shown and exported, in display order
pub const PREFERRED_COLUMNS: [&str; 9] = [
    COL_ITEM_CODE,
    COL_ITEM_NAME,
    COL_QUANTITY,
    COL_TOTAL_BEFORE_TAX,
    COL_PROFIT_PERCENT,
    COL_AGENT,
    COL_EARNED_RATE,
    COL_EARNED_AMOUNT,
    COL_ADJUSTED_AMOUNT,
];

// =============================================================================
// Commission Tiers
// =============================================================================

/// Tier ladder as (inclusive upper bound of profit percent, commission rate)
pub const RATE_TIERS: [(f64, f64); 6] = [
    (5.0, 0.0),
    (9.0, 0.0015),
    (19.0, 0.007),
    (38.0, 0.015),
    (63.0, 0.03),
    (99.0, 0.05),
];

/// Rate applied above the last tier bound
pub const TOP_RATE: f64 = 0.05;

/// Fixed divisor turning the earned amount into the adjusted amount
pub const ADJUSTMENT_DIVISOR: f64 = 1.5;

// =============================================================================
// Report Layout
// =============================================================================

/// Label written in the item code column of the total row
pub const TOTAL_LABEL: &str = "TOTAL";

/// Extra characters added to the header length for column width
pub const COLUMN_PADDING: usize = 4;

/// Minimum column width for most columns
pub const DEFAULT_COLUMN_MIN: usize = 15;

/// Minimum width of the item description column
pub const ITEM_NAME_COLUMN_MIN: usize = 40;

/// Minimum width of the agent name column
pub const AGENT_COLUMN_MIN: usize = 30;

/// Header row fill (blue)
pub const TITLE_BACKGROUND: u32 = 0x0070C0;

/// Header row font (white)
pub const TITLE_FONT: u32 = 0xFFFFFF;

/// Total row fill (light gray)
pub const TOTAL_BACKGROUND: u32 = 0xF2F2F2;

/// Excel number format for currency cells
pub const CURRENCY_NUM_FORMAT: &str = "\"$\"#,##0.00";

/// Excel number format for percentage cells
pub const PERCENT_NUM_FORMAT: &str = "0.00%";

/// Excel number format for plain numeric cells
pub const NUMBER_NUM_FORMAT: &str = "#,##0.00";

/// Excel number format for date cells
pub const DATE_NUM_FORMAT: &str = "dd/mm/yyyy";

// =============================================================================
// Defaults
// =============================================================================

/// Default config file path
pub const CONFIG_FILENAME: &str = "config.toml";

/// Default output directory for exported reports
pub const DEFAULT_OUTPUT_DIR: &str = "./output";

/// Worksheet name of the styled export
pub const DEFAULT_SHEET_NAME: &str = "Reporte";

/// Agent name used in report file names when the table has none
pub const DEFAULT_FALLBACK_AGENT: &str = "Sin vendedor";

/// File name of the generic JSON data export
pub const DEFAULT_JSON_FILENAME: &str = "datos-excel-con-calculos.json";

/// Sheet name reported when nothing is loaded
pub const NO_SHEET_NAME: &str = "N/A";

/// Placeholder shown for empty cells
pub const EMPTY_DISPLAY: &str = "-";

/// Spreadsheet extensions accepted by the decoder
pub const EXCEL_EXTENSIONS: [&str; 5] = ["xlsx", "xls", "xlsm", "xlsb", "ods"];

/// Plain text extension accepted by the decoder
pub const CSV_EXTENSION: &str = "csv";
