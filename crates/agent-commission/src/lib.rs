//! Sales Agent Commission Reports
//!
//! Reads a sales worksheet (one row per sold item), works out each line's
//! commission from its profit tier, and exports a formatted report named
//! after the agent and the current month.
//!
//! Pipeline: `workbook` decodes raw rows, `sheet::process` normalizes them
//! and derives the commission columns, `totals` keeps the sums, and
//! `reports::export` lays out the report that `workbook` writes.

pub mod cell;
pub mod commission;
pub mod config;
pub mod constants;
pub mod display;
pub mod error;
pub mod normalize;
pub mod rates;
pub mod reports;
pub mod session;
pub mod sheet;
pub mod totals;
pub mod workbook;
