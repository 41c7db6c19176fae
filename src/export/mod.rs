//! Export module for duo-ledger
//!
//! - CSV: expenses and incomes for spreadsheets
//! - JSON: every record plus categories and split configuration

pub mod csv;
pub mod json;

pub use self::csv::{export_expenses_csv, export_incomes_csv};
pub use self::json::{export_full_json, FullExport};
