//! Display formatting for terminal output
//!
//! Turns records, configuration and report results into text for the CLI.

pub mod category;
pub mod records;
pub mod report;

pub use category::{format_category_list, format_category_tree, format_split_config};
pub use records::{
    format_expense_details, format_expense_table, format_income_table, format_settlement_table,
};
pub use report::{
    format_balance, format_breakdown, format_budget_status, format_checklist, format_history,
    format_summary, format_top_categories, format_trend,
};
