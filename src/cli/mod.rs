//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod audit;
pub mod backup;
pub mod budget;
pub mod category;
pub mod expense;
pub mod export;
pub mod income;
pub mod report;
pub mod settlement;
pub mod split;

pub use audit::handle_audit_command;
pub use backup::{handle_backup_command, BackupCommands};
pub use budget::{handle_budget_command, BudgetCommands};
pub use category::{handle_category_command, CategoryCommands};
pub use expense::{handle_expense_command, ExpenseCommands};
pub use export::{handle_export_command, ExportCommands};
pub use income::{handle_income_command, IncomeCommands};
pub use report::{handle_report_command, ReportCommands};
pub use settlement::{handle_settlement_command, SettlementCommands};
pub use split::{handle_split_command, SplitCommands};

use chrono::{Local, NaiveDate};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{ExpenseType, Money, MonthKey, Percentage, PercentageMap};

/// Parse a user-supplied amount such as "12.50"
pub(crate) fn parse_amount(amount: &str) -> LedgerResult<Money> {
    Money::parse(amount)
        .map_err(|e| LedgerError::validation(format!("Invalid amount '{}': {}", amount, e)))
}

/// Parse a YYYY-MM-DD date, defaulting to today
pub(crate) fn parse_date(date: Option<&str>) -> LedgerResult<NaiveDate> {
    match date {
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
            LedgerError::validation(format!("Invalid date '{}', expected YYYY-MM-DD", s))
        }),
        None => Ok(Local::now().date_naive()),
    }
}

/// Parse a YYYY-MM month, defaulting to the current month
pub(crate) fn parse_month(month: Option<&str>) -> LedgerResult<MonthKey> {
    match month {
        Some(s) => s
            .parse::<MonthKey>()
            .map_err(|e| LedgerError::validation(e.to_string())),
        None => Ok(MonthKey::current()),
    }
}

pub(crate) fn parse_expense_type(s: &str) -> LedgerResult<ExpenseType> {
    ExpenseType::parse(s).ok_or_else(|| {
        LedgerError::validation(format!(
            "Unknown expense type '{}', expected fixed, variable or daily",
            s
        ))
    })
}

/// Parse `NAME=PCT` pairs into a percentage map
pub(crate) fn parse_percentages(pairs: &[String]) -> LedgerResult<PercentageMap> {
    let mut map = PercentageMap::new();
    for pair in pairs {
        let (name, pct) = pair.split_once('=').ok_or_else(|| {
            LedgerError::validation(format!("Expected NAME=PERCENT, got '{}'", pair))
        })?;
        let pct = Percentage::parse(pct).ok_or_else(|| {
            LedgerError::validation(format!("Invalid percentage '{}'", pct))
        })?;
        map.insert(name.trim().to_string(), pct);
    }
    Ok(map)
}
