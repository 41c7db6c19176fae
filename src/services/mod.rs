//! Service layer for duo-ledger
//!
//! The service layer is the write path: it validates input, enforces
//! closed months and category rules, persists through the storage layer
//! and records every mutation in the audit log.

pub mod budget;
pub mod category;
pub mod expense;
pub mod income;
pub mod settlement;
pub mod split;

pub use budget::BudgetService;
pub use category::{CategoryKind, CategoryService};
pub use expense::{CreateExpenseInput, ExpenseFilter, ExpenseService, UpdateExpenseInput};
pub use income::{CreateIncomeInput, IncomeFilter, IncomeService, UpdateIncomeInput};
pub use settlement::{CreateSettlementInput, SettlementService};
pub use split::SplitService;

use std::fmt::Display;

use crate::error::{LedgerError, LedgerResult};
use crate::models::MonthKey;
use crate::storage::Storage;

/// Turn a model's validation errors into a `Validation` error, if any
pub(crate) fn check<E: Display>(errors: Vec<E>) -> LedgerResult<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(LedgerError::Validation(
            errors.iter().map(ToString::to_string).collect(),
        ))
    }
}

/// Fail with `ClosedMonth` if any of `months` is closed
pub(crate) fn ensure_open(storage: &Storage, months: &[MonthKey]) -> LedgerResult<()> {
    let config = storage.config.load()?;
    match months.iter().find(|m| config.is_closed(**m)) {
        Some(month) => Err(LedgerError::ClosedMonth(*month)),
        None => Ok(()),
    }
}
