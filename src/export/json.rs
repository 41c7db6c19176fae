//! JSON Export functionality
//!
//! Exports every record and the category and split configuration in one
//! document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Category, Expense, ExpenseCategories, Income, Settlement, SplitConfig};
use crate::storage::Storage;

/// Full export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullExport {
    pub export_date: DateTime<Utc>,
    pub expenses: Vec<Expense>,
    pub incomes: Vec<Income>,
    pub settlements: Vec<Settlement>,
    pub categories: ExpenseCategories,
    pub income_categories: Vec<Category>,
    pub config: SplitConfig,
}

impl FullExport {
    /// Collect everything from storage, records oldest first
    pub fn from_storage(storage: &Storage) -> LedgerResult<Self> {
        let mut expenses = storage.expenses.list_all()?;
        expenses.sort_by(|a, b| a.date.cmp(&b.date));
        let mut incomes = storage.incomes.list_all()?;
        incomes.sort_by(|a, b| a.date.cmp(&b.date));
        let mut settlements = storage.settlements.list_all()?;
        settlements.sort_by(|a, b| a.month.cmp(&b.month).then(a.date.cmp(&b.date)));

        Ok(Self {
            export_date: Utc::now(),
            expenses,
            incomes,
            settlements,
            categories: storage.categories.load()?,
            income_categories: storage.income_categories.load()?,
            config: storage.config.load()?,
        })
    }
}

/// Write the full export as pretty-printed JSON
pub fn export_full_json<W: Write>(storage: &Storage, writer: &mut W) -> LedgerResult<FullExport> {
    let export = FullExport::from_storage(storage)?;
    serde_json::to_writer_pretty(&mut *writer, &export)
        .map_err(|e| LedgerError::Export(format!("Failed to write JSON export: {}", e)))?;
    writeln!(writer)?;
    Ok(export)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LedgerPaths;
    use crate::models::{ExpenseType, Money};
    use crate::storage::initialize_storage;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_full_export() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        initialize_storage(storage.paths()).unwrap();

        for (month, day) in [(4, 2), (3, 9)] {
            storage
                .expenses
                .insert(Expense::new(
                    ExpenseType::Fixed,
                    "Rent",
                    Money::from_cents(80000),
                    NaiveDate::from_ymd_opt(2024, month, day).unwrap(),
                    "User1",
                    true,
                ))
                .unwrap();
        }

        let mut output = Vec::new();
        let export = export_full_json(&storage, &mut output).unwrap();
        assert_eq!(export.expenses.len(), 2);
        assert!(export.expenses[0].date < export.expenses[1].date);

        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        for key in [
            "exportDate",
            "expenses",
            "incomes",
            "settlements",
            "categories",
            "incomeCategories",
            "config",
        ] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(value["expenses"][0]["type"], "fixed");
    }
}
