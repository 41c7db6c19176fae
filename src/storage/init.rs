//! Storage initialization
//!
//! First-run setup: creates the directory layout and writes default global
//! documents that do not exist yet. Existing files are never touched.

use serde::Serialize;
use std::path::Path;
use tracing::info;

use crate::config::paths::LedgerPaths;
use crate::error::LedgerError;
use crate::models::category::default_income_categories;
use crate::models::{
    DailyBudgetConfig, ExpenseCategories, FixedExpensesConfig, SplitConfig, VariableExpensesConfig,
};

use super::file_io::write_json_atomic;

/// Initialize storage, filling in whichever default documents are missing
pub fn initialize_storage(paths: &LedgerPaths) -> Result<(), LedgerError> {
    paths.ensure_directories()?;

    write_if_missing(&paths.config_file(), &SplitConfig::default())?;
    write_if_missing(&paths.categories_file(), &ExpenseCategories::default())?;
    write_if_missing(&paths.income_categories_file(), &default_income_categories())?;
    write_if_missing(&paths.fixed_config_file(), &FixedExpensesConfig::new())?;
    write_if_missing(&paths.variable_config_file(), &VariableExpensesConfig::new())?;
    write_if_missing(&paths.daily_config_file(), &DailyBudgetConfig::default())?;

    Ok(())
}

fn write_if_missing<T: Serialize>(path: &Path, value: &T) -> Result<(), LedgerError> {
    if path.exists() {
        return Ok(());
    }
    info!(file = %path.display(), "creating default data file");
    write_json_atomic(path, value)
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &LedgerPaths) -> bool {
    !paths.is_initialized()
}
