//! Storage layer for duo-ledger
//!
//! Month-sharded record repositories and single-file global documents, all
//! written atomically. One write lock is shared by every repository so that
//! read-modify-write cycles within the process never interleave.

pub mod documents;
pub mod file_io;
pub mod init;
pub mod migrate;
pub mod records;

pub use documents::JsonDocument;
pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use migrate::{run_migrations, MigrationReport};
pub use records::{MonthlyRecord, RecordRepository};

use serde::Serialize;
use std::sync::{Arc, Mutex};

use crate::audit::{generate_diff, AuditEntry, AuditLogger, EntityType};
use crate::config::paths::LedgerPaths;
use crate::error::LedgerResult;
use crate::models::{
    Category, DailyBudgetConfig, Expense, ExpenseCategories, FixedExpensesConfig, Income, MonthKey,
    Settlement, SplitConfig, VariableExpensesConfig,
};

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: LedgerPaths,
    audit: AuditLogger,
    pub expenses: RecordRepository<Expense>,
    pub incomes: RecordRepository<Income>,
    pub settlements: RecordRepository<Settlement>,
    pub config: JsonDocument<SplitConfig>,
    pub categories: JsonDocument<ExpenseCategories>,
    pub income_categories: JsonDocument<Vec<Category>>,
    pub fixed_config: JsonDocument<FixedExpensesConfig>,
    pub variable_config: JsonDocument<VariableExpensesConfig>,
    pub daily_config: JsonDocument<DailyBudgetConfig>,
}

impl Storage {
    pub fn new(paths: LedgerPaths) -> LedgerResult<Self> {
        paths.ensure_directories()?;

        let lock = Arc::new(Mutex::new(()));
        Ok(Self {
            audit: AuditLogger::new(paths.audit_log()),
            expenses: RecordRepository::new(paths.clone(), lock.clone()),
            incomes: RecordRepository::new(paths.clone(), lock.clone()),
            settlements: RecordRepository::new(paths.clone(), lock.clone()),
            config: JsonDocument::new(paths.config_file(), lock.clone()),
            categories: JsonDocument::new(paths.categories_file(), lock.clone()),
            income_categories: JsonDocument::new(paths.income_categories_file(), lock.clone()),
            fixed_config: JsonDocument::new(paths.fixed_config_file(), lock.clone()),
            variable_config: JsonDocument::new(paths.variable_config_file(), lock.clone()),
            daily_config: JsonDocument::new(paths.daily_config_file(), lock),
            paths,
        })
    }

    pub fn paths(&self) -> &LedgerPaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Months that have a directory, newest first
    pub fn months(&self) -> LedgerResult<Vec<MonthKey>> {
        records::list_months(&self.paths)
    }

    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> LedgerResult<()> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    /// Log an update; the change summary is derived from the two states
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> LedgerResult<()> {
        let diff = match (serde_json::to_value(before), serde_json::to_value(after)) {
            (Ok(b), Ok(a)) => generate_diff(&b, &a),
            _ => None,
        };
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff,
        ))
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> LedgerResult<()> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("data").join("months").exists());
        assert!(temp_dir.path().join("backups").exists());
        assert!(!storage.is_initialized());
        assert!(storage.months().unwrap().is_empty());
    }

    #[test]
    fn test_update_audit_carries_diff() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        storage
            .log_update(
                EntityType::Expense,
                "exp-1",
                None,
                &json!({"amount": 10}),
                &json!({"amount": 12}),
            )
            .unwrap();

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries[0].operation, Operation::Update);
        assert_eq!(entries[0].diff_summary.as_deref(), Some("amount: 10 -> 12"));
    }
}
