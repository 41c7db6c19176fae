//! Backup restoration for duo-ledger
//!
//! Restoring overwrites every global document and each month file present
//! in the archive. Months on disk that the archive does not mention are
//! left alone.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::info;

use crate::config::paths::LedgerPaths;
use crate::error::{LedgerError, LedgerResult};
use crate::models::MonthKey;
use crate::storage::file_io::write_json_atomic;

use super::manager::{BackupArchive, MONTH_KINDS};

/// Handles restoring from backups
pub struct RestoreManager {
    paths: LedgerPaths,
}

impl RestoreManager {
    pub fn new(paths: LedgerPaths) -> Self {
        Self { paths }
    }

    /// Restore data from a backup file
    ///
    /// This will overwrite current data with the backup contents.
    pub fn restore_from_file(&self, backup_path: &Path) -> LedgerResult<RestoreResult> {
        let contents = fs::read_to_string(backup_path)
            .map_err(|e| LedgerError::Io(format!("Failed to read backup file: {}", e)))?;

        let archive: BackupArchive = serde_json::from_str(&contents)
            .map_err(|e| LedgerError::Backup(format!("Failed to parse backup file: {}", e)))?;

        self.restore_from_archive(&archive)
    }

    pub fn restore_from_archive(&self, archive: &BackupArchive) -> LedgerResult<RestoreResult> {
        // Refuse bad month keys before touching anything
        let months = archive
            .months_data
            .iter()
            .map(|(key, data)| {
                key.parse::<MonthKey>()
                    .map(|month| (month, data))
                    .map_err(|e| LedgerError::Backup(e.to_string()))
            })
            .collect::<LedgerResult<Vec<_>>>()?;

        self.paths.ensure_directories()?;

        let mut result = RestoreResult {
            backup_date: archive.timestamp,
            ..RestoreResult::default()
        };

        let global = &archive.global_data;
        let documents = [
            (&global.categories, self.paths.categories_file()),
            (&global.income_categories, self.paths.income_categories_file()),
            (&global.config, self.paths.config_file()),
            (&global.fixed_expenses_config, self.paths.fixed_config_file()),
            (&global.variable_expenses_config, self.paths.variable_config_file()),
            (&global.daily_expenses_config, self.paths.daily_config_file()),
        ];
        for (value, path) in documents {
            if !value.is_null() {
                write_json_atomic(path, value)?;
                result.documents_restored += 1;
            }
        }

        for (month, data) in months {
            for kind in MONTH_KINDS {
                let records = data.kind(kind).filter(|v| !v.is_null());
                let records = records.cloned().unwrap_or(Value::Array(Vec::new()));
                write_json_atomic(self.paths.month_file(month, kind), &records)?;
            }
            result.months_restored += 1;
        }

        info!(
            documents = result.documents_restored,
            months = result.months_restored,
            "backup restored"
        );
        Ok(result)
    }
}

/// Result of a restore operation
#[derive(Debug, Default)]
pub struct RestoreResult {
    /// When the backup was taken
    pub backup_date: DateTime<Utc>,
    pub documents_restored: usize,
    pub months_restored: usize,
}

impl RestoreResult {
    pub fn summary(&self) -> String {
        format!(
            "Restored {} document(s) and {} month(s) from backup of {}",
            self.documents_restored,
            self.months_restored,
            self.backup_date.format("%Y-%m-%d %H:%M")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backup::BackupManager;
    use crate::config::settings::BackupRetention;
    use crate::models::{Expense, ExpenseType, Money, SplitConfig};
    use crate::storage::{initialize_storage, Storage};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_round_trip_through_backup() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths.clone()).unwrap();
        initialize_storage(&paths).unwrap();

        let expense = Expense::new(
            ExpenseType::Variable,
            "Groceries",
            Money::from_cents(4550),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            "User1",
            true,
        );
        storage.expenses.insert(expense.clone()).unwrap();

        let manager = BackupManager::new(paths.clone(), BackupRetention::default());
        let backup = manager.create_daily_backup().unwrap().unwrap();

        // Damage the live data
        let march = expense.month();
        storage.expenses.save_month(march, &[]).unwrap();
        storage.config.save(&SplitConfig::equal("X", "Y")).unwrap();

        let result = RestoreManager::new(paths).restore_from_file(&backup).unwrap();
        assert_eq!(result.documents_restored, 6);
        assert_eq!(result.months_restored, 1);

        assert_eq!(storage.expenses.list_month(march).unwrap(), vec![expense]);
        assert_eq!(storage.config.load().unwrap(), SplitConfig::default());
    }

    #[test]
    fn test_corrupt_archive_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("backup-2024-03-01.json");
        fs::write(&path, "{not json").unwrap();

        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let err = RestoreManager::new(paths).restore_from_file(&path).unwrap_err();
        assert!(matches!(err, LedgerError::Backup(_)));
    }
}
