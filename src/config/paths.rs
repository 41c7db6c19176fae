//! Path management for duo-ledger
//!
//! ## Path Resolution Order
//!
//! 1. `DUO_LEDGER_DATA_DIR` environment variable (if set)
//! 2. The platform data directory (`~/.local/share/duo-ledger` on Linux,
//!    `~/Library/Application Support/duo-ledger` on macOS, `%APPDATA%` on Windows)
//!
//! ## Layout
//!
//! ```text
//! <base>/settings.json
//! <base>/audit.log
//! <base>/backups/backup-YYYY-MM-DD.json
//! <base>/data/{schema,config,categories,income-categories}.json
//! <base>/data/{fixed,variable,daily}-expenses-config.json
//! <base>/data/months/YYYY-MM/{expenses,incomes,settlements}.json
//! ```

use directories::ProjectDirs;
use std::path::{Path, PathBuf};

use crate::error::LedgerError;
use crate::models::MonthKey;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "DUO_LEDGER_DATA_DIR";

/// Manages all paths used by duo-ledger
#[derive(Debug, Clone)]
pub struct LedgerPaths {
    base_dir: PathBuf,
}

impl LedgerPaths {
    /// Resolve the base directory from the environment or the platform default
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, LedgerError> {
        let base_dir = match std::env::var_os(DATA_DIR_ENV) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create LedgerPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.base_dir.join("backups")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("settings.json")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Records the schema version the data directory was migrated to
    pub fn schema_file(&self) -> PathBuf {
        self.data_dir().join("schema.json")
    }

    /// Split configuration (persons, percentages, closed months)
    pub fn config_file(&self) -> PathBuf {
        self.data_dir().join("config.json")
    }

    pub fn categories_file(&self) -> PathBuf {
        self.data_dir().join("categories.json")
    }

    pub fn income_categories_file(&self) -> PathBuf {
        self.data_dir().join("income-categories.json")
    }

    pub fn fixed_config_file(&self) -> PathBuf {
        self.data_dir().join("fixed-expenses-config.json")
    }

    pub fn variable_config_file(&self) -> PathBuf {
        self.data_dir().join("variable-expenses-config.json")
    }

    pub fn daily_config_file(&self) -> PathBuf {
        self.data_dir().join("daily-expenses-config.json")
    }

    pub fn months_dir(&self) -> PathBuf {
        self.data_dir().join("months")
    }

    pub fn month_dir(&self, month: MonthKey) -> PathBuf {
        self.months_dir().join(month.to_string())
    }

    /// `months/<YYYY-MM>/<kind>.json`, e.g. kind `expenses`
    pub fn month_file(&self, month: MonthKey, kind: &str) -> PathBuf {
        self.month_dir(month).join(format!("{}.json", kind))
    }

    /// Pre-sharding flat file, e.g. `data/expenses.json`
    pub fn legacy_file(&self, kind: &str) -> PathBuf {
        self.data_dir().join(format!("{}.json", kind))
    }

    /// Ensure the base, data, months and backup directories exist
    pub fn ensure_directories(&self) -> Result<(), LedgerError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| LedgerError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.months_dir())
            .map_err(|e| LedgerError::Io(format!("Failed to create data directory: {}", e)))?;

        std::fs::create_dir_all(self.backup_dir())
            .map_err(|e| LedgerError::Io(format!("Failed to create backup directory: {}", e)))?;

        Ok(())
    }

    /// Check if the data directory has been initialized
    pub fn is_initialized(&self) -> bool {
        self.config_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, LedgerError> {
    ProjectDirs::from("", "", "duo-ledger")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| LedgerError::Config("Could not determine a home directory".into()))
}
