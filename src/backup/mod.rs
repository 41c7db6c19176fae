//! Backup system for duo-ledger
//!
//! - `BackupManager` takes one archive per day and prunes old ones
//! - `RestoreManager` writes an archive back over the data directory
//!
//! # Backup Format
//!
//! ```text
//! { "version": 2, "timestamp": ..., "date": "YYYY-MM-DD",
//!   "globalData": { categories, incomeCategories, config,
//!                   fixedExpensesConfig, variableExpensesConfig,
//!                   dailyExpensesConfig },
//!   "monthsData": { "YYYY-MM": { expenses, incomes, settlements } } }
//! ```

mod manager;
mod restore;

pub use manager::{backup_filename, BackupArchive, BackupInfo, BackupManager, GlobalData, MonthData};
pub use restore::{RestoreManager, RestoreResult};
