//! Backup manager for duo-ledger
//!
//! One archive per calendar day, named `backup-YYYY-MM-DD.json`, holding the
//! global documents and every month's records. Only the newest
//! `keep_count` archives are kept.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::paths::LedgerPaths;
use crate::config::settings::BackupRetention;
use crate::error::{LedgerError, LedgerResult};
use crate::storage::file_io::write_json_atomic;
use crate::storage::records::list_months;

/// Archive layout version written by this manager
pub const ARCHIVE_VERSION: u32 = 2;

/// Record kinds stored per month
pub(crate) const MONTH_KINDS: [&str; 3] = ["expenses", "incomes", "settlements"];

/// Metadata about a backup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupInfo {
    pub filename: String,
    pub path: PathBuf,
    /// Day the backup was taken, from the filename
    pub date: NaiveDate,
    pub size_bytes: u64,
}

/// Global (not month-sharded) documents
///
/// Kept as raw JSON so an archive restores exactly what was on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalData {
    #[serde(default)]
    pub categories: Value,
    #[serde(default)]
    pub income_categories: Value,
    #[serde(default)]
    pub config: Value,
    #[serde(default)]
    pub fixed_expenses_config: Value,
    #[serde(default)]
    pub variable_expenses_config: Value,
    #[serde(default)]
    pub daily_expenses_config: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthData {
    #[serde(default = "empty_array")]
    pub expenses: Value,
    #[serde(default = "empty_array")]
    pub incomes: Value,
    #[serde(default = "empty_array")]
    pub settlements: Value,
}

fn empty_array() -> Value {
    Value::Array(Vec::new())
}

impl MonthData {
    pub(crate) fn kind(&self, kind: &str) -> Option<&Value> {
        match kind {
            "expenses" => Some(&self.expenses),
            "incomes" => Some(&self.incomes),
            "settlements" => Some(&self.settlements),
            _ => None,
        }
    }
}

/// Backup archive format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupArchive {
    pub version: u32,
    pub timestamp: DateTime<Utc>,
    pub date: NaiveDate,
    pub global_data: GlobalData,
    /// Keyed by `YYYY-MM`
    pub months_data: BTreeMap<String, MonthData>,
}

/// Manages backup creation and retention
pub struct BackupManager {
    backup_dir: PathBuf,
    paths: LedgerPaths,
    retention: BackupRetention,
}

impl BackupManager {
    pub fn new(paths: LedgerPaths, retention: BackupRetention) -> Self {
        let backup_dir = paths.backup_dir();
        Self {
            backup_dir,
            paths,
            retention,
        }
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Take today's backup unless one exists, then enforce retention
    ///
    /// Returns the path written, or `None` when today's backup was already
    /// there.
    pub fn create_daily_backup(&self) -> LedgerResult<Option<PathBuf>> {
        self.create_backup_on(Utc::now())
    }

    pub(crate) fn create_backup_on(&self, now: DateTime<Utc>) -> LedgerResult<Option<PathBuf>> {
        let date = now.date_naive();
        let path = self.backup_dir.join(backup_filename(date));
        if path.exists() {
            debug!(path = %path.display(), "backup already exists for today");
            return Ok(None);
        }

        fs::create_dir_all(&self.backup_dir)
            .map_err(|e| LedgerError::Backup(format!("Failed to create backup directory: {}", e)))?;

        let archive = self.create_archive(now)?;
        write_json_atomic(&path, &archive)?;
        info!(%date, months = archive.months_data.len(), "backup created");

        self.enforce_retention()?;
        Ok(Some(path))
    }

    /// Snapshot the current data
    pub fn create_archive(&self, timestamp: DateTime<Utc>) -> LedgerResult<BackupArchive> {
        let global_data = GlobalData {
            categories: read_json_value(&self.paths.categories_file(), Value::Object(Default::default()))?,
            income_categories: read_json_value(&self.paths.income_categories_file(), empty_array())?,
            config: read_json_value(&self.paths.config_file(), Value::Object(Default::default()))?,
            fixed_expenses_config: read_json_value(
                &self.paths.fixed_config_file(),
                Value::Object(Default::default()),
            )?,
            variable_expenses_config: read_json_value(
                &self.paths.variable_config_file(),
                Value::Object(Default::default()),
            )?,
            daily_expenses_config: read_json_value(
                &self.paths.daily_config_file(),
                Value::Object(Default::default()),
            )?,
        };

        let mut months_data = BTreeMap::new();
        for month in list_months(&self.paths)? {
            let read = |kind: &str| read_json_value(&self.paths.month_file(month, kind), empty_array());
            months_data.insert(
                month.to_string(),
                MonthData {
                    expenses: read(MONTH_KINDS[0])?,
                    incomes: read(MONTH_KINDS[1])?,
                    settlements: read(MONTH_KINDS[2])?,
                },
            );
        }

        Ok(BackupArchive {
            version: ARCHIVE_VERSION,
            timestamp,
            date: timestamp.date_naive(),
            global_data,
            months_data,
        })
    }

    /// List all backups, newest first
    pub fn list_backups(&self) -> LedgerResult<Vec<BackupInfo>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.backup_dir)
            .map_err(|e| LedgerError::Io(format!("Failed to read backup directory: {}", e)))?;

        let mut backups: Vec<BackupInfo> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| parse_backup_info(&entry.path()))
            .collect();

        backups.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(backups)
    }

    /// Delete all but the newest `keep_count` backups
    pub fn enforce_retention(&self) -> LedgerResult<Vec<PathBuf>> {
        let mut deleted = Vec::new();
        for backup in self
            .list_backups()?
            .into_iter()
            .skip(self.retention.keep_count as usize)
        {
            fs::remove_file(&backup.path)
                .map_err(|e| LedgerError::Io(format!("Failed to delete old backup: {}", e)))?;
            info!(file = %backup.filename, "deleted old backup");
            deleted.push(backup.path);
        }
        Ok(deleted)
    }

    pub fn get_latest_backup(&self) -> LedgerResult<Option<BackupInfo>> {
        Ok(self.list_backups()?.into_iter().next())
    }
}

pub fn backup_filename(date: NaiveDate) -> String {
    format!("backup-{}.json", date.format("%Y-%m-%d"))
}

fn parse_backup_info(path: &Path) -> Option<BackupInfo> {
    let filename = path.file_name()?.to_str()?.to_string();
    let date_part = filename.strip_prefix("backup-")?.strip_suffix(".json")?;
    let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()?;
    let size_bytes = fs::metadata(path).ok()?.len();

    Some(BackupInfo {
        filename,
        path: path.to_path_buf(),
        date,
        size_bytes,
    })
}

/// Read a JSON file as a generic Value, `default` if it doesn't exist
fn read_json_value(path: &Path, default: Value) -> LedgerResult<Value> {
    if !path.exists() {
        return Ok(default);
    }

    let contents = fs::read_to_string(path)
        .map_err(|e| LedgerError::Io(format!("Failed to read file for backup: {}", e)))?;

    serde_json::from_str(&contents).map_err(|e| {
        LedgerError::Backup(format!("Failed to parse {} for backup: {}", path.display(), e))
    })
}
