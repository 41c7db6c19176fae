//! Month-sharded record repositories
//!
//! Each record kind lives in `months/<YYYY-MM>/<kind>.json`, one JSON array
//! per month. Month directories are created on first write and never
//! removed. Mutations hold the storage write lock for the whole
//! read-modify-write cycle.

use std::fmt;
use std::fs;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::config::paths::LedgerPaths;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Expense, ExpenseId, Income, IncomeId, MonthKey, Settlement, SettlementId};

use super::file_io::{read_json, write_json_atomic};

/// A record stored in a month shard
pub trait MonthlyRecord: Serialize + DeserializeOwned + Clone {
    type Id: Copy + Eq + fmt::Display;

    /// File stem inside a month directory
    const KIND: &'static str;

    /// Name used in error messages
    const ENTITY: &'static str;

    fn id(&self) -> Self::Id;

    /// The shard this record belongs in
    fn month(&self) -> MonthKey;

    /// Whether a user-typed identifier refers to this record
    fn matches_id(&self, identifier: &str) -> bool;
}

impl MonthlyRecord for Expense {
    type Id = ExpenseId;
    const KIND: &'static str = "expenses";
    const ENTITY: &'static str = "Expense";

    fn id(&self) -> ExpenseId {
        self.id
    }

    fn month(&self) -> MonthKey {
        Expense::month(self)
    }

    fn matches_id(&self, identifier: &str) -> bool {
        self.id.matches(identifier)
    }
}

impl MonthlyRecord for Income {
    type Id = IncomeId;
    const KIND: &'static str = "incomes";
    const ENTITY: &'static str = "Income";

    fn id(&self) -> IncomeId {
        self.id
    }

    fn month(&self) -> MonthKey {
        Income::month(self)
    }

    fn matches_id(&self, identifier: &str) -> bool {
        self.id.matches(identifier)
    }
}

impl MonthlyRecord for Settlement {
    type Id = SettlementId;
    const KIND: &'static str = "settlements";
    const ENTITY: &'static str = "Settlement";

    fn id(&self) -> SettlementId {
        self.id
    }

    fn month(&self) -> MonthKey {
        self.month
    }

    fn matches_id(&self, identifier: &str) -> bool {
        self.id.matches(identifier)
    }
}

/// List the month directories under `months/`, newest first
pub fn list_months(paths: &LedgerPaths) -> LedgerResult<Vec<MonthKey>> {
    let dir = paths.months_dir();
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut months: Vec<MonthKey> = fs::read_dir(&dir)
        .map_err(|e| LedgerError::Storage(format!("Failed to read {}: {}", dir.display(), e)))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| entry.file_name().to_str().and_then(|n| n.parse().ok()))
        .collect();

    months.sort_unstable_by(|a, b| b.cmp(a));
    Ok(months)
}

pub(crate) fn acquire(lock: &Mutex<()>) -> LedgerResult<MutexGuard<'_, ()>> {
    lock.lock()
        .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))
}

/// Repository for one record kind across all month shards
pub struct RecordRepository<T: MonthlyRecord> {
    paths: LedgerPaths,
    lock: Arc<Mutex<()>>,
    _marker: PhantomData<T>,
}

impl<T: MonthlyRecord> RecordRepository<T> {
    pub fn new(paths: LedgerPaths, lock: Arc<Mutex<()>>) -> Self {
        Self {
            paths,
            lock,
            _marker: PhantomData,
        }
    }

    /// Records of one month in file order; a missing file is an empty month
    pub fn list_month(&self, month: MonthKey) -> LedgerResult<Vec<T>> {
        read_json(self.paths.month_file(month, T::KIND))
    }

    /// Overwrite one month's file
    pub fn save_month(&self, month: MonthKey, records: &[T]) -> LedgerResult<()> {
        debug!(kind = T::KIND, %month, count = records.len(), "writing month shard");
        write_json_atomic(self.paths.month_file(month, T::KIND), records)
    }

    pub fn months(&self) -> LedgerResult<Vec<MonthKey>> {
        list_months(&self.paths)
    }

    /// Every record in every month, newest month first
    pub fn list_all(&self) -> LedgerResult<Vec<T>> {
        let mut all = Vec::new();
        for month in self.months()? {
            all.extend(self.list_month(month)?);
        }
        Ok(all)
    }

    /// Look up a record by exact id
    pub fn get(&self, id: T::Id) -> LedgerResult<Option<T>> {
        Ok(self.list_all()?.into_iter().find(|r| r.id() == id))
    }

    /// Look up a record by full id, display form or unambiguous prefix
    pub fn find(&self, identifier: &str) -> LedgerResult<Option<T>> {
        let mut matches = self
            .list_all()?
            .into_iter()
            .filter(|r| r.matches_id(identifier));

        let first = matches.next();
        if matches.next().is_some() {
            return Err(LedgerError::validation(format!(
                "'{}' matches more than one {}",
                identifier,
                T::ENTITY.to_lowercase()
            )));
        }
        Ok(first)
    }

    /// Append a new record to its month's file
    pub fn insert(&self, record: T) -> LedgerResult<()> {
        let _guard = acquire(&self.lock)?;
        let month = record.month();
        let mut records = self.list_month(month)?;

        if records.iter().any(|r| r.id() == record.id()) {
            return Err(LedgerError::Duplicate {
                entity_type: T::ENTITY,
                identifier: record.id().to_string(),
            });
        }

        records.push(record);
        self.save_month(month, &records)
    }

    /// Replace a stored record, moving it if its month changed
    ///
    /// `previous_month` is where the record currently lives.
    pub fn replace(&self, previous_month: MonthKey, record: T) -> LedgerResult<()> {
        let _guard = acquire(&self.lock)?;
        let new_month = record.month();
        let mut records = self.list_month(previous_month)?;

        let position = records
            .iter()
            .position(|r| r.id() == record.id())
            .ok_or_else(|| LedgerError::NotFound {
                entity_type: T::ENTITY,
                identifier: record.id().to_string(),
            })?;

        if new_month == previous_month {
            records[position] = record;
            return self.save_month(previous_month, &records);
        }

        debug!(kind = T::KIND, from = %previous_month, to = %new_month, "moving record between months");
        records.remove(position);
        let mut target = self.list_month(new_month)?;
        target.push(record);
        self.save_month(new_month, &target)?;
        self.save_month(previous_month, &records)
    }

    /// Remove a record from its month's file, returning it
    pub fn remove(&self, month: MonthKey, id: T::Id) -> LedgerResult<Option<T>> {
        let _guard = acquire(&self.lock)?;
        let mut records = self.list_month(month)?;

        match records.iter().position(|r| r.id() == id) {
            Some(position) => {
                let removed = records.remove(position);
                self.save_month(month, &records)?;
                Ok(Some(removed))
            }
            None => Ok(None),
        }
    }

    pub fn count(&self) -> LedgerResult<usize> {
        Ok(self.list_all()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpenseType, Money};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn repo() -> (RecordRepository<Expense>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        (RecordRepository::new(paths, Arc::new(Mutex::new(()))), temp_dir)
    }

    fn expense(y: i32, m: u32, d: u32, cents: i64) -> Expense {
        Expense::new(
            ExpenseType::Variable,
            "Groceries",
            Money::from_cents(cents),
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            "Alice",
            true,
        )
    }

    #[test]
    fn test_insert_lands_in_month_shard() {
        let (repo, temp) = repo();
        repo.insert(expense(2024, 3, 15, 1000)).unwrap();

        let file = temp
            .path()
            .join("data/months/2024-03/expenses.json");
        assert!(file.exists());
        assert_eq!(repo.list_month(MonthKey::new(2024, 3).unwrap()).unwrap().len(), 1);
        assert!(repo.list_month(MonthKey::new(2024, 4).unwrap()).unwrap().is_empty());
    }

    #[test]
    fn test_months_newest_first() {
        let (repo, temp) = repo();
        repo.insert(expense(2023, 12, 1, 100)).unwrap();
        repo.insert(expense(2024, 2, 1, 100)).unwrap();
        fs::create_dir_all(temp.path().join("data/months/not-a-month")).unwrap();

        let months: Vec<String> = repo.months().unwrap().iter().map(|m| m.to_string()).collect();
        assert_eq!(months, vec!["2024-02", "2023-12"]);
        assert_eq!(repo.count().unwrap(), 2);
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let (repo, _temp) = repo();
        let e = expense(2024, 3, 1, 100);
        repo.insert(e.clone()).unwrap();
        assert!(matches!(repo.insert(e), Err(LedgerError::Duplicate { .. })));
    }

    #[test]
    fn test_replace_moves_between_months() {
        let (repo, _temp) = repo();
        let mut e = expense(2024, 3, 31, 100);
        repo.insert(e.clone()).unwrap();

        let march = e.month();
        e.date = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        repo.replace(march, e.clone()).unwrap();

        assert!(repo.list_month(march).unwrap().is_empty());
        assert_eq!(repo.list_month(e.month()).unwrap(), vec![e.clone()]);
        assert_eq!(repo.get(e.id).unwrap(), Some(e));
    }

    #[test]
    fn test_replace_missing_is_not_found() {
        let (repo, _temp) = repo();
        let e = expense(2024, 3, 1, 100);
        let err = repo.replace(e.month(), e).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_find_by_prefix_and_remove() {
        let (repo, _temp) = repo();
        let e = expense(2024, 3, 1, 100);
        repo.insert(e.clone()).unwrap();

        let found = repo.find(&e.id.to_string()).unwrap();
        assert_eq!(found.map(|f| f.id), Some(e.id));

        let removed = repo.remove(e.month(), e.id).unwrap();
        assert_eq!(removed.map(|r| r.id), Some(e.id));
        assert!(repo.get(e.id).unwrap().is_none());
        assert!(repo.remove(e.month(), e.id).unwrap().is_none());
    }
}
