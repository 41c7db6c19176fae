//! Settlement service
//!
//! Settlements are recorded against a month but are not blocked when that
//! month is closed: settling up usually happens after closing.

use chrono::NaiveDate;
use tracing::info;

use super::check;
use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Money, MonthKey, Settlement, SettlementId};
use crate::storage::Storage;

pub struct SettlementService<'a> {
    storage: &'a Storage,
}

#[derive(Debug, Clone)]
pub struct CreateSettlementInput {
    pub month: MonthKey,
    pub from: String,
    pub to: String,
    pub amount: Money,
    pub date: NaiveDate,
    pub description: Option<String>,
}

impl<'a> SettlementService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn create(&self, input: CreateSettlementInput) -> LedgerResult<Settlement> {
        let mut settlement = Settlement::new(
            input.month,
            input.from.trim(),
            input.to.trim(),
            input.amount,
            input.date,
        );
        if let Some(description) = input.description {
            settlement.description = description.trim().to_string();
        }

        let config = self.storage.config.load()?;
        check(settlement.validate(&config.persons))?;

        self.storage.settlements.insert(settlement.clone())?;
        info!(id = %settlement.id, month = %settlement.month, "settlement recorded");

        self.storage.log_create(
            EntityType::Settlement,
            settlement.id.to_string(),
            Some(settlement.to_string()),
            &settlement,
        )?;

        Ok(settlement)
    }

    pub fn find(&self, identifier: &str) -> LedgerResult<Option<Settlement>> {
        self.storage.settlements.find(identifier)
    }

    /// Settlements of one month in recording order, or all of them
    pub fn list(&self, month: Option<MonthKey>) -> LedgerResult<Vec<Settlement>> {
        match month {
            Some(month) => self.storage.settlements.list_month(month),
            None => self.storage.settlements.list_all(),
        }
    }

    pub fn delete(&self, id: SettlementId) -> LedgerResult<Settlement> {
        let settlement = self
            .storage
            .settlements
            .get(id)?
            .ok_or_else(|| LedgerError::settlement_not_found(id.to_string()))?;

        self.storage
            .settlements
            .remove(settlement.month, id)?
            .ok_or_else(|| LedgerError::settlement_not_found(id.to_string()))?;

        self.storage.log_delete(
            EntityType::Settlement,
            settlement.id.to_string(),
            Some(settlement.to_string()),
            &settlement,
        )?;

        Ok(settlement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LedgerPaths;
    use crate::storage::initialize_storage;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        initialize_storage(storage.paths()).unwrap();
        (temp_dir, storage)
    }

    fn input(from: &str, to: &str, cents: i64) -> CreateSettlementInput {
        CreateSettlementInput {
            month: MonthKey::new(2024, 3).unwrap(),
            from: from.into(),
            to: to.into(),
            amount: Money::from_cents(cents),
            date: NaiveDate::from_ymd_opt(2024, 4, 2).unwrap(),
            description: None,
        }
    }

    #[test]
    fn test_create_lands_in_settled_month() {
        let (_temp, storage) = create_test_storage();
        let service = SettlementService::new(&storage);

        let settlement = service.create(input("User2", "User1", 3000)).unwrap();
        // Dated in April, filed under March
        let march = service.list(Some(MonthKey::new(2024, 3).unwrap())).unwrap();
        assert_eq!(march, vec![settlement]);
    }

    #[test]
    fn test_validation() {
        let (_temp, storage) = create_test_storage();
        let service = SettlementService::new(&storage);

        let err = service.create(input("User1", "User1", 100)).unwrap_err();
        assert!(err.is_validation());

        let err = service.create(input("User1", "Carol", 0)).unwrap_err();
        assert_eq!(err.messages().len(), 2);
    }

    #[test]
    fn test_allowed_in_closed_month() {
        let (_temp, storage) = create_test_storage();
        storage
            .config
            .update(|c| {
                c.close(MonthKey::new(2024, 3).unwrap());
                Ok(())
            })
            .unwrap();

        let service = SettlementService::new(&storage);
        let settlement = service.create(input("User2", "User1", 100)).unwrap();
        service.delete(settlement.id).unwrap();
        assert!(service.list(None).unwrap().is_empty());
    }
}
