//! Income service

use chrono::NaiveDate;
use tracing::info;

use super::{check, ensure_open};
use crate::audit::EntityType;
use crate::config::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Income, IncomeId, Money, MonthKey};
use crate::storage::Storage;

/// Service for income management
pub struct IncomeService<'a> {
    storage: &'a Storage,
    enforce_closed_months: bool,
}

#[derive(Debug, Clone, Default)]
pub struct IncomeFilter {
    pub month: Option<MonthKey>,
    /// Receiver name
    pub person: Option<String>,
    pub category: Option<String>,
}

impl IncomeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn month(mut self, month: MonthKey) -> Self {
        self.month = Some(month);
        self
    }

    pub fn person(mut self, person: impl Into<String>) -> Self {
        self.person = Some(person.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    fn matches(&self, income: &Income) -> bool {
        self.person.as_ref().map_or(true, |p| &income.received_by == p)
            && self.category.as_ref().map_or(true, |c| &income.category == c)
    }
}

#[derive(Debug, Clone)]
pub struct CreateIncomeInput {
    pub category: String,
    pub amount: Money,
    pub date: NaiveDate,
    pub received_by: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateIncomeInput {
    pub category: Option<String>,
    pub amount: Option<Money>,
    pub date: Option<NaiveDate>,
    pub received_by: Option<String>,
    pub description: Option<String>,
}

impl<'a> IncomeService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            storage,
            enforce_closed_months: true,
        }
    }

    pub fn with_settings(mut self, settings: &Settings) -> Self {
        self.enforce_closed_months = settings.enforce_closed_months;
        self
    }

    fn ensure_open(&self, months: &[MonthKey]) -> LedgerResult<()> {
        if self.enforce_closed_months {
            ensure_open(self.storage, months)
        } else {
            Ok(())
        }
    }

    fn ensure_category(&self, name: &str) -> LedgerResult<()> {
        let categories = self.storage.income_categories.load()?;
        if categories.iter().any(|c| c.name == name) {
            Ok(())
        } else {
            Err(LedgerError::category_not_found(name))
        }
    }

    pub fn create(&self, input: CreateIncomeInput) -> LedgerResult<Income> {
        let mut income = Income::new(
            input.category.trim(),
            input.amount,
            input.date,
            input.received_by.trim(),
        );
        if let Some(description) = input.description {
            income.description = description.trim().to_string();
        }

        check(income.validate())?;
        self.ensure_category(&income.category)?;
        self.ensure_open(&[income.month()])?;

        self.storage.incomes.insert(income.clone())?;
        info!(id = %income.id, month = %income.month(), "income created");

        self.storage.log_create(
            EntityType::Income,
            income.id.to_string(),
            Some(format!("{} {}", income.date, income.category)),
            &income,
        )?;

        Ok(income)
    }

    pub fn get(&self, id: IncomeId) -> LedgerResult<Option<Income>> {
        self.storage.incomes.get(id)
    }

    pub fn find(&self, identifier: &str) -> LedgerResult<Option<Income>> {
        self.storage.incomes.find(identifier)
    }

    /// List incomes, newest first
    pub fn list(&self, filter: &IncomeFilter) -> LedgerResult<Vec<Income>> {
        let mut incomes = match filter.month {
            Some(month) => self.storage.incomes.list_month(month)?,
            None => self.storage.incomes.list_all()?,
        };
        incomes.retain(|i| filter.matches(i));
        incomes.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        Ok(incomes)
    }

    pub fn update(&self, id: IncomeId, input: UpdateIncomeInput) -> LedgerResult<Income> {
        let mut income = self
            .storage
            .incomes
            .get(id)?
            .ok_or_else(|| LedgerError::income_not_found(id.to_string()))?;
        let before = income.clone();

        if let Some(category) = input.category {
            income.category = category.trim().to_string();
        }
        if let Some(amount) = input.amount {
            income.amount = amount;
        }
        if let Some(date) = input.date {
            income.date = date;
        }
        if let Some(received_by) = input.received_by {
            income.received_by = received_by.trim().to_string();
        }
        if let Some(description) = input.description {
            income.description = description.trim().to_string();
        }

        check(income.validate())?;
        if income.category != before.category {
            self.ensure_category(&income.category)?;
        }
        self.ensure_open(&[before.month(), income.month()])?;

        income.touch();
        self.storage.incomes.replace(before.month(), income.clone())?;

        self.storage.log_update(
            EntityType::Income,
            income.id.to_string(),
            Some(format!("{} {}", income.date, income.category)),
            &before,
            &income,
        )?;

        Ok(income)
    }

    pub fn delete(&self, id: IncomeId) -> LedgerResult<Income> {
        let income = self
            .storage
            .incomes
            .get(id)?
            .ok_or_else(|| LedgerError::income_not_found(id.to_string()))?;

        self.ensure_open(&[income.month()])?;

        self.storage
            .incomes
            .remove(income.month(), id)?
            .ok_or_else(|| LedgerError::income_not_found(id.to_string()))?;
        info!(id = %income.id, "income deleted");

        self.storage.log_delete(
            EntityType::Income,
            income.id.to_string(),
            Some(format!("{} {}", income.date, income.category)),
            &income,
        )?;

        Ok(income)
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

    fn salary(cents: i64, day: u32, by: &str) -> CreateIncomeInput {
        CreateIncomeInput {
            category: "Salary".into(),
            amount: Money::from_cents(cents),
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            received_by: by.into(),
            description: None,
        }
    }

    #[test]
    fn test_create_list_filter() {
        let (_temp, storage) = create_test_storage();
        let service = IncomeService::new(&storage);

        service.create(salary(200000, 25, "User1")).unwrap();
        service.create(salary(150000, 26, "User2")).unwrap();

        let all = service.list(&IncomeFilter::new()).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].received_by, "User2");

        let user1 = service.list(&IncomeFilter::new().person("User1")).unwrap();
        assert_eq!(user1.len(), 1);
        assert_eq!(user1[0].amount.cents(), 200000);

        let bonus = service.list(&IncomeFilter::new().category("Bonus")).unwrap();
        assert!(bonus.is_empty());
    }

    #[test]
    fn test_unknown_category_rejected() {
        let (_temp, storage) = create_test_storage();
        let service = IncomeService::new(&storage);
        let mut input = salary(100, 1, "User1");
        input.category = "Lottery".into();
        assert!(service.create(input).unwrap_err().is_not_found());
    }

    #[test]
    fn test_update_and_delete() {
        let (_temp, storage) = create_test_storage();
        let service = IncomeService::new(&storage);
        let income = service.create(salary(100, 1, "User1")).unwrap();

        let updated = service
            .update(
                income.id,
                UpdateIncomeInput {
                    category: Some("Bonus".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.category, "Bonus");

        service.delete(income.id).unwrap();
        assert!(service.find(&income.id.to_string()).unwrap().is_none());
    }

    #[test]
    fn test_closed_month() {
        let (_temp, storage) = create_test_storage();
        storage
            .config
            .update(|c| {
                c.close(MonthKey::new(2024, 3).unwrap());
                Ok(())
            })
            .unwrap();

        let service = IncomeService::new(&storage);
        assert!(matches!(
            service.create(salary(100, 1, "User1")).unwrap_err(),
            LedgerError::ClosedMonth(_)
        ));
    }
}
