//! Budget service
//!
//! Per-category budget settings for each expense type: expected amounts
//! for fixed expenses, estimates and alert thresholds for variable
//! expenses, and monthly budgets for daily spending.

use super::check;
use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    DailyBudgetConfig, DailyCategoryBudget, ExpenseType, FixedExpenseSetting, FixedExpensesConfig,
    Money, VariableExpenseSetting, VariableExpensesConfig,
};
use crate::storage::Storage;

/// Service for budget settings
pub struct BudgetService<'a> {
    storage: &'a Storage,
}

impl<'a> BudgetService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    fn ensure_category(&self, expense_type: ExpenseType, name: &str) -> LedgerResult<()> {
        if self.storage.categories.load()?.contains(&expense_type, name) {
            Ok(())
        } else {
            Err(LedgerError::category_not_found(format!("{}/{}", expense_type, name)))
        }
    }

    pub fn fixed_settings(&self) -> LedgerResult<FixedExpensesConfig> {
        self.storage.fixed_config.load()
    }

    pub fn variable_settings(&self) -> LedgerResult<VariableExpensesConfig> {
        self.storage.variable_config.load()
    }

    pub fn daily_settings(&self) -> LedgerResult<DailyBudgetConfig> {
        self.storage.daily_config.load()
    }

    /// Set the expected payment of a fixed-expense category
    pub fn set_fixed(
        &self,
        category: &str,
        setting: FixedExpenseSetting,
    ) -> LedgerResult<FixedExpenseSetting> {
        self.ensure_category(ExpenseType::Fixed, category)?;
        let persons = self.storage.config.load()?.persons;
        check(setting.validate(&persons))?;

        let before = self
            .storage
            .fixed_config
            .update(|config| Ok(config.insert(category.to_string(), setting.clone())))?;

        self.storage.log_update(
            EntityType::Budget,
            format!("fixed/{}", category),
            Some(category.to_string()),
            &before,
            &Some(setting.clone()),
        )?;
        Ok(setting)
    }

    /// Set the estimate and alert threshold of a variable-expense category
    pub fn set_variable(
        &self,
        category: &str,
        setting: VariableExpenseSetting,
    ) -> LedgerResult<VariableExpenseSetting> {
        self.ensure_category(ExpenseType::Variable, category)?;
        let persons = self.storage.config.load()?.persons;
        check(setting.validate(&persons))?;

        let before = self
            .storage
            .variable_config
            .update(|config| Ok(config.insert(category.to_string(), setting.clone())))?;

        self.storage.log_update(
            EntityType::Budget,
            format!("variable/{}", category),
            Some(category.to_string()),
            &before,
            &Some(setting.clone()),
        )?;
        Ok(setting)
    }

    /// Set the overall monthly budget for daily spending; zero disables it
    pub fn set_daily_global(&self, amount: Money) -> LedgerResult<DailyBudgetConfig> {
        self.change_daily(|config| config.global_budget = amount)
    }

    /// Set the monthly budget of one daily category
    pub fn set_daily_category(
        &self,
        category: &str,
        budget: DailyCategoryBudget,
    ) -> LedgerResult<DailyBudgetConfig> {
        self.ensure_category(ExpenseType::Daily, category)?;
        self.change_daily(|config| {
            config.categories.insert(category.to_string(), budget);
        })
    }

    fn change_daily(&self, f: impl FnOnce(&mut DailyBudgetConfig)) -> LedgerResult<DailyBudgetConfig> {
        let (before, after) = self.storage.daily_config.update(|config| {
            let before = config.clone();
            f(config);
            check(config.validate())?;
            Ok((before, config.clone()))
        })?;

        self.storage.log_update(EntityType::Budget, "daily", None, &before, &after)?;
        Ok(after)
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

    #[test]
    fn test_set_fixed() {
        let (_temp, storage) = create_test_storage();
        let service = BudgetService::new(&storage);

        let setting = FixedExpenseSetting {
            default_amount: Money::from_cents(80000),
            payment_day: 5,
            assigned_to: "User1".into(),
            description: String::new(),
        };
        service.set_fixed("Rent", setting.clone()).unwrap();
        assert_eq!(service.fixed_settings().unwrap()["Rent"], setting);
        assert_eq!(storage.audit().entry_count().unwrap(), 1);
    }

    #[test]
    fn test_set_fixed_validation() {
        let (_temp, storage) = create_test_storage();
        let service = BudgetService::new(&storage);

        let setting = FixedExpenseSetting {
            payment_day: 32,
            assigned_to: "Nobody".into(),
            ..FixedExpenseSetting::default()
        };
        let err = service.set_fixed("Rent", setting.clone()).unwrap_err();
        assert_eq!(err.messages().len(), 2);

        assert!(service.set_fixed("Yacht", FixedExpenseSetting::default()).unwrap_err().is_not_found());
        assert!(service.fixed_settings().unwrap().is_empty());
    }

    #[test]
    fn test_set_variable_allows_both() {
        let (_temp, storage) = create_test_storage();
        let service = BudgetService::new(&storage);

        let setting = VariableExpenseSetting {
            estimated_amount: Money::from_cents(30000),
            budget_alert: Money::from_cents(35000),
            assigned_to: "Both".into(),
            description: String::new(),
        };
        service.set_variable("Groceries", setting).unwrap();
        assert_eq!(
            service.variable_settings().unwrap()["Groceries"].budget_alert.cents(),
            35000
        );
    }

    #[test]
    fn test_daily_budgets() {
        let (_temp, storage) = create_test_storage();
        let service = BudgetService::new(&storage);

        service.set_daily_global(Money::from_cents(40000)).unwrap();
        let config = service
            .set_daily_category(
                "Coffee",
                DailyCategoryBudget {
                    monthly_budget: Money::from_cents(3000),
                    tracking_enabled: true,
                },
            )
            .unwrap();
        assert_eq!(config.global_budget.cents(), 40000);
        assert_eq!(config.categories.len(), 1);

        let err = service.set_daily_global(Money::from_cents(-1)).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(service.daily_settings().unwrap().global_budget.cents(), 40000);
    }
}
