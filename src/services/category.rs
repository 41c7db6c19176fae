//! Category service
//!
//! Manages the expense category lists (one per type) and the income
//! category list. A category that records still use cannot be renamed or
//! deleted, since records refer to categories by name.

use std::fmt;
use tracing::info;

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::category::{default_emoji, INCOME_EMOJI};
use crate::models::{Category, ExpenseType};
use crate::storage::Storage;

/// Which category list an operation targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryKind {
    Expense(ExpenseType),
    Income,
}

impl CategoryKind {
    fn default_emoji(&self) -> &'static str {
        match self {
            Self::Expense(t) => default_emoji(t),
            Self::Income => INCOME_EMOJI,
        }
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expense(t) => write!(f, "{}", t),
            Self::Income => write!(f, "income"),
        }
    }
}

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

impl<'a> CategoryService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn list(&self, kind: &CategoryKind) -> LedgerResult<Vec<Category>> {
        match kind {
            CategoryKind::Expense(t) => {
                let categories = self.storage.categories.load()?;
                Ok(categories.for_type(t).cloned().unwrap_or_default())
            }
            CategoryKind::Income => self.storage.income_categories.load(),
        }
    }

    pub fn find(&self, kind: &CategoryKind, name: &str) -> LedgerResult<Option<Category>> {
        Ok(self.list(kind)?.into_iter().find(|c| c.name == name))
    }

    /// Number of records filed under the category
    pub fn usage_count(&self, kind: &CategoryKind, name: &str) -> LedgerResult<usize> {
        Ok(match kind {
            CategoryKind::Expense(t) => self
                .storage
                .expenses
                .list_all()?
                .iter()
                .filter(|e| &e.expense_type == t && e.category == name)
                .count(),
            CategoryKind::Income => self
                .storage
                .incomes
                .list_all()?
                .iter()
                .filter(|i| i.category == name)
                .count(),
        })
    }

    /// Run `f` on the category list for `kind` and save it
    fn modify<R>(
        &self,
        kind: &CategoryKind,
        f: impl FnOnce(&mut Vec<Category>) -> LedgerResult<R>,
    ) -> LedgerResult<R> {
        match kind {
            CategoryKind::Expense(t) => self.storage.categories.update(|categories| {
                let list = categories.for_type_mut(t).ok_or_else(|| {
                    LedgerError::validation(format!("unknown expense type '{}'", t))
                })?;
                f(list)
            }),
            CategoryKind::Income => self.storage.income_categories.update(f),
        }
    }

    pub fn add(&self, kind: &CategoryKind, name: &str, emoji: Option<&str>) -> LedgerResult<Category> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::validation("Category name cannot be empty"));
        }

        let category = Category::new(name, emoji.map(str::trim).unwrap_or_default())
            .with_default_emoji(kind.default_emoji());

        self.modify(kind, |list| {
            if list.iter().any(|c| c.name == category.name) {
                return Err(LedgerError::Duplicate {
                    entity_type: "Category",
                    identifier: format!("{}/{}", kind, category.name),
                });
            }
            list.push(category.clone());
            Ok(())
        })?;
        info!(%kind, name = %category.name, "category added");

        self.storage.log_create(
            EntityType::Category,
            format!("{}/{}", kind, category.name),
            Some(category.name.clone()),
            &category,
        )?;

        Ok(category)
    }

    /// Rename a category and/or change its emoji
    ///
    /// Renaming is refused while records use the old name. Budget settings
    /// keyed by the old name follow the rename.
    pub fn edit(
        &self,
        kind: &CategoryKind,
        name: &str,
        new_name: Option<&str>,
        new_emoji: Option<&str>,
    ) -> LedgerResult<Category> {
        let new_name = new_name.map(str::trim).filter(|n| *n != name);
        if new_name.map_or(false, str::is_empty) {
            return Err(LedgerError::validation("Category name cannot be empty"));
        }

        if new_name.is_some() {
            let count = self.usage_count(kind, name)?;
            if count > 0 {
                return Err(LedgerError::CategoryInUse {
                    category: name.to_string(),
                    count,
                });
            }
        }

        let (before, after) = self.modify(kind, |list| {
            if let Some(new_name) = new_name {
                if list.iter().any(|c| c.name == new_name) {
                    return Err(LedgerError::Duplicate {
                        entity_type: "Category",
                        identifier: format!("{}/{}", kind, new_name),
                    });
                }
            }
            let category = list
                .iter_mut()
                .find(|c| c.name == name)
                .ok_or_else(|| LedgerError::category_not_found(format!("{}/{}", kind, name)))?;

            let before = category.clone();
            if let Some(new_name) = new_name {
                category.name = new_name.to_string();
            }
            if let Some(emoji) = new_emoji {
                category.emoji = emoji.trim().to_string();
            }
            Ok((before, category.clone()))
        })?;

        if before.name != after.name {
            self.rename_budget_key(kind, &before.name, &after.name)?;
        }

        self.storage.log_update(
            EntityType::Category,
            format!("{}/{}", kind, after.name),
            Some(after.name.clone()),
            &before,
            &after,
        )?;

        Ok(after)
    }

    pub fn delete(&self, kind: &CategoryKind, name: &str) -> LedgerResult<Category> {
        let count = self.usage_count(kind, name)?;
        if count > 0 {
            return Err(LedgerError::CategoryInUse {
                category: name.to_string(),
                count,
            });
        }

        let removed = self.modify(kind, |list| {
            let position = list
                .iter()
                .position(|c| c.name == name)
                .ok_or_else(|| LedgerError::category_not_found(format!("{}/{}", kind, name)))?;
            Ok(list.remove(position))
        })?;
        self.remove_budget_key(kind, name)?;
        info!(%kind, name, "category deleted");

        self.storage.log_delete(
            EntityType::Category,
            format!("{}/{}", kind, name),
            Some(name.to_string()),
            &removed,
        )?;

        Ok(removed)
    }

    fn rename_budget_key(&self, kind: &CategoryKind, from: &str, to: &str) -> LedgerResult<()> {
        match kind {
            CategoryKind::Expense(ExpenseType::Fixed) => self.storage.fixed_config.update(|c| {
                if let Some(setting) = c.remove(from) {
                    c.insert(to.to_string(), setting);
                }
                Ok(())
            }),
            CategoryKind::Expense(ExpenseType::Variable) => {
                self.storage.variable_config.update(|c| {
                    if let Some(setting) = c.remove(from) {
                        c.insert(to.to_string(), setting);
                    }
                    Ok(())
                })
            }
            CategoryKind::Expense(ExpenseType::Daily) => self.storage.daily_config.update(|c| {
                if let Some(budget) = c.categories.remove(from) {
                    c.categories.insert(to.to_string(), budget);
                }
                Ok(())
            }),
            _ => Ok(()),
        }
    }

    fn remove_budget_key(&self, kind: &CategoryKind, name: &str) -> LedgerResult<()> {
        match kind {
            CategoryKind::Expense(ExpenseType::Fixed) => self.storage.fixed_config.update(|c| {
                c.remove(name);
                Ok(())
            }),
            CategoryKind::Expense(ExpenseType::Variable) => {
                self.storage.variable_config.update(|c| {
                    c.remove(name);
                    Ok(())
                })
            }
            CategoryKind::Expense(ExpenseType::Daily) => self.storage.daily_config.update(|c| {
                c.categories.remove(name);
                Ok(())
            }),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LedgerPaths;
    use crate::models::Money;
    use crate::services::{CreateExpenseInput, ExpenseService};
    use crate::storage::initialize_storage;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        initialize_storage(storage.paths()).unwrap();
        (temp_dir, storage)
    }

    const DAILY: CategoryKind = CategoryKind::Expense(ExpenseType::Daily);

    #[test]
    fn test_add_with_default_emoji() {
        let (_temp, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        let category = service.add(&DAILY, "  Snacks ", None).unwrap();
        assert_eq!(category.name, "Snacks");
        assert_eq!(category.emoji, "💸");
        assert!(service.find(&DAILY, "Snacks").unwrap().is_some());

        let income = service.add(&CategoryKind::Income, "Rental", Some("🏘️")).unwrap();
        assert_eq!(income.emoji, "🏘️");
    }

    #[test]
    fn test_add_duplicate_and_empty() {
        let (_temp, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        assert!(matches!(
            service.add(&DAILY, "Coffee", None).unwrap_err(),
            LedgerError::Duplicate { .. }
        ));
        assert!(service.add(&DAILY, "   ", None).unwrap_err().is_validation());
        // Same name under another type is fine
        assert!(service
            .add(&CategoryKind::Expense(ExpenseType::Variable), "Coffee", None)
            .is_ok());
    }

    #[test]
    fn test_in_use_protection() {
        let (_temp, storage) = create_test_storage();
        ExpenseService::new(&storage)
            .create(CreateExpenseInput {
                expense_type: ExpenseType::Daily,
                category: "Coffee".into(),
                amount: Money::from_cents(350),
                date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                paid_by: "User1".into(),
                is_shared: false,
                description: None,
            })
            .unwrap();

        let service = CategoryService::new(&storage);
        assert_eq!(service.usage_count(&DAILY, "Coffee").unwrap(), 1);

        let err = service.delete(&DAILY, "Coffee").unwrap_err();
        assert!(matches!(err, LedgerError::CategoryInUse { count: 1, .. }));

        let err = service.edit(&DAILY, "Coffee", Some("Café"), None).unwrap_err();
        assert!(matches!(err, LedgerError::CategoryInUse { .. }));

        // Emoji changes are always allowed
        let edited = service.edit(&DAILY, "Coffee", None, Some("🫖")).unwrap();
        assert_eq!(edited.emoji, "🫖");
    }

    #[test]
    fn test_rename_moves_budget_setting() {
        let (_temp, storage) = create_test_storage();
        storage
            .daily_config
            .update(|c| {
                c.categories.insert(
                    "Food".into(),
                    crate::models::DailyCategoryBudget {
                        monthly_budget: Money::from_cents(20000),
                        tracking_enabled: true,
                    },
                );
                Ok(())
            })
            .unwrap();

        let service = CategoryService::new(&storage);
        service.edit(&DAILY, "Food", Some("Lunch"), None).unwrap();

        let daily = storage.daily_config.load().unwrap();
        assert!(daily.categories.contains_key("Lunch"));
        assert!(!daily.categories.contains_key("Food"));

        service.delete(&DAILY, "Lunch").unwrap();
        assert!(storage.daily_config.load().unwrap().categories.is_empty());
        assert!(service.delete(&DAILY, "Lunch").unwrap_err().is_not_found());
    }
}
