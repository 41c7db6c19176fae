//! Expense service
//!
//! CRUD for expenses with category checks and closed-month enforcement.

use chrono::NaiveDate;
use tracing::info;

use super::{check, ensure_open};
use crate::audit::EntityType;
use crate::config::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Expense, ExpenseCategories, ExpenseId, ExpenseType, Money, MonthKey};
use crate::storage::Storage;

/// Service for expense management
pub struct ExpenseService<'a> {
    storage: &'a Storage,
    enforce_closed_months: bool,
}

/// Options for filtering expenses
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    pub month: Option<MonthKey>,
    pub expense_type: Option<ExpenseType>,
    /// Payer name
    pub person: Option<String>,
    pub shared: Option<bool>,
    /// Maximum number of expenses to return
    pub limit: Option<usize>,
}

impl ExpenseFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn month(mut self, month: MonthKey) -> Self {
        self.month = Some(month);
        self
    }

    pub fn expense_type(mut self, expense_type: ExpenseType) -> Self {
        self.expense_type = Some(expense_type);
        self
    }

    pub fn person(mut self, person: impl Into<String>) -> Self {
        self.person = Some(person.into());
        self
    }

    pub fn shared(mut self, shared: bool) -> Self {
        self.shared = Some(shared);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn matches(&self, expense: &Expense) -> bool {
        self.expense_type
            .as_ref()
            .map_or(true, |t| &expense.expense_type == t)
            && self.person.as_ref().map_or(true, |p| &expense.paid_by == p)
            && self.shared.map_or(true, |s| expense.is_shared == s)
    }
}

/// Input for creating a new expense
#[derive(Debug, Clone)]
pub struct CreateExpenseInput {
    pub expense_type: ExpenseType,
    pub category: String,
    pub amount: Money,
    pub date: NaiveDate,
    pub paid_by: String,
    pub is_shared: bool,
    pub description: Option<String>,
}

/// Fields to change on an existing expense; `None` leaves a field as is
#[derive(Debug, Clone, Default)]
pub struct UpdateExpenseInput {
    pub expense_type: Option<ExpenseType>,
    pub category: Option<String>,
    pub amount: Option<Money>,
    pub date: Option<NaiveDate>,
    pub paid_by: Option<String>,
    pub is_shared: Option<bool>,
    pub description: Option<String>,
}

fn ensure_category(categories: &ExpenseCategories, expense: &Expense) -> LedgerResult<()> {
    // Unknown types are reported by validation instead
    if expense.expense_type.is_known()
        && !categories.contains(&expense.expense_type, &expense.category)
    {
        return Err(LedgerError::category_not_found(format!(
            "{}/{}",
            expense.expense_type, expense.category
        )));
    }
    Ok(())
}

fn audit_name(expense: &Expense) -> Option<String> {
    Some(format!("{} {}", expense.date, expense.category))
}

impl<'a> ExpenseService<'a> {
    /// Create a new expense service that enforces closed months
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            storage,
            enforce_closed_months: true,
        }
    }

    /// Take the closed-month policy from user settings
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

    /// Create a new expense
    pub fn create(&self, input: CreateExpenseInput) -> LedgerResult<Expense> {
        let mut expense = Expense::new(
            input.expense_type,
            input.category.trim(),
            input.amount,
            input.date,
            input.paid_by.trim(),
            input.is_shared,
        );
        if let Some(description) = input.description {
            expense.description = description.trim().to_string();
        }

        check(expense.validate())?;
        ensure_category(&self.storage.categories.load()?, &expense)?;
        self.ensure_open(&[expense.month()])?;

        self.storage.expenses.insert(expense.clone())?;
        info!(id = %expense.id, month = %expense.month(), "expense created");

        self.storage.log_create(
            EntityType::Expense,
            expense.id.to_string(),
            audit_name(&expense),
            &expense,
        )?;

        Ok(expense)
    }

    pub fn get(&self, id: ExpenseId) -> LedgerResult<Option<Expense>> {
        self.storage.expenses.get(id)
    }

    /// Find an expense by full id or unambiguous prefix
    pub fn find(&self, identifier: &str) -> LedgerResult<Option<Expense>> {
        self.storage.expenses.find(identifier)
    }

    /// List expenses, newest first
    pub fn list(&self, filter: &ExpenseFilter) -> LedgerResult<Vec<Expense>> {
        let mut expenses = match filter.month {
            Some(month) => self.storage.expenses.list_month(month)?,
            None => self.storage.expenses.list_all()?,
        };

        expenses.retain(|e| filter.matches(e));
        expenses.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));

        if let Some(limit) = filter.limit {
            expenses.truncate(limit);
        }
        Ok(expenses)
    }

    /// Apply changes to an expense, moving it if its month changes
    pub fn update(&self, id: ExpenseId, input: UpdateExpenseInput) -> LedgerResult<Expense> {
        let mut expense = self
            .storage
            .expenses
            .get(id)?
            .ok_or_else(|| LedgerError::expense_not_found(id.to_string()))?;
        let before = expense.clone();

        if let Some(expense_type) = input.expense_type {
            expense.expense_type = expense_type;
        }
        if let Some(category) = input.category {
            expense.category = category.trim().to_string();
        }
        if let Some(amount) = input.amount {
            expense.amount = amount;
        }
        if let Some(date) = input.date {
            expense.date = date;
        }
        if let Some(paid_by) = input.paid_by {
            expense.paid_by = paid_by.trim().to_string();
        }
        if let Some(is_shared) = input.is_shared {
            expense.is_shared = is_shared;
        }
        if let Some(description) = input.description {
            expense.description = description.trim().to_string();
        }

        check(expense.validate())?;
        if expense.expense_type != before.expense_type || expense.category != before.category {
            ensure_category(&self.storage.categories.load()?, &expense)?;
        }
        self.ensure_open(&[before.month(), expense.month()])?;

        expense.touch();
        self.storage.expenses.replace(before.month(), expense.clone())?;

        self.storage.log_update(
            EntityType::Expense,
            expense.id.to_string(),
            audit_name(&expense),
            &before,
            &expense,
        )?;

        Ok(expense)
    }

    pub fn delete(&self, id: ExpenseId) -> LedgerResult<Expense> {
        let expense = self
            .storage
            .expenses
            .get(id)?
            .ok_or_else(|| LedgerError::expense_not_found(id.to_string()))?;

        self.ensure_open(&[expense.month()])?;

        self.storage
            .expenses
            .remove(expense.month(), id)?
            .ok_or_else(|| LedgerError::expense_not_found(id.to_string()))?;
        info!(id = %expense.id, "expense deleted");

        self.storage.log_delete(
            EntityType::Expense,
            expense.id.to_string(),
            audit_name(&expense),
            &expense,
        )?;

        Ok(expense)
    }

    pub fn count(&self) -> LedgerResult<usize> {
        self.storage.expenses.count()
    }
}
