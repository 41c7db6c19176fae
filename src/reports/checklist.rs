//! Fixed-expense checklist and budget status for a month
//!
//! Both take the month's expenses; scoping is the caller's job.

use serde::Serialize;

use crate::models::{
    Category, DailyBudgetConfig, Expense, ExpenseType, FixedExpensesConfig, Money, Percentage,
    VariableExpensesConfig,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub category: String,
    pub emoji: String,
    /// Configured default amount, zero when not configured
    pub expected: Money,
    /// Amount of the first fixed expense recorded for the category
    pub paid: Option<Money>,
}

impl ChecklistItem {
    pub fn is_paid(&self) -> bool {
        self.paid.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedChecklist {
    pub items: Vec<ChecklistItem>,
    pub total_paid: Money,
    pub total_expected: Money,
    /// Expected minus paid, never negative
    pub pending: Money,
}

/// One line per fixed category, in category order
pub fn fixed_checklist(
    categories: &[Category],
    fixed_config: &FixedExpensesConfig,
    expenses: &[Expense],
) -> FixedChecklist {
    let mut checklist = FixedChecklist::default();

    for category in categories {
        let expected = fixed_config
            .get(&category.name)
            .map(|s| s.default_amount)
            .unwrap_or_default();
        let paid = expenses
            .iter()
            .find(|e| e.expense_type == ExpenseType::Fixed && e.category == category.name)
            .map(|e| e.amount);

        checklist.total_expected += expected;
        if let Some(amount) = paid {
            checklist.total_paid += amount;
        }
        checklist.items.push(ChecklistItem {
            category: category.name.clone(),
            emoji: category.emoji.clone(),
            expected,
            paid,
        });
    }

    let pending = checklist.total_expected - checklist.total_paid;
    checklist.pending = if pending.is_positive() { pending } else { Money::zero() };
    checklist
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetUsage {
    /// Category name, or `None` for the global daily budget
    pub category: Option<String>,
    pub budget: Money,
    pub spent: Money,
    pub remaining: Money,
    pub used: Percentage,
}

impl BudgetUsage {
    fn new(category: Option<String>, budget: Money, spent: Money) -> Self {
        Self {
            category,
            budget,
            spent,
            remaining: budget - spent,
            used: Percentage::ratio(spent, budget),
        }
    }

    pub fn is_over(&self) -> bool {
        self.remaining.is_negative()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableAlert {
    pub category: String,
    pub spent: Money,
    pub alert_at: Money,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetStatus {
    pub daily_total: Option<BudgetUsage>,
    pub daily_categories: Vec<BudgetUsage>,
    pub variable_alerts: Vec<VariableAlert>,
}

fn spent_on(expenses: &[Expense], expense_type: &ExpenseType, category: Option<&str>) -> Money {
    expenses
        .iter()
        .filter(|e| &e.expense_type == expense_type)
        .filter(|e| category.map_or(true, |c| e.category == c))
        .map(|e| e.amount)
        .sum()
}

/// Compare the month's spending with the configured budgets
///
/// A zero budget or alert threshold means "not configured" and is skipped.
pub fn budget_status(
    categories: &[Category],
    daily_config: &DailyBudgetConfig,
    variable_config: &VariableExpensesConfig,
    expenses: &[Expense],
) -> BudgetStatus {
    let mut status = BudgetStatus::default();

    if daily_config.global_budget.is_positive() {
        let spent = spent_on(expenses, &ExpenseType::Daily, None);
        status.daily_total = Some(BudgetUsage::new(None, daily_config.global_budget, spent));
    }

    for (name, budget) in &daily_config.categories {
        if !budget.tracking_enabled || !budget.monthly_budget.is_positive() {
            continue;
        }
        let spent = spent_on(expenses, &ExpenseType::Daily, Some(name));
        status
            .daily_categories
            .push(BudgetUsage::new(Some(name.clone()), budget.monthly_budget, spent));
    }

    for category in categories {
        let Some(setting) = variable_config.get(&category.name) else {
            continue;
        };
        if !setting.budget_alert.is_positive() {
            continue;
        }
        let spent = spent_on(expenses, &ExpenseType::Variable, Some(&category.name));
        if spent > setting.budget_alert {
            status.variable_alerts.push(VariableAlert {
                category: category.name.clone(),
                spent,
                alert_at: setting.budget_alert,
            });
        }
    }

    status
}
