//! Core data models for duo-ledger
//!
//! Records (expenses, incomes, settlements), the split configuration,
//! categories and budget settings, plus the value types they are built from.

pub mod budget;
pub mod category;
pub mod expense;
pub mod ids;
pub mod income;
pub mod money;
pub mod month;
pub mod percentage;
pub mod settlement;
pub mod split;

pub use budget::{
    DailyBudgetConfig, DailyCategoryBudget, FixedExpenseSetting, FixedExpensesConfig,
    VariableExpenseSetting, VariableExpensesConfig,
};
pub use category::{Category, ExpenseCategories};
pub use expense::{Expense, ExpenseType};
pub use ids::{ExpenseId, IncomeId, SettlementId};
pub use income::Income;
pub use money::Money;
pub use month::MonthKey;
pub use percentage::Percentage;
pub use settlement::Settlement;
pub use split::{PercentageMap, PercentageSource, SplitConfig};
