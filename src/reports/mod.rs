//! Reports module for duo-ledger
//!
//! Pure computations over already-loaded records: totals, the two-person
//! balance, monthly summaries, breakdowns, checklists and history.

pub mod balance;
pub mod breakdown;
pub mod checklist;
pub mod history;
pub mod summary;
pub mod totals;

pub use balance::{resolve_balance, BalanceSheet, PersonBalance, SuggestedTransfer};
pub use breakdown::{category_breakdown, daily_trend, top_categories, CategoryShare, CategoryStat, DailyPoint};
pub use checklist::{budget_status, fixed_checklist, BudgetStatus, BudgetUsage, FixedChecklist, VariableAlert};
pub use history::{month_history, MonthRow};
pub use summary::{MonthlySummary, RecordCounts};
pub use totals::{aggregate, PersonTotals, Totals, TypeTotals};
