//! Month-over-month comparison across the whole ledger

use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{Expense, Income, Money, MonthKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthRow {
    pub month: MonthKey,
    pub income: Money,
    pub expenses: Money,
    pub shared: Money,
    pub personal: Money,
    pub net: Money,
}

impl MonthRow {
    fn empty(month: MonthKey) -> Self {
        Self {
            month,
            income: Money::zero(),
            expenses: Money::zero(),
            shared: Money::zero(),
            personal: Money::zero(),
            net: Money::zero(),
        }
    }
}

/// One row per month that has any record, newest month first
pub fn month_history(expenses: &[Expense], incomes: &[Income]) -> Vec<MonthRow> {
    let mut rows: BTreeMap<MonthKey, MonthRow> = BTreeMap::new();

    for expense in expenses {
        let month = expense.month();
        let row = rows.entry(month).or_insert_with(|| MonthRow::empty(month));
        row.expenses += expense.amount;
        if expense.is_shared {
            row.shared += expense.amount;
        } else {
            row.personal += expense.amount;
        }
    }

    for income in incomes {
        let month = income.month();
        rows.entry(month)
            .or_insert_with(|| MonthRow::empty(month))
            .income += income.amount;
    }

    rows.into_values()
        .rev()
        .map(|mut row| {
            row.net = row.income - row.expenses;
            row
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExpenseType;
    use chrono::NaiveDate;

    #[test]
    fn test_history_newest_first() {
        let jan = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let mar = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let expenses = vec![
            Expense::new(ExpenseType::Fixed, "Rent", Money::from_cents(80000), jan, "Alice", true),
            Expense::new(ExpenseType::Daily, "Coffee", Money::from_cents(300), jan, "Bob", false),
            Expense::new(ExpenseType::Fixed, "Rent", Money::from_cents(80000), mar, "Alice", true),
        ];
        let incomes = vec![Income::new(
            "Salary",
            Money::from_cents(100000),
            NaiveDate::from_ymd_opt(2024, 2, 25).unwrap(),
            "Bob",
        )];

        let rows = month_history(&expenses, &incomes);
        let months: Vec<String> = rows.iter().map(|r| r.month.to_string()).collect();
        assert_eq!(months, vec!["2024-03", "2024-02", "2024-01"]);

        assert_eq!(rows[1].income.cents(), 100000);
        assert_eq!(rows[1].net.cents(), 100000);
        assert_eq!(rows[2].shared.cents(), 80000);
        assert_eq!(rows[2].personal.cents(), 300);
        assert_eq!(rows[2].net.cents(), -80300);
    }

    #[test]
    fn test_empty_history() {
        assert!(month_history(&[], &[]).is_empty());
    }
}
