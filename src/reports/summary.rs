//! Monthly Summary
//!
//! Everything the dashboard shows for one month: income, expense totals,
//! net result and the balance between the two persons.

use serde::Serialize;
use std::collections::BTreeMap;

use super::balance::{resolve_balance, BalanceSheet};
use super::totals::{aggregate, Totals};
use crate::models::{Expense, Income, Money, MonthKey, Settlement, SplitConfig};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecordCounts {
    pub expenses: usize,
    pub incomes: usize,
    pub settlements: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub month: MonthKey,
    pub closed: bool,
    pub income_total: Money,
    pub income_by_person: BTreeMap<String, Money>,
    pub income_by_category: BTreeMap<String, Money>,
    pub totals: Totals,
    /// Income minus expenses
    pub net: Money,
    pub counts: RecordCounts,
    /// `None` when fewer than two persons are configured
    pub balance: Option<BalanceSheet>,
}

impl MonthlySummary {
    /// Build the summary for `month`
    ///
    /// Records dated outside the month are ignored, so callers may pass a
    /// wider slice than needed.
    pub fn build(
        month: MonthKey,
        expenses: &[Expense],
        incomes: &[Income],
        settlements: &[Settlement],
        split: &SplitConfig,
    ) -> Self {
        let expenses: Vec<Expense> = expenses
            .iter()
            .filter(|e| month.contains(e.date))
            .cloned()
            .collect();
        let incomes: Vec<&Income> = incomes.iter().filter(|i| month.contains(i.date)).collect();
        let settlements: Vec<Settlement> = settlements
            .iter()
            .filter(|s| s.month == month)
            .cloned()
            .collect();

        let mut income_by_person: BTreeMap<String, Money> = BTreeMap::new();
        let mut income_by_category: BTreeMap<String, Money> = BTreeMap::new();
        for income in &incomes {
            *income_by_person.entry(income.received_by.clone()).or_default() += income.amount;
            *income_by_category.entry(income.category.clone()).or_default() += income.amount;
        }
        let income_total: Money = incomes.iter().map(|i| i.amount).sum();

        let totals = aggregate(&expenses);
        let net = income_total - totals.total;

        Self {
            month,
            closed: split.is_closed(month),
            income_total,
            income_by_person,
            income_by_category,
            net,
            counts: RecordCounts {
                expenses: expenses.len(),
                incomes: incomes.len(),
                settlements: settlements.len(),
            },
            balance: resolve_balance(&expenses, split, month, &settlements),
            totals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExpenseType;
    use chrono::NaiveDate;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    #[test]
    fn test_summary_scopes_to_month() {
        let march = MonthKey::new(2024, 3).unwrap();
        let expenses = vec![
            Expense::new(ExpenseType::Fixed, "Rent", Money::from_cents(80000), date(3, 1), "Alice", true),
            Expense::new(ExpenseType::Daily, "Coffee", Money::from_cents(350), date(3, 2), "Bob", false),
            Expense::new(ExpenseType::Daily, "Coffee", Money::from_cents(999), date(4, 2), "Bob", false),
        ];
        let incomes = vec![
            Income::new("Salary", Money::from_cents(200000), date(3, 25), "Alice"),
            Income::new("Freelance", Money::from_cents(50000), date(3, 28), "Bob"),
            Income::new("Salary", Money::from_cents(1), date(2, 28), "Bob"),
        ];
        let split = SplitConfig::equal("Alice", "Bob");

        let summary = MonthlySummary::build(march, &expenses, &incomes, &[], &split);

        assert_eq!(summary.counts.expenses, 2);
        assert_eq!(summary.counts.incomes, 2);
        assert_eq!(summary.income_total.cents(), 250000);
        assert_eq!(summary.totals.total.cents(), 80350);
        assert_eq!(summary.net.cents(), 250000 - 80350);
        assert_eq!(summary.income_by_person["Bob"].cents(), 50000);
        assert_eq!(summary.income_by_category["Salary"].cents(), 200000);
        assert!(!summary.closed);

        let transfer = summary.balance.unwrap().transfer.unwrap();
        assert_eq!(transfer.debtor, "Bob");
        assert_eq!(transfer.amount.cents(), 40000);
    }

    #[test]
    fn test_closed_flag() {
        let march = MonthKey::new(2024, 3).unwrap();
        let mut split = SplitConfig::equal("Alice", "Bob");
        split.close(march);
        let summary = MonthlySummary::build(march, &[], &[], &[], &split);
        assert!(summary.closed);
        assert!(summary.net.is_zero());
    }
}
