//! Spending breakdowns
//!
//! Per-category statistics, the largest categories and the day-by-day
//! spending curve for a set of expenses.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{Expense, ExpenseType, Money, Percentage};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStat {
    #[serde(rename = "type")]
    pub expense_type: ExpenseType,
    pub category: String,
    pub count: usize,
    pub total: Money,
    pub average: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub total: Money,
    /// Share of all spending in the input
    pub share: Percentage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub total: Money,
    pub cumulative: Money,
}

/// Group by (type, category), largest total first
pub fn category_breakdown(expenses: &[Expense]) -> Vec<CategoryStat> {
    let mut groups: BTreeMap<(ExpenseType, String), (usize, Money)> = BTreeMap::new();
    for expense in expenses {
        let entry = groups
            .entry((expense.expense_type.clone(), expense.category.clone()))
            .or_default();
        entry.0 += 1;
        entry.1 += expense.amount;
    }

    let mut stats: Vec<CategoryStat> = groups
        .into_iter()
        .map(|((expense_type, category), (count, total))| CategoryStat {
            expense_type,
            category,
            count,
            total,
            average: total.div_round(count as i64),
        })
        .collect();

    // Stable sort keeps the (type, category) order among equal totals
    stats.sort_by(|a, b| b.total.cmp(&a.total));
    stats
}

/// The `n` categories with the highest spend, regardless of type
pub fn top_categories(expenses: &[Expense], n: usize) -> Vec<CategoryShare> {
    let grand_total: Money = expenses.iter().map(|e| e.amount).sum();

    let mut by_category: BTreeMap<&str, Money> = BTreeMap::new();
    for expense in expenses {
        *by_category.entry(expense.category.as_str()).or_default() += expense.amount;
    }

    let mut shares: Vec<CategoryShare> = by_category
        .into_iter()
        .map(|(category, total)| CategoryShare {
            category: category.to_string(),
            total,
            share: Percentage::ratio(total, grand_total),
        })
        .collect();
    shares.sort_by(|a, b| b.total.cmp(&a.total));
    shares.truncate(n);
    shares
}

/// Per-day totals with a running sum, oldest day first
///
/// Only days with at least one expense appear.
pub fn daily_trend(expenses: &[Expense]) -> Vec<DailyPoint> {
    let mut by_day: BTreeMap<NaiveDate, Money> = BTreeMap::new();
    for expense in expenses {
        *by_day.entry(expense.date).or_default() += expense.amount;
    }

    let mut cumulative = Money::zero();
    by_day
        .into_iter()
        .map(|(date, total)| {
            cumulative += total;
            DailyPoint {
                date,
                total,
                cumulative,
            }
        })
        .collect()
}
