//! Expense totals for a set of records
//!
//! The caller decides the scope (usually one month); this just sums.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{Expense, ExpenseType, Money};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TypeTotals {
    pub fixed: Money,
    pub variable: Money,
    pub daily: Money,
}

impl TypeTotals {
    pub fn get(&self, expense_type: &ExpenseType) -> Option<Money> {
        match expense_type {
            ExpenseType::Fixed => Some(self.fixed),
            ExpenseType::Variable => Some(self.variable),
            ExpenseType::Daily => Some(self.daily),
            ExpenseType::Other(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PersonTotals {
    pub total: Money,
    pub shared: Money,
    pub personal: Money,
}

impl PersonTotals {
    fn add(&mut self, amount: Money, is_shared: bool) {
        self.total += amount;
        if is_shared {
            self.shared += amount;
        } else {
            self.personal += amount;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub total: Money,
    pub shared: Money,
    pub personal: Money,
    pub by_type: TypeTotals,
    pub by_person: BTreeMap<String, PersonTotals>,
}

/// Sum expenses overall, by shared/personal, by type and by payer
///
/// Records with an unrecognised type count everywhere except `by_type`.
pub fn aggregate(expenses: &[Expense]) -> Totals {
    let mut totals = Totals::default();

    for expense in expenses {
        let amount = expense.amount;
        totals.total += amount;
        if expense.is_shared {
            totals.shared += amount;
        } else {
            totals.personal += amount;
        }

        match expense.expense_type {
            ExpenseType::Fixed => totals.by_type.fixed += amount,
            ExpenseType::Variable => totals.by_type.variable += amount,
            ExpenseType::Daily => totals.by_type.daily += amount,
            ExpenseType::Other(_) => {}
        }

        totals
            .by_person
            .entry(expense.paid_by.clone())
            .or_default()
            .add(amount, expense.is_shared);
    }

    totals
}
