//! Who owes whom for a month
//!
//! Shared expenses are divided by the month's split percentages, what each
//! person actually paid is compared with their share, and recorded
//! settlements for the month are applied. The result names at most one
//! transfer that would even things out.
//!
//! The computation is total: it never fails and never second-guesses the
//! percentages it is given. Validating them is the write path's job.

use serde::Serialize;

use crate::models::{Expense, Money, MonthKey, Percentage, PercentageSource, Settlement, SplitConfig};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonBalance {
    pub person: String,
    pub percentage: Percentage,
    /// Shared expenses this person paid
    pub paid: Money,
    /// This person's share of all shared expenses
    pub should_pay: Money,
    /// Positive: owed money. Negative: owes money. Settlements included.
    pub balance: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedTransfer {
    pub debtor: String,
    pub creditor: String,
    pub amount: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSheet {
    pub month: MonthKey,
    pub percentages_source: PercentageSource,
    /// One entry per person, in configuration order
    pub balances: Vec<PersonBalance>,
    pub total_shared: Money,
    /// `None` when the month is balanced
    pub transfer: Option<SuggestedTransfer>,
}

impl BalanceSheet {
    pub fn is_balanced(&self) -> bool {
        self.transfer.is_none()
    }

    pub fn balance_of(&self, person: &str) -> Option<&PersonBalance> {
        self.balances.iter().find(|b| b.person == person)
    }
}

/// Resolve the month's balance between the first two configured persons
///
/// Returns `None` if fewer than two persons are configured. Personal
/// expenses, settlements for other months and settlement parties that are
/// not configured persons are ignored.
pub fn resolve_balance(
    expenses: &[Expense],
    split: &SplitConfig,
    month: MonthKey,
    settlements: &[Settlement],
) -> Option<BalanceSheet> {
    let [first, second] = match split.persons.as_slice() {
        [a, b, ..] => [a.clone(), b.clone()],
        _ => return None,
    };
    let persons = [first, second];

    let shared: Vec<&Expense> = expenses.iter().filter(|e| e.is_shared).collect();
    let total_shared: Money = shared.iter().map(|e| e.amount).sum();

    let paid = persons.clone().map(|person| {
        shared
            .iter()
            .filter(|e| e.paid_by == person)
            .map(|e| e.amount)
            .sum::<Money>()
    });

    let (_, percentages_source) = split.percentages_for(month);
    let percentages = persons.clone().map(|person| split.percentage_of(&person, month));

    let first_share = percentages[0].share_of(total_shared);
    // Percentages within a hundredth of 100 count as a full split, so the
    // second share takes the remainder and the two cover the total exactly
    let second_share = if (percentages[0] + percentages[1]).approx_eq(Percentage::HUNDRED) {
        total_shared - first_share
    } else {
        percentages[1].share_of(total_shared)
    };
    let should_pay = [first_share, second_share];

    let mut balance = [paid[0] - should_pay[0], paid[1] - should_pay[1]];

    for settlement in settlements.iter().filter(|s| s.month == month) {
        let from = persons.iter().position(|p| *p == settlement.from);
        let to = persons.iter().position(|p| *p == settlement.to);
        if let Some(i) = from {
            balance[i] += settlement.amount;
        }
        if let Some(i) = to {
            balance[i] -= settlement.amount;
        }
    }

    let (debtor, creditor) = if balance[1] < balance[0] { (1, 0) } else { (0, 1) };
    let amount = balance[debtor].abs();
    let transfer = if amount.is_zero() {
        None
    } else {
        Some(SuggestedTransfer {
            debtor: persons[debtor].clone(),
            creditor: persons[creditor].clone(),
            amount,
        })
    };

    let balances = (0..2)
        .map(|i| PersonBalance {
            person: persons[i].clone(),
            percentage: percentages[i],
            paid: paid[i],
            should_pay: should_pay[i],
            balance: balance[i],
        })
        .collect();

    Some(BalanceSheet {
        month,
        percentages_source,
        balances,
        total_shared,
        transfer,
    })
}
