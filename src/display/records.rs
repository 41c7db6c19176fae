//! Record display formatting
//!
//! Tables of expenses, incomes and settlements, plus single-record detail
//! views.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::report::truncate;
use crate::models::{Expense, Income, Settlement};

#[derive(Tabled)]
struct ExpenseRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Type")]
    expense_type: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Paid by")]
    paid_by: String,
    #[tabled(rename = "Shared")]
    shared: &'static str,
    #[tabled(rename = "Description")]
    description: String,
}

#[derive(Tabled)]
struct IncomeRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Received by")]
    received_by: String,
    #[tabled(rename = "Description")]
    description: String,
}

#[derive(Tabled)]
struct SettlementRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "To")]
    to: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

/// Format expenses as a table
pub fn format_expense_table(expenses: &[Expense], symbol: &str) -> String {
    if expenses.is_empty() {
        return "No expenses found.\n".to_string();
    }

    let rows = expenses.iter().map(|e| ExpenseRow {
        id: e.id.to_string(),
        date: e.date.format("%Y-%m-%d").to_string(),
        expense_type: e.expense_type.to_string(),
        category: e.category.clone(),
        amount: e.amount.format_with_symbol(symbol),
        paid_by: e.paid_by.clone(),
        shared: if e.is_shared { "yes" } else { "no" },
        description: truncate(&e.description, 30),
    });

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    format!("{}\n", table)
}

pub fn format_income_table(incomes: &[Income], symbol: &str) -> String {
    if incomes.is_empty() {
        return "No incomes found.\n".to_string();
    }

    let rows = incomes.iter().map(|i| IncomeRow {
        id: i.id.to_string(),
        date: i.date.format("%Y-%m-%d").to_string(),
        category: i.category.clone(),
        amount: i.amount.format_with_symbol(symbol),
        received_by: i.received_by.clone(),
        description: truncate(&i.description, 30),
    });

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    format!("{}\n", table)
}

pub fn format_settlement_table(settlements: &[Settlement], symbol: &str) -> String {
    if settlements.is_empty() {
        return "No settlements found.\n".to_string();
    }

    let rows = settlements.iter().map(|s| SettlementRow {
        id: s.id.to_string(),
        month: s.month.to_string(),
        date: s.date.format("%Y-%m-%d").to_string(),
        from: s.from.clone(),
        to: s.to.clone(),
        amount: s.amount.format_with_symbol(symbol),
    });

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    format!("{}\n", table)
}

/// Format expense details for display
pub fn format_expense_details(expense: &Expense, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Expense:     {}\n", expense.id.as_uuid()));
    output.push_str(&format!("Date:        {}\n", expense.date.format("%Y-%m-%d")));
    output.push_str(&format!("Type:        {}\n", expense.expense_type));
    output.push_str(&format!("Category:    {}\n", expense.category));
    output.push_str(&format!("Amount:      {}\n", expense.amount.format_with_symbol(symbol)));
    output.push_str(&format!("Paid by:     {}\n", expense.paid_by));
    output.push_str(&format!(
        "Shared:      {}\n",
        if expense.is_shared { "yes" } else { "no" }
    ));
    if !expense.description.is_empty() {
        output.push_str(&format!("Description: {}\n", expense.description));
    }
    output.push_str(&format!(
        "Created:     {}\n",
        expense.created_at.format("%Y-%m-%d %H:%M")
    ));
    if let Some(updated) = expense.updated_at {
        output.push_str(&format!("Updated:     {}\n", updated.format("%Y-%m-%d %H:%M")));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpenseType, Money};
    use chrono::NaiveDate;

    #[test]
    fn test_expense_table() {
        let expense = Expense::new(
            ExpenseType::Daily,
            "Coffee",
            Money::from_cents(350),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            "Alice",
            false,
        );
        let table = format_expense_table(&[expense.clone()], "€");
        assert!(table.contains("Paid by"));
        assert!(table.contains("€3.50"));
        assert!(table.contains(&expense.id.to_string()));

        assert_eq!(format_expense_table(&[], "€"), "No expenses found.\n");
    }

    #[test]
    fn test_expense_details() {
        let expense = Expense::new(
            ExpenseType::Fixed,
            "Rent",
            Money::from_cents(80000),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            "Bob",
            true,
        )
        .with_description("March rent");
        let details = format_expense_details(&expense, "$");
        assert!(details.contains("Amount:      $800.00"));
        assert!(details.contains("Description: March rent"));
        assert!(!details.contains("Updated"));
    }
}
