//! CSV Export functionality
//!
//! Spreadsheet-friendly exports of expenses and incomes. Amounts are
//! written as plain decimals without a currency symbol.

use std::io::Write;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Expense, Income};

fn export_error(e: csv::Error) -> LedgerError {
    LedgerError::Export(e.to_string())
}

/// Write expenses as CSV; returns the number of rows written
pub fn export_expenses_csv<W: Write>(expenses: &[Expense], writer: W) -> LedgerResult<usize> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["Date", "Type", "Category", "Amount", "Paid By", "Shared", "Description"])
        .map_err(export_error)?;

    for expense in expenses {
        csv.write_record([
            expense.date.to_string(),
            expense.expense_type.to_string(),
            expense.category.clone(),
            expense.amount.to_string(),
            expense.paid_by.clone(),
            if expense.is_shared { "Yes" } else { "No" }.to_string(),
            expense.description.clone(),
        ])
        .map_err(export_error)?;
    }

    csv.flush()?;
    Ok(expenses.len())
}

/// Write incomes as CSV; returns the number of rows written
pub fn export_incomes_csv<W: Write>(incomes: &[Income], writer: W) -> LedgerResult<usize> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["Date", "Category", "Amount", "Received By", "Description"])
        .map_err(export_error)?;

    for income in incomes {
        csv.write_record([
            income.date.to_string(),
            income.category.clone(),
            income.amount.to_string(),
            income.received_by.clone(),
            income.description.clone(),
        ])
        .map_err(export_error)?;
    }

    csv.flush()?;
    Ok(incomes.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpenseType, Money};
    use chrono::NaiveDate;

    #[test]
    fn test_export_expenses_csv() {
        let expenses = vec![
            Expense::new(
                ExpenseType::Variable,
                "Groceries",
                Money::from_cents(4550),
                NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
                "Alice",
                true,
            )
            .with_description("milk, eggs"),
            Expense::new(
                ExpenseType::Daily,
                "Coffee",
                Money::from_cents(300),
                NaiveDate::from_ymd_opt(2024, 3, 6).unwrap(),
                "Bob",
                false,
            ),
        ];

        let mut output = Vec::new();
        let rows = export_expenses_csv(&expenses, &mut output).unwrap();
        assert_eq!(rows, 2);

        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Date,Type,Category,Amount,Paid By,Shared,Description");
        assert_eq!(lines[1], "2024-03-05,variable,Groceries,45.50,Alice,Yes,\"milk, eggs\"");
        assert_eq!(lines[2], "2024-03-06,daily,Coffee,3.00,Bob,No,");
    }

    #[test]
    fn test_export_incomes_csv_header_only() {
        let mut output = Vec::new();
        assert_eq!(export_incomes_csv(&[], &mut output).unwrap(), 0);
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Date,Category,Amount,Received By,Description\n"
        );
    }
}
