//! Expense CLI commands
//!
//! Implements CLI commands for recording and managing expenses.

use clap::Subcommand;

use super::{parse_amount, parse_date, parse_expense_type, parse_month};
use crate::config::settings::Settings;
use crate::display::{format_expense_details, format_expense_table};
use crate::error::{LedgerError, LedgerResult};
use crate::services::{CreateExpenseInput, ExpenseFilter, ExpenseService, UpdateExpenseInput};
use crate::storage::Storage;

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record a new expense
    Add {
        /// Expense type: fixed, variable or daily
        #[arg(value_name = "TYPE")]
        expense_type: String,
        /// Category name
        category: String,
        /// Amount (e.g., "42.50")
        amount: String,
        /// Person who paid
        #[arg(short, long)]
        paid_by: String,
        /// Split between both persons
        #[arg(short, long)]
        shared: bool,
        /// Expense date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Description
        #[arg(short = 'm', long)]
        description: Option<String>,
    },

    /// List expenses
    List {
        /// Month (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,
        /// Filter by type
        #[arg(short = 't', long = "type")]
        expense_type: Option<String>,
        /// Filter by payer
        #[arg(short, long)]
        person: Option<String>,
        /// Only shared expenses
        #[arg(long, conflicts_with = "personal")]
        shared: bool,
        /// Only personal expenses
        #[arg(long)]
        personal: bool,
        /// Number of expenses to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show expense details
    Show {
        /// Expense ID or prefix
        id: String,
    },

    /// Edit an expense
    Edit {
        /// Expense ID or prefix
        id: String,
        #[arg(short = 't', long = "type")]
        expense_type: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        amount: Option<String>,
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long)]
        paid_by: Option<String>,
        /// Mark as shared (true) or personal (false)
        #[arg(long)]
        shared: Option<bool>,
        #[arg(short = 'm', long)]
        description: Option<String>,
    },

    /// Delete an expense
    Delete {
        /// Expense ID or prefix
        id: String,
    },
}

/// Handle an expense command
pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> LedgerResult<()> {
    let service = ExpenseService::new(storage).with_settings(settings);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        ExpenseCommands::Add {
            expense_type,
            category,
            amount,
            paid_by,
            shared,
            date,
            description,
        } => {
            let expense = service.create(CreateExpenseInput {
                expense_type: parse_expense_type(&expense_type)?,
                category,
                amount: parse_amount(&amount)?,
                date: parse_date(date.as_deref())?,
                paid_by,
                is_shared: shared,
                description,
            })?;

            println!("Recorded expense: {}", expense.id);
            println!(
                "  {} {} {}",
                expense.date.format("%Y-%m-%d"),
                expense.category,
                expense.amount.format_with_symbol(symbol)
            );
        }

        ExpenseCommands::List {
            month,
            expense_type,
            person,
            shared,
            personal,
            limit,
        } => {
            let mut filter = ExpenseFilter::new();
            if let Some(month) = month {
                filter = filter.month(parse_month(Some(&month))?);
            }
            if let Some(t) = expense_type {
                filter = filter.expense_type(parse_expense_type(&t)?);
            }
            if let Some(person) = person {
                filter = filter.person(person);
            }
            if shared {
                filter = filter.shared(true);
            } else if personal {
                filter = filter.shared(false);
            }
            if let Some(limit) = limit {
                filter = filter.limit(limit);
            }

            let expenses = service.list(&filter)?;
            print!("{}", format_expense_table(&expenses, symbol));
        }

        ExpenseCommands::Show { id } => {
            let expense = service
                .find(&id)?
                .ok_or_else(|| LedgerError::expense_not_found(&id))?;
            print!("{}", format_expense_details(&expense, symbol));
        }

        ExpenseCommands::Edit {
            id,
            expense_type,
            category,
            amount,
            date,
            paid_by,
            shared,
            description,
        } => {
            let expense = service
                .find(&id)?
                .ok_or_else(|| LedgerError::expense_not_found(&id))?;

            let input = UpdateExpenseInput {
                expense_type: expense_type.as_deref().map(parse_expense_type).transpose()?,
                category,
                amount: amount.as_deref().map(parse_amount).transpose()?,
                date: date.as_deref().map(|d| parse_date(Some(d))).transpose()?,
                paid_by,
                is_shared: shared,
                description,
            };

            let updated = service.update(expense.id, input)?;
            println!("Updated expense: {}", updated.id);
        }

        ExpenseCommands::Delete { id } => {
            let expense = service
                .find(&id)?
                .ok_or_else(|| LedgerError::expense_not_found(&id))?;
            let deleted = service.delete(expense.id)?;
            println!(
                "Deleted expense: {} ({} {})",
                deleted.id,
                deleted.category,
                deleted.amount.format_with_symbol(symbol)
            );
        }
    }

    Ok(())
}
