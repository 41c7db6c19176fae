//! Income CLI commands

use clap::Subcommand;

use super::{parse_amount, parse_date, parse_month};
use crate::config::settings::Settings;
use crate::display::format_income_table;
use crate::error::{LedgerError, LedgerResult};
use crate::services::{CreateIncomeInput, IncomeFilter, IncomeService, UpdateIncomeInput};
use crate::storage::Storage;

/// Income subcommands
#[derive(Subcommand)]
pub enum IncomeCommands {
    /// Record income
    Add {
        /// Income category (e.g., "Salary")
        category: String,
        /// Amount (e.g., "2500.00")
        amount: String,
        /// Person who received it
        #[arg(short, long)]
        received_by: String,
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short = 'm', long)]
        description: Option<String>,
    },

    /// List incomes
    List {
        /// Month (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,
        /// Filter by recipient
        #[arg(short, long)]
        person: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Edit an income
    Edit {
        /// Income ID or prefix
        id: String,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        amount: Option<String>,
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long)]
        received_by: Option<String>,
        #[arg(short = 'm', long)]
        description: Option<String>,
    },

    /// Delete an income
    Delete {
        /// Income ID or prefix
        id: String,
    },
}

/// Handle an income command
pub fn handle_income_command(
    storage: &Storage,
    settings: &Settings,
    cmd: IncomeCommands,
) -> LedgerResult<()> {
    let service = IncomeService::new(storage).with_settings(settings);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        IncomeCommands::Add {
            category,
            amount,
            received_by,
            date,
            description,
        } => {
            let income = service.create(CreateIncomeInput {
                category,
                amount: parse_amount(&amount)?,
                date: parse_date(date.as_deref())?,
                received_by,
                description,
            })?;

            println!(
                "Recorded income: {} ({} {} for {})",
                income.id,
                income.category,
                income.amount.format_with_symbol(symbol),
                income.received_by
            );
        }

        IncomeCommands::List {
            month,
            person,
            category,
        } => {
            let mut filter = IncomeFilter::new();
            if let Some(month) = month {
                filter = filter.month(parse_month(Some(&month))?);
            }
            if let Some(person) = person {
                filter = filter.person(person);
            }
            if let Some(category) = category {
                filter = filter.category(category);
            }

            let incomes = service.list(&filter)?;
            print!("{}", format_income_table(&incomes, symbol));
        }

        IncomeCommands::Edit {
            id,
            category,
            amount,
            date,
            received_by,
            description,
        } => {
            let income = service
                .find(&id)?
                .ok_or_else(|| LedgerError::income_not_found(&id))?;

            let updated = service.update(
                income.id,
                UpdateIncomeInput {
                    category,
                    amount: amount.as_deref().map(parse_amount).transpose()?,
                    date: date.as_deref().map(|d| parse_date(Some(d))).transpose()?,
                    received_by,
                    description,
                },
            )?;
            println!("Updated income: {}", updated.id);
        }

        IncomeCommands::Delete { id } => {
            let income = service
                .find(&id)?
                .ok_or_else(|| LedgerError::income_not_found(&id))?;
            let deleted = service.delete(income.id)?;
            println!("Deleted income: {}", deleted.id);
        }
    }

    Ok(())
}
