//! CLI commands for reports
//!
//! Monthly dashboards (summary, balance, checklist, budgets) and the
//! category and history reports.

use clap::Subcommand;

use super::parse_month;
use crate::config::settings::Settings;
use crate::display::{
    format_balance, format_breakdown, format_budget_status, format_checklist, format_history,
    format_summary, format_top_categories, format_trend,
};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Expense, ExpenseType, MonthKey};
use crate::reports::{
    budget_status, category_breakdown, daily_trend, fixed_checklist, month_history,
    resolve_balance, top_categories, MonthlySummary,
};
use crate::storage::Storage;

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Monthly dashboard: totals, income, net and balance
    Summary {
        /// Month (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<String>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Who owes whom for a month's shared expenses
    Balance {
        #[arg(short, long)]
        month: Option<String>,
        #[arg(long)]
        json: bool,
    },

    /// Count, total and average per category
    Breakdown {
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Categories with the highest spending
    Top {
        #[arg(short, long)]
        month: Option<String>,
        /// Number of categories to show
        #[arg(short, long, default_value = "5")]
        count: usize,
    },

    /// Spending per day with running total
    Trend {
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Fixed expenses paid and pending
    Checklist {
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Daily budgets and variable expense alerts
    Budget {
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Month-by-month totals across all data
    History,
}

/// Handle report commands
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ReportCommands,
) -> LedgerResult<()> {
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        ReportCommands::Summary { month, json } => {
            let month = parse_month(month.as_deref())?;
            let summary = MonthlySummary::build(
                month,
                &storage.expenses.list_month(month)?,
                &storage.incomes.list_month(month)?,
                &storage.settlements.list_month(month)?,
                &storage.config.load()?,
            );
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", format_summary(&summary, symbol));
            }
        }

        ReportCommands::Balance { month, json } => {
            let month = parse_month(month.as_deref())?;
            let sheet = resolve_balance(
                &storage.expenses.list_month(month)?,
                &storage.config.load()?,
                month,
                &storage.settlements.list_month(month)?,
            )
            .ok_or_else(|| {
                LedgerError::Config("Two persons must be configured to compute a balance".into())
            })?;
            if json {
                println!("{}", serde_json::to_string_pretty(&sheet)?);
            } else {
                print!("{}", format_balance(&sheet, symbol));
            }
        }

        ReportCommands::Breakdown { month } => {
            let expenses = month_expenses(storage, month.as_deref())?;
            print!("{}", format_breakdown(&category_breakdown(&expenses), symbol));
        }

        ReportCommands::Top { month, count } => {
            let expenses = month_expenses(storage, month.as_deref())?;
            print!(
                "{}",
                format_top_categories(&top_categories(&expenses, count), symbol)
            );
        }

        ReportCommands::Trend { month } => {
            let expenses = month_expenses(storage, month.as_deref())?;
            print!("{}", format_trend(&daily_trend(&expenses), symbol));
        }

        ReportCommands::Checklist { month } => {
            let expenses = month_expenses(storage, month.as_deref())?;
            let categories = storage.categories.load()?;
            let checklist = fixed_checklist(
                categories.for_type(&ExpenseType::Fixed).map(Vec::as_slice).unwrap_or(&[]),
                &storage.fixed_config.load()?,
                &expenses,
            );
            print!("{}", format_checklist(&checklist, symbol));
        }

        ReportCommands::Budget { month } => {
            let expenses = month_expenses(storage, month.as_deref())?;
            let categories = storage.categories.load()?;
            let status = budget_status(
                categories.for_type(&ExpenseType::Variable).map(Vec::as_slice).unwrap_or(&[]),
                &storage.daily_config.load()?,
                &storage.variable_config.load()?,
                &expenses,
            );
            print!("{}", format_budget_status(&status, symbol));
        }

        ReportCommands::History => {
            let rows = month_history(&storage.expenses.list_all()?, &storage.incomes.list_all()?);
            print!("{}", format_history(&rows, symbol));
        }
    }

    Ok(())
}

fn month_expenses(storage: &Storage, month: Option<&str>) -> LedgerResult<Vec<Expense>> {
    let month: MonthKey = parse_month(month)?;
    storage.expenses.list_month(month)
}
