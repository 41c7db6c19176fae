//! Budget CLI commands
//!
//! Expected amounts for fixed expenses, estimates and alert thresholds for
//! variable expenses, and monthly budgets for daily spending.

use clap::Subcommand;

use super::parse_amount;
use crate::config::settings::Settings;
use crate::error::LedgerResult;
use crate::models::{DailyCategoryBudget, FixedExpenseSetting, VariableExpenseSetting};
use crate::services::BudgetService;
use crate::storage::Storage;

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Show every budget setting
    Show,

    /// Set the expected payment of a fixed category
    Fixed {
        /// Fixed category name
        category: String,
        /// Expected amount
        amount: String,
        /// Day of the month the payment is due
        #[arg(short, long, default_value = "1")]
        day: u32,
        /// Person responsible for paying
        #[arg(short, long)]
        assigned_to: Option<String>,
        #[arg(short = 'm', long)]
        description: Option<String>,
    },

    /// Set the estimate and alert threshold of a variable category
    Variable {
        /// Variable category name
        category: String,
        /// Estimated monthly amount
        estimate: String,
        /// Alert when monthly spending exceeds this amount
        #[arg(short = 'l', long)]
        alert: Option<String>,
        /// Person responsible, or "Both"
        #[arg(short, long)]
        assigned_to: Option<String>,
        #[arg(short = 'm', long)]
        description: Option<String>,
    },

    /// Set the overall monthly budget for daily spending (0 disables it)
    Daily {
        /// Monthly amount
        amount: String,
    },

    /// Set the monthly budget of one daily category
    DailyCategory {
        /// Daily category name
        category: String,
        /// Monthly amount
        amount: String,
        /// Keep the budget but stop tracking it
        #[arg(long)]
        untracked: bool,
    },
}

/// Handle a budget command
pub fn handle_budget_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BudgetCommands,
) -> LedgerResult<()> {
    let service = BudgetService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        BudgetCommands::Show => {
            let fixed = service.fixed_settings()?;
            let variable = service.variable_settings()?;
            let daily = service.daily_settings()?;

            println!("Fixed expenses");
            if fixed.is_empty() {
                println!("  (none configured)");
            }
            for (category, s) in &fixed {
                println!(
                    "  {:<18} {:>12}  day {:>2}  {}",
                    category,
                    s.default_amount.format_with_symbol(symbol),
                    s.payment_day,
                    s.assigned_to
                );
            }

            println!();
            println!("Variable expenses");
            if variable.is_empty() {
                println!("  (none configured)");
            }
            for (category, s) in &variable {
                println!(
                    "  {:<18} {:>12}  alert {:>12}  {}",
                    category,
                    s.estimated_amount.format_with_symbol(symbol),
                    s.budget_alert.format_with_symbol(symbol),
                    s.assigned_to
                );
            }

            println!();
            println!(
                "Daily spending: {}",
                daily.global_budget.format_with_symbol(symbol)
            );
            for (category, b) in &daily.categories {
                let tracked = if b.tracking_enabled { "" } else { " (untracked)" };
                println!(
                    "  {:<18} {:>12}{}",
                    category,
                    b.monthly_budget.format_with_symbol(symbol),
                    tracked
                );
            }
        }

        BudgetCommands::Fixed {
            category,
            amount,
            day,
            assigned_to,
            description,
        } => {
            let setting = service.set_fixed(
                &category,
                FixedExpenseSetting {
                    default_amount: parse_amount(&amount)?,
                    payment_day: day,
                    assigned_to: assigned_to.unwrap_or_default(),
                    description: description.unwrap_or_default(),
                },
            )?;
            println!(
                "{}: {} due on day {}",
                category,
                setting.default_amount.format_with_symbol(symbol),
                setting.payment_day
            );
        }

        BudgetCommands::Variable {
            category,
            estimate,
            alert,
            assigned_to,
            description,
        } => {
            let setting = service.set_variable(
                &category,
                VariableExpenseSetting {
                    estimated_amount: parse_amount(&estimate)?,
                    budget_alert: alert.as_deref().map(parse_amount).transpose()?.unwrap_or_default(),
                    assigned_to: assigned_to.unwrap_or_default(),
                    description: description.unwrap_or_default(),
                },
            )?;
            println!(
                "{}: estimate {}, alert at {}",
                category,
                setting.estimated_amount.format_with_symbol(symbol),
                setting.budget_alert.format_with_symbol(symbol)
            );
        }

        BudgetCommands::Daily { amount } => {
            let config = service.set_daily_global(parse_amount(&amount)?)?;
            println!(
                "Daily spending budget: {}",
                config.global_budget.format_with_symbol(symbol)
            );
        }

        BudgetCommands::DailyCategory {
            category,
            amount,
            untracked,
        } => {
            let monthly_budget = parse_amount(&amount)?;
            service.set_daily_category(
                &category,
                DailyCategoryBudget {
                    monthly_budget,
                    tracking_enabled: !untracked,
                },
            )?;
            println!(
                "{}: {} per month",
                category,
                monthly_budget.format_with_symbol(symbol)
            );
        }
    }

    Ok(())
}
