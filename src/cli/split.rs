//! Split configuration CLI commands
//!
//! Persons, default percentages, per-month overrides and month closing.

use clap::Subcommand;

use super::{parse_month, parse_percentages};
use crate::display::format_split_config;
use crate::error::LedgerResult;
use crate::services::SplitService;
use crate::storage::Storage;

/// Split subcommands
#[derive(Subcommand)]
pub enum SplitCommands {
    /// Show persons, percentages, overrides and closed months
    Show,

    /// Set both persons and their default percentages
    Set {
        /// NAME=PERCENT for each person, e.g. Alice=70 Bob=30
        #[arg(num_args = 2, required = true)]
        shares: Vec<String>,
    },

    /// Use different percentages for one month
    Override {
        /// Month (YYYY-MM)
        month: String,
        /// NAME=PERCENT for each person
        #[arg(num_args = 2, required = true)]
        shares: Vec<String>,
    },

    /// Remove a month's percentage override
    ClearOverride {
        /// Month (YYYY-MM)
        month: String,
    },

    /// Close a month against further edits
    Close {
        /// Month (YYYY-MM), defaults to the current month
        month: Option<String>,
    },

    /// Reopen a closed month
    Reopen {
        /// Month (YYYY-MM)
        month: String,
    },
}

/// Handle a split command
pub fn handle_split_command(storage: &Storage, cmd: SplitCommands) -> LedgerResult<()> {
    let service = SplitService::new(storage);

    match cmd {
        SplitCommands::Show => {
            print!("{}", format_split_config(&service.get()?));
        }

        SplitCommands::Set { shares } => {
            let persons: Vec<String> = shares
                .iter()
                .filter_map(|s| s.split_once('='))
                .map(|(name, _)| name.trim().to_string())
                .collect();
            let percentages = parse_percentages(&shares)?;
            let config = service.update(persons, percentages)?;
            println!("Split configuration updated");
            print!("{}", format_split_config(&config));
        }

        SplitCommands::Override { month, shares } => {
            let month = parse_month(Some(&month))?;
            service.set_month_override(month, parse_percentages(&shares)?)?;
            println!("Override set for {}", month);
        }

        SplitCommands::ClearOverride { month } => {
            let month = parse_month(Some(&month))?;
            if service.clear_month_override(month)? {
                println!("Override removed for {}", month);
            } else {
                println!("No override set for {}", month);
            }
        }

        SplitCommands::Close { month } => {
            let month = parse_month(month.as_deref())?;
            if service.close_month(month)? {
                println!("Closed {}", month);
            } else {
                println!("{} was already closed", month);
            }
        }

        SplitCommands::Reopen { month } => {
            let month = parse_month(Some(&month))?;
            if service.reopen_month(month)? {
                println!("Reopened {}", month);
            } else {
                println!("{} was not closed", month);
            }
        }
    }

    Ok(())
}
