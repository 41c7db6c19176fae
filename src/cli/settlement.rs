//! Settlement CLI commands

use clap::Subcommand;

use super::{parse_amount, parse_date, parse_month};
use crate::config::settings::Settings;
use crate::display::format_settlement_table;
use crate::error::{LedgerError, LedgerResult};
use crate::services::{CreateSettlementInput, SettlementService};
use crate::storage::Storage;

/// Settlement subcommands
#[derive(Subcommand)]
pub enum SettlementCommands {
    /// Record a payment from one person to the other
    Add {
        /// Person paying
        from: String,
        /// Person receiving
        to: String,
        /// Amount (e.g., "30.00")
        amount: String,
        /// Month being settled (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<String>,
        /// Payment date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short = 'n', long)]
        description: Option<String>,
    },

    /// List settlements
    List {
        /// Month (YYYY-MM); all months when omitted
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Delete a settlement
    Delete {
        /// Settlement ID or prefix
        id: String,
    },
}

/// Handle a settlement command
pub fn handle_settlement_command(
    storage: &Storage,
    settings: &Settings,
    cmd: SettlementCommands,
) -> LedgerResult<()> {
    let service = SettlementService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        SettlementCommands::Add {
            from,
            to,
            amount,
            month,
            date,
            description,
        } => {
            let settlement = service.create(CreateSettlementInput {
                month: parse_month(month.as_deref())?,
                from,
                to,
                amount: parse_amount(&amount)?,
                date: parse_date(date.as_deref())?,
                description,
            })?;

            println!(
                "Recorded settlement: {} ({} paid {} {} for {})",
                settlement.id,
                settlement.from,
                settlement.to,
                settlement.amount.format_with_symbol(symbol),
                settlement.month
            );
        }

        SettlementCommands::List { month } => {
            let month = month.as_deref().map(|m| parse_month(Some(m))).transpose()?;
            let settlements = service.list(month)?;
            print!("{}", format_settlement_table(&settlements, symbol));
        }

        SettlementCommands::Delete { id } => {
            let settlement = service
                .find(&id)?
                .ok_or_else(|| LedgerError::settlement_not_found(&id))?;
            let deleted = service.delete(settlement.id)?;
            println!("Deleted settlement: {}", deleted.id);
        }
    }

    Ok(())
}
