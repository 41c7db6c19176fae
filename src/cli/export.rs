//! CLI commands for data export

use clap::{Subcommand, ValueEnum};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::parse_month;
use crate::error::{LedgerError, LedgerResult};
use crate::export::{export_expenses_csv, export_full_json, export_incomes_csv};
use crate::services::{ExpenseFilter, ExpenseService, IncomeFilter, IncomeService};
use crate::storage::Storage;

/// Which records a CSV export contains
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CsvKind {
    Expenses,
    Incomes,
}

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export expenses or incomes to CSV
    Csv {
        /// Output file path
        output: PathBuf,
        #[arg(short, long, value_enum, default_value = "expenses")]
        kind: CsvKind,
        /// Only this month (YYYY-MM); everything when omitted
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Export every record plus categories and split configuration
    Json {
        /// Output file path
        output: PathBuf,
    },
}

/// Handle export commands
pub fn handle_export_command(storage: &Storage, cmd: ExportCommands) -> LedgerResult<()> {
    match cmd {
        ExportCommands::Csv {
            output,
            kind,
            month,
        } => {
            let month = month.as_deref().map(|m| parse_month(Some(m))).transpose()?;
            let mut writer = create_output(&output)?;

            let count = match kind {
                CsvKind::Expenses => {
                    let mut filter = ExpenseFilter::new();
                    if let Some(month) = month {
                        filter = filter.month(month);
                    }
                    let expenses = ExpenseService::new(storage).list(&filter)?;
                    export_expenses_csv(&expenses, &mut writer)?
                }
                CsvKind::Incomes => {
                    let mut filter = IncomeFilter::new();
                    if let Some(month) = month {
                        filter = filter.month(month);
                    }
                    let incomes = IncomeService::new(storage).list(&filter)?;
                    export_incomes_csv(&incomes, &mut writer)?
                }
            };
            writer.flush()?;

            println!("Exported {} record(s) to: {}", count, output.display());
        }

        ExportCommands::Json { output } => {
            let mut writer = create_output(&output)?;
            let export = export_full_json(storage, &mut writer)?;
            writer.flush()?;

            println!("Full data exported to: {}", output.display());
            println!(
                "  {} expense(s), {} income(s), {} settlement(s)",
                export.expenses.len(),
                export.incomes.len(),
                export.settlements.len()
            );
        }
    }

    Ok(())
}

fn create_output(output: &Path) -> LedgerResult<BufWriter<File>> {
    let file = File::create(output).map_err(|e| {
        LedgerError::Export(format!("Failed to create file {}: {}", output.display(), e))
    })?;
    Ok(BufWriter::new(file))
}
