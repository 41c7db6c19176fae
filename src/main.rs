use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::warn;

use duo_ledger::backup::BackupManager;
use duo_ledger::cli::{
    handle_audit_command, handle_backup_command, handle_budget_command, handle_category_command,
    handle_expense_command, handle_export_command, handle_income_command, handle_report_command,
    handle_settlement_command, handle_split_command,
};
use duo_ledger::config::{paths::LedgerPaths, settings::Settings};
use duo_ledger::logging::init_tracing;
use duo_ledger::storage::{initialize_storage, run_migrations, Storage};

#[derive(Parser)]
#[command(
    name = "duo",
    version,
    about = "Shared expense tracking for two people",
    long_about = "duo keeps a two-person household ledger: expenses and incomes \
                  stored per month, shared costs split by percentage, settlements, \
                  closed months and monthly reports."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Expense management commands
    #[command(subcommand, alias = "exp")]
    Expense(duo_ledger::cli::ExpenseCommands),

    /// Income management commands
    #[command(subcommand)]
    Income(duo_ledger::cli::IncomeCommands),

    /// Settlement commands
    #[command(subcommand, alias = "settle")]
    Settlement(duo_ledger::cli::SettlementCommands),

    /// Category management commands
    #[command(subcommand)]
    Category(duo_ledger::cli::CategoryCommands),

    /// Persons, split percentages and closed months
    #[command(subcommand)]
    Split(duo_ledger::cli::SplitCommands),

    /// Budget settings commands
    #[command(subcommand)]
    Budget(duo_ledger::cli::BudgetCommands),

    /// Monthly reports
    #[command(subcommand)]
    Report(duo_ledger::cli::ReportCommands),

    /// Backup and restore commands
    #[command(subcommand)]
    Backup(duo_ledger::cli::BackupCommands),

    /// Export data
    #[command(subcommand)]
    Export(duo_ledger::cli::ExportCommands),

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        count: usize,
    },

    /// Initialize the data directory and settings
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let paths = LedgerPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    initialize_storage(&paths)?;
    let report = run_migrations(&paths)?;
    if report.records_unsharded > 0 {
        warn!(
            count = report.records_unsharded,
            "records without a usable date were set aside during migration"
        );
    }

    let storage = Storage::new(paths.clone())?;

    if settings.auto_backup {
        let manager = BackupManager::new(paths.clone(), settings.backup_retention.clone());
        if let Err(e) = manager.create_daily_backup() {
            warn!(error = %e, "daily backup failed");
        }
    }

    match cli.command {
        Some(Commands::Expense(cmd)) => handle_expense_command(&storage, &settings, cmd)?,
        Some(Commands::Income(cmd)) => handle_income_command(&storage, &settings, cmd)?,
        Some(Commands::Settlement(cmd)) => handle_settlement_command(&storage, &settings, cmd)?,
        Some(Commands::Category(cmd)) => handle_category_command(&storage, cmd)?,
        Some(Commands::Split(cmd)) => handle_split_command(&storage, cmd)?,
        Some(Commands::Budget(cmd)) => handle_budget_command(&storage, &settings, cmd)?,
        Some(Commands::Report(cmd)) => handle_report_command(&storage, &settings, cmd)?,
        Some(Commands::Backup(cmd)) => handle_backup_command(&paths, &settings, cmd)?,
        Some(Commands::Export(cmd)) => handle_export_command(&storage, cmd)?,
        Some(Commands::Audit { count }) => handle_audit_command(&storage, count)?,
        Some(Commands::Init) => {
            settings.save(&paths)?;
            println!("Initialized duo-ledger at: {}", paths.base_dir().display());
            println!();
            println!("Default persons are User1 and User2 splitting 50/50.");
            println!("Set your own with: duo split set Alice=50 Bob=50");
        }
        Some(Commands::Config) => {
            println!("duo-ledger Configuration");
            println!("========================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Backup directory: {}", paths.backup_dir().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:       {}", settings.currency_symbol);
            println!("  Enforce closed months: {}", settings.enforce_closed_months);
            println!("  Auto backup:           {}", settings.auto_backup);
            println!("  Backups kept:          {}", settings.backup_retention.keep_count);
        }
        None => {
            println!("duo - shared expense tracking for two people");
            println!();
            println!("Run 'duo --help' for usage information.");
        }
    }

    Ok(())
}
