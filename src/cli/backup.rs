//! Backup CLI commands
//!
//! Implements CLI commands for backup management.

use clap::Subcommand;
use std::path::PathBuf;

use crate::backup::{BackupManager, RestoreManager};
use crate::config::paths::LedgerPaths;
use crate::config::settings::Settings;
use crate::error::{LedgerError, LedgerResult};

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Create today's backup (skipped if it already exists)
    Create,

    /// List all available backups
    List,

    /// Restore from a backup
    Restore {
        /// Backup filename or path (use 'latest' for most recent)
        backup: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Delete old backups according to retention policy
    Prune,
}

/// Handle a backup command
pub fn handle_backup_command(
    paths: &LedgerPaths,
    settings: &Settings,
    cmd: BackupCommands,
) -> LedgerResult<()> {
    let manager = BackupManager::new(paths.clone(), settings.backup_retention.clone());

    match cmd {
        BackupCommands::Create => match manager.create_daily_backup()? {
            Some(path) => {
                println!("Backup created: {}", path.display());
            }
            None => {
                println!("Today's backup already exists, nothing to do.");
            }
        },

        BackupCommands::List => {
            let backups = manager.list_backups()?;

            if backups.is_empty() {
                println!("No backups found.");
                println!("Create one with: duo backup create");
                return Ok(());
            }

            println!("Available Backups");
            println!("=================");
            for (i, backup) in backups.iter().enumerate() {
                println!(
                    "  {}. {} ({})",
                    i + 1,
                    backup.filename,
                    format_size(backup.size_bytes)
                );
            }
            println!();
            println!(
                "Total: {} backup(s), keeping the newest {}",
                backups.len(),
                settings.backup_retention.keep_count
            );
        }

        BackupCommands::Restore { backup, force } => {
            let backup_path = resolve_backup_path(&manager, &backup)?;

            if !force {
                println!("Restoring from: {}", backup_path.display());
                println!("WARNING: This will overwrite the configuration and every month in the backup!");
                println!("To proceed, run again with --force flag:");
                println!("  duo backup restore {} --force", backup);
                return Ok(());
            }

            let result = RestoreManager::new(paths.clone()).restore_from_file(&backup_path)?;
            println!("Restore complete!");
            println!("{}", result.summary());
        }

        BackupCommands::Prune => {
            let deleted = manager.enforce_retention()?;
            if deleted.is_empty() {
                println!("No backups to prune.");
            } else {
                println!("Deleted {} backup(s).", deleted.len());
            }
        }
    }

    Ok(())
}

/// Resolve a backup identifier to a full path
fn resolve_backup_path(manager: &BackupManager, backup: &str) -> LedgerResult<PathBuf> {
    if backup.eq_ignore_ascii_case("latest") {
        return manager
            .get_latest_backup()?
            .map(|b| b.path)
            .ok_or_else(|| LedgerError::NotFound {
                entity_type: "Backup",
                identifier: "latest".to_string(),
            });
    }

    let path = PathBuf::from(backup);
    if path.exists() {
        return Ok(path);
    }

    let in_dir = manager.backup_dir().join(backup);
    if in_dir.exists() {
        return Ok(in_dir);
    }

    let with_ext = manager.backup_dir().join(format!("{}.json", backup));
    if with_ext.exists() {
        return Ok(with_ext);
    }

    Err(LedgerError::NotFound {
        entity_type: "Backup",
        identifier: backup.to_string(),
    })
}

/// Format a file size in human-readable form
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
