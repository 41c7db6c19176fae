//! Category CLI commands
//!
//! Implements CLI commands for the expense category lists (one per expense
//! type) and the income category list.

use clap::Subcommand;

use super::parse_expense_type;
use crate::display::{format_category_list, format_category_tree};
use crate::error::{LedgerError, LedgerResult};
use crate::services::{CategoryKind, CategoryService};
use crate::storage::Storage;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List categories (all expense types when no kind is given)
    List {
        /// fixed, variable, daily or income
        kind: Option<String>,
    },

    /// Add a category
    Add {
        /// fixed, variable, daily or income
        kind: String,
        /// Category name
        name: String,
        /// Emoji shown next to the name
        #[arg(short, long)]
        emoji: Option<String>,
    },

    /// Rename a category or change its emoji
    Edit {
        /// fixed, variable, daily or income
        kind: String,
        /// Current category name
        category: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        emoji: Option<String>,
    },

    /// Delete a category
    Delete {
        /// fixed, variable, daily or income
        kind: String,
        /// Category name
        name: String,
    },
}

fn parse_kind(kind: &str) -> LedgerResult<CategoryKind> {
    if kind.trim().eq_ignore_ascii_case("income") {
        Ok(CategoryKind::Income)
    } else {
        parse_expense_type(kind).map(CategoryKind::Expense)
    }
}

/// Handle a category command
pub fn handle_category_command(storage: &Storage, cmd: CategoryCommands) -> LedgerResult<()> {
    let service = CategoryService::new(storage);

    match cmd {
        CategoryCommands::List { kind: None } => {
            print!("{}", format_category_tree(&storage.categories.load()?));
            println!();
            println!("income");
            print!("{}", format_category_list(&service.list(&CategoryKind::Income)?));
        }

        CategoryCommands::List { kind: Some(kind) } => {
            let kind = parse_kind(&kind)?;
            println!("{}", kind);
            print!("{}", format_category_list(&service.list(&kind)?));
        }

        CategoryCommands::Add { kind, name, emoji } => {
            let kind = parse_kind(&kind)?;
            let category = service.add(&kind, &name, emoji.as_deref())?;
            println!("Created {} category: {}", kind, category);
        }

        CategoryCommands::Edit {
            kind,
            category,
            name,
            emoji,
        } => {
            if name.is_none() && emoji.is_none() {
                return Err(LedgerError::validation(
                    "Nothing to change: pass --name or --emoji",
                ));
            }
            let kind = parse_kind(&kind)?;
            let updated = service.edit(&kind, &category, name.as_deref(), emoji.as_deref())?;
            println!("Updated {} category: {}", kind, updated);
        }

        CategoryCommands::Delete { kind, name } => {
            let kind = parse_kind(&kind)?;
            let deleted = service.delete(&kind, &name)?;
            println!("Deleted {} category: {}", kind, deleted.name);
        }
    }

    Ok(())
}
