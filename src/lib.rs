//! duo-ledger - shared expense tracking for two people
//!
//! This library provides the core of the `duo` command-line tool: expenses
//! and incomes stored per calendar month, shared costs split between two
//! persons by percentage, settlements, closed months and monthly reports.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Path resolution and user settings
//! - `error`: Custom error types
//! - `models`: Core data models (money, records, split configuration, categories)
//! - `storage`: Month-sharded JSON storage, first-run init and migrations
//! - `services`: Validated write path for every record and setting
//! - `reports`: Totals, the balance resolver and the monthly reports
//! - `audit`: Audit logging system
//! - `backup`: Daily backup archives and restore
//! - `export`: CSV and JSON export
//! - `cli`, `display`: Command handlers and terminal formatting
//!
//! # Example
//!
//! ```rust,ignore
//! use duo_ledger::config::paths::LedgerPaths;
//! use duo_ledger::reports::resolve_balance;
//! use duo_ledger::storage::Storage;
//!
//! let storage = Storage::new(LedgerPaths::new()?)?;
//! let month = duo_ledger::models::MonthKey::current();
//! let sheet = resolve_balance(
//!     &storage.expenses.list_month(month)?,
//!     &storage.config.load()?,
//!     month,
//!     &storage.settlements.list_month(month)?,
//! );
//! ```

pub mod audit;
pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{LedgerError, LedgerResult};
