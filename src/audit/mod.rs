//! Audit logging for duo-ledger
//!
//! Every create, update and delete performed through the services is
//! appended to `audit.log` as one JSON line, with the record before and/or
//! after the change.
//!
//! ```rust,ignore
//! use duo_ledger::audit::{AuditEntry, AuditLogger, EntityType};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! logger.log(&AuditEntry::create(EntityType::Expense, expense.id.to_string(), None, &expense))?;
//! ```

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
