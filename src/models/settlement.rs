//! Settlement model
//!
//! A settlement is a payment from one person to the other that reduces the
//! outstanding balance of a month.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::SettlementId;
use super::money::Money;
use super::month::MonthKey;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettlementValidationError {
    MissingFrom,
    MissingTo,
    SamePerson,
    NonPositiveAmount,
    UnknownPerson(String),
}

impl fmt::Display for SettlementValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFrom => write!(f, "from is required"),
            Self::MissingTo => write!(f, "to is required"),
            Self::SamePerson => write!(f, "from and to must be different persons"),
            Self::NonPositiveAmount => write!(f, "amount must be greater than 0"),
            Self::UnknownPerson(p) => write!(f, "'{}' is not a configured person", p),
        }
    }
}

impl std::error::Error for SettlementValidationError {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    pub id: SettlementId,
    /// Month whose balance this payment settles
    pub month: MonthKey,
    pub from: String,
    pub to: String,
    pub amount: Money,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
}

impl Settlement {
    pub fn new(
        month: MonthKey,
        from: impl Into<String>,
        to: impl Into<String>,
        amount: Money,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: SettlementId::new(),
            month,
            from: from.into(),
            to: to.into(),
            amount,
            date,
            description: String::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Check the record on its own and against the configured persons
    pub fn validate(&self, persons: &[String]) -> Vec<SettlementValidationError> {
        let mut errors = Vec::new();
        let from = self.from.trim();
        let to = self.to.trim();

        if from.is_empty() {
            errors.push(SettlementValidationError::MissingFrom);
        }
        if to.is_empty() {
            errors.push(SettlementValidationError::MissingTo);
        }
        if !from.is_empty() && from == to {
            errors.push(SettlementValidationError::SamePerson);
        }
        if !self.amount.is_positive() {
            errors.push(SettlementValidationError::NonPositiveAmount);
        }
        for party in [from, to] {
            if !party.is_empty() && !persons.iter().any(|p| p == party) {
                errors.push(SettlementValidationError::UnknownPerson(party.to_string()));
            }
        }
        errors
    }
}

impl fmt::Display for Settlement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}: {} ({})", self.from, self.to, self.amount, self.month)
    }
}
