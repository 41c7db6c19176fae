//! Income record model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::IncomeId;
use super::money::Money;
use super::month::MonthKey;

/// Validation errors for incomes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncomeValidationError {
    MissingCategory,
    NonPositiveAmount,
    MissingReceiver,
}

impl fmt::Display for IncomeValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCategory => write!(f, "category is required"),
            Self::NonPositiveAmount => write!(f, "amount must be greater than 0"),
            Self::MissingReceiver => write!(f, "receivedBy is required"),
        }
    }
}

impl std::error::Error for IncomeValidationError {}

/// Money received by one of the persons
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Income {
    pub id: IncomeId,
    pub category: String,
    pub amount: Money,
    pub date: NaiveDate,
    pub received_by: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Income {
    pub fn new(
        category: impl Into<String>,
        amount: Money,
        date: NaiveDate,
        received_by: impl Into<String>,
    ) -> Self {
        Self {
            id: IncomeId::new(),
            category: category.into(),
            amount,
            date,
            received_by: received_by.into(),
            description: String::new(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn month(&self) -> MonthKey {
        MonthKey::from_date(self.date)
    }

    pub fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }

    pub fn validate(&self) -> Vec<IncomeValidationError> {
        let mut errors = Vec::new();
        if self.category.trim().is_empty() {
            errors.push(IncomeValidationError::MissingCategory);
        }
        if !self.amount.is_positive() {
            errors.push(IncomeValidationError::NonPositiveAmount);
        }
        if self.received_by.trim().is_empty() {
            errors.push(IncomeValidationError::MissingReceiver);
        }
        errors
    }
}
