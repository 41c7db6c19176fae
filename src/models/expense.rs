//! Expense record model
//!
//! An expense belongs to the month shard of its date. Shared expenses are
//! split between the two configured persons; personal ones are not.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::ExpenseId;
use super::money::Money;
use super::month::MonthKey;

/// Kind of expense
///
/// Stored as a lowercase string. The legacy Spanish names `fijo` and
/// `diario` are read as `Fixed` and `Daily`; anything else unknown is kept
/// verbatim so totals still see it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExpenseType {
    Fixed,
    Variable,
    Daily,
    Other(String),
}

impl ExpenseType {
    pub const KNOWN: [ExpenseType; 3] = [ExpenseType::Fixed, ExpenseType::Variable, ExpenseType::Daily];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Fixed => "fixed",
            Self::Variable => "variable",
            Self::Daily => "daily",
            Self::Other(s) => s,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    /// Parse a user-supplied type name, rejecting unknown kinds
    pub fn parse(s: &str) -> Option<Self> {
        match Self::from(s.to_string()) {
            Self::Other(_) => None,
            known => Some(known),
        }
    }
}

impl From<String> for ExpenseType {
    fn from(s: String) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" | "fijo" => Self::Fixed,
            "variable" => Self::Variable,
            "daily" | "diario" => Self::Daily,
            _ => Self::Other(s),
        }
    }
}

impl From<ExpenseType> for String {
    fn from(t: ExpenseType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for ExpenseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation errors for expenses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseValidationError {
    UnknownType(String),
    MissingCategory,
    NonPositiveAmount,
    MissingPayer,
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownType(t) => {
                write!(f, "type must be one of fixed, variable, daily (got '{}')", t)
            }
            Self::MissingCategory => write!(f, "category is required"),
            Self::NonPositiveAmount => write!(f, "amount must be greater than 0"),
            Self::MissingPayer => write!(f, "paidBy is required"),
        }
    }
}

impl std::error::Error for ExpenseValidationError {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: ExpenseId,

    #[serde(rename = "type")]
    pub expense_type: ExpenseType,

    pub category: String,

    pub amount: Money,

    pub date: NaiveDate,

    pub paid_by: String,

    #[serde(default)]
    pub is_shared: bool,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub created_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Expense {
    pub fn new(
        expense_type: ExpenseType,
        category: impl Into<String>,
        amount: Money,
        date: NaiveDate,
        paid_by: impl Into<String>,
        is_shared: bool,
    ) -> Self {
        Self {
            id: ExpenseId::new(),
            expense_type,
            category: category.into(),
            amount,
            date,
            paid_by: paid_by.into(),
            is_shared,
            description: String::new(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// The month shard this expense belongs to
    pub fn month(&self) -> MonthKey {
        MonthKey::from_date(self.date)
    }

    pub fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }

    /// Collect every problem with this record
    pub fn validate(&self) -> Vec<ExpenseValidationError> {
        let mut errors = Vec::new();
        if let ExpenseType::Other(t) = &self.expense_type {
            errors.push(ExpenseValidationError::UnknownType(t.clone()));
        }
        if self.category.trim().is_empty() {
            errors.push(ExpenseValidationError::MissingCategory);
        }
        if !self.amount.is_positive() {
            errors.push(ExpenseValidationError::NonPositiveAmount);
        }
        if self.paid_by.trim().is_empty() {
            errors.push(ExpenseValidationError::MissingPayer);
        }
        errors
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}/{} {} ({})",
            self.date, self.amount, self.expense_type, self.category, self.paid_by,
            if self.is_shared { "shared" } else { "personal" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_expense_type_legacy_names() {
        assert_eq!(ExpenseType::from("fijo".to_string()), ExpenseType::Fixed);
        assert_eq!(ExpenseType::from("diario".to_string()), ExpenseType::Daily);
        assert_eq!(ExpenseType::from("Variable".to_string()), ExpenseType::Variable);
        assert_eq!(
            ExpenseType::from("misc".to_string()),
            ExpenseType::Other("misc".into())
        );
        assert_eq!(ExpenseType::parse("misc"), None);
    }

    #[test]
    fn test_month_from_date() {
        let e = Expense::new(
            ExpenseType::Daily,
            "Coffee",
            Money::from_cents(350),
            date(2024, 3, 31),
            "Alice",
            false,
        );
        assert_eq!(e.month().to_string(), "2024-03");
    }

    #[test]
    fn test_validate_collects_all_problems() {
        let e = Expense::new(
            ExpenseType::Other("misc".into()),
            " ",
            Money::zero(),
            date(2024, 3, 1),
            "",
            true,
        );
        let errors = e.validate();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ExpenseValidationError::NonPositiveAmount));
    }

    #[test]
    fn test_json_shape_is_camel_case() {
        let e = Expense::new(
            ExpenseType::Fixed,
            "Rent",
            Money::from_cents(80000),
            date(2024, 3, 1),
            "Alice",
            true,
        );
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["type"], "fixed");
        assert_eq!(json["paidBy"], "Alice");
        assert_eq!(json["isShared"], true);
        assert_eq!(json["amount"], 800);
        assert_eq!(json["date"], "2024-03-01");
        assert!(json.get("updatedAt").is_none());
    }

    #[test]
    fn test_reads_legacy_record() {
        let json = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "type": "fijo",
            "category": "Alquiler",
            "amount": 650.5,
            "date": "2024-03-01",
            "paidBy": "Bob",
            "isShared": true,
            "createdAt": "2024-03-01T09:00:00.000Z"
        }"#;
        let e: Expense = serde_json::from_str(json).unwrap();
        assert_eq!(e.expense_type, ExpenseType::Fixed);
        assert_eq!(e.amount.cents(), 65050);
        assert!(e.description.is_empty());
    }
}
