//! Per-category budget settings
//!
//! Three documents, one per expense type: expected amounts for fixed
//! expenses, estimates and alert thresholds for variable expenses, and
//! monthly budgets for daily spending.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::money::Money;

/// Assignee value meaning both persons share the category
pub const ASSIGNED_TO_BOTH: &str = "Both";

fn default_payment_day() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

/// Expected monthly payment for a fixed-expense category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedExpenseSetting {
    #[serde(default)]
    pub default_amount: Money,
    /// Day of the month the payment is due (1-31)
    #[serde(default = "default_payment_day")]
    pub payment_day: u32,
    #[serde(default)]
    pub assigned_to: String,
    #[serde(default)]
    pub description: String,
}

impl Default for FixedExpenseSetting {
    fn default() -> Self {
        Self {
            default_amount: Money::zero(),
            payment_day: 1,
            assigned_to: String::new(),
            description: String::new(),
        }
    }
}

impl FixedExpenseSetting {
    pub fn validate(&self, persons: &[String]) -> Vec<String> {
        let mut errors = Vec::new();
        if self.default_amount.is_negative() {
            errors.push("defaultAmount cannot be negative".to_string());
        }
        if !(1..=31).contains(&self.payment_day) {
            errors.push(format!("paymentDay must be between 1 and 31 (got {})", self.payment_day));
        }
        if !self.assigned_to.is_empty() && !persons.contains(&self.assigned_to) {
            errors.push(format!("'{}' is not a configured person", self.assigned_to));
        }
        errors
    }
}

/// Estimate and alert threshold for a variable-expense category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableExpenseSetting {
    #[serde(default)]
    pub estimated_amount: Money,
    /// Spending above this amount in a month raises an alert; zero disables it
    #[serde(default)]
    pub budget_alert: Money,
    #[serde(default)]
    pub assigned_to: String,
    #[serde(default)]
    pub description: String,
}

impl VariableExpenseSetting {
    pub fn validate(&self, persons: &[String]) -> Vec<String> {
        let mut errors = Vec::new();
        if self.estimated_amount.is_negative() {
            errors.push("estimatedAmount cannot be negative".to_string());
        }
        if self.budget_alert.is_negative() {
            errors.push("budgetAlert cannot be negative".to_string());
        }
        if !self.assigned_to.is_empty()
            && self.assigned_to != ASSIGNED_TO_BOTH
            && !persons.contains(&self.assigned_to)
        {
            errors.push(format!("'{}' is not a configured person", self.assigned_to));
        }
        errors
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyCategoryBudget {
    #[serde(default)]
    pub monthly_budget: Money,
    #[serde(default = "default_true")]
    pub tracking_enabled: bool,
}

impl Default for DailyCategoryBudget {
    fn default() -> Self {
        Self {
            monthly_budget: Money::zero(),
            tracking_enabled: true,
        }
    }
}

/// Contents of `daily-expenses-config.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyBudgetConfig {
    #[serde(default)]
    pub global_budget: Money,
    #[serde(default)]
    pub categories: BTreeMap<String, DailyCategoryBudget>,
}

impl DailyBudgetConfig {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.global_budget.is_negative() {
            errors.push("globalBudget cannot be negative".to_string());
        }
        for (name, budget) in &self.categories {
            if budget.monthly_budget.is_negative() {
                errors.push(format!("monthlyBudget for '{}' cannot be negative", name));
            }
        }
        errors
    }
}

pub type FixedExpensesConfig = BTreeMap<String, FixedExpenseSetting>;
pub type VariableExpensesConfig = BTreeMap<String, VariableExpenseSetting>;

#[cfg(test)]
mod tests {
    use super::*;

    fn persons() -> Vec<String> {
        vec!["Alice".into(), "Bob".into()]
    }

    #[test]
    fn test_fixed_setting_defaults_from_partial_json() {
        let setting: FixedExpenseSetting = serde_json::from_str(r#"{"defaultAmount": 650}"#).unwrap();
        assert_eq!(setting.default_amount.cents(), 65000);
        assert_eq!(setting.payment_day, 1);
        assert!(setting.validate(&persons()).is_empty());
    }

    #[test]
    fn test_fixed_setting_validation() {
        let setting = FixedExpenseSetting {
            default_amount: Money::from_cents(-1),
            payment_day: 32,
            assigned_to: "Carol".into(),
            description: String::new(),
        };
        assert_eq!(setting.validate(&persons()).len(), 3);
    }

    #[test]
    fn test_variable_setting_accepts_both() {
        let setting = VariableExpenseSetting {
            assigned_to: ASSIGNED_TO_BOTH.into(),
            ..Default::default()
        };
        assert!(setting.validate(&persons()).is_empty());
    }

    #[test]
    fn test_daily_config_defaults() {
        let config: DailyBudgetConfig =
            serde_json::from_str(r#"{"globalBudget": 300, "categories": {"Coffee": {"monthlyBudget": 40}}}"#)
                .unwrap();
        assert_eq!(config.global_budget.cents(), 30000);
        assert!(config.categories["Coffee"].tracking_enabled);
        assert!(config.validate().is_empty());
    }
}
