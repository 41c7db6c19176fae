//! Expense and income categories
//!
//! Categories are plain names with a display emoji. Older data files list
//! categories as bare strings; those are accepted on read and written back
//! in object form.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::expense::ExpenseType;

pub const FIXED_EMOJI: &str = "📋";
pub const VARIABLE_EMOJI: &str = "📊";
pub const DAILY_EMOJI: &str = "💸";
pub const INCOME_EMOJI: &str = "💰";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawCategory")]
pub struct Category {
    pub name: String,
    pub emoji: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCategory {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        emoji: String,
    },
}

impl From<RawCategory> for Category {
    fn from(raw: RawCategory) -> Self {
        match raw {
            RawCategory::Name(name) => Self {
                name,
                emoji: String::new(),
            },
            RawCategory::Full { name, emoji } => Self { name, emoji },
        }
    }
}

impl Category {
    pub fn new(name: impl Into<String>, emoji: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            emoji: emoji.into(),
        }
    }

    /// Fill a blank emoji with the given default
    pub fn with_default_emoji(mut self, emoji: &str) -> Self {
        if self.emoji.trim().is_empty() {
            self.emoji = emoji.to_string();
        }
        self
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.emoji.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} {}", self.emoji, self.name)
        }
    }
}

/// Default emoji for categories of an expense type
pub fn default_emoji(expense_type: &ExpenseType) -> &'static str {
    match expense_type {
        ExpenseType::Fixed => FIXED_EMOJI,
        ExpenseType::Variable => VARIABLE_EMOJI,
        _ => DAILY_EMOJI,
    }
}

/// Contents of `categories.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseCategories {
    #[serde(default, alias = "fijo")]
    pub fixed: Vec<Category>,
    #[serde(default)]
    pub variable: Vec<Category>,
    #[serde(default, alias = "diario")]
    pub daily: Vec<Category>,
}

impl ExpenseCategories {
    /// Categories for a known expense type; `None` for unknown types
    pub fn for_type(&self, expense_type: &ExpenseType) -> Option<&Vec<Category>> {
        match expense_type {
            ExpenseType::Fixed => Some(&self.fixed),
            ExpenseType::Variable => Some(&self.variable),
            ExpenseType::Daily => Some(&self.daily),
            ExpenseType::Other(_) => None,
        }
    }

    pub fn for_type_mut(&mut self, expense_type: &ExpenseType) -> Option<&mut Vec<Category>> {
        match expense_type {
            ExpenseType::Fixed => Some(&mut self.fixed),
            ExpenseType::Variable => Some(&mut self.variable),
            ExpenseType::Daily => Some(&mut self.daily),
            ExpenseType::Other(_) => None,
        }
    }

    pub fn contains(&self, expense_type: &ExpenseType, name: &str) -> bool {
        self.for_type(expense_type)
            .map(|list| list.iter().any(|c| c.name == name))
            .unwrap_or(false)
    }

    /// Replace blank emojis with the per-type default
    pub fn fill_default_emojis(&mut self) {
        for expense_type in ExpenseType::KNOWN {
            let emoji = default_emoji(&expense_type);
            if let Some(list) = self.for_type_mut(&expense_type) {
                for category in list.iter_mut() {
                    if category.emoji.trim().is_empty() {
                        category.emoji = emoji.to_string();
                    }
                }
            }
        }
    }
}

impl Default for ExpenseCategories {
    fn default() -> Self {
        Self {
            fixed: vec![
                Category::new("Rent", "🏠"),
                Category::new("Gym", "💪"),
                Category::new("Installments", "💳"),
            ],
            variable: vec![
                Category::new("Groceries", "🛒"),
                Category::new("Electricity", "💡"),
                Category::new("Water", "💧"),
                Category::new("Gas", "🔥"),
            ],
            daily: vec![
                Category::new("Coffee", "☕"),
                Category::new("Transport", "🚌"),
                Category::new("Food", "🍔"),
            ],
        }
    }
}

/// Default contents of `income-categories.json`
pub fn default_income_categories() -> Vec<Category> {
    vec![
        Category::new("Salary", "💼"),
        Category::new("Freelance", "💻"),
        Category::new("Extras", "✨"),
        Category::new("Bonus", "🎁"),
        Category::new("Other", INCOME_EMOJI),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_string_categories_accepted() {
        let json = r#"{"fijo": ["Arriendo"], "variable": [{"name": "Luz", "emoji": "💡"}], "diario": []}"#;
        let mut categories: ExpenseCategories = serde_json::from_str(json).unwrap();
        assert_eq!(categories.fixed[0].name, "Arriendo");
        assert!(categories.fixed[0].emoji.is_empty());

        categories.fill_default_emojis();
        assert_eq!(categories.fixed[0].emoji, FIXED_EMOJI);
        assert_eq!(categories.variable[0].emoji, "💡");
    }

    #[test]
    fn test_written_in_object_form() {
        let json = serde_json::to_value(ExpenseCategories::default()).unwrap();
        assert_eq!(json["fixed"][0]["name"], "Rent");
        assert_eq!(json["daily"][0]["emoji"], "☕");
    }

    #[test]
    fn test_contains_by_type() {
        let categories = ExpenseCategories::default();
        assert!(categories.contains(&ExpenseType::Fixed, "Rent"));
        assert!(!categories.contains(&ExpenseType::Daily, "Rent"));
        assert!(!categories.contains(&ExpenseType::Other("x".into()), "Rent"));
    }

    #[test]
    fn test_display() {
        assert_eq!(Category::new("Rent", "🏠").to_string(), "🏠 Rent");
        assert_eq!(Category::new("Rent", "").to_string(), "Rent");
        assert_eq!(
            Category::new("Misc", " ").with_default_emoji(INCOME_EMOJI).emoji,
            INCOME_EMOJI
        );
    }
}
