//! Category and split configuration display

use crate::models::{Category, ExpenseCategories, ExpenseType, SplitConfig};

/// Format every expense category list as a tree, one branch per type
pub fn format_category_tree(categories: &ExpenseCategories) -> String {
    let mut output = String::new();

    for (i, expense_type) in ExpenseType::KNOWN.iter().enumerate() {
        output.push_str(&format!("{}\n", expense_type));

        let list = categories.for_type(expense_type).map(Vec::as_slice).unwrap_or(&[]);
        if list.is_empty() {
            output.push_str("  (no categories)\n");
        }
        for (j, category) in list.iter().enumerate() {
            let prefix = if j == list.len() - 1 { "└── " } else { "├── " };
            output.push_str(&format!("  {}{}\n", prefix, category));
        }

        if i < ExpenseType::KNOWN.len() - 1 {
            output.push('\n');
        }
    }

    output
}

pub fn format_category_list(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.\n".to_string();
    }
    categories
        .iter()
        .map(|c| format!("  {}\n", c))
        .collect()
}

pub fn format_split_config(config: &SplitConfig) -> String {
    let mut output = String::new();

    output.push_str("Persons and default split:\n");
    for person in &config.persons {
        let pct = config
            .split_percentages
            .get(person)
            .map(ToString::to_string)
            .unwrap_or_else(|| "(unset, 50%)".to_string());
        output.push_str(&format!("  {:<16} {}\n", person, pct));
    }

    if !config.monthly_percentages.is_empty() {
        output.push_str("\nMonthly overrides:\n");
        for (month, map) in config.monthly_percentages.iter().rev() {
            let parts: Vec<String> = map.iter().map(|(p, pct)| format!("{} {}", p, pct)).collect();
            output.push_str(&format!("  {}  {}\n", month, parts.join(", ")));
        }
    }

    if !config.closed_months.is_empty() {
        let closed: Vec<String> = config.closed_months.iter().map(ToString::to_string).collect();
        output.push_str(&format!("\nClosed months: {}\n", closed.join(", ")));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MonthKey;

    #[test]
    fn test_category_tree() {
        let tree = format_category_tree(&ExpenseCategories::default());
        assert!(tree.starts_with("fixed\n"));
        assert!(tree.contains("└── 🍔 Food"));
    }

    #[test]
    fn test_split_config() {
        let mut config = SplitConfig::equal("Alice", "Bob");
        config.close(MonthKey::new(2024, 2).unwrap());
        let text = format_split_config(&config);
        assert!(text.contains("Alice"));
        assert!(text.contains("50%"));
        assert!(text.contains("Closed months: 2024-02"));
    }
}
