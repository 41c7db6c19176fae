//! Split configuration shared by both persons
//!
//! Holds who the two persons are, how shared expenses are divided between
//! them by default, per-month overrides of that division, and which months
//! are closed.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::month::MonthKey;
use super::percentage::Percentage;

pub type PercentageMap = BTreeMap<String, Percentage>;

/// Where the percentages used for a month came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PercentageSource {
    Default,
    MonthlyOverride,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitConfig {
    #[serde(default)]
    pub persons: Vec<String>,

    #[serde(default)]
    pub split_percentages: PercentageMap,

    #[serde(default)]
    pub monthly_percentages: BTreeMap<MonthKey, PercentageMap>,

    #[serde(default)]
    pub closed_months: Vec<MonthKey>,

    /// Keys this crate does not interpret, written back untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self::equal("User1", "User2")
    }
}

impl SplitConfig {
    /// Two persons splitting 50/50
    pub fn equal(first: impl Into<String>, second: impl Into<String>) -> Self {
        let first = first.into();
        let second = second.into();
        let mut split_percentages = PercentageMap::new();
        split_percentages.insert(first.clone(), Percentage::HALF);
        split_percentages.insert(second.clone(), Percentage::HALF);
        Self {
            persons: vec![first, second],
            split_percentages,
            monthly_percentages: BTreeMap::new(),
            closed_months: Vec::new(),
            extra: serde_json::Map::new(),
        }
    }

    pub fn has_person(&self, name: &str) -> bool {
        self.persons.iter().any(|p| p == name)
    }

    /// The percentage map in effect for `month`
    pub fn percentages_for(&self, month: MonthKey) -> (&PercentageMap, PercentageSource) {
        match self.monthly_percentages.get(&month) {
            Some(map) => (map, PercentageSource::MonthlyOverride),
            None => (&self.split_percentages, PercentageSource::Default),
        }
    }

    /// A person's percentage for `month`, 50% when unset
    pub fn percentage_of(&self, person: &str, month: MonthKey) -> Percentage {
        let (map, _) = self.percentages_for(month);
        map.get(person).copied().unwrap_or(Percentage::HALF)
    }

    pub fn is_closed(&self, month: MonthKey) -> bool {
        self.closed_months.contains(&month)
    }

    /// Mark a month closed; returns false if it already was
    pub fn close(&mut self, month: MonthKey) -> bool {
        if self.is_closed(month) {
            return false;
        }
        self.closed_months.push(month);
        self.closed_months.sort();
        true
    }

    /// Reopen a month; returns false if it was not closed
    pub fn reopen(&mut self, month: MonthKey) -> bool {
        let before = self.closed_months.len();
        self.closed_months.retain(|m| *m != month);
        before != self.closed_months.len()
    }

    /// Collect every problem with this configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.persons.len() < 2 {
            errors.push("at least 2 persons are required".to_string());
        }
        if self.persons.iter().any(|p| p.trim().is_empty()) {
            errors.push("person names cannot be empty".to_string());
        }
        for (i, person) in self.persons.iter().enumerate() {
            if self.persons[..i].contains(person) {
                errors.push(format!("person '{}' is listed twice", person));
            }
        }

        if self.split_percentages.is_empty() {
            errors.push("split percentages are required".to_string());
        } else {
            let total: Percentage = self.split_percentages.values().copied().sum();
            if !total.approx_eq(Percentage::HUNDRED) {
                errors.push(format!("percentages must sum to 100% (currently {})", total));
            }
        }

        for (month, map) in &self.monthly_percentages {
            let total: Percentage = map.values().copied().sum();
            if !total.approx_eq(Percentage::HUNDRED) {
                errors.push(format!(
                    "percentages for {} must sum to 100% (currently {})",
                    month, total
                ));
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(s: &str) -> MonthKey {
        s.parse().unwrap()
    }

    #[test]
    fn test_default_is_even_split() {
        let config = SplitConfig::default();
        assert_eq!(config.persons, vec!["User1", "User2"]);
        assert_eq!(config.percentage_of("User1", month("2024-03")), Percentage::HALF);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_monthly_override_wins() {
        let mut config = SplitConfig::equal("Alice", "Bob");
        config.split_percentages.insert("Alice".into(), Percentage::whole(70));
        config.split_percentages.insert("Bob".into(), Percentage::whole(30));

        let mut march = PercentageMap::new();
        march.insert("Alice".into(), Percentage::HALF);
        march.insert("Bob".into(), Percentage::HALF);
        config.monthly_percentages.insert(month("2024-03"), march);

        let (_, source) = config.percentages_for(month("2024-03"));
        assert_eq!(source, PercentageSource::MonthlyOverride);
        assert_eq!(config.percentage_of("Alice", month("2024-03")), Percentage::HALF);

        let (_, source) = config.percentages_for(month("2024-04"));
        assert_eq!(source, PercentageSource::Default);
        assert_eq!(config.percentage_of("Alice", month("2024-04")), Percentage::whole(70));
    }

    #[test]
    fn test_missing_person_defaults_to_half() {
        let mut config = SplitConfig::equal("Alice", "Bob");
        config.split_percentages.remove("Bob");
        assert_eq!(config.percentage_of("Bob", month("2024-03")), Percentage::HALF);
    }

    #[test]
    fn test_validate_sums_and_persons() {
        let mut config = SplitConfig::equal("Alice", "Bob");
        config.persons.truncate(1);
        config.split_percentages.insert("Bob".into(), Percentage::whole(40));
        let errors = config.validate();
        assert_eq!(errors.len(), 2);

        let mut config = SplitConfig::equal("Alice", "Bob");
        let mut march = PercentageMap::new();
        march.insert("Alice".into(), Percentage::from_hundredths(3333));
        march.insert("Bob".into(), Percentage::from_hundredths(6667));
        config.monthly_percentages.insert(month("2024-03"), march);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_close_and_reopen() {
        let mut config = SplitConfig::default();
        assert!(config.close(month("2024-03")));
        assert!(!config.close(month("2024-03")));
        assert!(config.is_closed(month("2024-03")));
        assert!(config.reopen(month("2024-03")));
        assert!(!config.reopen(month("2024-03")));
    }

    #[test]
    fn test_unknown_keys_preserved() {
        let json = r#"{
            "persons": ["Alice", "Bob"],
            "splitPercentages": {"Alice": 60, "Bob": 40},
            "userPins": {"Alice": "x"},
            "masterPin": "y"
        }"#;
        let config: SplitConfig = serde_json::from_str(json).unwrap();
        assert!(config.monthly_percentages.is_empty());
        assert!(config.closed_months.is_empty());
        let back = serde_json::to_value(&config).unwrap();
        assert_eq!(back["masterPin"], "y");
        assert_eq!(back["userPins"]["Alice"], "x");
        assert_eq!(back["splitPercentages"]["Alice"], 60);
    }
}
