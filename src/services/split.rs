//! Split configuration service
//!
//! Persons, default split percentages, per-month overrides and the closed
//! month list all live in `config.json`.

use tracing::info;

use super::check;
use crate::audit::EntityType;
use crate::error::LedgerResult;
use crate::models::{MonthKey, PercentageMap, SplitConfig};
use crate::storage::Storage;

/// Every problem with a split configuration, including default percentages
/// keyed by names that are not configured persons
///
/// Month overrides are only checked for their sums here. Their names are
/// checked when the override is written, so renaming persons or closing a
/// month still works while an older override mentions a former person.
pub fn validate_split_config(config: &SplitConfig) -> Vec<String> {
    let mut errors = config.validate();
    errors.extend(unknown_persons(config, &config.split_percentages, None));
    errors
}

fn unknown_persons(config: &SplitConfig, map: &PercentageMap, month: Option<MonthKey>) -> Vec<String> {
    map.keys()
        .filter(|name| !config.has_person(name))
        .map(|name| match month {
            Some(month) => format!("percentage for {} given for unknown person '{}'", month, name),
            None => format!("percentage given for unknown person '{}'", name),
        })
        .collect()
}

pub struct SplitService<'a> {
    storage: &'a Storage,
}

impl<'a> SplitService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn get(&self) -> LedgerResult<SplitConfig> {
        self.storage.config.load()
    }

    pub fn is_closed(&self, month: MonthKey) -> LedgerResult<bool> {
        Ok(self.get()?.is_closed(month))
    }

    /// Apply `f` to the configuration, validate the result and save it
    ///
    /// `written` names the month override `f` replaces, if any.
    fn change(
        &self,
        written: Option<MonthKey>,
        f: impl FnOnce(&mut SplitConfig),
    ) -> LedgerResult<SplitConfig> {
        let (before, after) = self.storage.config.update(|config| {
            let before = config.clone();
            f(config);
            let mut errors = validate_split_config(config);
            if let Some(month) = written {
                if let Some(map) = config.monthly_percentages.get(&month) {
                    errors.extend(unknown_persons(config, map, Some(month)));
                }
            }
            check(errors)?;
            Ok((before, config.clone()))
        })?;

        if before != after {
            self.storage.log_update(
                EntityType::SplitConfig,
                "config",
                None,
                &before,
                &after,
            )?;
        }
        Ok(after)
    }

    /// Replace the persons and the default percentages
    pub fn update(&self, persons: Vec<String>, percentages: PercentageMap) -> LedgerResult<SplitConfig> {
        let persons: Vec<String> = persons.into_iter().map(|p| p.trim().to_string()).collect();
        let config = self.change(None, |config| {
            config.persons = persons;
            config.split_percentages = percentages;
        })?;
        info!(persons = ?config.persons, "split configuration updated");
        Ok(config)
    }

    /// Use different percentages for one month
    pub fn set_month_override(
        &self,
        month: MonthKey,
        percentages: PercentageMap,
    ) -> LedgerResult<SplitConfig> {
        self.change(Some(month), |config| {
            config.monthly_percentages.insert(month, percentages);
        })
    }

    /// Drop a month's override; the default applies again
    pub fn clear_month_override(&self, month: MonthKey) -> LedgerResult<bool> {
        let before = self.get()?;
        let after = self.change(None, |config| {
            config.monthly_percentages.remove(&month);
        })?;
        Ok(before.monthly_percentages.len() != after.monthly_percentages.len())
    }

    /// Returns false if the month was already closed
    pub fn close_month(&self, month: MonthKey) -> LedgerResult<bool> {
        let was_closed = self.is_closed(month)?;
        self.change(None, |config| {
            config.close(month);
        })?;
        if !was_closed {
            info!(%month, "month closed");
        }
        Ok(!was_closed)
    }

    /// Returns false if the month was not closed
    pub fn reopen_month(&self, month: MonthKey) -> LedgerResult<bool> {
        let was_closed = self.is_closed(month)?;
        self.change(None, |config| {
            config.reopen(month);
        })?;
        if was_closed {
            info!(%month, "month reopened");
        }
        Ok(was_closed)
    }
}
