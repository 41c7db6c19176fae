//! Versioned data migrations
//!
//! Runs at startup before any command touches the data. The version reached
//! is recorded in `data/schema.json`; each step only runs when the recorded
//! version is below it, and each step is itself safe to re-run.
//!
//! 1. Shard legacy flat `expenses.json` / `incomes.json` / `settlements.json`
//!    into `months/<YYYY-MM>/`.
//! 2. Normalize legacy type names, bare-string categories and missing
//!    config keys.
//! 3. Replace non-UUID record ids with deterministic UUIDs.
//!
//! Migrations work on raw JSON so that data the typed models would reject
//! can still be repaired.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::paths::LedgerPaths;
use crate::error::{LedgerError, LedgerResult};
use crate::models::category::{default_emoji, INCOME_EMOJI};
use crate::models::ids::legacy_uuid;
use crate::models::{ExpenseType, MonthKey};

use super::file_io::{read_json, read_json_required, write_json_atomic};
use super::records::list_months;

pub const CURRENT_VERSION: u32 = 3;

const RECORD_KINDS: [&str; 3] = ["expenses", "incomes", "settlements"];

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct SchemaVersion {
    version: u32,
}

/// What a migration run changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub from_version: u32,
    pub to_version: u32,
    pub records_sharded: usize,
    pub records_unsharded: usize,
    pub records_normalized: usize,
    pub ids_rewritten: usize,
}

impl MigrationReport {
    pub fn changed_anything(&self) -> bool {
        self.records_sharded + self.records_unsharded + self.records_normalized + self.ids_rewritten
            > 0
    }
}

/// The schema version recorded in the data directory (0 if none)
pub fn current_version(paths: &LedgerPaths) -> LedgerResult<u32> {
    let schema: SchemaVersion = read_json(paths.schema_file())?;
    Ok(schema.version)
}

/// Bring the data directory up to `CURRENT_VERSION`
pub fn run_migrations(paths: &LedgerPaths) -> LedgerResult<MigrationReport> {
    let from_version = current_version(paths)?;
    let mut report = MigrationReport {
        from_version,
        to_version: from_version.max(CURRENT_VERSION),
        ..Default::default()
    };

    if from_version >= CURRENT_VERSION {
        return Ok(report);
    }

    if from_version < 1 {
        shard_legacy_files(paths, &mut report)?;
    }
    if from_version < 2 {
        normalize_legacy_values(paths, &mut report)?;
    }
    if from_version < 3 {
        rewrite_legacy_ids(paths, &mut report)?;
    }

    write_json_atomic(
        paths.schema_file(),
        &SchemaVersion {
            version: CURRENT_VERSION,
        },
    )?;

    if report.changed_anything() {
        info!(
            from = from_version,
            to = CURRENT_VERSION,
            sharded = report.records_sharded,
            unsharded = report.records_unsharded,
            normalized = report.records_normalized,
            ids = report.ids_rewritten,
            "data migrated"
        );
    }

    Ok(report)
}

fn read_records(path: &std::path::Path) -> LedgerResult<Vec<Value>> {
    match read_json::<Value, _>(path)? {
        Value::Array(records) => Ok(records),
        Value::Null => Ok(Vec::new()),
        _ => Err(LedgerError::Migration(format!(
            "{} does not contain a JSON array",
            path.display()
        ))),
    }
}

fn id_text(record: &Value) -> Option<String> {
    match record.get("id") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// The month a raw record belongs to
fn month_of(kind: &str, record: &Value) -> Option<MonthKey> {
    if kind == "settlements" {
        if let Some(month) = record.get("month").and_then(Value::as_str) {
            return month.parse().ok();
        }
    }
    let date = record.get("date").and_then(Value::as_str)?;
    date.get(..7).and_then(|prefix| prefix.parse().ok())
}

// Step 1

fn shard_legacy_files(paths: &LedgerPaths, report: &mut MigrationReport) -> LedgerResult<()> {
    for kind in RECORD_KINDS {
        let legacy = paths.legacy_file(kind);
        if !legacy.exists() {
            continue;
        }

        let records = match read_json_required::<Value, _>(&legacy)? {
            Value::Array(records) => records,
            _ => {
                return Err(LedgerError::Migration(format!(
                    "{} does not contain a JSON array",
                    legacy.display()
                )))
            }
        };

        let mut by_month: BTreeMap<MonthKey, Vec<Value>> = BTreeMap::new();
        let mut unsharded = Vec::new();
        for record in records {
            match month_of(kind, &record) {
                Some(month) => by_month.entry(month).or_default().push(record),
                None => unsharded.push(record),
            }
        }

        for (month, records) in by_month {
            let path = paths.month_file(month, kind);
            let mut existing = read_records(&path)?;
            let mut known: HashSet<String> = existing.iter().filter_map(id_text).collect();

            for record in records {
                if let Some(id) = id_text(&record) {
                    if !known.insert(id) {
                        continue;
                    }
                }
                existing.push(record);
                report.records_sharded += 1;
            }
            write_json_atomic(&path, &existing)?;
        }

        if !unsharded.is_empty() {
            let path = paths.data_dir().join(format!("{}.unsharded.json", kind));
            warn!(
                kind,
                count = unsharded.len(),
                file = %path.display(),
                "records without a usable date were set aside"
            );
            let mut kept = read_records(&path)?;
            report.records_unsharded += unsharded.len();
            kept.extend(unsharded);
            write_json_atomic(&path, &kept)?;
        }

        let renamed = legacy.with_extension("json.legacy");
        fs::rename(&legacy, &renamed).map_err(|e| {
            LedgerError::Migration(format!("Failed to rename {}: {}", legacy.display(), e))
        })?;
        info!(kind, file = %renamed.display(), "legacy file sharded by month");
    }

    Ok(())
}

// Step 2

fn normalize_record(kind: &str, record: &mut Value) -> bool {
    let Some(obj) = record.as_object_mut() else {
        return false;
    };
    let mut changed = false;

    if kind == "expenses" {
        let renamed = match obj.get("type") {
            Some(Value::String(t)) => {
                let normalized = ExpenseType::from(t.clone());
                (normalized.is_known() && normalized.as_str() != t)
                    .then(|| normalized.as_str().to_string())
            }
            _ => None,
        };
        if let Some(t) = renamed {
            obj.insert("type".into(), Value::String(t));
            changed = true;
        }
    }

    // Full timestamps become plain dates
    let date_prefix = match obj.get("date") {
        Some(Value::String(date)) if date.len() > 10 => date.get(..10).map(str::to_string),
        _ => None,
    };
    if let Some(prefix) = date_prefix {
        if chrono::NaiveDate::parse_from_str(&prefix, "%Y-%m-%d").is_ok() {
            obj.insert("date".into(), Value::String(prefix));
            changed = true;
        }
    }

    changed
}

fn normalize_category_list(list: &mut Value, emoji: &str) -> bool {
    let Some(items) = list.as_array_mut() else {
        return false;
    };
    let mut changed = false;
    for item in items.iter_mut() {
        match item {
            Value::String(name) => {
                let mut category = Map::new();
                category.insert("name".into(), Value::String(name.clone()));
                category.insert("emoji".into(), Value::String(emoji.to_string()));
                *item = Value::Object(category);
                changed = true;
            }
            Value::Object(obj) => {
                let blank = obj
                    .get("emoji")
                    .and_then(Value::as_str)
                    .map(|e| e.trim().is_empty())
                    .unwrap_or(true);
                if blank {
                    obj.insert("emoji".into(), Value::String(emoji.to_string()));
                    changed = true;
                }
            }
            _ => {}
        }
    }
    changed
}

fn normalize_categories(paths: &LedgerPaths) -> LedgerResult<bool> {
    let path = paths.categories_file();
    let mut doc: Value = read_json(&path)?;
    let Some(obj) = doc.as_object_mut() else {
        return Ok(false);
    };
    let mut changed = false;

    for (legacy, current) in [("fijo", "fixed"), ("diario", "daily")] {
        if let Some(Value::Array(old)) = obj.remove(legacy) {
            let target = obj
                .entry(current.to_string())
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(list) = target {
                list.extend(old);
            }
            changed = true;
        }
    }

    for expense_type in ExpenseType::KNOWN {
        if let Some(list) = obj.get_mut(expense_type.as_str()) {
            changed |= normalize_category_list(list, default_emoji(&expense_type));
        }
    }

    if changed {
        write_json_atomic(&path, &doc)?;
    }

    let income_path = paths.income_categories_file();
    let mut incomes: Value = read_json(&income_path)?;
    if normalize_category_list(&mut incomes, INCOME_EMOJI) {
        write_json_atomic(&income_path, &incomes)?;
        changed = true;
    }

    Ok(changed)
}

fn normalize_config(paths: &LedgerPaths) -> LedgerResult<bool> {
    let path = paths.config_file();
    let mut doc: Value = read_json(&path)?;
    let Some(obj) = doc.as_object_mut() else {
        return Ok(false);
    };
    let mut changed = false;

    match obj.get_mut("monthlyPercentages") {
        Some(Value::Object(months)) => {
            let bad: Vec<String> = months
                .keys()
                .filter(|k| k.parse::<MonthKey>().is_err())
                .cloned()
                .collect();
            for key in bad {
                warn!(month = %key, "dropping percentage override with malformed month");
                months.remove(&key);
                changed = true;
            }
        }
        _ => {
            obj.insert("monthlyPercentages".into(), Value::Object(Map::new()));
            changed = true;
        }
    }

    match obj.get_mut("closedMonths") {
        Some(Value::Array(months)) => {
            let before = months.len();
            months.retain(|m| m.as_str().map(|s| s.parse::<MonthKey>().is_ok()).unwrap_or(false));
            if months.len() != before {
                warn!("dropping malformed closed months");
                changed = true;
            }
        }
        _ => {
            obj.insert("closedMonths".into(), Value::Array(Vec::new()));
            changed = true;
        }
    }

    if changed {
        write_json_atomic(&path, &doc)?;
    }
    Ok(changed)
}

fn normalize_legacy_values(paths: &LedgerPaths, report: &mut MigrationReport) -> LedgerResult<()> {
    for month in list_months(paths)? {
        for kind in RECORD_KINDS {
            let path = paths.month_file(month, kind);
            if !path.exists() {
                continue;
            }
            let mut records = read_records(&path)?;
            let mut changed = 0;
            for record in records.iter_mut() {
                if normalize_record(kind, record) {
                    changed += 1;
                }
            }
            if changed > 0 {
                write_json_atomic(&path, &records)?;
                report.records_normalized += changed;
            }
        }
    }

    if paths.categories_file().exists() && normalize_categories(paths)? {
        info!("categories normalized to name/emoji form");
    }
    if paths.config_file().exists() && normalize_config(paths)? {
        info!("split configuration normalized");
    }

    Ok(())
}

// Step 3

fn rewrite_id(record: &mut Value) -> bool {
    let Some(obj) = record.as_object_mut() else {
        return false;
    };
    let replacement = match obj.get("id") {
        Some(Value::String(s)) if Uuid::parse_str(s).is_ok() => return false,
        Some(Value::String(s)) if !s.trim().is_empty() => legacy_uuid(s.trim()),
        Some(Value::Number(n)) => legacy_uuid(&n.to_string()),
        _ => Uuid::new_v4(),
    };
    obj.insert("id".into(), Value::String(replacement.to_string()));
    true
}

fn rewrite_legacy_ids(paths: &LedgerPaths, report: &mut MigrationReport) -> LedgerResult<()> {
    for month in list_months(paths)? {
        for kind in RECORD_KINDS {
            let path = paths.month_file(month, kind);
            if !path.exists() {
                continue;
            }
            let mut records = read_records(&path)?;
            let mut changed = 0;
            for record in records.iter_mut() {
                if rewrite_id(record) {
                    changed += 1;
                }
            }
            if changed > 0 {
                write_json_atomic(&path, &records)?;
                report.ids_rewritten += changed;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Expense, ExpenseCategories, Settlement, SplitConfig};
    use crate::storage::init::initialize_storage;
    use serde_json::json;
    use tempfile::TempDir;

    fn setup() -> (LedgerPaths, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();
        (paths, temp_dir)
    }

    fn legacy_expenses() -> Value {
        json!([
            {"id": 1709251200000u64, "type": "fijo", "category": "Arriendo", "amount": 650,
             "date": "2024-03-01", "paidBy": "Alice", "isShared": true},
            {"id": "1709337600000", "type": "diario", "category": "Café", "amount": 3.5,
             "date": "2024-04-02T08:30:00.000Z", "paidBy": "Bob", "isShared": false},
            {"id": "x", "type": "variable", "category": "Luz", "amount": 40, "paidBy": "Bob", "isShared": true}
        ])
    }

    #[test]
    fn test_fresh_directory_reaches_current_version() {
        let (paths, _temp) = setup();
        initialize_storage(&paths).unwrap();

        let report = run_migrations(&paths).unwrap();
        assert_eq!(report.from_version, 0);
        assert_eq!(report.to_version, CURRENT_VERSION);
        assert!(!report.changed_anything());
        assert_eq!(current_version(&paths).unwrap(), CURRENT_VERSION);
    }

    #[test]
    fn test_legacy_expenses_sharded_and_normalized() {
        let (paths, _temp) = setup();
        write_json_atomic(paths.legacy_file("expenses"), &legacy_expenses()).unwrap();

        let report = run_migrations(&paths).unwrap();
        assert_eq!(report.records_sharded, 2);
        assert_eq!(report.records_unsharded, 1);
        assert_eq!(report.ids_rewritten, 2);

        assert!(!paths.legacy_file("expenses").exists());
        assert!(paths.data_dir().join("expenses.json.legacy").exists());
        assert!(paths.data_dir().join("expenses.unsharded.json").exists());

        let march: Vec<Expense> =
            read_json(paths.month_file("2024-03".parse().unwrap(), "expenses")).unwrap();
        assert_eq!(march.len(), 1);
        assert_eq!(march[0].expense_type, ExpenseType::Fixed);
        assert_eq!(march[0].id.as_uuid(), &legacy_uuid("1709251200000"));

        let april: Vec<Expense> =
            read_json(paths.month_file("2024-04".parse().unwrap(), "expenses")).unwrap();
        assert_eq!(april[0].expense_type, ExpenseType::Daily);
        assert_eq!(april[0].date.to_string(), "2024-04-02");
    }

    #[test]
    fn test_migration_is_idempotent() {
        let (paths, _temp) = setup();
        write_json_atomic(paths.legacy_file("expenses"), &legacy_expenses()).unwrap();
        run_migrations(&paths).unwrap();
        let march = paths.month_file("2024-03".parse().unwrap(), "expenses");
        let first = fs::read_to_string(&march).unwrap();

        let report = run_migrations(&paths).unwrap();
        assert!(!report.changed_anything());
        assert_eq!(fs::read_to_string(&march).unwrap(), first);

        // Even a forced re-run of every step leaves the data as it was
        write_json_atomic(paths.schema_file(), &SchemaVersion { version: 0 }).unwrap();
        let report = run_migrations(&paths).unwrap();
        assert!(!report.changed_anything());
        assert_eq!(fs::read_to_string(&march).unwrap(), first);
    }

    #[test]
    fn test_sharding_skips_ids_already_present() {
        let (paths, _temp) = setup();
        let march = paths.month_file("2024-03".parse().unwrap(), "settlements");
        write_json_atomic(
            &march,
            &json!([{"id": "s1", "month": "2024-03", "from": "Bob", "to": "Alice", "amount": 30, "date": "2024-04-01"}]),
        )
        .unwrap();
        write_json_atomic(
            paths.legacy_file("settlements"),
            &json!([
                {"id": "s1", "month": "2024-03", "from": "Bob", "to": "Alice", "amount": 30, "date": "2024-04-01"},
                {"id": "s2", "month": "2024-03", "from": "Alice", "to": "Bob", "amount": 5, "date": "2024-04-03"}
            ]),
        )
        .unwrap();

        run_migrations(&paths).unwrap();
        let settlements: Vec<Settlement> = read_json(&march).unwrap();
        assert_eq!(settlements.len(), 2);
    }

    #[test]
    fn test_categories_and_config_normalized() {
        let (paths, _temp) = setup();
        write_json_atomic(
            paths.categories_file(),
            &json!({"fijo": ["Arriendo"], "variable": [{"name": "Luz", "emoji": "💡"}], "diario": ["Café"]}),
        )
        .unwrap();
        write_json_atomic(paths.income_categories_file(), &json!(["Salario"])).unwrap();
        write_json_atomic(
            paths.config_file(),
            &json!({"persons": ["Alice", "Bob"], "splitPercentages": {"Alice": 50, "Bob": 50}, "masterPin": "0000"}),
        )
        .unwrap();

        run_migrations(&paths).unwrap();

        let raw: Value = read_json(paths.categories_file()).unwrap();
        assert!(raw.get("fijo").is_none());
        assert_eq!(raw["fixed"][0], json!({"name": "Arriendo", "emoji": "📋"}));
        let categories: ExpenseCategories = read_json(paths.categories_file()).unwrap();
        assert_eq!(categories.daily[0].emoji, "💸");

        let incomes: Value = read_json(paths.income_categories_file()).unwrap();
        assert_eq!(incomes[0]["emoji"], INCOME_EMOJI);

        let config: SplitConfig = read_json(paths.config_file()).unwrap();
        assert!(config.closed_months.is_empty());
        let raw: Value = read_json(paths.config_file()).unwrap();
        assert_eq!(raw["monthlyPercentages"], json!({}));
        assert_eq!(raw["masterPin"], "0000");
    }
}
