use assert_cmd::Command;
use predicates::prelude::*;
use std::error::Error;
use tempfile::TempDir;

fn duo(data_dir: &TempDir) -> Result<Command, Box<dyn Error>> {
    let mut cmd = Command::cargo_bin("duo")?;
    cmd.env("DUO_LEDGER_DATA_DIR", data_dir.path());
    Ok(cmd)
}

fn setup_alice_bob(data_dir: &TempDir) -> Result<(), Box<dyn Error>> {
    duo(data_dir)?
        .args(["split", "set", "Alice=70", "Bob=30"])
        .assert()
        .success();
    Ok(())
}

#[test]
fn no_command_prints_usage_hint() -> Result<(), Box<dyn Error>> {
    let data_dir = TempDir::new()?;
    duo(&data_dir)?
        .assert()
        .success()
        .stdout(predicate::str::contains("duo --help"));
    Ok(())
}

#[test]
fn shared_expense_produces_suggested_transfer() -> Result<(), Box<dyn Error>> {
    let data_dir = TempDir::new()?;
    setup_alice_bob(&data_dir)?;

    duo(&data_dir)?
        .args([
            "expense", "add", "fixed", "Rent", "100", "--paid-by", "Alice", "--shared", "--date",
            "2024-03-01",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded expense"));

    duo(&data_dir)?
        .args(["expense", "list", "--month", "2024-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rent").and(predicate::str::contains("€100.00")));

    duo(&data_dir)?
        .args(["report", "balance", "--month", "2024-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bob pays Alice €30.00"));

    duo(&data_dir)?
        .args(["settlement", "add", "Bob", "Alice", "30", "--month", "2024-03"])
        .assert()
        .success();

    duo(&data_dir)?
        .args(["report", "balance", "--month", "2024-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Balanced"));
    Ok(())
}

#[test]
fn closed_month_rejects_new_expenses() -> Result<(), Box<dyn Error>> {
    let data_dir = TempDir::new()?;

    duo(&data_dir)?
        .args(["split", "close", "2024-02"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Closed 2024-02"));

    duo(&data_dir)?
        .args([
            "expense", "add", "daily", "Coffee", "3.50", "--paid-by", "User1", "--date",
            "2024-02-10",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Month 2024-02 is closed"));

    duo(&data_dir)?
        .args(["split", "reopen", "2024-02"])
        .assert()
        .success();

    duo(&data_dir)?
        .args([
            "expense", "add", "daily", "Coffee", "3.50", "--paid-by", "User1", "--date",
            "2024-02-10",
        ])
        .assert()
        .success();
    Ok(())
}

#[test]
fn invalid_split_is_rejected() -> Result<(), Box<dyn Error>> {
    let data_dir = TempDir::new()?;
    duo(&data_dir)?
        .args(["split", "set", "Alice=60", "Bob=30"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation failed"));
    Ok(())
}

#[test]
fn category_in_use_cannot_be_deleted() -> Result<(), Box<dyn Error>> {
    let data_dir = TempDir::new()?;

    duo(&data_dir)?
        .args([
            "expense", "add", "variable", "Water", "25", "--paid-by", "User2", "--date",
            "2024-05-02",
        ])
        .assert()
        .success();

    duo(&data_dir)?
        .args(["category", "delete", "variable", "Water"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is used by 1 record(s)"));

    duo(&data_dir)?
        .args(["category", "add", "variable", "Internet"])
        .assert()
        .success();

    duo(&data_dir)?
        .args(["category", "delete", "variable", "Internet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted variable category: Internet"));
    Ok(())
}

#[test]
fn export_csv_writes_header_and_rows() -> Result<(), Box<dyn Error>> {
    let data_dir = TempDir::new()?;
    let output = data_dir.path().join("expenses.csv");

    duo(&data_dir)?
        .args([
            "expense", "add", "daily", "Food", "12.40", "--paid-by", "User1", "--date",
            "2024-06-15", "-m", "Lunch",
        ])
        .assert()
        .success();

    duo(&data_dir)?
        .args(["export", "csv"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 record(s)"));

    let contents = std::fs::read_to_string(&output)?;
    assert!(contents.starts_with("Date,Type,Category,Amount,Paid By,Shared,Description"));
    assert!(contents.contains("2024-06-15,daily,Food,12.40,User1,No,Lunch"));
    Ok(())
}

#[test]
fn backup_create_is_daily() -> Result<(), Box<dyn Error>> {
    let data_dir = TempDir::new()?;

    // Startup already takes today's backup
    duo(&data_dir)?
        .args(["backup", "create"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    duo(&data_dir)?
        .args(["backup", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: 1 backup(s)"));
    Ok(())
}
