//! Report formatting for terminal output
//!
//! Plain-text renderings of the monthly summary, balance, breakdowns,
//! checklist, budget status and history.

use crate::models::{Money, PercentageSource};
use crate::reports::{
    BalanceSheet, BudgetStatus, BudgetUsage, CategoryShare, CategoryStat, DailyPoint,
    FixedChecklist, MonthRow, MonthlySummary,
};

const WIDTH: usize = 56;

/// Create a simple bar chart representation
pub fn format_bar(value: i64, max_value: i64, width: usize) -> String {
    if max_value <= 0 || value <= 0 {
        return " ".repeat(width);
    }

    let filled = ((value as f64 / max_value as f64) * width as f64).round() as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Format a separator line
pub fn separator(width: usize) -> String {
    "─".repeat(width)
}

pub fn double_separator(width: usize) -> String {
    "═".repeat(width)
}

/// Truncate a string to a maximum number of characters with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}

fn money(amount: Money, symbol: &str) -> String {
    amount.format_with_symbol(symbol)
}

fn row(label: &str, value: String) -> String {
    format!("  {:<28}{:>24}\n", label, value)
}

fn title(text: &str) -> String {
    format!("{}\n{}\n", text, double_separator(WIDTH))
}

pub fn format_balance(sheet: &BalanceSheet, symbol: &str) -> String {
    let mut output = String::new();
    let source = match sheet.percentages_source {
        PercentageSource::Default => "default split",
        PercentageSource::MonthlyOverride => "monthly override",
    };
    output.push_str(&format!(
        "Balance {} ({}), shared total {}\n",
        sheet.month,
        source,
        money(sheet.total_shared, symbol)
    ));
    output.push_str(&format!(
        "  {:<12} {:>7} {:>12} {:>12} {:>12}\n",
        "Person", "Share", "Paid", "Should pay", "Balance"
    ));
    output.push_str(&format!("  {}\n", separator(WIDTH + 3)));
    for balance in &sheet.balances {
        output.push_str(&format!(
            "  {:<12} {:>7} {:>12} {:>12} {:>12}\n",
            truncate(&balance.person, 12),
            balance.percentage.to_string(),
            money(balance.paid, symbol),
            money(balance.should_pay, symbol),
            money(balance.balance, symbol),
        ));
    }

    match &sheet.transfer {
        Some(transfer) => output.push_str(&format!(
            "\n  {} pays {} {}\n",
            transfer.debtor,
            transfer.creditor,
            money(transfer.amount, symbol)
        )),
        None => output.push_str("\n  Balanced, nothing to settle\n"),
    }
    output
}

pub fn format_summary(summary: &MonthlySummary, symbol: &str) -> String {
    let mut output = String::new();
    let closed = if summary.closed { " [closed]" } else { "" };
    output.push_str(&title(&format!("Summary {}{}", summary.month, closed)));

    output.push_str(&row("Income", money(summary.income_total, symbol)));
    output.push_str(&row("Expenses", money(summary.totals.total, symbol)));
    output.push_str(&row("  shared", money(summary.totals.shared, symbol)));
    output.push_str(&row("  personal", money(summary.totals.personal, symbol)));
    output.push_str(&row("Net", money(summary.net, symbol)));
    output.push_str(&format!("  {}\n", separator(WIDTH - 4)));

    output.push_str(&row("Fixed", money(summary.totals.by_type.fixed, symbol)));
    output.push_str(&row("Variable", money(summary.totals.by_type.variable, symbol)));
    output.push_str(&row("Daily", money(summary.totals.by_type.daily, symbol)));

    if !summary.totals.by_person.is_empty() {
        output.push_str("\nPaid by person\n");
        for (person, totals) in &summary.totals.by_person {
            output.push_str(&row(
                person,
                format!(
                    "{} ({} shared)",
                    money(totals.total, symbol),
                    money(totals.shared, symbol)
                ),
            ));
        }
    }

    if !summary.income_by_person.is_empty() {
        output.push_str("\nIncome by person\n");
        for (person, amount) in &summary.income_by_person {
            output.push_str(&row(person, money(*amount, symbol)));
        }
    }

    output.push_str(&format!(
        "\n  {} expense(s), {} income(s), {} settlement(s)\n\n",
        summary.counts.expenses, summary.counts.incomes, summary.counts.settlements
    ));

    match &summary.balance {
        Some(sheet) => output.push_str(&format_balance(sheet, symbol)),
        None => output.push_str("Balance needs two configured persons\n"),
    }
    output
}

pub fn format_breakdown(stats: &[CategoryStat], symbol: &str) -> String {
    if stats.is_empty() {
        return "No expenses found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<9} {:<18} {:>5} {:>12} {:>12}\n",
        "Type", "Category", "Count", "Total", "Average"
    ));
    output.push_str(&separator(WIDTH + 4));
    output.push('\n');
    for stat in stats {
        output.push_str(&format!(
            "{:<9} {:<18} {:>5} {:>12} {:>12}\n",
            stat.expense_type.to_string(),
            truncate(&stat.category, 18),
            stat.count,
            money(stat.total, symbol),
            money(stat.average, symbol),
        ));
    }
    output
}

pub fn format_top_categories(shares: &[CategoryShare], symbol: &str) -> String {
    if shares.is_empty() {
        return "No expenses found.\n".to_string();
    }

    let max = shares.iter().map(|s| s.total.cents()).max().unwrap_or(0);
    let mut output = String::new();
    for share in shares {
        output.push_str(&format!(
            "{:<18} {} {:>12} {:>7}\n",
            truncate(&share.category, 18),
            format_bar(share.total.cents(), max, 20),
            money(share.total, symbol),
            share.share.to_string(),
        ));
    }
    output
}

pub fn format_trend(points: &[DailyPoint], symbol: &str) -> String {
    if points.is_empty() {
        return "No expenses found.\n".to_string();
    }

    let max = points.iter().map(|p| p.total.cents()).max().unwrap_or(0);
    let mut output = String::new();
    for point in points {
        output.push_str(&format!(
            "{} {} {:>12} {:>12}\n",
            point.date.format("%Y-%m-%d"),
            format_bar(point.total.cents(), max, 20),
            money(point.total, symbol),
            money(point.cumulative, symbol),
        ));
    }
    output
}

pub fn format_checklist(checklist: &FixedChecklist, symbol: &str) -> String {
    if checklist.items.is_empty() {
        return "No fixed expense categories configured.\n".to_string();
    }

    let mut output = String::new();
    for item in &checklist.items {
        let (mark, amount) = match item.paid {
            Some(paid) => ("✓", money(paid, symbol)),
            None if item.expected.is_positive() => ("○", money(item.expected, symbol)),
            None => ("○", "-".to_string()),
        };
        output.push_str(&format!(
            "  {} {} {:<20} {:>12}\n",
            mark,
            item.emoji,
            truncate(&item.category, 20),
            amount
        ));
    }
    output.push_str(&format!("  {}\n", separator(WIDTH - 4)));
    output.push_str(&row("Paid", money(checklist.total_paid, symbol)));
    if checklist.pending.is_positive() {
        output.push_str(&row("Pending", money(checklist.pending, symbol)));
    }
    output
}

fn usage_line(label: &str, usage: &BudgetUsage, symbol: &str) -> String {
    let warning = if usage.is_over() { "  over budget" } else { "" };
    format!(
        "  {:<18} {} {:>12} / {:<12} {:>7}{}\n",
        truncate(label, 18),
        format_bar(usage.spent.cents(), usage.budget.cents(), 15),
        money(usage.spent, symbol),
        money(usage.budget, symbol),
        usage.used.to_string(),
        warning
    )
}

pub fn format_budget_status(status: &BudgetStatus, symbol: &str) -> String {
    let mut output = String::new();

    if status.daily_total.is_none() && status.daily_categories.is_empty() {
        output.push_str("No daily budgets configured.\n");
    }
    if let Some(total) = &status.daily_total {
        output.push_str(&usage_line("Daily total", total, symbol));
    }
    for usage in &status.daily_categories {
        let label = usage.category.as_deref().unwrap_or("?");
        output.push_str(&usage_line(label, usage, symbol));
    }

    if !status.variable_alerts.is_empty() {
        output.push_str("\nVariable expenses over their alert threshold\n");
        for alert in &status.variable_alerts {
            output.push_str(&format!(
                "  ⚠ {:<18} {:>12} (alert at {})\n",
                truncate(&alert.category, 18),
                money(alert.spent, symbol),
                money(alert.alert_at, symbol)
            ));
        }
    }
    output
}

pub fn format_history(rows: &[MonthRow], symbol: &str) -> String {
    if rows.is_empty() {
        return "No records yet.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<8} {:>12} {:>12} {:>12} {:>12} {:>12}\n",
        "Month", "Income", "Expenses", "Shared", "Personal", "Net"
    ));
    output.push_str(&separator(73));
    output.push('\n');
    for r in rows {
        output.push_str(&format!(
            "{:<8} {:>12} {:>12} {:>12} {:>12} {:>12}\n",
            r.month.to_string(),
            money(r.income, symbol),
            money(r.expenses, symbol),
            money(r.shared, symbol),
            money(r.personal, symbol),
            money(r.net, symbol),
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Expense, ExpenseType, MonthKey, SplitConfig};
    use crate::reports::resolve_balance;
    use chrono::NaiveDate;

    #[test]
    fn test_format_bar() {
        let bar = format_bar(50, 100, 10);
        assert_eq!(bar.chars().filter(|c| *c == '█').count(), 5);
        assert_eq!(format_bar(0, 100, 4), "    ");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello World", 5), "He...");
        assert_eq!(truncate("Hi", 5), "Hi");
        assert_eq!(truncate("Café au lait", 6), "Caf...");
    }

    #[test]
    fn test_format_balance_names_transfer() {
        let expenses = vec![Expense::new(
            ExpenseType::Fixed,
            "Rent",
            Money::from_cents(10000),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            "Alice",
            true,
        )];
        let sheet = resolve_balance(
            &expenses,
            &SplitConfig::equal("Alice", "Bob"),
            MonthKey::new(2024, 3).unwrap(),
            &[],
        )
        .unwrap();

        let text = format_balance(&sheet, "€");
        assert!(text.contains("Bob pays Alice"));
        assert!(text.contains("default split"));
    }
}
