//! Plain-text tables for the terminal

use chrono::NaiveDate;
use spendtrack::aggregate::{Breakdown, BudgetProgress, DashboardSummary, TransactionKind};
use spendtrack::amount::display;
use spendtrack::auth::User;
use spendtrack::budgets::Budget;
use spendtrack::categories::Category;
use spendtrack::income::Income;
use spendtrack::reports::BudgetReport;
use spendtrack::views::{ExpenseLedger, ListView};

fn day(raw: Option<&str>) -> String {
    raw.and_then(spendtrack::amount::parse_date)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Print the error line a failed list load leaves behind
pub fn list_error<T>(view: &ListView<T>) {
    if let Some(message) = &view.error {
        eprintln!("Error: {}", message);
    }
}

pub fn user(user: &User) {
    println!("{} <{}> [{}]", user.name, user.email, user.id);
    if user.is_admin() {
        println!("role: admin");
    }
}

pub fn users(view: &ListView<User>) {
    println!("{:<26} {:<24} {:<30} ROLE", "ID", "NAME", "EMAIL");
    for u in &view.items {
        let role = if u.is_admin() { "admin" } else { "user" };
        println!("{:<26} {:<24} {:<30} {}", u.id, u.name, u.email, role);
    }
    list_error(view);
}

pub fn budgets(view: &ListView<Budget>, today: NaiveDate) {
    println!(
        "{:<26} {:<24} {:>12} {:<12} STATUS",
        "ID", "DESCRIPTION", "AMOUNT", "ENDS"
    );
    for b in &view.items {
        println!(
            "{:<26} {:<24} {:>12} {:<12} {}",
            b.id,
            b.description,
            display(b.amount),
            day(b.end_date.as_deref()),
            b.expiry(today)
        );
    }
    list_error(view);
}

pub fn progress(label: &str, progress: &BudgetProgress) {
    println!(
        "{}: spent {} of {} ({:.1}%), remaining {}, {}",
        label,
        display(progress.spending),
        display(progress.amount),
        progress.display_percentage(),
        display(progress.remaining),
        progress.status
    );
}

pub fn ledger(ledger: &ExpenseLedger) {
    println!(
        "{:<26} {:<24} {:>12} {:<12} {:<16} BUDGET",
        "ID", "DESCRIPTION", "AMOUNT", "DATE", "CATEGORY"
    );
    for row in &ledger.rows {
        println!(
            "{:<26} {:<24} {:>12} {:<12} {:<16} {}",
            row.expense.id,
            row.expense.description,
            display(row.expense.amount),
            day(row.expense.date.as_deref()),
            row.category,
            row.budget
        );
    }
    println!("Total: {}", display(ledger.total));
    breakdown("By category", &ledger.by_category);
}

pub fn income(view: &ListView<Income>) {
    println!(
        "{:<26} {:<20} {:>12} {:<12} DESCRIPTION",
        "ID", "SOURCE", "AMOUNT", "DATE"
    );
    for i in &view.items {
        println!(
            "{:<26} {:<20} {:>12} {:<12} {}",
            i.id,
            i.source,
            display(i.amount),
            day(i.date.as_deref()),
            i.description
        );
    }
    list_error(view);
}

pub fn categories(view: &ListView<Category>) {
    println!("{:<26} {:<20} DESCRIPTION", "ID", "NAME");
    for c in &view.items {
        println!(
            "{:<26} {:<20} {}",
            c.id,
            c.name,
            c.description.as_deref().unwrap_or("")
        );
    }
    list_error(view);
}

pub fn breakdown(title: &str, breakdown: &Breakdown) {
    if breakdown.is_empty() {
        return;
    }
    println!("{}:", title);
    for bucket in breakdown.largest_first() {
        println!(
            "  {:<24} {:>12} {:>6.1}%",
            bucket.label,
            display(bucket.amount),
            bucket.percentage
        );
    }
}

pub fn dashboard(summary: &DashboardSummary, by_month: &Breakdown) {
    println!("Total income:   {:>12}", display(summary.total_income));
    println!("Total expenses: {:>12}", display(summary.total_expenses));
    println!(
        "Balance:        {:>12} ({:.1}% of income)",
        display(summary.balance),
        summary.balance_percentage
    );

    println!();
    println!("Recent transactions:");
    for t in &summary.recent {
        let kind = match t.kind {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        };
        println!(
            "  {:<12} {:<8} {:<24} {:>12}",
            t.date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string()),
            kind,
            t.label,
            display(t.signed_amount())
        );
    }

    println!();
    println!("Budgets:");
    for usage in &summary.budgets {
        progress(&format!("  {}", usage.budget.description), &usage.progress);
    }

    println!();
    breakdown("Income by month", by_month);
}

pub fn report(report: &BudgetReport) {
    println!("Start date:     {}", day(report.start_date.as_deref()));
    println!("End date:       {}", day(report.end_date.as_deref()));
    println!("Total income:   {:>12}", display(report.total_income));
    println!("Total expenses: {:>12}", display(report.total_expenses));
    println!("Balance:        {:>12}", display(report.balance));
}
