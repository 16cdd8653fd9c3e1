//! Page loads composed from several accessor calls
//!
//! Independent lists are fetched concurrently and joined all-or-nothing;
//! lists that later rows are joined against are fetched first.

use log::error;
use rust_decimal::Decimal;

use crate::aggregate::{self, Breakdown, DashboardSummary, NO_BUDGET, UNCATEGORIZED};
use crate::budgets::Budget;
use crate::categories::Category;
use crate::error::Result;
use crate::expenses::Expense;
use crate::income::Income;
use crate::SpendTrack;

/// A fetched list, or an empty one plus the message to show instead
#[derive(Debug, Clone, PartialEq)]
pub struct ListView<T> {
    pub items: Vec<T>,
    pub error: Option<String>,
}

impl<T> ListView<T> {
    /// Degrade a failed fetch to an empty list with a visible message
    pub fn from_result(result: Result<Vec<T>>) -> Self {
        match result {
            Ok(items) => Self { items, error: None },
            Err(err) => {
                error!("Error loading list: {}", err);
                Self {
                    items: Vec::new(),
                    error: Some(err.message()),
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Everything the overview page renders
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub budgets: Vec<Budget>,
    pub expenses: Vec<Expense>,
    pub income: Vec<Income>,
    pub summary: DashboardSummary,
}

/// Fetch budgets, expenses and income together and summarize them
///
/// Fails as a whole if any of the three fetches fails.
pub async fn load_dashboard(client: &SpendTrack, user_id: &str) -> Result<Dashboard> {
    let budgets_api = client.budgets();
    let expenses_api = client.expenses();
    let income_api = client.income();

    let (budgets, expenses, income) = tokio::try_join!(
        budgets_api.list(user_id),
        expenses_api.list(user_id),
        income_api.list(user_id),
    )?;

    let summary = DashboardSummary::build(&budgets, &expenses, &income);
    Ok(Dashboard {
        budgets,
        expenses,
        income,
        summary,
    })
}

/// An expense with its joins resolved for display
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerRow {
    pub expense: Expense,
    pub category: String,
    pub budget: String,
}

/// The expenses page: rows plus the category split
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseLedger {
    pub categories: Vec<Category>,
    pub budgets: Vec<Budget>,
    pub rows: Vec<LedgerRow>,
    pub total: Decimal,
    pub by_category: Breakdown,
}

impl ExpenseLedger {
    pub fn build(categories: Vec<Category>, expenses: Vec<Expense>, budgets: Vec<Budget>) -> Self {
        let by_category = aggregate::by_category(&expenses, &categories);
        let total = aggregate::total(&expenses);

        let rows = expenses
            .into_iter()
            .map(|expense| {
                let category = lookup(&categories, expense.category_id.as_deref(), |c| {
                    (&c.id, &c.name)
                })
                .unwrap_or_else(|| UNCATEGORIZED.to_string());
                let budget = lookup(&budgets, expense.budget_id.as_deref(), |b| {
                    (&b.id, &b.description)
                })
                .unwrap_or_else(|| NO_BUDGET.to_string());
                LedgerRow {
                    expense,
                    category,
                    budget,
                }
            })
            .collect();

        Self {
            categories,
            budgets,
            rows,
            total,
            by_category,
        }
    }
}

fn lookup<T>(items: &[T], id: Option<&str>, key: impl Fn(&T) -> (&String, &String)) -> Option<String> {
    let id = id?;
    items
        .iter()
        .map(&key)
        .find(|(item_id, _)| item_id.as_str() == id)
        .map(|(_, label)| label.clone())
        .filter(|label| !label.trim().is_empty())
}

/// Fetch categories, then expenses, then budgets, and join them
pub async fn load_expense_ledger(client: &SpendTrack, user_id: &str) -> Result<ExpenseLedger> {
    let categories = client.categories().list().await?;
    let expenses = client.expenses().list(user_id).await?;
    let budgets = client.budgets().list(user_id).await?;

    Ok(ExpenseLedger::build(categories, expenses, budgets))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde_json::json;

    #[test]
    fn failed_fetch_degrades_to_empty_list() {
        let view: ListView<Budget> = ListView::from_result(Err(Error::http(500, "HTTP error! status: 500")));
        assert!(view.is_empty());
        assert_eq!(view.error.as_deref(), Some("HTTP error! status: 500"));

        let view = ListView::from_result(Ok(vec![1, 2, 3]));
        assert_eq!(view.items.len(), 3);
        assert_eq!(view.error, None);
    }

    #[test]
    fn ledger_rows_resolve_joins() {
        let categories: Vec<Category> =
            serde_json::from_value(json!([{"_id": "c1", "name": "Food"}])).unwrap();
        let budgets: Vec<Budget> =
            serde_json::from_value(json!([{"_id": "b1", "description": "Monthly"}])).unwrap();
        let expenses: Vec<Expense> = serde_json::from_value(json!([
            {"_id": "e1", "amount": 12, "category_id": "c1", "budget_id": "b1"},
            {"_id": "e2", "amount": 8, "category_id": "c9"}
        ]))
        .unwrap();

        let ledger = ExpenseLedger::build(categories, expenses, budgets);
        assert_eq!(ledger.rows[0].category, "Food");
        assert_eq!(ledger.rows[0].budget, "Monthly");
        assert_eq!(ledger.rows[1].category, "Uncategorized");
        assert_eq!(ledger.rows[1].budget, "No Budget");
        assert_eq!(ledger.total, Decimal::new(20, 0));
        assert_eq!(ledger.by_category.buckets.len(), 2);
    }
}
