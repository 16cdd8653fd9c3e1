use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::cmp::Reverse;

use super::{percentage, sum, total, BudgetProgress, Dated, StatusThresholds};
use crate::budgets::Budget;
use crate::expenses::Expense;
use crate::income::Income;

/// Number of budgets and transactions the overview shows
pub const RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Income,
    Expense,
}

/// A row of the recent-activity list
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub kind: TransactionKind,
    pub id: String,
    pub label: String,
    pub amount: Decimal,
    pub date: Option<NaiveDate>,
}

impl Transaction {
    /// Amount with its sign: income positive, expenses negative
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }
}

/// A budget with the expenses charged to it
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetUsage {
    pub budget: Budget,
    pub progress: BudgetProgress,
}

/// Figures for the financial overview
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    /// `total_income - total_expenses`
    pub balance: Decimal,
    /// Balance as a share of income, unsigned; 0 without income
    pub balance_percentage: f64,
    pub recent: Vec<Transaction>,
    pub budgets: Vec<BudgetUsage>,
}

impl DashboardSummary {
    pub fn build(budgets: &[Budget], expenses: &[Expense], income: &[Income]) -> Self {
        Self::build_with(budgets, expenses, income, &StatusThresholds::default())
    }

    pub fn build_with(
        budgets: &[Budget],
        expenses: &[Expense],
        income: &[Income],
        thresholds: &StatusThresholds,
    ) -> Self {
        let total_income = total(income);
        let total_expenses = total(expenses);
        let balance = total_income.saturating_sub(total_expenses);

        Self {
            total_income,
            total_expenses,
            balance,
            balance_percentage: percentage(balance.abs(), total_income),
            recent: recent_transactions(expenses, income, RECENT_LIMIT),
            budgets: budgets
                .iter()
                .take(RECENT_LIMIT)
                .map(|budget| {
                    let spent = sum(
                        expenses
                            .iter()
                            .filter(|e| e.budget_id.as_deref() == Some(budget.id.as_str()))
                            .map(|e| e.amount),
                    );
                    BudgetUsage {
                        progress: BudgetProgress::compute(budget.amount, spent, thresholds),
                        budget: budget.clone(),
                    }
                })
                .collect(),
        }
    }
}

/// Newest transactions first; undated ones sort last
pub fn recent_transactions(expenses: &[Expense], income: &[Income], limit: usize) -> Vec<Transaction> {
    let mut rows: Vec<Transaction> = income
        .iter()
        .map(|i| Transaction {
            kind: TransactionKind::Income,
            id: i.id.clone(),
            label: i.source.clone(),
            amount: i.amount,
            date: i.date(),
        })
        .chain(expenses.iter().map(|e| Transaction {
            kind: TransactionKind::Expense,
            id: e.id.clone(),
            label: e.description.clone(),
            amount: e.amount,
            date: e.date(),
        }))
        .collect();

    // stable: ties keep income-then-expense input order
    rows.sort_by_key(|t| Reverse(t.date));
    rows.truncate(limit);
    rows
}
