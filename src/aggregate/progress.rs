use rust_decimal::Decimal;
use std::fmt;

use super::percentage;
use crate::budgets::Budget;
use crate::error::{Error, Result};
use crate::SpendTrack;

/// Usage levels at which a budget changes status, in percent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusThresholds {
    pub warning: f64,
    pub over: f64,
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self {
            warning: 70.0,
            over: 90.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetStatus {
    OnTrack,
    NearLimit,
    OverBudget,
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BudgetStatus::OnTrack => write!(f, "on track"),
            BudgetStatus::NearLimit => write!(f, "near limit"),
            BudgetStatus::OverBudget => write!(f, "over budget"),
        }
    }
}

/// Spending measured against an allocated amount
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetProgress {
    pub amount: Decimal,
    pub spending: Decimal,
    /// Exactly `amount - spending`
    pub remaining: Decimal,
    /// Share of the amount already spent; may exceed 100
    pub used_percentage: f64,
    pub status: BudgetStatus,
}

impl BudgetProgress {
    pub fn compute(amount: Decimal, spending: Decimal, thresholds: &StatusThresholds) -> Self {
        let remaining = amount.saturating_sub(spending);
        let used_percentage = percentage(spending, amount);

        let status = if remaining < Decimal::ZERO || used_percentage > thresholds.over {
            BudgetStatus::OverBudget
        } else if used_percentage > thresholds.warning {
            BudgetStatus::NearLimit
        } else {
            BudgetStatus::OnTrack
        };

        Self {
            amount,
            spending,
            remaining,
            used_percentage,
            status,
        }
    }

    /// Usage clamped to 100 for progress bars
    pub fn display_percentage(&self) -> f64 {
        self.used_percentage.min(100.0)
    }
}

/// Result of tracking one budget against the backend's spending figures
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetTracking {
    pub budget_id: String,
    pub progress: BudgetProgress,
    /// Status text the backend attached, if any
    pub server_status: Option<String>,
}

/// Fetch the spending of a budget's linked income and measure the budget
///
/// Fails without a request when the budget has no linked income.
pub async fn track_budget(
    client: &SpendTrack,
    budget: &Budget,
    user_id: &str,
    thresholds: &StatusThresholds,
) -> Result<BudgetTracking> {
    let income_id = budget
        .income_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| {
            Error::validation(format!(
                "Budget \"{}\" has no linked income to track",
                budget.description
            ))
        })?;

    let report = client.budgets().track(user_id, income_id).await?;

    Ok(BudgetTracking {
        budget_id: budget.id.clone(),
        progress: BudgetProgress::compute(budget.amount, report.total_spending, thresholds),
        server_status: report.status,
    })
}
