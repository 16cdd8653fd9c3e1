//! Types for budgets

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::amount;
use crate::error::{Error, Result};
use crate::fields::Record;

/// A budget owned by a user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Budget {
    pub id: String,

    pub description: String,

    /// Allocated amount
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub amount: Decimal,

    /// Expiry boundary, as sent by the backend
    pub end_date: Option<String>,

    pub user_id: Option<String>,

    /// Income this budget draws from
    pub income_id: Option<String>,
}

impl<'de> Deserialize<'de> for Budget {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let record = Record::deserialize(deserializer)?;
        Ok(Self {
            id: record.id(),
            description: record.text(&["description"]),
            amount: record.amount(&["amount"]),
            end_date: record.date(&["end_date", "endDate"]),
            user_id: record.reference(&["user_id", "userId"]),
            income_id: record.reference(&["income_id", "incomeId"]),
        })
    }
}

/// Fields of a budget to create or update
#[derive(Debug, Clone, Serialize)]
pub struct NewBudget {
    pub description: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub amount: Decimal,
    pub end_date: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub income_id: Option<String>,
}

impl NewBudget {
    /// Build a budget, normalizing the end date to an ISO timestamp
    pub fn new(
        description: &str,
        amount: Decimal,
        end_date: &str,
        user_id: &str,
        income_id: Option<&str>,
    ) -> Result<Self> {
        if description.trim().is_empty() {
            return Err(Error::validation("Description is required"));
        }
        if amount.is_sign_negative() {
            return Err(Error::validation("Amount cannot be negative"));
        }
        let end = amount::parse_date(end_date)
            .ok_or_else(|| Error::validation(format!("Invalid end date: {}", end_date)))?;

        Ok(Self {
            description: description.trim().to_string(),
            amount,
            end_date: format!("{}T00:00:00.000Z", end.format("%Y-%m-%d")),
            user_id: user_id.to_string(),
            income_id: income_id
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string),
        })
    }
}

/// Spending figures the backend reports for a budget's linked income
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrackingReport {
    #[serde(
        default,
        alias = "totalSpending",
        deserialize_with = "amount::deserialize"
    )]
    pub total_spending: Decimal,

    #[serde(
        default,
        alias = "remainingBudget",
        deserialize_with = "amount::deserialize_opt"
    )]
    pub remaining_budget: Option<Decimal>,

    #[serde(default)]
    pub status: Option<String>,
}
