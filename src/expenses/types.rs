//! Types for expenses

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::amount;
use crate::error::{Error, Result};
use crate::fields::Record;

/// A recorded expense
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expense {
    pub id: String,
    pub description: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub amount: Decimal,
    pub date: Option<String>,
    pub user_id: Option<String>,
    pub category_id: Option<String>,
    pub budget_id: Option<String>,
}

impl<'de> Deserialize<'de> for Expense {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let record = Record::deserialize(deserializer)?;
        Ok(Self {
            id: record.id(),
            description: record.text(&["description"]),
            amount: record.amount(&["amount"]),
            date: record.date(&["date"]),
            user_id: record.reference(&["user_id", "userId"]),
            category_id: record.reference(&["category_id", "categoryId"]),
            budget_id: record.reference(&["budget_id", "budgetId"]),
        })
    }
}

/// Fields of an expense to create or update
#[derive(Debug, Clone, Serialize)]
pub struct NewExpense {
    pub description: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub amount: Decimal,
    pub date: String,
    pub category_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_id: Option<String>,
    #[serde(rename = "userId")]
    pub user_id: String,
}

impl NewExpense {
    pub fn new(
        description: &str,
        amount: Decimal,
        date: &str,
        category_id: &str,
        budget_id: Option<&str>,
        user_id: &str,
    ) -> Result<Self> {
        if description.trim().is_empty() {
            return Err(Error::validation("Description is required"));
        }
        if category_id.trim().is_empty() {
            return Err(Error::validation("Please select a category"));
        }
        let day = amount::parse_date(date)
            .ok_or_else(|| Error::validation(format!("Invalid date: {}", date)))?;

        Ok(Self {
            description: description.trim().to_string(),
            amount,
            date: format!("{}T00:00:00.000Z", day.format("%Y-%m-%d")),
            category_id: category_id.to_string(),
            budget_id: budget_id
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string),
            user_id: user_id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expense_tolerates_loose_backend_shapes() {
        let expense: Expense = serde_json::from_value(json!({
            "_id": "e1",
            "id": "e1",
            "description": null,
            "amount": "12.5",
            "date": 1700000000000u64,
            "categoryId": {"_id": "c1", "id": "c1", "name": "Food"},
            "budget_id": "b1",
            "budgetId": "b1"
        }))
        .unwrap();

        assert_eq!(expense.id, "e1");
        assert_eq!(expense.description, "");
        assert_eq!(expense.amount, Decimal::new(125, 1));
        assert_eq!(expense.date, None);
        assert_eq!(expense.category_id.as_deref(), Some("c1"));
        assert_eq!(expense.budget_id.as_deref(), Some("b1"));
    }

    #[test]
    fn new_expense_sends_owner_as_user_id() {
        let expense = NewExpense::new("Taxi", Decimal::new(20, 0), "2026-10-17", "c1", None, "u1")
            .unwrap();
        let value = serde_json::to_value(&expense).unwrap();

        assert_eq!(value["userId"], json!("u1"));
        assert!(value.get("budget_id").is_none());
        assert!(NewExpense::new("Taxi", Decimal::ONE, "2026-10-17", " ", None, "u1").is_err());
    }
}
