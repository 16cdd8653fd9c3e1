//! Types for income

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::amount;
use crate::error::{Error, Result};
use crate::fields::Record;

/// A recorded income entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Income {
    pub id: String,

    /// Free-text label such as "Salary"
    pub source: String,

    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub amount: Decimal,

    pub date: Option<String>,

    pub description: String,

    pub user_id: Option<String>,
}

impl<'de> Deserialize<'de> for Income {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let record = Record::deserialize(deserializer)?;
        Ok(Self {
            id: record.id(),
            source: record.text(&["source"]),
            amount: record.amount(&["amount"]),
            date: record.date(&["date"]),
            description: record.text(&["description"]),
            user_id: record.reference(&["user_id", "userId"]),
        })
    }
}

/// Fields of an income entry to create or update
#[derive(Debug, Clone, Serialize)]
pub struct NewIncome {
    pub source: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub amount: Decimal,
    pub date: String,
    pub description: String,
    pub user_id: String,
}

impl NewIncome {
    pub fn new(
        source: &str,
        amount: Decimal,
        date: &str,
        description: &str,
        user_id: &str,
    ) -> Result<Self> {
        if source.trim().is_empty() {
            return Err(Error::validation("Source is required"));
        }
        let day = amount::parse_date(date)
            .ok_or_else(|| Error::validation(format!("Invalid date: {}", date)))?;

        Ok(Self {
            source: source.trim().to_string(),
            amount,
            date: format!("{}T00:00:00.000Z", day.format("%Y-%m-%d")),
            description: description.trim().to_string(),
            user_id: user_id.to_string(),
        })
    }
}
