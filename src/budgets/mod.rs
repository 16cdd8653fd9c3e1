//! Budget endpoints

mod types;

use reqwest::Method;
use serde_json::Value;

use crate::envelope;
use crate::error::{Error, Result};
use crate::SpendTrack;

pub use types::*;

/// Accessor for `/budget` endpoints
pub struct Budgets<'a> {
    client: &'a SpendTrack,
}

impl<'a> Budgets<'a> {
    pub(crate) fn new(client: &'a SpendTrack) -> Self {
        Self { client }
    }

    /// Budgets owned by `user_id`
    pub async fn list(&self, user_id: &str) -> Result<Vec<Budget>> {
        let value = self
            .client
            .resource(Method::GET, "/budget", &[user_id])
            .send()
            .await?;
        envelope::into_list(value)
    }

    pub async fn create(&self, budget: &NewBudget) -> Result<Value> {
        self.client.post("/budget/create_budget", budget).await
    }

    pub async fn update(&self, id: &str, budget: &NewBudget) -> Result<Value> {
        self.client
            .resource(Method::PUT, "/budget", &[id])
            .json(budget)?
            .send()
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<Value> {
        self.client
            .resource(Method::DELETE, "/budget", &[id])
            .send()
            .await
    }

    /// Spending recorded against the income a budget draws from
    pub async fn track(&self, user_id: &str, income_id: &str) -> Result<TrackingReport> {
        if user_id.trim().is_empty() || income_id.trim().is_empty() {
            return Err(Error::validation(
                "A user and a linked income are required to track a budget",
            ));
        }
        self.client
            .resource(Method::GET, "/budget/view", &[user_id, income_id])
            .execute()
            .await
    }
}
