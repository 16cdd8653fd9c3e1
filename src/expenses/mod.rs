//! Expense endpoints

mod types;

use reqwest::Method;
use serde_json::Value;

use crate::envelope;
use crate::error::Result;
use crate::SpendTrack;

pub use types::*;

/// Accessor for `/expense` endpoints
pub struct Expenses<'a> {
    client: &'a SpendTrack,
}

impl<'a> Expenses<'a> {
    pub(crate) fn new(client: &'a SpendTrack) -> Self {
        Self { client }
    }

    /// Expenses recorded by `user_id`
    pub async fn list(&self, user_id: &str) -> Result<Vec<Expense>> {
        let value = self
            .client
            .resource(Method::GET, "/expense/user", &[user_id])
            .send()
            .await?;
        envelope::into_list(value)
    }

    pub async fn create(&self, expense: &NewExpense) -> Result<Value> {
        self.client.post("/expense/add", expense).await
    }

    pub async fn update(&self, id: &str, expense: &NewExpense) -> Result<Value> {
        self.client
            .resource(Method::PUT, "/expense", &[id])
            .json(expense)?
            .send()
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<Value> {
        self.client
            .resource(Method::DELETE, "/expense", &[id])
            .send()
            .await
    }
}
