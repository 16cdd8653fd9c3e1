//! Income endpoints

mod types;

use reqwest::Method;
use serde_json::Value;

use crate::envelope;
use crate::error::Result;
use crate::SpendTrack;

pub use types::*;

/// Accessor for `/income` endpoints
pub struct IncomeApi<'a> {
    client: &'a SpendTrack,
}

impl<'a> IncomeApi<'a> {
    pub(crate) fn new(client: &'a SpendTrack) -> Self {
        Self { client }
    }

    /// Income recorded by `user_id`
    pub async fn list(&self, user_id: &str) -> Result<Vec<Income>> {
        let value = self
            .client
            .resource(Method::GET, "/income/user", &[user_id])
            .send()
            .await?;
        envelope::into_list(value)
    }

    pub async fn create(&self, income: &NewIncome) -> Result<Value> {
        self.client.post("/income/add", income).await
    }

    /// Update an entry; the backend checks ownership through `userId`
    pub async fn update(&self, id: &str, user_id: &str, income: &NewIncome) -> Result<Value> {
        self.client
            .resource(Method::PUT, "/income", &[id])
            .query("userId", user_id)
            .json(income)?
            .send()
            .await
    }

    pub async fn delete(&self, id: &str, user_id: &str) -> Result<Value> {
        self.client
            .resource(Method::DELETE, "/income", &[id])
            .query("userId", user_id)
            .send()
            .await
    }
}
