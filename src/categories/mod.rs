//! Expense category endpoints

use reqwest::Method;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::envelope;
use crate::error::{Error, Result};
use crate::fields::Record;
use crate::SpendTrack;

/// A flat expense category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    pub id: String,

    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let record = Record::deserialize(deserializer)?;
        Ok(Self {
            id: record.id(),
            name: record.text(&["name"]),
            description: record.optional_text(&["description"]),
        })
    }
}

/// Fields of a category to create or update
#[derive(Debug, Clone, Serialize)]
pub struct NewCategory {
    pub name: String,
    pub description: String,
}

impl NewCategory {
    pub fn new(name: &str, description: &str) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(Error::validation("Category name is required"));
        }
        Ok(Self {
            name: name.trim().to_string(),
            description: description.trim().to_string(),
        })
    }
}

/// Accessor for `/category` endpoints
pub struct Categories<'a> {
    client: &'a SpendTrack,
}

impl<'a> Categories<'a> {
    pub(crate) fn new(client: &'a SpendTrack) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Category>> {
        let value = self.client.get("/category").await?;
        envelope::into_list(value)
    }

    pub async fn create(&self, category: &NewCategory) -> Result<Value> {
        self.client.post("/category/create", category).await
    }

    pub async fn update(&self, id: &str, category: &NewCategory) -> Result<Value> {
        self.client
            .resource(Method::PUT, "/category", &[id])
            .json(category)?
            .send()
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<Value> {
        self.client
            .resource(Method::DELETE, "/category", &[id])
            .send()
            .await
    }
}
