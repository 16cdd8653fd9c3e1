//! SpendTrack Rust Client Library
//!
//! A typed client for the SpendTrack personal finance backend: authentication,
//! budgets, expenses, income, categories, users and reports, plus the
//! aggregation helpers dashboards and reports are built from.

pub mod aggregate;
pub mod amount;
pub mod auth;
pub mod budgets;
pub mod categories;
pub mod config;
pub mod envelope;
pub mod error;
pub mod expenses;
pub mod fetch;
pub mod fields;
pub mod income;
pub mod reports;
pub mod users;
pub mod views;

use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::auth::{Auth, SessionStorage, TOKEN_KEY};
use crate::budgets::Budgets;
use crate::categories::Categories;
use crate::config::ClientOptions;
use crate::error::Result;
use crate::expenses::Expenses;
use crate::fetch::FetchBuilder;
use crate::income::IncomeApi;
use crate::reports::Reports;
use crate::users::Users;

/// The main entry point for the SpendTrack client
///
/// Cheap to clone; clones share the HTTP connection pool and session storage.
#[derive(Clone)]
pub struct SpendTrack {
    /// HTTP client used for requests
    http_client: Client,
    /// Client options
    options: Arc<ClientOptions>,
    /// Where the bearer token is read from
    storage: Arc<dyn SessionStorage>,
}

impl SpendTrack {
    /// Create a new client for the backend at `base_url`
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    /// use spendtrack::{auth::MemoryStorage, SpendTrack};
    ///
    /// let client = SpendTrack::new("http://localhost:9000", Arc::new(MemoryStorage::new()));
    /// assert_eq!(client.base_url(), "http://localhost:9000");
    /// ```
    pub fn new(base_url: &str, storage: Arc<dyn SessionStorage>) -> Self {
        Self::new_with_options(ClientOptions::default().with_base_url(base_url), storage)
    }

    /// Create a new client with custom options
    pub fn new_with_options(options: ClientOptions, storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            http_client: Client::new(),
            options: Arc::new(options),
            storage,
        }
    }

    /// Create a client configured from the environment
    pub fn from_env(storage: Arc<dyn SessionStorage>) -> Self {
        Self::new_with_options(ClientOptions::from_env(), storage)
    }

    /// The backend base URL
    pub fn base_url(&self) -> &str {
        &self.options.base_url
    }

    pub(crate) fn storage(&self) -> &dyn SessionStorage {
        self.storage.as_ref()
    }

    /// Start a request to `endpoint`, relative to the base URL
    ///
    /// The bearer token is attached when the session storage holds one.
    pub fn request(&self, method: Method, endpoint: &str) -> FetchBuilder<'_> {
        let url = self.options.endpoint_url(endpoint);
        let mut fetch =
            FetchBuilder::new(&self.http_client, &url, method).user_agent(&self.options.user_agent);

        for (name, value) in &self.options.default_headers {
            fetch = fetch.header(name, value);
        }

        match self.storage.get(TOKEN_KEY) {
            Some(token) if !token.is_empty() => fetch.bearer_auth(&token),
            _ => fetch,
        }
    }

    /// Start a request to `prefix` followed by caller-supplied ids
    ///
    /// Each id becomes exactly one percent-encoded path segment.
    pub fn resource(&self, method: Method, prefix: &str, ids: &[&str]) -> FetchBuilder<'_> {
        self.request(method, prefix).segments(ids)
    }

    /// GET `endpoint`
    pub async fn get(&self, endpoint: &str) -> Result<Value> {
        self.request(Method::GET, endpoint).send().await
    }

    /// POST `body` to `endpoint`
    pub async fn post<T: Serialize + ?Sized>(&self, endpoint: &str, body: &T) -> Result<Value> {
        self.request(Method::POST, endpoint).json(body)?.send().await
    }

    /// PUT `body` to `endpoint`
    pub async fn put<T: Serialize + ?Sized>(&self, endpoint: &str, body: &T) -> Result<Value> {
        self.request(Method::PUT, endpoint).json(body)?.send().await
    }

    /// DELETE `endpoint`
    pub async fn delete(&self, endpoint: &str) -> Result<Value> {
        self.request(Method::DELETE, endpoint).send().await
    }

    /// Login and signup
    pub fn auth(&self) -> Auth<'_> {
        Auth::new(self)
    }

    /// User listing and profile updates
    pub fn users(&self) -> Users<'_> {
        Users::new(self)
    }

    /// Budget operations
    pub fn budgets(&self) -> Budgets<'_> {
        Budgets::new(self)
    }

    /// Expense operations
    pub fn expenses(&self) -> Expenses<'_> {
        Expenses::new(self)
    }

    /// Income operations
    pub fn income(&self) -> IncomeApi<'_> {
        IncomeApi::new(self)
    }

    /// Category operations
    pub fn categories(&self) -> Categories<'_> {
        Categories::new(self)
    }

    /// Report generation
    pub fn reports(&self) -> Reports<'_> {
        Reports::new(self)
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::auth::{Credentials, FileStorage, MemoryStorage, SessionStore, SignupFields};
    pub use crate::config::ClientOptions;
    pub use crate::error::{Error, Result};
    pub use crate::SpendTrack;
}
