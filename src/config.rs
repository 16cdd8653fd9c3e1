//! Configuration options for the SpendTrack client

use std::collections::HashMap;

/// Environment variable holding the backend base URL
pub const BASE_URL_ENV: &str = "SPENDTRACK_API_BASE_URL";

/// Base URL used when the environment does not provide one
pub const DEFAULT_BASE_URL: &str = "http://localhost:9000";

/// Configuration options for the SpendTrack client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// The backend base URL, without a trailing slash
    pub base_url: String,

    /// Headers sent with every request, before the bearer token
    pub default_headers: HashMap<String, String>,

    /// The user agent reported to the backend
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            default_headers: HashMap::new(),
            user_agent: format!("spendtrack-rust/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientOptions {
    /// Build options from the environment, reading a `.env` file if present
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        let options = Self::default();
        match std::env::var(BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => options.with_base_url(&url),
            _ => options,
        }
    }

    /// Set the backend base URL
    pub fn with_base_url(mut self, value: &str) -> Self {
        self.base_url = value.trim().trim_end_matches('/').to_string();
        self
    }

    /// Add a header sent with every request
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.default_headers
            .insert(name.to_string(), value.to_string());
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, value: &str) -> Self {
        self.user_agent = value.to_string();
        self
    }

    /// Resolve an endpoint path against the base URL
    pub(crate) fn endpoint_url(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }
}
