//! User listing and profile endpoints

use serde::Serialize;
use serde_json::Value;

use crate::auth::User;
use crate::envelope;
use crate::error::{Error, Result};
use crate::SpendTrack;

/// Shortest password the settings screen accepts
pub const MIN_PASSWORD_LEN: usize = 6;

/// A password change request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub old_password: String,
    pub new_password: String,
}

impl PasswordChange {
    /// Check the new password against its confirmation before sending
    pub fn new(old_password: &str, new_password: &str, confirmation: &str) -> Result<Self> {
        if new_password != confirmation {
            return Err(Error::validation("Passwords don't match!"));
        }
        if new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(Error::validation(format!(
                "New password must be at least {} characters long",
                MIN_PASSWORD_LEN
            )));
        }
        Ok(Self {
            old_password: old_password.to_string(),
            new_password: new_password.to_string(),
        })
    }
}

/// Personal information update
#[derive(Debug, Clone, Serialize)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
}

impl ProfileUpdate {
    pub fn new(name: &str, email: &str) -> Result<Self> {
        if name.trim().is_empty() || email.trim().is_empty() {
            return Err(Error::validation("Name and email are required"));
        }
        Ok(Self {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
        })
    }
}

/// Accessor for user endpoints
pub struct Users<'a> {
    client: &'a SpendTrack,
}

impl<'a> Users<'a> {
    pub(crate) fn new(client: &'a SpendTrack) -> Self {
        Self { client }
    }

    /// Every account (admin screen)
    pub async fn list(&self) -> Result<Vec<User>> {
        let value = self.client.get("/user").await?;
        envelope::into_list(value)
    }

    pub async fn change_password(&self, change: &PasswordChange) -> Result<Value> {
        self.client.put("/edit-pass", change).await
    }

    pub async fn update_info(&self, update: &ProfileUpdate) -> Result<Value> {
        self.client.put("/edit-info", update).await
    }
}
