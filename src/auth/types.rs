//! Types for authentication and user management

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};
use crate::fields::Record;

/// Role of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Administrator, may manage other users
    Admin,
    /// Regular account; also used for unknown role strings
    #[default]
    #[serde(other)]
    User,
}

/// User data
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    /// The user ID
    pub id: String,

    /// Display name
    pub name: String,

    /// Email address
    pub email: String,

    /// Account role
    pub role: Role,

    /// Reference to the uploaded profile image
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

impl<'de> Deserialize<'de> for User {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let record = Record::deserialize(deserializer)?;
        Ok(Self {
            id: record.id(),
            name: record.text(&["name"]),
            email: record.text(&["email"]),
            role: record.lenient(&["role"]),
            profile_image: record.optional_text(&["profile_image", "profileImage", "image"]),
        })
    }
}

impl User {
    /// Whether this user is an administrator
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Login credentials
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.trim().to_string(),
            password: password.to_string(),
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.email.is_empty() || self.password.is_empty() {
            return Err(Error::validation("Email and password are required"));
        }
        Ok(())
    }
}

/// Fields of a new account
#[derive(Debug, Clone, Serialize)]
pub struct SignupFields {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl SignupFields {
    pub fn new(name: &str, email: &str, password: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("Name is required"));
        }
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(Error::validation("Email and password are required"));
        }
        Ok(())
    }
}

/// Response of the login endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// The bearer token
    #[serde(default)]
    pub token: String,

    /// Snapshot of the authenticated user
    #[serde(rename = "User", alias = "user")]
    pub user: User,
}

/// An authenticated session: bearer token plus user snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: User,
}
