//! Authentication and session management

mod session;
mod types;

use log::{info, warn};
use reqwest::Method;
use serde_json::Value;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{Error, Result};
use crate::SpendTrack;

pub use session::*;
pub use types::*;

/// Accessor for the login and signup endpoints
pub struct Auth<'a> {
    client: &'a SpendTrack,
}

impl<'a> Auth<'a> {
    pub(crate) fn new(client: &'a SpendTrack) -> Self {
        Self { client }
    }

    /// Exchange credentials for a token and user snapshot
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse> {
        self.client
            .request(Method::POST, "/login")
            .json(credentials)?
            .execute()
            .await
    }

    /// Create an account; no token is issued
    pub async fn signup(&self, fields: &SignupFields) -> Result<Value> {
        self.client.post("/user", fields).await
    }
}

/// Observable authentication state
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    Unauthenticated,
    Authenticated(Session),
}

/// Owner of the persisted session
///
/// The only writer of [`TOKEN_KEY`] and [`USER_KEY`]. The session is either
/// fully present (token and parseable user) or fully absent.
pub struct SessionStore {
    client: SpendTrack,
    state: RwLock<AuthState>,
}

impl SessionStore {
    /// Restore the session persisted by a previous run
    pub fn restore(client: SpendTrack) -> Self {
        let state = Self::load(&client);
        Self {
            client,
            state: RwLock::new(state),
        }
    }

    fn load(client: &SpendTrack) -> AuthState {
        let storage = client.storage();
        let token = storage.get(TOKEN_KEY).filter(|t| !t.is_empty());
        let user = storage.get(USER_KEY);

        match (token, user) {
            (None, None) => AuthState::Unauthenticated,
            (Some(token), Some(raw)) => match parse_user(&raw) {
                Some(user) => AuthState::Authenticated(Session { token, user }),
                None => {
                    warn!("Discarding corrupt stored user record");
                    discard(client);
                    AuthState::Unauthenticated
                }
            },
            _ => {
                warn!("Discarding incomplete stored session");
                discard(client);
                AuthState::Unauthenticated
            }
        }
    }

    /// The access layer this store authenticates
    pub fn client(&self) -> &SpendTrack {
        &self.client
    }

    /// Current state
    pub fn state(&self) -> AuthState {
        self.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(*self.read(), AuthState::Authenticated(_))
    }

    /// Snapshot of the signed-in user
    pub fn current_user(&self) -> Option<User> {
        match &*self.read() {
            AuthState::Authenticated(session) => Some(session.user.clone()),
            AuthState::Unauthenticated => None,
        }
    }

    /// Bearer token of the current session
    pub fn token(&self) -> Option<String> {
        match &*self.read() {
            AuthState::Authenticated(session) => Some(session.token.clone()),
            AuthState::Unauthenticated => None,
        }
    }

    /// The signed-in user, or an error for commands that need one
    pub fn require_user(&self) -> Result<User> {
        self.current_user()
            .ok_or_else(|| Error::validation("Not logged in"))
    }

    /// Log in and persist the resulting session
    ///
    /// Any failure leaves the store unauthenticated, even when a previous
    /// session was active, and the reason is returned.
    pub async fn login(&self, credentials: &Credentials) -> Result<User> {
        match self.authenticate(credentials).await {
            Ok(session) => {
                info!("Logged in as {}", session.user.email);
                let user = session.user.clone();
                *self.write() = AuthState::Authenticated(session);
                Ok(user)
            }
            Err(err) => {
                *self.write() = AuthState::Unauthenticated;
                discard(&self.client);
                Err(err)
            }
        }
    }

    async fn authenticate(&self, credentials: &Credentials) -> Result<Session> {
        credentials.validate()?;

        let response = self.client.auth().login(credentials).await?;
        if response.token.is_empty() {
            return Err(Error::api("Login response did not include a token"));
        }

        let snapshot = serde_json::to_string(&response.user)?;
        let storage = self.client.storage();
        storage.set(TOKEN_KEY, &response.token)?;
        storage.set(USER_KEY, &snapshot)?;

        Ok(Session {
            token: response.token,
            user: response.user,
        })
    }

    /// Register a new account without signing in
    pub async fn signup(&self, fields: &SignupFields) -> Result<()> {
        fields.validate()?;
        self.client.auth().signup(fields).await?;
        Ok(())
    }

    /// Forget the session; no request is made
    pub fn logout(&self) -> Result<()> {
        *self.write() = AuthState::Unauthenticated;

        let storage = self.client.storage();
        let token = storage.remove(TOKEN_KEY);
        let user = storage.remove(USER_KEY);
        info!("Logged out");
        token.and(user)
    }

    fn read(&self) -> RwLockReadGuard<'_, AuthState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, AuthState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn parse_user(raw: &str) -> Option<User> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "undefined" || raw == "null" {
        return None;
    }
    serde_json::from_str::<User>(raw)
        .ok()
        .filter(|user| !user.id.is_empty())
}

fn discard(client: &SpendTrack) {
    let storage = client.storage();
    for key in [TOKEN_KEY, USER_KEY] {
        if let Err(err) = storage.remove(key) {
            warn!("Cannot remove stored {}: {}", key, err);
        }
    }
}
