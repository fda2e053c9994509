//! Driving ports for account registration and token sessions.
//!
//! Inbound adapters call these without knowing how credentials or tokens
//! are stored, so handler tests can substitute mocks.

use async_trait::async_trait;

use crate::domain::{AuthenticatedUser, Email, Error, Password, TokenPair, User};

/// Register or log in with an e-mail and password.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: Email,
    pub password: Password,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create an account.
    async fn register(&self, credentials: Credentials) -> Result<User, Error>;

    /// Exchange credentials for a token pair.
    async fn login(&self, credentials: Credentials) -> Result<TokenPair, Error>;

    /// Rotate a refresh token into a fresh pair.
    async fn refresh(&self, refresh_token: String) -> Result<TokenPair, Error>;

    /// Revoke a refresh token if one was presented.
    async fn logout(&self, refresh_token: Option<String>) -> Result<(), Error>;
}

/// Resolve bearer tokens into caller identities.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccessTokenVerifier: Send + Sync {
    /// Validate an access token.
    async fn authenticate(&self, access_token: &str) -> Result<AuthenticatedUser, Error>;
}
