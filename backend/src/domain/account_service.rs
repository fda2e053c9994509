//! Account domain service: registration, login, and token rotation.
//!
//! Access and refresh tokens are opaque random strings. Only their digests
//! reach the token repository; a refresh consumes the presented token by
//! revoking it before a new pair is issued, so each refresh token works once.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::auth::{generate_token, token_digest};
use crate::domain::ports::{
    AccessTokenVerifier, AccountCommand, AuthTokenRepository, AuthTokenRepositoryError,
    Credentials, UserPersistenceError, UserRepository,
};
use crate::domain::{
    AuthenticatedUser, Email, Error, PasswordHash, StoredToken, TokenKind, TokenPair, User, UserId,
    UserRole,
};

const INVALID_CREDENTIALS: &str = "invalid credentials";
const INVALID_REFRESH_TOKEN: &str = "invalid refresh token";
const INVALID_ACCESS_TOKEN: &str = "invalid or expired access token";

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { .. } => email_taken(),
    }
}

fn map_token_error(error: AuthTokenRepositoryError) -> Error {
    match error {
        AuthTokenRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("token repository unavailable: {message}"))
        }
        AuthTokenRepositoryError::Query { message } => {
            Error::internal(format!("token repository error: {message}"))
        }
    }
}

fn email_taken() -> Error {
    Error::conflict("email already registered").with_details(json!({ "field": "email" }))
}

/// Account service implementing [`AccountCommand`] and [`AccessTokenVerifier`].
#[derive(Clone)]
pub struct AccountService<U, T> {
    user_repo: Arc<U>,
    token_repo: Arc<T>,
    clock: Arc<dyn Clock>,
    staff_emails: Arc<HashSet<String>>,
}

impl<U, T> AccountService<U, T> {
    /// Create a new service.
    ///
    /// Registrations whose normalised e-mail appears in `staff_emails` are
    /// granted [`UserRole::Staff`].
    pub fn new(
        user_repo: Arc<U>,
        token_repo: Arc<T>,
        clock: Arc<dyn Clock>,
        staff_emails: impl IntoIterator<Item = String>,
    ) -> Self {
        let staff_emails = staff_emails
            .into_iter()
            .map(|email| email.trim().to_lowercase())
            .filter(|email| !email.is_empty())
            .collect();
        Self {
            user_repo,
            token_repo,
            clock,
            staff_emails: Arc::new(staff_emails),
        }
    }
}

impl<U, T> AccountService<U, T>
where
    U: UserRepository,
    T: AuthTokenRepository,
{
    async fn issue_pair(&self, user_id: UserId) -> Result<TokenPair, Error> {
        let now = self.clock.utc();
        let access_token = generate_token();
        let refresh_token = generate_token();
        let access = StoredToken::issue(&access_token, user_id, TokenKind::Access, now);
        let refresh = StoredToken::issue(&refresh_token, user_id, TokenKind::Refresh, now);

        self.token_repo
            .store(&access)
            .await
            .map_err(map_token_error)?;
        self.token_repo
            .store(&refresh)
            .await
            .map_err(map_token_error)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            access_expires_at: access.expires_at,
        })
    }

    fn role_for(&self, email: &Email) -> UserRole {
        if self.staff_emails.contains(email.as_ref()) {
            UserRole::Staff
        } else {
            UserRole::Customer
        }
    }
}

#[async_trait]
impl<U, T> AccountCommand for AccountService<U, T>
where
    U: UserRepository,
    T: AuthTokenRepository,
{
    async fn register(&self, credentials: Credentials) -> Result<User, Error> {
        let Credentials { email, password } = credentials;
        let existing = self
            .user_repo
            .find_by_email(email.as_ref())
            .await
            .map_err(map_user_error)?;
        if existing.is_some() {
            return Err(email_taken());
        }

        let role = self.role_for(&email);
        let user = User::new(UserId::random(), email, role);
        let hash =
            PasswordHash::derive(&password).map_err(|err| Error::internal(err.to_string()))?;
        self.user_repo
            .create(&user, &hash)
            .await
            .map_err(map_user_error)?;

        info!(user_id = %user.id(), role = role.as_str(), "account registered");
        Ok(user)
    }

    async fn login(&self, credentials: Credentials) -> Result<TokenPair, Error> {
        let stored = self
            .user_repo
            .find_by_email(credentials.email.as_ref())
            .await
            .map_err(map_user_error)?;
        let Some(stored) = stored else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        if !stored.password_hash.verify(&credentials.password) {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        self.issue_pair(stored.user.id()).await
    }

    async fn refresh(&self, refresh_token: String) -> Result<TokenPair, Error> {
        let digest = token_digest(&refresh_token);
        let stored = self
            .token_repo
            .find(&digest)
            .await
            .map_err(map_token_error)?
            .filter(|token| token.is_usable(TokenKind::Refresh, self.clock.utc()))
            .ok_or_else(|| Error::unauthorized(INVALID_REFRESH_TOKEN))?;

        let consumed = self
            .token_repo
            .revoke(&digest)
            .await
            .map_err(map_token_error)?;
        if !consumed {
            warn!(user_id = %stored.user_id, "refresh token reused after rotation");
            return Err(Error::unauthorized(INVALID_REFRESH_TOKEN));
        }

        self.issue_pair(stored.user_id).await
    }

    async fn logout(&self, refresh_token: Option<String>) -> Result<(), Error> {
        if let Some(token) = refresh_token {
            self.token_repo
                .revoke(&token_digest(&token))
                .await
                .map_err(map_token_error)?;
        }
        Ok(())
    }
}

#[async_trait]
impl<U, T> AccessTokenVerifier for AccountService<U, T>
where
    U: UserRepository,
    T: AuthTokenRepository,
{
    async fn authenticate(&self, access_token: &str) -> Result<AuthenticatedUser, Error> {
        let stored = self
            .token_repo
            .find(&token_digest(access_token))
            .await
            .map_err(map_token_error)?
            .filter(|token| token.is_usable(TokenKind::Access, self.clock.utc()))
            .ok_or_else(|| Error::unauthorized(INVALID_ACCESS_TOKEN))?;

        let user = self
            .user_repo
            .find_by_id(stored.user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::unauthorized(INVALID_ACCESS_TOKEN))?;

        Ok(AuthenticatedUser {
            id: user.id(),
            role: user.role(),
        })
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
