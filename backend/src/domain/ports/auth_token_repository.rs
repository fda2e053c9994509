//! Port abstraction for issued-token storage.

use async_trait::async_trait;

use crate::domain::StoredToken;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by token repository adapters.
    pub enum AuthTokenRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "token repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "token repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthTokenRepository: Send + Sync {
    /// Persist a newly issued token.
    async fn store(&self, token: &StoredToken) -> Result<(), AuthTokenRepositoryError>;

    /// Look a token up by its digest.
    async fn find(&self, digest: &str) -> Result<Option<StoredToken>, AuthTokenRepositoryError>;

    /// Mark a token revoked, returning whether it was live before the call.
    async fn revoke(&self, digest: &str) -> Result<bool, AuthTokenRepositoryError>;
}
