//! PostgreSQL-backed `AuthTokenRepository` implementation using Diesel ORM.
//!
//! Revocation is a conditional update on `revoked = false`, so two
//! concurrent refreshes of the same token cannot both succeed.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AuthTokenRepository, AuthTokenRepositoryError};
use crate::domain::{StoredToken, TokenKind, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{AuthTokenRow, NewAuthTokenRow};
use super::pool::{DbPool, PoolError};
use super::schema::auth_tokens;

/// Diesel-backed implementation of the token repository port.
#[derive(Clone)]
pub struct DieselAuthTokenRepository {
    pool: DbPool,
}

impl DieselAuthTokenRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AuthTokenRepositoryError {
    map_basic_pool_error(error, |message| AuthTokenRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> AuthTokenRepositoryError {
    map_basic_diesel_error(
        error,
        AuthTokenRepositoryError::query,
        AuthTokenRepositoryError::connection,
    )
}

fn parse_kind(kind: &str) -> Result<TokenKind, AuthTokenRepositoryError> {
    match kind {
        "access" => Ok(TokenKind::Access),
        "refresh" => Ok(TokenKind::Refresh),
        other => Err(AuthTokenRepositoryError::query(format!(
            "unknown token kind {other}"
        ))),
    }
}

fn row_to_token(row: AuthTokenRow) -> Result<StoredToken, AuthTokenRepositoryError> {
    Ok(StoredToken {
        kind: parse_kind(&row.kind)?,
        digest: row.digest,
        user_id: UserId::from_uuid(row.user_id),
        expires_at: row.expires_at,
        revoked: row.revoked,
    })
}

#[async_trait]
impl AuthTokenRepository for DieselAuthTokenRepository {
    async fn store(&self, token: &StoredToken) -> Result<(), AuthTokenRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewAuthTokenRow {
            digest: token.digest.as_str(),
            user_id: *token.user_id.as_uuid(),
            kind: token.kind.as_str(),
            expires_at: token.expires_at,
            revoked: token.revoked,
        };
        diesel::insert_into(auth_tokens::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn find(&self, digest: &str) -> Result<Option<StoredToken>, AuthTokenRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        auth_tokens::table
            .find(digest)
            .select(AuthTokenRow::as_select())
            .first::<AuthTokenRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_token)
            .transpose()
    }

    async fn revoke(&self, digest: &str) -> Result<bool, AuthTokenRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(
            auth_tokens::table
                .filter(auth_tokens::digest.eq(digest))
                .filter(auth_tokens::revoked.eq(false)),
        )
        .set(auth_tokens::revoked.eq(true))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }
}
