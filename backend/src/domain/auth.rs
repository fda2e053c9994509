//! Bearer tokens and password digests.
//!
//! Tokens are opaque 256-bit random values. Only their SHA-256 digests are
//! persisted, so a leaked `auth_tokens` table cannot be replayed. Passwords
//! are stored as Argon2id PHC strings carrying their own salt and parameters.

use argon2::password_hash::rand_core::OsRng as SaltRng;
use argon2::password_hash::{self, PasswordHasher as _, PasswordVerifier as _, SaltString};
use argon2::Argon2;
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use utoipa::ToSchema;

use crate::domain::{Password, UserId, UserRole};

/// Lifetime of an access token.
pub const ACCESS_TOKEN_TTL_MINUTES: i64 = 15;
/// Lifetime of a refresh token.
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 7;

const TOKEN_BYTES: usize = 32;

/// Purpose of an issued token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    /// Stable storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        }
    }

    /// Time to live for tokens of this kind.
    pub fn ttl(&self) -> Duration {
        match self {
            Self::Access => Duration::minutes(ACCESS_TOKEN_TTL_MINUTES),
            Self::Refresh => Duration::days(REFRESH_TOKEN_TTL_DAYS),
        }
    }
}

/// Generate a fresh opaque token as lowercase hex.
pub fn generate_token() -> String {
    let mut bytes = [0_u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// SHA-256 digest of a presented token, as lowercase hex.
pub fn token_digest(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Persisted token record, keyed by digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredToken {
    pub digest: String,
    pub user_id: UserId,
    pub kind: TokenKind,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
}

impl StoredToken {
    /// Build a token record for `token` issued at `now`.
    pub fn issue(token: &str, user_id: UserId, kind: TokenKind, now: DateTime<Utc>) -> Self {
        Self {
            digest: token_digest(token),
            user_id,
            kind,
            expires_at: now + kind.ttl(),
            revoked: false,
        }
    }

    /// Whether the token may still be used at `now`.
    pub fn is_usable(&self, kind: TokenKind, now: DateTime<Utc>) -> bool {
        self.kind == kind && !self.revoked && self.expires_at > now
    }
}

/// Tokens handed to a client after login or refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub access_expires_at: DateTime<Utc>,
}

/// Caller identity resolved from a bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub role: UserRole,
}

impl AuthenticatedUser {
    /// Whether the caller holds the staff role.
    pub fn is_staff(&self) -> bool {
        matches!(self.role, UserRole::Staff)
    }
}

/// Argon2id password hash in PHC string format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash {
    phc: String,
}

/// Hashing failed inside the Argon2 implementation.
#[derive(Debug, thiserror::Error)]
#[error("password hashing failed: {0}")]
pub struct PasswordHashError(#[from] password_hash::Error);

impl PasswordHash {
    /// Hash `password` under a fresh random salt.
    pub fn derive(password: &Password) -> Result<Self, PasswordHashError> {
        let salt = SaltString::generate(&mut SaltRng);
        let phc = Argon2::default()
            .hash_password(password.expose().as_bytes(), &salt)?
            .to_string();
        Ok(Self { phc })
    }

    /// Rebuild a stored hash.
    pub fn from_phc(phc: impl Into<String>) -> Self {
        Self { phc: phc.into() }
    }

    /// PHC string, including algorithm, parameters and salt.
    pub fn as_phc(&self) -> &str {
        &self.phc
    }

    /// Check a presented password. Unparseable stored hashes never verify.
    pub fn verify(&self, password: &Password) -> bool {
        password_hash::PasswordHash::new(&self.phc).is_ok_and(|parsed| {
            Argon2::default()
                .verify_password(password.expose().as_bytes(), &parsed)
                .is_ok()
        })
    }
}
