//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Stored e-mails are already normalised; lookups compare them verbatim and
//! the `users.email` unique constraint backs the duplicate check.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserCredentials, UserPersistenceError, UserRepository};
use crate::domain::{Email, PasswordHash, User, UserId, UserRole};

use super::diesel_basic_error_mapping::{
    ConstraintViolation, constraint_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    map_basic_pool_error(error, |message| UserPersistenceError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_basic_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

fn row_to_credentials(row: UserRow) -> Result<UserCredentials, UserPersistenceError> {
    let corrupt = |err: &dyn std::fmt::Display| {
        UserPersistenceError::query(format!("user {}: {err}", row.id))
    };
    let email = Email::new(&row.email).map_err(|err| corrupt(&err))?;
    let role = row.role.parse::<UserRole>().map_err(|err| corrupt(&err))?;
    Ok(UserCredentials {
        user: User::new(UserId::from_uuid(row.id), email, role),
        password_hash: PasswordHash::from_phc(row.password_hash),
    })
}

impl DieselUserRepository {
    async fn find_row<F>(&self, scope: F) -> Result<Option<UserRow>, UserPersistenceError>
    where
        F: FnOnce(
                users::BoxedQuery<'static, diesel::pg::Pg>,
            ) -> users::BoxedQuery<'static, diesel::pg::Pg>
            + Send,
    {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        scope(users::table.into_boxed())
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(
        &self,
        user: &User,
        password_hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            id: *user.id().as_uuid(),
            email: user.email().as_ref(),
            role: user.role().as_str(),
            password_hash: password_hash.as_phc(),
        };
        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(|err| match constraint_violation(&err) {
                Some(ConstraintViolation::Unique) => {
                    UserPersistenceError::duplicate_email(user.email().as_ref())
                }
                _ => map_diesel_error(err),
            })?;
        Ok(())
    }

    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, UserPersistenceError> {
        let email = email.to_owned();
        self.find_row(move |query| query.filter(users::email.eq(email)))
            .await?
            .map(row_to_credentials)
            .transpose()
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let id = *id.as_uuid();
        Ok(self
            .find_row(move |query| query.filter(users::id.eq(id)))
            .await?
            .map(row_to_credentials)
            .transpose()?
            .map(|credentials| credentials.user))
    }
}
