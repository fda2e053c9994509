//! Authenticated client holding the current access token.
//!
//! The refresh token never passes through this type: the server sets it as
//! an HttpOnly cookie and the transport's cookie store replays it on
//! `POST /api/v1/auth/refresh`.

use std::sync::{PoisonError, RwLock};

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::{ApiRequest, ApiResponse, ClientError, HttpTransport};

const REGISTER_PATH: &str = "/api/v1/auth/register";
const LOGIN_PATH: &str = "/api/v1/auth/login";
const REFRESH_PATH: &str = "/api/v1/auth/refresh";
const LOGOUT_PATH: &str = "/api/v1/auth/logout";

/// Body returned by login and refresh.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccessTokenBody {
    access_token: String,
}

/// Account returned by registration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisteredUser {
    /// User identifier.
    pub id: String,
    /// Normalised email address.
    pub email: String,
    /// `customer` or `staff`.
    pub role: String,
}

/// API client that authenticates requests and refreshes on `401`.
pub struct AuthClient<T> {
    transport: T,
    access_token: RwLock<Option<String>>,
}

impl<T> AuthClient<T> {
    /// Create a client with no access token.
    pub const fn new(transport: T) -> Self {
        Self {
            transport,
            access_token: RwLock::new(None),
        }
    }

    /// The access token currently held, if any.
    pub fn access_token(&self) -> Option<String> {
        self.access_token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn store_token(&self, token: Option<String>) {
        *self
            .access_token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = token;
    }
}

impl<T> AuthClient<T>
where
    T: HttpTransport,
{
    /// Create an account.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Status`] for validation failures or a taken
    /// email, and transport or decode errors otherwise.
    pub async fn register(&self, email: &str, password: &str) -> Result<RegisteredUser, ClientError> {
        let response = self
            .transport
            .send(ApiRequest::post(REGISTER_PATH).json(json!({ "email": email, "password": password })))
            .await?;
        if !response.is_success() {
            return Err(response.into_error());
        }
        response.json()
    }

    /// Log in and keep the returned access token.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Status`] for rejected credentials.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), ClientError> {
        let response = self
            .transport
            .send(ApiRequest::post(LOGIN_PATH).json(json!({ "email": email, "password": password })))
            .await?;
        if !response.is_success() {
            return Err(response.into_error());
        }
        let body: AccessTokenBody = response.json()?;
        self.store_token(Some(body.access_token));
        Ok(())
    }

    /// Exchange the refresh cookie for a new access token.
    ///
    /// Returns `Ok(None)` and forgets the held token when the server rejects
    /// the refresh.
    ///
    /// # Errors
    ///
    /// Returns transport or decode errors.
    pub async fn refresh(&self) -> Result<Option<String>, ClientError> {
        let response = self.transport.send(ApiRequest::post(REFRESH_PATH)).await?;
        if !response.is_success() {
            debug!(status = response.status, "refresh rejected");
            self.store_token(None);
            return Ok(None);
        }
        let body: AccessTokenBody = response.json()?;
        self.store_token(Some(body.access_token.clone()));
        Ok(Some(body.access_token))
    }

    /// Forget the access token and ask the server to revoke the refresh
    /// token. Server failures are logged, not returned.
    pub async fn logout(&self) {
        self.store_token(None);
        match self.transport.send(ApiRequest::post(LOGOUT_PATH)).await {
            Ok(response) if response.is_success() => {}
            Ok(response) => warn!(status = response.status, "logout rejected"),
            Err(error) => warn!(%error, "logout request failed"),
        }
    }

    /// Send `request` with the held bearer token. On `401` refresh once
    /// and, when a new token is obtained, retry once with it; otherwise the
    /// original `401` response is returned.
    ///
    /// # Errors
    ///
    /// Returns transport errors from either attempt.
    pub async fn fetch_with_auth(&self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
        let first = match self.access_token() {
            Some(token) => request.clone().with_bearer(token),
            None => request.clone(),
        };
        let response = self.transport.send(first).await?;
        if response.status != ApiResponse::UNAUTHORIZED {
            return Ok(response);
        }

        let refreshed = match self.refresh().await {
            Ok(token) => token,
            Err(error) => {
                warn!(%error, "token refresh failed");
                None
            }
        };
        match refreshed {
            Some(token) => self.transport.send(request.with_bearer(token)).await,
            None => Ok(response),
        }
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
