//! Account API handlers.
//!
//! ```text
//! POST /api/v1/auth/register {"email":"ana@example.com","password":"secret1"}
//! POST /api/v1/auth/login    {"email":"ana@example.com","password":"secret1"}
//! POST /api/v1/auth/refresh  (refresh_token cookie or {"refreshToken":"..."})
//! POST /api/v1/auth/logout
//! ```
//!
//! Login and refresh return the access token in the body and the refresh
//! token in an HttpOnly cookie.

use actix_web::{HttpRequest, HttpResponse, ResponseError, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use utoipa::ToSchema;

use crate::domain::ports::Credentials;
use crate::domain::{Email, Error, Password, TokenPair, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cookies::{presented_refresh_token, refresh_cookie, removal_cookie};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::user_validation_error;

/// Email and password submitted to register or log in.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsRequest {
    #[schema(example = "ana@example.com")]
    pub email: String,
    #[schema(example = "secret1")]
    pub password: String,
}

/// Optional body for refresh and logout when the cookie is unavailable.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[serde(default, alias = "refresh_token")]
    pub refresh_token: Option<String>,
}

/// Access token handed to the client after login or refresh.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    pub access_token: String,
    pub access_expires_at: DateTime<Utc>,
}

impl From<&TokenPair> for AccessTokenResponse {
    fn from(pair: &TokenPair) -> Self {
        Self {
            access_token: pair.access_token.clone(),
            access_expires_at: pair.access_expires_at,
        }
    }
}

fn presented_token(req: &HttpRequest, body: Option<web::Json<RefreshRequest>>) -> Option<String> {
    presented_refresh_token(req).or_else(|| {
        body.and_then(|body| body.into_inner().refresh_token)
            .filter(|token| !token.is_empty())
    })
}

fn issued(pair: TokenPair, secure: bool) -> HttpResponse {
    let body = AccessTokenResponse::from(&pair);
    HttpResponse::Ok()
        .cookie(refresh_cookie(pair.refresh_token, secure))
        .json(body)
}

/// Register a customer account.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Account created", body = User),
        (status = 400, description = "Invalid email or password", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let CredentialsRequest { email, password } = payload.into_inner();
    let credentials = Credentials {
        email: Email::new(email).map_err(user_validation_error)?,
        password: Password::new(password).map_err(user_validation_error)?,
    };
    let user = state.accounts.register(credentials).await?;
    Ok(HttpResponse::Created().json(user))
}

/// Exchange credentials for an access token and a refresh cookie.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Login succeeded", body = AccessTokenResponse,
            headers(("set-cookie" = String, description = "HttpOnly refresh_token cookie"))),
        (status = 400, description = "Malformed email", body = Error),
        (status = 401, description = "Invalid credentials", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let CredentialsRequest { email, password } = payload.into_inner();
    let credentials = Credentials {
        email: Email::new(email).map_err(user_validation_error)?,
        password: Password::presented(password),
    };
    let pair = state.accounts.login(credentials).await?;
    Ok(issued(pair, state.cookie_secure))
}

/// Rotate the refresh token and issue a new access token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    request_body(content = RefreshRequest, description = "Used when the cookie is absent"),
    responses(
        (status = 200, description = "Tokens rotated", body = AccessTokenResponse),
        (status = 401, description = "Missing, expired or revoked refresh token", body = Error)
    ),
    tags = ["auth"],
    operation_id = "refresh",
    security([])
)]
#[post("/auth/refresh")]
pub async fn refresh(
    req: HttpRequest,
    state: web::Data<HttpState>,
    payload: Option<web::Json<RefreshRequest>>,
) -> ApiResult<HttpResponse> {
    let token =
        presented_token(&req, payload).ok_or_else(|| Error::unauthorized("no refresh token"))?;
    match state.accounts.refresh(token).await {
        Ok(pair) => Ok(issued(pair, state.cookie_secure)),
        Err(error) => {
            debug!(code = ?error.code(), "refresh rejected; clearing cookie");
            let mut response = error.error_response();
            response
                .add_removal_cookie(&removal_cookie(state.cookie_secure))
                .map_err(|err| Error::internal(format!("failed to clear cookie: {err}")))?;
            Ok(response)
        }
    }
}

/// Revoke the presented refresh token and clear the cookie.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses((status = 204, description = "Logged out")),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/auth/logout")]
pub async fn logout(
    req: HttpRequest,
    state: web::Data<HttpState>,
    payload: Option<web::Json<RefreshRequest>>,
) -> HttpResponse {
    if let Err(error) = state.accounts.logout(presented_token(&req, payload)).await {
        warn!(code = ?error.code(), message = error.message(), "logout could not revoke token");
    }
    HttpResponse::NoContent()
        .cookie(removal_cookie(state.cookie_secure))
        .finish()
}
