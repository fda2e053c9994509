//! Bearer-token authentication for HTTP handlers.
//!
//! [`AuthenticatedUser`] doubles as an Actix extractor: handlers that list it
//! as a parameter reject requests without a valid access token before any
//! domain call runs.

use std::future::Future;
use std::pin::Pin;

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, web};

use crate::domain::{AuthenticatedUser, Error};
use crate::inbound::http::state::HttpState;

use super::ApiResult;

const BEARER_PREFIX: &str = "Bearer ";

/// Extract the bearer token from the `Authorization` header.
pub(crate) fn bearer_token(req: &HttpRequest) -> ApiResult<String> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("missing bearer token"))?;
    let value = value
        .to_str()
        .map_err(|_| Error::unauthorized("invalid authorization header"))?;
    value
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| Error::unauthorized("invalid authorization header"))
}

/// Reject callers without the staff role.
pub(crate) fn require_staff(user: &AuthenticatedUser) -> ApiResult<()> {
    if user.is_staff() {
        Ok(())
    } else {
        Err(Error::forbidden("staff only"))
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let token = bearer_token(req);
        Box::pin(async move {
            let state = state.ok_or_else(|| Error::internal("HTTP state is not configured"))?;
            let token = token?;
            state.tokens.authenticate(&token).await
        })
    }
}
