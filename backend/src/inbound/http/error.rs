//! HTTP adapter mapping for domain errors.
//!
//! Status codes follow [`ErrorCode`]. Internal errors are logged with their
//! original message and replaced by a generic one on the wire; the trace id
//! travels both as a header and in the JSON body.

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::http::{StatusCode, header};
use actix_web::{HttpRequest, HttpResponse, ResponseError, web};
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

const REDACTED_MESSAGE: &str = "Internal server error";

pub(crate) fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Payload clients see for `error`. Internal errors lose message and details.
pub(crate) fn client_payload(error: &Error) -> Error {
    if error.code() != ErrorCode::InternalError {
        return error.clone();
    }
    let redacted = Error::internal(REDACTED_MESSAGE);
    match error.trace_id() {
        Some(id) => redacted.with_trace_id(id.to_owned()),
        None => redacted,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        if self.code() == ErrorCode::InternalError {
            error!(
                trace_id = self.trace_id().unwrap_or_default(),
                message = self.message(),
                "internal error returned to client"
            );
        }

        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        if self.code() == ErrorCode::Unauthorized {
            builder.insert_header((header::WWW_AUTHENTICATE, "Bearer"));
        }
        builder.json(client_payload(self))
    }
}

fn invalid_body(message: String) -> actix_web::Error {
    Error::invalid_request(message).into()
}

/// Extractor configuration that reports malformed JSON, query strings and
/// path segments using the shared error envelope.
pub fn extractor_config(config: &mut web::ServiceConfig) {
    config
        .app_data(
            web::JsonConfig::default()
                .error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
                    invalid_body(format!("invalid JSON body: {err}"))
                }),
        )
        .app_data(
            web::QueryConfig::default()
                .error_handler(|err: QueryPayloadError, _req: &HttpRequest| {
                    invalid_body(format!("invalid query string: {err}"))
                }),
        )
        .app_data(
            web::PathConfig::default()
                .error_handler(|err: PathError, _req: &HttpRequest| {
                    invalid_body(format!("invalid path parameter: {err}"))
                }),
        );
}
