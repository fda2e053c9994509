//! WebSocket gateway pushing order status changes to subscribed clients.
//!
//! Responsibilities:
//! - validate upgrade requests against the configured origin allow-list
//! - spawn the per-connection session loop
//! - expose [`rooms::OrderRooms`] as the domain's status notifier

use actix_web::web::{self, Payload};
use actix_web::{
    HttpRequest, HttpResponse, get,
    http::header::{HeaderValue, ORIGIN},
};
use tracing::{error, warn};
use url::Url;
use uuid::Uuid;

mod session;

pub mod messages;
pub mod rooms;
pub mod state;

use state::OriginAllowList;

/// Handle WebSocket upgrade for the `/ws` endpoint.
#[get("/ws")]
pub async fn ws_entry(
    state: web::Data<state::WsState>,
    req: HttpRequest,
    stream: Payload,
) -> actix_web::Result<HttpResponse> {
    let mut origin_iter = req.headers().get_all(ORIGIN);
    let origin_header = origin_iter.next();
    if origin_iter.next().is_some() {
        error!("multiple Origin headers on WebSocket upgrade");
        return Err(actix_web::error::ErrorBadRequest("Invalid Origin header"));
    }
    validate_origin(&state.allowed_origins, origin_header)?;

    let (response, session, messages) = actix_ws::handle(&req, stream).map_err(|error| {
        error!(error = %error, "WebSocket upgrade failed");
        actix_web::error::ErrorInternalServerError("WebSocket upgrade failed")
    })?;
    actix_web::rt::spawn(session::handle_ws_session(
        state.rooms.clone(),
        Uuid::new_v4(),
        session,
        messages,
    ));
    Ok(response)
}

fn validate_origin(
    allowed: &OriginAllowList,
    origin_header: Option<&HeaderValue>,
) -> actix_web::Result<()> {
    let Some(origin_header) = origin_header else {
        if allowed.allows_any() {
            return Ok(());
        }
        warn!("rejected WebSocket upgrade without Origin header");
        return Err(actix_web::error::ErrorForbidden("Origin not allowed"));
    };

    let origin_value = origin_header.to_str().map_err(|error| {
        error!(error = %error, "failed to parse Origin header as string");
        actix_web::error::ErrorBadRequest("Invalid Origin header")
    })?;
    let origin = Url::parse(origin_value).map_err(|error| {
        error!(error = %error, "failed to parse Origin header as URL");
        actix_web::error::ErrorBadRequest("Invalid Origin header")
    })?;

    if allowed.allows(&origin) {
        Ok(())
    } else {
        warn!(origin = origin_value, "rejected WebSocket upgrade from disallowed origin");
        Err(actix_web::error::ErrorForbidden("Origin not allowed"))
    }
}
