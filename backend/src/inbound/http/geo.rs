//! Distance helper endpoint.
//!
//! ```text
//! GET /api/v1/geo/distance?origin=-23.55,-46.63&destination=Av.%20Paulista,%201000
//! ```

use actix_web::{get, web};
use serde::Deserialize;

use crate::domain::{AuthenticatedUser, Error, Location, TravelEstimate};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, require_text};

/// Query string of the distance lookup.
#[derive(Debug, Default, Deserialize)]
pub struct DistanceQuery {
    pub origin: Option<String>,
    pub destination: Option<String>,
}

/// Travel distance and duration between two locations.
#[utoipa::path(
    get,
    path = "/api/v1/geo/distance",
    params(
        ("origin" = String, Query, description = "Address or `lat,lng`"),
        ("destination" = String, Query, description = "Address or `lat,lng`")
    ),
    responses(
        (status = 200, description = "Estimate; all fields null when no route exists", body = TravelEstimate),
        (status = 400, description = "Missing location or invalid coordinates", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Maps lookup failed", body = Error),
        (status = 503, description = "Maps API not configured", body = Error)
    ),
    tags = ["geo"],
    operation_id = "distance",
    security(("BearerAuth" = []))
)]
#[get("/geo/distance")]
pub async fn distance(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
    query: web::Query<DistanceQuery>,
) -> ApiResult<web::Json<TravelEstimate>> {
    let DistanceQuery {
        origin,
        destination,
    } = query.into_inner();
    let origin = Location::parse(&require_text(origin, FieldName::new("origin"))?);
    let destination = Location::parse(&require_text(destination, FieldName::new("destination"))?);
    let estimate = state
        .travel
        .distance_and_duration(&origin, &destination)
        .await?;
    Ok(web::Json(estimate))
}
