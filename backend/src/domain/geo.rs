//! Locations and travel estimates for the distance helper.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Message returned for unusable locations.
pub const INVALID_COORDINATES: &str = "Invalid coordinate format";

/// Origin or destination of a trip.
///
/// Either a free-text address or a WGS84 coordinate pair. Coordinates are
/// sent upstream as `"lat,lng"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum Location {
    Coordinates { lat: f64, lng: f64 },
    Address(String),
}

/// Raised when a location cannot be sent upstream.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid coordinate format")]
pub struct InvalidLocation;

impl Location {
    /// Interpret query text: two comma-separated numbers are coordinates,
    /// anything else is an address.
    ///
    /// # Examples
    /// ```
    /// use pizzeria::domain::Location;
    ///
    /// let here = Location::parse("-23.55,-46.63");
    /// assert_eq!(here.to_query_value().expect("valid"), "-23.55,-46.63");
    /// ```
    pub fn parse(text: &str) -> Self {
        let coordinates = text.split_once(',').and_then(|(lat, lng)| {
            let lat = lat.trim().parse::<f64>().ok()?;
            let lng = lng.trim().parse::<f64>().ok()?;
            Some(Self::Coordinates { lat, lng })
        });
        coordinates.unwrap_or_else(|| Self::Address(text.trim().to_owned()))
    }

    /// Normalise to the upstream query representation.
    pub fn to_query_value(&self) -> Result<String, InvalidLocation> {
        match self {
            Self::Coordinates { lat, lng } => {
                let in_range = lat.is_finite()
                    && lng.is_finite()
                    && (-90.0..=90.0).contains(lat)
                    && (-180.0..=180.0).contains(lng);
                if in_range {
                    Ok(format!("{lat},{lng}"))
                } else {
                    Err(InvalidLocation)
                }
            }
            Self::Address(address) if address.trim().is_empty() => Err(InvalidLocation),
            Self::Address(address) => Ok(address.trim().to_owned()),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Coordinates { lat, lng } => write!(f, "{lat},{lng}"),
            Self::Address(address) => f.write_str(address),
        }
    }
}

/// Distance and duration between two locations.
///
/// All fields are `None` when the upstream reports no route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TravelEstimate {
    #[schema(example = "5.2 km")]
    pub distance_text: Option<String>,
    /// Metres.
    pub distance_value: Option<i64>,
    #[schema(example = "14 mins")]
    pub duration_text: Option<String>,
    /// Seconds.
    pub duration_value: Option<i64>,
}
