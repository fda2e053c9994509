//! Distance and duration lookups through the Distance Matrix port.
//!
//! Upstream failures become internal errors carrying the messages below;
//! adapters redact them on the wire while logs keep the detail.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, warn};

use crate::domain::geo::INVALID_COORDINATES;
use crate::domain::ports::{
    DistanceMatrixSource, DistanceMatrixSourceError, MatrixElement, TravelEstimateQuery,
};
use crate::domain::{Error, Location, TravelEstimate};

const NO_RESULT: &str = "No result from Google Maps";
const CALCULATION_FAILED: &str = "Error calculating distance via Google Maps";
const TIMED_OUT: &str = "Google Maps request timed out";
const DENIED: &str = "Google Maps request denied";
const ACCESS_FAILED: &str = "Error accessing Google Maps API";

fn map_source_error(source_error: DistanceMatrixSourceError) -> Error {
    error!(error = %source_error, "distance matrix lookup failed");
    match source_error {
        DistanceMatrixSourceError::Timeout => Error::internal(TIMED_OUT),
        DistanceMatrixSourceError::Denied => Error::internal(DENIED),
        DistanceMatrixSourceError::Transport { .. } => Error::internal(ACCESS_FAILED),
        DistanceMatrixSourceError::NotConfigured => {
            Error::service_unavailable("Google Maps API key is not configured")
        }
    }
}

fn interpret(element: MatrixElement) -> Result<TravelEstimate, Error> {
    match element.status.as_str() {
        "OK" => {
            let (distance_text, distance_value) = element
                .distance
                .map(|d| (d.text, d.value))
                .unwrap_or_default();
            let (duration_text, duration_value) = element
                .duration
                .map(|d| (d.text, d.value))
                .unwrap_or_default();
            Ok(TravelEstimate {
                distance_text,
                distance_value,
                duration_text,
                duration_value,
            })
        }
        "ZERO_RESULTS" => Ok(TravelEstimate::default()),
        other => {
            warn!(status = other, "distance matrix element not usable");
            Err(Error::internal(CALCULATION_FAILED))
        }
    }
}

/// Geo service implementing [`TravelEstimateQuery`].
#[derive(Clone)]
pub struct GeoService<S> {
    source: Arc<S>,
}

impl<S> GeoService<S> {
    /// Create a new service with the Distance Matrix source.
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl<S> TravelEstimateQuery for GeoService<S>
where
    S: DistanceMatrixSource,
{
    async fn distance_and_duration(
        &self,
        origin: &Location,
        destination: &Location,
    ) -> Result<TravelEstimate, Error> {
        let invalid = |_| Error::invalid_request(INVALID_COORDINATES);
        let origin = origin.to_query_value().map_err(invalid)?;
        let destination = destination.to_query_value().map_err(invalid)?;

        let element = self
            .source
            .first_element(&origin, &destination)
            .await
            .map_err(map_source_error)?
            .ok_or_else(|| {
                warn!(%origin, %destination, "distance matrix reply had no elements");
                Error::internal(NO_RESULT)
            })?;
        interpret(element)
    }
}
