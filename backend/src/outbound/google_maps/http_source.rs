//! Reqwest-backed Distance Matrix source adapter.
//!
//! This adapter owns transport details only: query encoding, the request
//! timeout, HTTP status mapping and JSON decoding. Element statuses are
//! interpreted by the domain.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use super::dto::DistanceMatrixResponseDto;
use crate::domain::ports::{DistanceMatrixSource, DistanceMatrixSourceError, MatrixElement};

/// Public Distance Matrix JSON endpoint.
pub const DEFAULT_DISTANCE_MATRIX_ENDPOINT: &str =
    "https://maps.googleapis.com/maps/api/distancematrix/json";

const REQUEST_DENIED: &str = "REQUEST_DENIED";

/// Distance Matrix source performing one GET per lookup.
pub struct GoogleMapsHttpSource {
    client: Client,
    endpoint: Url,
    api_key: Option<String>,
}

impl GoogleMapsHttpSource {
    /// Build an adapter with an explicit request timeout.
    ///
    /// Without an `api_key` every lookup fails with
    /// [`DistanceMatrixSourceError::NotConfigured`] before any I/O.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }
}

#[async_trait]
impl DistanceMatrixSource for GoogleMapsHttpSource {
    async fn first_element(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<Option<MatrixElement>, DistanceMatrixSourceError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(DistanceMatrixSourceError::not_configured)?;
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[
                ("origins", origin),
                ("destinations", destination),
                ("key", key),
            ])
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(map_status_error(status));
        }
        let body = response.bytes().await.map_err(map_transport_error)?;
        parse_first_element(body.as_ref())
    }
}

fn parse_first_element(body: &[u8]) -> Result<Option<MatrixElement>, DistanceMatrixSourceError> {
    let decoded: DistanceMatrixResponseDto = serde_json::from_slice(body).map_err(|error| {
        DistanceMatrixSourceError::transport(format!("invalid Distance Matrix JSON: {error}"))
    })?;
    if decoded.status.as_deref() == Some(REQUEST_DENIED) {
        debug!(reason = ?decoded.error_message, "distance matrix request denied");
        return Err(DistanceMatrixSourceError::denied());
    }
    Ok(decoded.into_first_element())
}

fn map_transport_error(error: reqwest::Error) -> DistanceMatrixSourceError {
    if error.is_timeout() {
        DistanceMatrixSourceError::timeout()
    } else {
        DistanceMatrixSourceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode) -> DistanceMatrixSourceError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => DistanceMatrixSourceError::denied(),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            DistanceMatrixSourceError::timeout()
        }
        _ => DistanceMatrixSourceError::transport(format!("status {}", status.as_u16())),
    }
}
