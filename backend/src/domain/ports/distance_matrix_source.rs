//! Driven port for the Google Distance Matrix API.
//!
//! The adapter owns transport concerns (timeouts, HTTP status codes, JSON
//! decoding). Interpreting the first matrix element is left to the domain so
//! the status branching can be exercised without a network.

use async_trait::async_trait;

use super::define_port_error;

/// One distance or duration reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixValue {
    /// Human readable text, for example `5.2 km`.
    pub text: Option<String>,
    /// Metres or seconds.
    pub value: Option<i64>,
}

/// First element of the first row of a matrix reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixElement {
    /// Element status such as `OK` or `ZERO_RESULTS`.
    pub status: String,
    pub distance: Option<MatrixValue>,
    pub duration: Option<MatrixValue>,
}

define_port_error! {
    /// Errors surfaced while calling the Distance Matrix API.
    pub enum DistanceMatrixSourceError {
        /// The request exceeded its timeout.
        Timeout => "Google Maps request timed out",
        /// Upstream rejected the credentials (HTTP 401 or 403).
        Denied => "Google Maps request denied",
        /// Any other transport, HTTP, or decoding failure.
        Transport { message: String } => "Error accessing Google Maps API: {message}",
        /// No API key is configured.
        NotConfigured => "Google Maps API key is not configured",
    }
}

/// Port for one origin/destination lookup.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DistanceMatrixSource: Send + Sync {
    /// Return `rows[0].elements[0]` of the reply, or `None` when absent.
    async fn first_element(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<Option<MatrixElement>, DistanceMatrixSourceError>;
}
