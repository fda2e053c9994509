//! Google Maps outbound adapters.
//!
//! A thin HTTP implementation of the `DistanceMatrixSource` port.

mod dto;
mod http_source;

pub use http_source::{DEFAULT_DISTANCE_MATRIX_ENDPOINT, GoogleMapsHttpSource};
