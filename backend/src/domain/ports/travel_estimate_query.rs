//! Driving port for distance and duration lookups.

use async_trait::async_trait;

use crate::domain::{Error, Location, TravelEstimate};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TravelEstimateQuery: Send + Sync {
    /// Estimate the trip from `origin` to `destination`.
    async fn distance_and_duration(
        &self,
        origin: &Location,
        destination: &Location,
    ) -> Result<TravelEstimate, Error>;
}
