//! Delivery records with the travel estimate captured at dispatch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{OrderId, TravelEstimate};

/// Database identifier of a delivery.
pub type DeliveryId = i32;

/// Persisted delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Delivery {
    pub id: DeliveryId,
    pub order_id: OrderId,
    pub origin: String,
    pub destination: String,
    pub distance_text: Option<String>,
    pub distance_meters: Option<i64>,
    pub duration_text: Option<String>,
    pub duration_seconds: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Delivery ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDelivery {
    pub order_id: OrderId,
    pub origin: String,
    pub destination: String,
    pub estimate: TravelEstimate,
}
