//! Domain primitives, services, and ports.
//!
//! Purpose: define strongly typed entities for the pizzeria (menu, orders,
//! reviews, deliveries, accounts) and the services implementing the driving
//! ports. Nothing here depends on Actix or Diesel; adapters live under
//! `inbound` and `outbound`.

pub mod auth;
pub mod delivery;
pub mod error;
pub mod geo;
pub mod order;
pub mod pizza;
pub mod ports;
pub mod review;
pub mod trace_id;
pub mod user;

mod account_service;
mod delivery_service;
mod geo_service;
mod order_service;
mod pizza_service;
mod review_service;

pub use self::account_service::AccountService;
pub use self::auth::{AuthenticatedUser, PasswordHash, StoredToken, TokenKind, TokenPair};
pub use self::delivery::{Delivery, DeliveryId, NewDelivery};
pub use self::delivery_service::DeliveryService;
pub use self::error::{Error, ErrorCode};
pub use self::geo::{Location, TravelEstimate};
pub use self::geo_service::GeoService;
pub use self::order::{
    NewOrder, Order, OrderId, OrderItem, OrderLineRequest, OrderStatus, PlaceOrderRequest,
};
pub use self::order_service::OrderService;
pub use self::pizza::{
    LocalizedPizza, Pizza, PizzaDraft, PizzaFilter, PizzaId, PizzaPatch, PizzaSlug,
    PizzaTranslation, PizzaValidationError, Price,
};
pub use self::pizza_service::PizzaService;
pub use self::review::{NewReview, Rating, Review, ReviewId};
pub use self::review_service::ReviewService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{Email, Password, User, UserId, UserRole, UserValidationError};
