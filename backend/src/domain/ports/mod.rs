//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`*Command`, `*Query`, [`AccessTokenVerifier`]) are called by
//! inbound adapters. Driven ports (`*Repository`, [`DistanceMatrixSource`],
//! [`OrderStatusNotifier`]) are implemented by outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod auth_token_repository;
mod delivery_command;
mod delivery_query;
mod delivery_repository;
mod distance_matrix_source;
mod order_command;
mod order_query;
mod order_repository;
mod order_status_notifier;
mod pizza_command;
mod pizza_query;
mod pizza_repository;
mod review_command;
mod review_query;
mod review_repository;
mod travel_estimate_query;
mod user_repository;

#[cfg(test)]
pub use account_command::{MockAccessTokenVerifier, MockAccountCommand};
pub use account_command::{AccessTokenVerifier, AccountCommand, Credentials};
#[cfg(test)]
pub use auth_token_repository::MockAuthTokenRepository;
pub use auth_token_repository::{AuthTokenRepository, AuthTokenRepositoryError};
pub use delivery_command::DeliveryCommand;
#[cfg(test)]
pub use delivery_command::MockDeliveryCommand;
pub use delivery_query::DeliveryQuery;
#[cfg(test)]
pub use delivery_query::MockDeliveryQuery;
#[cfg(test)]
pub use delivery_repository::MockDeliveryRepository;
pub use delivery_repository::{DeliveryRepository, DeliveryRepositoryError};
#[cfg(test)]
pub use distance_matrix_source::MockDistanceMatrixSource;
pub use distance_matrix_source::{
    DistanceMatrixSource, DistanceMatrixSourceError, MatrixElement, MatrixValue,
};
#[cfg(test)]
pub use order_command::MockOrderCommand;
pub use order_command::OrderCommand;
#[cfg(test)]
pub use order_query::MockOrderQuery;
pub use order_query::OrderQuery;
#[cfg(test)]
pub use order_repository::MockOrderRepository;
pub use order_repository::{OrderRepository, OrderRepositoryError};
#[cfg(test)]
pub use order_status_notifier::MockOrderStatusNotifier;
pub use order_status_notifier::{OrderStatusNotifier, OrderStatusUpdate, order_room};
#[cfg(test)]
pub use pizza_command::MockPizzaCommand;
pub use pizza_command::PizzaCommand;
#[cfg(test)]
pub use pizza_query::MockPizzaQuery;
pub use pizza_query::PizzaQuery;
#[cfg(test)]
pub use pizza_repository::MockPizzaRepository;
pub use pizza_repository::{PizzaRepository, PizzaRepositoryError};
#[cfg(test)]
pub use review_command::MockReviewCommand;
pub use review_command::{CreateReviewRequest, ReviewCommand};
#[cfg(test)]
pub use review_query::MockReviewQuery;
pub use review_query::ReviewQuery;
#[cfg(test)]
pub use review_repository::MockReviewRepository;
pub use review_repository::{ReviewRepository, ReviewRepositoryError};
#[cfg(test)]
pub use travel_estimate_query::MockTravelEstimateQuery;
pub use travel_estimate_query::TravelEstimateQuery;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserCredentials, UserPersistenceError, UserRepository};
