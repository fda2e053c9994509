//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use crate::domain::ports::{
    MockAccessTokenVerifier, MockAccountCommand, MockDeliveryCommand, MockDeliveryQuery,
    MockOrderCommand, MockOrderQuery, MockPizzaCommand, MockPizzaQuery, MockReviewCommand,
    MockReviewQuery, MockTravelEstimateQuery,
};
use crate::domain::{AuthenticatedUser, Error, UserId, UserRole};
use crate::inbound::http::error::extractor_config;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::inbound::http::configure_api;

/// Bearer token accepted by [`TestPorts::authenticating_as`].
pub const TEST_TOKEN: &str = "test-access-token";

/// `Authorization` header value carrying [`TEST_TOKEN`].
pub fn bearer() -> (&'static str, String) {
    ("Authorization", format!("Bearer {TEST_TOKEN}"))
}

pub fn customer() -> AuthenticatedUser {
    AuthenticatedUser {
        id: UserId::random(),
        role: UserRole::Customer,
    }
}

pub fn staff() -> AuthenticatedUser {
    AuthenticatedUser {
        id: UserId::random(),
        role: UserRole::Staff,
    }
}

/// Mock for every driving port; tests set expectations before building the
/// app. Unused mocks reject any call.
#[derive(Default)]
pub struct TestPorts {
    pub accounts: MockAccountCommand,
    pub tokens: MockAccessTokenVerifier,
    pub pizzas: MockPizzaCommand,
    pub pizzas_query: MockPizzaQuery,
    pub orders: MockOrderCommand,
    pub orders_query: MockOrderQuery,
    pub reviews: MockReviewCommand,
    pub reviews_query: MockReviewQuery,
    pub deliveries: MockDeliveryCommand,
    pub deliveries_query: MockDeliveryQuery,
    pub travel: MockTravelEstimateQuery,
}

impl TestPorts {
    /// Resolve [`TEST_TOKEN`] to `user`; any other token is rejected.
    pub fn authenticating_as(mut self, user: AuthenticatedUser) -> Self {
        self.tokens.expect_authenticate().returning(move |token| {
            if token == TEST_TOKEN {
                Ok(user)
            } else {
                Err(Error::unauthorized("invalid access token"))
            }
        });
        self
    }

    pub fn into_state(self) -> HttpState {
        HttpState::new(HttpStatePorts {
            accounts: Arc::new(self.accounts),
            tokens: Arc::new(self.tokens),
            pizzas: Arc::new(self.pizzas),
            pizzas_query: Arc::new(self.pizzas_query),
            orders: Arc::new(self.orders),
            orders_query: Arc::new(self.orders_query),
            reviews: Arc::new(self.reviews),
            reviews_query: Arc::new(self.reviews_query),
            deliveries: Arc::new(self.deliveries),
            deliveries_query: Arc::new(self.deliveries_query),
            travel: Arc::new(self.travel),
        })
        .with_cookie_secure(false)
    }
}

/// Build the `/api/v1` application over the mocked ports.
pub fn test_app(
    ports: TestPorts,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(ports.into_state()))
        .configure(extractor_config)
        .service(web::scope("/api/v1").configure(configure_api))
}
