//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccessTokenVerifier, AccountCommand, DeliveryCommand, DeliveryQuery, OrderCommand, OrderQuery,
    PizzaCommand, PizzaQuery, ReviewCommand, ReviewQuery, TravelEstimateQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub accounts: Arc<dyn AccountCommand>,
    pub tokens: Arc<dyn AccessTokenVerifier>,
    pub pizzas: Arc<dyn PizzaCommand>,
    pub pizzas_query: Arc<dyn PizzaQuery>,
    pub orders: Arc<dyn OrderCommand>,
    pub orders_query: Arc<dyn OrderQuery>,
    pub reviews: Arc<dyn ReviewCommand>,
    pub reviews_query: Arc<dyn ReviewQuery>,
    pub deliveries: Arc<dyn DeliveryCommand>,
    pub deliveries_query: Arc<dyn DeliveryQuery>,
    pub travel: Arc<dyn TravelEstimateQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountCommand>,
    pub tokens: Arc<dyn AccessTokenVerifier>,
    pub pizzas: Arc<dyn PizzaCommand>,
    pub pizzas_query: Arc<dyn PizzaQuery>,
    pub orders: Arc<dyn OrderCommand>,
    pub orders_query: Arc<dyn OrderQuery>,
    pub reviews: Arc<dyn ReviewCommand>,
    pub reviews_query: Arc<dyn ReviewQuery>,
    pub deliveries: Arc<dyn DeliveryCommand>,
    pub deliveries_query: Arc<dyn DeliveryQuery>,
    pub travel: Arc<dyn TravelEstimateQuery>,
    /// Whether the refresh cookie carries the `Secure` attribute.
    pub cookie_secure: bool,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from the port bundle with secure cookies enabled.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            accounts,
            tokens,
            pizzas,
            pizzas_query,
            orders,
            orders_query,
            reviews,
            reviews_query,
            deliveries,
            deliveries_query,
            travel,
        } = ports;
        Self {
            accounts,
            tokens,
            pizzas,
            pizzas_query,
            orders,
            orders_query,
            reviews,
            reviews_query,
            deliveries,
            deliveries_query,
            travel,
            cookie_secure: true,
        }
    }

    /// Toggle the `Secure` attribute on the refresh cookie.
    pub fn with_cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }
}
