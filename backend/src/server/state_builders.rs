//! Builders wiring Diesel repositories and domain services into adapter state.

use std::sync::Arc;
use std::time::Duration;

use mockable::DefaultClock;
use pizzeria::domain::ports::TravelEstimateQuery;
use pizzeria::domain::{
    AccountService, DeliveryService, GeoService, OrderService, PizzaService, ReviewService,
};
use pizzeria::inbound::http::state::{HttpState, HttpStatePorts};
use pizzeria::inbound::ws::rooms::OrderRooms;
use pizzeria::inbound::ws::state::{OriginAllowList, WsState};
use pizzeria::outbound::google_maps::GoogleMapsHttpSource;
use pizzeria::outbound::persistence::{
    DbPool, DieselAuthTokenRepository, DieselDeliveryRepository, DieselOrderRepository,
    DieselPizzaRepository, DieselReviewRepository, DieselUserRepository,
};
use pizzeria::settings::AppSettings;

const GOOGLE_MAPS_TIMEOUT: Duration = Duration::from_secs(8);

/// Adapter state sharing one room registry between HTTP and WebSocket.
pub(crate) struct AdapterStates {
    pub(crate) http: HttpState,
    pub(crate) ws: WsState,
}

fn build_travel(settings: &AppSettings) -> std::io::Result<Arc<dyn TravelEstimateQuery>> {
    let endpoint = settings
        .google_maps_endpoint()
        .map_err(std::io::Error::other)?;
    let source = GoogleMapsHttpSource::new(
        endpoint,
        settings.google_maps_api_key.clone(),
        GOOGLE_MAPS_TIMEOUT,
    )
    .map_err(|error| std::io::Error::other(format!("Google Maps client: {error}")))?;
    Ok(Arc::new(GeoService::new(Arc::new(source))))
}

/// Build HTTP and WebSocket state from the pool and settings.
///
/// # Errors
///
/// Returns [`std::io::Error`] when the Google Maps client cannot be built or
/// its endpoint override is malformed.
pub(crate) fn build_adapter_states(
    pool: &DbPool,
    settings: &AppSettings,
) -> std::io::Result<AdapterStates> {
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let tokens = Arc::new(DieselAuthTokenRepository::new(pool.clone()));
    let pizzas_repo = Arc::new(DieselPizzaRepository::new(pool.clone()));
    let orders_repo = Arc::new(DieselOrderRepository::new(pool.clone()));
    let reviews_repo = Arc::new(DieselReviewRepository::new(pool.clone()));
    let deliveries_repo = Arc::new(DieselDeliveryRepository::new(pool.clone()));

    let rooms = Arc::new(OrderRooms::new());
    let travel = build_travel(settings)?;

    let accounts = Arc::new(AccountService::new(
        users,
        tokens,
        Arc::new(DefaultClock),
        settings.staff_emails(),
    ));
    let pizzas = Arc::new(PizzaService::new(pizzas_repo.clone()));
    let orders = Arc::new(OrderService::new(
        orders_repo.clone(),
        pizzas_repo.clone(),
        rooms.clone(),
    ));
    let reviews = Arc::new(ReviewService::new(reviews_repo, pizzas_repo));
    let deliveries = Arc::new(DeliveryService::new(
        deliveries_repo,
        orders_repo,
        travel.clone(),
        settings.store_origin(),
    ));

    let http = HttpState::new(HttpStatePorts {
        accounts: accounts.clone(),
        tokens: accounts,
        pizzas: pizzas.clone(),
        pizzas_query: pizzas,
        orders: orders.clone(),
        orders_query: orders,
        reviews: reviews.clone(),
        reviews_query: reviews,
        deliveries: deliveries.clone(),
        deliveries_query: deliveries,
        travel,
    })
    .with_cookie_secure(settings.cookie_secure());
    let ws = WsState::new(rooms, OriginAllowList::new(settings.ws_allowed_origins()));

    Ok(AdapterStates { http, ws })
}
