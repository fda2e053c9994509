//! HTTP inbound adapter exposing REST endpoints under `/api/v1`.

pub mod accounts;
pub mod auth;
pub mod cookies;
pub mod deliveries;
pub mod error;
pub mod geo;
pub mod health;
pub mod orders;
pub mod pizzas;
pub mod reviews;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every `/api/v1` handler. Callers mount this inside the versioned
/// scope and provide [`state::HttpState`] as app data.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(accounts::register)
        .service(accounts::login)
        .service(accounts::refresh)
        .service(accounts::logout)
        .service(pizzas::list_pizzas)
        .service(pizzas::create_pizza)
        .service(reviews::list_pizza_reviews)
        .service(pizzas::get_pizza)
        .service(pizzas::update_pizza)
        .service(pizzas::delete_pizza)
        .service(orders::place_order)
        .service(orders::list_orders)
        .service(orders::get_order)
        .service(orders::update_order_status)
        .service(deliveries::create_delivery)
        .service(deliveries::get_delivery)
        .service(reviews::create_review)
        .service(reviews::delete_review)
        .service(geo::distance);
}
