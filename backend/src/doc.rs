//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST handler of the inbound HTTP layer, the
//! request and response schemas they use, and the bearer token security
//! scheme issued by `POST /api/v1/auth/login`.
//!
//! The generated document is served by Swagger UI in debug builds and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    Delivery, Error, ErrorCode, LocalizedPizza, Order, OrderItem, OrderLineRequest, OrderStatus,
    Pizza, PizzaTranslation, PlaceOrderRequest, Review, TravelEstimate, User, UserRole,
};
use crate::inbound::http::accounts::{AccessTokenResponse, CredentialsRequest, RefreshRequest};
use crate::inbound::http::health::ProbeBody;
use crate::inbound::http::orders::UpdateOrderStatusRequest;
use crate::inbound::http::pizzas::{CreatePizzaRequest, UpdatePizzaRequest};
use crate::inbound::http::reviews::CreateReviewBody;

/// Adds the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .description(Some(
                        "Access token returned by POST /api/v1/auth/login or /auth/refresh.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Pizzeria backend API",
        description = "Menu, orders, reviews, deliveries and distance lookups for the pizzeria."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::refresh,
        crate::inbound::http::accounts::logout,
        crate::inbound::http::pizzas::list_pizzas,
        crate::inbound::http::pizzas::get_pizza,
        crate::inbound::http::pizzas::create_pizza,
        crate::inbound::http::pizzas::update_pizza,
        crate::inbound::http::pizzas::delete_pizza,
        crate::inbound::http::orders::place_order,
        crate::inbound::http::orders::list_orders,
        crate::inbound::http::orders::get_order,
        crate::inbound::http::orders::update_order_status,
        crate::inbound::http::reviews::create_review,
        crate::inbound::http::reviews::list_pizza_reviews,
        crate::inbound::http::reviews::delete_review,
        crate::inbound::http::deliveries::create_delivery,
        crate::inbound::http::deliveries::get_delivery,
        crate::inbound::http::geo::distance,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        User,
        UserRole,
        CredentialsRequest,
        RefreshRequest,
        AccessTokenResponse,
        Pizza,
        LocalizedPizza,
        PizzaTranslation,
        CreatePizzaRequest,
        UpdatePizzaRequest,
        Order,
        OrderItem,
        OrderStatus,
        OrderLineRequest,
        PlaceOrderRequest,
        UpdateOrderStatusRequest,
        Review,
        CreateReviewBody,
        Delivery,
        TravelEstimate,
        ProbeBody,
    )),
    tags(
        (name = "auth", description = "Registration, login and token refresh"),
        (name = "pizzas", description = "Menu management"),
        (name = "orders", description = "Ordering and status changes"),
        (name = "reviews", description = "Pizza reviews"),
        (name = "deliveries", description = "Delivery dispatch"),
        (name = "geo", description = "Distance and duration lookups"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated document.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("Error", "code")]
    #[case("Error", "message")]
    #[case("Order", "deliveryAddress")]
    #[case("AccessTokenResponse", "accessToken")]
    fn schemas_use_camel_case_fields(#[case] name: &str, #[case] field: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let schema = schemas.get(name).expect("schema registered");

        assert_object_schema_has_field(schema, field);
    }

    #[rstest]
    #[case("/api/v1/auth/login")]
    #[case("/api/v1/pizzas/{id}")]
    #[case("/api/v1/orders/{id}/status")]
    #[case("/api/v1/orders/{id}/delivery")]
    #[case("/api/v1/geo/distance")]
    #[case("/health/ready")]
    fn paths_are_registered(#[case] path: &str) {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[test]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");

        assert!(components.security_schemes.contains_key("BearerAuth"));
    }
}
