//! Menu API handlers.
//!
//! ```text
//! GET    /api/v1/pizzas?minPrice=30&maxPrice=50&locale=pt-BR
//! GET    /api/v1/pizzas/{id}?locale=en
//! POST   /api/v1/pizzas        (staff)
//! PATCH  /api/v1/pizzas/{id}   (staff)
//! DELETE /api/v1/pizzas/{id}   (staff)
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    AuthenticatedUser, Error, LocalizedPizza, Pizza, PizzaDraft, PizzaFilter, PizzaId, PizzaPatch,
    PizzaSlug, PizzaTranslation, Price,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::require_staff;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_optional_price, pizza_validation_error};

/// Listing filter as received on the query string.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PizzaListQuery {
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub locale: Option<String>,
}

impl PizzaListQuery {
    fn into_filter(self) -> Result<PizzaFilter, Error> {
        Ok(PizzaFilter {
            min_price: parse_optional_price(self.min_price, FieldName::new("minPrice"))?,
            max_price: parse_optional_price(self.max_price, FieldName::new("maxPrice"))?,
            locale: non_blank(self.locale),
        })
    }
}

/// Optional display locale.
#[derive(Debug, Default, Deserialize)]
pub struct LocaleQuery {
    pub locale: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

fn default_available() -> bool {
    true
}

/// Body for creating a pizza.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePizzaRequest {
    #[schema(example = "quattro-formaggi")]
    pub slug: String,
    pub price: Price,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_available")]
    pub available: bool,
    pub translations: Vec<PizzaTranslation>,
}

impl TryFrom<CreatePizzaRequest> for PizzaDraft {
    type Error = Error;

    fn try_from(request: CreatePizzaRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            slug: PizzaSlug::new(&request.slug).map_err(pizza_validation_error)?,
            price: request.price,
            image_url: non_blank(request.image_url),
            available: request.available,
            translations: request.translations,
        })
    }
}

/// Body for a partial pizza update. Present translations replace the set.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePizzaRequest {
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub available: Option<bool>,
    #[serde(default)]
    pub translations: Option<Vec<PizzaTranslation>>,
}

impl TryFrom<UpdatePizzaRequest> for PizzaPatch {
    type Error = Error;

    fn try_from(request: UpdatePizzaRequest) -> Result<Self, Self::Error> {
        let slug = request
            .slug
            .map(PizzaSlug::new)
            .transpose()
            .map_err(pizza_validation_error)?;
        Ok(Self {
            slug,
            price: request.price,
            image_url: request.image_url,
            available: request.available,
            translations: request.translations,
        })
    }
}

/// List the menu.
#[utoipa::path(
    get,
    path = "/api/v1/pizzas",
    params(
        ("minPrice" = Option<String>, Query, description = "Inclusive lower price bound"),
        ("maxPrice" = Option<String>, Query, description = "Inclusive upper price bound"),
        ("locale" = Option<String>, Query, description = "Locale for name and description")
    ),
    responses(
        (status = 200, description = "Pizzas ordered by id", body = [LocalizedPizza]),
        (status = 400, description = "Invalid price filter", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["pizzas"],
    operation_id = "listPizzas",
    security([])
)]
#[get("/pizzas")]
pub async fn list_pizzas(
    state: web::Data<HttpState>,
    query: web::Query<PizzaListQuery>,
) -> ApiResult<web::Json<Vec<LocalizedPizza>>> {
    let filter = query.into_inner().into_filter()?;
    let pizzas = state.pizzas_query.find_all(filter).await?;
    Ok(web::Json(pizzas))
}

/// Fetch one pizza.
#[utoipa::path(
    get,
    path = "/api/v1/pizzas/{id}",
    params(
        ("id" = i32, Path, description = "Pizza id"),
        ("locale" = Option<String>, Query, description = "Locale for name and description")
    ),
    responses(
        (status = 200, description = "Pizza", body = LocalizedPizza),
        (status = 404, description = "Unknown pizza", body = Error)
    ),
    tags = ["pizzas"],
    operation_id = "getPizza",
    security([])
)]
#[get("/pizzas/{id}")]
pub async fn get_pizza(
    state: web::Data<HttpState>,
    path: web::Path<PizzaId>,
    query: web::Query<LocaleQuery>,
) -> ApiResult<web::Json<LocalizedPizza>> {
    let locale = non_blank(query.into_inner().locale);
    let pizza = state.pizzas_query.find_one(path.into_inner(), locale).await?;
    Ok(web::Json(pizza))
}

/// Add a pizza to the menu.
#[utoipa::path(
    post,
    path = "/api/v1/pizzas",
    request_body = CreatePizzaRequest,
    responses(
        (status = 201, description = "Pizza created", body = Pizza),
        (status = 400, description = "Invalid pizza or slug already in use", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Staff only", body = Error)
    ),
    tags = ["pizzas"],
    operation_id = "createPizza",
    security(("BearerAuth" = []))
)]
#[post("/pizzas")]
pub async fn create_pizza(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<CreatePizzaRequest>,
) -> ApiResult<HttpResponse> {
    require_staff(&user)?;
    let draft = PizzaDraft::try_from(payload.into_inner())?;
    let pizza = state.pizzas.create(draft).await?;
    Ok(HttpResponse::Created().json(pizza))
}

/// Update a pizza.
#[utoipa::path(
    patch,
    path = "/api/v1/pizzas/{id}",
    params(("id" = i32, Path, description = "Pizza id")),
    request_body = UpdatePizzaRequest,
    responses(
        (status = 200, description = "Updated pizza", body = Pizza),
        (status = 400, description = "Invalid patch or slug already in use", body = Error),
        (status = 403, description = "Staff only", body = Error),
        (status = 404, description = "Unknown pizza", body = Error)
    ),
    tags = ["pizzas"],
    operation_id = "updatePizza",
    security(("BearerAuth" = []))
)]
#[patch("/pizzas/{id}")]
pub async fn update_pizza(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<PizzaId>,
    payload: web::Json<UpdatePizzaRequest>,
) -> ApiResult<web::Json<Pizza>> {
    require_staff(&user)?;
    let patch = PizzaPatch::try_from(payload.into_inner())?;
    let pizza = state.pizzas.update(path.into_inner(), patch).await?;
    Ok(web::Json(pizza))
}

/// Remove a pizza with its translations and reviews.
#[utoipa::path(
    delete,
    path = "/api/v1/pizzas/{id}",
    params(("id" = i32, Path, description = "Pizza id")),
    responses(
        (status = 204, description = "Pizza removed"),
        (status = 403, description = "Staff only", body = Error),
        (status = 404, description = "Unknown pizza", body = Error),
        (status = 409, description = "Pizza appears on existing orders", body = Error)
    ),
    tags = ["pizzas"],
    operation_id = "deletePizza",
    security(("BearerAuth" = []))
)]
#[delete("/pizzas/{id}")]
pub async fn delete_pizza(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<PizzaId>,
) -> ApiResult<HttpResponse> {
    require_staff(&user)?;
    state.pizzas.remove(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
