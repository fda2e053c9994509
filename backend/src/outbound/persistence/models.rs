//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversion into domain types happens in
//! the repositories, which own the error mapping for rows that fail domain
//! validation.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{
    auth_tokens, deliveries, order_items, orders, pizza_translations, pizzas, reviews, users,
};

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub role: &'a str,
    pub password_hash: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = auth_tokens)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AuthTokenRow {
    pub digest: String,
    pub user_id: Uuid,
    pub kind: String,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = auth_tokens)]
pub(crate) struct NewAuthTokenRow<'a> {
    pub digest: &'a str,
    pub user_id: Uuid,
    pub kind: &'a str,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
}

// ---------------------------------------------------------------------------
// Menu
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = pizzas)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PizzaRow {
    pub id: i32,
    pub slug: String,
    pub price_cents: i64,
    pub image_url: Option<String>,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = pizzas)]
pub(crate) struct NewPizzaRow<'a> {
    pub slug: &'a str,
    pub price_cents: i64,
    pub image_url: Option<&'a str>,
    pub available: bool,
}

/// Changeset for partial pizza updates; `None` fields are left untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = pizzas)]
pub(crate) struct PizzaChangeset<'a> {
    pub slug: Option<&'a str>,
    pub price_cents: Option<i64>,
    pub image_url: Option<&'a str>,
    pub available: Option<bool>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(belongs_to(PizzaRow, foreign_key = pizza_id))]
#[diesel(table_name = pizza_translations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PizzaTranslationRow {
    pub id: i32,
    pub pizza_id: i32,
    pub locale: String,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = pizza_translations)]
pub(crate) struct NewPizzaTranslationRow<'a> {
    pub pizza_id: i32,
    pub locale: &'a str,
    pub name: &'a str,
    pub description: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OrderRow {
    pub id: i32,
    pub user_id: Uuid,
    pub status: String,
    pub total_cents: i64,
    pub delivery_address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = orders)]
pub(crate) struct NewOrderRow<'a> {
    pub user_id: Uuid,
    pub status: &'a str,
    pub total_cents: i64,
    pub delivery_address: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(table_name = order_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OrderItemRow {
    pub id: i32,
    pub order_id: i32,
    pub pizza_id: i32,
    pub quantity: i32,
    pub unit_price_cents: i64,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = order_items)]
pub(crate) struct NewOrderItemRow {
    pub order_id: i32,
    pub pizza_id: i32,
    pub quantity: i32,
    pub unit_price_cents: i64,
}

// ---------------------------------------------------------------------------
// Reviews and deliveries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReviewRow {
    pub id: i32,
    pub pizza_id: i32,
    pub user_id: Uuid,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = reviews)]
pub(crate) struct NewReviewRow<'a> {
    pub pizza_id: i32,
    pub user_id: Uuid,
    pub rating: i16,
    pub comment: Option<&'a str>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = deliveries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DeliveryRow {
    pub id: i32,
    pub order_id: i32,
    pub origin: String,
    pub destination: String,
    pub distance_text: Option<String>,
    pub distance_meters: Option<i64>,
    pub duration_text: Option<String>,
    pub duration_seconds: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = deliveries)]
pub(crate) struct NewDeliveryRow<'a> {
    pub order_id: i32,
    pub origin: &'a str,
    pub destination: &'a str,
    pub distance_text: Option<&'a str>,
    pub distance_meters: Option<i64>,
    pub duration_text: Option<&'a str>,
    pub duration_seconds: Option<i64>,
}
