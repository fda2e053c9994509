//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. When a
//! migration changes the schema, update this file alongside it (or
//! regenerate it with `diesel print-schema`).

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Uuid,
        /// Normalised (trimmed, lowercase) email; unique.
        email -> Varchar,
        /// `customer` or `staff`.
        role -> Varchar,
        password_hash -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Issued access and refresh tokens, keyed by SHA-256 digest.
    auth_tokens (digest) {
        digest -> Varchar,
        user_id -> Uuid,
        /// `access` or `refresh`.
        kind -> Varchar,
        expires_at -> Timestamptz,
        revoked -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Menu entries.
    pizzas (id) {
        id -> Int4,
        slug -> Varchar,
        price_cents -> Int8,
        image_url -> Nullable<Text>,
        available -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Localised names and descriptions; unique per `(pizza_id, locale)`.
    pizza_translations (id) {
        id -> Int4,
        pizza_id -> Int4,
        locale -> Varchar,
        name -> Varchar,
        description -> Nullable<Text>,
    }
}

diesel::table! {
    orders (id) {
        id -> Int4,
        user_id -> Uuid,
        status -> Varchar,
        total_cents -> Int8,
        delivery_address -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    order_items (id) {
        id -> Int4,
        order_id -> Int4,
        pizza_id -> Int4,
        quantity -> Int4,
        unit_price_cents -> Int8,
    }
}

diesel::table! {
    /// One review per user per pizza.
    reviews (id) {
        id -> Int4,
        pizza_id -> Int4,
        user_id -> Uuid,
        rating -> Int2,
        comment -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// At most one delivery per order.
    deliveries (id) {
        id -> Int4,
        order_id -> Int4,
        origin -> Text,
        destination -> Text,
        distance_text -> Nullable<Varchar>,
        distance_meters -> Nullable<Int8>,
        duration_text -> Nullable<Varchar>,
        duration_seconds -> Nullable<Int8>,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(auth_tokens -> users (user_id));
diesel::joinable!(pizza_translations -> pizzas (pizza_id));
diesel::joinable!(orders -> users (user_id));
diesel::joinable!(order_items -> orders (order_id));
diesel::joinable!(order_items -> pizzas (pizza_id));
diesel::joinable!(reviews -> pizzas (pizza_id));
diesel::joinable!(reviews -> users (user_id));
diesel::joinable!(deliveries -> orders (order_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    auth_tokens,
    pizzas,
    pizza_translations,
    orders,
    order_items,
    reviews,
    deliveries,
);
