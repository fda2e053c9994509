//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories translate between the internal row structs in `models.rs`
//! and domain types; no business rules live here. Connections come from a
//! `bb8` pool through `diesel-async`, and every database failure is mapped
//! onto the owning port's error enum.
//!
//! ```ignore
//! use pizzeria::outbound::persistence::{DbPool, DieselPizzaRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/pizzeria")).await?;
//! let pizzas = DieselPizzaRepository::new(pool);
//! ```

mod diesel_auth_token_repository;
mod diesel_basic_error_mapping;
mod diesel_delivery_repository;
mod diesel_order_repository;
mod diesel_pizza_repository;
mod diesel_review_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_auth_token_repository::DieselAuthTokenRepository;
pub use diesel_delivery_repository::DieselDeliveryRepository;
pub use diesel_order_repository::DieselOrderRepository;
pub use diesel_pizza_repository::DieselPizzaRepository;
pub use diesel_review_repository::DieselReviewRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
