//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **google_maps**: reqwest client for the Distance Matrix API
//!
//! Adapters are thin translators between domain types and wire or row
//! representations. They contain no business logic.

pub mod google_maps;
pub mod persistence;
