//! `PostgreSQL` adapters for project persistence.

mod models;
mod repository;
mod schema;

pub use repository::{PostgresProjectStore, ProjectPgPool};
