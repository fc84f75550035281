//! `PostgreSQL` adapters for project board persistence.

mod models;
mod repository;
mod schema;

pub use repository::{PostgresProjectRepository, ProjectPgPool};
