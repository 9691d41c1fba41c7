//! `PostgreSQL` adapter for the identity directory.

mod models;
mod repository;
mod schema;

pub use repository::PostgresIdentityDirectory;
