//! `PostgreSQL` adapters for task board persistence.
//!
//! The matching DDL lives in `migrations/`.

mod models;
mod repository;
mod schema;

pub use repository::{PostgresTaskBoardStore, TaskBoardPgPool};
