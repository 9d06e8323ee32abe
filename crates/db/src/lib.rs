//! `db` crate — pure persistence layer.
//!
//! Provides the connection pool, the `world` row struct, and repository
//! functions for every single-row and batched operation.  No HTTP knowledge
//! lives here.

pub mod config;
pub mod error;
pub mod models;
pub mod pool;
pub mod repository;

pub use config::DbConfig;
pub use error::DbError;
pub use pool::DbPool;
