//! Repository functions — one function per database operation.
//!
//! Every function takes a `&DbPool` and returns a `Result<T, DbError>`.
//! No business logic, no HTTP types — pure SQL.

pub mod batch;
pub mod worlds;
