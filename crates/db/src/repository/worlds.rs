//! Single-row CRUD operations on the `world` table.

use sqlx::PgPool;

use crate::{models::World, DbError};

/// Fetch a single row by its primary key.
///
/// Zero matching rows is `DbError::NotFound`, distinct from a store error.
pub async fn get_world(pool: &PgPool, id: i32) -> Result<World, DbError> {
    let row = sqlx::query_as::<_, World>(
        "SELECT id, randomnumber FROM world WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    Ok(row)
}

/// Fetch a page of rows ordered by primary key ascending.
///
/// The explicit ORDER BY is load-bearing: the positional write-through
/// contract in [`super::batch::write_through`] requires a stable page order.
pub async fn list_worlds(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<World>, DbError> {
    let rows = sqlx::query_as::<_, World>(
        "SELECT id, randomnumber FROM world ORDER BY id LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Insert a new row; the identity `id` is store-assigned and not echoed back.
pub async fn create_world(pool: &PgPool, random_number: i32) -> Result<(), DbError> {
    sqlx::query("INSERT INTO world (randomnumber) VALUES ($1)")
        .bind(random_number)
        .execute(pool)
        .await?;

    Ok(())
}

/// Update a row by primary key, returning the number of rows affected.
///
/// A non-existent id is a successful zero-row no-op, matching relational
/// UPDATE semantics; existence is not re-verified around the write.
pub async fn update_world(pool: &PgPool, id: i32, random_number: i32) -> Result<u64, DbError> {
    let result = sqlx::query("UPDATE world SET randomnumber = $1 WHERE id = $2")
        .bind(random_number)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Delete a row by primary key, returning the number of rows affected.
///
/// Deleting a non-existent id is likewise a successful no-op.
pub async fn delete_world(pool: &PgPool, id: i32) -> Result<u64, DbError> {
    let result = sqlx::query("DELETE FROM world WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
