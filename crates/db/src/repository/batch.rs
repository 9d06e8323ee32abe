//! Batched operations on the `world` table.
//!
//! Three strategies, chosen deliberately per operation type:
//!
//! - **Transactional** (batch create/delete): one transaction, one prepared
//!   statement execution per item in request order, one commit.  Any failure
//!   rolls back the whole batch; callers never see a partial commit.
//! - **Single-statement CASE** (batch update, small N): one generated
//!   `UPDATE … SET x = CASE id WHEN … END WHERE id IN (…)` with 2N
//!   positional parameters.  One round-trip, non-transactional.
//! - **Array/unnest** (batch update, large N): two `int4[]` binds joined via
//!   `unnest` against the primary key.  Same semantics as the CASE form but
//!   the statement text stays O(1) in the batch size.

use sqlx::PgPool;

use crate::{models::World, DbError};

/// Largest batch handed to the generated CASE statement; bigger batches use
/// the unnest form so the SQL text does not grow with N.
pub const CASE_BATCH_MAX: usize = 128;

/// Value assigned to a row when the caller supplies fewer values than the
/// write-through page returns.
pub const DEFAULT_WRITE_VALUE: i32 = 1;

/// Insert `values.len()` rows inside a single transaction.
///
/// All-or-nothing: the transaction commits only after every INSERT has
/// succeeded; an error on any item returns early and the dropped
/// transaction rolls back.  An empty batch is a no-op success.
pub async fn create_worlds(pool: &PgPool, values: &[i32]) -> Result<(), DbError> {
    if values.is_empty() {
        return Ok(());
    }

    let mut tx = pool.begin().await?;

    for &random_number in values {
        sqlx::query("INSERT INTO world (randomnumber) VALUES ($1)")
            .bind(random_number)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Delete the given ids inside a single transaction.
///
/// Same all-or-nothing contract as [`create_worlds`]; ids that match no row
/// delete zero rows and do not fail the batch.
pub async fn delete_worlds(pool: &PgPool, ids: &[i32]) -> Result<(), DbError> {
    if ids.is_empty() {
        return Ok(());
    }

    let mut tx = pool.begin().await?;

    for &id in ids {
        sqlx::query("DELETE FROM world WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Apply `(id, random_number)` pairs in one round-trip.
///
/// Non-transactional by construction (a single implicit statement).  Ids
/// that match no row are silently skipped, consistent with single-row
/// update semantics.  Duplicate ids resolve per strategy: the CASE form
/// binds the *first* matching WHEN clause (Postgres CASE evaluates in
/// order); the unnest form leaves the winner unspecified, as Postgres
/// `UPDATE … FROM` with multiple matching source rows picks an arbitrary
/// one.  An empty batch is a no-op success.
pub async fn update_worlds(pool: &PgPool, items: &[(i32, i32)]) -> Result<(), DbError> {
    if items.is_empty() {
        return Ok(());
    }

    if items.len() <= CASE_BATCH_MAX {
        update_worlds_case(pool, items).await
    } else {
        let (ids, values): (Vec<i32>, Vec<i32>) = items.iter().copied().unzip();
        update_worlds_unnest(pool, &ids, &values).await
    }
}

/// Read a page of ids (ORDER BY id), assign each the positionally matching
/// value from `values` (padding with [`DEFAULT_WRITE_VALUE`] when `values`
/// is shorter), write the assignments back via unnest, and return the
/// written rows.
///
/// The i-th returned row receives the i-th supplied value by result
/// position, not by id.  The explicit ORDER BY on the read is what makes
/// that pairing deterministic.
pub async fn write_through(
    pool: &PgPool,
    limit: i64,
    offset: i64,
    values: &[i32],
) -> Result<Vec<World>, DbError> {
    let ids: Vec<i32> =
        sqlx::query_scalar("SELECT id FROM world ORDER BY id LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let assigned = pair_values(&ids, values);
    update_worlds_unnest(pool, &ids, &assigned).await?;

    Ok(ids
        .iter()
        .zip(&assigned)
        .map(|(&id, &random_number)| World { id, random_number })
        .collect())
}

async fn update_worlds_case(pool: &PgPool, items: &[(i32, i32)]) -> Result<(), DbError> {
    let sql = case_update_sql(items.len());

    let mut query = sqlx::query(&sql);
    for &(id, random_number) in items {
        query = query.bind(id).bind(random_number);
    }
    query.execute(pool).await?;

    Ok(())
}

async fn update_worlds_unnest(pool: &PgPool, ids: &[i32], values: &[i32]) -> Result<(), DbError> {
    sqlx::query(
        "UPDATE world SET randomnumber = u.rn \
         FROM unnest($1::int4[], $2::int4[]) AS u(id, rn) \
         WHERE world.id = u.id",
    )
    .bind(ids)
    .bind(values)
    .execute(pool)
    .await?;

    Ok(())
}

/// Generate the CASE-form UPDATE for `n` items.
///
/// Placeholders are interleaved `WHEN $1 THEN $2 WHEN $3 THEN $4 …`; the IN
/// clause reuses the odd (id) placeholders, so the statement carries exactly
/// 2N bind parameters.
fn case_update_sql(n: usize) -> String {
    let mut sql = String::from("UPDATE world SET randomnumber = CASE id ");

    for i in 0..n {
        sql.push_str(&format!("WHEN ${} THEN ${} ", 2 * i + 1, 2 * i + 2));
    }

    sql.push_str("END WHERE id IN (");
    for i in 0..n {
        if i > 0 {
            sql.push_str(", ");
        }
        sql.push_str(&format!("${}", 2 * i + 1));
    }
    sql.push(')');

    sql
}

/// Pair the i-th id with the i-th supplied value, padding with
/// [`DEFAULT_WRITE_VALUE`] when the caller supplied fewer values than rows.
fn pair_values(ids: &[i32], values: &[i32]) -> Vec<i32> {
    (0..ids.len())
        .map(|i| values.get(i).copied().unwrap_or(DEFAULT_WRITE_VALUE))
        .collect()
}
