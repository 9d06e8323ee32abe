//! Integration tests against a live Postgres.
//!
//! These are `#[ignore]`d by default; run them with
//!
//! ```text
//! DATABASE_URL=postgres://… cargo test -p db -- --ignored --test-threads=1
//! ```
//!
//! against a scratch database.  Single-threaded because the tests share one
//! table and the write-through test rewrites an arbitrary page of it.  The schema is created on first use with a
//! CHECK constraint on `randomnumber` so batch atomicity can be exercised
//! by forcing a late-item failure.

use db::repository::{batch, worlds};
use db::{DbConfig, DbPool};

async fn test_pool() -> DbPool {
    let config = DbConfig::from_env().expect("DATABASE_URL must point at a scratch database");
    let pool = db::pool::create_pool(&config).await.expect("connect");

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS world (
             id SERIAL PRIMARY KEY,
             randomnumber INT NOT NULL CHECK (randomnumber >= 0)
         )",
    )
    .execute(&pool)
    .await
    .expect("create schema");

    pool
}

/// Insert one row with a marker value and return its id.
async fn insert_marked(pool: &DbPool, marker: i32) -> i32 {
    sqlx::query_scalar("INSERT INTO world (randomnumber) VALUES ($1) RETURNING id")
        .bind(marker)
        .fetch_one(pool)
        .await
        .expect("insert")
}

/// Count rows carrying one of the given marker values.  Markers keep the
/// assertions independent of whatever else the scratch table holds.
async fn count_marked(pool: &DbPool, markers: &[i32]) -> i64 {
    sqlx::query_scalar("SELECT count(*) FROM world WHERE randomnumber = ANY($1)")
        .bind(markers)
        .fetch_one(pool)
        .await
        .expect("count")
}

#[tokio::test]
#[ignore = "requires a live Postgres (DATABASE_URL)"]
async fn create_then_read_round_trip() {
    let pool = test_pool().await;
    let id = insert_marked(&pool, 4242).await;

    let row = worlds::get_world(&pool, id).await.unwrap();
    assert_eq!(row.id, id);
    assert_eq!(row.random_number, 4242);
}

#[tokio::test]
#[ignore = "requires a live Postgres (DATABASE_URL)"]
async fn missing_row_is_not_found() {
    let pool = test_pool().await;

    let err = worlds::get_world(&pool, -1).await.unwrap_err();
    assert!(matches!(err, db::DbError::NotFound));
}

#[tokio::test]
#[ignore = "requires a live Postgres (DATABASE_URL)"]
async fn update_then_read_returns_new_value() {
    let pool = test_pool().await;
    let id = insert_marked(&pool, 1).await;

    let affected = worlds::update_world(&pool, id, 777).await.unwrap();
    assert_eq!(affected, 1);

    let row = worlds::get_world(&pool, id).await.unwrap();
    assert_eq!(row.random_number, 777);
}

#[tokio::test]
#[ignore = "requires a live Postgres (DATABASE_URL)"]
async fn update_nonexistent_id_is_a_noop() {
    let pool = test_pool().await;

    let affected = worlds::update_world(&pool, -99999, 5).await.unwrap();
    assert_eq!(affected, 0);
}

#[tokio::test]
#[ignore = "requires a live Postgres (DATABASE_URL)"]
async fn delete_nonexistent_id_is_a_noop() {
    let pool = test_pool().await;

    let affected = worlds::delete_world(&pool, -99999).await.unwrap();
    assert_eq!(affected, 0);
}

#[tokio::test]
#[ignore = "requires a live Postgres (DATABASE_URL)"]
async fn read_many_respects_limit_offset_and_order() {
    let pool = test_pool().await;
    for _ in 0..3 {
        insert_marked(&pool, 10).await;
    }

    let page = worlds::list_worlds(&pool, 2, 0).await.unwrap();
    assert_eq!(page.len(), 2);
    assert!(page[0].id < page[1].id);

    let next = worlds::list_worlds(&pool, 2, 2).await.unwrap();
    if let Some(first_of_next) = next.first() {
        assert!(first_of_next.id > page[1].id);
    }
}

#[tokio::test]
#[ignore = "requires a live Postgres (DATABASE_URL)"]
async fn batch_create_is_all_or_nothing() {
    let pool = test_pool().await;

    // The third item violates the CHECK constraint; nothing must persist,
    // including the two valid leading items.
    let err = batch::create_worlds(&pool, &[881001, 881002, -1]).await;
    assert!(err.is_err());

    assert_eq!(count_marked(&pool, &[881001, 881002]).await, 0);
}

#[tokio::test]
#[ignore = "requires a live Postgres (DATABASE_URL)"]
async fn batch_delete_is_all_or_nothing() {
    let pool = test_pool().await;
    let a = insert_marked(&pool, 771001).await;
    let b = insert_marked(&pool, 771002).await;

    // A referencing row makes the DELETE of `b` fail on the foreign key,
    // after `a` has already been deleted inside the same transaction.
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS world_ref (
             id SERIAL PRIMARY KEY,
             world_id INT NOT NULL REFERENCES world(id)
         )",
    )
    .execute(&pool)
    .await
    .expect("create ref table");
    sqlx::query("INSERT INTO world_ref (world_id) VALUES ($1)")
        .bind(b)
        .execute(&pool)
        .await
        .expect("insert ref");

    let res = batch::delete_worlds(&pool, &[a, b]).await;
    assert!(res.is_err());

    // The rollback restored `a`; zero net effect.
    assert!(worlds::get_world(&pool, a).await.is_ok());
    assert!(worlds::get_world(&pool, b).await.is_ok());

    sqlx::query("DELETE FROM world_ref WHERE world_id = $1")
        .bind(b)
        .execute(&pool)
        .await
        .expect("drop ref row");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[ignore = "requires a live Postgres (DATABASE_URL)"]
async fn concurrent_batch_updates_on_disjoint_ids_lose_no_writes() {
    let pool = test_pool().await;
    let a1 = insert_marked(&pool, 1).await;
    let a2 = insert_marked(&pool, 1).await;
    let b1 = insert_marked(&pool, 1).await;
    let b2 = insert_marked(&pool, 1).await;

    let items_a = [(a1, 910), (a2, 911)];
    let items_b = [(b1, 920), (b2, 921)];
    let (ra, rb) = tokio::join!(
        batch::update_worlds(&pool, &items_a),
        batch::update_worlds(&pool, &items_b),
    );
    ra.unwrap();
    rb.unwrap();

    // Neither batch observed the other's writes as lost.
    assert_eq!(worlds::get_world(&pool, a1).await.unwrap().random_number, 910);
    assert_eq!(worlds::get_world(&pool, a2).await.unwrap().random_number, 911);
    assert_eq!(worlds::get_world(&pool, b1).await.unwrap().random_number, 920);
    assert_eq!(worlds::get_world(&pool, b2).await.unwrap().random_number, 921);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[ignore = "requires a live Postgres (DATABASE_URL)"]
async fn concurrent_overlapping_batch_updates_settle_to_one_writer() {
    let pool = test_pool().await;
    let id = insert_marked(&pool, 1).await;

    let items_a = [(id, 930)];
    let items_b = [(id, 931)];
    let (ra, rb) = tokio::join!(
        batch::update_worlds(&pool, &items_a),
        batch::update_worlds(&pool, &items_b),
    );
    ra.unwrap();
    rb.unwrap();

    // One writer wins outright; the row is never left corrupted or with a
    // value neither batch wrote.
    let v = worlds::get_world(&pool, id).await.unwrap().random_number;
    assert!(v == 930 || v == 931);
}

#[tokio::test]
#[ignore = "requires a live Postgres (DATABASE_URL)"]
async fn batch_delete_removes_every_listed_id() {
    let pool = test_pool().await;
    let a = insert_marked(&pool, 20).await;
    let b = insert_marked(&pool, 21).await;

    batch::delete_worlds(&pool, &[a, b, -1]).await.unwrap();

    assert!(matches!(
        worlds::get_world(&pool, a).await,
        Err(db::DbError::NotFound)
    ));
    assert!(matches!(
        worlds::get_world(&pool, b).await,
        Err(db::DbError::NotFound)
    ));
}

#[tokio::test]
#[ignore = "requires a live Postgres (DATABASE_URL)"]
async fn batch_update_duplicate_id_first_when_wins() {
    let pool = test_pool().await;
    let id = insert_marked(&pool, 1).await;

    // Postgres CASE evaluates WHEN clauses in order; the first match binds.
    batch::update_worlds(&pool, &[(id, 100), (id, 200)])
        .await
        .unwrap();

    let row = worlds::get_world(&pool, id).await.unwrap();
    assert_eq!(row.random_number, 100);
}

#[tokio::test]
#[ignore = "requires a live Postgres (DATABASE_URL)"]
async fn batch_update_skips_unmatched_ids() {
    let pool = test_pool().await;
    let id = insert_marked(&pool, 1).await;

    batch::update_worlds(&pool, &[(id, 50), (-4, 60)]).await.unwrap();

    let row = worlds::get_world(&pool, id).await.unwrap();
    assert_eq!(row.random_number, 50);
}

#[tokio::test]
#[ignore = "requires a live Postgres (DATABASE_URL)"]
async fn oversized_batch_update_takes_unnest_path() {
    let pool = test_pool().await;
    let id = insert_marked(&pool, 1).await;

    // One real id padded with misses to push past CASE_BATCH_MAX.
    let mut items = vec![(id, 90)];
    items.extend((1..=batch::CASE_BATCH_MAX as i32).map(|i| (-i, 0)));
    batch::update_worlds(&pool, &items).await.unwrap();

    let row = worlds::get_world(&pool, id).await.unwrap();
    assert_eq!(row.random_number, 90);
}

#[tokio::test]
#[ignore = "requires a live Postgres (DATABASE_URL)"]
async fn empty_batches_are_noop_successes() {
    let pool = test_pool().await;
    let id = insert_marked(&pool, 662200).await;

    batch::create_worlds(&pool, &[]).await.unwrap();
    batch::update_worlds(&pool, &[]).await.unwrap();
    batch::delete_worlds(&pool, &[]).await.unwrap();

    // Nothing was touched.
    let row = worlds::get_world(&pool, id).await.unwrap();
    assert_eq!(row.random_number, 662200);
}

#[tokio::test]
#[ignore = "requires a live Postgres (DATABASE_URL)"]
async fn write_through_assigns_values_positionally_and_pads() {
    let pool = test_pool().await;
    for _ in 0..3 {
        insert_marked(&pool, 5).await;
    }

    let written = batch::write_through(&pool, 3, 0, &[30, 31]).await.unwrap();
    assert_eq!(written.len(), 3);
    assert_eq!(written[0].random_number, 30);
    assert_eq!(written[1].random_number, 31);
    assert_eq!(written[2].random_number, batch::DEFAULT_WRITE_VALUE);

    // The store reflects the same positional assignment.
    for w in &written {
        let row = worlds::get_world(&pool, w.id).await.unwrap();
        assert_eq!(row.random_number, w.random_number);
    }
}
